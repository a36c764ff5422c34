//! Registry interface and graph data model for spelunk.
//!
//! # Module Structure
//!
//! - [`registry`]: the read-only query interface over a live component registry
//! - [`model`]: modules, components and classified edges produced by extraction
//! - [`snapshot`]: a registry backed by a JSON snapshot document

pub mod model;
pub mod registry;
pub mod snapshot;

pub use model::{Component, Edge, EdgeKind, Module};
pub use registry::{
    ComponentDescriptor, ComponentRegistry, DependencyDescriptor, FACTORY_MARKER, ModuleDescriptor,
    Token,
};
pub use snapshot::SnapshotRegistry;
pub use spelunk_error::{Error, ErrorKind, Result};
