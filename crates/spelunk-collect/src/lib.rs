//! Graph extraction, classification and filtering.
//!
//! This crate turns a [`ComponentRegistry`] into the list of visible
//! modules a diagram is drawn from:
//!
//! 1. [`extract`]: walk the registry into modules and raw dependency refs
//! 2. [`classify`]: give every edge a kind, optionally collapse storage nodes
//! 3. [`filter`]: component inclusion, pruning, focus-aware module inclusion, ordering
//!
//! # Module Structure
//!
//! - [`extract`]: registry walk and module merging
//! - [`classify`]: edge kinds and the storage collapse
//! - [`filter`]: the order-sensitive filter pipeline
//! - [`options`]: per-request filter options

pub mod classify;
pub mod extract;
pub mod filter;
pub mod options;

use std::time::Instant;

use tracing::debug;

use spelunk_core::{ComponentRegistry, Module};

pub use classify::{STORAGE_NODE, classify, classify_modules, collapse_storage};
pub use extract::{DependencyRef, ExtractedComponent, ExtractedModule, extract};
pub use filter::filter;
pub use options::{BUILTIN_IGNORED_COMPONENT, BUILTIN_IGNORED_MODULE, FilterOptions};

/// Build the visible dependency tree for one request.
///
/// The registry is read once; the returned modules are sorted by name and
/// only hold components that survived every filter stage.
pub fn dependency_tree<R>(registry: &R, options: &FilterOptions) -> Vec<Module>
where
    R: ComponentRegistry + ?Sized,
{
    let start = Instant::now();

    let extracted = extract(registry);
    let classified = classify_modules(extracted, options.flatten_storage);
    let visible = filter(classified, options);

    debug!(
        modules = visible.len(),
        focus = ?options.focus(),
        flatten_storage = options.flatten_storage,
        elapsed_us = start.elapsed().as_micros() as u64,
        "dependency tree built"
    );
    visible
}
