//! Edge classification and the storage collapse.

use spelunk_core::{Component, Edge, EdgeKind, Module};

use crate::extract::{DependencyRef, ExtractedModule};

/// Names ending with this suffix are repository / storage accessors.
pub const REPOSITORY_SUFFIX: &str = "Repository";

/// Synthetic node every repository collapses into when flattening.
pub const STORAGE_NODE: &str = "STORAGE";

/// The data connection token.
pub const CONNECTION_NAME: &str = "Connection";

/// Rename repository names to [`STORAGE_NODE`] when `flatten_storage` is set.
pub fn collapse_storage(name: &str, flatten_storage: bool) -> String {
    if flatten_storage && name.ends_with(REPOSITORY_SUFFIX) {
        STORAGE_NODE.to_string()
    } else {
        name.to_string()
    }
}

/// Assign a kind to one dependency. First match wins:
/// repository suffix, factory marker, connection token, plain import.
pub fn classify(dependency: &DependencyRef, flatten_storage: bool) -> Edge {
    let name = dependency.name.as_str();

    let kind = if name.ends_with(REPOSITORY_SUFFIX) {
        EdgeKind::Repository
    } else if dependency.factory {
        EdgeKind::Factory
    } else if name == CONNECTION_NAME {
        EdgeKind::Connection
    } else {
        EdgeKind::Import
    };

    Edge::new(collapse_storage(name, flatten_storage), kind)
}

/// Classify every edge and component name of an extracted graph.
pub fn classify_modules(modules: Vec<ExtractedModule>, flatten_storage: bool) -> Vec<Module> {
    modules
        .into_iter()
        .map(|module| Module {
            name: module.name,
            components: module
                .components
                .into_iter()
                .map(|component| Component {
                    name: collapse_storage(&component.name, flatten_storage),
                    dependencies: component
                        .dependencies
                        .iter()
                        .map(|dep| classify(dep, flatten_storage))
                        .collect(),
                })
                .collect(),
        })
        .collect()
}
