//! Graph data model shared by the classifier, filter and serializers.
//!
//! Instances live for one request: built from a registry snapshot, moved
//! through the pipeline stages and dropped after the response.

use serde::Serialize;
use strum_macros::{Display, IntoStaticStr};

/// Semantic category of a dependency edge.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, IntoStaticStr, Serialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// Target is constructed through a dynamic factory.
    Factory,
    /// Target is the data connection itself.
    Connection,
    /// Target is a repository / storage accessor.
    Repository,
    /// Plain injected import.
    Import,
}

impl EdgeKind {
    pub fn as_str(&self) -> &'static str {
        (*self).into()
    }
}

/// A directed dependency from a component to a named node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Edge {
    pub target: String,
    pub kind: EdgeKind,
}

impl Edge {
    pub fn new(target: impl Into<String>, kind: EdgeKind) -> Self {
        Self {
            target: target.into(),
            kind,
        }
    }
}

/// A named unit registered in a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Component {
    /// Display name; empty for anonymous entries.
    pub name: String,
    pub dependencies: Vec<Edge>,
}

impl Component {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dependencies: Vec::new(),
        }
    }

    pub fn with_dependency(mut self, edge: Edge) -> Self {
        self.dependencies.push(edge);
        self
    }

    /// Check whether this component declares a dependency on `name`.
    pub fn depends_on(&self, name: &str) -> bool {
        self.dependencies.iter().any(|edge| edge.target == name)
    }
}

/// A named namespace holding components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Module {
    pub name: String,
    pub components: Vec<Component>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            components: Vec::new(),
        }
    }

    pub fn with_component(mut self, component: Component) -> Self {
        self.components.push(component);
        self
    }

    pub fn component(&self, name: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.component(name).is_some()
    }
}
