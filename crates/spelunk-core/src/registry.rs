//! Read-only query interface over a live component registry.
//!
//! The extraction engine only ever talks to [`ComponentRegistry`]. A host
//! framework adapter (or the JSON [`SnapshotRegistry`](crate::SnapshotRegistry))
//! turns whatever the framework keeps internally into these descriptors.
//!
//! Every field is optional on the wire: registries hand out partial entries
//! (anonymous values, factories without a token), and extraction treats
//! them best-effort instead of failing.

use serde::{Deserialize, Serialize};

/// Capability to list the modules currently registered in a running application.
pub trait ComponentRegistry: Send + Sync {
    /// Snapshot of every registered module, in registration order.
    fn list_modules(&self) -> Vec<ModuleDescriptor>;
}

impl ComponentRegistry for Vec<ModuleDescriptor> {
    fn list_modules(&self) -> Vec<ModuleDescriptor> {
        self.clone()
    }
}

/// An injection token: either a plain string or a symbolic identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Token {
    Named(String),
    /// Symbolic token; only its human-readable description is shown.
    Symbol { symbol: Option<String> },
}

impl Token {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    pub fn symbol(description: impl Into<String>) -> Self {
        Self::Symbol {
            symbol: Some(description.into()),
        }
    }

    /// Human-readable form of the token, if it has one.
    pub fn description(&self) -> Option<&str> {
        match self {
            Self::Named(name) => Some(name),
            Self::Symbol { symbol } => symbol.as_deref(),
        }
    }
}

/// One registered module and the entries it declares.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ModuleDescriptor {
    pub name: Option<String>,
    /// Service-like entries.
    pub providers: Vec<ComponentDescriptor>,
    /// Boundary/controller-like entries.
    pub controllers: Vec<ComponentDescriptor>,
}

impl ModuleDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_provider(mut self, provider: ComponentDescriptor) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn with_controller(mut self, controller: ComponentDescriptor) -> Self {
        self.controllers.push(controller);
        self
    }
}

/// A single provider or controller entry.
/// Type name the registry reports for entries built by a dynamic factory.
pub const FACTORY_MARKER: &str = "useFactory";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ComponentDescriptor {
    /// Export token the entry was registered under.
    pub token: Option<Token>,
    /// Concrete type name of the entry, absent for plain values.
    pub type_name: Option<String>,
    /// Registered through a dynamic factory (`useFactory`).
    pub factory: bool,
    pub constructor_deps: Vec<DependencyDescriptor>,
    pub enhancer_deps: Vec<DependencyDescriptor>,
}

impl ComponentDescriptor {
    /// A class-style entry whose token and type share the same name.
    pub fn of_type(type_name: impl Into<String>) -> Self {
        let type_name = type_name.into();
        Self {
            token: Some(Token::Named(type_name.clone())),
            type_name: Some(type_name),
            ..Self::default()
        }
    }

    /// A factory-provided entry exported under `token`.
    pub fn from_factory(token: Token) -> Self {
        Self {
            token: Some(token),
            type_name: Some(FACTORY_MARKER.to_string()),
            factory: true,
            ..Self::default()
        }
    }

    /// Built by a dynamic factory, flagged either way the registry reports it.
    pub fn is_factory(&self) -> bool {
        self.factory || self.type_name.as_deref() == Some(FACTORY_MARKER)
    }

    pub fn with_constructor_dep(mut self, dep: DependencyDescriptor) -> Self {
        self.constructor_deps.push(dep);
        self
    }

    pub fn with_enhancer_dep(mut self, dep: DependencyDescriptor) -> Self {
        self.enhancer_deps.push(dep);
        self
    }

    /// Shorthand for a plain constructor dependency on `name`.
    pub fn depends_on(self, name: impl Into<String>) -> Self {
        self.with_constructor_dep(DependencyDescriptor::named(name))
    }
}

/// A declared dependency of an entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DependencyDescriptor {
    pub token: Option<Token>,
    /// The dependency resolves to a factory-provided entry.
    pub factory: bool,
}

impl DependencyDescriptor {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            token: Some(Token::named(name)),
            factory: false,
        }
    }

    pub fn from_factory(token: Token) -> Self {
        Self {
            token: Some(token),
            factory: true,
        }
    }

    /// Display name of the dependency target; `""` when the token is missing.
    pub fn name(&self) -> &str {
        self.token
            .as_ref()
            .and_then(Token::description)
            .unwrap_or_default()
    }
}
