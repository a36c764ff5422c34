//! Per-request filter options.

use std::collections::BTreeSet;

/// Framework helper injected everywhere; never worth drawing.
pub const BUILTIN_IGNORED_COMPONENT: &str = "ModuleRef";

/// The framework's own internal module.
pub const BUILTIN_IGNORED_MODULE: &str = "InternalCoreModule";

/// Options controlling which part of the graph is visible.
///
/// The ignore sets always contain the built-in names; extra names are
/// added on top of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOptions {
    /// Component to center the view on.
    pub focus: Option<String>,
    pub ignore_components: BTreeSet<String>,
    pub ignore_modules: BTreeSet<String>,
    /// Collapse every repository into one synthetic storage node.
    pub flatten_storage: bool,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            focus: None,
            ignore_components: BTreeSet::from([BUILTIN_IGNORED_COMPONENT.to_string()]),
            ignore_modules: BTreeSet::from([BUILTIN_IGNORED_MODULE.to_string()]),
            flatten_storage: false,
        }
    }
}

impl FilterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Focus target, treating an empty name as no focus.
    pub fn focus(&self) -> Option<&str> {
        self.focus.as_deref().filter(|focus| !focus.is_empty())
    }

    pub fn with_focus(mut self, focus: Option<String>) -> Self {
        self.focus = focus.filter(|focus| !focus.is_empty());
        self
    }

    pub fn with_ignored_components<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore_components.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn with_ignored_modules<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore_modules.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn with_flatten_storage(mut self, flatten_storage: bool) -> Self {
        self.flatten_storage = flatten_storage;
        self
    }
}
