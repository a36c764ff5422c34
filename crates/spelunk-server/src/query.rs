//! Query parameters of the image endpoint.

use spelunk_collect::FilterOptions;
use spelunk_error::{Error, Result};

pub const FOCUS: &str = "focus";
pub const IGNORE_MODULES: &str = "ignoreModules";
pub const FLATTEN_DB: &str = "flattenDB";

/// Per-request filter choices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepsQuery {
    pub focus: Option<String>,
    pub ignore_modules: Vec<String>,
    pub flatten_db: bool,
}

impl DepsQuery {
    /// Interpret decoded query pairs.
    ///
    /// `ignoreModules` may repeat and each value may hold a comma separated
    /// list. `flattenDB` must be `true` or `false` when present. The last
    /// `focus` wins. Unknown keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                FOCUS => query.focus = Some(value).filter(|focus| !focus.is_empty()),
                IGNORE_MODULES => query.ignore_modules.extend(split_list(&value)),
                FLATTEN_DB => query.flatten_db = parse_bool(FLATTEN_DB, &value)?,
                _ => {}
            }
        }
        Ok(query)
    }

    /// Layer this request's choices over the process-wide options.
    pub fn apply(self, base: &FilterOptions) -> FilterOptions {
        base.clone()
            .with_focus(self.focus)
            .with_ignored_modules(self.ignore_modules)
            .with_flatten_storage(self.flatten_db)
    }
}

fn split_list(value: &str) -> impl Iterator<Item = String> + '_ {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
}

fn parse_bool(param: &'static str, value: &str) -> Result<bool> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(Error::invalid_argument(param, "boolean string is expected").with_context("value", value)),
    }
}
