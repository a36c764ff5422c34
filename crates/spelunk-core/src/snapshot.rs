//! A [`ComponentRegistry`] backed by a JSON snapshot of a running application.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use spelunk_error::{Error, ErrorKind, Result};

use crate::registry::{ComponentRegistry, ModuleDescriptor};

/// Registry snapshot as loaded from disk.
///
/// Unknown or missing fields are tolerated so that partially exported
/// registries still load; only a document that is not JSON at all (or
/// whose top level is the wrong shape) is rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotRegistry {
    pub modules: Vec<ModuleDescriptor>,
}

impl SnapshotRegistry {
    pub fn new(modules: Vec<ModuleDescriptor>) -> Self {
        Self { modules }
    }

    /// Parse a snapshot document.
    pub fn from_json_str(input: &str) -> Result<Self> {
        let snapshot: Self = serde_json::from_str(input).map_err(|err| {
            Error::invalid_format("registry snapshot is not valid")
                .with_operation("snapshot::from_json_str")
                .with_context("line", err.line().to_string())
                .with_context("column", err.column().to_string())
                .set_source(err)
        })?;
        debug!(modules = snapshot.modules.len(), "parsed registry snapshot");
        Ok(snapshot)
    }

    /// Load a snapshot document from `path`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let shown = path.display().to_string();

        let input = std::fs::read_to_string(path).map_err(|err| {
            let kind = match err.kind() {
                std::io::ErrorKind::NotFound => ErrorKind::FileNotFound,
                std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied,
                _ => ErrorKind::IoFailed,
            };
            Error::new(kind, "cannot read registry snapshot")
                .with_operation("snapshot::from_path")
                .with_context("path", shown.clone())
                .set_source(err)
        })?;

        let snapshot = Self::from_json_str(&input).map_err(|err| {
            err.with_operation("snapshot::from_path")
                .with_context("path", shown.clone())
        })?;
        info!(path = %shown, modules = snapshot.modules.len(), "loaded registry snapshot");
        Ok(snapshot)
    }
}

impl ComponentRegistry for SnapshotRegistry {
    fn list_modules(&self) -> Vec<ModuleDescriptor> {
        self.modules.clone()
    }
}
