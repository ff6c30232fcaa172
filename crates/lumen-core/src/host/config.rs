//! Host configuration.
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::host::HostError;

/// Where to look for module binaries and which ones to leave alone.
///
/// ```toml
/// module_dirs = ["/usr/lib/lumen/modules", "modules"]
/// disabled_modules = ["legacy_capture"]
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Directories scanned during discovery, in order.
    pub module_dirs: Vec<PathBuf>,
    /// Module file stems (without platform prefix or extension) that
    /// discovery skips. Explicit loads ignore this list.
    pub disabled_modules: Vec<String>,
}

impl HostConfig {
    pub async fn from_toml_file(path: &Path) -> Result<Self, HostError> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| HostError::ConfigRead {
                path: path.to_path_buf(),
                source,
            })?;
        toml::from_str(&text).map_err(|source| HostError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn with_module_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.module_dirs.push(dir.into());
        self
    }
}
