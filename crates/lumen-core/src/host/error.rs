use std::path::PathBuf;
use thiserror::Error;

use crate::capability::error::PluginError;
use crate::descriptor::{CapabilityKind, Guid};
use crate::loader::LoadError;
use crate::registry::RegistryError;

#[derive(Error, Debug)]
pub enum HostError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Plugin(#[from] PluginError),

    #[error("Module {0} is already registered")]
    DuplicateModule(Guid),

    #[error("Plugin {plugin} is already provided by module {module}")]
    DuplicatePlugin { plugin: Guid, module: Guid },

    #[error("No module with id {0} is loaded")]
    UnknownModule(Guid),

    #[error("No plugin with id {0} is registered")]
    UnknownPlugin(Guid),

    #[error("Plugin '{key}' is a {actual:?}, operation requires {expected:?}")]
    WrongCapability {
        key: String,
        expected: CapabilityKind,
        actual: CapabilityKind,
    },

    #[error("Importer '{key}' does not handle '.{extension}' files")]
    UnsupportedExtension { key: String, extension: String },

    #[error("Failed to read config file '{path}': {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Shutdown left {} module(s) in error: {}", failures.len(), failures.join("; "))]
    Shutdown { failures: Vec<String> },
}
