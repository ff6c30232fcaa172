use thiserror::Error;

use crate::descriptor::{CapabilityKind, DescriptorError, Guid, ModuleVersion};
use crate::loader::LoadError;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("Module '{key}' rejected: {source}")]
    InvalidDescriptor {
        key: String,
        #[source]
        source: DescriptorError,
    },

    #[error("Module '{key}' version {module_version} is incompatible with host {host_version}")]
    IncompatibleModule {
        key: String,
        module_version: ModuleVersion,
        host_version: ModuleVersion,
    },

    #[error("Module '{key}' declared {declared} plugins but stopped at index {index}")]
    MissingPlugin {
        key: String,
        declared: u32,
        index: u32,
    },

    #[error("Duplicate plugin id {0} within one module")]
    DuplicatePluginGuid(Guid),

    #[error("No plugin with id {0} in this module")]
    UnknownPlugin(Guid),

    #[error("Plugin '{key}' declares capability {declared:?} but its factory produced {actual:?}")]
    CapabilityMismatch {
        key: String,
        declared: CapabilityKind,
        actual: CapabilityKind,
    },

    #[error("Module '{key}' still has {live} live plugin instance(s)")]
    ModuleBusy { key: String, live: usize },
}
