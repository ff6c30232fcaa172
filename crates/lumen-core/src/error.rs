//! Crate-wide error aggregation.
//!
//! Each subsystem defines its own error enum next to its code; this module
//! folds them into one [`Error`] for callers that cross subsystem
//! boundaries, with a matching [`Result`] alias.
use thiserror::Error;

use crate::capability::error::PluginError;
use crate::descriptor::DescriptorError;
use crate::host::HostError;
use crate::loader::LoadError;
use crate::registry::RegistryError;
use crate::variant::TypeMismatch;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Variant error: {0}")]
    Variant(#[from] TypeMismatch),

    #[error("Descriptor error: {0}")]
    Descriptor(#[from] DescriptorError),

    #[error("Module load error: {0}")]
    Load(#[from] LoadError),

    #[error("Plugin error: {0}")]
    Plugin(#[from] PluginError),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Host error: {0}")]
    Host(#[from] HostError),
}

pub type Result<T> = std::result::Result<T, Error>;
