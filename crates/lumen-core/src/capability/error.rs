//! Error type for calls into plugin instances.
//!
//! None of these are fatal to the host process; they are returned to the
//! immediate caller as typed results.
use crate::capability::image::PixelFormat;
use crate::variant::TypeMismatch;

#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    /// The plugin requires `connect()` before any property access.
    /// Connection checks precede id range checks.
    #[error("plugin is not connected")]
    NotConnected,

    /// No property with this id exists on the instance.
    #[error("unknown property id {0}")]
    InvalidProperty(u32),

    /// The value has the wrong variant kind or lies outside the declared
    /// `[min, max]` range. The stored value is left untouched.
    #[error("invalid value for property {id} ('{key}'): {reason}")]
    InvalidPropertyValue {
        id: u32,
        key: String,
        reason: String,
    },

    #[error("property {0} is read-only")]
    ReadOnlyProperty(u32),

    /// Indexed access on a non-array value, or index out of bounds.
    #[error("property {id} has no element at index {index}")]
    InvalidPropertyIndex { id: u32, index: u32 },

    #[error(transparent)]
    TypeMismatch(#[from] TypeMismatch),

    /// Capability-specific failure during import/export/process.
    #[error("processing failed: {0}")]
    Processing(String),

    #[error("unsupported pixel format {0:?}")]
    UnsupportedPixelFormat(PixelFormat),

    #[error("out of memory: {0}")]
    OutOfMemory(String),
}
