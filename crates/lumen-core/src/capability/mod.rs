//! # Lumen Core Capability Contracts
//!
//! The polymorphic interfaces every plugin instance implements: a universal
//! base contract ([`PluginInstance`]) plus exactly one specialized
//! capability selected by the descriptor's [`CapabilityKind`].
//!
//! Property access policy, uniform across all capability types and checked
//! in this order:
//!
//! 1. connection — a connect-required plugin that is not connected fails
//!    every property call with [`PluginError::NotConnected`], including
//!    calls with out-of-range ids;
//! 2. id range — unknown ids fail with [`PluginError::InvalidProperty`];
//! 3. read-only — on `set_property` only;
//! 4. value validation — kind and `[min, max]` via the descriptor; a
//!    rejected set never mutates stored state.
//!
//! Instances are not thread-safe by default: each is used by at most one
//! logical pipeline stage at a time, and hosts needing concurrent access
//! must serialize it themselves.
pub mod error;
pub mod image;
pub mod property;
pub mod remap;

pub use error::PluginError;
pub use image::{Image, PixelFormat};
pub use property::PropertyBag;
pub use remap::PropertyIdRemap;

use std::path::Path;

use crate::descriptor::CapabilityKind;
use crate::variant::Variant;

#[cfg(test)]
mod tests;

/// Universal base contract implemented by every plugin instance.
pub trait PluginInstance: Send {
    /// Establish whatever session the plugin needs (device handle, capture
    /// graph, ...). Connection-free plugins keep the default no-op.
    fn connect(&mut self) -> Result<(), PluginError> {
        Ok(())
    }

    /// Tear the session down. Must be idempotent; called again by disposal.
    fn disconnect(&mut self) {}

    /// Connection-free plugins report `true` unconditionally.
    fn is_connected(&self) -> bool {
        true
    }

    /// Whether property access requires a prior `connect()`.
    fn requires_connection(&self) -> bool {
        false
    }

    /// Read a property by numeric id. Dynamic properties are re-evaluated
    /// on every call; there is no caching window.
    fn get_property(&mut self, id: u32) -> Result<Variant, PluginError>;

    /// Write a property by numeric id, subject to the uniform policy above.
    fn set_property(&mut self, id: u32, value: Variant) -> Result<(), PluginError>;

    /// Read one element of an array-valued property.
    fn get_indexed_property(&mut self, id: u32, index: u32) -> Result<Variant, PluginError>;
}

/// Reads still images from files.
pub trait ImageImporter: PluginInstance {
    /// File extensions (lowercase, without dot) this importer handles, in
    /// declaration order. The host filters by extension before dispatching;
    /// `import` is never called for an unregistered extension.
    fn supported_extensions(&self) -> &[String];

    fn import(&mut self, path: &Path) -> Result<Image, PluginError>;
}

/// Writes still images to files.
pub trait ImageExporter: PluginInstance {
    fn supported_extensions(&self) -> &[String];

    fn supported_pixel_formats(&self) -> &[PixelFormat];

    fn export(&mut self, path: &Path, image: &Image) -> Result<(), PluginError>;
}

/// Transforms a single image.
pub trait ImageFilter: PluginInstance {
    /// Supported `(input, output)` pixel-format pairs.
    fn pixel_format_translations(&self) -> &[(PixelFormat, PixelFormat)];

    fn can_process_in_place(&self) -> bool {
        false
    }

    fn process(&mut self, input: &Image) -> Result<Image, PluginError>;

    /// Only meaningful when `can_process_in_place()` is true.
    fn process_in_place(&mut self, _image: &mut Image) -> Result<(), PluginError> {
        Err(PluginError::Processing(
            "in-place processing not supported".to_string(),
        ))
    }
}

/// Combines two same-shape images into one.
pub trait TwoImageFilter: PluginInstance {
    fn pixel_format_translations(&self) -> &[(PixelFormat, PixelFormat)];

    /// Implementations must reject inputs whose shapes differ.
    fn process(&mut self, first: &Image, second: &Image) -> Result<Image, PluginError>;
}

/// A hardware or virtual device, driven purely through properties after
/// `connect()`. Dynamic properties reflect live device state.
pub trait Device: PluginInstance {}

/// A streaming frame producer. Streaming semantics beyond start/stop belong
/// to the video pipeline, not this core.
pub trait VideoSource: PluginInstance {
    /// Begin producing frames on the plugin's own worker context.
    fn start(&mut self) -> Result<(), PluginError>;

    /// Signal cancellation and block until the worker has observed it and
    /// exited. Disposal calls this, so an instance can never be torn down
    /// while its worker still runs.
    fn stop(&mut self);
}

/// A streaming frame transformer; semantics beyond the base contract belong
/// to the video pipeline.
pub trait VideoProcessor: PluginInstance {}

/// A scripting engine binding; execution semantics belong to the scripting
/// host.
pub trait ScriptEngine: PluginInstance {}

/// A live plugin instance, tagged by the capability it implements.
///
/// This is the explicit dispatch point: the host matches on the variant
/// instead of routing through generated capability tables.
pub enum PluginObject {
    Importer(Box<dyn ImageImporter>),
    Exporter(Box<dyn ImageExporter>),
    Filter(Box<dyn ImageFilter>),
    TwoImageFilter(Box<dyn TwoImageFilter>),
    Device(Box<dyn Device>),
    VideoSource(Box<dyn VideoSource>),
    VideoProcessor(Box<dyn VideoProcessor>),
    ScriptEngine(Box<dyn ScriptEngine>),
}

impl PluginObject {
    /// The capability this object actually implements; the registry checks
    /// it against the descriptor's declared capability at instantiation.
    pub fn capability(&self) -> CapabilityKind {
        match self {
            PluginObject::Importer(_) => CapabilityKind::ImageImporter,
            PluginObject::Exporter(_) => CapabilityKind::ImageExporter,
            PluginObject::Filter(_) => CapabilityKind::ImageFilter,
            PluginObject::TwoImageFilter(_) => CapabilityKind::TwoImageFilter,
            PluginObject::Device(_) => CapabilityKind::Device,
            PluginObject::VideoSource(_) => CapabilityKind::VideoSource,
            PluginObject::VideoProcessor(_) => CapabilityKind::VideoProcessor,
            PluginObject::ScriptEngine(_) => CapabilityKind::ScriptEngine,
        }
    }

    /// The universal base contract, regardless of capability.
    pub fn base(&self) -> &dyn PluginInstance {
        match self {
            PluginObject::Importer(o) => o.as_ref(),
            PluginObject::Exporter(o) => o.as_ref(),
            PluginObject::Filter(o) => o.as_ref(),
            PluginObject::TwoImageFilter(o) => o.as_ref(),
            PluginObject::Device(o) => o.as_ref(),
            PluginObject::VideoSource(o) => o.as_ref(),
            PluginObject::VideoProcessor(o) => o.as_ref(),
            PluginObject::ScriptEngine(o) => o.as_ref(),
        }
    }

    /// Mutable access to the universal base contract.
    pub fn base_mut(&mut self) -> &mut dyn PluginInstance {
        match self {
            PluginObject::Importer(o) => o.as_mut(),
            PluginObject::Exporter(o) => o.as_mut(),
            PluginObject::Filter(o) => o.as_mut(),
            PluginObject::TwoImageFilter(o) => o.as_mut(),
            PluginObject::Device(o) => o.as_mut(),
            PluginObject::VideoSource(o) => o.as_mut(),
            PluginObject::VideoProcessor(o) => o.as_mut(),
            PluginObject::ScriptEngine(o) => o.as_mut(),
        }
    }
}

impl std::fmt::Debug for PluginObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("PluginObject")
            .field(&self.capability())
            .finish()
    }
}
