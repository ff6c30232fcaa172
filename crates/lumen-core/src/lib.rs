//! # Lumen Core
//!
//! Plugin host infrastructure for the Lumen imaging application. An
//! executable core loads shared modules at runtime; each module exposes one
//! or more self-describing plugins (image codecs, filters, devices, video
//! sources, scripting engines) behind a uniform, versioned, capability-typed
//! interface.
//!
//! ## Key Submodules and Responsibilities:
//!
//! - **[`variant`]**: The tagged-union [`Variant`](variant::Variant) value
//!   used to pass configuration across the plugin boundary.
//! - **[`descriptor`]**: Immutable metadata describing modules, plugins and
//!   their properties, identified by [`Guid`](descriptor::Guid)s.
//! - **[`abi`]**: The binary contract every loadable module exports, with an
//!   explicit ABI-version handshake.
//! - **[`loader`]**: Cross-platform loading of shared binaries and
//!   fail-fast resolution of the required entry points.
//! - **[`capability`]**: The polymorphic contracts plugin instances
//!   implement, plus the shared property-access machinery.
//! - **[`registry`]**: The per-module catalogue mapping plugin index/id to
//!   descriptors and factories, and the move-only instance handle.
//! - **[`host`]**: Orchestration: directory discovery, the global
//!   GUID-keyed catalogue, instantiation and module unloading.
//! - **[`error`]**: The crate-level aggregate error type.
pub mod abi;
pub mod capability;
pub mod descriptor;
pub mod error;
pub mod host;
pub mod loader;
pub mod registry;
pub mod variant;

// Re-export key public types for the binary and plugin module crates.
pub use abi::{PluginRegistration, StaticModule, ABI_VERSION};
pub use capability::{PluginError, PluginInstance, PluginObject};
pub use descriptor::{
    CapabilityKind, Guid, ModuleDescriptor, ModuleVersion, PluginDescriptor, PropertyDescriptor,
};
pub use error::{Error, Result};
pub use host::{HostConfig, PluginHost};
pub use loader::LoadedModule;
pub use registry::{PluginHandle, PluginRegistry};
pub use variant::Variant;
