//! The contract between the host and a dynamically loaded module.
//!
//! Modules are cdylib crates compiled with the same toolchain as the host
//! and exchange plain Rust types across the boundary. A leading version
//! handshake refuses anything built against a different revision of this
//! contract before any richer symbol is touched.
//!
//! A conforming module exports four symbols:
//!
//! * [`ABI_SYMBOL`]: `extern "C-unwind" fn() -> u32`, returns [`ABI_VERSION`];
//! * [`INIT_SYMBOL`]: `extern "C-unwind" fn() -> *mut ModuleDescriptor`;
//! * [`PLUGIN_SYMBOL`]: `extern "C-unwind" fn(u32) -> *mut PluginRegistration`;
//! * [`CLEANUP_SYMBOL`]: `extern "C-unwind" fn()`.
//!
//! Pointers returned by init and plugin are `Box::into_raw` allocations the
//! host takes ownership of. A null pointer means the index was out of range
//! or the module failed internally.

use crate::capability::PluginObject;
use crate::descriptor::{ModuleDescriptor, PluginDescriptor};

/// Bumped whenever the shape of the exchanged types changes.
pub const ABI_VERSION: u32 = 1;

/// Symbol names, NUL-terminated for symbol lookup.
pub const ABI_SYMBOL: &[u8] = b"lumen_module_abi\0";
pub const INIT_SYMBOL: &[u8] = b"lumen_module_init\0";
pub const PLUGIN_SYMBOL: &[u8] = b"lumen_module_plugin\0";
pub const CLEANUP_SYMBOL: &[u8] = b"lumen_module_cleanup\0";

/// Creates a fresh, independent instance of one plugin type.
pub type PluginFactory = fn() -> PluginObject;

/// One plugin type as a module hands it to the host: the immutable
/// descriptor template plus the factory that mints instances.
pub struct PluginRegistration {
    pub descriptor: PluginDescriptor,
    pub factory: PluginFactory,
}

impl PluginRegistration {
    pub fn new(descriptor: PluginDescriptor, factory: PluginFactory) -> Self {
        Self {
            descriptor,
            factory,
        }
    }
}

/// A module linked directly into the host binary instead of discovered on
/// disk. Built-in plugins register through this and skip the ABI handshake.
pub struct StaticModule {
    pub descriptor: ModuleDescriptor,
    pub plugins: Vec<PluginRegistration>,
}

/// `lumen_module_abi`
pub type ModuleAbiFn = unsafe extern "C-unwind" fn() -> u32;
/// `lumen_module_init`
pub type ModuleInitFn = unsafe extern "C-unwind" fn() -> *mut ModuleDescriptor;
/// `lumen_module_plugin`
pub type ModulePluginFn = unsafe extern "C-unwind" fn(u32) -> *mut PluginRegistration;
/// `lumen_module_cleanup`
pub type ModuleCleanupFn = unsafe extern "C-unwind" fn();
