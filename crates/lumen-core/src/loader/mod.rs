//! Dynamic module binaries.
//!
//! A [`LoadedModule`] wraps one opened library plus its resolved entry
//! points. Every call into the module runs under `catch_unwind`, so a
//! misbehaving module reports an error instead of aborting the host.
//!
//! The ABI handshake happens at open time: if `lumen_module_abi` is absent
//! or reports a different [`ABI_VERSION`](crate::abi::ABI_VERSION), no other
//! symbol of the module is ever called.
pub mod error;

pub use error::LoadError;

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use libloading::{Library, Symbol};
use log::debug;

use crate::abi::{
    self, ModuleAbiFn, ModuleCleanupFn, ModuleInitFn, ModulePluginFn, PluginRegistration,
};
use crate::descriptor::ModuleDescriptor;

#[cfg(test)]
mod tests;

/// An opened module library with its entry points resolved up front.
///
/// The `Library` must outlive every descriptor, factory and instance that
/// came out of it; the registry enforces that ordering during shutdown.
pub struct LoadedModule {
    path: PathBuf,
    init: ModuleInitFn,
    plugin: ModulePluginFn,
    cleanup: ModuleCleanupFn,
    // Held last so the code the fn pointers target stays mapped.
    library: Library,
}

impl LoadedModule {
    /// Open a module binary and perform the ABI handshake.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        if !path.exists() {
            return Err(LoadError::FileNotFound(path.to_path_buf()));
        }

        debug!("Opening module library: {:?}", path);
        let library = unsafe { Library::new(path) }.map_err(|source| LoadError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let abi_fn: ModuleAbiFn = resolve(&library, path, abi::ABI_SYMBOL)?;
        let found = catch_entry("lumen_module_abi", || unsafe { abi_fn() })?;
        if found != abi::ABI_VERSION {
            return Err(LoadError::AbiMismatch {
                path: path.to_path_buf(),
                expected: abi::ABI_VERSION,
                found,
            });
        }

        let init = resolve(&library, path, abi::INIT_SYMBOL)?;
        let plugin = resolve(&library, path, abi::PLUGIN_SYMBOL)?;
        let cleanup = resolve(&library, path, abi::CLEANUP_SYMBOL)?;

        Ok(Self {
            path: path.to_path_buf(),
            init,
            plugin,
            cleanup,
            library,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Resolve an arbitrary exported symbol.
    ///
    /// The required entry points are resolved once at load time; this is
    /// for optional, module-specific symbols. The resolved value must not
    /// outlive this module.
    pub fn resolve<T: Copy>(&self, symbol: &[u8]) -> Result<T, LoadError> {
        resolve(&self.library, &self.path, symbol)
    }

    /// Ask the module for its descriptor. Called exactly once per load.
    pub fn initialize(&self) -> Result<ModuleDescriptor, LoadError> {
        let init = self.init;
        let raw = catch_entry("lumen_module_init", || unsafe { init() })?;
        if raw.is_null() {
            return Err(LoadError::NullDescriptor {
                symbol: "lumen_module_init",
            });
        }
        // Ownership transfers to the host.
        Ok(*unsafe { Box::from_raw(raw) })
    }

    /// Fetch the plugin registration at `index`. `None` means the index is
    /// past the end of the module's plugin table.
    pub fn plugin(&self, index: u32) -> Result<Option<PluginRegistration>, LoadError> {
        let plugin = self.plugin;
        let raw = catch_entry("lumen_module_plugin", || unsafe { plugin(index) })?;
        if raw.is_null() {
            return Ok(None);
        }
        Ok(Some(*unsafe { Box::from_raw(raw) }))
    }

    /// Let the module release whatever it allocated during initialize.
    /// Called exactly once, after all instances and descriptors are gone.
    pub fn cleanup(&self) -> Result<(), LoadError> {
        let cleanup = self.cleanup;
        catch_entry("lumen_module_cleanup", || unsafe { cleanup() })
    }
}

impl std::fmt::Debug for LoadedModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedModule")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

fn resolve<T: Copy>(library: &Library, path: &Path, symbol: &[u8]) -> Result<T, LoadError> {
    let resolved: Symbol<T> =
        unsafe { library.get(symbol) }.map_err(|source| LoadError::SymbolNotFound {
            path: path.to_path_buf(),
            symbol: String::from_utf8_lossy(&symbol[..symbol.len() - 1]).into_owned(),
            source,
        })?;
    Ok(*resolved)
}

fn catch_entry<R>(symbol: &'static str, call: impl FnOnce() -> R) -> Result<R, LoadError> {
    panic::catch_unwind(AssertUnwindSafe(call)).map_err(|payload| LoadError::EntryPointPanic {
        symbol,
        message: panic_message(payload),
    })
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Platform file name for a module with the given stem, e.g. `effects` to
/// `libeffects.so` on Linux.
pub fn module_file_name(stem: &str) -> String {
    format!(
        "{}{}{}",
        std::env::consts::DLL_PREFIX,
        stem,
        std::env::consts::DLL_SUFFIX
    )
}

/// Whether a directory entry looks like a loadable module binary.
pub fn is_module_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .is_some_and(|ext| ext == std::env::consts::DLL_EXTENSION)
}
