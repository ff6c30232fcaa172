//! Per-module plugin registry.
//!
//! One [`PluginRegistry`] owns everything that came out of one module: the
//! module descriptor, the plugin descriptor templates with their factories,
//! and, for dynamic modules, the opened library itself. Instances are
//! tracked with a live counter so a module can never be torn down while
//! code from it is still running.
pub mod error;

pub use error::RegistryError;

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use log::{debug, warn};

use crate::abi::{PluginRegistration, StaticModule};
use crate::capability::PluginObject;
use crate::descriptor::{Guid, ModuleDescriptor, ModuleVersion, PluginDescriptor};
use crate::loader::LoadedModule;

#[cfg(test)]
mod tests;

/// One registered plugin type: the validated descriptor template plus the
/// factory minting fresh instances.
pub struct PluginRecord {
    descriptor: PluginDescriptor,
    factory: fn() -> PluginObject,
}

impl PluginRecord {
    pub fn descriptor(&self) -> &PluginDescriptor {
        &self.descriptor
    }
}

enum ModuleBinary {
    /// Library on disk; kept open for the registry's whole lifetime.
    Dynamic(LoadedModule),
    /// Compiled into the host; nothing to unload.
    Static,
}

/// The plugins of one module, ready to instantiate.
pub struct PluginRegistry {
    descriptor: ModuleDescriptor,
    plugins: Vec<PluginRecord>,
    live: Arc<AtomicUsize>,
    binary: ModuleBinary,
}

impl PluginRegistry {
    /// Build a registry from a freshly opened dynamic module.
    ///
    /// Runs the module's initialize, validates the module descriptor and
    /// version, then fetches and validates every declared plugin. On any
    /// rejection the module's cleanup runs before the error is returned.
    pub fn from_loaded(
        module: LoadedModule,
        host_version: ModuleVersion,
    ) -> Result<Self, RegistryError> {
        let descriptor = match module.initialize() {
            Ok(d) => d,
            Err(e) => return Err(e.into()),
        };

        let result = Self::collect_dynamic(&module, &descriptor, host_version);
        match result {
            Ok(plugins) => Ok(Self {
                descriptor,
                plugins,
                live: Arc::new(AtomicUsize::new(0)),
                binary: ModuleBinary::Dynamic(module),
            }),
            Err(error) => {
                if let Err(e) = module.cleanup() {
                    warn!(
                        "Cleanup of rejected module '{}' failed: {}",
                        descriptor.key, e
                    );
                }
                Err(error)
            }
        }
    }

    /// Build a registry from a module linked into the host binary.
    pub fn from_static(
        module: StaticModule,
        host_version: ModuleVersion,
    ) -> Result<Self, RegistryError> {
        let StaticModule {
            descriptor,
            plugins,
        } = module;
        Self::check_module(&descriptor, host_version)?;

        let mut records = Vec::with_capacity(plugins.len());
        let mut seen = HashSet::new();
        for registration in plugins {
            records.push(Self::check_plugin(&descriptor, registration, &mut seen)?);
        }

        Ok(Self {
            descriptor,
            plugins: records,
            live: Arc::new(AtomicUsize::new(0)),
            binary: ModuleBinary::Static,
        })
    }

    fn collect_dynamic(
        module: &LoadedModule,
        descriptor: &ModuleDescriptor,
        host_version: ModuleVersion,
    ) -> Result<Vec<PluginRecord>, RegistryError> {
        Self::check_module(descriptor, host_version)?;

        let mut records = Vec::with_capacity(descriptor.plugin_count as usize);
        let mut seen = HashSet::new();
        for index in 0..descriptor.plugin_count {
            let registration =
                module
                    .plugin(index)?
                    .ok_or_else(|| RegistryError::MissingPlugin {
                        key: descriptor.key.clone(),
                        declared: descriptor.plugin_count,
                        index,
                    })?;
            records.push(Self::check_plugin(descriptor, registration, &mut seen)?);
        }
        Ok(records)
    }

    fn check_module(
        descriptor: &ModuleDescriptor,
        host_version: ModuleVersion,
    ) -> Result<(), RegistryError> {
        descriptor
            .validate()
            .map_err(|source| RegistryError::InvalidDescriptor {
                key: descriptor.key.clone(),
                source,
            })?;
        if !host_version.host_accepts(&descriptor.version) {
            return Err(RegistryError::IncompatibleModule {
                key: descriptor.key.clone(),
                module_version: descriptor.version,
                host_version,
            });
        }
        Ok(())
    }

    fn check_plugin(
        module: &ModuleDescriptor,
        registration: PluginRegistration,
        seen: &mut HashSet<Guid>,
    ) -> Result<PluginRecord, RegistryError> {
        registration
            .descriptor
            .validate()
            .map_err(|source| RegistryError::InvalidDescriptor {
                key: module.key.clone(),
                source,
            })?;
        if !seen.insert(registration.descriptor.id) {
            return Err(RegistryError::DuplicatePluginGuid(registration.descriptor.id));
        }
        debug!(
            "Registered plugin '{}' ({:?}) from module '{}'",
            registration.descriptor.key, registration.descriptor.capability, module.key
        );
        Ok(PluginRecord {
            descriptor: registration.descriptor,
            factory: registration.factory,
        })
    }

    pub fn descriptor(&self) -> &ModuleDescriptor {
        &self.descriptor
    }

    pub fn plugins(&self) -> &[PluginRecord] {
        &self.plugins
    }

    pub fn plugin_count(&self) -> u32 {
        self.plugins.len() as u32
    }

    pub fn plugin_at(&self, index: u32) -> Option<&PluginDescriptor> {
        self.plugins.get(index as usize).map(|r| &r.descriptor)
    }

    pub fn find(&self, plugin_id: Guid) -> Option<&PluginRecord> {
        self.plugins.iter().find(|r| r.descriptor.id == plugin_id)
    }

    /// Instances created from this registry that have not been disposed.
    pub fn live_instances(&self) -> usize {
        self.live.load(Ordering::Acquire)
    }

    /// Create a fresh, independent instance of one plugin type.
    pub fn instantiate(&self, plugin_id: Guid) -> Result<PluginHandle, RegistryError> {
        let record = self
            .find(plugin_id)
            .ok_or(RegistryError::UnknownPlugin(plugin_id))?;

        let object = (record.factory)();
        let actual = object.capability();
        if actual != record.descriptor.capability {
            return Err(RegistryError::CapabilityMismatch {
                key: record.descriptor.key.clone(),
                declared: record.descriptor.capability,
                actual,
            });
        }

        self.live.fetch_add(1, Ordering::AcqRel);
        Ok(PluginHandle {
            plugin_id,
            object,
            live: Arc::clone(&self.live),
        })
    }

    /// Tear the module down: the module's own cleanup, then the plugin
    /// records, then the library mapping. Refused while instances are live;
    /// on refusal or cleanup failure the registry is handed back intact, so
    /// the caller can keep serving it.
    pub fn shutdown(mut self) -> Result<(), (Self, RegistryError)> {
        let live = self.live_instances();
        if live > 0 {
            let key = self.descriptor.key.clone();
            return Err((self, RegistryError::ModuleBusy { key, live }));
        }

        if let ModuleBinary::Dynamic(module) = &self.binary {
            if let Err(e) = module.cleanup() {
                return Err((self, RegistryError::Load(e)));
            }
        }
        self.plugins.clear();
        Ok(())
    }
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("module", &self.descriptor.key)
            .field("plugins", &self.plugins.len())
            .field("live", &self.live_instances())
            .finish()
    }
}

/// An owned, move-only plugin instance.
///
/// Dropping the handle disconnects and destroys the instance and releases
/// its slot in the module's live count. [`dispose`](Self::dispose) makes
/// that explicit at call sites that want a visible end of life.
pub struct PluginHandle {
    plugin_id: Guid,
    object: PluginObject,
    live: Arc<AtomicUsize>,
}

impl PluginHandle {
    pub fn plugin_id(&self) -> Guid {
        self.plugin_id
    }

    pub fn object(&self) -> &PluginObject {
        &self.object
    }

    pub fn object_mut(&mut self) -> &mut PluginObject {
        &mut self.object
    }

    /// Disconnect and destroy the instance now.
    pub fn dispose(self) {}
}

impl Drop for PluginHandle {
    fn drop(&mut self) {
        // A frame producer's worker must have exited before teardown.
        if let PluginObject::VideoSource(source) = &mut self.object {
            source.stop();
        }
        self.object.base_mut().disconnect();
        self.live.fetch_sub(1, Ordering::AcqRel);
    }
}

impl std::fmt::Debug for PluginHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginHandle")
            .field("plugin_id", &self.plugin_id)
            .field("capability", &self.object.capability())
            .finish()
    }
}
