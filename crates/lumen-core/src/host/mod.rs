//! The plugin host.
//!
//! [`PluginHost`] owns every loaded module registry and a flat catalogue
//! mapping plugin ids to the module that provides them. Discovery walks the
//! configured directories asynchronously; a module that fails to load is
//! logged and skipped, never fatal to the application.
pub mod config;
pub mod error;

pub use config::HostConfig;
pub use error::HostError;

use std::collections::HashMap;
use std::path::Path;

use log::{info, warn};

use crate::abi::StaticModule;
use crate::capability::{Image, PluginObject};
use crate::descriptor::{CapabilityKind, Guid, ModuleVersion, PluginDescriptor};
use crate::loader::{is_module_file, LoadedModule};
use crate::registry::{PluginHandle, PluginRegistry, RegistryError};


/// Owns all module registries and routes plugin-level requests to the
/// module that provides the plugin.
pub struct PluginHost {
    host_version: ModuleVersion,
    config: HostConfig,
    modules: HashMap<Guid, PluginRegistry>,
    /// plugin id to providing module id.
    catalogue: HashMap<Guid, Guid>,
}

impl PluginHost {
    pub fn new(host_version: ModuleVersion, config: HostConfig) -> Self {
        Self {
            host_version,
            config,
            modules: HashMap::new(),
            catalogue: HashMap::new(),
        }
    }

    pub fn host_version(&self) -> ModuleVersion {
        self.host_version
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// Register a module compiled into the host binary.
    pub fn register_static(&mut self, module: StaticModule) -> Result<Guid, HostError> {
        let registry = PluginRegistry::from_static(module, self.host_version)?;
        self.adopt(registry)
    }

    /// Load one module binary from disk, bypassing the disabled list.
    pub fn load_module(&mut self, path: &Path) -> Result<Guid, HostError> {
        let module = LoadedModule::load(path)?;
        let registry = PluginRegistry::from_loaded(module, self.host_version)?;
        self.adopt(registry)
    }

    /// Scan every configured directory and load what qualifies.
    ///
    /// Returns how many modules were loaded. Unreadable directories,
    /// disabled stems, rejected modules and duplicate ids are logged and
    /// skipped; the first provider of an id wins.
    pub async fn load_all(&mut self) -> usize {
        let dirs = self.config.module_dirs.clone();
        let mut loaded = 0;
        for dir in dirs {
            let mut entries = match tokio::fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) => {
                    warn!("Skipping module directory {:?}: {}", dir, e);
                    continue;
                }
            };
            loop {
                let entry = match entries.next_entry().await {
                    Ok(Some(entry)) => entry,
                    Ok(None) => break,
                    Err(e) => {
                        warn!("Error reading module directory {:?}: {}", dir, e);
                        break;
                    }
                };
                let path = entry.path();
                if !is_module_file(&path) {
                    continue;
                }
                if self.is_disabled(&path) {
                    info!("Skipping disabled module {:?}", path);
                    continue;
                }
                match self.load_module(&path) {
                    Ok(id) => {
                        info!("Loaded module {} from {:?}", id, path);
                        loaded += 1;
                    }
                    Err(e) => warn!("Skipping module {:?}: {}", path, e),
                }
            }
        }
        loaded
    }

    fn is_disabled(&self, path: &Path) -> bool {
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            return false;
        };
        let stem = stem
            .strip_prefix(std::env::consts::DLL_PREFIX)
            .unwrap_or(stem);
        self.config.disabled_modules.iter().any(|d| d == stem)
    }

    fn adopt(&mut self, registry: PluginRegistry) -> Result<Guid, HostError> {
        let module_id = registry.descriptor().id;
        let conflict = if self.modules.contains_key(&module_id) {
            Some(HostError::DuplicateModule(module_id))
        } else {
            registry.plugins().iter().find_map(|record| {
                self.catalogue
                    .get(&record.descriptor().id)
                    .map(|provider| HostError::DuplicatePlugin {
                        plugin: record.descriptor().id,
                        module: *provider,
                    })
            })
        };
        if let Some(error) = conflict {
            // A rejected module still gets its cleanup before the library
            // drops. No instances exist yet, so shutdown cannot be busy.
            if let Err((_, e)) = registry.shutdown() {
                warn!("Cleanup of rejected module {} failed: {}", module_id, e);
            }
            return Err(error);
        }
        for record in registry.plugins() {
            self.catalogue.insert(record.descriptor().id, module_id);
        }
        self.modules.insert(module_id, registry);
        Ok(module_id)
    }

    pub fn modules(&self) -> impl Iterator<Item = &PluginRegistry> {
        self.modules.values()
    }

    pub fn module(&self, module_id: Guid) -> Option<&PluginRegistry> {
        self.modules.get(&module_id)
    }

    /// Every registered plugin descriptor across all modules.
    pub fn plugins(&self) -> impl Iterator<Item = &PluginDescriptor> {
        self.modules
            .values()
            .flat_map(|r| r.plugins().iter().map(|p| p.descriptor()))
    }

    pub fn plugin_descriptor(&self, plugin_id: Guid) -> Option<&PluginDescriptor> {
        let module_id = self.catalogue.get(&plugin_id)?;
        self.modules.get(module_id)?.find(plugin_id).map(|r| r.descriptor())
    }

    /// Create a fresh instance of the plugin, wherever it lives.
    pub fn instantiate(&self, plugin_id: Guid) -> Result<PluginHandle, HostError> {
        let module_id = self
            .catalogue
            .get(&plugin_id)
            .ok_or(HostError::UnknownPlugin(plugin_id))?;
        let registry = self
            .modules
            .get(module_id)
            .ok_or(HostError::UnknownModule(*module_id))?;
        Ok(registry.instantiate(plugin_id)?)
    }

    /// Unload one module. Refused while any of its instances is live.
    pub fn unload_module(&mut self, module_id: Guid) -> Result<(), HostError> {
        let registry = self
            .modules
            .remove(&module_id)
            .ok_or(HostError::UnknownModule(module_id))?;
        match registry.shutdown() {
            Ok(()) => {
                self.catalogue.retain(|_, provider| *provider != module_id);
                info!("Unloaded module {}", module_id);
                Ok(())
            }
            Err((registry, error)) => {
                self.modules.insert(module_id, registry);
                Err(error.into())
            }
        }
    }

    /// Tear down every module. Callers must have disposed all handles; a
    /// still-busy module is leaked rather than unmapped under live code and
    /// reported in the error.
    pub fn shutdown(mut self) -> Result<(), HostError> {
        let mut failures = Vec::new();
        for (module_id, registry) in self.modules.drain() {
            match registry.shutdown() {
                Ok(()) => {}
                Err((registry, RegistryError::ModuleBusy { key, live })) => {
                    warn!(
                        "Module '{}' still has {} live instance(s) at shutdown",
                        key, live
                    );
                    std::mem::forget(registry);
                    failures.push(format!("{module_id}: {live} live instance(s)"));
                }
                Err((_, error)) => failures.push(format!("{module_id}: {error}")),
            }
        }
        if failures.is_empty() {
            Ok(())
        } else {
            Err(HostError::Shutdown { failures })
        }
    }

    /// Import an image through the given importer plugin.
    ///
    /// The file extension is checked against the importer's registered
    /// extensions first; `import` is never reached for a file type the
    /// plugin did not declare.
    pub fn import_image(&self, plugin_id: Guid, path: &Path) -> Result<Image, HostError> {
        let descriptor = self
            .plugin_descriptor(plugin_id)
            .ok_or(HostError::UnknownPlugin(plugin_id))?;
        if descriptor.capability != CapabilityKind::ImageImporter {
            return Err(HostError::WrongCapability {
                key: descriptor.key.clone(),
                expected: CapabilityKind::ImageImporter,
                actual: descriptor.capability,
            });
        }

        let mut handle = self.instantiate(plugin_id)?;
        let PluginObject::Importer(importer) = handle.object_mut() else {
            // The registry verified the capability at instantiation.
            return Err(HostError::UnknownPlugin(plugin_id));
        };

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        if !importer.supported_extensions().iter().any(|e| *e == extension) {
            return Err(HostError::UnsupportedExtension {
                key: descriptor.key.clone(),
                extension,
            });
        }

        Ok(importer.import(path)?)
    }
}

impl std::fmt::Debug for PluginHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginHost")
            .field("host_version", &self.host_version)
            .field("modules", &self.modules.len())
            .field("plugins", &self.catalogue.len())
            .finish()
    }
}
