//! # Lumen Core Descriptor Model
//!
//! Immutable metadata describing loadable modules and the plugins they
//! contain. Descriptors are created when a module is loaded, owned by the
//! registry for the lifetime of the module, and never mutated afterwards.
//!
//! Identity is carried exclusively by [`Guid`]s: display text and
//! programmatic keys may change between versions, GUIDs never do.
pub mod error;
pub mod guid;
pub mod property;
pub mod version;

pub use error::DescriptorError;
pub use guid::Guid;
pub use property::{EditorHint, PropertyDescriptor};
pub use version::{ModuleVersion, VersionError};

use serde::{Deserialize, Serialize};

#[cfg(test)]
mod tests;

/// The interface family a plugin implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CapabilityKind {
    ImageImporter,
    ImageExporter,
    ImageFilter,
    TwoImageFilter,
    Device,
    VideoSource,
    VideoProcessor,
    ScriptEngine,
}

/// Flags for the optional lifecycle hooks a plugin implements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleHooks {
    /// Plugin wants a one-time initializer after construction.
    pub initializer: bool,
    /// Plugin wants an explicit cleanup call before disposal.
    pub cleanup: bool,
    /// Plugin re-evaluates dynamic properties on every read.
    pub dynamic_properties: bool,
}

/// Immutable metadata describing one plugin within a module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginDescriptor {
    /// Stable identity; never reused, never derived from display text.
    pub id: Guid,
    /// Secondary GUID grouping related plugins for UI categorization.
    pub family: Guid,
    pub capability: CapabilityKind,
    pub version: ModuleVersion,
    /// Human-readable short name.
    pub short_name: String,
    /// Programmatic name, stable across locales.
    pub key: String,
    /// One-line description.
    pub summary: String,
    /// Long, possibly rich-text description. May cross-reference other
    /// plugins by their GUID in `{AAAAAAAA-BBBBBBBB-CCCCCCCC-DDDDDDDD}` form.
    pub description: String,
    /// Optional icon resource reference.
    pub icon: Option<String>,
    /// Ordered property template, cloned per instance.
    pub properties: Vec<PropertyDescriptor>,
    pub hooks: LifecycleHooks,
}

impl PluginDescriptor {
    /// Start building a descriptor for the given identity and capability.
    pub fn builder(id: Guid, capability: CapabilityKind) -> PluginDescriptorBuilder {
        PluginDescriptorBuilder {
            descriptor: PluginDescriptor {
                id,
                family: Guid::nil(),
                capability,
                version: ModuleVersion::new(1, 0, 0),
                short_name: String::new(),
                key: String::new(),
                summary: String::new(),
                description: String::new(),
                icon: None,
                properties: Vec::new(),
                hooks: LifecycleHooks::default(),
            },
        }
    }

    /// Validate the descriptor and all of its property templates.
    pub fn validate(&self) -> Result<(), DescriptorError> {
        if self.id.is_nil() {
            return Err(DescriptorError::NilGuid {
                what: "plugin id".to_string(),
            });
        }
        if self.key.is_empty() {
            return Err(DescriptorError::EmptyKey);
        }
        for property in &self.properties {
            property.validate()?;
        }
        for (i, property) in self.properties.iter().enumerate() {
            if self.properties[..i].iter().any(|p| p.key == property.key) {
                return Err(DescriptorError::DuplicatePropertyKey(property.key.clone()));
            }
        }
        Ok(())
    }

    /// Look up a property id by its programmatic key.
    pub fn property_id(&self, key: &str) -> Option<u32> {
        self.properties.iter().position(|p| p.key == key).map(|i| i as u32)
    }
}

/// Builder for [`PluginDescriptor`], mirroring the chained-setter style used
/// throughout the descriptor model.
pub struct PluginDescriptorBuilder {
    descriptor: PluginDescriptor,
}

impl PluginDescriptorBuilder {
    pub fn family(mut self, family: Guid) -> Self {
        self.descriptor.family = family;
        self
    }

    pub fn version(mut self, version: ModuleVersion) -> Self {
        self.descriptor.version = version;
        self
    }

    pub fn names(mut self, key: &str, short_name: &str) -> Self {
        self.descriptor.key = key.to_string();
        self.descriptor.short_name = short_name.to_string();
        self
    }

    pub fn summary(mut self, summary: &str) -> Self {
        self.descriptor.summary = summary.to_string();
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.descriptor.description = description.to_string();
        self
    }

    pub fn icon(mut self, icon: &str) -> Self {
        self.descriptor.icon = Some(icon.to_string());
        self
    }

    pub fn property(mut self, property: PropertyDescriptor) -> Self {
        self.descriptor.properties.push(property);
        self
    }

    pub fn hooks(mut self, hooks: LifecycleHooks) -> Self {
        self.descriptor.hooks = hooks;
        self
    }

    /// Finish, validating the result.
    pub fn build(self) -> Result<PluginDescriptor, DescriptorError> {
        self.descriptor.validate()?;
        Ok(self.descriptor)
    }
}

/// Immutable metadata describing one loadable module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleDescriptor {
    pub id: Guid,
    pub version: ModuleVersion,
    pub name: String,
    pub key: String,
    pub description: String,
    pub vendor: String,
    pub copyright: String,
    pub url: Option<String>,
    pub icon: Option<String>,
    /// Number of plugins the module exposes; the registry queries indices
    /// `[0, plugin_count)`.
    pub plugin_count: u32,
}

impl ModuleDescriptor {
    pub fn new(id: Guid, version: ModuleVersion, key: &str, name: &str) -> Self {
        Self {
            id,
            version,
            name: name.to_string(),
            key: key.to_string(),
            description: String::new(),
            vendor: String::new(),
            copyright: String::new(),
            url: None,
            icon: None,
            plugin_count: 0,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_vendor(mut self, vendor: &str, copyright: &str) -> Self {
        self.vendor = vendor.to_string();
        self.copyright = copyright.to_string();
        self
    }

    pub fn with_url(mut self, url: &str) -> Self {
        self.url = Some(url.to_string());
        self
    }

    pub fn with_plugin_count(mut self, count: u32) -> Self {
        self.plugin_count = count;
        self
    }

    pub fn validate(&self) -> Result<(), DescriptorError> {
        if self.id.is_nil() {
            return Err(DescriptorError::NilGuid {
                what: "module id".to_string(),
            });
        }
        if self.key.is_empty() {
            return Err(DescriptorError::EmptyKey);
        }
        Ok(())
    }
}
