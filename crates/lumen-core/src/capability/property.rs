//! Shared property storage for plugin instances.
//!
//! Descriptors are the immutable template registered once per plugin type;
//! every instance owns its own [`PropertyBag`] so two instances never alias
//! the same mutable slot.
use std::sync::Arc;

use crate::capability::error::PluginError;
use crate::descriptor::PropertyDescriptor;
use crate::variant::Variant;

/// Per-instance property values backed by a shared descriptor template.
///
/// Implements steps 2–4 of the uniform access policy (id range, read-only,
/// value validation). The connection check is the instance's job and must
/// come first.
#[derive(Debug, Clone)]
pub struct PropertyBag {
    descriptors: Arc<[PropertyDescriptor]>,
    values: Vec<Variant>,
}

impl PropertyBag {
    /// Build value storage seeded from the template's defaults.
    pub fn new(descriptors: Arc<[PropertyDescriptor]>) -> Self {
        let values = descriptors.iter().map(|d| d.default.clone()).collect();
        Self {
            descriptors,
            values,
        }
    }

    /// Convenience constructor for plugins that build their template inline.
    pub fn from_descriptors(descriptors: Vec<PropertyDescriptor>) -> Self {
        Self::new(Arc::from(descriptors))
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn descriptors(&self) -> &[PropertyDescriptor] {
        &self.descriptors
    }

    pub fn descriptor(&self, id: u32) -> Result<&PropertyDescriptor, PluginError> {
        self.descriptors
            .get(id as usize)
            .ok_or(PluginError::InvalidProperty(id))
    }

    /// Read the stored value.
    pub fn get(&self, id: u32) -> Result<Variant, PluginError> {
        self.descriptor(id)?;
        Ok(self.values[id as usize].clone())
    }

    /// Write a value, enforcing read-only, kind and range. On any failure
    /// the previously stored value is left untouched.
    pub fn set(&mut self, id: u32, value: Variant) -> Result<(), PluginError> {
        let descriptor = self.descriptor(id)?;
        if descriptor.read_only {
            return Err(PluginError::ReadOnlyProperty(id));
        }
        Self::validate(descriptor, id, &value)?;
        self.values[id as usize] = value;
        Ok(())
    }

    /// Write a value from inside the plugin itself (dynamic refresh,
    /// read-only status updates). Skips the read-only check but still
    /// validates kind and range.
    pub fn set_internal(&mut self, id: u32, value: Variant) -> Result<(), PluginError> {
        let descriptor = self.descriptor(id)?;
        Self::validate(descriptor, id, &value)?;
        self.values[id as usize] = value;
        Ok(())
    }

    /// Read one element of an array-valued property.
    pub fn get_indexed(&self, id: u32, index: u32) -> Result<Variant, PluginError> {
        self.descriptor(id)?;
        match &self.values[id as usize] {
            Variant::Array(items) => items
                .get(index as usize)
                .cloned()
                .ok_or(PluginError::InvalidPropertyIndex { id, index }),
            _ => Err(PluginError::InvalidPropertyIndex { id, index }),
        }
    }

    fn validate(
        descriptor: &PropertyDescriptor,
        id: u32,
        value: &Variant,
    ) -> Result<(), PluginError> {
        if value.kind() != descriptor.kind {
            return Err(PluginError::InvalidPropertyValue {
                id,
                key: descriptor.key.clone(),
                reason: format!(
                    "expected kind {:?}, found {:?}",
                    descriptor.kind,
                    value.kind()
                ),
            });
        }
        if !value.in_range(descriptor.min.as_ref(), descriptor.max.as_ref()) {
            return Err(PluginError::InvalidPropertyValue {
                id,
                key: descriptor.key.clone(),
                reason: format!("{:?} lies outside the declared [min, max]", value),
            });
        }
        Ok(())
    }
}
