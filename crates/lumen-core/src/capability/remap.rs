//! Property-id remapping for composed plugins.
//!
//! A plugin built by wrapping another plugin internally must present a
//! single flat id space to callers. Instead of a hidden constant offset,
//! composition goes through this explicit adapter: the wrapper declares the
//! delegated window in its own descriptor and routes the window's ids here.
use crate::capability::error::PluginError;
use crate::capability::PluginInstance;
use crate::variant::Variant;

/// Exposes an inner instance's property ids `[0, count)` as the outer ids
/// `[offset, offset + count)`.
///
/// Errors coming back from the inner instance are rewritten into the outer
/// id space, so callers never observe the internal numbering.
pub struct PropertyIdRemap {
    inner: Box<dyn PluginInstance>,
    offset: u32,
    count: u32,
}

impl PropertyIdRemap {
    pub fn new(inner: Box<dyn PluginInstance>, offset: u32, count: u32) -> Self {
        Self {
            inner,
            offset,
            count,
        }
    }

    /// Whether an outer id falls inside the delegated window.
    pub fn contains(&self, id: u32) -> bool {
        id >= self.offset && id - self.offset < self.count
    }

    pub fn inner(&self) -> &dyn PluginInstance {
        self.inner.as_ref()
    }

    pub fn inner_mut(&mut self) -> &mut dyn PluginInstance {
        self.inner.as_mut()
    }

    fn inner_id(&self, id: u32) -> Result<u32, PluginError> {
        if self.contains(id) {
            Ok(id - self.offset)
        } else {
            Err(PluginError::InvalidProperty(id))
        }
    }

    /// Translate inner-id errors back into the caller's id space.
    fn remap_error(&self, error: PluginError) -> PluginError {
        match error {
            PluginError::InvalidProperty(inner) => {
                PluginError::InvalidProperty(inner + self.offset)
            }
            PluginError::ReadOnlyProperty(inner) => {
                PluginError::ReadOnlyProperty(inner + self.offset)
            }
            PluginError::InvalidPropertyValue { id, key, reason } => {
                PluginError::InvalidPropertyValue {
                    id: id + self.offset,
                    key,
                    reason,
                }
            }
            PluginError::InvalidPropertyIndex { id, index } => PluginError::InvalidPropertyIndex {
                id: id + self.offset,
                index,
            },
            other => other,
        }
    }
}

impl PluginInstance for PropertyIdRemap {
    fn connect(&mut self) -> Result<(), PluginError> {
        self.inner.connect()
    }

    fn disconnect(&mut self) {
        self.inner.disconnect();
    }

    fn is_connected(&self) -> bool {
        self.inner.is_connected()
    }

    fn requires_connection(&self) -> bool {
        self.inner.requires_connection()
    }

    fn get_property(&mut self, id: u32) -> Result<Variant, PluginError> {
        let inner_id = self.inner_id(id)?;
        self.inner
            .get_property(inner_id)
            .map_err(|e| self.remap_error(e))
    }

    fn set_property(&mut self, id: u32, value: Variant) -> Result<(), PluginError> {
        let inner_id = self.inner_id(id)?;
        self.inner
            .set_property(inner_id, value)
            .map_err(|e| self.remap_error(e))
    }

    fn get_indexed_property(&mut self, id: u32, index: u32) -> Result<Variant, PluginError> {
        let inner_id = self.inner_id(id)?;
        self.inner
            .get_indexed_property(inner_id, index)
            .map_err(|e| self.remap_error(e))
    }
}
