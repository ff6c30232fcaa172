use crate::capability::error::PluginError;
use crate::capability::property::PropertyBag;
use crate::capability::{Device, PluginInstance, PluginObject};
use crate::descriptor::{CapabilityKind, PropertyDescriptor};
use crate::variant::Variant;

/// A connect-required device with one live (dynamic) property.
struct MockCamera {
    connected: bool,
    properties: PropertyBag,
    exposure_reads: u32,
}

impl MockCamera {
    fn new() -> Self {
        Self {
            connected: false,
            properties: PropertyBag::from_descriptors(vec![
                PropertyDescriptor::new("exposure-us", "Exposure", Variant::U32(10_000))
                    .dynamic()
                    .read_only(),
                PropertyDescriptor::new("gain", "Gain", Variant::U8(1))
                    .with_range(Variant::U8(0), Variant::U8(48)),
            ]),
            exposure_reads: 0,
        }
    }

    fn ensure_connected(&self) -> Result<(), PluginError> {
        if self.connected {
            Ok(())
        } else {
            Err(PluginError::NotConnected)
        }
    }
}

impl PluginInstance for MockCamera {
    fn connect(&mut self) -> Result<(), PluginError> {
        self.connected = true;
        Ok(())
    }

    fn disconnect(&mut self) {
        self.connected = false;
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn requires_connection(&self) -> bool {
        true
    }

    fn get_property(&mut self, id: u32) -> Result<Variant, PluginError> {
        self.ensure_connected()?;
        if id == 0 {
            // Live value, re-read from the device on every call.
            self.exposure_reads += 1;
            self.properties
                .set_internal(0, Variant::U32(10_000 + self.exposure_reads))?;
        }
        self.properties.get(id)
    }

    fn set_property(&mut self, id: u32, value: Variant) -> Result<(), PluginError> {
        self.ensure_connected()?;
        self.properties.set(id, value)
    }

    fn get_indexed_property(&mut self, id: u32, index: u32) -> Result<Variant, PluginError> {
        self.ensure_connected()?;
        self.properties.get_indexed(id, index)
    }
}

impl Device for MockCamera {}

#[test]
fn disconnected_access_fails_before_id_checks() {
    let mut camera = MockCamera::new();
    // Even a wildly out-of-range id reports the connection problem first.
    assert!(matches!(
        camera.get_property(999),
        Err(PluginError::NotConnected)
    ));
    assert!(matches!(
        camera.set_property(999, Variant::U8(0)),
        Err(PluginError::NotConnected)
    ));
}

#[test]
fn connect_then_access_then_disconnect() {
    let mut camera = MockCamera::new();
    camera.connect().unwrap();
    assert!(camera.is_connected());

    assert!(matches!(
        camera.get_property(999),
        Err(PluginError::InvalidProperty(999))
    ));
    camera.set_property(1, Variant::U8(12)).unwrap();
    assert_eq!(camera.get_property(1).unwrap(), Variant::U8(12));

    camera.disconnect();
    assert!(matches!(
        camera.get_property(1),
        Err(PluginError::NotConnected)
    ));
}

#[test]
fn dynamic_reads_are_always_fresh() {
    let mut camera = MockCamera::new();
    camera.connect().unwrap();

    let first = camera.get_property(0).unwrap();
    let second = camera.get_property(0).unwrap();
    // Two reads hit the device twice and can observe different values.
    assert_ne!(first, second);
}

#[test]
fn disconnect_is_idempotent() {
    let mut camera = MockCamera::new();
    camera.connect().unwrap();
    camera.disconnect();
    camera.disconnect();
    assert!(!camera.is_connected());
}

#[test]
fn plugin_object_reports_its_capability() {
    let object = PluginObject::Device(Box::new(MockCamera::new()));
    assert_eq!(object.capability(), CapabilityKind::Device);
}

#[test]
fn base_contract_is_reachable_for_any_capability() {
    let mut object = PluginObject::Device(Box::new(MockCamera::new()));
    object.base_mut().connect().unwrap();
    assert!(object.base().is_connected());
    assert!(object.base().requires_connection());

    let gain = object.base_mut().get_property(1).unwrap();
    assert_eq!(gain, Variant::U8(1));
}
