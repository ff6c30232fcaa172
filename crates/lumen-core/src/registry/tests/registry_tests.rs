use crate::abi::{PluginRegistration, StaticModule};
use crate::capability::error::PluginError;
use crate::capability::property::PropertyBag;
use crate::capability::{Image, ImageFilter, PixelFormat, PluginInstance, PluginObject};
use crate::descriptor::{
    CapabilityKind, Guid, ModuleDescriptor, ModuleVersion, PluginDescriptor, PropertyDescriptor,
};
use crate::registry::{PluginRegistry, RegistryError};
use crate::variant::Variant;

const MODULE_ID: Guid = Guid::new(0x11111111, 0x22222222, 0x33333333, 0x44444444);
const INVERT_ID: Guid = Guid::new(0xAAAAAAAA, 0xBBBBBBBB, 0xCCCCCCCC, 0xDDDDDDDD);
const OTHER_ID: Guid = Guid::new(0x01020304, 0x05060708, 0x090A0B0C, 0x0D0E0F10);

const HOST_VERSION: ModuleVersion = ModuleVersion::new(1, 0, 0);

struct InvertFilter {
    properties: PropertyBag,
    translations: Vec<(PixelFormat, PixelFormat)>,
}

impl InvertFilter {
    fn new() -> Self {
        Self {
            properties: PropertyBag::from_descriptors(vec![PropertyDescriptor::new(
                "strength",
                "Strength",
                Variant::U8(255),
            )]),
            translations: vec![(PixelFormat::Gray8, PixelFormat::Gray8)],
        }
    }
}

impl PluginInstance for InvertFilter {
    fn get_property(&mut self, id: u32) -> Result<Variant, PluginError> {
        self.properties.get(id)
    }

    fn set_property(&mut self, id: u32, value: Variant) -> Result<(), PluginError> {
        self.properties.set(id, value)
    }

    fn get_indexed_property(&mut self, id: u32, index: u32) -> Result<Variant, PluginError> {
        self.properties.get_indexed(id, index)
    }
}

impl ImageFilter for InvertFilter {
    fn pixel_format_translations(&self) -> &[(PixelFormat, PixelFormat)] {
        &self.translations
    }

    fn process(&mut self, input: &Image) -> Result<Image, PluginError> {
        let mut data = input.data().to_vec();
        for byte in &mut data {
            *byte = 255 - *byte;
        }
        Image::from_raw(input.width(), input.height(), input.format(), data)
    }
}

fn invert_factory() -> PluginObject {
    PluginObject::Filter(Box::new(InvertFilter::new()))
}

fn invert_descriptor(id: Guid) -> PluginDescriptor {
    PluginDescriptor::builder(id, CapabilityKind::ImageFilter)
        .names("invert", "Invert")
        .summary("Inverts pixel intensities")
        .property(PropertyDescriptor::new(
            "strength",
            "Strength",
            Variant::U8(255),
        ))
        .build()
        .unwrap()
}

fn test_module(version: ModuleVersion) -> StaticModule {
    StaticModule {
        descriptor: ModuleDescriptor::new(MODULE_ID, version, "test-effects", "Test Effects")
            .with_plugin_count(1),
        plugins: vec![PluginRegistration::new(
            invert_descriptor(INVERT_ID),
            invert_factory,
        )],
    }
}

#[test]
fn static_module_registers_its_plugins() {
    let registry = PluginRegistry::from_static(test_module(HOST_VERSION), HOST_VERSION).unwrap();

    assert_eq!(registry.plugin_count(), 1);
    assert_eq!(registry.descriptor().key, "test-effects");
    assert!(registry.find(INVERT_ID).is_some());
    assert!(registry.find(OTHER_ID).is_none());
    assert_eq!(registry.plugin_at(0).unwrap().key, "invert");
    assert!(registry.plugin_at(1).is_none());
}

#[test]
fn duplicate_plugin_ids_are_rejected() {
    let mut module = test_module(HOST_VERSION);
    module.plugins.push(PluginRegistration::new(
        invert_descriptor(INVERT_ID),
        invert_factory,
    ));

    let result = PluginRegistry::from_static(module, HOST_VERSION);
    assert!(matches!(
        result,
        Err(RegistryError::DuplicatePluginGuid(id)) if id == INVERT_ID
    ));
}

#[test]
fn newer_major_module_is_refused() {
    let module = test_module(ModuleVersion::new(2, 0, 0));
    let result = PluginRegistry::from_static(module, HOST_VERSION);
    assert!(matches!(
        result,
        Err(RegistryError::IncompatibleModule { .. })
    ));
}

#[test]
fn older_major_module_is_accepted() {
    let module = test_module(ModuleVersion::new(1, 9, 3));
    let host = ModuleVersion::new(2, 0, 0);
    assert!(PluginRegistry::from_static(module, host).is_ok());
}

#[test]
fn instantiate_unknown_plugin_fails() {
    let registry = PluginRegistry::from_static(test_module(HOST_VERSION), HOST_VERSION).unwrap();
    assert!(matches!(
        registry.instantiate(OTHER_ID),
        Err(RegistryError::UnknownPlugin(id)) if id == OTHER_ID
    ));
}

#[test]
fn instances_are_tracked_until_disposed() {
    let registry = PluginRegistry::from_static(test_module(HOST_VERSION), HOST_VERSION).unwrap();
    assert_eq!(registry.live_instances(), 0);

    let first = registry.instantiate(INVERT_ID).unwrap();
    let second = registry.instantiate(INVERT_ID).unwrap();
    assert_eq!(registry.live_instances(), 2);

    drop(first);
    assert_eq!(registry.live_instances(), 1);
    second.dispose();
    assert_eq!(registry.live_instances(), 0);
}

#[test]
fn instances_do_not_share_state() {
    let registry = PluginRegistry::from_static(test_module(HOST_VERSION), HOST_VERSION).unwrap();

    let mut first = registry.instantiate(INVERT_ID).unwrap();
    let mut second = registry.instantiate(INVERT_ID).unwrap();

    first
        .object_mut()
        .base_mut()
        .set_property(0, Variant::U8(7))
        .unwrap();

    assert_eq!(
        first.object_mut().base_mut().get_property(0).unwrap(),
        Variant::U8(7)
    );
    assert_eq!(
        second.object_mut().base_mut().get_property(0).unwrap(),
        Variant::U8(255)
    );
}

#[test]
fn declared_capability_must_match_the_factory() {
    let module = StaticModule {
        descriptor: ModuleDescriptor::new(MODULE_ID, HOST_VERSION, "test-effects", "Test Effects")
            .with_plugin_count(1),
        plugins: vec![PluginRegistration::new(
            PluginDescriptor::builder(INVERT_ID, CapabilityKind::Device)
                .names("invert", "Invert")
                .build()
                .unwrap(),
            invert_factory,
        )],
    };
    let registry = PluginRegistry::from_static(module, HOST_VERSION).unwrap();

    let result = registry.instantiate(INVERT_ID);
    assert!(matches!(
        result,
        Err(RegistryError::CapabilityMismatch {
            declared: CapabilityKind::Device,
            actual: CapabilityKind::ImageFilter,
            ..
        })
    ));
    // The failed attempt must not leak a live slot.
    assert_eq!(registry.live_instances(), 0);
}

#[test]
fn shutdown_refused_while_instances_live() {
    let registry = PluginRegistry::from_static(test_module(HOST_VERSION), HOST_VERSION).unwrap();
    let handle = registry.instantiate(INVERT_ID).unwrap();

    let (registry, error) = registry.shutdown().unwrap_err();
    assert!(matches!(error, RegistryError::ModuleBusy { live: 1, .. }));

    // The handed-back registry is intact and keeps serving.
    assert_eq!(registry.plugin_count(), 1);
    assert!(registry.find(INVERT_ID).is_some());
    let second = registry.instantiate(INVERT_ID).unwrap();
    second.dispose();

    handle.dispose();
    registry.shutdown().unwrap();
}

#[test]
fn filter_instances_process_images() {
    let registry = PluginRegistry::from_static(test_module(HOST_VERSION), HOST_VERSION).unwrap();
    let mut handle = registry.instantiate(INVERT_ID).unwrap();

    let input = Image::from_raw(2, 1, PixelFormat::Gray8, vec![0, 200]).unwrap();
    let output = match handle.object_mut() {
        PluginObject::Filter(filter) => filter.process(&input).unwrap(),
        other => panic!("expected a filter, got {other:?}"),
    };
    assert_eq!(output.data(), &[255, 55]);
}
