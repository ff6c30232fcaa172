use crate::descriptor::error::DescriptorError;
use crate::descriptor::property::{EditorHint, PropertyDescriptor};
use crate::descriptor::{CapabilityKind, Guid, ModuleVersion, PluginDescriptor};
use crate::variant::{Variant, VariantKind};

fn radius() -> PropertyDescriptor {
    PropertyDescriptor::new("radius", "Radius", Variant::U8(3))
        .with_range(Variant::U8(0), Variant::U8(100))
        .with_editor(EditorHint::Slider)
}

#[test]
fn default_must_lie_within_bounds() {
    assert!(radius().validate().is_ok());

    let bad = PropertyDescriptor::new("radius", "Radius", Variant::U8(150))
        .with_range(Variant::U8(0), Variant::U8(100));
    assert_eq!(
        bad.validate(),
        Err(DescriptorError::DefaultOutOfRange {
            key: "radius".to_string()
        })
    );
}

#[test]
fn bounds_require_an_ordered_kind() {
    let bad = PropertyDescriptor::new("label", "Label", Variant::Str("x".into()))
        .with_min(Variant::Str("a".into()));
    assert_eq!(
        bad.validate(),
        Err(DescriptorError::UnorderedRange {
            key: "label".to_string(),
            kind: VariantKind::Str,
        })
    );
}

#[test]
fn bounds_must_match_the_property_kind() {
    let bad = PropertyDescriptor::new("radius", "Radius", Variant::U8(3))
        .with_range(Variant::I32(0), Variant::I32(100));
    assert!(matches!(
        bad.validate(),
        Err(DescriptorError::KindMismatch { .. })
    ));
}

#[test]
fn accepts_checks_kind_and_range() {
    let desc = radius();
    assert!(desc.accepts(&Variant::U8(50)));
    assert!(!desc.accepts(&Variant::U8(150)));
    assert!(!desc.accepts(&Variant::I32(50)));
}

#[test]
fn plugin_descriptor_rejects_duplicate_keys() {
    let result = PluginDescriptor::builder(Guid::new(1, 2, 3, 4), CapabilityKind::ImageFilter)
        .names("blur", "Blur")
        .version(ModuleVersion::new(1, 0, 0))
        .property(radius())
        .property(radius())
        .build();
    assert_eq!(
        result.err(),
        Some(DescriptorError::DuplicatePropertyKey("radius".to_string()))
    );
}

#[test]
fn plugin_descriptor_rejects_nil_guid() {
    let result = PluginDescriptor::builder(Guid::nil(), CapabilityKind::Device)
        .names("dev", "Device")
        .build();
    assert!(matches!(result, Err(DescriptorError::NilGuid { .. })));
}

#[test]
fn property_ids_follow_declaration_order() {
    let desc = PluginDescriptor::builder(Guid::new(1, 2, 3, 4), CapabilityKind::ImageFilter)
        .names("blur", "Blur")
        .property(radius())
        .property(PropertyDescriptor::new(
            "strength",
            "Strength",
            Variant::F32(1.0),
        ))
        .build()
        .unwrap();
    assert_eq!(desc.property_id("radius"), Some(0));
    assert_eq!(desc.property_id("strength"), Some(1));
    assert_eq!(desc.property_id("missing"), None);
}
