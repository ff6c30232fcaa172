//! Brightness adjustment filter.
use lumen_core::capability::error::PluginError;
use lumen_core::capability::property::PropertyBag;
use lumen_core::capability::{Image, ImageFilter, PixelFormat, PluginInstance};
use lumen_core::descriptor::{CapabilityKind, EditorHint, PluginDescriptor, PropertyDescriptor};
use lumen_core::variant::Variant;

use crate::BRIGHTNESS_ID;

const AMOUNT: u32 = 0;

const TRANSLATIONS: &[(PixelFormat, PixelFormat)] = &[
    (PixelFormat::Gray8, PixelFormat::Gray8),
    (PixelFormat::Rgb24, PixelFormat::Rgb24),
    (PixelFormat::Rgba32, PixelFormat::Rgba32),
];

pub fn descriptor() -> PluginDescriptor {
    PluginDescriptor::builder(BRIGHTNESS_ID, CapabilityKind::ImageFilter)
        .names("brightness", "Brightness")
        .summary("Adds a constant offset to every pixel channel")
        .property(
            PropertyDescriptor::new("amount", "Amount", Variant::I32(0))
                .with_help("Offset added to each channel, clamped to the channel range")
                .with_range(Variant::I32(-255), Variant::I32(255))
                .with_editor(EditorHint::Slider),
        )
        .build()
        .expect("brightness descriptor is valid")
}

pub struct BrightnessFilter {
    properties: PropertyBag,
}

impl BrightnessFilter {
    pub fn new() -> Self {
        Self {
            properties: PropertyBag::from_descriptors(descriptor().properties),
        }
    }

    fn amount(&self) -> i32 {
        match self.properties.get(AMOUNT) {
            Ok(Variant::I32(v)) => v,
            _ => 0,
        }
    }

    fn adjust(data: &mut [u8], format: PixelFormat, amount: i32) {
        let alpha_stride = match format {
            PixelFormat::Rgba32 => Some(4),
            _ => None,
        };
        for (i, byte) in data.iter_mut().enumerate() {
            // Alpha carries no brightness.
            if alpha_stride.is_some_and(|s| i % s == s - 1) {
                continue;
            }
            *byte = (*byte as i32 + amount).clamp(0, 255) as u8;
        }
    }
}

impl Default for BrightnessFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl PluginInstance for BrightnessFilter {
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

impl ImageFilter for BrightnessFilter {
    fn pixel_format_translations(&self) -> &[(PixelFormat, PixelFormat)] {
        TRANSLATIONS
    }

    fn can_process_in_place(&self) -> bool {
        true
    }

    fn process(&mut self, input: &Image) -> Result<Image, PluginError> {
        let mut data = input.data().to_vec();
        Self::adjust(&mut data, input.format(), self.amount());
        Image::from_raw(input.width(), input.height(), input.format(), data)
    }

    fn process_in_place(&mut self, image: &mut Image) -> Result<(), PluginError> {
        let amount = self.amount();
        let format = image.format();
        Self::adjust(image.data_mut(), format, amount);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neutral_amount_is_identity() {
        let mut filter = BrightnessFilter::new();
        let input = Image::from_raw(2, 1, PixelFormat::Gray8, vec![10, 250]).unwrap();
        let output = filter.process(&input).unwrap();
        assert_eq!(output.data(), input.data());
    }

    #[test]
    fn positive_amount_brightens_and_clamps() {
        let mut filter = BrightnessFilter::new();
        filter.set_property(AMOUNT, Variant::I32(20)).unwrap();
        let input = Image::from_raw(2, 1, PixelFormat::Gray8, vec![10, 250]).unwrap();
        let output = filter.process(&input).unwrap();
        assert_eq!(output.data(), &[30, 255]);
    }

    #[test]
    fn negative_amount_darkens_and_clamps() {
        let mut filter = BrightnessFilter::new();
        filter.set_property(AMOUNT, Variant::I32(-20)).unwrap();
        let mut image = Image::from_raw(2, 1, PixelFormat::Gray8, vec![10, 250]).unwrap();
        filter.process_in_place(&mut image).unwrap();
        assert_eq!(image.data(), &[0, 230]);
    }

    #[test]
    fn alpha_channel_is_untouched() {
        let mut filter = BrightnessFilter::new();
        filter.set_property(AMOUNT, Variant::I32(100)).unwrap();
        let input = Image::from_raw(1, 1, PixelFormat::Rgba32, vec![10, 20, 30, 200]).unwrap();
        let output = filter.process(&input).unwrap();
        assert_eq!(output.data(), &[110, 120, 130, 200]);
    }

    #[test]
    fn amount_outside_range_is_rejected() {
        let mut filter = BrightnessFilter::new();
        let result = filter.set_property(AMOUNT, Variant::I32(300));
        assert!(matches!(
            result,
            Err(PluginError::InvalidPropertyValue { .. })
        ));
        assert_eq!(filter.get_property(AMOUNT).unwrap(), Variant::I32(0));
    }
}
