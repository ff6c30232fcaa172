use crate::capability::error::PluginError;
use crate::capability::image::{Image, PixelFormat};

#[test]
fn new_is_zero_filled() {
    let image = Image::new(4, 2, PixelFormat::Rgb24).unwrap();
    assert_eq!(image.data().len(), 24);
    assert!(image.data().iter().all(|b| *b == 0));
}

#[test]
fn from_raw_rejects_mismatched_buffer() {
    let result = Image::from_raw(2, 2, PixelFormat::Gray8, vec![0; 3]);
    assert!(matches!(result, Err(PluginError::Processing(_))));
}

#[test]
fn absurd_dimensions_are_rejected_not_wrapped() {
    // Byte size past usize must fail instead of wrapping to a small value
    // that some undersized buffer happens to match.
    let result = Image::from_raw(u32::MAX, u32::MAX, PixelFormat::Rgba32, Vec::new());
    assert!(matches!(result, Err(PluginError::Processing(_))));

    let result = Image::new(u32::MAX, u32::MAX, PixelFormat::Rgba32);
    assert!(matches!(result, Err(PluginError::Processing(_))));
}

#[test]
fn same_shape_compares_geometry_and_format() {
    let a = Image::new(2, 2, PixelFormat::Gray8).unwrap();
    let b = Image::new(2, 2, PixelFormat::Gray8).unwrap();
    let c = Image::new(2, 2, PixelFormat::Rgb24).unwrap();
    assert!(a.same_shape(&b));
    assert!(!a.same_shape(&c));
}
