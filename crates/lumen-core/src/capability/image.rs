//! Minimal image currency for the capability contracts.
//!
//! The concrete codecs and filter algorithms live in plugin modules; the
//! core only defines the container they exchange.
use serde::{Deserialize, Serialize};

use crate::capability::error::PluginError;

/// Pixel layouts the capability contracts speak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PixelFormat {
    Gray8,
    Rgb24,
    Rgba32,
}

impl PixelFormat {
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelFormat::Gray8 => 1,
            PixelFormat::Rgb24 => 3,
            PixelFormat::Rgba32 => 4,
        }
    }
}

/// An owned raster image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: u32,
    height: u32,
    format: PixelFormat,
    data: Vec<u8>,
}

impl Image {
    /// Byte length of a raster with these dimensions, refusing geometries
    /// whose size does not fit in memory arithmetic.
    fn buffer_len(width: u32, height: u32, format: PixelFormat) -> Result<usize, PluginError> {
        (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(format.bytes_per_pixel()))
            .ok_or_else(|| {
                PluginError::Processing(format!(
                    "image dimensions {}x{} {:?} overflow the addressable size",
                    width, height, format
                ))
            })
    }

    /// A zero-filled image of the given dimensions.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Result<Self, PluginError> {
        let len = Self::buffer_len(width, height, format)?;
        Ok(Self {
            width,
            height,
            format,
            data: vec![0; len],
        })
    }

    /// Wrap existing pixel data, validating its length.
    pub fn from_raw(
        width: u32,
        height: u32,
        format: PixelFormat,
        data: Vec<u8>,
    ) -> Result<Self, PluginError> {
        let expected = Self::buffer_len(width, height, format)?;
        if data.len() != expected {
            return Err(PluginError::Processing(format!(
                "pixel buffer holds {} bytes, expected {} for {}x{} {:?}",
                data.len(),
                expected,
                width,
                height,
                format
            )));
        }
        Ok(Self {
            width,
            height,
            format,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Same dimensions and format; required by two-image filters.
    pub fn same_shape(&self, other: &Image) -> bool {
        self.width == other.width && self.height == other.height && self.format == other.format
    }
}
