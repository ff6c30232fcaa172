//! Binary PGM (P5) import and export.
//!
//! Only 8-bit grayscale is handled; a maxval above 255 is rejected rather
//! than rescaled.
use std::fs;
use std::path::Path;

use log::debug;
use lumen_core::capability::error::PluginError;
use lumen_core::capability::{Image, ImageExporter, ImageImporter, PixelFormat, PluginInstance};
use lumen_core::descriptor::{CapabilityKind, PluginDescriptor};
use lumen_core::variant::Variant;

use crate::{PGM_EXPORTER_ID, PGM_IMPORTER_ID};

const GRAY8_ONLY: &[PixelFormat] = &[PixelFormat::Gray8];

pub fn importer_descriptor() -> PluginDescriptor {
    PluginDescriptor::builder(PGM_IMPORTER_ID, CapabilityKind::ImageImporter)
        .names("pgm-import", "PGM Importer")
        .summary("Reads binary (P5) portable graymap files")
        .build()
        .expect("pgm importer descriptor is valid")
}

pub fn exporter_descriptor() -> PluginDescriptor {
    PluginDescriptor::builder(PGM_EXPORTER_ID, CapabilityKind::ImageExporter)
        .names("pgm-export", "PGM Exporter")
        .summary("Writes binary (P5) portable graymap files")
        .build()
        .expect("pgm exporter descriptor is valid")
}

pub struct PgmImporter {
    extensions: Vec<String>,
}

impl PgmImporter {
    pub fn new() -> Self {
        Self {
            extensions: vec!["pgm".to_string()],
        }
    }
}

impl Default for PgmImporter {
    fn default() -> Self {
        Self::new()
    }
}

impl PluginInstance for PgmImporter {
    fn get_property(&mut self, id: u32) -> Result<Variant, PluginError> {
        Err(PluginError::InvalidProperty(id))
    }

    fn set_property(&mut self, id: u32, _value: Variant) -> Result<(), PluginError> {
        Err(PluginError::InvalidProperty(id))
    }

    fn get_indexed_property(&mut self, id: u32, index: u32) -> Result<Variant, PluginError> {
        Err(PluginError::InvalidPropertyIndex { id, index })
    }
}

impl ImageImporter for PgmImporter {
    fn supported_extensions(&self) -> &[String] {
        &self.extensions
    }

    fn import(&mut self, path: &Path) -> Result<Image, PluginError> {
        let bytes = fs::read(path)
            .map_err(|e| PluginError::Processing(format!("cannot read {path:?}: {e}")))?;
        debug!("Parsing PGM file {:?} ({} bytes)", path, bytes.len());
        parse_p5(&bytes)
    }
}

pub struct PgmExporter {
    extensions: Vec<String>,
}

impl PgmExporter {
    pub fn new() -> Self {
        Self {
            extensions: vec!["pgm".to_string()],
        }
    }
}

impl Default for PgmExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl PluginInstance for PgmExporter {
    fn get_property(&mut self, id: u32) -> Result<Variant, PluginError> {
        Err(PluginError::InvalidProperty(id))
    }

    fn set_property(&mut self, id: u32, _value: Variant) -> Result<(), PluginError> {
        Err(PluginError::InvalidProperty(id))
    }

    fn get_indexed_property(&mut self, id: u32, index: u32) -> Result<Variant, PluginError> {
        Err(PluginError::InvalidPropertyIndex { id, index })
    }
}

impl ImageExporter for PgmExporter {
    fn supported_extensions(&self) -> &[String] {
        &self.extensions
    }

    fn supported_pixel_formats(&self) -> &[PixelFormat] {
        GRAY8_ONLY
    }

    fn export(&mut self, path: &Path, image: &Image) -> Result<(), PluginError> {
        if image.format() != PixelFormat::Gray8 {
            return Err(PluginError::UnsupportedPixelFormat(image.format()));
        }
        let mut out = format!("P5\n{} {}\n255\n", image.width(), image.height()).into_bytes();
        out.extend_from_slice(image.data());
        fs::write(path, out)
            .map_err(|e| PluginError::Processing(format!("cannot write {path:?}: {e}")))
    }
}

/// Pull the next whitespace-delimited token, skipping `#` comments.
fn next_token<'a>(bytes: &'a [u8], pos: &mut usize) -> Option<&'a [u8]> {
    loop {
        while *pos < bytes.len() && bytes[*pos].is_ascii_whitespace() {
            *pos += 1;
        }
        if *pos < bytes.len() && bytes[*pos] == b'#' {
            while *pos < bytes.len() && bytes[*pos] != b'\n' {
                *pos += 1;
            }
            continue;
        }
        break;
    }
    if *pos >= bytes.len() {
        return None;
    }
    let start = *pos;
    while *pos < bytes.len() && !bytes[*pos].is_ascii_whitespace() {
        *pos += 1;
    }
    Some(&bytes[start..*pos])
}

fn next_number(bytes: &[u8], pos: &mut usize, what: &str) -> Result<u32, PluginError> {
    let token = next_token(bytes, pos)
        .ok_or_else(|| PluginError::Processing(format!("truncated PGM header at {what}")))?;
    std::str::from_utf8(token)
        .ok()
        .and_then(|t| t.parse().ok())
        .ok_or_else(|| PluginError::Processing(format!("invalid PGM {what}")))
}

fn parse_p5(bytes: &[u8]) -> Result<Image, PluginError> {
    let mut pos = 0;
    match next_token(bytes, &mut pos) {
        Some(b"P5") => {}
        _ => return Err(PluginError::Processing("not a binary PGM file".to_string())),
    }
    let width = next_number(bytes, &mut pos, "width")?;
    let height = next_number(bytes, &mut pos, "height")?;
    let maxval = next_number(bytes, &mut pos, "maxval")?;
    if maxval == 0 || maxval > 255 {
        return Err(PluginError::Processing(format!(
            "unsupported PGM maxval {maxval}"
        )));
    }
    // Exactly one whitespace byte separates the header from the raster.
    pos += 1;

    let expected = width as usize * height as usize;
    let data = bytes
        .get(pos..pos + expected)
        .ok_or_else(|| PluginError::Processing("truncated PGM pixel data".to_string()))?;
    Image::from_raw(width, height, PixelFormat::Gray8, data.to_vec())
}
