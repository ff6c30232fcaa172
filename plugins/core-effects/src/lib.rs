//! Built-in effects module: a brightness filter plus binary PGM file I/O.
//!
//! Usable two ways: linked into the host through [`static_module`], or
//! compiled as a cdylib and discovered on disk through the exported module
//! entry points.
pub mod brightness;
pub mod pgm;

pub use brightness::BrightnessFilter;
pub use pgm::{PgmExporter, PgmImporter};

use lumen_core::abi::{self, PluginRegistration, StaticModule};
use lumen_core::capability::PluginObject;
use lumen_core::descriptor::{Guid, ModuleDescriptor, ModuleVersion};

pub const MODULE_ID: Guid = Guid::new(0x4C554D45, 0x4E000001, 0x8F3A2B1C, 0x5D6E7F80);
pub const BRIGHTNESS_ID: Guid = Guid::new(0x4C554D45, 0x4E000002, 0x8F3A2B1C, 0x5D6E7F81);
pub const PGM_IMPORTER_ID: Guid = Guid::new(0x4C554D45, 0x4E000003, 0x8F3A2B1C, 0x5D6E7F82);
pub const PGM_EXPORTER_ID: Guid = Guid::new(0x4C554D45, 0x4E000004, 0x8F3A2B1C, 0x5D6E7F83);

const MODULE_VERSION: ModuleVersion = ModuleVersion::new(1, 0, 0);
const PLUGIN_COUNT: u32 = 3;

fn module_descriptor() -> ModuleDescriptor {
    ModuleDescriptor::new(MODULE_ID, MODULE_VERSION, "core-effects", "Core Effects")
        .with_description("Brightness adjustment and portable graymap file support")
        .with_vendor("Lumen Developers", "(c) Lumen Developers")
        .with_plugin_count(PLUGIN_COUNT)
}

fn registration(index: u32) -> Option<PluginRegistration> {
    match index {
        0 => Some(PluginRegistration::new(brightness::descriptor(), || {
            PluginObject::Filter(Box::new(BrightnessFilter::new()))
        })),
        1 => Some(PluginRegistration::new(pgm::importer_descriptor(), || {
            PluginObject::Importer(Box::new(PgmImporter::new()))
        })),
        2 => Some(PluginRegistration::new(pgm::exporter_descriptor(), || {
            PluginObject::Exporter(Box::new(PgmExporter::new()))
        })),
        _ => None,
    }
}

/// The whole module for hosts that link it in statically.
pub fn static_module() -> StaticModule {
    StaticModule {
        descriptor: module_descriptor(),
        plugins: (0..PLUGIN_COUNT).filter_map(registration).collect(),
    }
}

#[no_mangle]
pub extern "C-unwind" fn lumen_module_abi() -> u32 {
    abi::ABI_VERSION
}

#[no_mangle]
pub extern "C-unwind" fn lumen_module_init() -> *mut ModuleDescriptor {
    Box::into_raw(Box::new(module_descriptor()))
}

#[no_mangle]
pub extern "C-unwind" fn lumen_module_plugin(index: u32) -> *mut PluginRegistration {
    match registration(index) {
        Some(registration) => Box::into_raw(Box::new(registration)),
        None => std::ptr::null_mut(),
    }
}

#[no_mangle]
pub extern "C-unwind" fn lumen_module_cleanup() {}
