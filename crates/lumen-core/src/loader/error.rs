use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while opening a module binary and talking to its entry
/// points.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Module file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to open module library '{path}': {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: libloading::Error,
    },

    #[error("Module '{path}' does not export required symbol '{symbol}': {source}")]
    SymbolNotFound {
        path: PathBuf,
        symbol: String,
        #[source]
        source: libloading::Error,
    },

    #[error("Module '{path}' was built against ABI version {found}, host requires {expected}")]
    AbiMismatch {
        path: PathBuf,
        expected: u32,
        found: u32,
    },

    #[error("Module entry point '{symbol}' panicked: {message}")]
    EntryPointPanic {
        symbol: &'static str,
        message: String,
    },

    #[error("Module entry point '{symbol}' returned a null descriptor")]
    NullDescriptor { symbol: &'static str },
}
