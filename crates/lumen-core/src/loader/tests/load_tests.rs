use std::path::Path;

use crate::loader::{is_module_file, module_file_name, LoadError, LoadedModule};

#[test]
fn missing_file_is_reported_before_dlopen() {
    let result = LoadedModule::load(Path::new("/nonexistent/libnothing.so"));
    match result {
        Err(LoadError::FileNotFound(path)) => {
            assert_eq!(path, Path::new("/nonexistent/libnothing.so"));
        }
        other => panic!("expected FileNotFound, got {other:?}"),
    }
}

#[test]
fn non_module_file_is_rejected_by_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(module_file_name("bogus"));
    std::fs::write(&path, b"not a shared object").unwrap();

    let result = LoadedModule::load(&path);
    assert!(matches!(result, Err(LoadError::Open { .. })));
}

#[test]
fn missing_entry_point_is_a_symbol_error() {
    // The test binary itself is a loadable object (PIE) that exports none
    // of the module symbols, so the handshake lookup must fail cleanly.
    let exe = std::env::current_exe().unwrap();
    let result = LoadedModule::load(&exe);
    match result {
        Err(LoadError::SymbolNotFound { symbol, .. }) => {
            assert_eq!(symbol, "lumen_module_abi");
        }
        other => panic!("expected SymbolNotFound, got {other:?}"),
    }
}

#[test]
fn module_file_name_uses_platform_conventions() {
    let name = module_file_name("effects");
    assert!(name.contains("effects"));
    assert!(name.ends_with(std::env::consts::DLL_SUFFIX));
}

#[test]
fn module_file_detection() {
    let dir = tempfile::tempdir().unwrap();

    let module = dir.path().join(module_file_name("effects"));
    std::fs::write(&module, b"").unwrap();
    assert!(is_module_file(&module));

    let text = dir.path().join("readme.txt");
    std::fs::write(&text, b"").unwrap();
    assert!(!is_module_file(&text));

    // Directories never qualify, whatever their name.
    let sub = dir.path().join(module_file_name("nested"));
    std::fs::create_dir(&sub).unwrap();
    assert!(!is_module_file(&sub));
}
