// ==========================
// tests/unit/config_tests.rs
// ==========================
//! Unit tests for the configuration module
use conch_backend::config::{Settings, StorageBackend, DEFAULT_CONFIG_FILE};
use conch_backend::AppState;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn test_settings_default() {
    let settings = Settings::default();

    assert_eq!(settings.server.host, "127.0.0.1");
    assert_eq!(settings.server.port, 8080);
    assert_eq!(settings.storage.path, PathBuf::from("data"));
    assert_eq!(settings.storage.backend, StorageBackend::FlatFile);
    assert_eq!(settings.auth.max_password_bytes, 72);
    assert_eq!(settings.log.level, "info");
    assert_eq!(DEFAULT_CONFIG_FILE, "config.toml");
}

#[test]
fn test_settings_from_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("custom.toml");
    fs::write(
        &path,
        "[server]\nhost = \"0.0.0.0\"\nport = 9100\n\n[log]\nlevel = \"debug\"\n",
    )
    .unwrap();

    let settings = Settings::load_from(&path).unwrap();
    assert_eq!(settings.bind_addr().unwrap().to_string(), "0.0.0.0:9100");
    assert_eq!(settings.log.level, "debug");
}

#[test]
fn test_settings_reject_bad_toml() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "[server]\nport = \"eighty\"\n").unwrap();
    assert!(Settings::load_from(&path).is_err());
}

#[test]
fn test_memory_backend_builds_state() {
    let mut settings = Settings::default();
    settings.storage.backend = StorageBackend::Memory;
    settings.auth.hash_cost = 4;
    let state = AppState::from_settings(settings).unwrap();
    assert_eq!(state.settings.storage.backend, StorageBackend::Memory);
}
