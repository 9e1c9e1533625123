//! Tests for TOML config loading, creation, and path resolution.

use super::*;
use crate::schema::LogLevel;
use std::path::Path;

#[test]
fn load_from_nonexistent_returns_parse_error() {
    let result = load_from_path(Path::new("/tmp/nonexistent_zurri_config.toml"));
    let err = result.unwrap_err();
    assert!(matches!(err, zurri_common::ConfigError::ParseError(_)));
}

#[test]
fn load_valid_partial_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[api]
base_url = "http://localhost:3000/api"

[logging]
level = "DEBUG"
"#,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.api.base_url, "http://localhost:3000/api");
    assert_eq!(config.logging.level, LogLevel::Debug);
    // Defaults preserved
    assert_eq!(config.api.request_timeout_secs, 120);
    assert!(config.chat.show_attachments);
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "this is not valid toml {{{").unwrap();

    let err = load_from_path(&path).unwrap_err();
    assert!(matches!(err, zurri_common::ConfigError::ParseError(_)));
}

#[test]
fn load_keeps_out_of_range_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[api]\nconnect_timeout_secs = 500\n").unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.api.connect_timeout_secs, 500);
}

#[test]
fn create_and_load_default_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("zurri").join("config.toml");

    create_default_config(&path).unwrap();
    assert!(path.exists());

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.api.base_url, crate::schema::DEFAULT_BASE_URL);
}

#[test]
fn default_config_toml_is_valid() {
    use super::template::default_config_toml;
    use crate::schema::ZurriConfig;

    let config: ZurriConfig = toml::from_str(&default_config_toml()).unwrap();
    assert_eq!(config.api.connect_timeout_secs, 10);
}

#[test]
fn default_paths_are_reasonable() {
    // Not every CI sandbox has a config dir.
    if let Ok(path) = default_config_path() {
        let path_str = path.to_string_lossy();
        assert!(path_str.contains("zurri"));
        assert!(path_str.ends_with("config.toml"));
    }
    if let Ok(path) = default_token_path() {
        assert!(path.ends_with("zurri/token"));
    }
}
