//! Zurri client configuration.
//!
//! TOML-based configuration with validation. Every section uses serde
//! defaults so a partial (or empty) config file works out of the box.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use zurri_config::{load_config, config_to_json};
//!
//! let config = load_config().expect("failed to load config");
//! println!("{}", config_to_json(&config));
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{
    ApiConfig, ChatConfig, LogLevel, LoggingConfig, ZurriConfig, CONFIG_SCHEMA_VERSION,
};
pub use toml_loader::{default_config_path, default_token_path};

use std::path::Path;

use zurri_common::ConfigError;

/// Load config from the platform default path, creating a commented
/// default file on first run, and validate the result.
pub fn load_config() -> Result<ZurriConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Load and validate config from an explicit path. The file must exist.
pub fn load_config_from(path: &Path) -> Result<ZurriConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }
    let config = toml_loader::load_from_path(path)?;
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &ZurriConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_to_json_contains_all_sections() {
        let json = config_to_json(&ZurriConfig::default());
        assert!(json.contains("\"api\""));
        assert!(json.contains("\"chat\""));
        assert!(json.contains("\"logging\""));
        assert!(json.contains("nexusbert-zurri.hf.space"));
    }

    #[test]
    fn config_schema_version_is_1() {
        assert_eq!(CONFIG_SCHEMA_VERSION, 1);
    }

    #[test]
    fn load_config_from_missing_path_is_file_not_found() {
        let err = load_config_from(Path::new("/tmp/nonexistent_zurri_config_dir/config.toml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn load_config_from_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api]\nbase_url = \"ftp://example.com\"\n").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn default_config_round_trips_through_json() {
        let json = config_to_json(&ZurriConfig::default());
        let parsed: ZurriConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.api.connect_timeout_secs, 10);
        assert!(parsed.chat.show_timestamps);
        assert_eq!(parsed.logging.level, LogLevel::Info);
    }
}
