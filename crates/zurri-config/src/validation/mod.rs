//! Full configuration validation.
//!
//! Each section has its own validator; this orchestrator runs them all and
//! collects errors into a single `ConfigError`.

mod api;
mod helpers;

#[cfg(test)]
mod tests;

use crate::schema::ZurriConfig;
use zurri_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &ZurriConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    api::validate_api(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
