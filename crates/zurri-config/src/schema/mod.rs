//! Configuration schema types.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod api;
mod chat;
mod logging;

pub use api::*;
pub use chat::*;
pub use logging::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration for the Zurri client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ZurriConfig {
    pub api: ApiConfig,
    pub chat: ChatConfig,
    pub logging: LoggingConfig,
}
