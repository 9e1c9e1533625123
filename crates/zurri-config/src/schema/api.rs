use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://nexusbert-zurri.hf.space/api";

/// Marketplace backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// REST root, without a trailing slash.
    pub base_url: String,
    /// TCP connect timeout in seconds (valid range: 1-60).
    pub connect_timeout_secs: u32,
    /// Whole-request timeout in seconds (valid range: 5-600). Agent runs
    /// can be slow, so this is generous.
    pub request_timeout_secs: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            connect_timeout_secs: 10,
            request_timeout_secs: 120,
        }
    }
}
