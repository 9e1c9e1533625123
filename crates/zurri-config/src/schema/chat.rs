use serde::{Deserialize, Serialize};

/// Chat transcript display options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Print a relative time ("5m ago") next to each message.
    pub show_timestamps: bool,
    /// Print links for files attached to messages.
    pub show_attachments: bool,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            show_timestamps: true,
            show_attachments: true,
        }
    }
}
