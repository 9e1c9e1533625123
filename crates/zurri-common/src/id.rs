use serde::{Deserialize, Serialize};
use std::fmt;

/// Short hex tag for correlating a request with its log lines.
pub fn new_correlation_id() -> String {
    let uuid = uuid::Uuid::new_v4();
    let bytes = uuid.as_bytes();
    format!(
        "{:02x}{:02x}{:02x}{:02x}",
        bytes[0], bytes[1], bytes[2], bytes[3]
    )
}

/// Server-assigned conversation identifier. Never generated client-side.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(String);

impl ConversationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ConversationId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for ConversationId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correlation_id_is_short_hex() {
        let cid = new_correlation_id();
        assert_eq!(cid.len(), 8);
        assert!(cid.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn conversation_id_display() {
        let cid = ConversationId::new("c1");
        assert_eq!(cid.to_string(), "c1");
        assert_eq!(cid.as_str(), "c1");
    }

    #[test]
    fn conversation_id_serializes_as_plain_string() {
        let cid = ConversationId::from("abc");
        let json = serde_json::to_string(&cid).unwrap();
        assert_eq!(json, "\"abc\"");
        let back: ConversationId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cid);
    }
}
