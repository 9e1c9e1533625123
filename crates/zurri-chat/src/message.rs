//! Conversation messages as the session holds them.

use std::fmt;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;
use zurri_common::ConversationId;

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        };
        f.write_str(name)
    }
}

/// Message identity. Client-generated ids live in their own variants, so a
/// backend id can never collide with a pending or local one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MessageId {
    /// Issued by the backend.
    Remote(String),
    /// Optimistic user message awaiting the dispatcher.
    Pending(Uuid),
    /// Shown in the thread but never confirmed by the backend (error
    /// notices, fallback reconciliation).
    Local(Uuid),
}

impl MessageId {
    pub fn pending() -> Self {
        MessageId::Pending(Uuid::new_v4())
    }

    pub fn local() -> Self {
        MessageId::Local(Uuid::new_v4())
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, MessageId::Pending(_))
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, MessageId::Remote(_))
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageId::Remote(id) => f.write_str(id),
            MessageId::Pending(id) => write!(f, "temp-{id}"),
            MessageId::Local(id) => write!(f, "local-{id}"),
        }
    }
}

/// A file attached to a backend-confirmed message. Read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteAttachment {
    /// URL or content hash the file can be fetched from.
    pub reference: String,
    pub name: String,
    pub mime_type: Option<String>,
}

impl RemoteAttachment {
    /// Lift `metadata.files[]` entries into attachments. Entries without
    /// any addressable reference are skipped.
    pub fn from_metadata(metadata: &Map<String, Value>) -> Vec<Self> {
        let Some(files) = metadata.get("files").and_then(Value::as_array) else {
            return Vec::new();
        };

        files
            .iter()
            .filter_map(|file| {
                let reference = file["url"]
                    .as_str()
                    .or_else(|| file["ipfsHash"].as_str())?
                    .to_string();
                let name = file["originalname"]
                    .as_str()
                    .or_else(|| file["name"].as_str())
                    .map(String::from)
                    .unwrap_or_else(|| reference.clone());
                let mime_type = file["mimetype"]
                    .as_str()
                    .or_else(|| file["mimeType"].as_str())
                    .map(String::from);
                Some(RemoteAttachment {
                    reference,
                    name,
                    mime_type,
                })
            })
            .collect()
    }
}

/// One turn in a conversation.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    /// Display text. Empty when the message only carries attachments.
    pub content: String,
    pub agent_id: String,
    pub conversation_id: Option<ConversationId>,
    pub attachments: Vec<RemoteAttachment>,
    pub metadata: Option<Map<String, Value>>,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Optimistic user message shown while a send is in flight.
    pub(crate) fn pending(
        agent_id: &str,
        content: String,
        conversation_id: Option<ConversationId>,
    ) -> Self {
        Self::new(MessageId::pending(), Role::User, agent_id, content, conversation_id)
    }

    /// Unconfirmed message that stays in the thread (error notices).
    pub(crate) fn local(
        role: Role,
        agent_id: &str,
        content: String,
        conversation_id: Option<ConversationId>,
    ) -> Self {
        Self::new(MessageId::local(), role, agent_id, content, conversation_id)
    }

    fn new(
        id: MessageId,
        role: Role,
        agent_id: &str,
        content: String,
        conversation_id: Option<ConversationId>,
    ) -> Self {
        Self {
            id,
            role,
            content,
            agent_id: agent_id.to_string(),
            conversation_id,
            attachments: Vec::new(),
            metadata: None,
            created_at: Utc::now(),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.id.is_pending()
    }
}

/// Display text for an optimistic message: the text itself, or a file-count
/// placeholder when only attachments are being sent.
pub(crate) fn pending_content(text: &str, file_count: usize) -> String {
    if text.is_empty() {
        format!("[{file_count} file(s)]")
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn id_spaces_render_distinctly() {
        let remote = MessageId::Remote("65f0c1".into());
        assert_eq!(remote.to_string(), "65f0c1");

        let pending = MessageId::pending();
        assert!(pending.to_string().starts_with("temp-"));
        assert!(pending.is_pending());

        let local = MessageId::local();
        assert!(local.to_string().starts_with("local-"));
        assert!(!local.is_pending() && !local.is_remote());
    }

    #[test]
    fn remote_id_that_looks_pending_is_still_remote() {
        let remote = MessageId::Remote("temp-123".into());
        assert!(!remote.is_pending());
        assert_ne!(remote, MessageId::pending());
    }

    #[test]
    fn pending_content_placeholder() {
        assert_eq!(pending_content("hi", 0), "hi");
        assert_eq!(pending_content("", 3), "[3 file(s)]");
    }

    #[test]
    fn attachments_from_metadata_files() {
        let metadata = json!({
            "files": [
                {"url": "https://cdn/x.png", "originalname": "x.png", "mimetype": "image/png"},
                {"ipfsHash": "bafy123", "name": "notes.txt"},
                {"originalname": "orphan.bin"}
            ]
        });
        let attachments = RemoteAttachment::from_metadata(metadata.as_object().unwrap());

        assert_eq!(attachments.len(), 2);
        assert_eq!(attachments[0].reference, "https://cdn/x.png");
        assert_eq!(attachments[0].name, "x.png");
        assert_eq!(attachments[0].mime_type.as_deref(), Some("image/png"));
        assert_eq!(attachments[1].reference, "bafy123");
        assert_eq!(attachments[1].name, "notes.txt");
        assert_eq!(attachments[1].mime_type, None);
    }

    #[test]
    fn role_round_trips_lowercase() {
        let role: Role = serde_json::from_str("\"assistant\"").unwrap();
        assert_eq!(role, Role::Assistant);
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
    }
}
