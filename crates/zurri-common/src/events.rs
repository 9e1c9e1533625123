use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::id::ConversationId;

/// Session lifecycle signals for whoever drives the UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Event {
    HistoryLoaded {
        agent_id: String,
        count: usize,
    },
    ConversationAssigned {
        agent_id: String,
        conversation_id: ConversationId,
    },
    /// The backend rejected the credentials; the caller must send the user
    /// through the login flow.
    LoginRequired,
    SessionClosed {
        agent_id: String,
    },
    #[serde(other)]
    Unknown,
}

pub struct EventBus {
    sender: broadcast::Sender<Event>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: Event) -> usize {
        match self.sender.send(event) {
            Ok(count) => count,
            Err(_) => {
                tracing::trace!("event dropped, no subscribers");
                0
            }
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(32)
    }
}
