//! Session struct, lifecycle and composer operations.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info, warn};
use zurri_common::{ConversationId, Event, EventBus};

use crate::api::{HistoryProvider, HistoryQuery, MessageDispatcher};
use crate::attachment::{check_batch, FileSelection, StagedAttachment};
use crate::error::ChatError;
use crate::message::Message;
use crate::preview::PreviewRegistry;

use super::types::{SessionError, SessionKey, SessionState, StagedInfo, HISTORY_PAGE_SIZE};

/// Chat state for the agent currently on screen.
///
/// All operations take `&self`; state lives behind an async lock that is
/// never held across a network call.
pub struct ChatSession {
    pub(super) state: RwLock<SessionState>,
    /// Epoch of the session that has a send in flight, 0 when idle.
    pub(super) in_flight: AtomicU64,
    pub(super) history: Arc<dyn HistoryProvider>,
    pub(super) dispatcher: Arc<dyn MessageDispatcher>,
    pub(super) previews: PreviewRegistry,
    pub(super) events: EventBus,
}

impl ChatSession {
    pub fn new(history: Arc<dyn HistoryProvider>, dispatcher: Arc<dyn MessageDispatcher>) -> Self {
        Self {
            state: RwLock::new(SessionState::default()),
            in_flight: AtomicU64::new(0),
            history,
            dispatcher,
            previews: PreviewRegistry::new(),
            events: EventBus::default(),
        }
    }

    /// Share a preview registry with the caller, e.g. to resolve preview URIs.
    pub fn with_previews(mut self, previews: PreviewRegistry) -> Self {
        self.previews = previews;
        self
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    pub fn previews(&self) -> &PreviewRegistry {
        &self.previews
    }

    /// Bind the session to `agent_id` and load its recent history.
    ///
    /// Always starts from a clean slate, including when re-initializing for
    /// the same agent. Work still outstanding for the previous binding is
    /// discarded when it completes. A failed history load leaves the thread
    /// empty; the failure is logged, not surfaced.
    pub async fn initialize(&self, agent_id: impl Into<String>) {
        let agent_id = agent_id.into();
        let key = {
            let mut state = self.state.write().await;
            state.reset();
            state.epoch += 1;
            state.agent_id = Some(agent_id.clone());
            state.loading = true;
            self.in_flight.store(0, Ordering::Release);
            SessionKey {
                agent_id,
                epoch: state.epoch,
            }
        };
        info!(agent_id = %key.agent_id, "opening chat session");

        let result = self
            .history
            .fetch_history(&key.agent_id, &HistoryQuery::recent(HISTORY_PAGE_SIZE))
            .await;

        let mut state = self.state.write().await;
        if !state.is_current(&key) {
            debug!(agent_id = %key.agent_id, "discarding history for a stale session");
            return;
        }
        state.loading = false;
        match result {
            Ok(messages) => {
                if let Some(id) = messages.last().and_then(|m| m.conversation_id.clone()) {
                    state.conversation_id = Some(id);
                }
                let count = messages.len();
                state.messages = messages;
                debug!(agent_id = %key.agent_id, count, "history loaded");
                self.events.publish(Event::HistoryLoaded {
                    agent_id: key.agent_id,
                    count,
                });
            }
            Err(e) => {
                warn!(agent_id = %key.agent_id, error = %e, "history unavailable, starting empty");
            }
        }
    }

    /// Tear the session down. Staged previews are revoked and any send
    /// still in flight will resolve as stale.
    pub async fn close(&self) {
        let mut state = self.state.write().await;
        let agent_id = state.agent_id.clone();
        state.reset();
        state.epoch += 1;
        self.in_flight.store(0, Ordering::Release);
        if let Some(agent_id) = agent_id {
            debug!(agent_id = %agent_id, "chat session closed");
            self.events.publish(Event::SessionClosed { agent_id });
        }
    }

    pub async fn set_composing_text(&self, text: impl Into<String>) {
        self.state.write().await.composing_text = text.into();
    }

    pub async fn composing_text(&self) -> String {
        self.state.read().await.composing_text.clone()
    }

    /// Raw metadata JSON for the next send. Validated only when sending.
    pub async fn set_metadata_text(&self, raw: Option<String>) {
        self.state.write().await.metadata_text = raw;
    }

    pub async fn metadata_text(&self) -> Option<String> {
        self.state.read().await.metadata_text.clone()
    }

    /// Stage files for the next send. The batch is accepted or rejected as
    /// a whole; a rejection becomes the session's current error.
    pub async fn stage_attachments(&self, files: Vec<FileSelection>) -> Result<(), ChatError> {
        let mut state = self.state.write().await;
        if let Err(err) = check_batch(state.staged.len(), &files) {
            debug!(error = %err, "attachment batch rejected");
            state.last_error = Some(SessionError::Local(err.clone()));
            return Err(err);
        }
        for file in files {
            state.staged.push(StagedAttachment::new(file, &self.previews));
        }
        Ok(())
    }

    /// Remove the staged file at `index`, revoking its preview. Returns
    /// `false` if the index is out of range.
    pub async fn unstage_attachment(&self, index: usize) -> bool {
        let mut state = self.state.write().await;
        if index >= state.staged.len() {
            debug!(index, staged = state.staged.len(), "unstage index out of range");
            return false;
        }
        state.staged.remove(index);
        true
    }

    pub async fn agent_id(&self) -> Option<String> {
        self.state.read().await.agent_id.clone()
    }

    pub async fn messages(&self) -> Vec<Message> {
        self.state.read().await.messages.clone()
    }

    pub async fn staged(&self) -> Vec<StagedInfo> {
        self.state.read().await.staged.iter().map(StagedInfo::from).collect()
    }

    pub async fn conversation_id(&self) -> Option<ConversationId> {
        self.state.read().await.conversation_id.clone()
    }

    pub async fn last_error(&self) -> Option<SessionError> {
        self.state.read().await.last_error.clone()
    }

    pub async fn clear_error(&self) {
        self.state.write().await.last_error = None;
    }

    /// Whether the initial history load is still outstanding.
    pub async fn is_loading(&self) -> bool {
        self.state.read().await.loading
    }

    pub fn is_sending(&self) -> bool {
        self.in_flight.load(Ordering::Acquire) != 0
    }
}
