//! Session types and the in-flight send guard.

use std::sync::atomic::{AtomicU64, Ordering};

use zurri_common::ConversationId;

use crate::attachment::StagedAttachment;
use crate::error::{ChatError, SendFailure};
use crate::message::Message;

/// How many recent messages a history load asks for.
pub const HISTORY_PAGE_SIZE: u32 = 50;

/// Identifies one incarnation of a session. Async work captures the key
/// before suspending and applies its result only if the key still matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SessionKey {
    pub(crate) agent_id: String,
    pub(crate) epoch: u64,
}

/// Marks a send as in flight for one session epoch. The flag is cleared on
/// drop, but only if it still belongs to this epoch: a re-keyed session may
/// already have a send of its own.
pub(crate) struct SendGuard<'a> {
    flag: &'a AtomicU64,
    epoch: u64,
}

impl<'a> SendGuard<'a> {
    /// Returns `None` if a send is already in flight.
    pub(crate) fn acquire(flag: &'a AtomicU64, epoch: u64) -> Option<Self> {
        flag.compare_exchange(0, epoch, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| Self { flag, epoch })
    }
}

impl Drop for SendGuard<'_> {
    fn drop(&mut self) {
        let _ = self
            .flag
            .compare_exchange(self.epoch, 0, Ordering::Release, Ordering::Relaxed);
    }
}

/// What a call to `send` ended up doing.
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    /// Nothing to send, or a send was already in flight.
    Skipped,
    /// The agent answered and the thread was reconciled.
    Delivered {
        conversation_id: ConversationId,
        reply_text: String,
    },
    /// The optimistic message was rolled back.
    Failed(SendFailure),
    /// Rolled back because the backend rejected the credentials. The caller
    /// must route the user to login.
    LoginRequired,
    /// The session was re-keyed while the send was outstanding; the result
    /// was dropped.
    Stale,
}

/// The error currently surfaced next to the composer.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Local(#[from] ChatError),
    #[error(transparent)]
    Remote(#[from] SendFailure),
}

/// Read-only view of a staged attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedInfo {
    pub name: String,
    pub byte_size: u64,
    pub mime_type: String,
    pub preview_uri: Option<String>,
}

impl From<&StagedAttachment> for StagedInfo {
    fn from(staged: &StagedAttachment) -> Self {
        let file = staged.file();
        Self {
            name: file.name().to_string(),
            byte_size: file.byte_size(),
            mime_type: file.mime_type().to_string(),
            preview_uri: staged.preview_uri().map(String::from),
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct SessionState {
    pub(crate) agent_id: Option<String>,
    pub(crate) epoch: u64,
    pub(crate) messages: Vec<Message>,
    pub(crate) staged: Vec<StagedAttachment>,
    pub(crate) composing_text: String,
    pub(crate) metadata_text: Option<String>,
    pub(crate) conversation_id: Option<ConversationId>,
    pub(crate) last_error: Option<SessionError>,
    /// A history load for the current key is outstanding. Sends are refused
    /// until it lands so the load cannot overwrite a reconciled exchange.
    pub(crate) loading: bool,
}

impl SessionState {
    pub(crate) fn key(&self) -> Option<SessionKey> {
        self.agent_id.as_ref().map(|agent_id| SessionKey {
            agent_id: agent_id.clone(),
            epoch: self.epoch,
        })
    }

    pub(crate) fn is_current(&self, key: &SessionKey) -> bool {
        self.epoch == key.epoch && self.agent_id.as_deref() == Some(key.agent_id.as_str())
    }

    /// Drop everything the session holds. Staged previews are revoked as
    /// their entries drop. The epoch is left to the caller.
    pub(crate) fn reset(&mut self) {
        self.agent_id = None;
        self.messages.clear();
        self.staged.clear();
        self.composing_text.clear();
        self.metadata_text = None;
        self.conversation_id = None;
        self.last_error = None;
        self.loading = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_is_exclusive() {
        let flag = AtomicU64::new(0);
        let guard = SendGuard::acquire(&flag, 1).unwrap();
        assert!(SendGuard::acquire(&flag, 1).is_none());
        drop(guard);
        assert!(SendGuard::acquire(&flag, 1).is_some());
    }

    #[test]
    fn stale_guard_does_not_clear_newer_send() {
        let flag = AtomicU64::new(0);
        let old = SendGuard::acquire(&flag, 1).unwrap();

        // Session re-keyed: flag reset, new epoch starts a send.
        flag.store(0, Ordering::Release);
        let _new = SendGuard::acquire(&flag, 2).unwrap();

        drop(old);
        assert_eq!(flag.load(Ordering::Acquire), 2);
    }

    #[test]
    fn key_matches_only_same_epoch_and_agent() {
        let mut state = SessionState {
            agent_id: Some("a1".into()),
            epoch: 3,
            ..SessionState::default()
        };
        let key = state.key().unwrap();
        assert!(state.is_current(&key));

        state.epoch = 4;
        assert!(!state.is_current(&key));

        state.epoch = 3;
        state.agent_id = Some("a2".into());
        assert!(!state.is_current(&key));
    }
}
