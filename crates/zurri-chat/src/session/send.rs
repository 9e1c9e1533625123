//! Optimistic send: snapshot the composer, show the message, dispatch,
//! then reconcile against server history or roll back.

use tracing::{debug, warn};
use zurri_common::Event;

use crate::api::{DispatchReply, DispatchRequest, HistoryQuery};
use crate::attachment::{FileSelection, StagedAttachment};
use crate::error::{ApiError, ChatError, SendFailure};
use crate::message::{pending_content, Message, MessageId, RemoteAttachment, Role};
use crate::metadata::parse_metadata;

use super::manager::ChatSession;
use super::types::{SendGuard, SendOutcome, SessionError, SessionKey, HISTORY_PAGE_SIZE};

impl ChatSession {
    /// Send the composed text, staged files and metadata to the agent.
    ///
    /// Returns `Ok(SendOutcome::Skipped)` when there is nothing to send, the
    /// history is still loading, or a send is already in flight. Malformed
    /// metadata is rejected up front with the composer left intact. Every
    /// other failure is reported through the outcome after the optimistic
    /// message is rolled back.
    pub async fn send(&self) -> Result<SendOutcome, ChatError> {
        let (key, pending_id, request, _guard) = {
            let mut state = self.state.write().await;
            let Some(key) = state.key() else {
                debug!("send ignored, no agent bound");
                return Ok(SendOutcome::Skipped);
            };
            if state.loading {
                debug!(agent_id = %key.agent_id, "send ignored, history still loading");
                return Ok(SendOutcome::Skipped);
            }
            let Some(guard) = SendGuard::acquire(&self.in_flight, key.epoch) else {
                debug!(agent_id = %key.agent_id, "send ignored, another send is in flight");
                return Ok(SendOutcome::Skipped);
            };

            let text = state.composing_text.trim().to_string();
            if text.is_empty() && state.staged.is_empty() {
                return Ok(SendOutcome::Skipped);
            }

            let metadata = match parse_metadata(state.metadata_text.as_deref().unwrap_or("")) {
                Ok(metadata) => metadata,
                Err(err) => {
                    state.last_error = Some(SessionError::Local(err.clone()));
                    return Err(err);
                }
            };

            state.composing_text.clear();
            state.metadata_text = None;
            let attachments: Vec<FileSelection> = std::mem::take(&mut state.staged)
                .into_iter()
                .map(StagedAttachment::into_file)
                .collect();

            let conversation_id = state.conversation_id.clone();
            let pending = Message::pending(
                &key.agent_id,
                pending_content(&text, attachments.len()),
                conversation_id.clone(),
            );
            let pending_id = pending.id.clone();
            state.messages.push(pending);
            state.last_error = None;

            let request = DispatchRequest {
                text: (!text.is_empty()).then_some(text),
                conversation_id,
                attachments,
                metadata,
            };
            (key, pending_id, request, guard)
        };

        debug!(
            agent_id = %key.agent_id,
            pending = %pending_id,
            files = request.attachments.len(),
            "dispatching message"
        );
        let outcome = match self.dispatcher.dispatch(&key.agent_id, request).await {
            Ok(reply) => self.reconcile(&key, &pending_id, reply).await,
            Err(err) => self.roll_back(&key, &pending_id, err).await,
        };
        Ok(outcome)
    }

    /// Adopt the reply's conversation and replace the thread with the
    /// server's copy. If that re-fetch fails, keep the local thread and
    /// append the reply so the exchange stays visible.
    async fn reconcile(
        &self,
        key: &SessionKey,
        pending_id: &MessageId,
        reply: DispatchReply,
    ) -> SendOutcome {
        {
            let mut state = self.state.write().await;
            if !state.is_current(key) {
                debug!(agent_id = %key.agent_id, "discarding reply for a stale session");
                return SendOutcome::Stale;
            }
            if state.conversation_id.as_ref() != Some(&reply.conversation_id) {
                state.conversation_id = Some(reply.conversation_id.clone());
                self.events.publish(Event::ConversationAssigned {
                    agent_id: key.agent_id.clone(),
                    conversation_id: reply.conversation_id.clone(),
                });
            }
        }

        let history = self
            .history
            .fetch_history(&key.agent_id, &HistoryQuery::recent(HISTORY_PAGE_SIZE))
            .await;

        let mut state = self.state.write().await;
        if !state.is_current(key) {
            debug!(agent_id = %key.agent_id, "discarding history for a stale session");
            return SendOutcome::Stale;
        }
        match history {
            Ok(messages) => state.messages = messages,
            Err(e) => {
                warn!(
                    agent_id = %key.agent_id,
                    error = %e,
                    "history refresh after send failed, keeping local thread"
                );
                if let Some(sent) = state.messages.iter_mut().find(|m| &m.id == pending_id) {
                    sent.id = MessageId::local();
                    sent.conversation_id = Some(reply.conversation_id.clone());
                }
                let mut answer = Message::local(
                    Role::Assistant,
                    &key.agent_id,
                    reply.reply_text.clone(),
                    Some(reply.conversation_id.clone()),
                );
                if let Some(metadata) = &reply.metadata {
                    answer.attachments = RemoteAttachment::from_metadata(metadata);
                }
                answer.metadata = reply.metadata;
                state.messages.push(answer);
            }
        }

        SendOutcome::Delivered {
            conversation_id: reply.conversation_id,
            reply_text: reply.reply_text,
        }
    }

    /// Remove the optimistic message and classify the failure.
    async fn roll_back(&self, key: &SessionKey, pending_id: &MessageId, err: ApiError) -> SendOutcome {
        let mut state = self.state.write().await;
        if !state.is_current(key) {
            debug!(agent_id = %key.agent_id, error = %err, "discarding failure for a stale session");
            return SendOutcome::Stale;
        }
        state.messages.retain(|m| &m.id != pending_id);
        warn!(agent_id = %key.agent_id, error = %err, "send failed");

        let failure = SendFailure::from(err);
        if failure.shows_in_thread() {
            state.messages.push(Message::local(
                Role::Assistant,
                &key.agent_id,
                format!("Error: {failure}"),
                None,
            ));
        }
        state.last_error = Some(SessionError::Remote(failure.clone()));

        if failure == SendFailure::Unauthenticated {
            self.events.publish(Event::LoginRequired);
            return SendOutcome::LoginRequired;
        }
        SendOutcome::Failed(failure)
    }
}
