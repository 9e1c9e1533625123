//! Marketplace REST API.
//!
//! `ZurriClient` wraps the backend's REST endpoints. It is also the
//! production `HistoryProvider` and `MessageDispatcher`, the two
//! collaborators the chat session depends on.

mod agents;
mod auth;
mod chat;
mod client;
mod config;
mod wallet;


use async_trait::async_trait;
use serde_json::{Map, Value};
use zurri_common::ConversationId;

use crate::attachment::FileSelection;
use crate::error::ApiError;
use crate::message::{Message, Role};

pub use agents::{Agent, AgentList, AgentQuery, AgentStatus, AgentUpdate, NewAgent, Pagination};
pub use auth::{AuthContext, AuthResponse, CreatorUpgrade, User, TOKEN_ENV_VAR};
pub use client::ZurriClient;
pub use config::ClientConfig;
pub use wallet::{
    FundingSession, Payment, Transaction, TransactionKind, TransactionList, TransactionQuery,
    TransactionStatus, Verification, Wallet,
};

/// Source of prior messages for an agent.
#[async_trait]
pub trait HistoryProvider: Send + Sync {
    /// Messages in chronological order. Empty for a new conversation.
    async fn fetch_history(
        &self,
        agent_id: &str,
        query: &HistoryQuery,
    ) -> Result<Vec<Message>, ApiError>;
}

/// Submits a composed message to the agent execution backend.
#[async_trait]
pub trait MessageDispatcher: Send + Sync {
    async fn dispatch(
        &self,
        agent_id: &str,
        request: DispatchRequest,
    ) -> Result<DispatchReply, ApiError>;
}

/// History filters. The session only ever sets `limit`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryQuery {
    pub limit: Option<u32>,
    pub conversation_id: Option<ConversationId>,
    pub role: Option<Role>,
    pub search: Option<String>,
}

impl HistoryQuery {
    /// The most recent `limit` messages across all conversations.
    pub fn recent(limit: u32) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }
}

/// One outgoing message. At least one of `text` and `attachments` is set.
#[derive(Debug, Default)]
pub struct DispatchRequest {
    pub text: Option<String>,
    pub conversation_id: Option<ConversationId>,
    pub attachments: Vec<FileSelection>,
    pub metadata: Option<Map<String, Value>>,
}

/// The agent's answer, bound to the conversation it was filed under.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchReply {
    pub reply_text: String,
    pub conversation_id: ConversationId,
    pub metadata: Option<Map<String, Value>>,
}
