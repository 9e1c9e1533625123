//! Chat endpoints: history and message dispatch.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;
use zurri_common::ConversationId;

use crate::error::ApiError;
use crate::message::{Message, MessageId, RemoteAttachment, Role};

use super::client::ZurriClient;
use super::{DispatchReply, DispatchRequest, HistoryProvider, HistoryQuery, MessageDispatcher};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireMessage {
    #[serde(alias = "_id")]
    id: String,
    role: Role,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    agent_id: Option<String>,
    #[serde(default)]
    conversation_id: Option<ConversationId>,
    #[serde(default)]
    metadata: Option<Map<String, Value>>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

impl WireMessage {
    fn into_message(self, agent_id: &str) -> Message {
        let attachments = self
            .metadata
            .as_ref()
            .map(RemoteAttachment::from_metadata)
            .unwrap_or_default();
        Message {
            id: MessageId::Remote(self.id),
            role: self.role,
            content: self.content.unwrap_or_default(),
            agent_id: self.agent_id.unwrap_or_else(|| agent_id.to_string()),
            conversation_id: self.conversation_id,
            attachments,
            metadata: self.metadata,
            created_at: self.created_at.unwrap_or_else(Utc::now),
        }
    }
}

#[derive(Debug, Deserialize)]
struct HistoryResponse {
    #[serde(default)]
    messages: Vec<WireMessage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendResponse {
    #[serde(default)]
    response: Option<String>,
    conversation_id: ConversationId,
    #[serde(default)]
    metadata: Option<Map<String, Value>>,
}

fn history_params(query: &HistoryQuery) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if let Some(limit) = query.limit {
        params.push(("limit", limit.to_string()));
    }
    if let Some(ref conversation_id) = query.conversation_id {
        params.push(("conversationId", conversation_id.to_string()));
    }
    if let Some(role) = query.role {
        params.push(("role", role.to_string()));
    }
    if let Some(ref search) = query.search {
        params.push(("search", search.clone()));
    }
    params
}

#[async_trait]
impl HistoryProvider for ZurriClient {
    async fn fetch_history(
        &self,
        agent_id: &str,
        query: &HistoryQuery,
    ) -> Result<Vec<Message>, ApiError> {
        let builder = self
            .request(Method::GET, &format!("/chat/{agent_id}/history"))
            .query(&history_params(query));
        let body: HistoryResponse = self.execute_json(builder).await?;

        debug!(agent_id, count = body.messages.len(), "history fetched");
        Ok(body
            .messages
            .into_iter()
            .map(|m| m.into_message(agent_id))
            .collect())
    }
}

#[async_trait]
impl MessageDispatcher for ZurriClient {
    async fn dispatch(
        &self,
        agent_id: &str,
        request: DispatchRequest,
    ) -> Result<DispatchReply, ApiError> {
        let mut form = Form::new();

        if let Some(text) = request.text {
            form = form.text("message", text);
        }
        if let Some(conversation_id) = request.conversation_id {
            form = form.text("conversationId", conversation_id.to_string());
        }
        if let Some(metadata) = request.metadata {
            form = form.text("metadata", Value::Object(metadata).to_string());
        }

        let file_count = request.attachments.len();
        for file in request.attachments {
            let name = file.name().to_string();
            let mime = file.mime_type().to_string();
            let data = file
                .into_bytes()
                .await
                .map_err(|e| ApiError::File(format!("failed to read {name}: {e}")))?;
            let part = Part::bytes(data)
                .file_name(name)
                .mime_str(&mime)
                .map_err(|e| ApiError::File(e.to_string()))?;
            form = form.part("files", part);
        }

        debug!(agent_id, files = file_count, "dispatching message");
        let builder = self
            .request(Method::POST, &format!("/chat/{agent_id}/message"))
            .multipart(form);
        let body: SendResponse = self.execute_json(builder).await?;

        Ok(DispatchReply {
            reply_text: body.response.unwrap_or_default(),
            conversation_id: body.conversation_id,
            metadata: body.metadata,
        })
    }
}
