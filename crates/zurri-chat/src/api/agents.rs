//! Agent catalogue endpoints, plus creator and admin management.

use chrono::{DateTime, Utc};
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::attachment::FileSelection;
use crate::error::ApiError;

use super::client::ZurriClient;

/// Listing status. Only approved agents can be chatted with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    Pending,
    Approved,
    Rejected,
    Suspended,
}

/// A marketplace-listed agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub reputation: f64,
    #[serde(default)]
    pub capabilities: Vec<String>,
    #[serde(default)]
    pub points_per_task: u64,
    #[serde(default)]
    pub price: f64,
    pub status: AgentStatus,
    #[serde(default)]
    pub usage_count: u64,
    #[serde(default)]
    pub rating_count: u64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub creator_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AgentList {
    pub agents: Vec<Agent>,
    #[serde(default)]
    pub pagination: Pagination,
}

/// Catalogue filters; unset fields are left to the backend's defaults.
#[derive(Debug, Clone, Default)]
pub struct AgentQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub category: Option<String>,
    pub search: Option<String>,
    pub min_reputation: Option<f64>,
}

impl AgentQuery {
    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(page) = self.page {
            params.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some(ref category) = self.category {
            params.push(("category", category.clone()));
        }
        if let Some(ref search) = self.search {
            params.push(("search", search.clone()));
        }
        if let Some(min) = self.min_reputation {
            params.push(("minReputation", min.to_string()));
        }
        params
    }
}

/// A new listing. It enters the catalogue as `pending` until an admin
/// approves it.
#[derive(Debug, Clone)]
pub struct NewAgent {
    pub name: String,
    pub description: String,
    /// Where the backend forwards chat messages for this agent.
    pub endpoint: String,
    pub points_per_task: u64,
    pub category: Option<String>,
    pub capabilities: Vec<String>,
    pub avatar: Option<FileSelection>,
}

/// Partial update of a listing; unset fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct AgentUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub endpoint: Option<String>,
    pub points_per_task: Option<u64>,
    pub category: Option<String>,
    pub capabilities: Option<Vec<String>>,
    pub avatar: Option<FileSelection>,
}

impl From<NewAgent> for AgentUpdate {
    fn from(agent: NewAgent) -> Self {
        Self {
            name: Some(agent.name),
            description: Some(agent.description),
            endpoint: Some(agent.endpoint),
            points_per_task: Some(agent.points_per_task),
            category: agent.category,
            capabilities: Some(agent.capabilities),
            avatar: agent.avatar,
        }
    }
}

impl AgentUpdate {
    /// Multipart body. Capabilities travel as a JSON array string.
    async fn into_form(self) -> Result<Form, ApiError> {
        let mut form = Form::new();
        let text_fields = [
            ("name", self.name),
            ("description", self.description),
            ("endpoint", self.endpoint),
            ("pointsPerTask", self.points_per_task.map(|p| p.to_string())),
            ("category", self.category),
        ];
        for (key, value) in text_fields {
            if let Some(value) = value {
                form = form.text(key, value);
            }
        }
        if let Some(capabilities) = self.capabilities {
            let json = serde_json::to_string(&capabilities)
                .map_err(|e| ApiError::Parse(e.to_string()))?;
            form = form.text("capabilities", json);
        }
        if let Some(avatar) = self.avatar {
            let name = avatar.name().to_string();
            let mime = avatar.mime_type().to_string();
            let data = avatar
                .into_bytes()
                .await
                .map_err(|e| ApiError::File(format!("failed to read {name}: {e}")))?;
            let part = Part::bytes(data)
                .file_name(name)
                .mime_str(&mime)
                .map_err(|e| ApiError::File(e.to_string()))?;
            form = form.part("avatar", part);
        }
        Ok(form)
    }
}

impl ZurriClient {
    pub async fn list_agents(&self, query: &AgentQuery) -> Result<AgentList, ApiError> {
        let builder = self.request(Method::GET, "/agents").query(&query.params());
        self.execute_json(builder).await
    }

    pub async fn agent(&self, id: &str) -> Result<Agent, ApiError> {
        self.execute_json(self.request(Method::GET, &format!("/agents/{id}")))
            .await
    }

    /// Listings owned by the current user, in any status.
    pub async fn my_agents(&self) -> Result<Vec<Agent>, ApiError> {
        self.execute_json(self.request(Method::GET, "/agents/my/list"))
            .await
    }

    pub async fn create_agent(&self, agent: NewAgent) -> Result<Agent, ApiError> {
        let form = AgentUpdate::from(agent).into_form().await?;
        self.execute_json(self.request(Method::POST, "/agents").multipart(form))
            .await
    }

    pub async fn update_agent(&self, id: &str, update: AgentUpdate) -> Result<Agent, ApiError> {
        let form = update.into_form().await?;
        self.execute_json(
            self.request(Method::PUT, &format!("/agents/{id}"))
                .multipart(form),
        )
        .await
    }

    pub async fn delete_agent(&self, id: &str) -> Result<(), ApiError> {
        self.execute(self.request(Method::DELETE, &format!("/agents/{id}")))
            .await?;
        debug!(agent_id = id, "agent deleted");
        Ok(())
    }

    /// Hide a listing from the catalogue without deleting it.
    pub async fn delist_agent(&self, id: &str) -> Result<Agent, ApiError> {
        self.patch_agent(id, "delist").await
    }

    pub async fn relist_agent(&self, id: &str) -> Result<Agent, ApiError> {
        self.patch_agent(id, "relist").await
    }

    /// Listings awaiting review. Admin only.
    pub async fn pending_agents(&self) -> Result<Vec<Agent>, ApiError> {
        self.execute_json(self.request(Method::GET, "/agents/admin/pending"))
            .await
    }

    pub async fn approve_agent(&self, id: &str) -> Result<Agent, ApiError> {
        self.patch_agent(id, "approve").await
    }

    pub async fn reject_agent(&self, id: &str) -> Result<Agent, ApiError> {
        self.patch_agent(id, "reject").await
    }

    async fn patch_agent(&self, id: &str, action: &str) -> Result<Agent, ApiError> {
        self.execute_json(self.request(Method::PATCH, &format!("/agents/{id}/{action}")))
            .await
    }
}
