//! Credentials and the auth endpoints.

use std::fmt;
use std::path::Path;

use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiError;

use super::client::ZurriClient;

/// Environment variable consulted first for a bearer token.
pub const TOKEN_ENV_VAR: &str = "ZURRI_TOKEN";

/// A marketplace account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(alias = "_id")]
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub is_creator: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatorUpgrade {
    #[serde(default)]
    pub message: Option<String>,
    pub user: User,
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

/// Who the client is acting for. Passed explicitly to the client rather
/// than looked up from ambient state.
#[derive(Clone, Default)]
pub struct AuthContext {
    token: Option<String>,
    user: Option<User>,
}

impl fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthContext")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("user", &self.user)
            .finish()
    }
}

impl AuthContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            user: None,
        }
    }

    pub fn with_user(mut self, user: User) -> Self {
        self.user = Some(user);
        self
    }

    /// Resolve a token.
    ///
    /// Resolution order:
    /// 1. `ZURRI_TOKEN` env var
    /// 2. the token file written by `zurri login`
    pub fn from_env(token_file: Option<&Path>) -> Self {
        if let Ok(token) = std::env::var(TOKEN_ENV_VAR) {
            if !token.trim().is_empty() {
                return Self::with_token(token.trim());
            }
        }

        if let Some(path) = token_file {
            if let Ok(data) = std::fs::read_to_string(path) {
                let token = data.trim();
                if !token.is_empty() {
                    debug!("using token from {}", path.display());
                    return Self::with_token(token);
                }
            }
        }

        Self::anonymous()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

impl From<&AuthResponse> for AuthContext {
    fn from(response: &AuthResponse) -> Self {
        AuthContext::with_token(response.token.clone()).with_user(response.user.clone())
    }
}

impl ZurriClient {
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let body = Credentials {
            email,
            password,
            name: None,
        };
        self.execute_json(self.request(Method::POST, "/auth/login").json(&body))
            .await
    }

    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<AuthResponse, ApiError> {
        let body = Credentials {
            email,
            password,
            name,
        };
        self.execute_json(self.request(Method::POST, "/auth/register").json(&body))
            .await
    }

    /// Upgrade the current account so it can list agents.
    pub async fn become_creator(&self) -> Result<CreatorUpgrade, ApiError> {
        if !self.auth.is_authenticated() {
            return Err(ApiError::Unauthenticated);
        }
        let upgrade: CreatorUpgrade = self
            .execute_json(self.request(Method::POST, "/users/me/become-creator"))
            .await?;
        debug!(user_id = %upgrade.user.id, "account upgraded to creator");
        Ok(upgrade)
    }

    pub async fn current_user(&self) -> Result<User, ApiError> {
        if !self.auth.is_authenticated() {
            return Err(ApiError::Unauthenticated);
        }
        self.execute_json(self.request(Method::GET, "/auth/me"))
            .await
    }
}
