//! Client struct, request building, and status mapping.

use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use zurri_common::new_correlation_id;

use crate::error::ApiError;

use super::auth::AuthContext;
use super::config::ClientConfig;

/// Marketplace REST client.
pub struct ZurriClient {
    pub(crate) config: ClientConfig,
    pub(crate) auth: AuthContext,
    pub(crate) http: reqwest::Client,
}

impl ZurriClient {
    pub fn new(config: ClientConfig, auth: AuthContext) -> Self {
        Self {
            http: reqwest::Client::builder()
                .connect_timeout(config.connect_timeout)
                .timeout(config.request_timeout)
                .build()
                .expect("failed to build HTTP client"),
            config,
            auth,
        }
    }

    pub fn auth(&self) -> &AuthContext {
        &self.auth
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Start a request, attaching the bearer token when there is one.
    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match self.auth.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a request and map any non-2xx status to an `ApiError`.
    pub(crate) async fn execute(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let request = builder
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let request_id = new_correlation_id();
        debug!(
            %request_id,
            method = %request.method(),
            url = %request.url(),
            "API request"
        );

        let response = self
            .http
            .execute(request)
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        debug!(%request_id, status = status.as_u16(), "API response");
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(error_from_response(status.as_u16(), &body))
    }

    pub(crate) async fn execute_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, ApiError> {
        self.execute(builder)
            .await?
            .json::<T>()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }
}

/// Map an error status and its body to an `ApiError`.
///
/// The backend reports `{ "error": "...", "details": { ... } }`; for 402 the
/// details carry `required` (points) and an optional `message`.
pub(crate) fn error_from_response(status: u16, body: &str) -> ApiError {
    let json: Value = serde_json::from_str(body).unwrap_or(Value::Null);
    match status {
        401 => ApiError::Unauthenticated,
        402 => {
            let details = &json["details"];
            let required = details["required"]
                .as_u64()
                .or_else(|| details["required"].as_f64().map(|p| p.ceil() as u64))
                .unwrap_or(0);
            ApiError::InsufficientBalance {
                required,
                message: details["message"].as_str().map(String::from),
            }
        }
        404 => ApiError::NotFound,
        _ => ApiError::Http {
            status,
            message: json["error"]
                .as_str()
                .or_else(|| json["message"].as_str())
                .map(String::from),
        },
    }
}
