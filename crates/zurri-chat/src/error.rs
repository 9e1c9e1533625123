//! Error types for the chat engine.
//!
//! `ChatError` covers local, pre-dispatch validation. `ApiError` is what
//! the backend (or the transport) reports. `SendFailure` is the classified
//! form of an `ApiError` that the session surfaces to the user.

use zurri_common::ZurriError;

use crate::attachment::{MAX_ATTACHMENTS, MAX_ATTACHMENT_BYTES};

/// USD value of one wallet point.
pub const POINT_VALUE_USD: f64 = 0.05;

pub(crate) const DEFAULT_SEND_ERROR: &str = "Failed to send message";

/// Local validation failures. None of these ever touch the message list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChatError {
    #[error("Maximum {max} files allowed")]
    TooManyFiles { max: usize },

    #[error("Some files exceed {}MB limit: {}", .limit_mb, .files.join(", "))]
    FilesTooLarge { files: Vec<String>, limit_mb: u64 },

    #[error("Invalid metadata: {0}")]
    InvalidMetadata(String),
}

impl ChatError {
    pub(crate) fn too_many_files() -> Self {
        ChatError::TooManyFiles {
            max: MAX_ATTACHMENTS,
        }
    }

    pub(crate) fn files_too_large(files: Vec<String>) -> Self {
        ChatError::FilesTooLarge {
            files,
            limit_mb: MAX_ATTACHMENT_BYTES / (1024 * 1024),
        }
    }
}

/// Failures reported by the marketplace backend or the HTTP transport.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("Authentication required")]
    Unauthenticated,

    #[error("Not found")]
    NotFound,

    #[error("Insufficient balance: {required} points required")]
    InsufficientBalance {
        required: u64,
        message: Option<String>,
    },

    #[error("HTTP {status}: {}", .message.as_deref().unwrap_or("request failed"))]
    Http { status: u16, message: Option<String> },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("File error: {0}")]
    File(String),
}

/// The classified outcome of a failed dispatch, as shown to the user.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SendFailure {
    #[error("{message}")]
    InsufficientBalance { required: u64, message: String },

    #[error("Agent not found")]
    NotFound,

    #[error("Authentication required")]
    Unauthenticated,

    #[error("{0}")]
    Other(String),
}

impl SendFailure {
    /// Whether a synthetic assistant message should be added to the thread.
    pub fn shows_in_thread(&self) -> bool {
        matches!(self, SendFailure::NotFound | SendFailure::Other(_))
    }
}

impl From<ApiError> for SendFailure {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::InsufficientBalance { required, message } => {
                SendFailure::InsufficientBalance {
                    required,
                    message: message.unwrap_or_else(|| insufficient_balance_text(required)),
                }
            }
            ApiError::NotFound => SendFailure::NotFound,
            ApiError::Unauthenticated => SendFailure::Unauthenticated,
            ApiError::Http { message, .. } => {
                SendFailure::Other(message.unwrap_or_else(|| DEFAULT_SEND_ERROR.to_string()))
            }
            ApiError::File(detail) => SendFailure::Other(detail),
            ApiError::Network(_) | ApiError::Parse(_) => {
                SendFailure::Other(DEFAULT_SEND_ERROR.to_string())
            }
        }
    }
}

/// Fallback text when the backend's 402 carries no message of its own.
pub fn insufficient_balance_text(required: u64) -> String {
    let usd = required as f64 * POINT_VALUE_USD;
    format!("Insufficient balance. You need {required} points (${usd:.2}).")
}

impl From<ApiError> for ZurriError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unauthenticated => ZurriError::Auth(err.to_string()),
            other => ZurriError::Api(other.to_string()),
        }
    }
}

impl From<ChatError> for ZurriError {
    fn from(err: ChatError) -> Self {
        ZurriError::Chat(err.to_string())
    }
}
