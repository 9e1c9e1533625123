//! Chat engine for the Zurri agent marketplace.
//!
//! Provides:
//! - A REST client for the marketplace backend (auth, agents, wallet, chat)
//! - The conversation session manager: history loading, attachment
//!   staging, optimistic sends with rollback, and error classification
//! - Revocable local previews for staged media files

pub mod api;
pub mod attachment;
pub mod error;
pub mod message;
pub mod metadata;
pub mod preview;
pub mod session;

pub use api::{
    AuthContext, ClientConfig, DispatchReply, DispatchRequest, HistoryProvider, HistoryQuery,
    MessageDispatcher, ZurriClient,
};
pub use attachment::{FileSelection, StagedAttachment, MAX_ATTACHMENTS, MAX_ATTACHMENT_BYTES};
pub use error::{ApiError, ChatError, SendFailure};
pub use message::{Message, MessageId, RemoteAttachment, Role};
pub use preview::{PreviewHandle, PreviewRegistry};
pub use session::{ChatSession, SendOutcome, SessionError, StagedInfo, HISTORY_PAGE_SIZE};
