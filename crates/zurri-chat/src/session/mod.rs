//! Conversation session management.
//!
//! A `ChatSession` owns the chat state for one agent at a time: message
//! history, the composer (text, metadata, staged files), the adopted
//! conversation id, and the lifecycle of the one send that may be in
//! flight. Sends are optimistic: the user's message shows up immediately
//! and is either reconciled against server history or rolled back.

mod manager;
mod send;
mod types;


pub use manager::ChatSession;
pub use types::{SendOutcome, SessionError, StagedInfo, HISTORY_PAGE_SIZE};
