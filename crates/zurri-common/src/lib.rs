pub mod errors;
pub mod events;
pub mod id;

pub use errors::{ConfigError, ZurriError};
pub use events::{Event, EventBus};
pub use id::{new_correlation_id, ConversationId};

pub type Result<T> = std::result::Result<T, ZurriError>;
