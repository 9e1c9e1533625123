//! Revocable local previews for staged media files.
//!
//! A `PreviewHandle` is owned by exactly one staging entry. Dropping the
//! handle revokes it, so every path that discards a staged file (unstage,
//! send, session teardown) releases its preview without extra bookkeeping.

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use uuid::Uuid;

type LiveSet = Arc<Mutex<HashSet<Uuid>>>;

/// Whether files of this mime type get an eager local preview.
pub fn supports_preview(mime_type: &str) -> bool {
    ["image/", "audio/", "video/"]
        .iter()
        .any(|prefix| mime_type.starts_with(prefix))
}

/// Issues preview handles and tracks which ones are still live.
#[derive(Clone, Default)]
pub struct PreviewRegistry {
    live: LiveSet,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a preview for a media file. Returns `None` for other types.
    pub fn create(&self, name: &str, mime_type: &str) -> Option<PreviewHandle> {
        if !supports_preview(mime_type) {
            return None;
        }
        let id = Uuid::new_v4();
        self.live
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id);
        Some(PreviewHandle {
            id,
            uri: format!("preview://{id}/{name}"),
            live: Arc::clone(&self.live),
        })
    }

    /// Number of previews created and not yet revoked.
    pub fn live_count(&self) -> usize {
        self.live
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_live(&self, handle_id: Uuid) -> bool {
        self.live
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&handle_id)
    }
}

impl fmt::Debug for PreviewRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreviewRegistry")
            .field("live", &self.live_count())
            .finish()
    }
}

/// A live local preview. Revoked on drop.
pub struct PreviewHandle {
    id: Uuid,
    uri: String,
    live: LiveSet,
}

impl PreviewHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }
}

impl fmt::Debug for PreviewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PreviewHandle").field(&self.uri).finish()
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.live
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.id);
        tracing::trace!(uri = %self.uri, "preview revoked");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_media_types_get_previews() {
        let registry = PreviewRegistry::new();
        assert!(registry.create("a.png", "image/png").is_some());
        assert!(registry.create("a.mp3", "audio/mpeg").is_some());
        assert!(registry.create("a.mp4", "video/mp4").is_some());
        assert!(registry.create("a.pdf", "application/pdf").is_none());
        assert!(registry.create("a.txt", "text/plain").is_none());
    }

    #[test]
    fn dropping_handle_revokes_it() {
        let registry = PreviewRegistry::new();
        let handle = registry.create("cat.jpg", "image/jpeg").unwrap();
        let id = handle.id();
        assert!(registry.is_live(id));
        assert_eq!(registry.live_count(), 1);
        assert!(handle.uri().starts_with("preview://"));
        assert!(handle.uri().ends_with("/cat.jpg"));

        drop(handle);
        assert!(!registry.is_live(id));
        assert_eq!(registry.live_count(), 0);
    }

    #[test]
    fn clones_share_the_live_set() {
        let registry = PreviewRegistry::new();
        let other = registry.clone();
        let _a = registry.create("a.png", "image/png").unwrap();
        let _b = other.create("b.png", "image/png").unwrap();
        assert_eq!(registry.live_count(), 2);
        assert_eq!(other.live_count(), 2);
    }
}
