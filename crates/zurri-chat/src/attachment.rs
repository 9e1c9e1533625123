//! Files selected for upload and the staging entries that hold them.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::ChatError;
use crate::preview::{PreviewHandle, PreviewRegistry};

/// Most attachments a single send may carry.
pub const MAX_ATTACHMENTS: usize = 10;

/// Largest accepted attachment, in bytes (10 MiB).
pub const MAX_ATTACHMENT_BYTES: u64 = 10 * 1024 * 1024;

const DEFAULT_MIME: &str = "application/octet-stream";

#[derive(Clone)]
enum FileSource {
    Memory(Vec<u8>),
    Disk(PathBuf),
}

/// A user-selected file. Disk-backed selections are only read when the
/// message is dispatched, so oversized files are rejected without loading
/// them.
#[derive(Clone)]
pub struct FileSelection {
    name: String,
    mime_type: String,
    byte_size: u64,
    source: FileSource,
}

impl FileSelection {
    pub fn from_bytes(name: impl Into<String>, mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            byte_size: data.len() as u64,
            source: FileSource::Memory(data),
        }
    }

    /// Select a file on disk. The mime type is inferred from the extension.
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let meta = tokio::fs::metadata(path).await?;
        if !meta.is_file() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("{} is not a regular file", path.display()),
            ));
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self {
            mime_type: mime_for_name(&name).to_string(),
            name,
            byte_size: meta.len(),
            source: FileSource::Disk(path.to_path_buf()),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn byte_size(&self) -> u64 {
        self.byte_size
    }

    /// Load the file contents for upload.
    pub async fn into_bytes(self) -> std::io::Result<Vec<u8>> {
        match self.source {
            FileSource::Memory(data) => Ok(data),
            FileSource::Disk(path) => tokio::fs::read(&path).await,
        }
    }
}

impl fmt::Debug for FileSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileSelection")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("byte_size", &self.byte_size)
            .finish()
    }
}

/// Guess a mime type from a file name's extension.
pub fn mime_for_name(name: &str) -> &'static str {
    let ext = match name.rsplit_once('.') {
        Some((_, ext)) => ext.to_ascii_lowercase(),
        None => return DEFAULT_MIME,
    };
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "m4a" => "audio/mp4",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "pdf" => "application/pdf",
        "json" => "application/json",
        "zip" => "application/zip",
        "txt" | "log" => "text/plain",
        "md" => "text/markdown",
        "csv" => "text/csv",
        "html" | "htm" => "text/html",
        _ => DEFAULT_MIME,
    }
}

/// A file waiting in the composer, plus its preview if it has one.
#[derive(Debug)]
pub struct StagedAttachment {
    file: FileSelection,
    preview: Option<PreviewHandle>,
}

impl StagedAttachment {
    pub(crate) fn new(file: FileSelection, previews: &PreviewRegistry) -> Self {
        let preview = previews.create(file.name(), file.mime_type());
        Self { file, preview }
    }

    pub fn file(&self) -> &FileSelection {
        &self.file
    }

    pub fn preview_uri(&self) -> Option<&str> {
        self.preview.as_ref().map(PreviewHandle::uri)
    }

    /// Release the preview and hand back the file for upload.
    pub(crate) fn into_file(self) -> FileSelection {
        let StagedAttachment { file, preview } = self;
        drop(preview);
        file
    }
}

/// All-or-nothing admission check for a batch of new files.
pub(crate) fn check_batch(already_staged: usize, files: &[FileSelection]) -> Result<(), ChatError> {
    if already_staged + files.len() > MAX_ATTACHMENTS {
        return Err(ChatError::too_many_files());
    }

    let oversized: Vec<String> = files
        .iter()
        .filter(|f| f.byte_size() > MAX_ATTACHMENT_BYTES)
        .map(|f| f.name().to_string())
        .collect();
    if !oversized.is_empty() {
        return Err(ChatError::files_too_large(oversized));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, size: usize) -> FileSelection {
        FileSelection::from_bytes(name, mime_for_name(name), vec![0u8; size])
    }

    #[test]
    fn mime_guessing() {
        assert_eq!(mime_for_name("photo.JPG"), "image/jpeg");
        assert_eq!(mime_for_name("clip.webm"), "video/webm");
        assert_eq!(mime_for_name("Makefile"), "application/octet-stream");
        assert_eq!(mime_for_name("archive.tar.zst"), "application/octet-stream");
    }

    #[test]
    fn batch_at_capacity_is_accepted() {
        let files: Vec<_> = (0..4).map(|i| file(&format!("{i}.txt"), 1)).collect();
        assert!(check_batch(6, &files).is_ok());
    }

    #[test]
    fn batch_over_capacity_is_rejected() {
        let files: Vec<_> = (0..5).map(|i| file(&format!("{i}.txt"), 1)).collect();
        assert_eq!(check_batch(6, &files), Err(ChatError::too_many_files()));
    }

    #[test]
    fn exact_limit_size_is_accepted() {
        let files = vec![file("edge.bin", MAX_ATTACHMENT_BYTES as usize)];
        assert!(check_batch(0, &files).is_ok());
    }

    #[test]
    fn oversized_files_are_all_named() {
        let files = vec![
            file("ok.txt", 10),
            file("big1.bin", MAX_ATTACHMENT_BYTES as usize + 1),
            file("big2.bin", MAX_ATTACHMENT_BYTES as usize + 1),
        ];
        match check_batch(0, &files) {
            Err(ChatError::FilesTooLarge { files, .. }) => {
                assert_eq!(files, vec!["big1.bin".to_string(), "big2.bin".to_string()]);
            }
            other => panic!("expected size error, got {other:?}"),
        }
    }

    #[test]
    fn into_file_releases_preview() {
        let registry = PreviewRegistry::new();
        let staged = StagedAttachment::new(file("pic.png", 4), &registry);
        assert!(staged.preview_uri().is_some());
        assert_eq!(registry.live_count(), 1);

        let file = staged.into_file();
        assert_eq!(file.name(), "pic.png");
        assert_eq!(registry.live_count(), 0);
    }

    #[tokio::test]
    async fn from_path_reads_lazily() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.md");
        std::fs::write(&path, b"# hello").unwrap();

        let selection = FileSelection::from_path(&path).await.unwrap();
        assert_eq!(selection.name(), "notes.md");
        assert_eq!(selection.mime_type(), "text/markdown");
        assert_eq!(selection.byte_size(), 7);
        assert_eq!(selection.into_bytes().await.unwrap(), b"# hello");
    }

    #[tokio::test]
    async fn from_path_rejects_directories() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FileSelection::from_path(dir.path()).await.is_err());
    }
}
