//! Media storage for recorded assessment attempts.
//!
//! Recordings arrive base64 encoded inside the submission body. They are
//! written under a fixed naming scheme and referenced from the `Results`
//! table by link.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Errors that can occur while storing media.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    /// The payload is not valid base64.
    #[error("invalid media payload: {0}")]
    Decode(#[from] base64::DecodeError),

    /// Writing the file failed.
    #[error("failed to store media: {0}")]
    Io(#[from] std::io::Error),
}

/// Kind of recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// Camera recording.
    Video,
    /// Microphone recording.
    Audio,
}

impl MediaKind {
    fn tag(self) -> &'static str {
        match self {
            Self::Video => "Vid",
            Self::Audio => "Aud",
        }
    }
}

/// File name for one recording: `{trainee}_M{module}_{Vid|Aud}_{attempt}.webm`.
///
/// Path separators in the trainee name or module are replaced so the file
/// always lands directly in the media directory.
#[must_use]
pub fn media_filename(trainee_name: &str, module: &str, kind: MediaKind, attempt: usize) -> String {
    let name = format!("{trainee_name}_M{module}_{}_{attempt}.webm", kind.tag());
    name.chars()
        .map(|c| if matches!(c, '/' | '\\' | '\0') { '_' } else { c })
        .collect()
}

/// Decode a base64 payload, accepting an optional `data:...;base64,` prefix.
///
/// # Errors
///
/// Returns an error if the payload is not valid base64.
pub fn decode_payload(data: &str) -> Result<Vec<u8>, MediaError> {
    let encoded = match data.split_once(',') {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => data,
    };
    Ok(STANDARD.decode(encoded.trim())?)
}

/// Where recordings are stored.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Store `bytes` under `filename` and return the public link.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    async fn put(&self, filename: &str, bytes: Vec<u8>) -> Result<String, MediaError>;
}

/// Media written to a local directory and served under `/uploads`.
#[derive(Debug, Clone)]
pub struct LocalMediaStore {
    root: PathBuf,
}

impl LocalMediaStore {
    /// Store media under `root`. The directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The media directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    async fn put(&self, filename: &str, bytes: Vec<u8>) -> Result<String, MediaError> {
        tokio::fs::create_dir_all(&self.root).await?;
        tokio::fs::write(self.root.join(filename), &bytes).await?;
        tracing::debug!(file = %filename, bytes = bytes.len(), "Stored media");
        Ok(format!("/uploads/{filename}"))
    }
}
