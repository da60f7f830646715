//! Upload-ready attachment built from a local file.

use crate::constants::{
    EXTENSION_MEDIA_TYPES, FALLBACK_MEDIA_TYPE, MAX_UPLOAD_BYTES, PDF_MEDIA_TYPE,
};
use crate::{FilesError, FilesResult};
use feedback_types::NonEmptyText;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

/// A file attached to a feedback draft.
///
/// Holds the full content in memory; the multipart encoder consumes it as-is. Cloning is
/// cheap enough for the sizes allowed by [`MAX_UPLOAD_BYTES`].
#[derive(Clone, PartialEq, Eq)]
pub struct AttachmentUpload {
    file_name: NonEmptyText,
    media_type: NonEmptyText,
    sha256: String,
    bytes: Vec<u8>,
}

impl std::fmt::Debug for AttachmentUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttachmentUpload")
            .field("file_name", &self.file_name)
            .field("media_type", &self.media_type)
            .field("sha256", &self.sha256)
            .field("size_bytes", &self.bytes.len())
            .finish()
    }
}

impl AttachmentUpload {
    /// Reads a file from disk and prepares it for upload.
    ///
    /// # Errors
    ///
    /// Returns `FilesError` if:
    /// - the path is not a regular file or has no usable file name,
    /// - the file is larger than [`MAX_UPLOAD_BYTES`],
    /// - the content is neither an image nor a PDF,
    /// - reading fails (I/O).
    pub fn load(path: &Path) -> FilesResult<Self> {
        let metadata = fs::metadata(path).map_err(|e| {
            FilesError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to stat attachment {}: {}", path.display(), e),
            ))
        })?;

        if !metadata.is_file() {
            return Err(FilesError::InvalidPath(format!(
                "Not a regular file: {}",
                path.display()
            )));
        }

        if metadata.len() > MAX_UPLOAD_BYTES {
            return Err(FilesError::TooLarge {
                size: metadata.len(),
                limit: MAX_UPLOAD_BYTES,
            });
        }

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                FilesError::InvalidPath(format!("No usable file name: {}", path.display()))
            })?;

        let bytes = fs::read(path).map_err(|e| {
            FilesError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read attachment {}: {}", path.display(), e),
            ))
        })?;

        Self::from_bytes(file_name, bytes)
    }

    /// Builds an upload from in-memory content.
    ///
    /// Applies the same size and media-type rules as [`AttachmentUpload::load`].
    pub fn from_bytes(file_name: &str, bytes: Vec<u8>) -> FilesResult<Self> {
        let file_name = NonEmptyText::new(file_name)
            .map_err(|_| FilesError::InvalidPath("attachment file name is empty".into()))?;

        let size = bytes.len() as u64;
        if size > MAX_UPLOAD_BYTES {
            return Err(FilesError::TooLarge {
                size,
                limit: MAX_UPLOAD_BYTES,
            });
        }

        let media_type = detect_media_type(file_name.as_str(), &bytes);
        if !is_accepted(&media_type) {
            return Err(FilesError::UnsupportedMediaType(media_type));
        }

        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let sha256 = hex::encode(hasher.finalize());

        tracing::debug!(
            file_name = file_name.as_str(),
            media_type = media_type.as_str(),
            size,
            sha256 = sha256.as_str(),
            "prepared attachment"
        );

        Ok(Self {
            file_name,
            media_type: NonEmptyText::new(&media_type)
                .map_err(|_| FilesError::UnsupportedMediaType(media_type.clone()))?,
            sha256,
            bytes,
        })
    }

    pub fn file_name(&self) -> &str {
        self.file_name.as_str()
    }

    pub fn media_type(&self) -> &str {
        self.media_type.as_str()
    }

    /// Lowercase hex SHA-256 of the content.
    pub fn sha256(&self) -> &str {
        &self.sha256
    }

    pub fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Magic bytes first, then extension, then the generic fallback.
fn detect_media_type(file_name: &str, bytes: &[u8]) -> String {
    if let Some(kind) = infer::get(bytes) {
        return kind.mime_type().to_string();
    }

    let extension = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    extension
        .and_then(|ext| {
            EXTENSION_MEDIA_TYPES
                .iter()
                .find(|(known, _)| *known == ext)
                .map(|(_, mime)| (*mime).to_string())
        })
        .unwrap_or_else(|| FALLBACK_MEDIA_TYPE.to_string())
}

fn is_accepted(media_type: &str) -> bool {
    media_type.starts_with("image/") || media_type == PDF_MEDIA_TYPE
}
