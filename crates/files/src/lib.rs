//! Feedback attachment loading
//!
//! This crate turns a path on the local filesystem into an [`AttachmentUpload`]: the bytes,
//! the original file name, a best-effort media type and a SHA-256 digest, ready to be placed
//! into the multipart body of a feedback submission.
//!
//! ## Rules
//!
//! - Only images (`image/*`) and PDF documents are accepted
//! - Files larger than [`MAX_UPLOAD_BYTES`] are rejected before being read into memory
//! - Media type detection uses magic bytes first, then the file extension
//!
//! ## Example Usage
//!
//! ```no_run
//! use feedback_files::AttachmentUpload;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let upload = AttachmentUpload::load(Path::new("photos/leak.jpg"))?;
//! println!("{} ({} bytes)", upload.file_name(), upload.size_bytes());
//! # Ok(())
//! # }
//! ```

mod constants;
mod upload;

pub use constants::{FALLBACK_MEDIA_TYPE, MAX_UPLOAD_BYTES, PDF_MEDIA_TYPE};
pub use upload::AttachmentUpload;

/// Errors that can occur while preparing an attachment
#[derive(Debug, thiserror::Error)]
pub enum FilesError {
    /// Path does not name a regular file
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// File exceeds the upload limit
    #[error("File is too large: {size} bytes (limit {limit} bytes)")]
    TooLarge { size: u64, limit: u64 },

    /// File is neither an image nor a PDF
    #[error("Unsupported attachment type: {0}")]
    UnsupportedMediaType(String),

    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type FilesResult<T> = Result<T, FilesError>;
