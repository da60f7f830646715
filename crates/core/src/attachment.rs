//! Attachment resolution.
//!
//! Stored entries reference their uploaded file either by absolute URL or by a path relative to
//! the backend. [`resolve`] turns that reference into something a renderer can use directly, and
//! [`AttachmentView`] captures how the list view must present it.

use crate::constants::DOCUMENT_LINK_LABEL;

/// Extensions rendered inline as images (matched case-insensitively).
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "webp"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    Image,
    Document,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAttachment {
    pub url: String,
    pub kind: AttachmentKind,
}

/// How the list view presents an attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachmentView {
    /// Render inline. A failed load hides the image instead of showing a broken placeholder.
    InlineImage { url: String, hide_on_error: bool },
    /// Render as a labelled link that opens externally.
    ExternalLink { url: String, label: &'static str },
}

impl ResolvedAttachment {
    pub fn view(&self) -> AttachmentView {
        match self.kind {
            AttachmentKind::Image => AttachmentView::InlineImage {
                url: self.url.clone(),
                hide_on_error: true,
            },
            AttachmentKind::Document => AttachmentView::ExternalLink {
                url: self.url.clone(),
                label: DOCUMENT_LINK_LABEL,
            },
        }
    }
}

/// Resolve a stored file reference against the backend base URL.
///
/// Absolute `http`/`https` references pass through untouched. Anything else is joined onto
/// `api_base` with exactly one `/` between the two, whatever slashes either side carries.
pub fn resolve(api_base: &str, reference: &str) -> ResolvedAttachment {
    let reference = reference.trim();
    let url = if is_absolute_url(reference) {
        reference.to_string()
    } else {
        format!(
            "{}/{}",
            api_base.trim().trim_end_matches('/'),
            reference.trim_start_matches('/')
        )
    };

    let kind = classify(&url);
    ResolvedAttachment { url, kind }
}

fn is_absolute_url(reference: &str) -> bool {
    let lower = reference.get(..8).unwrap_or(reference).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Image when the path's extension is a known image extension; query and fragment are ignored.
pub fn classify(url: &str) -> AttachmentKind {
    let path = url
        .split(['?', '#'])
        .next()
        .unwrap_or(url);
    let file_name = path.rsplit('/').next().unwrap_or(path);

    let is_image = file_name
        .rsplit_once('.')
        .map(|(_, ext)| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false);

    if is_image {
        AttachmentKind::Image
    } else {
        AttachmentKind::Document
    }
}
