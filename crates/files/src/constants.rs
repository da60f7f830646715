/// Largest attachment accepted for upload (10 MiB).
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Media type used when detection fails entirely.
pub const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

/// Media type accepted alongside `image/*`.
pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// Extension fallbacks for files whose magic bytes `infer` does not recognise.
pub(crate) const EXTENSION_MEDIA_TYPES: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("bmp", "image/bmp"),
    ("webp", "image/webp"),
    ("svg", "image/svg+xml"),
    ("pdf", PDF_MEDIA_TYPE),
];
