//! Endpoint paths and multipart field names used by the backend.

/// Collection endpoint: `GET` lists, `POST` creates.
pub const FEEDBACK_PATH: &str = "/api/feedback";

/// Admin login endpoint.
pub const ADMIN_LOGIN_PATH: &str = "/api/admin/login";

/// Multipart field names for `POST /api/feedback`.
pub mod fields {
    pub const NAME: &str = "name";
    pub const EMAIL: &str = "email";
    pub const PHONE: &str = "phone";
    pub const CATEGORY: &str = "category";
    pub const BODY: &str = "feedbackText";
    pub const ANONYMOUS: &str = "anonymous";
    pub const FILE: &str = "file";
}
