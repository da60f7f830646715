use serde::{Deserialize, Serialize};

/// Body of `POST /api/admin/login`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginReq {
    pub password: String,
}

/// Successful login response. The token is opaque to the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginRes {
    pub token: String,
}

/// Error body the backend attaches to non-2xx responses, when it attaches one at all.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

/// Formats a session token as an `Authorization` header value.
pub fn bearer_header_value(token: &str) -> String {
    format!("Bearer {token}")
}
