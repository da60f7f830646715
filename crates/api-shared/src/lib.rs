//! # API Shared
//!
//! Wire-level definitions for the feedback backend.
//!
//! Contains:
//! - The JSON shape of a stored feedback record as the backend returns it (`records`)
//! - Login request/response bodies and the bearer header helper (`auth`)
//! - Endpoint paths and multipart field names (`paths`)
//!
//! Nothing in here validates domain invariants; `feedback-core` converts these loose shapes
//! into its own typed model.

pub mod auth;
pub mod paths;
pub mod records;

pub use auth::{bearer_header_value, ErrorBody, LoginReq, LoginRes};
pub use records::FeedbackRecord;
