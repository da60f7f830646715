//! Constants used throughout the feedback core crate.
//!
//! Route paths, storage keys and the user-visible messages live here so the rendering layer
//! and the tests agree on them.

/// Backend base URL used when `FEEDBACK_API_BASE_URL` is not set.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";

/// Session file used when `FEEDBACK_SESSION_FILE` is not set.
pub const DEFAULT_SESSION_FILE: &str = ".feedback/session.json";

/// Key under which the moderator token is kept in the durable session store.
pub const SESSION_TOKEN_KEY: &str = "adminToken";

/// Route path of the public submission form.
pub const SUBMIT_PATH: &str = "/feedback/submit";

/// Route path of the protected moderation view.
pub const VIEW_PATH: &str = "/feedback/view";

/// Route path of the login entry point.
pub const LOGIN_PATH: &str = "/admin-login";

/// Category filter value meaning "no category restriction".
pub const ALL_CATEGORIES: &str = "All";

/// Prompt shown before a delete is sent.
pub const DELETE_CONFIRM_PROMPT: &str = "Are you sure you want to delete this feedback?";

pub const SUBMIT_SUCCESS_MESSAGE: &str = "Feedback submitted successfully!";
pub const SUBMIT_FAILURE_MESSAGE: &str = "Submission failed. Try again.";
pub const LOAD_FAILURE_MESSAGE: &str = "Failed to fetch feedback";
pub const DELETE_SUCCESS_MESSAGE: &str = "Feedback deleted";
pub const DELETE_FAILURE_MESSAGE: &str = "Failed to delete feedback";
pub const LOGIN_SUCCESS_MESSAGE: &str = "Login successful!";
pub const LOGIN_FAILURE_MESSAGE: &str = "Login failed";
pub const NETWORK_ERROR_MESSAGE: &str = "Network error";
pub const PASSWORD_REQUIRED_MESSAGE: &str = "Please enter the admin password.";

/// Shown in place of a missing name, email or date.
pub const NOT_AVAILABLE: &str = "N/A";
pub const ANONYMOUS_NAME: &str = "Anonymous";
pub const HIDDEN_EMAIL: &str = "Hidden";

/// Label of the link rendered for non-image attachments.
pub const DOCUMENT_LINK_LABEL: &str = "View Attached File";
