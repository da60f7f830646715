//! # Feedback Core
//!
//! Client-side logic for the feedback portal: the public submission form, the moderator's
//! filtered list view and the login gate in front of it.
//!
//! This crate holds state machines and the HTTP gateway only:
//! - [`SubmissionController`] validates and posts new feedback
//! - [`FeedbackView`] loads, filters, renders and deletes entries
//! - [`AccessGate`] and [`AdminLogin`] guard the moderation routes with a stored session token
//!
//! **No presentation concerns**: drawing, prompting and navigation belong to the caller. The core
//! reports through [`Notifier`] and [`Confirm`] and returns navigation decisions as values.

pub mod attachment;
pub mod cancel;
pub mod config;
pub mod constants;
pub mod entry;
pub mod error;
pub mod gate;
pub mod gateway;
pub mod login;
pub mod notify;
pub mod session;
pub mod submission;
pub mod validation;
pub mod view;

#[cfg(test)]
mod test_support;

pub use attachment::{AttachmentKind, AttachmentView, ResolvedAttachment};
pub use cancel::CancelToken;
pub use config::CoreConfig;
pub use entry::{Category, FeedbackEntry, RecordError};
pub use error::{FeedbackError, FeedbackResult};
pub use gate::{AccessGate, GateDecision, GateState, Route};
pub use gateway::{ApiGateway, GatewayError, GatewayResult, HttpGateway, NewFeedback};
pub use login::{AdminLogin, LoginOutcome};
pub use notify::{Confirm, Notification, NotificationLevel, Notifier};
pub use session::{FileSessionStore, MemorySessionStore, SessionStore, SessionToken};
pub use submission::{
    DraftField, DraftUpdate, SubmissionController, SubmissionDraft, SubmissionStatus,
    SubmitOutcome,
};
pub use validation::ValidationError;
pub use view::{
    CategoryFilter, DeleteOutcome, EntryView, FeedbackView, ListView, LoadOutcome, LoadState,
};
