//! Presentation collaborators the core calls into.
//!
//! The core never renders anything itself. It reports outcomes through a [`Notifier`] (toast
//! messages) and asks a [`Confirm`] implementation before destructive actions.

use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

/// A user-visible message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

/// Renders notifications (toasts, status lines, ...).
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Yes/no gate in front of destructive operations.
#[async_trait]
pub trait Confirm: Send + Sync {
    async fn confirm(&self, prompt: &str) -> bool;
}
