//! Abandonment flag for in-flight operations.
//!
//! Requests are never aborted on the wire. Instead each controller owns a [`CancelToken`]; once
//! the consuming view is torn down the token is set and any response that arrives afterwards
//! is dropped without touching state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
