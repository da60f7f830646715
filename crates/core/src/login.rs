//! Moderator login.
//!
//! Exchanges the moderator password for a session token and stores it, so the Access Gate
//! unlocks. Navigation is returned to the caller as data rather than performed here.

use crate::cancel::CancelToken;
use crate::constants::{
    LOGIN_FAILURE_MESSAGE, LOGIN_SUCCESS_MESSAGE, NETWORK_ERROR_MESSAGE, PASSWORD_REQUIRED_MESSAGE,
};
use crate::gate::Route;
use crate::gateway::{ApiGateway, GatewayError};
use crate::notify::{Notification, Notifier};
use crate::session::{SessionStore, SessionToken};
use crate::FeedbackResult;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Token stored; go to the given route.
    Navigate(Route),
    /// Login rejected or unreachable backend. Carries the message shown to the user.
    Failed(String),
    /// Empty password; nothing was sent.
    Invalid,
    Busy,
    Abandoned,
}

pub struct AdminLogin {
    gateway: Arc<dyn ApiGateway>,
    session: Arc<dyn SessionStore>,
    notifier: Arc<dyn Notifier>,
    in_flight: AtomicBool,
    cancel: CancelToken,
}

impl AdminLogin {
    pub fn new(
        gateway: Arc<dyn ApiGateway>,
        session: Arc<dyn SessionStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            gateway,
            session,
            notifier,
            in_flight: AtomicBool::new(false),
            cancel: CancelToken::new(),
        }
    }

    pub async fn login(&self, password: &str) -> LoginOutcome {
        if password.is_empty() {
            self.notifier.notify(Notification::error(PASSWORD_REQUIRED_MESSAGE));
            return LoginOutcome::Invalid;
        }
        if self.in_flight.swap(true, Ordering::SeqCst) {
            tracing::debug!("login ignored, a request is already in flight");
            return LoginOutcome::Busy;
        }
        let in_flight = InFlight(&self.in_flight);

        let result = self.gateway.login(password).await;
        drop(in_flight);

        if self.cancel.is_cancelled() {
            tracing::debug!("login finished after teardown, discarding response");
            return LoginOutcome::Abandoned;
        }

        let stored = result.map_err(LoginFailure::Gateway).and_then(|token| {
            SessionToken::new(token)
                .and_then(|token| self.session.set(token))
                .map_err(LoginFailure::Session)
        });

        match stored {
            Ok(()) => {
                tracing::info!("moderator logged in");
                self.notifier.notify(Notification::success(LOGIN_SUCCESS_MESSAGE));
                LoginOutcome::Navigate(Route::ViewFeedback)
            }
            Err(failure) => {
                let message = failure.user_message();
                tracing::error!("login failed: {}", failure);
                self.notifier.notify(Notification::error(message.clone()));
                LoginOutcome::Failed(message)
            }
        }
    }

    /// Drop the stored token. The gate locks on its next read.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be written.
    pub fn logout(&self) -> FeedbackResult<()> {
        self.session.clear()?;
        tracing::info!("moderator logged out");
        Ok(())
    }

    pub fn teardown(&self) {
        self.cancel.cancel();
    }
}

/// Clears the in-flight flag when dropped, including when the `login()` future is dropped.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[derive(Debug, thiserror::Error)]
enum LoginFailure {
    #[error(transparent)]
    Gateway(GatewayError),
    #[error("could not store session token: {0}")]
    Session(crate::FeedbackError),
}

impl LoginFailure {
    fn user_message(&self) -> String {
        match self {
            LoginFailure::Gateway(GatewayError::Network(_)) => NETWORK_ERROR_MESSAGE.to_string(),
            LoginFailure::Gateway(e) => e
                .server_message()
                .unwrap_or(LOGIN_FAILURE_MESSAGE)
                .to_string(),
            LoginFailure::Session(_) => LOGIN_FAILURE_MESSAGE.to_string(),
        }
    }
}
