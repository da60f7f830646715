//! Routes and the Access Gate guarding the moderation view.

use crate::constants::{LOGIN_PATH, SUBMIT_PATH, VIEW_PATH};
use crate::entry::Category;
use crate::session::SessionStore;
use std::sync::Arc;

/// Navigable views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Public submission form, optionally pre-seeded with a category.
    SubmitFeedback { default_category: Option<Category> },
    /// Moderation list. Protected.
    ViewFeedback,
    AdminLogin,
}

impl Route {
    /// Maps a path onto a route. Unknown paths fall back to the submission form.
    pub fn parse(path: &str) -> Route {
        let path = path.trim();
        let path = path.split(['?', '#']).next().unwrap_or(path);
        let trimmed = path.trim_end_matches('/');

        match trimmed {
            VIEW_PATH => Route::ViewFeedback,
            LOGIN_PATH => Route::AdminLogin,
            _ => Route::SubmitFeedback {
                default_category: None,
            },
        }
    }

    /// Submission form pre-seeded for a corruption report.
    pub fn report_corruption() -> Route {
        Route::SubmitFeedback {
            default_category: Some(Category::ReportCorruption),
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::SubmitFeedback { .. } => SUBMIT_PATH,
            Route::ViewFeedback => VIEW_PATH,
            Route::AdminLogin => LOGIN_PATH,
        }
    }

    pub fn is_protected(&self) -> bool {
        matches!(self, Route::ViewFeedback)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Locked,
    Unlocked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Render the requested route.
    Render(Route),
    /// Navigate here instead (replacing the history entry).
    Redirect(Route),
}

/// Navigation guard for protected routes.
///
/// Holds no state of its own: every evaluation reads the session store again.
#[derive(Clone)]
pub struct AccessGate {
    session: Arc<dyn SessionStore>,
}

impl AccessGate {
    pub fn new(session: Arc<dyn SessionStore>) -> Self {
        Self { session }
    }

    pub fn state(&self) -> GateState {
        if self.session.get().is_some() {
            GateState::Unlocked
        } else {
            GateState::Locked
        }
    }

    /// Evaluate entry into `route`.
    pub fn enter(&self, route: Route) -> GateDecision {
        if !route.is_protected() {
            return GateDecision::Render(route);
        }

        match self.state() {
            GateState::Unlocked => GateDecision::Render(route),
            GateState::Locked => {
                tracing::info!(path = route.path(), "no session token, redirecting to login");
                GateDecision::Redirect(Route::AdminLogin)
            }
        }
    }

    /// [`Route::parse`] followed by [`AccessGate::enter`].
    pub fn navigate(&self, path: &str) -> GateDecision {
        self.enter(Route::parse(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{MemorySessionStore, SessionToken};

    #[test]
    fn parses_known_paths_and_falls_back_to_submit() {
        assert_eq!(Route::parse("/feedback/view"), Route::ViewFeedback);
        assert_eq!(Route::parse("/feedback/view/"), Route::ViewFeedback);
        assert_eq!(Route::parse("/admin-login?next=x"), Route::AdminLogin);
        assert_eq!(
            Route::parse("/feedback/submit"),
            Route::SubmitFeedback {
                default_category: None
            }
        );
        assert_eq!(
            Route::parse("/anything/else"),
            Route::SubmitFeedback {
                default_category: None
            }
        );
    }

    #[test]
    fn locked_gate_redirects_protected_route() {
        let gate = AccessGate::new(Arc::new(MemorySessionStore::new()));
        assert_eq!(gate.state(), GateState::Locked);
        assert_eq!(
            gate.enter(Route::ViewFeedback),
            GateDecision::Redirect(Route::AdminLogin)
        );
    }

    #[test]
    fn unlocked_gate_renders_protected_route() {
        let store = MemorySessionStore::with_token(SessionToken::new("t").unwrap());
        let gate = AccessGate::new(Arc::new(store));
        assert_eq!(gate.navigate("/feedback/view"), GateDecision::Render(Route::ViewFeedback));
    }

    #[test]
    fn public_routes_never_redirect() {
        let gate = AccessGate::new(Arc::new(MemorySessionStore::new()));
        let route = Route::report_corruption();
        assert_eq!(gate.enter(route), GateDecision::Render(route));
        assert_eq!(
            gate.enter(Route::AdminLogin),
            GateDecision::Render(Route::AdminLogin)
        );
    }

    #[test]
    fn every_entry_rereads_the_store() {
        let store = Arc::new(MemorySessionStore::with_token(SessionToken::new("t").unwrap()));
        let gate = AccessGate::new(store.clone());
        assert_eq!(gate.enter(Route::ViewFeedback), GateDecision::Render(Route::ViewFeedback));

        store.clear().unwrap();
        assert_eq!(
            gate.enter(Route::ViewFeedback),
            GateDecision::Redirect(Route::AdminLogin)
        );
    }
}
