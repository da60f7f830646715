//! Submission Controller.
//!
//! Owns the feedback draft, validates it and posts it through the [`ApiGateway`].
//!
//! ## State machine
//!
//! ```text
//! Idle ──submit()──► Submitting ──ok──► Succeeded (draft reset, default category re-seeded)
//!  ▲                     │
//!  │                     └──err──► Failed (draft kept for retry)
//!  └── validation failure leaves the status where it was
//! ```
//!
//! While `Submitting`, further `submit()` calls return [`SubmitOutcome::Busy`] without touching
//! the gateway, so at most one submission is in flight per controller. If the `submit()` future
//! is dropped before the gateway answers, the status goes back to what it was before the call.

use crate::cancel::CancelToken;
use crate::constants::{SUBMIT_FAILURE_MESSAGE, SUBMIT_SUCCESS_MESSAGE};
use crate::entry::Category;
use crate::gateway::{ApiGateway, GatewayError};
use crate::notify::{Notification, Notifier};
use crate::validation::{validate_draft, ValidationError};
use feedback_files::AttachmentUpload;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

/// Names of the editable draft fields, used for focus requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Name,
    Email,
    Phone,
    Category,
    Body,
    Anonymous,
    Attachment,
}

/// One typed edit to the draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftUpdate {
    Name(String),
    Email(String),
    Phone(String),
    Category(Option<Category>),
    Body(String),
    Anonymous(bool),
    Attachment(Option<AttachmentUpload>),
}

impl DraftUpdate {
    pub fn field(&self) -> DraftField {
        match self {
            DraftUpdate::Name(_) => DraftField::Name,
            DraftUpdate::Email(_) => DraftField::Email,
            DraftUpdate::Phone(_) => DraftField::Phone,
            DraftUpdate::Category(_) => DraftField::Category,
            DraftUpdate::Body(_) => DraftField::Body,
            DraftUpdate::Anonymous(_) => DraftField::Anonymous,
            DraftUpdate::Attachment(_) => DraftField::Attachment,
        }
    }
}

/// Feedback being composed. Fields hold raw input; validation happens on submit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SubmissionDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub category: Option<Category>,
    pub body: String,
    pub anonymous: bool,
    pub attachment: Option<AttachmentUpload>,
    pub status: SubmissionStatus,
}

impl SubmissionDraft {
    /// Blank draft, optionally pre-seeded with a category.
    pub fn empty(default_category: Option<Category>) -> Self {
        Self {
            category: default_category,
            ..Self::default()
        }
    }

    pub fn apply(&mut self, update: DraftUpdate) {
        match update {
            DraftUpdate::Name(v) => self.name = v,
            DraftUpdate::Email(v) => self.email = v,
            DraftUpdate::Phone(v) => self.phone = v,
            DraftUpdate::Category(v) => self.category = v,
            DraftUpdate::Body(v) => self.body = v,
            DraftUpdate::Anonymous(v) => self.anonymous = v,
            DraftUpdate::Attachment(v) => self.attachment = v,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Submitted,
    /// Rejected locally; nothing was sent.
    Invalid(ValidationError),
    /// The backend call failed; the draft is unchanged.
    Failed(GatewayError),
    /// Another submission is still in flight.
    Busy,
    /// The controller was torn down before the response arrived.
    Abandoned,
}

#[derive(Debug, Default)]
struct ControllerState {
    draft: SubmissionDraft,
    focus_request: Option<DraftField>,
}

pub struct SubmissionController {
    gateway: Arc<dyn ApiGateway>,
    notifier: Arc<dyn Notifier>,
    default_category: Option<Category>,
    state: Mutex<ControllerState>,
    cancel: CancelToken,
}

impl SubmissionController {
    /// `default_category` seeds the draft now and after every successful submission.
    pub fn new(
        gateway: Arc<dyn ApiGateway>,
        notifier: Arc<dyn Notifier>,
        default_category: Option<Category>,
    ) -> Self {
        Self {
            gateway,
            notifier,
            default_category,
            state: Mutex::new(ControllerState {
                draft: SubmissionDraft::empty(default_category),
                focus_request: None,
            }),
            cancel: CancelToken::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the current draft.
    pub fn draft(&self) -> SubmissionDraft {
        self.lock().draft.clone()
    }

    pub fn status(&self) -> SubmissionStatus {
        self.lock().draft.status
    }

    pub fn update_field(&self, update: DraftUpdate) {
        self.lock().draft.apply(update);
    }

    /// Field the renderer should focus after its next update, if any.
    pub fn take_focus_request(&self) -> Option<DraftField> {
        self.lock().focus_request.take()
    }

    /// Shortcut for reporting corruption: selects the category, turns anonymous off and moves
    /// focus to the body.
    pub fn report_corruption(&self) {
        let mut state = self.lock();
        state.draft.category = Some(Category::ReportCorruption);
        state.draft.anonymous = false;
        state.focus_request = Some(DraftField::Body);
    }

    /// Stop accepting responses. A submission still in flight is discarded when it completes.
    pub fn teardown(&self) {
        self.cancel.cancel();
    }

    /// Validate the draft and post it.
    ///
    /// Every outcome is reported to the notifier except `Busy` and `Abandoned`; no error is
    /// propagated to the caller as a fault.
    pub async fn submit(&self) -> SubmitOutcome {
        let (payload, in_flight) = {
            let mut state = self.lock();
            if state.draft.status == SubmissionStatus::Submitting {
                tracing::debug!("submit ignored, a submission is already in flight");
                return SubmitOutcome::Busy;
            }

            match validate_draft(&state.draft) {
                Ok(payload) => {
                    let guard = InFlight {
                        state: &self.state,
                        previous: state.draft.status,
                        armed: true,
                    };
                    state.draft.status = SubmissionStatus::Submitting;
                    (payload, guard)
                }
                Err(e) => {
                    drop(state);
                    tracing::debug!(reason = %e, "draft rejected by validation");
                    self.notifier.notify(Notification::error(e.to_string()));
                    return SubmitOutcome::Invalid(e);
                }
            }
        };

        let result = self.gateway.create(&payload).await;
        in_flight.disarm();

        if self.cancel.is_cancelled() {
            tracing::debug!("submission finished after teardown, discarding response");
            return SubmitOutcome::Abandoned;
        }

        match result {
            Ok(()) => {
                {
                    let mut state = self.lock();
                    state.draft = SubmissionDraft::empty(self.default_category);
                    state.draft.status = SubmissionStatus::Succeeded;
                    state.focus_request = Some(DraftField::Name);
                }
                tracing::info!(category = payload.category.label(), "feedback submitted");
                self.notifier
                    .notify(Notification::success(SUBMIT_SUCCESS_MESSAGE));
                SubmitOutcome::Submitted
            }
            Err(e) => {
                self.lock().draft.status = SubmissionStatus::Failed;
                tracing::error!("feedback submission failed: {}", e);
                self.notifier
                    .notify(Notification::error(SUBMIT_FAILURE_MESSAGE));
                SubmitOutcome::Failed(e)
            }
        }
    }
}

/// Puts the status back if the `submit()` future is dropped while the request is pending.
struct InFlight<'a> {
    state: &'a Mutex<ControllerState>,
    previous: SubmissionStatus,
    armed: bool,
}

impl InFlight<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.draft.status == SubmissionStatus::Submitting {
            state.draft.status = self.previous;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NotificationLevel;
    use crate::test_support::{FakeGateway, RecordingNotifier};
    use std::time::Duration;

    fn controller(
        gateway: Arc<FakeGateway>,
        default_category: Option<Category>,
    ) -> (SubmissionController, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::default());
        (
            SubmissionController::new(gateway, notifier.clone(), default_category),
            notifier,
        )
    }

    fn fill_identified(c: &SubmissionController) {
        c.update_field(DraftUpdate::Name("Amina".into()));
        c.update_field(DraftUpdate::Email("amina@example.com".into()));
        c.update_field(DraftUpdate::Category(Some(Category::Complaint)));
        c.update_field(DraftUpdate::Body("water leak".into()));
    }

    #[test]
    fn update_field_targets_one_field() {
        let (c, _) = controller(Arc::new(FakeGateway::default()), None);
        let update = DraftUpdate::Phone("0712345678".into());
        assert_eq!(update.field(), DraftField::Phone);
        c.update_field(update);

        let draft = c.draft();
        assert_eq!(draft.phone, "0712345678");
        assert_eq!(draft.name, "");
        assert_eq!(draft.status, SubmissionStatus::Idle);
    }

    #[tokio::test]
    async fn missing_category_never_reaches_the_gateway() {
        let gateway = Arc::new(FakeGateway::default());
        let (c, notifier) = controller(gateway.clone(), None);
        c.update_field(DraftUpdate::Body("hello".into()));
        c.update_field(DraftUpdate::Anonymous(true));
        let before = c.draft();

        let outcome = c.submit().await;

        assert_eq!(outcome, SubmitOutcome::Invalid(ValidationError::MissingCategory));
        assert_eq!(gateway.create_calls(), 0);
        assert_eq!(c.draft(), before);
        assert_eq!(c.status(), SubmissionStatus::Idle);
        assert_eq!(
            notifier.last(),
            Some(Notification::error("Please select a category."))
        );
    }

    #[tokio::test]
    async fn anonymous_submission_needs_no_identity() {
        let gateway = Arc::new(FakeGateway::default());
        let (c, _) = controller(gateway.clone(), None);
        c.update_field(DraftUpdate::Category(Some(Category::Compliment)));
        c.update_field(DraftUpdate::Body("great nurse".into()));
        c.update_field(DraftUpdate::Anonymous(true));

        assert_eq!(c.submit().await, SubmitOutcome::Submitted);

        let created = gateway.created();
        assert_eq!(created.len(), 1);
        assert!(created[0].anonymous);
        assert!(created[0].name.is_none());
    }

    #[tokio::test]
    async fn success_resets_draft_to_default_category_and_focuses_name() {
        let gateway = Arc::new(FakeGateway::default());
        let (c, notifier) = controller(gateway, Some(Category::ReportCorruption));
        fill_identified(&c);

        assert_eq!(c.submit().await, SubmitOutcome::Submitted);

        let draft = c.draft();
        assert_eq!(draft.category, Some(Category::ReportCorruption));
        assert_eq!(draft.body, "");
        assert_eq!(draft.name, "");
        assert_eq!(draft.status, SubmissionStatus::Succeeded);
        assert_eq!(c.take_focus_request(), Some(DraftField::Name));
        assert_eq!(c.take_focus_request(), None);
        assert_eq!(
            notifier.last(),
            Some(Notification::success("Feedback submitted successfully!"))
        );
    }

    #[tokio::test]
    async fn failure_keeps_draft_for_retry() {
        let gateway = Arc::new(FakeGateway::default());
        gateway.fail_create(GatewayError::Network("connection refused".into()));
        let (c, notifier) = controller(gateway.clone(), None);
        fill_identified(&c);
        let before = c.draft();

        let outcome = c.submit().await;

        assert!(matches!(outcome, SubmitOutcome::Failed(GatewayError::Network(_))));
        let after = c.draft();
        assert_eq!(after.status, SubmissionStatus::Failed);
        assert_eq!(
            SubmissionDraft {
                status: SubmissionStatus::Idle,
                ..after
            },
            before
        );
        assert_eq!(notifier.last().unwrap().level, NotificationLevel::Error);

        gateway.clear_failures();
        assert_eq!(c.submit().await, SubmitOutcome::Submitted);
        assert_eq!(gateway.create_calls(), 2);
    }

    #[tokio::test]
    async fn second_submit_while_in_flight_is_ignored() {
        let gateway = Arc::new(FakeGateway::default());
        let release = gateway.hold_create();
        let (c, _) = controller(gateway.clone(), None);
        fill_identified(&c);

        let (first, second, ()) = tokio::join!(c.submit(), c.submit(), async {
            release.notify_one();
        });

        assert_eq!(first, SubmitOutcome::Submitted);
        assert_eq!(second, SubmitOutcome::Busy);
        assert_eq!(gateway.create_calls(), 1);
    }

    #[tokio::test]
    async fn dropped_submit_leaves_the_form_usable() {
        let gateway = Arc::new(FakeGateway::default());
        let _pending = gateway.hold_create();
        let (c, notifier) = controller(gateway.clone(), None);
        fill_identified(&c);
        let before = c.draft();

        let timed_out = tokio::time::timeout(Duration::from_millis(20), c.submit()).await;

        assert!(timed_out.is_err());
        assert_eq!(c.draft(), before);
        assert!(notifier.all().is_empty());

        assert_eq!(c.submit().await, SubmitOutcome::Submitted);
        assert_eq!(gateway.create_calls(), 2);
    }

    #[tokio::test]
    async fn response_after_teardown_is_discarded() {
        let gateway = Arc::new(FakeGateway::default());
        let release = gateway.hold_create();
        let (c, notifier) = controller(gateway, None);
        fill_identified(&c);

        let (outcome, ()) = tokio::join!(c.submit(), async {
            c.teardown();
            release.notify_one();
        });

        assert_eq!(outcome, SubmitOutcome::Abandoned);
        assert_eq!(c.draft().body, "water leak");
        assert!(notifier.all().is_empty());
    }

    #[test]
    fn report_corruption_shortcut() {
        let (c, _) = controller(Arc::new(FakeGateway::default()), None);
        c.update_field(DraftUpdate::Anonymous(true));

        c.report_corruption();

        let draft = c.draft();
        assert_eq!(draft.category, Some(Category::ReportCorruption));
        assert!(!draft.anonymous);
        assert_eq!(c.take_focus_request(), Some(DraftField::Body));
    }
}
