//! In-memory collaborators for unit tests.

use crate::gateway::{ApiGateway, GatewayError, GatewayResult, NewFeedback};
use crate::notify::{Confirm, Notification, Notifier};
use api_shared::FeedbackRecord;
use async_trait::async_trait;
use feedback_types::EntryId;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

#[derive(Default)]
pub struct FakeGateway {
    records: Mutex<Vec<FeedbackRecord>>,
    created: Mutex<Vec<NewFeedback>>,
    deleted: Mutex<Vec<EntryId>>,
    create_calls: AtomicUsize,
    list_calls: AtomicUsize,
    list_error: Mutex<Option<GatewayError>>,
    create_error: Mutex<Option<GatewayError>>,
    delete_error: Mutex<Option<GatewayError>>,
    create_hold: Mutex<Option<Arc<Notify>>>,
    list_hold: Mutex<Option<Arc<Notify>>>,
    login_hold: Mutex<Option<Arc<Notify>>>,
    delete_holds: Mutex<Vec<(String, Arc<Notify>)>>,
    password: Mutex<Option<(String, String)>>,
}

impl FakeGateway {
    pub fn with_records(records: Vec<FeedbackRecord>) -> Self {
        let gateway = Self::default();
        *gateway.records.lock().unwrap() = records;
        gateway
    }

    pub fn set_records(&self, records: Vec<FeedbackRecord>) {
        *self.records.lock().unwrap() = records;
    }

    pub fn fail_list(&self, e: GatewayError) {
        *self.list_error.lock().unwrap() = Some(e);
    }

    pub fn fail_create(&self, e: GatewayError) {
        *self.create_error.lock().unwrap() = Some(e);
    }

    pub fn fail_delete(&self, e: GatewayError) {
        *self.delete_error.lock().unwrap() = Some(e);
    }

    pub fn clear_failures(&self) {
        *self.list_error.lock().unwrap() = None;
        *self.create_error.lock().unwrap() = None;
        *self.delete_error.lock().unwrap() = None;
    }

    /// The next `create` waits until the returned handle is notified.
    pub fn hold_create(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        *self.create_hold.lock().unwrap() = Some(notify.clone());
        notify
    }

    /// The next `list` waits until the returned handle is notified.
    pub fn hold_list(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        *self.list_hold.lock().unwrap() = Some(notify.clone());
        notify
    }

    /// The next `login` waits until the returned handle is notified.
    pub fn hold_login(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        *self.login_hold.lock().unwrap() = Some(notify.clone());
        notify
    }

    /// Deleting `id` waits until the returned handle is notified.
    pub fn hold_delete(&self, id: &str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.delete_holds
            .lock()
            .unwrap()
            .push((id.to_string(), notify.clone()));
        notify
    }

    pub fn accept_password(&self, password: &str, token: &str) {
        *self.password.lock().unwrap() = Some((password.to_string(), token.to_string()));
    }

    pub fn created(&self) -> Vec<NewFeedback> {
        self.created.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<EntryId> {
        self.deleted.lock().unwrap().clone()
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ApiGateway for FakeGateway {
    async fn list(&self) -> GatewayResult<Vec<FeedbackRecord>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let snapshot = self.records.lock().unwrap().clone();
        let hold = self.list_hold.lock().unwrap().take();
        if let Some(hold) = hold {
            hold.notified().await;
        }
        if let Some(e) = self.list_error.lock().unwrap().clone() {
            return Err(e);
        }
        Ok(snapshot)
    }

    async fn create(&self, feedback: &NewFeedback) -> GatewayResult<()> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        let hold = self.create_hold.lock().unwrap().take();
        if let Some(hold) = hold {
            hold.notified().await;
        }
        if let Some(e) = self.create_error.lock().unwrap().clone() {
            return Err(e);
        }
        self.created.lock().unwrap().push(feedback.clone());
        Ok(())
    }

    async fn delete(&self, id: &EntryId) -> GatewayResult<()> {
        let hold = {
            let mut holds = self.delete_holds.lock().unwrap();
            holds
                .iter()
                .position(|(held, _)| held == id.as_str())
                .map(|i| holds.remove(i).1)
        };
        if let Some(hold) = hold {
            hold.notified().await;
        }
        if let Some(e) = self.delete_error.lock().unwrap().clone() {
            return Err(e);
        }
        self.deleted.lock().unwrap().push(id.clone());
        Ok(())
    }

    async fn login(&self, password: &str) -> GatewayResult<String> {
        let hold = self.login_hold.lock().unwrap().take();
        if let Some(hold) = hold {
            hold.notified().await;
        }
        match self.password.lock().unwrap().clone() {
            Some((expected, token)) if expected == password => Ok(token),
            Some(_) => Err(GatewayError::Server {
                status: 401,
                message: Some("Invalid password".into()),
            }),
            None => Err(GatewayError::Network("connection refused".into())),
        }
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn all(&self) -> Vec<Notification> {
        self.seen.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<Notification> {
        self.seen.lock().unwrap().last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen.lock().unwrap().push(notification);
    }
}

/// Confirm gate with a fixed answer that records the prompts it was shown.
pub struct ScriptedConfirm {
    answer: bool,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedConfirm {
    pub fn yes() -> Self {
        Self {
            answer: true,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn no() -> Self {
        Self {
            answer: false,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Confirm for ScriptedConfirm {
    async fn confirm(&self, prompt: &str) -> bool {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.answer
    }
}
