//! Backend API gateway.
//!
//! [`ApiGateway`] is the exact surface the core depends on: list, create, delete and login.
//! [`HttpGateway`] implements it over HTTP with `reqwest`. No local timeout is imposed; that is
//! left to the transport.

use crate::config::CoreConfig;
use crate::entry::Category;
use crate::session::SessionStore;
use crate::{FeedbackError, FeedbackResult};
use api_shared::paths::{fields, ADMIN_LOGIN_PATH, FEEDBACK_PATH};
use api_shared::{bearer_header_value, ErrorBody, FeedbackRecord, LoginReq, LoginRes};
use async_trait::async_trait;
use feedback_files::AttachmentUpload;
use feedback_types::{EntryId, NonEmptyText};
use reqwest::{multipart, StatusCode};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// The request never produced a response (connection refused, DNS, TLS, ...).
    #[error("network error: {0}")]
    Network(String),
    /// The backend answered with a non-success status.
    #[error("server responded with status {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Server {
        status: u16,
        message: Option<String>,
    },
    /// The target does not exist (404).
    #[error("not found")]
    NotFound,
    /// The response body did not have the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(String),
    /// No request URL could be built from the base URL.
    #[error("invalid request url: {0}")]
    InvalidUrl(String),
}

impl GatewayError {
    /// Message supplied by the backend, if it sent one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            GatewayError::Server { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// A validated submission, ready to be posted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFeedback {
    pub name: Option<NonEmptyText>,
    pub email: Option<NonEmptyText>,
    pub phone: Option<NonEmptyText>,
    pub category: Category,
    pub body: NonEmptyText,
    pub anonymous: bool,
    pub attachment: Option<AttachmentUpload>,
}

#[async_trait]
pub trait ApiGateway: Send + Sync {
    /// `GET {base}/api/feedback`
    async fn list(&self) -> GatewayResult<Vec<FeedbackRecord>>;
    /// `POST {base}/api/feedback` (multipart)
    async fn create(&self, feedback: &NewFeedback) -> GatewayResult<()>;
    /// `DELETE {base}/api/feedback/{id}`
    async fn delete(&self, id: &EntryId) -> GatewayResult<()>;
    /// `POST {base}/api/admin/login`, returning the session token.
    async fn login(&self, password: &str) -> GatewayResult<String>;
}

/// [`ApiGateway`] over HTTP.
///
/// When built with a session store, moderator requests (list and delete) carry the current
/// token as a bearer credential. A missing token never blocks a request locally.
#[derive(Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
    session: Option<Arc<dyn SessionStore>>,
}

impl HttpGateway {
    /// # Errors
    ///
    /// Returns `FeedbackError::Config` if the HTTP client cannot be initialised.
    pub fn new(cfg: &CoreConfig) -> FeedbackResult<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| FeedbackError::Config(format!("failed to build http client: {e}")))?;

        Ok(Self {
            client,
            base_url: cfg.api_base_url().trim().trim_end_matches('/').to_string(),
            session: None,
        })
    }

    pub fn with_session(mut self, session: Arc<dyn SessionStore>) -> Self {
        self.session = Some(session);
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `{base}/api/feedback/{id}` with `id` percent-encoded as a single path segment.
    fn item_url(&self, id: &EntryId) -> GatewayResult<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.url(FEEDBACK_PATH))
            .map_err(|e| GatewayError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| {
                GatewayError::InvalidUrl(format!("{} cannot take a path", self.base_url))
            })?
            .push(id.as_str());
        Ok(url)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.session.as_ref().and_then(|s| s.get()) {
            Some(token) => request.header(
                reqwest::header::AUTHORIZATION,
                bearer_header_value(token.as_str()),
            ),
            None => request,
        }
    }

    fn build_form(feedback: &NewFeedback) -> GatewayResult<multipart::Form> {
        let mut form = multipart::Form::new()
            .text(fields::CATEGORY, feedback.category.label())
            .text(fields::BODY, feedback.body.as_str().to_string())
            .text(fields::ANONYMOUS, feedback.anonymous.to_string());

        for (field, value) in [
            (fields::NAME, &feedback.name),
            (fields::EMAIL, &feedback.email),
            (fields::PHONE, &feedback.phone),
        ] {
            if let Some(value) = value {
                form = form.text(field, value.as_str().to_string());
            }
        }

        if let Some(upload) = &feedback.attachment {
            let part = multipart::Part::bytes(upload.bytes().to_vec())
                .file_name(upload.file_name().to_string())
                .mime_str(upload.media_type())
                .map_err(|e| GatewayError::Decode(format!("invalid attachment media type: {e}")))?;
            form = form.part(fields::FILE, part);
        }

        Ok(form)
    }
}

fn network(e: reqwest::Error) -> GatewayError {
    GatewayError::Network(e.to_string())
}

/// Turns a non-success response into [`GatewayError::Server`], keeping the backend's message.
async fn server_error(response: reqwest::Response) -> GatewayError {
    let status = response.status();
    let message = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.message)
        .filter(|m| !m.trim().is_empty());

    GatewayError::Server {
        status: status.as_u16(),
        message,
    }
}

#[async_trait]
impl ApiGateway for HttpGateway {
    async fn list(&self) -> GatewayResult<Vec<FeedbackRecord>> {
        let url = self.url(FEEDBACK_PATH);
        tracing::debug!(%url, "listing feedback");

        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .map_err(network)?;

        if !response.status().is_success() {
            return Err(server_error(response).await);
        }

        response
            .json::<Vec<FeedbackRecord>>()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))
    }

    async fn create(&self, feedback: &NewFeedback) -> GatewayResult<()> {
        let url = self.url(FEEDBACK_PATH);
        let form = Self::build_form(feedback)?;
        tracing::debug!(
            %url,
            category = feedback.category.label(),
            anonymous = feedback.anonymous,
            attachment = feedback.attachment.as_ref().map(|a| a.sha256()),
            "posting feedback"
        );

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(network)?;

        if !response.status().is_success() {
            return Err(server_error(response).await);
        }

        Ok(())
    }

    async fn delete(&self, id: &EntryId) -> GatewayResult<()> {
        let url = self.item_url(id)?;
        tracing::debug!(%url, "deleting feedback");

        let response = self
            .authorize(self.client.delete(url))
            .send()
            .await
            .map_err(network)?;

        match response.status() {
            s if s.is_success() => Ok(()),
            StatusCode::NOT_FOUND => Err(GatewayError::NotFound),
            _ => Err(server_error(response).await),
        }
    }

    async fn login(&self, password: &str) -> GatewayResult<String> {
        let url = self.url(ADMIN_LOGIN_PATH);
        tracing::debug!(%url, "admin login");

        let response = self
            .client
            .post(&url)
            .json(&LoginReq {
                password: password.to_string(),
            })
            .send()
            .await
            .map_err(network)?;

        if !response.status().is_success() {
            return Err(server_error(response).await);
        }

        response
            .json::<LoginRes>()
            .await
            .map(|res| res.token)
            .map_err(|e| GatewayError::Decode(e.to_string()))
    }
}
