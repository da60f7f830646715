//! Retrieval & Filter Engine.
//!
//! Fetches the entry collection once per view entry and derives what the moderator sees from
//! `(entries, category filter, search query)`. The derived list is never stored: every call to
//! [`FeedbackView::visible_entries`] recomputes it with [`filter_entries`].
//!
//! ## Ordering
//!
//! Entries are kept sorted newest first by `submitted_at`. Entries without a usable timestamp
//! are treated as oldest; the sort is stable so their relative order is preserved.
//!
//! ## Concurrency
//!
//! State sits behind a mutex that is never held across an await. A load that finishes after a
//! newer load started is dropped (last load wins). Deletes apply to whatever entries exist when
//! their response arrives, so overlapping deletes cannot resurrect or drop other entries.

use crate::attachment::{self, AttachmentView};
use crate::cancel::CancelToken;
use crate::constants::{
    ALL_CATEGORIES, DELETE_CONFIRM_PROMPT, DELETE_FAILURE_MESSAGE, DELETE_SUCCESS_MESSAGE,
    LOAD_FAILURE_MESSAGE,
};
use crate::entry::{Category, FeedbackEntry};
use crate::gateway::{ApiGateway, GatewayError};
use crate::notify::{Confirm, Notification, Notifier};
use feedback_types::EntryId;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Category restriction for the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn matches(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => *wanted == category,
        }
    }
}

impl std::str::FromStr for CategoryFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim() == ALL_CATEGORIES {
            return Ok(CategoryFilter::All);
        }
        s.parse::<Category>().map(CategoryFilter::Only)
    }
}

impl std::fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CategoryFilter::All => f.write_str(ALL_CATEGORIES),
            CategoryFilter::Only(category) => category.fmt(f),
        }
    }
}

/// The visible subset of `entries`, in source order.
///
/// A query that is not blank matches case-insensitively, as typed (surrounding whitespace
/// included), against the body and, for entries that are not anonymous, the submitter name.
/// Category and query combine with AND.
pub fn filter_entries(
    entries: &[FeedbackEntry],
    category: CategoryFilter,
    query: &str,
) -> Vec<FeedbackEntry> {
    let searching = !query.trim().is_empty();
    let query = query.to_lowercase();

    entries
        .iter()
        .filter(|e| category.matches(e.category))
        .filter(|e| {
            if !searching {
                return true;
            }
            e.body.as_str().to_lowercase().contains(&query)
                || e
                    .searchable_name()
                    .is_some_and(|name| name.to_lowercase().contains(&query))
        })
        .cloned()
        .collect()
}

/// Newest first; unknown timestamps last. Stable.
pub fn sort_newest_first(entries: &mut [FeedbackEntry]) {
    entries.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    NotLoaded,
    Loading,
    Ready,
    /// Replaces the list with an error indicator. Not retried automatically.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(usize),
    Failed(GatewayError),
    /// A newer load started before this one finished.
    Superseded,
    Abandoned,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The user declined the confirmation; nothing was sent.
    Declined,
    Failed(GatewayError),
    Abandoned,
}

/// One entry prepared for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryView {
    pub id: EntryId,
    pub category: Category,
    pub body: String,
    pub name: String,
    pub email: String,
    pub date: String,
    pub attachment: Option<AttachmentView>,
}

/// What the list area shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListView {
    Loading,
    Error(String),
    Empty,
    Entries(Vec<EntryView>),
}

#[derive(Debug, Default)]
struct ViewState {
    entries: Vec<FeedbackEntry>,
    category_filter: CategoryFilter,
    search_query: String,
    load_state: LoadState,
    load_generation: u64,
}

pub struct FeedbackView {
    gateway: Arc<dyn ApiGateway>,
    notifier: Arc<dyn Notifier>,
    api_base_url: String,
    state: Mutex<ViewState>,
    cancel: CancelToken,
}

impl FeedbackView {
    /// `api_base_url` is used to resolve relative attachment references when rendering.
    pub fn new(
        gateway: Arc<dyn ApiGateway>,
        notifier: Arc<dyn Notifier>,
        api_base_url: impl Into<String>,
    ) -> Self {
        Self {
            gateway,
            notifier,
            api_base_url: api_base_url.into(),
            state: Mutex::new(ViewState::default()),
            cancel: CancelToken::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ViewState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fetch the entry collection and replace local state with it.
    pub async fn load(&self) -> LoadOutcome {
        let generation = {
            let mut state = self.lock();
            state.load_generation += 1;
            state.load_state = LoadState::Loading;
            state.load_generation
        };

        let result = self.gateway.list().await;

        if self.cancel.is_cancelled() {
            tracing::debug!("feedback list arrived after teardown, discarding");
            return LoadOutcome::Abandoned;
        }

        let mut state = self.lock();
        if state.load_generation != generation {
            tracing::debug!(generation, "stale feedback list discarded");
            return LoadOutcome::Superseded;
        }

        match result {
            Ok(records) => {
                let mut entries: Vec<FeedbackEntry> = records
                    .into_iter()
                    .filter_map(|record| match FeedbackEntry::try_from(record) {
                        Ok(entry) => Some(entry),
                        Err(e) => {
                            tracing::warn!("skipping feedback record: {}", e);
                            None
                        }
                    })
                    .collect();
                sort_newest_first(&mut entries);

                let count = entries.len();
                state.entries = entries;
                state.load_state = LoadState::Ready;
                tracing::info!(count, "feedback loaded");
                LoadOutcome::Loaded(count)
            }
            Err(e) => {
                state.load_state = LoadState::Failed(LOAD_FAILURE_MESSAGE.to_string());
                drop(state);
                tracing::error!("failed to fetch feedback: {}", e);
                self.notifier.notify(Notification::error(LOAD_FAILURE_MESSAGE));
                LoadOutcome::Failed(e)
            }
        }
    }

    pub fn set_category_filter(&self, filter: CategoryFilter) {
        self.lock().category_filter = filter;
    }

    pub fn set_search_query(&self, query: impl Into<String>) {
        self.lock().search_query = query.into();
    }

    pub fn load_state(&self) -> LoadState {
        self.lock().load_state.clone()
    }

    /// All loaded entries, newest first.
    pub fn entries(&self) -> Vec<FeedbackEntry> {
        self.lock().entries.clone()
    }

    pub fn visible_entries(&self) -> Vec<FeedbackEntry> {
        let state = self.lock();
        filter_entries(&state.entries, state.category_filter, &state.search_query)
    }

    /// The list area as it should be drawn right now.
    pub fn render(&self) -> ListView {
        match self.load_state() {
            LoadState::NotLoaded | LoadState::Loading => return ListView::Loading,
            LoadState::Failed(message) => return ListView::Error(message),
            LoadState::Ready => {}
        }

        let visible = self.visible_entries();
        if visible.is_empty() {
            return ListView::Empty;
        }

        ListView::Entries(visible.iter().map(|e| self.entry_view(e)).collect())
    }

    fn entry_view(&self, entry: &FeedbackEntry) -> EntryView {
        EntryView {
            id: entry.id.clone(),
            category: entry.category,
            body: entry.body.as_str().to_string(),
            name: entry.display_name().to_string(),
            email: entry.display_email().to_string(),
            date: entry.display_date(),
            attachment: entry
                .attachment
                .as_ref()
                .map(|reference| attachment::resolve(&self.api_base_url, reference.as_str()).view()),
        }
    }

    /// Ask for confirmation, then delete `id` on the backend and locally.
    ///
    /// A backend "not found" counts as success. On failure local state is untouched.
    pub async fn delete(&self, id: &EntryId, confirm: &dyn Confirm) -> DeleteOutcome {
        if !confirm.confirm(DELETE_CONFIRM_PROMPT).await {
            tracing::debug!(id = id.as_str(), "delete declined");
            return DeleteOutcome::Declined;
        }

        let result = match self.gateway.delete(id).await {
            Err(GatewayError::NotFound) => {
                tracing::info!(id = id.as_str(), "entry already gone on the backend");
                Ok(())
            }
            other => other,
        };

        if self.cancel.is_cancelled() {
            tracing::debug!(id = id.as_str(), "delete finished after teardown, discarding");
            return DeleteOutcome::Abandoned;
        }

        match result {
            Ok(()) => {
                self.lock().entries.retain(|e| e.id != *id);
                tracing::info!(id = id.as_str(), "feedback deleted");
                self.notifier.notify(Notification::success(DELETE_SUCCESS_MESSAGE));
                DeleteOutcome::Deleted
            }
            Err(e) => {
                tracing::error!(id = id.as_str(), "failed to delete feedback: {}", e);
                self.notifier.notify(Notification::error(DELETE_FAILURE_MESSAGE));
                DeleteOutcome::Failed(e)
            }
        }
    }

    /// Stop accepting responses for this view.
    pub fn teardown(&self) {
        self.cancel.cancel();
    }
}
