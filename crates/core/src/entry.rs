//! Feedback entries and their categories.
//!
//! The backend hands back loosely shaped JSON records ([`api_shared::FeedbackRecord`]). This
//! module turns them into [`FeedbackEntry`] values that uphold the stored-entry invariant:
//! every entry has an id, a category from the closed six-value set and a non-empty body.
//!
//! ## Category canonicalisation
//!
//! Earlier versions of the submission form offered different category lists (for example
//! `General Feedback`, `Corruption`, `Service Delivery`). Such values are mapped onto the
//! six-value set and flagged with a warning so the mismatch stays visible in the logs.

use crate::constants::{ANONYMOUS_NAME, HIDDEN_EMAIL, NOT_AVAILABLE};
use api_shared::FeedbackRecord;
use chrono::{DateTime, Utc};
use feedback_types::{EntryId, NonEmptyText};

/// Closed set of feedback categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Category {
    Compliment,
    Complaint,
    Suggestion,
    Inquiry,
    Other,
    #[serde(rename = "Report Corruption")]
    ReportCorruption,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Compliment,
        Category::Complaint,
        Category::Suggestion,
        Category::Inquiry,
        Category::Other,
        Category::ReportCorruption,
    ];

    /// Label as stored by the backend and shown to users.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Compliment => "Compliment",
            Category::Complaint => "Complaint",
            Category::Suggestion => "Suggestion",
            Category::Inquiry => "Inquiry",
            Category::Other => "Other",
            Category::ReportCorruption => "Report Corruption",
        }
    }

    /// Exact match against the six canonical labels.
    pub fn from_label(label: &str) -> Option<Category> {
        Category::ALL
            .into_iter()
            .find(|c| c.label() == label.trim())
    }

    /// Maps labels from the legacy category lists onto the canonical set.
    pub fn from_legacy_label(label: &str) -> Option<Category> {
        match label.trim() {
            "Corruption" => Some(Category::ReportCorruption),
            "Staff Conduct" | "Service Delivery" | "Facility Hygiene" | "Billing Issues" => {
                Some(Category::Complaint)
            }
            "General Feedback" => Some(Category::Other),
            _ => None,
        }
    }

    /// Canonical category for any stored label. Legacy and unknown labels are logged.
    pub fn canonicalize(label: &str) -> Category {
        if let Some(category) = Category::from_label(label) {
            return category;
        }
        if let Some(category) = Category::from_legacy_label(label) {
            tracing::warn!(
                legacy = label,
                canonical = category.label(),
                "legacy category label mapped onto canonical set"
            );
            return category;
        }
        tracing::warn!(label, "unknown category label, treating as Other");
        Category::Other
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::from_label(s).ok_or_else(|| {
            let known: Vec<&str> = Category::ALL.iter().map(|c| c.label()).collect();
            format!("unknown category {s:?} (expected one of: {})", known.join(", "))
        })
    }
}

/// Why a backend record could not become a [`FeedbackEntry`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("record has no id")]
    MissingId,
    #[error("record {0} has no feedback text")]
    MissingBody(String),
}

/// A stored feedback entry. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackEntry {
    pub id: EntryId,
    pub submitter_name: Option<NonEmptyText>,
    pub submitter_email: Option<NonEmptyText>,
    pub category: Category,
    pub body: NonEmptyText,
    pub anonymous: bool,
    pub attachment: Option<NonEmptyText>,
    /// `None` when the backend sent no timestamp or one that does not parse.
    pub submitted_at: Option<DateTime<Utc>>,
}

impl FeedbackEntry {
    /// Name as it may be shown: never the real name for anonymous entries.
    pub fn display_name(&self) -> &str {
        if self.anonymous {
            return ANONYMOUS_NAME;
        }
        self.submitter_name
            .as_ref()
            .map(|n| n.as_str())
            .unwrap_or(NOT_AVAILABLE)
    }

    pub fn display_email(&self) -> &str {
        if self.anonymous {
            return HIDDEN_EMAIL;
        }
        self.submitter_email
            .as_ref()
            .map(|e| e.as_str())
            .unwrap_or(NOT_AVAILABLE)
    }

    pub fn display_date(&self) -> String {
        self.submitted_at
            .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }

    /// Name usable for search; anonymous entries expose none.
    pub fn searchable_name(&self) -> Option<&str> {
        if self.anonymous {
            None
        } else {
            self.submitter_name.as_ref().map(|n| n.as_str())
        }
    }
}

impl TryFrom<FeedbackRecord> for FeedbackEntry {
    type Error = RecordError;

    fn try_from(record: FeedbackRecord) -> Result<Self, Self::Error> {
        let id = record
            .id
            .as_deref()
            .and_then(|id| EntryId::new(id).ok())
            .ok_or(RecordError::MissingId)?;

        let body = record
            .body()
            .and_then(NonEmptyText::optional)
            .ok_or_else(|| RecordError::MissingBody(id.to_string()))?;

        let category = match record.category.as_deref().and_then(NonEmptyText::optional) {
            Some(label) => Category::canonicalize(label.as_str()),
            None => {
                tracing::warn!(id = id.as_str(), "record has no category, treating as Other");
                Category::Other
            }
        };

        let submitted_at = record.submitted_at.as_deref().and_then(parse_timestamp);

        Ok(FeedbackEntry {
            id,
            submitter_name: record.name.and_then(NonEmptyText::optional),
            submitter_email: record.email.and_then(NonEmptyText::optional),
            category,
            body,
            anonymous: record.anonymous,
            attachment: record.file_url.and_then(NonEmptyText::optional),
            submitted_at,
        })
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(raw.trim()) {
        Ok(t) => Some(t.with_timezone(&Utc)),
        Err(e) => {
            tracing::debug!(raw, error = %e, "unparseable submittedAt, sorting as unknown");
            None
        }
    }
}
