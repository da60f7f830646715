use serde::{Deserialize, Serialize};

/// One feedback record as returned by `GET /api/feedback`.
///
/// Every field is optional on the wire. Older backend versions stored the body under
/// `message`, newer ones under `feedbackText`, and the identifier arrives as `_id`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeedbackRecord {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(rename = "feedbackText", default)]
    pub feedback_text: Option<String>,
    #[serde(default)]
    pub anonymous: bool,
    #[serde(rename = "fileUrl", default)]
    pub file_url: Option<String>,
    #[serde(rename = "submittedAt", alias = "createdAt", default)]
    pub submitted_at: Option<String>,
}

impl FeedbackRecord {
    /// The feedback text, whichever field it was stored under.
    pub fn body(&self) -> Option<&str> {
        self.message
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .or(self.feedback_text.as_deref())
    }
}
