//! Submission validation.
//!
//! Turns a mutable [`SubmissionDraft`] into a [`NewFeedback`] payload, or reports the first rule
//! it breaks. Checks run in a fixed order and the first failure wins:
//!
//! 1. a category is selected,
//! 2. the body is non-empty after trimming,
//! 3. unless anonymous, name and email are both non-empty after trimming.
//!
//! Validation is purely local: no I/O, no logging beyond `debug`.

use crate::gateway::NewFeedback;
use crate::submission::SubmissionDraft;
use feedback_types::NonEmptyText;

/// First rule a draft breaks. `Display` is the user-visible message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please select a category.")]
    MissingCategory,
    #[error("Please enter your feedback.")]
    EmptyBody,
    #[error("Please enter your name and email, or submit anonymously.")]
    MissingIdentity,
}

/// Validates a draft and builds the payload to post.
///
/// # Errors
///
/// Returns the first [`ValidationError`] in rule order.
pub fn validate_draft(draft: &SubmissionDraft) -> Result<NewFeedback, ValidationError> {
    let category = draft.category.ok_or(ValidationError::MissingCategory)?;
    let body = NonEmptyText::new(&draft.body).map_err(|_| ValidationError::EmptyBody)?;

    let name = NonEmptyText::optional(&draft.name);
    let email = NonEmptyText::optional(&draft.email);
    if !draft.anonymous && (name.is_none() || email.is_none()) {
        return Err(ValidationError::MissingIdentity);
    }

    Ok(NewFeedback {
        name,
        email,
        phone: NonEmptyText::optional(&draft.phone),
        category,
        body,
        anonymous: draft.anonymous,
        attachment: draft.attachment.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Category;

    fn complete() -> SubmissionDraft {
        SubmissionDraft {
            name: "Amina".into(),
            email: "amina@example.com".into(),
            category: Some(Category::Complaint),
            body: "water leak in ward 3".into(),
            ..SubmissionDraft::empty(None)
        }
    }

    #[test]
    fn complete_draft_validates() {
        let payload = validate_draft(&complete()).unwrap();
        assert_eq!(payload.category, Category::Complaint);
        assert_eq!(payload.body.as_str(), "water leak in ward 3");
        assert_eq!(payload.name.unwrap().as_str(), "Amina");
        assert!(payload.phone.is_none());
    }

    #[test]
    fn category_is_checked_first() {
        let draft = SubmissionDraft {
            category: None,
            body: String::new(),
            name: String::new(),
            ..complete()
        };
        assert_eq!(validate_draft(&draft), Err(ValidationError::MissingCategory));
    }

    #[test]
    fn whitespace_body_is_empty() {
        let draft = SubmissionDraft {
            body: "  \n\t".into(),
            name: String::new(),
            ..complete()
        };
        assert_eq!(validate_draft(&draft), Err(ValidationError::EmptyBody));
    }

    #[test]
    fn identity_required_unless_anonymous() {
        let draft = SubmissionDraft {
            email: "   ".into(),
            ..complete()
        };
        assert_eq!(validate_draft(&draft), Err(ValidationError::MissingIdentity));

        let anonymous = SubmissionDraft {
            name: String::new(),
            email: String::new(),
            anonymous: true,
            ..complete()
        };
        let payload = validate_draft(&anonymous).unwrap();
        assert!(payload.anonymous);
        assert!(payload.name.is_none());
    }

    #[test]
    fn messages_are_user_facing() {
        assert_eq!(
            ValidationError::MissingCategory.to_string(),
            "Please select a category."
        );
    }
}
