#[derive(Debug, thiserror::Error)]
pub enum FeedbackError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to read session store {}: {source}", .path.display())]
    SessionRead {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write session store {}: {source}", .path.display())]
    SessionWrite {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize session store: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize session store: {0}")]
    Deserialization(serde_json::Error),

    #[error("attachment error: {0}")]
    Attachment(#[from] feedback_files::FilesError),
}

pub type FeedbackResult<T> = std::result::Result<T, FeedbackError>;

#[cfg(test)]
mod tests {
    use super::*;
    use feedback_files::FilesError;

    #[test]
    fn attachment_errors_convert() {
        let err: FeedbackError = FilesError::TooLarge {
            size: 11,
            limit: 10,
        }
        .into();
        assert!(matches!(err, FeedbackError::Attachment(FilesError::TooLarge { .. })));
        assert!(err.to_string().starts_with("attachment error: "));
    }
}
