//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the services. Nothing
//! in the core reads environment variables while an operation is running; the binary reads them
//! and hands the raw values to the helpers below.

use crate::constants::{DEFAULT_API_BASE_URL, DEFAULT_SESSION_FILE};
use crate::{FeedbackError, FeedbackResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    api_base_url: String,
    session_file: PathBuf,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns `FeedbackError::Config` if `api_base_url` is not an absolute `http`/`https` URL.
    pub fn new(api_base_url: String, session_file: PathBuf) -> FeedbackResult<Self> {
        validate_api_base_url(&api_base_url)?;

        Ok(Self {
            api_base_url,
            session_file,
        })
    }

    /// Backend base URL exactly as configured (trailing slashes are tolerated everywhere it is
    /// joined).
    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    pub fn session_file(&self) -> &Path {
        &self.session_file
    }

    /// Build a configuration from optional raw environment values.
    ///
    /// Missing or blank values fall back to [`DEFAULT_API_BASE_URL`] and
    /// [`DEFAULT_SESSION_FILE`].
    pub fn from_env_values(
        api_base_url: Option<String>,
        session_file: Option<String>,
    ) -> FeedbackResult<Self> {
        let api_base_url = non_blank(api_base_url).unwrap_or_else(|| DEFAULT_API_BASE_URL.into());
        let session_file = non_blank(session_file)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE));

        Self::new(api_base_url, session_file)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Checks that the base URL is absolute and uses `http` or `https`.
pub fn validate_api_base_url(value: &str) -> FeedbackResult<()> {
    let url = reqwest::Url::parse(value.trim())
        .map_err(|e| FeedbackError::Config(format!("api base url {value:?} is invalid: {e}")))?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(FeedbackError::Config(format!(
            "api base url must use http or https, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_for_missing_and_blank_values() {
        let cfg = CoreConfig::from_env_values(None, Some("   ".into())).unwrap();
        assert_eq!(cfg.api_base_url(), DEFAULT_API_BASE_URL);
        assert_eq!(cfg.session_file(), Path::new(DEFAULT_SESSION_FILE));
    }

    #[test]
    fn explicit_values_are_kept() {
        let cfg = CoreConfig::from_env_values(
            Some("https://feedback.example.org/".into()),
            Some("/tmp/session.json".into()),
        )
        .unwrap();
        assert_eq!(cfg.api_base_url(), "https://feedback.example.org/");
        assert_eq!(cfg.session_file(), Path::new("/tmp/session.json"));
    }

    #[test]
    fn rejects_relative_or_non_http_urls() {
        assert!(matches!(
            CoreConfig::new("feedback.example.org".into(), PathBuf::from("s.json")),
            Err(FeedbackError::Config(_))
        ));
        assert!(matches!(
            CoreConfig::new("ftp://feedback.example.org".into(), PathBuf::from("s.json")),
            Err(FeedbackError::Config(_))
        ));
    }
}
