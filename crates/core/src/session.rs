//! Moderator session storage.
//!
//! The session token is the only state shared across components and the only durable artifact
//! the client keeps. It is held behind the [`SessionStore`] trait so the Access Gate and the
//! HTTP gateway receive it explicitly instead of reaching for a process-wide global.
//!
//! - [`FileSessionStore`] persists a small JSON key/value document on disk; the token lives
//!   under [`SESSION_TOKEN_KEY`]. Every `get` re-reads the file, so a token removed out of band
//!   is noticed on the next read.
//! - [`MemorySessionStore`] keeps the token in memory, for tests and embedding.

use crate::constants::SESSION_TOKEN_KEY;
use crate::{FeedbackError, FeedbackResult};
use feedback_types::NonEmptyText;
use serde_json::{Map, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Opaque moderator credential. Never blank.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(NonEmptyText);

impl SessionToken {
    pub fn new(token: impl AsRef<str>) -> FeedbackResult<Self> {
        NonEmptyText::new(token)
            .map(Self)
            .map_err(|_| FeedbackError::InvalidInput("session token cannot be empty".into()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionToken(***)")
    }
}

pub trait SessionStore: Send + Sync {
    /// Current token, if any. Read failures count as "no token".
    fn get(&self) -> Option<SessionToken>;
    fn set(&self, token: SessionToken) -> FeedbackResult<()>;
    fn clear(&self) -> FeedbackResult<()>;
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    token: Mutex<Option<SessionToken>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: SessionToken) -> Self {
        Self {
            token: Mutex::new(Some(token)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Option<SessionToken> {
        self.token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set(&self, token: SessionToken) -> FeedbackResult<()> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token);
        Ok(())
    }

    fn clear(&self) -> FeedbackResult<()> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

/// Durable key/value session store backed by a JSON file.
///
/// Other keys in the document are preserved when the token is written or cleared.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> FeedbackResult<Map<String, Value>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(source) => {
                return Err(FeedbackError::SessionRead {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if contents.trim().is_empty() {
            return Ok(Map::new());
        }

        serde_json::from_str(&contents).map_err(FeedbackError::Deserialization)
    }

    fn write_document(&self, document: &Map<String, Value>) -> FeedbackResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| FeedbackError::SessionWrite {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let json = serde_json::to_string_pretty(document).map_err(FeedbackError::Serialization)?;
        fs::write(&self.path, json).map_err(|source| FeedbackError::SessionWrite {
            path: self.path.clone(),
            source,
        })
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self) -> Option<SessionToken> {
        let document = match self.read_document() {
            Ok(document) => document,
            Err(e) => {
                tracing::warn!("session store unreadable, treating as signed out: {}", e);
                return None;
            }
        };

        document
            .get(SESSION_TOKEN_KEY)
            .and_then(Value::as_str)
            .and_then(|raw| SessionToken::new(raw).ok())
    }

    fn set(&self, token: SessionToken) -> FeedbackResult<()> {
        // A corrupt document is replaced rather than blocking a fresh login.
        let mut document = self.read_document().unwrap_or_default();
        document.insert(
            SESSION_TOKEN_KEY.to_string(),
            Value::String(token.as_str().to_string()),
        );
        self.write_document(&document)?;
        tracing::info!(path = %self.path.display(), "session token stored");
        Ok(())
    }

    fn clear(&self) -> FeedbackResult<()> {
        let mut document = self.read_document().unwrap_or_default();
        if document.remove(SESSION_TOKEN_KEY).is_none() && !self.path.exists() {
            return Ok(());
        }
        self.write_document(&document)?;
        tracing::info!(path = %self.path.display(), "session token cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn token_rejects_blank() {
        assert!(SessionToken::new("  ").is_err());
        assert_eq!(format!("{:?}", SessionToken::new("secret").unwrap()), "SessionToken(***)");
    }

    #[test]
    fn memory_store_set_get_clear() {
        let store = MemorySessionStore::new();
        assert!(store.get().is_none());

        store.set(SessionToken::new("t1").unwrap()).unwrap();
        assert_eq!(store.get().unwrap().as_str(), "t1");

        store.clear().unwrap();
        assert!(store.get().is_none());
    }

    #[test]
    fn file_store_survives_new_instance() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("session.json");

        FileSessionStore::new(&path)
            .set(SessionToken::new("durable").unwrap())
            .unwrap();

        let reopened = FileSessionStore::new(&path);
        assert_eq!(reopened.get().unwrap().as_str(), "durable");
    }

    #[test]
    fn file_store_missing_file_is_signed_out() {
        let temp = TempDir::new().unwrap();
        let store = FileSessionStore::new(temp.path().join("absent.json"));
        assert!(store.get().is_none());
        store.clear().unwrap();
        assert!(!store.path().exists());
    }

    #[test]
    fn file_store_notices_out_of_band_removal() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("session.json");
        let store = FileSessionStore::new(&path);
        store.set(SessionToken::new("t").unwrap()).unwrap();
        assert!(store.get().is_some());

        fs::remove_file(&path).unwrap();
        assert!(store.get().is_none());
    }

    #[test]
    fn file_store_preserves_other_keys() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("session.json");
        fs::write(&path, r#"{"theme":"dark"}"#).unwrap();

        let store = FileSessionStore::new(&path);
        store.set(SessionToken::new("t").unwrap()).unwrap();
        store.clear().unwrap();

        let doc: Map<String, Value> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(doc.get("theme").and_then(Value::as_str), Some("dark"));
        assert!(!doc.contains_key(SESSION_TOKEN_KEY));
    }

    #[test]
    fn file_store_corrupt_document_reads_as_signed_out() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("session.json");
        fs::write(&path, "not json").unwrap();

        let store = FileSessionStore::new(&path);
        assert!(store.get().is_none());

        store.set(SessionToken::new("fresh").unwrap()).unwrap();
        assert_eq!(store.get().unwrap().as_str(), "fresh");
    }
}
