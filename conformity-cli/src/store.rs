//! Client-local persisted state
//!
//! Holds the session id of the job being tracked and the theme preference,
//! keyed by fixed names in a small JSON file. Only the session id is ever
//! purged; the theme outlives sessions.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use conformity_core::domain::job::SessionId;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Errors raised while reading or writing the session file
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access session file: {0}")]
    Io(#[from] std::io::Error),

    #[error("session file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Color theme preference
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

/// Storage for client-local state
///
/// Trait-based so the controller can be tested without touching disk.
pub trait SessionStore: Send + Sync {
    /// The session id of the tracked job, if any
    fn session_id(&self) -> StoreResult<Option<SessionId>>;

    /// Remembers the session id of a newly submitted job
    fn set_session_id(&self, id: &SessionId) -> StoreResult<()>;

    /// Forgets the tracked job
    fn clear_session_id(&self) -> StoreResult<()>;

    fn theme(&self) -> StoreResult<Theme>;

    fn set_theme(&self, theme: Theme) -> StoreResult<()>;
}

/// On-disk layout of the session file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct StoredState {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "blank_as_none"
    )]
    processing_session_id: Option<SessionId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    saved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    theme: Theme,
}

/// Reads a stored session id; a blank one means no job
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<SessionId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(SessionId::parse))
}

/// Session store backed by a JSON file
pub struct FileSessionStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> StoreResult<StoredState> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(StoredState::default()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(StoredState::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, state: &StoredState) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(state)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }

    /// Read-modify-write under the store lock
    fn update(&self, f: impl FnOnce(&mut StoredState)) -> StoreResult<()> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut state = self.read()?;
        f(&mut state);
        self.write(&state)
    }
}

impl SessionStore for FileSessionStore {
    fn session_id(&self) -> StoreResult<Option<SessionId>> {
        Ok(self.read()?.processing_session_id)
    }

    fn set_session_id(&self, id: &SessionId) -> StoreResult<()> {
        self.update(|state| {
            state.processing_session_id = Some(id.clone());
            state.saved_at = Some(Utc::now());
        })
    }

    fn clear_session_id(&self) -> StoreResult<()> {
        self.update(|state| {
            state.processing_session_id = None;
            state.saved_at = None;
        })
    }

    fn theme(&self) -> StoreResult<Theme> {
        Ok(self.read()?.theme)
    }

    fn set_theme(&self, theme: Theme) -> StoreResult<()> {
        self.update(|state| state.theme = theme)
    }
}

/// In-memory session store
#[derive(Default)]
pub struct InMemorySessionStore {
    state: Mutex<(Option<SessionId>, Theme)>,
}

impl InMemorySessionStore {
    pub fn with_session(id: SessionId) -> Self {
        Self {
            state: Mutex::new((Some(id), Theme::default())),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, (Option<SessionId>, Theme)> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl SessionStore for InMemorySessionStore {
    fn session_id(&self) -> StoreResult<Option<SessionId>> {
        Ok(self.lock().0.clone())
    }

    fn set_session_id(&self, id: &SessionId) -> StoreResult<()> {
        self.lock().0 = Some(id.clone());
        Ok(())
    }

    fn clear_session_id(&self) -> StoreResult<()> {
        self.lock().0 = None;
        Ok(())
    }

    fn theme(&self) -> StoreResult<Theme> {
        Ok(self.lock().1)
    }

    fn set_theme(&self, theme: Theme) -> StoreResult<()> {
        self.lock().1 = theme;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_empty_state() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("nested/session.json"));
        assert!(store.session_id().unwrap().is_none());
        assert_eq!(store.theme().unwrap(), Theme::Light);
    }

    #[test]
    fn test_session_roundtrip_and_purge_keeps_theme() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("session.json"));
        let id = SessionId::parse("abc-123").unwrap();

        store.set_theme(Theme::Dark).unwrap();
        store.set_session_id(&id).unwrap();

        let reopened = FileSessionStore::new(store.path());
        assert_eq!(reopened.session_id().unwrap(), Some(id));

        reopened.clear_session_id().unwrap();
        assert!(store.session_id().unwrap().is_none());
        assert_eq!(store.theme().unwrap(), Theme::Dark);
    }

    #[test]
    fn test_file_uses_fixed_key_names() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("session.json"));
        store
            .set_session_id(&SessionId::parse("s1").unwrap())
            .unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["processing_session_id"], "s1");
        assert_eq!(value["theme"], "light");
        assert!(value.get("saved_at").is_some());
    }

    #[test]
    fn test_blank_stored_session_is_no_job() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, r#"{"processing_session_id": "  ", "theme": "dark"}"#).unwrap();

        let store = FileSessionStore::new(&path);
        assert!(store.session_id().unwrap().is_none());
        assert_eq!(store.theme().unwrap(), Theme::Dark);

        fs::write(&path, r#"{"processing_session_id": null}"#).unwrap();
        assert!(store.session_id().unwrap().is_none());
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{not json").unwrap();

        let store = FileSessionStore::new(&path);
        assert!(matches!(store.session_id(), Err(StoreError::Corrupt(_))));
    }

    #[test]
    fn test_theme_toggle() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled().as_str(), "light");
    }
}
