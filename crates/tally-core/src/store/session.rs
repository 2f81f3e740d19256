//! Session storage
//!
//! Auth tokens survive between runs through a small key/value store that is
//! chosen once at startup and handed to the store client. Nothing reads or
//! writes tokens through a global.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{SessionConfig, SessionKind};
use crate::error::{Error, Result};

/// Storage key for the serialized session
const SESSION_KEY: &str = "tally.session";

/// An authenticated session with the hosted store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub user_id: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Whether the access token should be refreshed before use
    ///
    /// Refreshes half a minute early so an in-flight request doesn't race
    /// the expiry.
    pub fn needs_refresh(&self) -> bool {
        Utc::now() + Duration::seconds(30) >= self.expires_at
    }
}

/// Key/value storage for session tokens
///
/// `Memory` keeps tokens for the process lifetime only; `File` persists them
/// as JSON under the platform data dir (mode 0600 on unix). The variant is
/// picked from [`SessionConfig`] once and injected where needed.
pub enum SessionStore {
    Memory(Mutex<HashMap<String, String>>),
    File(PathBuf),
}

impl SessionStore {
    /// In-memory store, discarded on exit
    pub fn memory() -> Self {
        Self::Memory(Mutex::new(HashMap::new()))
    }

    /// File-backed store at an explicit path
    pub fn file(path: PathBuf) -> Self {
        Self::File(path)
    }

    /// Build the store described by the resolved configuration
    pub fn from_config(config: &SessionConfig) -> Result<Self> {
        match config.kind {
            SessionKind::Memory => Ok(Self::memory()),
            SessionKind::File => {
                let path = match config.path {
                    Some(ref p) => p.clone(),
                    None => default_session_path().ok_or_else(|| {
                        Error::Config("no data directory for session file".into())
                    })?,
                };
                Ok(Self::file(path))
            }
        }
    }

    /// Fetch a value by key
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        match self {
            Self::Memory(map) => Ok(map.lock().unwrap().get(key).cloned()),
            Self::File(path) => Ok(read_file_map(path)?.remove(key)),
        }
    }

    /// Store a value under a key
    pub fn put(&self, key: &str, value: &str) -> Result<()> {
        match self {
            Self::Memory(map) => {
                map.lock().unwrap().insert(key.to_string(), value.to_string());
                Ok(())
            }
            Self::File(path) => {
                let mut entries = read_file_map(path)?;
                entries.insert(key.to_string(), value.to_string());
                write_file_map(path, &entries)
            }
        }
    }

    /// Remove a key
    pub fn delete(&self, key: &str) -> Result<()> {
        match self {
            Self::Memory(map) => {
                map.lock().unwrap().remove(key);
                Ok(())
            }
            Self::File(path) => {
                let mut entries = read_file_map(path)?;
                if entries.remove(key).is_some() {
                    write_file_map(path, &entries)?;
                }
                Ok(())
            }
        }
    }

    /// Load the persisted session, if any
    pub fn load_session(&self) -> Result<Option<Session>> {
        match self.get(SESSION_KEY)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Persist a session
    pub fn save_session(&self, session: &Session) -> Result<()> {
        self.put(SESSION_KEY, &serde_json::to_string(session)?)
    }

    /// Drop the persisted session
    pub fn clear_session(&self) -> Result<()> {
        self.delete(SESSION_KEY)
    }
}

/// Default session file path (~/.local/share/tally/session.json)
pub fn default_session_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("tally").join("session.json"))
}

fn read_file_map(path: &Path) -> Result<HashMap<String, String>> {
    if !path.exists() {
        return Ok(HashMap::new());
    }
    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(HashMap::new());
    }
    Ok(serde_json::from_str(&content)?)
}

fn write_file_map(path: &Path, entries: &HashMap<String, String>) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(entries)?)?;

    // Tokens only readable by the owner
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_session(expires_in_secs: i64) -> Session {
        Session {
            access_token: "access-abc".to_string(),
            refresh_token: "refresh-def".to_string(),
            user_id: "user-1".to_string(),
            expires_at: Utc::now() + Duration::seconds(expires_in_secs),
        }
    }

    #[test]
    fn test_memory_round_trip() {
        let store = SessionStore::memory();
        assert!(store.get("k").unwrap().is_none());

        store.put("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));

        store.delete("k").unwrap();
        assert!(store.get("k").unwrap().is_none());
    }

    #[test]
    fn test_file_round_trip_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        {
            let store = SessionStore::file(path.clone());
            store.save_session(&sample_session(3600)).unwrap();
        }

        // A fresh store over the same path sees the session
        let store = SessionStore::file(path.clone());
        let session = store.load_session().unwrap().unwrap();
        assert_eq!(session.user_id, "user-1");

        store.clear_session().unwrap();
        assert!(store.load_session().unwrap().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_file_permissions_are_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let store = SessionStore::file(path.clone());
        store.save_session(&sample_session(3600)).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::file(dir.path().join("nope.json"));
        assert!(store.get("anything").unwrap().is_none());
        assert!(store.load_session().unwrap().is_none());
    }

    #[test]
    fn test_needs_refresh() {
        assert!(sample_session(10).needs_refresh());
        assert!(!sample_session(3600).needs_refresh());
    }

    #[test]
    fn test_from_config_memory() {
        let store = SessionStore::from_config(&SessionConfig {
            kind: SessionKind::Memory,
            path: None,
        })
        .unwrap();
        assert!(matches!(store, SessionStore::Memory(_)));
    }
}
