use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::token;

/// Session file name in cache directory
const SESSION_FILE: &str = "session.json";

/// Persisted credential entry.
///
/// The single named entry persisted between runs, playing the role a session
/// cookie does in a browser: the encoded credential plus the username it was
/// issued for. Replaced wholesale on login and deleted on logout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    pub credential: String,
    pub username: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl SessionData {
    pub fn new(credential: String, username: Option<String>) -> Self {
        Self {
            credential,
            username,
            created_at: Utc::now(),
        }
    }

    /// Expiry comes from the credential itself, not a stored timestamp.
    pub fn is_expired(&self) -> bool {
        token::is_expired(&self.credential)
    }
}

pub struct Session {
    cache_dir: PathBuf,
    pub data: Option<SessionData>,
}

impl Session {
    pub fn new(cache_dir: PathBuf) -> Self {
        Self {
            cache_dir,
            data: None,
        }
    }

    /// Load the persisted credential from disk.
    ///
    /// Returns true when a non-expired credential was found. An expired
    /// entry is left on disk untouched; the caller decides when to clear it.
    pub fn load(&mut self) -> Result<bool> {
        let path = self.session_path();
        if path.exists() {
            let contents =
                std::fs::read_to_string(&path).context("Failed to read session file")?;
            let data: SessionData =
                serde_json::from_str(&contents).context("Failed to parse session file")?;

            if !data.is_expired() {
                self.data = Some(data);
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Save the current credential to disk
    pub fn save(&self) -> Result<()> {
        if let Some(ref data) = self.data {
            let path = self.session_path();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let contents = serde_json::to_string_pretty(data)?;
            std::fs::write(path, contents)?;
        }
        Ok(())
    }

    /// Clear the credential in memory and on disk
    pub fn clear(&mut self) -> Result<()> {
        self.data = None;
        let path = self.session_path();
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    /// Replace the credential entry
    pub fn update(&mut self, data: SessionData) {
        self.data = Some(data);
    }

    /// The encoded credential, if one is loaded
    pub fn credential(&self) -> Option<&str> {
        self.data.as_ref().map(|d| d.credential.as_str())
    }

    pub fn username(&self) -> Option<&str> {
        self.data.as_ref().and_then(|d| d.username.as_deref())
    }

    /// Check if a non-expired credential is loaded
    pub fn is_valid(&self) -> bool {
        self.data.as_ref().map(|d| !d.is_expired()).unwrap_or(false)
    }

    fn session_path(&self) -> PathBuf {
        self.cache_dir.join(SESSION_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine as _;
    use chrono::Duration;

    fn credential(name: &str, exp_offset: Duration) -> String {
        let exp = (Utc::now() + exp_offset).timestamp();
        URL_SAFE_NO_PAD.encode(format!(r#"{{"name":"{}","exp":{}}}"#, name, exp))
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::new(dir.path().to_path_buf());
        session.update(SessionData::new(
            credential("alice", Duration::hours(1)),
            Some("alice".to_string()),
        ));
        session.save().unwrap();

        let mut reloaded = Session::new(dir.path().to_path_buf());
        assert!(reloaded.load().unwrap());
        assert!(reloaded.is_valid());
        assert_eq!(reloaded.username(), Some("alice"));
    }

    #[test]
    fn test_expired_credential_is_not_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::new(dir.path().to_path_buf());
        session.update(SessionData::new(
            credential("alice", Duration::hours(-1)),
            Some("alice".to_string()),
        ));
        session.save().unwrap();

        let mut reloaded = Session::new(dir.path().to_path_buf());
        assert!(!reloaded.load().unwrap());
        assert!(reloaded.data.is_none());
    }

    #[test]
    fn test_clear_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::new(dir.path().to_path_buf());
        session.update(SessionData::new(
            credential("alice", Duration::hours(1)),
            None,
        ));
        session.save().unwrap();
        session.clear().unwrap();

        assert!(session.data.is_none());
        let mut reloaded = Session::new(dir.path().to_path_buf());
        assert!(!reloaded.load().unwrap());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::new(dir.path().to_path_buf());
        assert!(!session.load().unwrap());
        assert!(!session.is_valid());
    }
}
