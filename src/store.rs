//! In-memory session and snapshot store.
//!
//! `SessionStore` is the single owner of login state, the active resource
//! key, and the last-fetched snapshots. It is an explicit context passed to
//! the dispatcher and the route guard rather than a process-wide global;
//! every mutation goes through a named method so state only changes at
//! well-defined commit points.

use crate::auth::token;
use crate::models::{Comment, FileRecord, UserProfile};

#[derive(Default)]
pub struct SessionStore {
    logged_in: bool,
    username: Option<String>,
    /// Active subject of the current view (the hash being looked at)
    current_hash: Option<String>,
    file_data: Option<FileRecord>,
    user_data: Option<UserProfile>,
    comments: Vec<Comment>,
    /// Dismissible user-facing warning from the last failed action
    alert: Option<String>,
    /// Monotonic generation for file report requests; responses from an
    /// older generation lost the race and are discarded on commit.
    file_request_seq: u64,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ===== Read access =====

    pub fn logged_in(&self) -> bool {
        self.logged_in
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn current_hash(&self) -> Option<&str> {
        self.current_hash.as_deref()
    }

    pub fn file_data(&self) -> Option<&FileRecord> {
        self.file_data.as_ref()
    }

    pub fn user_data(&self) -> Option<&UserProfile> {
        self.user_data.as_ref()
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    // ===== Login state =====

    /// Derive the logged-in flag from a credential.
    ///
    /// No-op on an empty credential: an absent cookie never flips a live
    /// session to logged-out, that is what `reset` is for.
    pub fn set_logged_in(&mut self, credential: &str) {
        if credential.is_empty() {
            return;
        }
        self.logged_in = !token::is_expired(credential);
    }

    /// Extract the subject name from a credential. No-op on empty input;
    /// a credential without a name claim clears the username.
    pub fn set_username(&mut self, credential: &str) {
        if credential.is_empty() {
            return;
        }
        self.username = token::subject_name(credential);
    }

    /// Clear all session state: login flag, subject, snapshots, alert.
    /// The persisted credential is the dispatcher's job (`actions::log_out`).
    pub fn reset(&mut self) {
        self.logged_in = false;
        self.username = None;
        self.current_hash = None;
        self.file_data = None;
        self.user_data = None;
        self.comments.clear();
        self.alert = None;
    }

    // ===== Resource key =====

    pub fn set_current_hash(&mut self, hash: &str) {
        self.current_hash = Some(hash.to_string());
    }

    pub fn clear_current_hash(&mut self) {
        self.current_hash = None;
    }

    // ===== Snapshots (wholesale replacement, no partial merge) =====

    pub fn set_file_data(&mut self, data: FileRecord) {
        self.file_data = Some(data);
    }

    pub fn set_user_data(&mut self, data: UserProfile) {
        self.user_data = Some(data);
    }

    pub fn set_comments(&mut self, comments: Vec<Comment>) {
        self.comments = comments;
    }

    /// Replace the following list inside the profile snapshot
    pub fn set_following(&mut self, following: Vec<String>) {
        self.user_data.get_or_insert_with(Default::default).following = following;
    }

    /// Toggle a hash in the profile's likes list, returning the new state
    /// (true = now liked). Creates an empty profile if none is loaded yet.
    pub fn toggle_like(&mut self, sha256: &str) -> bool {
        let user = self.user_data.get_or_insert_with(Default::default);
        if let Some(pos) = user.likes.iter().position(|h| h == sha256) {
            user.likes.remove(pos);
            false
        } else {
            user.likes.push(sha256.to_string());
            true
        }
    }

    // ===== Alerts =====

    pub fn set_alert(&mut self, message: impl Into<String>) {
        self.alert = Some(message.into());
    }

    pub fn clear_alert(&mut self) {
        self.alert = None;
    }

    // ===== Request sequencing =====

    /// Issue a new file request generation
    pub fn begin_file_request(&mut self) -> u64 {
        self.file_request_seq += 1;
        self.file_request_seq
    }

    /// Whether a generation is still the latest issued file request
    pub fn is_latest_file_request(&self, seq: u64) -> bool {
        seq == self.file_request_seq
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine as _;
    use chrono::{Duration, Utc};

    fn credential(name: &str, exp_offset: Duration) -> String {
        let exp = (Utc::now() + exp_offset).timestamp();
        URL_SAFE_NO_PAD.encode(format!(r#"{{"name":"{}","exp":{}}}"#, name, exp))
    }

    #[test]
    fn test_valid_credential_logs_in() {
        let mut store = SessionStore::new();
        let cred = credential("alice", Duration::hours(1));
        store.set_logged_in(&cred);
        store.set_username(&cred);
        assert!(store.logged_in());
        assert_eq!(store.username(), Some("alice"));
    }

    #[test]
    fn test_expired_credential_does_not_log_in() {
        let mut store = SessionStore::new();
        store.set_logged_in(&credential("alice", Duration::hours(-1)));
        assert!(!store.logged_in());
    }

    #[test]
    fn test_empty_credential_is_a_noop() {
        let mut store = SessionStore::new();
        store.set_logged_in(&credential("alice", Duration::hours(1)));
        assert!(store.logged_in());

        // An empty payload must never flip the flag
        store.set_logged_in("");
        assert!(store.logged_in());
        store.set_username("");
        assert_eq!(store.username(), None); // was never set
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut store = SessionStore::new();
        let cred = credential("alice", Duration::hours(1));
        store.set_logged_in(&cred);
        store.set_username(&cred);
        store.set_current_hash("deadbeef");
        store.set_file_data(FileRecord::default());
        store.set_user_data(UserProfile::default());
        store.set_alert("warning");

        store.reset();
        assert!(!store.logged_in());
        assert_eq!(store.username(), None);
        assert_eq!(store.current_hash(), None);
        assert!(store.file_data().is_none());
        assert!(store.user_data().is_none());
        assert!(store.comments().is_empty());
        assert_eq!(store.alert(), None);
    }

    #[test]
    fn test_toggle_like() {
        let mut store = SessionStore::new();
        assert!(store.toggle_like("deadbeef"));
        assert!(store.user_data().unwrap().has_liked("deadbeef"));
        assert!(!store.toggle_like("deadbeef"));
        assert!(!store.user_data().unwrap().has_liked("deadbeef"));
    }

    #[test]
    fn test_file_request_generations() {
        let mut store = SessionStore::new();
        let first = store.begin_file_request();
        let second = store.begin_file_request();
        assert!(!store.is_latest_file_request(first));
        assert!(store.is_latest_file_request(second));
    }
}
