//! Action dispatcher: orchestrates API fetches and commits results into the
//! session store.
//!
//! Every entry point is terminal for errors. A failed fetch becomes a
//! user-facing alert or a log line, never an `Err` bubbling into the
//! navigation layer. Each call issues exactly one outstanding request; no
//! coalescing or de-duplication is done. The file report commit discards
//! responses that lost the race against a newer request; the auxiliary
//! fetches (avatar, likes, comments, following) keep last-write-wins.

use anyhow::Result;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use tracing::{debug, warn};

use crate::api::{ApiClient, ApiError};
use crate::auth::Session;
use crate::models::{Comment, FileRecord, UserProfile};
use crate::store::SessionStore;
use crate::utils::short_hash;

/// Fields fetched for a file report when the caller does not narrow them:
/// the subset the summary view renders first.
pub const DEFAULT_FILE_FIELDS: &[&str] = &[
    "md5",
    "sha1",
    "sha256",
    "size",
    "magic",
    "first_seen",
    "multiav",
    "tags",
];

/// Derive login state and subject name from a credential
pub fn update_logged_in(store: &mut SessionStore, credential: &str) {
    store.set_logged_in(credential);
    store.set_username(credential);
}

/// Log out: delete the persisted credential and reset in-memory state
pub fn log_out(store: &mut SessionStore, session: &mut Session) {
    if let Err(e) = session.clear() {
        warn!(error = %e, "Failed to clear persisted credential");
    }
    store.reset();
}

/// Fetch a file report and replace the file snapshot.
///
/// On failure the active hash is cleared so the view degrades to the
/// upload prompt, while any previous snapshot stays readable.
pub async fn update_file(
    store: &mut SessionStore,
    client: &ApiClient,
    sha256: &str,
    fields: Option<&[&str]>,
) {
    let fields = fields.unwrap_or(DEFAULT_FILE_FIELDS);
    let seq = store.begin_file_request();
    let result = client.fetch_file(sha256, fields).await;
    commit_file_result(store, sha256, seq, result);
}

/// Commit a file fetch outcome. Split from the fetch so the transition is
/// testable without a live endpoint.
fn commit_file_result(
    store: &mut SessionStore,
    sha256: &str,
    seq: u64,
    result: Result<FileRecord>,
) {
    if !store.is_latest_file_request(seq) {
        debug!(sha256, "Discarding superseded file response");
        return;
    }
    match result {
        Ok(record) => {
            store.set_file_data(record);
            store.set_current_hash(sha256);
            store.clear_alert();
        }
        Err(e) => {
            warn!(sha256, error = %e, "File report fetch failed");
            let not_found = e
                .downcast_ref::<ApiError>()
                .map(ApiError::is_not_found)
                .unwrap_or(false);
            if not_found {
                store.set_alert(format!("No report found for {}", short_hash(sha256)));
            } else {
                store.set_alert(format!("Could not load report for {}", short_hash(sha256)));
            }
            store.clear_current_hash();
        }
    }
}

/// Fetch a user profile, then its avatar, and replace the user snapshot.
///
/// A failed avatar fetch does not block the rest of the profile; a failed
/// profile fetch leaves the prior snapshot intact. Both are logged only.
pub async fn update_user_data(store: &mut SessionStore, client: &ApiClient, username: &str) {
    let profile = match client.fetch_user(username, None).await {
        Ok(profile) => profile,
        Err(e) => {
            warn!(username, error = %e, "Profile fetch failed");
            return;
        }
    };

    let avatar = match client.fetch_avatar(username).await {
        Ok(bytes) => Some(STANDARD.encode(bytes)),
        Err(e) => {
            debug!(username, error = %e, "Avatar fetch failed, showing profile without it");
            None
        }
    };

    commit_user_result(store, profile, avatar);
}

fn commit_user_result(store: &mut SessionStore, mut profile: UserProfile, avatar: Option<String>) {
    profile.avatar = avatar;
    store.set_user_data(profile);
}

/// Toggle the current user's like on a file.
///
/// The remote call happens first; the local list only changes after it
/// succeeds, so a failure leaves prior state intact.
pub async fn add_remove_like(store: &mut SessionStore, client: &ApiClient, sha256: &str) {
    let liked = store
        .user_data()
        .map(|u| u.has_liked(sha256))
        .unwrap_or(false);

    let result = if liked {
        client.unlike_file(sha256).await
    } else {
        client.like_file(sha256).await
    };

    match result {
        Ok(()) => {
            store.toggle_like(sha256);
            store.clear_alert();
        }
        Err(e) => {
            warn!(sha256, error = %e, "Like update failed");
            store.set_alert("Could not update like");
        }
    }
}

/// Refresh the comment list for a file
pub async fn update_comments(store: &mut SessionStore, client: &ApiClient, sha256: &str) {
    let result = client.fetch_comments(sha256).await;
    commit_comments_result(store, sha256, result);
}

fn commit_comments_result(store: &mut SessionStore, sha256: &str, result: Result<Vec<Comment>>) {
    match result {
        Ok(comments) => {
            store.set_comments(comments);
            store.clear_alert();
        }
        Err(e) => {
            warn!(sha256, error = %e, "Comments fetch failed");
            store.set_alert("Could not load comments");
        }
    }
}

/// Refresh the following list inside the profile snapshot
pub async fn update_following(store: &mut SessionStore, client: &ApiClient, username: &str) {
    match client.fetch_user(username, Some(&["following"])).await {
        Ok(profile) => {
            store.set_following(profile.following);
            store.clear_alert();
        }
        Err(e) => {
            warn!(username, error = %e, "Following fetch failed");
            store.set_alert("Could not load following list");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine as _;
    use chrono::{Duration, Utc};
    use reqwest::StatusCode;

    fn credential(name: &str, exp_offset: Duration) -> String {
        let exp = (Utc::now() + exp_offset).timestamp();
        URL_SAFE_NO_PAD.encode(format!(r#"{{"name":"{}","exp":{}}}"#, name, exp))
    }

    fn sample_record(sha256: &str) -> FileRecord {
        FileRecord {
            sha256: Some(sha256.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_update_logged_in_sets_flag_and_name() {
        let mut store = SessionStore::new();
        update_logged_in(&mut store, &credential("alice", Duration::hours(1)));
        assert!(store.logged_in());
        assert_eq!(store.username(), Some("alice"));
    }

    #[test]
    fn test_log_out_clears_store_and_session() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = crate::auth::Session::new(dir.path().to_path_buf());
        session.update(crate::auth::SessionData::new(
            credential("alice", Duration::hours(1)),
            Some("alice".to_string()),
        ));
        session.save().unwrap();

        let mut store = SessionStore::new();
        update_logged_in(&mut store, session.credential().unwrap());
        assert!(store.logged_in());

        log_out(&mut store, &mut session);
        assert!(!store.logged_in());
        assert!(store.user_data().is_none());
        assert!(session.data.is_none());

        let mut reloaded = crate::auth::Session::new(dir.path().to_path_buf());
        assert!(!reloaded.load().unwrap());
    }

    #[test]
    fn test_file_fetch_failure_clears_hash_keeps_snapshot() {
        let mut store = SessionStore::new();

        // A previous report is on screen
        let seq = store.begin_file_request();
        commit_file_result(&mut store, "cafebabe", seq, Ok(sample_record("cafebabe")));
        assert_eq!(store.current_hash(), Some("cafebabe"));

        // The next fetch 404s
        let seq = store.begin_file_request();
        let err = ApiError::from_status(StatusCode::NOT_FOUND, "no such file");
        commit_file_result(&mut store, "deadbeef", seq, Err(err.into()));

        assert_eq!(store.current_hash(), None);
        assert!(store.alert().unwrap().contains("deadbeef"));
        // Stale snapshot stays readable until the next navigation
        assert_eq!(
            store.file_data().unwrap().sha256.as_deref(),
            Some("cafebabe")
        );
    }

    #[test]
    fn test_superseded_file_response_is_discarded() {
        let mut store = SessionStore::new();

        let old_seq = store.begin_file_request();
        let new_seq = store.begin_file_request();

        // Newer request settles first
        commit_file_result(&mut store, "22222222", new_seq, Ok(sample_record("22222222")));
        // Older response arrives late and must not overwrite
        commit_file_result(&mut store, "11111111", old_seq, Ok(sample_record("11111111")));

        assert_eq!(store.current_hash(), Some("22222222"));
        assert_eq!(
            store.file_data().unwrap().sha256.as_deref(),
            Some("22222222")
        );
    }

    #[test]
    fn test_successful_fetch_clears_previous_alert() {
        let mut store = SessionStore::new();
        store.set_alert("old warning");

        let seq = store.begin_file_request();
        commit_file_result(&mut store, "cafebabe", seq, Ok(sample_record("cafebabe")));
        assert_eq!(store.alert(), None);
    }

    #[test]
    fn test_profile_commit_with_and_without_avatar() {
        let mut store = SessionStore::new();
        let profile = UserProfile {
            username: Some("alice".to_string()),
            ..Default::default()
        };
        commit_user_result(&mut store, profile.clone(), Some("aGVsbG8=".to_string()));
        assert_eq!(store.user_data().unwrap().avatar.as_deref(), Some("aGVsbG8="));

        // Avatar failure still commits the profile
        commit_user_result(&mut store, profile, None);
        let user = store.user_data().unwrap();
        assert_eq!(user.username.as_deref(), Some("alice"));
        assert!(user.avatar.is_none());
    }

    #[test]
    fn test_comments_success_clears_previous_alert() {
        let mut store = SessionStore::new();
        store.set_alert("old warning");

        commit_comments_result(
            &mut store,
            "deadbeef",
            Ok(vec![Comment {
                username: Some("bob".to_string()),
                body: "looks packed".to_string(),
                timestamp: None,
            }]),
        );

        assert_eq!(store.alert(), None);
        assert_eq!(store.comments().len(), 1);
    }

    #[test]
    fn test_comments_failure_keeps_prior_list() {
        let mut store = SessionStore::new();
        store.set_comments(vec![Comment {
            username: Some("bob".to_string()),
            body: "looks packed".to_string(),
            timestamp: None,
        }]);

        let err = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "boom");
        commit_comments_result(&mut store, "deadbeef", Err(err.into()));

        assert_eq!(store.comments().len(), 1);
        assert!(store.alert().is_some());
    }
}
