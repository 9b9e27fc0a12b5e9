use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Last-fetched copy of a user profile.
///
/// Like `FileRecord`, all fields are optional because of the `fields`
/// query. The avatar is not part of the API response; it is fetched
/// separately as binary and merged in base64 form by the dispatcher.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub confirmed: bool,
    #[serde(default)]
    pub member_since: Option<DateTime<Utc>>,
    /// Hashes of files this user liked
    #[serde(default)]
    pub likes: Vec<String>,
    /// Usernames this user follows
    #[serde(default)]
    pub following: Vec<String>,
    #[serde(default)]
    pub followers: Vec<String>,
    /// Base64-encoded avatar image, merged client-side after fetch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl UserProfile {
    /// Display name: "First Last" when available, else the username
    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.clone(),
            _ => self.username.clone().unwrap_or_default(),
        }
    }

    pub fn has_liked(&self, sha256: &str) -> bool {
        self.likes.iter().any(|h| h == sha256)
    }
}

/// A comment left on a file report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name() {
        let mut user = UserProfile {
            username: Some("alice".to_string()),
            ..Default::default()
        };
        assert_eq!(user.display_name(), "alice");

        user.first_name = Some("Alice".to_string());
        user.last_name = Some("Liddell".to_string());
        assert_eq!(user.display_name(), "Alice Liddell");
    }

    #[test]
    fn test_parse_fields_filtered_profile() {
        // fields=following returns just that list
        let json = r#"{"following":["bob","carol"]}"#;
        let user: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(user.following, vec!["bob", "carol"]);
        assert_eq!(user.username, None);
    }

    #[test]
    fn test_has_liked() {
        let user = UserProfile {
            likes: vec!["deadbeef".to_string()],
            ..Default::default()
        };
        assert!(user.has_liked("deadbeef"));
        assert!(!user.has_liked("cafebabe"));
    }
}
