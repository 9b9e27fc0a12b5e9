use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::models::{FileRecord, UserProfile};

/// Consider cache stale after 1 hour.
/// Scan reports change rarely; profiles even less so.
const CACHE_STALE_MINUTES: i64 = 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedData<T> {
    pub data: T,
    pub cached_at: DateTime<Utc>,
}

impl<T> CachedData<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }

    pub fn age_minutes(&self) -> i64 {
        (Utc::now() - self.cached_at).num_minutes()
    }

    pub fn age_display(&self) -> String {
        let minutes = self.age_minutes();
        if minutes < 1 {
            // Also covers clock skew (negative ages)
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            format!("{}h ago", minutes / 60)
        } else {
            format!("{}d ago", minutes / 1440)
        }
    }

    pub fn is_stale(&self) -> bool {
        self.age_minutes() > CACHE_STALE_MINUTES
    }
}

/// Disk cache of the last-fetched snapshots, one JSON file per entity,
/// so reports remain viewable offline.
pub struct CacheManager {
    cache_dir: PathBuf,
}

impl CacheManager {
    pub fn new(cache_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&cache_dir)?;
        Ok(Self { cache_dir })
    }

    fn cache_path(&self, name: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", name))
    }

    fn load<T: DeserializeOwned>(&self, name: &str) -> Result<Option<CachedData<T>>> {
        let path = self.cache_path(name);
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read cache file: {}", name))?;

        let cached: CachedData<T> = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse cache file: {}", name))?;

        Ok(Some(cached))
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let cached = CachedData::new(data);
        let path = self.cache_path(name);
        let contents = serde_json::to_string_pretty(&cached)?;
        std::fs::write(&path, contents)?;
        Ok(())
    }

    // ===== File reports =====

    pub fn load_report(&self, sha256: &str) -> Result<Option<CachedData<FileRecord>>> {
        self.load(&format!("report_{}", sha256))
    }

    pub fn save_report(&self, sha256: &str, record: &FileRecord) -> Result<()> {
        self.save(&format!("report_{}", sha256), record)
    }

    // ===== User profiles =====

    pub fn load_profile(&self, username: &str) -> Result<Option<CachedData<UserProfile>>> {
        self.load(&format!("profile_{}", username))
    }

    pub fn save_profile(&self, username: &str, profile: &UserProfile) -> Result<()> {
        self.save(&format!("profile_{}", username), profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_cached_data_age_display_just_now() {
        let cached = CachedData::new(vec![1, 2, 3]);
        assert_eq!(cached.age_display(), "just now");
    }

    #[test]
    fn test_cached_data_is_stale() {
        let fresh = CachedData::new(vec![1]);
        assert!(!fresh.is_stale());

        let mut old = CachedData::new(vec![1]);
        old.cached_at = Utc::now() - Duration::minutes(61);
        assert!(old.is_stale());
        assert_eq!(old.age_display(), "1h ago");
    }

    #[test]
    fn test_report_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CacheManager::new(dir.path().to_path_buf()).unwrap();

        let record = FileRecord {
            sha256: Some("deadbeef".to_string()),
            size: Some(1024),
            ..Default::default()
        };
        cache.save_report("deadbeef", &record).unwrap();

        let loaded = cache.load_report("deadbeef").unwrap().unwrap();
        assert_eq!(loaded.data.sha256.as_deref(), Some("deadbeef"));
        assert_eq!(loaded.data.size, Some(1024));
        assert!(!loaded.is_stale());

        assert!(cache.load_report("cafebabe").unwrap().is_none());
    }

    #[test]
    fn test_profile_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CacheManager::new(dir.path().to_path_buf()).unwrap();

        let profile = UserProfile {
            username: Some("alice".to_string()),
            ..Default::default()
        };
        cache.save_profile("alice", &profile).unwrap();

        let loaded = cache.load_profile("alice").unwrap().unwrap();
        assert_eq!(loaded.data.username.as_deref(), Some("alice"));
    }
}
