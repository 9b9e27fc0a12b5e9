//! Local caching module for offline report access.
//!
//! This module provides the `CacheManager` for storing and retrieving the
//! last-fetched snapshots on disk. Data is cached in JSON format and
//! considered stale after 60 minutes.
//!
//! Cached entities:
//! - File reports, keyed by sha256
//! - User profiles, keyed by username

pub mod manager;

pub use manager::{CacheManager, CachedData};
