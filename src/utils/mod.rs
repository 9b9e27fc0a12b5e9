//! Utility functions for hash validation and display formatting.

pub mod format;

// Re-export commonly used functions at module level
pub use format::{is_sha256, short_hash, truncate_string};
