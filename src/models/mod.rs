//! Data models for file-scanning service entities.
//!
//! Result shapes are typed per endpoint and parsed at the fetch boundary:
//!
//! - `FileRecord`, `ScanVerdict`, `ExtractedString`: file report data
//! - `UserProfile`, `Comment`: user profile and discussion data

pub mod file;
pub mod user;

pub use file::{ExtractedString, FileRecord, ScanVerdict};
pub use user::{Comment, UserProfile};
