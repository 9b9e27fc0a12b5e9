use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A string extracted from the binary during static analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedString {
    #[serde(default)]
    pub encoding: String,
    #[serde(default)]
    pub value: String,
}

/// Verdict from a single antivirus engine
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanVerdict {
    #[serde(default)]
    pub infected: bool,
    /// Detection name reported by the engine, empty when clean
    #[serde(default)]
    pub output: Option<String>,
    /// Engine definitions timestamp (unix seconds)
    #[serde(default)]
    pub update: Option<i64>,
}

/// Last-fetched copy of a file report.
///
/// Every field is optional: the API supports a `fields` query that narrows
/// the response to a subset, and the snapshot is replaced wholesale on each
/// successful fetch regardless of which subset was requested.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileRecord {
    #[serde(default)]
    pub md5: Option<String>,
    #[serde(default)]
    pub sha1: Option<String>,
    #[serde(default)]
    pub sha256: Option<String>,
    #[serde(default)]
    pub sha512: Option<String>,
    #[serde(default)]
    pub ssdeep: Option<String>,
    #[serde(default)]
    pub crc32: Option<String>,
    #[serde(default)]
    pub magic: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub size: Option<i64>,
    #[serde(default)]
    pub first_seen: Option<DateTime<Utc>>,
    #[serde(default)]
    pub exif: HashMap<String, String>,
    #[serde(default)]
    pub trid: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub strings: Vec<ExtractedString>,
    /// Per-engine verdicts, keyed by engine vendor name
    #[serde(default)]
    pub multiav: HashMap<String, ScanVerdict>,
}

impl FileRecord {
    /// Number of engines that flagged the file
    pub fn positives(&self) -> usize {
        self.multiav.values().filter(|v| v.infected).count()
    }

    /// Number of engines that produced a verdict
    pub fn engines(&self) -> usize {
        self.multiav.len()
    }

    /// "3/12"-style detection ratio for display
    pub fn detection_ratio(&self) -> String {
        format!("{}/{}", self.positives(), self.engines())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_report() {
        // A fields-filtered response carries only the requested subset
        let json = r#"{"sha256":"deadbeef","size":1024,"tags":["pe","upx"]}"#;
        let record: FileRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.sha256.as_deref(), Some("deadbeef"));
        assert_eq!(record.size, Some(1024));
        assert_eq!(record.tags, vec!["pe", "upx"]);
        assert!(record.multiav.is_empty());
        assert_eq!(record.md5, None);
    }

    #[test]
    fn test_detection_ratio() {
        let json = r#"{
            "sha256": "deadbeef",
            "multiav": {
                "clamav": {"infected": true, "output": "Win.Trojan.Agent"},
                "comodo": {"infected": false},
                "avira": {"infected": true, "output": "TR/Crypt.XPACK"}
            }
        }"#;
        let record: FileRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.positives(), 2);
        assert_eq!(record.engines(), 3);
        assert_eq!(record.detection_ratio(), "2/3");
    }

    #[test]
    fn test_parse_strings() {
        let json = r#"{"strings":[{"encoding":"ascii","value":"kernel32.dll"}]}"#;
        let record: FileRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.strings.len(), 1);
        assert_eq!(record.strings[0].value, "kernel32.dll");
    }
}
