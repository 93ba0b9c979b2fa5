//! Domain models shared across crates.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Object tags as returned by the storage provider (`approved -> "true"`).
pub type TagSet = BTreeMap<String, String>;

/// A photo stored in the bucket. Identity is the key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhotoObject {
    pub key: String,
    pub last_modified: DateTime<Utc>,
}

impl PhotoObject {
    pub fn new(key: impl Into<String>, last_modified: DateTime<Utc>) -> Self {
        Self {
            key: key.into(),
            last_modified,
        }
    }
}

/// Last-modified lookup result; `Unknown` when the lookup failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LastModified {
    At(DateTime<Utc>),
    Unknown,
}

impl LastModified {
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            LastModified::At(ts) => Some(*ts),
            LastModified::Unknown => None,
        }
    }
}

impl fmt::Display for LastModified {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LastModified::At(ts) => write!(f, "{}", ts.format("%Y-%m-%d %H:%M UTC")),
            LastModified::Unknown => write!(f, "unknown"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_last_modified_display() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 13, 7, 0).unwrap();
        assert_eq!(LastModified::At(ts).to_string(), "2024-05-01 13:07 UTC");
        assert_eq!(LastModified::Unknown.to_string(), "unknown");
        assert_eq!(LastModified::Unknown.timestamp(), None);
    }
}
