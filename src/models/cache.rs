use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::status::{OutdatedMap, StatusMap};

/// Snapshot of both proto payloads for one directory context
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct DirectoryCacheEntry {
    #[serde(rename = "status", default)]
    pub status_data: Option<StatusMap>,
    #[serde(rename = "outdated", default)]
    pub outdated_data: Option<OutdatedMap>,
    /// Unix seconds; zero means "never stamped"
    #[serde(default)]
    pub timestamp: i64,
}

/// On-disk cache document, keyed by directory fingerprint.
///
/// `entries: None` (missing or `null` in the file) marks the whole document
/// as invalid, which is different from an empty map.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct CacheDocument {
    #[serde(default)]
    pub entries: Option<BTreeMap<String, DirectoryCacheEntry>>,
}

/// Data returned from a cache hit
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CachedResult {
    pub status_data: Option<StatusMap>,
    pub outdated_data: Option<OutdatedMap>,
}
