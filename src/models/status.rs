use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One entry of `proto status --json`
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolStatus {
    #[serde(default)]
    pub is_installed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_dir: Option<String>,
}

/// One entry of `proto outdated --json`
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct OutdatedStatus {
    #[serde(default)]
    pub is_latest: bool,
    #[serde(default)]
    pub is_outdated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub newest_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_version: Option<String>,
}

/// Tool name to status, ordered by tool name
pub type StatusMap = BTreeMap<String, ToolStatus>;

/// Tool name to outdated report, ordered by tool name
pub type OutdatedMap = BTreeMap<String, OutdatedStatus>;
