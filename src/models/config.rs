use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Fallback cache TTL used when `cache.ttl` is unset or zero
pub const DEFAULT_CACHE_TTL: u64 = 300;

/// Which `.prototools` sources proto consults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ConfigMode {
    /// Only `~/.proto/.prototools`
    Global,
    /// Only `./.prototools`
    Local,
    /// Walk upwards, skip the global file
    #[default]
    Upwards,
    /// Walk upwards and include the global file (`upwards-global` or `all`)
    All,
}

impl ConfigMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ConfigMode::Global => "global",
            ConfigMode::Local => "local",
            ConfigMode::Upwards => "upwards",
            ConfigMode::All => "all",
        }
    }

    /// Extra arguments appended to proto subcommands. Upwards is proto's
    /// own default, so it adds nothing.
    pub fn proto_flags(self) -> &'static [&'static str] {
        match self {
            ConfigMode::Global => &["--config-mode", "global"],
            ConfigMode::Local => &["--config-mode", "local"],
            ConfigMode::All => &["--config-mode", "all"],
            ConfigMode::Upwards => &[],
        }
    }
}

impl fmt::Display for ConfigMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "upwards" => Ok(ConfigMode::Upwards),
            "global" => Ok(ConfigMode::Global),
            "local" => Ok(ConfigMode::Local),
            "upwards-global" | "all" => Ok(ConfigMode::All),
            other => Err(format!(
                "unknown config_mode {other:?} (expected global, local, upwards, upwards-global or all)"
            )),
        }
    }
}

impl Serialize for ConfigMode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ConfigMode {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        let Some(raw) = raw else {
            return Ok(ConfigMode::default());
        };
        // unknown modes behave like the default: no flag for proto
        Ok(raw.parse::<ConfigMode>().unwrap_or_else(|err| {
            tracing::warn!("{err}, falling back to {}", ConfigMode::default());
            ConfigMode::default()
        }))
    }
}

/// Icon and color for one tool
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolStyle {
    /// Unicode escape (`\ue718`) or bare hex (`e718`)
    #[serde(default)]
    pub icon: String,
    /// Hex (`#61AFEF`), a color name, or a raw SGR parameter
    #[serde(default)]
    pub color: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheSettings {
    #[serde(default)]
    pub ttl: u64,
}

impl CacheSettings {
    pub fn effective_ttl(&self) -> u64 {
        if self.ttl == 0 {
            DEFAULT_CACHE_TTL
        } else {
            self.ttl
        }
    }
}

/// User configuration loaded from `config.jsonc`
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub config_mode: ConfigMode,
    #[serde(default)]
    pub tools: BTreeMap<String, ToolStyle>,
    #[serde(default)]
    pub template: String,
    #[serde(default)]
    pub cache: CacheSettings,
}
