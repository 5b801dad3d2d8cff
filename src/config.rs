//! Config file location, first-run bootstrap, and loading.

use anyhow::{Context, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::debug;

use crate::display::DEFAULT_TEMPLATE;
use crate::jsonc;
use crate::models::config::DEFAULT_CACHE_TTL;
use crate::models::{Config, ConfigMode};

const CONFIG_SUBDIR: [&str; 3] = ["oh-my-posh", "integrations", "omp-prototools"];

/// Resolve the config file path.
///
/// An explicit path always wins. Otherwise the file lives under the platform
/// cache directory, see [`config_file_in`].
pub fn config_file_path(override_path: Option<&Path>) -> Result<PathBuf> {
    if let Some(p) = override_path {
        return Ok(p.to_path_buf());
    }
    let base_dirs = directories::BaseDirs::new().context("Failed to find home directory")?;
    let dir = CONFIG_SUBDIR
        .iter()
        .fold(base_dirs.cache_dir().to_path_buf(), |acc, part| acc.join(part));
    Ok(config_file_in(&dir))
}

/// `config.jsonc` in `dir` if it exists, else `config.json` (which is what
/// gets bootstrapped when neither exists)
pub fn config_file_in(dir: &Path) -> PathBuf {
    let jsonc = dir.join("config.jsonc");
    if jsonc.exists() {
        return jsonc;
    }
    dir.join("config.json")
}

/// Body written on first run
pub fn default_config_content() -> String {
    let mode = serde_json::to_string(ConfigMode::default().as_str()).unwrap_or_default();
    let template = serde_json::to_string(DEFAULT_TEMPLATE).unwrap_or_default();
    format!(
        r##"{{
	// Proto config mode: determines which .prototools files to use
	// "global" - Only load ~/.proto/.prototools
	// "local" - Only load ./.prototools in current directory
	// "upwards" - Load .prototools while traversing upwards, but do not load ~/.proto/.prototools (default)
	// "upwards-global" or "all" - Load .prototools while traversing upwards, and do load ~/.proto/.prototools
	"config_mode": {mode},

	// Output template (minijinja syntax), rendered once per tool
	// Variables: tool, tool_icon, is_installed, resolved_version, is_latest, is_outdated,
	//   config_version - configured constraint (e.g. "~22", "^1.20") from proto status
	//   newest_version - newest version matching the constraint (e.g. "22.10.1") from proto outdated
	//   latest_version - absolute latest version (e.g. "25.3.1") from proto outdated
	// Functions: eq(a, b), ne(a, b), fg_color(color), bg_color(color), reset()
	"template": {template},

	// Tool-specific icon and color configuration
	// Use hex colors (e.g. "#61AFEF") or color names (e.g. "blue", "red", "green")
	// Icons use Nerd Font hex codes (e.g. "e76f", "e627")
	"tools": {{
		"bun": {{ "icon": "e76f", "color": "magenta" }},
		"deno": {{ "icon": "e7c0", "color": "white" }},
		"go": {{ "icon": "e627", "color": "cyan" }},
		"moon": {{ "icon": "e38d", "color": "white" }},
		"node": {{ "icon": "ed0d", "color": "green" }},
		"npm": {{ "icon": "e71e", "color": "yellow" }},
		"pnpm": {{ "icon": "e865", "color": "yellow" }},
		"poetry": {{ "icon": "e867", "color": "cyan" }},
		"python": {{ "icon": "e73c", "color": "yellow" }},
		"ruby": {{ "icon": "e23e", "color": "red" }},
		"rust": {{ "icon": "e7a8", "color": "red" }},
		"uv": {{ "icon": "f0b02", "color": "magenta" }},
		"yarn": {{ "icon": "e6a7", "color": "cyan" }},
	}},

	// Cache configuration
	// ttl: seconds a cached proto result stays valid (default: {ttl} = 5 minutes, 0 uses the default)
	"cache": {{
		"ttl": {ttl}
	}}
}}
"##,
        ttl = DEFAULT_CACHE_TTL,
    )
}

/// Write the default config, creating parent directories as needed
pub fn create_default_config(config_file: &Path) -> Result<()> {
    if let Some(dir) = config_file.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)
                .with_context(|| format!("create config dir {}", dir.display()))?;
        }
    }
    fs::write(config_file, default_config_content())
        .with_context(|| format!("write default config {}", config_file.display()))
}

/// Read and parse a JSONC config, bootstrapping it first if it doesn't exist
pub fn load_config_file(config_file: &Path) -> Result<Config> {
    let data = match fs::read(config_file) {
        Ok(data) => data,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!(path = %config_file.display(), "config missing, writing defaults");
            create_default_config(config_file)?;
            fs::read(config_file)
                .with_context(|| format!("read config {}", config_file.display()))?
        }
        Err(err) => {
            return Err(err).with_context(|| format!("read config {}", config_file.display()));
        }
    };

    serde_json::from_slice(&jsonc::to_json(&data))
        .with_context(|| format!("parse config {}", config_file.display()))
}

/// Loads the config and keeps it until the file's mtime moves forward
#[derive(Debug)]
pub struct ConfigLoader {
    path: PathBuf,
    memo: Option<(SystemTime, Config)>,
}

impl ConfigLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            memo: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn modified(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).and_then(|m| m.modified()).ok()
    }

    pub fn load(&mut self) -> Result<Config> {
        if let (Some((seen, config)), Some(current)) = (&self.memo, self.modified()) {
            if current <= *seen {
                return Ok(config.clone());
            }
        }

        let config = load_config_file(&self.path)?;
        if let Some(mtime) = self.modified() {
            self.memo = Some((mtime, config.clone()));
        }
        Ok(config)
    }
}
