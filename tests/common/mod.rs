#![allow(dead_code)]

use chrono::Utc;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use tempfile::TempDir;

use proto_statusline::cache::{CacheStore, cache_path_for};
use proto_statusline::context::ContextHasher;
use proto_statusline::models::{CacheDocument, ConfigMode, DirectoryCacheEntry, StatusMap, ToolStatus};
use proto_statusline::proto::{ProtoError, ProtoRunner};

/// Canned proto replacement that records every invocation
pub struct MockRunner {
    pub available: bool,
    pub status: Result<String, i32>,
    pub outdated: Result<String, i32>,
    pub calls: Mutex<Vec<Vec<String>>>,
}

impl MockRunner {
    pub fn new(status: &str, outdated: &str) -> Self {
        Self {
            available: true,
            status: Ok(status.to_string()),
            outdated: Ok(outdated.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl ProtoRunner for MockRunner {
    fn is_available(&self) -> bool {
        self.available
    }

    async fn run(&self, args: &[&str]) -> Result<Vec<u8>, ProtoError> {
        self.calls
            .lock()
            .unwrap()
            .push(args.iter().map(|s| s.to_string()).collect());
        let reply = match args.first().copied() {
            Some("status") => self.status.clone(),
            Some("outdated") => self.outdated.clone(),
            _ => Err(2),
        };
        match reply {
            Ok(body) => Ok(body.into_bytes()),
            Err(code) => Err(ProtoError::Exit {
                bin: "proto".to_string(),
                args: args.join(" "),
                code: Some(code),
                stderr: "mock failure".to_string(),
            }),
        }
    }
}

/// Scratch layout: `<tmp>/home/project` as cwd, config under `<tmp>/cfg`
pub struct Sandbox {
    pub tmp: TempDir,
    pub home: PathBuf,
    pub project: PathBuf,
    pub config_path: PathBuf,
}

impl Sandbox {
    pub fn new(config_json: &str) -> Self {
        let tmp = TempDir::new().unwrap();
        let home = tmp.path().join("home");
        let project = home.join("project");
        fs::create_dir_all(&project).unwrap();
        let cfg_dir = tmp.path().join("cfg");
        fs::create_dir_all(&cfg_dir).unwrap();
        let config_path = cfg_dir.join("config.jsonc");
        fs::write(&config_path, config_json).unwrap();
        Self {
            tmp,
            home,
            project,
            config_path,
        }
    }

    pub fn hasher(&self) -> ContextHasher {
        ContextHasher::new(&self.project, &self.home)
    }

    pub fn cache_path(&self) -> PathBuf {
        cache_path_for(&self.config_path)
    }

    pub fn store(&self, force_refresh: bool) -> CacheStore {
        CacheStore::new(self.cache_path(), Some(self.hasher()), force_refresh)
    }

    /// Write a cache document holding one entry for this sandbox's context
    pub fn seed_cache(&self, status: StatusMap, mode: ConfigMode, age_secs: i64) {
        let key = self.hasher().fingerprint(mode);
        let mut entries = std::collections::BTreeMap::new();
        entries.insert(
            key,
            DirectoryCacheEntry {
                status_data: Some(status),
                outdated_data: Some(Default::default()),
                timestamp: Utc::now().timestamp() - age_secs,
            },
        );
        self.store(false)
            .write(&CacheDocument {
                entries: Some(entries),
            })
            .unwrap();
    }
}

pub fn installed(version: &str) -> ToolStatus {
    ToolStatus {
        is_installed: true,
        resolved_version: Some(version.to_string()),
        ..Default::default()
    }
}

pub fn status_map(items: &[(&str, &str)]) -> StatusMap {
    items
        .iter()
        .map(|(tool, version)| (tool.to_string(), installed(version)))
        .collect()
}
