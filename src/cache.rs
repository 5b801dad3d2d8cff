//! # Cache Module
//!
//! Persists proto's status/outdated payloads in a JSON file next to the
//! config, one entry per directory fingerprint, so frequent prompt renders
//! don't have to spawn proto every time.
//!
//! There is no cross-process lock: two shells refreshing at once race the
//! read-modify-write and the last writer wins. Losing an update only costs
//! a cache miss on the next render.

use anyhow::{Context, Result};
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::debug;

use crate::context::ContextHasher;
use crate::models::{
    CacheDocument, CachedResult, Config, ConfigMode, DirectoryCacheEntry, OutdatedMap, StatusMap,
};

/// Cache path for a config file: same directory, `<stem>.cache.json`
pub fn cache_path_for(config_file: &Path) -> PathBuf {
    let stem = config_file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "config".to_string());
    config_file.with_file_name(format!("{stem}.cache.json"))
}

/// True iff the document has an entries map (an empty one counts)
pub fn is_document_valid(doc: &CacheDocument) -> bool {
    doc.entries.is_some()
}

/// Fresh while strictly younger than `ttl_seconds`; never fresh if unstamped
pub fn is_entry_fresh(entry: &DirectoryCacheEntry, ttl_seconds: u64, now: i64) -> bool {
    if entry.timestamp == 0 {
        return false;
    }
    let elapsed = now.saturating_sub(entry.timestamp);
    elapsed < i64::try_from(ttl_seconds).unwrap_or(i64::MAX)
}

#[derive(Debug)]
pub struct CacheStore {
    path: PathBuf,
    hasher: Option<ContextHasher>,
    force_refresh: bool,
    fingerprint_memo: OnceLock<Option<String>>,
}

impl CacheStore {
    /// `hasher: None` means the context could not be determined; every
    /// lookup then misses and updates are skipped.
    pub fn new(path: impl Into<PathBuf>, hasher: Option<ContextHasher>, force_refresh: bool) -> Self {
        Self {
            path: path.into(),
            hasher,
            force_refresh,
            fingerprint_memo: OnceLock::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read(&self) -> Result<CacheDocument> {
        let data = fs::read(&self.path)
            .with_context(|| format!("read cache {}", self.path.display()))?;
        let doc = serde_json::from_slice(&data)
            .with_context(|| format!("parse cache {}", self.path.display()))?;
        Ok(doc)
    }

    /// Pretty-printed, written to a sibling temp file then renamed into place
    pub fn write(&self, doc: &CacheDocument) -> Result<()> {
        let content = serde_json::to_string_pretty(doc).context("serialize cache")?;
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("write {}", tmp_path.display()))?;
        if let Err(err) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(err).with_context(|| format!("replace {}", self.path.display()));
        }
        Ok(())
    }

    /// Fingerprint of the current context, computed once per store.
    ///
    /// The mode is part of the key, so a store is only ever used with the
    /// one mode the process was configured with.
    pub fn fingerprint(&self, mode: ConfigMode) -> Option<String> {
        self.fingerprint_memo
            .get_or_init(|| self.hasher.as_ref().map(|h| h.fingerprint(mode)))
            .clone()
    }

    /// Cached payloads for the current context, if present and fresh
    pub fn lookup(&self, config: &Config) -> Option<CachedResult> {
        if self.force_refresh {
            debug!("cache bypassed by --refresh");
            return None;
        }
        let ttl = config.cache.effective_ttl();

        let doc = match self.read() {
            Ok(doc) => doc,
            Err(err) => {
                debug!("cache miss: {err:#}");
                return None;
            }
        };
        if !is_document_valid(&doc) {
            debug!("cache miss: document has no entries map");
            return None;
        }

        let key = self.fingerprint(config.config_mode)?;
        let entry = doc.entries.as_ref()?.get(&key)?;
        if !is_entry_fresh(entry, ttl, Utc::now().timestamp()) {
            debug!(key = %key, "cache miss: entry expired");
            return None;
        }

        debug!(key = %key, "cache hit");
        Some(CachedResult {
            status_data: entry.status_data.clone(),
            outdated_data: entry.outdated_data.clone(),
        })
    }

    /// Best effort: replace this context's entry with a freshly stamped one.
    /// Read, hash, and write failures are logged and otherwise ignored.
    pub fn update(&self, status: &StatusMap, outdated: &OutdatedMap, mode: ConfigMode) {
        let mut doc = self.read().unwrap_or_default();
        let Some(key) = self.fingerprint(mode) else {
            debug!("cache update skipped: no directory context");
            return;
        };

        doc.entries.get_or_insert_with(Default::default).insert(
            key,
            DirectoryCacheEntry {
                status_data: Some(status.clone()),
                outdated_data: Some(outdated.clone()),
                timestamp: Utc::now().timestamp(),
            },
        );

        if let Err(err) = self.write(&doc) {
            debug!("cache update failed: {err:#}");
        }
    }
}
