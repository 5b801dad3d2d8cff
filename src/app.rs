//! Orchestration: config -> cache -> proto -> cache update -> render.
//!
//! Every failure ends in an empty segment rather than an error, so a broken
//! proto install or config never breaks the shell prompt.

use tracing::{debug, warn};

use crate::cache::{CacheStore, cache_path_for};
use crate::config::ConfigLoader;
use crate::context::ContextHasher;
use crate::display;
use crate::models::{OutdatedMap, StatusMap};
use crate::proto::{ProtoRunner, StatusFetcher};

/// Where the rendered data came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Cache,
    Proto,
}

/// Outcome of one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusReport {
    pub output: String,
    pub source: Option<DataSource>,
    pub tool_count: usize,
}

pub struct StatusLine<R: ProtoRunner> {
    runner: R,
    config: ConfigLoader,
    hasher: Option<ContextHasher>,
    force_refresh: bool,
}

impl<R: ProtoRunner> StatusLine<R> {
    pub fn new(
        runner: R,
        config: ConfigLoader,
        hasher: Option<ContextHasher>,
        force_refresh: bool,
    ) -> Self {
        Self {
            runner,
            config,
            hasher,
            force_refresh,
        }
    }

    pub fn config_loader(&self) -> &ConfigLoader {
        &self.config
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn cache_store(&self) -> CacheStore {
        CacheStore::new(
            cache_path_for(self.config.path()),
            self.hasher.clone(),
            self.force_refresh,
        )
    }

    /// Rendered prompt segment, or an empty string on any failure
    pub async fn render(&mut self) -> String {
        self.run().await.output
    }

    pub async fn run(&mut self) -> StatusReport {
        if !self.runner.is_available() {
            debug!("proto is not available");
            return StatusReport::default();
        }

        let config = match self.config.load() {
            Ok(config) => config,
            Err(err) => {
                warn!("config unusable: {err:#}");
                return StatusReport::default();
            }
        };

        let cache = self.cache_store();
        let (tools, outdated, source): (StatusMap, OutdatedMap, DataSource) =
            match cache.lookup(&config) {
                Some(hit) => (
                    hit.status_data.unwrap_or_default(),
                    hit.outdated_data.unwrap_or_default(),
                    DataSource::Cache,
                ),
                None => {
                    let fetcher = StatusFetcher::new(&self.runner, &cache);
                    let (tools, outdated) = match fetcher.fetch_all(&config).await {
                        Ok(result) => result,
                        Err(err) => {
                            warn!("proto status failed: {err}");
                            return StatusReport::default();
                        }
                    };
                    if !tools.is_empty() || !outdated.is_empty() {
                        cache.update(&tools, &outdated, config.config_mode);
                    }
                    (tools, outdated, DataSource::Proto)
                }
            };

        if tools.is_empty() {
            return StatusReport {
                source: Some(source),
                ..Default::default()
            };
        }

        StatusReport {
            output: display::render(&tools, &outdated, &config),
            source: Some(source),
            tool_count: tools.len(),
        }
    }
}
