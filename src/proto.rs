//! proto integration: running the CLI and decoding its JSON reports.

use std::future::Future;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::cache::CacheStore;
use crate::models::{Config, OutdatedMap, StatusMap};

/// Binary looked up on PATH when no override is given
pub const DEFAULT_PROTO_BIN: &str = "proto";

/// Upper bound for a single proto invocation
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum ProtoError {
    #[error("{0} not found on PATH")]
    NotFound(String),
    #[error("failed to spawn {bin}: {source}")]
    Spawn {
        bin: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{bin} {args}` timed out after {timeout:?}")]
    Timeout {
        bin: String,
        args: String,
        timeout: Duration,
    },
    #[error("`{bin} {args}` exited with {code:?}: {stderr}")]
    Exit {
        bin: String,
        args: String,
        code: Option<i32>,
        stderr: String,
    },
    #[error("malformed `{subcommand}` payload: {source}")]
    Payload {
        subcommand: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Something that can run proto subcommands and hand back stdout
pub trait ProtoRunner: Send + Sync {
    fn is_available(&self) -> bool;

    fn run(&self, args: &[&str]) -> impl Future<Output = Result<Vec<u8>, ProtoError>> + Send;
}

/// The real proto CLI, each call bounded by `timeout`
#[derive(Debug, Clone)]
pub struct ProtoCli {
    bin: String,
    timeout: Duration,
}

impl Default for ProtoCli {
    fn default() -> Self {
        Self::new(DEFAULT_PROTO_BIN, DEFAULT_TIMEOUT)
    }
}

impl ProtoCli {
    pub fn new(bin: impl Into<String>, timeout: Duration) -> Self {
        Self {
            bin: bin.into(),
            timeout,
        }
    }

    pub fn resolve(&self) -> Result<PathBuf, ProtoError> {
        which::which(&self.bin).map_err(|_| ProtoError::NotFound(self.bin.clone()))
    }
}

impl ProtoRunner for ProtoCli {
    fn is_available(&self) -> bool {
        self.resolve().is_ok()
    }

    async fn run(&self, args: &[&str]) -> Result<Vec<u8>, ProtoError> {
        let joined = args.join(" ");
        let mut cmd = tokio::process::Command::new(&self.bin);
        cmd.args(args)
            .stdin(Stdio::null())
            // a timed-out child is dropped with the future, and killed with it
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, cmd.output())
            .await
            .map_err(|_| ProtoError::Timeout {
                bin: self.bin.clone(),
                args: joined.clone(),
                timeout: self.timeout,
            })?
            .map_err(|source| ProtoError::Spawn {
                bin: self.bin.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ProtoError::Exit {
                bin: self.bin.clone(),
                args: joined,
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output.stdout)
    }
}

fn subcommand_args<'a>(subcommand: &'a str, config: &Config) -> Vec<&'a str> {
    let mut args = vec![subcommand, "--json"];
    args.extend_from_slice(config.config_mode.proto_flags());
    args
}

/// Fetches both proto reports, short-circuiting through the cache
pub struct StatusFetcher<'a, R: ProtoRunner> {
    runner: &'a R,
    cache: &'a CacheStore,
}

impl<'a, R: ProtoRunner> StatusFetcher<'a, R> {
    pub fn new(runner: &'a R, cache: &'a CacheStore) -> Self {
        Self { runner, cache }
    }

    /// `proto status --json`. Spawn, exit, and parse failures propagate.
    pub async fn fetch_status(&self, config: &Config) -> Result<StatusMap, ProtoError> {
        if let Some(status) = self.cache.lookup(config).and_then(|hit| hit.status_data) {
            return Ok(status);
        }

        let output = self.runner.run(&subcommand_args("status", config)).await?;
        serde_json::from_slice(&output).map_err(|source| ProtoError::Payload {
            subcommand: "status",
            source,
        })
    }

    /// `proto outdated --json`. Any failure degrades to an empty map.
    pub async fn fetch_outdated(&self, config: &Config) -> OutdatedMap {
        if let Some(outdated) = self.cache.lookup(config).and_then(|hit| hit.outdated_data) {
            return outdated;
        }

        let output = match self.runner.run(&subcommand_args("outdated", config)).await {
            Ok(output) => output,
            Err(err) => {
                debug!("outdated unavailable: {err}");
                return OutdatedMap::new();
            }
        };
        serde_json::from_slice(&output).unwrap_or_else(|err| {
            warn!("ignoring malformed `outdated` payload: {err}");
            OutdatedMap::new()
        })
    }

    /// Both reports, fetched concurrently
    pub async fn fetch_all(&self, config: &Config) -> Result<(StatusMap, OutdatedMap), ProtoError> {
        let (status, outdated) =
            tokio::join!(self.fetch_status(config), self.fetch_outdated(config));
        Ok((status?, outdated))
    }
}
