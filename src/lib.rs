//! # proto statusline
//!
//! Shows the tool versions [proto](https://moonrepo.dev/proto) resolves for
//! the current directory as a colored prompt segment (oh-my-posh, starship,
//! or any prompt that can run a command).
//!
//! ## Overview
//!
//! Each run:
//! - loads the JSONC config (written with defaults on first run)
//! - looks up a per-directory cache entry keyed by a fingerprint of the
//!   working directory, config mode and ancestor `.prototools` files
//! - on a miss, runs `proto status --json` and `proto outdated --json`
//!   concurrently and stores the result
//! - renders one template per tool, sorted by tool name
//!
//! ## Features
//!
//! - `colors` (default): colored `--debug` summary via owo-colors

/// Orchestration of a single prompt render
pub mod app;

/// Per-directory on-disk cache of proto reports
pub mod cache;

/// Command-line argument parsing
pub mod cli;

/// Color specs to escape sequences, icon decoding
pub mod colors;

/// Config path resolution, bootstrap and loading
pub mod config;

/// Directory context fingerprinting
pub mod context;

/// Template rendering
pub mod display;

/// JSONC to JSON preprocessing
pub mod jsonc;

/// Data models for proto reports, config and cache
pub mod models;

/// proto process runner and report fetching
pub mod proto;
