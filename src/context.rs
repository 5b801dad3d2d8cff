//! Directory context fingerprinting.
//!
//! proto resolves tool versions from every `.prototools` between the working
//! directory and home, so the cache key covers the working directory, the
//! config mode, and the contents of each of those files.

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::ConfigMode;

/// Project-local proto configuration file name
pub const PROTOTOOLS_FILE: &str = ".prototools";

#[derive(Debug, Clone)]
pub struct ContextHasher {
    cwd: PathBuf,
    home: PathBuf,
}

impl ContextHasher {
    pub fn new(cwd: impl Into<PathBuf>, home: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            home: home.into(),
        }
    }

    /// Hasher for the current process: working directory and user home
    pub fn from_env() -> Result<Self> {
        let cwd = std::env::current_dir().context("determine working directory")?;
        let base_dirs = directories::BaseDirs::new().context("Failed to find home directory")?;
        Ok(Self::new(cwd, base_dirs.home_dir()))
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// SHA-256 over cwd, mode and every ancestor `.prototools`, as lowercase hex.
    pub fn fingerprint(&self, mode: ConfigMode) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.cwd.as_os_str().as_encoded_bytes());
        hasher.update(mode.as_str().as_bytes());

        let mut dir = self.cwd.as_path();
        loop {
            let candidate = dir.join(PROTOTOOLS_FILE);
            if candidate.is_file() {
                // unreadable files are skipped, not fatal
                if let Ok(data) = fs::read(&candidate) {
                    hasher.update(&data);
                }
            }

            if dir == self.home {
                break;
            }
            match dir.parent() {
                Some(parent) if parent != dir => dir = parent,
                _ => break,
            }
        }

        format!("{:x}", hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, PathBuf, PathBuf) {
        let tmp = TempDir::new().unwrap();
        let home = tmp.path().join("home");
        let project = home.join("project");
        fs::create_dir_all(project.join("src")).unwrap();
        (tmp, home, project)
    }

    #[test]
    fn same_context_same_fingerprint() {
        let (_tmp, home, project) = setup();
        fs::write(project.join(PROTOTOOLS_FILE), "node = \"24\"\n").unwrap();

        let a = ContextHasher::new(&project, &home).fingerprint(ConfigMode::Upwards);
        let b = ContextHasher::new(&project, &home).fingerprint(ConfigMode::Upwards);
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn mode_changes_fingerprint() {
        let (_tmp, home, project) = setup();
        let hasher = ContextHasher::new(&project, &home);
        assert_ne!(
            hasher.fingerprint(ConfigMode::Upwards),
            hasher.fingerprint(ConfigMode::Global)
        );
    }

    #[test]
    fn ancestor_prototools_changes_fingerprint() {
        let (_tmp, home, project) = setup();
        let nested = project.join("src");
        let hasher = ContextHasher::new(&nested, &home);

        let before = hasher.fingerprint(ConfigMode::Upwards);
        fs::write(project.join(PROTOTOOLS_FILE), "node = \"24\"\n").unwrap();
        let with_file = hasher.fingerprint(ConfigMode::Upwards);
        assert_ne!(before, with_file);

        fs::write(project.join(PROTOTOOLS_FILE), "node = \"22\"\n").unwrap();
        let edited = hasher.fingerprint(ConfigMode::Upwards);
        assert_ne!(with_file, edited);
    }

    #[test]
    fn walk_stops_at_home() {
        let (tmp, home, project) = setup();
        let hasher = ContextHasher::new(&project, &home);
        let before = hasher.fingerprint(ConfigMode::Upwards);

        // above home: must not be folded in
        fs::write(tmp.path().join(PROTOTOOLS_FILE), "go = \"1.26\"\n").unwrap();
        assert_eq!(before, hasher.fingerprint(ConfigMode::Upwards));

        // at home: folded in
        fs::write(home.join(PROTOTOOLS_FILE), "go = \"1.26\"\n").unwrap();
        assert_ne!(before, hasher.fingerprint(ConfigMode::Upwards));
    }

    #[test]
    fn walk_terminates_outside_home() {
        let (tmp, home, _project) = setup();
        let outside = tmp.path().join("elsewhere");
        fs::create_dir_all(&outside).unwrap();
        let fp = ContextHasher::new(&outside, &home).fingerprint(ConfigMode::Local);
        assert_eq!(fp.len(), 64);
    }
}
