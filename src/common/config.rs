//! Configuration file handling

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::paths::config_path;
use super::Result;
use crate::testing::ExecutionKind;

/// Main configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Directory holding the test artifacts
    #[serde(default)]
    pub base_dir: Option<PathBuf>,

    /// Programs used to launch test artifacts
    #[serde(default)]
    pub launchers: Launchers,

    /// Timeout settings
    #[serde(default)]
    pub timeouts: Timeouts,
}

/// Launcher programs, one per execution kind
#[derive(Debug, Deserialize, Clone)]
pub struct Launchers {
    /// General-purpose runtime for script artifacts
    #[serde(default = "default_runtime")]
    pub runtime: String,

    /// Shell interpreter for shell artifacts
    #[serde(default = "default_shell")]
    pub shell: String,
}

impl Default for Launchers {
    fn default() -> Self {
        Self {
            runtime: default_runtime(),
            shell: default_shell(),
        }
    }
}

fn default_runtime() -> String {
    "node".to_string()
}

fn default_shell() -> String {
    "bash".to_string()
}

impl Launchers {
    /// Configured program name for an execution kind
    pub fn program_for(&self, kind: ExecutionKind) -> &str {
        match kind {
            ExecutionKind::Runtime => &self.runtime,
            ExecutionKind::Shell => &self.shell,
        }
    }

    /// Resolve the launcher for an execution kind
    ///
    /// Falls back to the bare configured name if it is not on PATH, leaving
    /// the failure to surface when the child is spawned.
    pub fn resolve(&self, kind: ExecutionKind) -> PathBuf {
        let program = self.program_for(kind);
        which::which(program).unwrap_or_else(|_| PathBuf::from(program))
    }
}

/// Timeout settings in seconds
#[derive(Debug, Deserialize, Default, Clone)]
pub struct Timeouts {
    /// Kill a test that runs longer than this; unset means wait forever
    #[serde(default)]
    pub per_test_secs: Option<u64>,
}

impl Timeouts {
    pub fn per_test(&self) -> Option<Duration> {
        self.per_test_secs.map(Duration::from_secs)
    }
}

impl Config {
    /// Load configuration from the default config file
    ///
    /// Returns default configuration if file doesn't exist
    pub fn load() -> Result<Self> {
        match config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| super::Error::file_read(path, e))?;
        toml::from_str(&content).map_err(|e| super::Error::ConfigParse(e.to_string()))
    }
}
