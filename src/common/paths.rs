//! Configuration and artifact paths

use std::path::{Path, PathBuf};

/// Name used for the configuration directory
const APP_NAME: &str = "suite-runner";

/// Home of the built-in suite's artifacts when nothing else is configured
pub const DEFAULT_BASE_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests");

/// Get the configuration directory path
///
/// Uses the directories crate for platform-appropriate locations:
/// - Linux: `~/.config/suite-runner/`
/// - macOS: `~/Library/Application Support/suite-runner/`
/// - Windows: `%APPDATA%\suite-runner\`
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the configuration file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

/// Pick the artifact base directory and pin it to an absolute path
///
/// Precedence: explicit flag, config file, the catalog file's directory,
/// then the built-in suite's home. Children always run from the returned
/// directory, so a later change of the caller's working directory has no
/// effect. A missing directory is not an error here: each test then fails
/// to launch and the run still reports a summary.
pub fn resolve_base_dir(
    flag: Option<&Path>,
    configured: Option<&Path>,
    catalog_file: Option<&Path>,
) -> PathBuf {
    let chosen = flag
        .or(configured)
        .map(Path::to_path_buf)
        .or_else(|| {
            catalog_file
                .and_then(Path::parent)
                .map(|p| if p.as_os_str().is_empty() { Path::new(".") } else { p })
                .map(Path::to_path_buf)
        })
        .unwrap_or_else(|| PathBuf::from(DEFAULT_BASE_DIR));

    match chosen.canonicalize() {
        Ok(dir) => dir,
        Err(e) => {
            tracing::warn!(dir = %chosen.display(), error = %e, "Test directory is not accessible");
            if chosen.is_absolute() {
                chosen
            } else {
                std::env::current_dir()
                    .map(|cwd| cwd.join(&chosen))
                    .unwrap_or(chosen)
            }
        }
    }
}
