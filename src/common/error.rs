//! Error types for the suite runner
//!
//! A failing test is not an error: it is a `TestResult` with `passed = false`.
//! The variants here cover the cases where a test could not be attempted at
//! all, or the runner itself could not start.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the suite runner
#[derive(Error, Debug)]
pub enum Error {
    // === Execution Errors ===
    #[error("Failed to launch '{program}' for {}: {source}", .file.display())]
    Launch {
        program: String,
        file: PathBuf,
        #[source]
        source: io::Error,
    },

    // === Catalog Errors ===
    #[error("Test not found: {0}")]
    TestNotFound(String),

    #[error("Test catalog is empty")]
    EmptyCatalog,

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    // === IO Errors ===
    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },
}

impl Error {
    /// Create a launch error for a program that could not be spawned
    pub fn launch(program: &str, file: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Launch {
            program: program.to_string(),
            file: file.into(),
            source,
        }
    }

    /// Create a file read error
    pub fn file_read(path: &std::path::Path, error: impl ToString) -> Self {
        Self::FileRead {
            path: path.display().to_string(),
            error: error.to_string(),
        }
    }
}
