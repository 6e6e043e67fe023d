//! Test catalog types
//!
//! The catalog is declared, never discovered: either the built-in HM311S
//! suite or a TOML file listing `[[tests]]` entries.

use serde::Deserialize;
use std::path::Path;

use crate::common::{Error, Result};

/// Title printed above a full run of the built-in suite
const DEFAULT_TITLE: &str = "Dreo HM311S Homebridge Plugin Test Suite";

/// Appended to the all-passed line of the built-in suite
const DEFAULT_SUCCESS_NOTE: &str = "The Dreo HM311S plugin is working correctly.";

/// How a test artifact is launched
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionKind {
    /// Run through the general-purpose script runtime (node by default)
    Runtime,
    /// Run through the shell interpreter (bash by default)
    Shell,
}

/// A single declared test
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    /// Short human label, expected to be unique
    pub name: String,
    /// What the test verifies (display only)
    pub description: String,
    /// Artifact path relative to the base directory
    pub file: String,
    /// Launcher selection
    pub kind: ExecutionKind,
    /// One-line coverage note for the summary footer
    #[serde(default)]
    pub covers: Option<String>,
}

impl TestCase {
    pub fn new(name: &str, description: &str, file: &str, kind: ExecutionKind) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            file: file.to_string(),
            kind,
            covers: None,
        }
    }

    pub fn with_covers(mut self, covers: &str) -> Self {
        self.covers = Some(covers.to_string());
        self
    }
}

/// On-disk catalog layout
#[derive(Deserialize, Debug)]
struct CatalogFile {
    title: Option<String>,
    success_note: Option<String>,
    #[serde(default)]
    tests: Vec<TestCase>,
}

/// Ordered, immutable set of test cases
#[derive(Debug, Clone)]
pub struct Catalog {
    title: String,
    success_note: Option<String>,
    cases: Vec<TestCase>,
}

impl Catalog {
    /// Build a catalog from declared cases; an empty list is rejected
    pub fn new(title: impl Into<String>, cases: Vec<TestCase>) -> Result<Self> {
        if cases.is_empty() {
            return Err(Error::EmptyCatalog);
        }
        Ok(Self {
            title: title.into(),
            success_note: None,
            cases,
        })
    }

    /// Extra text for the all-passed line of a full run
    pub fn with_success_note(mut self, note: impl Into<String>) -> Self {
        self.success_note = Some(note.into());
        self
    }

    /// The built-in Dreo HM311S plugin suite
    pub fn hm311s() -> Self {
        let cases = vec![
            TestCase::new(
                "Humidity Fix Test",
                "Tests humidity range clamping and validation for HM311S (fixes 90% bug)",
                "test-humidity-fix.js",
                ExecutionKind::Runtime,
            )
            .with_covers("Humidity validation (30-90% range, edge cases)"),
            TestCase::new(
                "HomeKit Display Test",
                "Tests HomeKit characteristic display mapping (0-100% range)",
                "test-homekit-display.js",
                ExecutionKind::Runtime,
            )
            .with_covers("HomeKit display accuracy (percentage mapping)"),
            TestCase::new(
                "Humidifier Display Test",
                "Tests service name display in HomeKit (Humidifier vs Humidifier-Dehumidifier)",
                "test-humidifier-display.js",
                ExecutionKind::Runtime,
            )
            .with_covers("Service type display (humidifier-only)"),
            TestCase::new(
                "Model Display Test",
                "Tests model name display (DR-HM311S vs DR-HHM001S)",
                "test-model-display.sh",
                ExecutionKind::Shell,
            )
            .with_covers("Model name display (DR-HM311S vs DR-HHM001S)"),
        ];

        Self {
            title: DEFAULT_TITLE.to_string(),
            success_note: Some(DEFAULT_SUCCESS_NOTE.to_string()),
            cases,
        }
    }

    /// Load a catalog declared in a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::file_read(path, e))?;
        Self::from_toml(&content)
    }

    /// Parse a catalog from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(content)
            .map_err(|e| Error::ConfigParse(format!("Failed to parse test catalog: {}", e)))?;
        let catalog = Self::new(file.title.unwrap_or_else(|| "Test Suite".to_string()), file.tests)?;
        Ok(match file.success_note {
            Some(note) => catalog.with_success_note(note),
            None => catalog,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn success_note(&self) -> Option<&str> {
        self.success_note.as_deref()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TestCase> {
        self.cases.iter()
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Resolve a user token to a single test
    ///
    /// Priority, each level scanning the whole catalog in order:
    /// exact `file`, case-insensitive substring of `name`, substring of `file`.
    pub fn lookup(&self, token: &str) -> Result<&TestCase> {
        let folded = token.to_lowercase();

        self.cases
            .iter()
            .find(|case| case.file == token)
            .or_else(|| {
                self.cases
                    .iter()
                    .find(|case| case.name.to_lowercase().contains(&folded))
            })
            .or_else(|| self.cases.iter().find(|case| case.file.contains(token)))
            .ok_or_else(|| Error::TestNotFound(token.to_string()))
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a TestCase;
    type IntoIter = std::slice::Iter<'a, TestCase>;

    fn into_iter(self) -> Self::IntoIter {
        self.cases.iter()
    }
}
