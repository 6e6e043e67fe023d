//! CLI command handling
//!
//! Chooses between a full suite run and single-test mode, and maps the
//! outcome to a pass/fail boolean for the process exit code.

use std::path::PathBuf;
use std::time::Duration;

use colored::Colorize;

use crate::common::config::Config;
use crate::common::{paths, Error, Result};
use crate::testing::{Catalog, Orchestrator};

/// Options collected from the command line
#[derive(Debug, Default, Clone)]
pub struct Options {
    /// Token naming a single test to run
    pub test: Option<String>,
    /// TOML catalog to use instead of the built-in suite
    pub catalog: Option<PathBuf>,
    /// Directory holding the test artifacts
    pub base_dir: Option<PathBuf>,
    /// Per-test timeout in seconds
    pub timeout_secs: Option<u64>,
    /// Only list the catalog
    pub list: bool,
}

/// Dispatch a CLI invocation
///
/// Returns whether every requested test passed.
pub async fn dispatch(options: Options) -> Result<bool> {
    let config = Config::load()?;
    let catalog = match &options.catalog {
        Some(path) => Catalog::from_file(path)?,
        None => Catalog::hm311s(),
    };

    if options.list {
        print_catalog(&catalog);
        return Ok(true);
    }

    match &options.test {
        None => {
            let orchestrator = build_orchestrator(catalog, &config, &options);
            let summary = orchestrator.run_suite().await;
            Ok(summary.all_passed())
        }
        Some(token) => {
            // Resolve before touching the filesystem so a bad token never spawns anything
            let case = match catalog.lookup(token) {
                Ok(case) => case.clone(),
                Err(Error::TestNotFound(token)) => {
                    print_not_found(&token, &catalog);
                    return Ok(false);
                }
                Err(e) => return Err(e),
            };

            let orchestrator = build_orchestrator(catalog, &config, &options);
            println!(
                "{} {}",
                "Running specific test:".blue().bold(),
                case.name.white().bold()
            );
            println!();

            // Launch failures are already reported by the runner
            Ok(orchestrator
                .run_case(&case)
                .await
                .map(|result| result.passed)
                .unwrap_or(false))
        }
    }
}

fn build_orchestrator(catalog: Catalog, config: &Config, options: &Options) -> Orchestrator {
    let base_dir = paths::resolve_base_dir(
        options.base_dir.as_deref(),
        config.base_dir.as_deref(),
        options.catalog.as_deref(),
    );
    let timeout = options
        .timeout_secs
        .map(Duration::from_secs)
        .or_else(|| config.timeouts.per_test());

    tracing::debug!(base_dir = %base_dir.display(), ?timeout, tests = catalog.len(), "Orchestrator ready");

    Orchestrator::new(catalog, base_dir)
        .with_launchers(config.launchers.clone())
        .with_timeout(timeout)
}

fn print_catalog(catalog: &Catalog) {
    println!("Available tests:");
    for case in catalog {
        println!("  - {} ({})", case.file, case.name);
    }
}

fn print_not_found(token: &str, catalog: &Catalog) {
    println!("{} {}", "✗ Test not found:".red(), token);
    println!();
    print_catalog(catalog);
}
