//! Suite runner - sequential test orchestrator
//!
//! Runs a declared catalog of external test scripts as child processes,
//! one at a time, and aggregates their exit codes into a pass/fail summary.

pub mod cli;
pub mod common;
pub mod testing;

pub use common::{Error, Result};
pub use testing::{Catalog, ExecutionKind, Orchestrator, SuiteSummary, TestCase, TestResult};
