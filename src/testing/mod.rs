//! Test suite orchestration
//!
//! A declared catalog of test artifacts, an orchestrator that runs them
//! strictly one after another, and the summary of a full run.

mod catalog;
mod runner;
mod summary;

pub use catalog::{Catalog, ExecutionKind, TestCase};
pub use runner::{CaseOutcome, Orchestrator, TestResult};
pub use summary::SuiteSummary;
