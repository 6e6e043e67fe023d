//! Test runner implementation
//!
//! Runs catalog entries as child processes, one at a time, with the
//! parent's standard streams inherited so test output shows up live.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use colored::Colorize;
use tokio::process::{Child, Command as TokioCommand};

use crate::common::config::Launchers;
use crate::common::{Error, Result};

use super::catalog::{Catalog, TestCase};
use super::summary::SuiteSummary;

/// Width of the separator lines around a test's own output
const RULE_WIDTH: usize = 50;

/// Result of a test run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestResult {
    pub name: String,
    pub passed: bool,
    /// Exit code when the child exited on its own
    pub exit_code: Option<i32>,
    /// Why the test could not run to completion
    pub error: Option<String>,
}

impl TestResult {
    /// Failing result for a test that never produced an exit status
    pub fn errored(name: &str, error: &Error) -> Self {
        Self {
            name: name.to_string(),
            passed: false,
            exit_code: None,
            error: Some(error.to_string()),
        }
    }
}

/// How a launched child finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseOutcome {
    /// Child exited; `None` when it was terminated by a signal
    Exited(Option<i32>),
    /// Child outlived the per-test timeout and was killed
    TimedOut(Duration),
}

/// Runs tests from an injected catalog
#[derive(Debug, Clone)]
pub struct Orchestrator {
    catalog: Catalog,
    base_dir: PathBuf,
    launchers: Launchers,
    timeout: Option<Duration>,
}

impl Orchestrator {
    /// Create an orchestrator running artifacts found under `base_dir`
    pub fn new(catalog: Catalog, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            catalog,
            base_dir: base_dir.into(),
            launchers: Launchers::default(),
            timeout: None,
        }
    }

    pub fn with_launchers(mut self, launchers: Launchers) -> Self {
        self.launchers = launchers;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run one test to completion
    ///
    /// A non-zero exit is a failed `TestResult`; only a child that cannot be
    /// spawned (or waited on) comes back as `Err`.
    pub async fn run_case(&self, case: &TestCase) -> Result<TestResult> {
        println!("{} {}", "Running:".blue().bold(), case.name.white().bold());
        println!("  {} {}", "Description:".cyan(), case.description.dimmed());
        println!("  {} {}", "File:".cyan(), case.file);
        println!("{}", "─".repeat(RULE_WIDTH));

        let outcome = match self.launch(case).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(test = %case.name, error = %e, "Test could not be launched");
                println!("{} {} - ERROR: {}", "✗".red(), case.name, e);
                println!();
                return Err(e);
            }
        };

        println!("{}", "─".repeat(RULE_WIDTH));
        let result = match outcome {
            CaseOutcome::Exited(Some(0)) => {
                println!("{} {} - {}", "✓".green(), case.name, "PASSED".green().bold());
                TestResult {
                    name: case.name.clone(),
                    passed: true,
                    exit_code: Some(0),
                    error: None,
                }
            }
            CaseOutcome::Exited(Some(code)) => {
                println!(
                    "{} {} - {}",
                    "✗".red(),
                    case.name,
                    format!("FAILED (exit code: {})", code).red().bold()
                );
                TestResult {
                    name: case.name.clone(),
                    passed: false,
                    exit_code: Some(code),
                    error: None,
                }
            }
            CaseOutcome::Exited(None) => {
                println!(
                    "{} {} - {}",
                    "✗".red(),
                    case.name,
                    "FAILED (terminated by signal)".red().bold()
                );
                TestResult {
                    name: case.name.clone(),
                    passed: false,
                    exit_code: None,
                    error: None,
                }
            }
            CaseOutcome::TimedOut(limit) => {
                tracing::warn!(test = %case.name, secs = limit.as_secs_f64(), "Test timed out");
                let detail = format!("timed out after {}s", limit.as_secs_f64());
                println!(
                    "{} {} - {}",
                    "✗".red(),
                    case.name,
                    format!("FAILED ({})", detail).red().bold()
                );
                TestResult {
                    name: case.name.clone(),
                    passed: false,
                    exit_code: None,
                    error: Some(detail),
                }
            }
        };
        println!();

        Ok(result)
    }

    /// Run every catalog entry in order and summarize
    ///
    /// Each test is awaited before the next starts. A test that fails to
    /// launch is recorded as failed and the loop moves on.
    pub async fn run_suite(&self) -> SuiteSummary {
        println!("{}", self.catalog.title().white().bold());
        println!("{}", "=".repeat(self.catalog.title().chars().count()));
        println!();
        println!("{}", "Starting test suite execution...".cyan());
        println!();

        let mut results = Vec::with_capacity(self.catalog.len());
        for case in &self.catalog {
            let result = match self.run_case(case).await {
                Ok(result) => result,
                Err(e) => TestResult::errored(&case.name, &e),
            };
            results.push(result);
        }

        let summary = SuiteSummary::new(results);
        summary.print(&self.catalog);
        summary
    }

    /// Spawn the child and wait for it to finish
    async fn launch(&self, case: &TestCase) -> Result<CaseOutcome> {
        let program = self.launchers.resolve(case.kind);
        let program_name = self.launchers.program_for(case.kind);
        let artifact = self.base_dir.join(&case.file);

        tracing::debug!(
            program = %program.display(),
            artifact = %artifact.display(),
            cwd = %self.base_dir.display(),
            "Spawning test"
        );

        let child = TokioCommand::new(&program)
            .arg(&artifact)
            .current_dir(&self.base_dir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| Error::launch(program_name, &artifact, e))?;

        wait_for_exit(child, self.timeout)
            .await
            .map_err(|e| Error::launch(program_name, &artifact, e))
    }
}

/// Wait for a child, killing it if it outlives `timeout`
async fn wait_for_exit(mut child: Child, timeout: Option<Duration>) -> std::io::Result<CaseOutcome> {
    let Some(limit) = timeout else {
        let status = child.wait().await?;
        return Ok(CaseOutcome::Exited(status.code()));
    };

    let waited = tokio::time::timeout(limit, child.wait()).await;
    match waited {
        Ok(status) => Ok(CaseOutcome::Exited(status?.code())),
        Err(_) => {
            child.kill().await?;
            Ok(CaseOutcome::TimedOut(limit))
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::testing::catalog::ExecutionKind;
    use std::fs;
    use tempfile::TempDir;

    fn sh_launchers() -> Launchers {
        Launchers {
            runtime: "sh".to_string(),
            shell: "sh".to_string(),
        }
    }

    fn write_script(dir: &TempDir, file: &str, body: &str) {
        fs::write(dir.path().join(file), body).unwrap();
    }

    fn orchestrator(dir: &TempDir, cases: Vec<TestCase>) -> Orchestrator {
        let catalog = Catalog::new("unit", cases).unwrap();
        Orchestrator::new(catalog, dir.path().canonicalize().unwrap()).with_launchers(sh_launchers())
    }

    #[tokio::test]
    async fn test_exit_zero_passes() {
        let dir = tempfile::tempdir().unwrap();
        write_script(&dir, "pass.sh", "exit 0\n");
        let case = TestCase::new("Pass", "exits zero", "pass.sh", ExecutionKind::Shell);
        let orch = orchestrator(&dir, vec![case.clone()]);

        let result = orch.run_case(&case).await.unwrap();
        assert!(result.passed);
        assert_eq!(result.exit_code, Some(0));
        assert!(result.error.is_none());
    }

    #[tokio::test]
    async fn test_nonzero_exit_fails_without_error() {
        let dir = tempfile::tempdir().unwrap();
        write_script(&dir, "fail.sh", "exit 2\n");
        let case = TestCase::new("Fail", "exits two", "fail.sh", ExecutionKind::Shell);
        let orch = orchestrator(&dir, vec![case.clone()]);

        let result = orch.run_case(&case).await.unwrap();
        assert!(!result.passed);
        assert_eq!(result.exit_code, Some(2));
        assert!(result.error.is_none());
    }

    #[tokio::test]
    async fn test_missing_launcher_is_a_launch_error() {
        let dir = tempfile::tempdir().unwrap();
        write_script(&dir, "pass.sh", "exit 0\n");
        let case = TestCase::new("Pass", "", "pass.sh", ExecutionKind::Shell);
        let orch = orchestrator(&dir, vec![case.clone()]).with_launchers(Launchers {
            runtime: "sh".to_string(),
            shell: "no-such-shell-for-suite-runner".to_string(),
        });

        let err = orch.run_case(&case).await.unwrap_err();
        assert!(matches!(err, Error::Launch { .. }), "{err:?}");
    }

    #[tokio::test]
    async fn test_kind_selects_launcher() {
        let dir = tempfile::tempdir().unwrap();
        write_script(&dir, "check.js", "exit 0\n");
        let case = TestCase::new("Runtime", "", "check.js", ExecutionKind::Runtime);
        let orch = orchestrator(&dir, vec![case.clone()]).with_launchers(Launchers {
            runtime: "sh".to_string(),
            shell: "no-such-shell-for-suite-runner".to_string(),
        });

        assert!(orch.run_case(&case).await.unwrap().passed);
    }

    #[tokio::test]
    async fn test_child_runs_in_base_dir() {
        let dir = tempfile::tempdir().unwrap();
        write_script(&dir, "cwd.sh", "pwd -P > cwd.txt\n");
        let case = TestCase::new("Cwd", "", "cwd.sh", ExecutionKind::Shell);
        let orch = orchestrator(&dir, vec![case.clone()]);

        assert!(orch.run_case(&case).await.unwrap().passed);
        let recorded = fs::read_to_string(dir.path().join("cwd.txt")).unwrap();
        assert_eq!(
            PathBuf::from(recorded.trim()),
            dir.path().canonicalize().unwrap()
        );
    }

    #[tokio::test]
    async fn test_signal_termination_fails() {
        let dir = tempfile::tempdir().unwrap();
        write_script(&dir, "killed.sh", "kill -9 $$\n");
        let case = TestCase::new("Killed", "", "killed.sh", ExecutionKind::Shell);
        let orch = orchestrator(&dir, vec![case.clone()]);

        let result = orch.run_case(&case).await.unwrap();
        assert!(!result.passed);
        assert_eq!(result.exit_code, None);
    }

    #[tokio::test]
    async fn test_timeout_kills_hung_test() {
        let dir = tempfile::tempdir().unwrap();
        write_script(&dir, "hang.sh", "exec sleep 30\n");
        let case = TestCase::new("Hang", "", "hang.sh", ExecutionKind::Shell);
        let orch = orchestrator(&dir, vec![case.clone()])
            .with_timeout(Some(Duration::from_millis(200)));

        let started = std::time::Instant::now();
        let result = orch.run_case(&case).await.unwrap();
        assert!(started.elapsed() < Duration::from_secs(10));
        assert!(!result.passed);
        assert!(result.error.unwrap().contains("timed out"));
    }

    #[tokio::test]
    async fn test_suite_isolates_failures_and_keeps_order() {
        let dir = tempfile::tempdir().unwrap();
        write_script(&dir, "first.sh", "echo first >> order.log\nexit 0\n");
        write_script(&dir, "second.sh", "echo second >> order.log\nexit 2\n");
        write_script(&dir, "fourth.sh", "echo fourth >> order.log\nexit 0\n");

        let orch = orchestrator(
            &dir,
            vec![
                TestCase::new("First", "", "first.sh", ExecutionKind::Shell),
                TestCase::new("Second", "", "second.sh", ExecutionKind::Shell),
                TestCase::new("Third", "", "third.js", ExecutionKind::Runtime),
                TestCase::new("Fourth", "", "fourth.sh", ExecutionKind::Shell),
            ],
        )
        .with_launchers(Launchers {
            runtime: "no-such-runtime-for-suite-runner".to_string(),
            shell: "sh".to_string(),
        });

        let summary = orch.run_suite().await;
        let names: Vec<&str> = summary.results().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["First", "Second", "Third", "Fourth"]);

        assert_eq!(summary.passed(), 2);
        assert_eq!(summary.failed(), 2);
        assert_eq!(summary.total(), 4);
        assert!(!summary.all_passed());

        let third = &summary.results()[2];
        assert!(!third.passed);
        assert!(third.error.is_some());
        assert_eq!(summary.results()[1].exit_code, Some(2));

        let order = fs::read_to_string(dir.path().join("order.log")).unwrap();
        assert_eq!(order, "first\nsecond\nfourth\n");
    }

    #[tokio::test]
    async fn test_suite_all_passing() {
        let dir = tempfile::tempdir().unwrap();
        let mut cases = Vec::new();
        for i in 0..4 {
            let file = format!("ok{}.sh", i);
            write_script(&dir, &file, "exit 0\n");
            cases.push(TestCase::new(&format!("Ok {}", i), "", &file, ExecutionKind::Shell));
        }

        let summary = orchestrator(&dir, cases).run_suite().await;
        assert!(summary.all_passed());
        assert_eq!(summary.results_line(), "4/4 tests passed (100%)");
    }
}
