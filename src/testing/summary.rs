//! Aggregation and reporting for a full suite run

use colored::Colorize;

use super::catalog::Catalog;
use super::runner::TestResult;

/// Results of a full run, in catalog order
#[derive(Debug, Clone)]
pub struct SuiteSummary {
    results: Vec<TestResult>,
}

impl SuiteSummary {
    pub fn new(results: Vec<TestResult>) -> Self {
        Self { results }
    }

    pub fn results(&self) -> &[TestResult] {
        &self.results
    }

    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.passed).count()
    }

    pub fn failed(&self) -> usize {
        self.results.iter().filter(|r| !r.passed).count()
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Pass rate rounded to the nearest whole percent, halves rounding up
    pub fn percentage(&self) -> usize {
        let total = self.total();
        if total == 0 {
            return 0;
        }
        (self.passed() * 200 + total) / (2 * total)
    }

    pub fn all_passed(&self) -> bool {
        self.failed() == 0
    }

    /// e.g. `3/4 tests passed (75%)`
    pub fn results_line(&self) -> String {
        format!(
            "{}/{} tests passed ({}%)",
            self.passed(),
            self.total(),
            self.percentage()
        )
    }

    /// Closing line of a full run
    pub fn verdict(&self, catalog: &Catalog) -> String {
        if !self.all_passed() {
            return "Some tests failed. Please review the implementation.".to_string();
        }
        match catalog.success_note() {
            Some(note) => format!("All tests passed! {}", note),
            None => "All tests passed!".to_string(),
        }
    }

    /// Print the per-test lines, totals and the coverage footer
    pub fn print(&self, catalog: &Catalog) {
        println!("{}", "Test Suite Summary".white().bold());
        println!("====================");

        for result in &self.results {
            if result.passed {
                println!("{} - {}", "✓ PASS".green(), result.name);
            } else if let Some(error) = &result.error {
                println!("{} - {} ({})", "✗ FAIL".red(), result.name, error.dimmed());
            } else {
                println!("{} - {}", "✗ FAIL".red(), result.name);
            }
        }

        println!();
        println!("{} {}", "Results:".cyan(), self.results_line());

        let verdict = self.verdict(catalog);
        if self.all_passed() {
            println!("{}", verdict.green().bold());
        } else {
            println!("{}", verdict.yellow().bold());
        }

        let coverage: Vec<&str> = catalog.iter().filter_map(|c| c.covers.as_deref()).collect();
        if !coverage.is_empty() {
            println!();
            println!("{}", "Test Coverage:".white().bold());
            println!("==============");
            for line in coverage {
                println!("{} {}", "✓".green(), line);
            }
        }
    }
}
