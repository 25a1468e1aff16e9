//! Per-operation results and the run summary

use colored::Colorize;
use serde::Serialize;

/// How one operation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Success,
    Failure,
    Skipped,
}

/// Result of exercising one schema operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationResult {
    pub schema_id: String,
    pub outcome: Outcome,
    pub detail: String,
}

impl OperationResult {
    pub fn success(schema_id: &str, detail: impl Into<String>) -> Self {
        Self::new(schema_id, Outcome::Success, detail)
    }

    pub fn failure(schema_id: &str, detail: impl Into<String>) -> Self {
        Self::new(schema_id, Outcome::Failure, detail)
    }

    pub fn skipped(schema_id: &str, detail: impl Into<String>) -> Self {
        Self::new(schema_id, Outcome::Skipped, detail)
    }

    fn new(schema_id: &str, outcome: Outcome, detail: impl Into<String>) -> Self {
        Self {
            schema_id: schema_id.to_string(),
            outcome,
            detail: detail.into(),
        }
    }
}

/// Counts over a finished run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub successes: usize,
    pub failures: usize,
    pub skipped: usize,
}

impl Summary {
    pub fn total(&self) -> usize {
        self.successes + self.failures + self.skipped
    }
}

/// Append-only record of operation results, in execution order
#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    results: Vec<OperationResult>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, result: OperationResult) {
        self.results.push(result);
    }

    pub fn results(&self) -> &[OperationResult] {
        &self.results
    }

    pub fn summary(&self) -> Summary {
        self.results
            .iter()
            .fold(Summary::default(), |mut summary, result| {
                match result.outcome {
                    Outcome::Success => summary.successes += 1,
                    Outcome::Failure => summary.failures += 1,
                    Outcome::Skipped => summary.skipped += 1,
                }
                summary
            })
    }

    pub fn has_failures(&self) -> bool {
        self.results.iter().any(|r| r.outcome == Outcome::Failure)
    }

    /// Print the final counts
    pub fn print_summary(&self) {
        let summary = self.summary();
        println!("\n{}", "Summary:".cyan());
        println!(
            "  {} passed, {} failed, {} skipped ({} operations)",
            summary.successes.to_string().green(),
            summary.failures.to_string().red(),
            summary.skipped.to_string().yellow(),
            summary.total()
        );

        let failed: Vec<&OperationResult> = self
            .results
            .iter()
            .filter(|r| r.outcome == Outcome::Failure)
            .collect();
        if !failed.is_empty() {
            println!("\n{}", "Failed operations:".red());
            for result in failed {
                println!("  {} {}", "✗".red(), result.schema_id);
            }
        }
    }
}

/// One report line, uncolored
pub fn format_result(result: &OperationResult) -> String {
    match result.outcome {
        Outcome::Success => format!("Success: {}", result.schema_id),
        Outcome::Failure => format!("Failed {}: {}", result.schema_id, result.detail),
        Outcome::Skipped => format!("Skipping {}: {}", result.schema_id, result.detail),
    }
}

/// Print one report line as the operation completes
pub fn print_result(result: &OperationResult) {
    let line = format_result(result);
    match result.outcome {
        Outcome::Success => println!("    {} {}", "✓".green(), line),
        Outcome::Failure => println!("    {} {}", "✗".red(), line.red()),
        Outcome::Skipped => println!("    {} {}", "⚠".yellow(), line.yellow()),
    }
}
