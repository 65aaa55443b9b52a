//! Verification report rendering.
//!
//! Console output mirrors what an analyst expects when eyeballing a
//! single statement; the markdown summary aggregates a batch run into
//! a file that can be committed alongside the exports.

use chrono::Utc;
use hobart_core::{LineStatus, StatementGroup, VerificationResult, VerificationStatus, schema};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Render a single verification result for the console.
///
/// Matched lines get a check mark, mismatches show both values and the
/// delta, and one-sided lines are surfaced as warnings. Ends with the
/// same PASS/FAIL summary the exit code is derived from.
pub fn render_console(ticker: &str, result: &VerificationResult) -> String {
    let mut out = String::new();
    let rule = "=".repeat(80);

    let _ = writeln!(out, "{rule}");
    let _ = writeln!(
        out,
        "Verifying {ticker} {} FY{}",
        result.form, result.fiscal_year
    );
    let _ = writeln!(out, "{rule}");

    if let Some(error) = &result.error {
        let _ = writeln!(out, "\n⚠️  ERROR: {error}");
        return out;
    }

    for group in StatementGroup::ALL {
        let checks: Vec<_> = result.checks.iter().filter(|c| c.group == group).collect();
        if checks.is_empty() {
            continue;
        }
        let _ = writeln!(out, "\n{}", group.name());
        for check in checks {
            let label = schema::line_spec(&check.name).map_or(check.name.as_str(), |s| s.label);
            match &check.status {
                LineStatus::Match => {
                    let _ = writeln!(out, "  ✓ {label}");
                }
                LineStatus::Mismatch {
                    expected,
                    actual,
                    delta,
                } => {
                    let _ = writeln!(
                        out,
                        "  ✗ {label}: expected {expected:.2}, source has {actual:.2} (delta {delta:.2})"
                    );
                }
                LineStatus::MissingInSource => {
                    let _ = writeln!(out, "  ⚠️  {label}: not found in fresh source data");
                }
                LineStatus::MissingInOutput => {
                    let _ = writeln!(out, "  ⚠️  {label}: in source data but not in export");
                }
            }
        }
    }

    let _ = writeln!(out, "\nMatches: {}", result.matched);
    let _ = writeln!(out, "Discrepancies: {}", result.mismatched);
    match result.status {
        VerificationStatus::Pass => {
            let _ = writeln!(out, "\n✅ PASSED: all {} compared lines matched", result.compared());
        }
        VerificationStatus::Fail => {
            let _ = writeln!(
                out,
                "\n❌ FAILED: {} discrepancies out of {} compared lines",
                result.mismatched,
                result.compared()
            );
        }
        VerificationStatus::Error => {
            let _ = writeln!(out, "\n⚠️  ERROR: verification did not complete");
        }
    }

    out
}

/// One batch entry: the file verified and its outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchEntry {
    /// Export file name
    pub file: String,
    /// Ticker symbol
    pub ticker: String,
    /// Verification outcome
    pub result: VerificationResult,
}

/// Aggregated results of verifying a directory of exports.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Per-file outcomes, in verification order
    pub entries: Vec<BatchEntry>,
}

impl BatchSummary {
    /// Record one verified file.
    pub fn push(&mut self, file: impl Into<String>, ticker: impl Into<String>, result: VerificationResult) {
        self.entries.push(BatchEntry {
            file: file.into(),
            ticker: ticker.into(),
            result,
        });
    }

    /// Number of entries with the given status.
    pub fn count(&self, status: VerificationStatus) -> usize {
        self.entries
            .iter()
            .filter(|e| e.result.status == status)
            .count()
    }

    /// True when no entry failed or errored.
    pub fn all_passed(&self) -> bool {
        self.entries
            .iter()
            .all(|e| e.result.status == VerificationStatus::Pass)
    }

    /// Render the batch as a markdown report.
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "# Batch Verification Summary\n");
        let _ = writeln!(
            out,
            "**Generated**: {}\n",
            Utc::now().format("%Y-%m-%d %H:%M:%S")
        );
        let _ = writeln!(out, "**Files verified**: {}\n", self.entries.len());

        let _ = writeln!(out, "## Results\n");
        let _ = writeln!(out, "| File | Ticker | Year | Status | Matched | Compared | Discrepancies |");
        let _ = writeln!(out, "|------|--------|------|--------|---------|----------|---------------|");
        for entry in &self.entries {
            let r = &entry.result;
            let status = match r.status {
                VerificationStatus::Pass => "✅ pass",
                VerificationStatus::Fail => "❌ fail",
                VerificationStatus::Error => "⚠️ error",
            };
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} | {} | {} | {} |",
                entry.file,
                entry.ticker,
                r.fiscal_year,
                status,
                r.matched,
                r.compared(),
                r.mismatched
            );
        }

        let _ = writeln!(out, "\n## Totals\n");
        let _ = writeln!(out, "- ✅ Passed: {}", self.count(VerificationStatus::Pass));
        let _ = writeln!(out, "- ❌ Failed: {}", self.count(VerificationStatus::Fail));
        let _ = writeln!(out, "- ⚠️ Errors: {}", self.count(VerificationStatus::Error));
        let _ = writeln!(out, "- Total: {}\n", self.entries.len());

        let _ = writeln!(out, "## Details\n");
        for entry in &self.entries {
            let r = &entry.result;
            let _ = writeln!(out, "### {}\n", entry.file);
            let _ = writeln!(out, "- **Ticker**: {}", entry.ticker);
            let _ = writeln!(out, "- **Fiscal year**: {}", r.fiscal_year);
            match r.status {
                VerificationStatus::Pass => {
                    let _ = writeln!(out, "- ✅ All {} compared lines matched", r.compared());
                }
                VerificationStatus::Fail => {
                    let _ = writeln!(out, "- ❌ {} discrepancies found", r.mismatched);
                }
                VerificationStatus::Error => {
                    let _ = writeln!(
                        out,
                        "- ⚠️ Error: {}",
                        r.error.as_deref().unwrap_or("unknown")
                    );
                }
            }
            if r.missing_in_source > 0 {
                let _ = writeln!(out, "- {} lines missing in fresh source", r.missing_in_source);
            }
            if r.missing_in_output > 0 {
                let _ = writeln!(out, "- {} lines missing in export", r.missing_in_output);
            }
            let _ = writeln!(out);
        }

        out
    }

    /// Write the markdown report to a file.
    pub fn write_markdown(&self, path: &Path) -> Result<(), ReportError> {
        std::fs::write(path, self.to_markdown())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hobart_core::{FormType, LineCheck};

    fn passing_result() -> VerificationResult {
        VerificationResult {
            fiscal_year: 2024,
            form: FormType::Annual,
            status: VerificationStatus::Pass,
            checks: vec![LineCheck {
                group: StatementGroup::Income,
                name: "revenue".to_string(),
                status: LineStatus::Match,
            }],
            matched: 1,
            mismatched: 0,
            missing_in_source: 0,
            missing_in_output: 0,
            error: None,
        }
    }

    fn failing_result() -> VerificationResult {
        VerificationResult {
            fiscal_year: 2023,
            form: FormType::Annual,
            status: VerificationStatus::Fail,
            checks: vec![LineCheck {
                group: StatementGroup::Income,
                name: "revenue".to_string(),
                status: LineStatus::Mismatch {
                    expected: 100_000.0,
                    actual: 101_000.0,
                    delta: -1_000.0,
                },
            }],
            matched: 0,
            mismatched: 1,
            missing_in_source: 0,
            missing_in_output: 0,
            error: None,
        }
    }

    #[test]
    fn test_console_pass_rendering() {
        let out = render_console("AAPL", &passing_result());
        assert!(out.contains("Verifying AAPL 10-K FY2024"));
        assert!(out.contains("✓ Revenue"));
        assert!(out.contains("✅ PASSED"));
    }

    #[test]
    fn test_console_fail_rendering() {
        let out = render_console("AAPL", &failing_result());
        assert!(out.contains("✗ Revenue"));
        assert!(out.contains("❌ FAILED"));
    }

    #[test]
    fn test_console_error_rendering() {
        let result = VerificationResult::fetch_error(2024, FormType::Annual, "timed out");
        let out = render_console("AAPL", &result);
        assert!(out.contains("ERROR: timed out"));
    }

    #[test]
    fn test_batch_markdown() {
        let mut batch = BatchSummary::default();
        batch.push("AAPL_10-K_2024.json", "AAPL", passing_result());
        batch.push("AAPL_10-K_2023.json", "AAPL", failing_result());
        batch.push(
            "MSFT_10-K_2024.json",
            "MSFT",
            VerificationResult::fetch_error(2024, FormType::Annual, "connection refused"),
        );

        assert!(!batch.all_passed());
        assert_eq!(batch.count(VerificationStatus::Pass), 1);
        assert_eq!(batch.count(VerificationStatus::Fail), 1);
        assert_eq!(batch.count(VerificationStatus::Error), 1);

        let md = batch.to_markdown();
        assert!(md.contains("# Batch Verification Summary"));
        assert!(md.contains("| AAPL_10-K_2024.json | AAPL | 2024 | ✅ pass |"));
        assert!(md.contains("- ❌ Failed: 1"));
        assert!(md.contains("connection refused"));
    }
}
