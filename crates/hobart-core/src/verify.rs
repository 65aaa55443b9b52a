//! Re-derives a statement from fresh source data and diffs it line by
//! line against a previously exported one.

use crate::builder::{Statement, StatementBuilder};
use crate::error::Result;
use crate::fact::FormType;
use crate::schema::StatementGroup;
use crate::store::FactStore;
use serde::{Deserialize, Serialize};

/// Comparison tolerance for one line value.
///
/// A delta passes when `|expected - actual| <= |expected| * relative +
/// absolute`. The boundary is inclusive. Defaults allow 0.1% relative
/// drift plus a small absolute floor so that near-zero lines are not
/// compared at infinite precision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerance {
    /// Relative component, as a fraction of the expected value
    pub relative: f64,
    /// Absolute floor added to the allowance
    pub absolute: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            relative: 0.001,
            absolute: 0.01,
        }
    }
}

impl Tolerance {
    /// Whether `actual` is acceptably close to `expected`.
    pub fn allows(&self, expected: f64, actual: f64) -> bool {
        (expected - actual).abs() <= expected.abs() * self.relative + self.absolute
    }
}

/// Outcome of comparing one line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LineStatus {
    /// Both sides resolved and agree within tolerance
    Match,
    /// Both sides resolved but disagree beyond tolerance
    Mismatch {
        /// Value from the previously built statement
        expected: f64,
        /// Freshly re-derived value
        actual: f64,
        /// `expected - actual`
        delta: f64,
    },
    /// The exported statement has a value the fresh source no longer
    /// yields (a tag or period dropped out of the filing data)
    MissingInSource,
    /// The fresh source yields a value the exported statement lacks
    /// (new data appeared after the export)
    MissingInOutput,
}

/// One compared line, in schema order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineCheck {
    /// Statement group the line belongs to
    pub group: StatementGroup,
    /// Canonical line name
    pub name: String,
    /// Comparison outcome
    pub status: LineStatus,
}

/// Terminal status of a verification run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    /// Zero mismatches. Missing lines are warnings, not failures.
    Pass,
    /// At least one line mismatched
    Fail,
    /// The fresh data could not be obtained or rebuilt
    Error,
}

/// Full result of verifying one exported statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationResult {
    /// Fiscal year that was verified
    pub fiscal_year: i32,
    /// Annual or quarterly report
    pub form: FormType,
    /// Terminal status
    pub status: VerificationStatus,
    /// Per-line outcomes, schema order
    pub checks: Vec<LineCheck>,
    /// Lines that agreed within tolerance
    pub matched: usize,
    /// Lines that disagreed
    pub mismatched: usize,
    /// Lines absent from the fresh source
    pub missing_in_source: usize,
    /// Lines absent from the exported statement
    pub missing_in_output: usize,
    /// Cause, when `status` is `Error`
    pub error: Option<String>,
}

impl VerificationResult {
    /// Result for a run that never got to comparing, e.g. the source
    /// fetch failed or the period no longer exists upstream.
    pub fn fetch_error(fiscal_year: i32, form: FormType, message: impl Into<String>) -> Self {
        Self {
            fiscal_year,
            form,
            status: VerificationStatus::Error,
            checks: Vec::new(),
            matched: 0,
            mismatched: 0,
            missing_in_source: 0,
            missing_in_output: 0,
            error: Some(message.into()),
        }
    }

    /// Lines compared on both sides.
    pub const fn compared(&self) -> usize {
        self.matched + self.mismatched
    }
}

/// Verifies exported statements against freshly fetched facts.
#[derive(Debug, Clone, Copy)]
pub struct Verifier {
    tolerance: Tolerance,
}

impl Verifier {
    /// Create a verifier with the given tolerance.
    pub const fn new(tolerance: Tolerance) -> Self {
        Self { tolerance }
    }

    /// Rebuild `previous`'s period from `fresh` and diff line by line.
    ///
    /// Lines unresolved on both sides are not compared at all. A line
    /// resolved on exactly one side is reported missing on the other,
    /// which warns but never fails the run; only a value disagreement
    /// beyond tolerance does.
    pub fn verify(&self, previous: &Statement, fresh: &FactStore) -> Result<VerificationResult> {
        let rebuilt = StatementBuilder::new(fresh).build(previous.fiscal_year, previous.form)?;

        let mut checks = Vec::new();
        let (mut matched, mut mismatched) = (0usize, 0usize);
        let (mut missing_in_source, mut missing_in_output) = (0usize, 0usize);

        for (group, name, prev) in previous.lines() {
            let status = match (prev.value(), rebuilt.line(name).and_then(|v| v.value())) {
                (Some(expected), Some(actual)) => {
                    if self.tolerance.allows(expected, actual) {
                        matched += 1;
                        LineStatus::Match
                    } else {
                        mismatched += 1;
                        log::warn!(
                            "{name}: expected {expected}, fresh source says {actual}"
                        );
                        LineStatus::Mismatch {
                            expected,
                            actual,
                            delta: expected - actual,
                        }
                    }
                }
                (Some(_), None) => {
                    missing_in_source += 1;
                    LineStatus::MissingInSource
                }
                (None, Some(_)) => {
                    missing_in_output += 1;
                    LineStatus::MissingInOutput
                }
                (None, None) => continue,
            };
            checks.push(LineCheck {
                group,
                name: name.to_string(),
                status,
            });
        }

        let status = if mismatched == 0 {
            VerificationStatus::Pass
        } else {
            VerificationStatus::Fail
        };
        Ok(VerificationResult {
            fiscal_year: previous.fiscal_year,
            form: previous.form,
            status,
            checks,
            matched,
            mismatched,
            missing_in_source,
            missing_in_output,
            error: None,
        })
    }
}
