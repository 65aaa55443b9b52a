//! Raw XBRL facts and their reporting periods.
//!
//! A [`Fact`] is one reported number from a company's XBRL fact set, as
//! published by the SEC company-facts API. Many facts share a concept tag
//! across fiscal years, filings, and restatements; disentangling them is
//! the job of the period selector, not of this module.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Report type a fact was filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormType {
    /// Annual report (10-K)
    Annual,
    /// Quarterly report (10-Q)
    Quarterly,
}

impl FormType {
    /// Parse a SEC form string. Forms other than 10-K/10-Q are not ours.
    pub fn parse(form: &str) -> Option<Self> {
        match form {
            "10-K" => Some(Self::Annual),
            "10-Q" => Some(Self::Quarterly),
            _ => None,
        }
    }

    /// The SEC form string for this report type.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Annual => "10-K",
            Self::Quarterly => "10-Q",
        }
    }
}

impl fmt::Display for FormType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fiscal period label as reported in the fact stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FiscalPeriod {
    /// Full fiscal year
    Fy,
    /// First fiscal quarter
    Q1,
    /// Second fiscal quarter
    Q2,
    /// Third fiscal quarter
    Q3,
    /// Fourth fiscal quarter
    Q4,
}

impl FiscalPeriod {
    /// Parse a fiscal period label ("FY", "Q1".."Q4").
    pub fn parse(fp: &str) -> Option<Self> {
        match fp {
            "FY" => Some(Self::Fy),
            "Q1" => Some(Self::Q1),
            "Q2" => Some(Self::Q2),
            "Q3" => Some(Self::Q3),
            "Q4" => Some(Self::Q4),
            _ => None,
        }
    }
}

/// The reporting period a fact covers.
///
/// Balance-sheet items are measured at an instant; income and cash-flow
/// items accumulate over a duration. The two are never interchangeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Period {
    /// A point-in-time measurement (balances)
    Instant(NaiveDate),
    /// A [start, end] span (flows)
    Duration {
        /// First day of the span
        start: NaiveDate,
        /// Last day of the span
        end: NaiveDate,
    },
}

impl Period {
    /// The period's end (or instant) date.
    pub const fn end(&self) -> NaiveDate {
        match self {
            Self::Instant(date) => *date,
            Self::Duration { end, .. } => *end,
        }
    }

    /// Returns true for point-in-time periods.
    pub const fn is_instant(&self) -> bool {
        matches!(self, Self::Instant(_))
    }

    /// Span length in days, `None` for instants.
    pub fn duration_days(&self) -> Option<i64> {
        match self {
            Self::Instant(_) => None,
            Self::Duration { start, end } => Some(end.signed_duration_since(*start).num_days()),
        }
    }
}

/// One reported number from a company's XBRL fact set.
///
/// Immutable once ingested. Many facts may share a concept tag: annual
/// and quarterly occurrences, prior-year comparatives re-reported in
/// later filings, and restatements all land in the same series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fact {
    /// Concept tag from the standardized taxonomy (e.g. "NetIncomeLoss")
    pub tag: String,
    /// Reported value
    pub value: f64,
    /// Reporting unit (currency code, "shares", or a per-share ratio)
    pub unit: String,
    /// Period the value covers
    pub period: Period,
    /// Fiscal year label, when reported
    pub fiscal_year: Option<i32>,
    /// Fiscal period label, when reported
    pub fiscal_period: Option<FiscalPeriod>,
    /// Form type of the filing that carried this fact
    pub form: Option<FormType>,
    /// Date the carrying filing was filed
    pub filed: Option<NaiveDate>,
    /// Accession number of the carrying filing
    pub accession: Option<String>,
}

impl Fact {
    /// Fiscal-year attribution for window lookups.
    ///
    /// The reported label wins; facts without one fall back to the
    /// period-end calendar year.
    pub fn fiscal_year_or_end_year(&self) -> i32 {
        use chrono::Datelike;
        self.fiscal_year.unwrap_or_else(|| self.period.end().year())
    }
}
