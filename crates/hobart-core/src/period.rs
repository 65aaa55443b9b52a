//! Period selection among overlapping reported facts.
//!
//! A single concept tag carries many occurrences for one fiscal year: the
//! current period, prior-year comparatives re-reported under the same
//! fiscal-year label, and restatements filed months later. The selector
//! picks the one occurrence that is the target period's authoritative
//! value, or refuses to pick when the data does not support a unique
//! answer.

use crate::fact::{Fact, FormType};
use crate::schema::ValueKind;
use chrono::Datelike;
use std::ops::RangeInclusive;

/// Accepted span for an annual duration fact, in days.
const ANNUAL_SPAN_DAYS: RangeInclusive<i64> = 350..=380;

/// Accepted span for a quarterly duration fact, in days.
const QUARTER_SPAN_DAYS: RangeInclusive<i64> = 75..=105;

/// Outcome of selecting among candidate facts for one period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Selection<'a> {
    /// Exactly one authoritative fact
    Chosen(&'a Fact),
    /// No candidate survives the period filters
    Empty,
    /// Candidates tie on filed date with materially different values;
    /// refusing to guess is correctness over coverage
    Ambiguous,
}

impl<'a> Selection<'a> {
    /// The chosen fact, if any.
    pub const fn fact(&self) -> Option<&'a Fact> {
        match self {
            Self::Chosen(fact) => Some(fact),
            Self::Empty | Self::Ambiguous => None,
        }
    }
}

/// Picks the authoritative fact for a fiscal year / report type.
#[derive(Debug, Clone, Copy, Default)]
pub struct PeriodSelector;

impl PeriodSelector {
    /// Select the best-matching fact among `candidates`.
    ///
    /// Policy, in order: value-kind filter (never coerced), span filter
    /// (~12 months for annual flows, ~3 months for quarterly), end-year
    /// plausibility (a comparative whose period end cannot close the
    /// target fiscal year is out even when it is the only candidate),
    /// latest period end among survivors, latest filed date
    /// (restatements supersede), and finally an ambiguity check on
    /// whatever still ties.
    pub fn select<'a>(
        candidates: &[&'a Fact],
        kind: ValueKind,
        fiscal_year: i32,
        form: FormType,
    ) -> Selection<'a> {
        let mut viable: Vec<&Fact> = candidates
            .iter()
            .copied()
            .filter(|f| kind_matches(f, kind))
            .filter(|f| f.fiscal_year_or_end_year() == fiscal_year)
            .filter(|f| span_matches(f, form))
            .filter(|f| end_closes_fiscal_year(f, form, fiscal_year))
            .collect();

        let Some(target_end) = viable.iter().map(|f| f.period.end()).max() else {
            return Selection::Empty;
        };
        viable.retain(|f| f.period.end() == target_end);

        // Later filings supersede earlier ones for the same period.
        // Facts without a filed date sort before any dated filing.
        let latest_filed = viable.iter().map(|f| f.filed).max().flatten();
        viable.retain(|f| f.filed == latest_filed);

        let Some(&first) = viable.first() else {
            return Selection::Empty;
        };
        if viable
            .iter()
            .any(|f| materially_different(f.value, first.value))
        {
            log::debug!(
                "ambiguous period for {} fy{}: {} candidates disagree after filed-date tie-break",
                first.tag,
                fiscal_year,
                viable.len()
            );
            return Selection::Ambiguous;
        }

        Selection::Chosen(first)
    }
}

/// Whether a fact's shape can satisfy the expected value kind.
fn kind_matches(fact: &Fact, kind: ValueKind) -> bool {
    match kind {
        ValueKind::InstantBalance => fact.period.is_instant(),
        ValueKind::DurationFlow => !fact.period.is_instant() && !fact.unit.contains('/'),
        ValueKind::PerShare => !fact.period.is_instant() && fact.unit.contains('/'),
    }
}

/// Whether a fact's span fits the report type. Instants always do; their
/// shape was already vetted by the kind filter.
fn span_matches(fact: &Fact, form: FormType) -> bool {
    match fact.period.duration_days() {
        None => true,
        Some(days) => match form {
            FormType::Annual => ANNUAL_SPAN_DAYS.contains(&days),
            FormType::Quarterly => QUARTER_SPAN_DAYS.contains(&days),
        },
    }
}

/// Whether a fact's period end can close the target fiscal year.
///
/// Filings re-report prior periods under the carrying filing's
/// fiscal-year label, so the label alone cannot keep a comparative out
/// when it is the only candidate left. Its end year gives it away: an
/// annual period for fiscal year Y ends in calendar Y, or in Y+1 for
/// fiscal years straddling the calendar boundary. Interim quarters of a
/// straddling year may also end in Y-1.
fn end_closes_fiscal_year(fact: &Fact, form: FormType, fiscal_year: i32) -> bool {
    let end_year = fact.period.end().year();
    match form {
        FormType::Annual => end_year == fiscal_year || end_year == fiscal_year + 1,
        FormType::Quarterly => (fiscal_year - 1..=fiscal_year + 1).contains(&end_year),
    }
}

/// Two reported values disagree beyond rounding noise.
///
/// Relative, with a floor of 1.0 on the denominator so that large
/// integers differing by float noise compare equal while restated
/// per-share values do not.
fn materially_different(a: f64, b: f64) -> bool {
    (a - b).abs() > a.abs().max(b.abs()).max(1.0) * 1e-6
}
