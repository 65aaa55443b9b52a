//! Alias-ordered tag resolution for canonical line items.

use crate::fact::{FormType, Period};
use crate::period::{PeriodSelector, Selection};
use crate::schema::LineItemSpec;
use crate::store::FactStore;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The single fact a resolved line traces back to.
///
/// Every available line item maps to exactly one reported fact — tag,
/// period, and filed date identify it in the source. No aggregation or
/// interpolation across facts ever happens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedFact {
    /// The value (normalized by the statement builder)
    pub value: f64,
    /// Reporting unit of the matched fact
    pub unit: String,
    /// The concept tag that matched
    pub tag: String,
    /// The period that matched
    pub period: Period,
    /// Filed date of the filing that carried the fact
    pub filed: Option<NaiveDate>,
}

/// Outcome of resolving one line item for one target period.
///
/// Tri-state by design: an ambiguous period is recorded distinctly from
/// a plain miss so that selection regressions stay diagnosable, but both
/// count as "no value" — a line is never defaulted to zero or estimated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResolvedValue {
    /// The line resolved to exactly one reported fact
    Resolved(ResolvedFact),
    /// No alias had a fact for the target period — a normal outcome,
    /// not every company reports every line
    Unavailable,
    /// Candidates disagreed after the filed-date tie-break
    Ambiguous,
}

impl ResolvedValue {
    /// Returns true if the line carries a value.
    pub const fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    /// The resolved value, if any.
    pub fn value(&self) -> Option<f64> {
        self.fact().map(|f| f.value)
    }

    /// The underlying resolved fact, if any.
    pub const fn fact(&self) -> Option<&ResolvedFact> {
        match self {
            Self::Resolved(fact) => Some(fact),
            Self::Unavailable | Self::Ambiguous => None,
        }
    }
}

/// Resolves line-item specs against a fact store.
///
/// Holds only a borrow of the store; construction is free and one
/// resolver is typically built per statement build.
#[derive(Debug, Clone, Copy)]
pub struct TagResolver<'a> {
    store: &'a FactStore,
}

impl<'a> TagResolver<'a> {
    /// Create a resolver over `store`.
    pub const fn new(store: &'a FactStore) -> Self {
        Self { store }
    }

    /// Resolve one line item for a fiscal year and report type.
    ///
    /// Aliases are tried in the spec's declared priority order; the first
    /// alias yielding an unambiguous selection wins. An ambiguous alias
    /// does not stop the scan — a later alias may still resolve cleanly —
    /// but is remembered so that a fully failed scan reports `Ambiguous`
    /// instead of `Unavailable` when ambiguity was the cause.
    pub fn resolve(
        &self,
        spec: &LineItemSpec,
        fiscal_year: i32,
        form: FormType,
    ) -> ResolvedValue {
        let mut saw_ambiguous = false;

        for alias in spec.aliases {
            let candidates = self.store.lookup_in_window(alias, fiscal_year, form);
            match PeriodSelector::select(&candidates, spec.kind, fiscal_year, form) {
                Selection::Chosen(fact) => {
                    return ResolvedValue::Resolved(ResolvedFact {
                        value: fact.value,
                        unit: fact.unit.clone(),
                        tag: fact.tag.clone(),
                        period: fact.period,
                        filed: fact.filed,
                    });
                }
                Selection::Ambiguous => saw_ambiguous = true,
                Selection::Empty => {}
            }
        }

        if saw_ambiguous {
            log::debug!("{}: ambiguous for fy{} {}", spec.name, fiscal_year, form);
            ResolvedValue::Ambiguous
        } else {
            ResolvedValue::Unavailable
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fact::Fact;
    use crate::schema::line_spec;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn annual(tag: &str, value: f64, fy: i32, filed: (i32, u32, u32)) -> Fact {
        Fact {
            tag: tag.to_string(),
            value,
            unit: "USD".to_string(),
            period: Period::Duration {
                start: date(fy - 1, 10, 1),
                end: date(fy, 9, 28),
            },
            fiscal_year: Some(fy),
            fiscal_period: None,
            form: Some(FormType::Annual),
            filed: Some(date(filed.0, filed.1, filed.2)),
            accession: None,
        }
    }

    #[test]
    fn test_single_fact_resolves_with_its_own_tag() {
        let store = FactStore::index(vec![annual("Revenues", 500_000.0, 2024, (2024, 11, 1))]);
        let resolver = TagResolver::new(&store);
        let spec = line_spec("revenue").unwrap();

        let resolved = resolver.resolve(spec, 2024, FormType::Annual);
        let fact = resolved.fact().expect("should resolve");
        assert_eq!(fact.value, 500_000.0);
        // The second alias matched; the result carries the matched tag,
        // not the first alias in the list.
        assert_eq!(fact.tag, "Revenues");
    }

    #[test]
    fn test_alias_priority_order() {
        let store = FactStore::index(vec![
            annual("Revenues", 400_000.0, 2024, (2024, 11, 1)),
            annual(
                "RevenueFromContractWithCustomerExcludingAssessedTax",
                500_000.0,
                2024,
                (2024, 11, 1),
            ),
        ]);
        let resolver = TagResolver::new(&store);
        let spec = line_spec("revenue").unwrap();

        let resolved = resolver.resolve(spec, 2024, FormType::Annual);
        assert_eq!(resolved.value(), Some(500_000.0));
    }

    #[test]
    fn test_restatement_scenario_picks_later_filing() {
        let store = FactStore::index(vec![
            annual("Revenues", 100_000.0, 2024, (2024, 11, 1)),
            annual("Revenues", 101_000.0, 2024, (2025, 2, 15)),
        ]);
        let resolver = TagResolver::new(&store);
        let spec = line_spec("revenue").unwrap();

        let resolved = resolver.resolve(spec, 2024, FormType::Annual);
        assert_eq!(resolved.value(), Some(101_000.0));
    }

    #[test]
    fn test_comparative_only_series_is_unavailable() {
        // A 10-K re-reports the prior year's revenue under its own
        // fiscal-year label. When that comparative is the tag's only
        // occurrence, the line must come back empty rather than carry a
        // prior-period value for the target year.
        let mut comparative = annual("Revenues", 383_285_000_000.0, 2024, (2024, 11, 1));
        comparative.period = Period::Duration {
            start: date(2022, 9, 25),
            end: date(2023, 9, 30),
        };
        let store = FactStore::index(vec![comparative]);
        let resolver = TagResolver::new(&store);
        let spec = line_spec("revenue").unwrap();

        let resolved = resolver.resolve(spec, 2024, FormType::Annual);
        assert_eq!(resolved, ResolvedValue::Unavailable);
    }

    #[test]
    fn test_no_alias_matches_is_unavailable() {
        let store = FactStore::index(vec![annual("Goodwill", 10.0, 2024, (2024, 11, 1))]);
        let resolver = TagResolver::new(&store);
        let spec = line_spec("revenue").unwrap();

        assert_eq!(
            resolver.resolve(spec, 2024, FormType::Annual),
            ResolvedValue::Unavailable
        );
    }

    #[test]
    fn test_wrong_period_never_returned() {
        let store = FactStore::index(vec![annual("Revenues", 400_000.0, 2023, (2023, 11, 1))]);
        let resolver = TagResolver::new(&store);
        let spec = line_spec("revenue").unwrap();

        assert_eq!(
            resolver.resolve(spec, 2024, FormType::Annual),
            ResolvedValue::Unavailable
        );
    }

    #[test]
    fn test_ambiguity_survives_failed_scan() {
        let store = FactStore::index(vec![
            annual("Revenues", 100_000.0, 2024, (2024, 11, 1)),
            annual("Revenues", 200_000.0, 2024, (2024, 11, 1)),
        ]);
        let resolver = TagResolver::new(&store);
        let spec = line_spec("revenue").unwrap();

        assert_eq!(
            resolver.resolve(spec, 2024, FormType::Annual),
            ResolvedValue::Ambiguous
        );
    }

    #[test]
    fn test_later_alias_beats_earlier_ambiguity() {
        let store = FactStore::index(vec![
            annual(
                "RevenueFromContractWithCustomerExcludingAssessedTax",
                100_000.0,
                2024,
                (2024, 11, 1),
            ),
            annual(
                "RevenueFromContractWithCustomerExcludingAssessedTax",
                200_000.0,
                2024,
                (2024, 11, 1),
            ),
            annual("Revenues", 150_000.0, 2024, (2024, 11, 1)),
        ]);
        let resolver = TagResolver::new(&store);
        let spec = line_spec("revenue").unwrap();

        let resolved = resolver.resolve(spec, 2024, FormType::Annual);
        assert_eq!(resolved.value(), Some(150_000.0));
    }
}
