//! Assembles a normalized statement from a resolved fact store.

use crate::error::{CoreError, Result};
use crate::fact::FormType;
use crate::resolve::{ResolvedValue, TagResolver};
use crate::schema::{LineItemSpec, StatementGroup, ValueKind, SCHEMA};
use crate::store::FactStore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Monetary and share-count values are reported in units but presented
/// in thousands. Per-share values stay as reported.
const THOUSANDS: f64 = 1000.0;

/// A normalized financial statement for one fiscal period.
///
/// Every schema line appears in its group's map, resolved or not, so a
/// reload can distinguish "line was unavailable at build time" from
/// "line did not exist yet". Maps are ordered for stable serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    /// Fiscal year the statement covers
    pub fiscal_year: i32,
    /// Annual or quarterly report
    pub form: FormType,
    /// Resolved lines keyed by group, then by line name
    pub groups: BTreeMap<StatementGroup, BTreeMap<String, ResolvedValue>>,
}

impl Statement {
    /// Look up one line by name across all groups.
    pub fn line(&self, name: &str) -> Option<&ResolvedValue> {
        self.groups.values().find_map(|lines| lines.get(name))
    }

    /// Number of lines that carry a value.
    pub fn resolved_count(&self) -> usize {
        self.groups
            .values()
            .flat_map(BTreeMap::values)
            .filter(|v| v.is_resolved())
            .count()
    }

    /// Iterate `(group, line name, value)` in schema group order.
    pub fn lines(&self) -> impl Iterator<Item = (StatementGroup, &str, &ResolvedValue)> {
        self.groups.iter().flat_map(|(&group, lines)| {
            lines
                .iter()
                .map(move |(name, value)| (group, name.as_str(), value))
        })
    }
}

/// Builds statements by resolving the full line-item schema.
#[derive(Debug, Clone, Copy)]
pub struct StatementBuilder<'a> {
    store: &'a FactStore,
}

impl<'a> StatementBuilder<'a> {
    /// Create a builder over `store`.
    pub const fn new(store: &'a FactStore) -> Self {
        Self { store }
    }

    /// Build the statement for one fiscal year and report type.
    ///
    /// Resolves every schema line, applies the sign convention for
    /// negated lines (expenses are reported positive, presented as
    /// negative contributions), and scales values to thousands except
    /// per-share lines. Unavailable lines are kept as such; an error is
    /// returned only when nothing at all resolved, which means the
    /// period is absent from the source entirely.
    pub fn build(&self, fiscal_year: i32, form: FormType) -> Result<Statement> {
        let resolver = TagResolver::new(self.store);
        let mut groups: BTreeMap<StatementGroup, BTreeMap<String, ResolvedValue>> =
            StatementGroup::ALL
                .iter()
                .map(|&g| (g, BTreeMap::new()))
                .collect();

        for spec in SCHEMA {
            let mut resolved = resolver.resolve(spec, fiscal_year, form);
            if let ResolvedValue::Resolved(ref mut fact) = resolved {
                fact.value = normalize(spec, fact.value);
            }
            groups
                .entry(spec.group)
                .or_default()
                .insert(spec.name.to_string(), resolved);
        }

        let statement = Statement {
            fiscal_year,
            form,
            groups,
        };
        if statement.resolved_count() == 0 {
            return Err(CoreError::NoFacts { fiscal_year, form });
        }
        log::info!(
            "built fy{fiscal_year} {form} statement: {} of {} lines resolved",
            statement.resolved_count(),
            SCHEMA.len()
        );
        Ok(statement)
    }
}

/// Sign convention, then presentation scaling.
fn normalize(spec: &LineItemSpec, value: f64) -> f64 {
    let signed = if spec.negated { -value } else { value };
    match spec.kind {
        ValueKind::PerShare => signed,
        ValueKind::DurationFlow | ValueKind::InstantBalance => signed / THOUSANDS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fact::{Fact, Period};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn annual_flow(tag: &str, value: f64) -> Fact {
        Fact {
            tag: tag.to_string(),
            value,
            unit: "USD".to_string(),
            period: Period::Duration {
                start: date(2023, 10, 1),
                end: date(2024, 9, 28),
            },
            fiscal_year: Some(2024),
            fiscal_period: None,
            form: Some(FormType::Annual),
            filed: Some(date(2024, 11, 1)),
            accession: None,
        }
    }

    fn annual_instant(tag: &str, value: f64) -> Fact {
        Fact {
            period: Period::Instant(date(2024, 9, 28)),
            ..annual_flow(tag, value)
        }
    }

    fn per_share(tag: &str, value: f64) -> Fact {
        Fact {
            unit: "USD/shares".to_string(),
            ..annual_flow(tag, value)
        }
    }

    #[test]
    fn test_build_scales_to_thousands() {
        let store = FactStore::index(vec![annual_flow("Revenues", 500_000_000.0)]);
        let statement = StatementBuilder::new(&store)
            .build(2024, FormType::Annual)
            .unwrap();
        assert_eq!(statement.line("revenue").unwrap().value(), Some(500_000.0));
    }

    #[test]
    fn test_build_negates_expense_lines() {
        let store = FactStore::index(vec![
            annual_flow("Revenues", 500_000_000.0),
            annual_flow("CostOfGoodsAndServicesSold", 300_000_000.0),
        ]);
        let statement = StatementBuilder::new(&store)
            .build(2024, FormType::Annual)
            .unwrap();
        assert_eq!(
            statement.line("cost_of_revenue").unwrap().value(),
            Some(-300_000.0)
        );
    }

    #[test]
    fn test_build_leaves_per_share_unscaled() {
        let store = FactStore::index(vec![
            annual_flow("NetIncomeLoss", 90_000_000.0),
            per_share("EarningsPerShareDiluted", 6.13),
        ]);
        let statement = StatementBuilder::new(&store)
            .build(2024, FormType::Annual)
            .unwrap();
        assert_eq!(statement.line("eps_diluted").unwrap().value(), Some(6.13));
    }

    #[test]
    fn test_build_keeps_unavailable_lines() {
        let store = FactStore::index(vec![annual_flow("Revenues", 500_000_000.0)]);
        let statement = StatementBuilder::new(&store)
            .build(2024, FormType::Annual)
            .unwrap();
        assert_eq!(
            statement.line("goodwill"),
            Some(&ResolvedValue::Unavailable)
        );
    }

    #[test]
    fn test_build_fails_on_empty_period() {
        let store = FactStore::index(vec![annual_flow("Revenues", 500_000_000.0)]);
        let err = StatementBuilder::new(&store)
            .build(2019, FormType::Annual)
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::NoFacts {
                fiscal_year: 2019,
                ..
            }
        ));
    }

    #[test]
    fn test_balance_lines_resolve_instants() {
        let store = FactStore::index(vec![
            annual_flow("Revenues", 500_000_000.0),
            annual_instant("Assets", 2_000_000_000.0),
        ]);
        let statement = StatementBuilder::new(&store)
            .build(2024, FormType::Annual)
            .unwrap();
        assert_eq!(
            statement.line("total_assets").unwrap().value(),
            Some(2_000_000.0)
        );
    }

    #[test]
    fn test_build_twice_is_identical() {
        let store = FactStore::index(vec![
            annual_flow("Revenues", 500_000_000.0),
            annual_flow("NetIncomeLoss", 90_000_000.0),
            annual_instant("Assets", 2_000_000_000.0),
            per_share("EarningsPerShareDiluted", 6.13),
        ]);
        let builder = StatementBuilder::new(&store);

        let first = builder.build(2024, FormType::Annual).unwrap();
        let second = builder.build(2024, FormType::Annual).unwrap();

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_statement_json_round_trip() {
        let store = FactStore::index(vec![
            annual_flow("Revenues", 500_000_000.0),
            annual_instant("Assets", 2_000_000_000.0),
        ]);
        let statement = StatementBuilder::new(&store)
            .build(2024, FormType::Annual)
            .unwrap();
        let json = serde_json::to_string(&statement).unwrap();
        let reloaded: Statement = serde_json::from_str(&json).unwrap();
        assert_eq!(reloaded, statement);
    }
}
