//! Integration tests for the build -> export -> verify pipeline

use chrono::NaiveDate;
use hobart_core::{
    Fact, FactStore, FormType, Period, Statement, StatementBuilder, Tolerance,
    VerificationStatus, Verifier,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn fact(
    tag: &str,
    value: f64,
    unit: &str,
    period: Period,
    fy: i32,
    filed: NaiveDate,
) -> Fact {
    Fact {
        tag: tag.to_string(),
        value,
        unit: unit.to_string(),
        period,
        fiscal_year: Some(fy),
        fiscal_period: None,
        form: Some(FormType::Annual),
        filed: Some(filed),
        accession: None,
    }
}

/// A plausible FY2024 10-K fact set: income statement flows, balance
/// sheet instants (including the prior-year comparative instant that a
/// real filing always carries), cash flow, and per-share values.
fn fy2024_facts() -> Vec<Fact> {
    let start = date(2023, 10, 1);
    let end = date(2024, 9, 28);
    let filed = date(2024, 11, 1);
    let flow = |tag: &str, value: f64| {
        fact(tag, value, "USD", Period::Duration { start, end }, 2024, filed)
    };
    let instant = |tag: &str, value: f64, on: NaiveDate| {
        fact(tag, value, "USD", Period::Instant(on), 2024, filed)
    };

    vec![
        flow("RevenueFromContractWithCustomerExcludingAssessedTax", 391_035_000_000.0),
        flow("CostOfGoodsAndServicesSold", 210_352_000_000.0),
        flow("GrossProfit", 180_683_000_000.0),
        flow("ResearchAndDevelopmentExpense", 31_370_000_000.0),
        flow("OperatingIncomeLoss", 123_216_000_000.0),
        flow("NetIncomeLoss", 93_736_000_000.0),
        flow("NetCashProvidedByUsedInOperatingActivities", 118_254_000_000.0),
        fact(
            "EarningsPerShareDiluted",
            6.08,
            "USD/shares",
            Period::Duration { start, end },
            2024,
            filed,
        ),
        instant("Assets", 364_980_000_000.0, end),
        instant("Liabilities", 308_030_000_000.0, end),
        instant("StockholdersEquity", 56_950_000_000.0, end),
        // Comparative balances restate the prior year under the same
        // fiscal-year label; they must never win selection.
        instant("Assets", 352_583_000_000.0, date(2023, 9, 30)),
        instant("Liabilities", 290_437_000_000.0, date(2023, 9, 30)),
    ]
}

#[test]
fn test_build_serialize_reload_verify_passes() {
    let store = FactStore::index(fy2024_facts());
    let statement = StatementBuilder::new(&store)
        .build(2024, FormType::Annual)
        .unwrap();

    // Balance lines pick the current-year instant, scaled to thousands.
    assert_eq!(
        statement.line("total_assets").unwrap().value(),
        Some(364_980_000.0)
    );
    assert_eq!(statement.line("eps_diluted").unwrap().value(), Some(6.08));
    assert_eq!(
        statement.line("cost_of_revenue").unwrap().value(),
        Some(-210_352_000.0)
    );

    // Persist and reload, as export/verify does on disk.
    let json = serde_json::to_string_pretty(&statement).unwrap();
    let reloaded: Statement = serde_json::from_str(&json).unwrap();
    assert_eq!(reloaded, statement);

    // Re-deriving from the same source must agree on every line.
    let fresh = FactStore::index(fy2024_facts());
    let result = Verifier::new(Tolerance::default())
        .verify(&reloaded, &fresh)
        .unwrap();
    assert_eq!(result.status, VerificationStatus::Pass);
    assert_eq!(result.mismatched, 0);
    assert_eq!(result.missing_in_source, 0);
}

#[test]
fn test_verify_catches_restatement() {
    let store = FactStore::index(fy2024_facts());
    let statement = StatementBuilder::new(&store)
        .build(2024, FormType::Annual)
        .unwrap();

    // An amended filing restates net income; verification must flag it.
    let mut restated = fy2024_facts();
    restated.push(fact(
        "NetIncomeLoss",
        93_000_000_000.0,
        "USD",
        Period::Duration {
            start: date(2023, 10, 1),
            end: date(2024, 9, 28),
        },
        2024,
        date(2025, 1, 15),
    ));
    let fresh = FactStore::index(restated);

    let result = Verifier::new(Tolerance::default())
        .verify(&statement, &fresh)
        .unwrap();
    assert_eq!(result.status, VerificationStatus::Fail);
    assert!(result
        .checks
        .iter()
        .any(|c| c.name == "net_income" && !matches!(c.status, hobart_core::LineStatus::Match)));
}

#[test]
fn test_quarterly_build_uses_quarter_spans() {
    let start = date(2024, 9, 29);
    let end = date(2024, 12, 28);
    let filed = date(2025, 1, 31);
    let mut facts: Vec<Fact> = vec![
        fact("Revenues", 124_300_000_000.0, "USD", Period::Duration { start, end }, 2025, filed),
        // A trailing-twelve-month duration under the same label must be
        // rejected by the span filter for a quarterly report.
        fact(
            "Revenues",
            400_000_000_000.0,
            "USD",
            Period::Duration {
                start: date(2024, 1, 1),
                end,
            },
            2025,
            filed,
        ),
    ];
    for f in &mut facts {
        f.form = Some(FormType::Quarterly);
    }

    let store = FactStore::index(facts);
    let statement = StatementBuilder::new(&store)
        .build(2025, FormType::Quarterly)
        .unwrap();
    assert_eq!(
        statement.line("revenue").unwrap().value(),
        Some(124_300_000.0)
    );
}
