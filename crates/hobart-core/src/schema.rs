//! The canonical statement schema.
//!
//! Companies report the same accounting concept under different subsets of
//! the US-GAAP taxonomy: one files "Revenues", another
//! "RevenueFromContractWithCustomerExcludingAssessedTax", and never both.
//! Each [`LineItemSpec`] therefore carries an ordered alias list — most
//! specific and most common tag first, generic fallbacks last. That order
//! is domain knowledge, kept here as declarative configuration rather than
//! branching on company identity anywhere in the resolver.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What kind of value a line item expects.
///
/// Mismatched kinds are never coerced: a balance tagged with an instant
/// date can never satisfy a flow line, and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueKind {
    /// A flow accumulated over a duration (revenue, expenses)
    DurationFlow,
    /// A balance measured at an instant (assets, equity)
    InstantBalance,
    /// A per-share ratio over a duration (EPS)
    PerShare,
}

/// Statement a line item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StatementGroup {
    /// Income statement
    Income,
    /// Balance sheet
    BalanceSheet,
    /// Cash flow statement
    CashFlow,
    /// Segment performance
    Segments,
}

impl StatementGroup {
    /// All groups, in presentation order.
    pub const ALL: [Self; 4] = [
        Self::Income,
        Self::BalanceSheet,
        Self::CashFlow,
        Self::Segments,
    ];

    /// Human-readable statement name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Income => "Income Statement",
            Self::BalanceSheet => "Balance Sheet",
            Self::CashFlow => "Cash Flow",
            Self::Segments => "Segments",
        }
    }
}

impl fmt::Display for StatementGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One canonical statement line and the concept tags that may satisfy it.
///
/// Process-wide configuration: loaded once as a `const` table, never
/// mutated. `negated` marks expenses that companies report as positive
/// values but that contribute negatively to the statement.
#[derive(Debug, Clone, Copy)]
pub struct LineItemSpec {
    /// Canonical line name (e.g. "net_income")
    pub name: &'static str,
    /// Display label
    pub label: &'static str,
    /// Acceptable concept tags, in priority order
    pub aliases: &'static [&'static str],
    /// Expected value kind
    pub kind: ValueKind,
    /// Statement this line belongs to
    pub group: StatementGroup,
    /// Reported positive, contributes negatively
    pub negated: bool,
}

const fn flow(
    name: &'static str,
    label: &'static str,
    aliases: &'static [&'static str],
    group: StatementGroup,
    negated: bool,
) -> LineItemSpec {
    LineItemSpec {
        name,
        label,
        aliases,
        kind: ValueKind::DurationFlow,
        group,
        negated,
    }
}

const fn balance(
    name: &'static str,
    label: &'static str,
    aliases: &'static [&'static str],
    negated: bool,
) -> LineItemSpec {
    LineItemSpec {
        name,
        label,
        aliases,
        kind: ValueKind::InstantBalance,
        group: StatementGroup::BalanceSheet,
        negated,
    }
}

const fn per_share(
    name: &'static str,
    label: &'static str,
    aliases: &'static [&'static str],
) -> LineItemSpec {
    LineItemSpec {
        name,
        label,
        aliases,
        kind: ValueKind::PerShare,
        group: StatementGroup::Income,
        negated: false,
    }
}

/// The canonical statement schema, all four statement groups.
pub const SCHEMA: &[LineItemSpec] = &[
    // ── Income statement ────────────────────────────────────────────
    flow(
        "revenue",
        "Revenue",
        &[
            "RevenueFromContractWithCustomerExcludingAssessedTax",
            "Revenues",
            "SalesRevenueNet",
            "SalesRevenueGoodsNet",
            "RevenueFromContractWithCustomerIncludingAssessedTax",
        ],
        StatementGroup::Income,
        false,
    ),
    flow(
        "cost_of_revenue",
        "Cost of Revenue",
        &[
            "CostOfGoodsAndServicesSold",
            "CostOfRevenue",
            "CostOfGoodsSold",
            "CostOfServices",
        ],
        StatementGroup::Income,
        true,
    ),
    flow(
        "gross_profit",
        "Gross Profit",
        &["GrossProfit"],
        StatementGroup::Income,
        false,
    ),
    flow(
        "research_and_development",
        "Research & Development",
        &[
            "ResearchAndDevelopmentExpense",
            "ResearchAndDevelopmentExpenseExcludingAcquiredInProcessCost",
        ],
        StatementGroup::Income,
        true,
    ),
    flow(
        "selling_general_admin",
        "Selling, General & Administrative",
        &[
            "SellingGeneralAndAdministrativeExpense",
            "SellingAndMarketingExpense",
            "GeneralAndAdministrativeExpense",
        ],
        StatementGroup::Income,
        true,
    ),
    flow(
        "operating_expenses",
        "Operating Expenses",
        &["OperatingExpenses", "CostsAndExpenses"],
        StatementGroup::Income,
        true,
    ),
    flow(
        "operating_income",
        "Operating Income",
        &["OperatingIncomeLoss"],
        StatementGroup::Income,
        false,
    ),
    flow(
        "interest_expense",
        "Interest Expense",
        &["InterestExpense", "InterestExpenseDebt"],
        StatementGroup::Income,
        true,
    ),
    flow(
        "interest_income",
        "Interest Income",
        &[
            "InterestAndDividendIncomeOperating",
            "InvestmentIncomeInterest",
            "InterestIncomeOther",
        ],
        StatementGroup::Income,
        false,
    ),
    flow(
        "other_income_expense",
        "Other Income (Expense)",
        &["OtherNonoperatingIncomeExpense", "NonoperatingIncomeExpense"],
        StatementGroup::Income,
        false,
    ),
    flow(
        "income_before_tax",
        "Income Before Tax",
        &[
            "IncomeLossFromContinuingOperationsBeforeIncomeTaxesExtraordinaryItemsNoncontrollingInterest",
            "IncomeLossFromContinuingOperationsBeforeIncomeTaxesMinorityInterestAndIncomeLossFromEquityMethodInvestments",
        ],
        StatementGroup::Income,
        false,
    ),
    flow(
        "income_tax_expense",
        "Income Tax Expense",
        &["IncomeTaxExpenseBenefit"],
        StatementGroup::Income,
        true,
    ),
    flow(
        "net_income",
        "Net Income",
        &[
            "NetIncomeLoss",
            "ProfitLoss",
            "NetIncomeLossAvailableToCommonStockholdersBasic",
        ],
        StatementGroup::Income,
        false,
    ),
    per_share("eps_basic", "EPS (Basic)", &["EarningsPerShareBasic"]),
    per_share("eps_diluted", "EPS (Diluted)", &["EarningsPerShareDiluted"]),
    flow(
        "shares_basic",
        "Shares Outstanding (Basic)",
        &["WeightedAverageNumberOfSharesOutstandingBasic"],
        StatementGroup::Income,
        false,
    ),
    flow(
        "shares_diluted",
        "Shares Outstanding (Diluted)",
        &["WeightedAverageNumberOfDilutedSharesOutstanding"],
        StatementGroup::Income,
        false,
    ),
    // ── Balance sheet ───────────────────────────────────────────────
    balance(
        "cash_and_equivalents",
        "Cash & Cash Equivalents",
        &[
            "CashAndCashEquivalentsAtCarryingValue",
            "Cash",
            "CashCashEquivalentsRestrictedCashAndRestrictedCashEquivalents",
        ],
        false,
    ),
    balance(
        "short_term_investments",
        "Short-Term Investments",
        &[
            "ShortTermInvestments",
            "MarketableSecuritiesCurrent",
            "AvailableForSaleSecuritiesDebtSecuritiesCurrent",
        ],
        false,
    ),
    balance(
        "accounts_receivable",
        "Accounts Receivable",
        &["AccountsReceivableNetCurrent", "ReceivablesNetCurrent"],
        false,
    ),
    balance(
        "inventory",
        "Inventory",
        &["InventoryNet", "InventoryFinishedGoodsAndWorkInProcess"],
        false,
    ),
    balance(
        "prepaid_expenses",
        "Prepaid Expenses",
        &["PrepaidExpenseAndOtherAssetsCurrent", "PrepaidExpenseCurrent"],
        false,
    ),
    balance(
        "total_current_assets",
        "Total Current Assets",
        &["AssetsCurrent"],
        false,
    ),
    balance(
        "property_plant_equipment",
        "Property, Plant & Equipment",
        &["PropertyPlantAndEquipmentNet"],
        false,
    ),
    balance("goodwill", "Goodwill", &["Goodwill"], false),
    balance(
        "intangible_assets",
        "Intangible Assets",
        &[
            "IntangibleAssetsNetExcludingGoodwill",
            "FiniteLivedIntangibleAssetsNet",
        ],
        false,
    ),
    balance(
        "long_term_investments",
        "Long-Term Investments",
        &["LongTermInvestments", "MarketableSecuritiesNoncurrent"],
        false,
    ),
    balance("other_assets", "Other Assets", &["OtherAssetsNoncurrent"], false),
    balance("total_assets", "Total Assets", &["Assets"], false),
    balance(
        "accounts_payable",
        "Accounts Payable",
        &["AccountsPayableCurrent"],
        false,
    ),
    balance(
        "accrued_liabilities",
        "Accrued Liabilities",
        &[
            "AccruedLiabilitiesCurrent",
            "EmployeeRelatedLiabilitiesCurrent",
        ],
        false,
    ),
    balance(
        "deferred_revenue_current",
        "Deferred Revenue (Current)",
        &[
            "DeferredRevenueCurrent",
            "ContractWithCustomerLiabilityCurrent",
        ],
        false,
    ),
    balance(
        "short_term_debt",
        "Short-Term Debt",
        &["ShortTermBorrowings", "DebtCurrent"],
        false,
    ),
    balance(
        "current_portion_long_term_debt",
        "Current Portion of Long-Term Debt",
        &["LongTermDebtCurrent"],
        false,
    ),
    balance(
        "total_current_liabilities",
        "Total Current Liabilities",
        &["LiabilitiesCurrent"],
        false,
    ),
    balance(
        "long_term_debt",
        "Long-Term Debt",
        &["LongTermDebtNoncurrent", "LongTermDebt"],
        false,
    ),
    balance(
        "deferred_tax_liabilities",
        "Deferred Tax Liabilities",
        &["DeferredIncomeTaxLiabilitiesNet"],
        false,
    ),
    balance(
        "other_liabilities",
        "Other Liabilities",
        &["OtherLiabilitiesNoncurrent"],
        false,
    ),
    balance("total_liabilities", "Total Liabilities", &["Liabilities"], false),
    balance(
        "common_stock",
        "Common Stock",
        &[
            "CommonStockValue",
            "CommonStocksIncludingAdditionalPaidInCapital",
        ],
        false,
    ),
    balance(
        "additional_paid_in_capital",
        "Additional Paid-In Capital",
        &[
            "AdditionalPaidInCapitalCommonStock",
            "AdditionalPaidInCapital",
        ],
        false,
    ),
    balance(
        "retained_earnings",
        "Retained Earnings",
        &["RetainedEarningsAccumulatedDeficit"],
        false,
    ),
    balance(
        "accumulated_other_comprehensive_income",
        "Accumulated Other Comprehensive Income",
        &["AccumulatedOtherComprehensiveIncomeLossNetOfTax"],
        false,
    ),
    balance("treasury_stock", "Treasury Stock", &["TreasuryStockValue"], true),
    balance(
        "total_stockholders_equity",
        "Total Stockholders' Equity",
        &[
            "StockholdersEquity",
            "StockholdersEquityIncludingPortionAttributableToNoncontrollingInterest",
        ],
        false,
    ),
    balance(
        "total_liabilities_and_equity",
        "Total Liabilities & Equity",
        &["LiabilitiesAndStockholdersEquity"],
        false,
    ),
    // ── Cash flow statement ─────────────────────────────────────────
    flow(
        "net_income_cf",
        "Net Income",
        &["NetIncomeLoss", "ProfitLoss"],
        StatementGroup::CashFlow,
        false,
    ),
    flow(
        "depreciation_amortization",
        "Depreciation & Amortization",
        &[
            "DepreciationDepletionAndAmortization",
            "DepreciationAndAmortization",
        ],
        StatementGroup::CashFlow,
        false,
    ),
    flow(
        "stock_based_compensation",
        "Stock-Based Compensation",
        &[
            "ShareBasedCompensation",
            "AllocatedShareBasedCompensationExpense",
        ],
        StatementGroup::CashFlow,
        false,
    ),
    flow(
        "deferred_income_taxes",
        "Deferred Income Taxes",
        &["DeferredIncomeTaxExpenseBenefit"],
        StatementGroup::CashFlow,
        false,
    ),
    flow(
        "change_in_receivables",
        "Change in Receivables",
        &["IncreaseDecreaseInAccountsReceivable"],
        StatementGroup::CashFlow,
        false,
    ),
    flow(
        "change_in_inventory",
        "Change in Inventory",
        &["IncreaseDecreaseInInventories"],
        StatementGroup::CashFlow,
        false,
    ),
    flow(
        "change_in_payables",
        "Change in Payables",
        &["IncreaseDecreaseInAccountsPayable"],
        StatementGroup::CashFlow,
        false,
    ),
    flow(
        "other_operating_activities",
        "Other Operating Activities",
        &["OtherOperatingActivitiesCashFlowStatement"],
        StatementGroup::CashFlow,
        false,
    ),
    flow(
        "net_cash_from_operating",
        "Net Cash from Operating Activities",
        &["NetCashProvidedByUsedInOperatingActivities"],
        StatementGroup::CashFlow,
        false,
    ),
    flow(
        "capital_expenditures",
        "Capital Expenditures",
        &[
            "PaymentsToAcquirePropertyPlantAndEquipment",
            "PaymentsToAcquireProductiveAssets",
        ],
        StatementGroup::CashFlow,
        true,
    ),
    flow(
        "acquisitions",
        "Acquisitions",
        &["PaymentsToAcquireBusinessesNetOfCashAcquired"],
        StatementGroup::CashFlow,
        true,
    ),
    flow(
        "purchases_of_investments",
        "Purchases of Investments",
        &[
            "PaymentsToAcquireInvestments",
            "PaymentsToAcquireAvailableForSaleSecuritiesDebt",
        ],
        StatementGroup::CashFlow,
        true,
    ),
    flow(
        "sales_of_investments",
        "Sales of Investments",
        &[
            "ProceedsFromSaleOfAvailableForSaleSecuritiesDebt",
            "ProceedsFromSaleAndMaturityOfMarketableSecurities",
        ],
        StatementGroup::CashFlow,
        false,
    ),
    flow(
        "net_cash_from_investing",
        "Net Cash from Investing Activities",
        &["NetCashProvidedByUsedInInvestingActivities"],
        StatementGroup::CashFlow,
        false,
    ),
    flow(
        "debt_repayment",
        "Debt Repayment",
        &["RepaymentsOfLongTermDebt", "RepaymentsOfDebt"],
        StatementGroup::CashFlow,
        true,
    ),
    flow(
        "debt_issuance",
        "Debt Issuance",
        &[
            "ProceedsFromIssuanceOfLongTermDebt",
            "ProceedsFromDebtNetOfIssuanceCosts",
        ],
        StatementGroup::CashFlow,
        false,
    ),
    flow(
        "share_repurchases",
        "Share Repurchases",
        &["PaymentsForRepurchaseOfCommonStock"],
        StatementGroup::CashFlow,
        true,
    ),
    flow(
        "dividends_paid",
        "Dividends Paid",
        &["PaymentsOfDividendsCommonStock", "PaymentsOfDividends"],
        StatementGroup::CashFlow,
        true,
    ),
    flow(
        "stock_issuance",
        "Stock Issuance",
        &[
            "ProceedsFromIssuanceOfCommonStock",
            "ProceedsFromStockOptionsExercised",
        ],
        StatementGroup::CashFlow,
        false,
    ),
    flow(
        "net_cash_from_financing",
        "Net Cash from Financing Activities",
        &["NetCashProvidedByUsedInFinancingActivities"],
        StatementGroup::CashFlow,
        false,
    ),
    flow(
        "effect_of_exchange_rate",
        "Effect of Exchange Rate",
        &[
            "EffectOfExchangeRateOnCashCashEquivalentsRestrictedCashAndRestrictedCashEquivalents",
            "EffectOfExchangeRateOnCashAndCashEquivalents",
        ],
        StatementGroup::CashFlow,
        false,
    ),
    flow(
        "net_change_in_cash",
        "Net Change in Cash",
        &[
            "CashCashEquivalentsRestrictedCashAndRestrictedCashEquivalentsPeriodIncreaseDecreaseIncludingExchangeRateEffect",
            "CashAndCashEquivalentsPeriodIncreaseDecrease",
        ],
        StatementGroup::CashFlow,
        false,
    ),
    // ── Segments ────────────────────────────────────────────────────
    // The company-facts API carries no dimensional data, so segment lines
    // fall back to the consolidated metric tags when present and resolve
    // unavailable otherwise.
    flow(
        "segment_revenue",
        "Segment Revenue",
        &[
            "RevenueFromContractWithCustomerExcludingAssessedTax",
            "Revenues",
            "SalesRevenueNet",
        ],
        StatementGroup::Segments,
        false,
    ),
    flow(
        "segment_operating_income",
        "Segment Operating Income",
        &["OperatingIncomeLoss", "GrossProfit"],
        StatementGroup::Segments,
        false,
    ),
    LineItemSpec {
        name: "segment_assets",
        label: "Segment Assets",
        aliases: &["Assets", "NoncurrentAssets"],
        kind: ValueKind::InstantBalance,
        group: StatementGroup::Segments,
        negated: false,
    },
];

/// Look up a schema entry by canonical line name.
pub fn line_spec(name: &str) -> Option<&'static LineItemSpec> {
    SCHEMA.iter().find(|spec| spec.name == name)
}

/// All schema entries belonging to a statement group, in schema order.
pub fn group_specs(group: StatementGroup) -> impl Iterator<Item = &'static LineItemSpec> {
    SCHEMA.iter().filter(move |spec| spec.group == group)
}
