//! Export functionality for normalized statements.
//!
//! JSON exports carry the full statement and are what the verify
//! pipeline reloads; CSV exports flatten each line into one row for
//! spreadsheet use.

use chrono::NaiveDate;
use hobart_core::{ResolvedValue, Statement, schema};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid format error.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }

    /// Parse a format name ("csv", "json", "pretty-json").
    pub fn parse(s: &str) -> Result<Self, ExportError> {
        match s {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "pretty-json" => Ok(Self::PrettyJson),
            other => Err(ExportError::InvalidFormat(other.to_string())),
        }
    }
}

/// A statement bundled with the identity needed to re-derive it.
///
/// The ticker and entity name are not part of the statement itself but
/// verification needs them to fetch fresh source data, so they travel
/// in the export.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatementExport {
    /// Ticker symbol the statement was built for.
    pub ticker: String,

    /// Registrant name as reported.
    pub entity_name: String,

    /// The normalized statement.
    pub statement: Statement,
}

impl StatementExport {
    /// Create a new statement export.
    pub fn new(ticker: impl Into<String>, entity_name: impl Into<String>, statement: Statement) -> Self {
        Self {
            ticker: ticker.into(),
            entity_name: entity_name.into(),
            statement,
        }
    }

    /// Conventional file name: `{TICKER}_{form}_{year}.{ext}`.
    pub fn file_name(&self, format: ExportFormat) -> String {
        format!(
            "{}_{}_{}.{}",
            self.ticker.to_uppercase(),
            self.statement.form,
            self.statement.fiscal_year,
            format.extension()
        )
    }

    /// Convert to a flat structure suitable for CSV export.
    fn to_flat_records(&self) -> Vec<StatementLineFlat> {
        self.statement
            .lines()
            .map(|(group, name, value)| {
                let label = schema::line_spec(name).map_or(name, |spec| spec.label);
                let mut flat = StatementLineFlat {
                    group: group.name().to_string(),
                    line: name.to_string(),
                    label: label.to_string(),
                    status: match value {
                        ResolvedValue::Resolved(_) => "resolved",
                        ResolvedValue::Unavailable => "unavailable",
                        ResolvedValue::Ambiguous => "ambiguous",
                    }
                    .to_string(),
                    value: None,
                    unit: None,
                    tag: None,
                    period_end: None,
                    filed: None,
                };
                if let Some(fact) = value.fact() {
                    flat.value = Some(fact.value);
                    flat.unit = Some(fact.unit.clone());
                    flat.tag = Some(fact.tag.clone());
                    flat.period_end = Some(fact.period.end());
                    flat.filed = fact.filed;
                }
                flat
            })
            .collect()
    }
}

/// Flattened statement line for CSV export.
#[derive(Debug, Serialize, Deserialize)]
struct StatementLineFlat {
    group: String,
    line: String,
    label: String,
    status: String,
    value: Option<f64>,
    unit: Option<String>,
    tag: Option<String>,
    period_end: Option<NaiveDate>,
    filed: Option<NaiveDate>,
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

impl Exporter for StatementExport {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut wtr = csv::Writer::from_writer(vec![]);
                for record in self.to_flat_records() {
                    wtr.serialize(&record)?;
                }
                let data =
                    String::from_utf8(wtr.into_inner().map_err(|e| e.into_error())?).unwrap();
                Ok(data)
            }
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

/// Load a previously exported statement from a JSON file.
pub fn load_statement(path: &Path) -> Result<StatementExport, ExportError> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hobart_core::{Fact, FactStore, FormType, Period, StatementBuilder};

    fn sample_export() -> StatementExport {
        let end = NaiveDate::from_ymd_opt(2024, 9, 28).unwrap();
        let facts = vec![
            Fact {
                tag: "Revenues".to_string(),
                value: 391_035_000_000.0,
                unit: "USD".to_string(),
                period: Period::Duration {
                    start: NaiveDate::from_ymd_opt(2023, 10, 1).unwrap(),
                    end,
                },
                fiscal_year: Some(2024),
                fiscal_period: None,
                form: Some(FormType::Annual),
                filed: NaiveDate::from_ymd_opt(2024, 11, 1),
                accession: None,
            },
            Fact {
                tag: "Assets".to_string(),
                value: 364_980_000_000.0,
                unit: "USD".to_string(),
                period: Period::Instant(end),
                fiscal_year: Some(2024),
                fiscal_period: None,
                form: Some(FormType::Annual),
                filed: NaiveDate::from_ymd_opt(2024, 11, 1),
                accession: None,
            },
        ];
        let store = FactStore::index(facts);
        let statement = StatementBuilder::new(&store)
            .build(2024, FormType::Annual)
            .unwrap();
        StatementExport::new("aapl", "Apple Inc.", statement)
    }

    #[test]
    fn test_file_name_convention() {
        let export = sample_export();
        assert_eq!(export.file_name(ExportFormat::Json), "AAPL_10-K_2024.json");
        assert_eq!(export.file_name(ExportFormat::Csv), "AAPL_10-K_2024.csv");
    }

    #[test]
    fn test_csv_export_rows() {
        let export = sample_export();
        let csv = export.export_to_string(ExportFormat::Csv).unwrap();
        assert!(csv.starts_with("group,line,label,status,value,unit,tag,period_end,filed"));
        let revenue_row = csv
            .lines()
            .find(|l| l.contains(",revenue,"))
            .expect("revenue row");
        assert!(revenue_row.starts_with("Income Statement,revenue,Revenue,resolved,"));
        assert!(revenue_row.contains("USD,Revenues,2024-09-28,2024-11-01"));
        assert!(csv.contains("unavailable"));
    }

    #[test]
    fn test_json_round_trip() {
        let export = sample_export();
        let json = export.export_to_string(ExportFormat::PrettyJson).unwrap();
        let reloaded: StatementExport = serde_json::from_str(&json).unwrap();
        assert_eq!(reloaded, export);
    }

    #[test]
    fn test_export_to_file_and_load() {
        let export = sample_export();
        let path = std::env::temp_dir().join("hobart_test_export.json");

        export.export_to_file(&path, ExportFormat::Json).unwrap();
        let reloaded = load_statement(&path).unwrap();
        assert_eq!(reloaded, export);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_format_parse() {
        assert_eq!(ExportFormat::parse("csv").unwrap(), ExportFormat::Csv);
        assert_eq!(ExportFormat::parse("json").unwrap(), ExportFormat::Json);
        assert_eq!(
            ExportFormat::parse("pretty-json").unwrap(),
            ExportFormat::PrettyJson
        );
        assert!(ExportFormat::parse("xlsx").is_err());
    }
}
