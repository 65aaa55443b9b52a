//! Company filing history from the SEC submissions API.
//!
//! The submissions payload stores recent filings as parallel arrays,
//! one entry per filing across all columns. [`CompanyFilings::find`]
//! reassembles the row for the filing that covers a fiscal year.

use crate::error::{DataError, Result};
use chrono::{Datelike, NaiveDate};
use hobart_core::FormType;
use serde::Deserialize;

/// Company filings metadata from SEC submissions API
#[derive(Debug, Clone, Deserialize)]
pub struct CompanyFilings {
    /// CIK number
    pub cik: String,
    /// Company name
    pub name: String,
    /// Filing history container
    pub filings: FilingsContainer,
}

/// Container for filings data
#[derive(Debug, Clone, Deserialize)]
pub struct FilingsContainer {
    /// Recent filings
    pub recent: FilingsRecent,
}

/// Recent filings data, parallel arrays indexed per filing
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilingsRecent {
    /// Accession numbers
    pub accession_number: Vec<String>,
    /// Filing dates
    pub filing_date: Vec<String>,
    /// Report period end dates
    #[serde(default)]
    pub report_date: Vec<String>,
    /// Form types (e.g., "10-K", "10-Q")
    pub form: Vec<String>,
    /// Primary documents
    #[serde(default)]
    pub primary_document: Vec<String>,
}

/// One filing, reassembled from the parallel arrays.
#[derive(Debug, Clone, PartialEq)]
pub struct FilingRef {
    /// Accession number (e.g., "0000320193-23-000077")
    pub accession: String,
    /// SEC form string
    pub form: String,
    /// Date the filing was submitted
    pub filing_date: Option<NaiveDate>,
    /// Period end the filing reports on
    pub report_date: Option<NaiveDate>,
}

impl CompanyFilings {
    /// Find the filing of `form` whose reported period ends in
    /// `fiscal_year`.
    ///
    /// For companies with fiscal years straddling the calendar year the
    /// report date's calendar year is what filenames and fiscal-year
    /// labels key on, so that is what we match.
    pub fn find(&self, form: FormType, fiscal_year: i32) -> Result<FilingRef> {
        let recent = &self.filings.recent;
        for (i, filed_form) in recent.form.iter().enumerate() {
            if FormType::parse(filed_form) != Some(form) {
                continue;
            }
            let report_date = recent
                .report_date
                .get(i)
                .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok());
            if report_date.is_some_and(|d| d.year() == fiscal_year)
                && let Some(accession) = recent.accession_number.get(i)
            {
                return Ok(FilingRef {
                    accession: accession.clone(),
                    form: filed_form.clone(),
                    filing_date: recent
                        .filing_date
                        .get(i)
                        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()),
                    report_date,
                });
            }
        }

        Err(DataError::FilingNotFound(format!(
            "no {form} covering fiscal year {fiscal_year} for {}",
            self.name
        )))
    }
}
