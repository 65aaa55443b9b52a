//! Parsing of the SEC company-facts JSON payload.
//!
//! The SEC provides a company's full XBRL fact set in JSON at:
//! `https://data.sec.gov/api/xbrl/companyfacts/CIK{cik_padded}.json`
//!
//! The payload nests facts by taxonomy, concept, and unit. This module
//! flattens it into [`hobart_core::Fact`] records, which are what the
//! statement engine consumes.

use crate::error::{DataError, Result};
use chrono::NaiveDate;
use hobart_core::{Fact, FiscalPeriod, FormType, Period};
use serde::Deserialize;
use std::collections::HashMap;

/// Taxonomies carrying statement concepts. Everything else (srt, invest,
/// custom extensions) is noise for our schema.
const TAXONOMIES: [&str; 2] = ["us-gaap", "dei"];

/// A company's flattened XBRL fact set.
#[derive(Debug, Clone)]
pub struct CompanyFacts {
    /// CIK, zero-padded to 10 digits
    pub cik: String,
    /// Registrant name as reported
    pub entity_name: String,
    /// Every usable fact across taxonomies
    pub facts: Vec<Fact>,
}

impl CompanyFacts {
    /// Parse the company-facts API payload.
    ///
    /// Parsing is lenient per fact: records with malformed dates or
    /// missing ends are skipped with a debug log rather than failing
    /// the whole document. Real payloads contain tens of thousands of
    /// facts and the occasional bad record, and one typo in a 2009
    /// filing must not block a 2024 statement.
    pub fn parse_json(json: &str) -> Result<Self> {
        let api_response: SecApiResponse = serde_json::from_str(json)
            .map_err(|e| DataError::Parse(format!("Failed to parse SEC JSON: {e}")))?;

        let mut facts = Vec::new();
        let mut skipped = 0usize;

        for taxonomy in TAXONOMIES {
            let Some(taxonomy_facts) = api_response.facts.get(taxonomy) else {
                continue;
            };
            for (concept, concept_data) in &taxonomy_facts.0 {
                for (unit, unit_facts) in &concept_data.units {
                    for record in &unit_facts.0 {
                        match record.to_fact(concept, unit) {
                            Some(fact) => facts.push(fact),
                            None => skipped += 1,
                        }
                    }
                }
            }
        }

        if skipped > 0 {
            log::debug!(
                "{}: skipped {skipped} malformed fact records",
                api_response.entity_name
            );
        }

        Ok(Self {
            cik: format!("{:0>10}", api_response.cik),
            entity_name: api_response.entity_name,
            facts,
        })
    }
}

// SEC API JSON structure
// Based on: https://www.sec.gov/edgar/sec-api-documentation

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SecApiResponse {
    #[serde(deserialize_with = "cik_string")]
    cik: String,
    entity_name: String,
    facts: HashMap<String, TaxonomyFacts>,
}

#[derive(Debug, Deserialize)]
struct TaxonomyFacts(HashMap<String, ConceptData>);

#[derive(Debug, Deserialize)]
struct ConceptData {
    units: HashMap<String, UnitFacts>,
}

#[derive(Debug, Deserialize)]
struct UnitFacts(Vec<FactRecord>);

#[derive(Debug, Deserialize)]
struct FactRecord {
    end: String,
    val: f64,
    #[serde(default)]
    start: Option<String>,
    #[serde(default)]
    accn: Option<String>,
    #[serde(default)]
    fy: Option<i32>,
    #[serde(default)]
    fp: Option<String>,
    #[serde(default)]
    form: Option<String>,
    #[serde(default)]
    filed: Option<String>,
}

impl FactRecord {
    fn to_fact(&self, concept: &str, unit: &str) -> Option<Fact> {
        let end = parse_date(&self.end)?;
        let period = match self.start.as_deref() {
            Some(start) => Period::Duration {
                start: parse_date(start)?,
                end,
            },
            None => Period::Instant(end),
        };

        Some(Fact {
            tag: concept.to_string(),
            value: self.val,
            unit: unit.to_string(),
            period,
            fiscal_year: self.fy,
            fiscal_period: self.fp.as_deref().and_then(FiscalPeriod::parse),
            form: self.form.as_deref().and_then(FormType::parse),
            filed: self.filed.as_deref().and_then(parse_date),
            accession: self.accn.clone(),
        })
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// The API reports the CIK as a bare integer despite it being an
/// identifier; accept either form.
fn cik_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum CikRepr {
        Number(u64),
        Text(String),
    }

    Ok(match CikRepr::deserialize(deserializer)? {
        CikRepr::Number(n) => n.to_string(),
        CikRepr::Text(s) => s,
    })
}
