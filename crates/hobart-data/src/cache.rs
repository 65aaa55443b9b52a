//! SQLite caching layer for EDGAR payloads.
//!
//! The company-facts payload runs to tens of megabytes for large
//! registrants, and batch verification re-reads it once per exported
//! statement. Caching by CIK with a freshness window keeps repeat runs
//! off the network.

use crate::error::Result;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;

/// SQLite cache for EDGAR data.
#[derive(Debug)]
pub struct SqliteCache {
    conn: Connection,
}

impl SqliteCache {
    /// Create a new SQLite cache.
    ///
    /// # Arguments
    /// * `path` - Path to the SQLite database file
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let cache = Self { conn };
        cache.initialize_schema()?;
        Ok(cache)
    }

    /// Create an in-memory cache (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let cache = Self { conn };
        cache.initialize_schema()?;
        Ok(cache)
    }

    /// Initialize the database schema.
    fn initialize_schema(&self) -> Result<()> {
        // Ticker -> CIK mappings
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS company_ciks (
                ticker TEXT PRIMARY KEY,
                cik TEXT NOT NULL,
                company_name TEXT,
                updated_at TEXT NOT NULL
            )",
            [],
        )?;

        // Raw company-facts payloads by CIK
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS company_facts (
                cik TEXT PRIMARY KEY,
                data TEXT NOT NULL,
                cached_at TEXT NOT NULL
            )",
            [],
        )?;

        Ok(())
    }

    /// Get CIK for a ticker.
    pub fn get_cik(&self, ticker: &str) -> Result<Option<String>> {
        let result = self
            .conn
            .query_row(
                "SELECT cik FROM company_ciks WHERE ticker = ?1",
                params![ticker],
                |row| row.get(0),
            )
            .optional()?;

        Ok(result)
    }

    /// Store CIK mapping for a ticker.
    pub fn put_cik(&self, ticker: &str, cik: &str, company_name: Option<&str>) -> Result<()> {
        let updated_at = Utc::now().to_rfc3339();

        self.conn.execute(
            "INSERT OR REPLACE INTO company_ciks (ticker, cik, company_name, updated_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![ticker, cik, company_name, updated_at],
        )?;

        Ok(())
    }

    /// Get cached company facts no older than `max_age_days`.
    pub fn get_company_facts(&self, cik: &str, max_age_days: i64) -> Result<Option<String>> {
        let row: Option<(String, String)> = self
            .conn
            .query_row(
                "SELECT data, cached_at FROM company_facts WHERE cik = ?1",
                params![cik],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let Some((data, cached_at)) = row else {
            return Ok(None);
        };

        let cutoff = Utc::now() - chrono::Duration::days(max_age_days);
        let fresh = DateTime::parse_from_rfc3339(&cached_at)
            .map(|t| t.with_timezone(&Utc) >= cutoff)
            .unwrap_or(false);

        if fresh {
            Ok(Some(data))
        } else {
            log::debug!("company facts for CIK {cik} are stale, refetching");
            Ok(None)
        }
    }

    /// Store the raw company-facts payload for a CIK.
    pub fn put_company_facts(&self, cik: &str, data: &str) -> Result<()> {
        let cached_at = Utc::now().to_rfc3339();

        self.conn.execute(
            "INSERT OR REPLACE INTO company_facts (cik, data, cached_at)
             VALUES (?1, ?2, ?3)",
            params![cik, data, cached_at],
        )?;

        Ok(())
    }

    /// Clear all cached data.
    pub fn clear_all(&self) -> Result<()> {
        self.conn.execute("DELETE FROM company_facts", [])?;
        self.conn.execute("DELETE FROM company_ciks", [])?;
        Ok(())
    }

    /// Clear cached data for a specific CIK.
    pub fn clear_cik(&self, cik: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM company_facts WHERE cik = ?1", params![cik])?;
        self.conn
            .execute("DELETE FROM company_ciks WHERE cik = ?1", params![cik])?;
        Ok(())
    }
}
