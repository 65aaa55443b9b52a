//! SEC EDGAR API client with rate limiting.

use crate::error::{DataError, Result};
use crate::facts::CompanyFacts;
use crate::filings::CompanyFilings;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep};

/// SEC EDGAR API base URL
const EDGAR_BASE_URL: &str = "https://data.sec.gov";

/// Default rate limit: 10 requests per second (SEC requirement)
const DEFAULT_RATE_LIMIT: Duration = Duration::from_millis(100);

/// User agent for SEC EDGAR requests (SEC requires identifying information)
const USER_AGENT: &str = "Hobart-Statements/0.1 (contact@hobartlabs.dev)";

/// Company information from tickers endpoint
/// The SEC returns: {"0": {"cik_str": 320193, "ticker": "AAPL", "title": "Apple Inc."}, ...}
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct CompanyInfo {
    /// CIK as a number (SEC returns this as an integer despite the name)
    cik_str: u64,
    /// Ticker symbol
    ticker: String,
    /// Company name
    title: String,
}

/// Rate limiter to ensure we don't exceed SEC's rate limits
struct RateLimiter {
    last_request: Instant,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval: Duration) -> Self {
        Self {
            last_request: Instant::now() - min_interval,
            min_interval,
        }
    }

    async fn wait(&mut self) {
        let elapsed = self.last_request.elapsed();
        if elapsed < self.min_interval {
            sleep(self.min_interval - elapsed).await;
        }
        self.last_request = Instant::now();
    }
}

/// SEC EDGAR API client with rate limiting
pub struct EdgarClient {
    client: reqwest::Client,
    rate_limiter: Arc<Mutex<RateLimiter>>,
    base_url: String,
}

impl EdgarClient {
    /// Create a new EDGAR client with default settings (10 req/sec)
    pub fn new() -> Result<Self> {
        Self::with_rate_limit(DEFAULT_RATE_LIMIT)
    }

    /// Create a new EDGAR client with custom rate limit
    ///
    /// # Arguments
    /// * `min_interval` - Minimum duration between requests
    pub fn with_rate_limit(min_interval: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(DataError::Network)?;

        Ok(Self {
            client,
            rate_limiter: Arc::new(Mutex::new(RateLimiter::new(min_interval))),
            base_url: EDGAR_BASE_URL.to_string(),
        })
    }

    /// Look up a company's CIK number from its ticker symbol
    ///
    /// # Arguments
    /// * `ticker` - Stock ticker symbol (e.g., "AAPL")
    ///
    /// # Returns
    /// The company's CIK number as a zero-padded 10-digit string
    ///
    /// # Errors
    /// Returns `DataError::CikNotFound` if the ticker is not found
    pub async fn get_company_cik(&self, ticker: &str) -> Result<String> {
        if ticker.is_empty() {
            return Err(DataError::InvalidSymbol("Empty ticker".to_string()));
        }

        let ticker_upper = ticker.to_uppercase();

        self.rate_limiter.lock().await.wait().await;

        // Company tickers JSON is hosted at www.sec.gov, not data.sec.gov
        let url = "https://www.sec.gov/files/company_tickers.json".to_string();
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(DataError::Network)?;

        if !response.status().is_success() {
            return Err(DataError::EdgarApi(format!(
                "Failed to fetch company tickers: HTTP {}",
                response.status()
            )));
        }

        // Parse as a map of index -> CompanyInfo
        let data: HashMap<String, CompanyInfo> = response
            .json()
            .await
            .map_err(|e| DataError::EdgarApi(format!("Failed to parse company tickers: {e}")))?;

        for company in data.values() {
            if company.ticker.to_uppercase() == ticker_upper {
                // CIK should be zero-padded to 10 digits
                return Ok(format!("{:0>10}", company.cik_str));
            }
        }

        Err(DataError::CikNotFound(ticker.to_string()))
    }

    /// Get company filings metadata
    ///
    /// # Arguments
    /// * `cik` - Company's CIK number (can be with or without padding)
    pub async fn get_company_filings(&self, cik: &str) -> Result<CompanyFilings> {
        if cik.is_empty() {
            return Err(DataError::InvalidSymbol("Empty CIK".to_string()));
        }

        let cik_padded = format!("{:0>10}", cik);

        self.rate_limiter.lock().await.wait().await;

        let url = format!("{}/submissions/CIK{}.json", self.base_url, cik_padded);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(DataError::Network)?;

        if !response.status().is_success() {
            return Err(DataError::EdgarApi(format!(
                "Failed to fetch company filings for CIK {}: HTTP {}",
                cik_padded,
                response.status()
            )));
        }

        let filings: CompanyFilings = response
            .json()
            .await
            .map_err(|e| DataError::EdgarApi(format!("Failed to parse company filings: {e}")))?;

        Ok(filings)
    }

    /// Fetch the raw company-facts payload for a CIK
    ///
    /// # Arguments
    /// * `cik` - Company's CIK number (can be with or without padding)
    ///
    /// # Returns
    /// The raw JSON payload. See [`fetch_company_facts`](Self::fetch_company_facts)
    /// for the parsed form.
    pub async fn fetch_company_facts_raw(&self, cik: &str) -> Result<String> {
        if cik.is_empty() {
            return Err(DataError::InvalidSymbol("Empty CIK".to_string()));
        }

        let cik_padded = format!("{:0>10}", cik);

        self.rate_limiter.lock().await.wait().await;

        let url = format!(
            "{}/api/xbrl/companyfacts/CIK{}.json",
            self.base_url, cik_padded
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(DataError::Network)?;

        if !response.status().is_success() {
            return Err(DataError::EdgarApi(format!(
                "Failed to fetch company facts for CIK {}: HTTP {}",
                cik_padded,
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| DataError::EdgarApi(format!("Failed to read company facts: {e}")))?;

        Ok(body)
    }

    /// Fetch and parse the full company fact set for a CIK
    pub async fn fetch_company_facts(&self, cik: &str) -> Result<CompanyFacts> {
        let body = self.fetch_company_facts_raw(cik).await?;
        CompanyFacts::parse_json(&body)
    }
}

impl std::fmt::Debug for EdgarClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EdgarClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rate_limiter_spacing() {
        let mut limiter = RateLimiter::new(Duration::from_millis(50));

        let start = Instant::now();
        limiter.wait().await;
        limiter.wait().await;
        limiter.wait().await;
        let elapsed = start.elapsed();

        // Two intervals between three requests
        assert!(elapsed >= Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_empty_ticker_rejected() {
        let client = EdgarClient::new().unwrap();
        let result = client.get_company_cik("").await;
        assert!(matches!(result, Err(DataError::InvalidSymbol(_))));
    }

    #[tokio::test]
    async fn test_empty_cik_rejected() {
        let client = EdgarClient::new().unwrap();
        assert!(matches!(
            client.get_company_filings("").await,
            Err(DataError::InvalidSymbol(_))
        ));
        assert!(matches!(
            client.fetch_company_facts_raw("").await,
            Err(DataError::InvalidSymbol(_))
        ));
    }

    #[test]
    fn test_custom_rate_limit() {
        let _client = EdgarClient::with_rate_limit(Duration::from_millis(50)).unwrap();
        // Client created successfully with custom rate limit
    }
}
