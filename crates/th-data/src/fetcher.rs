//! Transport for per-year holiday files.
//!
//! [`YearFetcher`] is the seam between the data source and the network.
//! [`HttpFetcher`] is the production implementation; tests plug in stubs.

use std::time::Duration;

use async_trait::async_trait;
use th_core::errors::{Error, Result};

use crate::record::HolidayRecord;

/// Fetches one year's record list.
#[async_trait]
pub trait YearFetcher: Send + Sync {
    /// Fetch the records for `year`, giving up after `timeout`.
    async fn fetch(&self, year: u16, timeout: Duration) -> Result<Vec<HolidayRecord>>;

    /// Where the records for `year` come from, for log and error messages.
    fn source_for(&self, year: u16) -> String;
}

/// `GET {base_url}/{year}.json`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl HttpFetcher {
    /// Build a fetcher against `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("taiwan-holiday-rs/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Config(format!("cannot build HTTP client: {e}")))?;
        Ok(Self::with_client(client, base_url))
    }

    /// Use an existing client.
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }
}

#[async_trait]
impl YearFetcher for HttpFetcher {
    async fn fetch(&self, year: u16, timeout: Duration) -> Result<Vec<HolidayRecord>> {
        let url = self.source_for(year);
        tracing::debug!(%url, ?timeout, "fetching holiday data");

        let response = self
            .client
            .get(&url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| transport_error(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Data(format!("GET {url} returned HTTP {status}")));
        }

        response
            .json::<Vec<HolidayRecord>>()
            .await
            .map_err(|e| body_error(&url, e))
    }

    fn source_for(&self, year: u16) -> String {
        format!("{}/{year}.json", self.base_url)
    }
}

/// Timeouts and connection failures are network errors.
fn transport_error(url: &str, err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::Network(format!("GET {url} timed out"))
    } else {
        Error::Network(format!("GET {url} failed: {err}"))
    }
}

/// A body that arrives but will not decode is a data error, unless reading it
/// timed out.
fn body_error(url: &str, err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::Network(format!("GET {url} timed out while reading the body"))
    } else {
        Error::Data(format!("malformed holiday data from {url}: {err}"))
    }
}
