//! `HolidaySource`: cache-first access to per-year holiday lists.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use th_cache::{year_key, CacheStatus, TtlCache};
use th_core::clock::Clock;
use th_core::constants::{
    YearRange, API_BASE_URL, API_HEALTH_CHECK_TIMEOUT, API_TIMEOUT, CACHE_TTL, SUPPORTED_YEARS,
};
use th_core::errors::{Error, Result};

use crate::fetcher::{HttpFetcher, YearFetcher};
use crate::record::HolidayRecord;

// ── Configuration ─────────────────────────────────────────────────────────────

/// Endpoint, timeouts and cache lifetime for a [`HolidaySource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    /// Base URL of the per-year JSON files.
    pub base_url: String,
    /// Timeout for a data fetch.
    pub timeout: Duration,
    /// Timeout for the health check.
    pub health_timeout: Duration,
    /// Cache TTL.
    pub cache_ttl: Duration,
    /// Years the source will serve.
    pub years: YearRange,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: API_BASE_URL.to_string(),
            timeout: API_TIMEOUT,
            health_timeout: API_HEALTH_CHECK_TIMEOUT,
            cache_ttl: CACHE_TTL,
            years: SUPPORTED_YEARS,
        }
    }
}

impl SourceConfig {
    /// Replace the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Replace both timeouts.
    #[must_use]
    pub fn with_timeouts(mut self, timeout: Duration, health_timeout: Duration) -> Self {
        self.timeout = timeout;
        self.health_timeout = health_timeout;
        self
    }
}

// ── Health ────────────────────────────────────────────────────────────────────

/// Outcome of one health check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the health-check fetch succeeded.
    pub reachable: bool,
    /// Round-trip time of a successful check.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    /// Failure message of an unsuccessful check.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ── Source ────────────────────────────────────────────────────────────────────

/// Per-year holiday lists, served from the cache when possible.
///
/// Stale-on-error is always on: once a year has been fetched, a later failed
/// refresh serves the old list instead of an error.
pub struct HolidaySource {
    fetcher: Arc<dyn YearFetcher>,
    cache: TtlCache<Vec<HolidayRecord>>,
    config: SourceConfig,
    clock: Arc<dyn Clock>,
    bypass: AtomicBool,
}

impl std::fmt::Debug for HolidaySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HolidaySource")
            .field("config", &self.config)
            .field("bypass", &self.bypass_cache())
            .finish_non_exhaustive()
    }
}

impl HolidaySource {
    /// Build a source over an arbitrary transport.
    pub fn new(fetcher: Arc<dyn YearFetcher>, config: SourceConfig, clock: Arc<dyn Clock>) -> Self {
        let cache = TtlCache::new(config.cache_ttl, clock.clone()).with_stale_on_error(true);
        Self {
            fetcher,
            cache,
            config,
            clock,
            bypass: AtomicBool::new(false),
        }
    }

    /// Build a source that fetches over HTTP from `config.base_url`.
    pub fn http(config: SourceConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        let fetcher = HttpFetcher::new(config.base_url.clone())?;
        Ok(Self::new(Arc::new(fetcher), config, clock))
    }

    /// The active configuration.
    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    /// Skip cache reads (writes still happen) while `bypass` is set.
    pub fn set_bypass_cache(&self, bypass: bool) {
        self.bypass.store(bypass, Ordering::Relaxed);
        tracing::info!(bypass, "cache bypass toggled");
    }

    /// Whether cache reads are currently skipped.
    pub fn bypass_cache(&self) -> bool {
        self.bypass.load(Ordering::Relaxed)
    }

    /// The record list for `year`.
    ///
    /// # Errors
    ///
    /// [`Error::Data`] for a year outside the configured range (checked
    /// before any fetch), otherwise whatever the transport reports when no
    /// cached list exists.
    pub async fn fetch_year(&self, year: u16) -> Result<Vec<HolidayRecord>> {
        if !self.config.years.contains(year as i32) {
            return Err(Error::Data(format!(
                "year {year} out of supported range ({})",
                self.config.years
            )));
        }

        let key = year_key(year);
        let context = || format!("cannot load holidays for {year}");

        if self.bypass_cache() {
            let records = self
                .fetcher
                .fetch(year, self.config.timeout)
                .await
                .map_err(|e| e.with_context(context()))?;
            self.cache.set(key, records.clone());
            return Ok(records);
        }

        self.cache
            .get_or_fetch(&key, || self.fetcher.fetch(year, self.config.timeout), None)
            .await
            .map_err(|e| e.with_context(context()))
    }

    /// Check the endpoint for the clock's current year.  Never fails.
    pub async fn check_health(&self) -> ApiHealth {
        let (year, _, _) = self.clock.today();
        let year = u16::try_from(year).unwrap_or(self.config.years.end);
        let started = Instant::now();
        match self.fetcher.fetch(year, self.config.health_timeout).await {
            Ok(_) => ApiHealth {
                reachable: true,
                latency_ms: Some(u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)),
                error: None,
            },
            Err(e) => {
                tracing::debug!(url = %self.fetcher.source_for(year), error = %e, "health check failed");
                ApiHealth {
                    reachable: false,
                    latency_ms: None,
                    error: Some(e.message().to_string()),
                }
            }
        }
    }

    /// Every year in the configured range, ascending.
    pub fn supported_years(&self) -> Vec<u16> {
        self.config.years.years()
    }

    /// Snapshot of the cache.
    pub fn cache_status(&self) -> CacheStatus {
        self.cache.status()
    }

    /// Drop every cached year.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}
