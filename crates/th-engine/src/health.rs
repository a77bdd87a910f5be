//! Overall health assessment.

use serde::Serialize;
use th_cache::CacheStatus;
use th_data::ApiHealth;

/// Overall verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// The endpoint answered.
    Healthy,
    /// The endpoint is down but cached data can still be served.
    Degraded,
    /// The endpoint is down and nothing is cached.
    Unhealthy,
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::Degraded => "degraded",
            HealthStatus::Unhealthy => "unhealthy",
        })
    }
}

/// Cache half of the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheHealth {
    /// The in-memory cache is always usable.
    pub available: bool,
    /// Live entries.
    pub item_count: usize,
}

/// What the `health` command reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    /// Overall verdict.
    pub status: HealthStatus,
    /// Cache state.
    pub cache: CacheHealth,
    /// Endpoint check result.
    pub api: ApiHealth,
    /// Library version.
    pub version: String,
}

impl HealthReport {
    /// Combine a cache snapshot and an endpoint check.
    pub fn assess(cache: &CacheStatus, api: ApiHealth) -> Self {
        let status = if api.reachable {
            HealthStatus::Healthy
        } else if cache.item_count > 0 {
            HealthStatus::Degraded
        } else {
            HealthStatus::Unhealthy
        };
        HealthReport {
            status,
            cache: CacheHealth {
                available: true,
                item_count: cache.item_count,
            },
            api,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
