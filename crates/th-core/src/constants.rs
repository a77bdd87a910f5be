//! Build-time constants.
//!
//! None of these are user-editable at runtime; the CLI may override the
//! endpoint base URL only.

use std::time::Duration;

/// Inclusive span of calendar years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct YearRange {
    /// First supported year.
    pub start: u16,
    /// Last supported year (inclusive).
    pub end: u16,
}

impl YearRange {
    /// Return `true` if `year` lies within `[start, end]`.
    pub fn contains(&self, year: i32) -> bool {
        (self.start as i32..=self.end as i32).contains(&year)
    }

    /// Every year in the range, ascending.
    pub fn years(&self) -> Vec<u16> {
        (self.start..=self.end).collect()
    }
}

impl std::fmt::Display for YearRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Years for which the remote dataset is assumed to exist.
pub const SUPPORTED_YEARS: YearRange = YearRange {
    start: 2017,
    end: 2026,
};

// ── Remote endpoint ───────────────────────────────────────────────────────────

/// Base URL of the per-year JSON files (`{base}/{year}.json`).
pub const API_BASE_URL: &str = "https://cdn.jsdelivr.net/gh/ruyut/TaiwanCalendar/data";

/// Timeout for a data fetch.
pub const API_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for the health check.
pub const API_HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

// ── Cache ─────────────────────────────────────────────────────────────────────

/// Lifetime of a cached year list.
pub const CACHE_TTL: Duration = Duration::from_secs(60 * 60);

/// Prefix of per-year cache keys (`holidays_2025`).
pub const CACHE_KEY_PREFIX: &str = "holidays_";

// ── Queries ───────────────────────────────────────────────────────────────────

/// How far ahead the next-holiday search looks.
pub const NEXT_HOLIDAY_HORIZON_DAYS: i32 = 90;

/// Months added on each side of a range when searching for makeup workdays.
pub const MAKEUP_SEARCH_EXPAND_MONTHS: u32 = 1;

// ── Description markers ───────────────────────────────────────────────────────
//
// The upstream dataset tags day types only through phrases inside the free-text
// `description` field.  These are matched as substrings, in the order the
// classifiers document.

/// Marks a makeup workday (`補行上班日`).
pub const MAKEUP_WORKDAY_MARKER: &str = "補行上班";

/// Marks a compensatory day off.
pub const COMPENSATORY_MARKER: &str = "補假";

/// Marks an adjusted (bridged) day off.
pub const ADJUSTED_MARKER: &str = "調整放假";

/// Generic label some records use for a plain weekend.
pub const WEEKEND_LABEL: &str = "週末";

/// Histogram label for holidays that are neither compensatory nor adjusted.
pub const NATIONAL_HOLIDAY_LABEL: &str = "國定假日";

/// Histogram label for compensatory days off.
pub const COMPENSATORY_LABEL: &str = "補假";

/// Histogram label for adjusted days off.
pub const ADJUSTED_LABEL: &str = "調整放假";

/// Histogram label for makeup workdays.
pub const MAKEUP_WORKDAY_LABEL: &str = "補行上班";
