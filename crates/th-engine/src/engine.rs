//! `HolidayEngine`: the query operations behind every command.

use std::sync::Arc;

use futures::future::try_join_all;
use serde::Serialize;
use th_cache::CacheStatus;
use th_core::clock::Clock;
use th_core::constants::{MAKEUP_SEARCH_EXPAND_MONTHS, NEXT_HOLIDAY_HORIZON_DAYS};
use th_core::ensure;
use th_core::errors::Result;
use th_data::{ApiHealth, HolidayRecord, HolidaySource};
use th_time::date::days_in_month;
use th_time::resolver::clock_date;
use th_time::{days_between, years_spanned, Date, DateResolver, ResolvedDate};

use crate::health::HealthReport;
use crate::stats::{HolidayStats, WorkdaysStats};

/// Options for [`HolidayEngine::query_range`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RangeQueryOptions {
    /// Keep only days off.
    pub holidays_only: bool,
}

/// Result of [`HolidayEngine::check_date`].
///
/// `record` is `None` when the dataset has no entry for the date, which is
/// not the same as an entry with `is_holiday == false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateCheck {
    /// The resolved input.
    pub date: ResolvedDate,
    /// The matching record, if the dataset has one.
    pub record: Option<HolidayRecord>,
}

impl DateCheck {
    /// `true` only when a record exists and marks the day off.
    pub fn is_holiday(&self) -> bool {
        self.record.as_ref().is_some_and(|r| r.is_holiday)
    }
}

/// Resolves inputs, fetches the years they touch, and filters or aggregates.
///
/// Holds no state of its own besides handles to the data source and clock.
#[derive(Debug, Clone)]
pub struct HolidayEngine {
    source: Arc<HolidaySource>,
    resolver: DateResolver,
    clock: Arc<dyn Clock>,
}

impl HolidayEngine {
    /// Create an engine over `source`, resolving relative tokens against
    /// `clock`.
    pub fn new(source: Arc<HolidaySource>, clock: Arc<dyn Clock>) -> Self {
        let resolver = DateResolver::new(source.config().years);
        Self {
            source,
            resolver,
            clock,
        }
    }

    /// The resolver used for every token.
    pub fn resolver(&self) -> &DateResolver {
        &self.resolver
    }

    /// Resolve one token against the clock's current date.
    pub fn resolve(&self, token: &str) -> Result<ResolvedDate> {
        let today = clock_date(self.clock.as_ref())?;
        self.resolver.resolve(token, today)
    }

    /// Today's date.
    pub fn today(&self) -> Result<ResolvedDate> {
        self.resolver.today(self.clock.as_ref())
    }

    // ── Single day ────────────────────────────────────────────────────────────

    /// Look up the record for one date.
    pub async fn check_date(&self, token: &str) -> Result<DateCheck> {
        let date = self.resolve(token)?;
        let records = self.source.fetch_year(date.year()).await?;
        let record = records.into_iter().find(|r| r.date == date.compact());
        Ok(DateCheck { date, record })
    }

    // ── Ranges ────────────────────────────────────────────────────────────────

    /// Records between two dates inclusive, sorted by date.
    ///
    /// # Errors
    ///
    /// Validation error if `start` is after `end`; any fetch error from any
    /// spanned year fails the whole query.
    pub async fn query_range(
        &self,
        start: &str,
        end: &str,
        options: RangeQueryOptions,
    ) -> Result<Vec<HolidayRecord>> {
        let (start, end) = self.resolve_range(start, end)?;
        self.records_between(&start, &end, options.holidays_only)
            .await
    }

    /// Workday decomposition of an inclusive date range.
    pub async fn workdays_between(&self, start: &str, end: &str) -> Result<WorkdaysStats> {
        let (start, end) = self.resolve_range(start, end)?;
        let records = self.records_between(&start, &end, false).await?;
        Ok(WorkdaysStats::from_records(
            days_between(&start, &end),
            &records,
        ))
    }

    /// Makeup workdays within one month either side of the range.
    ///
    /// A makeup day offsetting a holiday inside the range often falls just
    /// outside it.  The result is clipped to that widened window: from the
    /// first day of the month before `start` to the last day of the month
    /// after `end`.
    pub async fn related_makeup_days(&self, start: &str, end: &str) -> Result<Vec<HolidayRecord>> {
        let (start, end) = self.resolve_range(start, end)?;
        let expand = MAKEUP_SEARCH_EXPAND_MONTHS as i64;
        let window_start = start.date().start_of_month().add_months(-expand)?.compact();
        let window_end = end
            .date()
            .start_of_month()
            .add_months(expand)?
            .end_of_month()
            .compact();

        let years = self.resolver.years();
        let spanned: Vec<u16> = years_spanned(&start, &end, MAKEUP_SEARCH_EXPAND_MONTHS)
            .into_iter()
            .filter(|y| years.contains(*y as i32))
            .collect();

        let mut found: Vec<HolidayRecord> = self
            .fetch_years(&spanned)
            .await?
            .into_iter()
            .flatten()
            .filter(|r| r.is_makeup_workday())
            .filter(|r| r.date.as_str() >= window_start.as_str() && r.date <= window_end)
            .collect();
        found.sort_by(|a, b| a.date.cmp(&b.date));
        Ok(found)
    }

    /// Up to `count` days off strictly after `from`, within the search
    /// horizon.
    ///
    /// The horizon ends [`NEXT_HOLIDAY_HORIZON_DAYS`] after `from`, or on the
    /// last day of the supported range if that comes first.  Finding fewer
    /// than `count` is not an error.
    pub async fn next_holidays(
        &self,
        from: &str,
        count: usize,
        skip_ordinary_weekends: bool,
    ) -> Result<Vec<HolidayRecord>> {
        let start = self.resolve(from)?;
        let last = Date::from_ymd(self.resolver.years().end as i32, 12, 31)?;
        let horizon = start
            .date()
            .add_days(NEXT_HOLIDAY_HORIZON_DAYS as i64)
            .map_or(last, |d| d.min(last));
        let end = self.resolver.from_parts(
            horizon.year() as i32,
            horizon.month() as u32,
            horizon.day_of_month() as u32,
        )?;

        let records = self.records_between(&start, &end, true).await?;
        Ok(records
            .into_iter()
            .filter(|r| r.date.as_str() > start.compact())
            .filter(|r| !(skip_ordinary_weekends && r.is_ordinary_weekend()))
            .take(count)
            .collect())
    }

    // ── Periods ───────────────────────────────────────────────────────────────

    /// Every record of `year`.
    pub async fn holidays_for_year(&self, year: u16) -> Result<Vec<HolidayRecord>> {
        self.source.fetch_year(year).await
    }

    /// Days off in one month.
    pub async fn holidays_in_month(&self, year: u16, month: u8) -> Result<Vec<HolidayRecord>> {
        check_month(month)?;
        let records = self.source.fetch_year(year).await?;
        Ok(records
            .into_iter()
            .filter(|r| r.is_holiday && r.in_month(month))
            .collect())
    }

    /// Holiday counts for a year, or one month of it.
    pub async fn stats_for_period(&self, year: u16, month: Option<u8>) -> Result<HolidayStats> {
        if let Some(m) = month {
            check_month(m)?;
        }
        let records = self.source.fetch_year(year).await?;
        let scoped: Vec<HolidayRecord> = match month {
            Some(m) => records.into_iter().filter(|r| r.in_month(m)).collect(),
            None => records,
        };
        Ok(HolidayStats::from_records(year, month, &scoped))
    }

    /// Workday decomposition of one calendar month.
    ///
    /// Makeup workdays are reported but not subtracted: they are already
    /// non-holidays.
    pub async fn workdays_for_month(&self, year: u16, month: u8) -> Result<WorkdaysStats> {
        check_month(month)?;
        let records = self.source.fetch_year(year).await?;
        let total = days_in_month(year, month) as i64;
        Ok(WorkdaysStats::from_records(
            total,
            records.iter().filter(|r| r.in_month(month)),
        ))
    }

    // ── Pass-throughs ─────────────────────────────────────────────────────────

    /// Every supported year.
    pub fn supported_years(&self) -> Vec<u16> {
        self.source.supported_years()
    }

    /// Cache snapshot.
    pub fn cache_status(&self) -> CacheStatus {
        self.source.cache_status()
    }

    /// Drop every cached year.
    pub fn clear_cache(&self) {
        self.source.clear_cache();
    }

    /// Toggle cache bypass on the data source.
    pub fn set_bypass_cache(&self, bypass: bool) {
        self.source.set_bypass_cache(bypass);
    }

    /// Check the endpoint.
    pub async fn check_api_health(&self) -> ApiHealth {
        self.source.check_health().await
    }

    /// Check the endpoint and combine the result with the cache state.
    pub async fn health_report(&self) -> HealthReport {
        let cache = self.cache_status();
        let api = self.check_api_health().await;
        HealthReport::assess(&cache, api)
    }

    // ── Internals ─────────────────────────────────────────────────────────────

    fn resolve_range(&self, start: &str, end: &str) -> Result<(ResolvedDate, ResolvedDate)> {
        let start = self.resolve(start)?;
        let end = self.resolve(end)?;
        ensure!(
            start <= end,
            "start date {start} is after end date {end}"
        );
        Ok((start, end))
    }

    async fn fetch_years(&self, years: &[u16]) -> Result<Vec<Vec<HolidayRecord>>> {
        try_join_all(years.iter().map(|y| self.source.fetch_year(*y))).await
    }

    async fn records_between(
        &self,
        start: &ResolvedDate,
        end: &ResolvedDate,
        holidays_only: bool,
    ) -> Result<Vec<HolidayRecord>> {
        let years = years_spanned(start, end, 0);
        let (lo, hi) = (start.compact(), end.compact());
        let mut records: Vec<HolidayRecord> = self
            .fetch_years(&years)
            .await?
            .into_iter()
            .flatten()
            .filter(|r| r.date.as_str() >= lo && r.date.as_str() <= hi)
            .filter(|r| !holidays_only || r.is_holiday)
            .collect();
        records.sort_by(|a, b| a.date.cmp(&b.date));
        Ok(records)
    }
}

fn check_month(month: u8) -> Result<()> {
    ensure!((1..=12).contains(&month), "month {month} out of range [1, 12]");
    Ok(())
}
