//! Date token resolution.
//!
//! A token is either relative (`today`, `tomorrow`, `yesterday`,
//! `next <weekday>`, `<N>d`, `<N>w`, `<N>m`) or absolute (`YYYYMMDD`,
//! `YYYY-MM-DD`, `YYYY/MM/DD`).  The grammars are tried in that order and the
//! first match wins.  Every resolved date lies inside the resolver's
//! [`YearRange`]; nothing is clamped.
//!
//! "Today" is never read from the system clock here.  Callers pass it in.

use serde::ser::{Serialize, SerializeStruct, Serializer};
use th_core::clock::Clock;
use th_core::constants::YearRange;
use th_core::errors::{Error, Result};

use crate::date::Date;
use crate::time_unit::TimeUnit;
use crate::weekday::Weekday;

// ── ResolvedDate ──────────────────────────────────────────────────────────────

/// A validated calendar date inside the supported year range.
///
/// Ordering is by the compact `YYYYMMDD` string, which is also chronological
/// order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResolvedDate {
    compact: String,
    iso: String,
    date: Date,
}

impl ResolvedDate {
    fn new(date: Date) -> Self {
        Self {
            compact: date.compact(),
            iso: date.iso(),
            date,
        }
    }

    /// Calendar year.
    pub fn year(&self) -> u16 {
        self.date.year()
    }

    /// Month, 1-based.
    pub fn month(&self) -> u8 {
        self.date.month()
    }

    /// Day of month, 1-based.
    pub fn day(&self) -> u8 {
        self.date.day_of_month()
    }

    /// `YYYYMMDD`.
    pub fn compact(&self) -> &str {
        &self.compact
    }

    /// `YYYY-MM-DD`.
    pub fn iso(&self) -> &str {
        &self.iso
    }

    /// The underlying serial date.
    pub fn date(&self) -> Date {
        self.date
    }

    /// Weekday label in the form holiday records use.
    pub fn weekday_label(&self) -> &'static str {
        self.date.weekday().label()
    }
}

impl std::fmt::Display for ResolvedDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.iso)
    }
}

impl Serialize for ResolvedDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("ResolvedDate", 5)?;
        s.serialize_field("year", &self.year())?;
        s.serialize_field("month", &self.month())?;
        s.serialize_field("day", &self.day())?;
        s.serialize_field("compact", &self.compact)?;
        s.serialize_field("iso", &self.iso)?;
        s.end()
    }
}

// ── DateResolver ──────────────────────────────────────────────────────────────

/// Parses date tokens into [`ResolvedDate`]s bounded by a year range.
#[derive(Debug, Clone, Copy)]
pub struct DateResolver {
    years: YearRange,
}

impl DateResolver {
    /// Create a resolver accepting dates in `years`.
    pub fn new(years: YearRange) -> Self {
        Self { years }
    }

    /// The accepted year range.
    pub fn years(&self) -> YearRange {
        self.years
    }

    /// Resolve `token` relative to `today`.
    pub fn resolve(&self, token: &str, today: Date) -> Result<ResolvedDate> {
        if let Some(date) = resolve_relative(token, today)? {
            return self.bounded(date);
        }
        self.resolve_absolute(token)
    }

    /// Build a date from numeric components, validating year, then month,
    /// then day.
    pub fn from_parts(&self, year: i32, month: u32, day: u32) -> Result<ResolvedDate> {
        self.check_year(year)?;
        if !(1..=12).contains(&month) {
            return Err(Error::Parse(format!("month {month} out of range [1, 12]")));
        }
        Date::from_ymd(year, month, day).map(ResolvedDate::new)
    }

    /// Today's date according to `clock`, validated like any other token.
    pub fn today(&self, clock: &dyn Clock) -> Result<ResolvedDate> {
        self.bounded(clock_date(clock)?)
    }

    /// `date` shifted by `n` days.
    pub fn add_days(&self, date: &ResolvedDate, n: i64) -> Result<ResolvedDate> {
        self.bounded(date.date().add_days(n)?)
    }

    /// `date` shifted by `n` calendar months, rolling over short months.
    pub fn add_months(&self, date: &ResolvedDate, n: i64) -> Result<ResolvedDate> {
        self.bounded(date.date().add_months(n)?)
    }

    fn resolve_absolute(&self, token: &str) -> Result<ResolvedDate> {
        let (year, month, day) = split_absolute(token).ok_or_else(|| {
            Error::Parse(format!(
                "invalid format: '{token}', expected YYYY-MM-DD, YYYYMMDD or a relative expression"
            ))
        })?;
        self.from_parts(year, month, day)
    }

    fn check_year(&self, year: i32) -> Result<()> {
        if self.years.contains(year) {
            Ok(())
        } else {
            Err(Error::Parse(format!(
                "year {year} out of supported range ({})",
                self.years
            )))
        }
    }

    fn bounded(&self, date: Date) -> Result<ResolvedDate> {
        self.check_year(date.year() as i32)?;
        Ok(ResolvedDate::new(date))
    }
}

impl Default for DateResolver {
    fn default() -> Self {
        Self::new(th_core::constants::SUPPORTED_YEARS)
    }
}

// ── Free functions ────────────────────────────────────────────────────────────

/// Today's local date according to `clock`, without a year-range check.
pub fn clock_date(clock: &dyn Clock) -> Result<Date> {
    let (y, m, d) = clock.today();
    Date::from_ymd(y, m, d)
}

/// Inclusive day count from `start` to `end` (same day ⇒ 1).
pub fn days_between(start: &ResolvedDate, end: &ResolvedDate) -> i64 {
    (end.date() - start.date()) as i64 + 1
}

/// Sorted distinct years touched by `[start, end]` after widening the window
/// by `expand_months` whole months on each side.
///
/// The widened window runs from the first day of the month `expand_months`
/// before `start` to the last day of the month `expand_months` after `end`.
pub fn years_spanned(start: &ResolvedDate, end: &ResolvedDate, expand_months: u32) -> Vec<u16> {
    let month_index = |d: &ResolvedDate| d.year() as i64 * 12 + d.month() as i64 - 1;
    let first = month_index(start) - expand_months as i64;
    let last = month_index(end) + expand_months as i64;
    if first > last {
        return Vec::new();
    }
    (first.div_euclid(12)..=last.div_euclid(12))
        .map(|y| y as u16)
        .collect()
}

/// Weekday label (`一` … `日`) for a calendar date.
pub fn weekday_name(year: i32, month: u32, day: u32) -> Result<&'static str> {
    Ok(Date::from_ymd(year, month, day)?.weekday().label())
}

// ── Token grammar ─────────────────────────────────────────────────────────────

/// `Ok(None)` when the token is not a relative expression at all.
fn resolve_relative(token: &str, today: Date) -> Result<Option<Date>> {
    let lower = token.trim().to_lowercase();
    let date = match lower.as_str() {
        "today" => today,
        "tomorrow" => today.add_days(1)?,
        "yesterday" => today.add_days(-1)?,
        other => {
            if let Some(name) = other.strip_prefix("next ") {
                return match Weekday::from_english(name) {
                    Some(target) => {
                        let ahead = today.weekday().days_until_next(target);
                        today.add_days(ahead).map(Some)
                    }
                    None => Ok(None),
                };
            }
            match parse_offset(other) {
                Some((n, unit)) => today.advance(n, unit)?,
                None => return Ok(None),
            }
        }
    };
    Ok(Some(date))
}

/// `<digits><d|w|m>`.
fn parse_offset(token: &str) -> Option<(i64, TimeUnit)> {
    let unit = TimeUnit::from_suffix(token.chars().last()?)?;
    let digits = &token[..token.len() - 1];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((digits.parse().ok()?, unit))
}

/// `YYYYMMDD`, or `YYYY` `-`/`/` `M{1,2}` `-`/`/` `D{1,2}`.
fn split_absolute(token: &str) -> Option<(i32, u32, u32)> {
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());

    if token.len() == 8 && all_digits(token) {
        return Some((
            token[0..4].parse().ok()?,
            token[4..6].parse().ok()?,
            token[6..8].parse().ok()?,
        ));
    }

    let parts: Vec<&str> = token.split(['-', '/']).collect();
    match parts.as_slice() {
        [y, m, d]
            if y.len() == 4
                && (1..=2).contains(&m.len())
                && (1..=2).contains(&d.len())
                && all_digits(y)
                && all_digits(m)
                && all_digits(d) =>
        {
            Some((y.parse().ok()?, m.parse().ok()?, d.parse().ok()?))
        }
        _ => None,
    }
}
