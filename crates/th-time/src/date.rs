//! `Date` type.
//!
//! Dates are a serial number of days since an epoch.  Serial 1 corresponds to
//! January 1, 1900 (a Monday), which makes weekday computation a single
//! modulo.
//!
//! # Serial number convention
//! * Serial 1 = January 1, 1900.
//! * The valid date range is 1900-01-01 to 2199-12-31.
//!
//! The supported-year restriction of the holiday dataset is *not* enforced
//! here; that is the resolver's job.  `Date` only guarantees a real calendar
//! day.

use crate::time_unit::TimeUnit;
use crate::weekday::Weekday;
use th_core::errors::{Error, Result};

/// A calendar date represented as a serial number.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date(i32);

// ── Constants ─────────────────────────────────────────────────────────────────

impl Date {
    /// Minimum valid date: January 1, 1900.
    pub const MIN: Date = Date(1);

    /// Maximum valid date: December 31, 2199.
    pub const MAX: Date = Date(109_573);

    // ── Constructors ─────────────────────────────────────────────────────────

    /// Create a date from year, month (1–12), and day-of-month (1–31).
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self> {
        if !(1900..=2199).contains(&year) {
            return Err(Error::Parse(format!("year {year} out of range [1900, 2199]")));
        }
        if !(1..=12).contains(&month) {
            return Err(Error::Parse(format!("month {month} out of range [1, 12]")));
        }
        let (year, month) = (year as u16, month as u8);
        let days_in = days_in_month(year, month);
        if day == 0 || day > days_in as u32 {
            return Err(Error::Parse(format!(
                "day {day} out of range [1, {days_in}] for {year}-{month:02}"
            )));
        }
        Ok(Date(serial_from_ymd(year, month, day as u8)))
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    /// Return the serial number.
    pub fn serial(&self) -> i32 {
        self.0
    }

    /// Return the year (1900–2199).
    pub fn year(&self) -> u16 {
        ymd_from_serial(self.0).0
    }

    /// Return the month (1–12).
    pub fn month(&self) -> u8 {
        ymd_from_serial(self.0).1
    }

    /// Return the day of the month (1–31).
    pub fn day_of_month(&self) -> u8 {
        ymd_from_serial(self.0).2
    }

    /// Return `(year, month, day)` in one decomposition.
    pub fn ymd(&self) -> (u16, u8, u8) {
        ymd_from_serial(self.0)
    }

    /// Return the weekday.
    pub fn weekday(&self) -> Weekday {
        // Epoch Jan 1, 1900 is a Monday (ordinal 1).
        let w = ((self.0 - 1).rem_euclid(7) + 1) as u8;
        Weekday::from_ordinal(w).unwrap_or(Weekday::Sunday)
    }

    /// Compact `YYYYMMDD` form.
    ///
    /// Lexicographic order of this string equals chronological order for
    /// every valid date, since the year always has four digits.
    pub fn compact(&self) -> String {
        let (y, m, d) = ymd_from_serial(self.0);
        format!("{y:04}{m:02}{d:02}")
    }

    /// ISO `YYYY-MM-DD` form.
    pub fn iso(&self) -> String {
        let (y, m, d) = ymd_from_serial(self.0);
        format!("{y:04}-{m:02}-{d:02}")
    }

    // ── Arithmetic ────────────────────────────────────────────────────────────

    /// Advance by `n` days.  Returns an error if the result is out of range.
    pub fn add_days(self, n: i64) -> Result<Self> {
        match (self.0 as i64).checked_add(n) {
            Some(serial) if serial >= Self::MIN.0 as i64 && serial <= Self::MAX.0 as i64 => {
                Ok(Date(serial as i32))
            }
            _ => Err(self.out_of_range(n, TimeUnit::Days)),
        }
    }

    /// Advance by `n` calendar months.
    ///
    /// The day-of-month is kept and overflows into the following month when
    /// the target month is shorter: Jan 31 + 1 month is Mar 3 (Mar 2 in a
    /// leap year), not Feb 28.
    pub fn add_months(self, n: i64) -> Result<Self> {
        let (y, m, d) = ymd_from_serial(self.0);
        let total = (y as i64 * 12 + (m as i64 - 1))
            .checked_add(n)
            .ok_or_else(|| self.out_of_range(n, TimeUnit::Months))?;
        let new_y = total.div_euclid(12);
        let new_m = (total.rem_euclid(12) + 1) as u8;
        if !(1900..=2199).contains(&new_y) {
            return Err(self.out_of_range(n, TimeUnit::Months));
        }
        let first = Date(serial_from_ymd(new_y as u16, new_m, 1));
        first.add_days(d as i64 - 1)
    }

    /// Advance by a period expressed in the given time unit.
    pub fn advance(self, n: i64, unit: TimeUnit) -> Result<Self> {
        match unit {
            TimeUnit::Days => self.add_days(n),
            TimeUnit::Weeks => n
                .checked_mul(7)
                .ok_or_else(|| self.out_of_range(n, unit))
                .and_then(|days| self.add_days(days)),
            TimeUnit::Months => self.add_months(n),
        }
    }

    fn out_of_range(self, n: i64, unit: TimeUnit) -> Error {
        Error::Parse(format!(
            "date arithmetic: {self:?} + {n} {unit} is out of range"
        ))
    }

    /// Return the first day of the month containing this date.
    pub fn start_of_month(self) -> Self {
        let (y, m, _) = ymd_from_serial(self.0);
        Date(serial_from_ymd(y, m, 1))
    }

    /// Return the last day of the month containing this date.
    pub fn end_of_month(self) -> Self {
        let (y, m, _) = ymd_from_serial(self.0);
        let last = days_in_month(y, m);
        Date(serial_from_ymd(y, m, last))
    }
}

// ── Arithmetic operators ──────────────────────────────────────────────────────

impl std::ops::Sub<Date> for Date {
    type Output = i32;
    fn sub(self, rhs: Date) -> i32 {
        self.0 - rhs.0
    }
}

// ── Display ───────────────────────────────────────────────────────────────────

impl std::fmt::Display for Date {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.iso())
    }
}

impl std::fmt::Debug for Date {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (y, m, d) = ymd_from_serial(self.0);
        write!(f, "Date({y:04}-{m:02}-{d:02})")
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Whether a given year is a leap year.
pub fn is_leap_year(year: u16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in a given month/year.
pub fn days_in_month(year: u16, month: u8) -> u8 {
    debug_assert!((1..=12).contains(&month));
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}

/// Convert (year, month, day) to a serial number.
///
/// Serial 1 = 1900-01-01.
fn serial_from_ymd(year: u16, month: u8, day: u8) -> i32 {
    let y = year as i32;
    let m = month as i32;
    let d = day as i32;

    // Days in years 1900..year
    let mut serial = (y - 1900) * 365;
    // Leap years in [1901, year); 1900 itself is not a leap year
    if y > 1900 {
        serial += (y - 1901) / 4 - (y - 1901) / 100 + (y - 1601) / 400;
    }
    // Days in months 1..m for the current year
    serial += MONTH_OFFSET[m as usize - 1] as i32;
    if m > 2 && is_leap_year(year) {
        serial += 1;
    }
    // Days in the current month
    serial += d;
    serial
}

/// Decompose a serial number into (year, month, day).
fn ymd_from_serial(serial: i32) -> (u16, u8, u8) {
    // Estimate year
    let mut y = (serial / 365 + 1900) as u16;
    // Adjust until serial falls within the year
    loop {
        let start_of_year = serial_from_ymd(y, 1, 1);
        if serial < start_of_year {
            y -= 1;
        } else if serial >= serial_from_ymd(y + 1, 1, 1) {
            y += 1;
        } else {
            break;
        }
    }
    let start_of_year = serial_from_ymd(y, 1, 1);
    let doy = serial - start_of_year + 1; // 1-based
    let mut m = 1u8;
    let mut remaining = doy;
    loop {
        let days = days_in_month(y, m) as i32;
        if remaining <= days {
            break;
        }
        remaining -= days;
        m += 1;
    }
    (y, m, remaining as u8)
}

/// Cumulative day-of-year offset at the start of each month (non-leap).
const MONTH_OFFSET: [u16; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];

// ── Tests ─────────────────────────────────────────────────────────────────────
