//! Aggregates computed from record lists.
//!
//! Nothing here is cached; every query recomputes from the year lists.

use std::collections::BTreeMap;

use serde::Serialize;
use th_core::constants::{
    ADJUSTED_LABEL, ADJUSTED_MARKER, COMPENSATORY_LABEL, COMPENSATORY_MARKER,
    MAKEUP_WORKDAY_LABEL, NATIONAL_HOLIDAY_LABEL,
};
use th_data::HolidayRecord;

/// Which bucket a day off falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HolidayKind {
    /// Neither compensatory nor adjusted (includes plain weekends).
    National,
    /// A compensatory day off.
    Compensatory,
    /// An adjusted (bridged) day off.
    Adjusted,
}

impl HolidayKind {
    /// Classify by description.  The compensatory marker is tested before the
    /// adjusted marker.
    pub fn classify(description: &str) -> Self {
        if description.contains(COMPENSATORY_MARKER) {
            HolidayKind::Compensatory
        } else if description.contains(ADJUSTED_MARKER) {
            HolidayKind::Adjusted
        } else {
            HolidayKind::National
        }
    }

    /// Histogram label.
    pub fn label(self) -> &'static str {
        match self {
            HolidayKind::National => NATIONAL_HOLIDAY_LABEL,
            HolidayKind::Compensatory => COMPENSATORY_LABEL,
            HolidayKind::Adjusted => ADJUSTED_LABEL,
        }
    }
}

/// Holiday counts for a year or one month of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HolidayStats {
    /// Year.
    pub year: u16,
    /// Month, when the period is a single month.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<u8>,
    /// Days off.
    pub total_holidays: usize,
    /// Days off that are neither compensatory nor adjusted.
    pub national_holidays: usize,
    /// Compensatory days off.
    pub compensatory_days: usize,
    /// Adjusted days off.
    pub adjusted_holidays: usize,
    /// Working days carrying the makeup marker.
    #[serde(rename = "workingDays")]
    pub makeup_workdays: usize,
    /// Counts per category label and per literal description.
    pub holiday_types: BTreeMap<String, usize>,
}

impl HolidayStats {
    /// Tally `records`, which the caller has already narrowed to the period.
    ///
    /// Each day off bumps one category counter plus its category label in
    /// the histogram, and its literal description too when that is
    /// non-empty.  A working day with the makeup marker bumps only the
    /// makeup counter and label.
    pub fn from_records(year: u16, month: Option<u8>, records: &[HolidayRecord]) -> Self {
        let mut stats = HolidayStats {
            year,
            month,
            total_holidays: 0,
            national_holidays: 0,
            compensatory_days: 0,
            adjusted_holidays: 0,
            makeup_workdays: 0,
            holiday_types: BTreeMap::new(),
        };

        for r in records {
            if r.is_holiday {
                stats.total_holidays += 1;
                let kind = HolidayKind::classify(&r.description);
                match kind {
                    HolidayKind::Compensatory => stats.compensatory_days += 1,
                    HolidayKind::Adjusted => stats.adjusted_holidays += 1,
                    HolidayKind::National => stats.national_holidays += 1,
                }
                stats.bump(kind.label());
                if !r.description.is_empty() {
                    stats.bump(&r.description);
                }
            } else if r.is_makeup_workday() {
                stats.makeup_workdays += 1;
                stats.bump(MAKEUP_WORKDAY_LABEL);
            }
        }
        stats
    }

    fn bump(&mut self, key: &str) {
        *self.holiday_types.entry(key.to_string()).or_default() += 1;
    }
}

/// Workday decomposition of a span of days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkdaysStats {
    /// Calendar days in the span.
    pub total_days: i64,
    /// `total_days - holidays`.
    pub workdays: i64,
    /// Days off.
    pub holidays: i64,
    /// Days carrying the makeup marker; already counted as workdays.
    pub makeup_workdays: i64,
}

impl WorkdaysStats {
    /// Count over `records`, which cover (part of) a span of `total_days`.
    pub fn from_records<'a>(
        total_days: i64,
        records: impl IntoIterator<Item = &'a HolidayRecord>,
    ) -> Self {
        let (mut holidays, mut makeup_workdays) = (0, 0);
        for r in records {
            if r.is_holiday {
                holidays += 1;
            }
            if r.is_makeup_workday() {
                makeup_workdays += 1;
            }
        }
        WorkdaysStats {
            total_days,
            workdays: total_days - holidays,
            holidays,
            makeup_workdays,
        }
    }
}
