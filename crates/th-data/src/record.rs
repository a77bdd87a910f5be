//! `HolidayRecord`: one calendar day as published by the upstream dataset.

use serde::{Deserialize, Serialize};
use th_core::constants::{MAKEUP_WORKDAY_MARKER, WEEKEND_LABEL};
use th_time::Weekday;

/// One day's status, deserialized verbatim from the per-year JSON file.
///
/// ```json
/// { "date": "20251010", "week": "五", "isHoliday": true, "description": "國慶日" }
/// ```
///
/// Day types beyond holiday/non-holiday are only expressed through phrases
/// inside `description`; the helpers below match them as substrings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HolidayRecord {
    /// Compact `YYYYMMDD` date.
    pub date: String,
    /// Weekday label, `一` … `日`.
    pub week: String,
    /// Whether the day is off.
    pub is_holiday: bool,
    /// Free-text designation; empty for an undesignated day.
    #[serde(default)]
    pub description: String,
}

impl HolidayRecord {
    /// Convenience constructor, mostly for fixtures.
    pub fn new(
        date: impl Into<String>,
        week: impl Into<String>,
        is_holiday: bool,
        description: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            week: week.into(),
            is_holiday,
            description: description.into(),
        }
    }

    /// Month parsed from characters 5–6 of the compact date.
    pub fn month(&self) -> Option<u8> {
        self.date.get(4..6)?.parse().ok()
    }

    /// `true` if the compact date falls in `month`.
    pub fn in_month(&self, month: u8) -> bool {
        self.month() == Some(month)
    }

    /// Weekday decoded from the `week` label.
    pub fn weekday(&self) -> Option<Weekday> {
        Weekday::from_label(&self.week)
    }

    /// `true` if the description carries the makeup-workday marker.
    pub fn is_makeup_workday(&self) -> bool {
        self.description.contains(MAKEUP_WORKDAY_MARKER)
    }

    /// A Saturday or Sunday with no specific designation.
    pub fn is_ordinary_weekend(&self) -> bool {
        let weekend = self.weekday().is_some_and(|w| w.is_weekend());
        weekend && (self.description.is_empty() || self.description == WEEKEND_LABEL)
    }

    /// The description, or the generic weekend label when it is empty.
    pub fn display_description(&self) -> &str {
        if self.description.is_empty() {
            WEEKEND_LABEL
        } else {
            &self.description
        }
    }
}
