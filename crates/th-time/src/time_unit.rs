//! `TimeUnit`: units of calendar offsets.

/// A calendar unit used by relative date expressions (`3d`, `2w`, `1m`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    /// Calendar days.
    Days,
    /// Calendar weeks (7 days).
    Weeks,
    /// Calendar months, with day-of-month roll-over.
    Months,
}

impl TimeUnit {
    /// Map the suffix of a relative offset token to its unit.
    pub fn from_suffix(c: char) -> Option<Self> {
        match c {
            'd' => Some(TimeUnit::Days),
            'w' => Some(TimeUnit::Weeks),
            'm' => Some(TimeUnit::Months),
            _ => None,
        }
    }
}

impl std::fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeUnit::Days => f.write_str("days"),
            TimeUnit::Weeks => f.write_str("weeks"),
            TimeUnit::Months => f.write_str("months"),
        }
    }
}
