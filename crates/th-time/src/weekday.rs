//! `Weekday`: day-of-week enum.

/// Day of the week.
///
/// Variants are numbered 1–7 (Monday = 1, Sunday = 7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Weekday {
    /// Monday (1).
    Monday = 1,
    /// Tuesday (2).
    Tuesday = 2,
    /// Wednesday (3).
    Wednesday = 3,
    /// Thursday (4).
    Thursday = 4,
    /// Friday (5).
    Friday = 5,
    /// Saturday (6).
    Saturday = 6,
    /// Sunday (7).
    Sunday = 7,
}

/// Labels used by the `week` field of holiday records, Monday first.
const RECORD_LABELS: [&str; 7] = ["一", "二", "三", "四", "五", "六", "日"];

impl Weekday {
    /// Construct from the ordinal (1 = Monday … 7 = Sunday).
    ///
    /// Returns `None` if the value is out of range.
    pub fn from_ordinal(n: u8) -> Option<Self> {
        match n {
            1 => Some(Weekday::Monday),
            2 => Some(Weekday::Tuesday),
            3 => Some(Weekday::Wednesday),
            4 => Some(Weekday::Thursday),
            5 => Some(Weekday::Friday),
            6 => Some(Weekday::Saturday),
            7 => Some(Weekday::Sunday),
            _ => None,
        }
    }

    /// Return `true` if this is Saturday or Sunday.
    pub fn is_weekend(&self) -> bool {
        matches!(self, Weekday::Saturday | Weekday::Sunday)
    }

    /// Return the ordinal (1 = Monday … 7 = Sunday).
    pub fn ordinal(&self) -> u8 {
        *self as u8
    }

    /// The single-character label stored in a holiday record's `week` field
    /// (`一` for Monday … `日` for Sunday).
    pub fn label(&self) -> &'static str {
        RECORD_LABELS[(self.ordinal() - 1) as usize]
    }

    /// Inverse of [`Weekday::label`].
    pub fn from_label(label: &str) -> Option<Self> {
        RECORD_LABELS
            .iter()
            .position(|l| *l == label)
            .and_then(|i| Self::from_ordinal(i as u8 + 1))
    }

    /// Parse an English weekday name, full or three-letter, ignoring case and
    /// surrounding whitespace.
    pub fn from_english(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "monday" | "mon" => Some(Weekday::Monday),
            "tuesday" | "tue" => Some(Weekday::Tuesday),
            "wednesday" | "wed" => Some(Weekday::Wednesday),
            "thursday" | "thu" => Some(Weekday::Thursday),
            "friday" | "fri" => Some(Weekday::Friday),
            "saturday" | "sat" => Some(Weekday::Saturday),
            "sunday" | "sun" => Some(Weekday::Sunday),
            _ => None,
        }
    }

    /// Days from `self` forward to the next `target`, in `1..=7`.
    ///
    /// Never zero: asking for the same weekday yields a full week.
    pub fn days_until_next(&self, target: Weekday) -> i64 {
        let diff = target.ordinal() as i64 - self.ordinal() as i64;
        if diff <= 0 {
            diff + 7
        } else {
            diff
        }
    }
}

impl std::fmt::Display for Weekday {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        };
        write!(f, "{name}")
    }
}
