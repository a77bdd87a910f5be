//! # th-time
//!
//! Calendar dates and the date-token resolver.
//!
//! [`Date`] is a plain serial day number with calendar arithmetic.
//! [`DateResolver`] turns user tokens such as `2025-10-10`, `20251010`,
//! `tomorrow`, `next fri` or `3w` into a [`ResolvedDate`] that is guaranteed
//! to fall inside the supported year range.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// `Date` type.
pub mod date;

/// Token grammar, `ResolvedDate`, and range helpers.
pub mod resolver;

/// `TimeUnit`: days, weeks, months.
pub mod time_unit;

/// `Weekday`: day of the week.
pub mod weekday;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use date::Date;
pub use resolver::{days_between, weekday_name, years_spanned, DateResolver, ResolvedDate};
pub use time_unit::TimeUnit;
pub use weekday::Weekday;
