//! # th-engine
//!
//! The query layer: resolves date tokens, fans out one fetch per year a
//! range touches, and filters or aggregates the merged records.
//!
//! Every operation returns plain data ([`th_data::HolidayRecord`] lists,
//! [`HolidayStats`], [`WorkdaysStats`], [`HealthReport`]); rendering is the
//! caller's business.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// `HolidayEngine` and its option/result types.
pub mod engine;

/// Health verdict.
pub mod health;

/// Holiday and workday aggregates.
pub mod stats;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use engine::{DateCheck, HolidayEngine, RangeQueryOptions};
pub use health::{CacheHealth, HealthReport, HealthStatus};
pub use stats::{HolidayKind, HolidayStats, WorkdaysStats};
