//! # th-data
//!
//! Holiday records and where they come from.
//!
//! The upstream dataset publishes one JSON array per year.  [`HolidaySource`]
//! loads those arrays through a [`YearFetcher`] and keeps them in a
//! [`th_cache::TtlCache`], serving a stale copy when a refresh fails.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Transport trait and the HTTP implementation.
pub mod fetcher;

/// `HolidayRecord`.
pub mod record;

/// `HolidaySource`, its configuration and health check.
pub mod source;

pub use fetcher::{HttpFetcher, YearFetcher};
pub use record::HolidayRecord;
pub use source::{ApiHealth, HolidaySource, SourceConfig};
