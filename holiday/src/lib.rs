//! # holiday
//!
//! Taiwan public-holiday lookup backed by the TaiwanCalendar dataset.
//!
//! This crate is a **façade** that re-exports the workspace crates and hosts
//! the `holiday` command.  Application code should depend on this crate
//! rather than the individual `th-*` crates.
//!
//! ## Quick start
//!
//! ```toml
//! [dependencies]
//! holiday = "0.1"
//! ```
//!
//! ```rust
//! use holiday::core::ManualClock;
//! use holiday::time::DateResolver;
//!
//! let clock = ManualClock::on(2025, 1, 31);
//! let resolver = DateResolver::default();
//! let today = resolver.today(&clock).unwrap();
//! assert_eq!(today.compact(), "20250131");
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Errors, exit codes, constants and the clock.
pub use th_core as core;

/// Dates, weekdays and token resolution.
pub use th_time as time;

/// The TTL cache.
pub use th_cache as cache;

/// Holiday records, transport and the cached source.
pub use th_data as data;

/// Queries, statistics and health.
pub use th_engine as engine;

// ── Command-line front end ────────────────────────────────────────────────────

/// Command dispatch.
pub mod app;

/// Argument grammar.
pub mod cli;

/// Output renderers.
pub mod render;

/// Persistent settings.
pub mod settings;

pub use app::run;
pub use cli::{preprocess_args, Cli, OutputFormat};
pub use settings::SettingsStore;
