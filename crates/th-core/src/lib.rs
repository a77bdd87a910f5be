//! # th-core
//!
//! Core types, constants, and error definitions for taiwan-holiday-rs.
//!
//! This crate provides the foundational building blocks shared across all
//! other crates in the workspace – the error taxonomy and exit codes, the
//! build-time constants (supported years, endpoint, timeouts, description
//! markers), and the injectable [`Clock`].

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Public modules ───────────────────────────────────────────────────────────

/// Injectable wall clock (epoch millis and local calendar date).
pub mod clock;

/// Build-time constants: year range, endpoint, timeouts, markers.
pub mod constants;

/// Error types, exit codes, and the `ensure!` / `fail!` macros.
pub mod errors;

// ── Re-exports for convenience ────────────────────────────────────────────────

pub use clock::{Clock, ManualClock, SystemClock};
pub use constants::{YearRange, SUPPORTED_YEARS};
pub use errors::{Error, ErrorKind, ExitCode, Result};
