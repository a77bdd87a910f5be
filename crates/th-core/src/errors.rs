//! Error types for taiwan-holiday-rs.
//!
//! Every failure in the workspace is one variant of a single
//! `thiserror`-derived enum.  The variant is the failure *kind*; callers that
//! need to branch on the category (the CLI picks an exit code from it) use
//! [`Error::kind`] rather than matching on message text.  The `ensure!` and
//! `fail!` convenience macros are defined here.

use thiserror::Error;

/// The top-level error type used throughout taiwan-holiday-rs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Malformed or out-of-range date token.
    #[error("invalid date: {0}")]
    Parse(String),

    /// Well-formed input that violates a precondition (start after end,
    /// month outside 1–12, …).
    #[error("validation failed: {0}")]
    Validation(String),

    /// The data layer cannot serve the request (unsupported year, bad
    /// payload, non-success HTTP status).
    #[error("data error: {0}")]
    Data(String),

    /// Transport failure with no stale cache entry to fall back on.
    #[error("network error: {0}")]
    Network(String),

    /// Invalid settings key or value.
    #[error("config error: {0}")]
    Config(String),

    /// Anything else (maps to `fail!`).
    #[error("{0}")]
    Runtime(String),
}

/// Failure category of an [`Error`], independent of its message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`Error::Parse`].
    Parse,
    /// See [`Error::Validation`].
    Validation,
    /// See [`Error::Data`].
    Data,
    /// See [`Error::Network`].
    Network,
    /// See [`Error::Config`].
    Config,
    /// See [`Error::Runtime`].
    Runtime,
}

/// Process exit codes, one per failure category.
///
/// Parse errors share the validation code: a bad date token is invalid input
/// just like a bad month number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// Uncategorised failure.
    General = 1,
    /// Invalid input (parse or validation).
    Validation = 2,
    /// Remote endpoint unreachable.
    Network = 3,
    /// Data missing or malformed.
    Data = 4,
    /// Invalid settings.
    Config = 5,
}

impl ExitCode {
    /// Numeric value passed to `std::process::exit`.
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl ErrorKind {
    /// Exit code the CLI uses for this kind.
    pub fn exit_code(self) -> ExitCode {
        match self {
            ErrorKind::Parse | ErrorKind::Validation => ExitCode::Validation,
            ErrorKind::Network => ExitCode::Network,
            ErrorKind::Data => ExitCode::Data,
            ErrorKind::Config => ExitCode::Config,
            ErrorKind::Runtime => ExitCode::General,
        }
    }
}

impl Error {
    /// Return the failure category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Parse(_) => ErrorKind::Parse,
            Error::Validation(_) => ErrorKind::Validation,
            Error::Data(_) => ErrorKind::Data,
            Error::Network(_) => ErrorKind::Network,
            Error::Config(_) => ErrorKind::Config,
            Error::Runtime(_) => ErrorKind::Runtime,
        }
    }

    /// The message without the kind prefix added by `Display`.
    pub fn message(&self) -> &str {
        match self {
            Error::Parse(m)
            | Error::Validation(m)
            | Error::Data(m)
            | Error::Network(m)
            | Error::Config(m)
            | Error::Runtime(m) => m,
        }
    }

    /// Prefix the message with `context`, keeping the kind.
    pub fn with_context(self, context: impl std::fmt::Display) -> Self {
        let wrap = |m: String| format!("{context}: {m}");
        match self {
            Error::Parse(m) => Error::Parse(wrap(m)),
            Error::Validation(m) => Error::Validation(wrap(m)),
            Error::Data(m) => Error::Data(wrap(m)),
            Error::Network(m) => Error::Network(wrap(m)),
            Error::Config(m) => Error::Config(wrap(m)),
            Error::Runtime(m) => Error::Runtime(wrap(m)),
        }
    }

    /// Shorthand for [`ErrorKind::exit_code`] on this error's kind.
    pub fn exit_code(&self) -> ExitCode {
        self.kind().exit_code()
    }
}

/// Shorthand `Result` type used throughout taiwan-holiday-rs.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Return `Err(Error::Validation(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use th_core::{ensure, errors::Error};
/// fn month(m: u8) -> th_core::errors::Result<u8> {
///     ensure!((1..=12).contains(&m), "month {m} out of range [1, 12]");
///     Ok(m)
/// }
/// assert!(month(3).is_ok());
/// assert_eq!(
///     month(13),
///     Err(Error::Validation("month 13 out of range [1, 12]".into()))
/// );
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Validation(
                format!($($msg)*)
            ));
        }
    };
}

/// Return `Err(Error::Runtime(...))` immediately.
///
/// # Example
/// ```
/// use th_core::{fail, errors::Error};
/// fn always_err() -> th_core::errors::Result<()> {
///     fail!("something went wrong");
/// }
/// assert!(always_err().is_err());
/// ```
#[macro_export]
macro_rules! fail {
    ($($msg:tt)*) => {
        return Err($crate::errors::Error::Runtime(format!($($msg)*)))
    };
}
