//! Wall-clock access.
//!
//! Two things in the workspace read the clock: the cache (entry age, in epoch
//! milliseconds) and the date resolver (today's local calendar date for
//! relative tokens).  Both receive a [`Clock`] explicitly instead of calling
//! the system clock, so tests can pin time with a [`ManualClock`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{Datelike, Local, Utc};

/// Source of "now".
pub trait Clock: std::fmt::Debug + Send + Sync {
    /// Milliseconds since the Unix epoch.
    fn now_millis(&self) -> u64;

    /// Today's local calendar date as `(year, month, day)`.
    fn today(&self) -> (i32, u32, u32);
}

/// The process clock: UTC millis and the local-timezone date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Shared handle, ready to pass to constructors.
    pub fn shared() -> Arc<dyn Clock> {
        Arc::new(SystemClock)
    }
}

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0)
    }

    fn today(&self) -> (i32, u32, u32) {
        let d = Local::now().date_naive();
        (d.year(), d.month(), d.day())
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    millis: AtomicU64,
    today: Mutex<(i32, u32, u32)>,
}

impl ManualClock {
    /// Create a clock frozen at `millis` with the given local date.
    pub fn new(millis: u64, today: (i32, u32, u32)) -> Self {
        Self {
            millis: AtomicU64::new(millis),
            today: Mutex::new(today),
        }
    }

    /// Create a clock at epoch millis 0 with the given local date.
    pub fn on(year: i32, month: u32, day: u32) -> Self {
        Self::new(0, (year, month, day))
    }

    /// Move the millisecond counter forward.
    pub fn advance(&self, by: Duration) {
        let ms = u64::try_from(by.as_millis()).unwrap_or(u64::MAX);
        self.millis.fetch_add(ms, Ordering::SeqCst);
    }

    /// Change the local date reported by [`Clock::today`].
    pub fn set_today(&self, year: i32, month: u32, day: u32) {
        *self.today.lock().unwrap_or_else(PoisonError::into_inner) = (year, month, day);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> u64 {
        self.millis.load(Ordering::SeqCst)
    }

    fn today(&self) -> (i32, u32, u32) {
        *self.today.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
