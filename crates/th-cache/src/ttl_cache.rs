//! Keyed in-memory store with a shared time-to-live.
//!
//! Expiry is lazy: an entry older than the TTL reads as absent but stays in
//! the map until it is overwritten, deleted, or the cache is cleared.  That
//! leftover value is what [`TtlCache::get_or_fetch`] hands back when
//! stale-on-error is enabled and the populate step fails.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use serde::Serialize;
use th_core::clock::Clock;
use th_core::constants::CACHE_KEY_PREFIX;

// ── Entry ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct CacheEntry<T> {
    payload: T,
    inserted_at_ms: u64,
    ttl_ms: u64,
}

impl<T> CacheEntry<T> {
    fn is_expired(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.inserted_at_ms) > self.ttl_ms
    }
}

// ── Status ────────────────────────────────────────────────────────────────────

/// Diagnostic snapshot of the live entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStatus {
    /// Years whose `holidays_YYYY` entry is live, ascending.
    pub cached_years: Vec<u16>,
    /// Number of live entries.
    pub item_count: usize,
    /// The instance TTL in milliseconds.
    pub ttl_ms: u64,
}

// ── Cache ─────────────────────────────────────────────────────────────────────

/// A thread-safe TTL cache.
///
/// Values are cloned out on read, so callers can mutate what they get
/// without touching the stored copy.  Wrap large payloads in an `Arc` if
/// cloning is expensive.
#[derive(Debug)]
pub struct TtlCache<T> {
    store: RwLock<HashMap<String, CacheEntry<T>>>,
    ttl: Duration,
    stale_on_error: bool,
    clock: Arc<dyn Clock>,
}

impl<T: Clone> TtlCache<T> {
    /// Create an empty cache whose entries live for `ttl`.
    ///
    /// Stale-on-error starts disabled.
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
            ttl,
            stale_on_error: false,
            clock,
        }
    }

    /// Set the instance-wide stale-on-error default.
    pub fn with_stale_on_error(mut self, enabled: bool) -> Self {
        self.stale_on_error = enabled;
        self
    }

    /// The TTL shared by every entry.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The live value for `key`, if any.
    pub fn get(&self, key: &str) -> Option<T> {
        let now = self.clock.now_millis();
        let store = self.store.read().unwrap_or_else(PoisonError::into_inner);
        store
            .get(key)
            .filter(|e| !e.is_expired(now))
            .map(|e| e.payload.clone())
    }

    /// Insert or replace `key`, stamped with the current time.
    pub fn set(&self, key: impl Into<String>, value: T) {
        let entry = CacheEntry {
            payload: value,
            inserted_at_ms: self.clock.now_millis(),
            ttl_ms: self.ttl_ms(),
        };
        self.store
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), entry);
    }

    /// `true` if `key` holds a live value.
    pub fn has(&self, key: &str) -> bool {
        self.timestamp(key).is_some()
    }

    /// Insertion time (epoch ms) of the live value for `key`.
    pub fn timestamp(&self, key: &str) -> Option<u64> {
        let now = self.clock.now_millis();
        let store = self.store.read().unwrap_or_else(PoisonError::into_inner);
        store
            .get(key)
            .filter(|e| !e.is_expired(now))
            .map(|e| e.inserted_at_ms)
    }

    /// Remove `key`, live or not.
    pub fn delete(&self, key: &str) {
        self.store
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }

    /// Remove every entry, including expired ones.
    pub fn clear(&self) {
        let mut store = self.store.write().unwrap_or_else(PoisonError::into_inner);
        let n = store.len();
        store.clear();
        tracing::info!(entries = n, "cache cleared");
    }

    /// Count live entries and list the years of live year entries.
    pub fn status(&self) -> CacheStatus {
        let now = self.clock.now_millis();
        let store = self.store.read().unwrap_or_else(PoisonError::into_inner);
        let live: Vec<&String> = store
            .iter()
            .filter(|(_, e)| !e.is_expired(now))
            .map(|(k, _)| k)
            .collect();
        let mut cached_years: Vec<u16> = live.iter().filter_map(|k| year_of_key(k)).collect();
        cached_years.sort_unstable();
        CacheStatus {
            cached_years,
            item_count: live.len(),
            ttl_ms: self.ttl_ms(),
        }
    }

    /// Return the live value for `key`, or run `populate` and store its
    /// result.
    ///
    /// When `populate` fails and stale-on-error is in effect (`stale_on_error`
    /// if given, the instance default otherwise), any value still stored under
    /// `key` is returned regardless of age.  Without one, the populate error
    /// propagates unchanged.
    ///
    /// No lock is held while `populate` runs, so concurrent calls for
    /// different keys proceed independently.
    pub async fn get_or_fetch<F, Fut, E>(
        &self,
        key: &str,
        populate: F,
        stale_on_error: Option<bool>,
    ) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        if let Some(hit) = self.get(key) {
            tracing::debug!(key, "cache hit");
            return Ok(hit);
        }
        tracing::debug!(key, "cache miss");

        match populate().await {
            Ok(value) => {
                self.set(key, value.clone());
                Ok(value)
            }
            Err(err) => {
                if stale_on_error.unwrap_or(self.stale_on_error) {
                    if let Some(stale) = self.any_age(key) {
                        tracing::warn!(key, error = %err, "populate failed, serving stale entry");
                        return Ok(stale);
                    }
                }
                Err(err)
            }
        }
    }

    fn any_age(&self, key: &str) -> Option<T> {
        let store = self.store.read().unwrap_or_else(PoisonError::into_inner);
        store.get(key).map(|e| e.payload.clone())
    }

    fn ttl_ms(&self) -> u64 {
        u64::try_from(self.ttl.as_millis()).unwrap_or(u64::MAX)
    }
}

/// Cache key for one year's holiday list.
pub fn year_key(year: u16) -> String {
    format!("{CACHE_KEY_PREFIX}{year}")
}

/// Inverse of [`year_key`]: the four-digit year after the prefix.
fn year_of_key(key: &str) -> Option<u16> {
    let digits = key.strip_prefix(CACHE_KEY_PREFIX)?.get(..4)?;
    if digits.bytes().all(|b| b.is_ascii_digit()) {
        digits.parse().ok()
    } else {
        None
    }
}
