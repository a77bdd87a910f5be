//! # th-cache
//!
//! A generic, process-local TTL cache.  Entries expire lazily, and a failed
//! refresh can fall back to the last value stored under the same key.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// `TtlCache` and its status snapshot.
pub mod ttl_cache;

pub use ttl_cache::{year_key, CacheStatus, TtlCache};
