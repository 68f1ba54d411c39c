//! Rate cache keyed by base currency
//!
//! Provides a `RateCache` that stores the latest rate snapshot for each base
//! currency together with its fetch timestamp, and hides entries older than the
//! configured TTL.

use chrono::Utc;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::data::Rates;

/// Default cache TTL in seconds
pub const DEFAULT_TTL_SECONDS: u64 = 10;

/// Source of the current time, in whole seconds since the Unix epoch
pub trait Clock: Send + Sync {
    fn now(&self) -> i64;
}

/// Wall-clock time source
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        Utc::now().timestamp()
    }
}

/// A cached rate snapshot
#[derive(Debug, Clone)]
struct CacheEntry {
    /// The cached rates
    rates: Arc<Rates>,
    /// When the rates were stored (Unix seconds)
    fetched_at: i64,
}

/// Thread-safe, time-bounded cache of rate snapshots
///
/// One entry is kept per base currency. `save` always replaces the whole entry,
/// and `get` evicts an entry once it is older than the TTL. Both operations run
/// entirely under one lock, so an eviction can never remove a fresher entry
/// written by a concurrent `save`.
///
/// Returned rates are shared `Arc<Rates>` handles and cannot be mutated by callers.
pub struct RateCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl_seconds: u64,
    clock: Arc<dyn Clock>,
}

impl RateCache {
    /// Creates a cache with the given TTL using the system clock
    pub fn new(ttl_seconds: u64) -> Self {
        Self::with_clock(ttl_seconds, Arc::new(SystemClock))
    }

    /// Creates a cache with a custom time source
    pub fn with_clock(ttl_seconds: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl_seconds,
            clock,
        }
    }

    /// Maximum age, in seconds, of an entry that `get` will still return
    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    /// TTL as a signed age bound; TTLs beyond `i64::MAX` never expire
    fn max_age(&self) -> i64 {
        i64::try_from(self.ttl_seconds).unwrap_or(i64::MAX)
    }

    /// Returns the cached rates for `base` if present and fresh
    ///
    /// An entry whose age exceeds the TTL is removed and `None` is returned,
    /// exactly as if it had never been stored.
    pub fn get(&self, base: &str) -> Option<Arc<Rates>> {
        let mut entries = self.entries.lock();
        let now = self.clock.now();

        let entry = entries.get(base)?;
        let age = now.saturating_sub(entry.fetched_at);
        if age > self.max_age() {
            entries.remove(base);
            debug!(base, age, "evicted expired rates");
            return None;
        }

        debug!(base, age, "rate cache hit");
        Some(Arc::clone(&entry.rates))
    }

    /// Stores `rates` for `base`, replacing any previous entry
    pub fn save(&self, base: &str, rates: Arc<Rates>) {
        let mut entries = self.entries.lock();
        let entry = CacheEntry {
            rates,
            fetched_at: self.clock.now(),
        };
        entries.insert(base.to_string(), entry);
        debug!(base, "rates cached");
    }

    /// Number of stored entries, including expired entries not yet evicted
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl Default for RateCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL_SECONDS)
    }
}

impl fmt::Debug for RateCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RateCache")
            .field("entries", &self.len())
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}
