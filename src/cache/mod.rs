//! In-memory cache for exchange rate snapshots
//!
//! This module provides a thread-safe cache keyed by base currency with a single
//! global TTL (time-to-live). Expired entries are evicted lazily: a read that finds
//! a stale entry removes it and reports the entry as absent.

mod rate_cache;

pub use rate_cache::{Clock, RateCache, SystemClock, DEFAULT_TTL_SECONDS};

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::atomic::{AtomicI64, Ordering};

    use super::Clock;

    /// A clock that only moves when told to
    #[derive(Debug, Default)]
    pub struct ManualClock {
        now: AtomicI64,
    }

    impl ManualClock {
        pub fn at(now: i64) -> Self {
            Self {
                now: AtomicI64::new(now),
            }
        }

        pub fn set(&self, now: i64) {
            self.now.store(now, Ordering::SeqCst);
        }

        pub fn advance(&self, secs: i64) {
            self.now.fetch_add(secs, Ordering::SeqCst);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> i64 {
            self.now.load(Ordering::SeqCst)
        }
    }
}
