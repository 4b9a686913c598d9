//! Time-bounded cache for derived scores.
//!
//! Storage and capacity eviction are handled by moka. Freshness is decided by
//! comparing each entry's `computed_at` against an injected [`Clock`], so
//! tests can move time without sleeping.

use chrono::{DateTime, Utc};
use moka::future::Cache;
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Source of "now" for cache freshness checks
pub trait Clock: Send + Sync {
    /// Current time
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    millis: AtomicI64,
}

impl ManualClock {
    /// Start at the given instant
    #[must_use]
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            millis: AtomicI64::new(start.timestamp_millis()),
        }
    }

    /// Move forward
    pub fn advance(&self, by: Duration) {
        let delta = i64::try_from(by.as_millis()).unwrap_or(i64::MAX);
        self.millis.fetch_add(delta, Ordering::SeqCst);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.millis.load(Ordering::SeqCst)).unwrap_or_default()
    }
}

/// A computed value and when it was computed
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<T> {
    /// Cached value
    pub value: T,
    /// When the value was computed
    pub computed_at: DateTime<Utc>,
    /// How long the value stays valid
    pub ttl: Duration,
}

impl<T> CacheEntry<T> {
    /// Entry computed at `computed_at`
    pub const fn new(value: T, computed_at: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            value,
            computed_at,
            ttl,
        }
    }

    /// `now - computed_at < ttl`
    #[must_use]
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        let age = now - self.computed_at;
        chrono::Duration::from_std(self.ttl).map_or(true, |ttl| age < ttl)
    }
}

/// String-keyed TTL cache with last-writer-wins semantics
#[derive(Clone)]
pub struct TtlCache<T: Clone + Send + Sync + 'static> {
    entries: Cache<String, CacheEntry<T>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<T: Clone + Send + Sync + 'static> TtlCache<T> {
    /// Cache on the wall clock
    #[must_use]
    pub fn new(ttl: Duration, max_capacity: u64) -> Self {
        Self::with_clock(ttl, max_capacity, Arc::new(SystemClock))
    }

    /// Cache on a caller-supplied clock
    #[must_use]
    pub fn with_clock(ttl: Duration, max_capacity: u64, clock: Arc<dyn Clock>) -> Self {
        // moka's own expiry is only a memory bound; freshness follows `clock`
        let entries = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();

        Self {
            entries,
            ttl,
            clock,
        }
    }

    /// Entry lifetime
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fresh value for `key`, if any; stale entries are dropped
    pub async fn get(&self, key: &str) -> Option<T> {
        self.get_entry(key).await.map(|entry| entry.value)
    }

    /// Fresh entry for `key`, including its timestamp
    pub async fn get_entry(&self, key: &str) -> Option<CacheEntry<T>> {
        let entry = self.entries.get(key).await?;

        if entry.is_fresh(self.clock.now()) {
            debug!(key, "cache hit");
            Some(entry)
        } else {
            debug!(key, computed_at = %entry.computed_at, "cache entry expired");
            self.entries.invalidate(key).await;
            None
        }
    }

    /// Store a value computed now, replacing any previous entry
    pub async fn insert(&self, key: impl Into<String>, value: T) {
        let entry = CacheEntry::new(value, self.clock.now(), self.ttl);
        self.entries.insert(key.into(), entry).await;
    }

    /// Drop one key
    pub async fn invalidate(&self, key: &str) {
        self.entries.invalidate(key).await;
    }

    /// Approximate number of stored entries (fresh or not)
    pub fn entry_count(&self) -> u64 {
        self.entries.entry_count()
    }
}

impl<T: Clone + Send + Sync + 'static> fmt::Debug for TtlCache<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TtlCache")
            .field("ttl", &self.ttl)
            .field("entries", &self.entries.entry_count())
            .finish_non_exhaustive()
    }
}
