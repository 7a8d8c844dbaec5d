//! Bounded, time-limited cache for commerce lookups.
//!
//! Commerce searches are keyed on a route midpoint rounded to three decimal
//! places (roughly 100 m), so neighbouring candidates for the same trip share
//! one upstream query. Entries expire a fixed time after insertion whether or
//! not they were read; when the cache is full the least recently used entry is
//! evicted.
//!
//! Concurrent misses on the same key are coalesced: the first caller runs the
//! fetch while later callers wait on a per-key gate and then read the stored
//! result. Failed fetches are never stored.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use dashmap::DashMap;
use geo::Coord;
use log::debug;
use saferoute_core::FacilityPoint;
use tokio::time::Instant;

/// Default number of cached midpoints.
pub const DEFAULT_CACHE_CAPACITY: usize = 100;

/// Default lifetime of a cached entry.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Configuration for [`StoreLookupCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreCacheConfig {
    /// Maximum number of entries held at once. Zero disables storage.
    pub capacity: usize,
    /// Lifetime of an entry, measured from insertion.
    pub ttl: Duration,
}

impl Default for StoreCacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CACHE_CAPACITY,
            ttl: DEFAULT_CACHE_TTL,
        }
    }
}

impl StoreCacheConfig {
    /// Set the maximum number of entries.
    #[must_use]
    pub const fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set the entry lifetime.
    #[must_use]
    pub const fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

/// Cache key: a coordinate rounded to three decimal places.
///
/// Rounding works on the exact binary value of each axis, halves going away
/// from zero, so `37.5665` (stored as `37.56649999…`) keys as `37.566`.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use saferoute_scorer::CacheKey;
///
/// let a = CacheKey::from_coord(Coord { x: 126.97801, y: 37.56649 });
/// let b = CacheKey::from_coord(Coord { x: 126.97789, y: 37.56611 });
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    lat_milli: i64,
    lon_milli: i64,
}

impl CacheKey {
    /// Round `coord` to the nearest thousandth of a degree on both axes.
    #[must_use]
    pub fn from_coord(coord: Coord<f64>) -> Self {
        Self {
            lat_milli: round_to_milli(coord.y),
            lon_milli: round_to_milli(coord.x),
        }
    }
}

/// Round `value * 1000` to an integer without an intermediate float product.
fn round_to_milli(value: f64) -> i64 {
    let bits = value.abs().to_bits();
    let biased = u16::try_from(bits >> 52).unwrap_or(0);
    let fraction = bits & ((1_u64 << 52) - 1);
    let (mantissa, exponent) = if biased == 0 {
        (fraction, -1074_i32)
    } else {
        (fraction | (1_u64 << 52), i32::from(biased) - 1075)
    };
    let scaled = u128::from(mantissa) * 1000;
    let shift = exponent.unsigned_abs();
    let milli = if exponent >= 0 {
        scaled.checked_shl(shift).unwrap_or(u128::MAX)
    } else if shift >= 127 {
        0
    } else {
        (scaled + (1_u128 << (shift - 1))) >> shift
    };
    let magnitude = i64::try_from(milli).unwrap_or(i64::MAX);
    if value.is_sign_negative() {
        -magnitude
    } else {
        magnitude
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}e-3,{}e-3", self.lat_milli, self.lon_milli)
    }
}

#[derive(Debug)]
struct Entry {
    value: Arc<[FacilityPoint]>,
    inserted_at: Instant,
    last_used: AtomicU64,
}

impl Entry {
    fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.inserted_at) < ttl
    }
}

type Gate = Arc<tokio::sync::Mutex<()>>;

/// Removes a key's gate once no caller holds it.
struct GateRelease<'a> {
    in_flight: &'a DashMap<CacheKey, Gate>,
    key: CacheKey,
}

impl Drop for GateRelease<'_> {
    fn drop(&mut self) {
        self.in_flight
            .remove_if(&self.key, |_, gate| Arc::strong_count(gate) == 1);
    }
}

/// Shared commerce lookup cache.
///
/// The cache is an ordinary value; share it between scorers with [`Arc`].
#[derive(Debug, Default)]
pub struct StoreLookupCache {
    config: StoreCacheConfig,
    entries: DashMap<CacheKey, Entry>,
    in_flight: DashMap<CacheKey, Gate>,
    clock: AtomicU64,
    write_lock: Mutex<()>,
}

impl StoreLookupCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new(config: StoreCacheConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> StoreCacheConfig {
        self.config
    }

    /// Number of stored entries, including any that have expired but not yet
    /// been purged.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Return the fresh value for `key`, marking it as recently used.
    ///
    /// Expired entries are purged on access.
    #[must_use]
    pub fn get(&self, key: &CacheKey) -> Option<Arc<[FacilityPoint]>> {
        let now = Instant::now();
        let ttl = self.config.ttl;
        let fresh = self.entries.get(key).and_then(|entry| {
            entry.is_fresh(now, ttl).then(|| {
                entry.last_used.store(self.tick(), Ordering::Relaxed);
                Arc::clone(&entry.value)
            })
        });
        if fresh.is_none() {
            self.entries
                .remove_if(key, |_, entry| !entry.is_fresh(now, ttl));
        }
        fresh
    }

    /// Store `value` under `key`, evicting the least recently used entry when
    /// the cache is full.
    pub fn put(&self, key: CacheKey, value: Arc<[FacilityPoint]>) {
        if self.config.capacity == 0 {
            return;
        }
        let _writer = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();
        if !self.entries.contains_key(&key) {
            self.make_room(now);
        }
        self.entries.insert(
            key,
            Entry {
                value,
                inserted_at: now,
                last_used: AtomicU64::new(self.tick()),
            },
        );
    }

    /// Return the cached value for `key`, running `fetch` on a miss.
    ///
    /// Only one fetch per key runs at a time; concurrent callers for the same
    /// key wait for it and reuse its stored result. Errors are passed through
    /// without being cached, so the next caller retries.
    ///
    /// # Errors
    /// Returns whatever error `fetch` produced.
    pub async fn get_or_fetch<F, Fut, E>(
        &self,
        key: CacheKey,
        fetch: F,
    ) -> Result<Arc<[FacilityPoint]>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<FacilityPoint>, E>>,
    {
        if let Some(hit) = self.get(&key) {
            debug!("store cache hit for {key}");
            return Ok(hit);
        }

        // Locals drop in reverse order, so `gate` is released before
        // `_release` inspects the map, including when this future is dropped.
        let _release = GateRelease {
            in_flight: &self.in_flight,
            key,
        };
        let gate = Arc::clone(self.in_flight.entry(key).or_default().value());
        let _guard = gate.lock().await;
        self.fetch_exclusive(key, fetch).await
    }

    /// Body of [`Self::get_or_fetch`] run while holding the per-key gate.
    async fn fetch_exclusive<F, Fut, E>(
        &self,
        key: CacheKey,
        fetch: F,
    ) -> Result<Arc<[FacilityPoint]>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<FacilityPoint>, E>>,
    {
        if let Some(hit) = self.get(&key) {
            debug!("store cache hit for {key} after waiting on in-flight lookup");
            return Ok(hit);
        }
        debug!("store cache miss for {key}");
        let points = fetch().await?;
        let value: Arc<[FacilityPoint]> = points.into();
        self.put(key, Arc::clone(&value));
        Ok(value)
    }

    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed)
    }

    /// Purge expired entries, then evict by recency until one slot is free.
    fn make_room(&self, now: Instant) {
        let ttl = self.config.ttl;
        self.entries.retain(|_, entry| entry.is_fresh(now, ttl));
        while self.entries.len() >= self.config.capacity {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|entry| entry.last_used.load(Ordering::Relaxed))
                .map(|entry| *entry.key());
            let Some(oldest) = oldest else { break };
            debug!("evicting store cache entry {oldest}");
            self.entries.remove(&oldest);
        }
    }
}
