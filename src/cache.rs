//! # Response cache for call controllers
//!
//! Each call controller owns at most one [`CacheEntry`]: the last successful result,
//! the parameters it was produced for and when it was stored. The entry is private
//! to its controller and never shared.
//!
//! An entry answers a lookup only when:
//! - **Parameters match**: the requested parameters serialize to the same [`ParamKey`].
//! - **Age is within the cache time**: `now - timestamp <= cache_time`.
//!
//! ## Example
//! ```rust,no_run
//! use dioxus_api_hooks::cache::CacheEntry;
//! use dioxus_api_hooks::param_utils::ParamKey;
//! use std::time::Duration;
//!
//! let mut entry = CacheEntry::new();
//! let key = ParamKey::of(&42).unwrap();
//! entry.store(key.clone(), "answer".to_string());
//! assert_eq!(entry.lookup(&key, Duration::from_secs(60)), Some("answer".to_string()));
//! ```

use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

use crate::{param_utils::ParamKey, platform::Instant};

/// The single cached result of a call controller.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    timestamp: Option<Instant>,
    data: Option<T>,
    params: Option<ParamKey>,
}

impl<T> Default for CacheEntry<T> {
    fn default() -> Self {
        Self {
            timestamp: None,
            data: None,
            params: None,
        }
    }
}

impl<T: Clone> CacheEntry<T> {
    /// Creates an empty (invalid) entry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached data if it was stored for `params` and is no older than `cache_time`.
    ///
    /// # Arguments
    ///
    /// * `params` - Key of the requested parameters.
    /// * `cache_time` - Maximum age of a usable entry.
    ///
    /// # Returns
    ///
    /// A clone of the cached data, or `None` on a miss.
    pub fn lookup(&self, params: &ParamKey, cache_time: Duration) -> Option<T> {
        if self.params.as_ref() != Some(params) || self.is_expired(cache_time) {
            return None;
        }
        self.data.clone()
    }

    /// Overwrites the entry with a fresh result.
    ///
    /// # Side Effects
    ///
    /// Resets the timestamp to now.
    pub fn store(&mut self, params: ParamKey, data: T) {
        self.timestamp = Some(Instant::now());
        self.data = Some(data);
        self.params = Some(params);
    }

    /// Logically invalidates the entry.
    pub fn invalidate(&mut self) {
        self.timestamp = None;
        self.data = None;
        self.params = None;
    }

    /// Whether the entry is older than `cache_time`. An empty entry counts as expired.
    pub fn is_expired(&self, cache_time: Duration) -> bool {
        match self.timestamp {
            Some(stored_at) => stored_at.elapsed() > cache_time,
            None => true,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.timestamp.is_none()
    }

    /// Age of the entry, `None` when empty.
    pub fn age(&self) -> Option<Duration> {
        self.timestamp.map(|stored_at| stored_at.elapsed())
    }
}

/// Hit/miss counters for one controller's cache.
#[derive(Debug, Default)]
pub(crate) struct CacheCounters {
    hits: AtomicU64,
    misses: AtomicU64,
}

impl CacheCounters {
    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

/// Cache statistics of a call controller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total > 0 {
            self.hits as f64 / total as f64
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(value: u32) -> ParamKey {
        ParamKey::of(&value).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn entry_expires_after_cache_time() {
        let mut entry = CacheEntry::new();
        entry.store(key(1), "one");

        tokio::time::advance(Duration::from_millis(4000)).await;
        assert_eq!(entry.lookup(&key(1), Duration::from_millis(5000)), Some("one"));

        tokio::time::advance(Duration::from_millis(2000)).await;
        assert_eq!(entry.lookup(&key(1), Duration::from_millis(5000)), None);
        assert!(entry.is_expired(Duration::from_millis(5000)));
    }

    #[tokio::test(start_paused = true)]
    async fn entry_misses_on_different_params() {
        let mut entry = CacheEntry::new();
        entry.store(key(1), "one");
        assert_eq!(entry.lookup(&key(2), Duration::from_secs(60)), None);
    }

    #[tokio::test(start_paused = true)]
    async fn invalidate_empties_entry() {
        let mut entry = CacheEntry::new();
        entry.store(key(1), "one");
        entry.invalidate();
        assert!(entry.is_empty());
        assert_eq!(entry.age(), None);
        assert_eq!(entry.lookup(&key(1), Duration::from_secs(60)), None);
    }

    #[test]
    fn stats_ratio() {
        let counters = CacheCounters::default();
        assert_eq!(counters.snapshot().hit_ratio(), 0.0);
        counters.record_hit();
        counters.record_miss();
        counters.record_hit();
        counters.record_hit();
        let stats = counters.snapshot();
        assert_eq!(stats, CacheStats { hits: 3, misses: 1 });
        assert_eq!(stats.hit_ratio(), 0.75);
    }
}
