//! In-memory query-result cache for fetched events.
//!
//! Every query key owns a set of covered date intervals and a pooled list of
//! every event fetched for it. A lookup hits when one covered interval
//! contains the requested range, and then returns the whole pool, which may
//! include events outside that range.

use std::collections::HashMap;

use crate::interval::{DateInterval, IntervalSet};

/// Covered ranges and pooled events for one query key.
#[derive(Debug, Clone)]
struct CacheEntry<T, E> {
    covered: IntervalSet<T>,
    events: Vec<E>,
}

impl<T, E> Default for CacheEntry<T, E> {
    fn default() -> Self {
        Self {
            covered: IntervalSet::default(),
            events: Vec::new(),
        }
    }
}

/// Session-lifetime cache of events keyed by query key and covered range.
///
/// Entries are created lazily on the first `put` for a key and live until
/// [`EventCache::reset`] or drop. There is no eviction.
#[derive(Debug, Clone)]
pub struct EventCache<T, E> {
    entries: HashMap<String, CacheEntry<T, E>>,
}

impl<T, E> Default for EventCache<T, E> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<T: Ord, E> EventCache<T, E> {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `[start, end]` has been fetched for `key` and pool `events`.
    ///
    /// Events are appended as-is; overlapping fetches leave duplicates in the
    /// pool. An inverted range (`start > end`) is dropped along with its
    /// events, so the pool never holds events without coverage.
    pub fn put(&mut self, key: &str, start: T, end: T, events: Vec<E>) {
        if start > end {
            tracing::warn!(key, "Ignoring inverted range for cache entry");
            return;
        }

        let entry = self.entries.entry(key.to_string()).or_default();
        entry.covered.add(start, end);
        entry.events.extend(events);
    }

    /// Pooled events for `key` if `[start, end]` is covered, `None` on a miss.
    ///
    /// An empty slice is a hit: the range was fetched and had no events.
    pub fn lookup(&self, key: &str, start: &T, end: &T) -> Option<&[E]> {
        let entry = self.entries.get(key)?;
        if entry.covered.covers(start, end) {
            Some(&entry.events)
        } else {
            None
        }
    }

    /// Covered intervals for `key`, empty if the key was never stored.
    pub fn covered(&self, key: &str) -> &[DateInterval<T>] {
        self.entries
            .get(key)
            .map(|entry| entry.covered.intervals())
            .unwrap_or(&[])
    }

    /// Keys that have at least one stored fetch.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every key, covered range and pooled event.
    pub fn reset(&mut self) {
        self.entries.clear();
    }
}
