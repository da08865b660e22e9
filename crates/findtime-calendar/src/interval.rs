//! Coalesced sets of covered date intervals.
//!
//! An [`IntervalSet`] records which spans of time have already been fetched
//! for one query key. After every mutation the set is sorted by start and
//! no two neighbours overlap or touch.

use serde::{Deserialize, Serialize};

/// A closed `[start, end]` span of ordered values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateInterval<T> {
    pub start: T,
    pub end: T,
}

impl<T: Ord> DateInterval<T> {
    /// Create an interval, or `None` if `start > end`.
    pub fn new(start: T, end: T) -> Option<Self> {
        if start > end {
            return None;
        }
        Some(Self { start, end })
    }

    /// Whether this interval fully contains `[start, end]`.
    pub fn contains(&self, start: &T, end: &T) -> bool {
        self.start <= *start && self.end >= *end
    }
}

/// Sorted, fully coalesced set of closed intervals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalSet<T> {
    intervals: Vec<DateInterval<T>>,
}

impl<T> Default for IntervalSet<T> {
    fn default() -> Self {
        Self {
            intervals: Vec::new(),
        }
    }
}

impl<T: Ord> IntervalSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `[start, end]` and re-coalesce.
    ///
    /// Intervals whose boundaries touch (`end == next.start`) are merged.
    /// Returns `false` and leaves the set untouched when `start > end`.
    pub fn add(&mut self, start: T, end: T) -> bool {
        let Some(interval) = DateInterval::new(start, end) else {
            return false;
        };
        self.intervals.push(interval);
        self.normalize();
        true
    }

    /// True iff a single stored interval contains `[start, end]`.
    ///
    /// One interval is enough: `add` merges eagerly, so two neighbours can
    /// never jointly cover a span without already being one interval.
    pub fn covers(&self, start: &T, end: &T) -> bool {
        self.intervals.iter().any(|iv| iv.contains(start, end))
    }

    /// The covered intervals in ascending order.
    pub fn intervals(&self) -> &[DateInterval<T>] {
        &self.intervals
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn clear(&mut self) {
        self.intervals.clear();
    }

    fn normalize(&mut self) {
        self.intervals.sort_unstable_by(|a, b| a.start.cmp(&b.start));

        // Stay on `i` after a merge: the widened interval may now reach the
        // following one too.
        let mut i = 0;
        while i + 1 < self.intervals.len() {
            if self.intervals[i].end >= self.intervals[i + 1].start {
                let next = self.intervals.remove(i + 1);
                if next.end > self.intervals[i].end {
                    self.intervals[i].end = next.end;
                }
            } else {
                i += 1;
            }
        }
    }
}

impl<T: Ord> FromIterator<(T, T)> for IntervalSet<T> {
    fn from_iter<I: IntoIterator<Item = (T, T)>>(iter: I) -> Self {
        let mut set = IntervalSet::new();
        for (start, end) in iter {
            set.add(start, end);
        }
        set
    }
}
