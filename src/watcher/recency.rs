//! Bounded most-recently-touched set.

use std::collections::VecDeque;

/// Ordered set of recently touched values, newest first.
///
/// Holds at most `capacity` values. Touching a value moves it to the front;
/// touching a new value when full evicts the oldest one.
#[derive(Debug, Clone)]
pub struct RecencyCache<T> {
    capacity: usize,
    entries: VecDeque<T>,
}

impl<T: PartialEq + Clone> RecencyCache<T> {
    /// Create an empty cache.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    /// Move `value` to the front, inserting it if absent.
    pub fn touch(&mut self, value: T) {
        self.entries.retain(|e| *e != value);
        self.entries.push_front(value);
        self.entries.truncate(self.capacity);
    }

    /// Copy of the entries, newest first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<T> {
        self.entries.iter().cloned().collect()
    }

    /// Iterate newest first.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    #[must_use]
    pub fn contains(&self, value: &T) -> bool {
        self.entries.contains(value)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(capacity: usize, values: &[&'static str]) -> RecencyCache<&'static str> {
        let mut cache = RecencyCache::new(capacity);
        for v in values {
            cache.touch(*v);
        }
        cache
    }

    #[test]
    fn test_touch_orders_newest_first() {
        let cache = filled(3, &["a", "b", "c"]);
        assert_eq!(cache.snapshot(), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_touch_refreshes_existing() {
        let cache = filled(3, &["a", "b", "c", "b"]);
        assert_eq!(cache.snapshot(), vec!["b", "c", "a"]);
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_touch_evicts_oldest() {
        let cache = filled(3, &["a", "b", "c", "d"]);
        assert_eq!(cache.snapshot(), vec!["d", "c", "b"]);
        assert!(!cache.contains(&"a"));
    }

    #[test]
    fn test_zero_capacity_stays_empty() {
        let cache = filled(0, &["a", "b"]);
        assert!(cache.is_empty());
        assert_eq!(cache.capacity(), 0);
    }

    #[test]
    fn test_capacity_one() {
        let cache = filled(1, &["a", "b"]);
        assert_eq!(cache.snapshot(), vec!["b"]);
    }

    #[test]
    fn test_len_never_exceeds_capacity() {
        let mut cache = RecencyCache::new(4);
        for i in 0..100 {
            cache.touch(i % 7);
            assert!(cache.len() <= 4);
        }
        assert_eq!(cache.iter().copied().collect::<Vec<_>>(), vec![1, 0, 6, 5]);
    }

    #[test]
    fn test_snapshot_does_not_mutate() {
        let cache = filled(2, &["x", "y"]);
        let first = cache.snapshot();
        let second = cache.snapshot();
        assert_eq!(first, second);
        assert_eq!(cache.len(), 2);
    }
}
