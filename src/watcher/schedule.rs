//! Round-robin chunk scheduling.
//!
//! Splits an ordered list into fixed-size groups and hands them out one at a
//! time, wrapping around to the first group, until a group budget runs out.

use std::iter::FusedIterator;

/// Cycling iterator over fixed-size groups of items.
///
/// Groups are consecutive runs of `chunk_size` items; the last one may be
/// shorter. An empty input is replaced by a single group holding one
/// `T::default()` so that a consumer asking for N groups still gets N.
#[derive(Debug, Clone)]
pub struct ChunkSchedule<T> {
    groups: Vec<Vec<T>>,
    cursor: usize,
    remaining: usize,
}

/// Build a schedule yielding `budget` groups of `chunk_size` items.
///
/// A `chunk_size` of zero is treated as one.
pub fn schedule<T, I>(items: I, chunk_size: usize, budget: usize) -> ChunkSchedule<T>
where
    T: Clone + Default,
    I: IntoIterator<Item = T>,
{
    ChunkSchedule::new(items, chunk_size, budget)
}

impl<T: Clone + Default> ChunkSchedule<T> {
    /// Create a schedule. See [`schedule`].
    pub fn new<I: IntoIterator<Item = T>>(items: I, chunk_size: usize, budget: usize) -> Self {
        let items: Vec<T> = items.into_iter().collect();

        let groups = if items.is_empty() {
            vec![vec![T::default()]]
        } else {
            items.chunks(chunk_size.max(1)).map(<[T]>::to_vec).collect()
        };

        Self {
            groups,
            cursor: 0,
            remaining: budget,
        }
    }
}

impl<T> ChunkSchedule<T> {
    /// Number of distinct groups in one full pass.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Groups left in the budget.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.remaining
    }

    /// Whether the budget is spent.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        self.remaining == 0
    }
}

impl<T: Clone> Iterator for ChunkSchedule<T> {
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let group = self.groups[self.cursor].clone();
        self.cursor = (self.cursor + 1) % self.groups.len();
        self.remaining -= 1;
        Some(group)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T: Clone> ExactSizeIterator for ChunkSchedule<T> {}

impl<T: Clone> FusedIterator for ChunkSchedule<T> {}
