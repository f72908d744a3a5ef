//! The boundary sequence of the contiguous backend.
//!
//! Unlike a CSR `offsets` array (length `n + 1`, leading zero), the sequence
//! stores one cumulative *end* per partition:
//! - partition `i` occupies `[ends[i - 1], ends[i])` (with `ends[-1] == 0`)
//! - `ends.last()` equals the number of stored elements
//! - the sequence is non-decreasing at all times

use core::ops::Range;

/// Non-decreasing cumulative partition ends.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Boundaries {
    ends: Vec<usize>,
}

impl Boundaries {
    /// Creates an empty sequence.
    pub const fn new() -> Self {
        Self { ends: Vec::new() }
    }

    /// Number of partitions described.
    #[inline]
    pub fn len(&self) -> usize {
        self.ends.len()
    }

    /// Returns `true` if no partition is described.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ends.is_empty()
    }

    /// Cumulative end of partition `i`.
    #[inline]
    pub fn end(&self, i: usize) -> Option<usize> {
        self.ends.get(i).copied()
    }

    /// Start of partition `i`; `0` for the first partition.
    #[inline]
    pub fn start(&self, i: usize) -> usize {
        if i == 0 {
            0
        } else {
            self.ends.get(i - 1).copied().unwrap_or_else(|| self.total())
        }
    }

    /// Element range of partition `i`, if it exists.
    #[inline]
    pub fn bounds(&self, i: usize) -> Option<Range<usize>> {
        self.end(i).map(|end| self.start(i)..end)
    }

    /// Total number of elements described (the last end, or `0`).
    #[inline]
    pub fn total(&self) -> usize {
        self.ends.last().copied().unwrap_or(0)
    }

    /// Iterates over the cumulative ends.
    pub fn iter(&self) -> core::slice::Iter<'_, usize> {
        self.ends.iter()
    }

    /// Appends an empty partition after the last one.
    pub(crate) fn push_empty(&mut self) {
        let total = self.total();
        self.ends.push(total);
    }

    /// Inserts an empty partition at `pos` (`pos <= len`).
    pub(crate) fn insert_empty(&mut self, pos: usize) {
        debug_assert!(pos <= self.ends.len());
        let bound = self.start(pos);
        self.ends.insert(pos, bound);
    }

    /// Removes partition `n`, shifting every later end down by its size.
    pub(crate) fn remove(&mut self, n: usize) -> Range<usize> {
        let start = self.start(n);
        let end = self.ends.remove(n);
        let erased = end - start;
        self.shift_down(n.., erased);
        start..end
    }

    /// Adds `delta` to every end in `range`.
    pub(crate) fn shift_up(&mut self, range: impl core::slice::SliceIndex<[usize], Output = [usize]>, delta: usize) {
        for end in &mut self.ends[range] {
            *end += delta;
        }
        self.debug_check();
    }

    /// Subtracts `delta` from every end in `range`.
    pub(crate) fn shift_down(&mut self, range: impl core::slice::SliceIndex<[usize], Output = [usize]>, delta: usize) {
        for end in &mut self.ends[range] {
            *end -= delta;
        }
        self.debug_check();
    }

    pub(crate) fn reserve(&mut self, additional: usize) {
        self.ends.reserve(additional);
    }

    pub(crate) fn capacity(&self) -> usize {
        self.ends.capacity()
    }

    pub(crate) fn shrink_to_fit(&mut self) {
        self.ends.shrink_to_fit();
    }

    pub(crate) fn clear(&mut self) {
        self.ends.clear();
    }

    /// Returns `true` if the sequence is non-decreasing.
    pub fn is_monotone(&self) -> bool {
        self.ends.windows(2).all(|w| w[0] <= w[1])
    }

    #[inline]
    fn debug_check(&self) {
        debug_assert!(self.is_monotone(), "partition boundaries must be non-decreasing");
    }
}

impl<'a> IntoIterator for &'a Boundaries {
    type Item = &'a usize;
    type IntoIter = core::slice::Iter<'a, usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_sizes(sizes: &[usize]) -> Boundaries {
        let mut b = Boundaries::new();
        for (i, &s) in sizes.iter().enumerate() {
            b.push_empty();
            b.shift_up(i.., s);
        }
        b
    }

    #[test]
    fn bounds_follow_prefix_sums() {
        let b = from_sizes(&[1, 1, 2]);
        assert_eq!(b.iter().copied().collect::<Vec<_>>(), vec![1, 2, 4]);
        assert_eq!(b.bounds(0), Some(0..1));
        assert_eq!(b.bounds(2), Some(2..4));
        assert_eq!(b.bounds(3), None);
        assert_eq!(b.total(), 4);
    }

    #[test]
    fn insert_and_remove_keep_monotone() {
        let mut b = from_sizes(&[2, 3]);
        b.insert_empty(1);
        assert_eq!(b.iter().copied().collect::<Vec<_>>(), vec![2, 2, 5]);
        b.insert_empty(0);
        assert_eq!(b.iter().copied().collect::<Vec<_>>(), vec![0, 2, 2, 5]);

        let removed = b.remove(3);
        assert_eq!(removed, 2..5);
        assert_eq!(b.iter().copied().collect::<Vec<_>>(), vec![0, 2, 2]);
        assert!(b.is_monotone());
    }

    #[test]
    fn empty_sequence_has_zero_total() {
        let b = Boundaries::new();
        assert!(b.is_empty());
        assert_eq!(b.total(), 0);
        assert_eq!(b.start(0), 0);
    }
}
