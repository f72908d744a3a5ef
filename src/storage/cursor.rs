//! Partition cursors: random-access positions tagged with their partition.
//!
//! A cursor is a `(slice, partition, position)` triple. The slice is the
//! backend region the cursor may address: the whole flat store for the
//! contiguous backend, a single bucket for the bucketed backend. Every
//! dereference is bounds-checked against that slice, so cursor arithmetic
//! that walks past a partition can never read out of bounds:
//! - contiguous: stepping past a partition reaches the neighbouring
//!   partition's elements (the partition tag is *not* updated)
//! - bucketed: stepping past a partition yields `None`
//!
//! Reverse cursors follow the `std::reverse_iterator` convention: a reverse
//! cursor at base position `p` refers to the element at `p - 1`.

use core::cmp::Ordering;
use core::fmt;
use core::iter::FusedIterator;
use core::ops::{Add, AddAssign, Sub, SubAssign};

/// Partition tag meaning "belongs to no partition".
pub const NPOS: usize = usize::MAX;

/// An owned `(partition, offset)` address inside a partitioned backend.
///
/// Mutating operations take and return positions rather than cursors, so
/// that a position obtained from one call can be fed to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartitionPosition {
    /// Partition index, or [`NPOS`].
    pub partition: usize,
    /// Offset inside the partition.
    pub offset: usize,
}

impl PartitionPosition {
    /// The position belonging to no partition.
    pub const NONE: Self = Self {
        partition: NPOS,
        offset: 0,
    };

    /// Creates a position.
    #[inline]
    pub const fn new(partition: usize, offset: usize) -> Self {
        Self { partition, offset }
    }

    /// Returns `true` for positions tagged [`NPOS`].
    #[inline]
    pub const fn is_none(&self) -> bool {
        self.partition == NPOS
    }
}

/// A random-access cursor into one partition.
///
/// `REVERSED` selects the directionality; ordering and distance are only
/// defined between cursors of the same directionality, which the type
/// parameter enforces.
pub struct PartitionCursor<'a, H, const REVERSED: bool> {
    base: &'a [H],
    origin: usize,
    pos: usize,
    partition: usize,
}

/// A forward partition cursor.
pub type ForwardCursor<'a, H> = PartitionCursor<'a, H, false>;
/// A reverse partition cursor.
pub type ReverseCursor<'a, H> = PartitionCursor<'a, H, true>;

impl<'a, H, const REVERSED: bool> PartitionCursor<'a, H, REVERSED> {
    /// `origin` is where the partition starts inside `base`; `pos` is the
    /// cursor's base position.
    #[inline]
    pub(crate) fn new(base: &'a [H], origin: usize, pos: usize, partition: usize) -> Self {
        Self {
            base,
            origin,
            pos,
            partition,
        }
    }

    /// Whether this is a reverse cursor.
    #[inline]
    pub const fn reversed() -> bool {
        REVERSED
    }

    /// The partition tag, or [`NPOS`].
    #[inline]
    pub fn partition_index(&self) -> usize {
        self.partition
    }

    /// The raw position inside the cursor's slice.
    #[inline]
    pub fn base_position(&self) -> usize {
        self.pos
    }

    #[inline]
    fn element_index(&self) -> Option<usize> {
        if REVERSED {
            self.pos.checked_sub(1)
        } else {
            Some(self.pos)
        }
    }

    /// The handle under the cursor, if the cursor addresses an element.
    #[inline]
    pub fn get(&self) -> Option<&'a H> {
        self.element_index().and_then(|i| self.base.get(i))
    }

    /// The handle `n` steps away, as with `it[n]`.
    #[inline]
    pub fn at(&self, n: isize) -> Option<&'a H> {
        (*self + n).get()
    }

    /// The owned address of the element under the cursor.
    pub fn position(&self) -> PartitionPosition {
        if self.partition == NPOS {
            return PartitionPosition::NONE;
        }
        let index = if REVERSED {
            self.pos.wrapping_sub(1)
        } else {
            self.pos
        };
        PartitionPosition::new(self.partition, index.wrapping_sub(self.origin))
    }

    /// Signed number of steps from `self` to `other`.
    #[inline]
    pub fn distance_to(&self, other: &Self) -> isize {
        let d = other.pos as isize - self.pos as isize;
        if REVERSED {
            -d
        } else {
            d
        }
    }

    #[inline]
    fn shifted(mut self, n: isize) -> Self {
        let step = if REVERSED { n.wrapping_neg() } else { n };
        self.pos = self.pos.wrapping_add_signed(step);
        self
    }

    #[inline]
    fn same_base(&self, other: &Self) -> bool {
        core::ptr::eq(self.base.as_ptr(), other.base.as_ptr())
    }
}

impl<H, const REVERSED: bool> Clone for PartitionCursor<'_, H, REVERSED> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<H, const REVERSED: bool> Copy for PartitionCursor<'_, H, REVERSED> {}

impl<H, const REVERSED: bool> fmt::Debug for PartitionCursor<'_, H, REVERSED> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartitionCursor")
            .field("partition", &self.partition)
            .field("pos", &self.pos)
            .field("reversed", &REVERSED)
            .finish()
    }
}

impl<H, const REVERSED: bool> PartialEq for PartitionCursor<'_, H, REVERSED> {
    fn eq(&self, other: &Self) -> bool {
        self.same_base(other) && self.pos == other.pos && self.partition == other.partition
    }
}

impl<H, const REVERSED: bool> Eq for PartitionCursor<'_, H, REVERSED> {}

impl<H, const REVERSED: bool> PartialOrd for PartitionCursor<'_, H, REVERSED> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        // Cursors are ordered only within one partition of one storage.
        if !self.same_base(other) || self.partition != other.partition {
            return None;
        }
        let by_pos = self.pos.cmp(&other.pos);
        Some(if REVERSED { by_pos.reverse() } else { by_pos })
    }
}

impl<H, const REVERSED: bool> Add<isize> for PartitionCursor<'_, H, REVERSED> {
    type Output = Self;

    fn add(self, n: isize) -> Self {
        self.shifted(n)
    }
}

impl<H, const REVERSED: bool> Sub<isize> for PartitionCursor<'_, H, REVERSED> {
    type Output = Self;

    fn sub(self, n: isize) -> Self {
        self.shifted(n.wrapping_neg())
    }
}

impl<H, const REVERSED: bool> AddAssign<isize> for PartitionCursor<'_, H, REVERSED> {
    fn add_assign(&mut self, n: isize) {
        *self = self.shifted(n);
    }
}

impl<H, const REVERSED: bool> SubAssign<isize> for PartitionCursor<'_, H, REVERSED> {
    fn sub_assign(&mut self, n: isize) {
        *self = self.shifted(n.wrapping_neg());
    }
}

impl<'a, H, const REVERSED: bool> Sub for PartitionCursor<'a, H, REVERSED> {
    type Output = isize;

    /// `a - b`: steps from `b` to `a`.
    fn sub(self, other: Self) -> isize {
        other.distance_to(&self)
    }
}

/// A `[begin, end)` cursor pair, iterated as a standard iterator.
pub struct PartitionRange<'a, H, const REVERSED: bool> {
    front: PartitionCursor<'a, H, REVERSED>,
    back: PartitionCursor<'a, H, REVERSED>,
}

impl<'a, H, const REVERSED: bool> PartitionRange<'a, H, REVERSED> {
    #[inline]
    pub(crate) fn new(
        front: PartitionCursor<'a, H, REVERSED>,
        back: PartitionCursor<'a, H, REVERSED>,
    ) -> Self {
        Self { front, back }
    }

    /// The cursor at the next element.
    pub fn begin(&self) -> PartitionCursor<'a, H, REVERSED> {
        self.front
    }

    /// The one-past-the-end cursor.
    pub fn end(&self) -> PartitionCursor<'a, H, REVERSED> {
        self.back
    }
}

impl<H, const REVERSED: bool> Clone for PartitionRange<'_, H, REVERSED> {
    fn clone(&self) -> Self {
        Self {
            front: self.front,
            back: self.back,
        }
    }
}

impl<H, const REVERSED: bool> fmt::Debug for PartitionRange<'_, H, REVERSED> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartitionRange")
            .field("front", &self.front)
            .field("back", &self.back)
            .finish()
    }
}

impl<'a, H, const REVERSED: bool> Iterator for PartitionRange<'a, H, REVERSED> {
    type Item = &'a H;

    fn next(&mut self) -> Option<&'a H> {
        if self.front.distance_to(&self.back) <= 0 {
            return None;
        }
        let item = self.front.get();
        self.front += 1;
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.front.distance_to(&self.back).max(0) as usize;
        (n, Some(n))
    }
}

impl<'a, H, const REVERSED: bool> DoubleEndedIterator for PartitionRange<'a, H, REVERSED> {
    fn next_back(&mut self) -> Option<&'a H> {
        if self.front.distance_to(&self.back) <= 0 {
            return None;
        }
        self.back -= 1;
        self.back.get()
    }
}

impl<H, const REVERSED: bool> ExactSizeIterator for PartitionRange<'_, H, REVERSED> {}

impl<H, const REVERSED: bool> FusedIterator for PartitionRange<'_, H, REVERSED> {}
