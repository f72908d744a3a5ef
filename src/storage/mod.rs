//! Partitioned element storage.
//!
//! A partitioned sequence is one logical arena split into an ordered list of
//! partitions. Two backends implement the same [`PartitionedStorage`] API:
//!
//! | Backend | Layout | Insert into partition `i` | `swap_partitions` |
//! |---|---|---|---|
//! | [`PartitionedVec`] | flat store + [`Boundaries`] | O(elements after `i`) + O(P) | O(span between `i` and `j`) |
//! | [`BucketedVec`] | one `Vec` per partition | O(1) amortized | O(1) |
//!
//! Both are parameterised by an [`Ownership`] handler (by-value or pooled)
//! and a [`RangeCheck`] policy (`Strict` errors or `Lenient` no-ops).

pub mod boundaries;
pub mod bucketed;
pub mod checking;
pub mod contiguous;
pub mod cursor;
pub mod ownership;
pub mod pool;

use core::fmt;
use core::marker::PhantomData;
use core::ops::Deref;

pub use boundaries::Boundaries;
pub use bucketed::BucketedVec;
pub use checking::{Lenient, RangeCheck, Strict};
pub use contiguous::PartitionedVec;
pub use cursor::{
    ForwardCursor, PartitionCursor, PartitionPosition, PartitionRange, ReverseCursor, NPOS,
};
pub use ownership::{Independent, Ownership, Pooled};
pub use pool::{DataPool, SharedHandle};

use crate::error::{StorageError, StorageResult};

/// The storage API a graph façade consumes.
///
/// Index-taking accessors return `None` (or an `NPOS` cursor) for an
/// out-of-range partition; index-taking mutators validate through the
/// backend's [`RangeCheck`] policy before touching any state.
pub trait PartitionedStorage {
    /// Logical element type.
    type Value;
    /// What is physically stored per element.
    type Handle;
    /// Dereferenced view of a handle.
    type Ref<'a>: Deref<Target = Self::Value>
    where
        Self: 'a;

    /// Resolves a stored handle to its value.
    fn resolve<'a>(handle: &'a Self::Handle) -> Self::Ref<'a>
    where
        Self: 'a;

    /// Number of partitions.
    fn num_partitions(&self) -> usize;

    /// Total number of elements across all partitions.
    fn len(&self) -> usize;

    /// Returns `true` if no partition holds an element.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of elements in partition `i`.
    fn partition_len(&self, i: usize) -> Option<usize>;

    /// Forward cursor at the first element of partition `i`.
    fn begin_partition(&self, i: usize) -> ForwardCursor<'_, Self::Handle>;

    /// Forward cursor one past the last element of partition `i`.
    fn end_partition(&self, i: usize) -> ForwardCursor<'_, Self::Handle>;

    /// Reverse cursor at the last element of partition `i`.
    fn rbegin_partition(&self, i: usize) -> ReverseCursor<'_, Self::Handle>;

    /// Reverse cursor one before the first element of partition `i`.
    fn rend_partition(&self, i: usize) -> ReverseCursor<'_, Self::Handle>;

    /// Handles of partition `i`, front to back.
    fn partition(&self, i: usize) -> PartitionRange<'_, Self::Handle, false> {
        PartitionRange::new(self.begin_partition(i), self.end_partition(i))
    }

    /// Handles of partition `i`, back to front.
    fn rpartition(&self, i: usize) -> PartitionRange<'_, Self::Handle, true> {
        PartitionRange::new(self.rbegin_partition(i), self.rend_partition(i))
    }

    /// The value at `pos`.
    fn read(&self, pos: PartitionPosition) -> Option<Self::Ref<'_>>;

    /// Appends an empty partition.
    fn add_slot(&mut self);

    /// Inserts an empty partition before partition `pos`.
    fn insert_slot(&mut self, pos: usize) -> StorageResult<()>;

    /// Removes partition `n` and its elements.
    fn erase_slot(&mut self, n: usize) -> StorageResult<()>;

    /// Appends `value` to partition `i`.
    fn push_back_to_partition(
        &mut self,
        i: usize,
        value: Self::Value,
    ) -> StorageResult<PartitionPosition>;

    /// Inserts `value` before `pos`; returns the position of the new element.
    fn insert_to_partition(
        &mut self,
        pos: PartitionPosition,
        value: Self::Value,
    ) -> StorageResult<PartitionPosition>;

    /// Removes the element at `pos`; returns the position of its successor.
    fn erase_from_partition(&mut self, pos: PartitionPosition) -> StorageResult<PartitionPosition>;

    /// Removes `[first, last)`; both ends must lie in the same partition.
    fn erase_range_from_partition(
        &mut self,
        first: PartitionPosition,
        last: PartitionPosition,
    ) -> StorageResult<PartitionPosition>;

    /// Exchanges the contents of partitions `i` and `j`.
    fn swap_partitions(&mut self, i: usize, j: usize) -> StorageResult<()>;

    /// Reserves room for `additional` more partitions.
    fn reserve_partitions(&mut self, additional: usize);

    /// Releases spare capacity.
    fn shrink_to_fit(&mut self);

    /// Removes every partition and element.
    fn clear(&mut self);
}

/// The error for a rejected partition index.
pub(crate) fn partition_error(method: &'static str, index: usize, partitions: usize) -> StorageError {
    if partitions == 0 {
        StorageError::NoPartitions { method }
    } else {
        StorageError::PartitionOutOfRange {
            method,
            index,
            partitions,
        }
    }
}

/// Validates a partition index under policy `C`.
#[inline]
pub(crate) fn check_partition<C: RangeCheck>(
    method: &'static str,
    index: usize,
    partitions: usize,
) -> StorageResult<bool> {
    C::verify(index < partitions, || partition_error(method, index, partitions))
}

/// Validates an in-partition offset under policy `C`; `allow_end` accepts
/// the one-past-the-end offset (insertion points).
#[inline]
pub(crate) fn check_offset<C: RangeCheck>(
    method: &'static str,
    pos: PartitionPosition,
    len: usize,
    allow_end: bool,
) -> StorageResult<bool> {
    let valid = if allow_end {
        pos.offset <= len
    } else {
        pos.offset < len
    };
    C::verify(valid, || StorageError::PositionOutOfRange {
        method,
        partition: pos.partition,
        position: pos.offset,
        len,
    })
}

/// `Debug` adapter printing a run of handles as their values.
pub(crate) struct DebugHandles<'a, T, O: Ownership<T>> {
    handles: &'a [O::Handle],
    _marker: PhantomData<fn() -> T>,
}

impl<'a, T, O: Ownership<T>> DebugHandles<'a, T, O> {
    pub(crate) fn new(handles: &'a [O::Handle]) -> Self {
        Self {
            handles,
            _marker: PhantomData,
        }
    }
}

impl<T: fmt::Debug, O: Ownership<T>> fmt::Debug for DebugHandles<'_, T, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for handle in self.handles {
            list.entry(&*O::read(handle));
        }
        list.finish()
    }
}
