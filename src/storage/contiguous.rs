//! Every partition back to back in one flat store.
//!
//! Partition `i` occupies `data[bounds.start(i)..bounds.end(i)]`. Splicing an
//! element into partition `i` moves the tail of the store and bumps every
//! boundary from `i` onwards, so inserts near the back are cheapest.
//!
//! ### Performance Characteristics
//!
//! | Operation | Cost |
//! |---|---|
//! | `begin_partition` / `end_partition` | O(1) |
//! | `add_slot` | O(1) amortized |
//! | `insert_slot` / `erase_slot` | O(P) (+ erased elements) |
//! | `push_back_to_partition` / `insert_to_partition` | O(elements after the insertion point + P) |
//! | `swap_partitions(i, j)` | O(elements between the two partitions) |

use core::fmt;
use core::marker::PhantomData;
use core::ops::Range;

use crate::error::{StorageError, StorageResult};
use crate::storage::{
    check_offset, check_partition, Boundaries, DebugHandles, ForwardCursor, Independent,
    Ownership, PartitionPosition, PartitionRange, PartitionedStorage, RangeCheck, ReverseCursor,
    Strict, NPOS,
};

/// A partitioned sequence stored contiguously.
pub struct PartitionedVec<T, O: Ownership<T> = Independent, C = Strict> {
    data: Vec<O::Handle>,
    bounds: Boundaries,
    owner: O,
    _marker: PhantomData<(fn() -> T, C)>,
}

impl<T, O: Ownership<T> + Default, C: RangeCheck> PartitionedVec<T, O, C> {
    /// Creates an empty sequence with no partitions.
    pub fn new() -> Self {
        Self::with_owner(O::default())
    }

    /// Builds a sequence with one partition per inner iterator.
    pub fn from_partitions<P, I>(partitions: P) -> Self
    where
        P: IntoIterator<Item = I>,
        I: IntoIterator<Item = T>,
    {
        let mut seq = Self::new();
        seq.extend_partitions(partitions);
        seq
    }
}

impl<T, O: Ownership<T>, C: RangeCheck> PartitionedVec<T, O, C> {
    /// Creates an empty sequence using `owner` to store elements.
    pub fn with_owner(owner: O) -> Self {
        Self {
            data: Vec::new(),
            bounds: Boundaries::new(),
            owner,
            _marker: PhantomData,
        }
    }

    fn extend_partitions<P, I>(&mut self, partitions: P)
    where
        P: IntoIterator<Item = I>,
        I: IntoIterator<Item = T>,
    {
        for partition in partitions {
            let owner = &mut self.owner;
            self.data.extend(partition.into_iter().map(|v| owner.make(v)));
            let total = self.data.len();
            self.bounds.push_empty();
            let last = self.bounds.len() - 1;
            self.bounds.shift_up(last.., total - self.bounds.start(last));
        }
    }

    /// Number of partitions.
    #[inline]
    pub fn num_partitions(&self) -> usize {
        self.bounds.len()
    }

    /// Total number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if no element is stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The boundary sequence.
    #[inline]
    pub fn boundaries(&self) -> &Boundaries {
        &self.bounds
    }

    /// The ownership handler.
    pub fn owner(&self) -> &O {
        &self.owner
    }

    /// Mutable access to the ownership handler.
    pub fn owner_mut(&mut self) -> &mut O {
        &mut self.owner
    }

    /// Number of elements in partition `i`.
    #[inline]
    pub fn partition_len(&self, i: usize) -> Option<usize> {
        self.bounds.bounds(i).map(|r| r.len())
    }

    /// The handles of partition `i` as a slice.
    pub fn partition_slice(&self, i: usize) -> Option<&[O::Handle]> {
        self.bounds.bounds(i).map(|r| &self.data[r])
    }

    /// The handles of partition `i` as a mutable slice.
    pub fn partition_mut(&mut self, i: usize) -> Option<&mut [O::Handle]> {
        let range = self.bounds.bounds(i)?;
        Some(&mut self.data[range])
    }

    /// The whole flat store.
    pub fn as_slice(&self) -> &[O::Handle] {
        &self.data
    }

    /// The handle at `pos`.
    pub fn get(&self, pos: PartitionPosition) -> Option<&O::Handle> {
        let range = self.bounds.bounds(pos.partition)?;
        if pos.offset < range.len() {
            self.data.get(range.start + pos.offset)
        } else {
            None
        }
    }

    /// The handle at `pos`, mutably.
    pub fn get_mut(&mut self, pos: PartitionPosition) -> Option<&mut O::Handle> {
        let range = self.bounds.bounds(pos.partition)?;
        if pos.offset < range.len() {
            self.data.get_mut(range.start + pos.offset)
        } else {
            None
        }
    }

    /// The value at `pos`.
    pub fn read(&self, pos: PartitionPosition) -> Option<O::Ref<'_>> {
        self.get(pos).map(O::read)
    }

    /// The values of partition `i`, front to back.
    pub fn values(&self, i: usize) -> impl Iterator<Item = O::Ref<'_>> + '_ {
        self.partition(i).map(O::read)
    }

    /// Forward cursor at the first element of partition `i`.
    pub fn begin_partition(&self, i: usize) -> ForwardCursor<'_, O::Handle> {
        match self.bounds.bounds(i) {
            Some(r) => ForwardCursor::new(&self.data, r.start, r.start, i),
            None => self.npos_cursor(),
        }
    }

    /// Forward cursor one past the last element of partition `i`.
    pub fn end_partition(&self, i: usize) -> ForwardCursor<'_, O::Handle> {
        match self.bounds.bounds(i) {
            Some(r) => ForwardCursor::new(&self.data, r.start, r.end, i),
            None => self.npos_cursor(),
        }
    }

    /// Reverse cursor at the last element of partition `i`.
    pub fn rbegin_partition(&self, i: usize) -> ReverseCursor<'_, O::Handle> {
        match self.bounds.bounds(i) {
            Some(r) => ReverseCursor::new(&self.data, r.start, r.end, i),
            None => ReverseCursor::new(&self.data, 0, 0, NPOS),
        }
    }

    /// Reverse cursor one before the first element of partition `i`.
    pub fn rend_partition(&self, i: usize) -> ReverseCursor<'_, O::Handle> {
        match self.bounds.bounds(i) {
            Some(r) => ReverseCursor::new(&self.data, r.start, r.start, i),
            None => ReverseCursor::new(&self.data, 0, 0, NPOS),
        }
    }

    fn npos_cursor(&self) -> ForwardCursor<'_, O::Handle> {
        let end = self.data.len();
        ForwardCursor::new(&self.data, end, end, NPOS)
    }

    /// Handles of partition `i`, front to back.
    pub fn partition(&self, i: usize) -> PartitionRange<'_, O::Handle, false> {
        PartitionRange::new(self.begin_partition(i), self.end_partition(i))
    }

    /// Handles of partition `i`, back to front.
    pub fn rpartition(&self, i: usize) -> PartitionRange<'_, O::Handle, true> {
        PartitionRange::new(self.rbegin_partition(i), self.rend_partition(i))
    }

    /// Element range of partition `i`, or `None` if the policy swallowed an
    /// invalid index.
    fn checked_bounds(&self, method: &'static str, i: usize) -> StorageResult<Option<Range<usize>>> {
        if check_partition::<C>(method, i, self.num_partitions())? {
            Ok(self.bounds.bounds(i))
        } else {
            Ok(None)
        }
    }

    fn checked_position(
        &self,
        method: &'static str,
        pos: PartitionPosition,
        allow_end: bool,
    ) -> StorageResult<Option<Range<usize>>> {
        let Some(range) = self.checked_bounds(method, pos.partition)? else {
            return Ok(None);
        };
        if check_offset::<C>(method, pos, range.len(), allow_end)? {
            Ok(Some(range))
        } else {
            Ok(None)
        }
    }

    /// Appends an empty partition.
    pub fn add_slot(&mut self) {
        self.bounds.push_empty();
    }

    /// Inserts an empty partition before partition `pos`; `pos ==
    /// num_partitions()` appends.
    pub fn insert_slot(&mut self, pos: usize) -> StorageResult<()> {
        if check_partition::<C>("insert_slot", pos, self.num_partitions() + 1)? {
            self.bounds.insert_empty(pos);
        }
        Ok(())
    }

    /// Removes partition `n` together with its elements.
    pub fn erase_slot(&mut self, n: usize) -> StorageResult<()> {
        if check_partition::<C>("erase_slot", n, self.num_partitions())? {
            let erased = self.bounds.remove(n);
            self.data.drain(erased);
        }
        Ok(())
    }

    /// Appends `value` to partition `i`.
    pub fn push_back_to_partition(&mut self, i: usize, value: T) -> StorageResult<PartitionPosition> {
        let Some(range) = self.checked_bounds("push_back_to_partition", i)? else {
            return Ok(PartitionPosition::NONE);
        };
        let handle = self.owner.make(value);
        self.data.insert(range.end, handle);
        self.bounds.shift_up(i.., 1);
        Ok(PartitionPosition::new(i, range.len()))
    }

    /// Inserts `value` before `pos`.
    pub fn insert_to_partition(
        &mut self,
        pos: PartitionPosition,
        value: T,
    ) -> StorageResult<PartitionPosition> {
        let Some(range) = self.checked_position("insert_to_partition", pos, true)? else {
            return Ok(PartitionPosition::NONE);
        };
        let handle = self.owner.make(value);
        self.data.insert(range.start + pos.offset, handle);
        self.bounds.shift_up(pos.partition.., 1);
        Ok(pos)
    }

    /// Removes the element at `pos`.
    pub fn erase_from_partition(&mut self, pos: PartitionPosition) -> StorageResult<PartitionPosition> {
        let Some(range) = self.checked_position("erase_from_partition", pos, false)? else {
            return Ok(PartitionPosition::NONE);
        };
        self.data.remove(range.start + pos.offset);
        self.bounds.shift_down(pos.partition.., 1);
        Ok(pos)
    }

    /// Removes the elements in `[first, last)`.
    pub fn erase_range_from_partition(
        &mut self,
        first: PartitionPosition,
        last: PartitionPosition,
    ) -> StorageResult<PartitionPosition> {
        if !C::verify(first.partition == last.partition, || {
            StorageError::MismatchedPartitions {
                first: first.partition,
                last: last.partition,
            }
        })? {
            return Ok(PartitionPosition::NONE);
        }
        let method = "erase_range_from_partition";
        let Some(range) = self.checked_position(method, last, true)? else {
            return Ok(PartitionPosition::NONE);
        };
        if !check_offset::<C>(method, first, last.offset, true)? {
            return Ok(PartitionPosition::NONE);
        }
        let count = last.offset - first.offset;
        if count > 0 {
            let start = range.start + first.offset;
            self.data.drain(start..start + count);
            self.bounds.shift_down(first.partition.., count);
        }
        Ok(first)
    }

    /// Exchanges the contents of partitions `i` and `j`.
    ///
    /// Elements of every partition strictly between `i` and `j` move by the
    /// size difference, but all other partitions keep their positions.
    pub fn swap_partitions(&mut self, i: usize, j: usize) -> StorageResult<()> {
        let partitions = self.num_partitions();
        if !check_partition::<C>("swap_partitions", i, partitions)?
            || !check_partition::<C>("swap_partitions", j, partitions)?
            || i == j
        {
            return Ok(());
        }
        let (i, j) = if i < j { (i, j) } else { (j, i) };
        let (Some(ri), Some(rj)) = (self.bounds.bounds(i), self.bounds.bounds(j)) else {
            return Ok(());
        };
        let (len_i, len_j) = (ri.len(), rj.len());

        for k in 0..len_i.min(len_j) {
            self.data.swap(ri.start + k, rj.start + k);
        }

        if len_i > len_j {
            // [j's elements][rest of i][between][head of i] -> [j][between][i]
            let excess = len_i - len_j;
            self.data[ri.start + len_j..rj.end].rotate_left(excess);
            self.bounds.shift_down(i..j, excess);
        } else if len_j > len_i {
            // [head of j][between][i][rest of j] -> [j][between][i]
            let excess = len_j - len_i;
            self.data[ri.start + len_i..rj.end].rotate_right(excess);
            self.bounds.shift_up(i..j, excess);
        }
        Ok(())
    }

    /// Reserves room for `additional` more elements.
    pub fn reserve(&mut self, additional: usize) {
        self.data.reserve(additional);
    }

    /// Reserves room for `additional` more partitions.
    pub fn reserve_partitions(&mut self, additional: usize) {
        self.bounds.reserve(additional);
    }

    /// Element capacity of the flat store.
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// Partition capacity of the boundary sequence.
    pub fn partitions_capacity(&self) -> usize {
        self.bounds.capacity()
    }

    /// Releases spare capacity of both the store and the boundaries.
    pub fn shrink_to_fit(&mut self) {
        self.data.shrink_to_fit();
        self.bounds.shrink_to_fit();
    }

    /// Removes every partition and element.
    pub fn clear(&mut self) {
        self.data.clear();
        self.bounds.clear();
    }

    /// Copies the values out, one `Vec` per partition.
    pub fn to_vecs(&self) -> Vec<Vec<T>>
    where
        T: Clone,
    {
        (0..self.num_partitions())
            .map(|i| self.values(i).map(|v| (*v).clone()).collect())
            .collect()
    }
}

impl<T, O: Ownership<T>, C: RangeCheck> PartitionedStorage for PartitionedVec<T, O, C> {
    type Value = T;
    type Handle = O::Handle;
    type Ref<'a>
        = O::Ref<'a>
    where
        Self: 'a;

    #[inline]
    fn resolve<'a>(handle: &'a O::Handle) -> O::Ref<'a>
    where
        Self: 'a,
    {
        O::read(handle)
    }

    fn num_partitions(&self) -> usize {
        self.num_partitions()
    }

    fn len(&self) -> usize {
        self.len()
    }

    fn partition_len(&self, i: usize) -> Option<usize> {
        self.partition_len(i)
    }

    fn begin_partition(&self, i: usize) -> ForwardCursor<'_, O::Handle> {
        self.begin_partition(i)
    }

    fn end_partition(&self, i: usize) -> ForwardCursor<'_, O::Handle> {
        self.end_partition(i)
    }

    fn rbegin_partition(&self, i: usize) -> ReverseCursor<'_, O::Handle> {
        self.rbegin_partition(i)
    }

    fn rend_partition(&self, i: usize) -> ReverseCursor<'_, O::Handle> {
        self.rend_partition(i)
    }

    fn read(&self, pos: PartitionPosition) -> Option<O::Ref<'_>> {
        self.read(pos)
    }

    fn add_slot(&mut self) {
        self.add_slot();
    }

    fn insert_slot(&mut self, pos: usize) -> StorageResult<()> {
        self.insert_slot(pos)
    }

    fn erase_slot(&mut self, n: usize) -> StorageResult<()> {
        self.erase_slot(n)
    }

    fn push_back_to_partition(&mut self, i: usize, value: T) -> StorageResult<PartitionPosition> {
        self.push_back_to_partition(i, value)
    }

    fn insert_to_partition(
        &mut self,
        pos: PartitionPosition,
        value: T,
    ) -> StorageResult<PartitionPosition> {
        self.insert_to_partition(pos, value)
    }

    fn erase_from_partition(&mut self, pos: PartitionPosition) -> StorageResult<PartitionPosition> {
        self.erase_from_partition(pos)
    }

    fn erase_range_from_partition(
        &mut self,
        first: PartitionPosition,
        last: PartitionPosition,
    ) -> StorageResult<PartitionPosition> {
        self.erase_range_from_partition(first, last)
    }

    fn swap_partitions(&mut self, i: usize, j: usize) -> StorageResult<()> {
        self.swap_partitions(i, j)
    }

    fn reserve_partitions(&mut self, additional: usize) {
        self.reserve_partitions(additional);
    }

    fn shrink_to_fit(&mut self) {
        self.shrink_to_fit();
    }

    fn clear(&mut self) {
        self.clear();
    }
}

impl<T, O: Ownership<T> + Default, C: RangeCheck> Default for PartitionedVec<T, O, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, O: Ownership<T> + Default, C: RangeCheck, I> FromIterator<I> for PartitionedVec<T, O, C>
where
    I: IntoIterator<Item = T>,
{
    fn from_iter<P: IntoIterator<Item = I>>(partitions: P) -> Self {
        Self::from_partitions(partitions)
    }
}

impl<T: PartialEq, O: Ownership<T>, C> PartialEq for PartitionedVec<T, O, C> {
    fn eq(&self, other: &Self) -> bool {
        self.bounds == other.bounds
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(a, b)| O::equivalent(a, b))
    }
}

impl<T: Eq, O: Ownership<T>, C> Eq for PartitionedVec<T, O, C> {}

/// A clone owns fresh storage: pooled elements are re-pooled in a new pool.
impl<T: Clone, O: Ownership<T>, C: RangeCheck> Clone for PartitionedVec<T, O, C> {
    fn clone(&self) -> Self {
        let mut owner = self.owner.fresh();
        let data = self
            .data
            .iter()
            .map(|h| owner.make((*O::read(h)).clone()))
            .collect();
        Self {
            data,
            bounds: self.bounds.clone(),
            owner,
            _marker: PhantomData,
        }
    }
}

impl<T: fmt::Debug, O: Ownership<T>, C: RangeCheck> fmt::Debug for PartitionedVec<T, O, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for i in 0..self.num_partitions() {
            if let Some(handles) = self.partition_slice(i) {
                list.entry(&DebugHandles::<T, O>::new(handles));
            }
        }
        list.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::storage::{Lenient, Pooled};

    fn sample() -> PartitionedVec<i32> {
        PartitionedVec::from_partitions(vec![vec![3], vec![4], vec![9, -3]])
    }

    fn ends(seq: &PartitionedVec<i32>) -> Vec<usize> {
        seq.boundaries().iter().copied().collect()
    }

    #[test]
    fn insert_at_front_of_middle_partition() {
        let mut seq = sample();
        let pos = seq
            .insert_to_partition(PartitionPosition::new(1, 0), 2)
            .unwrap();

        assert_eq!(pos, PartitionPosition::new(1, 0));
        assert_eq!(seq.to_vecs(), vec![vec![3], vec![2, 4], vec![9, -3]]);
        assert_eq!(ends(&seq), vec![1, 3, 5]);
    }

    #[test]
    fn push_back_and_erase_update_boundaries() {
        let mut seq = sample();
        assert_eq!(seq.push_back_to_partition(0, 8).unwrap(), PartitionPosition::new(0, 1));
        assert_eq!(ends(&seq), vec![2, 3, 5]);

        let next = seq.erase_from_partition(PartitionPosition::new(2, 0)).unwrap();
        assert_eq!(seq.read(next).map(|v| *v), Some(-3));
        assert_eq!(seq.to_vecs(), vec![vec![3, 8], vec![4], vec![-3]]);
        assert_eq!(ends(&seq), vec![2, 3, 4]);
    }

    #[test]
    fn slots_can_be_inserted_and_erased_anywhere() {
        let mut seq = sample();
        seq.insert_slot(1).unwrap();
        seq.insert_slot(4).unwrap();
        assert_eq!(seq.to_vecs(), vec![vec![3], vec![], vec![4], vec![9, -3], vec![]]);

        seq.erase_slot(3).unwrap();
        assert_eq!(seq.to_vecs(), vec![vec![3], vec![], vec![4], vec![]]);
        assert_eq!(ends(&seq), vec![1, 1, 2, 2]);
        assert_eq!(seq.len(), 2);
    }

    #[test]
    fn swap_partitions_keeps_outer_partitions_in_place() {
        let mut seq: PartitionedVec<i32> =
            PartitionedVec::from_partitions(vec![vec![0], vec![1, 2, 3], vec![4], vec![5], vec![6]]);
        seq.swap_partitions(1, 3).unwrap();
        assert_eq!(seq.to_vecs(), vec![vec![0], vec![5], vec![4], vec![1, 2, 3], vec![6]]);
        assert_eq!(seq.as_slice()[0], 0);
        assert_eq!(seq.as_slice()[6], 6);

        seq.swap_partitions(3, 1).unwrap();
        assert_eq!(seq.to_vecs(), vec![vec![0], vec![1, 2, 3], vec![4], vec![5], vec![6]]);
    }

    #[test]
    fn swap_with_an_empty_partition() {
        let mut seq: PartitionedVec<i32> =
            PartitionedVec::from_partitions(vec![vec![], vec![7], vec![8, 9]]);
        seq.swap_partitions(0, 2).unwrap();
        assert_eq!(seq.to_vecs(), vec![vec![8, 9], vec![7], vec![]]);
        assert_eq!(ends(&seq), vec![2, 3, 3]);
    }

    #[test]
    fn range_erase_rejects_mismatched_partitions() {
        let mut seq = sample();
        let err = seq
            .erase_range_from_partition(PartitionPosition::new(0, 0), PartitionPosition::new(2, 1))
            .unwrap_err();
        assert_eq!(err, StorageError::MismatchedPartitions { first: 0, last: 2 });

        seq.erase_range_from_partition(PartitionPosition::new(2, 0), PartitionPosition::new(2, 2))
            .unwrap();
        assert_eq!(seq.to_vecs(), vec![vec![3], vec![4], vec![]]);
    }

    #[test]
    fn strict_policy_reports_range_errors() {
        let mut seq = sample();
        assert!(matches!(
            seq.push_back_to_partition(3, 1),
            Err(StorageError::PartitionOutOfRange { index: 3, partitions: 3, .. })
        ));
        assert!(matches!(
            seq.erase_from_partition(PartitionPosition::new(1, 1)),
            Err(StorageError::PositionOutOfRange { len: 1, .. })
        ));

        let mut empty: PartitionedVec<i32> = PartitionedVec::new();
        assert!(matches!(
            empty.push_back_to_partition(0, 1),
            Err(StorageError::NoPartitions { .. })
        ));
        assert_eq!(seq, sample());
    }

    #[test]
    fn lenient_policy_turns_failures_into_no_ops() {
        let mut seq: PartitionedVec<i32, Independent, Lenient> =
            PartitionedVec::from_partitions(vec![vec![1]]);
        assert_eq!(seq.push_back_to_partition(5, 2), Ok(PartitionPosition::NONE));
        assert_eq!(seq.erase_slot(9), Ok(()));
        assert_eq!(seq.swap_partitions(0, 4), Ok(()));
        assert_eq!(seq.to_vecs(), vec![vec![1]]);
    }

    #[test]
    fn cursors_for_missing_partitions_are_npos() {
        let seq = sample();
        assert_eq!(seq.begin_partition(7).partition_index(), NPOS);
        assert_eq!(seq.begin_partition(7), seq.end_partition(7));
        assert_eq!(seq.rbegin_partition(7), seq.rend_partition(7));
        assert_eq!(seq.partition(7).count(), 0);
    }

    #[test]
    fn reverse_ranges_walk_partitions_backwards() {
        let seq = sample();
        let back: Vec<i32> = seq.rpartition(2).copied().collect();
        assert_eq!(back, vec![-3, 9]);
        assert_eq!(seq.rbegin_partition(2).position(), PartitionPosition::new(2, 1));
    }

    #[test]
    fn pooled_sequences_share_equal_values() {
        let mut seq: PartitionedVec<i32, Pooled<i32>> = PartitionedVec::new();
        seq.add_slot();
        seq.add_slot();
        seq.push_back_to_partition(0, 5).unwrap();
        seq.push_back_to_partition(1, 5).unwrap();
        assert_eq!(seq.owner().pool().len(), 1);

        if let Some(handle) = seq.get(PartitionPosition::new(0, 0)) {
            handle.set(6);
        }
        assert_eq!(seq.to_vecs(), vec![vec![6], vec![6]]);
    }

    #[test]
    fn pooled_clones_do_not_alias() {
        let mut seq: PartitionedVec<i32, Pooled<i32>> =
            PartitionedVec::from_partitions(vec![vec![1, 2]]);
        let copy = seq.clone();
        assert_eq!(seq, copy);

        if let Some(handle) = seq.get_mut(PartitionPosition::new(0, 0)) {
            handle.set(10);
        }
        assert_ne!(seq, copy);
        assert_eq!(copy.to_vecs(), vec![vec![1, 2]]);
    }

    #[test]
    fn debug_prints_nested_values() {
        assert_eq!(format!("{:?}", sample()), "[[3], [4], [9, -3]]");
    }
}
