//! `BucketedVec`: one independent `Vec` per partition.
//!
//! No boundary sequence is kept; partition `i` is simply `buckets[i]`. Growing
//! one partition never moves another, and `swap_partitions` swaps two bucket
//! headers. Cursors are confined to their bucket, so stepping past a
//! partition's ends yields `None` instead of a neighbour's element.

use core::fmt;
use core::marker::PhantomData;

use crate::error::{StorageError, StorageResult};
use crate::storage::{
    check_offset, check_partition, DebugHandles, ForwardCursor, Independent, Ownership,
    PartitionPosition, PartitionRange, PartitionedStorage, RangeCheck, ReverseCursor, Strict,
    NPOS,
};

/// A partitioned sequence stored as one bucket per partition.
pub struct BucketedVec<T, O: Ownership<T> = Independent, C = Strict> {
    buckets: Vec<Vec<O::Handle>>,
    owner: O,
    _marker: PhantomData<(fn() -> T, C)>,
}

impl<T, O: Ownership<T> + Default, C: RangeCheck> BucketedVec<T, O, C> {
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
        for partition in partitions {
            let owner = &mut seq.owner;
            seq.buckets
                .push(partition.into_iter().map(|v| owner.make(v)).collect());
        }
        seq
    }
}

impl<T, O: Ownership<T>, C: RangeCheck> BucketedVec<T, O, C> {
    /// Creates an empty sequence using `owner` to store elements.
    pub fn with_owner(owner: O) -> Self {
        Self {
            buckets: Vec::new(),
            owner,
            _marker: PhantomData,
        }
    }

    /// Number of partitions.
    #[inline]
    pub fn num_partitions(&self) -> usize {
        self.buckets.len()
    }

    /// Total number of elements; O(P).
    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    /// Returns `true` if no partition holds an element.
    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(Vec::is_empty)
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
        self.buckets.get(i).map(Vec::len)
    }

    /// The bucket of partition `i`.
    pub fn partition_slice(&self, i: usize) -> Option<&[O::Handle]> {
        self.buckets.get(i).map(Vec::as_slice)
    }

    /// The bucket of partition `i`, mutably.
    pub fn partition_mut(&mut self, i: usize) -> Option<&mut [O::Handle]> {
        self.buckets.get_mut(i).map(Vec::as_mut_slice)
    }

    /// The handle at `pos`.
    pub fn get(&self, pos: PartitionPosition) -> Option<&O::Handle> {
        self.buckets.get(pos.partition)?.get(pos.offset)
    }

    /// The handle at `pos`, mutably.
    pub fn get_mut(&mut self, pos: PartitionPosition) -> Option<&mut O::Handle> {
        self.buckets.get_mut(pos.partition)?.get_mut(pos.offset)
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
        match self.buckets.get(i) {
            Some(bucket) => ForwardCursor::new(bucket, 0, 0, i),
            None => ForwardCursor::new(&[], 0, 0, NPOS),
        }
    }

    /// Forward cursor one past the last element of partition `i`.
    pub fn end_partition(&self, i: usize) -> ForwardCursor<'_, O::Handle> {
        match self.buckets.get(i) {
            Some(bucket) => ForwardCursor::new(bucket, 0, bucket.len(), i),
            None => ForwardCursor::new(&[], 0, 0, NPOS),
        }
    }

    /// Reverse cursor at the last element of partition `i`.
    pub fn rbegin_partition(&self, i: usize) -> ReverseCursor<'_, O::Handle> {
        match self.buckets.get(i) {
            Some(bucket) => ReverseCursor::new(bucket, 0, bucket.len(), i),
            None => ReverseCursor::new(&[], 0, 0, NPOS),
        }
    }

    /// Reverse cursor one before the first element of partition `i`.
    pub fn rend_partition(&self, i: usize) -> ReverseCursor<'_, O::Handle> {
        match self.buckets.get(i) {
            Some(bucket) => ReverseCursor::new(bucket, 0, 0, i),
            None => ReverseCursor::new(&[], 0, 0, NPOS),
        }
    }

    /// Handles of partition `i`, front to back.
    pub fn partition(&self, i: usize) -> PartitionRange<'_, O::Handle, false> {
        PartitionRange::new(self.begin_partition(i), self.end_partition(i))
    }

    /// Handles of partition `i`, back to front.
    pub fn rpartition(&self, i: usize) -> PartitionRange<'_, O::Handle, true> {
        PartitionRange::new(self.rbegin_partition(i), self.rend_partition(i))
    }

    fn checked_bucket(
        &mut self,
        method: &'static str,
        pos: PartitionPosition,
        allow_end: bool,
    ) -> StorageResult<Option<&mut Vec<O::Handle>>> {
        if !check_partition::<C>(method, pos.partition, self.buckets.len())? {
            return Ok(None);
        }
        let bucket = &mut self.buckets[pos.partition];
        if check_offset::<C>(method, pos, bucket.len(), allow_end)? {
            Ok(Some(bucket))
        } else {
            Ok(None)
        }
    }

    /// Appends an empty partition.
    pub fn add_slot(&mut self) {
        self.buckets.push(Vec::new());
    }

    /// Inserts an empty partition before partition `pos`; `pos ==
    /// num_partitions()` appends.
    pub fn insert_slot(&mut self, pos: usize) -> StorageResult<()> {
        if check_partition::<C>("insert_slot", pos, self.buckets.len() + 1)? {
            self.buckets.insert(pos, Vec::new());
        }
        Ok(())
    }

    /// Removes partition `n` together with its elements.
    pub fn erase_slot(&mut self, n: usize) -> StorageResult<()> {
        if check_partition::<C>("erase_slot", n, self.buckets.len())? {
            self.buckets.remove(n);
        }
        Ok(())
    }

    /// Appends `value` to partition `i`.
    pub fn push_back_to_partition(&mut self, i: usize, value: T) -> StorageResult<PartitionPosition> {
        if !check_partition::<C>("push_back_to_partition", i, self.buckets.len())? {
            return Ok(PartitionPosition::NONE);
        }
        let handle = self.owner.make(value);
        let bucket = &mut self.buckets[i];
        bucket.push(handle);
        Ok(PartitionPosition::new(i, bucket.len() - 1))
    }

    /// Inserts `value` before `pos`.
    pub fn insert_to_partition(
        &mut self,
        pos: PartitionPosition,
        value: T,
    ) -> StorageResult<PartitionPosition> {
        if self.checked_bucket("insert_to_partition", pos, true)?.is_none() {
            return Ok(PartitionPosition::NONE);
        }
        let handle = self.owner.make(value);
        self.buckets[pos.partition].insert(pos.offset, handle);
        Ok(pos)
    }

    /// Removes the element at `pos`.
    pub fn erase_from_partition(&mut self, pos: PartitionPosition) -> StorageResult<PartitionPosition> {
        match self.checked_bucket("erase_from_partition", pos, false)? {
            Some(bucket) => {
                bucket.remove(pos.offset);
                Ok(pos)
            }
            None => Ok(PartitionPosition::NONE),
        }
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
        let Some(bucket) = self.checked_bucket(method, last, true)? else {
            return Ok(PartitionPosition::NONE);
        };
        if !check_offset::<C>(method, first, last.offset, true)? {
            return Ok(PartitionPosition::NONE);
        }
        bucket.drain(first.offset..last.offset);
        Ok(first)
    }

    /// Exchanges the contents of partitions `i` and `j`.
    pub fn swap_partitions(&mut self, i: usize, j: usize) -> StorageResult<()> {
        let partitions = self.buckets.len();
        if check_partition::<C>("swap_partitions", i, partitions)?
            && check_partition::<C>("swap_partitions", j, partitions)?
        {
            self.buckets.swap(i, j);
        }
        Ok(())
    }

    /// Reserves room for `additional` more partitions.
    pub fn reserve_partitions(&mut self, additional: usize) {
        self.buckets.reserve(additional);
    }

    /// Reserves room for `additional` more elements in partition `i`.
    pub fn reserve_partition(&mut self, i: usize, additional: usize) -> StorageResult<()> {
        if check_partition::<C>("reserve_partition", i, self.buckets.len())? {
            self.buckets[i].reserve(additional);
        }
        Ok(())
    }

    /// Element capacity summed over every bucket.
    pub fn capacity(&self) -> usize {
        self.buckets.iter().map(Vec::capacity).sum()
    }

    /// Capacity of the bucket list.
    pub fn partitions_capacity(&self) -> usize {
        self.buckets.capacity()
    }

    /// Releases spare capacity of every bucket and of the bucket list.
    pub fn shrink_to_fit(&mut self) {
        for bucket in &mut self.buckets {
            bucket.shrink_to_fit();
        }
        self.buckets.shrink_to_fit();
    }

    /// Releases spare capacity of partition `i`.
    pub fn shrink_partition_to_fit(&mut self, i: usize) -> StorageResult<()> {
        if check_partition::<C>("shrink_partition_to_fit", i, self.buckets.len())? {
            self.buckets[i].shrink_to_fit();
        }
        Ok(())
    }

    /// Removes every partition and element.
    pub fn clear(&mut self) {
        self.buckets.clear();
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

impl<T, O: Ownership<T>, C: RangeCheck> PartitionedStorage for BucketedVec<T, O, C> {
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

impl<T, O: Ownership<T> + Default, C: RangeCheck> Default for BucketedVec<T, O, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, O: Ownership<T> + Default, C: RangeCheck, I> FromIterator<I> for BucketedVec<T, O, C>
where
    I: IntoIterator<Item = T>,
{
    fn from_iter<P: IntoIterator<Item = I>>(partitions: P) -> Self {
        Self::from_partitions(partitions)
    }
}

impl<T: PartialEq, O: Ownership<T>, C> PartialEq for BucketedVec<T, O, C> {
    fn eq(&self, other: &Self) -> bool {
        self.buckets.len() == other.buckets.len()
            && self.buckets.iter().zip(&other.buckets).all(|(a, b)| {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| O::equivalent(x, y))
            })
    }
}

impl<T: Eq, O: Ownership<T>, C> Eq for BucketedVec<T, O, C> {}

impl<T: Clone, O: Ownership<T>, C: RangeCheck> Clone for BucketedVec<T, O, C> {
    fn clone(&self) -> Self {
        let mut owner = self.owner.fresh();
        let buckets = self
            .buckets
            .iter()
            .map(|bucket| {
                bucket
                    .iter()
                    .map(|h| owner.make((*O::read(h)).clone()))
                    .collect()
            })
            .collect();
        Self {
            buckets,
            owner,
            _marker: PhantomData,
        }
    }
}

impl<T: fmt::Debug, O: Ownership<T>, C: RangeCheck> fmt::Debug for BucketedVec<T, O, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.buckets.iter().map(|b| DebugHandles::<T, O>::new(b)))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Pooled;

    fn sample() -> BucketedVec<i32> {
        BucketedVec::from_partitions(vec![vec![3], vec![4], vec![9, -3]])
    }

    #[test]
    fn insert_at_front_of_middle_partition() {
        let mut seq = sample();
        seq.insert_to_partition(PartitionPosition::new(1, 0), 2).unwrap();
        assert_eq!(seq.to_vecs(), vec![vec![3], vec![2, 4], vec![9, -3]]);
        assert_eq!(seq.len(), 5);
    }

    #[test]
    fn cursors_stay_inside_their_bucket() {
        let seq = sample();
        let begin = seq.begin_partition(1);
        assert_eq!(begin.get(), Some(&4));
        assert_eq!((begin - 1).get(), None);
        assert_eq!((begin + 1).get(), None);
        assert_eq!(seq.end_partition(1) - begin, 1);
    }

    #[test]
    fn swap_and_erase_slots() {
        let mut seq = sample();
        seq.swap_partitions(0, 2).unwrap();
        assert_eq!(seq.to_vecs(), vec![vec![9, -3], vec![4], vec![3]]);

        seq.erase_slot(1).unwrap();
        seq.insert_slot(0).unwrap();
        assert_eq!(seq.to_vecs(), vec![vec![], vec![9, -3], vec![3]]);
        assert!(seq.erase_slot(3).is_err());
    }

    #[test]
    fn per_partition_capacity() {
        let mut seq = sample();
        seq.reserve_partition(2, 64).unwrap();
        assert!(seq.capacity() >= 66);
        seq.shrink_partition_to_fit(2).unwrap();
        assert!(seq.reserve_partition(9, 1).is_err());
    }

    #[test]
    fn pooled_equality_is_isomorphic() {
        let a: BucketedVec<i32, Pooled<i32>> = BucketedVec::from_partitions(vec![vec![1, 1], vec![2]]);
        let b: BucketedVec<i32, Pooled<i32>> = BucketedVec::from_partitions(vec![vec![1, 1], vec![2]]);
        let c: BucketedVec<i32, Pooled<i32>> = BucketedVec::from_partitions(vec![vec![1], vec![1, 2]]);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.owner().pool().len(), 2);
    }
}
