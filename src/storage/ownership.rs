//! Ownership handlers: how stored elements are held.
//!
//! - [`Independent`]: every element is held by value.
//! - [`Pooled`]: elements are [`SharedHandle`]s handed out by a [`DataPool`];
//!   equal values share one entry and writes are visible to every holder.

use core::ops::Deref;

use parking_lot::RwLockReadGuard;

use crate::storage::pool::{DataPool, SharedHandle};

/// Policy deciding what a partitioned backend actually stores for a `T`.
pub trait Ownership<T> {
    /// What the backend stores per element.
    type Handle;

    /// Dereferenced view of a stored handle.
    type Ref<'a>: Deref<Target = T>
    where
        Self: 'a,
        T: 'a;

    /// Whether equal values may share storage.
    const POOLED: bool;

    /// Converts a value into a stored handle.
    fn make(&mut self, value: T) -> Self::Handle;

    /// Resolves a handle to its value.
    fn read<'a>(handle: &'a Self::Handle) -> Self::Ref<'a>
    where
        Self: 'a,
        T: 'a;

    /// Element comparison used by the backends' `PartialEq`.
    ///
    /// By-value for independent ownership; dereferenced-value (isomorphic)
    /// for pooled ownership, ignoring handle identity.
    fn equivalent(a: &Self::Handle, b: &Self::Handle) -> bool
    where
        T: PartialEq;

    /// A handler for a newly created, unrelated backend.
    fn fresh(&self) -> Self;
}

/// Elements are owned exclusively, by value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Independent;

impl<T> Ownership<T> for Independent {
    type Handle = T;
    type Ref<'a>
        = &'a T
    where
        Self: 'a,
        T: 'a;

    const POOLED: bool = false;

    #[inline(always)]
    fn make(&mut self, value: T) -> T {
        value
    }

    #[inline(always)]
    fn read<'a>(handle: &'a T) -> &'a T
    where
        Self: 'a,
        T: 'a,
    {
        handle
    }

    #[inline]
    fn equivalent(a: &T, b: &T) -> bool
    where
        T: PartialEq,
    {
        a == b
    }

    fn fresh(&self) -> Self {
        Independent
    }
}

/// Elements are de-duplicated through a [`DataPool`].
#[derive(Debug)]
pub struct Pooled<T> {
    pool: DataPool<T>,
}

impl<T> Pooled<T> {
    /// Creates a handler with an empty pool.
    pub const fn new() -> Self {
        Self {
            pool: DataPool::new(),
        }
    }

    /// The pool backing this handler.
    pub fn pool(&self) -> &DataPool<T> {
        &self.pool
    }

    /// Mutable access to the pool, e.g. to [`tidy`](DataPool::tidy) it.
    pub fn pool_mut(&mut self) -> &mut DataPool<T> {
        &mut self.pool
    }
}

impl<T> Default for Pooled<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PartialEq> Ownership<T> for Pooled<T> {
    type Handle = SharedHandle<T>;
    type Ref<'a>
        = RwLockReadGuard<'a, T>
    where
        Self: 'a,
        T: 'a;

    const POOLED: bool = true;

    fn make(&mut self, value: T) -> SharedHandle<T> {
        self.pool.make(value)
    }

    #[inline]
    fn read<'a>(handle: &'a SharedHandle<T>) -> RwLockReadGuard<'a, T>
    where
        Self: 'a,
        T: 'a,
    {
        handle.read()
    }

    fn equivalent(a: &SharedHandle<T>, b: &SharedHandle<T>) -> bool {
        SharedHandle::ptr_eq(a, b) || *a.read() == *b.read()
    }

    fn fresh(&self) -> Self {
        Self::new()
    }
}
