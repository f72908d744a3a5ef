//! A content-addressed, de-duplicating store of shared values.
//!
//! Requesting a value equal to an existing entry hands back another handle to
//! that entry instead of storing a second copy. Entries stay mutable through
//! their handles, so a lookup compares against each entry's *current* value
//! rather than a hash captured at insertion time.

use core::fmt;
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A reference-counted handle to a pooled value.
///
/// Every clone refers to the same entry: a write through one handle is
/// observed by all of them.
pub struct SharedHandle<T> {
    inner: Arc<RwLock<T>>,
}

impl<T> SharedHandle<T> {
    /// Wraps a value in a fresh, unpooled handle.
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(RwLock::new(value)),
        }
    }

    /// Locks the entry for reading.
    #[inline]
    pub fn read(&self) -> RwLockReadGuard<'_, T> {
        self.inner.read()
    }

    /// Locks the entry for writing.
    #[inline]
    pub fn write(&self) -> RwLockWriteGuard<'_, T> {
        self.inner.write()
    }

    /// Replaces the shared value.
    pub fn set(&self, value: T) {
        *self.inner.write() = value;
    }

    /// Applies `f` to the shared value in place.
    pub fn mutate<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.inner.write())
    }

    /// Returns `true` if both handles refer to the same entry.
    #[inline]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }

    /// Number of live handles to this entry (the pool's own included).
    #[inline]
    pub fn use_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }
}

impl<T> Clone for SharedHandle<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for SharedHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SharedHandle").field(&*self.read()).finish()
    }
}

/// A de-duplicating pool of [`SharedHandle`]s.
pub struct DataPool<T> {
    entries: Vec<SharedHandle<T>>,
}

impl<T> DataPool<T> {
    /// Creates an empty pool.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Number of distinct entries held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the pool holds no entry.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every entry that only the pool still references.
    pub fn tidy(&mut self) {
        self.entries.retain(|e| e.use_count() > 1);
    }
}

impl<T: PartialEq> DataPool<T> {
    /// Returns a handle to an entry equal to `value`, creating one if needed.
    pub fn make(&mut self, value: T) -> SharedHandle<T> {
        if let Some(existing) = self.entries.iter().find(|e| *e.read() == value) {
            return existing.clone();
        }
        let handle = SharedHandle::new(value);
        self.entries.push(handle.clone());
        handle
    }
}

impl<T> Default for DataPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for DataPool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.iter()).finish()
    }
}
