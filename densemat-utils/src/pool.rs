/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

//! A thread-safe pool of reusable objects.
//!
//! [`ObjectPool::get_ref`] hands out a [`PooledRef`] guard. The object is taken from the
//! idle stack and reset through [`AsPooled::modify`], or built with [`AsPooled::create`]
//! when the stack is empty. Dropping the guard puts the object back, on every exit path
//! of the borrower including early returns and unwinding.
//!
//! Two limits keep an idle pool from holding memory it will not reuse: at most
//! `capacity` objects are kept, and an optional retention filter rejects individual
//! objects (for example oversized buffers) on their way back.

use std::{
    fmt,
    mem::ManuallyDrop,
    ops::{Deref, DerefMut},
    sync::{Mutex, MutexGuard},
};

/// Build or reset a pooled object from arguments of type `A`.
///
/// A reset object must be indistinguishable from a freshly created one as far as its
/// users can tell. Spare allocation capacity does not count.
pub trait AsPooled<A> {
    fn create(args: A) -> Self;

    fn modify(&mut self, args: A);
}

/// Arguments for a `Vec<T>` of `len` copies of `value`.
///
/// Reused vectors are cleared first, so no value from a previous borrower survives.
#[derive(Debug, Clone, Copy)]
pub struct Filled<T> {
    pub len: usize,
    pub value: T,
}

impl<T> Filled<T> {
    pub fn new(len: usize, value: T) -> Self {
        Self { len, value }
    }
}

impl<T: Clone> AsPooled<Filled<T>> for Vec<T> {
    fn create(args: Filled<T>) -> Self {
        vec![args.value; args.len]
    }

    fn modify(&mut self, args: Filled<T>) {
        self.clear();
        self.resize(args.len, args.value);
    }
}

/// A bounded stack of idle objects shared between threads.
///
/// The most recently returned object is handed out first. `new` is `const`, so a pool
/// can live in a `static`.
pub struct ObjectPool<T> {
    idle: Mutex<Vec<T>>,
    capacity: usize,
    retain: fn(&T) -> bool,
}

impl<T> ObjectPool<T> {
    /// Create an empty pool that keeps at most `capacity` idle objects.
    pub const fn new(capacity: usize) -> Self {
        Self::with_retention(capacity, keep_all::<T>)
    }

    /// Create an empty pool that keeps at most `capacity` idle objects, and only those
    /// for which `retain` returns `true` when they are handed back.
    pub const fn with_retention(capacity: usize, retain: fn(&T) -> bool) -> Self {
        Self {
            idle: Mutex::new(Vec::new()),
            capacity,
            retain,
        }
    }

    /// Borrow an object built from `args`.
    ///
    /// `create` and `modify` run without the pool lock held. If `modify` panics, the
    /// object is dropped rather than returned.
    pub fn get_ref<A>(&self, args: A) -> PooledRef<'_, T>
    where
        T: AsPooled<A>,
    {
        // Pop on its own statement so the guard is released before `modify` runs.
        let reused = self.lock().pop();
        let item = match reused {
            Some(mut item) => {
                item.modify(args);
                item
            }
            None => {
                tracing::trace!(
                    pooled = std::any::type_name::<T>(),
                    "object pool is empty, creating a new object"
                );
                T::create(args)
            }
        };
        PooledRef {
            item: ManuallyDrop::new(item),
            pool: self,
        }
    }

    /// The number of idle objects.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The maximum number of idle objects kept.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // Hand `item` back, or return it to the caller to be dropped outside the lock.
    fn give_back(&self, item: T) -> Option<T> {
        if !(self.retain)(&item) {
            return Some(item);
        }
        let mut idle = self.lock();
        if idle.len() < self.capacity {
            idle.push(item);
            None
        } else {
            Some(item)
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<T>> {
        // User code never runs under the lock, so the stack is consistent even if a
        // holder panicked.
        self.idle.lock().unwrap_or_else(|poisoned| {
            self.idle.clear_poison();
            poisoned.into_inner()
        })
    }
}

fn keep_all<T>(_: &T) -> bool {
    true
}

impl<T> fmt::Debug for ObjectPool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectPool")
            .field("idle", &self.len())
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

/// An object borrowed from an [`ObjectPool`], returned to it on drop.
pub struct PooledRef<'a, T> {
    item: ManuallyDrop<T>,
    pool: &'a ObjectPool<T>,
}

impl<T> Drop for PooledRef<'_, T> {
    fn drop(&mut self) {
        // SAFETY: `item` is only taken here, and `self` is never used again.
        let item = unsafe { ManuallyDrop::take(&mut self.item) };
        // A rejected object is dropped here, after `give_back` released the lock, since
        // its destructor may panic.
        drop(self.pool.give_back(item));
    }
}

impl<T> Deref for PooledRef<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.item
    }
}

impl<T> DerefMut for PooledRef<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.item
    }
}

impl<T: fmt::Debug> fmt::Debug for PooledRef<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PooledRef").field(&*self.item).finish()
    }
}
