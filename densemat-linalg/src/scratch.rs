/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

//! Scratch buffers for the numeric routines.
//!
//! Each element type owns a process-wide [`ObjectPool`] of `Vec`s. Routines acquire a
//! buffer at the start of a call with [`acquire`] and the returned guard hands it back to
//! the pool when it goes out of scope, on every exit path. Buffers are zero-filled on
//! acquisition and never escape the call that acquired them.
//!
//! A pool keeps at most [`SCRATCH_POOL_CAPACITY`] idle buffers, and drops rather than
//! keeps any buffer whose allocation exceeds [`SCRATCH_MAX_RETAINED_LEN`] elements, so one
//! large inversion does not pin its working memory for the life of the process.

use densemat_utils::{
    pool::{Filled, ObjectPool, PooledRef},
    views::MutMatrixView,
};
use num_traits::Zero;

use crate::LinalgError;

/// The maximum number of idle buffers retained per element type.
pub const SCRATCH_POOL_CAPACITY: usize = 16;

/// Buffers with a larger allocation than this many elements are freed on release.
///
/// Large enough for the `n x 2n` Gauss-Jordan workspace of a `128 x 128` matrix.
pub const SCRATCH_MAX_RETAINED_LEN: usize = 1 << 15;

/// A zero-filled scratch buffer checked out of the pool for its element type.
pub type Scratch<T> = PooledRef<'static, Vec<T>>;

/// Element types with a process-wide scratch pool.
pub trait ScratchSpace: Sized + Clone + Zero + 'static {
    /// Return the scratch pool for `Self`.
    fn pool() -> &'static ObjectPool<Vec<Self>>;
}

macro_rules! scratch_space {
    ($($T:ty),* $(,)?) => {
        $(
            impl ScratchSpace for $T {
                fn pool() -> &'static ObjectPool<Vec<Self>> {
                    static POOL: ObjectPool<Vec<$T>> =
                        ObjectPool::with_retention(SCRATCH_POOL_CAPACITY, worth_keeping::<$T>);
                    &POOL
                }
            }
        )*
    };
}

scratch_space!(f32, f64, i32, i64);

#[allow(clippy::ptr_arg)]
fn worth_keeping<T>(buffer: &Vec<T>) -> bool {
    buffer.capacity() <= SCRATCH_MAX_RETAINED_LEN
}

/// Check out a zero-filled buffer of `len` elements.
pub fn acquire<T: ScratchSpace>(len: usize) -> Scratch<T> {
    T::pool().get_ref(Filled::new(len, T::zero()))
}

/// Check out a zero-filled buffer of `nrows * ncols` elements.
///
/// Use [`as_matrix`] to view it as a matrix.
pub(crate) fn acquire_matrix<T: ScratchSpace>(nrows: usize, ncols: usize) -> Scratch<T> {
    acquire(nrows * ncols)
}

/// View a scratch buffer as a dense `nrows x ncols` matrix.
pub(crate) fn as_matrix<T>(
    buffer: &mut [T],
    nrows: usize,
    ncols: usize,
) -> Result<MutMatrixView<'_, T>, LinalgError> {
    MutMatrixView::try_shrink_from_mut(buffer, nrows, ncols).map_err(Into::into)
}

/// Return mutable references to two distinct rows of a dense matrix as
/// `(source, target)`, with the source row read-only.
///
/// # Panics
///
/// Panics if `source == target` or either row is out of bounds.
pub(crate) fn row_pair_mut<'a, T>(
    matrix: &'a mut MutMatrixView<'_, T>,
    source: usize,
    target: usize,
) -> (&'a [T], &'a mut [T]) {
    assert_ne!(source, target, "row_pair_mut requires distinct rows");
    let ncols = matrix.ncols();
    let data = matrix.as_mut_slice();
    if source < target {
        let (head, tail) = data.split_at_mut(target * ncols);
        (&head[source * ncols..(source + 1) * ncols], &mut tail[..ncols])
    } else {
        let (head, tail) = data.split_at_mut(source * ncols);
        (&tail[..ncols], &mut head[target * ncols..(target + 1) * ncols])
    }
}

/// Swap two rows of a dense matrix.
pub(crate) fn swap_rows<T>(matrix: &mut MutMatrixView<'_, T>, a: usize, b: usize) {
    if a == b {
        return;
    }
    let ncols = matrix.ncols();
    let (lo, hi) = if a < b { (a, b) } else { (b, a) };
    let data = matrix.as_mut_slice();
    let (head, tail) = data.split_at_mut(hi * ncols);
    head[lo * ncols..(lo + 1) * ncols].swap_with_slice(&mut tail[..ncols]);
}
