/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

//! Elementwise kernels writing into caller-supplied storage.
//!
//! Every kernel visits elements in row-major order. When all operands are contiguous the
//! kernel runs over the flattened buffers in a single pass, otherwise it walks row spans.
//! None of these functions allocate.

use densemat_utils::strided::{MutStridedView, StridedView};

use crate::{num::Ring, LinalgError};

/// Write `a + b` into `dst`, which must hold exactly `a.nrows() * a.ncols()` elements.
pub fn add_into<T: Ring>(
    a: StridedView<'_, T>,
    b: StridedView<'_, T>,
    dst: &mut [T],
) -> Result<(), LinalgError> {
    zip_into("add", a, b, dst, |x, y| x + y)
}

/// Write `a - b` into `dst`, which must hold exactly `a.nrows() * a.ncols()` elements.
pub fn sub_into<T: Ring>(
    a: StridedView<'_, T>,
    b: StridedView<'_, T>,
    dst: &mut [T],
) -> Result<(), LinalgError> {
    zip_into("subtract", a, b, dst, |x, y| x - y)
}

/// Write `a * k` into `dst`, which must hold exactly `a.nrows() * a.ncols()` elements.
pub fn scale_into<T: Ring>(a: StridedView<'_, T>, k: T, dst: &mut [T]) -> Result<(), LinalgError> {
    LinalgError::require_destination(a.dims(), dst.len())?;
    scale_unchecked(a, k, dst);
    Ok(())
}

/// Add `rhs` to `lhs` in place.
pub fn add_assign_into<T: Ring>(
    lhs: &mut MutStridedView<'_, T>,
    rhs: StridedView<'_, T>,
) -> Result<(), LinalgError> {
    zip_assign("add", lhs, rhs, |x, y| x + y)
}

/// Subtract `rhs` from `lhs` in place.
pub fn sub_assign_into<T: Ring>(
    lhs: &mut MutStridedView<'_, T>,
    rhs: StridedView<'_, T>,
) -> Result<(), LinalgError> {
    zip_assign("subtract", lhs, rhs, |x, y| x - y)
}

// `dst.len()` must already be checked against `a.dims()`.
pub(crate) fn scale_unchecked<T: Ring>(a: StridedView<'_, T>, k: T, dst: &mut [T]) {
    debug_assert_eq!(dst.len(), a.nrows() * a.ncols());
    if a.is_empty() {
        return;
    }

    match a.try_as_contiguous() {
        Some(a) => std::iter::zip(dst.iter_mut(), a.as_slice()).for_each(|(d, &x)| *d = x * k),
        None => {
            for (d, row) in std::iter::zip(dst.chunks_exact_mut(a.ncols()), a.row_iter()) {
                std::iter::zip(d.iter_mut(), row).for_each(|(d, &x)| *d = x * k);
            }
        }
    }
}

fn zip_into<T, F>(
    op: &'static str,
    a: StridedView<'_, T>,
    b: StridedView<'_, T>,
    dst: &mut [T],
    f: F,
) -> Result<(), LinalgError>
where
    T: Ring,
    F: Fn(T, T) -> T,
{
    LinalgError::require_same(op, a.dims(), b.dims())?;
    LinalgError::require_destination(a.dims(), dst.len())?;
    if a.is_empty() {
        return Ok(());
    }

    match (a.try_as_contiguous(), b.try_as_contiguous()) {
        (Some(a), Some(b)) => {
            for ((d, &x), &y) in dst.iter_mut().zip(a.as_slice()).zip(b.as_slice()) {
                *d = f(x, y);
            }
        }
        _ => {
            let rows = dst
                .chunks_exact_mut(a.ncols())
                .zip(a.row_iter())
                .zip(b.row_iter());
            for ((d, x), y) in rows {
                for ((d, &x), &y) in d.iter_mut().zip(x).zip(y) {
                    *d = f(x, y);
                }
            }
        }
    }
    Ok(())
}

fn zip_assign<T, F>(
    op: &'static str,
    lhs: &mut MutStridedView<'_, T>,
    rhs: StridedView<'_, T>,
    f: F,
) -> Result<(), LinalgError>
where
    T: Ring,
    F: Fn(T, T) -> T,
{
    LinalgError::require_same(op, lhs.dims(), rhs.dims())?;
    if lhs.is_empty() {
        return Ok(());
    }

    if let Some(y) = rhs.try_as_contiguous() {
        if let Some(mut x) = lhs.try_as_contiguous_mut() {
            for (x, &y) in x.as_mut_slice().iter_mut().zip(y.as_slice()) {
                *x = f(*x, y);
            }
            return Ok(());
        }
    }

    for (x, y) in lhs.row_iter_mut().zip(rhs.row_iter()) {
        for (x, &y) in x.iter_mut().zip(y) {
            *x = f(*x, y);
        }
    }
    Ok(())
}
