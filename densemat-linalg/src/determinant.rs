/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use densemat_utils::{strided::StridedView, views::MutMatrixView};

use crate::{num::Field, scratch, LinalgError};

/// Compute the determinant of a square matrix.
///
/// Matrices up to `2 x 2` use closed forms. Larger matrices are reduced by Gaussian
/// elimination with column pivoting on a scratch copy, so `a` is never modified. If a
/// pivot row has no non-zero candidate the determinant is exactly zero.
///
/// The determinant of the empty `0 x 0` matrix is `1`.
///
/// # Errors
///
/// Returns [`LinalgError::NotSquare`] if `a` is not square.
pub fn determinant<T: Field>(a: StridedView<'_, T>) -> Result<T, LinalgError> {
    let n = LinalgError::require_square(a.dims())?;
    if n <= 2 {
        return Ok(closed_form(a, n));
    }

    let mut buffer = scratch::acquire_matrix::<T>(n, n);
    let mut work = scratch::as_matrix(&mut buffer, n, n)?;
    for (dst, src) in work.row_iter_mut().zip(a.row_iter()) {
        dst.copy_from_slice(src);
    }
    Ok(eliminate(work))
}

/// Compute the determinant of the square dense matrix `work`, destroying its contents.
pub(crate) fn determinant_in_place<T: Field>(work: MutMatrixView<'_, T>) -> T {
    debug_assert!(work.is_square());
    let n = work.nrows();
    if n <= 2 {
        closed_form(work.as_strided(), n)
    } else {
        eliminate(work)
    }
}

fn closed_form<T: Field>(a: StridedView<'_, T>, n: usize) -> T {
    match n {
        0 => T::one(),
        1 => a[(0, 0)],
        _ => a[(0, 0)] * a[(1, 1)] - a[(0, 1)] * a[(1, 0)],
    }
}

fn eliminate<T: Field>(mut s: MutMatrixView<'_, T>) -> T {
    let n = s.nrows();
    let mut det = T::one();

    for k in 0..n {
        // Largest magnitude entry of row `k` among the remaining columns.
        let row = &s.row(k)[k..];
        let mut p = 0;
        for (j, x) in row.iter().enumerate().skip(1) {
            if x.abs() > row[p].abs() {
                p = j;
            }
        }
        let p = p + k;

        if s[(k, p)].is_zero() {
            return T::zero();
        }

        if p != k {
            for i in k..n {
                s.row_mut(i).swap(k, p);
            }
            det = -det;
        }

        let pivot = s[(k, k)];
        det = det * pivot;

        for i in (k + 1)..n {
            let factor = s[(i, k)] / pivot;
            if factor.is_zero() {
                continue;
            }
            let (source, target) = scratch::row_pair_mut(&mut s, k, i);
            for (t, &x) in target[k + 1..].iter_mut().zip(&source[k + 1..]) {
                *t = *t - factor * x;
            }
        }
    }
    det
}
