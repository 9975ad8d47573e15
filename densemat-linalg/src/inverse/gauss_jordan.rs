/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use densemat_utils::{strided::StridedView, views::Matrix};

use super::{negligible_pivot, Invert};
use crate::{arithmetic::max_abs, num::Field, scratch, LinalgError};

/// Gauss-Jordan elimination with partial pivoting on the augmented matrix `[A | I]`.
///
/// Suitable for general square matrices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GaussJordan;

impl<T: Field> Invert<T> for GaussJordan {
    fn invert(&self, a: StridedView<'_, T>) -> Result<Matrix<T>, LinalgError> {
        let n = LinalgError::require_square(a.dims())?;
        if n == 0 {
            return Ok(Matrix::new(T::zero(), 0, 0));
        }
        let scale = max_abs(a);

        let mut buffer = scratch::acquire_matrix::<T>(n, 2 * n);
        let mut aug = scratch::as_matrix(&mut buffer, n, 2 * n)?;
        for (i, (dst, src)) in aug.row_iter_mut().zip(a.row_iter()).enumerate() {
            dst[..n].copy_from_slice(src);
            dst[n + i] = T::one();
        }

        for p in 0..n {
            let mut best = p;
            for r in (p + 1)..n {
                if aug[(r, p)].abs() > aug[(best, p)].abs() {
                    best = r;
                }
            }
            scratch::swap_rows(&mut aug, p, best);

            let pivot = aug[(p, p)];
            if negligible_pivot(pivot, n, scale) {
                tracing::debug!(strategy = "gauss-jordan", n, column = p, "negligible pivot");
                return Err(LinalgError::Singular);
            }

            for r in (0..n).filter(|&r| r != p) {
                let ratio = -aug[(r, p)] / pivot;
                if ratio.is_nan() {
                    tracing::debug!(strategy = "gauss-jordan", n, row = r, "NaN ratio");
                    return Err(LinalgError::Singular);
                }
                if ratio.is_zero() {
                    continue;
                }
                let (source, target) = scratch::row_pair_mut(&mut aug, p, r);
                for (t, &x) in target.iter_mut().zip(source) {
                    *t = *t + x * ratio;
                }
            }
        }

        let mut inverse = Matrix::new(T::zero(), n, n);
        for (i, (dst, src)) in inverse.row_iter_mut().zip(aug.row_iter()).enumerate() {
            let diagonal = src[i];
            for (d, &x) in dst.iter_mut().zip(&src[n..]) {
                *d = x / diagonal;
            }
        }
        Ok(inverse)
    }
}
