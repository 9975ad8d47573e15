/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use densemat_utils::{strided::StridedView, views::Matrix};

use super::{negligible_determinant, Invert};
use crate::{
    determinant::{determinant, determinant_in_place},
    num::Real,
    scratch, LinalgError,
};

/// Inversion through the classical adjugate, `A^-1 = adj(A) / det(A)`.
///
/// `1 x 1` and `2 x 2` matrices use closed forms. Larger matrices compute one
/// `(n - 1) x (n - 1)` determinant per entry, so this is only practical for small `n`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Adjugate;

impl<T: Real> Invert<T> for Adjugate {
    fn invert(&self, a: StridedView<'_, T>) -> Result<Matrix<T>, LinalgError> {
        let n = LinalgError::require_square(a.dims())?;
        if n == 0 {
            return Ok(Matrix::new(T::zero(), 0, 0));
        }

        let det = determinant(a)?;
        if negligible_determinant(det, a) {
            tracing::debug!(strategy = "adjugate", n, "negligible determinant");
            return Err(LinalgError::Singular);
        }

        let mut inverse = Matrix::new(T::zero(), n, n);
        match n {
            1 => inverse[(0, 0)] = T::one() / det,
            2 => {
                inverse[(0, 0)] = a[(1, 1)] / det;
                inverse[(0, 1)] = -a[(0, 1)] / det;
                inverse[(1, 0)] = -a[(1, 0)] / det;
                inverse[(1, 1)] = a[(0, 0)] / det;
            }
            _ => {
                let mut buffer = scratch::acquire_matrix::<T>(n - 1, n - 1);
                for i in 0..n {
                    for j in 0..n {
                        let mut minor = scratch::as_matrix(&mut buffer, n - 1, n - 1)?;
                        let rows = a.row_iter().enumerate().filter(|&(r, _)| r != i);
                        for (dst, (_, src)) in minor.row_iter_mut().zip(rows) {
                            dst[..j].copy_from_slice(&src[..j]);
                            dst[j..].copy_from_slice(&src[j + 1..]);
                        }

                        let cofactor = determinant_in_place(minor);
                        let cofactor = if (i + j) % 2 == 0 { cofactor } else { -cofactor };
                        inverse[(j, i)] = cofactor / det;
                    }
                }
            }
        }
        Ok(inverse)
    }
}
