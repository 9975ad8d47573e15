/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use densemat_utils::{
    strided::StridedView,
    views::{Matrix, MutMatrixView},
};

use super::{negligible_determinant, Invert};
use crate::{
    arithmetic,
    num::{Field, Real},
    scratch, LinalgError,
};

/// Inversion through the Cayley-Hamilton theorem, using the Faddeev-LeVerrier recurrence
///
/// ```text
/// M_0 = I,  c_0 = 1
/// c_k = -trace(A M_{k-1}) / k
/// M_k = A M_{k-1} + c_k I
/// ```
///
/// which gives `det(A) = (-1)^n c_n` and `A^-1 = -M_{n-1} / c_n`.
///
/// The recurrence needs `n` matrix products, so this is intended for small matrices. It
/// performs no pivoting and loses accuracy quickly as the condition number grows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CayleyHamilton;

impl<T: Real> Invert<T> for CayleyHamilton {
    fn invert(&self, a: StridedView<'_, T>) -> Result<Matrix<T>, LinalgError> {
        let n = LinalgError::require_square(a.dims())?;
        if n == 0 {
            return Ok(Matrix::new(T::zero(), 0, 0));
        }

        let mut m_buffer = scratch::acquire_matrix::<T>(n, n);
        let mut am_buffer = scratch::acquire_matrix::<T>(n, n);
        let mut m = scratch::as_matrix(&mut m_buffer, n, n)?;
        let mut am = scratch::as_matrix(&mut am_buffer, n, n)?;
        let coefficients = leverrier(a, &mut m, &mut am)?;

        let c_n = coefficients[n];
        let det = if n % 2 == 0 { c_n } else { -c_n };
        if negligible_determinant(det, a) {
            tracing::debug!(strategy = "cayley-hamilton", n, "negligible determinant");
            return Err(LinalgError::Singular);
        }

        let mut inverse = Matrix::new(T::zero(), n, n);
        for (d, &x) in inverse.as_mut_slice().iter_mut().zip(m.as_slice()) {
            *d = -x / c_n;
        }
        Ok(inverse)
    }
}

/// Return the coefficients `[c_0, c_1, ..., c_n]` of the characteristic polynomial
/// `det(λI - A) = c_0 λ^n + c_1 λ^(n-1) + ... + c_n` of a square matrix, with `c_0 = 1`.
pub fn characteristic_polynomial<T: Field>(a: StridedView<'_, T>) -> Result<Vec<T>, LinalgError> {
    let n = LinalgError::require_square(a.dims())?;
    let mut m_buffer = scratch::acquire_matrix::<T>(n, n);
    let mut am_buffer = scratch::acquire_matrix::<T>(n, n);
    let mut m = scratch::as_matrix(&mut m_buffer, n, n)?;
    let mut am = scratch::as_matrix(&mut am_buffer, n, n)?;
    leverrier(a, &mut m, &mut am)
}

// Run the recurrence on the `n x n` matrix `a`. On return `m` holds `M_{n-1}`.
fn leverrier<T: Field>(
    a: StridedView<'_, T>,
    m: &mut MutMatrixView<'_, T>,
    am: &mut MutMatrixView<'_, T>,
) -> Result<Vec<T>, LinalgError> {
    let n = a.nrows();
    let mut coefficients = Vec::with_capacity(n + 1);
    coefficients.push(T::one());

    m.as_mut_slice().fill(T::zero());
    for i in 0..n {
        m[(i, i)] = T::one();
    }

    for k in 1..=n {
        arithmetic::multiply_into(a, m.as_strided(), am.as_mut_view().into())?;
        let c = -arithmetic::trace(am.as_strided())? / T::from_count(k);
        coefficients.push(c);

        if k < n {
            m.as_mut_slice().copy_from_slice(am.as_slice());
            for i in 0..n {
                m[(i, i)] = m[(i, i)] + c;
            }
        }
    }
    Ok(coefficients)
}
