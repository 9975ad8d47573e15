/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

//! Random matrix generators and comparison helpers for unit tests.

use approx::assert_abs_diff_eq;
use densemat_utils::{
    strided::StridedView,
    views::{Init, Matrix},
};
use rand::{
    distr::{uniform::SampleUniform, Distribution, Uniform},
    Rng,
};

use crate::{arithmetic, num::Real};

/// A matrix with entries drawn uniformly from `[-1, 1]`.
pub(crate) fn random_matrix<T>(rng: &mut impl Rng, nrows: usize, ncols: usize) -> Matrix<T>
where
    T: Real + SampleUniform,
{
    let dist = Uniform::new_inclusive(-T::one(), T::one()).unwrap();
    Matrix::new(Init(|| dist.sample(&mut *rng)), nrows, ncols)
}

/// A strictly diagonally dominant, hence well conditioned, `n x n` matrix.
pub(crate) fn random_well_conditioned<T>(rng: &mut impl Rng, n: usize) -> Matrix<T>
where
    T: Real + SampleUniform,
{
    let mut a = random_matrix::<T>(rng, n, n);
    for i in 0..n {
        a[(i, i)] = a[(i, i)] + T::from_count(n + 1);
    }
    a
}

/// A symmetric positive-definite `n x n` matrix `B^T B + n I`.
pub(crate) fn random_spd<T>(rng: &mut impl Rng, n: usize) -> Matrix<T>
where
    T: Real + SampleUniform,
{
    let b = random_matrix::<T>(rng, n, n);
    let bt = arithmetic::transpose(b.as_strided());
    let mut a = arithmetic::multiply(bt.as_strided(), b.as_strided()).unwrap();
    for i in 0..n {
        a[(i, i)] = a[(i, i)] + T::from_count(n);
    }
    a
}

/// Assert that two matrices have the same shape and agree elementwise within `epsilon`.
pub(crate) fn assert_close(left: StridedView<'_, f64>, right: StridedView<'_, f64>, epsilon: f64) {
    assert_eq!(left.dims(), right.dims(), "shape mismatch");
    for (i, (l, r)) in std::iter::zip(left.row_iter(), right.row_iter()).enumerate() {
        for (j, (&l, &r)) in std::iter::zip(l, r).enumerate() {
            assert_abs_diff_eq!(l, r, epsilon = epsilon);
            assert!(!l.is_nan(), "NaN at ({i}, {j})");
        }
    }
}
