/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use densemat_utils::{strided::StridedView, views::Matrix};

use super::{negligible_pivot, Invert};
use crate::{num::Real, scratch, LinalgError};

/// Inversion of symmetric positive-definite matrices through the factorization
/// `A = U^T U`.
///
/// Only the upper triangle of the input (diagonal included) is read. The strict lower
/// triangle is assumed to mirror it and is never checked, so a non-symmetric input is
/// inverted as if it were the symmetric matrix defined by its upper triangle.
///
/// The input is first equilibrated by `D^-1 A D^-1` with `D = diag(sqrt(a_ii))`, which
/// puts ones on the diagonal and keeps the factorization well scaled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cholesky;

impl<T: Real> Invert<T> for Cholesky {
    fn invert(&self, a: StridedView<'_, T>) -> Result<Matrix<T>, LinalgError> {
        let n = LinalgError::require_square(a.dims())?;
        if n == 0 {
            return Ok(Matrix::new(T::zero(), 0, 0));
        }

        // Scale factors.
        let mut scales = scratch::acquire::<T>(n);
        for (i, s) in scales.iter_mut().enumerate() {
            let d = a[(i, i)];
            if d.is_nan() || d <= T::zero() {
                tracing::debug!(strategy = "cholesky", n, row = i, "non-positive diagonal");
                return Err(LinalgError::NotPositiveDefinite { row: i });
            }
            *s = d.sqrt();
        }

        // Normalized upper triangle. The strict lower triangle stays zero.
        let mut u_buffer = scratch::acquire_matrix::<T>(n, n);
        let mut u = scratch::as_matrix(&mut u_buffer, n, n)?;
        let mut scale = T::zero();
        for i in 0..n {
            for j in i..n {
                let x = a[(i, j)] / (scales[i] * scales[j]);
                u[(i, j)] = x;
                if x.abs() > scale {
                    scale = x.abs();
                }
            }
        }

        // Factor in place: row `r` of `U` only depends on the rows above it.
        for r in 0..n {
            let mut radicand = u[(r, r)];
            for k in 0..r {
                radicand = radicand - u[(k, r)] * u[(k, r)];
            }

            if radicand.is_negative() && !negligible_pivot(radicand, n, scale) {
                tracing::debug!(strategy = "cholesky", n, row = r, "negative radicand");
                return Err(LinalgError::NotPositiveDefinite { row: r });
            }
            if negligible_pivot(radicand, n, scale) {
                tracing::debug!(strategy = "cholesky", n, row = r, "negligible radicand");
                return Err(LinalgError::Singular);
            }

            let diagonal = radicand.sqrt();
            u[(r, r)] = diagonal;
            for j in (r + 1)..n {
                let mut x = u[(r, j)];
                for k in 0..r {
                    x = x - u[(k, r)] * u[(k, j)];
                }
                u[(r, j)] = x / diagonal;
            }
        }

        // `V = U^-1` by back substitution, column by column.
        let mut v_buffer = scratch::acquire_matrix::<T>(n, n);
        let mut v = scratch::as_matrix(&mut v_buffer, n, n)?;
        for j in 0..n {
            v[(j, j)] = T::one() / u[(j, j)];
            for i in (0..j).rev() {
                let mut sum = T::zero();
                for k in (i + 1)..=j {
                    sum = sum + u[(i, k)] * v[(k, j)];
                }
                v[(i, j)] = -sum / u[(i, i)];
            }
        }

        // `(D^-1 A D^-1)^-1 = V V^T` and `A^-1 = D^-1 V V^T D^-1`. Both `V` and `V^T`
        // are triangular so only `k >= max(i, j)` contributes.
        let mut inverse = Matrix::new(T::zero(), n, n);
        for i in 0..n {
            for j in i..n {
                let mut w = T::zero();
                for k in j..n {
                    w = w + v[(i, k)] * v[(j, k)];
                }
                let x = w / (scales[i] * scales[j]);
                inverse[(i, j)] = x;
                inverse[(j, i)] = x;
            }
        }
        Ok(inverse)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use rand::{rngs::StdRng, SeedableRng};
    use rstest::rstest;

    use super::*;
    use crate::{arithmetic, inverse::GaussJordan, test_util};

    fn m(n: usize, data: &[f64]) -> Matrix<f64> {
        Matrix::try_from(data.into(), n, n).unwrap()
    }

    #[test]
    fn tridiagonal() {
        let a = m(3, &[2.0, -1.0, 0.0, -1.0, 2.0, -1.0, 0.0, -1.0, 2.0]);
        let inv = Cholesky.invert(a.as_strided()).unwrap();
        let expected = m(3, &[0.75, 0.5, 0.25, 0.5, 1.0, 0.5, 0.25, 0.5, 0.75]);
        test_util::assert_close(inv.as_strided(), expected.as_strided(), 1e-12);
    }

    #[test]
    fn diagonal() {
        let a = m(3, &[4.0, 0.0, 0.0, 0.0, 0.25, 0.0, 0.0, 0.0, 1e6]);
        let inv = Cholesky.invert(a.as_strided()).unwrap();
        assert_abs_diff_eq!(inv[(0, 0)], 0.25, epsilon = 1e-15);
        assert_abs_diff_eq!(inv[(1, 1)], 4.0, epsilon = 1e-15);
        assert_abs_diff_eq!(inv[(2, 2)], 1e-6, epsilon = 1e-18);
        assert_eq!(inv[(0, 1)], 0.0);
    }

    #[test]
    fn reads_upper_triangle_only() {
        let symmetric = m(2, &[4.0, 2.0, 2.0, 3.0]);
        let garbage_lower = m(2, &[4.0, 2.0, 1000.0, 3.0]);
        assert_eq!(
            Cholesky.invert(symmetric.as_strided()),
            Cholesky.invert(garbage_lower.as_strided())
        );
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(5)]
    #[case(16)]
    fn agrees_with_gauss_jordan(#[case] n: usize) {
        let mut rng = StdRng::seed_from_u64(0xc0ff33 + n as u64);
        let a = test_util::random_spd::<f64>(&mut rng, n);

        let cholesky = Cholesky.invert(a.as_strided()).unwrap();
        let gauss_jordan = GaussJordan.invert(a.as_strided()).unwrap();
        test_util::assert_close(cholesky.as_strided(), gauss_jordan.as_strided(), 1e-10);

        // The result is exactly symmetric.
        let t = arithmetic::transpose(cholesky.as_strided());
        assert_eq!(t.as_slice(), cholesky.as_slice());
    }

    #[test]
    fn not_positive_definite() {
        // Non-positive diagonal.
        let a = m(2, &[1.0, 0.0, 0.0, -1.0]);
        assert_eq!(
            Cholesky.invert(a.as_strided()),
            Err(LinalgError::NotPositiveDefinite { row: 1 })
        );
        let a = m(2, &[0.0, 1.0, 1.0, 1.0]);
        assert_eq!(
            Cholesky.invert(a.as_strided()),
            Err(LinalgError::NotPositiveDefinite { row: 0 })
        );

        // Positive diagonal but indefinite: eigenvalues 3 and -1.
        let a = m(2, &[1.0, 2.0, 2.0, 1.0]);
        assert_eq!(
            Cholesky.invert(a.as_strided()),
            Err(LinalgError::NotPositiveDefinite { row: 1 })
        );
    }

    #[test]
    fn singular() {
        let a = m(2, &[1.0, 2.0, 2.0, 4.0]);
        assert_eq!(Cholesky.invert(a.as_strided()), Err(LinalgError::Singular));
    }

    #[test]
    fn shapes() {
        let empty = m(0, &[]);
        assert_eq!(Cholesky.invert(empty.as_strided()).unwrap().dims(), (0, 0));

        let tall = Matrix::new(1.0f64, 3, 2);
        assert_eq!(
            Cholesky.invert(tall.as_strided()),
            Err(LinalgError::NotSquare { nrows: 3, ncols: 2 })
        );
    }
}
