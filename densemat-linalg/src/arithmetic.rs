/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

//! Allocating matrix arithmetic and the compound assignment forms.

use densemat_utils::{
    strided::{MutStridedView, StridedView},
    views::Matrix,
};

use crate::{
    elementwise,
    num::{Field, Ring},
    scratch, LinalgError,
};

/// Return `a + b` as a newly allocated matrix.
pub fn add<T: Ring>(a: StridedView<'_, T>, b: StridedView<'_, T>) -> Result<Matrix<T>, LinalgError> {
    let mut out = Matrix::new(T::zero(), a.nrows(), a.ncols());
    elementwise::add_into(a, b, out.as_mut_slice())?;
    Ok(out)
}

/// Return `a - b` as a newly allocated matrix.
pub fn subtract<T: Ring>(
    a: StridedView<'_, T>,
    b: StridedView<'_, T>,
) -> Result<Matrix<T>, LinalgError> {
    let mut out = Matrix::new(T::zero(), a.nrows(), a.ncols());
    elementwise::sub_into(a, b, out.as_mut_slice())?;
    Ok(out)
}

/// Return `a * k` as a newly allocated matrix.
pub fn scale<T: Ring>(a: StridedView<'_, T>, k: T) -> Matrix<T> {
    let mut out = Matrix::new(T::zero(), a.nrows(), a.ncols());
    elementwise::scale_unchecked(a, k, out.as_mut_slice());
    out
}

/// Return the matrix product `a * b`.
///
/// Requires `a.ncols() == b.nrows()`. The result has shape `a.nrows() x b.ncols()`.
pub fn multiply<T: Ring>(
    a: StridedView<'_, T>,
    b: StridedView<'_, T>,
) -> Result<Matrix<T>, LinalgError> {
    require_inner("multiply", a.dims(), b.dims())?;
    let mut out = Matrix::new(T::zero(), a.nrows(), b.ncols());
    multiply_into(a, b, out.as_mut_view().into())?;
    Ok(out)
}

/// Write the matrix product `a * b` into `dst`.
///
/// `dst` must have shape `a.nrows() x b.ncols()`. Every element of `dst` is overwritten.
pub fn multiply_into<T: Ring>(
    a: StridedView<'_, T>,
    b: StridedView<'_, T>,
    mut dst: MutStridedView<'_, T>,
) -> Result<(), LinalgError> {
    require_inner("multiply", a.dims(), b.dims())?;
    LinalgError::require_same("destination", (a.nrows(), b.ncols()), dst.dims())?;
    if dst.is_empty() {
        return Ok(());
    }

    let k = b.nrows();
    if k == 0 {
        dst.row_iter_mut().for_each(|row| row.fill(T::zero()));
        return Ok(());
    }

    let bt = gather_columns(b);
    for (row, out) in a.row_iter().zip(dst.row_iter_mut()) {
        for (d, column) in out.iter_mut().zip(bt.chunks_exact(k)) {
            *d = dot(row, column);
        }
    }
    Ok(())
}

/// Return the transpose of `a`. Transposing twice reproduces `a` exactly.
pub fn transpose<T: Ring>(a: StridedView<'_, T>) -> Matrix<T> {
    let (nrows, ncols) = a.dims();
    let mut out = Matrix::new(T::zero(), ncols, nrows);

    match a.try_as_contiguous() {
        Some(dense) => {
            let src = dense.as_slice();
            for (index, d) in out.as_mut_slice().iter_mut().enumerate() {
                let (row, col) = (index / nrows, index % nrows);
                *d = src[col * ncols + row];
            }
        }
        None => {
            for (col, span) in a.row_iter().enumerate() {
                for (row, &x) in span.iter().enumerate() {
                    out[(row, col)] = x;
                }
            }
        }
    }
    out
}

/// Add `rhs` into `lhs` in place.
pub fn add_assign<T: Ring>(lhs: &mut Matrix<T>, rhs: StridedView<'_, T>) -> Result<(), LinalgError> {
    let mut view: MutStridedView<'_, T> = lhs.as_mut_view().into();
    elementwise::add_assign_into(&mut view, rhs)
}

/// Subtract `rhs` from `lhs` in place.
pub fn sub_assign<T: Ring>(lhs: &mut Matrix<T>, rhs: StridedView<'_, T>) -> Result<(), LinalgError> {
    let mut view: MutStridedView<'_, T> = lhs.as_mut_view().into();
    elementwise::sub_assign_into(&mut view, rhs)
}

/// Replace `lhs` with `lhs * rhs`.
///
/// When `rhs` is square the product has the shape of `lhs` and is written back into the
/// existing storage one row at a time. Otherwise `lhs` is replaced by a newly allocated
/// matrix of shape `lhs.nrows() x rhs.ncols()`.
pub fn mul_assign<T: Ring>(lhs: &mut Matrix<T>, rhs: StridedView<'_, T>) -> Result<(), LinalgError> {
    require_inner("multiply", lhs.dims(), rhs.dims())?;
    if !rhs.is_square() {
        *lhs = multiply(lhs.as_strided(), rhs)?;
        return Ok(());
    }
    if lhs.is_empty() {
        return Ok(());
    }

    let bt = gather_columns(rhs);
    let k = rhs.nrows();
    let mut saved = scratch::acquire::<T>(k);
    for row in lhs.row_iter_mut() {
        saved.copy_from_slice(row);
        for (d, column) in row.iter_mut().zip(bt.chunks_exact(k)) {
            *d = dot(&saved, column);
        }
    }
    Ok(())
}

/// Return the `n x n` identity matrix.
pub fn identity<T: Ring>(n: usize) -> Matrix<T> {
    Matrix::from_fn(n, n, |r, c| if r == c { T::one() } else { T::zero() })
}

/// Return the sum of the diagonal of a square matrix.
pub fn trace<T: Ring>(a: StridedView<'_, T>) -> Result<T, LinalgError> {
    let n = LinalgError::require_square(a.dims())?;
    Ok((0..n).fold(T::zero(), |acc, i| acc + a[(i, i)]))
}

/// Return the largest magnitude of any element of `a`, or zero for an empty matrix.
///
/// NaN elements are skipped.
pub fn max_abs<T: Field>(a: StridedView<'_, T>) -> T {
    a.row_iter().flatten().fold(T::zero(), |m, &x| {
        let x = x.abs();
        if x > m {
            x
        } else {
            m
        }
    })
}

/// Return `max |m[i][j] - δ(i, j)|` for a square matrix `m`.
///
/// Useful for checking a computed inverse: `max_deviation_from_identity(a * inv)` is close
/// to zero when `inv` is accurate. Returns NaN if any element is NaN.
pub fn max_deviation_from_identity<T: Field>(m: StridedView<'_, T>) -> Result<T, LinalgError> {
    LinalgError::require_square(m.dims())?;
    let mut worst = T::zero();
    for (r, row) in m.row_iter().enumerate() {
        for (c, &x) in row.iter().enumerate() {
            let expected = if r == c { T::one() } else { T::zero() };
            let deviation = (x - expected).abs();
            if deviation.is_nan() {
                return Ok(deviation);
            }
            if deviation > worst {
                worst = deviation;
            }
        }
    }
    Ok(worst)
}

///////////////
// Internals //
///////////////

fn require_inner(
    op: &'static str,
    lhs: (usize, usize),
    rhs: (usize, usize),
) -> Result<(), LinalgError> {
    if lhs.1 == rhs.0 {
        Ok(())
    } else {
        Err(LinalgError::DimensionMismatch { op, lhs, rhs })
    }
}

// Copy the columns of `b` into a scratch buffer so column `j` occupies
// `[j * b.nrows(), (j + 1) * b.nrows())`.
fn gather_columns<T: Ring>(b: StridedView<'_, T>) -> scratch::Scratch<T> {
    let (k, n) = b.dims();
    let mut bt = scratch::acquire::<T>(k * n);
    for (j, dst) in bt.chunks_exact_mut(k).enumerate() {
        for (d, &x) in dst.iter_mut().zip(b.column(j)) {
            *d = x;
        }
    }
    bt
}

#[inline]
fn dot<T: Ring>(x: &[T], y: &[T]) -> T {
    debug_assert_eq!(x.len(), y.len());
    std::iter::zip(x, y).fold(T::zero(), |acc, (&x, &y)| acc + x * y)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use rand::{rngs::StdRng, SeedableRng};
    use rstest::rstest;

    use super::*;
    use crate::test_util;

    fn m(nrows: usize, ncols: usize, data: &[i64]) -> Matrix<i64> {
        Matrix::try_from(data.into(), nrows, ncols).unwrap()
    }

    #[test]
    fn add_and_subtract() {
        let a = m(2, 2, &[1, 2, 3, 4]);
        let b = m(2, 2, &[10, 20, 30, 40]);
        assert_eq!(
            add(a.as_strided(), b.as_strided()).unwrap().as_slice(),
            &[11, 22, 33, 44]
        );
        assert_eq!(
            subtract(a.as_strided(), b.as_strided()).unwrap().as_slice(),
            &[-9, -18, -27, -36]
        );

        let c = m(1, 4, &[1, 2, 3, 4]);
        assert_eq!(
            add(a.as_strided(), c.as_strided()).unwrap_err(),
            LinalgError::DimensionMismatch {
                op: "add",
                lhs: (2, 2),
                rhs: (1, 4)
            }
        );
    }

    #[test]
    fn scale_values() {
        let a = m(2, 3, &[1, 2, 3, 4, 5, 6]);
        let s = scale(a.as_strided(), 2);
        assert_eq!(s.dims(), (2, 3));
        assert_eq!(s.as_slice(), &[2, 4, 6, 8, 10, 12]);

        let empty = m(0, 3, &[]);
        let s = scale(empty.as_strided(), 2);
        assert_eq!(s.dims(), (0, 3));
        assert!(s.as_slice().is_empty());
    }

    #[test]
    fn multiply_small() {
        let a = m(2, 3, &[1, 2, 3, 4, 5, 6]);
        let b = m(3, 2, &[7, 8, 9, 10, 11, 12]);
        let c = multiply(a.as_strided(), b.as_strided()).unwrap();
        assert_eq!(c.dims(), (2, 2));
        assert_eq!(c.as_slice(), &[58, 64, 139, 154]);

        let err = multiply(a.as_strided(), a.as_strided()).unwrap_err();
        assert_eq!(
            err,
            LinalgError::DimensionMismatch {
                op: "multiply",
                lhs: (2, 3),
                rhs: (2, 3)
            }
        );
    }

    #[rstest]
    #[case(0, 3, 2)]
    #[case(2, 0, 2)]
    #[case(2, 3, 0)]
    fn multiply_empty(#[case] m_: usize, #[case] k: usize, #[case] n: usize) {
        let a = Matrix::new(1i64, m_, k);
        let b = Matrix::new(1i64, k, n);
        let c = multiply(a.as_strided(), b.as_strided()).unwrap();
        assert_eq!(c.dims(), (m_, n));
        // An empty inner dimension gives a zero matrix.
        assert!(c.as_slice().iter().all(|&x| x == 0));
    }

    #[test]
    fn multiply_strided() {
        // The left 2x2 block of a 2x3 buffer.
        let data = [1i64, 2, 99, 3, 4, 99];
        let a = StridedView::try_from(&data[..], 2, 2, 3).unwrap();
        let b = m(2, 2, &[5, 6, 7, 8]);
        let c = multiply(a, b.as_strided()).unwrap();
        assert_eq!(c.as_slice(), &[19, 22, 43, 50]);

        let c = multiply(b.as_strided(), a).unwrap();
        assert_eq!(c.as_slice(), &[23, 34, 31, 46]);
    }

    #[test]
    fn multiply_into_destination() {
        let a = m(2, 2, &[1, 2, 3, 4]);
        let mut out = vec![-1i64; 8];
        {
            let dst = MutStridedView::try_from(out.as_mut_slice(), 2, 2, 4).unwrap();
            multiply_into(a.as_strided(), a.as_strided(), dst).unwrap();
        }
        assert_eq!(out, [7, 10, -1, -1, 15, 22, -1, -1]);

        // An empty inner dimension overwrites the destination with zeros.
        let e = Matrix::new(1i64, 2, 0);
        let f = Matrix::new(1i64, 0, 2);
        let mut out = Matrix::new(5i64, 2, 2);
        multiply_into(e.as_strided(), f.as_strided(), out.as_mut_view().into()).unwrap();
        assert_eq!(out.as_slice(), &[0, 0, 0, 0]);

        let mut wrong = Matrix::new(0i64, 2, 3);
        let err = multiply_into(a.as_strided(), a.as_strided(), wrong.as_mut_view().into())
            .unwrap_err();
        assert_eq!(
            err,
            LinalgError::DimensionMismatch {
                op: "destination",
                lhs: (2, 2),
                rhs: (2, 3)
            }
        );
    }

    #[test]
    fn transpose_shapes() {
        let a = m(2, 3, &[1, 2, 3, 4, 5, 6]);
        let t = transpose(a.as_strided());
        assert_eq!(t.dims(), (3, 2));
        assert_eq!(t.as_slice(), &[1, 4, 2, 5, 3, 6]);

        let data = [1i64, 2, 0, 3, 4, 0];
        let strided = StridedView::try_from(&data[..], 2, 2, 3).unwrap();
        assert_eq!(transpose(strided).as_slice(), &[1, 3, 2, 4]);

        let empty = m(0, 4, &[]);
        assert_eq!(transpose(empty.as_strided()).dims(), (4, 0));
    }

    #[test]
    fn double_transpose_is_exact() {
        let mut rng = StdRng::seed_from_u64(0xc0ff33);
        for (nrows, ncols) in [(1, 1), (3, 5), (7, 2), (6, 6)] {
            let a = test_util::random_matrix::<f64>(&mut rng, nrows, ncols);
            let tt = transpose(transpose(a.as_strided()).as_strided());
            assert_eq!(tt.dims(), a.dims());
            assert_eq!(tt.as_slice(), a.as_slice());
        }
    }

    #[test]
    fn multiply_is_associative() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let a = test_util::random_matrix::<f64>(&mut rng, 4, 5);
        let b = test_util::random_matrix::<f64>(&mut rng, 5, 3);
        let c = test_util::random_matrix::<f64>(&mut rng, 3, 6);

        let ab = multiply(a.as_strided(), b.as_strided()).unwrap();
        let bc = multiply(b.as_strided(), c.as_strided()).unwrap();
        let left = multiply(ab.as_strided(), c.as_strided()).unwrap();
        let right = multiply(a.as_strided(), bc.as_strided()).unwrap();
        test_util::assert_close(left.as_strided(), right.as_strided(), 1e-12);
    }

    #[test]
    fn compound_add_sub() {
        let mut a = m(2, 2, &[1, 2, 3, 4]);
        let ptr = a.as_slice().as_ptr();
        let b = m(2, 2, &[1, 1, 1, 1]);
        add_assign(&mut a, b.as_strided()).unwrap();
        assert_eq!(a.as_slice(), &[2, 3, 4, 5]);
        sub_assign(&mut a, b.as_strided()).unwrap();
        sub_assign(&mut a, b.as_strided()).unwrap();
        assert_eq!(a.as_slice(), &[0, 1, 2, 3]);
        assert_eq!(a.as_slice().as_ptr(), ptr, "compound operators must not reallocate");

        let c = m(1, 2, &[1, 1]);
        assert!(add_assign(&mut a, c.as_strided()).is_err());
    }

    #[test]
    fn compound_multiply() {
        // Square right operand: written back in place.
        let mut a = m(2, 2, &[1, 2, 3, 4]);
        let ptr = a.as_slice().as_ptr();
        let b = m(2, 2, &[5, 6, 7, 8]);
        mul_assign(&mut a, b.as_strided()).unwrap();
        assert_eq!(a.as_slice(), &[19, 22, 43, 50]);
        assert_eq!(a.as_slice().as_ptr(), ptr);

        // Rectangular right operand: reallocated.
        let mut a = m(2, 2, &[1, 2, 3, 4]);
        let c = m(2, 3, &[1, 0, 1, 0, 1, 1]);
        mul_assign(&mut a, c.as_strided()).unwrap();
        assert_eq!(a.dims(), (2, 3));
        assert_eq!(a.as_slice(), &[1, 2, 3, 3, 4, 7]);

        let err = mul_assign(&mut a, c.as_strided()).unwrap_err();
        assert!(matches!(
            err,
            LinalgError::DimensionMismatch { op: "multiply", .. }
        ));
    }

    #[test]
    fn helpers() {
        let i = identity::<f32>(3);
        assert_eq!(i.as_slice(), &[1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);
        assert_eq!(identity::<f64>(0).dims(), (0, 0));

        let a = m(3, 3, &[1, 2, 3, 4, 5, 6, 7, 8, 9]);
        assert_eq!(trace(a.as_strided()), Ok(15));
        assert_eq!(
            trace(m(1, 2, &[1, 2]).as_strided()),
            Err(LinalgError::NotSquare { nrows: 1, ncols: 2 })
        );

        let x = Matrix::try_from(vec![1.0f64, -7.5, f64::NAN, 3.0].into(), 2, 2).unwrap();
        assert_eq!(max_abs(x.as_strided()), 7.5);
        assert_eq!(max_abs(Matrix::<f64>::new(0.0, 0, 0).as_strided()), 0.0);

        let near = Matrix::try_from(vec![1.0f64, 1e-3, -2e-3, 0.999].into(), 2, 2).unwrap();
        assert_abs_diff_eq!(
            max_deviation_from_identity(near.as_strided()).unwrap(),
            2e-3,
            epsilon = 1e-15
        );
        assert!(max_deviation_from_identity(x.as_strided()).unwrap().is_nan());
    }
}
