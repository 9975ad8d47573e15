/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

//! Interchangeable matrix inversion algorithms.
//!
//! Each algorithm is a stateless unit struct implementing [`Invert`]. The unit value is
//! the only instance needed, so callers either name the algorithm directly:
//!
//! ```
//! use densemat_linalg::inverse::{GaussJordan, Invert};
//! use densemat_utils::views::Matrix;
//!
//! let a = Matrix::try_from(vec![4.0f64, 7.0, 2.0, 6.0].into(), 2, 2).unwrap();
//! let inv = GaussJordan.invert(a.as_strided()).unwrap();
//! assert!((inv[(0, 0)] - 0.6).abs() < 1e-12);
//! ```
//!
//! or select one at runtime through [`Strategy`].
//!
//! All algorithms share the same contract:
//!
//! * Non-square input is rejected with [`LinalgError::NotSquare`] before any work.
//! * The empty `0 x 0` matrix inverts to itself.
//! * Singular input yields [`LinalgError::Singular`]. Near-zero pivots are judged against
//!   the largest magnitude entry of the input ([`negligible_pivot`]) and near-zero
//!   determinants against its Hadamard bound ([`negligible_determinant`]).
//! * The input is never modified and a newly allocated matrix is returned.

use std::{fmt, str::FromStr};

use densemat_utils::{strided::StridedView, views::Matrix};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    num::{Field, Real},
    LinalgError,
};

mod adjugate;
mod cayley_hamilton;
mod cholesky;
mod gauss_jordan;

pub use adjugate::Adjugate;
pub use cayley_hamilton::{characteristic_polynomial, CayleyHamilton};
pub use cholesky::Cholesky;
pub use gauss_jordan::GaussJordan;

/// A matrix inversion algorithm.
pub trait Invert<T> {
    /// Return the inverse of the square matrix `a`.
    fn invert(&self, a: StridedView<'_, T>) -> Result<Matrix<T>, LinalgError>;
}

/// Runtime selection of an inversion algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// General matrices. See [`GaussJordan`].
    GaussJordan,
    /// Symmetric positive-definite matrices. See [`Cholesky`].
    Cholesky,
    /// Small general matrices. See [`CayleyHamilton`].
    CayleyHamilton,
    /// Small general matrices. See [`Adjugate`].
    Adjugate,
}

impl Strategy {
    /// Every strategy, in declaration order.
    pub const ALL: [Strategy; 4] = [
        Strategy::GaussJordan,
        Strategy::Cholesky,
        Strategy::CayleyHamilton,
        Strategy::Adjugate,
    ];

    /// The kebab-case name of the strategy.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GaussJordan => "gauss-jordan",
            Self::Cholesky => "cholesky",
            Self::CayleyHamilton => "cayley-hamilton",
            Self::Adjugate => "adjugate",
        }
    }

    /// Return the algorithm selected by `self`.
    pub fn inverter<T: Real>(self) -> &'static dyn Invert<T> {
        match self {
            Self::GaussJordan => &GaussJordan,
            Self::Cholesky => &Cholesky,
            Self::CayleyHamilton => &CayleyHamilton,
            Self::Adjugate => &Adjugate,
        }
    }

    /// Invert `a` with the algorithm selected by `self`.
    pub fn invert<T: Real>(self, a: StridedView<'_, T>) -> Result<Matrix<T>, LinalgError> {
        self.inverter().invert(a)
    }
}

impl Default for Strategy {
    fn default() -> Self {
        Self::GaussJordan
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown inversion strategy \"{0}\", expected one of: gauss-jordan, cholesky, cayley-hamilton, adjugate")]
pub struct UnknownStrategy(String);

impl FromStr for Strategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == s)
            .ok_or_else(|| UnknownStrategy(s.to_owned()))
    }
}

/// Return `true` if `pivot` is NaN or `|pivot| <= n * epsilon * scale`, where `scale` is
/// the largest magnitude entry of the `n x n` input.
pub fn negligible_pivot<T: Field>(pivot: T, n: usize, scale: T) -> bool {
    pivot.is_nan() || pivot.abs() <= T::from_count(n) * T::epsilon() * scale
}

/// Return `true` if `det` is NaN, zero, or `|det| <= n * epsilon * H`, where `H` is the
/// Hadamard bound of the `n x n` matrix `a`: the smaller of the product of its row norms
/// and the product of its column norms.
///
/// `H` bounds `|det(a)|` for any scaling of the rows and columns, so the test does not
/// reject a well conditioned matrix just because its rows differ in magnitude. A matrix
/// with an all-zero row or column is always negligible.
///
/// The comparison is done on logarithms so the products cannot overflow.
pub fn negligible_determinant<T: Real>(det: T, a: StridedView<'_, T>) -> bool {
    if det.is_nan() || det.is_zero() {
        return true;
    }
    match log_hadamard_bound(a) {
        Some(bound) => {
            let n = T::from_count(a.nrows());
            det.abs().ln() <= (n * T::epsilon()).ln() + bound
        }
        None => true,
    }
}

// `ln` of the Hadamard bound, or `None` if some row or column is zero.
fn log_hadamard_bound<T: Real>(a: StridedView<'_, T>) -> Option<T> {
    let n = a.nrows();
    let mut rows = T::zero();
    let mut cols = T::zero();
    for i in 0..n {
        rows = rows + log_norm(a.row(i).iter().copied())?;
        cols = cols + log_norm((0..n).map(|r| a[(r, i)]))?;
    }
    Some(if cols < rows { cols } else { rows })
}

// `ln ||x||_2`, computed relative to the largest entry so squaring cannot overflow.
fn log_norm<T: Real, I>(entries: I) -> Option<T>
where
    I: Iterator<Item = T> + Clone,
{
    let largest = entries
        .clone()
        .fold(T::zero(), |m, x| if x.abs() > m { x.abs() } else { m });
    if largest.is_zero() {
        return None;
    }
    let sum = entries.fold(T::zero(), |acc, x| {
        let y = x / largest;
        acc + y * y
    });
    Some(largest.ln() + sum.ln() / (T::one() + T::one()))
}
