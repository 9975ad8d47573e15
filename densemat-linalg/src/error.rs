/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use densemat_utils::ShapeError;
use thiserror::Error;

/// Errors returned by the arithmetic, determinant and inversion routines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum LinalgError {
    /// The operand shapes are incompatible for `op`.
    ///
    /// When `op` is `"destination"`, `lhs` is the shape the result needs and `rhs` is the
    /// shape of the supplied destination. A flat destination slice of length `len` is
    /// reported as `(1, len)`.
    #[error(
        "dimension mismatch in {op}: left is {}, right is {}",
        shape(.lhs),
        shape(.rhs)
    )]
    DimensionMismatch {
        op: &'static str,
        lhs: (usize, usize),
        rhs: (usize, usize),
    },

    #[error("expected a square matrix, got {nrows}x{ncols}")]
    NotSquare { nrows: usize, ncols: usize },

    #[error("matrix is singular")]
    Singular,

    /// A diagonal entry or a Cholesky radicand at `row` was negative or zero.
    #[error("matrix is not positive definite (failed at row {row})")]
    NotPositiveDefinite { row: usize },

    /// A matrix view could not be constructed over a buffer.
    #[error(transparent)]
    View(#[from] ShapeError),
}

impl LinalgError {
    /// Return the side length of a square matrix with dimensions `(nrows, ncols)`, or
    /// [`LinalgError::NotSquare`].
    pub fn require_square((nrows, ncols): (usize, usize)) -> Result<usize, Self> {
        if nrows == ncols {
            Ok(nrows)
        } else {
            Err(Self::NotSquare { nrows, ncols })
        }
    }

    /// Return [`LinalgError::DimensionMismatch`] unless `lhs == rhs`.
    pub(crate) fn require_same(
        op: &'static str,
        lhs: (usize, usize),
        rhs: (usize, usize),
    ) -> Result<(), Self> {
        if lhs == rhs {
            Ok(())
        } else {
            Err(Self::DimensionMismatch { op, lhs, rhs })
        }
    }

    /// Check that a flat destination can hold a matrix of shape `dims`.
    pub(crate) fn require_destination(dims: (usize, usize), len: usize) -> Result<(), Self> {
        if dims.0.checked_mul(dims.1) == Some(len) {
            Ok(())
        } else {
            Err(Self::DimensionMismatch {
                op: "destination",
                lhs: dims,
                rhs: (1, len),
            })
        }
    }
}

fn shape(&(nrows, ncols): &(usize, usize)) -> String {
    format!("{nrows}x{ncols}")
}
