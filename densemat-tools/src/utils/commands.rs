/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use anyhow::{ensure, Context, Result};
use densemat_linalg::arithmetic;
use densemat_utils::views::Matrix;
use tracing::{debug, info};

use super::{JobConfig, MatrixFile};

/// Invert the matrix in `input` with the strategy selected by `job`.
///
/// If `job.verify` is set, the product `A * A^-1` is checked against the identity and the
/// job fails if any entry deviates by more than `job.tolerance`.
pub fn invert(input: &MatrixFile, job: &JobConfig) -> Result<Matrix<f64>> {
    let a = input.view()?;
    let inverse = job.strategy.invert(a).with_context(|| {
        format!(
            "inverting a {}x{} matrix with {}",
            a.nrows(),
            a.ncols(),
            job.strategy
        )
    })?;
    info!(strategy = %job.strategy, n = a.nrows(), "inverted matrix");

    if job.verify {
        let product = arithmetic::multiply(a, inverse.as_strided())?;
        let deviation = arithmetic::max_deviation_from_identity(product.as_strided())?;
        info!(deviation, tolerance = job.tolerance, "verified inverse");
        ensure!(
            deviation <= job.tolerance,
            "verification failed: max |A * inv - I| = {deviation:e} exceeds tolerance {:e}",
            job.tolerance
        );
    }
    Ok(inverse)
}

/// Return the determinant of the matrix in `input`.
pub fn det(input: &MatrixFile) -> Result<f64> {
    let a = input.view()?;
    let det = densemat_linalg::determinant(a)?;
    debug!(n = a.nrows(), det, "computed determinant");
    Ok(det)
}

/// Return the product of the matrices in `lhs` and `rhs`.
pub fn multiply(lhs: &MatrixFile, rhs: &MatrixFile) -> Result<Matrix<f64>> {
    Ok(arithmetic::multiply(lhs.view()?, rhs.view()?)?)
}

/// Return the transpose of the matrix in `input`.
pub fn transpose(input: &MatrixFile) -> Result<Matrix<f64>> {
    Ok(arithmetic::transpose(input.view()?))
}
