/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */
#![cfg_attr(
    not(test),
    warn(clippy::panic, clippy::unwrap_used, clippy::expect_used)
)]

//! Dense linear algebra over [`densemat_utils`] matrix views.
//!
//! * [`elementwise`]: add, subtract and scale into caller-supplied storage.
//! * [`arithmetic`]: allocating arithmetic, matrix products, transposition and compound
//!   assignment.
//! * [`determinant()`]: determinants by column-pivoted elimination.
//! * [`inverse`]: four interchangeable inversion algorithms behind [`Invert`].
//!
//! Every routine accepts a [`StridedView`](densemat_utils::StridedView), so sub-blocks of
//! larger buffers can be used without copying. Contiguous inputs take faster paths.
//! Temporary storage comes from per-element-type pools in [`scratch`].

pub mod arithmetic;
pub mod elementwise;
pub mod inverse;
pub mod num;
pub mod scratch;

mod determinant;
pub use determinant::determinant;

mod error;
pub use error::LinalgError;

pub use arithmetic::{
    add, add_assign, identity, max_abs, max_deviation_from_identity, mul_assign, multiply,
    multiply_into, scale, sub_assign, subtract, trace, transpose,
};
pub use inverse::{
    characteristic_polynomial, Adjugate, CayleyHamilton, Cholesky, GaussJordan, Invert,
    Strategy,
};
pub use num::{Field, Real, Ring};

#[cfg(test)]
mod test_util;
