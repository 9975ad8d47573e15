/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

//! Element traits for the numeric routines.
//!
//! The traits form a small ladder:
//!
//! * [`Ring`]: what add, subtract, scale, multiply and transpose need.
//! * [`Field`]: adds division, negation and ordering for the determinant and the
//!   elimination-based inverses.
//! * [`Real`]: adds square roots and logarithms for Cholesky and for scale-relative
//!   determinant checks.

use std::{
    fmt::Debug,
    ops::{Add, Div, Mul, Neg, Sub},
};

use num_traits::{One, Zero};

use crate::scratch::ScratchSpace;

/// Element types supporting the ring operations used by matrix arithmetic.
///
/// This is blanket implemented for every type meeting the bounds.
pub trait Ring:
    Copy
    + Debug
    + PartialEq
    + Zero
    + One
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + ScratchSpace
    + Send
    + Sync
    + 'static
{
}

impl<T> Ring for T where
    T: Copy
        + Debug
        + PartialEq
        + Zero
        + One
        + Add<Output = Self>
        + Sub<Output = Self>
        + Mul<Output = Self>
        + ScratchSpace
        + Send
        + Sync
        + 'static
{
}

/// Element types with division and a magnitude, used for pivot selection.
pub trait Field: Ring + Div<Output = Self> + Neg<Output = Self> + PartialOrd {
    /// Return the magnitude of `self`.
    fn abs(self) -> Self;

    /// Return `true` if `self` is not a number.
    fn is_nan(self) -> bool;

    /// Return `true` if `self` is strictly less than zero.
    fn is_negative(self) -> bool {
        self < Self::zero()
    }

    /// The difference between `1` and the next representable value.
    fn epsilon() -> Self;

    /// Convert a count (a dimension or an iteration index) into `Self`.
    fn from_count(count: usize) -> Self;
}

/// Floating point element types.
pub trait Real: Field {
    fn sqrt(self) -> Self;

    /// Natural logarithm.
    fn ln(self) -> Self;
}

macro_rules! float_field {
    ($T:ty) => {
        impl Field for $T {
            #[inline(always)]
            fn abs(self) -> Self {
                <$T>::abs(self)
            }

            #[inline(always)]
            fn is_nan(self) -> bool {
                <$T>::is_nan(self)
            }

            #[inline(always)]
            fn epsilon() -> Self {
                <$T>::EPSILON
            }

            #[inline(always)]
            fn from_count(count: usize) -> Self {
                count as $T
            }
        }

        impl Real for $T {
            #[inline(always)]
            fn sqrt(self) -> Self {
                <$T>::sqrt(self)
            }

            #[inline(always)]
            fn ln(self) -> Self {
                <$T>::ln(self)
            }
        }
    };
}

float_field!(f32);
float_field!(f64);

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_ring<T: Ring>() {}

    #[test]
    fn integers_are_rings() {
        assert_ring::<i32>();
        assert_ring::<i64>();
        assert_ring::<f32>();
        assert_ring::<f64>();
    }

    #[test]
    fn field_helpers() {
        assert!(Field::is_negative(-1.0f64));
        assert!(!Field::is_negative(0.0f64));
        assert!(!Field::is_negative(f64::NAN));
        assert!(Field::is_nan(f32::NAN));
        assert_eq!(Field::abs(-2.5f32), 2.5);
        assert_eq!(<f64 as Field>::epsilon(), f64::EPSILON);
        assert_eq!(<f32 as Field>::from_count(7), 7.0);
        assert_eq!(Real::sqrt(9.0f64), 3.0);
        assert_eq!(Real::ln(1.0f32), 0.0);
    }
}
