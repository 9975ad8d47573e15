/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

//! Shape arithmetic shared by the dense and strided views.
//!
//! A matrix with `nrows` rows starting `row_stride` elements apart is backed by a buffer
//! of `nrows * row_stride` elements. Dense matrices are the special case
//! `row_stride == ncols`. Every length computation is checked, so a shape read from an
//! untrusted source can never wrap around and pass a length check it should fail.

use std::ops::Range;

use thiserror::Error;

/// Return the number of elements needed to back `nrows` rows that start `row_stride`
/// elements apart, or `None` if that count does not fit in a `usize`.
pub fn required_length(nrows: usize, row_stride: usize) -> Option<usize> {
    nrows.checked_mul(row_stride)
}

/// A buffer could not be viewed as a matrix of the requested shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
#[error(
    "cannot view a buffer of length {len} as a {nrows}x{ncols} matrix with row stride \
     {row_stride}: {}",
    self.requirement()
)]
pub struct ShapeError {
    len: usize,
    nrows: usize,
    ncols: usize,
    row_stride: usize,
}

impl ShapeError {
    pub(crate) fn new(len: usize, nrows: usize, ncols: usize, row_stride: usize) -> Self {
        Self {
            len,
            nrows,
            ncols,
            row_stride,
        }
    }

    /// The length of the rejected buffer.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Return `true` if the rejected buffer was empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The requested `(nrows, ncols)`.
    pub fn dims(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    /// The requested row stride. Equal to `ncols` for dense matrices.
    pub fn row_stride(&self) -> usize {
        self.row_stride
    }

    /// Return `true` if the requested shape needs more than `usize::MAX` elements.
    pub fn is_overflow(&self) -> bool {
        required_length(self.nrows, self.row_stride).is_none()
    }

    fn requirement(&self) -> String {
        match required_length(self.nrows, self.row_stride) {
            Some(required) => format!("{required} elements are required"),
            None => "the element count overflows usize".to_owned(),
        }
    }
}

/// Check the shape of a view over a buffer of `len` elements and return the number of
/// elements it covers.
///
/// With `exact`, the buffer must be exactly as long as required. Otherwise any longer
/// buffer is accepted and the tail is ignored.
///
/// # Panics
///
/// Panics if `row_stride < ncols`.
pub(crate) fn check(
    len: usize,
    nrows: usize,
    ncols: usize,
    row_stride: usize,
    exact: bool,
) -> Result<usize, ShapeError> {
    assert!(
        row_stride >= ncols,
        "row stride {row_stride} is smaller than the column count {ncols}"
    );
    match required_length(nrows, row_stride) {
        Some(required) if required == len || (!exact && required < len) => Ok(required),
        _ => Err(ShapeError::new(len, nrows, ncols, row_stride)),
    }
}

/// Return the range of buffer indices spanned by `row`.
///
/// # Panics
///
/// Panics if `row >= nrows`.
pub(crate) fn row_span(row: usize, nrows: usize, ncols: usize, row_stride: usize) -> Range<usize> {
    assert!(
        row < nrows,
        "row {row} is out of bounds for a matrix with {nrows} rows"
    );
    let start = row * row_stride;
    start..start + ncols
}

/// Return the buffer index of entry `(row, col)`.
///
/// # Panics
///
/// Panics if the entry lies outside the `nrows x ncols` matrix.
pub(crate) fn offset(
    (row, col): (usize, usize),
    (nrows, ncols): (usize, usize),
    row_stride: usize,
) -> usize {
    assert!(
        row < nrows && col < ncols,
        "index ({row}, {col}) is out of bounds for a {nrows}x{ncols} matrix"
    );
    row * row_stride + col
}

/// Iterate over the entries of column `col`, one per row.
///
/// # Panics
///
/// Panics if `col >= ncols`.
pub(crate) fn column<E>(
    data: &[E],
    col: usize,
    (nrows, ncols): (usize, usize),
    row_stride: usize,
) -> impl ExactSizeIterator<Item = &E> {
    assert!(
        col < ncols,
        "column {col} is out of bounds for a matrix with {ncols} columns"
    );
    (0..nrows).map(move |row| &data[row * row_stride + col])
}

/// Iterate over the first `ncols` elements of each of the `nrows` rows of `data`.
pub(crate) fn rows<E>(
    data: &[E],
    nrows: usize,
    ncols: usize,
    row_stride: usize,
) -> impl ExactSizeIterator<Item = &[E]> {
    (0..nrows).map(move |row| &data[row * row_stride..][..ncols])
}

/// Mutable counterpart of [`rows`]. `data` must hold at least `nrows * row_stride`
/// elements.
pub(crate) fn rows_mut<E>(
    data: &mut [E],
    nrows: usize,
    ncols: usize,
    row_stride: usize,
) -> impl ExactSizeIterator<Item = &mut [E]> {
    let mut rest = data;
    (0..nrows).map(move |_| {
        let (row, tail) = std::mem::take(&mut rest).split_at_mut(row_stride);
        rest = tail;
        &mut row[..ncols]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lengths() {
        assert_eq!(required_length(0, 7), Some(0));
        assert_eq!(required_length(3, 4), Some(12));
        assert_eq!(required_length(usize::MAX / 2 + 1, 2), None);
    }

    #[test]
    fn check_exact_and_shrink() {
        assert_eq!(check(12, 3, 4, 4, true), Ok(12));
        assert_eq!(check(12, 3, 2, 4, false), Ok(12));
        assert_eq!(check(20, 3, 2, 4, false), Ok(12));

        let err = check(20, 3, 2, 4, true).unwrap_err();
        assert_eq!(err.len(), 20);
        assert_eq!(err.dims(), (3, 2));
        assert_eq!(err.row_stride(), 4);
        assert!(!err.is_overflow());

        // The last row needs its full stride.
        assert!(check(11, 3, 2, 4, false).is_err());
    }

    #[test]
    fn check_rejects_overflow() {
        let err = check(0, usize::MAX / 2 + 1, 2, 2, false).unwrap_err();
        assert!(err.is_overflow());
        assert!(err.is_empty());
        assert!(err.to_string().ends_with("the element count overflows usize"));

        // A wrapped product would be zero here and match the empty buffer.
        let huge = 1usize << (usize::BITS / 2);
        assert!(check(0, huge, huge, huge, true).unwrap_err().is_overflow());
    }

    #[test]
    fn error_message() {
        let err = ShapeError::new(5, 2, 3, 3);
        assert_eq!(
            err.to_string(),
            "cannot view a buffer of length 5 as a 2x3 matrix with row stride 3: \
             6 elements are required"
        );
    }

    #[test]
    #[should_panic(expected = "row stride 1 is smaller than the column count 2")]
    fn check_panics_on_short_stride() {
        let _ = check(4, 2, 2, 1, false);
    }

    #[test]
    fn row_iterators() {
        let mut data: Vec<u8> = (0..10).collect();
        let spans: Vec<&[u8]> = rows(&data, 2, 3, 5).collect();
        assert_eq!(spans, [&[0, 1, 2][..], &[5, 6, 7][..]]);

        for row in rows_mut(&mut data, 2, 3, 5) {
            row.fill(0);
        }
        assert_eq!(data, [0, 0, 0, 3, 4, 0, 0, 0, 8, 9]);

        // Zero columns still yield one (empty) row per row.
        assert_eq!(rows_mut(&mut [0u8; 0], 4, 0, 0).count(), 4);
        assert_eq!(rows(&[0u8; 0], 4, 0, 0).len(), 4);
    }

    #[test]
    fn column_iterator() {
        let data: Vec<u8> = (0..10).collect();
        let entries: Vec<u8> = column(&data, 2, (2, 3), 5).copied().collect();
        assert_eq!(entries, [2, 7]);
        assert_eq!(column(&data, 0, (0, 3), 5).len(), 0);
    }

    #[test]
    #[should_panic(expected = "column 3 is out of bounds for a matrix with 3 columns")]
    fn column_panics() {
        let _ = column(&[0u8; 9], 3, (3, 3), 3);
    }

    #[test]
    #[should_panic(expected = "row 2 is out of bounds for a matrix with 2 rows")]
    fn row_span_panics() {
        let _ = row_span(2, 2, 3, 3);
    }

    #[test]
    #[should_panic(expected = "index (0, 3) is out of bounds for a 2x3 matrix")]
    fn offset_panics() {
        let _ = offset((0, 3), (2, 3), 3);
    }
}
