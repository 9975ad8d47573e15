/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

//! Row-major matrices with padding between rows.

use std::ops::{Index, IndexMut};

use crate::{
    shape::{self, ShapeError},
    views::{DenseData, Matrix, MatrixBase, MatrixView, MutDenseData, MutMatrixView},
};

/// A row-major matrix whose rows start `row_stride` elements apart.
///
/// ```text
///            |<---- row_stride ---->|
///            |<-- ncols -->|
///            +-------------+
/// row 0   -> | a0 a1 a2 a3 | a4 a5 a6     ^
/// row 1   -> | b0 b1 b2 b3 | b4 b5 b6     |
/// row 2   -> | c0 c1 c2 c3 | c4 c5 c6   nrows
///            +-------------+              v
/// ```
///
/// The backing buffer holds `nrows * row_stride` elements, so the last row carries its
/// padding too. Every arithmetic, determinant and inversion routine accepts a
/// [`StridedView`], which lets a sub-block of a larger buffer be used in place. When
/// `row_stride == ncols`, [`StridedBase::try_as_contiguous`] recovers the dense
/// [`MatrixView`] the fast paths work on.
#[derive(Debug, Clone, Copy)]
pub struct StridedBase<T: DenseData> {
    data: T,
    nrows: usize,
    ncols: usize,
    row_stride: usize,
}

/// A read-only strided view over borrowed memory.
pub type StridedView<'a, T> = StridedBase<&'a [T]>;

/// A strided view whose elements can be written but whose shape is fixed.
pub type MutStridedView<'a, T> = StridedBase<&'a mut [T]>;

impl<'a, T> StridedView<'a, T> {
    /// View the first `nrows * row_stride` elements of `data`. Trailing elements are
    /// ignored.
    ///
    /// # Panics
    ///
    /// Panics if `row_stride < ncols`.
    pub fn try_shrink_from(
        data: &'a [T],
        nrows: usize,
        ncols: usize,
        row_stride: usize,
    ) -> Result<Self, ShapeError> {
        let len = shape::check(data.len(), nrows, ncols, row_stride, false)?;
        Ok(Self {
            data: &data[..len],
            nrows,
            ncols,
            row_stride,
        })
    }
}

impl<'a, T> MutStridedView<'a, T> {
    /// Mutably view the first `nrows * row_stride` elements of `data`.
    ///
    /// # Panics
    ///
    /// Panics if `row_stride < ncols`.
    pub fn try_shrink_from_mut(
        data: &'a mut [T],
        nrows: usize,
        ncols: usize,
        row_stride: usize,
    ) -> Result<Self, ShapeError> {
        let len = shape::check(data.len(), nrows, ncols, row_stride, false)?;
        Ok(Self {
            data: &mut data[..len],
            nrows,
            ncols,
            row_stride,
        })
    }
}

impl<T: DenseData> StridedBase<T> {
    /// Interpret `data` as a strided matrix. The length of `data` must be exactly
    /// `nrows * row_stride`.
    ///
    /// # Panics
    ///
    /// Panics if `row_stride < ncols`.
    pub fn try_from(
        data: T,
        nrows: usize,
        ncols: usize,
        row_stride: usize,
    ) -> Result<Self, ShapeError> {
        shape::check(data.as_slice().len(), nrows, ncols, row_stride, true)?;
        Ok(Self {
            data,
            nrows,
            ncols,
            row_stride,
        })
    }

    pub fn nrows(&self) -> usize {
        self.nrows
    }

    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Return `(nrows, ncols)`.
    pub fn dims(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    pub fn is_square(&self) -> bool {
        self.nrows == self.ncols
    }

    /// Return `true` if the matrix has no entries.
    pub fn is_empty(&self) -> bool {
        self.nrows == 0 || self.ncols == 0
    }

    /// Distance in elements between the starts of consecutive rows.
    pub fn row_stride(&self) -> usize {
        self.row_stride
    }

    /// Return `true` if the rows follow each other without padding.
    pub fn is_contiguous(&self) -> bool {
        self.row_stride == self.ncols
    }

    /// Return a dense view over the same memory, or `None` if the rows are padded.
    pub fn try_as_contiguous(&self) -> Option<MatrixView<'_, T::Elem>> {
        if self.is_contiguous() {
            MatrixView::try_from(self.as_slice(), self.nrows, self.ncols).ok()
        } else {
            None
        }
    }

    /// Return a mutable dense view over the same memory, or `None` if the rows are padded.
    pub fn try_as_contiguous_mut(&mut self) -> Option<MutMatrixView<'_, T::Elem>>
    where
        T: MutDenseData,
    {
        if self.is_contiguous() {
            let (nrows, ncols) = self.dims();
            MutMatrixView::try_from(self.as_mut_slice(), nrows, ncols).ok()
        } else {
            None
        }
    }

    /// The backing buffer, padding included.
    pub fn as_slice(&self) -> &[T::Elem] {
        self.data.as_slice()
    }

    /// The backing buffer, padding included.
    pub fn as_mut_slice(&mut self) -> &mut [T::Elem]
    where
        T: MutDenseData,
    {
        self.data.as_mut_slice()
    }

    /// Return the `ncols` entries of row `row`.
    ///
    /// # Panics
    ///
    /// Panics if `row >= self.nrows()`.
    pub fn row(&self, row: usize) -> &[T::Elem] {
        &self.as_slice()[shape::row_span(row, self.nrows, self.ncols, self.row_stride)]
    }

    /// Return the `ncols` entries of row `row` for writing. Padding is not reachable.
    ///
    /// # Panics
    ///
    /// Panics if `row >= self.nrows()`.
    pub fn row_mut(&mut self, row: usize) -> &mut [T::Elem]
    where
        T: MutDenseData,
    {
        let span = shape::row_span(row, self.nrows, self.ncols, self.row_stride);
        &mut self.as_mut_slice()[span]
    }

    /// Iterate over the entries of column `col`, starting with row 0.
    ///
    /// # Panics
    ///
    /// Panics if `col >= self.ncols()`.
    pub fn column(&self, col: usize) -> impl ExactSizeIterator<Item = &T::Elem> {
        shape::column(self.as_slice(), col, self.dims(), self.row_stride)
    }

    /// Iterate over the rows, starting with row 0.
    pub fn row_iter(&self) -> impl ExactSizeIterator<Item = &[T::Elem]> {
        shape::rows(self.as_slice(), self.nrows, self.ncols, self.row_stride)
    }

    /// Iterate mutably over the rows, starting with row 0.
    pub fn row_iter_mut(&mut self) -> impl ExactSizeIterator<Item = &mut [T::Elem]>
    where
        T: MutDenseData,
    {
        let (nrows, ncols, row_stride) = (self.nrows, self.ncols, self.row_stride);
        shape::rows_mut(self.as_mut_slice(), nrows, ncols, row_stride)
    }
}

impl<T: DenseData> Index<(usize, usize)> for StridedBase<T> {
    type Output = T::Elem;

    /// # Panics
    ///
    /// Panics if `(row, col)` is outside the matrix. Padding is never addressable.
    fn index(&self, index: (usize, usize)) -> &T::Elem {
        &self.as_slice()[shape::offset(index, self.dims(), self.row_stride)]
    }
}

impl<T: MutDenseData> IndexMut<(usize, usize)> for StridedBase<T> {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut T::Elem {
        let offset = shape::offset(index, self.dims(), self.row_stride);
        &mut self.as_mut_slice()[offset]
    }
}

/// A dense matrix is a strided matrix with `row_stride == ncols`.
impl<T, U> From<MatrixBase<T>> for StridedBase<U>
where
    T: DenseData + Into<U>,
    U: DenseData,
{
    fn from(matrix: MatrixBase<T>) -> Self {
        let (nrows, ncols) = matrix.dims();
        Self {
            data: matrix.into_inner().into(),
            nrows,
            ncols,
            row_stride: ncols,
        }
    }
}

impl<'a, T> From<&'a Matrix<T>> for StridedView<'a, T> {
    fn from(matrix: &'a Matrix<T>) -> Self {
        matrix.as_strided()
    }
}
