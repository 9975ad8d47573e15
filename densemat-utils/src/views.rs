/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

//! Dense row-major matrices and views.
//!
//! [`MatrixBase`] is generic over its storage so that the owning [`Matrix`] and the
//! borrowed [`MatrixView`] and [`MutMatrixView`] share one implementation. Mutating
//! methods are only available when the storage implements [`MutDenseData`].

use std::ops::{Index, IndexMut};

use crate::{
    shape::{self, ShapeError},
    strided::{StridedBase, StridedView},
};

/// Storage that exposes its elements as one flat slice.
///
/// `as_slice` must return the same slice every time it is called: views validate the
/// length once, at construction.
pub trait DenseData {
    type Elem;

    fn as_slice(&self) -> &[Self::Elem];
}

/// [`DenseData`] whose elements can be written in place.
///
/// `as_mut_slice` must cover the same elements as `as_slice`.
pub trait MutDenseData: DenseData {
    fn as_mut_slice(&mut self) -> &mut [Self::Elem];
}

impl<T> DenseData for &[T] {
    type Elem = T;

    fn as_slice(&self) -> &[T] {
        self
    }
}

impl<T> DenseData for &mut [T] {
    type Elem = T;

    fn as_slice(&self) -> &[T] {
        self
    }
}

impl<T> MutDenseData for &mut [T] {
    fn as_mut_slice(&mut self) -> &mut [T] {
        self
    }
}

impl<T> DenseData for Box<[T]> {
    type Elem = T;

    fn as_slice(&self) -> &[T] {
        self
    }
}

impl<T> MutDenseData for Box<[T]> {
    fn as_mut_slice(&mut self) -> &mut [T] {
        self
    }
}

/// A matrix whose `nrows` rows of `ncols` elements are stored back to back.
///
/// Padded layouts are handled by [`StridedBase`], which every numeric routine accepts.
/// Views over borrowed slices are `Copy`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatrixBase<T: DenseData> {
    data: T,
    nrows: usize,
    ncols: usize,
}

/// An owned dense matrix.
pub type Matrix<T> = MatrixBase<Box<[T]>>;

/// A read-only dense view over borrowed memory.
pub type MatrixView<'a, T> = MatrixBase<&'a [T]>;

/// A dense view whose elements can be written but whose shape is fixed.
pub type MutMatrixView<'a, T> = MatrixBase<&'a mut [T]>;

/// Produces the entries of a new [`Matrix`], one call per entry in row-major order.
pub trait Generator<T> {
    fn generate(&mut self) -> T;
}

/// A value fills every entry with a clone of itself, as in `Matrix::new(0.0, 3, 3)`.
impl<T: Clone> Generator<T> for T {
    fn generate(&mut self) -> T {
        self.clone()
    }
}

/// Fills each entry with the next result of the wrapped closure.
pub struct Init<F>(pub F);

impl<T, F> Generator<T> for Init<F>
where
    F: FnMut() -> T,
{
    fn generate(&mut self) -> T {
        (self.0)()
    }
}

impl<T> Matrix<T> {
    /// Allocate an `nrows x ncols` matrix filled from `generator`.
    ///
    /// # Panics
    ///
    /// Panics if `nrows * ncols` overflows `usize`.
    pub fn new<G: Generator<T>>(mut generator: G, nrows: usize, ncols: usize) -> Self {
        let data = (0..element_count(nrows, ncols))
            .map(|_| generator.generate())
            .collect();
        Self { data, nrows, ncols }
    }

    /// Allocate an `nrows x ncols` matrix whose entry `(row, col)` is `f(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if `nrows * ncols` overflows `usize`.
    pub fn from_fn<F>(nrows: usize, ncols: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> T,
    {
        let data = (0..element_count(nrows, ncols))
            .map(|i| f(i / ncols, i % ncols))
            .collect();
        Self { data, nrows, ncols }
    }
}

fn element_count(nrows: usize, ncols: usize) -> usize {
    match shape::required_length(nrows, ncols) {
        Some(count) => count,
        None => panic!("a {nrows}x{ncols} matrix has more than usize::MAX elements"),
    }
}

impl<'a, T> MatrixView<'a, T> {
    /// View the first `nrows * ncols` elements of `data`. Trailing elements are ignored.
    pub fn try_shrink_from(data: &'a [T], nrows: usize, ncols: usize) -> Result<Self, ShapeError> {
        let len = shape::check(data.len(), nrows, ncols, ncols, false)?;
        Ok(Self {
            data: &data[..len],
            nrows,
            ncols,
        })
    }
}

impl<'a, T> MutMatrixView<'a, T> {
    /// Mutably view the first `nrows * ncols` elements of `data`.
    pub fn try_shrink_from_mut(
        data: &'a mut [T],
        nrows: usize,
        ncols: usize,
    ) -> Result<Self, ShapeError> {
        let len = shape::check(data.len(), nrows, ncols, ncols, false)?;
        Ok(Self {
            data: &mut data[..len],
            nrows,
            ncols,
        })
    }
}

impl<T: DenseData> MatrixBase<T> {
    /// Interpret `data` as an `nrows x ncols` matrix. The length of `data` must be exactly
    /// `nrows * ncols`.
    pub fn try_from(data: T, nrows: usize, ncols: usize) -> Result<Self, ShapeError> {
        shape::check(data.as_slice().len(), nrows, ncols, ncols, true)?;
        Ok(Self { data, nrows, ncols })
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

    /// All entries in row-major order.
    pub fn as_slice(&self) -> &[T::Elem] {
        self.data.as_slice()
    }

    pub fn as_mut_slice(&mut self) -> &mut [T::Elem]
    where
        T: MutDenseData,
    {
        self.data.as_mut_slice()
    }

    /// Return row `row`.
    ///
    /// # Panics
    ///
    /// Panics if `row >= self.nrows()`.
    pub fn row(&self, row: usize) -> &[T::Elem] {
        &self.as_slice()[shape::row_span(row, self.nrows, self.ncols, self.ncols)]
    }

    /// Return row `row` for writing.
    ///
    /// # Panics
    ///
    /// Panics if `row >= self.nrows()`.
    pub fn row_mut(&mut self, row: usize) -> &mut [T::Elem]
    where
        T: MutDenseData,
    {
        let span = shape::row_span(row, self.nrows, self.ncols, self.ncols);
        &mut self.as_mut_slice()[span]
    }

    /// Iterate over the rows, starting with row 0.
    pub fn row_iter(&self) -> impl ExactSizeIterator<Item = &[T::Elem]> {
        shape::rows(self.as_slice(), self.nrows, self.ncols, self.ncols)
    }

    /// Iterate mutably over the rows, starting with row 0.
    pub fn row_iter_mut(&mut self) -> impl ExactSizeIterator<Item = &mut [T::Elem]>
    where
        T: MutDenseData,
    {
        let (nrows, ncols) = self.dims();
        shape::rows_mut(self.as_mut_slice(), nrows, ncols, ncols)
    }

    /// Consume the matrix and return its storage.
    pub fn into_inner(self) -> T {
        self.data
    }

    /// Borrow the matrix as a [`MatrixView`].
    pub fn as_view(&self) -> MatrixView<'_, T::Elem> {
        MatrixBase {
            data: self.as_slice(),
            nrows: self.nrows,
            ncols: self.ncols,
        }
    }

    /// Borrow the matrix as a [`MutMatrixView`].
    pub fn as_mut_view(&mut self) -> MutMatrixView<'_, T::Elem>
    where
        T: MutDenseData,
    {
        let (nrows, ncols) = self.dims();
        MatrixBase {
            data: self.as_mut_slice(),
            nrows,
            ncols,
        }
    }

    /// Borrow the matrix as a [`StridedView`] with `row_stride == ncols`.
    pub fn as_strided(&self) -> StridedView<'_, T::Elem> {
        StridedBase::from(self.as_view())
    }
}

impl<T: DenseData> Index<(usize, usize)> for MatrixBase<T> {
    type Output = T::Elem;

    /// # Panics
    ///
    /// Panics if `(row, col)` is outside the matrix.
    fn index(&self, index: (usize, usize)) -> &T::Elem {
        &self.as_slice()[shape::offset(index, self.dims(), self.ncols)]
    }
}

impl<T: MutDenseData> IndexMut<(usize, usize)> for MatrixBase<T> {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut T::Elem {
        let offset = shape::offset(index, self.dims(), self.ncols);
        &mut self.as_mut_slice()[offset]
    }
}
