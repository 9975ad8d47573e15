/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use anyhow::Context;
use densemat_utils::{strided::StridedView, views::Matrix, ShapeError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The on-disk JSON representation of a row-major matrix.
///
/// ```json
/// { "nrows": 2, "ncols": 2, "data": [4.0, 7.0, 2.0, 6.0] }
/// ```
///
/// `row_stride` may be given to describe a matrix whose rows are padded. It defaults to
/// `ncols`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MatrixFile {
    pub nrows: usize,
    pub ncols: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_stride: Option<usize>,
    pub data: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatrixFileError {
    #[error("row_stride {row_stride} is smaller than ncols {ncols}")]
    StrideTooSmall { row_stride: usize, ncols: usize },
    #[error(transparent)]
    View(#[from] ShapeError),
}

impl MatrixFile {
    /// Read a matrix from the JSON file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("parsing matrix file {}", path.display()))
    }

    /// Write the matrix as JSON to `path`, replacing any existing file.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    /// Return the row stride, defaulting to `ncols`.
    pub fn row_stride(&self) -> usize {
        self.row_stride.unwrap_or(self.ncols)
    }

    /// View the stored data as a matrix.
    ///
    /// Trailing data beyond `nrows * row_stride` elements is ignored.
    pub fn view(&self) -> Result<StridedView<'_, f64>, MatrixFileError> {
        let row_stride = self.row_stride();
        if row_stride < self.ncols {
            return Err(MatrixFileError::StrideTooSmall {
                row_stride,
                ncols: self.ncols,
            });
        }
        Ok(StridedView::try_shrink_from(
            &self.data,
            self.nrows,
            self.ncols,
            row_stride,
        )?)
    }
}

impl From<Matrix<f64>> for MatrixFile {
    fn from(matrix: Matrix<f64>) -> Self {
        let (nrows, ncols) = matrix.dims();
        Self {
            nrows,
            ncols,
            row_stride: None,
            data: matrix.into_inner().into_vec(),
        }
    }
}
