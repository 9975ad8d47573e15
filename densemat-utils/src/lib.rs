/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

//! Storage-level building blocks for `densemat`: dense and strided row-major matrix views
//! over caller-owned memory, and a thread-safe object pool used for scratch buffers.

// Views
pub mod shape;
pub mod strided;
pub mod views;

pub use shape::ShapeError;
pub use strided::{MutStridedView, StridedView};
pub use views::{Matrix, MatrixView, MutMatrixView};

// Pooling
pub mod pool;
pub use pool::{AsPooled, Filled, ObjectPool, PooledRef};
