/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */
pub mod tracing;

pub mod matrix_file;
pub use matrix_file::*;

pub mod job;
pub use job::*;

pub mod commands;
pub use commands::*;
