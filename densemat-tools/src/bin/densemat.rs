/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use densemat_linalg::Strategy;
use densemat_tools::utils::{self, tracing::init_subscriber, JobConfig, MatrixFile};
use densemat_utils::views::Matrix;

/// Dense matrix operations on JSON matrix files.
#[derive(Parser, Debug)]
#[command(name = "densemat", about = "Dense matrix operations on JSON matrix files")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Invert a square matrix.
    Invert {
        /// Input matrix file.
        input: PathBuf,

        /// Output file. The result is printed to stdout if omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// JSON job file with `strategy`, `verify` and `tolerance`. Command line flags
        /// take precedence.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Inversion strategy: gauss-jordan, cholesky, cayley-hamilton or adjugate.
        #[arg(short, long)]
        strategy: Option<Strategy>,

        /// Check that `A * A^-1` is close to the identity.
        #[arg(long)]
        verify: bool,

        /// Largest accepted deviation from the identity when verifying.
        #[arg(long)]
        tolerance: Option<f64>,
    },

    /// Print the determinant of a square matrix.
    Det {
        /// Input matrix file.
        input: PathBuf,
    },

    /// Multiply two matrices.
    Multiply {
        /// Left operand.
        lhs: PathBuf,

        /// Right operand.
        rhs: PathBuf,

        /// Output file. The result is printed to stdout if omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Transpose a matrix.
    Transpose {
        /// Input matrix file.
        input: PathBuf,

        /// Output file. The result is printed to stdout if omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn emit(matrix: Matrix<f64>, output: Option<&Path>) -> Result<()> {
    let file = MatrixFile::from(matrix);
    match output {
        Some(path) => {
            file.save(path)?;
            tracing::info!(path = %path.display(), "wrote result");
        }
        None => println!("{}", serde_json::to_string_pretty(&file)?),
    }
    Ok(())
}

fn run(args: Args) -> Result<()> {
    match args.command {
        Command::Invert {
            input,
            output,
            config,
            strategy,
            verify,
            tolerance,
        } => {
            let mut job = match config {
                Some(path) => JobConfig::load(&path)?,
                None => JobConfig::default(),
            };
            if let Some(strategy) = strategy {
                job.strategy = strategy;
            }
            job.verify |= verify;
            if let Some(tolerance) = tolerance {
                job.tolerance = tolerance;
            }

            let inverse = utils::invert(&MatrixFile::load(&input)?, &job)?;
            emit(inverse, output.as_deref())
        }
        Command::Det { input } => {
            println!("{}", utils::det(&MatrixFile::load(&input)?)?);
            Ok(())
        }
        Command::Multiply { lhs, rhs, output } => {
            let product = utils::multiply(&MatrixFile::load(&lhs)?, &MatrixFile::load(&rhs)?)?;
            emit(product, output.as_deref())
        }
        Command::Transpose { input, output } => {
            let transposed = utils::transpose(&MatrixFile::load(&input)?)?;
            emit(transposed, output.as_deref())
        }
    }
}

fn main() -> Result<()> {
    init_subscriber();

    let result = run(Args::parse());
    if let Err(ref err) = result {
        tracing::error!("{err:#}");
    }
    result
}
