/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */
use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use densemat_linalg::{arithmetic, determinant, Strategy};
use densemat_utils::views::{Init, Matrix};
use rand::{distr::Uniform, prelude::Distribution, rngs::StdRng, SeedableRng};

// A symmetric positive-definite matrix so every strategy accepts it.
fn spd(n: usize, seed: u64) -> Matrix<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let range = Uniform::new_inclusive(-1.0, 1.0).unwrap();
    let b = Matrix::new(Init(|| range.sample(&mut rng)), n, n);
    let bt = arithmetic::transpose(b.as_strided());
    let mut a = arithmetic::multiply(bt.as_strided(), b.as_strided()).unwrap();
    for i in 0..n {
        a[(i, i)] += n as f64;
    }
    a
}

fn benchmark_invert(c: &mut Criterion) {
    let mut group = c.benchmark_group("invert");
    for n in [2, 4, 8, 16] {
        let a = spd(n, 0xc0ff33 + n as u64);
        for strategy in Strategy::ALL {
            // The adjugate does O(n^5) work.
            if strategy == Strategy::Adjugate && n > 8 {
                continue;
            }
            group.bench_with_input(BenchmarkId::new(strategy.as_str(), n), &a, |f, a| {
                f.iter(|| black_box(strategy.invert(black_box(a.as_strided()))))
            });
        }
    }
    group.finish();
}

fn benchmark_arithmetic(c: &mut Criterion) {
    let mut group = c.benchmark_group("arithmetic");
    for n in [8, 32, 64] {
        let a = spd(n, 0x5eed);
        let b = spd(n, 0x5eed + 1);
        group.bench_with_input(BenchmarkId::new("multiply", n), &n, |f, _| {
            f.iter(|| black_box(arithmetic::multiply(a.as_strided(), b.as_strided())))
        });
        group.bench_with_input(BenchmarkId::new("determinant", n), &n, |f, _| {
            f.iter(|| black_box(determinant(a.as_strided())))
        });
        group.bench_with_input(BenchmarkId::new("transpose", n), &n, |f, _| {
            f.iter(|| black_box(arithmetic::transpose(a.as_strided())))
        });
    }
    group.finish();
}

criterion_group!(
    name = benches;
    config = Criterion::default()
        .warm_up_time(Duration::from_secs(1))
        .measurement_time(Duration::from_secs(3));
    targets = benchmark_invert, benchmark_arithmetic
);
criterion_main!(benches);
