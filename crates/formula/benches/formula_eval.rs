// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Benchmarks for formula compilation and evaluation.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use formula::{parse, EngineConfig, FormulaEngine};
use tensor_core::{Shape, Tensor};

const LAYER: &str = "sigmoid((%0.m1 x %1).T).v";
const BACKWARD: &str = "Dsigmoid(%0) * (%1 - %2) * 0.5 + sumSqr(%1) / 100";

fn ramp(shape: Shape) -> Tensor<f32> {
    let n = shape.num_elements();
    Tensor::from_vec(shape, (0..n).map(|i| (i % 11) as f32 * 0.1 - 0.5).collect()).unwrap()
}

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse_backward_formula", |bench| {
        bench.iter(|| parse(black_box(BACKWARD)).unwrap())
    });
}

fn bench_cached_vs_uncached(c: &mut Criterion) {
    let cached = FormulaEngine::<f32>::default();
    let uncached = FormulaEngine::<f32>::new(EngineConfig {
        cache_formulas: false,
        ..Default::default()
    })
    .unwrap();

    let input = ramp(Shape::vector(64));
    let weights = ramp(Shape::matrix(64, 32));
    let out = ramp(Shape::vector(32));
    let target = ramp(Shape::vector(32));

    let mut group = c.benchmark_group("layer_forward");
    group.bench_function("cached", |bench| {
        bench.iter(|| cached.calculate(black_box(&input), LAYER, &[&weights]).unwrap())
    });
    group.bench_function("uncached", |bench| {
        bench.iter(|| uncached.calculate(black_box(&input), LAYER, &[&weights]).unwrap())
    });
    group.finish();

    let mut group = c.benchmark_group("layer_backward");
    group.bench_function("cached", |bench| {
        bench.iter(|| cached.calculate(black_box(&out), BACKWARD, &[&out, &target]).unwrap())
    });
    group.bench_function("uncached", |bench| {
        bench.iter(|| uncached.calculate(black_box(&out), BACKWARD, &[&out, &target]).unwrap())
    });
    group.finish();
}

criterion_group!(benches, bench_parse, bench_cached_vs_uncached);
criterion_main!(benches);
