// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Benchmarks for the inference lifecycle on the reference classifier.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use memory_manager::{PoolBudget, ResourcePool};
use model_ir::ModelHandle;
use runtime::{
    reference, ExecutionContext, InferenceController, OperationRegistry, RecordingReporter,
    REFERENCE_RR_INTERVALS,
};

fn bench_full_lifecycle(c: &mut Criterion) {
    let mut pool = ResourcePool::new(PoolBudget::default()).unwrap();
    c.bench_function("lifecycle_run_reference", |b| {
        b.iter(|| {
            let mut controller = InferenceController::new(RecordingReporter::new());
            controller
                .run(
                    black_box(reference::REFERENCE_MODEL),
                    &mut pool,
                    black_box(&REFERENCE_RR_INTERVALS),
                )
                .unwrap()
        });
    });
}

fn bench_parse_and_verify(c: &mut Criterion) {
    c.bench_function("model_handle_load", |b| {
        b.iter(|| ModelHandle::load(black_box(reference::REFERENCE_MODEL)).unwrap());
    });
}

fn bench_bound_invoke(c: &mut Criterion) {
    let handle = ModelHandle::load(reference::REFERENCE_MODEL).unwrap();
    let mut pool = ResourcePool::new(PoolBudget::default()).unwrap();
    let registry = OperationRegistry::all_ops();
    let mut ctx = ExecutionContext::bind(&handle, &mut pool, &registry).unwrap();

    c.bench_function("bound_write_invoke_read", |b| {
        b.iter(|| {
            ctx.write_input(0, black_box(&REFERENCE_RR_INTERVALS)).unwrap();
            ctx.invoke().unwrap();
            ctx.read_output(0).unwrap()[0]
        });
    });
}

criterion_group!(
    benches,
    bench_full_lifecycle,
    bench_parse_and_verify,
    bench_bound_invoke
);
criterion_main!(benches);
