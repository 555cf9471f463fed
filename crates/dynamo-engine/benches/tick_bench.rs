//! Tick throughput of the reference pipeline.

use criterion::{criterion_group, criterion_main, Criterion};

use dynamo_engine::layout::{default_phases, initial_store};
use dynamo_engine::TickEngine;
use dynamo_store::SharedStore;

fn bench_execute_tick(c: &mut Criterion) {
    c.bench_function("execute_tick/reference_plant", |b| {
        let mut engine =
            TickEngine::new(SharedStore::new(initial_store()), default_phases(), 42);
        b.iter(|| engine.execute_tick().unwrap());
    });

    c.bench_function("snapshot/reference_plant", |b| {
        let engine = TickEngine::new(SharedStore::new(initial_store()), default_phases(), 42);
        b.iter(|| engine.store().snapshot());
    });
}

criterion_group!(benches, bench_execute_tick);
criterion_main!(benches);
