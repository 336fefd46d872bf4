//! Estimator benchmarks over synthetic roster collections.
//!
//! Run with: `cargo bench --package canteras-bench`

use canteras_bench::synthetic_roster;
use canteras_lib::Estimator;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

fn estimate_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("estimate_collection");
    let estimator = Estimator::default();

    for size in [100u32, 1_000, 10_000] {
        let collection = synthetic_roster(size);
        group.throughput(Throughput::Elements(u64::from(size)));
        group.bench_with_input(BenchmarkId::from_parameter(size), &collection, |b, c| {
            b.iter(|| estimator.estimate_collection(black_box(c)));
        });
    }

    group.finish();
}

criterion_group!(benches, estimate_benchmark);
criterion_main!(benches);
