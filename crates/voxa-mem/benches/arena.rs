// Generational arena benchmarks
//
// These benchmarks measure insert/remove churn (free list reuse), lookups
// through live and stale indices, and iteration over sparse arenas.

use criterion::{
    BenchmarkId, Criterion, black_box, criterion_group, criterion_main,
};
use voxa_mem::Arena;

/// Benchmark sequential inserts into a fresh arena.
fn bench_sequential_inserts(c: &mut Criterion) {
    let mut group = c.benchmark_group("sequential_insert");

    for count in &[64usize, 1024, 16384] {
        group.bench_with_input(
            BenchmarkId::from_parameter(count),
            count,
            |b, &count| {
                b.iter(|| {
                    let mut arena = Arena::with_capacity(count);
                    for i in 0..count {
                        arena.insert(black_box(i));
                    }
                    arena
                });
            },
        );
    }

    group.finish();
}

/// Benchmark insert/remove churn that keeps hitting the free list.
fn bench_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("churn");

    group.bench_function("insert_remove_1024", |b| {
        let mut arena = Arena::new();
        let mut live: Vec<_> = (0..1024).map(|i| arena.insert(i)).collect();

        b.iter(|| {
            for slot in live.iter_mut() {
                let value = arena.remove(*slot).unwrap_or_default();
                *slot = arena.insert(black_box(value + 1));
            }
        });
    });

    group.finish();
}

/// Benchmark lookups through live and stale handles.
fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");

    let mut arena = Arena::new();
    let live: Vec<_> = (0..4096).map(|i| arena.insert(i)).collect();
    let stale: Vec<_> = live.iter().step_by(2).copied().collect();
    for index in &stale {
        arena.remove(*index);
    }

    group.bench_function("live", |b| {
        b.iter(|| {
            let mut sum = 0usize;
            for index in live.iter().skip(1).step_by(2) {
                sum += arena.get(black_box(*index)).copied().unwrap_or(0);
            }
            sum
        });
    });

    group.bench_function("stale", |b| {
        b.iter(|| {
            stale
                .iter()
                .filter(|index| arena.get(black_box(**index)).is_some())
                .count()
        });
    });

    group.bench_function("iterate_sparse", |b| {
        b.iter(|| arena.iter().map(|(_, v)| *v).sum::<usize>());
    });

    group.finish();
}

criterion_group!(benches, bench_sequential_inserts, bench_churn, bench_lookup);
criterion_main!(benches);
