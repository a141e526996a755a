// Container benchmarks
//
// These benchmarks compare the list backings on cursor traversal with and
// without unlinking, and the map backings on keyed lookup.

use criterion::{
    BenchmarkId, Criterion, black_box, criterion_group, criterion_main,
};
use voxa::container::{List, ListKind, Map, MapKind};
use voxa::Object;

fn filled(kind: ListKind, count: usize) -> List {
    let mut list = List::new(kind);
    for i in 0..count {
        list.append(Object::int(i as i32));
    }
    list
}

/// Benchmark a read-only cursor walk over each list backing.
fn bench_cursor_walk(c: &mut Criterion) {
    let mut group = c.benchmark_group("cursor_walk");

    for kind in [ListKind::Linked, ListKind::Array] {
        for count in &[64usize, 1024] {
            group.bench_with_input(
                BenchmarkId::new(format!("{kind:?}"), count),
                count,
                |b, &count| {
                    let mut list = filled(kind, count);
                    b.iter(|| {
                        let mut sum = 0;
                        let mut cursor = list.iterator();
                        while let Some(c) = cursor {
                            sum += c.current().map_or(0, |o| o.as_int().unwrap_or(0));
                            cursor = c.advance();
                        }
                        black_box(sum)
                    });
                },
            );
        }
    }

    group.finish();
}

/// Benchmark unlinking every element through a cursor.
fn bench_cursor_drain(c: &mut Criterion) {
    let mut group = c.benchmark_group("cursor_drain");

    for kind in [ListKind::Linked, ListKind::Array] {
        group.bench_function(format!("{kind:?}_1024"), |b| {
            b.iter_batched(
                || filled(kind, 1024),
                |mut list| {
                    let mut cursor = list.iterator();
                    while let Some(mut c) = cursor {
                        black_box(c.unlink());
                        cursor = c.advance();
                    }
                    list
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

/// Benchmark keyed lookup on each map backing.
fn bench_map_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("map_get");

    for kind in [MapKind::List, MapKind::Hash] {
        for count in &[8usize, 64] {
            let mut map = Map::new(kind);
            let keys: Vec<String> = (0..count).map(|i| format!("feat{i}")).collect();
            for (i, key) in keys.iter().enumerate() {
                map.set_int(key.as_str(), i as i32);
            }
            group.bench_with_input(
                BenchmarkId::new(format!("{kind:?}"), count),
                &keys,
                |b, keys| {
                    b.iter(|| {
                        for key in keys {
                            black_box(map.get(key));
                        }
                    });
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_cursor_walk, bench_cursor_drain, bench_map_get);
criterion_main!(benches);
