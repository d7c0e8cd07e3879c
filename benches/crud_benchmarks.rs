use avl_multiset::AvlMultiset;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::collections::BTreeMap;

const N: usize = 10_000;

// ─── Helper functions to generate value sequences ───────────────────────────

fn ordered_values(n: usize) -> Vec<i64> {
    (0..n as i64).collect()
}

fn random_values(n: usize) -> Vec<i64> {
    // Use a simple LCG for a deterministic pseudo-random sequence; the modulus
    // keeps roughly one duplicate per distinct value.
    let mut values = Vec::with_capacity(n);
    let mut x: u64 = 12345;
    for _ in 0..n {
        x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
        values.push(((x >> 33) % (n as u64 / 2)) as i64);
    }
    values
}

/// Multiset built on a `BTreeMap` of counts, for comparison.
fn btree_insert(map: &mut BTreeMap<i64, usize>, value: i64) {
    *map.entry(value).or_insert(0) += 1;
}

/// Rank selection on a `BTreeMap` of counts is a linear scan.
fn btree_value_at(map: &BTreeMap<i64, usize>, mut rank: usize) -> Option<i64> {
    for (&value, &count) in map {
        if rank < count {
            return Some(value);
        }
        rank -= count;
    }
    None
}

// ─── Insert ─────────────────────────────────────────────────────────────────

fn bench_insert(c: &mut Criterion) {
    for (name, values) in [("ordered", ordered_values(N)), ("random", random_values(N))] {
        let mut group = c.benchmark_group(format!("insert_{name}"));

        group.bench_function(BenchmarkId::new("AvlMultiset", N), |b| {
            b.iter(|| {
                let mut set = AvlMultiset::new();
                for &v in &values {
                    set.insert(v);
                }
                set
            });
        });

        group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
            b.iter(|| {
                let mut map = BTreeMap::new();
                for &v in &values {
                    btree_insert(&mut map, v);
                }
                map
            });
        });

        group.bench_function(BenchmarkId::new("SortedVec", N), |b| {
            b.iter(|| {
                let mut vec: Vec<i64> = Vec::with_capacity(values.len());
                for &v in &values {
                    let at = vec.partition_point(|&x| x <= v);
                    vec.insert(at, v);
                }
                vec
            });
        });

        group.finish();
    }
}

// ─── Contains ───────────────────────────────────────────────────────────────

fn bench_contains(c: &mut Criterion) {
    let values = random_values(N);
    let set: AvlMultiset<i64> = values.iter().copied().collect();
    let mut map = BTreeMap::new();
    for &v in &values {
        btree_insert(&mut map, v);
    }

    let mut group = c.benchmark_group("contains_random");

    group.bench_function(BenchmarkId::new("AvlMultiset", N), |b| {
        b.iter(|| values.iter().filter(|&v| set.contains(v)).count());
    });

    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter(|| values.iter().filter(|&v| map.contains_key(v)).count());
    });

    group.finish();
}

// ─── Remove ─────────────────────────────────────────────────────────────────

fn bench_remove(c: &mut Criterion) {
    let values = random_values(N);
    let set: AvlMultiset<i64> = values.iter().copied().collect();

    let mut group = c.benchmark_group("remove_random");

    group.bench_function(BenchmarkId::new("AvlMultiset", N), |b| {
        b.iter_batched(
            || set.clone(),
            |mut set| {
                for v in &values {
                    set.remove(v).expect("value was inserted");
                }
                set
            },
            criterion::BatchSize::LargeInput,
        );
    });

    group.finish();
}

// ─── Select by rank ─────────────────────────────────────────────────────────

fn bench_value_at(c: &mut Criterion) {
    let values = random_values(N);
    let set: AvlMultiset<i64> = values.iter().copied().collect();
    let mut map = BTreeMap::new();
    for &v in &values {
        btree_insert(&mut map, v);
    }
    let ranks: Vec<usize> = (0..N).step_by(97).collect();

    let mut group = c.benchmark_group("value_at");

    group.bench_function(BenchmarkId::new("AvlMultiset", ranks.len()), |b| {
        b.iter(|| ranks.iter().map(|&r| *set.value_at(r).expect("rank in range")).fold(0i64, i64::wrapping_add));
    });

    group.bench_function(BenchmarkId::new("BTreeMap", ranks.len()), |b| {
        b.iter(|| {
            ranks.iter().map(|&r| btree_value_at(&map, r).expect("rank in range")).fold(0i64, i64::wrapping_add)
        });
    });

    group.finish();
}

// ─── Criterion Groups ───────────────────────────────────────────────────────

criterion_group!(insert_benches, bench_insert);

criterion_group!(query_benches, bench_contains, bench_value_at);

criterion_group!(remove_benches, bench_remove);

criterion_main!(insert_benches, query_benches, remove_benches);
