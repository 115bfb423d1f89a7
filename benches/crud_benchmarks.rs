use criterion::{BatchSize, BenchmarkGroup, BenchmarkId, Criterion, criterion_group, criterion_main};
use criterion::measurement::WallTime;
use std::collections::BTreeSet;
use std::ops::Bound::{Excluded, Unbounded};
use kiln_tree::{AvlSet, BTreeSet4, MultiwaySet, TwoThreeSet};

const N: usize = 10_000;

// ─── Helper functions to generate key sequences ─────────────────────────────

fn ordered_keys(n: usize) -> Vec<u64> {
    (0..n as u64).collect()
}

fn reverse_ordered_keys(n: usize) -> Vec<u64> {
    (0..n as u64).rev().collect()
}

fn random_keys(n: usize) -> Vec<u64> {
    // Use a simple LCG for deterministic pseudo-random sequence
    let mut keys = Vec::with_capacity(n);
    let mut x: u64 = 12345;
    for _ in 0..n {
        x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
        keys.push(x >> 33);
    }
    keys
}

// ─── Uniform access to every set under test ─────────────────────────────────

trait BenchSet: Default {
    const NAME: &'static str;
    fn put(&mut self, key: u64);
    fn has(&self, key: u64) -> bool;
    fn take(&mut self, key: u64);
    fn next_after(&self, key: u64) -> Option<u64>;
}

impl BenchSet for AvlSet {
    const NAME: &'static str = "AvlSet";
    fn put(&mut self, key: u64) {
        self.insert(key);
    }
    fn has(&self, key: u64) -> bool {
        self.contains(key)
    }
    fn take(&mut self, key: u64) {
        self.remove(key);
    }
    fn next_after(&self, key: u64) -> Option<u64> {
        self.successor(key)
    }
}

macro_rules! multiway_bench_set {
    ($($set:ty => $name:literal),* $(,)?) => {$(
        impl BenchSet for $set {
            const NAME: &'static str = $name;
            fn put(&mut self, key: u64) {
                self.insert(key);
            }
            fn has(&self, key: u64) -> bool {
                self.contains(key)
            }
            fn take(&mut self, key: u64) {
                self.remove(key);
            }
            fn next_after(&self, key: u64) -> Option<u64> {
                self.successor(key)
            }
        }
    )*};
}

multiway_bench_set! {
    TwoThreeSet => "TwoThreeSet",
    BTreeSet4 => "BTreeSet4",
    MultiwaySet<16> => "MultiwaySet16",
}

impl BenchSet for BTreeSet<u64> {
    const NAME: &'static str = "BTreeSet";
    fn put(&mut self, key: u64) {
        self.insert(key);
    }
    fn has(&self, key: u64) -> bool {
        self.contains(&key)
    }
    fn take(&mut self, key: u64) {
        self.remove(&key);
    }
    fn next_after(&self, key: u64) -> Option<u64> {
        self.range((Excluded(key), Unbounded)).next().copied()
    }
}

fn build<S: BenchSet>(keys: &[u64]) -> S {
    let mut set = S::default();
    for &k in keys {
        set.put(k);
    }
    set
}

// ─── Per-operation measurements ─────────────────────────────────────────────

fn insert_into<S: BenchSet>(group: &mut BenchmarkGroup<'_, WallTime>, keys: &[u64]) {
    group.bench_function(BenchmarkId::new(S::NAME, N), |b| {
        b.iter(|| build::<S>(keys));
    });
}

fn contains_in<S: BenchSet>(group: &mut BenchmarkGroup<'_, WallTime>, keys: &[u64]) {
    let set = build::<S>(keys);
    group.bench_function(BenchmarkId::new(S::NAME, N), |b| {
        b.iter(|| {
            let mut count = 0usize;
            for &k in keys {
                if set.has(k) {
                    count += 1;
                }
            }
            count
        });
    });
}

fn successor_in<S: BenchSet>(group: &mut BenchmarkGroup<'_, WallTime>, keys: &[u64]) {
    let set = build::<S>(keys);
    group.bench_function(BenchmarkId::new(S::NAME, N), |b| {
        b.iter(|| {
            let mut sum = 0u64;
            for &k in keys {
                sum = sum.wrapping_add(set.next_after(k).unwrap_or(0));
            }
            sum
        });
    });
}

fn remove_from<S: BenchSet>(group: &mut BenchmarkGroup<'_, WallTime>, keys: &[u64]) {
    group.bench_function(BenchmarkId::new(S::NAME, N), |b| {
        b.iter_batched(
            || build::<S>(keys),
            |mut set| {
                for &k in keys {
                    set.take(k);
                }
                set
            },
            BatchSize::SmallInput,
        );
    });
}

macro_rules! bench_all_sets {
    ($c:expr, $group_name:literal, $measure:ident, $keys:expr) => {{
        let keys = $keys;
        let mut group = $c.benchmark_group($group_name);
        $measure::<AvlSet>(&mut group, &keys);
        $measure::<TwoThreeSet>(&mut group, &keys);
        $measure::<BTreeSet4>(&mut group, &keys);
        $measure::<MultiwaySet<16>>(&mut group, &keys);
        $measure::<BTreeSet<u64>>(&mut group, &keys);
        group.finish();
    }};
}

// ─── Set Benchmarks ─────────────────────────────────────────────────────────

fn bench_insert(c: &mut Criterion) {
    bench_all_sets!(c, "insert_ordered", insert_into, ordered_keys(N));
    bench_all_sets!(c, "insert_reverse", insert_into, reverse_ordered_keys(N));
    bench_all_sets!(c, "insert_random", insert_into, random_keys(N));
}

fn bench_contains(c: &mut Criterion) {
    bench_all_sets!(c, "contains_ordered", contains_in, ordered_keys(N));
    bench_all_sets!(c, "contains_reverse", contains_in, reverse_ordered_keys(N));
    bench_all_sets!(c, "contains_random", contains_in, random_keys(N));
}

fn bench_successor(c: &mut Criterion) {
    bench_all_sets!(c, "successor_random", successor_in, random_keys(N));
}

fn bench_remove(c: &mut Criterion) {
    bench_all_sets!(c, "remove_ordered", remove_from, ordered_keys(N));
    bench_all_sets!(c, "remove_reverse", remove_from, reverse_ordered_keys(N));
    bench_all_sets!(c, "remove_random", remove_from, random_keys(N));
}

// ─── Criterion Groups ───────────────────────────────────────────────────────

criterion_group!(insert_benches, bench_insert);

criterion_group!(query_benches, bench_contains, bench_successor);

criterion_group!(remove_benches, bench_remove);

criterion_main!(insert_benches, query_benches, remove_benches);
