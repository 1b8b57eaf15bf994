//! Criterion benchmarks comparing Mosstree against other ordered sets.
//!
//! This benchmark suite compares:
//! - `mosstree::Tree` - multiway search tree with lazy overflow subtrees
//! - `std::collections::BTreeSet` - standard library B-tree set
//!
//! Insertion order matters a lot for mosstree (the tree never rebalances),
//! so sequential and random key sets are benchmarked separately.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use mosstree::Tree;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::BTreeSet;
use std::hint::black_box;

const SEED: u64 = 42;

// ============================================================================
// Helper Functions
// ============================================================================

/// Generate sequential keys from 0 to count-1
fn sequential_keys(count: usize) -> Vec<i64> {
	(0..count as i64).collect()
}

/// Generate random keys using a seeded RNG
fn random_keys(count: usize) -> Vec<i64> {
	let mut rng = StdRng::seed_from_u64(SEED);
	(0..count).map(|_| rng.random()).collect()
}

/// Generate keys that don't exist in a sequential key set
fn missing_keys(count: usize) -> Vec<i64> {
	(0..count as i64).map(|i| -(i + 1)).collect()
}

// ============================================================================
// Insert Benchmarks
// ============================================================================

fn bench_insert(c: &mut Criterion) {
	for (label, keygen) in [
		("insert_sequential", sequential_keys as fn(usize) -> Vec<i64>),
		("insert_random", random_keys),
	] {
		let mut group = c.benchmark_group(label);

		for count in [1_000, 10_000, 100_000] {
			let keys = keygen(count);
			group.throughput(Throughput::Elements(count as u64));

			// Mosstree
			group.bench_with_input(BenchmarkId::new("mosstree", count), &keys, |b, keys| {
				b.iter_batched(
					Tree::new,
					|mut tree| {
						for &k in keys {
							black_box(tree.insert(k));
						}
						tree
					},
					criterion::BatchSize::SmallInput,
				)
			});

			// BTreeSet
			group.bench_with_input(BenchmarkId::new("btreeset", count), &keys, |b, keys| {
				b.iter_batched(
					BTreeSet::new,
					|mut set| {
						for &k in keys {
							black_box(set.insert(k));
						}
						set
					},
					criterion::BatchSize::SmallInput,
				)
			});
		}

		group.finish();
	}
}

// ============================================================================
// Lookup Benchmarks
// ============================================================================

fn bench_lookup(c: &mut Criterion) {
	let mut group = c.benchmark_group("lookup");

	for count in [1_000, 10_000, 100_000] {
		let keys = random_keys(count);
		let probes: Vec<i64> = keys
			.iter()
			.copied()
			.chain(missing_keys(count / 4))
			.collect();
		group.throughput(Throughput::Elements(probes.len() as u64));

		let mut tree: Tree<i64> = Tree::new();
		let mut set: BTreeSet<i64> = BTreeSet::new();
		for &k in &keys {
			tree.insert(k);
			set.insert(k);
		}

		group.bench_with_input(BenchmarkId::new("mosstree", count), &probes, |b, probes| {
			b.iter(|| {
				let mut hits = 0usize;
				for k in probes {
					if tree.contains(black_box(k)) {
						hits += 1;
					}
				}
				hits
			})
		});

		group.bench_with_input(BenchmarkId::new("btreeset", count), &probes, |b, probes| {
			b.iter(|| {
				let mut hits = 0usize;
				for k in probes {
					if set.contains(black_box(k)) {
						hits += 1;
					}
				}
				hits
			})
		});
	}

	group.finish();
}

// ============================================================================
// Iteration Benchmarks
// ============================================================================

fn bench_iterate(c: &mut Criterion) {
	let mut group = c.benchmark_group("iterate");

	for count in [1_000, 10_000, 100_000] {
		let keys = random_keys(count);
		group.throughput(Throughput::Elements(count as u64));

		let mut tree: Tree<i64> = Tree::new();
		let mut set: BTreeSet<i64> = BTreeSet::new();
		for &k in &keys {
			tree.insert(k);
			set.insert(k);
		}

		group.bench_with_input(BenchmarkId::new("mosstree", count), &(), |b, _| {
			b.iter(|| {
				let mut sum = 0i64;
				for &k in &tree {
					sum = sum.wrapping_add(k);
				}
				black_box(sum)
			})
		});

		group.bench_with_input(BenchmarkId::new("mosstree_rev", count), &(), |b, _| {
			b.iter(|| {
				let mut sum = 0i64;
				for &k in tree.iter().rev() {
					sum = sum.wrapping_add(k);
				}
				black_box(sum)
			})
		});

		group.bench_with_input(BenchmarkId::new("btreeset", count), &(), |b, _| {
			b.iter(|| {
				let mut sum = 0i64;
				for &k in &set {
					sum = sum.wrapping_add(k);
				}
				black_box(sum)
			})
		});
	}

	group.finish();
}

criterion_group!(benches, bench_insert, bench_lookup, bench_iterate);
criterion_main!(benches);
