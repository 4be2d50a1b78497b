use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use ctiprd_kernel::hash::{PairKey, PairMap};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use std::hint::black_box;

// ============================================================================
// Benchmark: symmetric type-pair lookups
// ============================================================================

fn sorted(a: usize, b: usize) -> (usize, usize) {
    if a <= b { (a, b) } else { (b, a) }
}

fn bench_pair_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("pair_lookup");

    for n_types in [4_usize, 16, 64] {
        let mut fx: PairMap<f64> = PairMap::default();
        let mut btree: BTreeMap<(usize, usize), f64> = BTreeMap::new();
        for a in 0..n_types {
            for b in a..n_types {
                fx.insert(PairKey::new(a, b), (a * b) as f64);
                btree.insert((a, b), (a * b) as f64);
            }
        }

        let mut rng = StdRng::seed_from_u64(7);
        let queries: Vec<(usize, usize)> =
            (0..4096).map(|_| (rng.random_range(0..n_types), rng.random_range(0..n_types))).collect();

        group.bench_with_input(BenchmarkId::new("fx_pair_key", n_types), &queries, |bench, queries| {
            bench.iter(|| {
                let mut acc = 0.;
                for &(a, b) in queries {
                    acc += fx.get(&PairKey::new(a, b)).copied().unwrap_or_default();
                }
                black_box(acc)
            });
        });

        group.bench_with_input(BenchmarkId::new("btree_sorted", n_types), &queries, |bench, queries| {
            bench.iter(|| {
                let mut acc = 0.;
                for &(a, b) in queries {
                    acc += btree.get(&sorted(a, b)).copied().unwrap_or_default();
                }
                black_box(acc)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_pair_lookup);
criterion_main!(benches);
