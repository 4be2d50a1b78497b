use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use ctiprd_kernel::index::Index;
use std::hint::black_box;

// ============================================================================
// Benchmark: flat row-major storage vs. nested vectors
// ============================================================================

fn bench_grid_sum(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid_sum");

    for n in [16_usize, 64, 128] {
        let index = Index::new([n, n, n]);
        let flat: Vec<f64> = (0..index.size()).map(|i| i as f64).collect();
        let nested: Vec<Vec<Vec<f64>>> = (0..n)
            .map(|i| (0..n).map(|j| (0..n).map(|k| index.index(&[i, j, k]) as f64).collect()).collect())
            .collect();

        group.bench_with_input(BenchmarkId::new("flat_index", n), &flat, |bench, flat| {
            bench.iter(|| {
                let mut acc = 0.;
                for i in 0..n {
                    for j in 0..n {
                        for k in 0..n {
                            acc += flat[index.index(&[i, j, k])];
                        }
                    }
                }
                black_box(acc)
            });
        });

        group.bench_with_input(BenchmarkId::new("nested_vec", n), &nested, |bench, nested| {
            bench.iter(|| {
                let mut acc = 0.;
                for plane in nested {
                    for row in plane {
                        for x in row {
                            acc += x;
                        }
                    }
                }
                black_box(acc)
            });
        });

        group.bench_function(BenchmarkId::new("inverse", n), |bench| {
            bench.iter(|| {
                let mut acc = 0;
                for ix in (0..index.size()).step_by(7) {
                    acc += index.inverse(black_box(ix))[2];
                }
                black_box(acc)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_grid_sum);
criterion_main!(benches);
