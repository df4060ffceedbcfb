//! Benchmarks for index build and search.
//!
//! Measures the two hot paths: the SIMD distance kernel and the two-stage
//! top-k search over a clustered synthetic collection.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use tessera::storage::{self, VectorStorage};
use tessera::{simd, IndexConfig, IvfIndex};

fn clustered_rows(n: usize, dim: usize, num_means: usize, seed: u64) -> Vec<Vec<f32>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let means: Vec<Vec<f32>> = (0..num_means)
        .map(|_| (0..dim).map(|_| rng.random_range(0.0..1.0)).collect())
        .collect();
    (0..n)
        .map(|i| {
            means[i % num_means]
                .iter()
                .map(|&m| m + rng.random_range(-0.05..0.05))
                .collect()
        })
        .collect()
}

fn built_index(rows: &[Vec<f32>], probe_fraction: f32) -> IvfIndex {
    let config = IndexConfig {
        probe_fraction,
        kmeans_iterations: 25,
        ..IndexConfig::default()
    };
    let mut vectors = storage::new_storage(config.storage, rows[0].len(), rows.len());
    for (id, row) in rows.iter().enumerate() {
        vectors.add_vector(id as i32, row).expect("valid row");
    }
    let mut index = IvfIndex::new(config);
    index.build(vectors).expect("build");
    index
}

fn bench_distance_kernel(c: &mut Criterion) {
    let mut group = c.benchmark_group("l2_distance_squared");
    let mut rng = StdRng::seed_from_u64(42);

    for dim in [64usize, 128, 256, 768] {
        let a: Vec<f32> = (0..dim).map(|_| rng.random_range(-1.0..1.0)).collect();
        let b: Vec<f32> = (0..dim).map(|_| rng.random_range(-1.0..1.0)).collect();

        group.throughput(Throughput::Elements(dim as u64));
        group.bench_with_input(BenchmarkId::from_parameter(dim), &dim, |bench, _| {
            bench.iter(|| simd::l2_distance_squared(black_box(&a), black_box(&b)));
        });
    }
    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let rows = clustered_rows(20_000, 64, 100, 7);
    let index = built_index(&rows, 0.05);

    let mut rng = StdRng::seed_from_u64(9);
    let queries: Vec<Vec<f32>> = (0..64)
        .map(|_| (0..64).map(|_| rng.random_range(0.0..1.0)).collect())
        .collect();

    let mut cursor = 0usize;
    c.bench_function("search_top10_20k", |bench| {
        bench.iter(|| {
            let query = &queries[cursor % queries.len()];
            cursor += 1;
            index.search(black_box(query), 10).expect("search")
        });
    });
}

criterion_group!(benches, bench_distance_kernel, bench_search);
criterion_main!(benches);
