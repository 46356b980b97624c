use clique_percolation::prelude::*;
use criterion::{criterion_group, criterion_main, Criterion};

const BENCH_BLOOM: BloomConfig = BloomConfig {
    filter_bits: 1 << 24,
    hash_seed: 0,
};

fn clique_percolation(c: &mut Criterion) {
    let graph_sparse = Graph::random_graph(1e3 as usize, 1e-2);
    let graph_dense = Graph::random_graph(2e2 as usize, 2e-1);

    c.bench_function("Clique Enumeration (10^3, sparse)", |b| {
        b.iter(|| enumerate_cliques(&graph_sparse, 3).unwrap())
    });

    c.bench_function("Clique Enumeration (2 * 10^2, dense)", |b| {
        b.iter(|| enumerate_cliques(&graph_dense, 3).unwrap())
    });

    let cliques = enumerate_cliques(&graph_dense, 3).unwrap();
    if !cliques.is_empty() {
        c.bench_function("Percolation (2 * 10^2, dense)", |b| {
            b.iter(|| percolate(&cliques, 3, &BENCH_BLOOM, |_, _, _| Ok(())).unwrap())
        });
    }
}

criterion_group!(benches, clique_percolation);
criterion_main!(benches);
