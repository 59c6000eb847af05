//! Benchmarks for GLL metadata generation.
//!
//! Run with: `cargo bench --bench metadata_bench`
//!
//! Measures the full pass on cubed spheres of increasing resolution and the
//! node registry on its own.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use gllmeta_rs::mesh::SphereMesh;
use gllmeta_rs::metadata::{MetadataConfig, NodeRegistry, generate_metadata};
use gllmeta_rs::operators::BubbleCorrection;

/// Benchmark the full pass for several mesh resolutions.
fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_metadata");
    group.sample_size(20);

    for ne in [4, 8, 16] {
        let mesh = SphereMesh::cubed_sphere(ne);
        let config = MetadataConfig::new(4);
        group.bench_with_input(BenchmarkId::new("np4", ne), &mesh, |b, mesh| {
            b.iter(|| generate_metadata(black_box(mesh), &config).unwrap());
        });
    }

    let mesh = SphereMesh::cubed_sphere(8);
    let config = MetadataConfig::new(4).with_bubble(BubbleCorrection::Interior);
    group.bench_function("np4_interior_bubble/8", |b| {
        b.iter(|| generate_metadata(black_box(&mesh), &config).unwrap());
    });

    group.finish();
}

/// Benchmark coordinate resolution alone.
fn bench_registry(c: &mut Criterion) {
    let points: Vec<[f64; 3]> = SphereMesh::cubed_sphere(32).vertices;

    c.bench_function("node_registry_resolve", |b| {
        b.iter(|| {
            let mut registry = NodeRegistry::new(1e-10).unwrap();
            for p in &points {
                black_box(registry.resolve(p));
            }
            // Second pass hits existing nodes.
            for p in &points {
                black_box(registry.resolve(p));
            }
            registry.len()
        });
    });
}

criterion_group!(benches, bench_generate, bench_registry);
criterion_main!(benches);
