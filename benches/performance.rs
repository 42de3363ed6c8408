// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Performance benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nalgebra::{Point3, Vector3};
use polyiou::{Dimension, GeometryEngine, HullBuilder2D, HullBuilder3D, Primitive, SolidBoolean};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn cloud(count: usize) -> Vec<Point3<f64>> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..count)
        .map(|_| {
            Point3::new(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
            )
        })
        .collect()
}

fn bench_hulls(c: &mut Criterion) {
    let mut group = c.benchmark_group("hull");
    let builder = HullBuilder3D::default();

    for count in [8, 64, 512] {
        let points = cloud(count);
        group.bench_with_input(BenchmarkId::new("quickhull", count), &points, |b, points| {
            b.iter(|| builder.build(black_box(points)));
        });

        let planar: Vec<_> = points.iter().map(|p| p.xy()).collect();
        group.bench_with_input(BenchmarkId::new("monotone_chain", count), &planar, |b, points| {
            b.iter(|| HullBuilder2D::new().build(black_box(points)));
        });
    }

    group.finish();
}

fn bench_booleans(c: &mut Criterion) {
    let mut group = c.benchmark_group("boolean");
    let builder = HullBuilder3D::default();
    let boolean = SolidBoolean::default();

    let a = builder.build(Primitive::prism(1.0, 16, 2.0).to_vertex_set().points());
    let b = builder.build(
        Primitive::prism(1.0, 16, 2.0)
            .to_vertex_set()
            .translated(Vector3::new(0.5, 0.3, 0.5))
            .points(),
    );

    group.bench_function("intersect_prisms", |bench| {
        bench.iter(|| boolean.intersect(black_box(&a), black_box(&b)));
    });
    group.bench_function("union_prisms", |bench| {
        bench.iter(|| boolean.union(black_box(&a), black_box(&b)));
    });

    group.finish();
}

fn bench_iou(c: &mut Criterion) {
    let mut group = c.benchmark_group("iou");
    let engine = GeometryEngine::default();
    let cube = Primitive::cube(1.0).to_vertex_set();
    let sets = vec![
        cube.clone(),
        cube.translated(Vector3::new(0.5, 0.0, 0.0)),
        cube.translated(Vector3::new(0.0, 0.5, 0.0)),
    ];

    for (name, dimension) in [("solid", Dimension::ThreeD), ("planar", Dimension::TwoD)] {
        group.bench_function(BenchmarkId::new(name, sets.len()), |b| {
            b.iter(|| engine.intersection(black_box(&sets), dimension));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_hulls, bench_booleans, bench_iou);
criterion_main!(benches);
