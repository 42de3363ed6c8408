// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Convex hull property tests

use approx::assert_relative_eq;
use nalgebra::{Point2, Point3, Vector3};
use polyiou::hull::cross;
use polyiou::{volume, HullBuilder2D, HullBuilder3D, Primitive};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_planar(seed: u64, count: usize) -> Vec<Point2<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| Point2::new(rng.gen_range(-10.0..10.0), rng.gen_range(-10.0..10.0)))
        .collect()
}

fn random_spatial(seed: u64, count: usize) -> Vec<Point3<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            Point3::new(
                rng.gen_range(-5.0..5.0),
                rng.gen_range(-5.0..5.0),
                rng.gen_range(-5.0..5.0),
            )
        })
        .collect()
}

#[test]
fn test_planar_hull_is_convex_and_contains_inputs() {
    for seed in 0..10 {
        let points = random_planar(seed, 60);
        let hull = HullBuilder2D::new().build(&points);
        let ring = hull.ring();
        assert!(ring.len() >= 3);

        for i in 0..ring.len() {
            let (a, b) = (ring[i], ring[(i + 1) % ring.len()]);
            assert!(cross(&a, &b, &ring[(i + 2) % ring.len()]) > 0.0);
            for p in &points {
                assert!(cross(&a, &b, p) >= -1e-9, "seed {seed}: point outside hull");
            }
        }
    }
}

#[test]
fn test_square_area() {
    for side in [0.5, 1.0, 7.25] {
        let points = Primitive::cuboid(Vector3::new(side, side, 0.0), false).to_vertex_set();
        let hull = HullBuilder2D::new().build_projected(points.points());
        assert_relative_eq!(hull.area(), side * side, epsilon = 1e-6);
    }
}

#[test]
fn test_unit_cube_volume() {
    let cube = Primitive::cube(1.0).to_vertex_set();
    let mesh = HullBuilder3D::default().build(cube.points());
    assert_relative_eq!(volume(&mesh), 1.0, epsilon = 1e-6);
}

#[test]
fn test_hull_is_idempotent() {
    let builder = HullBuilder3D::default();
    let points = random_spatial(7, 80);
    let first = builder.build(&points);
    let second = builder.build(&points);
    assert_eq!(volume(&first), volume(&second));

    // Hull of the hull vertices is the same solid
    let again = builder.build(&first.vertices);
    assert_relative_eq!(volume(&again), volume(&first), epsilon = 1e-9);
}

#[test]
fn test_random_hulls_are_closed_and_contain_inputs() {
    let builder = HullBuilder3D::default();
    for seed in 0..5 {
        let points = random_spatial(seed, 50);
        let mesh = builder.build(&points);
        assert!(mesh.is_closed(), "seed {seed}: hull not closed");

        for (triangle, normal) in mesh.triangles.iter().zip(&mesh.normals) {
            let [a, _, _] = mesh.triangle_points(triangle);
            for p in &points {
                assert!(normal.dot(&(*p - a)) <= 1e-6, "seed {seed}: point outside");
            }
        }
    }
}

#[test]
fn test_duplicates_do_not_change_the_hull() {
    let builder = HullBuilder3D::default();
    let mut points = Primitive::prism(1.0, 6, 2.0).to_vertex_set().into_inner();
    let reference = volume(&builder.build(&points));
    points.extend(points.clone());
    assert_relative_eq!(volume(&builder.build(&points)), reference, epsilon = 1e-9);
}

#[test]
fn test_triangle_input_normals() {
    let mesh = HullBuilder3D::default().build(&[
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
    ]);
    assert_eq!(mesh.triangle_count(), 2);
    assert_eq!(mesh.normals[0], Vector3::new(0.0, 0.0, 1.0));
    assert_eq!(mesh.normals[1], Vector3::new(0.0, 0.0, -1.0));
}

#[test]
fn test_prism_sharp_edges() {
    let builder = HullBuilder3D::default();
    let mesh = builder.build(Primitive::prism(1.0, 6, 1.0).to_vertex_set().points());
    // Two hexagon rims plus six vertical edges
    assert_eq!(builder.sharp_edges(&mesh).len(), 18);
}
