// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! 2D convex hull (Andrew's monotone chain)

use crate::geometry::{ring_edges, EdgeList, Mesh, Triangle};
use nalgebra::{Point2, Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Z-component of `(a - o) x (b - o)`; positive for a left turn
pub fn cross(o: &Point2<f64>, a: &Point2<f64>, b: &Point2<f64>) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

/// Convex polygon as a counter-clockwise ring, first vertex not repeated
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanarHull {
    ring: Vec<Point2<f64>>,
}

impl PlanarHull {
    pub fn from_ring(ring: Vec<Point2<f64>>) -> Self {
        Self { ring }
    }

    pub fn ring(&self) -> &[Point2<f64>] {
        &self.ring
    }

    pub fn len(&self) -> usize {
        self.ring.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// Polygon with positive area is possible
    pub fn is_polygon(&self) -> bool {
        self.ring.len() >= 3
    }

    /// Boundary segments, wrapping last to first
    pub fn edges(&self) -> EdgeList {
        ring_edges(&self.ring)
    }

    /// Fan triangulation from vertex 0
    pub fn triangles(&self) -> Vec<[usize; 3]> {
        fan_triangles(self.ring.len())
    }

    /// Fanned triangles in the z = 0 plane, all facing +z
    pub fn to_mesh(&self) -> Mesh {
        ring_to_mesh(&self.ring)
    }

    pub fn area(&self) -> f64 {
        crate::metrics::area(&self.ring)
    }
}

/// Index triples fanning a convex ring of `len` vertices
pub fn fan_triangles(len: usize) -> Vec<[usize; 3]> {
    if len < 3 {
        return Vec::new();
    }
    (1..len - 1).map(|i| [0, i, i + 1]).collect()
}

/// Lift a convex ring into a fanned mesh at z = 0
pub fn ring_to_mesh(ring: &[Point2<f64>]) -> Mesh {
    let triangles = fan_triangles(ring.len());
    let mut mesh = Mesh::with_capacity(ring.len(), triangles.len());
    if triangles.is_empty() {
        return mesh;
    }
    for p in ring {
        mesh.add_vertex(Point3::new(p.x, p.y, 0.0));
    }
    for indices in triangles {
        mesh.add_face(Triangle::new(indices), Vector3::z());
    }
    mesh
}

/// Builds planar hulls; stateless
#[derive(Debug, Clone, Copy, Default)]
pub struct HullBuilder2D;

impl HullBuilder2D {
    pub fn new() -> Self {
        Self
    }

    /// Convex hull of `points`.
    ///
    /// Zero or one point comes back unchanged and two points form a
    /// degenerate hull. Collinear input collapses to its two extremes.
    pub fn build(&self, points: &[Point2<f64>]) -> PlanarHull {
        if points.len() < 3 {
            return PlanarHull::from_ring(points.to_vec());
        }

        let mut sorted = points.to_vec();
        sorted.sort_by(|a, b| {
            a.x.partial_cmp(&b.x)
                .unwrap_or(Ordering::Equal)
                .then(a.y.partial_cmp(&b.y).unwrap_or(Ordering::Equal))
        });
        sorted.dedup();
        if sorted.len() < 3 {
            return PlanarHull::from_ring(sorted);
        }

        let mut lower: Vec<Point2<f64>> = Vec::with_capacity(sorted.len());
        for p in &sorted {
            push_left_turn(&mut lower, *p);
        }

        let mut upper: Vec<Point2<f64>> = Vec::with_capacity(sorted.len());
        for p in sorted.iter().rev() {
            push_left_turn(&mut upper, *p);
        }

        lower.pop();
        upper.pop();
        lower.extend(upper);
        PlanarHull::from_ring(lower)
    }

    /// Hull of the xy projection of 3D points
    pub fn build_projected(&self, points: &[Point3<f64>]) -> PlanarHull {
        let planar: Vec<Point2<f64>> = points.iter().map(|p| Point2::new(p.x, p.y)).collect();
        self.build(&planar)
    }
}

/// Push `p` onto a monotone chain, popping points that stop turning left
fn push_left_turn(chain: &mut Vec<Point2<f64>>, p: Point2<f64>) {
    while let [.., o, a] = chain.as_slice() {
        if cross(o, a, &p) > 0.0 {
            break;
        }
        chain.pop();
    }
    chain.push(p);
}
