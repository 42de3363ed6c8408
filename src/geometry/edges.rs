// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Display edges derived from hull geometry

use super::{HalfEdgeMesh, Mesh, SpatialHash, Triangle};
use nalgebra::{Point2, Point3};

/// Segment between two points
pub type Edge = (Point3<f64>, Point3<f64>);

/// Derived edge list; never stored on a shape
pub type EdgeList = Vec<Edge>;

/// Sharp edges of a mesh.
///
/// Coincident vertices are merged within `merge_epsilon` first. An edge with
/// one adjacent face is always sharp; an edge shared by two faces is sharp
/// when the dot product of their normals is below `1 - angle_threshold`.
pub fn sharp_edges(mesh: &Mesh, merge_epsilon: f64, angle_threshold: f64) -> EdgeList {
    if mesh.is_empty() {
        return EdgeList::new();
    }

    let mut hash = SpatialHash::new(merge_epsilon);
    let remap: Vec<usize> = mesh.vertices.iter().map(|p| hash.insert(*p)).collect();

    let mut welded = Mesh::with_capacity(hash.len(), mesh.triangle_count());
    welded.vertices = hash.into_points();
    for (triangle, normal) in mesh.triangles.iter().zip(&mesh.normals) {
        let [a, b, c] = triangle.indices;
        let (a, b, c) = (remap[a], remap[b], remap[c]);
        if a != b && b != c && a != c {
            welded.add_face(Triangle::new([a, b, c]), *normal);
        }
    }

    let topology = HalfEdgeMesh::from_mesh(&welded);
    let limit = 1.0 - angle_threshold;

    topology
        .edge_faces()
        .into_iter()
        .filter(|(_, _, faces)| match faces.as_slice() {
            [a, b] => topology.faces[*a].normal.dot(&topology.faces[*b].normal) < limit,
            _ => true,
        })
        .map(|(from, to, _)| (topology.vertices[from], topology.vertices[to]))
        .collect()
}

/// Boundary segments of a closed planar ring, wrapping last to first
pub fn ring_edges(ring: &[Point2<f64>]) -> EdgeList {
    if ring.len() < 2 {
        return EdgeList::new();
    }
    let lift = |p: &Point2<f64>| Point3::new(p.x, p.y, 0.0);
    if ring.len() == 2 {
        return vec![(lift(&ring[0]), lift(&ring[1]))];
    }

    (0..ring.len())
        .map(|i| (lift(&ring[i]), lift(&ring[(i + 1) % ring.len()])))
        .collect()
}
