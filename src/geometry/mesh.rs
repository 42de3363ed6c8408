// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Mesh representation and utilities

use super::{BoundingBox, SpatialHash};
use ahash::AHashMap;
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Triangle defined by three vertex indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triangle {
    pub indices: [usize; 3],
}

impl Triangle {
    pub fn new(indices: [usize; 3]) -> Self {
        Self { indices }
    }

    /// Directed edges in winding order
    pub fn edges(&self) -> [(usize, usize); 3] {
        let [a, b, c] = self.indices;
        [(a, b), (b, c), (c, a)]
    }

    fn is_collapsed(&self) -> bool {
        let [a, b, c] = self.indices;
        a == b || b == c || a == c
    }
}

/// Triangular boundary mesh with a shared vertex buffer and one outward unit
/// normal per face.
///
/// For a closed solid every edge is shared by exactly two faces with opposite
/// directions. A planar hull is a single polygon fanned into triangles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub vertices: Vec<Point3<f64>>,
    pub triangles: Vec<Triangle>,
    /// Per-face normals, parallel to `triangles`
    pub normals: Vec<Vector3<f64>>,
}

/// Unit normal of the triangle (a, b, c), `None` when it has no area
pub fn face_normal(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> Option<Vector3<f64>> {
    let n = (b - a).cross(&(c - a));
    let len = n.norm();
    if len > f64::EPSILON {
        Some(n / len)
    } else {
        None
    }
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn empty() -> Self {
        Self::new()
    }

    pub fn with_capacity(vertex_count: usize, triangle_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            triangles: Vec::with_capacity(triangle_count),
            normals: Vec::with_capacity(triangle_count),
        }
    }

    /// Add a vertex and return its index
    pub fn add_vertex(&mut self, position: Point3<f64>) -> usize {
        let index = self.vertices.len();
        self.vertices.push(position);
        index
    }

    /// Add a face with a known outward normal
    pub fn add_face(&mut self, triangle: Triangle, normal: Vector3<f64>) {
        self.triangles.push(triangle);
        self.normals.push(normal);
    }

    /// Add a face, deriving its normal from the winding
    pub fn add_triangle(&mut self, triangle: Triangle) {
        let [a, b, c] = triangle.indices;
        let normal = face_normal(&self.vertices[a], &self.vertices[b], &self.vertices[c])
            .unwrap_or_else(Vector3::zeros);
        self.add_face(triangle, normal);
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// True when the mesh has no faces
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Corner positions of a face
    pub fn triangle_points(&self, triangle: &Triangle) -> [Point3<f64>; 3] {
        let [a, b, c] = triangle.indices;
        [self.vertices[a], self.vertices[b], self.vertices[c]]
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(&self.vertices)
    }

    /// Flat position buffer `[x0, y0, z0, x1, ...]`, one entry per face corner
    pub fn position_buffer(&self) -> Vec<f64> {
        let mut buffer = Vec::with_capacity(self.triangles.len() * 9);
        for triangle in &self.triangles {
            for p in self.triangle_points(triangle) {
                buffer.extend_from_slice(&[p.x, p.y, p.z]);
            }
        }
        buffer
    }

    /// Flat normal buffer matching [`Mesh::position_buffer`]
    pub fn normal_buffer(&self) -> Vec<f64> {
        let mut buffer = Vec::with_capacity(self.normals.len() * 9);
        for n in &self.normals {
            for _ in 0..3 {
                buffer.extend_from_slice(&[n.x, n.y, n.z]);
            }
        }
        buffer
    }

    /// Weld vertices that are within epsilon of each other.
    /// Faces that collapse are dropped. Returns the number of vertices removed.
    pub fn weld_vertices(&mut self, epsilon: f64) -> usize {
        if self.vertices.is_empty() {
            return 0;
        }

        let original_count = self.vertices.len();
        let mut hash = SpatialHash::new(epsilon);
        let remap: Vec<usize> = self.vertices.iter().map(|p| hash.insert(*p)).collect();

        let mut triangles = Vec::with_capacity(self.triangles.len());
        let mut normals = Vec::with_capacity(self.normals.len());
        for (triangle, normal) in self.triangles.iter().zip(&self.normals) {
            let [a, b, c] = triangle.indices;
            let welded = Triangle::new([remap[a], remap[b], remap[c]]);
            if !welded.is_collapsed() {
                triangles.push(welded);
                normals.push(*normal);
            }
        }

        self.vertices = hash.into_points();
        self.triangles = triangles;
        self.normals = normals;

        original_count - self.vertices.len()
    }

    /// Remove vertices not referenced by any face.
    /// Returns the number of vertices removed.
    pub fn remove_orphaned_vertices(&mut self) -> usize {
        let mut used = vec![false; self.vertices.len()];
        for triangle in &self.triangles {
            for &i in &triangle.indices {
                used[i] = true;
            }
        }

        let mut new_indices = vec![0; self.vertices.len()];
        let mut new_vertices = Vec::with_capacity(self.vertices.len());
        for (old, &keep) in used.iter().enumerate() {
            if keep {
                new_indices[old] = new_vertices.len();
                new_vertices.push(self.vertices[old]);
            }
        }

        for triangle in &mut self.triangles {
            for i in &mut triangle.indices {
                *i = new_indices[*i];
            }
        }

        let removed = self.vertices.len() - new_vertices.len();
        self.vertices = new_vertices;
        removed
    }

    /// Every undirected edge is used by exactly two faces, once per direction
    pub fn is_closed(&self) -> bool {
        if self.triangles.is_empty() {
            return false;
        }

        let mut directed: AHashMap<(usize, usize), usize> = AHashMap::new();
        for triangle in &self.triangles {
            for edge in triangle.edges() {
                *directed.entry(edge).or_insert(0) += 1;
            }
        }

        directed
            .iter()
            .all(|(&(a, b), &count)| count == 1 && directed.get(&(b, a)) == Some(&1))
    }

    /// Total surface area
    pub fn surface_area(&self) -> f64 {
        self.triangles
            .iter()
            .map(|t| {
                let [a, b, c] = self.triangle_points(t);
                (b - a).cross(&(c - a)).norm() * 0.5
            })
            .sum()
    }
}
