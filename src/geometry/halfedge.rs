// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Half-edge mesh representation
//! Gives the face cycles and edge adjacency the hull builder and edge
//! extraction need.

use super::{Mesh, Triangle};
use ahash::AHashMap;
use nalgebra::{Point3, Vector3};

/// Half-edge in a half-edge mesh
/// Each interior edge has two half-edges, one for each direction
#[derive(Debug, Clone, Copy)]
pub struct HalfEdge {
    /// Next half-edge in the same face (counter-clockwise)
    pub next: usize,
    /// Previous half-edge in the same face
    pub prev: usize,
    /// Twin half-edge (opposite direction, belongs to adjacent face)
    pub twin: Option<usize>,
    /// Vertex this half-edge points to
    pub vertex: usize,
    /// Face this half-edge belongs to
    pub face: usize,
}

/// Polygonal face referencing one of its half-edges
#[derive(Debug, Clone, Copy)]
pub struct Face {
    pub half_edge: usize,
    /// Outward unit normal
    pub normal: Vector3<f64>,
}

/// Half-edge mesh with full topological connectivity
#[derive(Debug, Clone, Default)]
pub struct HalfEdgeMesh {
    pub vertices: Vec<Point3<f64>>,
    pub faces: Vec<Face>,
    pub half_edges: Vec<HalfEdge>,
}

impl HalfEdgeMesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from polygon loops (CCW seen from outside) and their normals.
    /// Loops with fewer than three vertices are skipped.
    pub fn from_faces(vertices: Vec<Point3<f64>>, loops: &[(Vec<usize>, Vector3<f64>)]) -> Self {
        let mut he_mesh = Self {
            vertices,
            faces: Vec::with_capacity(loops.len()),
            half_edges: Vec::new(),
        };

        for (face_loop, normal) in loops {
            if face_loop.len() < 3 {
                continue;
            }
            let face_idx = he_mesh.faces.len();
            let first = he_mesh.half_edges.len();
            let n = face_loop.len();

            for (i, _) in face_loop.iter().enumerate() {
                he_mesh.half_edges.push(HalfEdge {
                    next: first + (i + 1) % n,
                    prev: first + (i + n - 1) % n,
                    twin: None,
                    vertex: face_loop[(i + 1) % n],
                    face: face_idx,
                });
            }

            he_mesh.faces.push(Face {
                half_edge: first,
                normal: *normal,
            });
        }

        he_mesh.link_twins();
        he_mesh
    }

    /// Convert from a triangle mesh
    pub fn from_mesh(mesh: &Mesh) -> Self {
        let loops: Vec<(Vec<usize>, Vector3<f64>)> = mesh
            .triangles
            .iter()
            .zip(&mesh.normals)
            .map(|(t, n)| (t.indices.to_vec(), *n))
            .collect();
        Self::from_faces(mesh.vertices.clone(), &loops)
    }

    /// Connect opposite half-edges
    fn link_twins(&mut self) {
        let mut directed: AHashMap<(usize, usize), usize> =
            AHashMap::with_capacity(self.half_edges.len());

        for idx in 0..self.half_edges.len() {
            directed.insert((self.origin(idx), self.half_edges[idx].vertex), idx);
        }

        for idx in 0..self.half_edges.len() {
            let key = (self.half_edges[idx].vertex, self.origin(idx));
            self.half_edges[idx].twin = directed.get(&key).copied();
        }
    }

    /// Vertex a half-edge starts from
    pub fn origin(&self, half_edge: usize) -> usize {
        self.half_edges[self.half_edges[half_edge].prev].vertex
    }

    /// Vertex indices of a face, walking its half-edge cycle
    pub fn face_vertices(&self, face: usize) -> Vec<usize> {
        let start = self.faces[face].half_edge;
        let mut result = Vec::new();
        let mut he = start;
        loop {
            result.push(self.origin(he));
            he = self.half_edges[he].next;
            if he == start || result.len() > self.half_edges.len() {
                break;
            }
        }
        result
    }

    /// Emit a triangle mesh by fanning every face cycle.
    /// Unreferenced vertices are dropped.
    pub fn to_mesh(&self) -> Mesh {
        let mut mesh = Mesh::with_capacity(self.vertices.len(), self.half_edges.len() / 3);
        mesh.vertices = self.vertices.clone();

        for (face_idx, face) in self.faces.iter().enumerate() {
            let cycle = self.face_vertices(face_idx);
            for i in 1..cycle.len() - 1 {
                mesh.add_face(
                    Triangle::new([cycle[0], cycle[i], cycle[i + 1]]),
                    face.normal,
                );
            }
        }

        mesh.remove_orphaned_vertices();
        mesh
    }

    /// Half-edges with no twin
    pub fn boundary_half_edges(&self) -> usize {
        self.half_edges.iter().filter(|he| he.twin.is_none()).count()
    }

    /// Closed when every half-edge has a twin
    pub fn is_closed(&self) -> bool {
        !self.half_edges.is_empty() && self.boundary_half_edges() == 0
    }

    /// Faces adjacent to each undirected edge, as `(origin, target, faces)`
    pub fn edge_faces(&self) -> Vec<(usize, usize, Vec<usize>)> {
        let mut seen = vec![false; self.half_edges.len()];
        let mut result = Vec::new();

        for (idx, he) in self.half_edges.iter().enumerate() {
            if seen[idx] {
                continue;
            }
            seen[idx] = true;
            let mut faces = vec![he.face];
            if let Some(twin) = he.twin {
                seen[twin] = true;
                faces.push(self.half_edges[twin].face);
            }
            result.push((self.origin(idx), he.vertex, faces));
        }

        result
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Undirected edge count
    pub fn edge_count(&self) -> usize {
        let twinned = self.half_edges.len() - self.boundary_half_edges();
        twinned / 2 + self.boundary_half_edges()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square_pyramid() -> HalfEdgeMesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.5, 0.5, 1.0),
        ];
        let up = Vector3::z();
        let loops = vec![
            (vec![0, 3, 2, 1], -up),
            (vec![0, 1, 4], Vector3::new(0.0, -1.0, 0.5).normalize()),
            (vec![1, 2, 4], Vector3::new(1.0, 0.0, 0.5).normalize()),
            (vec![2, 3, 4], Vector3::new(0.0, 1.0, 0.5).normalize()),
            (vec![3, 0, 4], Vector3::new(-1.0, 0.0, 0.5).normalize()),
        ];
        HalfEdgeMesh::from_faces(vertices, &loops)
    }

    #[test]
    fn test_pyramid_topology() {
        let he_mesh = unit_square_pyramid();
        assert_eq!(he_mesh.face_count(), 5);
        assert_eq!(he_mesh.edge_count(), 8);
        assert!(he_mesh.is_closed());
        assert_eq!(he_mesh.face_vertices(0), vec![0, 3, 2, 1]);
    }

    #[test]
    fn test_to_mesh_fans_polygons() {
        let mesh = unit_square_pyramid().to_mesh();
        // Quad base becomes two triangles
        assert_eq!(mesh.triangle_count(), 6);
        assert!(mesh.is_closed());
        assert_eq!(mesh.normals[0], -Vector3::z());
        assert_eq!(mesh.normals[1], -Vector3::z());
    }

    #[test]
    fn test_open_fan_has_boundary() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let he_mesh = HalfEdgeMesh::from_faces(vertices, &[(vec![0, 1, 2], Vector3::z())]);
        assert!(!he_mesh.is_closed());
        assert_eq!(he_mesh.boundary_half_edges(), 3);
        assert_eq!(he_mesh.edge_faces().len(), 3);
    }
}
