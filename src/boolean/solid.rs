// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Boolean intersection and union of closed solids

use super::bsp::{intersect_polygons, mesh_to_polygons, polygons_to_mesh, union_polygons};
use crate::config::GeometryConfig;
use crate::error::{GeometryError, GeometryResult};
use crate::geometry::Mesh;
use tracing::debug;

/// Vertex count of the flat double-sided triangle a 3-point hull yields
const TRIANGLE_SENTINEL: usize = 3;

/// Meshes a fold cannot continue from
fn is_sentinel(mesh: &Mesh) -> bool {
    matches!(mesh.vertex_count(), 0 | TRIANGLE_SENTINEL)
}

/// CSG engine for triangulated solids
#[derive(Debug, Clone, Copy)]
pub struct SolidBoolean {
    plane_epsilon: f64,
    merge_epsilon: f64,
}

impl Default for SolidBoolean {
    fn default() -> Self {
        Self::new(&GeometryConfig::default())
    }
}

impl SolidBoolean {
    pub fn new(config: &GeometryConfig) -> Self {
        Self {
            plane_epsilon: config.plane_epsilon,
            merge_epsilon: config.merge_epsilon,
        }
    }

    /// `a ∩ b`; empty when the solids do not overlap
    pub fn intersect(&self, a: &Mesh, b: &Mesh) -> Mesh {
        if a.is_empty() || b.is_empty() {
            return Mesh::empty();
        }
        if !a.bounding_box().overlaps(&b.bounding_box(), self.merge_epsilon) {
            debug!("bounding boxes disjoint, intersection skipped");
            return Mesh::empty();
        }

        let polygons = intersect_polygons(
            mesh_to_polygons(a),
            mesh_to_polygons(b),
            self.plane_epsilon,
        );
        polygons_to_mesh(&polygons, self.merge_epsilon)
    }

    /// `a ∪ b`
    pub fn union(&self, a: &Mesh, b: &Mesh) -> Mesh {
        if a.is_empty() {
            return b.clone();
        }
        if b.is_empty() {
            return a.clone();
        }

        let polygons = union_polygons(
            mesh_to_polygons(a),
            mesh_to_polygons(b),
            self.plane_epsilon,
        );
        polygons_to_mesh(&polygons, self.merge_epsilon)
    }

    /// Left fold of [`SolidBoolean::intersect`]; `None` when absent
    pub fn intersect_all(&self, meshes: &[Mesh]) -> Option<Mesh> {
        self.try_intersect_all(meshes).ok()
    }

    /// Left fold of [`SolidBoolean::union`]; `None` when absent
    pub fn union_all(&self, meshes: &[Mesh]) -> Option<Mesh> {
        self.try_union_all(meshes).ok()
    }

    pub fn try_intersect_all(&self, meshes: &[Mesh]) -> GeometryResult<Mesh> {
        self.fold(meshes, "intersection", |a, b| self.intersect(a, b))
    }

    pub fn try_union_all(&self, meshes: &[Mesh]) -> GeometryResult<Mesh> {
        self.fold(meshes, "union", |a, b| self.union(a, b))
    }

    /// Fold from the first mesh. Empty or 3-vertex operands and partial
    /// results end the fold with no result.
    fn fold(
        &self,
        meshes: &[Mesh],
        op: &str,
        combine: impl Fn(&Mesh, &Mesh) -> Mesh,
    ) -> GeometryResult<Mesh> {
        let (first, rest) = match meshes {
            [first, rest @ ..] if !rest.is_empty() => (first, rest),
            _ => {
                return Err(GeometryError::degenerate(format!(
                    "{op} needs at least 2 solids, got {}",
                    meshes.len()
                )))
            }
        };

        let mut acc = first.clone();
        for (offset, mesh) in rest.iter().enumerate() {
            if is_sentinel(&acc) || is_sentinel(mesh) {
                debug!(op, step = offset + 1, "fold short-circuited");
                return Err(GeometryError::degenerate(format!(
                    "{op} stopped at operand {}",
                    offset + 1
                )));
            }
            acc = combine(&acc, mesh);
        }

        if is_sentinel(&acc) {
            return Err(GeometryError::degenerate(format!("{op} is empty")));
        }
        Ok(acc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Primitive;
    use crate::hull::HullBuilder3D;
    use crate::metrics::volume;
    use approx::assert_relative_eq;
    use nalgebra::{Point3, Vector3};

    fn cube_at(x: f64, y: f64, z: f64, size: f64) -> Mesh {
        let points = Primitive::cube(size)
            .to_vertex_set()
            .translated(Vector3::new(x, y, z));
        HullBuilder3D::default().build(points.points())
    }

    #[test]
    fn test_overlapping_cubes_intersect() {
        let boolean = SolidBoolean::default();
        let a = cube_at(0.0, 0.0, 0.0, 1.0);
        let b = cube_at(0.5, 0.0, 0.0, 1.0);
        let result = boolean.intersect(&a, &b);

        assert!(!result.is_empty());
        assert_relative_eq!(volume(&result), 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_union_volume() {
        let boolean = SolidBoolean::default();
        let a = cube_at(0.0, 0.0, 0.0, 1.0);
        let b = cube_at(0.5, 0.0, 0.0, 1.0);
        assert_relative_eq!(volume(&boolean.union(&a, &b)), 1.5, epsilon = 1e-6);
    }

    #[test]
    fn test_disjoint_cubes_short_circuit() {
        let boolean = SolidBoolean::default();
        let a = cube_at(0.0, 0.0, 0.0, 1.0);
        let b = cube_at(5.0, 0.0, 0.0, 1.0);
        assert!(boolean.intersect(&a, &b).is_empty());
        assert!(boolean.intersect_all(&[a, b]).is_none());
    }

    #[test]
    fn test_nested_cube_intersection_is_inner() {
        let boolean = SolidBoolean::default();
        let outer = cube_at(0.0, 0.0, 0.0, 2.0);
        let inner = cube_at(0.5, 0.5, 0.5, 1.0);
        let result = boolean.intersect_all(&[outer, inner]);
        assert_relative_eq!(volume(&result.unwrap()), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_fold_rejects_triangle_operand() {
        let boolean = SolidBoolean::default();
        let cube = cube_at(0.0, 0.0, 0.0, 1.0);
        let triangle = HullBuilder3D::default().build(&[
            Point3::new(0.0, 0.0, 0.5),
            Point3::new(1.0, 0.0, 0.5),
            Point3::new(0.0, 1.0, 0.5),
        ]);
        assert_eq!(triangle.vertex_count(), 3);
        assert!(boolean.intersect_all(&[cube.clone(), triangle]).is_none());
        assert!(boolean.intersect_all(&[cube]).is_none());
    }

    #[test]
    fn test_three_way_fold() {
        let boolean = SolidBoolean::default();
        let meshes = [
            cube_at(0.0, 0.0, 0.0, 1.0),
            cube_at(0.5, 0.0, 0.0, 1.0),
            cube_at(0.0, 0.5, 0.0, 1.0),
        ];
        let result = boolean.intersect_all(&meshes).unwrap();
        assert_relative_eq!(volume(&result), 0.25, epsilon = 1e-6);

        let union = boolean.union_all(&meshes).unwrap();
        // Inclusion-exclusion over pairwise and triple overlaps
        assert_relative_eq!(volume(&union), 3.0 - 0.5 - 0.5 - 0.25 + 0.25, epsilon = 1e-6);
    }
}
