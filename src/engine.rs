// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Synchronous geometry API: per-shape hulls and the aggregate intersection

use crate::config::GeometryConfig;
use crate::geometry::{Mesh, VertexSet};
use crate::hull::{HullBuilder2D, HullBuilder3D, PlanarHull};
use crate::metrics::MetricEngine;
use crate::shape::{Dimension, IntersectionResult, ShapeGeometry, ShapeId, ShapeSet};
use rayon::prelude::*;
use tracing::debug;

/// Main engine for hull and IoU computation
#[derive(Debug, Clone)]
pub struct GeometryEngine {
    config: GeometryConfig,
    hull3d: HullBuilder3D,
    hull2d: HullBuilder2D,
    metrics: MetricEngine,
}

impl GeometryEngine {
    pub fn new(config: GeometryConfig) -> Self {
        Self {
            hull3d: HullBuilder3D::new(&config),
            hull2d: HullBuilder2D::new(),
            metrics: MetricEngine::new(&config),
            config,
        }
    }

    pub fn config(&self) -> &GeometryConfig {
        &self.config
    }

    pub fn metrics(&self) -> &MetricEngine {
        &self.metrics
    }

    /// Hull mesh, display edges and (in 2D) outline of one vertex set
    pub fn shape_geometry(&self, vertices: &VertexSet, dimension: Dimension) -> ShapeGeometry {
        match dimension {
            Dimension::ThreeD => {
                let mesh = self.hull3d.build(vertices.points());
                let edges = self.hull3d.sharp_edges(&mesh);
                ShapeGeometry {
                    mesh,
                    edges,
                    outline: None,
                }
            }
            Dimension::TwoD => {
                let hull = self.hull2d.build(&vertices.to_planar());
                ShapeGeometry {
                    mesh: hull.to_mesh(),
                    edges: hull.edges(),
                    outline: Some(hull),
                }
            }
        }
    }

    /// Geometry of every shape in the set, computed in parallel
    pub fn shape_geometries(&self, shapes: &ShapeSet) -> Vec<(ShapeId, ShapeGeometry)> {
        let items: Vec<_> = shapes.iter().collect();
        items
            .par_iter()
            .map(|shape| (shape.id, self.shape_geometry(&shape.vertices, shapes.dimension)))
            .collect()
    }

    /// Intersection and IoU of the given vertex sets
    pub fn intersection(
        &self,
        vertex_sets: &[VertexSet],
        dimension: Dimension,
    ) -> IntersectionResult {
        if vertex_sets.len() < 2 {
            return IntersectionResult::empty();
        }
        match dimension {
            Dimension::ThreeD => self.solid_intersection(vertex_sets),
            Dimension::TwoD => self.planar_intersection(vertex_sets),
        }
    }

    /// Intersection and IoU of the visible shapes in a set
    pub fn intersect_visible(&self, shapes: &ShapeSet) -> IntersectionResult {
        self.intersection(&shapes.visible_vertex_sets(), shapes.dimension)
    }

    fn solid_intersection(&self, vertex_sets: &[VertexSet]) -> IntersectionResult {
        let hulls: Vec<Mesh> = vertex_sets
            .par_iter()
            .map(|set| self.hull3d.build(set.points()))
            .collect();

        match self.metrics.try_solid_overlap(&hulls) {
            Ok(overlap) => IntersectionResult {
                mesh: overlap.intersection,
                iou: Some(overlap.iou),
            },
            Err(err) => {
                debug!(%err, "solid IoU undefined");
                IntersectionResult::empty()
            }
        }
    }

    fn planar_intersection(&self, vertex_sets: &[VertexSet]) -> IntersectionResult {
        let hulls: Vec<PlanarHull> = vertex_sets
            .iter()
            .map(|set| self.hull2d.build(&set.to_planar()))
            .collect();

        match self.metrics.try_planar_overlap(&hulls) {
            Ok(overlap) => {
                let mesh = overlap
                    .intersection
                    .is_polygon()
                    .then(|| overlap.intersection.to_mesh());
                IntersectionResult {
                    mesh,
                    iou: Some(overlap.iou),
                }
            }
            Err(err) => {
                debug!(%err, "planar IoU undefined");
                IntersectionResult::empty()
            }
        }
    }
}

impl Default for GeometryEngine {
    fn default() -> Self {
        Self::new(GeometryConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Primitive;
    use approx::assert_relative_eq;
    use nalgebra::{Point3, Vector3};

    fn cube(x: f64) -> VertexSet {
        Primitive::cube(1.0)
            .to_vertex_set()
            .translated(Vector3::new(x, 0.0, 0.0))
    }

    #[test]
    fn test_shape_geometry_modes() {
        let engine = GeometryEngine::default();

        let solid = engine.shape_geometry(&cube(0.0), Dimension::ThreeD);
        assert_eq!(solid.mesh.triangle_count(), 12);
        assert_eq!(solid.edges.len(), 12);
        assert!(solid.outline.is_none());

        let flat = engine.shape_geometry(&cube(0.0), Dimension::TwoD);
        assert_eq!(flat.outline.as_ref().map(PlanarHull::len), Some(4));
        assert_eq!(flat.edges.len(), 4);
        assert_eq!(flat.mesh.triangle_count(), 2);
    }

    #[test]
    fn test_intersection_of_shifted_cubes() {
        let engine = GeometryEngine::default();
        let result = engine.intersection(&[cube(0.0), cube(0.5)], Dimension::ThreeD);
        assert!(result.mesh.is_some());
        assert_relative_eq!(result.iou.unwrap(), 1.0 / 3.0, epsilon = 1e-6);

        let planar = engine.intersection(&[cube(0.0), cube(0.5)], Dimension::TwoD);
        assert_relative_eq!(planar.iou.unwrap(), 1.0 / 3.0, epsilon = 1e-9);
        assert_eq!(planar.mesh.unwrap().triangle_count(), 2);
    }

    #[test]
    fn test_hidden_shapes_are_ignored() {
        let engine = GeometryEngine::default();
        let mut shapes = ShapeSet::new(Dimension::ThreeD);
        shapes.insert(ShapeId(1), cube(0.0));
        shapes.insert(ShapeId(2), cube(0.5));
        shapes.insert(ShapeId(3), cube(10.0));
        shapes.set_visible(ShapeId(3), false);

        let result = engine.intersect_visible(&shapes);
        assert_relative_eq!(result.iou.unwrap(), 1.0 / 3.0, epsilon = 1e-6);
        assert_eq!(engine.shape_geometries(&shapes).len(), 3);
    }

    #[test]
    fn test_single_shape_has_no_result() {
        let engine = GeometryEngine::default();
        assert_eq!(
            engine.intersection(&[cube(0.0)], Dimension::ThreeD),
            IntersectionResult::empty()
        );
    }

    #[test]
    fn test_degenerate_planar_shapes_publish_no_mesh() {
        let engine = GeometryEngine::default();
        let point = VertexSet::new(vec![Point3::new(50.0, 50.0, 0.0); 3]);
        let segment = VertexSet::new(vec![
            Point3::new(-1.0, 0.3, 0.0),
            Point3::new(2.0, 0.7, 0.0),
        ]);

        for shapes in [
            vec![cube(0.0), point.clone()],
            vec![cube(0.0), cube(0.0), point],
            vec![cube(0.0), cube(0.0), segment],
        ] {
            let result = engine.intersection(&shapes, Dimension::TwoD);
            assert_eq!(result.iou, Some(0.0));
            assert!(result.mesh.is_none());
        }
    }
}
