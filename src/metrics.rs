// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Volume, area and Intersection-over-Union
//!
//! Everything here is pure and deterministic; the same input always gives
//! the same number.

use crate::boolean::{PlanarBoolean, SolidBoolean};
use crate::config::GeometryConfig;
use crate::error::{GeometryError, GeometryResult};
use crate::geometry::Mesh;
use crate::hull::PlanarHull;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Enclosed volume of a closed mesh (divergence theorem).
/// Meshes with three or fewer vertices enclose nothing.
pub fn volume(mesh: &Mesh) -> f64 {
    if mesh.vertex_count() <= 3 {
        return 0.0;
    }
    let signed: f64 = mesh
        .triangles
        .iter()
        .map(|t| {
            let [a, b, c] = mesh.triangle_points(t);
            a.coords.dot(&b.coords.cross(&c.coords))
        })
        .sum();
    (signed / 6.0).abs()
}

/// Area of a simple ring (shoelace)
pub fn area(ring: &[Point2<f64>]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let twice: f64 = (0..ring.len())
        .map(|i| {
            let (p, q) = (ring[i], ring[(i + 1) % ring.len()]);
            p.x * q.y - q.x * p.y
        })
        .sum();
    twice.abs() / 2.0
}

/// Summary numbers for one mesh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshStats {
    pub volume: f64,
    pub surface_area: f64,
    pub vertex_count: usize,
    pub triangle_count: usize,
    pub is_closed: bool,
}

impl MeshStats {
    pub fn of(mesh: &Mesh) -> Self {
        Self {
            volume: volume(mesh),
            surface_area: mesh.surface_area(),
            vertex_count: mesh.vertex_count(),
            triangle_count: mesh.triangle_count(),
            is_closed: mesh.is_closed(),
        }
    }
}

/// Solid overlap of several hulls
#[derive(Debug, Clone, PartialEq)]
pub struct SolidOverlap {
    /// Absent when nothing with positive volume is shared
    pub intersection: Option<Mesh>,
    pub intersection_volume: f64,
    pub union_volume: f64,
    pub iou: f64,
}

/// Planar overlap of several hulls
#[derive(Debug, Clone, PartialEq)]
pub struct PlanarOverlap {
    /// Shared polygon; empty when nothing with positive area is shared
    pub intersection: PlanarHull,
    pub intersection_area: f64,
    pub union_area: f64,
    pub iou: f64,
}

/// IoU over hull meshes and rings
#[derive(Debug, Clone, Copy)]
pub struct MetricEngine {
    solid: SolidBoolean,
    planar: PlanarBoolean,
    flat_volume_epsilon: f64,
    flat_area_epsilon: f64,
}

impl Default for MetricEngine {
    fn default() -> Self {
        Self::new(&GeometryConfig::default())
    }
}

impl MetricEngine {
    pub fn new(config: &GeometryConfig) -> Self {
        Self {
            solid: SolidBoolean::new(config),
            planar: PlanarBoolean::new(config),
            flat_volume_epsilon: config.flat_volume_epsilon,
            flat_area_epsilon: config.flat_area_epsilon,
        }
    }

    /// Solid IoU of closed hulls, `None` when undefined
    pub fn solid_iou(&self, meshes: &[Mesh]) -> Option<f64> {
        self.try_solid_overlap(meshes).ok().map(|overlap| overlap.iou)
    }

    /// Solid IoU of closed hulls, with the reason when undefined
    pub fn try_solid_iou(&self, meshes: &[Mesh]) -> GeometryResult<f64> {
        self.try_solid_overlap(meshes).map(|overlap| overlap.iou)
    }

    /// Intersection, union and IoU of closed hulls.
    ///
    /// Flat shapes are rejected before any boolean runs. Two shapes use
    /// inclusion-exclusion for the union; more shapes fold a real union.
    pub fn try_solid_overlap(&self, meshes: &[Mesh]) -> GeometryResult<SolidOverlap> {
        if meshes.len() < 2 {
            return Err(GeometryError::degenerate(format!(
                "IoU needs at least 2 shapes, got {}",
                meshes.len()
            )));
        }

        let volumes: Vec<f64> = meshes.iter().map(volume).collect();
        if let Some((index, &v)) = volumes
            .iter()
            .enumerate()
            .find(|(_, v)| v.abs() < self.flat_volume_epsilon)
        {
            debug!(index, volume = v, "flat shape, IoU undefined");
            return Err(GeometryError::FlatShape { index, volume: v });
        }

        let intersection = self
            .solid
            .intersect_all(meshes)
            .filter(|mesh| volume(mesh) >= self.flat_volume_epsilon);
        let intersection_volume = intersection.as_ref().map_or(0.0, volume);

        let union_volume = if meshes.len() == 2 {
            volumes[0] + volumes[1] - intersection_volume
        } else {
            let union = self.solid.try_union_all(meshes)?;
            volume(&union)
        };
        if union_volume <= 0.0 {
            return Err(GeometryError::numeric("union has no volume"));
        }

        Ok(SolidOverlap {
            intersection,
            intersection_volume,
            union_volume,
            iou: (intersection_volume / union_volume).clamp(0.0, 1.0),
        })
    }

    /// Planar IoU of convex hulls, `None` with fewer than two shapes
    pub fn planar_iou(&self, hulls: &[PlanarHull]) -> Option<f64> {
        self.try_planar_overlap(hulls).ok().map(|overlap| overlap.iou)
    }

    /// Intersection, union and IoU of convex rings.
    ///
    /// The union is the sum of the hull areas minus the common intersection.
    pub fn try_planar_overlap(&self, hulls: &[PlanarHull]) -> GeometryResult<PlanarOverlap> {
        if hulls.len() < 2 {
            return Err(GeometryError::degenerate(format!(
                "IoU needs at least 2 shapes, got {}",
                hulls.len()
            )));
        }

        let areas: Vec<f64> = hulls.iter().map(PlanarHull::area).collect();
        let intersection = if let Some(index) = areas
            .iter()
            .position(|a| *a < self.flat_area_epsilon)
        {
            debug!(index, "flat outline, planar intersection is empty");
            PlanarHull::default()
        } else {
            let rings: Vec<Vec<Point2<f64>>> = hulls.iter().map(|h| h.ring().to_vec()).collect();
            let shared = self.planar.intersect_all(&rings);
            if shared.area() < self.flat_area_epsilon {
                PlanarHull::default()
            } else {
                shared
            }
        };
        let intersection_area = intersection.area();

        let union_area = areas.iter().sum::<f64>() - intersection_area;
        let iou = if union_area > 0.0 {
            (intersection_area / union_area).clamp(0.0, 1.0)
        } else {
            0.0
        };

        Ok(PlanarOverlap {
            intersection,
            intersection_area,
            union_area,
            iou,
        })
    }
}
