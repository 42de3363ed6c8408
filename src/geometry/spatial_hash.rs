// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Grid-based spatial hash for merging coincident points
//!
//! Points are bucketed into cells twice the tolerance wide, so any two points
//! within tolerance land in the same or an adjacent cell.

use ahash::AHashMap;
use nalgebra::Point3;

/// Maps positions to canonical indices, merging points within tolerance
pub struct SpatialHash {
    cells: AHashMap<(i64, i64, i64), Vec<usize>>,
    points: Vec<Point3<f64>>,
    cell_size: f64,
    tolerance: f64,
}

impl SpatialHash {
    pub fn new(tolerance: f64) -> Self {
        let tolerance = tolerance.max(f64::MIN_POSITIVE);
        Self {
            cells: AHashMap::new(),
            points: Vec::new(),
            cell_size: tolerance * 2.0,
            tolerance,
        }
    }

    fn cell_coords(&self, p: &Point3<f64>) -> (i64, i64, i64) {
        let discretize = |v: f64| (v / self.cell_size).floor() as i64;
        (discretize(p.x), discretize(p.y), discretize(p.z))
    }

    /// Index of an already inserted point within tolerance, if any
    pub fn find(&self, point: &Point3<f64>) -> Option<usize> {
        let (cx, cy, cz) = self.cell_coords(point);

        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    if let Some(ids) = self.cells.get(&(cx + dx, cy + dy, cz + dz)) {
                        if let Some(&id) = ids
                            .iter()
                            .find(|&&id| (self.points[id] - point).norm() < self.tolerance)
                        {
                            return Some(id);
                        }
                    }
                }
            }
        }

        None
    }

    /// Return the canonical index for `point`, inserting it when new
    pub fn insert(&mut self, point: Point3<f64>) -> usize {
        if let Some(id) = self.find(&point) {
            return id;
        }
        let id = self.points.len();
        let cell = self.cell_coords(&point);
        self.cells.entry(cell).or_default().push(id);
        self.points.push(point);
        id
    }

    /// Canonical points in insertion order
    pub fn points(&self) -> &[Point3<f64>] {
        &self.points
    }

    pub fn into_points(self) -> Vec<Point3<f64>> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Drop points within `tolerance` of an earlier point, keeping input order
pub fn dedup_points(points: &[Point3<f64>], tolerance: f64) -> Vec<Point3<f64>> {
    let mut hash = SpatialHash::new(tolerance);
    for p in points {
        hash.insert(*p);
    }
    hash.into_points()
}
