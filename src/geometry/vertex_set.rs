// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Vertex sets supplied by editors

use nalgebra::{Point2, Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Ordered list of points for one shape.
///
/// Identity is position-in-sequence only: duplicates are allowed and the
/// hull builders ignore them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VertexSet(Vec<Point3<f64>>);

impl VertexSet {
    pub fn new(points: Vec<Point3<f64>>) -> Self {
        Self(points)
    }

    /// Build from raw `[x, y, z]` triples
    pub fn from_coords(coords: &[[f64; 3]]) -> Self {
        Self(coords.iter().map(|&[x, y, z]| Point3::new(x, y, z)).collect())
    }

    pub fn points(&self) -> &[Point3<f64>] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Point3<f64>> {
        self.0.iter()
    }

    /// Drop z for the planar pipeline
    pub fn to_planar(&self) -> Vec<Point2<f64>> {
        self.0.iter().map(|p| Point2::new(p.x, p.y)).collect()
    }

    /// Every coordinate is finite
    pub fn is_finite(&self) -> bool {
        self.0
            .iter()
            .all(|p| p.x.is_finite() && p.y.is_finite() && p.z.is_finite())
    }

    pub fn translated(&self, offset: Vector3<f64>) -> Self {
        Self(self.0.iter().map(|p| p + offset).collect())
    }

    pub fn into_inner(self) -> Vec<Point3<f64>> {
        self.0
    }
}

impl From<Vec<Point3<f64>>> for VertexSet {
    fn from(points: Vec<Point3<f64>>) -> Self {
        Self(points)
    }
}

impl FromIterator<Point3<f64>> for VertexSet {
    fn from_iter<I: IntoIterator<Item = Point3<f64>>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_planar_projection_drops_z() {
        let set = VertexSet::from_coords(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
        let planar = set.to_planar();
        assert_eq!(planar, vec![Point2::new(1.0, 2.0), Point2::new(4.0, 5.0)]);
    }

    #[test]
    fn test_serializes_as_coordinate_arrays() {
        let set = VertexSet::from_coords(&[[1.0, 2.0, 3.0]]);
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, "[[1.0,2.0,3.0]]");

        let back: VertexSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }

    #[test]
    fn test_non_finite_detected() {
        let set = VertexSet::from_coords(&[[f64::NAN, 0.0, 0.0]]);
        assert!(!set.is_finite());
    }
}
