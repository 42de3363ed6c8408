// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Vertex set generators for common shapes

use super::VertexSet;
use nalgebra::{Point3, Vector3};
use std::f64::consts::PI;

/// Geometric primitives, expressed as the vertex sets an editor would hand us
#[derive(Debug, Clone)]
pub enum Primitive {
    /// Axis-aligned box corners
    Cuboid { size: Vector3<f64>, center: bool },
    /// Regular polygon in the z = 0 plane
    RegularPolygon { radius: f64, sides: u32 },
    /// Prism over a regular polygon
    Prism { radius: f64, sides: u32, height: f64 },
    /// Corner tetrahedron with legs along the axes
    Tetrahedron { size: f64 },
}

impl Primitive {
    pub fn cube(size: f64) -> Self {
        Self::Cuboid {
            size: Vector3::new(size, size, size),
            center: false,
        }
    }

    pub fn cuboid(size: Vector3<f64>, center: bool) -> Self {
        Self::Cuboid { size, center }
    }

    pub fn regular_polygon(radius: f64, sides: u32) -> Self {
        Self::RegularPolygon {
            radius,
            sides: sides.max(3),
        }
    }

    pub fn prism(radius: f64, sides: u32, height: f64) -> Self {
        Self::Prism {
            radius,
            sides: sides.max(3),
            height,
        }
    }

    pub fn tetrahedron(size: f64) -> Self {
        Self::Tetrahedron { size }
    }

    pub fn to_vertex_set(&self) -> VertexSet {
        match self {
            Self::Cuboid { size, center } => cuboid_corners(*size, *center),
            Self::RegularPolygon { radius, sides } => ring(*radius, *sides, 0.0).collect(),
            Self::Prism {
                radius,
                sides,
                height,
            } => ring(*radius, *sides, 0.0)
                .chain(ring(*radius, *sides, *height))
                .collect(),
            Self::Tetrahedron { size } => VertexSet::from_coords(&[
                [0.0, 0.0, 0.0],
                [*size, 0.0, 0.0],
                [0.0, *size, 0.0],
                [0.0, 0.0, *size],
            ]),
        }
    }
}

fn cuboid_corners(size: Vector3<f64>, center: bool) -> VertexSet {
    let min = if center {
        Point3::from(-size / 2.0)
    } else {
        Point3::origin()
    };
    let max = min + size;

    VertexSet::new(vec![
        Point3::new(min.x, min.y, min.z),
        Point3::new(max.x, min.y, min.z),
        Point3::new(max.x, max.y, min.z),
        Point3::new(min.x, max.y, min.z),
        Point3::new(min.x, min.y, max.z),
        Point3::new(max.x, min.y, max.z),
        Point3::new(max.x, max.y, max.z),
        Point3::new(min.x, max.y, max.z),
    ])
}

fn ring(radius: f64, sides: u32, z: f64) -> impl Iterator<Item = Point3<f64>> {
    (0..sides).map(move |i| {
        let theta = 2.0 * PI * i as f64 / sides as f64;
        Point3::new(radius * theta.cos(), radius * theta.sin(), z)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_corners() {
        let set = Primitive::cube(2.0).to_vertex_set();
        assert_eq!(set.len(), 8);
        assert!(set.iter().any(|p| *p == Point3::new(2.0, 2.0, 2.0)));
    }

    #[test]
    fn test_centered_cuboid() {
        let set = Primitive::cuboid(Vector3::new(2.0, 4.0, 6.0), true).to_vertex_set();
        assert_eq!(set.points()[0], Point3::new(-1.0, -2.0, -3.0));
        assert_eq!(set.points()[6], Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_prism_has_two_rings() {
        let set = Primitive::prism(1.0, 6, 2.0).to_vertex_set();
        assert_eq!(set.len(), 12);
        assert_eq!(set.iter().filter(|p| p.z == 2.0).count(), 6);
    }
}
