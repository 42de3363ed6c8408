// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! 3D convex hull (QuickHull)
//!
//! 1. Dedupe points within the merge epsilon
//! 2. Seed a tetrahedron from the axis-extreme points
//! 3. Give every remaining point to the first face it lies outside of
//! 4. Repeatedly take the farthest outside point of some face, remove every
//!    face it sees and stitch the horizon to it
//! 5. Load the surviving faces into a half-edge mesh and emit triangles

use crate::config::GeometryConfig;
use crate::error::{GeometryError, GeometryResult};
use crate::geometry::{
    dedup_points, face_normal, sharp_edges, EdgeList, HalfEdgeMesh, Mesh, Triangle,
};
use ahash::AHashMap;
use nalgebra::{Point3, Vector3};
use tracing::debug;

/// Triangular hull face with its outside set
#[derive(Debug, Clone)]
struct HullFace {
    vertices: [usize; 3],
    normal: Vector3<f64>,
    offset: f64,
    outside: Vec<usize>,
}

impl HullFace {
    fn new(vertices: [usize; 3], points: &[Point3<f64>]) -> Option<Self> {
        let [a, b, c] = vertices;
        let normal = face_normal(&points[a], &points[b], &points[c])?;
        Some(Self {
            vertices,
            normal,
            offset: normal.dot(&points[a].coords),
            outside: Vec::new(),
        })
    }

    /// Face oriented so its normal points away from `interior`
    fn outward(
        vertices: [usize; 3],
        interior: &Point3<f64>,
        points: &[Point3<f64>],
    ) -> Option<Self> {
        let face = Self::new(vertices, points)?;
        if face.distance(interior) > 0.0 {
            let [a, b, c] = vertices;
            Self::new([a, c, b], points)
        } else {
            Some(face)
        }
    }

    fn distance(&self, point: &Point3<f64>) -> f64 {
        self.normal.dot(&point.coords) - self.offset
    }

    fn farthest(&self, points: &[Point3<f64>]) -> Option<usize> {
        self.outside
            .iter()
            .copied()
            .max_by(|&a, &b| {
                self.distance(&points[a])
                    .partial_cmp(&self.distance(&points[b]))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    }
}

/// Builds closed hull meshes from vertex sets
#[derive(Debug, Clone, Copy)]
pub struct HullBuilder3D {
    merge_epsilon: f64,
    sharp_angle_threshold: f64,
}

impl Default for HullBuilder3D {
    fn default() -> Self {
        Self::new(&GeometryConfig::default())
    }
}

impl HullBuilder3D {
    pub fn new(config: &GeometryConfig) -> Self {
        Self {
            merge_epsilon: config.merge_epsilon,
            sharp_angle_threshold: config.sharp_angle_threshold,
        }
    }

    /// Hull mesh of `points`; empty when no hull exists
    pub fn build(&self, points: &[Point3<f64>]) -> Mesh {
        match self.try_build(points) {
            Ok(mesh) => mesh,
            Err(err) => {
                debug!(points = points.len(), %err, "hull abandoned");
                Mesh::empty()
            }
        }
    }

    /// Hull mesh of `points`, with the reason when none exists.
    ///
    /// Three points, or more that dedupe to three, give a double-sided
    /// triangle. Four or more distinct points give a closed solid with
    /// outward normals.
    pub fn try_build(&self, points: &[Point3<f64>]) -> GeometryResult<Mesh> {
        match points.len() {
            0..=2 => Err(GeometryError::degenerate(format!(
                "hull needs at least 3 points, got {}",
                points.len()
            ))),
            3 => double_sided_triangle(points),
            _ => {
                let unique = dedup_points(points, self.merge_epsilon);
                if unique.len() == 3 {
                    return double_sided_triangle(&unique);
                }
                if unique.len() < 4 {
                    return Err(GeometryError::degenerate(format!(
                        "{} distinct points cannot enclose a volume",
                        unique.len()
                    )));
                }
                let tolerance = self.merge_epsilon * scale(&unique).max(1.0);
                let faces = quickhull(&unique, tolerance)?;
                let loops: Vec<(Vec<usize>, Vector3<f64>)> = faces
                    .into_iter()
                    .map(|f| (f.vertices.to_vec(), f.normal))
                    .collect();
                Ok(HalfEdgeMesh::from_faces(unique, &loops).to_mesh())
            }
        }
    }

    /// Sharp edges of a hull mesh under this builder's tolerances
    pub fn sharp_edges(&self, mesh: &Mesh) -> EdgeList {
        sharp_edges(mesh, self.merge_epsilon, self.sharp_angle_threshold)
    }
}

fn double_sided_triangle(points: &[Point3<f64>]) -> GeometryResult<Mesh> {
    let normal = face_normal(&points[0], &points[1], &points[2])
        .ok_or_else(|| GeometryError::numeric("triangle points are collinear"))?;

    let mut mesh = Mesh::with_capacity(3, 2);
    for p in points {
        mesh.add_vertex(*p);
    }
    mesh.add_face(Triangle::new([0, 1, 2]), normal);
    mesh.add_face(Triangle::new([0, 2, 1]), -normal);
    Ok(mesh)
}

/// Largest extent of the point cloud
fn scale(points: &[Point3<f64>]) -> f64 {
    crate::geometry::BoundingBox::from_points(points).size().amax()
}

fn quickhull(points: &[Point3<f64>], tolerance: f64) -> GeometryResult<Vec<HullFace>> {
    let seed = initial_simplex(points, tolerance)?;
    let interior = Point3::from(
        seed.iter()
            .map(|&i| points[i].coords)
            .sum::<Vector3<f64>>()
            / 4.0,
    );

    let [p0, p1, p2, p3] = seed;
    let mut faces: Vec<HullFace> = [[p0, p1, p2], [p0, p2, p3], [p0, p3, p1], [p1, p3, p2]]
        .into_iter()
        .map(|v| HullFace::outward(v, &interior, points))
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| GeometryError::numeric("seed tetrahedron has a degenerate face"))?;

    let remaining = (0..points.len()).filter(|i| !seed.contains(i));
    assign_outside(&mut faces, remaining, points, tolerance);

    // Each round consumes one outside point
    for _ in 0..points.len() {
        let Some(apex) = faces
            .iter()
            .find(|f| !f.outside.is_empty())
            .and_then(|f| f.farthest(points))
        else {
            break;
        };
        let eye = points[apex];

        let (visible, kept): (Vec<HullFace>, Vec<HullFace>) = faces
            .into_iter()
            .partition(|f| f.distance(&eye) > tolerance);
        faces = kept;

        let orphans: Vec<usize> = visible
            .iter()
            .flat_map(|f| f.outside.iter().copied())
            .filter(|&i| i != apex)
            .collect();

        let first_new = faces.len();
        for (a, b) in horizon(&visible) {
            match HullFace::outward([a, b, apex], &interior, points) {
                Some(face) => faces.push(face),
                None => debug!(a, b, apex, "skipped sliver face on horizon"),
            }
        }

        let (_, new_faces) = faces.split_at_mut(first_new);
        assign_outside(new_faces, orphans.into_iter(), points, tolerance);
    }

    Ok(faces)
}

/// Four affinely independent points, starting from the farthest pair of
/// axis-extreme points
fn initial_simplex(points: &[Point3<f64>], tolerance: f64) -> GeometryResult<[usize; 4]> {
    let mut extremes = [0usize; 6];
    for (i, p) in points.iter().enumerate() {
        for axis in 0..3 {
            if p[axis] < points[extremes[2 * axis]][axis] {
                extremes[2 * axis] = i;
            }
            if p[axis] > points[extremes[2 * axis + 1]][axis] {
                extremes[2 * axis + 1] = i;
            }
        }
    }

    let mut pair = (extremes[0], extremes[1]);
    let mut best = -1.0;
    for (i, &a) in extremes.iter().enumerate() {
        for &b in &extremes[i + 1..] {
            let d = (points[a] - points[b]).norm_squared();
            if d > best {
                best = d;
                pair = (a, b);
            }
        }
    }
    let (p0, p1) = pair;

    let axis = (points[p1] - points[p0])
        .try_normalize(f64::EPSILON)
        .ok_or_else(|| GeometryError::degenerate("all points coincide"))?;
    let (p2, line_dist) = farthest_by(points, |p| {
        let v = *p - points[p0];
        (v - axis * v.dot(&axis)).norm()
    });
    if line_dist <= tolerance {
        return Err(GeometryError::degenerate("all points are collinear"));
    }

    let normal = face_normal(&points[p0], &points[p1], &points[p2])
        .ok_or_else(|| GeometryError::degenerate("all points are collinear"))?;
    let (p3, plane_dist) = farthest_by(points, |p| normal.dot(&(*p - points[p0])).abs());
    if plane_dist <= tolerance {
        return Err(GeometryError::degenerate("all points are coplanar"));
    }

    Ok([p0, p1, p2, p3])
}

fn farthest_by(points: &[Point3<f64>], measure: impl Fn(&Point3<f64>) -> f64) -> (usize, f64) {
    points
        .iter()
        .enumerate()
        .map(|(i, p)| (i, measure(p)))
        .fold((0, f64::NEG_INFINITY), |best, cur| if cur.1 > best.1 { cur } else { best })
}

fn assign_outside(
    faces: &mut [HullFace],
    candidates: impl Iterator<Item = usize>,
    points: &[Point3<f64>],
    tolerance: f64,
) {
    for idx in candidates {
        if let Some(face) = faces.iter_mut().find(|f| f.distance(&points[idx]) > tolerance) {
            face.outside.push(idx);
        }
    }
}

/// Directed boundary of the visible region, in the visible faces' winding.
/// Edges shared by two visible faces cancel out.
fn horizon(visible: &[HullFace]) -> Vec<(usize, usize)> {
    let mut count: AHashMap<(usize, usize), usize> = AHashMap::new();
    for face in visible {
        let [a, b, c] = face.vertices;
        for (u, v) in [(a, b), (b, c), (c, a)] {
            *count.entry((u.min(v), u.max(v))).or_insert(0) += 1;
        }
    }

    let mut edges = Vec::new();
    for face in visible {
        let [a, b, c] = face.vertices;
        for (u, v) in [(a, b), (b, c), (c, a)] {
            if count.get(&(u.min(v), u.max(v))) == Some(&1) {
                edges.push((u, v));
            }
        }
    }
    edges
}
