// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! BSP tree over convex polygons (csg.js clipping)

use crate::geometry::{Mesh, Triangle};
use nalgebra::{Point3, Vector3};

#[derive(Debug, Clone, Copy)]
pub(crate) struct Plane {
    pub normal: Vector3<f64>,
    pub w: f64,
}

#[derive(Debug, Clone)]
pub(crate) struct Polygon {
    pub vertices: Vec<Point3<f64>>,
    pub plane: Plane,
}

/// Polygons sorted by one split
#[derive(Default)]
struct Split {
    coplanar_front: Vec<Polygon>,
    coplanar_back: Vec<Polygon>,
    front: Vec<Polygon>,
    back: Vec<Polygon>,
}

const COPLANAR: u8 = 0;
const FRONT: u8 = 1;
const BACK: u8 = 2;
const SPANNING: u8 = 3;

impl Plane {
    pub fn new(normal: Vector3<f64>, point: &Point3<f64>) -> Self {
        Self {
            normal,
            w: normal.dot(&point.coords),
        }
    }

    fn flip(&mut self) {
        self.normal = -self.normal;
        self.w = -self.w;
    }

    fn distance(&self, point: &Point3<f64>) -> f64 {
        self.normal.dot(&point.coords) - self.w
    }

    fn split_polygon(&self, polygon: Polygon, epsilon: f64, out: &mut Split) {
        let kinds: Vec<u8> = polygon
            .vertices
            .iter()
            .map(|v| {
                let t = self.distance(v);
                if t < -epsilon {
                    BACK
                } else if t > epsilon {
                    FRONT
                } else {
                    COPLANAR
                }
            })
            .collect();
        let polygon_type = kinds.iter().fold(COPLANAR, |acc, k| acc | k);

        match polygon_type {
            COPLANAR => {
                if self.normal.dot(&polygon.plane.normal) > 0.0 {
                    out.coplanar_front.push(polygon);
                } else {
                    out.coplanar_back.push(polygon);
                }
            }
            FRONT => out.front.push(polygon),
            BACK => out.back.push(polygon),
            _ => {
                let n = polygon.vertices.len();
                let mut f = Vec::with_capacity(n + 1);
                let mut b = Vec::with_capacity(n + 1);
                for i in 0..n {
                    let j = (i + 1) % n;
                    let (ti, tj) = (kinds[i], kinds[j]);
                    let (vi, vj) = (polygon.vertices[i], polygon.vertices[j]);
                    if ti != BACK {
                        f.push(vi);
                    }
                    if ti != FRONT {
                        b.push(vi);
                    }
                    if (ti | tj) == SPANNING {
                        let t = (self.w - self.normal.dot(&vi.coords))
                            / self.normal.dot(&(vj - vi));
                        let v = vi + (vj - vi) * t;
                        f.push(v);
                        b.push(v);
                    }
                }
                if f.len() >= 3 {
                    out.front.push(Polygon {
                        vertices: f,
                        plane: polygon.plane,
                    });
                }
                if b.len() >= 3 {
                    out.back.push(Polygon {
                        vertices: b,
                        plane: polygon.plane,
                    });
                }
            }
        }
    }
}

impl Polygon {
    fn flip(&mut self) {
        self.vertices.reverse();
        self.plane.flip();
    }
}

/// One polygon per face; faces without a usable normal are dropped
pub(crate) fn mesh_to_polygons(mesh: &Mesh) -> Vec<Polygon> {
    mesh.triangles
        .iter()
        .zip(&mesh.normals)
        .filter(|(_, n)| n.norm_squared() > 0.5)
        .map(|(tri, normal)| {
            let vertices = mesh.triangle_points(tri).to_vec();
            Polygon {
                plane: Plane::new(*normal, &vertices[0]),
                vertices,
            }
        })
        .collect()
}

/// Fan every polygon back into triangles, welding shared corners
pub(crate) fn polygons_to_mesh(polygons: &[Polygon], merge_epsilon: f64) -> Mesh {
    let corner_count: usize = polygons.iter().map(|p| p.vertices.len()).sum();
    let mut mesh = Mesh::with_capacity(corner_count, corner_count);
    for polygon in polygons {
        let base = mesh.vertex_count();
        for v in &polygon.vertices {
            mesh.add_vertex(*v);
        }
        for i in 1..polygon.vertices.len().saturating_sub(1) {
            mesh.add_face(
                Triangle::new([base, base + i, base + i + 1]),
                polygon.plane.normal,
            );
        }
    }
    mesh.weld_vertices(merge_epsilon);
    mesh.remove_orphaned_vertices();
    mesh
}

/// BSP tree node for CSG operations
#[derive(Debug, Clone, Default)]
pub(crate) struct BspNode {
    plane: Option<Plane>,
    front: Option<Box<BspNode>>,
    back: Option<Box<BspNode>>,
    polygons: Vec<Polygon>,
    epsilon: f64,
}

impl BspNode {
    pub fn new(polygons: Vec<Polygon>, epsilon: f64) -> Self {
        let mut node = Self {
            epsilon,
            ..Self::default()
        };
        node.build(polygons);
        node
    }

    /// Insert polygons, splitting them down the tree
    pub fn build(&mut self, polygons: Vec<Polygon>) {
        if polygons.is_empty() {
            return;
        }
        let plane = *self.plane.get_or_insert(polygons[0].plane);

        let mut split = Split::default();
        for polygon in polygons {
            plane.split_polygon(polygon, self.epsilon, &mut split);
        }
        self.polygons.append(&mut split.coplanar_front);
        self.polygons.append(&mut split.coplanar_back);

        let epsilon = self.epsilon;
        if !split.front.is_empty() {
            self.front
                .get_or_insert_with(|| Box::new(BspNode::new(Vec::new(), epsilon)))
                .build(split.front);
        }
        if !split.back.is_empty() {
            self.back
                .get_or_insert_with(|| Box::new(BspNode::new(Vec::new(), epsilon)))
                .build(split.back);
        }
    }

    /// Swap solid and empty space
    pub fn invert(&mut self) {
        for polygon in &mut self.polygons {
            polygon.flip();
        }
        if let Some(plane) = self.plane.as_mut() {
            plane.flip();
        }
        if let Some(front) = self.front.as_mut() {
            front.invert();
        }
        if let Some(back) = self.back.as_mut() {
            back.invert();
        }
        std::mem::swap(&mut self.front, &mut self.back);
    }

    /// Remove the parts of `polygons` inside this tree's solid
    pub fn clip_polygons(&self, polygons: Vec<Polygon>) -> Vec<Polygon> {
        let Some(plane) = self.plane else {
            return polygons;
        };

        let mut split = Split::default();
        for polygon in polygons {
            plane.split_polygon(polygon, self.epsilon, &mut split);
        }
        let mut front = split.front;
        front.append(&mut split.coplanar_front);
        let mut back = split.back;
        back.append(&mut split.coplanar_back);

        let mut result = match &self.front {
            Some(node) => node.clip_polygons(front),
            None => front,
        };
        if let Some(node) = &self.back {
            result.extend(node.clip_polygons(back));
        }
        result
    }

    /// Remove the parts of this tree's polygons inside `other`
    pub fn clip_to(&mut self, other: &BspNode) {
        self.polygons = other.clip_polygons(std::mem::take(&mut self.polygons));
        if let Some(front) = self.front.as_mut() {
            front.clip_to(other);
        }
        if let Some(back) = self.back.as_mut() {
            back.clip_to(other);
        }
    }

    pub fn all_polygons(&self) -> Vec<Polygon> {
        let mut result = self.polygons.clone();
        if let Some(front) = &self.front {
            result.extend(front.all_polygons());
        }
        if let Some(back) = &self.back {
            result.extend(back.all_polygons());
        }
        result
    }
}

/// Polygons bounding `a ∩ b`
pub(crate) fn intersect_polygons(a: Vec<Polygon>, b: Vec<Polygon>, epsilon: f64) -> Vec<Polygon> {
    let mut a = BspNode::new(a, epsilon);
    let mut b = BspNode::new(b, epsilon);
    a.invert();
    b.clip_to(&a);
    b.invert();
    a.clip_to(&b);
    b.clip_to(&a);
    a.build(b.all_polygons());
    a.invert();
    a.all_polygons()
}

/// Polygons bounding `a ∪ b`
pub(crate) fn union_polygons(a: Vec<Polygon>, b: Vec<Polygon>, epsilon: f64) -> Vec<Polygon> {
    let mut a = BspNode::new(a, epsilon);
    let mut b = BspNode::new(b, epsilon);
    a.clip_to(&b);
    b.clip_to(&a);
    b.invert();
    b.clip_to(&a);
    b.invert();
    a.build(b.all_polygons());
    a.all_polygons()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_polygon(z: f64) -> Polygon {
        let vertices = vec![
            Point3::new(0.0, 0.0, z),
            Point3::new(1.0, 0.0, z),
            Point3::new(1.0, 1.0, z),
            Point3::new(0.0, 1.0, z),
        ];
        Polygon {
            plane: Plane::new(Vector3::z(), &vertices[0]),
            vertices,
        }
    }

    #[test]
    fn test_spanning_polygon_is_split() {
        let plane = Plane::new(Vector3::x(), &Point3::new(0.25, 0.0, 0.0));
        let mut split = Split::default();
        plane.split_polygon(square_polygon(0.0), 1e-5, &mut split);

        assert_eq!(split.front.len(), 1);
        assert_eq!(split.back.len(), 1);
        assert_eq!(split.front[0].vertices.len(), 4);
        assert!(split.back[0].vertices.iter().all(|v| v.x <= 0.25 + 1e-12));
    }

    #[test]
    fn test_coplanar_sorted_by_facing() {
        let plane = Plane::new(-Vector3::z(), &Point3::origin());
        let mut split = Split::default();
        plane.split_polygon(square_polygon(0.0), 1e-5, &mut split);
        assert_eq!(split.coplanar_back.len(), 1);
        assert!(split.coplanar_front.is_empty());
    }

    #[test]
    fn test_invert_flips_polygons() {
        let mut node = BspNode::new(vec![square_polygon(0.0)], 1e-5);
        node.invert();
        let polygons = node.all_polygons();
        assert_eq!(polygons[0].plane.normal, -Vector3::z());
        assert_eq!(polygons[0].vertices[0], Point3::new(0.0, 1.0, 0.0));
    }
}
