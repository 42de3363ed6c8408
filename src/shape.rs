// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Shapes as edited, and the geometry derived from them

use crate::geometry::{EdgeList, Mesh, VertexSet};
use crate::hull::PlanarHull;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of a shape within a set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapeId(pub u64);

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Editing mode; 2D drops z from every vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Dimension {
    #[serde(rename = "2d")]
    TwoD,
    #[default]
    #[serde(rename = "3d")]
    ThreeD,
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TwoD => write!(f, "2d"),
            Self::ThreeD => write!(f, "3d"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub id: ShapeId,
    #[serde(default = "default_visible")]
    pub visible: bool,
    pub vertices: VertexSet,
}

fn default_visible() -> bool {
    true
}

impl Shape {
    pub fn new(id: ShapeId, vertices: VertexSet) -> Self {
        Self {
            id,
            visible: true,
            vertices,
        }
    }
}

/// Shapes in insertion order plus the current editing mode
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShapeSet {
    #[serde(default)]
    pub dimension: Dimension,
    #[serde(default)]
    shapes: Vec<Shape>,
}

impl ShapeSet {
    pub fn new(dimension: Dimension) -> Self {
        Self {
            dimension,
            shapes: Vec::new(),
        }
    }

    /// Add a shape, replacing the vertices of an existing one with that id
    pub fn insert(&mut self, id: ShapeId, vertices: VertexSet) {
        match self.get_mut(id) {
            Some(shape) => shape.vertices = vertices,
            None => self.shapes.push(Shape::new(id, vertices)),
        }
    }

    /// Returns false when no shape has that id
    pub fn set_vertices(&mut self, id: ShapeId, vertices: VertexSet) -> bool {
        self.get_mut(id).map(|s| s.vertices = vertices).is_some()
    }

    /// Returns false when no shape has that id
    pub fn set_visible(&mut self, id: ShapeId, visible: bool) -> bool {
        self.get_mut(id).map(|s| s.visible = visible).is_some()
    }

    pub fn remove(&mut self, id: ShapeId) -> Option<Shape> {
        let index = self.shapes.iter().position(|s| s.id == id)?;
        Some(self.shapes.remove(index))
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id == id)
    }

    fn get_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|s| s.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter()
    }

    /// Visible shapes in insertion order
    pub fn visible(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter().filter(|s| s.visible)
    }

    /// Vertex sets that take part in the aggregate intersection
    pub fn visible_vertex_sets(&self) -> Vec<VertexSet> {
        self.visible().map(|s| s.vertices.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

/// Boundary geometry of one shape in the current mode
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapeGeometry {
    pub mesh: Mesh,
    pub edges: EdgeList,
    /// Hull ring, present in 2D mode only
    pub outline: Option<PlanarHull>,
}

/// Aggregate intersection of the visible shapes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntersectionResult {
    /// Absent with fewer than two shapes, no overlap or a degenerate result
    pub mesh: Option<Mesh>,
    /// In [0, 1]; absent when undefined
    pub iou: Option<f64>,
}

impl IntersectionResult {
    pub fn empty() -> Self {
        Self::default()
    }
}
