// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Polyiou geometry engine
//!
//! Builds convex hulls from editable vertex sets (2D and 3D), intersects and
//! unions them, and measures their Intersection-over-Union. Recomputation
//! runs on a coalescing scheduler so rapid edits never queue stale work.

pub mod boolean;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod hull;
pub mod io;
pub mod metrics;
pub mod scheduler;
pub mod shape;

pub use boolean::{PlanarBoolean, SolidBoolean};
pub use config::GeometryConfig;
pub use engine::GeometryEngine;
pub use error::{GeometryError, GeometryResult};
pub use geometry::{EdgeList, Mesh, Primitive, VertexSet};
pub use hull::{HullBuilder2D, HullBuilder3D, PlanarHull};
pub use metrics::{area, volume, MetricEngine};
pub use scheduler::{GeometryJobScheduler, GeometryUpdate, JobKey, JobOutput};
pub use shape::{Dimension, IntersectionResult, Shape, ShapeGeometry, ShapeId, ShapeSet};

/// IoU of the visible shapes in a set with default tolerances
pub fn iou(shapes: &ShapeSet) -> Option<f64> {
    GeometryEngine::default().intersect_visible(shapes).iou
}
