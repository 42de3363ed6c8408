// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Asynchronous recomputation of shape hulls and the aggregate IoU
//!
//! Each shape's hull is one key and the aggregate intersection is another,
//! so a drag on one shape never queues stale hull work and never blocks the
//! other shapes.

mod coalescing;

pub use coalescing::{ComputeFn, JobScheduler, Published};

use crate::engine::GeometryEngine;
use crate::error::GeometryResult;
use crate::geometry::VertexSet;
use crate::shape::{Dimension, IntersectionResult, Shape, ShapeGeometry, ShapeId, ShapeSet};
use std::sync::mpsc::Receiver;

/// What a job computes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobKey {
    /// Hull and edges of one shape
    Shape(ShapeId),
    /// Intersection and IoU of all visible shapes
    Aggregate,
}

#[derive(Debug, Clone)]
pub enum JobInput {
    Shape {
        vertices: VertexSet,
        dimension: Dimension,
    },
    Aggregate {
        vertex_sets: Vec<VertexSet>,
        dimension: Dimension,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum JobOutput {
    Shape(ShapeGeometry),
    Aggregate(IntersectionResult),
}

/// Published geometry result
pub type GeometryUpdate = Published<JobKey, JobOutput>;

/// Coalescing scheduler wired to a [`GeometryEngine`]
pub struct GeometryJobScheduler {
    jobs: JobScheduler<JobKey, JobInput, JobOutput>,
}

impl GeometryJobScheduler {
    /// Create the scheduler and the receiver updates are published on
    pub fn new(engine: GeometryEngine) -> GeometryResult<(Self, Receiver<GeometryUpdate>)> {
        let threads = engine.config().worker_threads;
        let (jobs, updates) = JobScheduler::new(threads, move |_: &JobKey, input: JobInput| {
            Ok(match input {
                JobInput::Shape {
                    vertices,
                    dimension,
                } => JobOutput::Shape(engine.shape_geometry(&vertices, dimension)),
                JobInput::Aggregate {
                    vertex_sets,
                    dimension,
                } => JobOutput::Aggregate(engine.intersection(&vertex_sets, dimension)),
            })
        })?;
        Ok((Self { jobs }, updates))
    }

    /// Recompute one shape's hull
    pub fn submit_shape(&self, id: ShapeId, vertices: VertexSet, dimension: Dimension) -> u64 {
        self.jobs.submit(
            JobKey::Shape(id),
            JobInput::Shape {
                vertices,
                dimension,
            },
        )
    }

    /// Recompute the aggregate intersection
    pub fn submit_aggregate(&self, vertex_sets: Vec<VertexSet>, dimension: Dimension) -> u64 {
        self.jobs.submit(
            JobKey::Aggregate,
            JobInput::Aggregate {
                vertex_sets,
                dimension,
            },
        )
    }

    /// Recompute every shape and the aggregate of the visible ones
    pub fn submit_shape_set(&self, shapes: &ShapeSet) {
        for shape in shapes.iter() {
            self.submit_shape(shape.id, shape.vertices.clone(), shapes.dimension);
        }
        self.submit_aggregate(shapes.visible_vertex_sets(), shapes.dimension);
    }

    /// Remove a shape, drop its idle job slot and recompute the aggregate
    pub fn remove_shape(&self, shapes: &mut ShapeSet, id: ShapeId) -> Option<Shape> {
        let removed = shapes.remove(id)?;
        self.jobs.forget(&JobKey::Shape(id));
        self.submit_aggregate(shapes.visible_vertex_sets(), shapes.dimension);
        Some(removed)
    }

    pub fn is_busy(&self, key: &JobKey) -> bool {
        self.jobs.is_busy(key)
    }

    pub fn wait_idle(&self) {
        self.jobs.wait_idle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Primitive;
    use nalgebra::Vector3;

    #[test]
    fn test_shape_set_publishes_every_key() {
        let (scheduler, updates) = GeometryJobScheduler::new(GeometryEngine::default()).unwrap();
        let mut shapes = ShapeSet::new(Dimension::ThreeD);
        let cube = Primitive::cube(1.0).to_vertex_set();
        shapes.insert(ShapeId(1), cube.clone());
        shapes.insert(ShapeId(2), cube.translated(Vector3::new(0.5, 0.0, 0.0)));

        scheduler.submit_shape_set(&shapes);
        scheduler.wait_idle();

        let updates: Vec<_> = updates.try_iter().collect();
        assert_eq!(updates.len(), 3);
        let aggregate = updates
            .iter()
            .find(|u| u.key == JobKey::Aggregate)
            .and_then(|u| u.result.clone());
        match aggregate {
            Some(JobOutput::Aggregate(result)) => {
                assert!((result.iou.unwrap() - 1.0 / 3.0).abs() < 1e-6)
            }
            other => panic!("unexpected aggregate update: {other:?}"),
        }
    }

    #[test]
    fn test_removed_shape_releases_its_slot() {
        let (scheduler, updates) = GeometryJobScheduler::new(GeometryEngine::default()).unwrap();
        let mut shapes = ShapeSet::new(Dimension::ThreeD);
        let cube = Primitive::cube(1.0).to_vertex_set();
        shapes.insert(ShapeId(1), cube.clone());
        shapes.insert(ShapeId(2), cube);

        scheduler.submit_shape_set(&shapes);
        scheduler.wait_idle();
        assert_eq!(scheduler.jobs.generation(&JobKey::Shape(ShapeId(2))), 1);

        assert!(scheduler.remove_shape(&mut shapes, ShapeId(2)).is_some());
        assert!(scheduler.remove_shape(&mut shapes, ShapeId(2)).is_none());
        scheduler.wait_idle();

        assert_eq!(scheduler.jobs.generation(&JobKey::Shape(ShapeId(2))), 0);
        let last = updates.try_iter().last().unwrap();
        assert_eq!(last.key, JobKey::Aggregate);
        assert_eq!(last.generation, 2);
        assert_eq!(last.result, Some(JobOutput::Aggregate(IntersectionResult::empty())));
    }
}
