// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry module - mesh representation and shared primitives

mod bbox;
mod edges;
mod halfedge;
mod mesh;
mod primitives;
mod spatial_hash;
mod vertex_set;

pub use bbox::BoundingBox;
pub use edges::{ring_edges, sharp_edges, Edge, EdgeList};
pub use halfedge::{Face, HalfEdge, HalfEdgeMesh};
pub use mesh::{face_normal, Mesh, Triangle};
pub use primitives::Primitive;
pub use spatial_hash::{dedup_points, SpatialHash};
pub use vertex_set::VertexSet;
