// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Convex hull construction for both editing modes

pub mod planar;
pub mod spatial;

pub use planar::{cross, fan_triangles, ring_to_mesh, HullBuilder2D, PlanarHull};
pub use spatial::HullBuilder3D;
