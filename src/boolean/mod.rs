// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Boolean operations on hull geometry

mod bsp;
pub mod planar;
pub mod solid;

pub use planar::PlanarBoolean;
pub use solid::SolidBoolean;
