// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! I/O module - workspace files

mod workspace;

pub use workspace::{load_workspace, parse_workspace, save_workspace};
