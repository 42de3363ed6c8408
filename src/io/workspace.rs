// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! JSON workspace files: a dimension plus shapes with vertex arrays

use crate::shape::ShapeSet;
use ahash::AHashSet;
use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

/// Parse a workspace document
pub fn parse_workspace(source: &str) -> Result<ShapeSet> {
    let shapes: ShapeSet = serde_json::from_str(source).context("Invalid workspace JSON")?;
    validate(&shapes)?;
    Ok(shapes)
}

/// Read and parse a workspace file
pub fn load_workspace(path: impl AsRef<Path>) -> Result<ShapeSet> {
    let path = path.as_ref();
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read workspace: {}", path.display()))?;
    parse_workspace(&source)
        .with_context(|| format!("Failed to load workspace: {}", path.display()))
}

/// Write a workspace file as pretty JSON
pub fn save_workspace(shapes: &ShapeSet, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(shapes).context("Failed to serialize workspace")?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write workspace: {}", path.display()))
}

fn validate(shapes: &ShapeSet) -> Result<()> {
    let mut seen = AHashSet::with_capacity(shapes.len());
    for shape in shapes.iter() {
        if !seen.insert(shape.id) {
            bail!("Duplicate shape id {}", shape.id);
        }
        if !shape.vertices.is_finite() {
            bail!("Shape {} has non-finite coordinates", shape.id);
        }
    }
    Ok(())
}
