// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry configuration
//!
//! Tolerances here are empirical and display-driven, so they are loaded from
//! `polyiou.toml` (when present) with environment variable overrides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file looked up by [`GeometryConfig::load`]
pub const CONFIG_FILE: &str = "polyiou.toml";

/// Tolerances and execution settings for the geometry engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    /// Points closer than this are treated as one point
    pub merge_epsilon: f64,
    /// Shared edges are sharp when `dot(n1, n2) < 1 - sharp_angle_threshold`
    pub sharp_angle_threshold: f64,
    /// Solids with a volume within this of zero are flat
    pub flat_volume_epsilon: f64,
    /// Polygons with an area within this of zero are flat
    pub flat_area_epsilon: f64,
    /// Line-line intersections with a smaller determinant are skipped
    pub parallel_epsilon: f64,
    /// Point-on-plane tolerance used by the BSP splitter
    pub plane_epsilon: f64,
    /// Worker threads for the scheduler; rayon picks when unset
    pub worker_threads: Option<usize>,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            merge_epsilon: 1e-6,
            sharp_angle_threshold: 0.1,
            flat_volume_epsilon: 1e-6,
            flat_area_epsilon: 1e-9,
            parallel_epsilon: 1e-6,
            plane_epsilon: 1e-5,
            worker_threads: None,
        }
    }
}

impl GeometryConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: GeometryConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides
    pub fn load() -> Result<Self> {
        let mut config = if PathBuf::from(CONFIG_FILE).exists() {
            Self::from_file(CONFIG_FILE)?
        } else {
            Self::default()
        };

        config.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Apply `POLYIOU_*` overrides from `lookup`
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(eps) = lookup("POLYIOU_MERGE_EPSILON") {
            self.merge_epsilon = eps
                .parse()
                .with_context(|| format!("Invalid POLYIOU_MERGE_EPSILON: {eps}"))?;
        }

        if let Some(angle) = lookup("POLYIOU_SHARP_ANGLE") {
            self.sharp_angle_threshold = angle
                .parse()
                .with_context(|| format!("Invalid POLYIOU_SHARP_ANGLE: {angle}"))?;
        }

        if let Some(workers) = lookup("POLYIOU_WORKERS") {
            let workers: usize = workers
                .parse()
                .with_context(|| format!("Invalid POLYIOU_WORKERS: {workers}"))?;
            self.worker_threads = Some(workers);
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }

    /// Builder-style override of the sharp edge threshold
    pub fn with_sharp_angle_threshold(mut self, threshold: f64) -> Self {
        self.sharp_angle_threshold = threshold;
        self
    }

    /// Builder-style override of the worker count
    pub fn with_worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = Some(threads);
        self
    }
}
