// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Convex polygon clipping (Sutherland-Hodgman)

use crate::config::GeometryConfig;
use crate::hull::{cross, PlanarHull};
use nalgebra::Point2;
use tracing::debug;

/// Clips convex counter-clockwise rings against each other
#[derive(Debug, Clone, Copy)]
pub struct PlanarBoolean {
    parallel_epsilon: f64,
}

impl Default for PlanarBoolean {
    fn default() -> Self {
        Self::new(&GeometryConfig::default())
    }
}

impl PlanarBoolean {
    pub fn new(config: &GeometryConfig) -> Self {
        Self {
            parallel_epsilon: config.parallel_epsilon,
        }
    }

    /// Part of `subject` on the inner side of every edge of `clip`
    pub fn clip(&self, subject: &[Point2<f64>], clip: &[Point2<f64>]) -> Vec<Point2<f64>> {
        let mut output = subject.to_vec();
        if clip.is_empty() {
            return Vec::new();
        }

        for i in 0..clip.len() {
            if output.is_empty() {
                break;
            }
            let (c1, c2) = (clip[i], clip[(i + 1) % clip.len()]);
            let input = std::mem::take(&mut output);
            let inside = |p: &Point2<f64>| cross(&c1, &c2, p) >= 0.0;

            let mut s = input[input.len() - 1];
            for e in input {
                match (inside(&s), inside(&e)) {
                    (true, true) => output.push(e),
                    (false, true) => {
                        output.extend(self.line_intersection(&s, &e, &c1, &c2));
                        output.push(e);
                    }
                    (true, false) => output.extend(self.line_intersection(&s, &e, &c1, &c2)),
                    (false, false) => {}
                }
                s = e;
            }
        }

        output
    }

    /// Fold [`PlanarBoolean::clip`] over `rings`, starting from the first.
    /// Stops as soon as nothing survives. A ring with fewer than three
    /// vertices bounds no area, so the whole intersection is empty.
    pub fn intersect_all(&self, rings: &[Vec<Point2<f64>>]) -> PlanarHull {
        if let Some(index) = rings.iter().position(|ring| ring.len() < 3) {
            debug!(index, "degenerate ring, planar intersection is empty");
            return PlanarHull::default();
        }
        let Some((first, rest)) = rings.split_first() else {
            return PlanarHull::default();
        };

        let mut acc = first.clone();
        for ring in rest {
            acc = self.clip(&acc, ring);
            if acc.is_empty() {
                debug!("planar intersection is empty");
                break;
            }
        }
        PlanarHull::from_ring(acc)
    }

    /// Crossing of segment `s`-`e` with the infinite line `c1`-`c2`.
    /// Near-parallel pairs are skipped.
    fn line_intersection(
        &self,
        s: &Point2<f64>,
        e: &Point2<f64>,
        c1: &Point2<f64>,
        c2: &Point2<f64>,
    ) -> Option<Point2<f64>> {
        let det = (s.x - e.x) * (c1.y - c2.y) - (s.y - e.y) * (c1.x - c2.x);
        if det.abs() < self.parallel_epsilon {
            debug!(det, "parallel edges, crossing skipped");
            return None;
        }
        let a = s.x * e.y - s.y * e.x;
        let b = c1.x * c2.y - c1.y * c2.x;
        Some(Point2::new(
            (a * (c1.x - c2.x) - (s.x - e.x) * b) / det,
            (a * (c1.y - c2.y) - (s.y - e.y) * b) / det,
        ))
    }
}
