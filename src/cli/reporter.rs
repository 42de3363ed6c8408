// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CLI output reporter with colored formatting

use crate::config::GeometryConfig;
use crate::metrics::MeshStats;
use crate::shape::{IntersectionResult, ShapeGeometry, ShapeId};
use colored::*;
use std::time::Duration;

/// CLI reporter for formatted output
pub struct Reporter;

impl Reporter {
    /// Report per-shape hull numbers
    pub fn report_shape(id: ShapeId, geometry: &ShapeGeometry) {
        let stats = MeshStats::of(&geometry.mesh);
        println!("{} {}", "Shape".bold(), id.to_string().cyan());
        if let Some(outline) = &geometry.outline {
            Self::print_field("Hull vertices", outline.len().to_string());
            Self::print_field("Area", format!("{:.6}", outline.area()));
        } else {
            Self::print_field("Volume", format!("{:.6}", stats.volume));
            Self::print_field("Surface area", format!("{:.6}", stats.surface_area));
            let closed = if stats.is_closed {
                "yes".green()
            } else {
                "no".yellow()
            };
            println!("  {} {}", "Closed:".bright_black(), closed);
        }
        Self::print_field("Faces", stats.triangle_count.to_string());
        Self::print_field("Edges", geometry.edges.len().to_string());
    }

    /// Report the aggregate intersection
    pub fn report_intersection(result: &IntersectionResult, duration: Duration) {
        println!("\n{}", "━".repeat(60).bright_black());
        match result.iou {
            Some(iou) => println!("{} {}", "IoU:".bold(), format!("{iou:.6}").green().bold()),
            None => println!("{} {}", "IoU:".bold(), "undefined".yellow().bold()),
        }
        match &result.mesh {
            Some(mesh) => Self::print_field(
                "Intersection",
                format!("{} faces, {} vertices", mesh.triangle_count(), mesh.vertex_count()),
            ),
            None => Self::print_field("Intersection", "none".to_string()),
        }
        Self::print_field("Time", Self::format_duration(duration));
        println!("{}", "━".repeat(60).bright_black());
    }

    /// Report the effective configuration as TOML
    pub fn report_config(config: &GeometryConfig) {
        match toml::to_string_pretty(config) {
            Ok(text) => print!("{text}"),
            Err(e) => Self::report_error(&format!("cannot render config: {e}")),
        }
    }

    /// Report error
    pub fn report_error(message: &str) {
        eprintln!("\n{} {}", "Error:".red().bold(), message);
    }

    /// Report warning
    pub fn report_warning(message: &str) {
        println!("{} {}", "Warning:".yellow().bold(), message);
    }

    fn print_field(name: &str, value: String) {
        println!("  {} {}", format!("{name}:").bright_black(), value.cyan());
    }

    /// Format duration for display
    fn format_duration(duration: Duration) -> String {
        let micros = duration.as_micros();

        if micros < 1_000 {
            format!("{}µs", micros)
        } else if micros < 1_000_000 {
            format!("{:.2}ms", micros as f64 / 1_000.0)
        } else {
            format!("{:.2}s", micros as f64 / 1_000_000.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(
            Reporter::format_duration(Duration::from_micros(500)),
            "500µs"
        );
        assert_eq!(
            Reporter::format_duration(Duration::from_millis(5)),
            "5.00ms"
        );
        assert_eq!(Reporter::format_duration(Duration::from_secs(2)), "2.00s");
    }
}
