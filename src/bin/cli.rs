// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Polyiou CLI

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use polyiou::cli::Reporter;
use polyiou::io::load_workspace;
use polyiou::scheduler::{GeometryJobScheduler, JobKey, JobOutput};
use polyiou::{Dimension, GeometryConfig, GeometryEngine};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "polyiou")]
#[command(about = "Convex hulls and Intersection-over-Union for vertex sets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to ./polyiou.toml when present)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum DimensionArg {
    #[value(name = "2d")]
    TwoD,
    #[value(name = "3d")]
    ThreeD,
}

impl From<DimensionArg> for Dimension {
    fn from(arg: DimensionArg) -> Self {
        match arg {
            DimensionArg::TwoD => Dimension::TwoD,
            DimensionArg::ThreeD => Dimension::ThreeD,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the IoU of the visible shapes in a workspace
    Iou {
        /// Workspace JSON file
        workspace: PathBuf,

        /// Override the workspace dimension
        #[arg(short, long)]
        dimension: Option<DimensionArg>,
    },

    /// Print hull statistics for every shape in a workspace
    Hull {
        /// Workspace JSON file
        workspace: PathBuf,

        /// Override the workspace dimension
        #[arg(short, long)]
        dimension: Option<DimensionArg>,
    },

    /// Print the effective configuration, or write it to a file
    Config {
        /// Write the configuration here instead of printing it
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        Reporter::report_error(&format!("{err:#}"));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => GeometryConfig::from_file(path)?,
        None => GeometryConfig::load()?,
    };

    match cli.command {
        Commands::Iou {
            workspace,
            dimension,
        } => iou_command(config, &workspace, dimension, cli.verbose),
        Commands::Hull {
            workspace,
            dimension,
        } => hull_command(config, &workspace, dimension),
        Commands::Config { output } => {
            match output {
                Some(path) => config.save(&path)?,
                None => Reporter::report_config(&config),
            }
            Ok(())
        }
    }
}

fn iou_command(
    config: GeometryConfig,
    workspace: &Path,
    dimension: Option<DimensionArg>,
    verbose: bool,
) -> Result<()> {
    let mut shapes = load_workspace(workspace)?;
    if let Some(dimension) = dimension {
        shapes.dimension = dimension.into();
    }
    if shapes.visible().count() < 2 {
        Reporter::report_warning("fewer than two visible shapes; IoU is undefined");
    }

    let start = Instant::now();
    let (scheduler, updates) =
        GeometryJobScheduler::new(GeometryEngine::new(config))?;
    scheduler.submit_shape_set(&shapes);
    scheduler.wait_idle();

    let mut aggregate = None;
    for update in updates.try_iter() {
        match (update.key, update.result) {
            (JobKey::Shape(id), Some(JobOutput::Shape(geometry))) if verbose => {
                Reporter::report_shape(id, &geometry)
            }
            (JobKey::Aggregate, Some(JobOutput::Aggregate(result))) => aggregate = Some(result),
            (key, None) => Reporter::report_warning(&format!("job {key:?} failed")),
            _ => {}
        }
    }

    let result = aggregate.ok_or_else(|| anyhow!("aggregate job produced no result"))?;
    Reporter::report_intersection(&result, start.elapsed());
    Ok(())
}

fn hull_command(
    config: GeometryConfig,
    workspace: &Path,
    dimension: Option<DimensionArg>,
) -> Result<()> {
    let mut shapes = load_workspace(workspace)?;
    if let Some(dimension) = dimension {
        shapes.dimension = dimension.into();
    }

    let engine = GeometryEngine::new(config);
    for (id, geometry) in engine.shape_geometries(&shapes) {
        Reporter::report_shape(id, &geometry);
    }
    Ok(())
}
