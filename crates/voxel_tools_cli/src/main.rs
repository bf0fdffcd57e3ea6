//! Voxel tools command line.
//!
//! Turns a mask volume and a co-registered parameter volume into an
//! attributed point cloud, and resamples that cloud into a smoothed mesh
//! carrying the same attribute.
//!
//! Output files (in the configured output directory):
//! - cloud.ply: one vertex per occupied mask cell, with `<attribute>_r/g/b/a`
//! - smooth.ply: resampled mesh with the transferred attribute

mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use glam::{Affine3A, Vec3};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use voxel_tools::{export, pipeline, PipelineReport, PointCloud, SurfaceNetsResampler};

use config::Config;

/// Voxel mask to point cloud conversion and attribute transfer.
#[derive(Parser, Debug)]
#[command(name = "voxel_tools")]
#[command(about = "Generates attributed point clouds from voxel masks and smooths them")]
struct Args {
	/// Path to configuration TOML file.
	#[arg(short, long)]
	config: PathBuf,

	/// Output directory (default: output_dir from the config).
	#[arg(short, long)]
	output: Option<PathBuf>,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
	/// Build the attributed point cloud and write cloud.ply.
	Generate,
	/// Build the point cloud in memory, resample it and write smooth.ply.
	Smooth,
	/// Generate, then smooth; writes both files.
	Run,
}

fn main() -> Result<()> {
	tracing_subscriber::registry()
		.with(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| "voxel_tools=info,voxel_tools_cli=info".into()),
		)
		.with(tracing_subscriber::fmt::layer())
		.init();

	let args = Args::parse();

	tracing::info!(config = %args.config.display(), "loading config");
	let config = Config::load(&args.config)?;

	let output_dir = args.output.clone().unwrap_or_else(|| config.output_dir.clone());
	std::fs::create_dir_all(&output_dir)
		.with_context(|| format!("Failed to create output dir: {}", output_dir.display()))?;

	let cloud = generate(&config)?;
	if args.command != Command::Smooth {
		write_cloud(&output_dir.join("cloud.ply"), &cloud)?;
	}
	if args.command != Command::Generate {
		smooth(&config, &cloud, &output_dir.join("smooth.ply"))?;
	}

	tracing::info!(output = %output_dir.display(), "done");
	Ok(())
}

/// Generate the point cloud and place it in world units.
fn generate(config: &Config) -> Result<PointCloud> {
	let _span = tracing::info_span!("generate").entered();
	tracing::info!(
		param = %config.param_path.display(),
		mask = %config.mask_path.display(),
		attribute = %config.attribute_name,
		"generating point cloud"
	);

	let output = pipeline::generate_from_files(
		&config.param_path,
		&config.mask_path,
		&config.attribute_name,
		config.axis_order.into(),
	)
	.context("Generating point cloud")?;
	log_report("generate", &output.report);

	let mut cloud = output.cloud;
	if config.scale != 1.0 {
		cloud.transform(&Affine3A::from_scale(Vec3::splat(config.scale)));
	}
	Ok(cloud)
}

fn write_cloud(path: &Path, cloud: &PointCloud) -> Result<()> {
	export::write_point_cloud(path, cloud)
		.with_context(|| format!("Writing point cloud: {}", path.display()))?;
	tracing::info!(path = %path.display(), points = cloud.len(), "wrote point cloud");
	Ok(())
}

fn smooth(config: &Config, cloud: &PointCloud, path: &Path) -> Result<()> {
	let _span = tracing::info_span!("smooth").entered();
	let resampler = SurfaceNetsResampler::new(config.smooth.resample_config());
	tracing::info!(
		voxel_amount = config.smooth.voxel_amount,
		radius = config.smooth.radius,
		transfer = ?config.smooth.transfer,
		"smoothing"
	);

	let output = pipeline::smooth(
		cloud,
		&config.attribute_name,
		&resampler,
		config.smooth.transfer.into(),
	)
	.context("Smoothing point cloud")?;
	log_report("smooth", &output.report);

	export::write_mesh(path, &output.mesh)
		.with_context(|| format!("Writing mesh: {}", path.display()))?;
	tracing::info!(
		path = %path.display(),
		vertices = output.mesh.points.len(),
		triangles = output.mesh.triangle_count(),
		"wrote mesh"
	);
	Ok(())
}

fn log_report(stage: &str, report: &PipelineReport) {
	if report.sentinel_points > 0 {
		tracing::warn!(
			stage,
			sentinels = report.sentinel_points,
			"points carry the zero-opacity sentinel"
		);
	}
	tracing::info!(
		stage,
		points = report.source_points,
		load_ms = report.load_us as f64 / 1000.0,
		extract_ms = report.extract_us as f64 / 1000.0,
		sample_ms = report.sample_us as f64 / 1000.0,
		resample_ms = report.resample_us as f64 / 1000.0,
		transfer_ms = report.transfer_us as f64 / 1000.0,
		total_ms = report.total_us() as f64 / 1000.0,
		"stage complete"
	);
}
