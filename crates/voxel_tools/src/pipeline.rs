//! Top-level Generate and Smooth operations.
//!
//! ```text
//! Generate:
//!   mask.npy ──┐
//!              ├─► ArrayVolume ×2 ─► extract ─► sample ─► PointCloud + attribute
//!   param.npy ─┘
//!
//! Smooth:
//!   PointCloud ─► Resampler ─► Mesh ─► transfer(attribute) ─► Mesh + attribute
//! ```
//!
//! Each operation either returns its complete output or a single error. No
//! partially built cloud or mesh is ever returned.

use std::path::Path;

use web_time::Instant;

use crate::constants::SENTINEL_COLOR;
use crate::error::{Result, VoxelToolsError};
use crate::extract::extract;
use crate::point_cloud::{validate_attribute_name, PointCloud};
use crate::resample::{Mesh, Resampler};
use crate::sampler::sample;
use crate::transfer::{transfer, TransferMode};
use crate::volume::{ArrayVolume, AxisOrder};

/// Counts and per-stage timings of one operation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PipelineReport {
  /// Points in the generated (or smoothed source) cloud.
  pub source_points: usize,
  /// Points carrying the sentinel value after the operation.
  pub sentinel_points: usize,
  /// Vertices of the resampled mesh (Smooth only).
  pub mesh_vertices: usize,
  /// Triangles of the resampled mesh (Smooth only).
  pub mesh_triangles: usize,
  pub load_us: u64,
  pub extract_us: u64,
  pub sample_us: u64,
  pub resample_us: u64,
  pub transfer_us: u64,
}

impl PipelineReport {
  /// Total time across all stages.
  pub fn total_us(&self) -> u64 {
    self.load_us + self.extract_us + self.sample_us + self.resample_us + self.transfer_us
  }
}

/// Result of the Generate operation.
#[derive(Clone, Debug)]
pub struct GenerateOutput {
  pub cloud: PointCloud,
  pub report: PipelineReport,
}

/// Result of the Smooth operation.
#[derive(Clone, Debug)]
pub struct SmoothOutput {
  /// Resampled mesh with the transferred attribute on its points.
  pub mesh: Mesh,
  pub report: PipelineReport,
}

/// Extract the occupied cells of `mask` and sample `values` onto them.
///
/// # Errors
/// See [`sample`]: empty attribute name or mismatched shapes.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "pipeline::generate"))]
pub fn generate(mask: &ArrayVolume, values: &ArrayVolume, attribute_name: &str) -> Result<GenerateOutput> {
  let attribute_name = validate_attribute_name(attribute_name)?;
  mask.ensure_same_shape(values)?;

  let mut report = PipelineReport::default();

  let start = Instant::now();
  let coords = extract(mask);
  report.extract_us = start.elapsed().as_micros() as u64;

  let start = Instant::now();
  let cloud = sample(&coords, mask, values, attribute_name)?;
  report.sample_us = start.elapsed().as_micros() as u64;

  report.source_points = cloud.len();
  report.sentinel_points = count_sentinels(&cloud, attribute_name);

  #[cfg(feature = "tracing")]
  tracing::info!(
    points = report.source_points,
    sentinels = report.sentinel_points,
    attribute = attribute_name,
    "generated point cloud"
  );

  Ok(GenerateOutput { cloud, report })
}

/// Load both volumes with the same axis order, then [`generate`].
///
/// # Errors
/// Loading errors ([`VoxelToolsError::Io`], [`VoxelToolsError::Format`]) in
/// addition to those of [`generate`].
pub fn generate_from_files(
  param_path: &Path,
  mask_path: &Path,
  attribute_name: &str,
  axis_order: AxisOrder,
) -> Result<GenerateOutput> {
  // Reject the name before touching the filesystem.
  validate_attribute_name(attribute_name)?;

  let start = Instant::now();
  let values = ArrayVolume::load(param_path, axis_order)?;
  let mask = ArrayVolume::load(mask_path, axis_order)?;
  let load_us = start.elapsed().as_micros() as u64;

  let mut output = generate(&mask, &values, attribute_name)?;
  output.report.load_us = load_us;
  Ok(output)
}

/// Resample `source` and transfer `attribute_name` onto the new geometry.
///
/// The attribute is checked before resampling, so a missing attribute fails
/// fast.
///
/// # Errors
/// - [`VoxelToolsError::AttributeName`] / [`VoxelToolsError::MissingAttribute`]
/// - Any error from `resampler`
/// - [`VoxelToolsError::EmptyIndex`] if the resampler produced points from an
///   empty source
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "pipeline::smooth"))]
pub fn smooth<R: Resampler + ?Sized>(
  source: &PointCloud,
  attribute_name: &str,
  resampler: &R,
  mode: TransferMode,
) -> Result<SmoothOutput> {
  let attribute_name = validate_attribute_name(attribute_name)?;
  if !source.has_attribute(attribute_name) {
    return Err(VoxelToolsError::MissingAttribute(attribute_name.to_string()));
  }
  let mode = mode.validate()?;

  let mut report = PipelineReport {
    source_points: source.len(),
    ..Default::default()
  };

  let start = Instant::now();
  let mut mesh = resampler.resample(source)?;
  report.resample_us = start.elapsed().as_micros() as u64;

  let start = Instant::now();
  transfer(source, attribute_name, &mut mesh.points, attribute_name, mode)?;
  report.transfer_us = start.elapsed().as_micros() as u64;

  report.mesh_vertices = mesh.points.len();
  report.mesh_triangles = mesh.triangle_count();
  report.sentinel_points = count_sentinels(&mesh.points, attribute_name);

  #[cfg(feature = "tracing")]
  tracing::info!(
    source_points = report.source_points,
    vertices = report.mesh_vertices,
    triangles = report.mesh_triangles,
    "smoothed point cloud"
  );

  Ok(SmoothOutput { mesh, report })
}

fn count_sentinels(cloud: &PointCloud, attribute_name: &str) -> usize {
  cloud
    .attribute(attribute_name)
    .map_or(0, |values| values.iter().filter(|c| **c == SENTINEL_COLOR).count())
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod pipeline_test;
