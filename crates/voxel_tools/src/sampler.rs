//! Attribute sampling - grid coordinates to an attributed point cloud.
//!
//! # Mask Re-check
//!
//! Every coordinate is checked against `mask` again before its value is
//! read, even when the coordinates were extracted from that same mask. This
//! keeps the sampler correct when coordinates are reused against a different
//! mask (a later pipeline stage, a cropped or eroded mask). The outcome of
//! the re-check decides between a sampled value and the sentinel; it never
//! produces an error.
//!
//! ```text
//! coord ──► inside mask bounds? ──no──► [0, 0, 0, 0]
//!                │ yes
//!                ▼
//!           mask[coord] > 0? ──no──► [0, 0, 0, 0]
//!                │ yes
//!                ▼
//!           v = values[coord] ──► [v, v, v, 1]
//! ```

use crate::constants::{FULL_OPACITY, SENTINEL_COLOR};
use crate::error::Result;
use crate::point_cloud::{validate_attribute_name, PointCloud};
use crate::types::{Color, GridCoord};
use crate::volume::ArrayVolume;

/// Build a point cloud from `coords`, attaching `attribute_name` sampled from
/// `values`.
///
/// Positions are the coordinates cast to floating point in grid units.
///
/// # Errors
/// - [`VoxelToolsError::AttributeName`](crate::VoxelToolsError::AttributeName)
///   if `attribute_name` is empty
/// - [`VoxelToolsError::ShapeMismatch`](crate::VoxelToolsError::ShapeMismatch)
///   if `mask` and `values` differ in dimensions
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "sampler::sample"))]
pub fn sample(
  coords: &[GridCoord],
  mask: &ArrayVolume,
  values: &ArrayVolume,
  attribute_name: &str,
) -> Result<PointCloud> {
  let attribute_name = validate_attribute_name(attribute_name)?;
  mask.ensure_same_shape(values)?;

  let positions = coords.iter().map(|coord| coord.to_position()).collect();
  let colors: Vec<Color> = coords
    .iter()
    .map(|&coord| sample_color(coord, mask, values))
    .collect();

  #[cfg(feature = "tracing")]
  {
    let rejected = colors.iter().filter(|c| **c == SENTINEL_COLOR).count();
    if rejected > 0 {
      tracing::warn!(rejected, total = coords.len(), "points failed the mask re-check");
    }
  }

  let mut cloud = PointCloud::from_positions(positions);
  cloud.insert_attribute(attribute_name, colors)?;
  Ok(cloud)
}

/// Attribute value for a single coordinate, applying the mask re-check.
#[inline]
pub fn sample_color(coord: GridCoord, mask: &ArrayVolume, values: &ArrayVolume) -> Color {
  if !mask.is_occupied(coord) {
    return SENTINEL_COLOR;
  }
  match values.get(coord) {
    Some(v) => [v, v, v, FULL_OPACITY],
    None => SENTINEL_COLOR,
  }
}

#[cfg(test)]
#[path = "sampler_test.rs"]
mod sampler_test;
