//! Attribute transfer - carry a per-point attribute from one cloud onto
//! another of different density.
//!
//! A [`SpatialIndex`] is built over the source positions for the duration of
//! one call. Each target point is resolved independently, so the loop runs in
//! parallel over target points and writes only its own output slot.
//!
//! Both clouds must already be in a shared coordinate frame; no transform is
//! applied here.
//!
//! # Modes
//!
//! | Mode | Result per target point |
//! |------|-------------------------|
//! | [`TransferMode::Nearest`] | exact copy of the nearest source value |
//! | [`TransferMode::InverseDistance`] | `1 / d^power` weighted blend of the k nearest |
//!
//! `Nearest` is the default. It preserves discrete values exactly, at the cost
//! of staircasing when densities differ sharply.

use rayon::prelude::*;

use crate::error::{Result, VoxelToolsError};
use crate::kdtree::SpatialIndex;
use crate::point_cloud::{validate_attribute_name, PointCloud};
use crate::types::Color;

/// How a target value is derived from nearby source values.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum TransferMode {
  /// Copy the value of the single nearest source point.
  #[default]
  Nearest,
  /// Blend the `neighbors` nearest values with weights `1 / d^power`.
  InverseDistance { neighbors: usize, power: f32 },
}

impl TransferMode {
  pub(crate) fn validate(self) -> Result<Self> {
    if let TransferMode::InverseDistance { neighbors, power } = self {
      if neighbors == 0 {
        return Err(VoxelToolsError::InvalidParameter {
          name: "neighbors",
          reason: "must be at least 1".to_string(),
        });
      }
      if !power.is_finite() || power < 0.0 {
        return Err(VoxelToolsError::InvalidParameter {
          name: "power",
          reason: format!("must be finite and non-negative, got {power}"),
        });
      }
    }
    Ok(self)
  }
}

/// Write `target_attribute` onto every point of `target`, taken from
/// `source_attribute` of `source`.
///
/// An existing `target_attribute` on `target` is replaced. An empty target
/// receives an empty attribute.
///
/// # Errors
/// - [`VoxelToolsError::AttributeName`] if either name is empty
/// - [`VoxelToolsError::MissingAttribute`] if `source` lacks `source_attribute`
/// - [`VoxelToolsError::EmptyIndex`] if `source` has no points but `target` does
/// - [`VoxelToolsError::InvalidParameter`] for an unusable `mode`
///
/// `target` is left unchanged on error.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "transfer::transfer"))]
pub fn transfer(
  source: &PointCloud,
  source_attribute: &str,
  target: &mut PointCloud,
  target_attribute: &str,
  mode: TransferMode,
) -> Result<()> {
  let source_attribute = validate_attribute_name(source_attribute)?;
  let target_attribute = validate_attribute_name(target_attribute)?;
  let mode = mode.validate()?;

  let source_values = source
    .attribute(source_attribute)
    .ok_or_else(|| VoxelToolsError::MissingAttribute(source_attribute.to_string()))?;

  let values = transfer_values(source, source_values, target, mode)?;
  target.insert_attribute(target_attribute, values)
}

/// Transferred values for each target point, in target order.
fn transfer_values(
  source: &PointCloud,
  source_values: &[Color],
  target: &PointCloud,
  mode: TransferMode,
) -> Result<Vec<Color>> {
  if target.is_empty() {
    return Ok(Vec::new());
  }
  if source.is_empty() {
    return Err(VoxelToolsError::EmptyIndex);
  }

  let index = SpatialIndex::build(source);

  #[cfg(feature = "tracing")]
  tracing::debug!(
    source_points = source.len(),
    target_points = target.len(),
    ?mode,
    "transferring attribute"
  );

  target
    .positions()
    .par_iter()
    .map(|&position| match mode {
      TransferMode::Nearest => {
        let (nearest, _) = index.nearest(position)?;
        Ok(source_values[nearest])
      }
      TransferMode::InverseDistance { neighbors, power } => {
        let found = index.nearest_k(position, neighbors)?;
        Ok(blend(&found, source_values, power))
      }
    })
    .collect()
}

/// Inverse distance weighted blend of `found` (sorted by distance).
fn blend(found: &[(usize, f32)], values: &[Color], power: f32) -> Color {
  // Exact hit: copy verbatim.
  if let Some(&(index, distance)) = found.first() {
    if distance == 0.0 {
      return values[index];
    }
  }

  let mut sum = [0.0f32; 4];
  let mut total_weight = 0.0f32;
  for &(index, distance) in found {
    let weight = 1.0 / distance.powf(power);
    for (acc, channel) in sum.iter_mut().zip(values[index]) {
      *acc += weight * channel;
    }
    total_weight += weight;
  }

  if total_weight > 0.0 && total_weight.is_finite() {
    sum.map(|c| c / total_weight)
  } else {
    // Weights underflowed or overflowed; fall back to the nearest value.
    found.first().map_or([0.0; 4], |&(index, _)| values[index])
  }
}

#[cfg(test)]
#[path = "transfer_test.rs"]
mod transfer_test;
