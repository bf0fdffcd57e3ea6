//! PointCloud - ordered positions plus named per-point colour attributes.
//!
//! The cloud owns its position and attribute buffers. Point order is the
//! index used by parallel attribute buffers and by the spatial index, so it is
//! never changed after construction.
//!
//! An attribute, once present, has exactly one value per point: buffers of
//! the wrong length are rejected instead of being padded or truncated.

use std::collections::BTreeMap;

use glam::{Affine3A, Vec3};

use crate::error::{Result, VoxelToolsError};
use crate::types::{Color, MinMaxAABB};

/// Ordered point set with named per-point attributes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointCloud {
  positions: Vec<Vec3>,
  attributes: BTreeMap<String, Vec<Color>>,
}

/// Borrowed view of a single point.
#[derive(Clone, Copy, Debug)]
pub struct PointRef<'a> {
  cloud: &'a PointCloud,
  index: usize,
}

impl PointCloud {
  /// Create an empty cloud.
  pub fn new() -> Self {
    Self::default()
  }

  /// Create a cloud from positions with no attributes.
  pub fn from_positions(positions: Vec<Vec3>) -> Self {
    Self {
      positions,
      attributes: BTreeMap::new(),
    }
  }

  /// Number of points.
  #[inline]
  pub fn len(&self) -> usize {
    self.positions.len()
  }

  /// Returns true if the cloud has no points.
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.positions.is_empty()
  }

  /// Point positions in insertion order.
  #[inline]
  pub fn positions(&self) -> &[Vec3] {
    &self.positions
  }

  /// Declare (or replace) an attribute.
  ///
  /// # Errors
  /// - [`VoxelToolsError::AttributeName`] if `name` is empty after trimming
  /// - [`VoxelToolsError::AttributeLength`] if `values` does not have one entry
  ///   per point
  pub fn insert_attribute(&mut self, name: &str, values: Vec<Color>) -> Result<()> {
    let name = validate_attribute_name(name)?;
    if values.len() != self.positions.len() {
      return Err(VoxelToolsError::AttributeLength {
        name: name.to_string(),
        expected: self.positions.len(),
        found: values.len(),
      });
    }
    self.attributes.insert(name.to_string(), values);
    Ok(())
  }

  /// Attribute values, one per point.
  pub fn attribute(&self, name: &str) -> Option<&[Color]> {
    self.attributes.get(name.trim()).map(Vec::as_slice)
  }

  /// Returns true if the attribute is declared.
  pub fn has_attribute(&self, name: &str) -> bool {
    self.attributes.contains_key(name.trim())
  }

  /// Remove an attribute, returning its values.
  pub fn remove_attribute(&mut self, name: &str) -> Option<Vec<Color>> {
    self.attributes.remove(name.trim())
  }

  /// Declared attribute names in sorted order.
  pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
    self.attributes.keys().map(String::as_str)
  }

  /// View of the point at `index`.
  pub fn point(&self, index: usize) -> Option<PointRef<'_>> {
    (index < self.len()).then_some(PointRef { cloud: self, index })
  }

  /// Bounding box of all positions (empty box for an empty cloud).
  pub fn bounds(&self) -> MinMaxAABB {
    self.positions.iter().copied().collect()
  }

  /// Transform every position in place, e.g. into a shared world frame.
  pub fn transform(&mut self, transform: &Affine3A) {
    for position in &mut self.positions {
      *position = transform.transform_point3(*position);
    }
  }
}

impl<'a> PointRef<'a> {
  /// Index of the point in its cloud.
  pub fn index(&self) -> usize {
    self.index
  }

  /// Position of the point.
  pub fn position(&self) -> Vec3 {
    self.cloud.positions[self.index]
  }

  /// Value of a named attribute at this point.
  pub fn attribute(&self, name: &str) -> Option<Color> {
    self.cloud.attribute(name).map(|values| values[self.index])
  }
}

/// Trim and reject empty attribute names.
pub(crate) fn validate_attribute_name(name: &str) -> Result<&str> {
  let trimmed = name.trim();
  if trimmed.is_empty() {
    return Err(VoxelToolsError::AttributeName);
  }
  Ok(trimmed)
}

#[cfg(test)]
#[path = "point_cloud_test.rs"]
mod point_cloud_test;
