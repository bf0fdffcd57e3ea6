//! Core data types shared across extraction, sampling and resampling.

use glam::Vec3;

/// Per-point attribute value: r, g, b, a.
pub type Color = [f32; 4];

/// Integer grid coordinate inside an [`ArrayVolume`](crate::ArrayVolume).
///
/// Produced by mask extraction; valid coordinates satisfy `0 <= x < dim_x`
/// and likewise for y and z.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridCoord {
  /// Grid X position
  pub x: usize,
  /// Grid Y position
  pub y: usize,
  /// Grid Z position
  pub z: usize,
}

impl GridCoord {
  /// Create a new coordinate.
  pub const fn new(x: usize, y: usize, z: usize) -> Self {
    Self { x, y, z }
  }

  /// Grid-unit position with no offset or scale applied.
  #[inline]
  pub fn to_position(self) -> Vec3 {
    Vec3::new(self.x as f32, self.y as f32, self.z as f32)
  }

  /// Check whether the coordinate lies inside a volume of the given
  /// dimensions.
  #[inline]
  pub fn is_within(self, dims: [usize; 3]) -> bool {
    self.x < dims[0] && self.y < dims[1] && self.z < dims[2]
  }

  /// Coordinate as an `ndarray` index tuple.
  #[inline]
  pub fn as_index(self) -> [usize; 3] {
    [self.x, self.y, self.z]
  }
}

impl From<(usize, usize, usize)> for GridCoord {
  fn from((x, y, z): (usize, usize, usize)) -> Self {
    Self::new(x, y, z)
  }
}

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MinMaxAABB {
  pub min: Vec3,
  pub max: Vec3,
}

impl MinMaxAABB {
  /// Create AABB with inverted extents (ready for encapsulation).
  pub fn empty() -> Self {
    Self {
      min: Vec3::splat(f32::INFINITY),
      max: Vec3::splat(f32::NEG_INFINITY),
    }
  }

  /// Create AABB from min/max corners.
  pub fn new(min: Vec3, max: Vec3) -> Self {
    Self { min, max }
  }

  /// Expand AABB to include a point.
  #[inline]
  pub fn encapsulate(&mut self, point: Vec3) {
    self.min = self.min.min(point);
    self.max = self.max.max(point);
  }

  /// Check if AABB is valid (min <= max on all axes).
  pub fn is_valid(&self) -> bool {
    self.min.cmple(self.max).all()
  }

  /// Grow the box by `amount` on every side.
  pub fn expanded(&self, amount: f32) -> Self {
    Self {
      min: self.min - Vec3::splat(amount),
      max: self.max + Vec3::splat(amount),
    }
  }

  /// Get the size of the AABB (max - min).
  #[inline]
  pub fn size(&self) -> Vec3 {
    self.max - self.min
  }

  /// Get the center of the AABB.
  #[inline]
  pub fn center(&self) -> Vec3 {
    (self.min + self.max) * 0.5
  }
}

impl Default for MinMaxAABB {
  fn default() -> Self {
    Self::empty()
  }
}

impl FromIterator<Vec3> for MinMaxAABB {
  fn from_iter<I: IntoIterator<Item = Vec3>>(iter: I) -> Self {
    let mut bounds = Self::empty();
    for point in iter {
      bounds.encapsulate(point);
    }
    bounds
  }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;
