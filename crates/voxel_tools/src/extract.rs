//! Mask extraction - occupied cells to grid coordinates.
//!
//! Coordinates are produced in lexicographic (x, y, z) order: X is the
//! slowest-varying axis and Z the fastest. Downstream point indices follow
//! this order, so it is part of the contract.
//!
//! ```text
//! mask (x, y, z)            extract()
//!   [0,0,0] = 1   ──►  0: (0,0,0)
//!   [0,1,1] = 1   ──►  1: (0,1,1)
//!   [1,0,0] = 1   ──►  2: (1,0,0)
//!   others  = 0
//! ```

use crate::types::GridCoord;
use crate::volume::ArrayVolume;

/// Collect the coordinates of every cell whose value is greater than zero.
///
/// Each coordinate appears exactly once. An empty mask yields an empty
/// vector.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "extract::extract"))]
pub fn extract(mask: &ArrayVolume) -> Vec<GridCoord> {
  // `indexed_iter` walks logical (row-major) order regardless of memory layout.
  let coords: Vec<GridCoord> = mask
    .cells()
    .indexed_iter()
    .filter(|(_, &value)| value > 0.0)
    .map(|(index, _)| GridCoord::from(index))
    .collect();

  #[cfg(feature = "tracing")]
  tracing::debug!(
    occupied = coords.len(),
    cells = mask.len(),
    "extracted mask coordinates"
  );

  coords
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod extract_test;
