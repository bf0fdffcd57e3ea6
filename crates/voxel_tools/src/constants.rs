//! Attribute and resampling constants.
//!
//! # Attribute Layout
//!
//! ```text
//! Every point attribute is a 4-channel float colour:
//!
//!   channel:   0     1     2     3
//!   meaning:   r     g     b     a (opacity)
//!
//!   inside mask:   [v,   v,   v,   1.0]   v = value volume at the point
//!   rejected:      [0.0, 0.0, 0.0, 0.0]   sentinel, never omitted
//! ```
//!
//! # Grid Memory Layout
//!
//! ```text
//! Resampling grids are row-major with X as the major axis and Z innermost,
//! matching the (x, y, z) order of extracted coordinates:
//!
//! index = (x * dim_y + y) * dim_z + z
//! ```

use crate::types::Color;

/// Number of channels in a point attribute.
pub const ATTRIBUTE_CHANNELS: usize = 4;

/// Opacity written for points that passed the mask re-check.
pub const FULL_OPACITY: f32 = 1.0;

/// Attribute value for points rejected by the mask re-check (zero magnitude,
/// zero opacity).
pub const SENTINEL_COLOR: Color = [0.0; ATTRIBUTE_CHANNELS];

/// Attribute name used when none is configured.
pub const DEFAULT_ATTRIBUTE_NAME: &str = "lac_ves";

/// Default resolution of the resampling grid along its longest side.
pub const DEFAULT_VOXEL_AMOUNT: u32 = 512;

/// Default point radius used when converting points into a volume.
pub const DEFAULT_RADIUS: f32 = 1.0;

/// Recommended voxel amount range (UI guardrail, not a core invariant).
pub const VOXEL_AMOUNT_RANGE: (u32, u32) = (16, 2048);

/// Recommended radius range (UI guardrail, not a core invariant).
pub const RADIUS_RANGE: (f32, f32) = (0.1, 10.0);

/// Extra voxels of padding on each side of the resampling grid so the surface
/// never touches the grid boundary.
pub const GRID_PADDING_VOXELS: usize = 1;

/// Convert 3D grid coordinates to a linear index (X major, Z minor).
#[inline(always)]
pub const fn grid_index(x: usize, y: usize, z: usize, dims: [usize; 3]) -> usize {
  (x * dims[1] + y) * dims[2] + z
}

/// Convert a linear grid index back to 3D coordinates.
#[inline(always)]
pub const fn grid_coord(idx: usize, dims: [usize; 3]) -> (usize, usize, usize) {
  let z = idx % dims[2];
  let y = (idx / dims[2]) % dims[1];
  let x = idx / (dims[1] * dims[2]);
  (x, y, z)
}

/// Corner offsets of a grid cell, in cell-local (x, y, z) steps.
///
/// Corner layout (binary: ZYX):
/// - 0 = (0,0,0)
/// - 1 = (1,0,0)
/// - 2 = (0,1,0)
/// - 3 = (1,1,0)
/// - 4 = (0,0,1)
/// - 5 = (1,0,1)
/// - 6 = (0,1,1)
/// - 7 = (1,1,1)
pub const CORNER_STEPS: [[usize; 3]; 8] = [
  [0, 0, 0],
  [1, 0, 0],
  [0, 1, 0],
  [1, 1, 0],
  [0, 0, 1],
  [1, 0, 1],
  [0, 1, 1],
  [1, 1, 1],
];

#[cfg(test)]
#[path = "constants_test.rs"]
mod constants_test;
