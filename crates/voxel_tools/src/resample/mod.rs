//! Volume resampling - points → distance field → surface mesh.
//!
//! Attribute transfer only needs *some* lower-density geometry to fill; it
//! never depends on how that geometry was produced. The [`Resampler`] trait is
//! that seam. [`SurfaceNetsResampler`] is the shipped implementation:
//!
//! ```text
//! PointCloud ──► SpatialIndex
//!                    │
//!                    ▼
//!        SampleGrid (bounds + radius + 1 voxel padding)
//!                    │  sdf(p) = |p - nearest(p)| - radius
//!                    ▼
//!        Surface Nets over the zero level set
//!                    │
//!                    ▼
//!        Mesh { points, indices }
//! ```
//!
//! `voxel_amount` is the number of voxels along the longest side of the
//! radius-padded bounds, so the grid resolution follows the data extent rather
//! than an absolute voxel size.

mod surface_nets;

use glam::Vec3;

use crate::constants::{DEFAULT_RADIUS, DEFAULT_VOXEL_AMOUNT, GRID_PADDING_VOXELS};
use crate::error::{Result, VoxelToolsError};
use crate::kdtree::SpatialIndex;
use crate::point_cloud::PointCloud;
use crate::types::MinMaxAABB;

/// Produces new geometry at a different point density from a point cloud.
pub trait Resampler {
  /// Resample `cloud` into a triangle mesh.
  fn resample(&self, cloud: &PointCloud) -> Result<Mesh>;
}

/// Triangle mesh whose vertices form a point cloud.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
  /// Mesh vertices. Attributes live here, one value per vertex.
  pub points: PointCloud,
  /// Triangle list, three vertex indices per triangle.
  pub indices: Vec<u32>,
}

impl Mesh {
  /// Number of triangles.
  #[inline]
  pub fn triangle_count(&self) -> usize {
    self.indices.len() / 3
  }

  /// Returns true if the mesh has no vertices.
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.points.is_empty()
  }

  /// Iterate triangles as vertex index triples.
  pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
    self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
  }
}

/// Parameters of the points → volume → mesh conversion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResampleConfig {
  /// Voxels along the longest side of the radius-padded bounds.
  pub voxel_amount: u32,
  /// Sphere radius around each point.
  pub radius: f32,
}

impl Default for ResampleConfig {
  fn default() -> Self {
    Self {
      voxel_amount: DEFAULT_VOXEL_AMOUNT,
      radius: DEFAULT_RADIUS,
    }
  }
}

impl ResampleConfig {
  /// Builder: set voxel amount.
  pub fn with_voxel_amount(mut self, voxel_amount: u32) -> Self {
    self.voxel_amount = voxel_amount;
    self
  }

  /// Builder: set point radius.
  pub fn with_radius(mut self, radius: f32) -> Self {
    self.radius = radius;
    self
  }

  /// Reject parameters the conversion cannot work with.
  ///
  /// The recommended UI ranges are not enforced here.
  pub fn validate(&self) -> Result<()> {
    if self.voxel_amount == 0 {
      return Err(VoxelToolsError::InvalidParameter {
        name: "voxel_amount",
        reason: "must be at least 1".to_string(),
      });
    }
    if !self.radius.is_finite() || self.radius <= 0.0 {
      return Err(VoxelToolsError::InvalidParameter {
        name: "radius",
        reason: format!("must be finite and positive, got {}", self.radius),
      });
    }
    Ok(())
  }
}

/// Regular sample lattice covering a point cloud.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct SampleGrid {
  /// World position of sample (0, 0, 0).
  pub origin: Vec3,
  /// Spacing between samples.
  pub voxel_size: f32,
  /// Sample counts along X, Y, Z (cells are one fewer).
  pub samples: [usize; 3],
}

impl SampleGrid {
  /// Grid over `bounds` padded by `radius` plus [`GRID_PADDING_VOXELS`].
  pub fn covering(bounds: MinMaxAABB, config: &ResampleConfig) -> Result<Self> {
    let inner = bounds.expanded(config.radius);
    let size = inner.size();
    if !size.is_finite() || !inner.is_valid() {
      return Err(VoxelToolsError::InvalidParameter {
        name: "positions",
        reason: "point cloud bounds are not finite".to_string(),
      });
    }

    let voxel_size = size.max_element() / config.voxel_amount as f32;
    let padding = GRID_PADDING_VOXELS as f32 * voxel_size;
    let samples = size.to_array().map(|extent| {
      let cells = (extent / voxel_size).ceil().max(1.0) as usize;
      cells + 2 * GRID_PADDING_VOXELS + 1
    });

    // One vertex per cell at most; indices are u32 and u32::MAX is reserved.
    let total = samples.iter().try_fold(1usize, |acc, &n| acc.checked_mul(n));
    if !total.is_some_and(|total| total < u32::MAX as usize) {
      return Err(VoxelToolsError::InvalidParameter {
        name: "voxel_amount",
        reason: format!(
          "a {:?} sample grid exceeds the u32 vertex index range",
          samples
        ),
      });
    }

    Ok(Self {
      origin: inner.min - Vec3::splat(padding),
      voxel_size,
      samples,
    })
  }

  /// World position of sample `(x, y, z)`.
  #[inline]
  pub fn position(&self, x: usize, y: usize, z: usize) -> Vec3 {
    self.origin + Vec3::new(x as f32, y as f32, z as f32) * self.voxel_size
  }
}

/// Points → signed distance field → Surface Nets mesh.
#[derive(Clone, Copy, Debug, Default)]
pub struct SurfaceNetsResampler {
  config: ResampleConfig,
}

impl SurfaceNetsResampler {
  pub fn new(config: ResampleConfig) -> Self {
    Self { config }
  }

  pub fn config(&self) -> &ResampleConfig {
    &self.config
  }
}

impl Resampler for SurfaceNetsResampler {
  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "resample::surface_nets"))]
  fn resample(&self, cloud: &PointCloud) -> Result<Mesh> {
    self.config.validate()?;
    if cloud.is_empty() {
      return Ok(Mesh::default());
    }

    let grid = SampleGrid::covering(cloud.bounds(), &self.config)?;
    let index = SpatialIndex::build(cloud);
    let radius = self.config.radius;

    #[cfg(feature = "tracing")]
    tracing::debug!(
      samples = ?grid.samples,
      voxel_size = grid.voxel_size,
      points = cloud.len(),
      "sampling distance field"
    );

    // The index is non-empty here, so every query resolves.
    let (positions, indices) = surface_nets::mesh_field(&grid, |p| {
      index
        .nearest(p)
        .map_or(f32::INFINITY, |(_, distance)| distance - radius)
    });

    #[cfg(feature = "tracing")]
    tracing::debug!(
      vertices = positions.len(),
      triangles = indices.len() / 3,
      "surface extracted"
    );

    Ok(Mesh {
      points: PointCloud::from_positions(positions),
      indices,
    })
  }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;
