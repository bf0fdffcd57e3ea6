//! voxel_tools - Voxel mask to point cloud conversion and attribute transfer
//!
//! This crate turns a pair of co-registered 3D arrays (an occupancy mask and a
//! scalar "parameter" field) into a point cloud carrying a per-point colour
//! attribute, and carries that attribute over to a resampled, lower-density
//! version of the cloud by nearest-neighbor lookup.
//!
//! # Features
//!
//! - **ArrayVolume**: NPY loading with (z, y, x) → (x, y, z) axis normalization
//! - **Mask extraction**: Deterministic sparse coordinate extraction
//! - **Attribute sampling**: Mask re-check with an explicit zero-opacity
//!   sentinel for rejected points
//! - **SpatialIndex**: Balanced k-d tree with index-ordered tie breaking
//! - **Attribute transfer**: Exact-copy nearest-neighbor transfer, rayon
//!   parallel over target points
//! - **Resampling**: Points → distance field → Surface Nets mesh
//!
//! # Example
//!
//! ```ignore
//! use voxel_tools::{pipeline, AxisOrder, ResampleConfig, SurfaceNetsResampler, TransferMode};
//!
//! let generated = pipeline::generate_from_files(
//!     "lac.npy".as_ref(),
//!     "mask.npy".as_ref(),
//!     "lac_ves",
//!     AxisOrder::Zyx,
//! )?;
//!
//! let resampler = SurfaceNetsResampler::new(ResampleConfig::default());
//! let smoothed = pipeline::smooth(&generated.cloud, "lac_ves", &resampler, TransferMode::Nearest)?;
//!
//! println!("{} source points → {} mesh vertices",
//!     generated.cloud.len(), smoothed.mesh.points.len());
//! ```

pub mod constants;
pub mod error;
pub mod types;

// Re-export commonly used items
pub use constants::{DEFAULT_ATTRIBUTE_NAME, FULL_OPACITY, SENTINEL_COLOR};
pub use error::{Result, VoxelToolsError};
pub use types::{Color, GridCoord, MinMaxAABB};

// Typed 3D arrays and NPY loading
pub mod volume;
pub use volume::{ArrayVolume, AxisOrder, ElementType};

// Mask → coordinates → attributed points
pub mod extract;
pub mod point_cloud;
pub mod sampler;
pub use point_cloud::PointCloud;

// Nearest-neighbor search and attribute transfer
pub mod kdtree;
pub mod transfer;
pub use kdtree::SpatialIndex;
pub use transfer::TransferMode;

// Points → volume → mesh resampling
pub mod resample;
pub use resample::{Mesh, ResampleConfig, Resampler, SurfaceNetsResampler};

// Geometry output for host applications
pub mod export;

// Top-level Generate / Smooth operations
pub mod pipeline;
pub use pipeline::{GenerateOutput, PipelineReport, SmoothOutput};
