//! Error type shared by every stage of the pipeline.
//!
//! Each top-level operation reports a single terminal error; no stage exposes
//! partially built output after a failure.

use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, VoxelToolsError>;

/// Errors produced by volume loading, sampling, indexing and transfer.
#[derive(Debug, Error)]
pub enum VoxelToolsError {
  /// File missing, unreadable, unwritable or not an NPY array.
  #[error("I/O error on {}: {source}", path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// Array is not a supported typed array, or not exactly 3-dimensional.
  #[error("invalid array format: {0}")]
  Format(String),

  /// Mask and value volumes do not share dimensions.
  #[error("shape mismatch: mask is {mask:?}, values are {values:?}")]
  ShapeMismatch { mask: [usize; 3], values: [usize; 3] },

  /// Attribute name empty or whitespace only.
  #[error("attribute name must not be empty")]
  AttributeName,

  /// Required attribute absent from the source point cloud.
  #[error("attribute '{0}' not found on source point cloud")]
  MissingAttribute(String),

  /// Attribute buffer length differs from the point count.
  #[error("attribute '{name}' has {found} values, point cloud has {expected} points")]
  AttributeLength {
    name: String,
    expected: usize,
    found: usize,
  },

  /// Nearest-neighbor query against an index with zero points.
  #[error("nearest-neighbor query against an empty spatial index")]
  EmptyIndex,

  /// Numeric parameter outside its usable domain.
  #[error("invalid parameter {name}: {reason}")]
  InvalidParameter { name: &'static str, reason: String },
}

impl VoxelToolsError {
  pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
    Self::Io {
      path: path.into(),
      source,
    }
  }
}
