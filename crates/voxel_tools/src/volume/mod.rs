//! ArrayVolume - typed 3D array with axis-order normalization.
//!
//! Volumes are stored in (x, y, z) index order once loaded. Source arrays
//! written in (z, y, x) order are reversed on load so that a mask and a value
//! field loaded with the same [`AxisOrder`] stay co-registered.
//!
//! ```text
//!   stored (Zyx)             normalized
//!   shape [dz, dy, dx]  ──►  shape [dx, dy, dz]
//!   cell  [k, j, i]     ──►  cell  [i, j, k]
//! ```

mod npy;

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use ndarray::Array3;

use crate::error::{Result, VoxelToolsError};
use crate::types::GridCoord;

/// Axis order of an array as stored on disk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AxisOrder {
  /// Stored as (x, y, z); used as-is.
  Xyz,
  /// Stored as (z, y, x), the usual volumetric convention; reversed on load.
  #[default]
  Zyx,
}

/// Element type of the array as stored on disk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementType {
  Bool,
  I8,
  I16,
  I32,
  I64,
  U8,
  U16,
  U32,
  U64,
  F32,
  F64,
}

impl std::fmt::Display for ElementType {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let name = match self {
      ElementType::Bool => "bool",
      ElementType::I8 => "int8",
      ElementType::I16 => "int16",
      ElementType::I32 => "int32",
      ElementType::I64 => "int64",
      ElementType::U8 => "uint8",
      ElementType::U16 => "uint16",
      ElementType::U32 => "uint32",
      ElementType::U64 => "uint64",
      ElementType::F32 => "float32",
      ElementType::F64 => "float64",
    };
    f.write_str(name)
  }
}

/// Typed 3-dimensional array of numeric cells in (x, y, z) index order.
///
/// Cells are held as `f32` regardless of the stored element type; booleans
/// become 1.0 / 0.0. A cell is occupied when its value is greater than zero;
/// positive f64 cells too small for f32 are kept as `f32::MIN_POSITIVE`.
#[derive(Clone, Debug, PartialEq)]
pub struct ArrayVolume {
  cells: Array3<f32>,
  element_type: ElementType,
}

impl ArrayVolume {
  /// Wrap an array that is already in (x, y, z) order.
  pub fn from_array(cells: Array3<f32>) -> Self {
    Self {
      cells,
      element_type: ElementType::F32,
    }
  }

  /// Wrap an array stored in `order`, normalizing it to (x, y, z).
  pub fn from_stored(cells: Array3<f32>, order: AxisOrder) -> Self {
    Self::from_array(normalize_axes(cells, order))
  }

  /// Volume with every cell set to `value`.
  pub fn filled(dims: [usize; 3], value: f32) -> Self {
    Self::from_array(Array3::from_elem(dims, value))
  }

  /// Load a volume from an NPY file.
  ///
  /// # Errors
  /// - [`VoxelToolsError::Io`] if the file is missing, unreadable or not an
  ///   NPY array at all
  /// - [`VoxelToolsError::Format`] if its element type is unsupported or it is
  ///   not exactly 3-dimensional
  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "volume::load"))]
  pub fn load(path: &Path, order: AxisOrder) -> Result<Self> {
    let (cells, element_type) = npy::decode(path, || {
      File::open(path)
        .map(BufReader::new)
        .map_err(|e| VoxelToolsError::io(path, e))
    })?;

    #[cfg(feature = "tracing")]
    tracing::debug!(
      path = %path.display(),
      dtype = %element_type,
      shape = ?cells.dim(),
      "loaded volume"
    );

    Ok(Self {
      cells: normalize_axes(cells, order),
      element_type,
    })
  }

  /// Decode a volume from in-memory NPY bytes.
  pub fn from_npy_bytes(bytes: &[u8], order: AxisOrder) -> Result<Self> {
    let origin = Path::new("<memory>");
    let (cells, element_type) = npy::decode(origin, || Ok::<_, VoxelToolsError>(bytes))?;
    Ok(Self {
      cells: normalize_axes(cells, order),
      element_type,
    })
  }

  /// Decode a volume from any reader producing NPY data.
  pub fn read_npy<R: Read>(mut reader: R, order: AxisOrder) -> Result<Self> {
    let mut bytes = Vec::new();
    reader
      .read_to_end(&mut bytes)
      .map_err(|e| VoxelToolsError::io("<reader>", e))?;
    Self::from_npy_bytes(&bytes, order)
  }

  /// Dimensions (dx, dy, dz).
  #[inline]
  pub fn dims(&self) -> [usize; 3] {
    let (dx, dy, dz) = self.cells.dim();
    [dx, dy, dz]
  }

  /// Total number of cells.
  pub fn len(&self) -> usize {
    self.cells.len()
  }

  /// Returns true if any dimension is zero.
  pub fn is_empty(&self) -> bool {
    self.cells.is_empty()
  }

  /// Element type the volume was stored as.
  pub fn element_type(&self) -> ElementType {
    self.element_type
  }

  /// Underlying cells in (x, y, z) order.
  pub fn cells(&self) -> &Array3<f32> {
    &self.cells
  }

  /// Cell value, or `None` if the coordinate is outside the volume.
  #[inline]
  pub fn get(&self, coord: GridCoord) -> Option<f32> {
    self.cells.get(coord.as_index()).copied()
  }

  /// Returns true if the coordinate is inside the volume and its cell is > 0.
  #[inline]
  pub fn is_occupied(&self, coord: GridCoord) -> bool {
    self.get(coord).is_some_and(|v| v > 0.0)
  }

  /// Number of occupied cells.
  pub fn occupied_count(&self) -> usize {
    self.cells.iter().filter(|&&v| v > 0.0).count()
  }

  /// Check that two volumes can be used together.
  ///
  /// # Errors
  /// [`VoxelToolsError::ShapeMismatch`] if the dimensions differ.
  pub fn ensure_same_shape(&self, values: &ArrayVolume) -> Result<()> {
    if self.dims() != values.dims() {
      return Err(VoxelToolsError::ShapeMismatch {
        mask: self.dims(),
        values: values.dims(),
      });
    }
    Ok(())
  }
}

/// Reverse axes for (z, y, x) storage and return a standard-layout array.
fn normalize_axes(cells: Array3<f32>, order: AxisOrder) -> Array3<f32> {
  match order {
    AxisOrder::Xyz => cells,
    AxisOrder::Zyx => cells.reversed_axes().as_standard_layout().into_owned(),
  }
}
