//! NPY decoding with dynamic element type.
//!
//! `ndarray-npy` reads one statically known element type at a time, so the
//! decoder tries each supported type in turn. A descriptor mismatch is
//! detected from the header alone, before any cell data is read.

use std::io::Read;
use std::path::Path;

use ndarray::{Array3, ArrayD, Ix3};
use ndarray_npy::{ReadNpyError, ReadNpyExt, ReadableElement};

use super::ElementType;
use crate::error::{Result, VoxelToolsError};

/// Decode a 3-dimensional NPY array into `f32` cells (still in stored axis
/// order).
///
/// `open` is called once per attempted element type and must return a fresh
/// reader positioned at the start of the NPY data.
pub(super) fn decode<R, F>(origin: &Path, mut open: F) -> Result<(Array3<f32>, ElementType)>
where
  R: Read,
  F: FnMut() -> Result<R>,
{
  if let Some(a) = attempt::<f32, _>(open()?, origin)? {
    return finish(a, ElementType::F32);
  }
  if let Some(a) = attempt::<f64, _>(open()?, origin)? {
    return finish(a.mapv(narrow_f64), ElementType::F64);
  }
  if let Some(a) = attempt::<bool, _>(open()?, origin)? {
    return finish(a.mapv(|v| if v { 1.0 } else { 0.0 }), ElementType::Bool);
  }
  if let Some(a) = attempt::<u8, _>(open()?, origin)? {
    return finish(a.mapv(f32::from), ElementType::U8);
  }
  if let Some(a) = attempt::<i8, _>(open()?, origin)? {
    return finish(a.mapv(f32::from), ElementType::I8);
  }
  if let Some(a) = attempt::<u16, _>(open()?, origin)? {
    return finish(a.mapv(f32::from), ElementType::U16);
  }
  if let Some(a) = attempt::<i16, _>(open()?, origin)? {
    return finish(a.mapv(f32::from), ElementType::I16);
  }
  if let Some(a) = attempt::<u32, _>(open()?, origin)? {
    return finish(a.mapv(|v| v as f32), ElementType::U32);
  }
  if let Some(a) = attempt::<i32, _>(open()?, origin)? {
    return finish(a.mapv(|v| v as f32), ElementType::I32);
  }
  if let Some(a) = attempt::<u64, _>(open()?, origin)? {
    return finish(a.mapv(|v| v as f32), ElementType::U64);
  }
  if let Some(a) = attempt::<i64, _>(open()?, origin)? {
    return finish(a.mapv(|v| v as f32), ElementType::I64);
  }

  Err(VoxelToolsError::Format(format!(
    "{}: unsupported element type (expected bool, integer or float)",
    origin.display()
  )))
}

/// Read as element type `T`; `Ok(None)` when the header names another type.
fn attempt<T, R>(reader: R, origin: &Path) -> Result<Option<ArrayD<T>>>
where
  T: ReadableElement,
  R: Read,
{
  match ArrayD::<T>::read_npy(reader) {
    Ok(array) => Ok(Some(array)),
    Err(ReadNpyError::WrongDescriptor(_)) => Ok(None),
    Err(ReadNpyError::Io(e)) => Err(VoxelToolsError::io(origin, e)),
    Err(ReadNpyError::ParseHeader(e)) => Err(VoxelToolsError::io(
      origin,
      std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()),
    )),
    Err(e) => Err(VoxelToolsError::Format(format!("{}: {}", origin.display(), e))),
  }
}

/// Narrow an f64 cell without changing its sign.
///
/// Positive values below the f32 range become `f32::MIN_POSITIVE`, so a cell
/// stored as occupied stays occupied.
fn narrow_f64(v: f64) -> f32 {
  let narrowed = v as f32;
  if v > 0.0 && narrowed <= 0.0 {
    f32::MIN_POSITIVE
  } else {
    narrowed
  }
}

/// Enforce rank 3.
fn finish(array: ArrayD<f32>, element_type: ElementType) -> Result<(Array3<f32>, ElementType)> {
  let ndim = array.ndim();
  let shape = array.shape().to_vec();
  let cells = array.into_dimensionality::<Ix3>().map_err(|_| {
    VoxelToolsError::Format(format!(
      "expected a 3-dimensional array, found {} dimension(s) with shape {:?}",
      ndim, shape
    ))
  })?;
  Ok((cells, element_type))
}
