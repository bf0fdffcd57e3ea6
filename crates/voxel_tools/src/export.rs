//! ASCII PLY output for point clouds and meshes.
//!
//! Host applications import the result as geometry with named per-point
//! colour attributes. Each attribute becomes four float vertex properties:
//!
//! ```text
//! element vertex N
//! property float x
//! property float y
//! property float z
//! property float lac_ves_r
//! property float lac_ves_g
//! property float lac_ves_b
//! property float lac_ves_a
//! element face M                          (meshes only)
//! property list uchar uint vertex_indices
//! ```
//!
//! Attributes are written in sorted name order. Whitespace and control
//! characters in a name become `_` (so `lac ves` is written as `lac_ves_r`),
//! and a name that then clashes with an earlier one gets a `_2`, `_3`, ...
//! suffix. Non-finite values are written as `nan`, `inf` and `-inf`.

use std::collections::HashSet;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{Result, VoxelToolsError};
use crate::point_cloud::PointCloud;
use crate::resample::Mesh;

const CHANNEL_SUFFIXES: [&str; 4] = ["r", "g", "b", "a"];

/// Write `cloud` as a vertex-only PLY file.
pub fn write_point_cloud(path: &Path, cloud: &PointCloud) -> Result<()> {
  write_file(path, |w| write_ply(w, cloud, &[]))
}

/// Write `mesh` as a PLY file with a triangle face list.
pub fn write_mesh(path: &Path, mesh: &Mesh) -> Result<()> {
  write_file(path, |w| write_ply(w, &mesh.points, &mesh.indices))
}

fn write_file<F>(path: &Path, body: F) -> Result<()>
where
  F: FnOnce(&mut BufWriter<File>) -> std::io::Result<()>,
{
  let file = File::create(path).map_err(|e| VoxelToolsError::io(path, e))?;
  let mut writer = BufWriter::new(file);
  body(&mut writer)
    .and_then(|()| writer.flush())
    .map_err(|e| VoxelToolsError::io(path, e))?;

  #[cfg(feature = "tracing")]
  tracing::debug!(path = %path.display(), "wrote PLY");

  Ok(())
}

/// Serialize `cloud` (and optional triangles) as ASCII PLY.
pub fn write_ply<W: Write>(w: &mut W, cloud: &PointCloud, indices: &[u32]) -> std::io::Result<()> {
  let names: Vec<&str> = cloud.attribute_names().collect();
  let columns: Vec<&[[f32; 4]]> = names
    .iter()
    .filter_map(|name| cloud.attribute(name))
    .collect();
  let bases = property_names(&names);

  writeln!(w, "ply")?;
  writeln!(w, "format ascii 1.0")?;
  writeln!(w, "comment voxel_tools")?;
  writeln!(w, "element vertex {}", cloud.len())?;
  for axis in ["x", "y", "z"] {
    writeln!(w, "property float {axis}")?;
  }
  for name in &bases {
    for suffix in CHANNEL_SUFFIXES {
      writeln!(w, "property float {name}_{suffix}")?;
    }
  }
  if !indices.is_empty() {
    writeln!(w, "element face {}", indices.len() / 3)?;
    writeln!(w, "property list uchar uint vertex_indices")?;
  }
  writeln!(w, "end_header")?;

  for (i, position) in cloud.positions().iter().enumerate() {
    write!(
      w,
      "{} {} {}",
      PlyFloat(position.x),
      PlyFloat(position.y),
      PlyFloat(position.z)
    )?;
    for column in &columns {
      for channel in column[i] {
        write!(w, " {}", PlyFloat(channel))?;
      }
    }
    writeln!(w)?;
  }

  for tri in indices.chunks_exact(3) {
    writeln!(w, "3 {} {} {}", tri[0], tri[1], tri[2])?;
  }

  Ok(())
}

/// Header-safe, unique property base names for `names`.
fn property_names(names: &[&str]) -> Vec<String> {
  let mut used = HashSet::new();
  names
    .iter()
    .map(|name| {
      let base: String = name
        .chars()
        .map(|c| if c.is_whitespace() || c.is_control() { '_' } else { c })
        .collect();
      let mut candidate = base.clone();
      let mut n = 2;
      while !used.insert(candidate.clone()) {
        candidate = format!("{base}_{n}");
        n += 1;
      }
      candidate
    })
    .collect()
}

/// f32 in a form C `strtod` and Python `float` both parse.
struct PlyFloat(f32);

impl fmt::Display for PlyFloat {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let v = self.0;
    if v.is_nan() {
      f.write_str("nan")
    } else if v.is_infinite() {
      f.write_str(if v > 0.0 { "inf" } else { "-inf" })
    } else {
      write!(f, "{v}")
    }
  }
}

#[cfg(test)]
#[path = "export_test.rs"]
mod export_test;
