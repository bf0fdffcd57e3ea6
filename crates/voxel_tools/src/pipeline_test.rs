use std::cell::Cell;
use std::path::PathBuf;

use glam::Vec3;
use ndarray::Array3;

use super::*;
use crate::resample::{ResampleConfig, SurfaceNetsResampler};

/// Resampler returning a fixed set of points, counting its calls.
struct FixedResampler {
  points: Vec<Vec3>,
  calls: Cell<usize>,
}

impl FixedResampler {
  fn new(points: Vec<Vec3>) -> Self {
    Self {
      points,
      calls: Cell::new(0),
    }
  }
}

impl Resampler for FixedResampler {
  fn resample(&self, _cloud: &PointCloud) -> Result<Mesh> {
    self.calls.set(self.calls.get() + 1);
    Ok(Mesh {
      points: PointCloud::from_positions(self.points.clone()),
      indices: Vec::new(),
    })
  }
}

fn temp_dir(tag: &str) -> PathBuf {
  let dir = std::env::temp_dir().join(format!("voxel_tools_pipeline_{}_{}", tag, std::process::id()));
  std::fs::create_dir_all(&dir).unwrap();
  dir
}

fn corner_mask() -> ArrayVolume {
  let mut cells = Array3::zeros((2, 2, 2));
  cells[[0, 0, 0]] = 1.0;
  cells[[1, 1, 1]] = 1.0;
  ArrayVolume::from_array(cells)
}

#[test]
fn test_generate_corner_cube() {
  let output = generate(&corner_mask(), &ArrayVolume::filled([2, 2, 2], 5.0), "lac_ves").unwrap();

  assert_eq!(output.cloud.positions(), &[Vec3::ZERO, Vec3::ONE]);
  assert_eq!(
    output.cloud.attribute("lac_ves").unwrap(),
    &[[5.0, 5.0, 5.0, 1.0], [5.0, 5.0, 5.0, 1.0]]
  );
  assert_eq!(output.report.source_points, 2);
  assert_eq!(output.report.sentinel_points, 0);
}

#[test]
fn test_generate_rejects_mismatched_shapes() {
  let result = generate(
    &ArrayVolume::filled([2, 2, 2], 1.0),
    &ArrayVolume::filled([2, 2, 3], 1.0),
    "lac_ves",
  );
  assert!(matches!(result, Err(VoxelToolsError::ShapeMismatch { .. })));
}

#[test]
fn test_generate_from_files_zyx() {
  let dir = temp_dir("zyx");
  // Stored (z, y, x): a single occupied cell at x = 2, y = 1, z = 0.
  let mut mask = Array3::<u8>::zeros((1, 2, 3));
  mask[[0, 1, 2]] = 1;
  let values = Array3::<f64>::from_elem((1, 2, 3), 0.25);
  let mask_path = dir.join("mask.npy");
  let param_path = dir.join("lac.npy");
  ndarray_npy::write_npy(&mask_path, &mask).unwrap();
  ndarray_npy::write_npy(&param_path, &values).unwrap();

  let output = generate_from_files(&param_path, &mask_path, "lac_ves", AxisOrder::Zyx).unwrap();

  assert_eq!(output.cloud.positions(), &[Vec3::new(2.0, 1.0, 0.0)]);
  assert_eq!(output.cloud.attribute("lac_ves").unwrap(), &[[0.25, 0.25, 0.25, 1.0]]);

  std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_generate_from_missing_file() {
  let dir = temp_dir("missing");
  let result = generate_from_files(
    &dir.join("nope.npy"),
    &dir.join("also_nope.npy"),
    "lac_ves",
    AxisOrder::Zyx,
  );
  assert!(matches!(result, Err(VoxelToolsError::Io { .. })));
  std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_generate_from_files_checks_name_first() {
  let result = generate_from_files(
    Path::new("/nonexistent/lac.npy"),
    Path::new("/nonexistent/mask.npy"),
    " ",
    AxisOrder::Zyx,
  );
  assert!(matches!(result, Err(VoxelToolsError::AttributeName)));
}

#[test]
fn test_smooth_transfers_onto_resampled_points() {
  let mut source = PointCloud::from_positions(vec![Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0)]);
  source
    .insert_attribute("lac_ves", vec![[1.0, 0.0, 0.0, 1.0], [0.0, 1.0, 0.0, 1.0]])
    .unwrap();
  let resampler = FixedResampler::new(vec![Vec3::new(1.0, 0.0, 0.0), Vec3::new(9.0, 0.0, 0.0)]);

  let output = smooth(&source, "lac_ves", &resampler, TransferMode::Nearest).unwrap();

  assert_eq!(
    output.mesh.points.attribute("lac_ves").unwrap(),
    &[[1.0, 0.0, 0.0, 1.0], [0.0, 1.0, 0.0, 1.0]]
  );
  assert_eq!(output.report.source_points, 2);
  assert_eq!(output.report.mesh_vertices, 2);
}

#[test]
fn test_smooth_missing_attribute_skips_resampling() {
  let source = PointCloud::from_positions(vec![Vec3::ZERO]);
  let resampler = FixedResampler::new(vec![Vec3::ONE]);

  let result = smooth(&source, "lac_ves", &resampler, TransferMode::Nearest);
  assert!(matches!(result, Err(VoxelToolsError::MissingAttribute(_))));
  assert_eq!(resampler.calls.get(), 0);
}

#[test]
fn test_smooth_counts_transferred_sentinels() {
  let mut source = PointCloud::from_positions(vec![Vec3::ZERO, Vec3::X * 4.0]);
  source.insert_attribute("a", vec![SENTINEL_COLOR, [2.0, 2.0, 2.0, 1.0]]).unwrap();
  let resampler = FixedResampler::new(vec![Vec3::ZERO, Vec3::X * 0.5, Vec3::X * 3.9]);

  let output = smooth(&source, "a", &resampler, TransferMode::Nearest).unwrap();
  assert_eq!(output.report.sentinel_points, 2);
}

#[test]
fn test_smooth_with_surface_nets() {
  let mask = ArrayVolume::filled([3, 3, 3], 1.0);
  let values = ArrayVolume::filled([3, 3, 3], 0.5);
  let generated = generate(&mask, &values, "lac_ves").unwrap();

  let resampler = SurfaceNetsResampler::new(ResampleConfig::default().with_voxel_amount(16));
  let output = smooth(&generated.cloud, "lac_ves", &resampler, TransferMode::Nearest).unwrap();

  assert!(output.report.mesh_triangles > 0);
  let values = output.mesh.points.attribute("lac_ves").unwrap();
  assert_eq!(values.len(), output.mesh.points.len());
  assert!(values.iter().all(|v| *v == [0.5, 0.5, 0.5, 1.0]));
}

#[test]
fn test_smooth_empty_source() {
  let mut source = PointCloud::new();
  source.insert_attribute("a", Vec::new()).unwrap();
  let resampler = SurfaceNetsResampler::new(ResampleConfig::default());

  let output = smooth(&source, "a", &resampler, TransferMode::Nearest).unwrap();
  assert!(output.mesh.is_empty());
  assert_eq!(output.mesh.points.attribute("a"), Some(&[][..]));
}

#[test]
fn test_report_total() {
  let report = PipelineReport {
    load_us: 1,
    extract_us: 2,
    sample_us: 3,
    resample_us: 4,
    transfer_us: 5,
    ..Default::default()
  };
  assert_eq!(report.total_us(), 15);
}
