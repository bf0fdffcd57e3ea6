use glam::Vec3;

use super::*;

fn resampler(voxel_amount: u32, radius: f32) -> SurfaceNetsResampler {
  SurfaceNetsResampler::new(
    ResampleConfig::default()
      .with_voxel_amount(voxel_amount)
      .with_radius(radius),
  )
}

#[test]
fn test_default_config() {
  let config = ResampleConfig::default();
  assert_eq!(config.voxel_amount, 512);
  assert_eq!(config.radius, 1.0);
  assert!(config.validate().is_ok());
}

#[test]
fn test_invalid_config() {
  let cloud = PointCloud::from_positions(vec![Vec3::ZERO]);

  for (config, name) in [
    (ResampleConfig::default().with_voxel_amount(0), "voxel_amount"),
    (ResampleConfig::default().with_radius(0.0), "radius"),
    (ResampleConfig::default().with_radius(-1.0), "radius"),
    (ResampleConfig::default().with_radius(f32::NAN), "radius"),
    (ResampleConfig::default().with_radius(f32::INFINITY), "radius"),
  ] {
    let err = SurfaceNetsResampler::new(config).resample(&cloud).unwrap_err();
    assert!(
      matches!(err, VoxelToolsError::InvalidParameter { name: n, .. } if n == name),
      "{config:?}: {err}"
    );
  }
}

#[test]
fn test_values_outside_ui_range_are_accepted() {
  let config = ResampleConfig::default().with_voxel_amount(8).with_radius(0.05);
  assert!(config.validate().is_ok());
}

#[test]
fn test_empty_cloud_gives_empty_mesh() {
  let mesh = resampler(16, 1.0).resample(&PointCloud::new()).unwrap();
  assert!(mesh.is_empty());
  assert_eq!(mesh.triangle_count(), 0);
}

#[test]
fn test_grid_covers_padded_bounds() {
  let bounds = MinMaxAABB::new(Vec3::ZERO, Vec3::new(4.0, 2.0, 0.0));
  let config = ResampleConfig::default().with_voxel_amount(12).with_radius(1.0);
  let grid = SampleGrid::covering(bounds, &config).unwrap();

  // Longest padded side is 6 units over 12 voxels.
  assert_eq!(grid.voxel_size, 0.5);
  assert_eq!(grid.origin, Vec3::splat(-1.5));
  assert_eq!(grid.samples, [15, 11, 7]);

  let far = grid.position(grid.samples[0] - 1, grid.samples[1] - 1, grid.samples[2] - 1);
  assert!(far.cmpge(Vec3::new(5.0, 3.0, 1.0)).all(), "{far:?}");
}

#[test]
fn test_non_finite_bounds_rejected() {
  let bounds = MinMaxAABB::new(Vec3::ZERO, Vec3::new(f32::INFINITY, 0.0, 0.0));
  assert!(matches!(
    SampleGrid::covering(bounds, &ResampleConfig::default()),
    Err(VoxelToolsError::InvalidParameter { name: "positions", .. })
  ));
}

#[test]
fn test_grid_limited_to_u32_vertex_indices() {
  let cube = MinMaxAABB::new(Vec3::ZERO, Vec3::splat(10.0));
  let config = ResampleConfig::default().with_voxel_amount(2048);
  assert!(matches!(
    SampleGrid::covering(cube, &config),
    Err(VoxelToolsError::InvalidParameter { name: "voxel_amount", .. })
  ));
  assert!(matches!(
    SampleGrid::covering(cube, &ResampleConfig::default().with_voxel_amount(u32::MAX)),
    Err(VoxelToolsError::InvalidParameter { name: "voxel_amount", .. })
  ));

  // Same amount on a flat slab stays below the limit.
  let slab = MinMaxAABB::new(Vec3::ZERO, Vec3::new(10.0, 10.0, 0.0));
  let grid = SampleGrid::covering(slab, &config).unwrap();
  assert!(grid.samples.iter().product::<usize>() < u32::MAX as usize);

  let cloud = PointCloud::from_positions(vec![Vec3::ZERO, Vec3::splat(10.0)]);
  assert!(matches!(
    resampler(2048, 1.0).resample(&cloud),
    Err(VoxelToolsError::InvalidParameter { name: "voxel_amount", .. })
  ));
}

#[test]
fn test_single_point_becomes_sphere() {
  let center = Vec3::new(3.0, -2.0, 5.0);
  let cloud = PointCloud::from_positions(vec![center]);
  let radius = 1.0;
  let mesh = resampler(32, radius).resample(&cloud).unwrap();

  assert!(!mesh.is_empty());
  assert!(mesh.triangle_count() > 0);
  assert!(mesh.triangles().all(|t| t.iter().all(|&i| (i as usize) < mesh.points.len())));

  // Voxel size is 2 / 32; vertices stay within a cell diagonal of the sphere.
  let tolerance = (2.0 / 32.0) * 3f32.sqrt();
  for p in mesh.points.positions() {
    let error = (p.distance(center) - radius).abs();
    assert!(error <= tolerance, "vertex {p:?} off by {error}");
  }
}

#[test]
fn test_two_distant_points_give_two_surfaces() {
  let cloud = PointCloud::from_positions(vec![Vec3::ZERO, Vec3::new(20.0, 0.0, 0.0)]);
  let mesh = resampler(64, 1.0).resample(&cloud).unwrap();

  let near_first = mesh.points.positions().iter().filter(|p| p.x < 10.0).count();
  let near_second = mesh.points.len() - near_first;
  assert!(near_first > 0);
  assert!(near_second > 0);
}

#[test]
fn test_resampled_vertices_carry_no_attributes() {
  let mut cloud = PointCloud::from_positions(vec![Vec3::ZERO, Vec3::X]);
  cloud.insert_attribute("lac_ves", vec![[1.0; 4]; 2]).unwrap();
  let mesh = resampler(16, 1.0).resample(&cloud).unwrap();
  assert_eq!(mesh.points.attribute_names().count(), 0);
}

#[test]
fn test_resample_is_deterministic() {
  let cloud = PointCloud::from_positions(
    (0..40)
      .map(|i| Vec3::new((i % 4) as f32, (i / 4 % 5) as f32, (i / 20) as f32))
      .collect(),
  );
  let r = resampler(24, 0.8);
  assert_eq!(r.resample(&cloud).unwrap(), r.resample(&cloud).unwrap());
}
