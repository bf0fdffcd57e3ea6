use glam::Vec3;

use super::*;

// GridCoord tests
#[test]
fn test_grid_coord_to_position_has_no_offset() {
  let coord = GridCoord::new(3, 0, 7);
  assert_eq!(coord.to_position(), Vec3::new(3.0, 0.0, 7.0));
}

#[test]
fn test_grid_coord_within_bounds() {
  let dims = [2, 3, 4];
  assert!(GridCoord::new(0, 0, 0).is_within(dims));
  assert!(GridCoord::new(1, 2, 3).is_within(dims));
  assert!(!GridCoord::new(2, 0, 0).is_within(dims));
  assert!(!GridCoord::new(0, 3, 0).is_within(dims));
  assert!(!GridCoord::new(0, 0, 4).is_within(dims));
}

#[test]
fn test_grid_coord_orders_x_major() {
  let mut coords = vec![
    GridCoord::new(1, 0, 0),
    GridCoord::new(0, 1, 0),
    GridCoord::new(0, 0, 1),
  ];
  coords.sort();
  assert_eq!(
    coords,
    vec![
      GridCoord::new(0, 0, 1),
      GridCoord::new(0, 1, 0),
      GridCoord::new(1, 0, 0),
    ]
  );
}

// MinMaxAABB tests
#[test]
fn test_empty_aabb_is_invalid() {
  assert!(!MinMaxAABB::empty().is_valid());
}

#[test]
fn test_encapsulate_grows_bounds() {
  let bounds: MinMaxAABB = [Vec3::new(-1.0, 2.0, 0.0), Vec3::new(3.0, -2.0, 5.0)]
    .into_iter()
    .collect();
  assert!(bounds.is_valid());
  assert_eq!(bounds.min, Vec3::new(-1.0, -2.0, 0.0));
  assert_eq!(bounds.max, Vec3::new(3.0, 2.0, 5.0));
  assert_eq!(bounds.size(), Vec3::new(4.0, 4.0, 5.0));
  assert_eq!(bounds.center(), Vec3::new(1.0, 0.0, 2.5));
}

#[test]
fn test_single_point_aabb_is_valid() {
  let bounds: MinMaxAABB = std::iter::once(Vec3::ONE).collect();
  assert!(bounds.is_valid());
  assert_eq!(bounds.size(), Vec3::ZERO);
}

#[test]
fn test_expanded() {
  let bounds = MinMaxAABB::new(Vec3::ZERO, Vec3::ONE).expanded(0.5);
  assert_eq!(bounds.min, Vec3::splat(-0.5));
  assert_eq!(bounds.max, Vec3::splat(1.5));
}
