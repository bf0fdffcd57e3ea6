use glam::Vec3;

use super::*;

fn to_string(cloud: &PointCloud, indices: &[u32]) -> String {
  let mut buf = Vec::new();
  write_ply(&mut buf, cloud, indices).unwrap();
  String::from_utf8(buf).unwrap()
}

#[test]
fn test_point_cloud_header_and_rows() {
  let mut cloud = PointCloud::from_positions(vec![Vec3::ZERO, Vec3::new(1.0, 2.5, -3.0)]);
  cloud
    .insert_attribute("lac_ves", vec![[5.0, 5.0, 5.0, 1.0], [0.0; 4]])
    .unwrap();

  let text = to_string(&cloud, &[]);
  let lines: Vec<&str> = text.lines().collect();

  assert_eq!(lines[0], "ply");
  assert_eq!(lines[1], "format ascii 1.0");
  assert!(lines.contains(&"element vertex 2"));
  assert!(lines.contains(&"property float lac_ves_r"));
  assert!(lines.contains(&"property float lac_ves_a"));
  assert!(!text.contains("element face"));

  let header_end = lines.iter().position(|l| *l == "end_header").unwrap();
  assert_eq!(lines[header_end + 1], "0 0 0 5 5 5 1");
  assert_eq!(lines[header_end + 2], "1 2.5 -3 0 0 0 0");
  assert_eq!(lines.len(), header_end + 3);
}

#[test]
fn test_mesh_faces() {
  let cloud = PointCloud::from_positions(vec![Vec3::ZERO, Vec3::X, Vec3::Y]);
  let text = to_string(&cloud, &[0, 1, 2]);

  assert!(text.contains("element face 1\nproperty list uchar uint vertex_indices\n"));
  assert!(text.ends_with("3 0 1 2\n"));
}

#[test]
fn test_attributes_in_sorted_order() {
  let mut cloud = PointCloud::from_positions(vec![Vec3::ZERO]);
  cloud.insert_attribute("zeta", vec![[2.0; 4]]).unwrap();
  cloud.insert_attribute("alpha", vec![[1.0; 4]]).unwrap();

  let text = to_string(&cloud, &[]);
  let alpha = text.find("alpha_r").unwrap();
  let zeta = text.find("zeta_r").unwrap();
  assert!(alpha < zeta);
  assert!(text.ends_with("0 0 0 1 1 1 1 2 2 2 2\n"));
}

#[test]
fn test_whitespace_in_attribute_name() {
  let mut cloud = PointCloud::from_positions(vec![Vec3::ZERO]);
  cloud.insert_attribute("lac ves", vec![[1.0; 4]]).unwrap();

  let text = to_string(&cloud, &[]);
  assert!(text.contains("property float lac_ves_r\n"));
  let header_end = text.find("end_header").unwrap();
  for line in text[..header_end].lines().filter(|l| l.starts_with("property float")) {
    assert_eq!(line.split_whitespace().count(), 3, "bad property line: {line:?}");
  }
}

#[test]
fn test_sanitized_names_stay_unique() {
  let mut cloud = PointCloud::from_positions(vec![Vec3::ZERO]);
  cloud.insert_attribute("a b", vec![[1.0; 4]]).unwrap();
  cloud.insert_attribute("a_b", vec![[2.0; 4]]).unwrap();
  cloud.insert_attribute("a\tb", vec![[3.0; 4]]).unwrap();

  let text = to_string(&cloud, &[]);
  let r_names: std::collections::HashSet<&str> = text
    .lines()
    .filter(|l| l.starts_with("property float") && l.ends_with("_r"))
    .collect();
  assert_eq!(r_names.len(), 3);
  assert!(r_names.contains("property float a_b_r"));
  assert!(r_names.contains("property float a_b_2_r"));
  assert!(r_names.contains("property float a_b_3_r"));
}

#[test]
fn test_non_finite_values_written_as_c_tokens() {
  let mut cloud = PointCloud::from_positions(vec![Vec3::new(f32::NAN, f32::INFINITY, f32::NEG_INFINITY)]);
  cloud
    .insert_attribute("lac_ves", vec![[f32::NAN, 0.5, f32::INFINITY, 1.0]])
    .unwrap();

  let text = to_string(&cloud, &[]);
  assert!(text.ends_with("end_header\nnan inf -inf nan 0.5 inf 1\n"));
}

#[test]
fn test_write_files() {
  let dir = std::env::temp_dir().join(format!("voxel_tools_export_{}", std::process::id()));
  std::fs::create_dir_all(&dir).unwrap();

  let mesh = Mesh {
    points: PointCloud::from_positions(vec![Vec3::ZERO, Vec3::X, Vec3::Y]),
    indices: vec![0, 1, 2],
  };
  let mesh_path = dir.join("mesh.ply");
  write_mesh(&mesh_path, &mesh).unwrap();
  let cloud_path = dir.join("cloud.ply");
  write_point_cloud(&cloud_path, &mesh.points).unwrap();

  let mesh_text = std::fs::read_to_string(&mesh_path).unwrap();
  assert!(mesh_text.contains("element face 1"));
  let cloud_text = std::fs::read_to_string(&cloud_path).unwrap();
  assert!(cloud_text.contains("element vertex 3"));

  std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_unwritable_path() {
  let path = std::env::temp_dir()
    .join("voxel_tools_missing_dir_for_export")
    .join("nested")
    .join("cloud.ply");
  let err = write_point_cloud(&path, &PointCloud::new()).unwrap_err();
  assert!(matches!(err, VoxelToolsError::Io { .. }));
}
