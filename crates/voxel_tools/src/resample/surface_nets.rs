//! Naive Surface Nets over a sampled distance field.
//!
//! One vertex per cell whose corners straddle the zero level set, placed at
//! the centroid of the edge crossings. Quads are emitted across every
//! sign-changing lattice edge that starts at a cell's corner 0 and split along
//! their shorter diagonal.
//!
//! The field is sampled one X slab at a time, so memory stays proportional to
//! a single Y-Z slab regardless of grid depth:
//!
//! ```text
//!   slab x      slab x+1        vertex indices
//!  ┌───────┐   ┌───────┐       ┌─────────────┐
//!  │samples│ + │samples│  ──►  │ cells x-1   │ (previous)
//!  └───────┘   └───────┘       │ cells x     │ (current)
//!                              └─────────────┘
//! ```
//!
//! Cell corner indices (binary: ZYX), matching `CORNER_STEPS`:
//!
//! ```text
//!   0 = (0,0,0)    4 = (0,0,1)
//!   1 = (1,0,0)    5 = (1,0,1)
//!   2 = (0,1,0)    6 = (0,1,1)
//!   3 = (1,1,0)    7 = (1,1,1)
//! ```

use glam::Vec3;
use rayon::prelude::*;

use super::SampleGrid;
use crate::constants::{grid_coord, grid_index, CORNER_STEPS};

/// Marks a cell without a vertex.
const NO_VERTEX: u32 = u32::MAX;

/// Edge definitions: pairs of corner indices.
pub(super) const CUBE_EDGES: [[usize; 2]; 12] = [
  [0, 1], // X axis at Y=0, Z=0
  [0, 2], // Y axis at X=0, Z=0
  [0, 4], // Z axis at X=0, Y=0
  [1, 3], // Y axis at X=1, Z=0
  [1, 5], // Z axis at X=1, Y=0
  [2, 3], // X axis at Y=1, Z=0
  [2, 6], // Z axis at X=0, Y=1
  [3, 7], // Z axis at X=1, Y=1
  [4, 5], // X axis at Y=0, Z=1
  [4, 6], // Y axis at X=0, Z=1
  [5, 7], // Y axis at X=1, Z=1
  [6, 7], // X axis at Y=1, Z=1
];

/// Mesh the zero level set of `sdf` sampled on `grid`.
///
/// Returns world-space vertex positions and a triangle index list.
pub(super) fn mesh_field<F>(grid: &SampleGrid, sdf: F) -> (Vec<Vec3>, Vec<u32>)
where
  F: Fn(Vec3) -> f32 + Sync,
{
  let [nx, ny, nz] = grid.samples;
  let slab_dims = [1, ny, nz];
  let slab_len = ny * nz;

  let mut positions = Vec::new();
  let mut indices = Vec::new();
  if nx < 2 || ny < 2 || nz < 2 {
    return (positions, indices);
  }

  let mut lower = sample_slab(grid, 0, &sdf);
  let mut previous = vec![NO_VERTEX; slab_len];
  let mut current = vec![NO_VERTEX; slab_len];

  for x in 0..(nx - 1) {
    let upper = sample_slab(grid, x + 1, &sdf);
    current.fill(NO_VERTEX);

    for y in 0..(ny - 1) {
      for z in 0..(nz - 1) {
        let samples: [f32; 8] = std::array::from_fn(|i| {
          let [dx, dy, dz] = CORNER_STEPS[i];
          let slab = if dx == 0 { &lower } else { &upper };
          slab[grid_index(0, y + dy, z + dz, slab_dims)]
        });

        let corner_mask = corner_mask(&samples);
        // Homogeneous cell (all inside or all outside).
        if corner_mask == 0 || corner_mask == 255 {
          continue;
        }

        let local = compute_position(&samples);
        let position = grid.position(x, y, z) + local * grid.voxel_size;
        debug_assert!(positions.len() < NO_VERTEX as usize);
        current[grid_index(0, y, z, slab_dims)] = positions.len() as u32;
        positions.push(position);

        let cells = CellVertices {
          previous: &previous,
          current: &current,
          x,
          slab_dims,
        };
        emit_quads([x, y, z], corner_mask, &cells, &positions, &mut indices);
      }
    }

    lower = upper;
    std::mem::swap(&mut previous, &mut current);
  }

  (positions, indices)
}

/// Sample the field over the Y-Z slab at `x`, in parallel.
fn sample_slab<F>(grid: &SampleGrid, x: usize, sdf: &F) -> Vec<f32>
where
  F: Fn(Vec3) -> f32 + Sync,
{
  let [_, ny, nz] = grid.samples;
  (0..ny * nz)
    .into_par_iter()
    .map(|i| {
      let (_, y, z) = grid_coord(i, [1, ny, nz]);
      sdf(grid.position(x, y, z))
    })
    .collect()
}

/// 8-bit mask with bit `i` set when corner `i` is inside (negative).
#[inline]
pub(super) fn corner_mask(samples: &[f32; 8]) -> u8 {
  samples
    .iter()
    .enumerate()
    .fold(0u8, |mask, (i, &s)| if s < 0.0 { mask | (1 << i) } else { mask })
}

/// Cell-local vertex position: centroid of edge crossing points.
#[inline]
pub(super) fn compute_position(samples: &[f32; 8]) -> Vec3 {
  let mut sum = Vec3::ZERO;
  let mut count = 0u32;

  for &[c0, c1] in &CUBE_EDGES {
    let s0 = samples[c0];
    let s1 = samples[c1];
    if (s0 < 0.0) != (s1 < 0.0) {
      let t = s0 / (s0 - s1);
      let p0 = corner_position(c0);
      let p1 = corner_position(c1);
      sum += p0 + t * (p1 - p0);
      count += 1;
    }
  }

  if count == 0 {
    return Vec3::splat(0.5);
  }
  sum / count as f32
}

#[inline]
fn corner_position(corner: usize) -> Vec3 {
  let [x, y, z] = CORNER_STEPS[corner];
  Vec3::new(x as f32, y as f32, z as f32)
}

/// Vertex index lookup over the two live cell slabs.
struct CellVertices<'a> {
  previous: &'a [u32],
  current: &'a [u32],
  x: usize,
  slab_dims: [usize; 3],
}

impl CellVertices<'_> {
  #[inline]
  fn get(&self, [x, y, z]: [usize; 3]) -> u32 {
    let slab = if x == self.x { self.current } else { self.previous };
    slab[grid_index(0, y, z, self.slab_dims)]
  }
}

/// Emit two triangles for each sign-changing edge leaving corner 0.
fn emit_quads(
  pos: [usize; 3],
  corner_mask: u8,
  cells: &CellVertices<'_>,
  positions: &[Vec3],
  indices: &mut Vec<u32>,
) {
  // Flip winding if corner 0 is outside.
  let flip = (corner_mask & 1) == 0;

  for axis in 0..3 {
    let inside_0 = corner_mask & 1 != 0;
    let inside_1 = corner_mask & (1 << (1 << axis)) != 0;
    if inside_0 == inside_1 {
      continue;
    }

    let u = (axis + 1) % 3;
    let v = (axis + 2) % 3;
    // The quad needs the cells behind this one on both u and v.
    if pos[u] == 0 || pos[v] == 0 {
      continue;
    }

    let mut pos_b = pos;
    pos_b[u] -= 1;
    pos_b[v] -= 1;
    let mut pos_c = pos;
    pos_c[u] -= 1;
    let mut pos_d = pos;
    pos_d[v] -= 1;

    let v_a = cells.get(pos);
    let v_b = cells.get(pos_b);
    let v_c = cells.get(pos_c);
    let v_d = cells.get(pos_d);
    if [v_a, v_b, v_c, v_d].contains(&NO_VERTEX) {
      continue;
    }

    let p = |i: u32| positions[i as usize];
    let diag_ab = p(v_a).distance_squared(p(v_b));
    let diag_cd = p(v_c).distance_squared(p(v_d));

    let quad = match (diag_ab < diag_cd, flip) {
      (true, true) => [v_a, v_d, v_b, v_a, v_b, v_c],
      (true, false) => [v_a, v_b, v_d, v_a, v_c, v_b],
      (false, true) => [v_c, v_d, v_b, v_c, v_a, v_d],
      (false, false) => [v_c, v_b, v_d, v_c, v_d, v_a],
    };
    indices.extend_from_slice(&quad);
  }
}

#[cfg(test)]
#[path = "surface_nets_test.rs"]
mod surface_nets_test;
