//! SpatialIndex - balanced k-d tree over 3D positions.
//!
//! The tree is implicit: positions are permuted so that every subrange
//! `[lo, hi)` stores its splitting point at the median slot
//! `lo + (hi - lo) / 2`, with the left half below and the right half above
//! on that slot's split axis.
//!
//! ```text
//! slots:   [ left subtree | node | right subtree ]
//!            lo            mid    mid+1         hi
//!
//! split axis: widest extent of the subrange (x, y or z)
//! ```
//!
//! Construction is O(n log n) (median selection per level). The index is
//! read-only once built and can be shared across threads for concurrent
//! queries.
//!
//! # Tie Breaking
//!
//! When several stored points are at exactly the same distance from a query,
//! the one with the smallest original index wins. The search therefore also
//! descends into a far subtree whose splitting plane is at exactly the best
//! distance.

mod candidate;

use std::collections::BinaryHeap;

use glam::Vec3;

use crate::error::{Result, VoxelToolsError};
use crate::point_cloud::PointCloud;
use candidate::Candidate;

/// Nearest-neighbor search structure built once over a point snapshot.
#[derive(Clone, Debug, Default)]
pub struct SpatialIndex {
  /// Positions permuted into tree order.
  points: Vec<Vec3>,
  /// Original point index of each tree slot.
  indices: Vec<usize>,
  /// Split axis (0 = X, 1 = Y, 2 = Z) of each tree slot.
  axes: Vec<u8>,
}

impl SpatialIndex {
  /// Build an index over a point cloud's positions.
  pub fn build(cloud: &PointCloud) -> Self {
    Self::from_positions(cloud.positions())
  }

  /// Build an index over raw positions; stored indices are slice indices.
  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "kdtree::build"))]
  pub fn from_positions(positions: &[Vec3]) -> Self {
    let mut slots: Vec<usize> = (0..positions.len()).collect();
    let mut axes = vec![0u8; positions.len()];
    build_subtree(positions, &mut slots, &mut axes);

    Self {
      points: slots.iter().map(|&i| positions[i]).collect(),
      indices: slots,
      axes,
    }
  }

  /// Number of stored points.
  #[inline]
  pub fn len(&self) -> usize {
    self.points.len()
  }

  /// Returns true if the index holds no points.
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.points.is_empty()
  }

  /// Closest stored point to `query` as `(original index, distance)`.
  ///
  /// # Errors
  /// [`VoxelToolsError::EmptyIndex`] if the index holds no points.
  pub fn nearest(&self, query: Vec3) -> Result<(usize, f32)> {
    if self.is_empty() {
      return Err(VoxelToolsError::EmptyIndex);
    }

    let mut best = Candidate::NONE;
    self.search_nearest(0, self.len(), query, &mut best);
    Ok((best.index, best.dist_sq.sqrt()))
  }

  /// Up to `k` closest stored points, sorted by distance then index.
  ///
  /// # Errors
  /// [`VoxelToolsError::EmptyIndex`] if the index holds no points.
  pub fn nearest_k(&self, query: Vec3, k: usize) -> Result<Vec<(usize, f32)>> {
    if self.is_empty() {
      return Err(VoxelToolsError::EmptyIndex);
    }
    if k == 0 {
      return Ok(Vec::new());
    }

    let mut heap = BinaryHeap::with_capacity(k + 1);
    self.search_k(0, self.len(), query, k, &mut heap);

    Ok(
      heap
        .into_sorted_vec()
        .into_iter()
        .map(|c| (c.index, c.dist_sq.sqrt()))
        .collect(),
    )
  }

  fn search_nearest(&self, lo: usize, hi: usize, query: Vec3, best: &mut Candidate) {
    if lo >= hi {
      return;
    }
    let mid = lo + (hi - lo) / 2;
    let point = self.points[mid];
    best.offer(Candidate::new(point.distance_squared(query), self.indices[mid]));

    let axis = self.axes[mid] as usize;
    let diff = query[axis] - point[axis];
    let (near, far) = split_children(lo, mid, hi, diff);

    self.search_nearest(near.0, near.1, query, best);
    // `<=` so an equally distant point with a smaller index is still found.
    if diff * diff <= best.dist_sq {
      self.search_nearest(far.0, far.1, query, best);
    }
  }

  fn search_k(
    &self,
    lo: usize,
    hi: usize,
    query: Vec3,
    k: usize,
    heap: &mut BinaryHeap<Candidate>,
  ) {
    if lo >= hi {
      return;
    }
    let mid = lo + (hi - lo) / 2;
    let point = self.points[mid];
    let candidate = Candidate::new(point.distance_squared(query), self.indices[mid]);

    if heap.len() < k {
      heap.push(candidate);
    } else if heap.peek().is_some_and(|worst| candidate < *worst) {
      heap.pop();
      heap.push(candidate);
    }

    let axis = self.axes[mid] as usize;
    let diff = query[axis] - point[axis];
    let (near, far) = split_children(lo, mid, hi, diff);

    self.search_k(near.0, near.1, query, k, heap);
    let visit_far = heap.len() < k || heap.peek().is_some_and(|worst| diff * diff <= worst.dist_sq);
    if visit_far {
      self.search_k(far.0, far.1, query, k, heap);
    }
  }
}

/// Near and far child ranges for a query on the `diff` side of the plane.
#[inline]
fn split_children(
  lo: usize,
  mid: usize,
  hi: usize,
  diff: f32,
) -> ((usize, usize), (usize, usize)) {
  if diff < 0.0 {
    ((lo, mid), (mid + 1, hi))
  } else {
    ((mid + 1, hi), (lo, mid))
  }
}

/// Partition `slots` into an implicit balanced subtree.
fn build_subtree(positions: &[Vec3], slots: &mut [usize], axes: &mut [u8]) {
  if slots.len() <= 1 {
    return;
  }

  let axis = widest_axis(positions, slots);
  let mid = slots.len() / 2;
  slots.select_nth_unstable_by(mid, |&a, &b| {
    positions[a][axis]
      .total_cmp(&positions[b][axis])
      .then(a.cmp(&b))
  });
  axes[mid] = axis as u8;

  let (left_slots, rest_slots) = slots.split_at_mut(mid);
  let (left_axes, rest_axes) = axes.split_at_mut(mid);
  build_subtree(positions, left_slots, left_axes);
  build_subtree(positions, &mut rest_slots[1..], &mut rest_axes[1..]);
}

/// Axis with the largest extent over the given points.
fn widest_axis(positions: &[Vec3], slots: &[usize]) -> usize {
  let mut min = Vec3::splat(f32::INFINITY);
  let mut max = Vec3::splat(f32::NEG_INFINITY);
  for &i in slots {
    min = min.min(positions[i]);
    max = max.max(positions[i]);
  }
  let extent = max - min;
  if extent.x >= extent.y && extent.x >= extent.z {
    0
  } else if extent.y >= extent.z {
    1
  } else {
    2
  }
}
