//! Search candidate ordered by (squared distance, original index).

use std::cmp::Ordering;

/// A stored point considered during a query.
#[derive(Clone, Copy, Debug)]
pub(super) struct Candidate {
  pub dist_sq: f32,
  pub index: usize,
}

impl Candidate {
  /// Placeholder that loses to any real candidate.
  pub const NONE: Candidate = Candidate {
    dist_sq: f32::INFINITY,
    index: usize::MAX,
  };

  #[inline]
  pub fn new(dist_sq: f32, index: usize) -> Self {
    Self { dist_sq, index }
  }

  /// Replace `self` with `other` if `other` is closer, or equally close with a
  /// smaller index. The placeholder is always replaced, even by a NaN distance.
  #[inline]
  pub fn offer(&mut self, other: Candidate) {
    if self.index == usize::MAX || other < *self {
      *self = other;
    }
  }
}

impl PartialEq for Candidate {
  fn eq(&self, other: &Self) -> bool {
    self.cmp(other) == Ordering::Equal
  }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl Ord for Candidate {
  fn cmp(&self, other: &Self) -> Ordering {
    self
      .dist_sq
      .total_cmp(&other.dist_sq)
      .then(self.index.cmp(&other.index))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_closer_wins() {
    let mut best = Candidate::NONE;
    best.offer(Candidate::new(4.0, 7));
    best.offer(Candidate::new(1.0, 9));
    assert_eq!(best.index, 9);
  }

  #[test]
  fn test_tie_goes_to_smaller_index() {
    let mut best = Candidate::new(2.0, 5);
    best.offer(Candidate::new(2.0, 8));
    assert_eq!(best.index, 5);
    best.offer(Candidate::new(2.0, 3));
    assert_eq!(best.index, 3);
  }

  #[test]
  fn test_placeholder_always_replaced() {
    let mut best = Candidate::NONE;
    best.offer(Candidate::new(f32::NAN, 0));
    assert_eq!(best.index, 0);
  }

  #[test]
  fn test_ordering() {
    assert!(Candidate::new(1.0, 10) < Candidate::new(2.0, 0));
    assert!(Candidate::new(1.0, 0) < Candidate::new(1.0, 1));
  }
}
