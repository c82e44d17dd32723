//! OctreeConfig - shape of the value octree and multiplayer tracking.

use glam::IVec3;

use super::bounds::NodeBounds;
use crate::constants::{node_size, MAX_DEPTH};
use crate::error::OctreeError;

/// Configuration for a value octree root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OctreeConfig {
  /// Depth of the root node. Depth 0 is a single 16³ leaf.
  pub depth: u8,

  /// Integer center of the root node.
  pub center: IVec3,

  /// Track per-cell edits for network diffs.
  pub multiplayer: bool,
}

impl OctreeConfig {
  pub fn new(depth: u8) -> Self {
    Self {
      depth,
      ..Self::default()
    }
  }

  pub fn with_center(mut self, center: IVec3) -> Self {
    self.center = center;
    self
  }

  pub fn with_multiplayer(mut self, multiplayer: bool) -> Self {
    self.multiplayer = multiplayer;
    self
  }

  /// Edge length of the root in voxels.
  /// size = 16 * 2^depth
  #[inline]
  pub fn size(&self) -> i32 {
    node_size(self.depth)
  }

  /// Number of leaves along one axis (2^depth).
  #[inline]
  pub fn leaf_count_per_axis(&self) -> i32 {
    1 << self.depth
  }

  /// Half-open bounds of the root.
  #[inline]
  pub fn bounds(&self) -> NodeBounds {
    NodeBounds::from_center_size(self.center, self.size())
  }

  /// Check that the tree can be addressed with 64-bit ids and that its
  /// bounds fit in `i32` coordinates.
  pub fn validate(&self) -> Result<(), OctreeError> {
    if self.depth > MAX_DEPTH {
      return Err(OctreeError::DepthTooLarge { depth: self.depth });
    }
    let half = i64::from(self.size() / 2);
    let fits = self.center.to_array().iter().all(|&c| {
      let c = i64::from(c);
      c - half >= i64::from(i32::MIN) && c + half <= i64::from(i32::MAX)
    });
    if !fits {
      return Err(OctreeError::CenterOutOfRange {
        center: self.center,
        size: self.size(),
      });
    }
    Ok(())
  }
}

impl Default for OctreeConfig {
  fn default() -> Self {
    Self {
      depth: 4,
      center: IVec3::ZERO,
      multiplayer: false,
    }
  }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
