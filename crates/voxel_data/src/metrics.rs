//! Octree statistics for debug overlays and memory budgeting.
//!
//! # Usage
//!
//! ```ignore
//! let stats = world.stats();
//! println!("{} dirty leaves, {:.2} MB of grids", stats.dirty_leaves, stats.leaf_grid_mb());
//! ```

use std::mem::size_of;

use crate::constants::MAX_DEPTH;
use crate::octree::{LeafData, ValueNode};

const DEPTH_SLOTS: usize = MAX_DEPTH as usize + 1;

/// Snapshot of the tree shape and pending sync work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OctreeStats {
  /// Every node, interior and leaf.
  pub nodes: usize,
  /// Nodes with children.
  pub interior_nodes: usize,
  /// Nodes without children, pure or dirty.
  pub leaves: usize,
  /// Leaves holding a grid.
  pub dirty_leaves: usize,
  /// Leaves with edits not yet drained as diffs.
  pub network_dirty_leaves: usize,
  /// Recorded dirty indices across all leaves.
  pub pending_diffs: usize,
  /// Approximate heap held by leaf grids.
  pub leaf_grid_bytes: usize,
  /// Count of leaves at each depth (index = depth).
  pub leaves_per_depth: [usize; DEPTH_SLOTS],
}

impl Default for OctreeStats {
  fn default() -> Self {
    Self {
      nodes: 0,
      interior_nodes: 0,
      leaves: 0,
      dirty_leaves: 0,
      network_dirty_leaves: 0,
      pending_diffs: 0,
      leaf_grid_bytes: 0,
      leaves_per_depth: [0; DEPTH_SLOTS],
    }
  }
}

impl OctreeStats {
  /// Walk the subtree rooted at `root`.
  pub fn collect(root: &ValueNode) -> Self {
    let mut stats = Self::default();
    stats.visit(root);
    stats
  }

  fn visit(&mut self, node: &ValueNode) {
    self.nodes += 1;
    if let Some(children) = node.children() {
      self.interior_nodes += 1;
      for child in children.iter() {
        self.visit(child);
      }
      return;
    }

    self.leaves += 1;
    self.leaves_per_depth[node.depth() as usize] += 1;
    if node.is_network_dirty() {
      self.network_dirty_leaves += 1;
    }
    if let Some(leaf) = node.leaf_data() {
      self.dirty_leaves += 1;
      self.pending_diffs += leaf.pending_diff_count();
      self.leaf_grid_bytes += size_of::<LeafData>()
        + leaf.dirty_values().map_or(0, |d| d.len() * size_of::<u16>())
        + leaf.dirty_materials().map_or(0, |d| d.len() * size_of::<u16>());
    }
  }

  /// Leaves still served by the generator.
  pub fn pure_leaves(&self) -> usize {
    self.leaves - self.dirty_leaves
  }

  /// Leaf grid memory in megabytes.
  pub fn leaf_grid_mb(&self) -> f64 {
    self.leaf_grid_bytes as f64 / 1_048_576.0
  }
}

#[cfg(test)]
mod tests {
  use glam::IVec3;

  use super::*;
  use crate::octree::OctreeConfig;
  use crate::test_utils::{set_point, CoordGenerator};

  #[test]
  fn test_pure_root() {
    let root = ValueNode::root(&OctreeConfig::new(3));
    let stats = OctreeStats::collect(&root);

    assert_eq!(stats.nodes, 1);
    assert_eq!(stats.leaves, 1);
    assert_eq!(stats.leaves_per_depth[3], 1);
    assert_eq!(stats.pure_leaves(), 1);
    assert_eq!(stats.leaf_grid_bytes, 0);
  }

  /// One edit in a depth-2 tree opens two levels: 1 + 8 + 8 nodes.
  #[test]
  fn test_single_edit_shape() {
    let mut root = ValueNode::root(&OctreeConfig::new(2));
    set_point(&mut root, &CoordGenerator, IVec3::ZERO, Some(1.0), None);
    let stats = OctreeStats::collect(&root);

    assert_eq!(stats.nodes, 17);
    assert_eq!(stats.interior_nodes, 2);
    assert_eq!(stats.leaves, 15);
    assert_eq!(stats.leaves_per_depth[1], 7);
    assert_eq!(stats.leaves_per_depth[0], 8);
    assert_eq!(stats.dirty_leaves, 1);
    assert_eq!(stats.pure_leaves(), 14);
    assert!(stats.leaf_grid_bytes >= size_of::<LeafData>());
    // Single player: no diff tracking
    assert_eq!(stats.pending_diffs, 0);
  }
}
