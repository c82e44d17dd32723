//! Hierarchical node ids.
//!
//! A node id is the sum of one base-9 digit per level below the root:
//!
//! ```text
//! id(child) = id(parent) + octant * 9^depth(child)      octant in 1..=8
//! ```
//!
//! Digit 0 never appears below the root, so every path from the root yields a
//! distinct id, and two nodes share an ancestor at `depth` exactly when their
//! ids agree after integer division by `9^depth`.
//!
//! Depth-first traversal in octant order visits leaves in ascending id order.

use crate::constants::{CHILD_COUNT, MAX_DEPTH};

/// Base of the per-level digit.
pub const ID_BASE: u64 = 9;

/// `9^depth`, exact for every depth up to [`MAX_DEPTH`].
#[inline]
pub const fn pow9(depth: u8) -> u64 {
  debug_assert!(depth <= MAX_DEPTH);
  let mut result = 1u64;
  let mut i = 0;
  while i < depth {
    result *= ID_BASE;
    i += 1;
  }
  result
}

/// Id of the child in `octant` (1..=8) of `parent_id`, the child being at
/// `child_depth`.
#[inline]
pub fn child_id(parent_id: u64, child_depth: u8, octant: u8) -> u64 {
  debug_assert!(
    (1..=CHILD_COUNT as u8).contains(&octant),
    "Octant must be in 1..=8, got {}",
    octant
  );
  parent_id + octant as u64 * pow9(child_depth)
}

/// Whether both ids lie under the same node at `depth`.
#[inline]
pub fn same_ancestor_at(id_a: u64, id_b: u64, depth: u8) -> bool {
  let pow = pow9(depth);
  id_a / pow == id_b / pow
}

/// The octant digit (0 for "none") that the path of `id` took into `depth`.
#[inline]
pub fn octant_digit(id: u64, depth: u8) -> u8 {
  ((id / pow9(depth)) % ID_BASE) as u8
}

/// Whether `id` is a well-formed depth-0 id below the root `root_id` at
/// `root_depth`.
pub fn is_leaf_id_under(root_id: u64, root_depth: u8, id: u64) -> bool {
  if !same_ancestor_at(root_id, id, root_depth) {
    return false;
  }
  (0..root_depth).all(|depth| octant_digit(id, depth) != 0)
}

#[cfg(test)]
#[path = "id_test.rs"]
mod id_test;
