//! Recoverable errors surfaced to callers of the tree container.
//!
//! Contract breaches inside the octree (out-of-bounds coordinates, editing an
//! interior node, broken leaf/children invariants) are assertions, not errors.

use glam::IVec3;
use thiserror::Error;

use crate::constants::MAX_DEPTH;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OctreeError {
  #[error("octree depth {depth} exceeds the maximum of {}", MAX_DEPTH)]
  DepthTooLarge { depth: u8 },

  #[error("octree of size {size} centered at {center} exceeds the i32 coordinate range")]
  CenterOutOfRange { center: IVec3, size: i32 },

  #[error("saved chunk {id} does not address a leaf of this tree")]
  ForeignChunk { id: u64 },

  #[error("diff for leaf {id} does not address a leaf of this tree")]
  ForeignDiff { id: u64 },

  #[error("diff for leaf {id} has local index {index}, expected < 4096")]
  DiffIndexOutOfRange { id: u64, index: u16 },
}
