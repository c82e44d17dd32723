//! Core data types shared by the octree, the generators and the save/sync lists.

use glam::IVec3;

use crate::constants::LEAF_VOLUME;

/// Scalar density sample.
/// Negative = inside/solid, Positive = outside/air.
pub type VoxelValue = f32;

/// Material tag stored per voxel.
pub type MaterialId = u8;

/// Dense value grid of one leaf.
pub type ValueGrid = [VoxelValue; LEAF_VOLUME];

/// Dense material grid of one leaf.
pub type MaterialGrid = [MaterialId; LEAF_VOLUME];

/// Snapshot of one edited leaf, produced by save collection.
///
/// Lists of these are ordered by ascending `id`. Byte-level encoding is left
/// to the persistence layer.
#[derive(Clone, PartialEq)]
pub struct SavedChunk {
  /// Depth-0 node id.
  pub id: u64,
  /// Center of the leaf.
  pub position: IVec3,
  pub values: Box<ValueGrid>,
  pub materials: Box<MaterialGrid>,
}

impl SavedChunk {
  pub fn new(
    id: u64,
    position: IVec3,
    values: Box<ValueGrid>,
    materials: Box<MaterialGrid>,
  ) -> Self {
    Self {
      id,
      position,
      values,
      materials,
    }
  }
}

impl std::fmt::Debug for SavedChunk {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("SavedChunk")
      .field("id", &self.id)
      .field("position", &self.position)
      .finish_non_exhaustive()
  }
}

/// Single-cell value change, addressed by leaf id + local index.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValueDiff {
  pub id: u64,
  /// Local index in `[0, 4096)`.
  pub index: u16,
  pub value: VoxelValue,
}

impl ValueDiff {
  pub fn new(id: u64, index: u16, value: VoxelValue) -> Self {
    Self { id, index, value }
  }
}

/// Single-cell material change, addressed by leaf id + local index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MaterialDiff {
  pub id: u64,
  /// Local index in `[0, 4096)`.
  pub index: u16,
  pub material: MaterialId,
}

impl MaterialDiff {
  pub fn new(id: u64, index: u16, material: MaterialId) -> Self {
    Self {
      id,
      index,
      material,
    }
  }
}

/// Record that can be routed through the tree by its leaf id.
pub trait LeafRecord {
  fn leaf_id(&self) -> u64;
}

impl LeafRecord for SavedChunk {
  #[inline]
  fn leaf_id(&self) -> u64 {
    self.id
  }
}

impl LeafRecord for ValueDiff {
  #[inline]
  fn leaf_id(&self) -> u64 {
    self.id
  }
}

impl LeafRecord for MaterialDiff {
  #[inline]
  fn leaf_id(&self) -> u64 {
    self.id
  }
}

/// Diff lists produced by one flush.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DiffLists {
  pub values: Vec<ValueDiff>,
  pub materials: Vec<MaterialDiff>,
}

impl DiffLists {
  pub fn new() -> Self {
    Self::default()
  }

  /// Returns true if no cell changed since the last flush.
  pub fn is_empty(&self) -> bool {
    self.values.is_empty() && self.materials.is_empty()
  }

  /// Total number of diff records.
  pub fn len(&self) -> usize {
    self.values.len() + self.materials.len()
  }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;
