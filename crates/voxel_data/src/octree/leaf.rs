//! Leaf storage - dense 16³ grids of an edited depth-0 node.
//!
//! A leaf only owns a [`LeafData`] once it has been edited (or loaded from a
//! save). Until then all its content comes from the world generator.

use glam::IVec3;

use crate::constants::{coord_to_index, LEAF_SIZE, LEAF_VOLUME};
use crate::generator::WorldGenerator;
use crate::types::{MaterialDiff, MaterialGrid, MaterialId, ValueDiff, ValueGrid, VoxelValue};

const MASK_WORDS: usize = LEAF_VOLUME / 64;

/// Set of local indices edited since the last diff flush.
///
/// Insertion is idempotent and iteration follows first-insertion order.
#[derive(Clone)]
pub struct DirtyIndices {
  order: Vec<u16>,
  mask: [u64; MASK_WORDS],
}

impl DirtyIndices {
  pub fn new() -> Self {
    Self {
      order: Vec::new(),
      mask: [0; MASK_WORDS],
    }
  }

  /// Insert a local index. Returns false if it was already present.
  #[inline]
  pub fn insert(&mut self, index: u16) -> bool {
    debug_assert!((index as usize) < LEAF_VOLUME);
    let word = index as usize / 64;
    let bit = 1u64 << (index % 64);
    if self.mask[word] & bit != 0 {
      return false;
    }
    self.mask[word] |= bit;
    self.order.push(index);
    true
  }

  #[inline]
  pub fn contains(&self, index: u16) -> bool {
    self.mask[index as usize / 64] & (1u64 << (index % 64)) != 0
  }

  pub fn len(&self) -> usize {
    self.order.len()
  }

  pub fn is_empty(&self) -> bool {
    self.order.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = u16> + '_ {
    self.order.iter().copied()
  }

  /// Remove all indices, keeping capacity for a full leaf.
  pub fn clear(&mut self) {
    self.order.clear();
    self.order.reserve(LEAF_VOLUME);
    self.mask = [0; MASK_WORDS];
  }
}

impl Default for DirtyIndices {
  fn default() -> Self {
    Self::new()
  }
}

impl std::fmt::Debug for DirtyIndices {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_list().entries(self.order.iter()).finish()
  }
}

/// Dense value + material grid of one edited leaf.
#[derive(Clone)]
pub struct LeafData {
  pub values: ValueGrid,
  pub materials: MaterialGrid,
  /// Present in multiplayer mode only.
  dirty_values: Option<DirtyIndices>,
  /// Present in multiplayer mode only.
  dirty_materials: Option<DirtyIndices>,
}

impl LeafData {
  fn empty(multiplayer: bool) -> Box<Self> {
    Box::new(Self {
      values: [0.0; LEAF_VOLUME],
      materials: [0; LEAF_VOLUME],
      dirty_values: multiplayer.then(DirtyIndices::new),
      dirty_materials: multiplayer.then(DirtyIndices::new),
    })
  }

  /// Materialize a grid by evaluating the generator at every cell of the
  /// leaf whose minimal corner is `min_corner`.
  pub fn from_generator<G: WorldGenerator + ?Sized>(
    generator: &G,
    min_corner: IVec3,
    multiplayer: bool,
  ) -> Box<Self> {
    let mut leaf = Self::empty(multiplayer);
    for z in 0..LEAF_SIZE {
      for y in 0..LEAF_SIZE {
        for x in 0..LEAF_SIZE {
          let local = IVec3::new(x as i32, y as i32, z as i32);
          let (value, material) = generator.sample_point(min_corner + local);
          let index = coord_to_index(x, y, z);
          leaf.values[index] = value;
          leaf.materials[index] = material;
        }
      }
    }
    leaf
  }

  /// Build a grid from saved content.
  pub fn from_grids(values: &ValueGrid, materials: &MaterialGrid, multiplayer: bool) -> Box<Self> {
    let mut leaf = Self::empty(multiplayer);
    leaf.values = *values;
    leaf.materials = *materials;
    leaf
  }

  /// Overwrite both grids wholesale, leaving pending dirty indices alone.
  pub fn overwrite(&mut self, values: &ValueGrid, materials: &MaterialGrid) {
    self.values = *values;
    self.materials = *materials;
  }

  /// Edit a value and record it for the next diff flush.
  #[inline]
  pub fn set_value(&mut self, index: usize, value: VoxelValue) {
    self.values[index] = value;
    if let Some(dirty) = &mut self.dirty_values {
      dirty.insert(index as u16);
    }
  }

  /// Edit a material and record it for the next diff flush.
  #[inline]
  pub fn set_material(&mut self, index: usize, material: MaterialId) {
    self.materials[index] = material;
    if let Some(dirty) = &mut self.dirty_materials {
      dirty.insert(index as u16);
    }
  }

  pub fn dirty_values(&self) -> Option<&DirtyIndices> {
    self.dirty_values.as_ref()
  }

  pub fn dirty_materials(&self) -> Option<&DirtyIndices> {
    self.dirty_materials.as_ref()
  }

  /// Number of indices waiting to be flushed as diffs.
  pub fn pending_diff_count(&self) -> usize {
    self.dirty_values.as_ref().map_or(0, DirtyIndices::len)
      + self.dirty_materials.as_ref().map_or(0, DirtyIndices::len)
  }

  /// Emit one diff per recorded index, reading the current cell, then clear
  /// both index sets.
  pub fn drain_diffs(
    &mut self,
    id: u64,
    out_values: &mut Vec<ValueDiff>,
    out_materials: &mut Vec<MaterialDiff>,
  ) {
    if let Some(dirty) = &mut self.dirty_values {
      out_values.extend(
        dirty
          .iter()
          .map(|index| ValueDiff::new(id, index, self.values[index as usize])),
      );
      dirty.clear();
    }
    if let Some(dirty) = &mut self.dirty_materials {
      out_materials.extend(
        dirty
          .iter()
          .map(|index| MaterialDiff::new(id, index, self.materials[index as usize])),
      );
      dirty.clear();
    }
  }
}

#[cfg(test)]
#[path = "leaf_test.rs"]
mod leaf_test;
