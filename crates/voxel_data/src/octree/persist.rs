//! Save collection/replay and diff flush/replay on [`ValueNode`].
//!
//! All replay walks take `Peekable` cursors over records sorted by ascending
//! leaf id. The depth-first octant walk visits leaves in the same ascending
//! order, so each node only ever looks at the front of its cursors:
//!
//! - front shares this node's id prefix: it belongs to this subtree, descend
//! - front prefix is below this node's: no remaining node can match it, drop
//! - otherwise it belongs to a later subtree, return
//!
//! Dropped records are counted in [`ReplayReport::skipped`].

use std::iter::Peekable;

use glam::IVec3;

use super::id::pow9;
use super::leaf::LeafData;
use super::node::ValueNode;
use crate::generator::WorldGenerator;
use crate::types::{LeafRecord, MaterialDiff, SavedChunk, ValueDiff};

/// Outcome of a save or diff replay.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReplayReport {
  /// Positions to remesh.
  pub modified_positions: Vec<IVec3>,
  /// Records written into the tree.
  pub applied: usize,
  /// Records dropped because no leaf of the walk matched them.
  pub skipped: usize,
}

impl ReplayReport {
  pub fn new() -> Self {
    Self::default()
  }
}

impl ValueNode {
  /// Id prefix of this node at its own depth.
  #[inline]
  fn prefix(&self) -> u64 {
    self.id / pow9(self.depth)
  }

  #[inline]
  fn owns<R: LeafRecord>(&self, record: &R) -> bool {
    record.leaf_id() / pow9(self.depth) == self.prefix()
  }

  /// Drop front records that sort before this subtree.
  fn skip_stale<R, I>(&self, cursor: &mut Peekable<I>) -> usize
  where
    R: LeafRecord,
    I: Iterator<Item = R>,
  {
    let prefix = self.prefix();
    let pow = pow9(self.depth);
    let mut skipped = 0;
    while cursor.next_if(|r| r.leaf_id() / pow < prefix).is_some() {
      skipped += 1;
    }
    skipped
  }

  /// Subdivide a pure node reached by a replay. Interior nodes are always
  /// dirty, so an already subdivided node is left alone.
  fn open_for_replay(&mut self) {
    if self.is_leaf() {
      self.create_children();
    }
    self.dirty = true;
  }

  /// Snapshot every dirty leaf, in ascending id order.
  ///
  /// # Panics
  /// Panics if a node breaks the leaf/interior/grid invariants.
  pub fn collect_dirty(&self, out: &mut Vec<SavedChunk>) {
    self.check_invariants();
    if !self.dirty {
      return;
    }
    match (self.children.as_deref(), self.leaf.as_deref()) {
      (Some(children), _) => {
        for child in children.iter() {
          child.collect_dirty(out);
        }
      }
      (None, Some(leaf)) => out.push(SavedChunk::new(
        self.id,
        self.position,
        Box::new(leaf.values),
        Box::new(leaf.materials),
      )),
      (None, None) => {}
    }
  }

  /// Neighbor-corner positions of every dirty leaf.
  pub fn dirty_chunk_positions(&self, out: &mut Vec<IVec3>) {
    if !self.dirty {
      return;
    }
    match self.children.as_deref() {
      Some(children) => {
        for child in children.iter() {
          child.dirty_chunk_positions(out);
        }
      }
      None => out.extend(self.neighbor_corner_positions()),
    }
  }

  /// Rebuild saved leaves, consuming matching chunks from `saves`.
  ///
  /// Each restored leaf is overwritten wholesale and reports its 8
  /// neighbor-corner positions.
  pub fn apply_save<I>(&mut self, saves: &mut Peekable<I>, report: &mut ReplayReport)
  where
    I: Iterator<Item = SavedChunk>,
  {
    report.skipped += self.skip_stale(saves);
    match saves.peek() {
      Some(front) if self.owns(front) => {}
      _ => return,
    }

    if self.depth == 0 {
      if let Some(chunk) = saves.next() {
        match self.leaf.as_deref_mut() {
          Some(leaf) => leaf.overwrite(&chunk.values, &chunk.materials),
          None => {
            self.leaf = Some(LeafData::from_grids(
              &chunk.values,
              &chunk.materials,
              self.multiplayer,
            ))
          }
        }
        self.dirty = true;
        report.applied += 1;
        report
          .modified_positions
          .extend(self.neighbor_corner_positions());
      }
      return;
    }

    self.open_for_replay();
    if let Some(children) = self.children.as_deref_mut() {
      for child in children.iter_mut() {
        child.apply_save(saves, report);
      }
    }
  }

  /// Emit and clear the pending diffs of every network-dirty leaf.
  pub fn drain_diffs(&mut self, out_values: &mut Vec<ValueDiff>, out_materials: &mut Vec<MaterialDiff>) {
    match self.children.as_deref_mut() {
      Some(children) => {
        for child in children.iter_mut() {
          child.drain_diffs(out_values, out_materials);
        }
        self.network_dirty = false;
      }
      None => {
        if !self.network_dirty {
          return;
        }
        self.network_dirty = false;
        if let Some(leaf) = self.leaf.as_deref_mut() {
          leaf.drain_diffs(self.id, out_values, out_materials);
        }
      }
    }
  }

  /// Replay value and material diffs, materializing leaves as needed.
  ///
  /// Both cursors are consumed independently. Every written cell reports its
  /// own global position. Replayed cells are not recorded as pending diffs.
  pub fn apply_diffs<G, V, M>(
    &mut self,
    generator: &G,
    values: &mut Peekable<V>,
    materials: &mut Peekable<M>,
    report: &mut ReplayReport,
  ) where
    G: WorldGenerator + ?Sized,
    V: Iterator<Item = ValueDiff>,
    M: Iterator<Item = MaterialDiff>,
  {
    report.skipped += self.skip_stale(values) + self.skip_stale(materials);

    let wants_values = values.peek().is_some_and(|d| self.owns(d));
    let wants_materials = materials.peek().is_some_and(|d| self.owns(d));
    if !wants_values && !wants_materials {
      return;
    }

    if self.depth == 0 {
      if !self.dirty {
        self.become_dirty(generator);
      }
      let id = self.id;
      while let Some(diff) = values.next_if(|d| d.id == id) {
        self.grid_mut().values[diff.index as usize] = diff.value;
        report.modified_positions.push(self.index_to_global(diff.index as usize));
        report.applied += 1;
      }
      while let Some(diff) = materials.next_if(|d| d.id == id) {
        self.grid_mut().materials[diff.index as usize] = diff.material;
        report.modified_positions.push(self.index_to_global(diff.index as usize));
        report.applied += 1;
      }
      return;
    }

    self.open_for_replay();
    if let Some(children) = self.children.as_deref_mut() {
      for child in children.iter_mut() {
        child.apply_diffs(generator, values, materials, report);
      }
    }
  }
}

#[cfg(test)]
#[path = "persist_test.rs"]
mod persist_test;
