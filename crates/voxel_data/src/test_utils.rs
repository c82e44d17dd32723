//! Test utilities shared by the octree, persistence and world tests.
//!
//! Provides deterministic mock generators and helpers for building edited
//! trees.

use std::sync::atomic::{AtomicUsize, Ordering};

use glam::IVec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::generator::WorldGenerator;
use crate::octree::{NodeBounds, RegionQuery, ValueNode};
use crate::types::{MaterialId, VoxelValue};

// =============================================================================
// Mock Generators
// =============================================================================

/// Encodes the voxel position into the value so every cell is distinct.
///
/// Exact in f32 for coordinates in [-128, 128).
pub struct CoordGenerator;

impl CoordGenerator {
  pub fn encode(position: IVec3) -> VoxelValue {
    (position.x + 256 * position.y + 65536 * position.z) as f32
  }

  pub fn material(position: IVec3) -> MaterialId {
    (position.x ^ position.y ^ position.z) as u8
  }
}

impl WorldGenerator for CoordGenerator {
  fn sample_point(&self, position: IVec3) -> (VoxelValue, MaterialId) {
    (Self::encode(position), Self::material(position))
  }
}

/// Returns the octant digit (1..=8) of the position relative to `center`.
///
/// Used to check that a box straddling a node center lands in the right child.
pub struct OctantGenerator {
  pub center: IVec3,
}

impl OctantGenerator {
  pub fn digit(&self, position: IVec3) -> u8 {
    let index = (position.x >= self.center.x) as u8
      + 2 * (position.y >= self.center.y) as u8
      + 4 * (position.z >= self.center.z) as u8;
    index + 1
  }
}

impl WorldGenerator for OctantGenerator {
  fn sample_point(&self, position: IVec3) -> (VoxelValue, MaterialId) {
    let digit = self.digit(position);
    (digit as f32, digit)
  }
}

/// Wraps a generator and counts calls per entry point.
pub struct CountingGenerator<G> {
  pub inner: G,
  point_calls: AtomicUsize,
  region_calls: AtomicUsize,
}

impl<G> CountingGenerator<G> {
  pub fn new(inner: G) -> Self {
    Self {
      inner,
      point_calls: AtomicUsize::new(0),
      region_calls: AtomicUsize::new(0),
    }
  }

  pub fn point_calls(&self) -> usize {
    self.point_calls.load(Ordering::Relaxed)
  }

  pub fn region_calls(&self) -> usize {
    self.region_calls.load(Ordering::Relaxed)
  }

  pub fn reset(&self) {
    self.point_calls.store(0, Ordering::Relaxed);
    self.region_calls.store(0, Ordering::Relaxed);
  }
}

impl<G: WorldGenerator> WorldGenerator for CountingGenerator<G> {
  fn sample_point(&self, position: IVec3) -> (VoxelValue, MaterialId) {
    self.point_calls.fetch_add(1, Ordering::Relaxed);
    self.inner.sample_point(position)
  }

  fn sample_region(
    &self,
    values: Option<&mut [VoxelValue]>,
    materials: Option<&mut [MaterialId]>,
    query: &RegionQuery,
  ) {
    self.region_calls.fetch_add(1, Ordering::Relaxed);
    self.inner.sample_region(values, materials, query)
  }
}

// =============================================================================
// Tree Helpers
// =============================================================================

/// Edit one voxel of the tree rooted at `root`.
pub fn set_point<G: WorldGenerator + ?Sized>(
  root: &mut ValueNode,
  generator: &G,
  position: IVec3,
  value: Option<VoxelValue>,
  material: Option<MaterialId>,
) {
  root.leaf_at_mut(position).set(generator, position, value, material);
}

/// One randomized edit.
#[derive(Clone, Copy, Debug)]
pub struct Edit {
  pub position: IVec3,
  pub value: Option<VoxelValue>,
  pub material: Option<MaterialId>,
}

/// Deterministic random edits inside `bounds`.
pub fn random_edits(seed: u64, count: usize, bounds: NodeBounds) -> Vec<Edit> {
  let mut rng = StdRng::seed_from_u64(seed);
  (0..count)
    .map(|_| {
      let position = IVec3::new(
        rng.random_range(bounds.min.x..bounds.max.x),
        rng.random_range(bounds.min.y..bounds.max.y),
        rng.random_range(bounds.min.z..bounds.max.z),
      );
      let value = rng
        .random_bool(0.8)
        .then(|| rng.random_range(-10.0f32..10.0));
      let material = rng.random_bool(0.5).then(|| rng.random_range(0..=255u8));
      Edit {
        position,
        value,
        material,
      }
    })
    .collect()
}

/// Apply edits in order.
pub fn apply_edits<G: WorldGenerator + ?Sized>(root: &mut ValueNode, generator: &G, edits: &[Edit]) {
  for edit in edits {
    set_point(root, generator, edit.position, edit.value, edit.material);
  }
}

/// Sample the full node into owned buffers.
pub fn sample_all<G: WorldGenerator + ?Sized>(
  root: &ValueNode,
  generator: &G,
) -> (Vec<VoxelValue>, Vec<MaterialId>) {
  let bounds = root.bounds();
  let query = RegionQuery::new(bounds.min, bounds.size());
  let mut values = vec![0.0; query.dest_len()];
  let mut materials = vec![0; query.dest_len()];
  root.sample(generator, Some(&mut values), Some(&mut materials), &query);
  (values, materials)
}

/// Assert the state invariants on every node of the subtree.
pub fn check_tree(node: &ValueNode) {
  node.check_invariants();
  if let Some(children) = node.children() {
    for child in children.iter() {
      check_tree(child);
    }
  }
}
