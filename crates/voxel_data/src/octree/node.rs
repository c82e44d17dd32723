//! ValueNode - one node of the editable value octree.
//!
//! A node is always in exactly one of three states:
//!
//! ```text
//!   pure leaf    no children, no grid     content comes from the generator
//!   dirty leaf   no children, owns grid   depth 0 only
//!   interior     8 children, no grid      always dirty
//! ```
//!
//! Children are created on demand the first time an edit (or a replayed
//! save/diff) reaches below a node, and are never pruned afterwards.

use glam::IVec3;

use super::bounds::NodeBounds;
use super::config::OctreeConfig;
use super::id::child_id;
use super::leaf::LeafData;
use super::region::RegionQuery;
use crate::constants::{coord_to_index, index_to_coord, node_size, CHILD_COUNT};
use crate::generator::WorldGenerator;
use crate::types::{MaterialId, VoxelValue};

/// Node of the value octree.
#[derive(Clone)]
pub struct ValueNode {
  /// Integer center of the node.
  pub(super) position: IVec3,
  pub(super) depth: u8,
  pub(super) id: u64,
  pub(super) multiplayer: bool,
  /// Persistence dirty: this subtree diverges from the generator.
  pub(super) dirty: bool,
  /// Edited since the last diff flush.
  pub(super) network_dirty: bool,
  pub(super) children: Option<Box<[ValueNode; CHILD_COUNT]>>,
  pub(super) leaf: Option<Box<LeafData>>,
}

impl ValueNode {
  /// Create a pure (unedited) node.
  pub fn new(position: IVec3, depth: u8, id: u64, multiplayer: bool) -> Self {
    Self {
      position,
      depth,
      id,
      multiplayer,
      dirty: false,
      network_dirty: false,
      children: None,
      leaf: None,
    }
  }

  /// Create the root described by `config` (id 0).
  pub fn root(config: &OctreeConfig) -> Self {
    Self::new(config.center, config.depth, 0, config.multiplayer)
  }

  #[inline]
  pub fn position(&self) -> IVec3 {
    self.position
  }

  #[inline]
  pub fn depth(&self) -> u8 {
    self.depth
  }

  #[inline]
  pub fn id(&self) -> u64 {
    self.id
  }

  #[inline]
  pub fn is_multiplayer(&self) -> bool {
    self.multiplayer
  }

  #[inline]
  pub fn is_dirty(&self) -> bool {
    self.dirty
  }

  #[inline]
  pub fn is_network_dirty(&self) -> bool {
    self.network_dirty
  }

  /// A node without children.
  #[inline]
  pub fn is_leaf(&self) -> bool {
    self.children.is_none()
  }

  pub fn children(&self) -> Option<&[ValueNode; CHILD_COUNT]> {
    self.children.as_deref()
  }

  /// Grid of an edited leaf.
  pub fn leaf_data(&self) -> Option<&LeafData> {
    self.leaf.as_deref()
  }

  /// Edge length in voxels.
  #[inline]
  pub fn size(&self) -> i32 {
    node_size(self.depth)
  }

  /// First voxel covered by this node.
  #[inline]
  pub fn min_corner(&self) -> IVec3 {
    self.position - IVec3::splat(self.size() / 2)
  }

  #[inline]
  pub fn bounds(&self) -> NodeBounds {
    NodeBounds::from_center_size(self.position, self.size())
  }

  #[inline]
  pub fn is_in_octree(&self, position: IVec3) -> bool {
    self.bounds().contains(position)
  }

  /// Global voxel position to coordinates relative to the minimal corner.
  #[inline]
  pub fn global_to_local(&self, position: IVec3) -> IVec3 {
    position - self.min_corner()
  }

  #[inline]
  pub fn local_to_global(&self, local: IVec3) -> IVec3 {
    local + self.min_corner()
  }

  /// Index of the child containing `position`:
  /// `(x >= cx) + 2 * (y >= cy) + 4 * (z >= cz)`.
  #[inline]
  pub fn child_index_for(&self, position: IVec3) -> usize {
    (position.x >= self.position.x) as usize
      + 2 * (position.y >= self.position.y) as usize
      + 4 * (position.z >= self.position.z) as usize
  }

  /// Child containing `position`, if subdivided.
  pub fn child_for(&self, position: IVec3) -> Option<&ValueNode> {
    let index = self.child_index_for(position);
    self.children.as_deref().map(|children| &children[index])
  }

  /// Deepest existing node containing `position`. Never allocates.
  ///
  /// # Panics
  /// Panics if `position` is outside this node.
  pub fn leaf_at(&self, position: IVec3) -> &ValueNode {
    assert!(
      self.is_in_octree(position),
      "Position {:?} outside node bounds {:?}",
      position,
      self.bounds()
    );
    let mut node = self;
    while let Some(child) = node.child_for(position) {
      node = child;
    }
    debug_assert!(node.is_in_octree(position));
    node
  }

  /// Mutable variant of [`Self::leaf_at`].
  pub fn leaf_at_mut(&mut self, position: IVec3) -> &mut ValueNode {
    assert!(
      self.is_in_octree(position),
      "Position {:?} outside node bounds {:?}",
      position,
      self.bounds()
    );
    let index = self.child_index_for(position);
    match self.children {
      Some(ref mut children) => children[index].leaf_at_mut(position),
      None => {
        debug_assert!(self.is_in_octree(position));
        self
      }
    }
  }

  /// Positions handed to remeshing when this leaf changes wholesale: the
  /// node position and the 7 positions one node size below it along every
  /// axis combination, so chunks sharing a face, edge or corner are included.
  pub fn neighbor_corner_positions(&self) -> [IVec3; 8] {
    let s = self.size();
    std::array::from_fn(|i| {
      let offset = IVec3::new(
        (i & 1) as i32 * s,
        ((i >> 1) & 1) as i32 * s,
        ((i >> 2) & 1) as i32 * s,
      );
      self.position - offset
    })
  }

  /// Global position of a local grid index.
  #[inline]
  pub fn index_to_global(&self, index: usize) -> IVec3 {
    let (x, y, z) = index_to_coord(index);
    self.local_to_global(IVec3::new(x as i32, y as i32, z as i32))
  }

  /// Subdivide into 8 pure children.
  ///
  /// Child `i` sits at `position ± size / 4` with the sign of each axis taken
  /// from bits 0 (X), 1 (Y) and 2 (Z) of `i`, and has octant digit `i + 1`.
  pub(super) fn create_children(&mut self) {
    assert!(self.is_leaf(), "Node {} already has children", self.id);
    assert!(self.depth != 0, "Depth 0 node {} cannot subdivide", self.id);
    debug_assert!(self.leaf.is_none());

    let d = self.size() / 4;
    let child_depth = self.depth - 1;
    let sign = |bit: usize| if bit == 0 { -d } else { d };
    let children = std::array::from_fn(|i| {
      let offset = IVec3::new(sign(i & 1), sign((i >> 1) & 1), sign((i >> 2) & 1));
      ValueNode::new(
        self.position + offset,
        child_depth,
        child_id(self.id, child_depth, i as u8 + 1),
        self.multiplayer,
      )
    });
    self.children = Some(Box::new(children));
  }

  /// Materialize the grid of a depth-0 leaf from the generator.
  ///
  /// # Panics
  /// Panics if the node is not a clean depth-0 leaf.
  pub fn become_dirty<G: WorldGenerator + ?Sized>(&mut self, generator: &G) {
    assert_eq!(self.depth, 0, "Only depth 0 nodes own a grid");
    assert!(!self.dirty, "Leaf {} is already dirty", self.id);

    self.leaf = Some(LeafData::from_generator(
      generator,
      self.min_corner(),
      self.multiplayer,
    ));
    self.dirty = true;
  }

  /// Grid of a dirty leaf.
  pub(super) fn grid_mut(&mut self) -> &mut LeafData {
    self
      .leaf
      .as_deref_mut()
      .expect("dirty depth 0 leaf must own its grid")
  }

  /// Check the leaf/interior/grid state invariants.
  ///
  /// # Panics
  /// Panics if the node is in none of the three valid states.
  pub fn check_invariants(&self) {
    match (&self.children, &self.leaf) {
      (Some(_), None) => {
        assert!(self.depth > 0, "Depth 0 node {} has children", self.id);
        assert!(self.dirty, "Interior node {} is not dirty", self.id);
      }
      (None, Some(_)) => {
        assert_eq!(self.depth, 0, "Grid on depth {} node {}", self.depth, self.id);
        assert!(self.dirty, "Leaf {} owns a grid but is not dirty", self.id);
      }
      (None, None) => {
        assert!(!self.dirty, "Pure leaf {} is marked dirty", self.id);
      }
      (Some(_), Some(_)) => panic!("Node {} has both children and a grid", self.id),
    }
  }

  /// Copy the box described by `query` into the destination arrays.
  ///
  /// Dirty leaves copy from their grid, pure leaves delegate the whole box to
  /// the generator, interior nodes split the box at their center and recurse
  /// into every child it overlaps. Either output may be absent.
  ///
  /// # Panics
  /// Panics if the box is not inside this node.
  pub fn sample<G: WorldGenerator + ?Sized>(
    &self,
    generator: &G,
    mut values: Option<&mut [VoxelValue]>,
    mut materials: Option<&mut [MaterialId]>,
    query: &RegionQuery,
  ) {
    assert!(query.step > 0, "Query step must be positive, got {}", query.step);
    if query.is_empty() {
      return;
    }
    assert!(
      self.bounds().contains_box(query.start, query.size),
      "Query {:?} outside node bounds {:?}",
      query,
      self.bounds()
    );

    match self.children.as_deref() {
      Some(children) => {
        for (child, part) in query.split(self.position) {
          children[child].sample(
            generator,
            values.as_deref_mut(),
            materials.as_deref_mut(),
            &part,
          );
        }
      }
      None => match self.leaf.as_deref() {
        Some(leaf) => {
          let min_corner = self.min_corner();
          query.for_each_local(|local| {
            let cell = query.start + local - min_corner;
            let src = coord_to_index(cell.x as usize, cell.y as usize, cell.z as usize);
            let dst = query.dest_index(local);
            if let Some(values) = values.as_deref_mut() {
              values[dst] = leaf.values[src];
            }
            if let Some(materials) = materials.as_deref_mut() {
              materials[dst] = leaf.materials[src];
            }
          });
        }
        None => generator.sample_region(values, materials, query),
      },
    }
  }

  /// Edit one voxel. `None` leaves that channel untouched.
  ///
  /// Must be called on a leaf (see [`Self::leaf_at_mut`]). Above depth 0 the
  /// node subdivides and the edit continues into the containing child; at
  /// depth 0 the grid is materialized on first edit.
  ///
  /// # Panics
  /// Panics if the node has children or `position` is outside it.
  pub fn set<G: WorldGenerator + ?Sized>(
    &mut self,
    generator: &G,
    position: IVec3,
    value: Option<VoxelValue>,
    material: Option<MaterialId>,
  ) {
    assert!(self.is_leaf(), "set called on interior node {}", self.id);
    assert!(
      self.is_in_octree(position),
      "Position {:?} outside node bounds {:?}",
      position,
      self.bounds()
    );

    self.network_dirty = true;

    if self.depth != 0 {
      self.create_children();
      self.dirty = true;
      let index = self.child_index_for(position);
      if let Some(children) = self.children.as_deref_mut() {
        children[index].set(generator, position, value, material);
      }
      return;
    }

    if !self.dirty {
      self.become_dirty(generator);
    }

    let local = self.global_to_local(position);
    let index = coord_to_index(local.x as usize, local.y as usize, local.z as usize);
    let leaf = self.grid_mut();
    if let Some(value) = value {
      leaf.set_value(index, value);
    }
    if let Some(material) = material {
      leaf.set_material(index, material);
    }
  }

  /// Value and material at one voxel, from the grid when edited.
  ///
  /// # Panics
  /// Panics if `position` is outside this node.
  pub fn get<G: WorldGenerator + ?Sized>(
    &self,
    generator: &G,
    position: IVec3,
  ) -> (VoxelValue, MaterialId) {
    let leaf = self.leaf_at(position);
    match leaf.leaf.as_deref() {
      Some(grid) => {
        let local = leaf.global_to_local(position);
        let index = coord_to_index(local.x as usize, local.y as usize, local.z as usize);
        (grid.values[index], grid.materials[index])
      }
      None => generator.sample_point(position),
    }
  }
}

impl std::fmt::Debug for ValueNode {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ValueNode")
      .field("id", &self.id)
      .field("position", &self.position)
      .field("depth", &self.depth)
      .field("dirty", &self.dirty)
      .field("network_dirty", &self.network_dirty)
      .field("has_children", &self.children.is_some())
      .finish_non_exhaustive()
  }
}

#[cfg(test)]
#[path = "node_test.rs"]
mod node_test;
