//! Integer axis-aligned bounds of an octree node.

use glam::IVec3;

/// Half-open integer bounding box: `min` inclusive, `max` exclusive.
///
/// Node bounds are always cubes centred on the node position, but query boxes
/// use the same type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeBounds {
  /// Minimum corner (inclusive).
  pub min: IVec3,
  /// Maximum corner (exclusive).
  pub max: IVec3,
}

impl NodeBounds {
  /// Create bounds from min and max corners.
  ///
  /// # Panics
  /// Debug-asserts that min <= max on all axes.
  pub fn new(min: IVec3, max: IVec3) -> Self {
    debug_assert!(
      min.cmple(max).all(),
      "Bounds min must be <= max on all axes"
    );
    Self { min, max }
  }

  /// Create the bounds of a cube with edge `size` centred on `center`.
  pub fn from_center_size(center: IVec3, size: i32) -> Self {
    let half = IVec3::splat(size / 2);
    Self {
      min: center - half,
      max: center + half,
    }
  }

  /// Check if a voxel coordinate lies inside.
  #[inline]
  pub fn contains(&self, point: IVec3) -> bool {
    point.cmpge(self.min).all() && point.cmplt(self.max).all()
  }

  /// Check if the box `[start, start + size)` lies inside.
  ///
  /// The box end is an exclusive corner, so it may equal `max`.
  #[inline]
  pub fn contains_box(&self, start: IVec3, size: IVec3) -> bool {
    let end = start + size;
    start.cmpge(self.min).all() && end.cmple(self.max).all() && size.cmpge(IVec3::ZERO).all()
  }

  /// Get the size of the bounds (max - min).
  #[inline]
  pub fn size(&self) -> IVec3 {
    self.max - self.min
  }

  /// Get the center of the bounds.
  #[inline]
  pub fn center(&self) -> IVec3 {
    (self.min + self.max) / 2
  }

  /// Number of voxels inside.
  #[inline]
  pub fn volume(&self) -> usize {
    let size = self.size();
    size.x as usize * size.y as usize * size.z as usize
  }
}
