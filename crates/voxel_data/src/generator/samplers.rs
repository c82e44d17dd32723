//! Simple analytic generators for testing and debugging.
//!
//! These generators implement deterministic mathematical fields that are easy
//! to verify. Use them to test edit/save/sync behaviour without noise
//! generation complexity.

use glam::{IVec3, Vec3};

use super::WorldGenerator;
use crate::octree::RegionQuery;
use crate::types::{MaterialId, VoxelValue};

/// Same value and material everywhere.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ConstantGenerator {
  pub value: VoxelValue,
  pub material: MaterialId,
}

impl ConstantGenerator {
  pub fn new(value: VoxelValue, material: MaterialId) -> Self {
    Self { value, material }
  }
}

impl WorldGenerator for ConstantGenerator {
  #[inline]
  fn sample_point(&self, _position: IVec3) -> (VoxelValue, MaterialId) {
    (self.value, self.material)
  }

  fn sample_region(
    &self,
    mut values: Option<&mut [VoxelValue]>,
    mut materials: Option<&mut [MaterialId]>,
    query: &RegionQuery,
  ) {
    query.for_each_local(|local| {
      let index = query.dest_index(local);
      if let Some(values) = values.as_deref_mut() {
        values[index] = self.value;
      }
      if let Some(materials) = materials.as_deref_mut() {
        materials[index] = self.material;
      }
    });
  }
}

/// Horizontal ground plane.
///
/// Value is the signed height above the plane: negative below (solid),
/// positive above (air). Solid voxels get `ground_material`, air voxels
/// `air_material`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroundPlaneGenerator {
  /// Height of the ground plane
  pub height: f32,
  pub ground_material: MaterialId,
  pub air_material: MaterialId,
}

impl Default for GroundPlaneGenerator {
  fn default() -> Self {
    Self {
      height: 0.0,
      ground_material: 1,
      air_material: 0,
    }
  }
}

impl GroundPlaneGenerator {
  pub fn new(height: f32) -> Self {
    Self {
      height,
      ..Self::default()
    }
  }

  pub fn with_materials(mut self, ground: MaterialId, air: MaterialId) -> Self {
    self.ground_material = ground;
    self.air_material = air;
    self
  }
}

impl WorldGenerator for GroundPlaneGenerator {
  fn sample_point(&self, position: IVec3) -> (VoxelValue, MaterialId) {
    let value = position.y as f32 - self.height;
    let material = if value < 0.0 {
      self.ground_material
    } else {
      self.air_material
    };
    (value, material)
  }
}

/// Sphere signed distance field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SphereGenerator {
  /// Center of the sphere in voxel coordinates
  pub center: Vec3,
  /// Radius of the sphere
  pub radius: f32,
  pub material: MaterialId,
}

impl Default for SphereGenerator {
  fn default() -> Self {
    Self {
      center: Vec3::ZERO,
      radius: 20.0,
      material: 1,
    }
  }
}

impl SphereGenerator {
  pub fn new(radius: f32) -> Self {
    Self {
      radius,
      ..Self::default()
    }
  }

  pub fn with_center(mut self, center: Vec3) -> Self {
    self.center = center;
    self
  }
}

impl WorldGenerator for SphereGenerator {
  fn sample_point(&self, position: IVec3) -> (VoxelValue, MaterialId) {
    // Sphere SDF: distance to surface = |p - center| - radius
    let sdf = position.as_vec3().distance(self.center) - self.radius;
    let material = if sdf < 0.0 { self.material } else { 0 };
    (sdf, material)
  }
}
