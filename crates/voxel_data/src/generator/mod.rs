//! Procedural world generators backing unedited terrain.
//!
//! A generator is a pure function from voxel position to value + material.
//! The octree calls it in two ways:
//!
//! - [`WorldGenerator::sample_region`] for every clean leaf a box query
//!   touches (the fast path for unedited terrain),
//! - [`WorldGenerator::sample_point`] once per cell when a leaf is first edited
//!   and its grid is materialized.
//!
//! Both must agree: a region sample must equal point-wise generation at every
//! sampled coordinate. The default `sample_region` guarantees this by calling
//! `sample_point`; overrides must preserve it.

use std::sync::Arc;

use glam::IVec3;

use crate::octree::RegionQuery;
use crate::types::{MaterialId, VoxelValue};

mod noise;
mod samplers;
#[cfg(test)]
#[path = "samplers_test.rs"]
mod samplers_test;

pub use noise::{NoiseTerrain, ROCK_MATERIAL, TOPSOIL_MATERIAL};
pub use samplers::{ConstantGenerator, GroundPlaneGenerator, SphereGenerator};

/// Procedural source of voxel values and materials.
///
/// Implementations must be deterministic and side-effect free.
pub trait WorldGenerator: Send + Sync {
  /// Value and material at one voxel.
  fn sample_point(&self, position: IVec3) -> (VoxelValue, MaterialId);

  /// Fill the destination arrays for every sample of `query`.
  ///
  /// Writes `values[query.dest_index(local)]` and
  /// `materials[query.dest_index(local)]` for each sampled local offset.
  /// Either output may be absent.
  fn sample_region(
    &self,
    mut values: Option<&mut [VoxelValue]>,
    mut materials: Option<&mut [MaterialId]>,
    query: &RegionQuery,
  ) {
    query.for_each_local(|local| {
      let (value, material) = self.sample_point(query.start + local);
      let index = query.dest_index(local);
      if let Some(values) = values.as_deref_mut() {
        values[index] = value;
      }
      if let Some(materials) = materials.as_deref_mut() {
        materials[index] = material;
      }
    });
  }
}

/// Blanket impl for boxed trait objects.
impl WorldGenerator for Box<dyn WorldGenerator> {
  fn sample_point(&self, position: IVec3) -> (VoxelValue, MaterialId) {
    (**self).sample_point(position)
  }

  fn sample_region(
    &self,
    values: Option<&mut [VoxelValue]>,
    materials: Option<&mut [MaterialId]>,
    query: &RegionQuery,
  ) {
    (**self).sample_region(values, materials, query)
  }
}

impl<G: WorldGenerator + ?Sized> WorldGenerator for Arc<G> {
  fn sample_point(&self, position: IVec3) -> (VoxelValue, MaterialId) {
    (**self).sample_point(position)
  }

  fn sample_region(
    &self,
    values: Option<&mut [VoxelValue]>,
    materials: Option<&mut [MaterialId]>,
    query: &RegionQuery,
  ) {
    (**self).sample_region(values, materials, query)
  }
}

impl<G: WorldGenerator + ?Sized> WorldGenerator for &G {
  fn sample_point(&self, position: IVec3) -> (VoxelValue, MaterialId) {
    (**self).sample_point(position)
  }

  fn sample_region(
    &self,
    values: Option<&mut [VoxelValue]>,
    materials: Option<&mut [MaterialId]>,
    query: &RegionQuery,
  ) {
    (**self).sample_region(values, materials, query)
  }
}
