//! voxel_data - editable value octree for deformable voxel terrain
//!
//! This crate stores a 3D density field (`f32` per voxel, negative = solid)
//! plus a per-voxel material tag. Unedited space is answered by a procedural
//! [`WorldGenerator`]; only edited 16³ leaves own memory.
//!
//! # Features
//!
//! - **Lazy octree**: nodes subdivide only along edited paths, base-9 ids
//!   address up to 9^20 leaves
//! - **Region sampling**: arbitrary boxes split at node centers, mixing
//!   edited grids with generator output
//! - **Save / load**: dirty leaf snapshots replayed in one sorted pass
//! - **Network diffs**: per-cell value and material diffs for multiplayer
//!   sync
//! - **Generators**: analytic shapes and FastNoiseLite terrain
//!
//! # Example
//!
//! ```ignore
//! use voxel_data::{NoiseTerrain, OctreeConfig, VoxelData};
//! use glam::IVec3;
//!
//! let config = OctreeConfig::new(6).with_multiplayer(true);
//! let mut world = VoxelData::new(config, NoiseTerrain::new(1337))?;
//!
//! // Dig a hole
//! world.set_value(IVec3::new(10, 0, 10), 1.0);
//!
//! // Sample a chunk for meshing
//! let chunk = world.sample_box(IVec3::new(0, -16, 0), IVec3::splat(32));
//!
//! // Persist and sync
//! let saves = world.save();
//! let diffs = world.drain_diffs();
//! ```

pub mod constants;
pub mod error;
pub mod types;

// Re-export commonly used items
pub use constants::{coord_to_index, index_to_coord, LEAF_SIZE, LEAF_VOLUME, MAX_DEPTH};
pub use error::OctreeError;
pub use types::{
  DiffLists, LeafRecord, MaterialDiff, MaterialGrid, MaterialId, SavedChunk, ValueDiff, ValueGrid,
  VoxelValue,
};

// Value octree
pub mod octree;
pub use octree::{NodeBounds, OctreeConfig, RegionQuery, ReplayReport, ValueNode};

// Procedural generators
pub mod generator;
pub use generator::{
  ConstantGenerator, GroundPlaneGenerator, NoiseTerrain, SphereGenerator, WorldGenerator,
};

// World container
pub mod world;
pub use world::{SampledRegion, VoxelData, WorldId};

// Statistics
pub mod metrics;
pub use metrics::OctreeStats;

#[cfg(test)]
pub(crate) mod test_utils;
