//! Leaf grid layout constants for 16³ voxel chunks.
//!
//! Every depth-0 node of the value octree owns (once edited) a dense grid of
//! 16 samples per axis. Interior nodes hold no samples.
//!
//! # Leaf Grid Layout
//!
//! ```text
//! Leaf memory layout (X innermost):
//!
//! Address:  0       1       ...  15       16      ...  255       256 ...
//! Content: [0,0,0] [1,0,0] ... [15,0,0] [0,1,0] ... [15,15,0] [0,0,1] ...
//!          └──────── X ────────┘└──────── X ────────┘
//! ```
//!
//! # 3D Indexing
//!
//! ```text
//! index = x | y << 4 | z << 8
//!       = x + y * 16 + z * 256
//! ```
//!
//! # Node Size
//!
//! ```text
//! size(depth) = LEAF_SIZE << depth
//!
//! depth 0:  16³ voxels (one leaf grid)
//! depth 1:  32³ voxels (8 leaves)
//! depth 2:  64³ voxels (64 leaves)
//! ```

/// Number of samples per axis in a leaf grid.
pub const LEAF_SIZE: usize = 16;

/// Leaf samples squared (16² = 256)
pub const LEAF_SIZE_SQ: usize = LEAF_SIZE * LEAF_SIZE;

/// Total samples in a leaf grid (16³ = 4096)
pub const LEAF_VOLUME: usize = LEAF_SIZE * LEAF_SIZE * LEAF_SIZE;

/// Bit shift for Y coordinate indexing (log2(16) = 4)
pub const Y_SHIFT: u32 = 4;

/// Bit shift for Z coordinate indexing (log2(256) = 8)
pub const Z_SHIFT: u32 = 8;

/// Mask for extracting single axis from index (0xF = 15)
pub const INDEX_MASK: usize = 0xF;

/// Deepest supported tree.
///
/// Ids are sums of base-9 digits below the root, so the root depth must keep
/// `9^depth` inside a `u64` (9^20 < 2^64 < 9^21). Node edge length
/// `16 << 20` also still fits an `i32`.
pub const MAX_DEPTH: u8 = 20;

/// Number of children of an interior node.
pub const CHILD_COUNT: usize = 8;

/// Convert local leaf coordinates to linear index.
///
/// Layout: X is minor axis (stride 1), Y is middle (stride 16), Z is major
/// (stride 256)
#[inline(always)]
pub const fn coord_to_index(x: usize, y: usize, z: usize) -> usize {
  debug_assert!(x < LEAF_SIZE && y < LEAF_SIZE && z < LEAF_SIZE);
  x | (y << Y_SHIFT) | (z << Z_SHIFT)
}

/// Convert linear index to local leaf coordinates.
#[inline(always)]
pub const fn index_to_coord(idx: usize) -> (usize, usize, usize) {
  let x = idx % LEAF_SIZE;
  let rest = idx / LEAF_SIZE;
  let y = rest % LEAF_SIZE;
  let z = rest / LEAF_SIZE;
  (x, y, z)
}

/// Edge length of a node at `depth`.
#[inline(always)]
pub const fn node_size(depth: u8) -> i32 {
  (LEAF_SIZE as i32) << depth
}

#[cfg(test)]
#[path = "constants_test.rs"]
mod constants_test;
