//! Editable value octree.
//!
//! The root covers `16 << depth` voxels per axis around its center. Nodes are
//! subdivided lazily, only along paths that have been edited or replayed, so
//! unedited terrain costs a single pure node and is served by the generator.
//!
//! # Addressing
//!
//! Every node has a base-9 id: the root is 0 and a child at depth `d` adds
//! `octant * 9^d` (octant 1..=8) to its parent. Depth-first traversal in
//! octant order visits ids in ascending order, which is what lets save and
//! diff replay walk sorted lists with a single cursor.
//!
//! # Module Structure
//!
//! - [`id`]: base-9 id arithmetic
//! - [`bounds`]: `NodeBounds` - half-open integer boxes
//! - [`config`]: `OctreeConfig` - root depth, center and multiplayer mode
//! - [`region`]: `RegionQuery` - box sampling requests and center splits
//! - [`leaf`]: `LeafData` - 16³ value + material grids with diff tracking
//! - [`node`]: `ValueNode` - recursive node, sampling and point edits
//! - [`persist`]: save collection/replay and diff flush/replay

pub mod bounds;
pub mod config;
pub mod id;
pub mod leaf;
pub mod node;
pub mod persist;
pub mod region;

// Re-exports
pub use bounds::NodeBounds;
pub use config::OctreeConfig;
pub use id::{child_id, is_leaf_id_under, octant_digit, pow9, same_ancestor_at};
pub use leaf::{DirtyIndices, LeafData};
pub use node::ValueNode;
pub use persist::ReplayReport;
pub use region::{RegionQuery, SplitQuery};
