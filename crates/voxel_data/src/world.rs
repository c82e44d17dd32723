//! VoxelData - editable voxel world container.
//!
//! Each world owns its octree root, configuration and generator. Multiple
//! worlds can exist independently (overworld, dioramas, remote replicas).

use std::sync::atomic::{AtomicU64, Ordering};

use glam::IVec3;
use rayon::prelude::*;
use web_time::Instant;

use crate::constants::LEAF_VOLUME;
use crate::error::OctreeError;
use crate::generator::WorldGenerator;
use crate::metrics::OctreeStats;
use crate::octree::{is_leaf_id_under, NodeBounds, OctreeConfig, RegionQuery, ReplayReport, ValueNode};
use crate::types::{DiffLists, LeafRecord, MaterialId, SavedChunk, VoxelValue};

// =============================================================================
// WorldId - unique identifier
// =============================================================================

/// Atomic counter for generating unique WorldIds.
static WORLD_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Opaque world identifier.
///
/// Generated atomically - guaranteed unique within process lifetime.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct WorldId(u64);

impl WorldId {
  /// Generate a new unique WorldId.
  pub fn new() -> Self {
    Self(WORLD_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
  }

  /// Get the raw ID value.
  pub fn raw(&self) -> u64 {
    self.0
  }
}

impl Default for WorldId {
  fn default() -> Self {
    Self::new()
  }
}

// =============================================================================
// SampledRegion - owned sampling result
// =============================================================================

/// Values and materials of one box, laid out as described by `query`.
#[derive(Clone, Debug, PartialEq)]
pub struct SampledRegion {
  pub query: RegionQuery,
  pub values: Vec<VoxelValue>,
  pub materials: Vec<MaterialId>,
}

impl SampledRegion {
  fn new(query: RegionQuery) -> Self {
    let len = query.dest_len();
    Self {
      query,
      values: vec![0.0; len],
      materials: vec![0; len],
    }
  }

  /// Sample at `query.start + local`.
  pub fn at(&self, local: IVec3) -> (VoxelValue, MaterialId) {
    let index = self.query.dest_index(local);
    (self.values[index], self.materials[index])
  }
}

// =============================================================================
// VoxelData<G> - per-world state container
// =============================================================================

/// Editable voxel world, generic over its generator.
///
/// Type parameter `G` allows compile-time generator specialization for hot
/// paths. Engine bridges may use `Box<dyn WorldGenerator>` for runtime
/// flexibility.
///
/// # Panics
///
/// Point edits, point reads and sampling assert that their coordinates lie
/// inside [`Self::bounds`]. Save and diff lists are validated instead and
/// rejected with an [`OctreeError`].
pub struct VoxelData<G: WorldGenerator> {
  /// Unique world identifier.
  pub id: WorldId,
  config: OctreeConfig,
  root: ValueNode,
  generator: G,
}

impl<G: WorldGenerator> VoxelData<G> {
  /// Create an unedited world.
  pub fn new(config: OctreeConfig, generator: G) -> Result<Self, OctreeError> {
    config.validate()?;
    let root = ValueNode::root(&config);
    log::debug!(
      "[VoxelData] Created world: depth={}, size={}, multiplayer={}",
      config.depth,
      config.size(),
      config.multiplayer
    );
    Ok(Self {
      id: WorldId::new(),
      config,
      root,
      generator,
    })
  }

  pub fn config(&self) -> &OctreeConfig {
    &self.config
  }

  pub fn generator(&self) -> &G {
    &self.generator
  }

  pub fn root(&self) -> &ValueNode {
    &self.root
  }

  /// Half-open bounds of the editable volume.
  pub fn bounds(&self) -> NodeBounds {
    self.root.bounds()
  }

  #[inline]
  pub fn is_in_world(&self, position: IVec3) -> bool {
    self.root.is_in_octree(position)
  }

  // ---------------------------------------------------------------------------
  // Edits and reads
  // ---------------------------------------------------------------------------

  pub fn set_value(&mut self, position: IVec3, value: VoxelValue) {
    self.set(position, Some(value), None);
  }

  pub fn set_material(&mut self, position: IVec3, material: MaterialId) {
    self.set(position, None, Some(material));
  }

  pub fn set_value_and_material(&mut self, position: IVec3, value: VoxelValue, material: MaterialId) {
    self.set(position, Some(value), Some(material));
  }

  fn set(&mut self, position: IVec3, value: Option<VoxelValue>, material: Option<MaterialId>) {
    self
      .root
      .leaf_at_mut(position)
      .set(&self.generator, position, value, material);
  }

  /// Value and material at one voxel.
  pub fn get(&self, position: IVec3) -> (VoxelValue, MaterialId) {
    self.root.get(&self.generator, position)
  }

  /// Deepest existing node containing `position`.
  pub fn leaf_at(&self, position: IVec3) -> &ValueNode {
    self.root.leaf_at(position)
  }

  // ---------------------------------------------------------------------------
  // Sampling
  // ---------------------------------------------------------------------------

  /// Sample `query` into caller-provided arrays.
  pub fn sample(
    &self,
    values: Option<&mut [VoxelValue]>,
    materials: Option<&mut [MaterialId]>,
    query: &RegionQuery,
  ) {
    debug_assert!(values.as_ref().map_or(true, |v| v.len() >= query.dest_len()));
    debug_assert!(materials.as_ref().map_or(true, |m| m.len() >= query.dest_len()));
    self.root.sample(&self.generator, values, materials, query);
  }

  /// Sample the dense box `[start, start + size)` into owned buffers.
  pub fn sample_box(&self, start: IVec3, size: IVec3) -> SampledRegion {
    self.sample_query(RegionQuery::new(start, size))
  }

  /// Sample one query into owned buffers sized `query.dest_len()`.
  pub fn sample_query(&self, query: RegionQuery) -> SampledRegion {
    let mut region = SampledRegion::new(query);
    self.root.sample(
      &self.generator,
      Some(&mut region.values),
      Some(&mut region.materials),
      &query,
    );
    region
  }

  /// Sample many queries in parallel using rayon.
  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "voxel_data::sample_queries"))]
  pub fn sample_queries(&self, queries: &[RegionQuery]) -> Vec<SampledRegion> {
    if queries.is_empty() {
      return Vec::new();
    }
    let start = Instant::now();
    let regions: Vec<SampledRegion> = queries
      .par_iter()
      .map(|query| self.sample_query(*query))
      .collect();
    log::debug!(
      "[VoxelData] Sampled {} regions in {:.2}ms",
      regions.len(),
      start.elapsed().as_secs_f64() * 1000.0
    );
    regions
  }

  /// Sample cubic chunks of `chunk_size` voxels, one per minimal corner.
  pub fn sample_chunks(&self, chunk_mins: &[IVec3], chunk_size: i32) -> Vec<SampledRegion> {
    let queries: Vec<RegionQuery> = chunk_mins
      .iter()
      .map(|&min| RegionQuery::new(min, IVec3::splat(chunk_size)))
      .collect();
    self.sample_queries(&queries)
  }

  // ---------------------------------------------------------------------------
  // Save / load
  // ---------------------------------------------------------------------------

  /// Snapshot every edited leaf, ascending by id.
  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "voxel_data::save"))]
  pub fn save(&self) -> Vec<SavedChunk> {
    let start = Instant::now();
    let mut saves = Vec::new();
    self.root.collect_dirty(&mut saves);
    log::debug!(
      "[VoxelData] Collected {} dirty chunks in {:.2}ms",
      saves.len(),
      start.elapsed().as_secs_f64() * 1000.0
    );
    saves
  }

  /// Restore saved leaves. The list may be in any order.
  ///
  /// Every chunk id is validated before the tree is touched; on error the
  /// world is unchanged.
  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "voxel_data::load_save"))]
  pub fn load_save(&mut self, mut saves: Vec<SavedChunk>) -> Result<ReplayReport, OctreeError> {
    let start = Instant::now();
    {
      #[cfg(feature = "tracing")]
      let _span = tracing::info_span!("validate_saves").entered();
      saves.sort_by_key(|chunk| chunk.id);
      for chunk in &saves {
        if !self.owns_leaf(chunk) {
          return Err(OctreeError::ForeignChunk { id: chunk.id });
        }
      }
    }

    let total = saves.len();
    let mut report = ReplayReport::new();
    let mut cursor = saves.into_iter().peekable();
    {
      #[cfg(feature = "tracing")]
      let _span = tracing::info_span!("apply_save").entered();
      self.root.apply_save(&mut cursor, &mut report);
    }
    report.skipped += cursor.count();

    if report.skipped > 0 {
      log::warn!(
        "[VoxelData] Dropped {} of {} saved chunks (duplicate ids)",
        report.skipped,
        total
      );
    }
    log::debug!(
      "[VoxelData] Loaded {} chunks in {:.2}ms",
      report.applied,
      start.elapsed().as_secs_f64() * 1000.0
    );
    Ok(report)
  }

  // ---------------------------------------------------------------------------
  // Network diffs
  // ---------------------------------------------------------------------------

  /// Flush the edits made since the last call. Empty unless the world was
  /// created in multiplayer mode.
  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "voxel_data::drain_diffs"))]
  pub fn drain_diffs(&mut self) -> DiffLists {
    let mut diffs = DiffLists::new();
    self.root.drain_diffs(&mut diffs.values, &mut diffs.materials);
    if !diffs.is_empty() {
      log::debug!(
        "[VoxelData] Drained {} value and {} material diffs",
        diffs.values.len(),
        diffs.materials.len()
      );
    }
    diffs
  }

  /// Replay diffs produced by another world with the same configuration.
  ///
  /// Lists may be in any order; every record is validated before the tree
  /// is touched. Replayed cells are not queued for the next flush.
  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "voxel_data::apply_diffs"))]
  pub fn apply_diffs(&mut self, diffs: DiffLists) -> Result<ReplayReport, OctreeError> {
    let start = Instant::now();
    let DiffLists {
      mut values,
      mut materials,
    } = diffs;

    {
      #[cfg(feature = "tracing")]
      let _span = tracing::info_span!("validate_diffs").entered();
      values.sort_by_key(|diff| diff.id);
      materials.sort_by_key(|diff| diff.id);
      for (id, index) in values
        .iter()
        .map(|d| (d.id, d.index))
        .chain(materials.iter().map(|d| (d.id, d.index)))
      {
        if !is_leaf_id_under(self.root.id(), self.root.depth(), id) {
          return Err(OctreeError::ForeignDiff { id });
        }
        if index as usize >= LEAF_VOLUME {
          return Err(OctreeError::DiffIndexOutOfRange { id, index });
        }
      }
    }

    let total = values.len() + materials.len();
    let mut report = ReplayReport::new();
    let mut values = values.into_iter().peekable();
    let mut materials = materials.into_iter().peekable();
    self
      .root
      .apply_diffs(&self.generator, &mut values, &mut materials, &mut report);
    report.skipped += values.count() + materials.count();

    if report.skipped > 0 {
      log::warn!(
        "[VoxelData] Dropped {} of {} diffs that matched no leaf",
        report.skipped,
        total
      );
    }
    log::debug!(
      "[VoxelData] Applied {} diffs in {:.2}ms",
      report.applied,
      start.elapsed().as_secs_f64() * 1000.0
    );
    Ok(report)
  }

  // ---------------------------------------------------------------------------
  // Inspection
  // ---------------------------------------------------------------------------

  /// Chunk positions to remesh for every edited leaf.
  pub fn dirty_chunk_positions(&self) -> Vec<IVec3> {
    let mut positions = Vec::new();
    self.root.dirty_chunk_positions(&mut positions);
    positions
  }

  pub fn stats(&self) -> OctreeStats {
    OctreeStats::collect(&self.root)
  }

  fn owns_leaf<R: LeafRecord>(&self, record: &R) -> bool {
    is_leaf_id_under(self.root.id(), self.root.depth(), record.leaf_id())
  }
}
