//! RegionQuery - box sampling request routed through the octree.
//!
//! ```text
//!   world space                          destination array
//!   ┌───────────────┐                    ┌─────────────────────────┐
//!   │ start ──┐     │                    │   offset ──┐            │
//!   │         ▼     │   sample every     │            ▼            │
//!   │         ┌───┐ │   `step` voxels    │            ┌───┐        │
//!   │         │box│ │ ─────────────────► │            │box│        │
//!   │         └───┘ │                    │            └───┘        │
//!   │          size │                    │             array_size  │
//!   └───────────────┘                    └─────────────────────────┘
//! ```
//!
//! A sample at `start + local` lands at destination index
//! `(offset + local)` with strides `(1, array_size.x, array_size.x * array_size.y)`.
//! `local` takes the values `0, step, 2 * step, ...` below `size` on each axis.

use glam::IVec3;
use smallvec::SmallVec;

/// Axis-aligned box sampling request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RegionQuery {
  /// First sampled voxel in world coordinates.
  pub start: IVec3,
  /// Destination position of the first sample.
  pub offset: IVec3,
  /// Distance between samples along every axis.
  pub step: i32,
  /// Extent of the box in voxels (exclusive end at `start + size`).
  pub size: IVec3,
  /// Dimensions of the destination array.
  pub array_size: IVec3,
}

/// One piece of a query after splitting at a node center, tagged with the
/// child index it belongs to.
pub type SplitQuery = (usize, RegionQuery);

#[derive(Clone, Copy)]
struct AxisPart {
  upper: bool,
  start: i32,
  size: i32,
  offset: i32,
}

impl RegionQuery {
  /// Dense query writing the box `[start, start + size)` into an array of
  /// exactly `size`.
  pub fn new(start: IVec3, size: IVec3) -> Self {
    Self {
      start,
      offset: IVec3::ZERO,
      step: 1,
      size,
      array_size: size,
    }
  }

  pub fn with_offset(mut self, offset: IVec3) -> Self {
    self.offset = offset;
    self
  }

  pub fn with_step(mut self, step: i32) -> Self {
    debug_assert!(step > 0, "Step must be positive");
    self.step = step;
    self
  }

  pub fn with_array_size(mut self, array_size: IVec3) -> Self {
    self.array_size = array_size;
    self
  }

  /// Exclusive end corner.
  #[inline]
  pub fn end(&self) -> IVec3 {
    self.start + self.size
  }

  /// Returns true if no voxel is sampled.
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.size.cmple(IVec3::ZERO).any()
  }

  /// Number of entries the destination array must hold.
  #[inline]
  pub fn dest_len(&self) -> usize {
    self.array_size.x as usize * self.array_size.y as usize * self.array_size.z as usize
  }

  /// Destination index of the sample at `start + local`.
  #[inline]
  pub fn dest_index(&self, local: IVec3) -> usize {
    let p = self.offset + local;
    debug_assert!(
      p.cmpge(IVec3::ZERO).all() && p.cmplt(self.array_size).all(),
      "Destination {:?} outside array {:?}",
      p,
      self.array_size
    );
    p.x as usize
      + self.array_size.x as usize * p.y as usize
      + self.array_size.x as usize * self.array_size.y as usize * p.z as usize
  }

  /// Visit every sampled local offset, X fastest.
  #[inline]
  pub fn for_each_local(&self, mut f: impl FnMut(IVec3)) {
    let step = self.step as usize;
    for z in (0..self.size.z.max(0)).step_by(step) {
      for y in (0..self.size.y.max(0)).step_by(step) {
        for x in (0..self.size.x.max(0)).step_by(step) {
          f(IVec3::new(x, y, z));
        }
      }
    }
  }

  /// Number of samples taken.
  pub fn sample_count(&self) -> usize {
    let step = self.step;
    let per_axis = |size: i32| {
      if size <= 0 {
        0
      } else {
        ((size + step - 1) / step) as usize
      }
    };
    per_axis(self.size.x) * per_axis(self.size.y) * per_axis(self.size.z)
  }

  /// Split the query at `center` on every axis the box straddles.
  ///
  /// Yields 1, 2, 4 or 8 non-empty pieces, each tagged with the child index
  /// `(x >= cx) + 2 * (y >= cy) + 4 * (z >= cz)` of the half it lies in.
  /// Upper pieces start on the first sample at or above the center, so the
  /// sampling lattice is preserved for `step > 1`.
  pub fn split(&self, center: IVec3) -> SmallVec<[SplitQuery; 8]> {
    let xs = self.axis_parts(self.start.x, self.size.x, self.offset.x, center.x);
    let ys = self.axis_parts(self.start.y, self.size.y, self.offset.y, center.y);
    let zs = self.axis_parts(self.start.z, self.size.z, self.offset.z, center.z);

    let mut out = SmallVec::new();
    for z in &zs {
      for y in &ys {
        for x in &xs {
          let child = x.upper as usize + 2 * y.upper as usize + 4 * z.upper as usize;
          out.push((
            child,
            RegionQuery {
              start: IVec3::new(x.start, y.start, z.start),
              offset: IVec3::new(x.offset, y.offset, z.offset),
              step: self.step,
              size: IVec3::new(x.size, y.size, z.size),
              array_size: self.array_size,
            },
          ));
        }
      }
    }
    out
  }

  fn axis_parts(&self, start: i32, size: i32, offset: i32, center: i32) -> SmallVec<[AxisPart; 2]> {
    let end = start + size;
    let mut parts = SmallVec::new();

    // Entirely below or entirely at/above the split plane
    if end <= center || start >= center {
      parts.push(AxisPart {
        upper: start >= center,
        start,
        size,
        offset,
      });
      return parts;
    }

    parts.push(AxisPart {
      upper: false,
      start,
      size: center - start,
      offset,
    });

    let step = self.step;
    let first = start + (center - start + step - 1) / step * step;
    if first < end {
      parts.push(AxisPart {
        upper: true,
        start: first,
        size: end - first,
        offset: offset + (first - start),
      });
    }
    parts
  }
}

#[cfg(test)]
#[path = "region_test.rs"]
mod region_test;
