//! Shared corner points stored in an arena.
//!
//! Adjacent voxels share corner geometry by holding the same
//! [`PointHandle`]: moving the point through any handle moves it for every
//! box that references it. Handles index into a [`PointArena`] owned by the
//! grid, so no reference counting or pointer graph is needed.

use glam::DVec3;

/// Handle to a point in a [`PointArena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PointHandle(u32);

impl PointHandle {
  #[inline]
  pub(crate) fn index(self) -> usize {
    self.0 as usize
  }
}

/// Arena of shared, individually settable 3D points.
///
/// Each slot is either unset (allocated but never assigned a coordinate)
/// or holds a position. A slot lives as long as the arena; aliasing a
/// handle is how corner sharing is expressed.
#[derive(Clone, Debug, Default)]
pub struct PointArena {
  slots: Vec<Option<DVec3>>,
}

impl PointArena {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_capacity(capacity: usize) -> Self {
    Self {
      slots: Vec::with_capacity(capacity),
    }
  }

  /// Allocate an unset point.
  pub fn alloc(&mut self) -> PointHandle {
    self.slots.push(None);
    PointHandle((self.slots.len() - 1) as u32)
  }

  /// Allocate a point with an initial position.
  pub fn alloc_at(&mut self, position: DVec3) -> PointHandle {
    self.slots.push(Some(position));
    PointHandle((self.slots.len() - 1) as u32)
  }

  /// Get the position behind a handle, if it has been set.
  #[inline]
  pub fn get(&self, handle: PointHandle) -> Option<DVec3> {
    self.slots.get(handle.index()).copied().flatten()
  }

  /// Set the position behind a handle. Visible through every alias.
  pub fn set(&mut self, handle: PointHandle, position: DVec3) {
    if let Some(slot) = self.slots.get_mut(handle.index()) {
      *slot = Some(position);
    }
  }

  /// Whether the handle's point has been assigned a coordinate.
  #[inline]
  pub fn is_set(&self, handle: PointHandle) -> bool {
    self.get(handle).is_some()
  }

  /// Number of allocated slots.
  pub fn len(&self) -> usize {
    self.slots.len()
  }

  pub fn is_empty(&self) -> bool {
    self.slots.is_empty()
  }
}
