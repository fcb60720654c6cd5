//! Linked voxel boxes: eight shared corner points plus a visibility bit.

use glam::DVec3;
use smallvec::SmallVec;

use crate::arena::{PointArena, PointHandle};
use crate::types::Aabb3;

/// One of the eight corners of a voxel box.
///
/// Naming is vertical (Top/Bottom, +Z up), depth (Forward/Backward, +X
/// forward), then lateral (Left/Right, +Y right).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Corner {
  BottomBackwardLeft,
  BottomBackwardRight,
  BottomForwardLeft,
  BottomForwardRight,
  TopBackwardLeft,
  TopBackwardRight,
  TopForwardLeft,
  TopForwardRight,
}

impl Corner {
  /// All eight corners, in storage order.
  pub const ALL: [Corner; 8] = [
    Corner::BottomBackwardLeft,
    Corner::BottomBackwardRight,
    Corner::BottomForwardLeft,
    Corner::BottomForwardRight,
    Corner::TopBackwardLeft,
    Corner::TopBackwardRight,
    Corner::TopForwardLeft,
    Corner::TopForwardRight,
  ];

  /// Storage index of this corner within a box.
  #[inline]
  pub fn index(self) -> usize {
    match self {
      Corner::BottomBackwardLeft => 0,
      Corner::BottomBackwardRight => 1,
      Corner::BottomForwardLeft => 2,
      Corner::BottomForwardRight => 3,
      Corner::TopBackwardLeft => 4,
      Corner::TopBackwardRight => 5,
      Corner::TopForwardLeft => 6,
      Corner::TopForwardRight => 7,
    }
  }

  /// Unit lattice offset of this corner: (x: forward, y: right, z: up).
  #[inline]
  pub fn unit_offset(self) -> (usize, usize, usize) {
    let i = self.index();
    // Bit layout of `index`: bit 0 = right, bit 1 = forward, bit 2 = top.
    (i >> 1 & 1, i & 1, i >> 2 & 1)
  }

  /// Canonical name used by the JSON codec.
  pub fn name(self) -> &'static str {
    match self {
      Corner::BottomBackwardLeft => "Bottom_Backward_Left",
      Corner::BottomBackwardRight => "Bottom_Backward_Right",
      Corner::BottomForwardLeft => "Bottom_Forward_Left",
      Corner::BottomForwardRight => "Bottom_Forward_Right",
      Corner::TopBackwardLeft => "Top_Backward_Left",
      Corner::TopBackwardRight => "Top_Backward_Right",
      Corner::TopForwardLeft => "Top_Forward_Left",
      Corner::TopForwardRight => "Top_Forward_Right",
    }
  }

  /// Parse a canonical corner name. Unknown names yield `None`.
  pub fn from_name(name: &str) -> Option<Corner> {
    Corner::ALL.into_iter().find(|c| c.name() == name)
  }
}

/// A voxel cell: eight corner handles into a [`PointArena`] plus a single
/// visibility bit (hidden by default).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VoxelBox {
  corners: [PointHandle; 8],
  /// Whether any clear path to a visible-eligible neighbor was found.
  pub visible: bool,
}

impl VoxelBox {
  /// Create a box with eight freshly allocated, unset corners.
  pub fn new_unset(arena: &mut PointArena) -> Self {
    let corners = std::array::from_fn(|_| arena.alloc());
    Self {
      corners,
      visible: false,
    }
  }

  /// Create a box from pre-allocated corner handles (used by the grid
  /// builder so adjacent cells share lattice points).
  pub fn from_corners(corners: [PointHandle; 8]) -> Self {
    Self {
      corners,
      visible: false,
    }
  }

  /// Handle of one corner.
  #[inline]
  pub fn corner(&self, corner: Corner) -> PointHandle {
    self.corners[corner.index()]
  }

  /// Replace one corner's handle with another box's corner handle, so
  /// both boxes reference the same underlying point.
  pub fn link_corner(&mut self, corner: Corner, other: &VoxelBox, other_corner: Corner) {
    self.corners[corner.index()] = other.corner(other_corner);
  }

  /// Positions of all currently set corners.
  pub fn set_corners(&self, arena: &PointArena) -> SmallVec<[DVec3; 8]> {
    self
      .corners
      .iter()
      .filter_map(|&h| arena.get(h))
      .collect()
  }

  /// Arithmetic mean of the set corners.
  ///
  /// Requires at least two set corners (the degenerate two-opposite-corner
  /// construction path); returns `None` below that.
  pub fn center(&self, arena: &PointArena) -> Option<DVec3> {
    let pts = self.set_corners(arena);
    if pts.len() < 2 {
      return None;
    }
    let sum: DVec3 = pts.iter().copied().sum();
    Some(sum / pts.len() as f64)
  }

  /// AABB spanned by the set corners. Invalid below two set corners.
  pub fn aabb(&self, arena: &PointArena) -> Aabb3 {
    let pts = self.set_corners(arena);
    if pts.len() < 2 {
      return Aabb3::empty();
    }
    Aabb3::from_points(pts)
  }
}
