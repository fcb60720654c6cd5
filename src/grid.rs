//! Voxel grid: flattened 3D array of linked boxes plus the shared corner
//! arena, and the builder that decomposes an AABB into cells.

use glam::DVec3;

use crate::arena::PointArena;
use crate::types::Aabb3;
use crate::voxel::{Corner, VoxelBox};

/// A 3D sampling grid of [`VoxelBox`] cells.
///
/// Boxes are stored z-major, then y, then x:
/// `index(x, y, z) = z * (count_y * count_x) + y * count_x + x`.
/// Adjacent cells share their face corner points through the arena.
#[derive(Clone, Debug)]
pub struct VoxelGrid {
  arena: PointArena,
  boxes: Vec<VoxelBox>,
  count_x: usize,
  count_y: usize,
  count_z: usize,
  /// Per-axis cell size, used for overlap-radius auto scaling.
  cell_size: DVec3,
}

impl VoxelGrid {
  /// Decompose `aabb` into `count_x * count_y * count_z` equal cells.
  ///
  /// Each axis is partitioned into `count` cells of width `size / count`,
  /// so the cells tile the AABB exactly. Every box gets all eight corners
  /// set to the cell's actual corner coordinates and starts hidden. A zero
  /// count on any axis yields an empty (but usable) grid.
  pub fn build(aabb: Aabb3, count_x: usize, count_y: usize, count_z: usize) -> Self {
    if !aabb.is_valid() || count_x == 0 || count_y == 0 || count_z == 0 {
      return Self {
        arena: PointArena::new(),
        boxes: Vec::new(),
        count_x,
        count_y,
        count_z,
        cell_size: DVec3::ZERO,
      };
    }

    let size = aabb.size();
    let step = DVec3::new(
      size.x / count_x as f64,
      size.y / count_y as f64,
      size.z / count_z as f64,
    );

    // Corner lattice is one point wider than the cell grid on each axis.
    // Allocating it up front makes corner sharing fall out of handle reuse.
    let (lx, ly, lz) = (count_x + 1, count_y + 1, count_z + 1);
    let mut arena = PointArena::with_capacity(lx * ly * lz);
    let mut lattice = Vec::with_capacity(lx * ly * lz);
    for z in 0..lz {
      for y in 0..ly {
        for x in 0..lx {
          let p = aabb.min
            + DVec3::new(x as f64 * step.x, y as f64 * step.y, z as f64 * step.z);
          lattice.push(arena.alloc_at(p));
        }
      }
    }
    let lattice_index = |x: usize, y: usize, z: usize| z * (ly * lx) + y * lx + x;

    let mut boxes = Vec::with_capacity(count_x * count_y * count_z);
    for z in 0..count_z {
      for y in 0..count_y {
        for x in 0..count_x {
          // Storage order of Corner::ALL matches Corner::index.
          let corners = std::array::from_fn(|i| {
            let (dx, dy, dz) = Corner::ALL[i].unit_offset();
            lattice[lattice_index(x + dx, y + dy, z + dz)]
          });
          boxes.push(VoxelBox::from_corners(corners));
        }
      }
    }

    Self {
      arena,
      boxes,
      count_x,
      count_y,
      count_z,
      cell_size: step,
    }
  }

  /// Flat index of cell (x, y, z).
  #[inline]
  pub fn index(&self, x: usize, y: usize, z: usize) -> usize {
    z * (self.count_y * self.count_x) + y * self.count_x + x
  }

  /// Inverse of [`VoxelGrid::index`].
  #[inline]
  pub fn coords(&self, index: usize) -> (usize, usize, usize) {
    let layer = self.count_y * self.count_x;
    let z = index / layer;
    let rem = index % layer;
    (rem % self.count_x, rem / self.count_x, z)
  }

  pub fn counts(&self) -> (usize, usize, usize) {
    (self.count_x, self.count_y, self.count_z)
  }

  /// Per-axis cell size.
  pub fn cell_size(&self) -> DVec3 {
    self.cell_size
  }

  pub fn len(&self) -> usize {
    self.boxes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.boxes.is_empty()
  }

  pub fn arena(&self) -> &PointArena {
    &self.arena
  }

  pub fn boxes(&self) -> &[VoxelBox] {
    &self.boxes
  }

  #[inline]
  pub fn get(&self, index: usize) -> Option<&VoxelBox> {
    self.boxes.get(index)
  }

  /// Center of one cell (mean of its set corners).
  #[inline]
  pub fn center_of(&self, index: usize) -> Option<DVec3> {
    self.boxes.get(index).and_then(|b| b.center(&self.arena))
  }

  /// AABB of one cell, re-derived from its corners.
  pub fn aabb_of(&self, index: usize) -> Aabb3 {
    self
      .boxes
      .get(index)
      .map(|b| b.aabb(&self.arena))
      .unwrap_or_else(Aabb3::empty)
  }

  #[inline]
  pub fn is_visible(&self, index: usize) -> bool {
    self.boxes.get(index).is_some_and(|b| b.visible)
  }

  /// Mark one cell visible. Marking is monotone; there is no unmark.
  pub fn mark_visible(&mut self, index: usize) {
    if let Some(b) = self.boxes.get_mut(index) {
      b.visible = true;
    }
  }

  /// Alias one box's corner to another box's corner so both reference the
  /// same shared point.
  pub fn link_corner(&mut self, a: usize, a_corner: Corner, b: usize, b_corner: Corner) {
    if a == b {
      return;
    }
    if let Some(other) = self.boxes.get(b).copied() {
      if let Some(target) = self.boxes.get_mut(a) {
        target.link_corner(a_corner, &other, b_corner);
      }
    }
  }

  pub fn visible_count(&self) -> usize {
    self.boxes.iter().filter(|b| b.visible).count()
  }

  pub fn hidden_count(&self) -> usize {
    self.boxes.len() - self.visible_count()
  }

  /// Flat indices of all hidden cells, in ascending order.
  pub fn hidden_indices(&self) -> Vec<usize> {
    self
      .boxes
      .iter()
      .enumerate()
      .filter(|(_, b)| !b.visible)
      .map(|(i, _)| i)
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn unit_box() -> Aabb3 {
    Aabb3::new(DVec3::ZERO, DVec3::splat(10.0))
  }

  #[test]
  fn test_build_counts_and_len() {
    let grid = VoxelGrid::build(unit_box(), 4, 3, 2);
    assert_eq!(grid.counts(), (4, 3, 2));
    assert_eq!(grid.len(), 24);
    assert!(grid.boxes().iter().all(|b| !b.visible));
  }

  #[test]
  fn test_index_roundtrip() {
    let grid = VoxelGrid::build(unit_box(), 4, 3, 2);
    for z in 0..2 {
      for y in 0..3 {
        for x in 0..4 {
          let idx = grid.index(x, y, z);
          assert_eq!(grid.coords(idx), (x, y, z));
        }
      }
    }
  }

  #[test]
  fn test_cells_tile_aabb_exactly() {
    let grid = VoxelGrid::build(unit_box(), 2, 1, 1);
    assert_eq!(grid.cell_size(), DVec3::new(5.0, 10.0, 10.0));

    let first = grid.aabb_of(0);
    let second = grid.aabb_of(1);
    assert_eq!(first.min, DVec3::ZERO);
    assert_eq!(first.max, DVec3::new(5.0, 10.0, 10.0));
    assert_eq!(second.min, DVec3::new(5.0, 0.0, 0.0));
    assert_eq!(second.max, DVec3::splat(10.0));
  }

  #[test]
  fn test_centers() {
    let grid = VoxelGrid::build(unit_box(), 2, 1, 1);
    assert_eq!(grid.center_of(0), Some(DVec3::new(2.5, 5.0, 5.0)));
    assert_eq!(grid.center_of(1), Some(DVec3::new(7.5, 5.0, 5.0)));
  }

  #[test]
  fn test_neighbors_share_corner_points() {
    let grid = VoxelGrid::build(unit_box(), 2, 1, 1);
    let a = &grid.boxes()[0];
    let b = &grid.boxes()[1];
    // Right face of cell 0 is the left face of cell 1: same handles.
    assert_eq!(
      a.corner(Corner::BottomBackwardRight),
      b.corner(Corner::BottomBackwardLeft)
    );
    assert_eq!(
      a.corner(Corner::TopForwardRight),
      b.corner(Corner::TopForwardLeft)
    );
  }

  #[test]
  fn test_shared_corner_mutation_moves_both_cells() {
    let mut grid = VoxelGrid::build(unit_box(), 2, 1, 1);
    let shared = grid.boxes()[0].corner(Corner::TopForwardRight);
    grid.arena.set(shared, DVec3::new(6.0, 10.0, 10.0));
    let b = &grid.boxes()[1];
    assert_eq!(
      grid.arena().get(b.corner(Corner::TopForwardLeft)),
      Some(DVec3::new(6.0, 10.0, 10.0))
    );
  }

  #[test]
  fn test_zero_count_axis_gives_empty_grid() {
    let grid = VoxelGrid::build(unit_box(), 0, 3, 2);
    assert!(grid.is_empty());
    assert_eq!(grid.visible_count(), 0);
    assert_eq!(grid.hidden_count(), 0);
  }

  #[test]
  fn test_invalid_aabb_gives_empty_grid() {
    let grid = VoxelGrid::build(Aabb3::empty(), 2, 2, 2);
    assert!(grid.is_empty());
  }

  #[test]
  fn test_mark_visible_and_counts() {
    let mut grid = VoxelGrid::build(unit_box(), 2, 2, 1);
    grid.mark_visible(3);
    assert!(grid.is_visible(3));
    assert_eq!(grid.visible_count(), 1);
    assert_eq!(grid.hidden_count(), 3);
    assert_eq!(grid.hidden_indices(), vec![0, 1, 2]);
  }

  #[test]
  fn test_link_corner() {
    let mut grid = VoxelGrid::build(unit_box(), 2, 1, 1);
    grid.link_corner(0, Corner::BottomBackwardLeft, 1, Corner::TopForwardRight);
    assert_eq!(
      grid.boxes()[0].corner(Corner::BottomBackwardLeft),
      grid.boxes()[1].corner(Corner::TopForwardRight)
    );
  }
}
