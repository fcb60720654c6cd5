//! Sub-sampling refinement of cells left hidden by the main pass.
//!
//! Main-grid sampling can miss narrow clear pockets: a cell counts as
//! hidden even though part of its volume has open sight lines. The
//! refiner subdivides each hidden cell into a finer scratch grid, runs the
//! same segmented scans internally, and flips the parent visible if any
//! sub-voxel turns out reachable. Refinement only ever flips hidden cells
//! to visible.

use crate::grid::VoxelGrid;
use crate::query::{DebugDraw, DrawColor, SpatialQuery};
use crate::scan::ScanPolicy;
use crate::sweep::MainPass;

/// Progress report from one refinement step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RefineProgress {
  /// Hidden cells consumed from the budget this step.
  pub cells: usize,
  /// True once every hidden cell has been visited.
  pub complete: bool,
}

/// Cursor over the list of hidden cells captured at the end of the main
/// pass. The list is built once, in ascending flat-index order.
#[derive(Clone, Debug)]
pub struct Refiner {
  hidden: Vec<usize>,
  cursor: usize,
  sub_counts: (usize, usize, usize),
}

impl Refiner {
  /// Capture the hidden cells of `grid` for refinement.
  pub fn from_grid(grid: &VoxelGrid, sub_counts: (usize, usize, usize)) -> Self {
    let hidden = grid.hidden_indices();
    tracing::debug!(hidden = hidden.len(), "sub-sampling refinement scheduled");
    Self {
      hidden,
      cursor: 0,
      sub_counts,
    }
  }

  /// Number of hidden cells captured for refinement.
  pub fn hidden_len(&self) -> usize {
    self.hidden.len()
  }

  pub fn is_complete(&self) -> bool {
    self.cursor >= self.hidden.len()
  }

  /// Refine up to `budget` hidden cells.
  pub fn step(
    &mut self,
    grid: &mut VoxelGrid,
    provider: &mut dyn SpatialQuery,
    draw: &mut dyn DebugDraw,
    policy: &ScanPolicy,
    budget: usize,
  ) -> RefineProgress {
    let mut progress = RefineProgress::default();

    while progress.cells < budget && self.cursor < self.hidden.len() {
      let index = self.hidden[self.cursor];
      self.cursor += 1;

      // Defensive: the once-only hidden list should never contain a cell
      // that turned visible, but skip without re-testing if it did.
      if grid.is_visible(index) {
        continue;
      }

      if Self::refine_cell(grid, index, self.sub_counts, provider, draw, policy) {
        grid.mark_visible(index);
      }
      progress.cells += 1;
    }

    progress.complete = self.is_complete();
    progress
  }

  /// Build a scratch sub-grid inside one cell and test its internal
  /// connectivity. Returns true if any sub-voxel has a clear path.
  fn refine_cell(
    grid: &VoxelGrid,
    index: usize,
    sub_counts: (usize, usize, usize),
    provider: &mut dyn SpatialQuery,
    draw: &mut dyn DebugDraw,
    policy: &ScanPolicy,
  ) -> bool {
    let aabb = grid.aabb_of(index);
    if !aabb.is_valid() {
      return false;
    }

    let (sx, sy, sz) = sub_counts;
    let mut sub = VoxelGrid::build(aabb, sx, sy, sz);
    if sub.is_empty() {
      return false;
    }
    draw.draw_box(aabb, DrawColor::CYAN, 0.0);

    // The sub-grid is discardable scratch state; only the answer matters.
    let mut pass = MainPass::new();
    loop {
      if pass
        .step(&mut sub, provider, draw, policy, usize::MAX)
        .complete
      {
        break;
      }
    }
    sub.visible_count() > 0
  }
}
