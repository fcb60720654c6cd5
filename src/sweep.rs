//! Main-pass engine: budgeted traversal of the whole grid as three
//! families of straight rows (X rows, Y rows, Z columns), each scanned
//! with the segmented long-trace scan.

use crate::grid::VoxelGrid;
use crate::query::{DebugDraw, SpatialQuery};
use crate::scan::{scan_row, ScanPolicy};

/// Which family of rows the main pass is currently scanning.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanPhase {
  /// One row per (y, z) pair, scanning along X.
  XRows,
  /// One row per (x, z) pair, scanning along Y.
  YRows,
  /// One column per (x, y) pair, scanning along Z.
  ZColumns,
}

impl ScanPhase {
  fn row_count(self, counts: (usize, usize, usize)) -> usize {
    let (cx, cy, cz) = counts;
    match self {
      ScanPhase::XRows => cy * cz,
      ScanPhase::YRows => cx * cz,
      ScanPhase::ZColumns => cx * cy,
    }
  }

  fn next(self) -> Option<ScanPhase> {
    match self {
      ScanPhase::XRows => Some(ScanPhase::YRows),
      ScanPhase::YRows => Some(ScanPhase::ZColumns),
      ScanPhase::ZColumns => None,
    }
  }
}

/// Progress report from one main-pass step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SweepProgress {
  /// Rows consumed from the budget this step.
  pub rows: usize,
  /// True once every phase is exhausted.
  pub complete: bool,
}

/// Cursor over the main-grid traversal: current phase plus the row index
/// within it. A row is always scanned atomically within one step.
#[derive(Clone, Copy, Debug)]
pub struct MainPass {
  phase: ScanPhase,
  row_cursor: usize,
  complete: bool,
}

impl Default for MainPass {
  fn default() -> Self {
    Self::new()
  }
}

impl MainPass {
  pub fn new() -> Self {
    Self {
      phase: ScanPhase::XRows,
      row_cursor: 0,
      complete: false,
    }
  }

  pub fn phase(&self) -> ScanPhase {
    self.phase
  }

  pub fn is_complete(&self) -> bool {
    self.complete
  }

  /// Flat indices of one row of the given phase, in traversal order.
  fn row_indices(grid: &VoxelGrid, phase: ScanPhase, row: usize) -> Vec<usize> {
    let (cx, cy, cz) = grid.counts();
    match phase {
      ScanPhase::XRows => {
        let (y, z) = (row % cy, row / cy);
        (0..cx).map(|x| grid.index(x, y, z)).collect()
      }
      ScanPhase::YRows => {
        let (x, z) = (row % cx, row / cx);
        (0..cy).map(|y| grid.index(x, y, z)).collect()
      }
      ScanPhase::ZColumns => {
        let (x, y) = (row % cx, row / cx);
        (0..cz).map(|z| grid.index(x, y, z)).collect()
      }
    }
  }

  /// Scan up to `budget` rows. Returns how many rows were consumed and
  /// whether the main pass finished within this step.
  pub fn step(
    &mut self,
    grid: &mut VoxelGrid,
    provider: &mut dyn SpatialQuery,
    draw: &mut dyn DebugDraw,
    policy: &ScanPolicy,
    budget: usize,
  ) -> SweepProgress {
    let mut progress = SweepProgress::default();
    if self.complete || grid.is_empty() {
      self.complete = true;
      progress.complete = true;
      return progress;
    }

    while progress.rows < budget {
      if self.row_cursor >= self.phase.row_count(grid.counts()) {
        match self.phase.next() {
          Some(next) => {
            tracing::trace!(?next, "main pass phase transition");
            self.phase = next;
            self.row_cursor = 0;
            continue;
          }
          None => {
            self.complete = true;
            progress.complete = true;
            return progress;
          }
        }
      }

      let row = Self::row_indices(grid, self.phase, self.row_cursor);
      scan_row(grid, provider, draw, &row, policy);
      self.row_cursor += 1;
      progress.rows += 1;
    }

    // Budget exhausted exactly at the end of the last phase still counts
    // as complete; don't force an idle extra step.
    if self.phase == ScanPhase::ZColumns
      && self.row_cursor >= self.phase.row_count(grid.counts())
    {
      self.complete = true;
      progress.complete = true;
    }
    progress
  }
}
