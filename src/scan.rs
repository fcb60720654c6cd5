//! Segmented long-trace scanning of grid rows.
//!
//! Instead of tracing every adjacent cell pair, a row scan issues one
//! line-of-sight query from the first untested cell to the farthest cell
//! permitted by the trace-distance cap. A clear query marks the whole span
//! in one go; an obstructed query marks the cells in front of the hit and
//! resumes just past the obstruction. The marking is equivalent to
//! pairwise adjacent tracing, at O(n / span) queries per row.

use glam::DVec3;

use crate::config::AnalysisConfig;
use crate::grid::VoxelGrid;
use crate::query::{DebugDraw, DrawColor, SpatialQuery};

/// Resolved per-run scanning policy.
#[derive(Clone, Copy, Debug)]
pub struct ScanPolicy {
  /// Longest segment a single query may cover. 0 = unlimited.
  pub max_trace_distance: f64,
  /// Center-occupancy probe radius; `None` disables the probe.
  pub overlap_radius: Option<f64>,
  /// Also probe backward from the far endpoint of an obstructed span.
  pub symmetric_span_marking: bool,
}

impl ScanPolicy {
  /// Resolve the policy for a grid with the given per-axis cell size.
  ///
  /// The automatic probe radius is 25% of the smallest per-axis cell size,
  /// clamped away from zero so a flat axis cannot collapse it.
  pub fn resolve(config: &AnalysisConfig, cell_size: DVec3) -> Self {
    let overlap_radius = config.center_overlap_test.then(|| {
      if config.center_overlap_radius > 0.0 {
        config.center_overlap_radius
      } else {
        0.25 * cell_size.min_element().max(0.001)
      }
    });
    Self {
      max_trace_distance: config.max_trace_distance,
      overlap_radius,
      symmetric_span_marking: config.symmetric_span_marking,
    }
  }
}

/// Mark one cell visible, subject to the center-occupancy probe.
///
/// Already-visible cells are left alone without re-probing; marking is
/// strictly monotone within a run.
fn mark_cell(
  grid: &mut VoxelGrid,
  index: usize,
  center: DVec3,
  policy: &ScanPolicy,
  provider: &mut dyn SpatialQuery,
) {
  if grid.is_visible(index) {
    return;
  }
  if let Some(radius) = policy.overlap_radius {
    if !provider.sphere_clear(center, radius) {
      return;
    }
  }
  grid.mark_visible(index);
}

/// Scan one row (or column) of cell indices with segmented long traces.
///
/// `row` lists flat grid indices whose centers lie on a straight line in
/// traversal order. Returns the number of line-of-sight queries issued.
pub fn scan_row(
  grid: &mut VoxelGrid,
  provider: &mut dyn SpatialQuery,
  draw: &mut dyn DebugDraw,
  row: &[usize],
  policy: &ScanPolicy,
) -> usize {
  let mut centers = Vec::with_capacity(row.len());
  for &idx in row {
    match grid.center_of(idx) {
      Some(c) => centers.push(c),
      // Builder grids always have fully populated boxes; a partially
      // populated row is not scannable.
      None => return 0,
    }
  }

  let mut queries = 0;
  let mut start = 0;
  while start + 1 < row.len() {
    // Farthest cell reachable within the trace-distance cap.
    let mut end = row.len() - 1;
    if policy.max_trace_distance > 0.0 {
      while end > start && centers[start].distance(centers[end]) > policy.max_trace_distance {
        end -= 1;
      }
    }
    if end == start {
      // Even the nearest neighbor is beyond the cap; this anchor cannot
      // establish connectivity.
      start += 1;
      continue;
    }

    let trace = provider.line_of_sight(centers[start], centers[end]);
    queries += 1;
    draw.draw_line(
      centers[start],
      centers[end],
      if trace.clear {
        DrawColor::GREEN
      } else {
        DrawColor::RED
      },
      0.0,
    );

    if trace.clear {
      for i in start..=end {
        mark_cell(grid, row[i], centers[i], policy, provider);
      }
      // A cap-truncated span re-anchors on its own far cell so spans
      // chain without gaps; otherwise the row is exhausted. Resuming one
      // past a truncated span can orphan a trailing cell no query would
      // ever reach.
      start = if end == row.len() - 1 { end + 1 } else { end };
    } else {
      let span = end - start;
      let fraction = trace.hit_fraction.clamp(0.0, 1.0);
      // Last cell whose center lies in front of the obstruction. The span
      // anchor itself always qualifies.
      let hit = start + ((fraction * span as f64).floor() as usize).min(span);
      for i in start..=hit {
        mark_cell(grid, row[i], centers[i], policy, provider);
      }

      if policy.symmetric_span_marking && hit < end {
        queries += scan_span_backward(grid, provider, draw, row, &centers, hit + 1, end, policy);
      }

      // Resume immediately after the obstruction. Cells past it are only
      // reachable through a fresh anchor; the scan never looks through an
      // obstruction within one query.
      start = hit + 1;
    }
  }

  queries
}

/// Probe an obstructed sub-span from its far endpoint back toward the
/// obstruction, marking the cells the reverse query can reach. The far
/// endpoint itself is an always-eligible anchor, mirroring the forward
/// scan's treatment of the span start.
fn scan_span_backward(
  grid: &mut VoxelGrid,
  provider: &mut dyn SpatialQuery,
  draw: &mut dyn DebugDraw,
  row: &[usize],
  centers: &[DVec3],
  lo: usize,
  hi: usize,
  policy: &ScanPolicy,
) -> usize {
  if lo >= hi {
    // Only the endpoint remains past the obstruction; no segment to probe.
    mark_cell(grid, row[hi], centers[hi], policy, provider);
    return 0;
  }
  let trace = provider.line_of_sight(centers[hi], centers[lo]);
  draw.draw_line(
    centers[hi],
    centers[lo],
    if trace.clear {
      DrawColor::GREEN
    } else {
      DrawColor::RED
    },
    0.0,
  );

  let span = hi - lo;
  let first = if trace.clear {
    lo
  } else {
    let fraction = trace.hit_fraction.clamp(0.0, 1.0);
    hi - ((fraction * span as f64).floor() as usize).min(span)
  };
  for i in first..=hi {
    mark_cell(grid, row[i], centers[i], policy, provider);
  }
  1
}

#[cfg(test)]
#[path = "scan_test.rs"]
mod scan_test;
