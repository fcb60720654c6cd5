//! Analysis coordinator: orchestrates grid building, the main visibility
//! pass, and sub-sampling refinement across budgeted steps.
//!
//! The analyzer is pull-based: the host calls [`VolumeAnalyzer::step`]
//! once per scheduling tick, and each call performs at most one budget's
//! worth of work. Only one run is active at a time; starting a new run
//! discards any in-flight state.

use glam::DVec3;
use thiserror::Error;
use tracing::{debug, info, trace, warn};

use crate::config::AnalysisConfig;
use crate::grid::VoxelGrid;
use crate::query::{DebugDraw, DrawColor, NoDebugDraw, SpatialQuery};
use crate::refine::Refiner;
use crate::scan::ScanPolicy;
use crate::sweep::MainPass;
use crate::types::Aabb3;

/// Why an analysis failed to start. The analyzer stays idle and remains
/// reusable after any of these.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum StartError {
  /// Fewer than two usable input points.
  #[error("insufficient input points: got {count}, need at least 2")]
  InsufficientPoints { count: usize },
  /// The input points collapse to an invalid bounding box.
  #[error("input points produce an invalid bounding box")]
  InvalidBounds,
}

/// Why a running analysis was halted without finalizing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HaltReason {
  /// The spatial query provider became unreachable.
  EnvironmentUnavailable,
}

/// Outcome of one [`VolumeAnalyzer::step`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepStatus {
  /// No run is active; the call was a no-op.
  Idle,
  /// Work was performed; more steps are needed.
  InProgress {
    /// Budget units (rows or cells) consumed this step.
    work_done: usize,
  },
  /// The run finished this step and its result was finalized. Reported
  /// exactly once per run.
  Completed,
  /// The run was halted without finalizing.
  Halted(HaltReason),
}

/// Finalized output of one completed run. Immutable once produced;
/// replaced wholesale by the next run's completion.
#[derive(Clone, Debug)]
pub struct AnalysisResult {
  grid: VoxelGrid,
  visible_count: usize,
  hidden_count: usize,
}

impl AnalysisResult {
  /// Snapshot of the analyzed grid.
  pub fn grid(&self) -> &VoxelGrid {
    &self.grid
  }

  pub fn visible_count(&self) -> usize {
    self.visible_count
  }

  pub fn hidden_count(&self) -> usize {
    self.hidden_count
  }
}

/// Phase of an in-flight run.
enum RunPhase {
  MainPass(MainPass),
  SubSampling(Refiner),
}

struct RunState {
  grid: VoxelGrid,
  phase: RunPhase,
  policy: ScanPolicy,
}

/// Progressive voxel visibility analyzer.
pub struct VolumeAnalyzer {
  config: AnalysisConfig,
  run: Option<RunState>,
  result: Option<AnalysisResult>,
  visible_count: usize,
  hidden_count: usize,
}

impl VolumeAnalyzer {
  pub fn new(config: AnalysisConfig) -> Self {
    Self {
      config,
      run: None,
      result: None,
      visible_count: 0,
      hidden_count: 0,
    }
  }

  pub fn config(&self) -> &AnalysisConfig {
    &self.config
  }

  /// Whether a run is in flight.
  pub fn is_running(&self) -> bool {
    self.run.is_some()
  }

  /// Start a new analysis over the AABB of the given points.
  ///
  /// Requires at least two usable points and a valid resulting box. On
  /// failure the analyzer stays idle; the previous result is untouched
  /// either way until the new run completes.
  pub fn start_analysis(&mut self, points: &[DVec3]) -> Result<(), StartError> {
    if points.len() < 2 {
      warn!(count = points.len(), "start_analysis: insufficient input points");
      self.run = None;
      return Err(StartError::InsufficientPoints {
        count: points.len(),
      });
    }
    let aabb = Aabb3::from_points(points.iter().copied());
    self.start_analysis_in_box(aabb)
  }

  /// Start a new analysis over an explicit region.
  pub fn start_analysis_in_box(&mut self, aabb: Aabb3) -> Result<(), StartError> {
    if !aabb.is_valid() {
      warn!("start_analysis: computed bounding box is invalid");
      self.run = None;
      return Err(StartError::InvalidBounds);
    }

    let grid = VoxelGrid::build(
      aabb,
      self.config.count_x,
      self.config.count_y,
      self.config.count_z,
    );
    let policy = ScanPolicy::resolve(&self.config, grid.cell_size());
    info!(boxes = grid.len(), "start_analysis: voxel grid generated");

    self.run = Some(RunState {
      grid,
      phase: RunPhase::MainPass(MainPass::new()),
      policy,
    });
    Ok(())
  }

  /// Halt the current run without finalizing. The last completed result
  /// is unaffected.
  pub fn stop_analysis(&mut self) {
    self.run = None;
  }

  /// Discard in-flight state and any previously finalized result.
  pub fn clear_results(&mut self) {
    self.run = None;
    self.result = None;
    self.visible_count = 0;
    self.hidden_count = 0;
  }

  /// Last finalized result, if any.
  pub fn results(&self) -> Option<&AnalysisResult> {
    self.result.as_ref()
  }

  pub fn visible_count(&self) -> usize {
    self.visible_count
  }

  pub fn hidden_count(&self) -> usize {
    self.hidden_count
  }

  /// Visibility percentage of the last finalized result (0-100).
  pub fn visibility_percentage(&self) -> f64 {
    let total = self.visible_count + self.hidden_count;
    if total == 0 {
      return 0.0;
    }
    self.visible_count as f64 * 100.0 / total as f64
  }

  /// Advance the analysis by one budgeted step.
  pub fn step(&mut self, provider: &mut dyn SpatialQuery) -> StepStatus {
    self.step_with_draw(provider, &mut NoDebugDraw)
  }

  /// [`VolumeAnalyzer::step`] with a debug-draw sink attached.
  pub fn step_with_draw(
    &mut self,
    provider: &mut dyn SpatialQuery,
    draw: &mut dyn DebugDraw,
  ) -> StepStatus {
    let Some(mut run) = self.run.take() else {
      return StepStatus::Idle;
    };

    if !provider.available() {
      warn!("step: spatial query provider unavailable, halting analysis");
      return StepStatus::Halted(HaltReason::EnvironmentUnavailable);
    }

    let budget = self.config.rows_per_step.max(1);
    let mut work_done = 0;

    if let RunPhase::MainPass(ref mut pass) = run.phase {
      let progress = pass.step(&mut run.grid, provider, draw, &run.policy, budget);
      work_done += progress.rows;
      if !progress.complete {
        trace!(rows = progress.rows, "step: main pass in progress");
        self.run = Some(run);
        return StepStatus::InProgress { work_done };
      }

      // Main pass done. Move into refinement if it is enabled and there
      // is anything left to refine; otherwise finalize right away.
      let refiner = self
        .config
        .sub_sampling
        .then(|| {
          Refiner::from_grid(
            &run.grid,
            (
              self.config.sub_count_x,
              self.config.sub_count_y,
              self.config.sub_count_z,
            ),
          )
        })
        .filter(|r| r.hidden_len() > 0);

      match refiner {
        Some(refiner) => {
          debug!(
            hidden = refiner.hidden_len(),
            "step: main pass complete, entering sub-sampling"
          );
          run.phase = RunPhase::SubSampling(refiner);
        }
        None => {
          self.finalize(run, draw);
          return StepStatus::Completed;
        }
      }
    }

    if let RunPhase::SubSampling(ref mut refiner) = run.phase {
      // Use whatever budget remains in this step so a main pass finishing
      // early does not waste the tick.
      let remaining = budget.saturating_sub(work_done);
      if remaining == 0 {
        self.run = Some(run);
        return StepStatus::InProgress { work_done };
      }
      let progress = refiner.step(&mut run.grid, provider, draw, &run.policy, remaining);
      work_done += progress.cells;
      if !progress.complete {
        self.run = Some(run);
        return StepStatus::InProgress { work_done };
      }
    }

    self.finalize(run, draw);
    StepStatus::Completed
  }

  /// Recompute final counts, snapshot the grid, and publish the result.
  fn finalize(&mut self, run: RunState, draw: &mut dyn DebugDraw) {
    let visible = run.grid.visible_count();
    let hidden = run.grid.hidden_count();
    self.visible_count = visible;
    self.hidden_count = hidden;

    for index in 0..run.grid.len() {
      if let Some(center) = run.grid.center_of(index) {
        let color = if run.grid.is_visible(index) {
          DrawColor::GREEN
        } else {
          DrawColor::RED
        };
        draw.draw_point(center, color, 0.0);
      }
    }

    info!(
      boxes = run.grid.len(),
      visible, hidden, "analysis complete"
    );
    self.result = Some(AnalysisResult {
      grid: run.grid,
      visible_count: visible,
      hidden_count: hidden,
    });
  }
}

#[cfg(test)]
#[path = "analyzer_test.rs"]
mod analyzer_test;
