//! Analysis configuration.

/// Configuration for a volume visibility analysis.
///
/// Trace-channel selection and self-ignore filtering live with the host's
/// [`SpatialQuery`](crate::query::SpatialQuery) implementation, since only
/// the host knows what those mean for its scene.
#[derive(Clone, Debug)]
pub struct AnalysisConfig {
  /// Main-grid sample count along X. Zero yields an empty grid that
  /// finishes immediately with zero counts.
  pub count_x: usize,
  /// Main-grid sample count along Y.
  pub count_y: usize,
  /// Main-grid sample count along Z.
  pub count_z: usize,

  /// Longest segment a single long-trace query may cover. 0 = unlimited
  /// (whole row).
  pub max_trace_distance: f64,

  /// Require a clear small-sphere probe at a cell's center before marking
  /// it visible. Prevents marking a cell whose own volume is occupied just
  /// because a ray grazed past it.
  pub center_overlap_test: bool,
  /// Probe radius. <= 0 selects the automatic radius: 25% of the smallest
  /// per-axis cell size (clamped away from zero).
  pub center_overlap_radius: f64,

  /// Refine still-hidden cells with a finer internal grid after the main
  /// pass.
  pub sub_sampling: bool,
  /// Sub-grid sample count along X.
  pub sub_count_x: usize,
  /// Sub-grid sample count along Y.
  pub sub_count_y: usize,
  /// Sub-grid sample count along Z.
  pub sub_count_z: usize,

  /// Work budget per step: rows (main pass) or cells (refinement) handled
  /// per call.
  pub rows_per_step: usize,

  /// On an obstructed span, additionally probe backward from the far
  /// endpoint so cells behind the obstruction can be marked from that
  /// side within the same scan.
  pub symmetric_span_marking: bool,
}

impl Default for AnalysisConfig {
  fn default() -> Self {
    Self {
      count_x: 10,
      count_y: 10,
      count_z: 10,
      max_trace_distance: 0.0,
      center_overlap_test: false,
      center_overlap_radius: 0.0,
      sub_sampling: false,
      sub_count_x: 2,
      sub_count_y: 2,
      sub_count_z: 2,
      rows_per_step: 8,
      symmetric_span_marking: false,
    }
  }
}

impl AnalysisConfig {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_counts(mut self, x: usize, y: usize, z: usize) -> Self {
    self.count_x = x;
    self.count_y = y;
    self.count_z = z;
    self
  }

  pub fn with_max_trace_distance(mut self, distance: f64) -> Self {
    self.max_trace_distance = distance;
    self
  }

  pub fn with_center_overlap_test(mut self, enabled: bool) -> Self {
    self.center_overlap_test = enabled;
    self
  }

  pub fn with_center_overlap_radius(mut self, radius: f64) -> Self {
    self.center_overlap_radius = radius;
    self
  }

  pub fn with_sub_sampling(mut self, enabled: bool) -> Self {
    self.sub_sampling = enabled;
    self
  }

  pub fn with_sub_counts(mut self, x: usize, y: usize, z: usize) -> Self {
    self.sub_count_x = x;
    self.sub_count_y = y;
    self.sub_count_z = z;
    self
  }

  pub fn with_rows_per_step(mut self, rows: usize) -> Self {
    self.rows_per_step = rows;
    self
  }

  pub fn with_symmetric_span_marking(mut self, enabled: bool) -> Self {
    self.symmetric_span_marking = enabled;
    self
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_builder_chain() {
    let config = AnalysisConfig::new()
      .with_counts(4, 1, 1)
      .with_max_trace_distance(50.0)
      .with_center_overlap_test(true)
      .with_center_overlap_radius(0.5)
      .with_sub_sampling(true)
      .with_sub_counts(3, 3, 3)
      .with_rows_per_step(2)
      .with_symmetric_span_marking(true);

    assert_eq!(
      (config.count_x, config.count_y, config.count_z),
      (4, 1, 1)
    );
    assert_eq!(config.max_trace_distance, 50.0);
    assert!(config.center_overlap_test);
    assert_eq!(config.center_overlap_radius, 0.5);
    assert!(config.sub_sampling);
    assert_eq!(
      (config.sub_count_x, config.sub_count_y, config.sub_count_z),
      (3, 3, 3)
    );
    assert_eq!(config.rows_per_step, 2);
    assert!(config.symmetric_span_marking);
  }

  #[test]
  fn test_defaults() {
    let config = AnalysisConfig::default();
    assert!(!config.center_overlap_test);
    assert!(!config.sub_sampling);
    assert_eq!(config.max_trace_distance, 0.0);
    assert!(config.rows_per_step > 0);
  }
}
