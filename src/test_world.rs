//! Deterministic in-memory scene for unit tests.
//!
//! Occluders are solid AABBs; line-of-sight uses the slab method and the
//! sphere probe uses closest-point distance. Query counters let tests
//! assert how much work the segmented scan actually issued.

use glam::DVec3;

use crate::query::SpatialQuery;
use crate::types::{Aabb3, TraceResult};

/// Scene made of solid axis-aligned boxes.
#[derive(Clone, Debug, Default)]
pub struct MockWorld {
  pub solids: Vec<Aabb3>,
  pub unavailable: bool,
  pub los_queries: usize,
  pub sphere_queries: usize,
}

impl MockWorld {
  /// Completely open scene.
  pub fn open() -> Self {
    Self::default()
  }

  /// Scene with a single full-height wall at `x`, spanning `extent` on the
  /// other axes.
  pub fn with_wall_x(x: f64, extent: f64) -> Self {
    let half_thickness = 1e-3;
    Self {
      solids: vec![Aabb3::new(
        DVec3::new(x - half_thickness, -extent, -extent),
        DVec3::new(x + half_thickness, extent, extent),
      )],
      ..Self::default()
    }
  }

  pub fn add_solid(&mut self, solid: Aabb3) {
    self.solids.push(solid);
  }

  /// Entry fraction of the segment into the solid, if it intersects.
  fn segment_hit(solid: &Aabb3, p0: DVec3, p1: DVec3) -> Option<f64> {
    let dir = p1 - p0;
    let mut t_min: f64 = 0.0;
    let mut t_max: f64 = 1.0;
    for axis in 0..3 {
      let (d, o, lo, hi) = (dir[axis], p0[axis], solid.min[axis], solid.max[axis]);
      if d.abs() < 1e-12 {
        if o < lo || o > hi {
          return None;
        }
        continue;
      }
      let mut t0 = (lo - o) / d;
      let mut t1 = (hi - o) / d;
      if t0 > t1 {
        std::mem::swap(&mut t0, &mut t1);
      }
      t_min = t_min.max(t0);
      t_max = t_max.min(t1);
      if t_min > t_max {
        return None;
      }
    }
    Some(t_min)
  }

  fn sphere_overlaps(solid: &Aabb3, center: DVec3, radius: f64) -> bool {
    let closest = center.clamp(solid.min, solid.max);
    closest.distance_squared(center) <= radius * radius
  }
}

impl SpatialQuery for MockWorld {
  fn line_of_sight(&mut self, p0: DVec3, p1: DVec3) -> TraceResult {
    self.los_queries += 1;
    let hit = self
      .solids
      .iter()
      .filter_map(|s| Self::segment_hit(s, p0, p1))
      .fold(None::<f64>, |best, t| {
        Some(best.map_or(t, |b| b.min(t)))
      });
    match hit {
      Some(t) => TraceResult::blocked(t),
      None => TraceResult::CLEAR,
    }
  }

  fn sphere_clear(&mut self, center: DVec3, radius: f64) -> bool {
    self.sphere_queries += 1;
    !self
      .solids
      .iter()
      .any(|s| Self::sphere_overlaps(s, center, radius))
  }

  fn available(&self) -> bool {
    !self.unavailable
  }
}
