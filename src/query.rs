//! External capability seams: spatial queries and debug drawing.
//!
//! The analyzer never talks to a scene directly. The host injects a
//! [`SpatialQuery`] implementation (ray/segment intersection plus a small
//! sphere probe) and may inject a [`DebugDraw`] sink for visualization.

use glam::DVec3;

use crate::types::{Aabb3, TraceResult};

/// Line-of-sight and proximity queries against scene geometry.
///
/// Queries are synchronous and are the dominant cost of an analysis,
/// which is why the engine batches work into bounded steps. A failed or
/// obstructed query is treated as "obstructed"; there is no retry.
pub trait SpatialQuery {
  /// Segment intersection query from `p0` to `p1`.
  fn line_of_sight(&mut self, p0: DVec3, p1: DVec3) -> TraceResult;

  /// Small-sphere overlap probe. Returns true if the sphere volume is
  /// free of geometry.
  fn sphere_clear(&mut self, center: DVec3, radius: f64) -> bool;

  /// Whether the backing environment is reachable. When this turns false
  /// mid-run the analyzer halts without finalizing.
  fn available(&self) -> bool {
    true
  }
}

/// RGB color for debug drawing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawColor {
  pub r: u8,
  pub g: u8,
  pub b: u8,
}

impl DrawColor {
  pub const GREEN: Self = Self { r: 0, g: 255, b: 0 };
  pub const RED: Self = Self { r: 255, g: 0, b: 0 };
  pub const YELLOW: Self = Self {
    r: 255,
    g: 255,
    b: 0,
  };
  pub const CYAN: Self = Self {
    r: 0,
    g: 255,
    b: 255,
  };
}

/// Optional visualization sink. Purely observational; correctness never
/// depends on it.
pub trait DebugDraw {
  fn draw_box(&mut self, aabb: Aabb3, color: DrawColor, duration: f64);
  fn draw_line(&mut self, from: DVec3, to: DVec3, color: DrawColor, duration: f64);
  fn draw_point(&mut self, at: DVec3, color: DrawColor, duration: f64);
}

/// Debug sink that discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoDebugDraw;

impl DebugDraw for NoDebugDraw {
  fn draw_box(&mut self, _aabb: Aabb3, _color: DrawColor, _duration: f64) {}
  fn draw_line(&mut self, _from: DVec3, _to: DVec3, _color: DrawColor, _duration: f64) {}
  fn draw_point(&mut self, _at: DVec3, _color: DrawColor, _duration: f64) {}
}
