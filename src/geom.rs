//! Small geometry helpers.

use glam::DVec3;

/// Closest point to `point` on the segment from `start` to `end`.
///
/// Degenerate (near zero-length) segments return `start`.
pub fn closest_point_on_segment(point: DVec3, start: DVec3, end: DVec3) -> DVec3 {
  let line = end - start;
  let length = line.length();
  if length < 1e-8 {
    return start;
  }
  let dir = line / length;
  let projected = (point - start).dot(dir).clamp(0.0, length);
  start + dir * projected
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_projects_onto_interior() {
    let p = closest_point_on_segment(
      DVec3::new(5.0, 3.0, 0.0),
      DVec3::ZERO,
      DVec3::new(10.0, 0.0, 0.0),
    );
    assert_eq!(p, DVec3::new(5.0, 0.0, 0.0));
  }

  #[test]
  fn test_clamps_to_endpoints() {
    let start = DVec3::ZERO;
    let end = DVec3::new(10.0, 0.0, 0.0);
    assert_eq!(
      closest_point_on_segment(DVec3::new(-4.0, 2.0, 0.0), start, end),
      start
    );
    assert_eq!(
      closest_point_on_segment(DVec3::new(14.0, 2.0, 0.0), start, end),
      end
    );
  }

  #[test]
  fn test_degenerate_segment_returns_start() {
    let start = DVec3::splat(1.0);
    let p = closest_point_on_segment(DVec3::splat(9.0), start, start);
    assert_eq!(p, start);
  }
}
