//! Core geometric types shared across the crate.

use glam::DVec3;

/// Double-precision axis-aligned bounding box.
///
/// Starts out inverted (`empty`) so that points can be folded in with
/// [`Aabb3::encapsulate`]; an AABB that never received at least one point
/// stays invalid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb3 {
  /// Minimum corner (inclusive).
  pub min: DVec3,
  /// Maximum corner (inclusive).
  pub max: DVec3,
}

impl Aabb3 {
  /// Create an AABB with inverted extents (ready for encapsulation).
  pub fn empty() -> Self {
    Self {
      min: DVec3::splat(f64::INFINITY),
      max: DVec3::splat(f64::NEG_INFINITY),
    }
  }

  /// Create an AABB from min and max corners.
  pub fn new(min: DVec3, max: DVec3) -> Self {
    Self { min, max }
  }

  /// Expanding union of a set of points.
  ///
  /// An empty input yields an invalid AABB; callers must check
  /// [`Aabb3::is_valid`] before using the result.
  pub fn from_points<I>(points: I) -> Self
  where
    I: IntoIterator<Item = DVec3>,
  {
    let mut aabb = Self::empty();
    for p in points {
      aabb.encapsulate(p);
    }
    aabb
  }

  /// Expand the AABB to include a point.
  #[inline]
  pub fn encapsulate(&mut self, point: DVec3) {
    self.min = self.min.min(point);
    self.max = self.max.max(point);
  }

  /// Check if the AABB is valid (min <= max on all axes).
  #[inline]
  pub fn is_valid(&self) -> bool {
    self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
  }

  /// Get the size of the AABB (max - min).
  #[inline]
  pub fn size(&self) -> DVec3 {
    self.max - self.min
  }

  /// Get the center of the AABB.
  #[inline]
  pub fn center(&self) -> DVec3 {
    (self.min + self.max) * 0.5
  }

  /// Check if the AABB contains a point.
  #[inline]
  pub fn contains_point(&self, point: DVec3) -> bool {
    point.x >= self.min.x
      && point.x <= self.max.x
      && point.y >= self.min.y
      && point.y <= self.max.y
      && point.z >= self.min.z
      && point.z <= self.max.z
  }
}

impl Default for Aabb3 {
  fn default() -> Self {
    Self::empty()
  }
}

/// Result of a line-of-sight query against scene geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TraceResult {
  /// True if the segment is unobstructed.
  pub clear: bool,
  /// Fractional distance along the segment where the first obstruction
  /// was hit. Only meaningful when `clear` is false.
  pub hit_fraction: f64,
}

impl TraceResult {
  /// An unobstructed trace.
  pub const CLEAR: Self = Self {
    clear: true,
    hit_fraction: 1.0,
  };

  /// An obstructed trace with the given hit fraction.
  pub fn blocked(hit_fraction: f64) -> Self {
    Self {
      clear: false,
      hit_fraction,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_empty_is_invalid() {
    assert!(!Aabb3::empty().is_valid());
  }

  #[test]
  fn test_from_points() {
    let aabb = Aabb3::from_points([
      DVec3::new(1.0, -2.0, 3.0),
      DVec3::new(-1.0, 2.0, -3.0),
      DVec3::ZERO,
    ]);
    assert!(aabb.is_valid());
    assert_eq!(aabb.min, DVec3::new(-1.0, -2.0, -3.0));
    assert_eq!(aabb.max, DVec3::new(1.0, 2.0, 3.0));
  }

  #[test]
  fn test_from_points_empty_input() {
    let aabb = Aabb3::from_points([]);
    assert!(!aabb.is_valid());
  }

  #[test]
  fn test_single_point_is_degenerate_but_valid() {
    let aabb = Aabb3::from_points([DVec3::splat(4.0)]);
    assert!(aabb.is_valid());
    assert_eq!(aabb.size(), DVec3::ZERO);
  }

  #[test]
  fn test_size_and_center() {
    let aabb = Aabb3::new(DVec3::new(-1.0, -2.0, -3.0), DVec3::new(1.0, 2.0, 3.0));
    assert_eq!(aabb.size(), DVec3::new(2.0, 4.0, 6.0));
    assert_eq!(aabb.center(), DVec3::ZERO);
  }

  #[test]
  fn test_contains_point() {
    let aabb = Aabb3::new(DVec3::ZERO, DVec3::splat(10.0));
    assert!(aabb.contains_point(DVec3::splat(5.0)));
    assert!(aabb.contains_point(DVec3::ZERO));
    assert!(!aabb.contains_point(DVec3::splat(11.0)));
  }
}
