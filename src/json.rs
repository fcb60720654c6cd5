//! JSON codec for voxel boxes and grids.
//!
//! The wire form is a corner-name mapping per box plus a `VisibilityMask`
//! flag, wrapped in a JSON array for multiple boxes:
//!
//! ```json
//! {
//!   "Bottom_Backward_Left": { "x": 0.0, "y": 0.0, "z": 0.0 },
//!   "Top_Forward_Right":    { "x": 1.0, "y": 1.0, "z": 1.0 },
//!   "VisibilityMask": 1
//! }
//! ```
//!
//! Unknown keys are ignored on read; a missing `VisibilityMask` defaults
//! to hidden. Corner-sharing links do not survive a round trip, only the
//! coordinate values and flags.

use glam::DVec3;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::arena::{PointArena, PointHandle};
use crate::grid::VoxelGrid;
use crate::voxel::{Corner, VoxelBox};

const VISIBILITY_MASK_KEY: &str = "VisibilityMask";

/// Errors produced while decoding the JSON corner-mapping form.
#[derive(Debug, Error)]
pub enum JsonCodecError {
  #[error("expected a JSON object for a voxel box")]
  ExpectedObject,
  #[error("expected a JSON array of voxel boxes")]
  ExpectedArray,
  #[error("malformed point for corner {corner}: {source}")]
  BadPoint {
    corner: &'static str,
    source: serde_json::Error,
  },
}

#[derive(Serialize, Deserialize)]
struct JsonPoint {
  x: f64,
  y: f64,
  z: f64,
}

impl From<DVec3> for JsonPoint {
  fn from(v: DVec3) -> Self {
    Self {
      x: v.x,
      y: v.y,
      z: v.z,
    }
  }
}

impl From<JsonPoint> for DVec3 {
  fn from(p: JsonPoint) -> Self {
    DVec3::new(p.x, p.y, p.z)
  }
}

/// Serialize one box to the corner-mapping object form. Unset corners are
/// omitted.
pub fn box_to_json(vbox: &VoxelBox, arena: &PointArena) -> Value {
  let mut obj = Map::new();
  for corner in Corner::ALL {
    if let Some(position) = arena.get(vbox.corner(corner)) {
      // JsonPoint serialization is infallible; fall back to null rather
      // than propagating an impossible error.
      let point =
        serde_json::to_value(JsonPoint::from(position)).unwrap_or(Value::Null);
      obj.insert(corner.name().to_owned(), point);
    }
  }
  obj.insert(
    VISIBILITY_MASK_KEY.to_owned(),
    Value::from(u8::from(vbox.visible)),
  );
  Value::Object(obj)
}

/// Deserialize one box, allocating its corners into `arena`.
pub fn box_from_json(value: &Value, arena: &mut PointArena) -> Result<VoxelBox, JsonCodecError> {
  let obj = value.as_object().ok_or(JsonCodecError::ExpectedObject)?;

  let corners: [PointHandle; 8] = std::array::from_fn(|_| arena.alloc());
  let mut visible = false;

  for (key, entry) in obj {
    if key == VISIBILITY_MASK_KEY {
      visible = match entry {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_u64().unwrap_or(0) != 0,
        _ => false,
      };
      continue;
    }
    let Some(corner) = Corner::from_name(key) else {
      // Unknown keys are tolerated for forward compatibility.
      continue;
    };
    let point: JsonPoint =
      serde_json::from_value(entry.clone()).map_err(|source| JsonCodecError::BadPoint {
        corner: corner.name(),
        source,
      })?;
    arena.set(corners[corner.index()], point.into());
  }

  let mut vbox = VoxelBox::from_corners(corners);
  vbox.visible = visible;
  Ok(vbox)
}

/// Serialize a grid's boxes as a JSON array of corner-mapping objects.
pub fn grid_to_json(grid: &VoxelGrid) -> Value {
  Value::Array(
    grid
      .boxes()
      .iter()
      .map(|b| box_to_json(b, grid.arena()))
      .collect(),
  )
}

/// Deserialize an array of boxes into a fresh arena.
pub fn boxes_from_json(value: &Value) -> Result<(PointArena, Vec<VoxelBox>), JsonCodecError> {
  let entries = value.as_array().ok_or(JsonCodecError::ExpectedArray)?;
  let mut arena = PointArena::with_capacity(entries.len() * 8);
  let boxes = entries
    .iter()
    .map(|entry| box_from_json(entry, &mut arena))
    .collect::<Result<Vec<_>, _>>()?;
  Ok((arena, boxes))
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;
  use crate::types::Aabb3;

  #[test]
  fn test_grid_roundtrip_preserves_corners_and_flags() {
    let mut grid = VoxelGrid::build(
      Aabb3::new(DVec3::ZERO, DVec3::splat(10.0)),
      2,
      2,
      1,
    );
    grid.mark_visible(1);
    grid.mark_visible(2);

    let value = grid_to_json(&grid);
    let (arena, boxes) = boxes_from_json(&value).unwrap();

    assert_eq!(boxes.len(), grid.len());
    for (i, decoded) in boxes.iter().enumerate() {
      let original = &grid.boxes()[i];
      assert_eq!(decoded.visible, original.visible);
      for corner in Corner::ALL {
        assert_eq!(
          arena.get(decoded.corner(corner)),
          grid.arena().get(original.corner(corner)),
          "box {i}, corner {}",
          corner.name()
        );
      }
    }
  }

  #[test]
  fn test_unknown_keys_ignored() {
    let value = json!({
      "Bottom_Backward_Left": { "x": 0.0, "y": 0.0, "z": 0.0 },
      "Top_Forward_Right": { "x": 1.0, "y": 1.0, "z": 1.0 },
      "SomeFutureField": { "anything": true },
      "VisibilityMask": 1
    });
    let mut arena = PointArena::new();
    let vbox = box_from_json(&value, &mut arena).unwrap();
    assert!(vbox.visible);
    assert_eq!(
      arena.get(vbox.corner(Corner::TopForwardRight)),
      Some(DVec3::ONE)
    );
    // Only the two named corners are set.
    assert_eq!(vbox.set_corners(&arena).len(), 2);
    assert_eq!(vbox.center(&arena), Some(DVec3::splat(0.5)));
  }

  #[test]
  fn test_missing_mask_defaults_hidden() {
    let value = json!({
      "Bottom_Backward_Left": { "x": 0.0, "y": 0.0, "z": 0.0 }
    });
    let mut arena = PointArena::new();
    let vbox = box_from_json(&value, &mut arena).unwrap();
    assert!(!vbox.visible);
  }

  #[test]
  fn test_boolean_mask_accepted() {
    let value = json!({ "VisibilityMask": true });
    let mut arena = PointArena::new();
    assert!(box_from_json(&value, &mut arena).unwrap().visible);
  }

  #[test]
  fn test_malformed_corner_is_an_error() {
    let value = json!({ "Top_Forward_Right": { "x": "not a number" } });
    let mut arena = PointArena::new();
    assert!(matches!(
      box_from_json(&value, &mut arena),
      Err(JsonCodecError::BadPoint { .. })
    ));
  }

  #[test]
  fn test_non_object_rejected() {
    let mut arena = PointArena::new();
    assert!(matches!(
      box_from_json(&json!(42), &mut arena),
      Err(JsonCodecError::ExpectedObject)
    ));
    assert!(matches!(
      boxes_from_json(&json!({})),
      Err(JsonCodecError::ExpectedArray)
    ));
  }
}
