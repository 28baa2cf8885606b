//! Parsed tileset representation handed over by the asset loader.
//!
//! Field names follow Tiled's JSON export so exported tilesets deserialize
//! directly. Nothing here is validated; [`TilesetIndex::load`](super::TilesetIndex::load)
//! does that.
//!
//! ```json
//! {
//!   "name": "yellow",
//!   "tilewidth": 32, "tileheight": 38,
//!   "tilecount": 26, "columns": 1,
//!   "tiles": [
//!     { "id": 9,
//!       "objects": [
//!         { "x": 7, "y": 19, "width": 16, "height": 19 },
//!         { "name": "attk", "x": 19, "y": 19, "width": 9, "height": 19,
//!           "properties": [ { "name": "attack", "type": "bool", "value": true } ] }
//!       ] },
//!     { "id": 10,
//!       "animation": [ { "tileid": 10, "duration": 200 }, { "tileid": 11, "duration": 10000 } ] }
//!   ]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::definition::PropertyValue;
use crate::error::TileResult;

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct RawTileset {
    #[serde(default)]
    pub name: String,
    /// Nominal grid cell width; tiles without their own size use it.
    #[serde(default)]
    pub tilewidth: u32,
    #[serde(default)]
    pub tileheight: u32,
    /// Number of tiles in the tileset, listed or not.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tilecount: Option<u32>,
    /// Grid columns; `0` marks an image collection, whose ids need not be contiguous.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<u32>,
    /// Only tiles carrying extra data are listed.
    #[serde(default)]
    pub tiles: Vec<RawTile>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct RawTile {
    pub id: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<RawProperty>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub objects: Vec<RawObject>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub animation: Vec<RawFrame>,
}

/// Collision object. A rectangle unless `polygon` is present.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct RawObject {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub width: f32,
    #[serde(default)]
    pub height: f32,
    #[serde(default)]
    pub rotation: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polygon: Option<Vec<RawPoint>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<RawProperty>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct RawPoint {
    pub x: f32,
    pub y: f32,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawFrame {
    pub tileid: u32,
    pub duration: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RawProperty {
    pub name: String,
    #[serde(rename = "type", default = "default_property_type")]
    pub kind: String,
    pub value: Value,
}

fn default_property_type() -> String {
    "string".to_string()
}

impl RawProperty {
    pub fn new(name: impl Into<String>, kind: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            value,
        }
    }

    pub fn bool(name: impl Into<String>, value: bool) -> Self {
        Self::new(name, "bool", Value::Bool(value))
    }

    pub fn file(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(name, "file", Value::String(path.into()))
    }

    /// Convert to a typed value; `None` when the value does not match the declared type.
    pub fn to_value(&self) -> Option<PropertyValue> {
        match (self.kind.as_str(), &self.value) {
            ("bool", Value::Bool(b)) => Some(PropertyValue::Bool(*b)),
            // Tiled's XML export writes booleans as strings
            ("bool", Value::String(s)) => s.parse().ok().map(PropertyValue::Bool),
            ("int", v) => v.as_i64().map(PropertyValue::Int),
            ("float", v) => v.as_f64().map(PropertyValue::Float),
            ("file", Value::String(s)) => Some(PropertyValue::File(s.clone())),
            ("string" | "color", Value::String(s)) => Some(PropertyValue::String(s.clone())),
            _ => None,
        }
    }
}

impl RawTileset {
    /// Ids `0..n` every grid tileset owns whether listed or not.
    ///
    /// Image collections (`columns == 0`) only own their listed tiles.
    pub fn grid_tile_count(&self) -> u32 {
        match self.columns {
            Some(0) => 0,
            _ => self.tilecount.unwrap_or(0),
        }
    }

    pub fn from_json_str(json: &str) -> TileResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a tileset description from a JSON file at the specified path.
    pub fn load_from_file(path: impl AsRef<Path>) -> TileResult<Self> {
        let file_content = std::fs::read_to_string(path)?;
        Self::from_json_str(&file_content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_property_conversion() {
        assert_eq!(RawProperty::bool("sensor", true).to_value(), Some(PropertyValue::Bool(true)));
        assert_eq!(
            RawProperty::new("drop", "bool", json!("true")).to_value(),
            Some(PropertyValue::Bool(true))
        );
        assert_eq!(
            RawProperty::file("anim", "props/pad-a.json").to_value(),
            Some(PropertyValue::File("props/pad-a.json".into()))
        );
        assert_eq!(
            RawProperty::new("actor", "string", json!("AT_YELLOW")).to_value(),
            Some(PropertyValue::String("AT_YELLOW".into()))
        );
        assert_eq!(RawProperty::new("hp", "int", json!(3)).to_value(), Some(PropertyValue::Int(3)));
    }

    #[test]
    fn test_property_type_mismatch() {
        assert_eq!(RawProperty::new("sensor", "bool", json!(1)).to_value(), None);
        assert_eq!(RawProperty::new("anim", "file", json!(5)).to_value(), None);
    }

    #[test]
    fn test_untyped_property_defaults_to_string() {
        let raw: RawProperty = serde_json::from_value(json!({"name": "actor", "value": "AT_CRAB"})).unwrap();
        assert_eq!(raw.kind, "string");
        assert_eq!(raw.to_value(), Some(PropertyValue::String("AT_CRAB".into())));
    }

    #[test]
    fn test_parse_minimal_tileset() {
        let raw = RawTileset::from_json_str(
            r#"{"name":"grotto","tilewidth":16,"tileheight":16,
                "tiles":[{"id":9,"objects":[{"x":0,"y":0,"polygon":[{"x":0,"y":0},{"x":0,"y":4},{"x":16,"y":8}]}]}]}"#,
        )
        .unwrap();
        assert_eq!(raw.tiles.len(), 1);
        assert_eq!(raw.tiles[0].objects[0].polygon.as_ref().map(Vec::len), Some(3));
        assert!(raw.tiles[0].animation.is_empty());
        assert_eq!(raw.grid_tile_count(), 0);
    }

    #[test]
    fn test_grid_tile_count_ignores_collections() {
        let grid = RawTileset::from_json_str(r#"{"tilecount":160,"columns":8}"#).unwrap();
        assert_eq!(grid.grid_tile_count(), 160);
        let collection = RawTileset::from_json_str(r#"{"tilecount":28,"columns":0}"#).unwrap();
        assert_eq!(collection.grid_tile_count(), 0);
    }

    #[test]
    fn test_parse_error_is_reported() {
        assert!(RawTileset::from_json_str("{ not json").is_err());
    }
}
