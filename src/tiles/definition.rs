//! Tile definitions.

use glam::UVec2;
use rustc_hash::FxHashMap;

use super::shape::GeometryShape;
use super::track::TrackId;
use super::{LocalId, TilesetId};

/// Typed tile or shape property value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// Path relative to the tileset that declares it.
    File(String),
}

impl PropertyValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            PropertyValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_file(&self) -> Option<&str> {
        match self {
            PropertyValue::File(v) => Some(v),
            _ => None,
        }
    }
}

pub type Properties = FxHashMap<String, PropertyValue>;

/// Where a tile's animation comes from. A tile has at most one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TileAnimation {
    /// Track authored on this tile, stored in the owning tileset's arena.
    Inline(TrackId),
    /// Path of another tileset whose primary track this tile plays.
    External(String),
}

/// Immutable description of one tile.
#[derive(Debug, Clone, PartialEq)]
pub struct TileDefinition {
    pub tileset: TilesetId,
    pub local_id: LocalId,
    /// May differ from the tileset's nominal grid size.
    pub size: UVec2,
    pub shapes: Vec<GeometryShape>,
    pub properties: Properties,
    pub animation: Option<TileAnimation>,
}

impl TileDefinition {
    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    pub fn flag(&self, name: &str) -> bool {
        self.property(name).and_then(PropertyValue::as_bool).unwrap_or(false)
    }

    /// `false` when the tile is authored with `collide=false`.
    pub fn collision_enabled(&self) -> bool {
        self.property("collide").and_then(PropertyValue::as_bool) != Some(false)
    }

    /// A tile with no animation always displays itself.
    pub fn is_static(&self) -> bool {
        self.animation.is_none()
    }

    pub fn inline_track(&self) -> Option<TrackId> {
        match self.animation {
            Some(TileAnimation::Inline(track)) => Some(track),
            _ => None,
        }
    }

    pub fn external_animation_ref(&self) -> Option<&str> {
        match &self.animation {
            Some(TileAnimation::External(path)) => Some(path),
            _ => None,
        }
    }

    /// First shape with the given authored name.
    pub fn shape_named(&self, name: &str) -> Option<&GeometryShape> {
        self.shapes.iter().find(|s| s.name.as_deref() == Some(name))
    }
}
