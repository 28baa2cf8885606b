//! Tile metadata model.
//!
//! Plain data types describing tilesets independent of the ECS:
//! - [`shape`] – collision/interaction shapes and their classification
//! - [`definition`] – one tile: size, shapes, properties, animation link
//! - [`track`] – animation tracks, frames and the hold-frame policy
//! - [`index`] – the immutable per-tileset index built at load time
//! - [`raw`] – serde input types handed over by the asset loader

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

pub mod definition;
pub mod index;
pub mod raw;
pub mod shape;
pub mod track;

pub use definition::{PropertyValue, Properties, TileAnimation, TileDefinition};
pub use index::TilesetIndex;
pub use raw::{RawFrame, RawObject, RawPoint, RawProperty, RawTile, RawTileset};
pub use shape::{GeometryShape, ShapeClass, ShapeKind};
pub use track::{AnimationTrack, Frame, HoldPolicy, TrackId, TrackRef};

/// Tile id, unique within its tileset.
pub type LocalId = u32;

/// Identifier of a tileset in the registry.
///
/// Cheap to clone; instances and cursors hold these instead of references to
/// tileset data.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TilesetId(Arc<str>);

impl TilesetId {
    pub fn new(id: impl AsRef<str>) -> Self {
        TilesetId(Arc::from(id.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TilesetId {
    fn from(id: &str) -> Self {
        TilesetId::new(id)
    }
}

impl From<String> for TilesetId {
    fn from(id: String) -> Self {
        TilesetId(Arc::from(id))
    }
}

impl Borrow<str> for TilesetId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TilesetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for TilesetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TilesetId({:?})", &*self.0)
    }
}
