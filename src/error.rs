//! Error types for tileset loading, lookup and animation resolution.
//!
//! Load-time problems surface as [`TileError::MalformedTileset`] and abort the
//! whole tileset. Runtime lookups never substitute a fallback tile; a missing
//! id is reported as [`TileError::UnknownTileId`]. Broken external animation
//! references are only detected when the track is first needed, because the
//! referenced tileset may be registered later.

use thiserror::Error;

use crate::tiles::LocalId;

/// Errors produced by the tile metadata engine.
#[derive(Debug, Error)]
pub enum TileError {
    #[error("malformed tileset '{tileset}': {reason}")]
    MalformedTileset {
        tileset: String,
        reason: MalformedReason,
    },

    #[error("unknown tile id {local_id} in tileset '{tileset}'")]
    UnknownTileId { tileset: String, local_id: LocalId },

    #[error("unknown tileset '{0}'")]
    UnknownTileset(String),

    #[error("broken animation reference '{reference}' on tile {local_id} of tileset '{tileset}'")]
    BrokenAnimationReference {
        tileset: String,
        local_id: LocalId,
        reference: String,
    },

    #[error("tileset '{0}' is already registered")]
    DuplicateTileset(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse tileset JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Structural authoring error found while building a [`TilesetIndex`](crate::tiles::TilesetIndex).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedReason {
    #[error("tile id {0} is defined more than once")]
    DuplicateTileId(LocalId),

    #[error("animation on tile {owner} references missing tile {frame}")]
    DanglingFrame { owner: LocalId, frame: LocalId },

    #[error("polygon on tile {tile} has {points} points, at least 3 are required")]
    DegeneratePolygon { tile: LocalId, points: usize },

    #[error("property '{name}' is defined more than once on tile {tile}")]
    DuplicateProperty { tile: LocalId, name: String },

    #[error("property '{name}' on tile {tile} does not match its declared type")]
    InvalidProperty { tile: LocalId, name: String },

    #[error("tile {tile} has both an inline animation and an external animation reference")]
    ConflictingAnimation { tile: LocalId },

    #[error("tile {tile} has an external animation reference with an empty path")]
    EmptyAnimation { tile: LocalId },

    #[error("tile {tile} has non-finite collision geometry")]
    NonFiniteGeometry { tile: LocalId },
}

impl TileError {
    pub(crate) fn malformed(tileset: &str, reason: MalformedReason) -> Self {
        TileError::MalformedTileset {
            tileset: tileset.to_string(),
            reason,
        }
    }

    /// The structural reason when this is a load-time error.
    pub fn malformed_reason(&self) -> Option<&MalformedReason> {
        match self {
            TileError::MalformedTileset { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

pub type TileResult<T> = Result<T, TileError>;
