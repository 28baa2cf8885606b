//! Placed tile instances.
//!
//! A [`TileInstance`] names the tile an entity currently displays and
//! collides with. For animated entities the animation system rewrites it
//! whenever the frame changes; the tile may belong to another tileset when
//! the entity plays an externally referenced track.

use bevy_ecs::prelude::Component;

use crate::tiles::{LocalId, TilesetId};

#[derive(Component, Clone, Debug, PartialEq, Eq)]
pub struct TileInstance {
    pub tileset: TilesetId,
    pub tile: LocalId,
}

impl TileInstance {
    pub fn new(tileset: impl Into<TilesetId>, tile: LocalId) -> Self {
        Self {
            tileset: tileset.into(),
            tile,
        }
    }
}

/// Placement flips of an instance.
///
/// Map cells pack flips into the high bits of a 16-bit tile reference.
/// `diagonal` is decoded and kept for the renderer but not applied to
/// collision geometry.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TileFlip {
    pub horizontal: bool,
    pub vertical: bool,
    pub diagonal: bool,
}

impl TileFlip {
    pub const FLIP_X: u16 = 0x8000;
    pub const FLIP_Y: u16 = 0x4000;
    pub const FLIP_D: u16 = 0x2000;
    pub const FLIP_MASK: u16 = Self::FLIP_X | Self::FLIP_Y | Self::FLIP_D;

    pub const NONE: TileFlip = TileFlip {
        horizontal: false,
        vertical: false,
        diagonal: false,
    };

    pub fn horizontal() -> Self {
        Self {
            horizontal: true,
            ..Self::NONE
        }
    }

    pub fn vertical() -> Self {
        Self {
            vertical: true,
            ..Self::NONE
        }
    }

    /// Split a packed map cell into its tile id and flips.
    pub fn decode(raw: u16) -> (LocalId, TileFlip) {
        let flip = TileFlip {
            horizontal: raw & Self::FLIP_X != 0,
            vertical: raw & Self::FLIP_Y != 0,
            diagonal: raw & Self::FLIP_D != 0,
        };
        (LocalId::from(raw & !Self::FLIP_MASK), flip)
    }

    /// Pack a tile id and flips. Returns `None` if the id collides with the flip bits.
    pub fn encode(tile: LocalId, flip: TileFlip) -> Option<u16> {
        let id = u16::try_from(tile).ok().filter(|id| id & Self::FLIP_MASK == 0)?;
        let mut raw = id;
        if flip.horizontal {
            raw |= Self::FLIP_X;
        }
        if flip.vertical {
            raw |= Self::FLIP_Y;
        }
        if flip.diagonal {
            raw |= Self::FLIP_D;
        }
        Some(raw)
    }

    pub fn is_flipped(&self) -> bool {
        self.horizontal || self.vertical
    }
}
