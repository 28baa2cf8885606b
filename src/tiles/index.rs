//! Per-tileset index of tile definitions and animation tracks.
//!
//! Built once from a [`RawTileset`]; afterwards it is never mutated and can be
//! shared for concurrent reads. Construction either succeeds completely or
//! fails with [`TileError::MalformedTileset`]; no partial index escapes.

use glam::{UVec2, Vec2};
use log::debug;
use rustc_hash::FxHashSet;

use super::definition::{Properties, TileAnimation, TileDefinition};
use super::raw::{RawObject, RawProperty, RawTile, RawTileset};
use super::shape::{GeometryShape, ShapeClass, ShapeKind};
use super::track::{AnimationTrack, HoldPolicy, TrackId};
use super::{LocalId, TilesetId};
use crate::error::{MalformedReason, TileError, TileResult};

/// Tile property naming a tileset whose animation the tile plays.
pub const EXTERNAL_ANIMATION_PROPERTY: &str = "anim";

#[derive(Debug, Clone)]
pub struct TilesetIndex {
    id: TilesetId,
    name: String,
    tile_size: UVec2,
    /// Sorted by `local_id`.
    tiles: Vec<TileDefinition>,
    tracks: Vec<AnimationTrack>,
    track_owners: Vec<LocalId>,
}

impl TilesetIndex {
    /// Build an index using the default [`HoldPolicy`].
    pub fn load(id: impl Into<TilesetId>, raw: &RawTileset) -> TileResult<Self> {
        Self::load_with_policy(id, raw, &HoldPolicy::default())
    }

    pub fn load_with_policy(
        id: impl Into<TilesetId>,
        raw: &RawTileset,
        policy: &HoldPolicy,
    ) -> TileResult<Self> {
        let id = id.into();
        let malformed = |reason| TileError::malformed(id.as_str(), reason);

        let mut listed: FxHashSet<LocalId> = FxHashSet::default();
        for tile in &raw.tiles {
            if !listed.insert(tile.id) {
                return Err(malformed(MalformedReason::DuplicateTileId(tile.id)));
            }
        }
        let grid_count = raw.grid_tile_count();
        let exists = |tile: LocalId| tile < grid_count || listed.contains(&tile);

        let mut ordered: Vec<&RawTile> = raw.tiles.iter().collect();
        ordered.sort_by_key(|t| t.id);

        let nominal = UVec2::new(raw.tilewidth, raw.tileheight);
        let mut tiles = Vec::with_capacity(ordered.len().max(grid_count as usize));
        let mut tracks = Vec::new();
        let mut track_owners = Vec::new();

        for raw_tile in ordered {
            let local_id = raw_tile.id;
            let properties = convert_properties(local_id, &raw_tile.properties).map_err(malformed)?;
            let tile_drop = bool_property(&properties, "drop").unwrap_or(false);

            let shapes = raw_tile
                .objects
                .iter()
                .map(|obj| convert_object(local_id, obj, tile_drop))
                .collect::<Result<Vec<_>, _>>()
                .map_err(malformed)?;

            let external = match properties.get(EXTERNAL_ANIMATION_PROPERTY) {
                Some(value) => match value.as_file() {
                    Some("") => return Err(malformed(MalformedReason::EmptyAnimation { tile: local_id })),
                    Some(path) => Some(path.to_string()),
                    None => None,
                },
                None => None,
            };

            let inline = if raw_tile.animation.is_empty() {
                None
            } else {
                if let Some(missing) = raw_tile.animation.iter().find(|f| !exists(f.tileid)) {
                    return Err(malformed(MalformedReason::DanglingFrame {
                        owner: local_id,
                        frame: missing.tileid,
                    }));
                }
                AnimationTrack::new(raw_tile.animation.iter().map(|f| (f.tileid, f.duration)), policy)
            };

            let animation = match (inline, external) {
                (Some(_), Some(_)) => {
                    return Err(malformed(MalformedReason::ConflictingAnimation { tile: local_id }));
                }
                (Some(track), None) => {
                    let track_id = TrackId(tracks.len() as u32);
                    tracks.push(track);
                    track_owners.push(local_id);
                    Some(TileAnimation::Inline(track_id))
                }
                (None, Some(path)) => Some(TileAnimation::External(path)),
                (None, None) => None,
            };

            tiles.push(TileDefinition {
                tileset: id.clone(),
                local_id,
                size: UVec2::new(
                    raw_tile.width.unwrap_or(nominal.x),
                    raw_tile.height.unwrap_or(nominal.y),
                ),
                shapes,
                properties,
                animation,
            });
        }

        // unlisted grid cells: plain tiles without shapes or properties
        let implicit = (0..grid_count).filter(|tile| !listed.contains(tile));
        tiles.extend(implicit.map(|local_id| TileDefinition {
            tileset: id.clone(),
            local_id,
            size: nominal,
            shapes: Vec::new(),
            properties: Properties::default(),
            animation: None,
        }));
        tiles.sort_by_key(|t| t.local_id);

        debug!(
            "Indexed tileset '{}': {} tiles, {} tracks ({} holding)",
            id,
            tiles.len(),
            tracks.len(),
            tracks.iter().filter(|t| t.has_hold()).count()
        );

        Ok(Self {
            id,
            name: raw.name.clone(),
            tile_size: nominal,
            tiles,
            tracks,
            track_owners,
        })
    }

    pub fn id(&self) -> &TilesetId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Nominal grid cell size.
    pub fn tile_size(&self) -> UVec2 {
        self.tile_size
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Tiles in ascending id order.
    pub fn tiles(&self) -> impl Iterator<Item = &TileDefinition> {
        self.tiles.iter()
    }

    pub fn get(&self, local_id: LocalId) -> Option<&TileDefinition> {
        self.tiles
            .binary_search_by_key(&local_id, |t| t.local_id)
            .ok()
            .map(|i| &self.tiles[i])
    }

    pub fn contains(&self, local_id: LocalId) -> bool {
        self.get(local_id).is_some()
    }

    pub fn lookup(&self, local_id: LocalId) -> TileResult<&TileDefinition> {
        self.get(local_id).ok_or_else(|| TileError::UnknownTileId {
            tileset: self.id.to_string(),
            local_id,
        })
    }

    pub fn track(&self, track: TrackId) -> Option<&AnimationTrack> {
        self.tracks.get(track.0 as usize)
    }

    pub fn tracks(&self) -> impl Iterator<Item = (TrackId, &AnimationTrack)> {
        self.tracks.iter().enumerate().map(|(i, t)| (TrackId(i as u32), t))
    }

    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// Tile that authored the track.
    pub fn track_owner(&self, track: TrackId) -> Option<LocalId> {
        self.track_owners.get(track.0 as usize).copied()
    }

    /// Track shared with tiles of other tilesets that reference this one.
    ///
    /// Tracks are stored in ascending owner id order, so this is the track of
    /// the lowest-id animated tile.
    pub fn primary_track(&self) -> Option<TrackId> {
        if self.tracks.is_empty() { None } else { Some(TrackId(0)) }
    }
}

fn bool_property(properties: &Properties, name: &str) -> Option<bool> {
    properties.get(name).and_then(|v| v.as_bool())
}

fn convert_properties(tile: LocalId, raw: &[RawProperty]) -> Result<Properties, MalformedReason> {
    let mut properties = Properties::default();
    for prop in raw {
        let value = prop.to_value().ok_or_else(|| MalformedReason::InvalidProperty {
            tile,
            name: prop.name.clone(),
        })?;
        if properties.insert(prop.name.clone(), value).is_some() {
            return Err(MalformedReason::DuplicateProperty {
                tile,
                name: prop.name.clone(),
            });
        }
    }
    Ok(properties)
}

fn convert_object(tile: LocalId, obj: &RawObject, tile_drop: bool) -> Result<GeometryShape, MalformedReason> {
    let props = convert_properties(tile, &obj.properties)?;
    let interactive = bool_property(&props, "interactive").unwrap_or(false);
    let sensor = interactive || bool_property(&props, "sensor").unwrap_or(false);
    let attack = bool_property(&props, "attack").unwrap_or(false);
    let class = ShapeClass::from_flags(sensor, attack, bool_property(&props, "drop"), tile_drop);

    let kind = match &obj.polygon {
        Some(points) if points.len() < 3 => {
            return Err(MalformedReason::DegeneratePolygon {
                tile,
                points: points.len(),
            });
        }
        Some(points) => ShapeKind::Polygon {
            points: points.iter().map(|p| Vec2::new(p.x, p.y)).collect(),
        },
        None => ShapeKind::Rectangle {
            width: obj.width,
            height: obj.height,
        },
    };

    let shape = GeometryShape {
        name: (!obj.name.is_empty()).then(|| obj.name.clone()),
        origin: Vec2::new(obj.x, obj.y),
        rotation: obj.rotation,
        kind,
        class,
        interactive,
    };
    if !shape.is_finite() {
        return Err(MalformedReason::NonFiniteGeometry { tile });
    }
    Ok(shape)
}
