//! World assembly and the tick driver.
//!
//! Wires resources, the per-tick schedule and instance spawning together so
//! the binary and tests drive the same loop:
//!
//! 1. [`build_world`] inserts [`TilesetStore`], [`WorldTime`] and [`EngineConfig`]
//! 2. [`load_tilesets`] registers JSON tilesets through the configured hold policy
//! 3. [`spawn_tile_instance`] places a tile, attaching a cursor if it animates
//! 4. [`tick`] advances time, runs [`build_schedule`]'s systems and clears
//!    change trackers

use std::path::Path;

use bevy_ecs::prelude::*;
use glam::Vec2;
use log::info;

use crate::components::animation::AnimationCursor;
use crate::components::mapposition::MapPosition;
use crate::components::tileinstance::{TileFlip, TileInstance};
use crate::components::worldshapes::WorldShapes;
use crate::error::TileResult;
use crate::resources::engineconfig::EngineConfig;
use crate::resources::tilesetstore::TilesetStore;
use crate::resources::worldtime::WorldTime;
use crate::systems::animation::{animation, animation_controller};
use crate::systems::collision::world_shapes;
use crate::systems::time::step_world_time_ms;
use crate::tiles::{LocalId, TilesetId};

/// Create a world holding an empty store and a clock scaled per `config`.
pub fn build_world(config: EngineConfig) -> World {
    let mut world = World::new();
    world.insert_resource(WorldTime::default().with_time_scale(config.time_scale));
    world.insert_resource(TilesetStore::new());
    world.insert_resource(config);
    world
}

/// Per-tick systems: controller decisions, then playback, then collision.
pub fn build_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems((animation_controller, animation, world_shapes).chain());
    schedule
}

/// Register every file in `paths` with ids relative to the configured tileset dir.
pub fn load_tilesets<P: AsRef<Path>>(world: &mut World, paths: &[P]) -> TileResult<Vec<TilesetId>> {
    let (root, policy) = {
        let config = world.resource::<EngineConfig>();
        (config.tileset_dir.clone(), config.hold_policy())
    };
    let mut store = world.resource_mut::<TilesetStore>();
    let ids = paths
        .iter()
        .map(|path| store.load_file(&root, path, &policy))
        .collect::<TileResult<Vec<_>>>()?;
    info!("Loaded {} tilesets from {:?}", ids.len(), root);
    Ok(ids)
}

/// Spawn a placed tile.
///
/// Animated tiles (inline or external) get an [`AnimationCursor`] and start
/// on their track's first frame. Fails if the tile is unknown or its
/// external reference is broken.
pub fn spawn_tile_instance(
    world: &mut World,
    tileset: &str,
    tile: LocalId,
    position: Vec2,
    flip: TileFlip,
) -> TileResult<Entity> {
    let store = world.resource::<TilesetStore>();
    let def = store.lookup(tileset, tile)?;
    let track = store.resolve_animation(def)?;

    let instance = match &track {
        Some(track_ref) => TileInstance {
            tileset: track_ref.tileset.clone(),
            tile: store
                .track(track_ref)
                .and_then(|t| t.frame(0))
                .map(|f| f.tile)
                .unwrap_or(tile),
        },
        None => TileInstance::new(def.tileset.clone(), tile),
    };

    let mut entity = world.spawn((
        instance,
        MapPosition { pos: position },
        flip,
        WorldShapes::default(),
    ));
    if let Some(track_ref) = track {
        entity.insert(AnimationCursor::new(track_ref));
    }
    Ok(entity.id())
}

/// Spawn a tile from a packed map cell carrying flip bits.
pub fn spawn_packed_tile(world: &mut World, tileset: &str, raw: u16, position: Vec2) -> TileResult<Entity> {
    let (tile, flip) = TileFlip::decode(raw);
    spawn_tile_instance(world, tileset, tile, position, flip)
}

/// Advance the simulation by `delta_ms` (scaled by the clock's `time_scale`)
/// and run one schedule pass.
pub fn tick(world: &mut World, schedule: &mut Schedule, delta_ms: u32) {
    step_world_time_ms(world, delta_ms);
    schedule.run(world);
    world.clear_trackers();
}
