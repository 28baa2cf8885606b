//! Animation systems.
//!
//! - [`animation`] advances every [`AnimationCursor`] by the tick's delta and
//!   writes the resulting tile into the entity's [`TileInstance`]. Entering a
//!   hold frame triggers [`AnimationHeldEvent`] and sets the
//!   [`ANIMATION_HELD_FLAG`] signal.
//! - [`animation_controller`] selects which tile an entity should show based
//!   on rule conditions evaluated against its [`Signals`], switching or
//!   removing the cursor as needed.
//!
//! # Animation Flow
//!
//! 1. Tracks live in [`TilesetStore`], owned by the tileset that authored them
//! 2. Entities carry an [`AnimationCursor`] naming a track by [`TrackRef`](crate::tiles::TrackRef)
//! 3. The `animation` system advances the cursor and updates [`TileInstance`]
//! 4. The collision system picks up the tile change and rebuilds world shapes

use bevy_ecs::prelude::*;
use log::{debug, error};

use crate::components::animation::{AnimationController, AnimationCursor, Condition};
use crate::components::signals::Signals;
use crate::components::tileinstance::TileInstance;
use crate::events::animation::AnimationHeldEvent;
use crate::resources::tilesetstore::TilesetStore;
use crate::resources::worldtime::WorldTime;

/// Signal flag set while an entity's cursor is parked on a hold frame.
pub const ANIMATION_HELD_FLAG: &str = "animation_held";

/// Advance animation playback and update the displayed tile.
///
/// Contract
/// - Reads [`WorldTime::delta_ms`].
/// - Looks tracks up in [`TilesetStore`]; cursors naming a missing track are
///   logged and skipped.
/// - Writes [`TileInstance`] only when the tile actually changes, so change
///   detection downstream fires once per frame change.
pub fn animation(
    mut query: Query<(
        Entity,
        &mut AnimationCursor,
        &mut TileInstance,
        Option<&mut Signals>,
    )>,
    store: Res<TilesetStore>,
    time: Res<WorldTime>,
    mut commands: Commands,
) {
    for (entity, mut cursor, mut instance, maybe_signals) in query.iter_mut() {
        let Some(track) = store.track(&cursor.track) else {
            error!("Entity {:?} plays missing track {:?}", entity, cursor.track);
            continue;
        };

        let tile = cursor.advance(track, time.delta_ms);

        instance.set_if_neq(TileInstance {
            tileset: cursor.track.tileset.clone(),
            tile,
        });

        let holding = cursor.is_holding(track);
        if !holding {
            cursor.held_notified = false;
        } else if !cursor.held_notified {
            cursor.held_notified = true;
            debug!("Entity {:?} holds on {}:{}", entity, cursor.track.tileset, tile);
            if let Some(mut signals) = maybe_signals {
                signals.set_flag(ANIMATION_HELD_FLAG);
            }
            commands.trigger(AnimationHeldEvent {
                entity,
                tileset: cursor.track.tileset.clone(),
                tile,
            });
        }
    }
}

/// Evaluate a controller condition against an entity's current signals.
///
/// Missing keys make comparisons false.
pub fn evaluate_condition(signals: &Signals, condition: &Condition) -> bool {
    match condition {
        Condition::ScalarCmp { key, op, value } => signals
            .get_scalar(key)
            .is_some_and(|signal_value| op.compare_scalar(signal_value, *value)),
        Condition::IntegerCmp { key, op, value } => signals
            .get_integer(key)
            .is_some_and(|signal_value| op.compare(signal_value, *value)),
        Condition::HasFlag { key } => signals.has_flag(key),
        Condition::LacksFlag { key } => !signals.has_flag(key),
        Condition::All(conditions) => conditions
            .iter()
            .all(|cond| evaluate_condition(signals, cond)),
        Condition::Any(conditions) => conditions
            .iter()
            .any(|cond| evaluate_condition(signals, cond)),
        Condition::Not(cond) => !evaluate_condition(signals, cond),
    }
}

/// Select the tile an entity shows according to its controller rules.
///
/// Targets are looked up in the controller's own tileset. The first matching
/// rule wins, else the fallback. When the selection changes, the target's
/// animation (inline or external) is resolved and the cursor is switched to
/// it, or inserted if the entity had none. A static target removes the
/// cursor and shows the tile itself.
pub fn animation_controller(
    mut query: Query<(
        Entity,
        &mut AnimationController,
        &mut TileInstance,
        Option<&mut AnimationCursor>,
        &mut Signals,
    )>,
    store: Res<TilesetStore>,
    mut commands: Commands,
) {
    for (entity, mut controller, mut instance, cursor, mut signals) in query.iter_mut() {
        let selected = controller
            .rules
            .iter()
            .find(|rule| evaluate_condition(&signals, &rule.when))
            .map(|rule| rule.tile)
            .unwrap_or(controller.fallback);

        if selected == controller.current {
            continue;
        }

        let def = match store.lookup(controller.tileset.as_str(), selected) {
            Ok(def) => def,
            Err(err) => {
                error!("Entity {:?} controller target: {}", entity, err);
                continue;
            }
        };
        let track = match store.resolve_animation(def) {
            Ok(track) => track,
            Err(err) => {
                error!("Entity {:?} controller target: {}", entity, err);
                continue;
            }
        };

        debug!("Entity {:?} switches {} -> {}", entity, controller.current, selected);
        controller.current = selected;
        signals.clear_flag(ANIMATION_HELD_FLAG);

        match track {
            Some(track_ref) => {
                let first_tile = store
                    .track(&track_ref)
                    .and_then(|t| t.frame(0))
                    .map(|f| f.tile)
                    .unwrap_or(selected);
                instance.set_if_neq(TileInstance {
                    tileset: track_ref.tileset.clone(),
                    tile: first_tile,
                });
                match cursor {
                    Some(mut cursor) => cursor.switch_track(track_ref),
                    None => {
                        commands.entity(entity).insert(AnimationCursor::new(track_ref));
                    }
                }
            }
            None => {
                instance.set_if_neq(TileInstance {
                    tileset: def.tileset.clone(),
                    tile: selected,
                });
                if cursor.is_some() {
                    commands.entity(entity).remove::<AnimationCursor>();
                }
            }
        }
    }
}
