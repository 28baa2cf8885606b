//! Hold-frame notifications.
//!
//! When an instance's [`AnimationCursor`] parks on a hold frame, the
//! animation system triggers an [`AnimationHeldEvent`] once. Gameplay code
//! observes it to decide which track to switch to next (for example, leave an
//! idle pose once input arrives).
//!
//! # Example
//!
//! ```ignore
//! world.add_observer(|trigger: On<AnimationHeldEvent>| {
//!     let event = trigger.event();
//!     log::info!("{:?} holds on tile {}", event.entity, event.tile);
//! });
//! ```
//!
//! [`AnimationCursor`]: crate::components::animation::AnimationCursor

use bevy_ecs::prelude::*;

use crate::tiles::{LocalId, TilesetId};

/// Emitted when playback reaches a hold frame.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct AnimationHeldEvent {
    pub entity: Entity,
    /// Tileset of the held tile, which is the track's tileset.
    pub tileset: TilesetId,
    pub tile: LocalId,
}
