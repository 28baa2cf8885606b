//! Time update.
//!
//! Updates the shared [`WorldTime`](crate::resources::worldtime::WorldTime)
//! resource once per tick, applying `time_scale` to the provided delta.
use bevy_ecs::prelude::*;

use crate::resources::worldtime::WorldTime;

/// Advance `WorldTime` by `dt` unscaled seconds.
///
/// Negative or non-finite deltas count as zero.
pub fn update_world_time(world: &mut World, dt: f32) {
    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
    advance_scaled(&mut world.resource_mut::<WorldTime>(), f64::from(dt) * 1000.0);
}

/// Advance `WorldTime` by `delta_ms` unscaled milliseconds.
pub fn step_world_time_ms(world: &mut World, delta_ms: u32) {
    advance_scaled(&mut world.resource_mut::<WorldTime>(), f64::from(delta_ms));
}

fn advance_scaled(wt: &mut WorldTime, raw_ms: f64) {
    let scaled_ms = raw_ms * f64::from(wt.time_scale.max(0.0)) + f64::from(wt.carry_ms);
    let whole = scaled_ms.floor();
    let delta_ms = if whole >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        whole as u32
    };
    wt.carry_ms = (scaled_ms - whole) as f32;
    wt.delta_ms = delta_ms;
    wt.elapsed_ms += u64::from(delta_ms);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fractional_carry() {
        let mut world = World::new();
        world.insert_resource(WorldTime::default());
        // 7.8125 ms three times => 7, 8, 8
        update_world_time(&mut world, 0.0078125);
        assert_eq!(world.resource::<WorldTime>().delta_ms, 7);
        update_world_time(&mut world, 0.0078125);
        assert_eq!(world.resource::<WorldTime>().delta_ms, 8);
        update_world_time(&mut world, 0.0078125);
        assert_eq!(world.resource::<WorldTime>().delta_ms, 8);
        assert_eq!(world.resource::<WorldTime>().elapsed_ms, 23);
    }

    #[test]
    fn test_time_scale() {
        let mut world = World::new();
        world.insert_resource(WorldTime::default().with_time_scale(2.0));
        update_world_time(&mut world, 0.25);
        assert_eq!(world.resource::<WorldTime>().delta_ms, 500);
    }

    #[test]
    fn test_negative_delta_is_ignored() {
        let mut world = World::new();
        world.insert_resource(WorldTime::default());
        update_world_time(&mut world, -1.0);
        update_world_time(&mut world, f32::NAN);
        assert_eq!(world.resource::<WorldTime>().elapsed_ms, 0);
    }

    #[test]
    fn test_step_ms() {
        let mut world = World::new();
        world.insert_resource(WorldTime::default());
        step_world_time_ms(&mut world, 40);
        assert_eq!(world.resource::<WorldTime>().delta_ms, 40);
    }

    #[test]
    fn test_step_ms_applies_time_scale() {
        let mut world = World::new();
        world.insert_resource(WorldTime::default().with_time_scale(0.5));
        step_world_time_ms(&mut world, 40);
        assert_eq!(world.resource::<WorldTime>().delta_ms, 20);
        // 1.5ms then 1.5 + 0.5 carried
        step_world_time_ms(&mut world, 3);
        assert_eq!(world.resource::<WorldTime>().delta_ms, 1);
        step_world_time_ms(&mut world, 3);
        assert_eq!(world.resource::<WorldTime>().delta_ms, 2);
        assert_eq!(world.resource::<WorldTime>().elapsed_ms, 23);
    }
}
