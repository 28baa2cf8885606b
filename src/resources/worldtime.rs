use bevy_ecs::prelude::Resource;

/// Simulation clock in whole milliseconds.
///
/// Fractions of a millisecond left over from scaled frame deltas are carried
/// into the next update, so variable timesteps add up without drift.
#[derive(Resource, Clone, Copy, Debug)]
pub struct WorldTime {
    pub elapsed_ms: u64,
    pub delta_ms: u32,
    pub time_scale: f32,
    pub carry_ms: f32,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            elapsed_ms: 0,
            delta_ms: 0,
            time_scale: 1.0,
            carry_ms: 0.0,
        }
    }
}

impl WorldTime {
    pub fn with_time_scale(mut self, time_scale: f32) -> Self {
        self.time_scale = time_scale;
        self
    }

    /// Elapsed time in seconds.
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed_ms as f64 / 1000.0
    }
}
