//! Per-entity signal bag.
//!
//! Gameplay code writes scalars, integers and flags here;
//! [`AnimationController`](crate::components::animation::AnimationController)
//! rules read them, and the animation system raises
//! [`ANIMATION_HELD_FLAG`](crate::systems::animation::ANIMATION_HELD_FLAG).

use bevy_ecs::prelude::Component;
use rustc_hash::{FxHashMap, FxHashSet};

/// Keyed values, one map per kind; keys of different kinds never collide.
#[derive(Debug, Clone, Default, Component)]
pub struct Signals {
    pub scalars: FxHashMap<String, f32>,
    pub integers: FxHashMap<String, i32>,
    pub flags: FxHashSet<String>,
}

impl Signals {
    pub fn set_scalar(&mut self, key: impl Into<String>, value: f32) {
        self.scalars.insert(key.into(), value);
    }
    pub fn get_scalar(&self, key: &str) -> Option<f32> {
        self.scalars.get(key).copied()
    }
    pub fn set_integer(&mut self, key: impl Into<String>, value: i32) {
        self.integers.insert(key.into(), value);
    }
    pub fn get_integer(&self, key: &str) -> Option<i32> {
        self.integers.get(key).copied()
    }
    pub fn set_flag(&mut self, key: impl Into<String>) {
        self.flags.insert(key.into());
    }
    pub fn clear_flag(&mut self, key: &str) {
        self.flags.remove(key);
    }
    pub fn has_flag(&self, key: &str) -> bool {
        self.flags.contains(key)
    }

    pub fn with_flag(mut self, key: impl Into<String>) -> Self {
        self.set_flag(key);
        self
    }
    pub fn with_integer(mut self, key: impl Into<String>, value: i32) -> Self {
        self.set_integer(key, value);
        self
    }
    pub fn with_scalar(mut self, key: impl Into<String>, value: f32) -> Self {
        self.set_scalar(key, value);
        self
    }
}
