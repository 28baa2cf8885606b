//! Tilesmith library.
//!
//! Tile metadata and animation resolution for tile-based 2D games: tileset
//! indexing, looping/holding animation tracks, and world-space collision
//! shapes. The [`tiles`] module is plain data; the ECS components,
//! resources, systems and events build on it.

pub mod components;
pub mod engine;
pub mod error;
pub mod events;
pub mod resources;
pub mod systems;
pub mod tiles;
