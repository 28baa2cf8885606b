//! ECS components for placed tiles.
//!
//! Submodules overview:
//! - [`animation`] – playback cursor and a rule-based controller selecting tiles
//! - [`mapposition`] – world-space position of an instance
//! - [`signals`] – per-entity signal storage read by controllers
//! - [`tileinstance`] – which tile an entity shows, and its placement flips
//! - [`worldshapes`] – resolved world-space collision shapes

pub mod animation;
pub mod mapposition;
pub mod signals;
pub mod tileinstance;
pub mod worldshapes;
