//! Engine systems.
//!
//! Submodules overview
//! - [`animation`] – advance cursors, notify holds and select tracks via rules
//! - [`collision`] – resolve tile shapes into world space
//! - [`time`] – update simulation time and delta

pub mod animation;
pub mod collision;
pub mod time;
