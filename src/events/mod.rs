//! Event types observed by gameplay code.
//!
//! Submodules:
//! - [`animation`] – playback reached a hold frame
pub mod animation;
