//! ECS resources made available to systems.
//!
//! Overview
//! - `engineconfig` – INI-backed settings (hold policy, time scale, asset root)
//! - `tilesetstore` – registry of loaded tilesets, tracks and external references
//! - `worldtime` – simulation time and delta in milliseconds
pub mod engineconfig;
pub mod tilesetstore;
pub mod worldtime;
