//! Engine configuration resource.
//!
//! Settings loaded from an INI file. Defaults are safe to run with when the
//! file is missing.
//!
//! # Configuration File Format
//!
//! ```ini
//! [animation]
//! hold_threshold_ms = 10000
//! zero_duration_holds = true
//! time_scale = 1.0
//!
//! [assets]
//! tileset_dir = ./assets/tilesets
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

use crate::error::{TileError, TileResult};
use crate::tiles::HoldPolicy;
use crate::tiles::track::DEFAULT_HOLD_THRESHOLD_MS;

const DEFAULT_ZERO_DURATION_HOLDS: bool = true;
const DEFAULT_TIME_SCALE: f32 = 1.0;
const DEFAULT_TILESET_DIR: &str = "./assets/tilesets";
pub const DEFAULT_CONFIG_PATH: &str = "./tilesmith.ini";

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Frame durations at or above this are hold frames.
    pub hold_threshold_ms: u32,
    /// A zero frame duration means "indefinite".
    pub zero_duration_holds: bool,
    /// Multiplier applied to [`WorldTime`](crate::resources::worldtime::WorldTime).
    pub time_scale: f32,
    /// Root that tileset ids are relative to.
    pub tileset_dir: PathBuf,
    pub config_path: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self {
            hold_threshold_ms: DEFAULT_HOLD_THRESHOLD_MS,
            zero_duration_holds: DEFAULT_ZERO_DURATION_HOLDS,
            time_scale: DEFAULT_TIME_SCALE,
            tileset_dir: PathBuf::from(DEFAULT_TILESET_DIR),
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load values from `config_path`. Missing keys keep their current values.
    pub fn load_from_file(&mut self) -> TileResult<()> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| TileError::Config(format!("Failed to load config file: {}", e)))?;

        // [animation] section
        if let Some(threshold) = config.getuint("animation", "hold_threshold_ms").ok().flatten() {
            self.hold_threshold_ms = u32::try_from(threshold).map_err(|_| {
                TileError::Config(format!("hold_threshold_ms out of range: {}", threshold))
            })?;
        }
        if let Some(zero) = config.getbool("animation", "zero_duration_holds").ok().flatten() {
            self.zero_duration_holds = zero;
        }
        if let Some(scale) = config.getfloat("animation", "time_scale").ok().flatten() {
            if !scale.is_finite() || scale < 0.0 {
                return Err(TileError::Config(format!("invalid time_scale: {}", scale)));
            }
            self.time_scale = scale as f32;
        }

        // [assets] section
        if let Some(dir) = config.get("assets", "tileset_dir") {
            self.tileset_dir = PathBuf::from(dir);
        }

        info!(
            "Loaded config: hold_threshold={}ms, zero_holds={}, time_scale={}, tilesets={:?}",
            self.hold_threshold_ms, self.zero_duration_holds, self.time_scale, self.tileset_dir
        );
        Ok(())
    }

    pub fn save_to_file(&self) -> TileResult<()> {
        let mut config = Ini::new();

        config.set(
            "animation",
            "hold_threshold_ms",
            Some(self.hold_threshold_ms.to_string()),
        );
        config.set(
            "animation",
            "zero_duration_holds",
            Some(self.zero_duration_holds.to_string()),
        );
        config.set("animation", "time_scale", Some(self.time_scale.to_string()));
        config.set(
            "assets",
            "tileset_dir",
            Some(self.tileset_dir.to_string_lossy().into_owned()),
        );

        config
            .write(&self.config_path)
            .map_err(|e| TileError::Config(format!("Failed to save config file: {}", e)))?;

        info!("Saved config to {:?}", self.config_path);
        Ok(())
    }

    /// Hold policy handed to the tileset loader.
    pub fn hold_policy(&self) -> HoldPolicy {
        HoldPolicy {
            threshold_ms: self.hold_threshold_ms,
            zero_is_hold: self.zero_duration_holds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("tilesmith-{}-{}.ini", name, std::process::id()))
    }

    #[test]
    fn test_defaults() {
        let config = EngineConfig::new();
        assert_eq!(config.hold_policy(), HoldPolicy::default());
        assert_eq!(config.time_scale, 1.0);
    }

    #[test]
    fn test_missing_file_is_error() {
        let mut config = EngineConfig::with_path(temp_path("missing"));
        assert!(matches!(config.load_from_file(), Err(TileError::Config(_))));
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path("roundtrip");
        let mut saved = EngineConfig::with_path(&path);
        saved.hold_threshold_ms = 5_000;
        saved.zero_duration_holds = false;
        saved.time_scale = 0.5;
        saved.tileset_dir = PathBuf::from("data/tiles");
        saved.save_to_file().unwrap();

        let mut loaded = EngineConfig::with_path(&path);
        loaded.load_from_file().unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, saved);
        assert!(!loaded.hold_policy().is_hold(0));
        assert!(loaded.hold_policy().is_hold(5_000));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let path = temp_path("partial");
        std::fs::write(&path, "[animation]\nhold_threshold_ms = 2500\n").unwrap();
        let mut config = EngineConfig::with_path(&path);
        config.load_from_file().unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(config.hold_threshold_ms, 2_500);
        assert!(config.zero_duration_holds);
        assert_eq!(config.tileset_dir, PathBuf::from(DEFAULT_TILESET_DIR));
    }
}
