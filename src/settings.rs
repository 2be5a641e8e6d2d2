//! Runner settings
//!
//! Stored as JSON next to the binary; command-line flags override them.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::course::{LevelCatalog, procgen};
use crate::error::CatalogError;
use crate::levels;

/// Where the course comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelSource {
    /// One of the built-in levels, by name
    Builtin(String),
    /// A JSON level file
    File(PathBuf),
    /// A procedurally generated course
    Seed { seed: u64, sections: usize },
}

impl Default for LevelSource {
    fn default() -> Self {
        LevelSource::Builtin("level1".to_string())
    }
}

impl LevelSource {
    pub fn load(&self) -> Result<LevelCatalog, CatalogError> {
        match self {
            LevelSource::Builtin(name) => levels::by_name(name),
            LevelSource::File(path) => LevelCatalog::load(path),
            LevelSource::Seed { seed, sections } => procgen::generate(*seed, *sections),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub level: LevelSource,

    // === Simulation ===
    /// Pixels scrolled per tick (the course scrolls toward negative Y)
    pub scroll_speed: i32,
    /// Stop after this many ticks even if the level is not complete
    pub max_ticks: u32,
    /// Scroll back this many pixels every `jitter_interval` ticks (0 = off)
    pub jitter_px: i32,
    pub jitter_interval: u32,

    // === Output ===
    /// Log a HUD line every this many ticks (0 = off)
    pub hud_interval: u32,
    /// Print the visible tile buffer when the run ends
    pub dump_tiles: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            level: LevelSource::default(),

            scroll_speed: 2,
            max_ticks: 10_000,
            jitter_px: 0,
            jitter_interval: 16,

            hud_interval: 0,
            dump_tiles: false,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    return settings;
                }
                Err(e) => log::warn!("Ignoring invalid settings {}: {}", path.display(), e),
            },
            Err(e) => log::debug!("No settings at {}: {}", path.display(), e),
        }

        log::info!("Using default settings");
        Self::default()
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), CatalogError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Settings saved to {}", path.as_ref().display());
        Ok(())
    }

    /// Scroll delta for a given tick, jitter included
    pub fn scroll_step(&self, tick: u32) -> i32 {
        let jittering =
            self.jitter_px > 0 && self.jitter_interval > 0 && tick % self.jitter_interval == 0;
        if jittering {
            self.jitter_px
        } else {
            -self.scroll_speed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_fills_defaults() {
        let json = r#"{ "scroll_speed": 4, "level": { "seed": { "seed": 9, "sections": 3 } } }"#;
        let settings: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.scroll_speed, 4);
        assert_eq!(settings.max_ticks, Settings::default().max_ticks);
        assert_eq!(settings.level, LevelSource::Seed { seed: 9, sections: 3 });
    }

    #[test]
    fn test_save_then_load() {
        let name = format!("nebula-settings-{}.json", std::process::id());
        let path = std::env::temp_dir().join(name);
        let settings = Settings {
            level: LevelSource::Builtin("test".into()),
            dump_tiles: true,
            ..Default::default()
        };
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path), settings);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        assert_eq!(Settings::load("/nonexistent/settings.json"), Settings::default());
    }

    #[test]
    fn test_scroll_step_jitter() {
        let settings = Settings {
            scroll_speed: 3,
            jitter_px: 5,
            jitter_interval: 4,
            ..Default::default()
        };
        assert_eq!(settings.scroll_step(1), -3);
        assert_eq!(settings.scroll_step(4), 5);
        assert_eq!(Settings::default().scroll_step(16), -2);
    }

    #[test]
    fn test_level_sources_load() {
        assert_eq!(LevelSource::default().load().unwrap().name(), "LEVEL 1");
        assert!(LevelSource::Seed { seed: 1, sections: 2 }.load().is_ok());
        assert!(matches!(
            LevelSource::File("/nonexistent.json".into()).load(),
            Err(CatalogError::Io(_))
        ));
    }
}
