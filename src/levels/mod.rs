//! Built-in authored levels
//!
//! Levels are stored in the packed record format and decoded on demand.

mod level1;
mod level_test;

use crate::course::LevelCatalog;
use crate::error::CatalogError;

pub use level1::level1;
pub use level_test::test_level;

/// Names accepted by [`by_name`]
pub const BUILTIN_NAMES: [&str; 2] = ["level1", "test"];

/// Lane codes for packed segment configs
pub(crate) mod lanes {
    pub const CENTER: u8 = 0;
    pub const LEFT: u8 = 1;
    pub const RIGHT: u8 = 2;
    pub const BOTH: u8 = 3;
}

/// Kind, lane slot and size codes for packed object data
pub(crate) mod obj {
    pub const HOLE: u8 = 1;
    pub const LASER: u8 = 2;
    pub const POWERUP: u8 = 3;

    pub const LANE_LEFT: u8 = 0;
    pub const LANE_RIGHT: u8 = 1;
    pub const LANE_CENTER: u8 = 2;

    pub const SMALL: u8 = 0;
    pub const PARTIAL: u8 = 1;
}

pub fn by_name(name: &str) -> Result<LevelCatalog, CatalogError> {
    match name.to_ascii_lowercase().as_str() {
        "level1" | "1" => level1(),
        "test" => test_level(),
        _ => Err(CatalogError::UnknownLevel(name.to_string())),
    }
}
