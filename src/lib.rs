//! Nebula Course - a vertically scrolling lane course engine
//!
//! Core modules:
//! - `course`: Deterministic course engine (catalog, geometry, progression, row streaming)
//! - `levels`: Built-in authored levels
//! - `hud`: Debug/HUD query snapshot
//! - `settings`: Runner configuration
//! - `error`: Catalog loading errors

pub mod course;
pub mod error;
pub mod hud;
pub mod levels;
pub mod settings;

pub use error::CatalogError;
pub use hud::HudSnapshot;
pub use settings::{LevelSource, Settings};

/// Course layout constants
pub mod consts {
    /// One block of forward progress, in pixels (1 block = 2 tiles)
    pub const BLOCK_SIZE_PX: i32 = 16;
    /// Gap between the two lanes of a dual-lane segment, in blocks
    pub const GAP_BLOCKS: i32 = 1;
    /// Blocks during which adjacent lane configurations are bridged
    pub const TRANSITION_BLOCKS: u32 = 4;
    /// Horizontal center of the 256px screen
    pub const SCREEN_CENTER_PX: i32 = 128;

    /// Tile edge length in pixels
    pub const TILE_SIZE_PX: i32 = 8;
    /// Tilemap column that lines up with screen pixel 0
    pub const TILEMAP_COLUMN_OFFSET: i32 = 4;
    /// Tilemap width in tiles
    pub const TILEMAP_COLUMNS: usize = 40;
    /// Tilemap height in tiles (circular)
    pub const TILEMAP_ROWS: usize = 32;
    /// A lane marker row is drawn every this many tile rows
    pub const LANE_MARKER_INTERVAL_ROWS: i32 = 10;
    /// Hardware scroll register wraps at this many pixels
    pub const SCROLL_WRAP_PX: i32 = 256;
}

use consts::{TILE_SIZE_PX, TILEMAP_COLUMN_OFFSET, TILEMAP_COLUMNS};

/// Convert a screen pixel X coordinate to a tilemap column (unclamped)
#[inline]
pub fn pixel_to_column(x: i32) -> i32 {
    x.div_euclid(TILE_SIZE_PX) + TILEMAP_COLUMN_OFFSET
}

/// Convert a screen pixel X coordinate to a tilemap column, clamped to the buffer
#[inline]
pub fn pixel_to_column_clamped(x: i32) -> usize {
    pixel_to_column(x).clamp(0, TILEMAP_COLUMNS as i32 - 1) as usize
}

/// Tile row index containing a world Y pixel (floors toward negative infinity)
#[inline]
pub fn tile_row_of(world_y: i32) -> i32 {
    world_y.div_euclid(TILE_SIZE_PX)
}
