//! Tile row generation
//!
//! Builds one tilemap row for any world Y straight from the catalog, so rows
//! ahead of (or behind) the player can be generated without touching the
//! progression state.

use super::catalog::{LevelCatalog, SegmentSpan};
use super::geometry::{LaneBounds, LaneGeometry, lane_geometry};
use crate::consts::{LANE_MARKER_INTERVAL_ROWS, TILE_SIZE_PX, TILEMAP_COLUMNS};
use crate::{pixel_to_column, tile_row_of};

/// One row of tilemap indices
pub type TileRow = [u8; TILEMAP_COLUMNS];

/// Tile indices of the course tileset
pub mod tile {
    pub const ROAD_LEFT: u8 = 0x00;
    pub const ROAD_MID_TL: u8 = 0x01;
    pub const ROAD_MID_TR: u8 = 0x02;
    pub const ROAD_MID_BL: u8 = 0x03;
    pub const ROAD_MID_BR: u8 = 0x04;
    pub const ROAD_RIGHT: u8 = 0x05;
    /// Lets the background layer show through
    pub const TRANSPARENT: u8 = 0x06;
    /// Rhythm cue drawn every few rows
    pub const LANE_MARK: u8 = 0x0B;
    /// First and last row of a segment
    pub const LANE_EDGE: u8 = 0x0C;

    /// True for any tile that is part of a lane surface
    pub fn is_road(tile: u8) -> bool {
        tile != TRANSPARENT
    }

    /// Character used for text dumps of the tilemap
    pub fn glyph(tile: u8) -> char {
        match tile {
            ROAD_LEFT | ROAD_RIGHT => '|',
            ROAD_MID_TL..=ROAD_MID_BR => '.',
            LANE_MARK => '-',
            LANE_EDGE => '=',
            TRANSPARENT => ' ',
            _ => '?',
        }
    }
}

/// Generate the row of tiles covering world pixels `[world_y, world_y + 8)`.
///
/// Past the end of the catalog `fallback` supplies the lane geometry and no
/// segment edge rows are drawn. Identical arguments always give identical rows.
pub fn generate_row(catalog: &LevelCatalog, fallback: LaneGeometry, world_y: i32) -> TileRow {
    let mut tiles = [tile::TRANSPARENT; TILEMAP_COLUMNS];

    let (geometry, span) = match catalog.locate(world_y) {
        Some(span) => (lane_geometry(catalog.segments()[span.index].layout), Some(span)),
        None => (fallback, None),
    };

    for lane in geometry.lanes() {
        fill_lane(&mut tiles, lane, world_y, span.as_ref());
    }
    tiles
}

/// Tile column range `[start, end)` covered by a lane, clamped to the buffer
pub fn lane_columns(lane: LaneBounds) -> (usize, usize) {
    let max = TILEMAP_COLUMNS as i32;
    let start = pixel_to_column(lane.left).clamp(0, max - 1);
    let end = pixel_to_column(lane.right).clamp(0, max);
    (start as usize, end as usize)
}

fn fill_lane(tiles: &mut TileRow, lane: LaneBounds, world_y: i32, span: Option<&SegmentSpan>) {
    let (start, end) = lane_columns(lane);
    if end <= start {
        return;
    }

    tiles[start] = tile::ROAD_LEFT;
    for (col, slot) in tiles.iter_mut().enumerate().take(end - 1).skip(start + 1) {
        *slot = mid_tile(col, world_y, span);
    }
    if end > start + 1 {
        tiles[end - 1] = tile::ROAD_RIGHT;
    }
}

/// Surface tile between the lane borders
fn mid_tile(col: usize, world_y: i32, span: Option<&SegmentSpan>) -> u8 {
    if let Some(span) = span {
        let into_segment = world_y - span.start_y;
        let to_end = span.end_y - world_y;
        if (0..TILE_SIZE_PX).contains(&into_segment) || (1..=TILE_SIZE_PX).contains(&to_end) {
            return tile::LANE_EDGE;
        }
    }

    let row = tile_row_of(world_y);
    if world_y >= 0 && row % LANE_MARKER_INTERVAL_ROWS == 0 {
        return tile::LANE_MARK;
    }

    // 2x2 surface pattern
    match (row & 1 == 0, col & 1 == 0) {
        (true, true) => tile::ROAD_MID_TL,
        (true, false) => tile::ROAD_MID_TR,
        (false, true) => tile::ROAD_MID_BL,
        (false, false) => tile::ROAD_MID_BR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::BLOCK_SIZE_PX;
    use crate::course::catalog::{LaneConfig, ObjectRange, Segment};

    fn catalog() -> LevelCatalog {
        LevelCatalog::new(
            "ROWS",
            vec![
                Segment::new(10, LaneConfig::Center, 4, ObjectRange::default()),
                Segment::new(10, LaneConfig::Both, 2, ObjectRange::default()),
            ],
            Vec::new(),
        )
        .unwrap()
    }

    fn fallback(cat: &LevelCatalog) -> LaneGeometry {
        lane_geometry(cat.segments()[cat.last_index()].layout)
    }

    #[test]
    fn test_center_lane_columns() {
        let cat = catalog();
        // A plain surface row: not an edge, not a marker
        let y = 3 * TILE_SIZE_PX;
        let row = generate_row(&cat, fallback(&cat), y);

        // Lane 96..160 -> columns 16..24
        assert_eq!(row[15], tile::TRANSPARENT);
        assert_eq!(row[16], tile::ROAD_LEFT);
        assert_eq!(row[23], tile::ROAD_RIGHT);
        assert_eq!(row[24], tile::TRANSPARENT);
        // Odd row: bottom half of the 2x2 pattern
        assert_eq!(row[17], tile::ROAD_MID_BR);
        assert_eq!(row[18], tile::ROAD_MID_BL);
    }

    #[test]
    fn test_segment_edges_and_markers() {
        let cat = catalog();
        let fb = fallback(&cat);

        let first = generate_row(&cat, fb, 0);
        assert_eq!(first[18], tile::LANE_EDGE);

        let last = generate_row(&cat, fb, 10 * BLOCK_SIZE_PX - TILE_SIZE_PX);
        assert_eq!(last[18], tile::LANE_EDGE);

        // Tile row 10 is a marker row inside segment 0
        let marker = generate_row(&cat, fb, 10 * TILE_SIZE_PX);
        assert_eq!(marker[18], tile::LANE_MARK);
        assert_eq!(marker[16], tile::ROAD_LEFT);
    }

    #[test]
    fn test_dual_lane_row_has_gap() {
        let cat = catalog();
        let y = 10 * BLOCK_SIZE_PX + 3 * TILE_SIZE_PX;
        let row = generate_row(&cat, fallback(&cat), y);
        // Left lane 88..120 -> columns 15..19, right lane 136..168 -> 21..25
        assert_eq!(row[15], tile::ROAD_LEFT);
        assert_eq!(row[18], tile::ROAD_RIGHT);
        assert_eq!(row[19], tile::TRANSPARENT);
        assert_eq!(row[20], tile::TRANSPARENT);
        assert_eq!(row[21], tile::ROAD_LEFT);
        assert_eq!(row[24], tile::ROAD_RIGHT);
    }

    #[test]
    fn test_past_end_uses_fallback() {
        let cat = catalog();
        let fb = lane_geometry(crate::course::geometry::LaneLayout::new(LaneConfig::Center, 2));
        let row = generate_row(&cat, fb, cat.total_pixels() + 3 * TILE_SIZE_PX);
        let road = row.iter().filter(|&&t| tile::is_road(t)).count();
        assert_eq!(road, 4);
        assert!(!row.contains(&tile::LANE_EDGE));
    }

    #[test]
    fn test_deterministic() {
        let cat = catalog();
        let fb = fallback(&cat);
        for y in (-64..400).step_by(8) {
            assert_eq!(generate_row(&cat, fb, y), generate_row(&cat, fb, y));
        }
    }

    #[test]
    fn test_lane_columns_clamped() {
        assert_eq!(lane_columns(LaneBounds::new(-100, 40)), (0, 9));
        assert_eq!(lane_columns(LaneBounds::new(200, 400)), (29, 40));
    }
}
