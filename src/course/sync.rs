//! Scroll synchronization for the circular tile buffer
//!
//! The buffer holds `TILEMAP_ROWS` world rows. World row `w` lives in slot
//! `(ROWS - 1 - w) mod ROWS`, so the slot at the top of the hardware scroll
//! window always holds the frontmost row. Each scroll update regenerates only
//! the rows that entered the window; a jump of a full revolution or more
//! regenerates everything.

use glam::IVec2;

use super::catalog::LevelCatalog;
use super::geometry::LaneGeometry;
use super::rowgen::{TileRow, generate_row, tile};
use crate::consts::{SCROLL_WRAP_PX, TILE_SIZE_PX, TILEMAP_COLUMNS, TILEMAP_ROWS};

const ROWS: i32 = TILEMAP_ROWS as i32;

/// Destination for regenerated rows (video memory, a test double, ...)
pub trait TileSink {
    fn write_row(&mut self, slot: usize, row: &TileRow);
    fn set_scroll(&mut self, value: u8);
}

/// Circular tilemap: `TILEMAP_ROWS` rows of `TILEMAP_COLUMNS` tiles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileBuffer {
    rows: [TileRow; TILEMAP_ROWS],
    scroll: u8,
}

impl Default for TileBuffer {
    fn default() -> Self {
        Self {
            rows: [[tile::TRANSPARENT; TILEMAP_COLUMNS]; TILEMAP_ROWS],
            scroll: 0,
        }
    }
}

impl TileBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row(&self, slot: usize) -> &TileRow {
        &self.rows[slot % TILEMAP_ROWS]
    }

    pub fn tile_at(&self, col: usize, slot: usize) -> u8 {
        self.row(slot)[col.min(TILEMAP_COLUMNS - 1)]
    }

    /// Hardware scroll register value
    pub fn scroll(&self) -> u8 {
        self.scroll
    }

    /// Row-major tile bytes, ready for upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.rows)
    }
}

impl TileSink for TileBuffer {
    fn write_row(&mut self, slot: usize, row: &TileRow) {
        self.rows[slot % TILEMAP_ROWS] = *row;
    }

    fn set_scroll(&mut self, value: u8) {
        self.scroll = value;
    }
}

/// Result of one synchronization pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub rows_written: usize,
    pub full_refresh: bool,
}

/// Keeps the tile buffer in step with the scroll position
#[derive(Debug, Clone)]
pub struct ScrollSync {
    buffer: TileBuffer,
    scroll_position: i32,
    front_row: i32,
    /// Slots written since the last flush
    dirty: Vec<usize>,
}

impl ScrollSync {
    /// Empty buffer positioned at `scroll_position`; call `refresh` to fill it
    pub fn new(scroll_position: i32) -> Self {
        let mut buffer = TileBuffer::new();
        buffer.set_scroll(scroll_register(scroll_position));
        Self {
            buffer,
            scroll_position,
            front_row: front_row(scroll_position),
            dirty: Vec::with_capacity(TILEMAP_ROWS),
        }
    }

    pub fn buffer(&self) -> &TileBuffer {
        &self.buffer
    }

    pub fn scroll_position(&self) -> i32 {
        self.scroll_position
    }

    /// World row currently in the top slot
    pub fn front_row(&self) -> i32 {
        self.front_row
    }

    /// Regenerate every slot for the current scroll position
    pub fn refresh(&mut self, catalog: &LevelCatalog, fallback: LaneGeometry) -> SyncReport {
        let back = self.front_row - (ROWS - 1);
        for world_row in back..=self.front_row {
            self.write(catalog, fallback, world_row);
        }
        log::debug!(
            "Tile buffer refreshed: rows {}..={} at scroll {}",
            back,
            self.front_row,
            self.scroll_position
        );
        SyncReport {
            rows_written: TILEMAP_ROWS,
            full_refresh: true,
        }
    }

    /// Move to a new scroll position and regenerate the rows that came into view
    pub fn sync(
        &mut self,
        catalog: &LevelCatalog,
        fallback: LaneGeometry,
        scroll_position: i32,
    ) -> SyncReport {
        let old_front = self.front_row;
        let new_front = front_row(scroll_position);
        let crossed = new_front - old_front;

        self.scroll_position = scroll_position;
        self.front_row = new_front;
        self.buffer.set_scroll(scroll_register(scroll_position));

        if crossed.abs() >= ROWS {
            return self.refresh(catalog, fallback);
        }

        // Forward: rows appear at the top. Backward: rows reappear at the bottom.
        let exposed = if crossed > 0 {
            old_front + 1..=new_front
        } else {
            new_front - (ROWS - 1)..=old_front - ROWS
        };

        let mut rows_written = 0;
        for world_row in exposed {
            self.write(catalog, fallback, world_row);
            rows_written += 1;
        }
        SyncReport {
            rows_written,
            full_refresh: false,
        }
    }

    fn write(&mut self, catalog: &LevelCatalog, fallback: LaneGeometry, world_row: i32) {
        let row = generate_row(catalog, fallback, world_row * TILE_SIZE_PX);
        let slot = slot_for_row(world_row);
        self.buffer.write_row(slot, &row);
        if !self.dirty.contains(&slot) {
            self.dirty.push(slot);
        }
    }

    /// Copy rows written since the last flush, and the scroll value, to a sink
    pub fn flush_to<S: TileSink>(&mut self, sink: &mut S) -> usize {
        let written = self.dirty.len();
        for slot in self.dirty.drain(..) {
            sink.write_row(slot, &self.buffer.rows[slot]);
        }
        sink.set_scroll(self.buffer.scroll);
        written
    }

    /// Tile displayed at a screen pixel (x from the left edge, y from the top)
    pub fn tile_under(&self, screen: IVec2) -> u8 {
        let col = crate::pixel_to_column_clamped(screen.x);
        let y = screen.y.rem_euclid(SCROLL_WRAP_PX) + self.buffer.scroll as i32;
        let slot = (y.rem_euclid(SCROLL_WRAP_PX) / TILE_SIZE_PX) as usize;
        self.buffer.tile_at(col, slot)
    }

    /// Text dump of the buffer in display order, top of the screen first
    pub fn to_ascii(&self) -> String {
        let top = self.buffer.scroll as usize / TILE_SIZE_PX as usize;
        let mut out = String::with_capacity((TILEMAP_COLUMNS + 1) * TILEMAP_ROWS);
        for i in 0..TILEMAP_ROWS {
            let row = self.buffer.row((top + i) % TILEMAP_ROWS);
            out.extend(row.iter().map(|&t| tile::glyph(t)));
            out.push('\n');
        }
        out
    }
}

/// Frontmost world row visible at a scroll position
pub fn front_row(scroll_position: i32) -> i32 {
    let travel = -(scroll_position as i64);
    // Partially scrolled-in rows already count as visible
    let ahead = (travel + TILE_SIZE_PX as i64 - 1).div_euclid(TILE_SIZE_PX as i64);
    (ahead + ROWS as i64 - 1) as i32
}

/// Buffer slot that holds a world row
pub fn slot_for_row(world_row: i32) -> usize {
    (ROWS - 1 - world_row).rem_euclid(ROWS) as usize
}

/// Slot at the top of the hardware scroll window
pub fn top_slot(scroll_position: i32) -> usize {
    (scroll_register(scroll_position) as i32 / TILE_SIZE_PX) as usize
}

/// Hardware scroll register value for a scroll position
pub fn scroll_register(scroll_position: i32) -> u8 {
    scroll_position.rem_euclid(SCROLL_WRAP_PX) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::course::catalog::{LaneConfig, ObjectRange, Segment};
    use crate::course::geometry::{LaneLayout, lane_geometry};

    fn catalog() -> LevelCatalog {
        LevelCatalog::new(
            "SYNC",
            vec![
                Segment::new(40, LaneConfig::Center, 4, ObjectRange::default()),
                Segment::new(40, LaneConfig::Both, 3, ObjectRange::default()),
            ],
            Vec::new(),
        )
        .unwrap()
    }

    fn fallback() -> LaneGeometry {
        lane_geometry(LaneLayout::new(LaneConfig::Both, 3))
    }

    #[test]
    fn test_slot_mapping_matches_hardware_top() {
        for scroll in [0, -1, -7, -8, -9, -255, -256, -1000, 5] {
            assert_eq!(top_slot(scroll), slot_for_row(front_row(scroll)), "scroll {scroll}");
        }
        assert_eq!(front_row(0), 31);
        assert_eq!(front_row(-1), 32);
        assert_eq!(front_row(-8), 32);
        assert_eq!(slot_for_row(0), 31);
    }

    #[test]
    fn test_single_row_crossing() {
        let cat = catalog();
        let mut sync = ScrollSync::new(0);
        sync.refresh(&cat, fallback());

        assert_eq!(sync.sync(&cat, fallback(), -1).rows_written, 1);
        for scroll in -7..=-2 {
            assert_eq!(sync.sync(&cat, fallback(), scroll).rows_written, 0);
        }
        assert_eq!(sync.sync(&cat, fallback(), -9).rows_written, 1);
    }

    #[test]
    fn test_incremental_matches_full_refresh() {
        let cat = catalog();
        let mut incremental = ScrollSync::new(0);
        incremental.refresh(&cat, fallback());
        let mut scroll = 0;
        for step in [1, 3, 8, 13, 2, 40, 5] {
            scroll -= step;
            incremental.sync(&cat, fallback(), scroll);
        }

        let mut full = ScrollSync::new(scroll);
        full.refresh(&cat, fallback());
        assert_eq!(incremental.buffer(), full.buffer());
    }

    #[test]
    fn test_backward_jitter_restores_rows() {
        let cat = catalog();
        let mut sync = ScrollSync::new(-300);
        sync.refresh(&cat, fallback());
        sync.sync(&cat, fallback(), -317);
        let report = sync.sync(&cat, fallback(), -301);
        assert!(!report.full_refresh);
        assert_eq!(report.rows_written, 2);

        let mut full = ScrollSync::new(-301);
        full.refresh(&cat, fallback());
        assert_eq!(sync.buffer(), full.buffer());
    }

    #[test]
    fn test_large_jump_refreshes_everything() {
        let cat = catalog();
        let mut sync = ScrollSync::new(0);
        sync.refresh(&cat, fallback());
        let report = sync.sync(&cat, fallback(), -(TILE_SIZE_PX * ROWS));
        assert!(report.full_refresh);
        assert_eq!(report.rows_written, TILEMAP_ROWS);
    }

    #[test]
    fn test_flush_copies_dirty_rows() {
        let cat = catalog();
        let mut sync = ScrollSync::new(0);
        sync.refresh(&cat, fallback());
        let mut video = TileBuffer::new();
        assert_eq!(sync.flush_to(&mut video), TILEMAP_ROWS);
        assert_eq!(&video, sync.buffer());

        sync.sync(&cat, fallback(), -8);
        assert_eq!(sync.flush_to(&mut video), 1);
        assert_eq!(video.scroll(), scroll_register(-8));
        assert_eq!(sync.flush_to(&mut video), 0);
    }

    #[test]
    fn test_tile_under_reads_displayed_row() {
        let cat = catalog();
        let mut sync = ScrollSync::new(0);
        sync.refresh(&cat, fallback());
        // Bottom screen row shows world row 0: lane 96..160
        assert_eq!(sync.tile_under(IVec2::new(100, 250)), tile::ROAD_LEFT);
        assert_eq!(sync.tile_under(IVec2::new(20, 250)), tile::TRANSPARENT);
    }

    #[test]
    fn test_ascii_dump_puts_nearest_row_last() {
        let cat = catalog();
        let mut sync = ScrollSync::new(0);
        sync.refresh(&cat, fallback());
        let dump = sync.to_ascii();
        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(lines.len(), TILEMAP_ROWS);
        // World row 0 is the first row of segment 0: an edge row over cols 16..24
        let bottom: Vec<char> = lines[TILEMAP_ROWS - 1].chars().collect();
        assert_eq!(bottom.len(), TILEMAP_COLUMNS);
        assert_eq!(bottom[16], '|');
        assert!(bottom[17..23].iter().all(|&c| c == '='));
        assert_eq!(bottom[23], '|');
        assert_eq!(bottom[0], ' ');
    }

    #[test]
    fn test_as_bytes_layout() {
        let mut buffer = TileBuffer::new();
        let mut row = [tile::TRANSPARENT; TILEMAP_COLUMNS];
        row[5] = tile::LANE_MARK;
        buffer.write_row(2, &row);

        let bytes = buffer.as_bytes();
        assert_eq!(bytes.len(), TILEMAP_COLUMNS * TILEMAP_ROWS);
        assert_eq!(bytes[2 * TILEMAP_COLUMNS + 5], tile::LANE_MARK);
        assert_eq!(bytes[2 * TILEMAP_COLUMNS + 4], tile::TRANSPARENT);
    }
}
