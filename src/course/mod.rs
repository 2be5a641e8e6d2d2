//! Deterministic course engine
//!
//! Everything here is pure game logic:
//! - Catalogs are immutable and shared via `Arc`
//! - Geometry and row generation are pure functions
//! - Mutable state is caller-owned, one instance per playthrough
//! - No rendering or platform dependencies

pub mod catalog;
pub mod geometry;
pub mod level_file;
pub mod packing;
pub mod procgen;
pub mod progression;
pub mod rowgen;
pub mod scroll;
pub mod sync;
pub mod tick;

pub use catalog::{
    LaneConfig, LevelCatalog, LevelObject, ObjectKind, ObjectLane, ObjectRange, ObjectSize,
    Segment, SegmentSpan,
};
pub use geometry::{
    LaneBounds, LaneGeometry, LaneLayout, end_geometry, geometry_at, lane_geometry,
    object_bounds,
};
pub use progression::{ActivatedObject, AdvanceReport, ProgressionState};
pub use rowgen::{TileRow, generate_row, tile};
pub use scroll::ScrollConverter;
pub use sync::{ScrollSync, SyncReport, TileBuffer, TileSink};
pub use tick::{CourseState, TickReport, tick};
