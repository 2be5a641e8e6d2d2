//! Lane geometry: lane configuration + width -> pixel boundaries
//!
//! Everything here is pure. The same formulas serve the progression state
//! (current segment) and the row generator (any segment at any world position).

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::catalog::{LaneConfig, LevelCatalog, LevelObject, ObjectLane, ObjectSize, SegmentSpan};
use crate::consts::{BLOCK_SIZE_PX, GAP_BLOCKS, SCREEN_CENTER_PX};

/// Half the inter-lane gap, in pixels
pub const HALF_GAP_PX: i32 = GAP_BLOCKS * BLOCK_SIZE_PX / 2;

/// Lane configuration plus lane width in blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct LaneLayout {
    pub lanes: LaneConfig,
    /// Width of each lane in blocks
    pub width: u8,
}

impl LaneLayout {
    pub fn new(lanes: LaneConfig, width: u8) -> Self {
        Self { lanes, width }
    }

    pub fn width_px(&self) -> i32 {
        self.width as i32 * BLOCK_SIZE_PX
    }
}

/// Horizontal pixel extent of one lane, half-open: `[left, right)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct LaneBounds {
    pub left: i32,
    pub right: i32,
}

impl LaneBounds {
    pub fn new(left: i32, right: i32) -> Self {
        Self { left, right }
    }

    #[inline]
    pub fn contains(&self, x: i32) -> bool {
        x >= self.left && x < self.right
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn center(&self) -> i32 {
        (self.left + self.right) / 2
    }

    /// Smallest span covering both
    pub fn union(&self, other: &LaneBounds) -> LaneBounds {
        LaneBounds {
            left: self.left.min(other.left),
            right: self.right.max(other.right),
        }
    }
}

/// Pixel boundaries for every lane of one layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LaneGeometry {
    pub lanes: LaneConfig,
    /// The only lane, or the left lane of a dual-lane layout
    pub primary: LaneBounds,
    /// The right lane of a dual-lane layout
    pub secondary: Option<LaneBounds>,
}

impl LaneGeometry {
    pub fn lanes(&self) -> impl Iterator<Item = LaneBounds> + '_ {
        std::iter::once(self.primary).chain(self.secondary)
    }

    pub fn is_dual(&self) -> bool {
        self.secondary.is_some()
    }

    /// True if `x` lies inside any lane
    pub fn contains(&self, x: i32) -> bool {
        self.lanes().any(|lane| lane.contains(x))
    }

    /// Leftmost lane edge to rightmost lane edge
    pub fn extent(&self) -> LaneBounds {
        self.lanes().fold(self.primary, |acc, lane| acc.union(&lane))
    }

    /// Lane an object slot maps onto.
    ///
    /// Single-lane layouts put every slot on their one lane. A dual-lane
    /// layout has no center lane, so `Center` maps to nothing.
    pub fn lane_for(&self, slot: ObjectLane) -> Option<LaneBounds> {
        match (self.secondary, slot) {
            (None, _) => Some(self.primary),
            (Some(_), ObjectLane::Left) => Some(self.primary),
            (Some(right), ObjectLane::Right) => Some(right),
            (Some(_), ObjectLane::Center) => None,
        }
    }
}

/// Compute lane boundaries for a layout
pub fn lane_geometry(layout: LaneLayout) -> LaneGeometry {
    let width_px = layout.width_px();
    let half_width = width_px / 2;

    let left_of_gap = LaneBounds::new(
        SCREEN_CENTER_PX - HALF_GAP_PX - width_px,
        SCREEN_CENTER_PX - HALF_GAP_PX,
    );
    let right_of_gap = LaneBounds::new(
        SCREEN_CENTER_PX + HALF_GAP_PX,
        SCREEN_CENTER_PX + HALF_GAP_PX + width_px,
    );

    let (primary, secondary) = match layout.lanes {
        LaneConfig::Center => (
            LaneBounds::new(SCREEN_CENTER_PX - half_width, SCREEN_CENTER_PX + half_width),
            None,
        ),
        LaneConfig::Left => (left_of_gap, None),
        LaneConfig::Right => (right_of_gap, None),
        LaneConfig::Both => (left_of_gap, Some(right_of_gap)),
    };

    LaneGeometry {
        lanes: layout.lanes,
        primary,
        secondary,
    }
}

/// Lane geometry of whatever segment contains `world_y`.
///
/// Past the end of the course the caller's `fallback` is used.
pub fn geometry_at(catalog: &LevelCatalog, world_y: i32, fallback: LaneGeometry) -> LaneGeometry {
    catalog
        .locate(world_y)
        .and_then(|span| catalog.segment(span.index))
        .map(|seg| lane_geometry(seg.layout))
        .unwrap_or(fallback)
}

/// Geometry the course keeps past its end: the last segment's lanes
pub fn end_geometry(catalog: &LevelCatalog) -> LaneGeometry {
    lane_geometry(catalog.segments()[catalog.last_index()].layout)
}

/// Horizontal footprint of an object inside its lane
pub fn object_bounds(geometry: &LaneGeometry, object: &LevelObject) -> Option<LaneBounds> {
    let lane = geometry.lane_for(object.lane)?;
    let bounds = match object.size {
        ObjectSize::Partial => LaneBounds::new(lane.left, lane.left + lane.width() / 2),
        ObjectSize::Full => lane,
        // Variants are drawn by their consumer; treat them as one block
        ObjectSize::Small | ObjectSize::Variant(_) => {
            let half = BLOCK_SIZE_PX / 2;
            LaneBounds::new(lane.center() - half, lane.center() + half)
        }
    };
    Some(bounds)
}

/// World Y span `[start, end)` covered by an object of a located segment
pub fn object_world_span(span: &SegmentSpan, object: &LevelObject) -> (i32, i32) {
    let start = span.start_y + object.at as i32 * BLOCK_SIZE_PX;
    (start, start + BLOCK_SIZE_PX)
}

/// True if a world point lies inside an object's footprint
pub fn object_contains(
    geometry: &LaneGeometry,
    span: &SegmentSpan,
    object: &LevelObject,
    point: IVec2,
) -> bool {
    let (top, bottom) = object_world_span(span, object);
    point.y >= top
        && point.y < bottom
        && object_bounds(geometry, object).is_some_and(|b| b.contains(point.x))
}
