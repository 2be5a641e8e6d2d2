//! Level catalog: immutable authored course data
//!
//! A catalog is an ordered list of segments plus one flat object list. Each
//! segment owns a contiguous index range into the object list.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use super::geometry::LaneLayout;
use crate::consts::BLOCK_SIZE_PX;
use crate::error::CatalogError;

/// How many lanes a segment has and where they sit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LaneConfig {
    /// Single lane centered on screen
    #[default]
    Center,
    /// Single lane left of center
    Left,
    /// Single lane right of center
    Right,
    /// Two lanes with a gap in the middle
    Both,
}

impl LaneConfig {
    /// Decode the 2-bit lane code (every code is valid)
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => LaneConfig::Center,
            1 => LaneConfig::Left,
            2 => LaneConfig::Right,
            _ => LaneConfig::Both,
        }
    }

    pub fn bits(self) -> u8 {
        match self {
            LaneConfig::Center => 0,
            LaneConfig::Left => 1,
            LaneConfig::Right => 2,
            LaneConfig::Both => 3,
        }
    }

    pub fn is_dual(self) -> bool {
        self == LaneConfig::Both
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LaneConfig::Center => "CENTER",
            LaneConfig::Left => "LEFT",
            LaneConfig::Right => "RIGHT",
            LaneConfig::Both => "BOTH",
        }
    }
}

/// Object types placed along the course
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    None,
    /// Pit in the road
    Hole,
    /// Laser beam hazard
    Laser,
    /// Collectible
    Powerup,
    /// Triggers an enemy spawn
    EnemySpawn,
    /// Speed modifier
    SpeedZone,
}

impl ObjectKind {
    /// Decode the 3-bit kind code. Codes 6 and 7 are reserved.
    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits & 0x07 {
            0 => Some(ObjectKind::None),
            1 => Some(ObjectKind::Hole),
            2 => Some(ObjectKind::Laser),
            3 => Some(ObjectKind::Powerup),
            4 => Some(ObjectKind::EnemySpawn),
            5 => Some(ObjectKind::SpeedZone),
            _ => None,
        }
    }

    pub fn bits(self) -> u8 {
        match self {
            ObjectKind::None => 0,
            ObjectKind::Hole => 1,
            ObjectKind::Laser => 2,
            ObjectKind::Powerup => 3,
            ObjectKind::EnemySpawn => 4,
            ObjectKind::SpeedZone => 5,
        }
    }

    /// Kinds that hurt the player on contact
    pub fn is_hazard(self) -> bool {
        matches!(self, ObjectKind::Hole | ObjectKind::Laser)
    }
}

/// Which lane an object sits in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectLane {
    Left,
    Right,
    Center,
}

impl ObjectLane {
    /// Decode the 2-bit lane slot. Code 3 is reserved.
    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits & 0x03 {
            0 => Some(ObjectLane::Left),
            1 => Some(ObjectLane::Right),
            2 => Some(ObjectLane::Center),
            _ => None,
        }
    }

    pub fn bits(self) -> u8 {
        match self {
            ObjectLane::Left => 0,
            ObjectLane::Right => 1,
            ObjectLane::Center => 2,
        }
    }
}

/// Object size or variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectSize {
    /// One block wide
    #[default]
    Small,
    /// Half the lane width
    Partial,
    /// Full lane width (needs a jump)
    Full,
    /// Free variant code 3-7, interpreted by the object's consumer
    Variant(u8),
}

impl ObjectSize {
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x07 {
            0 => ObjectSize::Small,
            1 => ObjectSize::Partial,
            2 => ObjectSize::Full,
            v => ObjectSize::Variant(v),
        }
    }

    pub fn bits(self) -> u8 {
        match self {
            ObjectSize::Small => 0,
            ObjectSize::Partial => 1,
            ObjectSize::Full => 2,
            ObjectSize::Variant(v) => v & 0x07,
        }
    }
}

/// A hazard, pickup or trigger placed inside a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelObject {
    /// Block offset from the start of the owning segment
    pub at: u8,
    pub kind: ObjectKind,
    pub lane: ObjectLane,
    #[serde(default)]
    pub size: ObjectSize,
}

impl LevelObject {
    pub fn new(at: u8, kind: ObjectKind, lane: ObjectLane, size: ObjectSize) -> Self {
        Self {
            at,
            kind,
            lane,
            size,
        }
    }
}

/// Index range of a segment's objects in the catalog's object list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ObjectRange {
    pub start: u16,
    pub count: u16,
}

impl ObjectRange {
    pub fn new(start: u16, count: u16) -> Self {
        Self { start, count }
    }

    /// Range covering object indices `[start, end)` of a flat object list
    pub fn from_indices(start: usize, end: usize) -> Result<Self, CatalogError> {
        let too_many = || CatalogError::TooManyObjects {
            count: end,
            max: u16::MAX as usize,
        };
        let start = u16::try_from(start).map_err(|_| too_many())?;
        let count = u16::try_from(end.saturating_sub(start as usize)).map_err(|_| too_many())?;
        Ok(Self { start, count })
    }

    pub fn range(&self) -> Range<usize> {
        let start = self.start as usize;
        start..start + self.count as usize
    }
}

/// A contiguous run of blocks sharing one lane configuration and width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Blocks until the next segment (0 marks the end of a packed list)
    pub length: u8,
    pub layout: LaneLayout,
    pub objects: ObjectRange,
}

impl Segment {
    pub fn new(length: u8, lanes: LaneConfig, width: u8, objects: ObjectRange) -> Self {
        Self {
            length,
            layout: LaneLayout::new(lanes, width),
            objects,
        }
    }

    pub fn lanes(&self) -> LaneConfig {
        self.layout.lanes
    }

    pub fn width(&self) -> u8 {
        self.layout.width
    }
}

/// Absolute extent of one segment in world pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentSpan {
    pub index: usize,
    /// First world pixel of the segment
    pub start_y: i32,
    /// One past the last world pixel of the segment
    pub end_y: i32,
}

impl SegmentSpan {
    pub fn contains(&self, world_y: i32) -> bool {
        world_y >= self.start_y && world_y < self.end_y
    }
}

/// Immutable level description, shared read-only by every engine component
#[derive(Debug, Clone, PartialEq)]
pub struct LevelCatalog {
    name: String,
    segments: Vec<Segment>,
    objects: Vec<LevelObject>,
    /// Cumulative block starts; `starts[i]` is where segment `i` begins and
    /// the final entry is the total block count
    starts: Vec<u32>,
}

impl LevelCatalog {
    /// Build a catalog from segments in traversal order.
    ///
    /// The segment list is cut at the first zero-length end marker. Object
    /// offsets are trusted authored data and are not checked against their
    /// segment length.
    pub fn new(
        name: impl Into<String>,
        mut segments: Vec<Segment>,
        objects: Vec<LevelObject>,
    ) -> Result<Self, CatalogError> {
        let name = name.into();

        if let Some(end) = segments.iter().position(|s| s.length == 0) {
            segments.truncate(end);
        }
        if segments.is_empty() {
            return Err(CatalogError::Empty(name));
        }

        for (i, seg) in segments.iter().enumerate() {
            let range = seg.objects.range();
            if range.end > objects.len() {
                return Err(CatalogError::ObjectRangeOutOfBounds {
                    segment: i,
                    start: range.start,
                    end: range.end,
                    available: objects.len(),
                });
            }
        }

        let mut starts = Vec::with_capacity(segments.len() + 1);
        let mut total = 0u32;
        starts.push(0);
        for seg in &segments {
            total += seg.length as u32;
            starts.push(total);
        }

        Ok(Self {
            name,
            segments,
            objects,
            starts,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn last_index(&self) -> usize {
        self.segments.len() - 1
    }

    pub fn segment(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn object(&self, index: usize) -> Option<&LevelObject> {
        self.objects.get(index)
    }

    pub fn objects(&self) -> &[LevelObject] {
        &self.objects
    }

    /// Objects belonging to segment `index` (empty if out of range)
    pub fn segment_objects(&self, index: usize) -> &[LevelObject] {
        self.segments
            .get(index)
            .map(|seg| &self.objects[seg.objects.range()])
            .unwrap_or(&[])
    }

    /// Total course length in blocks
    pub fn total_blocks(&self) -> u32 {
        self.starts[self.segments.len()]
    }

    /// Total course length in world pixels
    pub fn total_pixels(&self) -> i32 {
        self.total_blocks() as i32 * BLOCK_SIZE_PX
    }

    /// Absolute block at which segment `index` starts
    pub fn segment_start_block(&self, index: usize) -> u32 {
        self.starts[index.min(self.segments.len())]
    }

    /// Absolute block range `[start, start + length)` of segment `index`
    pub fn block_range(&self, index: usize) -> Range<u32> {
        let index = index.min(self.last_index());
        self.starts[index]..self.starts[index + 1]
    }

    /// Segment containing an absolute block, or `None` past the course end
    pub fn segment_at_block(&self, block: u32) -> Option<usize> {
        if block >= self.total_blocks() {
            return None;
        }
        // First start strictly greater than `block`, minus one
        Some(self.starts.partition_point(|&start| start <= block) - 1)
    }

    /// Locate the segment containing a world Y pixel.
    ///
    /// Positions before the course start belong to the first segment.
    /// Returns `None` at or beyond the course end.
    pub fn locate(&self, world_y: i32) -> Option<SegmentSpan> {
        let block = world_y.max(0) / BLOCK_SIZE_PX;
        let index = self.segment_at_block(block as u32)?;
        Some(self.span(index))
    }

    /// World pixel span of segment `index`
    pub fn span(&self, index: usize) -> SegmentSpan {
        let blocks = self.block_range(index);
        SegmentSpan {
            index: index.min(self.last_index()),
            start_y: blocks.start as i32 * BLOCK_SIZE_PX,
            end_y: blocks.end as i32 * BLOCK_SIZE_PX,
        }
    }
}
