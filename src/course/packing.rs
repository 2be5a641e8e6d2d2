//! Packed storage format for authored levels
//!
//! Segment record (4 bytes): `[length, config, obj_count, obj_offset]`, where
//! config is `LLWWWWWW` (lane code in bits 7-6, width in bits 5-0).
//! Object record (2 bytes): `[at, data]`, where data is `TTTLLSSS` (kind in
//! bits 7-5, lane slot in bits 4-3, size/variant in bits 2-0).
//! A segment record with length 0 ends the list.

use super::catalog::{
    LaneConfig, LevelCatalog, LevelObject, ObjectKind, ObjectLane, ObjectRange, ObjectSize,
    Segment,
};
use crate::error::CatalogError;

/// Largest lane width that fits in the config byte
pub const MAX_WIDTH: u8 = 0x3F;

pub type PackedSegment = [u8; 4];
pub type PackedObject = [u8; 2];

/// Terminating segment record
pub const END_MARKER: PackedSegment = [0, 0, 0, 0];

/// Pack lanes and width into a segment config byte
pub const fn segment_config(lanes: u8, width: u8) -> u8 {
    ((lanes & 0x03) << 6) | (width & MAX_WIDTH)
}

/// Pack kind, lane slot and size into an object data byte
pub const fn object_data(kind: u8, lane: u8, size: u8) -> u8 {
    ((kind & 0x07) << 5) | ((lane & 0x03) << 3) | (size & 0x07)
}

pub fn pack_config(lanes: LaneConfig, width: u8) -> u8 {
    segment_config(lanes.bits(), width)
}

pub fn unpack_config(config: u8) -> (LaneConfig, u8) {
    (LaneConfig::from_bits(config >> 6), config & MAX_WIDTH)
}

pub fn pack_object(object: &LevelObject) -> PackedObject {
    [
        object.at,
        object_data(object.kind.bits(), object.lane.bits(), object.size.bits()),
    ]
}

/// Decode an object record. `index` is only used for error reporting.
pub fn unpack_object(index: usize, record: PackedObject) -> Result<LevelObject, CatalogError> {
    let [at, data] = record;
    let kind_bits = (data >> 5) & 0x07;
    let lane_bits = (data >> 3) & 0x03;

    let kind = ObjectKind::from_bits(kind_bits).ok_or(CatalogError::ReservedObjectKind {
        index,
        bits: kind_bits,
    })?;
    let lane = ObjectLane::from_bits(lane_bits).ok_or(CatalogError::ReservedObjectLane {
        index,
        bits: lane_bits,
    })?;

    Ok(LevelObject::new(at, kind, lane, ObjectSize::from_bits(data)))
}

pub fn unpack_segment(record: PackedSegment) -> Segment {
    let [length, config, obj_count, obj_offset] = record;
    let (lanes, width) = unpack_config(config);
    Segment::new(
        length,
        lanes,
        width,
        ObjectRange::new(obj_offset as u16, obj_count as u16),
    )
}

impl LevelCatalog {
    /// Build a catalog from packed records, stopping at the end marker
    pub fn from_packed(
        name: impl Into<String>,
        segments: &[PackedSegment],
        objects: &[PackedObject],
    ) -> Result<Self, CatalogError> {
        let segments = segments
            .iter()
            .take_while(|record| record[0] != 0)
            .map(|&record| unpack_segment(record))
            .collect();
        let objects = objects
            .iter()
            .enumerate()
            .map(|(i, &record)| unpack_object(i, record))
            .collect::<Result<Vec<_>, _>>()?;

        LevelCatalog::new(name, segments, objects)
    }

    /// Encode as packed records, end marker included
    pub fn to_packed(&self) -> Result<(Vec<PackedSegment>, Vec<PackedObject>), CatalogError> {
        if self.object_count() > u8::MAX as usize {
            return Err(CatalogError::TooManyObjects {
                count: self.object_count(),
                max: u8::MAX as usize,
            });
        }

        let mut segments = Vec::with_capacity(self.segment_count() + 1);
        for (i, seg) in self.segments().iter().enumerate() {
            if seg.width() > MAX_WIDTH {
                return Err(CatalogError::WidthOverflow {
                    segment: i,
                    width: seg.width(),
                });
            }
            segments.push([
                seg.length,
                pack_config(seg.lanes(), seg.width()),
                seg.objects.count as u8,
                seg.objects.start as u8,
            ]);
        }
        segments.push(END_MARKER);

        let objects = self.objects().iter().map(pack_object).collect();
        Ok((segments, objects))
    }
}
