use super::lanes::{BOTH, CENTER, LEFT, RIGHT};
use super::obj::{HOLE, LANE_CENTER, LANE_LEFT, LANE_RIGHT, LASER, PARTIAL, POWERUP, SMALL};
use crate::course::LevelCatalog;
use crate::course::packing::{END_MARKER, PackedObject, PackedSegment, object_data, segment_config};
use crate::error::CatalogError;

#[rustfmt::skip]
const SEGMENTS: [PackedSegment; 14] = [
    // Introduction
    [30, segment_config(CENTER, 4), 0, 0],

    // First split
    [4,  segment_config(BOTH, 4),   0, 0],
    [40, segment_config(BOTH, 3),   2, 0],

    // Right lane only
    [4,  segment_config(BOTH, 3),   0, 2],
    [30, segment_config(RIGHT, 3),  2, 2],

    // Left lane only
    [4,  segment_config(BOTH, 3),   0, 4],
    [35, segment_config(LEFT, 3),   2, 4],

    // Both lanes, more obstacles
    [4,  segment_config(BOTH, 3),   0, 6],
    [50, segment_config(BOTH, 3),   5, 6],

    // Narrow finale
    [4,  segment_config(BOTH, 2),   0, 11],
    [40, segment_config(CENTER, 2), 3, 11],

    // Victory stretch
    [4,  segment_config(CENTER, 4), 0, 14],
    [30, segment_config(CENTER, 4), 1, 14],

    END_MARKER,
];

#[rustfmt::skip]
const OBJECTS: [PackedObject; 15] = [
    [15, object_data(HOLE, LANE_LEFT, PARTIAL)],
    [25, object_data(HOLE, LANE_RIGHT, PARTIAL)],

    [10, object_data(HOLE, LANE_RIGHT, SMALL)],
    [20, object_data(HOLE, LANE_RIGHT, PARTIAL)],

    [12, object_data(HOLE, LANE_LEFT, PARTIAL)],
    [25, object_data(LASER, LANE_LEFT, SMALL)],

    [8,  object_data(HOLE, LANE_LEFT, PARTIAL)],
    [16, object_data(HOLE, LANE_RIGHT, PARTIAL)],
    [24, object_data(LASER, LANE_LEFT, SMALL)],
    [32, object_data(HOLE, LANE_RIGHT, PARTIAL)],
    [40, object_data(LASER, LANE_RIGHT, SMALL)],

    [10, object_data(HOLE, LANE_CENTER, SMALL)],
    [20, object_data(HOLE, LANE_CENTER, SMALL)],
    [30, object_data(LASER, LANE_CENTER, SMALL)],

    [15, object_data(POWERUP, LANE_CENTER, SMALL)],
];

pub fn level1() -> Result<LevelCatalog, CatalogError> {
    LevelCatalog::from_packed("LEVEL 1", &SEGMENTS, &OBJECTS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::course::{LaneConfig, ObjectKind, ObjectLane};

    #[test]
    fn test_shape() {
        let cat = level1().unwrap();
        assert_eq!(cat.segment_count(), 13);
        assert_eq!(cat.object_count(), 15);
        assert_eq!(cat.total_blocks(), 279);
    }

    #[test]
    fn test_objects_grouped_by_section() {
        let cat = level1().unwrap();
        assert_eq!(cat.segment_objects(2).len(), 2);
        assert!(cat.segment_objects(4).iter().all(|o| o.lane == ObjectLane::Right));
        assert!(cat.segment_objects(6).iter().all(|o| o.lane == ObjectLane::Left));
        assert_eq!(cat.segment_objects(8).len(), 5);
        assert_eq!(cat.segments()[10].lanes(), LaneConfig::Center);
        assert_eq!(cat.segment_objects(12)[0].kind, ObjectKind::Powerup);
    }

    #[test]
    fn test_objects_fit_their_segments() {
        let cat = level1().unwrap();
        for (i, seg) in cat.segments().iter().enumerate() {
            for obj in cat.segment_objects(i) {
                assert!(obj.at < seg.length, "segment {i} object at {}", obj.at);
            }
        }
    }
}
