use super::lanes::CENTER;
use crate::course::LevelCatalog;
use crate::course::packing::{END_MARKER, PackedSegment, segment_config};
use crate::error::CatalogError;

/// Single centered lane, 4 wide, 30 blocks, no objects
const SEGMENTS: [PackedSegment; 2] = [[30, segment_config(CENTER, 4), 0, 0], END_MARKER];

pub fn test_level() -> Result<LevelCatalog, CatalogError> {
    LevelCatalog::from_packed("TEST", &SEGMENTS, &[])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::course::LaneConfig;

    #[test]
    fn test_shape() {
        let cat = test_level().unwrap();
        assert_eq!(cat.segment_count(), 1);
        assert_eq!(cat.object_count(), 0);
        assert_eq!(cat.total_blocks(), 30);
        assert_eq!(cat.segments()[0].lanes(), LaneConfig::Center);
        assert_eq!(cat.segments()[0].width(), 4);
    }
}
