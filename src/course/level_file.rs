//! JSON authoring format for levels
//!
//! Objects are written inline under their segment, so object ranges are
//! derived on load and can never point at the wrong objects.
//!
//! ```json
//! {
//!   "name": "LEVEL 1",
//!   "segments": [
//!     { "length": 30, "lanes": "center", "width": 4 },
//!     { "length": 40, "lanes": "both", "width": 3,
//!       "objects": [ { "at": 15, "kind": "hole", "lane": "left", "size": "partial" } ] }
//!   ]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::catalog::{LaneConfig, LevelCatalog, LevelObject, ObjectRange, Segment};
use crate::error::CatalogError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFile {
    pub name: String,
    pub segments: Vec<SegmentEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentEntry {
    pub length: u8,
    #[serde(default)]
    pub lanes: LaneConfig,
    pub width: u8,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub objects: Vec<LevelObject>,
}

impl CatalogFile {
    pub fn into_catalog(self) -> Result<LevelCatalog, CatalogError> {
        let mut segments = Vec::with_capacity(self.segments.len());
        let mut objects = Vec::new();

        for entry in self.segments {
            let start = objects.len();
            objects.extend(entry.objects);
            let range = ObjectRange::from_indices(start, objects.len())?;
            segments.push(Segment::new(entry.length, entry.lanes, entry.width, range));
        }

        LevelCatalog::new(self.name, segments, objects)
    }

    pub fn from_catalog(catalog: &LevelCatalog) -> Self {
        let segments = catalog
            .segments()
            .iter()
            .enumerate()
            .map(|(i, seg)| SegmentEntry {
                length: seg.length,
                lanes: seg.lanes(),
                width: seg.width(),
                objects: catalog.segment_objects(i).to_vec(),
            })
            .collect();

        Self {
            name: catalog.name().to_string(),
            segments,
        }
    }
}

impl LevelCatalog {
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        serde_json::from_str::<CatalogFile>(json)?.into_catalog()
    }

    pub fn to_json(&self) -> Result<String, CatalogError> {
        Ok(serde_json::to_string_pretty(&CatalogFile::from_catalog(self))?)
    }

    /// Load a level from a JSON file on disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::course::catalog::{ObjectKind, ObjectLane, ObjectSize};

    const SAMPLE: &str = r#"{
        "name": "SAMPLE",
        "segments": [
            { "length": 30, "lanes": "center", "width": 4 },
            { "length": 40, "lanes": "both", "width": 3, "objects": [
                { "at": 15, "kind": "hole", "lane": "left", "size": "partial" },
                { "at": 25, "kind": "laser", "lane": "right" }
            ] },
            { "length": 20, "width": 2, "objects": [
                { "at": 5, "kind": "enemy_spawn", "lane": "center", "size": { "variant": 4 } }
            ] }
        ]
    }"#;

    #[test]
    fn test_parse_sample() {
        let cat = LevelCatalog::from_json(SAMPLE).unwrap();
        assert_eq!(cat.name(), "SAMPLE");
        assert_eq!(cat.segment_count(), 3);
        assert_eq!(cat.object_count(), 3);
        assert_eq!(cat.segments()[1].objects, ObjectRange::new(0, 2));
        assert_eq!(cat.segments()[2].lanes(), LaneConfig::Center);

        let laser = cat.segment_objects(1)[1];
        assert_eq!(laser.kind, ObjectKind::Laser);
        assert_eq!(laser.lane, ObjectLane::Right);
        assert_eq!(laser.size, ObjectSize::Small);

        let spawn = cat.segment_objects(2)[0];
        assert_eq!(spawn.size, ObjectSize::Variant(4));
    }

    #[test]
    fn test_json_roundtrip_preserves_catalog() {
        let cat = LevelCatalog::from_json(SAMPLE).unwrap();
        let again = LevelCatalog::from_json(&cat.to_json().unwrap()).unwrap();
        assert_eq!(cat, again);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(matches!(
            LevelCatalog::from_json("{ \"name\": 3 }"),
            Err(CatalogError::Json(_))
        ));
        assert!(matches!(
            LevelCatalog::from_json(r#"{ "name": "E", "segments": [] }"#),
            Err(CatalogError::Empty(_))
        ));
    }

    #[test]
    fn test_object_indices_must_fit_ranges() {
        let filler = LevelObject::new(0, ObjectKind::Hole, ObjectLane::Center, ObjectSize::Small);
        let file = CatalogFile {
            name: "HUGE".into(),
            segments: vec![SegmentEntry {
                length: 10,
                lanes: LaneConfig::Center,
                width: 4,
                objects: vec![filler; u16::MAX as usize + 1],
            }],
        };
        assert!(matches!(
            file.into_catalog(),
            Err(CatalogError::TooManyObjects { max: 65535, .. })
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            LevelCatalog::load("/nonexistent/level.json"),
            Err(CatalogError::Io(_))
        ));
    }
}
