//! Seeded procedural course generation
//!
//! Same seed, same course. Layout follows the hand-authored levels: a centered
//! intro, a run of sections with short dual-lane bridges wherever the lane
//! configuration changes, and a centered victory stretch with a powerup.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::catalog::{
    LaneConfig, LevelCatalog, LevelObject, ObjectKind, ObjectLane, ObjectRange, ObjectSize,
    Segment,
};
use crate::consts::TRANSITION_BLOCKS;
use crate::error::CatalogError;

const INTRO_BLOCKS: u8 = 30;
const VICTORY_BLOCKS: u8 = 30;
const INTRO_WIDTH: u8 = 4;
const MAX_HAZARDS_PER_SECTION: u32 = 5;

const SECTION_LANES: [LaneConfig; 4] = [
    LaneConfig::Center,
    LaneConfig::Left,
    LaneConfig::Right,
    LaneConfig::Both,
];

#[derive(Default)]
struct CourseBuilder {
    segments: Vec<Segment>,
    objects: Vec<LevelObject>,
}

impl CourseBuilder {
    fn push(
        &mut self,
        length: u8,
        lanes: LaneConfig,
        width: u8,
        objects: Vec<LevelObject>,
    ) -> Result<(), CatalogError> {
        let start = self.objects.len();
        self.objects.extend(objects);
        let range = ObjectRange::from_indices(start, self.objects.len())?;
        self.segments.push(Segment::new(length, lanes, width, range));
        Ok(())
    }

    fn last_lanes(&self) -> LaneConfig {
        self.segments.last().map(|s| s.lanes()).unwrap_or_default()
    }

    /// Bridge into `lanes` with a short dual-lane segment if the config changes
    fn bridge_to(&mut self, lanes: LaneConfig, width: u8) -> Result<(), CatalogError> {
        if self.last_lanes() != lanes {
            self.push(TRANSITION_BLOCKS as u8, LaneConfig::Both, width, Vec::new())?;
        }
        Ok(())
    }
}

/// Generate a course with `sections` hazard sections between intro and finale
pub fn generate(seed: u64, sections: usize) -> Result<LevelCatalog, CatalogError> {
    let mut rng = Pcg32::seed_from_u64(seed);
    let mut course = CourseBuilder::default();

    course.push(INTRO_BLOCKS, LaneConfig::Center, INTRO_WIDTH, Vec::new())?;

    for section in 0..sections {
        let lanes = SECTION_LANES[rng.random_range(0..SECTION_LANES.len())];
        let width = match lanes {
            LaneConfig::Both => rng.random_range(2..=3),
            _ => rng.random_range(2..=4),
        };
        let length: u8 = rng.random_range(24..=48);

        // Difficulty ramps with the section index
        let hazards = (1 + section as u32 / 2).min(MAX_HAZARDS_PER_SECTION);
        let spacing = length as u32 / (hazards + 1);
        let objects = (1..=hazards)
            .map(|k| hazard(&mut rng, lanes, (spacing * k) as u8))
            .collect();

        course.bridge_to(lanes, width)?;
        course.push(length, lanes, width, objects)?;
    }

    course.bridge_to(LaneConfig::Center, INTRO_WIDTH)?;
    course.push(
        VICTORY_BLOCKS,
        LaneConfig::Center,
        INTRO_WIDTH,
        vec![LevelObject::new(
            VICTORY_BLOCKS / 2,
            ObjectKind::Powerup,
            ObjectLane::Center,
            ObjectSize::Small,
        )],
    )?;

    log::info!(
        "Generated course {:#x}: {} sections, {} segments, {} objects",
        seed,
        sections,
        course.segments.len(),
        course.objects.len()
    );

    LevelCatalog::new(format!("PROC {seed:08X}"), course.segments, course.objects)
}

fn hazard(rng: &mut Pcg32, lanes: LaneConfig, at: u8) -> LevelObject {
    let lane = match lanes {
        LaneConfig::Center => ObjectLane::Center,
        LaneConfig::Left => ObjectLane::Left,
        LaneConfig::Right => ObjectLane::Right,
        LaneConfig::Both if rng.random_bool(0.5) => ObjectLane::Left,
        LaneConfig::Both => ObjectLane::Right,
    };

    let roll: f32 = rng.random();
    let (kind, size) = if roll < 0.6 {
        let size = if rng.random_bool(0.5) {
            ObjectSize::Small
        } else {
            ObjectSize::Partial
        };
        (ObjectKind::Hole, size)
    } else if roll < 0.85 {
        (ObjectKind::Laser, ObjectSize::Small)
    } else {
        (ObjectKind::EnemySpawn, ObjectSize::Small)
    };

    LevelObject::new(at, kind, lane, size)
}
