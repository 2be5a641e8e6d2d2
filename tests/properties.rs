// Property tests for course invariants.

use std::sync::Arc;

use nebula_course::consts::{BLOCK_SIZE_PX, TRANSITION_BLOCKS};
use nebula_course::course::{
    LaneConfig, LaneLayout, LevelCatalog, ObjectRange, ProgressionState, ScrollSync, Segment,
    generate_row, lane_geometry,
};
use proptest::prelude::*;

fn catalog_strategy() -> impl Strategy<Value = LevelCatalog> {
    prop::collection::vec((1u8..60, 0u8..4, 1u8..6), 1..10).prop_map(|segs| {
        let segments = segs
            .into_iter()
            .map(|(length, lanes, width)| {
                Segment::new(length, LaneConfig::from_bits(lanes), width, ObjectRange::default())
            })
            .collect();
        LevelCatalog::new("PROP", segments, Vec::new()).unwrap()
    })
}

fn catalog_and_y() -> impl Strategy<Value = (LevelCatalog, i32)> {
    catalog_strategy().prop_flat_map(|cat| {
        let total = cat.total_pixels();
        (Just(cat), 0..total)
    })
}

proptest! {
    #[test]
    fn located_segment_contains_position((cat, y) in catalog_and_y()) {
        let span = cat.locate(y).unwrap();
        prop_assert!(span.contains(y));
        prop_assert!(cat.block_range(span.index).contains(&((y / BLOCK_SIZE_PX) as u32)));
    }

    #[test]
    fn dual_lanes_never_overlap(width in 1u8..=63) {
        let g = lane_geometry(LaneLayout::new(LaneConfig::Both, width));
        let right = g.secondary.unwrap();
        prop_assert!(g.primary.right < right.left);
    }

    #[test]
    fn progression_invariants_hold(
        cat in catalog_strategy(),
        deltas in prop::collection::vec(-20i32..40, 1..200),
    ) {
        let mut p = ProgressionState::new(Arc::new(cat));
        let mut scroll = 0;
        let mut last_segment = 0;

        for delta in deltas {
            let before = (p.segment_index(), p.blocks_consumed());
            scroll -= delta;
            let report = p.update(scroll);

            if delta <= 0 {
                prop_assert_eq!(report.blocks, 0);
                prop_assert_eq!((p.segment_index(), p.blocks_consumed()), before);
            }
            prop_assert_eq!(
                p.blocks_remaining() + p.blocks_consumed(),
                p.current_segment().length as u32
            );
            prop_assert!(p.segment_index() >= last_segment);
            last_segment = p.segment_index();
        }
    }

    #[test]
    fn transitions_last_exactly_their_window(cat in catalog_strategy()) {
        let mut p = ProgressionState::new(Arc::new(cat));
        let mut since_entered: Option<u32> = None;

        while !p.is_complete() {
            let lanes_before = p.layout().lanes;
            let report = p.advance_blocks(1);
            prop_assert_eq!(report.blocks, 1);

            if let Some(n) = since_entered.as_mut() {
                *n += 1;
            }
            if report.transition_cleared {
                let n = since_entered.take().unwrap();
                if report.completed {
                    prop_assert!(n <= TRANSITION_BLOCKS);
                } else {
                    prop_assert_eq!(n, TRANSITION_BLOCKS);
                }
            }
            if report.transition_entered {
                prop_assert_ne!(lanes_before, p.layout().lanes);
                since_entered = Some(0);
            }
            prop_assert_eq!(p.in_transition(), since_entered.is_some());
        }
    }

    #[test]
    fn row_generation_is_pure(cat in catalog_strategy(), y in -200i32..4000) {
        let fallback = lane_geometry(LaneLayout::new(LaneConfig::Center, 4));
        prop_assert_eq!(generate_row(&cat, fallback, y), generate_row(&cat, fallback, y));
    }

    #[test]
    fn incremental_sync_matches_full_refresh(
        cat in catalog_strategy(),
        deltas in prop::collection::vec(-40i32..300, 1..60),
    ) {
        let fallback = lane_geometry(LaneLayout::new(LaneConfig::Both, 2));
        let mut sync = ScrollSync::new(0);
        sync.refresh(&cat, fallback);

        let mut scroll = 0;
        for delta in deltas {
            scroll -= delta;
            sync.sync(&cat, fallback, scroll);
        }

        let mut fresh = ScrollSync::new(scroll);
        fresh.refresh(&cat, fallback);
        prop_assert_eq!(sync.buffer(), fresh.buffer());
    }
}
