//! Debug HUD snapshot
//!
//! Read-only view of the course state, captured once per frame for overlays
//! and dumped as JSON by the runner.

use std::fmt;

use serde::Serialize;

use crate::course::{CourseState, LaneBounds, LaneConfig};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HudSnapshot {
    pub level: String,
    pub segment: usize,
    pub segment_count: usize,
    pub blocks_remaining: u32,
    pub blocks_consumed: u32,
    pub lanes: LaneConfig,
    pub width: u8,
    pub in_transition: bool,
    pub transition_blocks_remaining: u32,
    pub dual_lane: bool,
    pub complete: bool,
    pub world_position: i32,
    pub boundaries: LaneBounds,
    pub scroll_position: i32,
}

impl HudSnapshot {
    pub fn capture(state: &CourseState) -> Self {
        let p = &state.progression;
        let layout = p.layout();

        Self {
            level: state.catalog().name().to_string(),
            segment: p.segment_index(),
            segment_count: state.catalog().segment_count(),
            blocks_remaining: p.blocks_remaining(),
            blocks_consumed: p.blocks_consumed(),
            lanes: layout.lanes,
            width: layout.width,
            in_transition: p.in_transition(),
            transition_blocks_remaining: p.transition_blocks_remaining(),
            dual_lane: p.is_dual_lane(),
            complete: p.is_complete(),
            world_position: p.world_position(),
            boundaries: p.boundaries(),
            scroll_position: state.sync.scroll_position(),
        }
    }
}

impl fmt::Display for HudSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} seg {}/{} rem {:>3} used {:>4} {:<6} w{} [{:>4},{:>4})",
            self.level,
            self.segment + 1,
            self.segment_count,
            self.blocks_remaining,
            self.blocks_consumed,
            self.lanes.as_str(),
            self.width,
            self.boundaries.left,
            self.boundaries.right,
        )?;
        if self.in_transition {
            write!(f, " TRANS {}", self.transition_blocks_remaining)?;
        }
        if self.complete {
            write!(f, " COMPLETE")?;
        }
        Ok(())
    }
}
