//! Progression state machine
//!
//! Tracks which segment of the catalog is active, how many of its blocks are
//! left, and whether a lane transition window is open. Advanced by whole
//! blocks, either directly or through the scroll converter.

use std::sync::Arc;

use glam::IVec2;

use super::catalog::{LevelCatalog, LevelObject, Segment};
use super::geometry::{
    LaneBounds, LaneGeometry, LaneLayout, geometry_at, lane_geometry, object_contains,
};
use super::scroll::ScrollConverter;
use crate::consts::{BLOCK_SIZE_PX, TRANSITION_BLOCKS};

/// An object whose block offset was just reached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivatedObject {
    /// Index into the catalog's object list
    pub index: usize,
    pub segment_index: usize,
    /// Absolute block at which the object sits
    pub world_block: u32,
    pub object: LevelObject,
}

/// What happened during one advance or scroll update
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdvanceReport {
    pub blocks: u32,
    pub segments_entered: u32,
    pub transition_entered: bool,
    pub transition_cleared: bool,
    /// The level reached its terminal state during this update
    pub completed: bool,
    pub activated: Vec<ActivatedObject>,
}

/// Open transition window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Transition {
    blocks_remaining: u32,
    /// Union of every lane extent seen since the window opened
    extent: LaneBounds,
}

/// Mutable per-playthrough course state
#[derive(Debug, Clone)]
pub struct ProgressionState {
    catalog: Arc<LevelCatalog>,
    segment_index: usize,
    blocks_remaining: u32,
    blocks_consumed: u32,
    layout: LaneLayout,
    geometry: LaneGeometry,
    transition: Option<Transition>,
    /// Next object of the current segment waiting to activate
    object_cursor: usize,
    object_end: usize,
    scroll: ScrollConverter,
}

impl ProgressionState {
    /// Start a playthrough at segment 0 with the scroll position at 0
    pub fn new(catalog: Arc<LevelCatalog>) -> Self {
        log::info!(
            "Level '{}': {} segments, {} objects, {} blocks",
            catalog.name(),
            catalog.segment_count(),
            catalog.object_count(),
            catalog.total_blocks()
        );

        let mut state = Self {
            catalog,
            segment_index: 0,
            blocks_remaining: 0,
            blocks_consumed: 0,
            layout: LaneLayout::default(),
            geometry: LaneGeometry::default(),
            transition: None,
            object_cursor: 0,
            object_end: 0,
            scroll: ScrollConverter::new(0),
        };
        state.load_segment(0);
        state
    }

    /// Throw away all progress and start over on the same catalog
    pub fn reset(&mut self) {
        *self = Self::new(Arc::clone(&self.catalog));
    }

    /// Feed the current scroll position; advances one block per
    /// `BLOCK_SIZE_PX` of forward travel
    pub fn update(&mut self, scroll_position: i32) -> AdvanceReport {
        let mut report = AdvanceReport::default();
        self.collect_activated(&mut report);

        self.scroll.observe(scroll_position);
        while self.scroll.take_block() {
            // Blocks past the course end are dropped; the state holds
            self.step_block(&mut report);
        }
        report
    }

    /// Advance up to `n` blocks, stopping early at the course end
    pub fn advance_blocks(&mut self, n: u32) -> AdvanceReport {
        let mut report = AdvanceReport::default();
        self.collect_activated(&mut report);

        for _ in 0..n {
            if !self.step_block(&mut report) {
                break;
            }
        }
        report
    }

    fn step_block(&mut self, report: &mut AdvanceReport) -> bool {
        if self.blocks_remaining == 0 {
            return false;
        }

        // The window counts whole blocks, independent of segment loads
        if let Some(t) = self.transition.as_mut() {
            t.blocks_remaining = t.blocks_remaining.saturating_sub(1);
            if t.blocks_remaining == 0 {
                self.transition = None;
                report.transition_cleared = true;
                log::debug!("Transition closed at segment {}", self.segment_index);
            }
        }

        self.blocks_remaining -= 1;
        self.blocks_consumed += 1;
        report.blocks += 1;
        self.collect_activated(report);

        if self.blocks_remaining == 0 {
            let next = self.segment_index + 1;
            match self.catalog.segment(next).copied() {
                Some(next_seg) => {
                    if next_seg.lanes() != self.layout.lanes && self.transition.is_none() {
                        self.transition = Some(Transition {
                            blocks_remaining: TRANSITION_BLOCKS,
                            extent: self.geometry.extent(),
                        });
                        report.transition_entered = true;
                        log::debug!(
                            "Transition opened: {} -> {}",
                            self.layout.lanes.as_str(),
                            next_seg.lanes().as_str()
                        );
                    }
                    self.load_segment(next);
                    if let Some(t) = self.transition.as_mut() {
                        t.extent = t.extent.union(&self.geometry.extent());
                    }
                    report.segments_entered += 1;
                    self.collect_activated(report);
                }
                None => {
                    // Nothing left to bridge at the end of the course
                    if self.transition.take().is_some() {
                        report.transition_cleared = true;
                    }
                    report.completed = true;
                    log::info!("Level '{}' complete", self.catalog.name());
                }
            }
        }
        true
    }

    fn load_segment(&mut self, index: usize) {
        let Some(seg) = self.catalog.segment(index).copied() else {
            return;
        };

        self.segment_index = index;
        self.blocks_remaining = seg.length as u32;
        self.blocks_consumed = 0;
        self.layout = seg.layout;
        self.geometry = lane_geometry(seg.layout);

        let range = seg.objects.range();
        self.object_cursor = range.start;
        self.object_end = range.end;

        log::debug!(
            "Segment {} loaded: {} width {} ({} blocks, {} objects)",
            index,
            seg.lanes().as_str(),
            seg.width(),
            seg.length,
            range.len()
        );
    }

    fn collect_activated(&mut self, report: &mut AdvanceReport) {
        let base = self.catalog.segment_start_block(self.segment_index);
        while self.object_cursor < self.object_end {
            let object = self.catalog.objects()[self.object_cursor];
            if object.at as u32 > self.blocks_consumed {
                break;
            }
            report.activated.push(ActivatedObject {
                index: self.object_cursor,
                segment_index: self.segment_index,
                world_block: base + object.at as u32,
                object,
            });
            self.object_cursor += 1;
        }
    }

    pub fn catalog(&self) -> &Arc<LevelCatalog> {
        &self.catalog
    }

    pub fn segment_index(&self) -> usize {
        self.segment_index
    }

    pub fn current_segment(&self) -> &Segment {
        &self.catalog.segments()[self.segment_index]
    }

    pub fn blocks_remaining(&self) -> u32 {
        self.blocks_remaining
    }

    pub fn blocks_consumed(&self) -> u32 {
        self.blocks_consumed
    }

    pub fn layout(&self) -> LaneLayout {
        self.layout
    }

    /// Boundaries of every lane in the current segment
    pub fn geometry(&self) -> LaneGeometry {
        self.geometry
    }

    /// Legal horizontal region right now.
    ///
    /// During a transition this is the union of the configuration being left
    /// and every one loaded since; otherwise the current single (or left) lane.
    pub fn boundaries(&self) -> LaneBounds {
        match &self.transition {
            Some(t) => t.extent,
            None => self.geometry.primary,
        }
    }

    pub fn in_transition(&self) -> bool {
        self.transition.is_some()
    }

    pub fn transition_blocks_remaining(&self) -> u32 {
        self.transition.map_or(0, |t| t.blocks_remaining)
    }

    pub fn is_dual_lane(&self) -> bool {
        self.layout.lanes.is_dual()
    }

    pub fn is_complete(&self) -> bool {
        self.segment_index >= self.catalog.last_index() && self.blocks_remaining == 0
    }

    /// Absolute block the player has reached
    pub fn world_block(&self) -> u32 {
        self.catalog.segment_start_block(self.segment_index) + self.blocks_consumed
    }

    /// Absolute pixel distance traveled, including the partial block
    pub fn world_position(&self) -> i32 {
        self.world_block() as i32 * BLOCK_SIZE_PX + self.scroll.accumulator()
    }

    pub fn scroll(&self) -> &ScrollConverter {
        &self.scroll
    }

    /// All objects of the current segment
    pub fn current_objects(&self) -> &[LevelObject] {
        self.catalog.segment_objects(self.segment_index)
    }

    /// Objects of the current segment that have not activated yet
    pub fn pending_objects(&self) -> &[LevelObject] {
        &self.catalog.objects()[self.object_cursor..self.object_end]
    }

    /// Index of the next object waiting to activate
    pub fn object_cursor(&self) -> usize {
        self.object_cursor
    }

    /// True if a world point is inside any lane at its own world Y, or inside
    /// the widened transition region
    pub fn is_on_course(&self, point: IVec2) -> bool {
        let at_y = geometry_at(&self.catalog, point.y, self.geometry);
        at_y.contains(point.x) || (self.in_transition() && self.boundaries().contains(point.x))
    }

    /// Hazard object (hole or laser) covering a world point, if any
    pub fn hazard_at(&self, point: IVec2) -> Option<(usize, &LevelObject)> {
        let span = self.catalog.locate(point.y)?;
        let seg = self.catalog.segment(span.index)?;
        let geometry = lane_geometry(seg.layout);
        let range = seg.objects.range();

        range
            .clone()
            .zip(&self.catalog.objects()[range])
            .find(|(_, obj)| obj.kind.is_hazard() && object_contains(&geometry, &span, obj, point))
    }
}
