//! Per-tick course update
//!
//! One call per rendered frame: progression first, then row regeneration, so
//! every generated row sees this tick's lane state.

use std::sync::Arc;

use super::catalog::LevelCatalog;
use super::geometry::end_geometry;
use super::progression::{AdvanceReport, ProgressionState};
use super::sync::{ScrollSync, SyncReport, TileSink};

/// Everything that changes while a level is played
#[derive(Debug, Clone)]
pub struct CourseState {
    catalog: Arc<LevelCatalog>,
    pub progression: ProgressionState,
    pub sync: ScrollSync,
}

/// What one tick did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    pub advance: AdvanceReport,
    pub sync: SyncReport,
}

impl CourseState {
    /// Initialize progression at segment 0 and fill the tile buffer
    pub fn new(catalog: impl Into<Arc<LevelCatalog>>) -> Self {
        let catalog = catalog.into();
        let progression = ProgressionState::new(Arc::clone(&catalog));
        let mut sync = ScrollSync::new(0);
        sync.refresh(&catalog, end_geometry(&catalog));

        Self {
            catalog,
            progression,
            sync,
        }
    }

    /// Reinitialize all mutable state from scratch
    pub fn restart(&mut self) {
        log::info!("Restarting level '{}'", self.catalog.name());
        *self = Self::new(Arc::clone(&self.catalog));
    }

    pub fn catalog(&self) -> &LevelCatalog {
        &self.catalog
    }

    pub fn is_complete(&self) -> bool {
        self.progression.is_complete()
    }

    /// Push rows regenerated since the last flush to an external tile writer
    pub fn flush_to<S: TileSink>(&mut self, sink: &mut S) -> usize {
        self.sync.flush_to(sink)
    }
}

/// Advance the course to a new scroll position
pub fn tick(state: &mut CourseState, scroll_position: i32) -> TickReport {
    let advance = state.progression.update(scroll_position);
    let fallback = end_geometry(&state.catalog);
    let sync = state.sync.sync(&state.catalog, fallback, scroll_position);

    if sync.full_refresh {
        log::debug!("Full tile refresh at scroll {}", scroll_position);
    }

    TickReport { advance, sync }
}
