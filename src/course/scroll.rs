//! Scroll-to-block conversion
//!
//! The scroll position decreases as the course moves forward (0, -1, -2, ...),
//! by a variable amount per tick. Forward travel is accumulated in pixels and
//! handed out one whole block at a time.

use serde::{Deserialize, Serialize};

use crate::consts::BLOCK_SIZE_PX;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrollConverter {
    /// Forward pixels not yet consumed as a block
    accumulator: i32,
    /// Scroll position seen on the previous update
    last_position: i32,
}

impl ScrollConverter {
    pub fn new(position: i32) -> Self {
        Self {
            accumulator: 0,
            last_position: position,
        }
    }

    /// Record a new scroll position and return the forward delta applied.
    ///
    /// Backward or zero movement is ignored, so jitter never rewinds progress.
    pub fn observe(&mut self, position: i32) -> i32 {
        let delta = self.last_position.saturating_sub(position);
        self.last_position = position;

        if delta > 0 {
            self.accumulator = self.accumulator.saturating_add(delta);
            delta
        } else {
            0
        }
    }

    /// Consume one block from the accumulator if a full block is available
    pub fn take_block(&mut self) -> bool {
        if self.accumulator >= BLOCK_SIZE_PX {
            self.accumulator -= BLOCK_SIZE_PX;
            true
        } else {
            false
        }
    }

    /// Whole blocks currently waiting in the accumulator
    pub fn pending_blocks(&self) -> i32 {
        self.accumulator / BLOCK_SIZE_PX
    }

    pub fn accumulator(&self) -> i32 {
        self.accumulator
    }

    pub fn last_position(&self) -> i32 {
        self.last_position
    }
}
