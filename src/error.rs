//! Errors raised while loading or decoding authored level data
//!
//! The running engine never fails; these only surface at load time.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("unknown built-in level `{0}`")]
    UnknownLevel(String),

    #[error("level `{0}` has no segments")]
    Empty(String),

    #[error(
        "segment {segment} references objects {start}..{end} but the level only has {available}"
    )]
    ObjectRangeOutOfBounds {
        segment: usize,
        start: usize,
        end: usize,
        available: usize,
    },

    #[error("object {index} uses reserved kind bits {bits:#05b}")]
    ReservedObjectKind { index: usize, bits: u8 },

    #[error("object {index} uses reserved lane bits {bits:#04b}")]
    ReservedObjectLane { index: usize, bits: u8 },

    #[error("segment {segment} width {width} does not fit in 6 bits")]
    WidthOverflow { segment: usize, width: u8 },

    #[error("too many objects ({count}, max {max})")]
    TooManyObjects { count: usize, max: usize },

    #[error("invalid level JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("reading level file: {0}")]
    Io(#[from] std::io::Error),
}
