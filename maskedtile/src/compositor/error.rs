//! Compositor errors.

use thiserror::Error;

use crate::source::SourceError;

/// Errors raised while compositing a tile or addressing a layer.
///
/// Per-tile failures never reach the caller of
/// [`TileCompositor::request_tile`](super::TileCompositor::request_tile);
/// they are logged and the tile degrades to blank.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompositeError {
    /// The source tile could not be fetched or decoded
    #[error(transparent)]
    Source(#[from] SourceError),

    /// A coverage mask of the requested size could not be allocated
    #[error("Cannot allocate a {size}x{size} clip mask")]
    MaskAllocation { size: u32 },

    /// PNG encoding failed
    #[error("Failed to encode tile: {0}")]
    Encode(String),

    /// No layer with this name exists in the group
    #[error("Unknown layer: {0}")]
    UnknownLayer(String),

    /// A layer with this name already exists in the group
    #[error("Layer already exists: {0}")]
    DuplicateLayer(String),
}
