//! Tile compositing.
//!
//! A [`TileCompositor`] turns one tile request into a [`CompositedTile`]:
//!
//! ```text
//! fetch → decode → clip (mask) → filter → READY
//!   └──────── any failure ────────────→ BLANK
//! ```
//!
//! The layer's configuration lives in one versioned cell. Mask and filter
//! are read when compositing runs, after the source has arrived; the source
//! itself is captured when the request is issued. Decoded sources of tracked
//! tiles are retained so filter and mask changes recomposite without
//! fetching again.
//!
//! [`LayerGroup`] manages several compositors that share one mask.

mod error;
mod group;
pub mod pipeline;
mod request;
mod state;
mod stats;
mod tile;
mod tile_compositor;

pub use error::CompositeError;
pub use group::{LayerGroup, LayerUpdate};
pub use request::{CompositionRequest, TileState};
pub use state::LayerSnapshot;
pub use stats::{CompositorStats, CompositorStatsSnapshot};
pub use tile::CompositedTile;
pub use tile_compositor::TileCompositor;
