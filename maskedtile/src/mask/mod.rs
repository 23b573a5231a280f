//! Mask geometry and tile clipping.
//!
//! A mask is a set of polygons in geographic coordinates. Outside the union
//! of its outer rings, and inside any hole ring, the composited tile is fully
//! transparent.
//!
//! - [`geometry`]: rings, polygons and the mask collection
//! - [`geojson`]: loading masks from GeoJSON documents
//! - [`clip`]: projecting a mask into a tile-local clip path

mod clip;
mod error;
mod geojson;
mod geometry;

pub use clip::{build_clip_path, ClipPath, ClipPathBuilder, FillRule, TilePoint};
pub use error::MaskError;
pub use geometry::{LonLat, MaskGeometry, MaskPolygon, Ring};
