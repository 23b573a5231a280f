//! maskedtile - masked, color-filtered raster map tiles
//!
//! Composites slippy-map raster tiles so that the source imagery shows only
//! inside a vector mask (for example a municipal boundary), recolored with a
//! hue/saturation/brightness filter.
//!
//! # Modules
//!
//! - [`coord`]: tile coordinates
//! - [`projection`]: geographic to world-pixel projection
//! - [`mask`]: mask geometry, GeoJSON loading and tile clip paths
//! - [`filter`]: the color filter
//! - [`source`]: tile source templates, fetching and decoding
//! - [`compositor`]: the per-layer compositor and layer groups
//! - [`config`], [`log`], [`logging`]: ambient configuration and diagnostics
//!
//! ```ignore
//! use std::sync::Arc;
//! use maskedtile::compositor::TileCompositor;
//! use maskedtile::config::CompositorConfig;
//! use maskedtile::coord::TileCoord;
//! use maskedtile::mask::MaskGeometry;
//! use maskedtile::projection::WebMercator;
//! use maskedtile::source::SourceTemplate;
//!
//! let compositor = TileCompositor::with_http(CompositorConfig::default())?;
//! compositor.configure(SourceTemplate::new("https://tile.example.org/{z}/{x}/{y}.png")?).await;
//! let mask = MaskGeometry::load_geojson("city.geojson".as_ref())?;
//! compositor.set_mask(Some(Arc::new(mask)), Some(Arc::new(WebMercator::default()))).await;
//!
//! let tile = compositor.request_tile(TileCoord::new(13, 3640, 1611)).await;
//! std::fs::write("tile.png", tile.encode_png()?)?;
//! ```

pub mod compositor;
pub mod config;
pub mod coord;
pub mod filter;
pub mod log;
pub mod logging;
pub mod mask;
pub mod projection;
pub mod source;

/// Version of the maskedtile library and CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
