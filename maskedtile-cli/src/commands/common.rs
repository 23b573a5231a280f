//! Argument groups and helpers shared by several commands.

use clap::Args;
use maskedtile::coord::{to_tile_coords, TileCoord, MAX_ZOOM};
use maskedtile::config::ConfigFile;
use maskedtile::filter::FilterState;

use crate::error::CliError;

/// Selects a tile either directly or by a geographic position.
#[derive(Debug, Clone, Args)]
pub struct TileArgs {
    /// Tile as zoom/x/y (XYZ scheme)
    #[arg(long, value_parser = parse_tile, conflicts_with_all = ["lat", "lon"])]
    pub tile: Option<TileCoord>,

    /// Latitude of a point inside the tile
    #[arg(long, requires_all = ["lon", "zoom"], allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude of a point inside the tile
    #[arg(long, requires_all = ["lat", "zoom"], allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// Zoom level used with --lat/--lon
    #[arg(long)]
    pub zoom: Option<u8>,
}

impl TileArgs {
    /// Resolve the selected tile.
    pub fn resolve(&self) -> Result<TileCoord, CliError> {
        if let Some(tile) = self.tile {
            return Ok(tile);
        }

        match (self.lat, self.lon, self.zoom) {
            (Some(lat), Some(lon), Some(zoom)) => to_tile_coords(lat, lon, zoom)
                .map_err(|e| CliError::InvalidArgument(e.to_string())),
            _ => Err(CliError::InvalidArgument(
                "specify --tile z/x/y or --lat, --lon and --zoom".to_string(),
            )),
        }
    }
}

/// Filter parameters; unset values come from the `[filter]` section.
#[derive(Debug, Clone, Args)]
pub struct FilterArgs {
    /// Hue rotation in degrees
    #[arg(long, allow_negative_numbers = true)]
    pub hue: Option<f64>,

    /// Saturation multiplier (1.0 = unchanged)
    #[arg(long)]
    pub saturation: Option<f64>,

    /// Brightness multiplier (1.0 = unchanged)
    #[arg(long)]
    pub brightness: Option<f64>,
}

impl FilterArgs {
    pub fn resolve(&self, config: &ConfigFile) -> FilterState {
        let base = config.filter_state();
        FilterState::new(
            self.hue.unwrap_or(base.hue),
            self.saturation.unwrap_or(base.saturation),
            self.brightness.unwrap_or(base.brightness),
        )
    }
}

/// Parse a `z/x/y` tile argument.
pub fn parse_tile(value: &str) -> Result<TileCoord, String> {
    let parts: Vec<&str> = value.trim().split('/').collect();
    let [z, x, y] = parts.as_slice() else {
        return Err(format!("expected zoom/x/y, got '{}'", value));
    };

    let zoom: u8 = z
        .parse()
        .map_err(|_| format!("invalid zoom '{}'", z))?;
    if zoom > MAX_ZOOM {
        return Err(format!("zoom {} exceeds maximum {}", zoom, MAX_ZOOM));
    }
    let col: u32 = x.parse().map_err(|_| format!("invalid column '{}'", x))?;
    let row: u32 = y.parse().map_err(|_| format!("invalid row '{}'", y))?;

    let tile = TileCoord::new(zoom, col, row);
    if !tile.is_valid() {
        return Err(format!("tile {} is outside the zoom {} grid", tile, zoom));
    }
    Ok(tile)
}

/// Parse an `x,y` tile-local pixel position.
pub fn parse_point(value: &str) -> Result<(f64, f64), String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected x,y, got '{}'", value))?;
    let x: f64 = x.trim().parse().map_err(|_| format!("invalid x '{}'", x))?;
    let y: f64 = y.trim().parse().map_err(|_| format!("invalid y '{}'", y))?;
    Ok((x, y))
}
