//! Coordinate type definitions

use std::fmt;

/// Web Mercator valid latitude range
pub const MIN_LAT: f64 = -85.0511287798;
pub const MAX_LAT: f64 = 85.0511287798;

/// Valid longitude range
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// Supported zoom range. World-pixel coordinates at the maximum zoom
/// still fit comfortably in `u32` tile indices and `f32` path coordinates.
pub const MIN_ZOOM: u8 = 0;
pub const MAX_ZOOM: u8 = 24;

/// Canonical edge length of a slippy-map tile in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 256;

/// Tile coordinates in the Web Mercator / Slippy Map system.
///
/// Identifies one square raster cell of a power-of-two pyramid. The
/// conventional `{z}/{x}/{y}` addressing maps to `zoom/col/row`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileCoord {
    /// Zoom level
    pub zoom: u8,
    /// X coordinate (east-west), 0 at west
    pub col: u32,
    /// Y coordinate (north-south), 0 at north
    pub row: u32,
}

impl TileCoord {
    /// Creates a tile coordinate in `{z}/{x}/{y}` order.
    #[inline]
    pub fn new(zoom: u8, col: u32, row: u32) -> Self {
        Self { zoom, col, row }
    }

    /// Number of tiles along one axis at this zoom level.
    ///
    /// Saturates at `u64::MAX` for zoom levels of 64 and above.
    #[inline]
    pub fn tiles_per_axis(&self) -> u64 {
        1u64.checked_shl(u32::from(self.zoom)).unwrap_or(u64::MAX)
    }

    /// Returns true if the column and row lie inside the pyramid at this zoom.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.zoom <= MAX_ZOOM
            && u64::from(self.col) < self.tiles_per_axis()
            && u64::from(self.row) < self.tiles_per_axis()
    }

    /// Row index counted from the south edge (TMS convention).
    ///
    /// Saturates at zero for rows outside the pyramid.
    #[inline]
    pub fn tms_row(&self) -> u64 {
        (self.tiles_per_axis() - 1).saturating_sub(u64::from(self.row))
    }

    /// World-pixel position of the tile's top-left corner.
    #[inline]
    pub fn world_origin(&self, tile_size: u32) -> (f64, f64) {
        let size = f64::from(tile_size);
        (f64::from(self.col) * size, f64::from(self.row) * size)
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.col, self.row)
    }
}

/// Errors that can occur during coordinate conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordError {
    /// Latitude is outside valid range (-85.0511287798 to 85.0511287798)
    InvalidLatitude(f64),
    /// Longitude is outside valid range (-180.0 to 180.0)
    InvalidLongitude(f64),
    /// Zoom level is outside valid range (0 to 24)
    InvalidZoom(u8),
}

impl fmt::Display for CoordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordError::InvalidLatitude(lat) => {
                write!(
                    f,
                    "Invalid latitude: {} (must be between {} and {})",
                    lat, MIN_LAT, MAX_LAT
                )
            }
            CoordError::InvalidLongitude(lon) => {
                write!(
                    f,
                    "Invalid longitude: {} (must be between {} and {})",
                    lon, MIN_LON, MAX_LON
                )
            }
            CoordError::InvalidZoom(zoom) => {
                write!(
                    f,
                    "Invalid zoom level: {} (must be between {} and {})",
                    zoom, MIN_ZOOM, MAX_ZOOM
                )
            }
        }
    }
}

impl std::error::Error for CoordError {}
