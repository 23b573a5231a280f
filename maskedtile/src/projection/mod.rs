//! Geographic to world-pixel projection.
//!
//! The compositor never projects coordinates itself; it asks a
//! [`GeoProjector`] supplied by the host. [`WebMercator`] is the spherical
//! Mercator projection used by slippy-map frameworks and is the default.
//!
//! Projection has no failure mode. Non-finite input and latitudes outside
//! `[-90, 90]` produce a NaN [`WorldPoint`] which downstream code must guard
//! against.

use std::f64::consts::PI;
use std::fmt;

use crate::coord::{DEFAULT_TILE_SIZE, MAX_LAT, MIN_LAT};

/// A point in world-pixel space at a given zoom level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldPoint {
    pub x: f64,
    pub y: f64,
}

impl WorldPoint {
    /// The point returned for unprojectable input.
    pub const NAN: WorldPoint = WorldPoint {
        x: f64::NAN,
        y: f64::NAN,
    };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns true if both components are finite numbers.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Forward projection from `(longitude, latitude)` to world pixels.
///
/// Implementations must be deterministic: the same input always yields the
/// same output, with no side effects.
pub trait GeoProjector: Send + Sync + fmt::Debug {
    /// Projects a geographic point to world-pixel space at `zoom`.
    fn project(&self, lon: f64, lat: f64, zoom: u8) -> WorldPoint;
}

/// Spherical Web Mercator (EPSG:3857) projection.
///
/// World size at zoom `z` is `tile_size * 2^z` pixels with the origin at the
/// north-west corner. Latitudes beyond ±85.0511287798° are clamped to the
/// projection's limit, matching how slippy-map frameworks treat them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WebMercator {
    tile_size: u32,
}

impl WebMercator {
    /// Creates a projection for tiles of `tile_size` pixels.
    pub fn new(tile_size: u32) -> Self {
        Self { tile_size }
    }

    /// Edge length of one tile in pixels.
    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// World size in pixels at `zoom`.
    #[inline]
    pub fn world_size(&self, zoom: u8) -> f64 {
        f64::from(self.tile_size) * 2.0_f64.powi(zoom as i32)
    }

    /// Inverse projection from world pixels to `(longitude, latitude)`.
    pub fn unproject(&self, point: WorldPoint, zoom: u8) -> (f64, f64) {
        let scale = self.world_size(zoom);
        let lon = point.x / scale * 360.0 - 180.0;
        let lat = (PI * (1.0 - 2.0 * point.y / scale)).sinh().atan().to_degrees();
        (lon, lat)
    }
}

impl Default for WebMercator {
    fn default() -> Self {
        Self::new(DEFAULT_TILE_SIZE)
    }
}

impl GeoProjector for WebMercator {
    fn project(&self, lon: f64, lat: f64, zoom: u8) -> WorldPoint {
        if !lon.is_finite() || !lat.is_finite() || lat.abs() > 90.0 {
            return WorldPoint::NAN;
        }

        let scale = self.world_size(zoom);
        let sin = lat.clamp(MIN_LAT, MAX_LAT).to_radians().sin();

        let x = (lon + 180.0) / 360.0 * scale;
        let y = (0.5 - ((1.0 + sin) / (1.0 - sin)).ln() / (4.0 * PI)) * scale;

        WorldPoint { x, y }
    }
}
