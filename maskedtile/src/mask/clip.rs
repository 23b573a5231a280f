//! Tile-local clip paths.
//!
//! [`ClipPathBuilder`] turns a [`MaskGeometry`] into the set of closed
//! subpaths that bound the mask inside one tile, expressed in pixels relative
//! to the tile's top-left corner. Building is pure: no drawing surface is
//! involved, so inclusion can be checked with [`ClipPath::contains`] and the
//! same path can later be rasterized into a coverage mask.
//!
//! # Fill rule
//!
//! Even-odd is the canonical rule. Hole rings are punched out regardless of
//! their winding direction: a point enclosed by an outer ring and a hole ring
//! crosses an even number of boundaries and is outside. Non-zero winding is
//! available for comparison only; it fails to punch holes whose rings share
//! the outer ring's orientation.

use tiny_skia::{Mask, PathBuilder, Transform};

use super::geometry::{MaskGeometry, Ring};
use crate::coord::TileCoord;
use crate::projection::GeoProjector;

/// A point in tile-local pixel space.
pub type TilePoint = (f64, f64);

/// Rule deciding whether a point enclosed by several subpaths is inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillRule {
    /// Inside iff the point crosses an odd number of boundaries.
    #[default]
    EvenOdd,
    /// Inside iff the winding number is non-zero.
    NonZero,
}

impl FillRule {
    fn to_skia(self) -> tiny_skia::FillRule {
        match self {
            FillRule::EvenOdd => tiny_skia::FillRule::EvenOdd,
            FillRule::NonZero => tiny_skia::FillRule::Winding,
        }
    }
}

/// Clip region for one tile.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipPath {
    subpaths: Vec<Vec<TilePoint>>,
    fill_rule: FillRule,
    pass_through: bool,
    skipped_rings: usize,
}

impl ClipPath {
    /// A clip path that does not clip at all.
    pub fn pass_through() -> Self {
        Self {
            subpaths: Vec::new(),
            fill_rule: FillRule::EvenOdd,
            pass_through: true,
            skipped_rings: 0,
        }
    }

    /// A clip path from explicit tile-local subpaths.
    pub fn from_subpaths(subpaths: Vec<Vec<TilePoint>>) -> Self {
        Self {
            subpaths,
            fill_rule: FillRule::EvenOdd,
            pass_through: false,
            skipped_rings: 0,
        }
    }

    /// Overrides the fill rule.
    pub fn with_fill_rule(mut self, fill_rule: FillRule) -> Self {
        self.fill_rule = fill_rule;
        self
    }

    /// True when no mask applies and the source shows unclipped.
    pub fn is_pass_through(&self) -> bool {
        self.pass_through
    }

    pub fn subpaths(&self) -> &[Vec<TilePoint>] {
        &self.subpaths
    }

    pub fn fill_rule(&self) -> FillRule {
        self.fill_rule
    }

    /// Rings dropped because they were degenerate or did not project.
    pub fn skipped_rings(&self) -> usize {
        self.skipped_rings
    }

    /// True when a mask is set but nothing of it reaches this tile.
    pub fn excludes_everything(&self) -> bool {
        !self.pass_through && self.subpaths.is_empty()
    }

    /// Whether the tile-local point `(x, y)` lies inside the clip region.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        if self.pass_through {
            return true;
        }

        let mut crossings = 0u32;
        let mut winding = 0i32;
        for subpath in &self.subpaths {
            let n = subpath.len();
            for i in 0..n {
                let (x0, y0) = subpath[i];
                let (x1, y1) = subpath[(i + 1) % n];
                // Half-open rule: an edge counts when it straddles the ray's y
                if (y0 <= y) == (y1 <= y) {
                    continue;
                }
                let x_at = x0 + (y - y0) / (y1 - y0) * (x1 - x0);
                if x < x_at {
                    crossings += 1;
                    winding += if y1 > y0 { 1 } else { -1 };
                }
            }
        }

        match self.fill_rule {
            FillRule::EvenOdd => crossings % 2 == 1,
            FillRule::NonZero => winding != 0,
        }
    }

    /// Renders the clip region into an 8-bit coverage mask of `size`×`size`.
    ///
    /// Returns `None` for a pass-through path or when the mask surface cannot
    /// be allocated. Subpaths are filled together so the fill rule sees
    /// every ring at once.
    pub fn rasterize(&self, size: u32, anti_alias: bool) -> Option<Mask> {
        if self.pass_through {
            return None;
        }

        let mut mask = Mask::new(size, size)?;

        let mut builder = PathBuilder::new();
        for subpath in &self.subpaths {
            let mut points = subpath.iter();
            if let Some(&(x, y)) = points.next() {
                builder.move_to(x as f32, y as f32);
                for &(x, y) in points {
                    builder.line_to(x as f32, y as f32);
                }
                builder.close();
            }
        }

        // An empty or unrepresentable path leaves the mask fully clear
        if let Some(path) = builder.finish() {
            mask.fill_path(
                &path,
                self.fill_rule.to_skia(),
                anti_alias,
                Transform::identity(),
            );
        }

        Some(mask)
    }
}

/// Projects mask geometry into tile-local clip paths.
pub struct ClipPathBuilder<'a> {
    projector: &'a dyn GeoProjector,
    tile_size: u32,
}

impl<'a> ClipPathBuilder<'a> {
    pub fn new(projector: &'a dyn GeoProjector, tile_size: u32) -> Self {
        Self {
            projector,
            tile_size,
        }
    }

    /// Builds the clip path of `mask` for `tile`.
    ///
    /// Degenerate rings and rings with unprojectable points are skipped
    /// individually. A polygon whose outer ring is skipped loses its holes
    /// too. Rings whose bounds miss the tile are dropped silently since they
    /// cannot enclose any of its pixels.
    pub fn build(&self, mask: &MaskGeometry, tile: TileCoord) -> ClipPath {
        let origin = tile.world_origin(self.tile_size);
        let mut subpaths = Vec::new();
        let mut skipped_rings = 0;

        for polygon in mask.polygons() {
            let outer = match self.project_ring(&polygon.outer, tile.zoom, origin) {
                Some(points) => points,
                None => {
                    skipped_rings += 1 + polygon.holes.len();
                    continue;
                }
            };
            if !self.touches_tile(&outer) {
                continue;
            }
            subpaths.push(outer);

            for hole in &polygon.holes {
                match self.project_ring(hole, tile.zoom, origin) {
                    Some(points) if self.touches_tile(&points) => subpaths.push(points),
                    Some(_) => {}
                    None => skipped_rings += 1,
                }
            }
        }

        ClipPath {
            subpaths,
            fill_rule: FillRule::EvenOdd,
            pass_through: false,
            skipped_rings,
        }
    }

    fn project_ring(&self, ring: &Ring, zoom: u8, origin: (f64, f64)) -> Option<Vec<TilePoint>> {
        if ring.is_degenerate() {
            return None;
        }

        let mut points: Vec<TilePoint> = Vec::with_capacity(ring.points().len());
        for &(lon, lat) in ring.points() {
            let world = self.projector.project(lon, lat, zoom);
            if !world.is_finite() {
                return None;
            }
            let point = (world.x - origin.0, world.y - origin.1);
            if points.last() != Some(&point) {
                points.push(point);
            }
        }
        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }

        // Distinct geographic points may still collapse in pixel space
        if points.len() < 3 {
            return None;
        }
        Some(points)
    }

    fn touches_tile(&self, points: &[TilePoint]) -> bool {
        let size = f64::from(self.tile_size);
        let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
        let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for &(x, y) in points {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
        max_x > 0.0 && max_y > 0.0 && min_x < size && min_y < size
    }
}

/// Builds the clip path for one tile.
///
/// Without a mask or without a projector the result is pass-through.
pub fn build_clip_path(
    mask: Option<&MaskGeometry>,
    projector: Option<&dyn GeoProjector>,
    tile: TileCoord,
    tile_size: u32,
) -> ClipPath {
    match (mask, projector) {
        (Some(mask), Some(projector)) => {
            ClipPathBuilder::new(projector, tile_size).build(mask, tile)
        }
        _ => ClipPath::pass_through(),
    }
}
