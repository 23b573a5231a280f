//! Vector mask geometry in geographic coordinates.

/// A `(longitude, latitude)` pair in degrees.
pub type LonLat = (f64, f64);

/// An ordered ring of geographic points.
///
/// Rings are implicitly closed: the last point may or may not repeat the
/// first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ring {
    points: Vec<LonLat>,
}

impl Ring {
    pub fn new(points: Vec<LonLat>) -> Self {
        Self { points }
    }

    /// The points as supplied, including any closing repeat.
    pub fn points(&self) -> &[LonLat] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of distinct vertices once consecutive repeats and the closing
    /// repeat are dropped.
    pub fn distinct_len(&self) -> usize {
        let mut count = 0;
        let mut prev: Option<LonLat> = None;
        for &p in &self.points {
            if prev != Some(p) {
                count += 1;
            }
            prev = Some(p);
        }
        if count > 1 && self.points.first() == self.points.last() {
            count -= 1;
        }
        count
    }

    /// A ring with fewer than three distinct points encloses no area.
    pub fn is_degenerate(&self) -> bool {
        self.distinct_len() < 3
    }
}

impl From<Vec<LonLat>> for Ring {
    fn from(points: Vec<LonLat>) -> Self {
        Self::new(points)
    }
}

/// One polygon: an outer ring and zero or more hole rings.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MaskPolygon {
    pub outer: Ring,
    pub holes: Vec<Ring>,
}

impl MaskPolygon {
    pub fn new(outer: impl Into<Ring>) -> Self {
        Self {
            outer: outer.into(),
            holes: Vec::new(),
        }
    }

    /// Adds a hole ring.
    pub fn with_hole(mut self, hole: impl Into<Ring>) -> Self {
        self.holes.push(hole.into());
        self
    }

    /// All rings, outer first.
    pub fn rings(&self) -> impl Iterator<Item = &Ring> {
        std::iter::once(&self.outer).chain(self.holes.iter())
    }
}

/// The mask region: an ordered set of polygons.
///
/// Replaced wholesale on the compositor; never mutated in place once
/// installed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MaskGeometry {
    polygons: Vec<MaskPolygon>,
    skipped_features: usize,
}

impl MaskGeometry {
    pub fn new(polygons: Vec<MaskPolygon>) -> Self {
        Self {
            polygons,
            skipped_features: 0,
        }
    }

    /// Records how many input features were dropped while loading.
    pub(crate) fn with_skipped_features(mut self, skipped: usize) -> Self {
        self.skipped_features = skipped;
        self
    }

    pub fn polygons(&self) -> &[MaskPolygon] {
        &self.polygons
    }

    pub fn push(&mut self, polygon: MaskPolygon) {
        self.polygons.push(polygon);
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Total number of rings across all polygons.
    pub fn ring_count(&self) -> usize {
        self.polygons.iter().map(|p| 1 + p.holes.len()).sum()
    }

    /// Features that could not be read as polygons when the mask was loaded.
    pub fn skipped_features(&self) -> usize {
        self.skipped_features
    }
}

impl FromIterator<MaskPolygon> for MaskGeometry {
    fn from_iter<I: IntoIterator<Item = MaskPolygon>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
