//! GeoJSON mask loading.
//!
//! Accepts a `FeatureCollection`, a single `Feature`, or a bare `Polygon` /
//! `MultiPolygon` geometry. Parsing is lenient per feature: a feature with a
//! missing geometry, an unsupported geometry type, or malformed coordinates
//! is skipped and counted, and the remaining features still form the mask.

use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use super::error::MaskError;
use super::geometry::{LonLat, MaskGeometry, MaskPolygon, Ring};

/// GeoJSON position: `[longitude, latitude, (altitude)...]`.
type Position = Vec<f64>;

#[derive(Deserialize)]
#[serde(tag = "type")]
enum PolygonalGeometry {
    Polygon {
        coordinates: Vec<Vec<Position>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<Position>>>,
    },
}

#[derive(Deserialize)]
struct Feature {
    #[serde(default)]
    geometry: Option<Value>,
}

#[derive(Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Value>,
}

impl MaskGeometry {
    /// Parses a GeoJSON document from bytes.
    pub fn from_geojson_slice(bytes: &[u8]) -> Result<Self, MaskError> {
        let value: Value = serde_json::from_slice(bytes)?;
        Self::from_geojson_value(value)
    }

    /// Parses a GeoJSON document from a string.
    pub fn from_geojson_str(text: &str) -> Result<Self, MaskError> {
        Self::from_geojson_slice(text.as_bytes())
    }

    /// Reads and parses a GeoJSON file.
    pub fn load_geojson(path: &Path) -> Result<Self, MaskError> {
        let bytes = std::fs::read(path).map_err(|source| MaskError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_geojson_slice(&bytes)
    }

    fn from_geojson_value(value: Value) -> Result<Self, MaskError> {
        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let features = match kind.as_str() {
            "FeatureCollection" => serde_json::from_value::<FeatureCollection>(value)?.features,
            "Feature" | "Polygon" | "MultiPolygon" => vec![value],
            other => return Err(MaskError::UnsupportedType(other.to_string())),
        };

        let mut polygons = Vec::new();
        let mut skipped = 0;
        for feature in features {
            match feature_polygons(feature) {
                Some(found) if !found.is_empty() => polygons.extend(found),
                _ => skipped += 1,
            }
        }

        Ok(MaskGeometry::new(polygons).with_skipped_features(skipped))
    }
}

/// Extracts the polygons of one feature (or bare geometry).
///
/// Returns `None` when the feature has no usable polygonal geometry.
fn feature_polygons(feature: Value) -> Option<Vec<MaskPolygon>> {
    let geometry = match feature.get("type").and_then(Value::as_str) {
        Some("Feature") => serde_json::from_value::<Feature>(feature).ok()?.geometry?,
        _ => feature,
    };

    match serde_json::from_value::<PolygonalGeometry>(geometry).ok()? {
        PolygonalGeometry::Polygon { coordinates } => {
            Some(polygon_from_rings(coordinates).into_iter().collect())
        }
        PolygonalGeometry::MultiPolygon { coordinates } => Some(
            coordinates
                .into_iter()
                .filter_map(polygon_from_rings)
                .collect(),
        ),
    }
}

fn polygon_from_rings(rings: Vec<Vec<Position>>) -> Option<MaskPolygon> {
    let mut rings = rings.into_iter().map(ring_from_positions);
    let outer = rings.next()?;
    if outer.is_empty() {
        return None;
    }
    Some(MaskPolygon {
        outer,
        holes: rings.collect(),
    })
}

fn ring_from_positions(positions: Vec<Position>) -> Ring {
    let points: Vec<LonLat> = positions
        .into_iter()
        .filter(|p| p.len() >= 2)
        .map(|p| (p[0], p[1]))
        .collect();
    Ring::new(points)
}
