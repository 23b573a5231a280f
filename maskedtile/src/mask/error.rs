//! Error types for mask loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that prevent a mask document from being read at all.
///
/// Individual malformed features are not errors; they are skipped and
/// counted on the resulting [`MaskGeometry`](super::MaskGeometry).
#[derive(Debug, Error)]
pub enum MaskError {
    /// The document is not valid JSON
    #[error("Invalid GeoJSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The top-level object is not a feature collection, feature or polygon
    #[error("Unsupported GeoJSON type: {0}")]
    UnsupportedType(String),

    /// The mask file could not be read
    #[error("Failed to read mask file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}
