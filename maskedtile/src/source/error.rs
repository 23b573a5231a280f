//! Raster source errors.

use std::fmt;

/// Errors that can occur while locating, fetching or decoding a source tile.
///
/// These never escape a tile request: the compositor logs them and produces
/// a blank tile instead.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceError {
    /// No source template has been configured
    NoSource,
    /// The source template cannot produce a location
    InvalidTemplate(String),
    /// HTTP request failed before a response arrived
    HttpError(String),
    /// Server answered with a non-success status
    HttpStatus { status: u16, url: String },
    /// Local file could not be read
    Io { path: String, message: String },
    /// Payload is not a decodable raster image
    Decode(String),
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::NoSource => write!(f, "No raster source configured"),
            SourceError::InvalidTemplate(msg) => write!(f, "Invalid source template: {}", msg),
            SourceError::HttpError(msg) => write!(f, "HTTP error: {}", msg),
            SourceError::HttpStatus { status, url } => write!(f, "HTTP {} from {}", status, url),
            SourceError::Io { path, message } => {
                write!(f, "Failed to read {}: {}", path, message)
            }
            SourceError::Decode(msg) => write!(f, "Failed to decode image: {}", msg),
        }
    }
}

impl std::error::Error for SourceError {}
