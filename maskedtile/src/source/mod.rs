//! Raster tile sources.
//!
//! A [`SourceTemplate`] resolves a tile coordinate to a [`SourceLocation`],
//! the [`SourceFetcher`] reads its bytes over HTTP or from disk, and
//! [`decode_tile`] turns them into a tile-sized RGBA image.

mod error;
mod fetch;
pub mod http;
mod template;

pub use error::SourceError;
pub use fetch::{decode_tile, SourceFetcher};
pub use http::{AsyncHttpClient, AsyncReqwestClient, DEFAULT_TIMEOUT_SECS};
pub use template::{SourceLocation, SourceTemplate};
