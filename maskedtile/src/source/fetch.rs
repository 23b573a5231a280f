//! Fetching and decoding source tiles.

use image::{ImageReader, RgbaImage};
use std::io::Cursor;

use super::error::SourceError;
use super::http::AsyncHttpClient;
use super::template::SourceLocation;

/// Reads raw tile bytes from HTTP or the filesystem.
pub struct SourceFetcher<C> {
    client: C,
}

impl<C: AsyncHttpClient> SourceFetcher<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Reads the bytes at `location`.
    pub async fn fetch(&self, location: &SourceLocation) -> Result<Vec<u8>, SourceError> {
        match location {
            SourceLocation::Http(url) => self.client.get(url).await,
            SourceLocation::File(path) => {
                tokio::fs::read(path).await.map_err(|e| SourceError::Io {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })
            }
        }
    }
}

/// Decodes `bytes` into an RGBA image of exactly `tile_size`×`tile_size`.
///
/// The format is sniffed from the content. An image of any other size is
/// placed at the top-left of a transparent canvas of the right size, cropped
/// where it overhangs.
pub fn decode_tile(bytes: &[u8], tile_size: u32) -> Result<RgbaImage, SourceError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| SourceError::Decode(e.to_string()))?;
    let decoded = reader
        .decode()
        .map_err(|e| SourceError::Decode(e.to_string()))?
        .into_rgba8();

    if decoded.dimensions() == (tile_size, tile_size) {
        return Ok(decoded);
    }

    let mut canvas = RgbaImage::new(tile_size, tile_size);
    image::imageops::replace(&mut canvas, &decoded, 0, 0);
    Ok(canvas)
}
