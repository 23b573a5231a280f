//! Composited tile output.

use std::io::Cursor;

use image::{ImageFormat, Rgba, RgbaImage};

use super::error::CompositeError;
use super::request::TileState;
use crate::coord::TileCoord;

/// A finished tile: an RGBA buffer plus how it came to be.
///
/// Pixels removed by the mask, and every pixel of a blank tile, are
/// transparent black. Source pixels that already had zero alpha keep their
/// colour bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositedTile {
    coord: TileCoord,
    state: TileState,
    image: RgbaImage,
    config_version: u64,
}

impl CompositedTile {
    pub(crate) fn ready(coord: TileCoord, image: RgbaImage, config_version: u64) -> Self {
        Self {
            coord,
            state: TileState::Ready,
            image,
            config_version,
        }
    }

    /// A fully transparent tile of `size`×`size`.
    pub fn blank(coord: TileCoord, size: u32, config_version: u64) -> Self {
        Self {
            coord,
            state: TileState::Blank,
            image: RgbaImage::new(size, size),
            config_version,
        }
    }

    pub fn coord(&self) -> TileCoord {
        self.coord
    }

    /// Terminal state: [`TileState::Ready`] or [`TileState::Blank`].
    pub fn state(&self) -> TileState {
        self.state
    }

    pub fn is_blank(&self) -> bool {
        self.state == TileState::Blank
    }

    /// Configuration version the mask and filter were read at.
    pub fn config_version(&self) -> u64 {
        self.config_version
    }

    /// Edge length in pixels.
    pub fn size(&self) -> u32 {
        self.image.width()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        *self.image.get_pixel(x, y)
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Raw RGBA bytes, row-major.
    pub fn as_bytes(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// True if every pixel has zero alpha.
    pub fn is_fully_transparent(&self) -> bool {
        self.image.pixels().all(|p| p[3] == 0)
    }

    /// Encodes the tile as PNG.
    pub fn encode_png(&self) -> Result<Vec<u8>, CompositeError> {
        let mut out = Cursor::new(Vec::new());
        self.image
            .write_to(&mut out, ImageFormat::Png)
            .map_err(|e| CompositeError::Encode(e.to_string()))?;
        Ok(out.into_inner())
    }

    /// Bakes `opacity` into the alpha channel.
    ///
    /// For hosts that cannot apply layer opacity themselves. `opacity` is
    /// clamped to `[0, 1]`.
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        let opacity = if opacity.is_nan() { 1.0 } else { opacity.clamp(0.0, 1.0) };
        if opacity >= 1.0 {
            return self;
        }
        for pixel in self.image.pixels_mut() {
            let alpha = (f64::from(pixel[3]) * opacity).round() as u8;
            *pixel = if alpha == 0 {
                Rgba([0, 0, 0, 0])
            } else {
                Rgba([pixel[0], pixel[1], pixel[2], alpha])
            };
        }
        self
    }
}
