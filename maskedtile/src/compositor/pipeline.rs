//! Pure compositing steps: clip then filter.

use image::{Rgba, RgbaImage};

use super::error::CompositeError;
use crate::filter::ColorFilter;
use crate::mask::ClipPath;

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Clips the image to the clip path.
///
/// A pixel whose centre lies inside the path keeps its source alpha.
/// Pixels whose centre lies outside but which the path partly covers (an
/// anti-aliased edge) have their alpha multiplied by that coverage.
/// Uncovered pixels become transparent black. A pass-through clip leaves
/// the image untouched.
pub fn apply_clip(
    image: &mut RgbaImage,
    clip: &ClipPath,
    anti_alias: bool,
) -> Result<(), CompositeError> {
    if clip.is_pass_through() {
        return Ok(());
    }

    let size = image.width();
    if clip.excludes_everything() {
        image.pixels_mut().for_each(|p| *p = TRANSPARENT);
        return Ok(());
    }

    let mask = clip
        .rasterize(size, anti_alias)
        .ok_or(CompositeError::MaskAllocation { size })?;

    for ((x, y, pixel), &coverage) in image.enumerate_pixels_mut().zip(mask.data()) {
        match coverage {
            255 => {}
            0 => *pixel = TRANSPARENT,
            _ if clip.contains(f64::from(x) + 0.5, f64::from(y) + 0.5) => {}
            c => {
                let alpha = (u32::from(pixel[3]) * u32::from(c) + 127) / 255;
                *pixel = if alpha == 0 {
                    TRANSPARENT
                } else {
                    Rgba([pixel[0], pixel[1], pixel[2], alpha as u8])
                };
            }
        }
    }
    Ok(())
}

/// Produces the composited pixels for one tile from its decoded source.
///
/// The source is copied into a scratch buffer owned by the caller's
/// request; the retained source stays untouched for later recompositions.
pub fn composite(
    source: &RgbaImage,
    clip: &ClipPath,
    filter: &ColorFilter,
    anti_alias: bool,
) -> Result<RgbaImage, CompositeError> {
    let mut scratch = source.clone();
    apply_clip(&mut scratch, clip, anti_alias)?;
    filter.apply_image(&mut scratch);
    Ok(scratch)
}
