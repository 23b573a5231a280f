//! Per-pixel color transform.

use image::{Rgba, RgbaImage};

use super::state::FilterState;

/// Applies a [`FilterState`] to RGBA pixels.
///
/// Pixels with zero alpha are left as they are, as is alpha itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorFilter {
    state: FilterState,
    hue: f64,
    saturation: f64,
    brightness: f64,
    identity: bool,
}

impl ColorFilter {
    pub fn new(state: FilterState) -> Self {
        Self {
            state,
            hue: state.normalized_hue(),
            saturation: state.saturation,
            brightness: state.brightness,
            identity: state.is_identity(),
        }
    }

    pub fn state(&self) -> FilterState {
        self.state
    }

    pub fn is_identity(&self) -> bool {
        self.identity
    }

    /// Transforms a single pixel.
    pub fn apply(&self, pixel: Rgba<u8>) -> Rgba<u8> {
        let [r, g, b, a] = pixel.0;
        if self.identity || a == 0 {
            return pixel;
        }

        let (h, s, l) = rgb_to_hsl(r, g, b);
        let h = (h + self.hue).rem_euclid(360.0);
        let s = (s * self.saturation).clamp(0.0, 1.0);
        let l = (l * self.brightness).clamp(0.0, 1.0);
        let (r, g, b) = hsl_to_rgb(h, s, l);

        Rgba([r, g, b, a])
    }

    /// Transforms every pixel of `image` in place.
    pub fn apply_image(&self, image: &mut RgbaImage) {
        if self.identity {
            return;
        }
        for pixel in image.pixels_mut() {
            *pixel = self.apply(*pixel);
        }
    }
}

impl From<FilterState> for ColorFilter {
    fn from(state: FilterState) -> Self {
        Self::new(state)
    }
}

/// Applies `state` to one pixel.
pub fn apply(pixel: Rgba<u8>, state: FilterState) -> Rgba<u8> {
    ColorFilter::new(state).apply(pixel)
}

/// Applies `state` to a whole image in place.
pub fn apply_image(image: &mut RgbaImage, state: FilterState) {
    ColorFilter::new(state).apply_image(image)
}

/// RGB to (hue degrees, saturation, lightness).
fn rgb_to_hsl(r: u8, g: u8, b: u8) -> (f64, f64, f64) {
    let r = f64::from(r) / 255.0;
    let g = f64::from(g) / 255.0;
    let b = f64::from(b) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;
    let delta = max - min;

    if delta == 0.0 {
        return (0.0, 0.0, l);
    }

    let s = if l > 0.5 {
        delta / (2.0 - max - min)
    } else {
        delta / (max + min)
    };

    let h = if max == r {
        ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };

    (h * 60.0, s, l)
}

fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (u8, u8, u8) {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let h = h / 60.0;
    let x = c * (1.0 - (h.rem_euclid(2.0) - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    (to_channel(r + m), to_channel(g + m), to_channel(b + m))
}

fn to_channel(value: f64) -> u8 {
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_is_bit_exact() {
        let filter = ColorFilter::new(FilterState::identity());
        for &px in &[[0, 0, 0, 255], [12, 200, 99, 17], [255, 255, 255, 1], [7, 8, 9, 0]] {
            assert_eq!(filter.apply(Rgba(px)), Rgba(px));
        }
    }

    #[test]
    fn test_full_turn_hue_is_identity() {
        assert!(FilterState::new(360.0, 1.0, 1.0).is_identity());
        assert!(FilterState::new(-720.0, 1.0, 1.0).is_identity());
        assert!(!FilterState::new(90.0, 1.0, 1.0).is_identity());
    }

    #[test]
    fn test_hue_rotation_primary_colors() {
        let rotate = FilterState::new(120.0, 1.0, 1.0);
        assert_eq!(apply(Rgba([255, 0, 0, 255]), rotate), Rgba([0, 255, 0, 255]));
        assert_eq!(apply(Rgba([0, 255, 0, 255]), rotate), Rgba([0, 0, 255, 255]));
        assert_eq!(apply(Rgba([0, 0, 255, 255]), rotate), Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_negative_hue_wraps() {
        let back = FilterState::new(-120.0, 1.0, 1.0);
        assert_eq!(apply(Rgba([0, 255, 0, 255]), back), Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_zero_saturation_is_grey() {
        let grey = apply(Rgba([200, 40, 40, 255]), FilterState::new(0.0, 0.0, 1.0));
        assert_eq!(grey[0], grey[1]);
        assert_eq!(grey[1], grey[2]);
        assert_eq!(grey[0], 120);
    }

    #[test]
    fn test_brightness_scales_lightness() {
        assert_eq!(
            apply(Rgba([255, 255, 255, 255]), FilterState::new(0.0, 1.0, 0.5)),
            Rgba([128, 128, 128, 255])
        );
        assert_eq!(
            apply(Rgba([100, 100, 100, 255]), FilterState::new(0.0, 1.0, 0.0)),
            Rgba([0, 0, 0, 255])
        );
        // Lightness clamps at white
        assert_eq!(
            apply(Rgba([200, 200, 200, 255]), FilterState::new(0.0, 1.0, 3.0)),
            Rgba([255, 255, 255, 255])
        );
    }

    #[test]
    fn test_alpha_is_preserved() {
        let out = apply(Rgba([255, 0, 0, 77]), FilterState::new(120.0, 1.0, 1.0));
        assert_eq!(out[3], 77);
    }

    #[test]
    fn test_transparent_pixels_untouched() {
        let px = Rgba([255, 0, 0, 0]);
        assert_eq!(apply(px, FilterState::new(120.0, 0.0, 0.0)), px);
    }

    #[test]
    fn test_apply_image() {
        let mut image = RgbaImage::from_pixel(4, 4, Rgba([255, 0, 0, 255]));
        image.put_pixel(0, 0, Rgba([255, 0, 0, 0]));
        apply_image(&mut image, FilterState::new(240.0, 1.0, 1.0));

        assert_eq!(*image.get_pixel(0, 0), Rgba([255, 0, 0, 0]));
        assert_eq!(*image.get_pixel(3, 3), Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn test_deterministic() {
        let state = FilterState::new(33.0, 0.7, 1.2);
        let px = Rgba([17, 130, 201, 255]);
        assert_eq!(apply(px, state), apply(px, state));
    }

    #[test]
    fn test_display_reads_like_css() {
        assert_eq!(
            FilterState::new(90.0, 1.5, 0.8).to_string(),
            "hue-rotate(90deg) saturate(1.5) brightness(0.8)"
        );
    }
}
