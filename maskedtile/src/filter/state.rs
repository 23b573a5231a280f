//! Color filter parameters.

use std::fmt;

/// Hue/saturation/brightness adjustment applied to every opaque pixel.
///
/// Values are accepted as given. Hue is reduced modulo 360 when applied;
/// saturation and brightness are multipliers where `1.0` leaves the channel
/// unchanged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterState {
    /// Hue rotation in degrees
    pub hue: f64,
    /// Saturation multiplier
    pub saturation: f64,
    /// Lightness multiplier
    pub brightness: f64,
}

impl FilterState {
    /// The filter that leaves every pixel untouched.
    pub const IDENTITY: FilterState = FilterState {
        hue: 0.0,
        saturation: 1.0,
        brightness: 1.0,
    };

    pub fn new(hue: f64, saturation: f64, brightness: f64) -> Self {
        Self {
            hue,
            saturation,
            brightness,
        }
    }

    pub fn identity() -> Self {
        Self::IDENTITY
    }

    /// Hue rotation reduced to `[0, 360)`.
    pub fn normalized_hue(&self) -> f64 {
        self.hue.rem_euclid(360.0)
    }

    /// True when applying this filter cannot change any pixel.
    pub fn is_identity(&self) -> bool {
        self.normalized_hue() == 0.0 && self.saturation == 1.0 && self.brightness == 1.0
    }
}

impl Default for FilterState {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl fmt::Display for FilterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hue-rotate({}deg) saturate({}) brightness({})",
            self.hue, self.saturation, self.brightness
        )
    }
}
