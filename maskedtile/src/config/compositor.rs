//! Compositor configuration.

use super::defaults::{
    default_subdomains, DEFAULT_ANTI_ALIAS, DEFAULT_TILE_SIZE, DEFAULT_TIMEOUT_SECS,
};

/// Configuration shared by every tile a compositor produces.
///
/// # Example
///
/// ```
/// use maskedtile::config::CompositorConfig;
///
/// let config = CompositorConfig::default();
/// assert_eq!(config.tile_size(), 256);
/// assert!(config.anti_alias());
///
/// let config = CompositorConfig::new()
///     .with_tile_size(512)
///     .with_anti_alias(false)
///     .with_timeout_secs(10);
/// assert_eq!(config.tile_size(), 512);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositorConfig {
    /// Edge length of a tile in pixels
    tile_size: u32,
    /// Whether clip edges are anti-aliased
    anti_alias: bool,
    /// HTTP request timeout in seconds
    timeout_secs: u64,
    /// Values substituted for `{s}` in source templates
    subdomains: Vec<String>,
}

impl CompositorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tile edge length. Default: 256.
    pub fn with_tile_size(mut self, tile_size: u32) -> Self {
        self.tile_size = tile_size;
        self
    }

    /// Enable or disable anti-aliased clip edges. Default: enabled.
    ///
    /// With anti-aliasing off, every pixel is either fully inside or fully
    /// outside the mask, decided at its center.
    pub fn with_anti_alias(mut self, anti_alias: bool) -> Self {
        self.anti_alias = anti_alias;
        self
    }

    /// Set the HTTP request timeout. Default: 30 seconds.
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Set the subdomains for `{s}`. Default: `a`, `b`, `c`.
    pub fn with_subdomains(mut self, subdomains: Vec<String>) -> Self {
        self.subdomains = subdomains;
        self
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn anti_alias(&self) -> bool {
        self.anti_alias
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    pub fn subdomains(&self) -> &[String] {
        &self.subdomains
    }
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self {
            tile_size: DEFAULT_TILE_SIZE,
            anti_alias: DEFAULT_ANTI_ALIAS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            subdomains: default_subdomains(),
        }
    }
}
