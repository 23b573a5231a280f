//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.

use std::path::PathBuf;

use super::defaults::{
    default_log_file, default_subdomains, DEFAULT_ANTI_ALIAS, DEFAULT_OPACITY, DEFAULT_TILE_SIZE,
    DEFAULT_TIMEOUT_SECS,
};

/// Complete configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigFile {
    pub source: SourceSettings,
    pub filter: FilterSettings,
    pub layer: LayerSettings,
    pub mask: MaskSettings,
    pub compositor: CompositorSettings,
    pub logging: LoggingSettings,
}

/// `[source]`
#[derive(Debug, Clone, PartialEq)]
pub struct SourceSettings {
    /// Tile URL or path template; unset means no source
    pub template: Option<String>,
    /// Values substituted for `{s}`
    pub subdomains: Vec<String>,
}

/// `[filter]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterSettings {
    pub hue: f64,
    pub saturation: f64,
    pub brightness: f64,
}

/// `[layer]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerSettings {
    pub opacity: f64,
}

/// `[mask]`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MaskSettings {
    /// GeoJSON file with the mask polygons
    pub path: Option<PathBuf>,
}

/// `[compositor]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompositorSettings {
    pub tile_size: u32,
    pub anti_alias: bool,
    /// HTTP timeout in seconds
    pub timeout: u64,
}

/// `[logging]`
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    pub file: PathBuf,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            template: None,
            subdomains: default_subdomains(),
        }
    }
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            hue: 0.0,
            saturation: 1.0,
            brightness: 1.0,
        }
    }
}

impl Default for LayerSettings {
    fn default() -> Self {
        Self {
            opacity: DEFAULT_OPACITY,
        }
    }
}

impl Default for CompositorSettings {
    fn default() -> Self {
        Self {
            tile_size: DEFAULT_TILE_SIZE,
            anti_alias: DEFAULT_ANTI_ALIAS,
            timeout: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file: default_log_file(),
        }
    }
}
