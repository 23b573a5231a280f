//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! The single place where INI key names are mapped to struct fields.

use ini::Ini;
use std::path::PathBuf;
use std::str::FromStr;

use super::defaults::MAX_TILE_SIZE;
use super::file::ConfigFileError;
use super::settings::ConfigFile;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [source] section
    if let Some(section) = ini.section(Some("source")) {
        if let Some(v) = section.get("template") {
            let v = v.trim();
            if !v.is_empty() {
                config.source.template = Some(v.to_string());
            }
        }
        if let Some(v) = section.get("subdomains") {
            config.source.subdomains = parse_subdomains(v);
        }
    }

    // [filter] section
    if let Some(section) = ini.section(Some("filter")) {
        if let Some(v) = section.get("hue") {
            config.filter.hue = parse_number(v, "filter", "hue")?;
        }
        if let Some(v) = section.get("saturation") {
            config.filter.saturation = parse_number(v, "filter", "saturation")?;
        }
        if let Some(v) = section.get("brightness") {
            config.filter.brightness = parse_number(v, "filter", "brightness")?;
        }
    }

    // [layer] section
    if let Some(section) = ini.section(Some("layer")) {
        if let Some(v) = section.get("opacity") {
            config.layer.opacity = parse_number(v, "layer", "opacity")?;
        }
    }

    // [mask] section
    if let Some(section) = ini.section(Some("mask")) {
        if let Some(v) = section.get("path") {
            let v = v.trim();
            if !v.is_empty() {
                config.mask.path = Some(expand_tilde(v));
            }
        }
    }

    // [compositor] section
    if let Some(section) = ini.section(Some("compositor")) {
        if let Some(v) = section.get("tile_size") {
            let size: u32 = v.trim().parse().map_err(|_| invalid_tile_size(v))?;
            if size == 0 || size > MAX_TILE_SIZE {
                return Err(invalid_tile_size(v));
            }
            config.compositor.tile_size = size;
        }
        if let Some(v) = section.get("anti_alias") {
            config.compositor.anti_alias =
                parse_bool(v).ok_or_else(|| ConfigFileError::InvalidValue {
                    section: "compositor".to_string(),
                    key: "anti_alias".to_string(),
                    value: v.to_string(),
                    reason: "must be true or false".to_string(),
                })?;
        }
        if let Some(v) = section.get("timeout") {
            config.compositor.timeout = match v.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigFileError::InvalidValue {
                        section: "compositor".to_string(),
                        key: "timeout".to_string(),
                        value: v.to_string(),
                        reason: "must be a positive integer (seconds)".to_string(),
                    })
                }
            };
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = expand_tilde(v);
            }
        }
    }

    Ok(config)
}

fn parse_number<T: FromStr>(value: &str, section: &str, key: &str) -> Result<T, ConfigFileError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigFileError::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            reason: "must be a number".to_string(),
        })
}

fn invalid_tile_size(value: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: "compositor".to_string(),
        key: "tile_size".to_string(),
        value: value.to_string(),
        reason: format!("must be an integer between 1 and {}", MAX_TILE_SIZE),
    }
}

/// Subdomains are comma-separated; a value without commas is split into
/// single characters, so `abc` means `a`, `b`, `c`.
pub(super) fn parse_subdomains(value: &str) -> Vec<String> {
    let value = value.trim();
    if value.contains(',') {
        value
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    } else {
        value.chars().map(|c| c.to_string()).collect()
    }
}

/// Parse a boolean value from a config string.
/// Accepts: true/false, yes/no, 1/0, on/off (case-insensitive)
pub(super) fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Expand ~ to home directory in paths.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
