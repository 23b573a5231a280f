//! INI serialization logic for converting `ConfigFile` → INI string.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let template = config.source.template.as_deref().unwrap_or("");
    let mask_path = config
        .mask
        .path
        .as_ref()
        .map(|p| path_to_string(p))
        .unwrap_or_default();

    format!(
        r#"[source]
; Raster tile template. Placeholders: {{z}} {{x}} {{y}} {{-y}} (TMS row) {{s}} {{r}}
; http:// and https:// templates are downloaded, anything else is read from disk
; Example: template = https://{{s}}.tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png
template = {}
; Subdomains for {{s}}, comma-separated (a value without commas is split per character)
subdomains = {}

[filter]
; Hue rotation in degrees (default: 0)
hue = {}
; Saturation multiplier, 1 = unchanged (default: 1)
saturation = {}
; Lightness multiplier, 1 = unchanged (default: 1)
brightness = {}

[layer]
; Layer opacity from 0 to 1, applied by the host at display time (default: 1)
opacity = {}

[mask]
; GeoJSON file with Polygon/MultiPolygon features. Empty = no mask
path = {}

[compositor]
; Tile edge length in pixels (default: 256)
tile_size = {}
; Anti-alias clip edges (default: true)
anti_alias = {}
; Timeout in seconds for HTTP requests (default: 30)
timeout = {}

[logging]
; Log file location
file = {}
"#,
        template,
        format_subdomains(&config.source.subdomains),
        config.filter.hue,
        config.filter.saturation,
        config.filter.brightness,
        config.layer.opacity,
        mask_path,
        config.compositor.tile_size,
        config.compositor.anti_alias,
        config.compositor.timeout,
        path_to_string(&config.logging.file),
    )
}

/// A lone multi-character subdomain gets a trailing comma so it is not
/// split into characters when read back.
fn format_subdomains(subdomains: &[String]) -> String {
    match subdomains {
        [single] if single.chars().count() > 1 => format!("{},", single),
        _ => subdomains.join(","),
    }
}

/// Contract the home directory back to `~` for readability.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}
