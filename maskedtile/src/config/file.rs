//! Configuration file handling for ~/.maskedtile/config.ini.
//!
//! The file holds defaults for the CLI and for hosts that want a starting
//! configuration. Saving it persists those defaults only; the live state
//! of a layer (source, filter, mask, opacity set at runtime) is never
//! written back.
//!
//! Settings structs live in [`super::settings`], constants in
//! [`super::defaults`], parsing in [`super::parser`], and serialization in
//! [`super::writer`].

use ini::Ini;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::compositor::CompositorConfig;
use super::settings::ConfigFile;
use crate::filter::FilterState;
use crate::source::{SourceError, SourceTemplate};

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Failed to write config file
    #[error("Failed to write config file: {0}")]
    WriteError(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    /// Failed to create config directory
    #[error("Failed to create config directory: {0}")]
    DirectoryError(std::io::Error),
}

impl ConfigFile {
    /// Load configuration from the default path (~/.maskedtile/config.ini).
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&config_file_path())
    }

    /// Load configuration from a specific path.
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        super::parser::parse_ini(&ini)
    }

    /// Save configuration to the default path (~/.maskedtile/config.ini).
    pub fn save(&self) -> Result<(), ConfigFileError> {
        self.save_to(&config_file_path())
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigFileError::DirectoryError)?;
        }

        let content = super::writer::to_config_string(self);
        std::fs::write(path, content).map_err(|e| ConfigFileError::WriteError(e.to_string()))
    }

    /// The `[filter]` section as a filter state.
    pub fn filter_state(&self) -> FilterState {
        FilterState::new(
            self.filter.hue,
            self.filter.saturation,
            self.filter.brightness,
        )
    }

    /// The `[compositor]` and `[source]` sections as a compositor config.
    pub fn compositor_config(&self) -> CompositorConfig {
        CompositorConfig::new()
            .with_tile_size(self.compositor.tile_size)
            .with_anti_alias(self.compositor.anti_alias)
            .with_timeout_secs(self.compositor.timeout)
            .with_subdomains(self.source.subdomains.clone())
    }

    /// The configured source template, if any.
    pub fn source_template(&self) -> Result<Option<SourceTemplate>, SourceError> {
        self.source
            .template
            .as_ref()
            .map(|t| SourceTemplate::with_subdomains(t.clone(), self.source.subdomains.clone()))
            .transpose()
    }
}

/// Get the path to the config directory (~/.maskedtile).
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".maskedtile")
}

/// Get the path to the config file (~/.maskedtile/config.ini).
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults::DEFAULT_TIMEOUT_SECS;

    #[test]
    fn test_default_config() {
        let config = ConfigFile::default();

        assert!(config.source.template.is_none());
        assert_eq!(config.source.subdomains, ["a", "b", "c"]);
        assert!(config.filter_state().is_identity());
        assert_eq!(config.layer.opacity, 1.0);
        assert!(config.mask.path.is_none());
        assert_eq!(config.compositor.timeout, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_load_nonexistent_returns_defaults() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.ini");

        let config = ConfigFile::load_from(&config_path).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.ini");

        let mut config = ConfigFile::default();
        config.source.template = Some("https://{s}.tile.example.org/{z}/{x}/{y}.png".to_string());
        config.filter.hue = 200.0;
        config.filter.saturation = 0.4;
        config.layer.opacity = 0.65;
        config.mask.path = Some(PathBuf::from("/srv/masks/city.geojson"));
        config.compositor.anti_alias = false;
        config.save_to(&config_path).unwrap();

        let loaded = ConfigFile::load_from(&config_path).unwrap();
        assert_eq!(loaded.source, config.source);
        assert_eq!(loaded.filter, config.filter);
        assert_eq!(loaded.layer, config.layer);
        assert_eq!(loaded.mask, config.mask);
        assert_eq!(loaded.compositor, config.compositor);
    }

    #[test]
    fn test_conversions() {
        let mut config = ConfigFile::default();
        config.filter.hue = 90.0;
        config.compositor.tile_size = 512;
        config.source.subdomains = vec!["x".to_string()];
        config.source.template = Some("https://{s}.example.org/{z}/{x}/{y}.png".to_string());

        assert_eq!(config.filter_state(), FilterState::new(90.0, 1.0, 1.0));
        assert_eq!(config.compositor_config().tile_size(), 512);
        assert_eq!(config.compositor_config().subdomains(), ["x"]);

        let template = config.source_template().unwrap().unwrap();
        assert_eq!(template.subdomains(), ["x"]);
    }

    #[test]
    fn test_source_template_absent() {
        assert!(ConfigFile::default().source_template().unwrap().is_none());
    }
}
