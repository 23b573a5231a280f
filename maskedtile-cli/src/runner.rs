//! CLI runner for common setup and operations.
//!
//! Encapsulates config loading, logging initialization, the async runtime,
//! and file output so command handlers stay small.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use maskedtile::config::{config_file_path, ConfigFile};
use maskedtile::logging::{init_logging, LoggingGuard};
use maskedtile::mask::MaskGeometry;
use tokio::runtime::Runtime;
use tracing::info;

use crate::error::CliError;

/// Options shared by every command.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Config file to use instead of ~/.maskedtile/config.ini
    pub config: Option<PathBuf>,
    /// Debug-level logging
    pub debug: bool,
    /// Mirror log output to stderr
    pub verbose: bool,
}

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Keeps the log writer alive while the runner exists
    _logging_guard: LoggingGuard,
    config: ConfigFile,
    runtime: Runtime,
}

impl CliRunner {
    /// Load config, initialize logging and start the async runtime.
    pub fn new(options: &GlobalOptions) -> Result<Self, CliError> {
        let config_path = options.config.clone().unwrap_or_else(config_file_path);
        let config = ConfigFile::load_from(&config_path)?;

        let log_path = &config.logging.file;
        let log_dir = log_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let log_file = log_path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| maskedtile::logging::default_log_file().to_string());

        let logging_guard = init_logging(&log_dir, &log_file, options.verbose, options.debug)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        let runtime = Runtime::new().map_err(CliError::Runtime)?;

        Ok(Self {
            _logging_guard: logging_guard,
            config,
            runtime,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("maskedtile v{}", maskedtile::VERSION);
        info!("maskedtile CLI: {} command", command);
    }

    /// Run a future to completion on the runner's runtime.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// Load a mask from the given path, falling back to `[mask] path`.
    pub fn load_mask(&self, path: Option<&Path>) -> Result<Option<Arc<MaskGeometry>>, CliError> {
        let Some(path) = path.or(self.config.mask.path.as_deref()) else {
            return Ok(None);
        };

        let mask = MaskGeometry::load_geojson(path)?;
        info!(
            path = %path.display(),
            polygons = mask.polygons().len(),
            skipped = mask.skipped_features(),
            "Mask loaded"
        );
        if mask.skipped_features() > 0 {
            println!(
                "Mask: skipped {} unusable feature(s) in {}",
                mask.skipped_features(),
                path.display()
            );
        }
        Ok(Some(Arc::new(mask)))
    }

    /// Write bytes to a file.
    pub fn save(&self, path: &Path, data: &[u8]) -> Result<(), CliError> {
        std::fs::write(path, data).map_err(|e| CliError::FileWrite {
            path: path.display().to_string(),
            error: e,
        })?;
        info!("Saved {} ({} bytes)", path.display(), data.len());
        Ok(())
    }
}
