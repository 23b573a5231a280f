//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;
use maskedtile::compositor::CompositeError;
use maskedtile::config::ConfigFileError;
use maskedtile::mask::MaskError;
use maskedtile::source::SourceError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Invalid command-line argument
    InvalidArgument(String),
    /// Failed to start the async runtime
    Runtime(std::io::Error),
    /// Mask file could not be loaded
    Mask(MaskError),
    /// Source template or HTTP client could not be set up
    Source(SourceError),
    /// Tile could not be encoded
    Encode(CompositeError),
    /// Failed to write output file
    FileWrite { path: String, error: std::io::Error },
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Mask(MaskError::UnsupportedType(_)) => {
                eprintln!();
                eprintln!("Masks must be GeoJSON with Polygon or MultiPolygon geometries,");
                eprintln!("as a FeatureCollection, a single Feature, or a bare geometry.");
            }
            CliError::Config(_) => {
                eprintln!();
                eprintln!("Check {}", maskedtile::config::config_file_path().display());
                eprintln!("or pass the value on the command line.");
            }
            _ => {}
        }

        process::exit(match self {
            CliError::InvalidArgument(_) => 2,
            _ => 1,
        })
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            CliError::Runtime(e) => write!(f, "Failed to start async runtime: {}", e),
            CliError::Mask(e) => write!(f, "Failed to load mask: {}", e),
            CliError::Source(e) => write!(f, "Source error: {}", e),
            CliError::Encode(e) => write!(f, "{}", e),
            CliError::FileWrite { path, error } => {
                write!(f, "Failed to write file '{}': {}", path, error)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Runtime(e) => Some(e),
            CliError::Mask(e) => Some(e),
            CliError::Source(e) => Some(e),
            CliError::Encode(e) => Some(e),
            CliError::FileWrite { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<MaskError> for CliError {
    fn from(e: MaskError) -> Self {
        CliError::Mask(e)
    }
}

impl From<SourceError> for CliError {
    fn from(e: SourceError) -> Self {
        CliError::Source(e)
    }
}
