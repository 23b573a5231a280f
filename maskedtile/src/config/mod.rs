//! Configuration for maskedtile components.
//!
//! - [`CompositorConfig`]: builder-style settings for a compositor
//! - [`ConfigFile`]: the user's `~/.maskedtile/config.ini`
//!
//! ```
//! use maskedtile::config::{CompositorConfig, ConfigFile};
//!
//! let file = ConfigFile::default();
//! let config: CompositorConfig = file.compositor_config();
//! assert_eq!(config.tile_size(), 256);
//! ```

mod compositor;
pub mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use compositor::CompositorConfig;
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{
    CompositorSettings, ConfigFile, FilterSettings, LayerSettings, LoggingSettings, MaskSettings,
    SourceSettings,
};
