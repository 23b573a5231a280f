//! Default values for every configuration setting.

use std::path::PathBuf;

pub use crate::coord::DEFAULT_TILE_SIZE;

/// Default HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = crate::source::DEFAULT_TIMEOUT_SECS;

/// Clip edges are anti-aliased unless disabled.
pub const DEFAULT_ANTI_ALIAS: bool = true;

/// Subdomains substituted for `{s}` when none are configured.
pub const DEFAULT_SUBDOMAINS: [&str; 3] = ["a", "b", "c"];

/// Layer opacity when none is configured.
pub const DEFAULT_OPACITY: f64 = 1.0;

/// Largest accepted tile edge in pixels.
pub const MAX_TILE_SIZE: u32 = 4096;

pub fn default_subdomains() -> Vec<String> {
    DEFAULT_SUBDOMAINS.iter().map(|s| s.to_string()).collect()
}

/// Default log file: `~/.maskedtile/logs/maskedtile.log`.
pub fn default_log_file() -> PathBuf {
    crate::logging::default_log_dir().join(crate::logging::default_log_file())
}
