//! Tracing library adapter implementation.

use crate::log::{LogLevel, Logger};
use std::fmt::Arguments;

/// Logger implementation that delegates to the `tracing` crate.
///
/// Messages go out under the `maskedtile` target so they can be filtered
/// with `RUST_LOG=maskedtile=debug`.
///
/// ```ignore
/// use maskedtile::log::{Logger, TracingLogger};
/// use std::sync::Arc;
///
/// // Assumes a subscriber is installed, e.g. via maskedtile::logging::init_logging
/// let logger: Arc<dyn Logger> = Arc::new(TracingLogger);
/// logger.info(format_args!("compositor ready"));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl TracingLogger {
    pub fn new() -> Self {
        Self
    }
}

impl Logger for TracingLogger {
    fn log(&self, level: LogLevel, args: Arguments<'_>) {
        match level {
            LogLevel::Trace => tracing::trace!(target: "maskedtile", "{}", args),
            LogLevel::Debug => tracing::debug!(target: "maskedtile", "{}", args),
            LogLevel::Info => tracing::info!(target: "maskedtile", "{}", args),
            LogLevel::Warn => tracing::warn!(target: "maskedtile", "{}", args),
            LogLevel::Error => tracing::error!(target: "maskedtile", "{}", args),
        }
    }
}
