//! Diagnostics logging abstraction.
//!
//! Compositor code logs through the [`Logger`] trait instead of calling
//! `tracing` directly, so hosts can route tile diagnostics wherever they like
//! and tests can inspect them.
//!
//! - [`TracingLogger`]: forwards to the `tracing` crate
//! - [`NoOpLogger`]: discards everything
//! - [`MemoryLogger`]: keeps entries in memory for inspection
//!
//! ```
//! use maskedtile::log::{Logger, MemoryLogger, LogLevel};
//! use maskedtile::log_warn;
//!
//! let logger = MemoryLogger::new();
//! log_warn!(logger, "tile {} failed", "3/1/2");
//! assert!(logger.contains(LogLevel::Warn, "3/1/2"));
//! ```

mod memory;
mod noop;
mod tracing_adapter;
mod r#trait;

pub use memory::{LogEntry, MemoryLogger};
pub use noop::NoOpLogger;
pub use r#trait::{LogLevel, Logger};
pub use tracing_adapter::TracingLogger;
