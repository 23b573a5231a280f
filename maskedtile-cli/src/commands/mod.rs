//! CLI command implementations.
//!
//! Each submodule exposes its clap arguments and a `run` entry point.

pub mod clip;
pub mod common;
pub mod config;
pub mod render;
