//! maskedtile CLI - composite masked, color-filtered map tiles from the
//! command line.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::{clip, config, render};
use runner::GlobalOptions;

#[derive(Parser)]
#[command(name = "maskedtile")]
#[command(about = "Masked, color-filtered raster tile compositor", long_about = None)]
#[command(version = maskedtile::VERSION)]
struct Cli {
    /// Use this config file instead of ~/.maskedtile/config.ini
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug-level logging
    #[arg(long, global = true)]
    debug: bool,

    /// Mirror log output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Composite one tile and write it as PNG
    Render(render::RenderArgs),

    /// Inspect the clip path a mask produces for one tile
    Clip(clip::ClipArgs),

    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let options = GlobalOptions {
        config: cli.config,
        debug: cli.debug,
        verbose: cli.verbose,
    };

    let result = match cli.command {
        Commands::Render(args) => render::run(&options, args),
        Commands::Clip(args) => clip::run(&options, args),
        Commands::Config { action } => config::run(&options, action),
    };

    if let Err(e) = result {
        e.exit();
    }
}
