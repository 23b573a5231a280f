//! Config command - inspect or create the configuration file.

use clap::Subcommand;
use maskedtile::config::{config_file_path, ConfigFile};

use crate::error::CliError;
use crate::runner::GlobalOptions;

/// Config subcommands.
#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum ConfigAction {
    /// Print the config file location
    Path,

    /// Print the effective configuration
    Show,

    /// Write a config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Run a config subcommand.
pub fn run(options: &GlobalOptions, action: ConfigAction) -> Result<(), CliError> {
    let path = options.config.clone().unwrap_or_else(config_file_path);

    match action {
        ConfigAction::Path => {
            println!("{}", path.display());
        }
        ConfigAction::Show => {
            let config = ConfigFile::load_from(&path)?;
            let exists = if path.exists() { "" } else { " (not found, defaults)" };
            println!("# {}{}", path.display(), exists);
            println!();
            print_config(&config);
        }
        ConfigAction::Init { force } => {
            if path.exists() && !force {
                return Err(CliError::InvalidArgument(format!(
                    "{} already exists; use --force to overwrite",
                    path.display()
                )));
            }
            ConfigFile::default().save_to(&path)?;
            println!("Wrote default configuration to {}", path.display());
        }
    }

    Ok(())
}

fn print_config(config: &ConfigFile) {
    println!("[source]");
    println!(
        "template   = {}",
        config.source.template.as_deref().unwrap_or("(none)")
    );
    println!("subdomains = {}", config.source.subdomains.join(","));
    println!();
    println!("[filter]");
    println!("{}", config.filter_state());
    println!();
    println!("[layer]");
    println!("opacity    = {}", config.layer.opacity);
    println!();
    println!("[mask]");
    println!(
        "path       = {}",
        config
            .mask
            .path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none)".to_string())
    );
    println!();
    println!("[compositor]");
    println!("tile_size  = {}", config.compositor.tile_size);
    println!("anti_alias = {}", config.compositor.anti_alias);
    println!("timeout    = {}s", config.compositor.timeout);
    println!();
    println!("[logging]");
    println!("file       = {}", config.logging.file.display());
}
