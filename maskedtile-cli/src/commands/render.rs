//! Render command - composite one tile and save it as PNG.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use maskedtile::compositor::TileCompositor;
use maskedtile::projection::{GeoProjector, WebMercator};
use maskedtile::source::SourceTemplate;
use tracing::{info, warn};

use super::common::{FilterArgs, TileArgs};
use crate::error::CliError;
use crate::runner::{CliRunner, GlobalOptions};

/// Arguments for the render command.
#[derive(Debug, Args)]
pub struct RenderArgs {
    #[command(flatten)]
    pub tile: TileArgs,

    /// Source URL or path template ({z}, {x}, {y}, {-y}, {s}, {r})
    #[arg(long)]
    pub source: Option<String>,

    /// Comma-separated subdomains for {s}
    #[arg(long, value_delimiter = ',')]
    pub subdomains: Option<Vec<String>>,

    /// GeoJSON mask; defaults to [mask] path
    #[arg(long)]
    pub mask: Option<PathBuf>,

    /// Ignore any configured mask
    #[arg(long, conflicts_with = "mask")]
    pub no_mask: bool,

    #[command(flatten)]
    pub filter: FilterArgs,

    /// Layer opacity; defaults to [layer] opacity
    #[arg(long)]
    pub opacity: Option<f64>,

    /// Multiply the layer opacity into the output alpha channel
    #[arg(long)]
    pub bake_opacity: bool,

    /// Tile edge length in pixels
    #[arg(long)]
    pub tile_size: Option<u32>,

    /// Disable anti-aliased mask edges
    #[arg(long)]
    pub no_anti_alias: bool,

    /// Output PNG file
    #[arg(short, long)]
    pub output: PathBuf,
}

/// Run the render command.
pub fn run(options: &GlobalOptions, args: RenderArgs) -> Result<(), CliError> {
    let runner = CliRunner::new(options)?;
    runner.log_startup("render");
    let config = runner.config();

    let coord = args.tile.resolve()?;

    let mut compositor_config = config.compositor_config();
    if let Some(size) = args.tile_size {
        if size == 0 || size > maskedtile::config::defaults::MAX_TILE_SIZE {
            return Err(CliError::InvalidArgument(format!(
                "tile size must be between 1 and {}",
                maskedtile::config::defaults::MAX_TILE_SIZE
            )));
        }
        compositor_config = compositor_config.with_tile_size(size);
    }
    if args.no_anti_alias {
        compositor_config = compositor_config.with_anti_alias(false);
    }
    if let Some(subdomains) = args.subdomains.clone() {
        compositor_config = compositor_config.with_subdomains(subdomains);
    }

    let template = match args.source.as_deref().or(config.source.template.as_deref()) {
        Some(t) => SourceTemplate::with_subdomains(t, compositor_config.subdomains().to_vec())?,
        None => {
            return Err(CliError::Config(
                "no tile source; pass --source or set [source] template".to_string(),
            ))
        }
    };

    let mask = if args.no_mask {
        None
    } else {
        runner.load_mask(args.mask.as_deref())?
    };
    let filter = args.filter.resolve(config);
    let opacity = args.opacity.unwrap_or(config.layer.opacity);
    let tile_size = compositor_config.tile_size();

    println!("Rendering tile {} from {}", coord, template);
    info!(
        tile = %coord,
        source = %template,
        filter = %filter,
        masked = mask.is_some(),
        "Rendering tile"
    );

    let compositor = TileCompositor::with_http(compositor_config)?;
    compositor.set_opacity(opacity);

    let tile = runner.block_on(async {
        compositor.configure(template).await;
        compositor.set_filter(filter).await;
        if let Some(mask) = mask {
            let projector: Arc<dyn GeoProjector> = Arc::new(WebMercator::new(tile_size));
            compositor.set_mask(Some(mask), Some(projector)).await;
        }
        compositor.request_tile(coord).await
    });

    if tile.is_blank() {
        warn!(tile = %coord, "Tile rendered blank");
        println!("Warning: tile {} is blank (source unavailable or undecodable)", coord);
    }

    let tile = if args.bake_opacity {
        tile.with_opacity(compositor.opacity())
    } else {
        tile
    };

    let png = tile.encode_png().map_err(CliError::Encode)?;
    runner.save(&args.output, &png)?;

    let stats = compositor.stats();
    info!(
        fetches = stats.fetches,
        ready = stats.ready,
        blank = stats.blank,
        "Render finished"
    );
    println!(
        "Wrote {} ({}x{}, {})",
        args.output.display(),
        tile.size(),
        tile.size(),
        tile.state()
    );

    Ok(())
}
