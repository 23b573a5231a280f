//! Clip command - show the clip path a mask produces for one tile.
//!
//! Useful for checking a GeoJSON mask against a tile before rendering:
//! prints the projected subpaths, the share of the tile the mask keeps,
//! and optionally whether given pixel positions fall inside.

use std::path::PathBuf;

use clap::Args;
use maskedtile::mask::{ClipPathBuilder, FillRule};
use maskedtile::projection::WebMercator;
use tracing::info;

use super::common::{parse_point, TileArgs};
use crate::error::CliError;
use crate::runner::{CliRunner, GlobalOptions};

/// Arguments for the clip command.
#[derive(Debug, Args)]
pub struct ClipArgs {
    #[command(flatten)]
    pub tile: TileArgs,

    /// GeoJSON mask; defaults to [mask] path
    #[arg(long)]
    pub mask: Option<PathBuf>,

    /// Tile edge length in pixels
    #[arg(long)]
    pub tile_size: Option<u32>,

    /// Use the non-zero winding rule instead of even-odd
    #[arg(long)]
    pub nonzero: bool,

    /// Tile-local pixel position to test, as x,y (repeatable)
    #[arg(long, value_parser = parse_point, allow_negative_numbers = true)]
    pub probe: Vec<(f64, f64)>,
}

/// Run the clip command.
pub fn run(options: &GlobalOptions, args: ClipArgs) -> Result<(), CliError> {
    let runner = CliRunner::new(options)?;
    runner.log_startup("clip");

    let coord = args.tile.resolve()?;
    let tile_size = args
        .tile_size
        .unwrap_or(runner.config().compositor.tile_size);
    if tile_size == 0 || tile_size > maskedtile::config::defaults::MAX_TILE_SIZE {
        return Err(CliError::InvalidArgument(format!(
            "tile size must be between 1 and {}",
            maskedtile::config::defaults::MAX_TILE_SIZE
        )));
    }

    let mask = runner.load_mask(args.mask.as_deref())?.ok_or_else(|| {
        CliError::Config("no mask; pass --mask or set [mask] path".to_string())
    })?;

    let projector = WebMercator::new(tile_size);
    let fill_rule = if args.nonzero {
        FillRule::NonZero
    } else {
        FillRule::EvenOdd
    };
    let clip = ClipPathBuilder::new(&projector, tile_size)
        .build(&mask, coord)
        .with_fill_rule(fill_rule);

    let points: usize = clip.subpaths().iter().map(Vec::len).sum();
    let coverage = clip
        .rasterize(tile_size, runner.config().compositor.anti_alias)
        .map(|m| {
            let total: u64 = m.data().iter().map(|&c| u64::from(c)).sum();
            total as f64 / (255.0 * f64::from(tile_size) * f64::from(tile_size)) * 100.0
        });

    info!(
        tile = %coord,
        subpaths = clip.subpaths().len(),
        skipped = clip.skipped_rings(),
        "Clip path built"
    );

    println!("Tile:          {}", coord);
    println!("Tile size:     {}px", tile_size);
    println!("Polygons:      {}", mask.polygons().len());
    println!("Subpaths:      {}", clip.subpaths().len());
    println!("Points:        {}", points);
    println!("Skipped rings: {}", clip.skipped_rings());
    println!("Fill rule:     {:?}", clip.fill_rule());
    match coverage {
        Some(pct) => println!("Coverage:      {:.1}%", pct),
        None => println!("Coverage:      unavailable"),
    }
    if clip.excludes_everything() {
        println!("The mask excludes this entire tile.");
    }

    for (x, y) in args.probe {
        let verdict = if clip.contains(x, y) { "inside" } else { "outside" };
        println!("probe ({}, {}): {}", x, y, verdict);
    }

    Ok(())
}
