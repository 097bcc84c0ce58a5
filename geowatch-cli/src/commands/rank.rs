//! Show which regions would be selected for a location.

use std::path::PathBuf;

use clap::Args;
use geowatch::expansion::ExpansionRegionCalculator;
use geowatch::region::Region;
use geowatch::selection;

use super::common::{load_config, parse_location};
use crate::error::CliError;

#[derive(Debug, Args)]
pub struct RankArgs {
    /// Latitude in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    /// Longitude in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    pub lon: f64,

    /// Number of regions to select (defaults to the configured capacity)
    #[arg(long)]
    pub capacity: Option<usize>,

    /// Config file (defaults to ~/.geowatch/config.ini)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Print the nearest-N selection and the expansion region for a location.
pub fn run(args: RankArgs) -> Result<(), CliError> {
    let loaded = load_config(args.config.as_deref())?;
    let location = parse_location(args.lat, args.lon)?;

    let engine = match args.capacity {
        Some(capacity) => loaded.file.engine.clone().with_capacity(capacity),
        None => loaded.file.engine.clone(),
    };
    engine.validate()?;

    println!("Location: {}", location);
    println!("Catalog:  {} ({} regions)", loaded.path.display(), loaded.catalog.len());
    println!();

    let chosen = selection::select(&loaded.catalog, location, engine.capacity);
    println!("Selected (capacity {}):", engine.capacity);
    print_regions(&chosen.monitored, location);
    println!();
    println!("Not selected:");
    print_regions(&chosen.unmonitored, location);
    println!();

    let calculator = ExpansionRegionCalculator::new(engine.expansion);
    match selection::nearest(&loaded.catalog, location) {
        Some(nearest) => {
            let expansion = calculator.compute(nearest, location);
            println!(
                "Expansion region: {:.0} m around {} (nearest: {})",
                expansion.radius_m(),
                expansion.center(),
                nearest.identifier()
            );
        }
        None => println!("Expansion region: none (catalog is empty)"),
    }

    Ok(())
}

fn print_regions(regions: &[Region], location: geowatch::geo::Coordinate) {
    if regions.is_empty() {
        println!("  (none)");
        return;
    }
    for region in regions {
        let distance = region.boundary_distance(location);
        let position = if distance <= 0.0 { "inside" } else { "outside" };
        println!(
            "  {:<24} {:>9.1} m to boundary ({})",
            region.identifier(),
            distance.abs(),
            position
        );
    }
}
