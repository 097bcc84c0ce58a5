//! Validate a config file.

use std::path::PathBuf;

use clap::Args;

use super::common::load_config;
use crate::error::CliError;

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Config file (defaults to ~/.geowatch/config.ini)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Load the config, validate it, and list what it defines.
pub fn run(args: CheckArgs) -> Result<(), CliError> {
    let loaded = load_config(args.config.as_deref())?;
    let engine = &loaded.file.engine;

    println!("Config: {}", loaded.path.display());
    if !loaded.path.exists() {
        println!("  (file not found, using defaults)");
    }
    println!();
    println!("[monitoring]");
    println!("  capacity          = {}", engine.capacity);
    println!("  min_radius        = {} m", engine.expansion.min_radius_m);
    println!("  max_radius        = {} m", engine.expansion.max_radius_m);
    println!("  default_min_dwell = {}s", engine.default_min_dwell.as_secs());
    println!();

    println!("Regions ({}):", loaded.catalog.len());
    for region in loaded.catalog.iter() {
        let dwell = region
            .min_dwell()
            .map(|d| format!("{}s", d.as_secs()))
            .unwrap_or_else(|| "default".to_string());
        println!(
            "  {:<24} {}  r={} m  dwell={}",
            region.identifier(),
            region.center(),
            region.radius_m(),
            dwell
        );
    }
    println!();
    println!("OK");

    Ok(())
}
