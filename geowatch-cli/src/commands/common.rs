//! Common types and utilities shared across CLI commands.

use std::path::{Path, PathBuf};

use geowatch::config::{config_file_path, ConfigFile};
use geowatch::geo::Coordinate;
use geowatch::region::RegionCatalog;

use crate::error::CliError;

/// A loaded config file and the catalog built from it.
pub struct LoadedConfig {
    pub path: PathBuf,
    pub file: ConfigFile,
    pub catalog: RegionCatalog,
}

/// Load the config from `path`, or from the default location.
///
/// An explicit path must exist; the default path falls back to defaults.
pub fn load_config(path: Option<&Path>) -> Result<LoadedConfig, CliError> {
    let (path, explicit) = match path {
        Some(p) => (p.to_path_buf(), true),
        None => (config_file_path(), false),
    };
    if explicit && !path.exists() {
        return Err(CliError::ConfigNotFound(path));
    }

    let file = ConfigFile::load_from(&path)?;
    let catalog = file.catalog()?;
    tracing::debug!(path = %path.display(), regions = catalog.len(), "Loaded config");

    Ok(LoadedConfig {
        path,
        file,
        catalog,
    })
}

/// Validate a latitude/longitude pair given on the command line.
pub fn parse_location(latitude: f64, longitude: f64) -> Result<Coordinate, CliError> {
    Coordinate::try_new(latitude, longitude).map_err(|e| CliError::InvalidArgument(e.to_string()))
}
