//! Configuration file handling for ~/.geowatch/config.ini.
//!
//! The file holds one `[monitoring]` section and one `[region.<identifier>]`
//! section per catalog entry:
//!
//! ```ini
//! [monitoring]
//! capacity = 3
//! min_radius = 50
//! max_radius = 3000
//! default_min_dwell = 0
//!
//! [region.Location 0]
//! latitude = 50.476078
//! longitude = 30.497851
//! radius = 300
//! min_dwell = 10m
//! ```
//!
//! Region sections keep their file order, which becomes catalog order.

use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;

use super::engine::{ConfigError, EngineConfig};
use crate::region::{CatalogError, Region, RegionCatalog};

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read or parse the file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// A value could not be parsed
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    /// A required key is absent
    #[error("Missing configuration value: {section}.{key}")]
    MissingValue { section: String, key: String },

    /// Engine settings are inconsistent
    #[error(transparent)]
    Engine(#[from] ConfigError),

    /// Region definitions do not form a valid catalog
    #[error("Invalid region catalog: {0}")]
    Catalog(#[from] CatalogError),
}

/// Parsed configuration file.
#[derive(Debug, Clone, Default)]
pub struct ConfigFile {
    /// Engine settings from `[monitoring]`.
    pub engine: EngineConfig,
    /// Regions in file order.
    pub regions: Vec<Region>,
}

impl ConfigFile {
    /// Load configuration from the default path (~/.geowatch/config.ini).
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&config_file_path())
    }

    /// Load configuration from a specific path.
    ///
    /// A missing file yields defaults with an empty catalog.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        super::parser::parse_ini(&ini)
    }

    /// Parse configuration from INI text.
    pub fn from_ini_str(content: &str) -> Result<Self, ConfigFileError> {
        let ini = Ini::load_from_str(content).map_err(ini::Error::Parse)?;
        super::parser::parse_ini(&ini)
    }

    /// Build the validated region catalog.
    pub fn catalog(&self) -> Result<RegionCatalog, CatalogError> {
        RegionCatalog::new(self.regions.clone())
    }
}

/// Get the path to the config directory (~/.geowatch).
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".geowatch")
}

/// Get the path to the config file (~/.geowatch/config.ini).
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}
