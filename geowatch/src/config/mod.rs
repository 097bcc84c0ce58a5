//! Configuration for the monitoring engine.
//!
//! - [`EngineConfig`]: the fixed constants the engine runs with (capacity,
//!   expansion radius bounds, default dwell)
//! - [`ConfigFile`]: INI file holding an engine configuration plus the
//!   region catalog
//!
//! # Example
//!
//! ```
//! use geowatch::config::ConfigFile;
//!
//! let config = ConfigFile::from_ini_str(
//!     "[monitoring]\n\
//!      capacity = 3\n\
//!      \n\
//!      [region.office]\n\
//!      latitude = 50.4761\n\
//!      longitude = 30.4979\n\
//!      radius = 120\n",
//! )
//! .unwrap();
//!
//! assert_eq!(config.engine.capacity, 3);
//! assert_eq!(config.catalog().unwrap().len(), 1);
//! ```

mod engine;
mod file;
mod parser;

pub use engine::{
    ConfigError, EngineConfig, DEFAULT_CAPACITY, MAX_MONITORED_REGIONS,
};
pub use file::{config_directory, config_file_path, ConfigFile, ConfigFileError};
