//! Circular regions and the catalog of candidate regions.
//!
//! A [`Region`] is a circular geofence identified by a unique string. The
//! [`RegionCatalog`] holds every candidate the engine may ever watch; its
//! insertion order is the tie-break order for all rankings.
//!
//! # Example
//!
//! ```
//! use geowatch::geo::Coordinate;
//! use geowatch::region::{Region, RegionCatalog};
//!
//! let catalog = RegionCatalog::new(vec![
//!     Region::new("office", Coordinate::new(50.4761, 30.4979), 120.0),
//!     Region::new("gym", Coordinate::new(50.4861, 30.4989), 80.0),
//! ])
//! .unwrap();
//!
//! assert_eq!(catalog.len(), 2);
//! assert_eq!(catalog.all()[0].identifier(), "office");
//! ```

mod catalog;
mod model;

pub use catalog::{CatalogError, RegionCatalog};
pub use model::{Region, EXPANSION_REGION_IDENTIFIER};
