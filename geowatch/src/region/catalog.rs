//! The static catalog of candidate regions.

use std::collections::HashSet;

use thiserror::Error;

use super::model::{Region, EXPANSION_REGION_IDENTIFIER};
use crate::geo::Coordinate;

/// Reasons a catalog cannot be built.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    #[error("Duplicate region identifier: {0}")]
    DuplicateIdentifier(String),

    #[error("Region identifier '{0}' is reserved for the expansion region")]
    ReservedIdentifier(String),

    #[error("Region identifier cannot be empty")]
    EmptyIdentifier,

    #[error("Region '{identifier}' has invalid radius {radius} (must be positive)")]
    InvalidRadius { identifier: String, radius: f64 },

    #[error("Region '{identifier}' has invalid center: {reason}")]
    InvalidCenter { identifier: String, reason: String },
}

/// Ordered, read-only collection of candidate regions.
#[derive(Debug, Clone, Default)]
pub struct RegionCatalog {
    regions: Vec<Region>,
}

impl RegionCatalog {
    /// Build a catalog, validating every region.
    ///
    /// Order is preserved and becomes the tie-break order for rankings.
    pub fn new(regions: Vec<Region>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(regions.len());

        for region in &regions {
            let identifier = region.identifier();
            if identifier.trim().is_empty() {
                return Err(CatalogError::EmptyIdentifier);
            }
            if identifier == EXPANSION_REGION_IDENTIFIER {
                return Err(CatalogError::ReservedIdentifier(identifier.to_string()));
            }
            let radius = region.radius_m();
            if !radius.is_finite() || radius <= 0.0 {
                return Err(CatalogError::InvalidRadius {
                    identifier: identifier.to_string(),
                    radius,
                });
            }
            let center = region.center();
            if let Err(e) = Coordinate::try_new(center.latitude, center.longitude) {
                return Err(CatalogError::InvalidCenter {
                    identifier: identifier.to_string(),
                    reason: e.to_string(),
                });
            }
            if !seen.insert(identifier) {
                return Err(CatalogError::DuplicateIdentifier(identifier.to_string()));
            }
        }

        Ok(Self { regions })
    }

    /// Create an empty catalog.
    pub fn empty() -> Self {
        Self::default()
    }

    /// All regions in insertion order.
    pub fn all(&self) -> &[Region] {
        &self.regions
    }

    pub fn iter(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter()
    }

    /// Look up a region by identifier.
    pub fn get(&self, identifier: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.identifier() == identifier)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(id: &str, radius: f64) -> Region {
        Region::new(id, Coordinate::new(50.48, 30.49), radius)
    }

    #[test]
    fn test_preserves_insertion_order() {
        let catalog =
            RegionCatalog::new(vec![region("c", 10.0), region("a", 10.0), region("b", 10.0)])
                .unwrap();
        let ids: Vec<_> = catalog.iter().map(|r| r.identifier()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_get_by_identifier() {
        let catalog = RegionCatalog::new(vec![region("a", 10.0), region("b", 20.0)]).unwrap();
        assert_eq!(catalog.get("b").map(|r| r.radius_m()), Some(20.0));
        assert!(catalog.get("missing").is_none());
    }

    #[test]
    fn test_rejects_duplicates() {
        let err = RegionCatalog::new(vec![region("a", 10.0), region("a", 20.0)]).unwrap_err();
        assert_eq!(err, CatalogError::DuplicateIdentifier("a".to_string()));
    }

    #[test]
    fn test_rejects_reserved_identifier() {
        let err = RegionCatalog::new(vec![region(EXPANSION_REGION_IDENTIFIER, 10.0)]).unwrap_err();
        assert!(matches!(err, CatalogError::ReservedIdentifier(_)));
    }

    #[test]
    fn test_rejects_non_positive_radius() {
        let err = RegionCatalog::new(vec![region("a", 0.0)]).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidRadius { .. }));
        assert!(RegionCatalog::new(vec![region("a", f64::NAN)]).is_err());
    }

    #[test]
    fn test_rejects_invalid_center() {
        let bad = Region::new("a", Coordinate::new(120.0, 0.0), 10.0);
        let err = RegionCatalog::new(vec![bad]).unwrap_err();
        assert!(err.to_string().contains("Invalid latitude"));
    }

    #[test]
    fn test_rejects_blank_identifier() {
        let err = RegionCatalog::new(vec![region("  ", 10.0)]).unwrap_err();
        assert_eq!(err, CatalogError::EmptyIdentifier);
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = RegionCatalog::empty();
        assert!(catalog.is_empty());
        assert_eq!(catalog.len(), 0);
        assert!(catalog.all().is_empty());
    }
}
