//! Proximity ranking and capacity-limited selection.
//!
//! Two rankings are used by the engine:
//!
//! - **Absolute boundary distance** `|distance(location, center) - radius|`.
//!   Drives the monitored/unmonitored partition and the choice of the region
//!   the expansion region is sized against. A region the user is inside ranks
//!   by how close its edge is, not by how close its center is.
//! - **Signed boundary distance** `distance(location, center) - radius`.
//!   Drives the containment sweep: regions the user is deepest inside come
//!   first, so the sweep can stop at the first region not containing them.
//!
//! Both sorts are stable, so ties keep catalog order and repeated calls with
//! the same inputs produce the same result.

use crate::geo::Coordinate;
use crate::region::{Region, RegionCatalog};

/// Partition of the catalog into regions to watch and the remainder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    /// Nearest regions, at most `capacity` of them, nearest first.
    pub monitored: Vec<Region>,
    /// Every other catalog region, continuing the same ranking.
    pub unmonitored: Vec<Region>,
}

impl Selection {
    pub fn len(&self) -> usize {
        self.monitored.len() + self.unmonitored.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monitored.is_empty() && self.unmonitored.is_empty()
    }
}

/// Partition `catalog` by absolute boundary distance from `location`.
///
/// `monitored` holds the first `min(capacity, catalog.len())` regions.
pub fn select(catalog: &RegionCatalog, location: Coordinate, capacity: usize) -> Selection {
    let mut ranked = rank_by_boundary_distance(catalog.all(), location);
    let split = capacity.min(ranked.len());
    let unmonitored = ranked.split_off(split);

    Selection {
        monitored: ranked,
        unmonitored,
    }
}

/// The region whose boundary is closest to `location`, if any.
pub fn nearest(catalog: &RegionCatalog, location: Coordinate) -> Option<&Region> {
    catalog.iter().reduce(|best, candidate| {
        let best_key = best.boundary_distance(location).abs();
        let candidate_key = candidate.boundary_distance(location).abs();
        // Strict comparison keeps the earlier region on ties
        if candidate_key.total_cmp(&best_key).is_lt() {
            candidate
        } else {
            best
        }
    })
}

/// Clone and sort regions by ascending absolute boundary distance.
pub fn rank_by_boundary_distance(regions: &[Region], location: Coordinate) -> Vec<Region> {
    rank_by(regions, |region| region.boundary_distance(location).abs())
}

/// Clone and sort regions by ascending signed boundary distance.
pub fn rank_by_signed_boundary_distance(regions: &[Region], location: Coordinate) -> Vec<Region> {
    rank_by(regions, |region| region.boundary_distance(location))
}

fn rank_by(regions: &[Region], key: impl Fn(&Region) -> f64) -> Vec<Region> {
    let mut keyed: Vec<(f64, &Region)> = regions.iter().map(|r| (key(r), r)).collect();
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
    keyed.into_iter().map(|(_, region)| region.clone()).collect()
}
