use std::cmp::Ordering;

use geo::{Coord, Euclidean, Length};
use maptopo::ring::signed_area;
use maptopo::{MapError, Result};
use serde::{Deserialize, Serialize};

use crate::id::RegionId;
use crate::polygon_map::PolygonMap;
use crate::region::Region;

/// How regions with equal shell perimeters are ordered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalOrder {
    /// Equal perimeters are an error.
    #[default]
    Strict,
    /// Equal perimeters are ordered by shell vertices, then holes, then id.
    TieBreak,
}

/// A region in canonical form: open rings, all counter-clockwise, each
/// starting at its lowest vertex.
#[derive(Clone, Debug, PartialEq)]
pub struct CanonicalRegion {
    pub id:    RegionId,
    pub shell: Vec<Coord<f64>>,
    pub holes: Vec<Vec<Coord<f64>>>,
}

/// A polygon map in canonical form. Two maps describing the same regions
/// canonicalize to equal values.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CanonicalMap {
    pub regions: Vec<CanonicalRegion>,
}

/// Canonical form of a ring: drop the closing point, orient it
/// counter-clockwise, and rotate it to start at the vertex with the smallest
/// `(y, x)`.
pub fn canonical_ring(coords: &[Coord<f64>]) -> Vec<Coord<f64>> {
    let mut ring = coords.to_vec();
    if ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }
    if signed_area(&ring) < 0.0 {
        ring.reverse();
    }

    let start = ring.iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.y.total_cmp(&b.y).then_with(|| a.x.total_cmp(&b.x)))
        .map_or(0, |(i, _)| i);
    ring.rotate_left(start);
    ring
}

/// Canonicalize a polygon map.
///
/// Regions are sorted by shell perimeter. With [`CanonicalOrder::Strict`],
/// two shells of identical perimeter raise `CanonicalizationAmbiguous`,
/// naming the two regions by their position in `map`.
pub fn canonicalize(map: &PolygonMap, order: CanonicalOrder) -> Result<CanonicalMap> {
    let mut keyed: Vec<(usize, f64, CanonicalRegion)> = map.iter()
        .enumerate()
        .map(|(i, region)| (i, Euclidean.length(region.shell()), canonical_region(region)))
        .collect();

    match order {
        CanonicalOrder::Strict => {
            keyed.sort_by(|a, b| a.1.total_cmp(&b.1));
            if let Some(w) = keyed.windows(2).find(|w| w[0].1 == w[1].1) {
                let (first, second) = (w[0].0.min(w[1].0), w[0].0.max(w[1].0));
                return Err(MapError::CanonicalizationAmbiguous { first, second });
            }
        }
        CanonicalOrder::TieBreak => {
            keyed.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| cmp_region(&a.2, &b.2)));
        }
    }

    Ok(CanonicalMap { regions: keyed.into_iter().map(|(_, _, region)| region).collect() })
}

impl PolygonMap {
    pub fn canonicalize(&self, order: CanonicalOrder) -> Result<CanonicalMap> {
        canonicalize(self, order)
    }

    /// Returns `true` if both maps have the same canonical form.
    pub fn equals_canonical(&self, other: &PolygonMap, order: CanonicalOrder) -> Result<bool> {
        Ok(self.canonicalize(order)? == other.canonicalize(order)?)
    }
}

fn canonical_region(region: &Region) -> CanonicalRegion {
    let mut holes: Vec<Vec<Coord<f64>>> = region.holes().iter().map(|h| canonical_ring(&h.0)).collect();
    holes.sort_by(|a, b| cmp_ring(a, b));
    CanonicalRegion { id: region.id, shell: canonical_ring(&region.shell().0), holes }
}

/// Lexicographic on `(y, x)` of each vertex, then on length.
fn cmp_ring(a: &[Coord<f64>], b: &[Coord<f64>]) -> Ordering {
    a.iter().zip(b)
        .map(|(p, q)| p.y.total_cmp(&q.y).then_with(|| p.x.total_cmp(&q.x)))
        .find(|o| o.is_ne())
        .unwrap_or_else(|| a.len().cmp(&b.len()))
}

fn cmp_region(a: &CanonicalRegion, b: &CanonicalRegion) -> Ordering {
    cmp_ring(&a.shell, &b.shell)
        .then_with(|| a.holes.len().cmp(&b.holes.len()))
        .then_with(|| {
            a.holes.iter().zip(&b.holes)
                .map(|(p, q)| cmp_ring(p, q))
                .find(|o| o.is_ne())
                .unwrap_or(Ordering::Equal)
        })
        .then_with(|| a.id.total_cmp(&b.id))
}
