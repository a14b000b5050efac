use geo::{Coord, LineString, Polygon};
use maptopo::ring::open_ring;
use maptopo::Result;

use crate::id::RegionId;

/// One connected area of a polygon map: a polygon (shell plus holes) and the
/// id of the landcover class it belongs to.
///
/// Several regions may share an id; a MultiPolygon is stored as one region
/// per component.
#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    pub id:      RegionId,
    pub polygon: Polygon<f64>,
}

impl Region {
    /// Wrap a polygon. Ring orientation is arbitrary; it is normalized when
    /// the map is converted.
    pub fn new(id: impl Into<RegionId>, polygon: Polygon<f64>) -> Self {
        Self { id: id.into(), polygon }
    }

    /// Build a region from raw closed rings (first point == last point).
    ///
    /// Fails with `InvalidInput` if a ring is not closed or has fewer than
    /// three distinct points.
    pub fn from_rings(id: impl Into<RegionId>, shell: &[(f64, f64)], holes: &[Vec<(f64, f64)>]) -> Result<Self> {
        let to_coords = |ring: &[(f64, f64)]| ring.iter().map(|&(x, y)| Coord { x, y }).collect::<Vec<_>>();

        let exterior = to_coords(shell);
        open_ring(&exterior, 0)?;

        let mut interiors = Vec::with_capacity(holes.len());
        for (k, hole) in holes.iter().enumerate() {
            let coords = to_coords(hole);
            open_ring(&coords, k + 1)?;
            interiors.push(LineString::new(coords));
        }

        Ok(Self::new(id, Polygon::new(LineString::new(exterior), interiors)))
    }

    #[inline] pub fn shell(&self) -> &LineString<f64> { self.polygon.exterior() }

    #[inline] pub fn holes(&self) -> &[LineString<f64>] { self.polygon.interiors() }

    /// Closed coordinate sequences of the shell and then each hole.
    pub(crate) fn rings(&self) -> Vec<Vec<Coord<f64>>> {
        std::iter::once(self.shell())
            .chain(self.holes())
            .map(|ring| ring.0.clone())
            .collect()
    }
}
