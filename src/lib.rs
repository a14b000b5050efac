#![doc = "Conversion between landcover polygon maps and shared-edge line maps"]
mod canonical;
mod id;
mod line_map;
mod options;
mod polygon_map;
mod region;

#[doc(inline)]
pub use canonical::{canonical_ring, canonicalize, CanonicalMap, CanonicalOrder, CanonicalRegion};

#[doc(inline)]
pub use id::RegionId;

#[doc(inline)]
pub use line_map::{LabelledEdge, LineMap, LineRecord};

#[doc(inline)]
pub use options::ConvertOptions;

#[doc(inline)]
pub use polygon_map::PolygonMap;

#[doc(inline)]
pub use region::Region;

pub use maptopo::{ClosedMap, MapError, Result, Side};

/// Convert a polygon map into a line map.
///
/// `closed_map` takes a `bool` for all four sides or `(left, bottom, right,
/// top)` flags; a closed side keeps the edges running along it, an open side
/// drops them. Lines with no region on their right get `background_id`.
///
/// ```
/// use landmap::{poly2lines, PolygonMap, Region, RegionId};
///
/// let map = PolygonMap::new(vec![
///     Region::from_rings(1, &[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.0, 0.0)], &[]).unwrap(),
///     Region::from_rings(2, &[(1.0, 0.0), (2.0, 0.0), (2.0, 1.0), (1.0, 1.0), (1.0, 0.0)], &[]).unwrap(),
/// ]);
/// let lines = poly2lines(&map, false, RegionId::BACKGROUND).unwrap();
/// assert_eq!(lines.len(), 1);
/// ```
pub fn poly2lines(
    map: &PolygonMap,
    closed_map: impl Into<ClosedMap>,
    background_id: impl Into<RegionId>,
) -> Result<LineMap> {
    let options = ConvertOptions::default()
        .with_closed_map(closed_map)
        .with_background_id(background_id);
    map.to_line_map(&options)
}

/// Rebuild a polygon map from a closed line map.
///
/// Sides labelled `background_id` are open space. Fails with `InvalidInput`
/// if some region boundary is missing from `lines`.
pub fn lines2poly(lines: &LineMap, background_id: impl Into<RegionId>) -> Result<PolygonMap> {
    lines.to_polygon_map(background_id)
}
