use geo::Geometry;
use maptopo::{MapError, Result, Topology};
use tracing::debug;

use crate::id::RegionId;
use crate::line_map::{LineMap, LineRecord};
use crate::options::ConvertOptions;
use crate::region::Region;

/// A landcover polygon map: regions that together form a planar subdivision.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PolygonMap {
    regions: Vec<Region>,
}

impl PolygonMap {
    pub fn new(regions: Vec<Region>) -> Self {
        Self { regions }
    }

    /// Build a map from `(id, geometry)` pairs.
    ///
    /// MultiPolygons are exploded into one region per component, all with
    /// the same id. Any geometry that is not a Polygon or a MultiPolygon
    /// fails with `UnsupportedGeometry`.
    pub fn from_geometries<I, Id>(geometries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Id, Geometry<f64>)>,
        Id: Into<RegionId>,
    {
        let mut regions = Vec::new();
        for (id, geometry) in geometries {
            let id = id.into();
            match geometry {
                Geometry::Polygon(polygon) => regions.push(Region::new(id, polygon)),
                Geometry::MultiPolygon(multi) => {
                    regions.extend(multi.0.into_iter().map(|polygon| Region::new(id, polygon)));
                }
                other => return Err(MapError::UnsupportedGeometry(geometry_kind(&other).to_string())),
            }
        }
        Ok(Self { regions })
    }

    pub fn push(&mut self, region: Region) {
        self.regions.push(region);
    }

    #[inline] pub fn regions(&self) -> &[Region] { &self.regions }

    #[inline] pub fn len(&self) -> usize { self.regions.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.regions.is_empty() }

    pub fn iter(&self) -> std::slice::Iter<'_, Region> { self.regions.iter() }

    /// Convert to a line map: every boundary shared by two regions, or by a
    /// region and open space, appears once, labelled with the region on its
    /// left and on its right.
    ///
    /// Edges running along an open side of the map's bounding box are
    /// dropped (see [`ConvertOptions::closed_map`]).
    pub fn to_line_map(&self, options: &ConvertOptions) -> Result<LineMap> {
        let rings: Vec<Vec<_>> = self.regions.iter().map(Region::rings).collect();
        let topology = Topology::build(&rings, &options.topology())?;

        let lines: Vec<LineRecord> = topology.lines()?
            .into_iter()
            .map(|line| LineRecord {
                line:     line.coords.into(),
                id_left:  self.regions[line.left].id,
                id_right: line.right.map_or(options.background_id, |r| self.regions[r].id),
            })
            .collect();

        debug!(regions = self.regions.len(), lines = lines.len(), "converted polygon map to line map");
        Ok(LineMap::new(lines))
    }
}

impl FromIterator<Region> for PolygonMap {
    fn from_iter<T: IntoIterator<Item = Region>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a PolygonMap {
    type Item = &'a Region;
    type IntoIter = std::slice::Iter<'a, Region>;

    fn into_iter(self) -> Self::IntoIter { self.regions.iter() }
}

fn geometry_kind(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_)              => "Point",
        Geometry::Line(_)               => "Line",
        Geometry::LineString(_)         => "LineString",
        Geometry::Polygon(_)            => "Polygon",
        Geometry::MultiPoint(_)         => "MultiPoint",
        Geometry::MultiLineString(_)    => "MultiLineString",
        Geometry::MultiPolygon(_)       => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_)               => "Rect",
        Geometry::Triangle(_)           => "Triangle",
    }
}
