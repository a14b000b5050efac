use std::cmp::Ordering;

use ahash::AHashMap;
use geo::{Coord, LineString};
use maptopo::{polygonize, LabelledLine, Result};
use tracing::debug;

use crate::id::RegionId;
use crate::polygon_map::PolygonMap;
use crate::region::Region;

/// One polyline of a line map, with the region ids on each side of its
/// direction of travel.
#[derive(Clone, Debug, PartialEq)]
pub struct LineRecord {
    pub line:     LineString<f64>,
    pub id_left:  RegionId,
    pub id_right: RegionId,
}

/// A single segment of a line map, normalized so that `from` is the
/// lexicographically smaller endpoint (`x`, then `y`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelledEdge {
    pub from:     Coord<f64>,
    pub to:       Coord<f64>,
    pub id_left:  RegionId,
    pub id_right: RegionId,
}

impl LabelledEdge {
    fn new(a: Coord<f64>, b: Coord<f64>, id_left: RegionId, id_right: RegionId) -> Self {
        if cmp_coord(&a, &b) == Ordering::Greater {
            Self { from: b, to: a, id_left: id_right, id_right: id_left }
        } else {
            Self { from: a, to: b, id_left, id_right }
        }
    }

    fn total_cmp(&self, other: &Self) -> Ordering {
        cmp_coord(&self.from, &other.from)
            .then_with(|| cmp_coord(&self.to, &other.to))
            .then_with(|| self.id_left.total_cmp(&other.id_left))
            .then_with(|| self.id_right.total_cmp(&other.id_right))
    }
}

fn cmp_coord(a: &Coord<f64>, b: &Coord<f64>) -> Ordering {
    a.x.total_cmp(&b.x).then_with(|| a.y.total_cmp(&b.y))
}

/// A shared-edge line map: the boundaries of a polygon map, each stored once
/// with the ids of the regions on both sides.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LineMap {
    lines: Vec<LineRecord>,
}

impl LineMap {
    pub fn new(lines: Vec<LineRecord>) -> Self {
        Self { lines }
    }

    pub fn push(&mut self, line: LineRecord) {
        self.lines.push(line);
    }

    #[inline] pub fn lines(&self) -> &[LineRecord] { &self.lines }

    #[inline] pub fn len(&self) -> usize { self.lines.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.lines.is_empty() }

    pub fn iter(&self) -> std::slice::Iter<'_, LineRecord> { self.lines.iter() }

    /// Every segment of every line, direction-normalized and sorted.
    ///
    /// Two line maps describing the same labelled boundaries yield the same
    /// edges however their lines are split or directed.
    pub fn labelled_edges(&self) -> Vec<LabelledEdge> {
        let mut edges: Vec<LabelledEdge> = self.lines.iter()
            .flat_map(|record| {
                record.line.0.windows(2)
                    .filter(|w| w[0] != w[1])
                    .map(|w| LabelledEdge::new(w[0], w[1], record.id_left, record.id_right))
            })
            .collect();
        edges.sort_by(LabelledEdge::total_cmp);
        edges
    }

    /// Equality as multisets of labelled edges.
    pub fn edge_equal(&self, other: &LineMap) -> bool {
        self.labelled_edges() == other.labelled_edges()
    }

    /// Rebuild the polygon map bounded by this line map.
    ///
    /// Lines labelled `background_id` on one side border open space. The
    /// line map must be closed: every region boundary has to be present,
    /// which is the case for maps converted with all sides closed. Regions
    /// come out in the order their boundaries first appear.
    pub fn to_polygon_map(&self, background_id: impl Into<RegionId>) -> Result<PolygonMap> {
        let background = background_id.into();

        let mut label_of: AHashMap<u64, usize> = AHashMap::new();
        let mut ids: Vec<RegionId> = Vec::new();
        let mut label = |id: RegionId| -> Option<usize> {
            if id == background {
                return None;
            }
            Some(*label_of.entry(id.key()).or_insert_with(|| {
                ids.push(id);
                ids.len() - 1
            }))
        };

        let labelled: Vec<LabelledLine> = self.lines.iter()
            .map(|record| LabelledLine {
                coords: record.line.0.clone(),
                left:   label(record.id_left),
                right:  label(record.id_right),
            })
            .collect();

        let polygons = polygonize(&labelled)?;
        debug!(lines = self.lines.len(), regions = polygons.len(), "converted line map to polygon map");

        Ok(polygons.into_iter()
            .map(|p| Region::new(ids[p.label], p.polygon))
            .collect())
    }
}

impl FromIterator<LineRecord> for LineMap {
    fn from_iter<T: IntoIterator<Item = LineRecord>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a LineMap {
    type Item = &'a LineRecord;
    type IntoIter = std::slice::Iter<'a, LineRecord>;

    fn into_iter(self) -> Self::IntoIter { self.lines.iter() }
}
