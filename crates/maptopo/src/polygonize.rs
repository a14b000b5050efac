use ahash::{AHashMap, AHashSet};
use geo::{Area, Contains, Coord, LineString, Polygon};
use tracing::{debug, trace};

use crate::coincidence::coord_key;
use crate::dcel::{Dcel, HalfEdgeId, VertexId};
use crate::error::{MapError, Result};
use crate::ring::signed_area;

/// A polyline with the region index on each side; `None` is open space.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelledLine {
    pub coords: Vec<Coord<f64>>,
    pub left:   Option<usize>,
    pub right:  Option<usize>,
}

/// One polygon rebuilt from a line map, with the region index it belongs to.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelledPolygon {
    pub label:   usize,
    pub polygon: Polygon<f64>,
}

struct Shell {
    label:   usize,
    polygon: Polygon<f64>,
    area:    f64,
    holes:   Vec<LineString<f64>>,
}

/// Rebuild labelled polygons from a closed line map.
///
/// Every face of the planar graph spanned by `lines` must be bounded by
/// half-edges carrying a single label. Counter-clockwise cycles become
/// shells; clockwise cycles become holes of the smallest shell with the same
/// label that contains them. Unlabelled cycles (open space) are discarded, as
/// are lines labelled with the same region on both sides.
///
/// Polygons are returned in the order their shells are first reached when
/// walking `lines` in order.
pub fn polygonize(lines: &[LabelledLine]) -> Result<Vec<LabelledPolygon>> {
    let mut dcel: Dcel<Coord<f64>> = Dcel::new();
    let mut vertex_of: AHashMap<(u64, u64), VertexId> = AHashMap::new();
    let mut segments: AHashSet<(VertexId, VertexId)> = AHashSet::new();

    for (k, line) in lines.iter().enumerate() {
        if line.coords.len() < 2 {
            return Err(MapError::invalid(format!("line {k} has fewer than two points")));
        }
        if line.left == line.right {
            trace!(line = k, label = ?line.left, "ignoring line with the same region on both sides");
            continue;
        }

        for w in line.coords.windows(2) {
            if w[0] == w[1] { continue; }
            let u = *vertex_of.entry(coord_key(w[0])).or_insert_with(|| dcel.add_vertex(w[0]));
            let v = *vertex_of.entry(coord_key(w[1])).or_insert_with(|| dcel.add_vertex(w[1]));
            if !segments.insert((u.min(v), u.max(v))) {
                return Err(MapError::invalid(format!(
                    "segment {:?} -> {:?} of line {k} appears more than once in the line map",
                    w[0], w[1],
                )));
            }
            dcel.add_edge(u, v, line.left, line.right);
        }
    }

    if dcel.num_half_edges() == 0 {
        return Ok(Vec::new());
    }
    dcel.link_by_angle();

    let mut shells: Vec<Shell> = Vec::new();
    let mut holes: Vec<(usize, LineString<f64>)> = Vec::new();
    let mut traced = vec![false; dcel.num_half_edges()];
    let mut faces = 0usize;

    for start in (0..dcel.num_half_edges()).map(HalfEdgeId) {
        if traced[start.0] { continue; }

        let cycle: Vec<HalfEdgeId> = dcel.face_cycle(start).collect();
        for &he in &cycle {
            traced[he.0] = true;
        }
        faces += 1;

        let label = dcel.half_edge(start).label;
        if let Some(&other) = cycle.iter().find(|&&he| dcel.half_edge(he).label != label) {
            let at = dcel.vertex(dcel.half_edge(other).origin).coords;
            return Err(MapError::invalid(format!(
                "face boundary mixes regions {:?} and {:?} near {at:?}; the line map is not closed",
                label, dcel.half_edge(other).label,
            )));
        }
        let Some(label) = label else { continue };

        let ring: Vec<Coord<f64>> = cycle.iter()
            .map(|&he| dcel.vertex(dcel.half_edge(he).origin).coords)
            .collect();
        let area = signed_area(&ring);
        if area > 0.0 {
            let polygon = Polygon::new(LineString::from(ring), Vec::new());
            let area = polygon.unsigned_area();
            shells.push(Shell { label, polygon, area, holes: Vec::new() });
        } else if area < 0.0 {
            holes.push((label, LineString::from(ring)));
        } else {
            return Err(MapError::invalid(format!(
                "region {label} has a face boundary with zero area near {:?}", ring[0],
            )));
        }
    }

    for (label, hole) in holes {
        let void = Polygon::new(hole, Vec::new());
        let owner = shells.iter_mut()
            .filter(|s| s.label == label && s.polygon.contains(&void))
            .min_by(|a, b| a.area.total_cmp(&b.area))
            .ok_or_else(|| MapError::invalid(format!("hole of region {label} lies outside every shell of that region")))?;
        owner.holes.push(void.into_inner().0);
    }

    debug!(
        lines = lines.len(),
        vertices = dcel.num_vertices(),
        half_edges = dcel.num_half_edges(),
        faces,
        polygons = shells.len(),
        "polygonized line map",
    );

    Ok(shells.into_iter()
        .map(|s| {
            let (exterior, _) = s.polygon.into_inner();
            LabelledPolygon { label: s.label, polygon: Polygon::new(exterior, s.holes) }
        })
        .collect())
}
