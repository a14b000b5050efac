use geo::Coord;
use rstar::RTree;

use crate::ring::dedup_ring;

/// Snap near-coincident vertices onto a canonical position.
///
/// Vertices are visited in ring order; the first vertex seen at a location
/// becomes canonical and every later vertex within `tolerance` of it is moved
/// onto it. Repeated points created by snapping are collapsed.
///
/// `rings` is a flat slice over all regions; each entry is the list of open
/// rings (shell + holes) of one region. Coordinates are modified in place.
///
/// A non-positive `tolerance` leaves the input untouched: coincidence is
/// exact unless the caller asks otherwise. Returns the number of vertices
/// moved.
pub fn snap_vertices(rings: &mut [Vec<Vec<Coord<f64>>>], tolerance: f64) -> usize {
    if !(tolerance > 0.0) { return 0; }

    let max_dist2 = tolerance * tolerance;
    let mut canonical: RTree<[f64; 2]> = RTree::new();
    let mut moved = 0;

    for ring in rings.iter_mut().flatten() {
        for c in ring.iter_mut() {
            let query = [c.x, c.y];
            match canonical.nearest_neighbor(&query).copied() {
                Some(p) if p == query => {}
                Some(p) if dist2(&p, &query) <= max_dist2 => {
                    *c = Coord { x: p[0], y: p[1] };
                    moved += 1;
                }
                _ => canonical.insert(query),
            }
        }
        dedup_ring(ring);
    }

    moved
}

#[inline]
fn dist2(a: &[f64; 2], b: &[f64; 2]) -> f64 {
    let (dx, dy) = (a[0] - b[0], a[1] - b[1]);
    dx * dx + dy * dy
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coords(pts: &[(f64, f64)]) -> Vec<Coord<f64>> {
        pts.iter().map(|&(x, y)| Coord { x, y }).collect()
    }

    #[test]
    fn zero_tolerance_is_a_no_op() {
        let mut rings = vec![vec![coords(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)])]];
        let before = rings.clone();
        assert_eq!(snap_vertices(&mut rings, 0.0), 0);
        assert_eq!(rings, before);
    }

    #[test]
    fn snaps_onto_first_seen_vertex() {
        let mut rings = vec![
            vec![coords(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)])],
            vec![coords(&[(1.0 + 1e-9, 0.0), (2.0, 0.0), (2.0, 1.0), (1.0, 1.0 - 1e-9)])],
        ];
        assert_eq!(snap_vertices(&mut rings, 1e-6), 2);
        assert_eq!(rings[1][0][0], Coord { x: 1.0, y: 0.0 });
        assert_eq!(rings[1][0][3], Coord { x: 1.0, y: 1.0 });
    }

    #[test]
    fn collapses_vertices_snapped_together() {
        let mut rings = vec![vec![coords(&[(0.0, 0.0), (1.0, 0.0), (1.0 + 1e-9, 1e-9), (1.0, 1.0), (0.0, 1.0)])]];
        snap_vertices(&mut rings, 1e-6);
        assert_eq!(rings[0][0], coords(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]));
    }

    #[test]
    fn distant_vertices_are_kept() {
        let mut rings = vec![vec![coords(&[(0.0, 0.0), (0.5, 0.0), (0.5, 0.5)])]];
        assert_eq!(snap_vertices(&mut rings, 0.1), 0);
        assert_eq!(rings[0][0].len(), 3);
    }
}
