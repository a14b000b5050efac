use ahash::AHashSet;
use geo::Coord;
use rstar::{RTree, AABB};

use crate::coincidence::coord_key;

/// Insert, into every ring edge, the vertices of other rings that lie exactly
/// on the interior of that edge.
///
/// After noding, two rings that share a stretch of boundary carry the same
/// vertices along it, which is what the coincidence-based topology expects
/// (a T-junction where one ring ends on another ring's edge becomes a shared
/// vertex). Already-noded input is left unchanged.
///
/// Rings are open (no closing duplicate). Returns the number of vertices
/// inserted.
pub fn split_edges(rings: &mut [Vec<Vec<Coord<f64>>>]) -> usize {
    let mut seen = AHashSet::new();
    let vertices: Vec<[f64; 2]> = rings.iter().flatten().flatten()
        .filter(|&&c| seen.insert(coord_key(c)))
        .map(|c| [c.x, c.y])
        .collect();
    let tree = RTree::bulk_load(vertices);

    let mut inserted = 0;
    for ring in rings.iter_mut().flatten() {
        let n = ring.len();
        let mut noded = Vec::with_capacity(n);
        for i in 0..n {
            let (a, b) = (ring[i], ring[(i + 1) % n]);
            noded.push(a);

            let mut on_edge: Vec<(f64, Coord<f64>)> = tree
                .locate_in_envelope(&AABB::from_corners([a.x.min(b.x), a.y.min(b.y)], [a.x.max(b.x), a.y.max(b.y)]))
                .map(|p| Coord { x: p[0], y: p[1] })
                .filter(|&p| p != a && p != b && is_collinear(a, b, p))
                .map(|p| (param(a, b, p), p))
                .collect();
            on_edge.sort_by(|x, y| x.0.total_cmp(&y.0));

            inserted += on_edge.len();
            noded.extend(on_edge.into_iter().map(|(_, p)| p));
        }
        *ring = noded;
    }

    inserted
}

#[inline]
fn is_collinear(a: Coord<f64>, b: Coord<f64>, p: Coord<f64>) -> bool {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x) == 0.0
}

/// Position of `p` along `a`–`b`, as a fraction of the edge.
#[inline]
fn param(a: Coord<f64>, b: Coord<f64>, p: Coord<f64>) -> f64 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    ((p.x - a.x) * dx + (p.y - a.y) * dy) / (dx * dx + dy * dy)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coords(pts: &[(f64, f64)]) -> Vec<Coord<f64>> {
        pts.iter().map(|&(x, y)| Coord { x, y }).collect()
    }

    #[test]
    fn inserts_t_junction_vertex() {
        let mut rings = vec![
            vec![coords(&[(0.0, 0.0), (2.0, 0.0), (2.0, 1.0), (0.0, 1.0)])],
            vec![coords(&[(0.0, 1.0), (1.0, 1.0), (1.0, 2.0), (0.0, 2.0)])],
            vec![coords(&[(1.0, 1.0), (2.0, 1.0), (2.0, 2.0), (1.0, 2.0)])],
        ];
        assert_eq!(split_edges(&mut rings), 1);
        assert_eq!(rings[0][0], coords(&[(0.0, 0.0), (2.0, 0.0), (2.0, 1.0), (1.0, 1.0), (0.0, 1.0)]));
        assert_eq!(rings[1][0].len(), 4);
        assert_eq!(rings[2][0].len(), 4);
    }

    #[test]
    fn inserts_several_vertices_in_edge_order() {
        let mut rings = vec![
            vec![coords(&[(0.0, 0.0), (4.0, 0.0), (4.0, 1.0), (0.0, 1.0)])],
            vec![coords(&[(3.0, 1.0), (4.0, 1.0), (4.0, 2.0), (3.0, 2.0)])],
            vec![coords(&[(1.0, 1.0), (3.0, 1.0), (3.0, 2.0), (1.0, 2.0)])],
        ];
        assert_eq!(split_edges(&mut rings), 2);
        // The top edge runs from (4, 1) to (0, 1).
        assert_eq!(rings[0][0], coords(&[
            (0.0, 0.0), (4.0, 0.0), (4.0, 1.0), (3.0, 1.0), (1.0, 1.0), (0.0, 1.0),
        ]));
    }

    #[test]
    fn noded_input_is_unchanged() {
        let mut rings = vec![
            vec![coords(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)])],
            vec![coords(&[(1.0, 0.0), (2.0, 0.0), (2.0, 1.0), (1.0, 1.0)])],
        ];
        let before = rings.clone();
        assert_eq!(split_edges(&mut rings), 0);
        assert_eq!(rings, before);
    }

    #[test]
    fn off_edge_vertices_are_ignored() {
        let mut rings = vec![
            vec![coords(&[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)])],
            vec![coords(&[(1.0, 0.5), (1.5, 0.5), (1.5, 1.0)])],
        ];
        assert_eq!(split_edges(&mut rings), 0);
    }
}
