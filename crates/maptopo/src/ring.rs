use geo::Coord;

use crate::error::{MapError, Result};
use crate::stream::PointStream;

// ---------------------------------------------------------------------------
// Ring helpers
// ---------------------------------------------------------------------------

/// Validate a closed ring (first point == last point) and return it open,
/// with the closing duplicate and any consecutive repeated points removed.
///
/// `ring` is the ring's position in the caller's ring order and is only used
/// to locate errors.
pub fn open_ring(coords: &[Coord<f64>], ring: usize) -> Result<Vec<Coord<f64>>> {
    let (Some(first), Some(last)) = (coords.first(), coords.last()) else {
        return Err(MapError::invalid_ring("ring is empty", ring));
    };
    if first != last {
        return Err(MapError::invalid_ring("ring is not closed (first point differs from last)", ring));
    }

    let mut open = coords[..coords.len() - 1].to_vec();
    dedup_ring(&mut open);
    if open.len() < 3 {
        return Err(MapError::invalid_ring(
            format!("ring has {} distinct points, at least 3 are required", open.len()),
            ring,
        ));
    }
    Ok(open)
}

/// Collapse consecutive repeated points of an open ring, including a repeat
/// across the wrap-around.
pub(crate) fn dedup_ring(ring: &mut Vec<Coord<f64>>) {
    ring.dedup();
    while ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }
}

/// Signed area of an open ring (positive when counter-clockwise).
pub fn signed_area(ring: &[Coord<f64>]) -> f64 {
    let n = ring.len();
    let mut a = 0.0;
    for i in 0..n {
        let (p, q) = (ring[i], ring[(i + 1) % n]);
        a += p.x * q.y - q.x * p.y;
    }
    a / 2.0
}

/// Cross product of `b - a` and `c - b`; zero when `a`, `b`, `c` are collinear.
#[inline]
pub(crate) fn turn(a: Coord<f64>, b: Coord<f64>, c: Coord<f64>) -> f64 {
    (b.x - a.x) * (c.y - b.y) - (b.y - a.y) * (c.x - b.x)
}

// ---------------------------------------------------------------------------
// RingNeighbours
// ---------------------------------------------------------------------------

/// Previous and next vertex of every vertex within its own ring, wrapping at
/// ring boundaries.
#[derive(Clone, Debug)]
pub struct RingNeighbours {
    prev: Vec<u32>,
    next: Vec<u32>,
}

impl RingNeighbours {
    pub fn new(stream: &PointStream) -> Self {
        let n = stream.len();
        let mut prev: Vec<u32> = (0..n as u32).map(|i| i.wrapping_sub(1)).collect();
        let mut next: Vec<u32> = (1..=n as u32).collect();

        for ring in 0..stream.num_rings() {
            let range = stream.ring_range(ring);
            let (first, last) = (range.start, range.end - 1);
            prev[first] = last as u32;
            next[last] = first as u32;
        }

        Self { prev, next }
    }

    #[inline] pub fn prev(&self, i: usize) -> usize { self.prev[i] as usize }

    #[inline] pub fn next(&self, i: usize) -> usize { self.next[i] as usize }

    #[inline] pub fn len(&self) -> usize { self.next.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.next.is_empty() }
}
