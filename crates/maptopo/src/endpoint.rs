use std::ops::Range;

use smallvec::SmallVec;

use crate::border::BorderClassifier;
use crate::coincidence::CoincidenceIndex;
use crate::ring::{turn, RingNeighbours};
use crate::stream::PointStream;

type RingSet = SmallVec<[usize; 4]>;

/// The vertices at which maximal shared polylines break.
///
/// A vertex is an endpoint when
///
/// 1. the set of rings meeting at it differs from the set meeting at its
///    previous or next vertex,
/// 2. it is shared with another ring and both of its edges run along an open
///    border side,
/// 3. its incoming and outgoing edges run along different border sides (or
///    only one of them runs along a side), or
/// 4. its ring has no endpoint from rules 1–3 and the ring turns at it.
///
/// Each rule marks the whole coincidence group, so a vertex is an endpoint
/// exactly when all of its mates are.
#[derive(Clone, Debug)]
pub struct Endpoints {
    is_endpoint: Vec<bool>,
    sorted:      Vec<usize>,
}

impl Endpoints {
    pub fn find(
        stream:      &PointStream,
        coincidence: &CoincidenceIndex,
        neighbours:  &RingNeighbours,
        border:      &BorderClassifier,
    ) -> Self {
        let n = stream.len();
        let mut is_endpoint = vec![false; n];
        let mark = |i: usize, is_endpoint: &mut Vec<bool>| {
            for j in coincidence.group(i) {
                is_endpoint[j] = true;
            }
        };

        let rings_at = |i: usize| -> RingSet {
            let mut rings: RingSet = coincidence.group(i).map(|j| stream.ring_of(j)).collect();
            rings.sort_unstable();
            rings.dedup();
            rings
        };

        for i in 0..n {
            if is_endpoint[i] { continue; }

            // Rule 1: the rings meeting here are not all present on both sides.
            let here = rings_at(i);
            let before = rings_at(neighbours.prev(i));
            let after = rings_at(neighbours.next(i));
            let changes = here.iter().any(|r| !before.contains(r) || !after.contains(r));

            // Rule 2: a shared point sitting on an open border run. Fires alone
            // only where rings overlap along the border, since anywhere else the
            // ring set changes at the first shared vertex.
            let shared_on_border = coincidence.is_shared(i) && border.on_border(i);

            // Rule 3: the border side changes here.
            let border_transition = border.edge_side(neighbours.prev(i)) != border.edge_side(i);

            if changes || shared_on_border || border_transition {
                mark(i, &mut is_endpoint);
            }
        }

        // Rule 4: anchor rings that are not split anywhere at their corners.
        for ring in 0..stream.num_rings() {
            let range = stream.ring_range(ring);
            if range.clone().any(|i| is_endpoint[i]) { continue; }

            let mut anchored = false;
            for i in range.clone() {
                let (a, b, c) = (stream.point(neighbours.prev(i)), stream.point(i), stream.point(neighbours.next(i)));
                if turn(a, b, c) != 0.0 {
                    mark(i, &mut is_endpoint);
                    anchored = true;
                }
            }
            if !anchored {
                mark(range.start, &mut is_endpoint);
            }
        }

        let sorted = (0..n).filter(|&i| is_endpoint[i]).collect();
        Self { is_endpoint, sorted }
    }

    /// O(1) membership test.
    #[inline] pub fn contains(&self, i: usize) -> bool { self.is_endpoint[i] }

    #[inline] pub fn len(&self) -> usize { self.sorted.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.sorted.is_empty() }

    /// All endpoints in increasing order.
    #[inline] pub fn as_slice(&self) -> &[usize] { &self.sorted }

    /// Endpoints inside `range`, in increasing order.
    pub fn in_range(&self, range: Range<usize>) -> &[usize] {
        let lo = self.sorted.partition_point(|&e| e < range.start);
        let hi = self.sorted.partition_point(|&e| e < range.end);
        &self.sorted[lo..hi]
    }
}
