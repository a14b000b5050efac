use ahash::AHashSet;
use geo::Coord;
use tracing::{debug, trace};

use crate::error::{MapError, Result};

use super::Topology;

/// A maximal polyline of the line map.
///
/// The region on the left of the walk direction is `left`; `right` is the
/// region on the other side, or `None` when the line borders open space.
#[derive(Clone, Debug, PartialEq)]
pub struct Polyline {
    /// Vertex-stream indices, in walk order.
    pub nodes:  Vec<usize>,
    pub coords: Vec<Coord<f64>>,
    /// Ring that was walked to produce this line.
    pub ring:   usize,
    /// Ring on the other side, when one was found.
    pub opposite_ring: Option<usize>,
    /// Region index on the left.
    pub left:   usize,
    /// Region index on the right.
    pub right:  Option<usize>,
}

impl Polyline {
    /// Returns `true` if the line starts and ends at the same vertex.
    pub fn is_closed(&self) -> bool {
        self.nodes.len() > 2 && self.nodes.first() == self.nodes.last()
    }
}

/// The ring on the other side of a candidate line, with the mates of the
/// line's first and last vertex on that ring.
#[derive(Clone, Copy, Debug)]
struct Opposite {
    ring:  usize,
    first: usize,
    last:  usize,
}

/// Walks rings between endpoints and emits each shared polyline once.
pub(super) struct LineBuilder<'a> {
    topo:    &'a Topology,
    /// Vertices already covered by an emitted line.
    visited: Vec<bool>,
    /// Two-vertex lines already emitted, keyed by group representatives.
    emitted_pairs: AHashSet<(usize, usize)>,
    lines:   Vec<Polyline>,
    skipped_border:    usize,
    skipped_duplicate: usize,
}

impl<'a> LineBuilder<'a> {
    pub(super) fn new(topo: &'a Topology) -> Self {
        Self {
            topo,
            visited: vec![false; topo.stream.len()],
            emitted_pairs: AHashSet::new(),
            lines: Vec::new(),
            skipped_border: 0,
            skipped_duplicate: 0,
        }
    }

    pub(super) fn run(mut self) -> Result<Vec<Polyline>> {
        let topo = self.topo;
        let stream = &topo.stream;

        // Shells first, in input order, then holes.
        let shells = (0..stream.num_rings()).filter(|&r| stream.is_shell(r));
        let holes = (0..stream.num_rings()).filter(|&r| !stream.is_shell(r));
        for ring in shells.chain(holes) {
            for nodes in self.arcs(ring)? {
                self.consider(ring, nodes)?;
            }
        }

        debug!(
            emitted = self.lines.len(),
            skipped_border = self.skipped_border,
            skipped_duplicate = self.skipped_duplicate,
            "extracted line map",
        );
        Ok(self.lines)
    }

    /// Split a ring into arcs between consecutive endpoints, in increasing
    /// start order; the arc wrapping past the end of the ring comes last.
    ///
    /// Every ring carries at least one endpoint.
    fn arcs(&self, ring: usize) -> Result<Vec<Vec<usize>>> {
        let range = self.topo.stream.ring_range(ring);
        let ends = self.topo.endpoints.in_range(range.clone());

        let Some((&first, &last)) = ends.first().zip(ends.last()) else {
            return Err(MapError::inconsistency(format!("ring {ring} has no endpoint"), Some(range.start)));
        };

        let mut arcs: Vec<Vec<usize>> = ends.windows(2).map(|w| (w[0]..=w[1]).collect()).collect();
        arcs.push((last..range.end).chain(range.start..=first).collect());
        Ok(arcs)
    }

    fn consider(&mut self, ring: usize, nodes: Vec<usize>) -> Result<()> {
        if nodes.len() < 2 {
            return Err(MapError::inconsistency("arc has fewer than two vertices", nodes.first().copied()));
        }

        if self.is_border_line(&nodes) {
            trace!(ring, start = nodes[0], "skipping open border line");
            self.skipped_border += 1;
            return Ok(());
        }
        if self.is_duplicate(&nodes) {
            trace!(ring, start = nodes[0], "skipping duplicate line");
            self.skipped_duplicate += 1;
            return Ok(());
        }

        let opposite = self.find_opposite(ring, &nodes);
        self.visit(&nodes, opposite);

        // Shells run counter-clockwise and holes clockwise, so the owning
        // region is always on the left of the walk.
        let stream = &self.topo.stream;
        let line = Polyline {
            coords: nodes.iter().map(|&i| stream.point(i)).collect(),
            ring,
            opposite_ring: opposite.map(|o| o.ring),
            left:  stream.owner(ring),
            right: opposite.map(|o| stream.owner(o.ring)),
            nodes,
        };
        trace!(ring, len = line.nodes.len(), left = line.left, right = ?line.right, "emitting line");
        self.lines.push(line);
        Ok(())
    }

    /// Every segment of the line runs along an open border side.
    fn is_border_line(&self, nodes: &[usize]) -> bool {
        let stream = &self.topo.stream;
        nodes.windows(2).all(|w| self.topo.border.is_open_border_segment(stream.point(w[0]), stream.point(w[1])))
    }

    fn pair_key(&self, a: usize, b: usize) -> (usize, usize) {
        let (a, b) = (self.topo.coincidence.representative(a), self.topo.coincidence.representative(b));
        (a.min(b), a.max(b))
    }

    /// A two-vertex line is a duplicate when an emitted two-vertex line joins
    /// the same coincidence groups; a longer one when every interior vertex
    /// and all of its mates have been visited.
    fn is_duplicate(&self, nodes: &[usize]) -> bool {
        if let [a, b] = *nodes {
            return self.emitted_pairs.contains(&self.pair_key(a, b));
        }
        let coincidence = &self.topo.coincidence;
        nodes[1..nodes.len() - 1].iter()
            .all(|&i| coincidence.group(i).all(|j| self.visited[j]))
    }

    /// Find the ring running along `nodes` on the other side.
    fn find_opposite(&self, ring: usize, nodes: &[usize]) -> Option<Opposite> {
        let (stream, coincidence, neighbours) = (&self.topo.stream, &self.topo.coincidence, &self.topo.neighbours);
        let (first, last) = (nodes[0], nodes[nodes.len() - 1]);

        for i in coincidence.mates(first) {
            let candidate = stream.ring_of(i);
            if candidate == ring { continue; }

            for j in coincidence.mates(last) {
                if stream.ring_of(j) != candidate { continue; }

                let confirmed = if nodes.len() == 2 {
                    i == neighbours.prev(j) || j == neighbours.prev(i)
                } else {
                    coincidence.mates(nodes[1]).any(|k| stream.ring_of(k) == candidate)
                };
                if confirmed {
                    return Some(Opposite { ring: candidate, first: i, last: j });
                }
            }
        }
        None
    }

    /// Mark the line's vertices, and the stretch of the opposite ring between
    /// the matched mates, as visited.
    fn visit(&mut self, nodes: &[usize], opposite: Option<Opposite>) {
        for &i in nodes {
            self.visited[i] = true;
        }
        if let [a, b] = *nodes {
            let key = self.pair_key(a, b);
            self.emitted_pairs.insert(key);
        }

        let Some(Opposite { ring, first, last }) = opposite else { return };
        // The opposite ring runs from `last` to `first`.
        if first >= last {
            self.visited[last..=first].fill(true);
        } else {
            let range = self.topo.stream.ring_range(ring);
            self.visited[last..range.end].fill(true);
            self.visited[range.start..=first].fill(true);
        }
    }
}
