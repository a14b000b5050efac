//! Doubly Connected Edge List (DCEL) used to rebuild polygons from a line
//! map.
//!
//! # Structure
//!
//! Every segment of the line map is represented as a pair of directed
//! **half-edges** (twins). Each half-edge carries:
//!
//! * `origin` : the vertex it leaves from
//! * `twin`   : the opposite half-edge (same segment, opposite direction)
//! * `next`   : the next half-edge around the same face
//! * `prev`   : the previous half-edge around the same face
//! * `label`  : the region on its left, `None` for open space
//!
//! # Indexing
//!
//! All elements are stored in flat `Vec`s and addressed by strongly-typed
//! index wrappers (`VertexId`, `HalfEdgeId`). Faces are not stored; they are
//! the cycles of `next` links, walked with [`Dcel::face_cycle`].

use std::fmt;

use geo::Coord;

// ---------------------------------------------------------------------------
// Index types
// ---------------------------------------------------------------------------

macro_rules! idx {
    ($name:ident) => {
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub usize);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

idx!(VertexId);
idx!(HalfEdgeId);

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A vertex with an arbitrary coordinate payload `C` and one incident
/// half-edge (any half-edge whose `origin` is this vertex).
#[derive(Clone, Debug)]
pub struct Vertex<C> {
    pub coords:    C,
    /// Any half-edge leaving this vertex. `None` for isolated vertices.
    pub half_edge: Option<HalfEdgeId>,
}

/// A directed half-edge.
#[derive(Clone, Debug)]
pub struct HalfEdge {
    pub origin: VertexId,
    pub twin:   HalfEdgeId,
    pub next:   HalfEdgeId,
    pub prev:   HalfEdgeId,
    /// Region to the left of this half-edge.
    pub label:  Option<usize>,
}

// ---------------------------------------------------------------------------
// DCEL
// ---------------------------------------------------------------------------

/// A Doubly Connected Edge List over vertices with coordinate type `C`.
#[derive(Clone, Debug)]
pub struct Dcel<C> {
    pub vertices:   Vec<Vertex<C>>,
    pub half_edges: Vec<HalfEdge>,
}

impl<C> Default for Dcel<C> {
    fn default() -> Self { Self::new() }
}

impl<C> Dcel<C> {
    pub fn new() -> Self {
        Self { vertices: Vec::new(), half_edges: Vec::new() }
    }

    pub fn num_vertices(&self)   -> usize { self.vertices.len() }
    pub fn num_half_edges(&self) -> usize { self.half_edges.len() }

    pub fn vertex(&self, id: VertexId) -> &Vertex<C> { &self.vertices[id.0] }

    pub fn half_edge(&self, id: HalfEdgeId) -> &HalfEdge { &self.half_edges[id.0] }

    /// Add an isolated vertex with the given coordinates.
    pub fn add_vertex(&mut self, coords: C) -> VertexId {
        let id = VertexId(self.vertices.len());
        self.vertices.push(Vertex { coords, half_edge: None });
        id
    }

    /// Add a twin pair of half-edges between `u` and `v`, labelled with the
    /// region on the left of `u→v` and the region on the left of `v→u`.
    ///
    /// `next` and `prev` links are **not** set here; call `set_next` (or
    /// [`Dcel::link_by_angle`]) after all edges are in.
    ///
    /// Returns `(uv, vu)`.
    pub fn add_edge(
        &mut self,
        u:     VertexId,
        v:     VertexId,
        left:  Option<usize>,
        right: Option<usize>,
    ) -> (HalfEdgeId, HalfEdgeId) {
        let uv = HalfEdgeId(self.half_edges.len());
        let vu = HalfEdgeId(self.half_edges.len() + 1);

        // Placeholder next/prev; caller must fix up.
        self.half_edges.push(HalfEdge { origin: u, twin: vu, next: uv, prev: uv, label: left  });
        self.half_edges.push(HalfEdge { origin: v, twin: uv, next: vu, prev: vu, label: right });

        if self.vertices[u.0].half_edge.is_none() { self.vertices[u.0].half_edge = Some(uv); }
        if self.vertices[v.0].half_edge.is_none() { self.vertices[v.0].half_edge = Some(vu); }

        (uv, vu)
    }

    /// Set `he.next = next` and `next.prev = he`.
    pub fn set_next(&mut self, he: HalfEdgeId, next: HalfEdgeId) {
        self.half_edges[he.0].next   = next;
        self.half_edges[next.0].prev = he;
    }

    /// Iterate over the half-edges of the cycle through `start`, following
    /// `next` links, starting at `start` and stopping before it comes back.
    pub fn face_cycle(&self, start: HalfEdgeId) -> FaceCycle<'_, C> {
        FaceCycle { dcel: self, start, current: start, done: false }
    }

    /// The vertex at the head (destination) of a half-edge.
    pub fn dest(&self, he: HalfEdgeId) -> VertexId {
        self.half_edges[self.half_edges[he.0].twin.0].origin
    }
}

impl Dcel<Coord<f64>> {
    /// Link every half-edge to its successor so that each cycle keeps its
    /// face on the left.
    ///
    /// Arriving at `v` along `u→v`, the successor is the first outgoing
    /// half-edge of `v` clockwise from `v→u` (the sharpest left turn).
    pub fn link_by_angle(&mut self) {
        let mut outgoing: Vec<Vec<HalfEdgeId>> = vec![Vec::new(); self.vertices.len()];
        for (i, he) in self.half_edges.iter().enumerate() {
            outgoing[he.origin.0].push(HalfEdgeId(i));
        }

        // Counter-clockwise order around each vertex.
        for (v, star) in outgoing.iter_mut().enumerate() {
            let origin = self.vertices[v].coords;
            star.sort_by(|&a, &b| {
                let angle = |he: HalfEdgeId| {
                    let d = self.vertices[self.dest(he).0].coords;
                    (d.y - origin.y).atan2(d.x - origin.x)
                };
                angle(a).total_cmp(&angle(b))
            });
        }

        let mut position = vec![0; self.half_edges.len()];
        for star in &outgoing {
            for (k, he) in star.iter().enumerate() {
                position[he.0] = k;
            }
        }

        for i in 0..self.half_edges.len() {
            let he = HalfEdgeId(i);
            let twin = self.half_edges[i].twin;
            let star = &outgoing[self.half_edges[twin.0].origin.0];
            let k = position[twin.0];
            let next = star[(k + star.len() - 1) % star.len()];
            self.set_next(he, next);
        }
    }
}

// ---------------------------------------------------------------------------
// Iterators
// ---------------------------------------------------------------------------

/// Iterator over half-edges in a face cycle.
pub struct FaceCycle<'a, C> {
    dcel:    &'a Dcel<C>,
    start:   HalfEdgeId,
    current: HalfEdgeId,
    done:    bool,
}

impl<C> Iterator for FaceCycle<'_, C> {
    type Item = HalfEdgeId;

    fn next(&mut self) -> Option<HalfEdgeId> {
        if self.done { return None; }
        let he = self.current;
        self.current = self.dcel.half_edges[he.0].next;
        if self.current == self.start { self.done = true; }
        Some(he)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a labelled triangle and verify the angular linkage.
    #[test]
    fn triangle() {
        let mut dcel: Dcel<Coord<f64>> = Dcel::new();

        let a = dcel.add_vertex(Coord { x: 0.0, y: 0.0 });
        let b = dcel.add_vertex(Coord { x: 1.0, y: 0.0 });
        let c = dcel.add_vertex(Coord { x: 0.5, y: 1.0 });

        let (ab, ba) = dcel.add_edge(a, b, Some(0), None);
        let (bc, _) = dcel.add_edge(b, c, Some(0), None);
        let (ca, ac) = dcel.add_edge(c, a, Some(0), None);
        dcel.link_by_angle();

        // Inner cycle: ab → bc → ca → ab
        assert_eq!(dcel.half_edge(ab).next, bc);
        assert_eq!(dcel.half_edge(bc).next, ca);
        assert_eq!(dcel.half_edge(ca).next, ab);
        assert_eq!(dcel.face_cycle(ab).count(), 3);
        assert!(dcel.face_cycle(ab).all(|he| dcel.half_edge(he).label == Some(0)));

        // Outer cycle runs clockwise over the twins.
        assert_eq!(dcel.half_edge(ba).next, ac);
        assert_eq!(dcel.face_cycle(ba).count(), 3);
        assert!(dcel.face_cycle(ba).all(|he| dcel.half_edge(he).label.is_none()));

        assert_eq!(dcel.num_vertices(), 3);
        assert_eq!(dcel.num_half_edges(), 6);
    }
}
