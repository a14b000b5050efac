use geo::{BoundingRect, Coord, LineString, Rect};
use serde::{Deserialize, Serialize};

use crate::ring::RingNeighbours;
use crate::stream::PointStream;

/// A side of the map's bounding rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Bottom,
    Right,
    Top,
}

impl Side {
    /// All sides, in `(left, bottom, right, top)` order.
    pub const ALL: [Side; 4] = [Side::Left, Side::Bottom, Side::Right, Side::Top];
}

/// Per-side border handling.
///
/// `true` means the side is *closed*: edges running along it are real
/// boundaries and appear in the line map. `false` means the side is *open*:
/// it is only the edge of the mapped area, and edges along it are dropped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "ClosedMapRepr")]
pub struct ClosedMap {
    pub left:   bool,
    pub bottom: bool,
    pub right:  bool,
    pub top:    bool,
}

impl ClosedMap {
    /// The same flag on every side.
    pub const fn all(closed: bool) -> Self {
        Self { left: closed, bottom: closed, right: closed, top: closed }
    }

    pub fn is_closed(&self, side: Side) -> bool {
        match side {
            Side::Left   => self.left,
            Side::Bottom => self.bottom,
            Side::Right  => self.right,
            Side::Top    => self.top,
        }
    }

    pub fn is_fully_closed(&self) -> bool {
        Side::ALL.iter().all(|&s| self.is_closed(s))
    }
}

impl From<bool> for ClosedMap {
    fn from(closed: bool) -> Self { Self::all(closed) }
}

impl From<[bool; 4]> for ClosedMap {
    fn from([left, bottom, right, top]: [bool; 4]) -> Self {
        Self { left, bottom, right, top }
    }
}

impl From<(bool, bool, bool, bool)> for ClosedMap {
    fn from((left, bottom, right, top): (bool, bool, bool, bool)) -> Self {
        Self { left, bottom, right, top }
    }
}

/// Accepted configuration forms: a scalar, a `[left, bottom, right, top]`
/// list, or the explicit struct.
#[derive(Deserialize)]
#[serde(untagged)]
enum ClosedMapRepr {
    All(bool),
    Sides([bool; 4]),
    Named {
        #[serde(default)] left:   bool,
        #[serde(default)] bottom: bool,
        #[serde(default)] right:  bool,
        #[serde(default)] top:    bool,
    },
}

impl From<ClosedMapRepr> for ClosedMap {
    fn from(repr: ClosedMapRepr) -> Self {
        match repr {
            ClosedMapRepr::All(closed) => Self::all(closed),
            ClosedMapRepr::Sides(sides) => sides.into(),
            ClosedMapRepr::Named { left, bottom, right, top } => Self { left, bottom, right, top },
        }
    }
}

// ---------------------------------------------------------------------------
// BorderClassifier
// ---------------------------------------------------------------------------

/// Classifies ring edges against the tight bounding rectangle of the map.
///
/// `edge_side[i]` is the side the edge `(i, next[i])` runs along, if any,
/// regardless of the `closed_map` flags. A side is *active* when it is open;
/// only active sides exclude edges from the output.
#[derive(Clone, Debug)]
pub struct BorderClassifier {
    bbox:      Option<Rect<f64>>,
    closed:    ClosedMap,
    edge_side: Vec<Option<Side>>,
    on_border: Vec<bool>,
}

impl BorderClassifier {
    pub fn new(stream: &PointStream, neighbours: &RingNeighbours, closed: ClosedMap) -> Self {
        let bbox = bounding_rect(stream.points());

        let edge_side: Vec<Option<Side>> = match bbox {
            Some(bbox) => (0..stream.len())
                .map(|i| side_of(&bbox, stream.point(i), stream.point(neighbours.next(i))))
                .collect(),
            None => Vec::new(),
        };

        // Both in-ring edges run along the same open side.
        let on_border = (0..stream.len())
            .map(|i| match (edge_side[neighbours.prev(i)], edge_side[i]) {
                (Some(a), Some(b)) => a == b && !closed.is_closed(a),
                _ => false,
            })
            .collect();

        Self { bbox, closed, edge_side, on_border }
    }

    /// Tight bounding rectangle of all vertices; `None` for an empty map.
    #[inline] pub fn bbox(&self) -> Option<Rect<f64>> { self.bbox }

    #[inline] pub fn closed_map(&self) -> ClosedMap { self.closed }

    /// Side that the edge leaving vertex `i` runs along.
    #[inline] pub fn edge_side(&self, i: usize) -> Option<Side> { self.edge_side[i] }

    /// Returns `true` if `i` lies on an open side and both of its in-ring
    /// edges run along that side.
    #[inline] pub fn on_border(&self, i: usize) -> bool { self.on_border[i] }

    /// Returns `true` if the segment `a`–`b` runs along an open side.
    pub fn is_open_border_segment(&self, a: Coord<f64>, b: Coord<f64>) -> bool {
        self.bbox
            .and_then(|bbox| side_of(&bbox, a, b))
            .is_some_and(|side| !self.closed.is_closed(side))
    }

    /// Number of vertices flagged by [`BorderClassifier::on_border`].
    pub fn num_on_border(&self) -> usize {
        self.on_border.iter().filter(|&&b| b).count()
    }
}

/// Tight bounding rectangle of a point set.
pub(crate) fn bounding_rect(points: &[Coord<f64>]) -> Option<Rect<f64>> {
    LineString::new(points.to_vec()).bounding_rect()
}

/// The side of `bbox` that the segment `a`–`b` runs along, if any.
fn side_of(bbox: &Rect<f64>, a: Coord<f64>, b: Coord<f64>) -> Option<Side> {
    if a.x == b.x {
        if a.x == bbox.min().x { return Some(Side::Left); }
        if a.x == bbox.max().x { return Some(Side::Right); }
    }
    if a.y == b.y {
        if a.y == bbox.min().y { return Some(Side::Bottom); }
        if a.y == bbox.max().y { return Some(Side::Top); }
    }
    None
}
