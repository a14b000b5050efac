mod lines;

use geo::Coord;
use tracing::debug;

use crate::border::{BorderClassifier, ClosedMap};
use crate::coincidence::CoincidenceIndex;
use crate::endpoint::Endpoints;
use crate::error::Result;
use crate::node::split_edges;
use crate::ring::{open_ring, RingNeighbours};
use crate::snap::snap_vertices;
use crate::stream::PointStream;

pub use lines::Polyline;

/// Settings for building a [`Topology`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TopologyOptions {
    pub closed_map:        ClosedMap,
    /// Distance under which vertices are merged; `0` keeps exact coincidence.
    pub snap_tolerance:    f64,
    /// Insert vertices lying on other rings' edges before grouping.
    pub split_t_junctions: bool,
}

impl Default for TopologyOptions {
    fn default() -> Self {
        Self { closed_map: ClosedMap::all(false), snap_tolerance: 0.0, split_t_junctions: true }
    }
}

/// Shared-edge topology of a polygon map.
///
/// Everything is index-based over the [`PointStream`]; the structure is built
/// once and never mutated.
#[derive(Clone, Debug)]
pub struct Topology {
    pub(crate) stream:      PointStream,
    pub(crate) coincidence: CoincidenceIndex,
    pub(crate) neighbours:  RingNeighbours,
    pub(crate) border:      BorderClassifier,
    pub(crate) endpoints:   Endpoints,
}

impl Topology {
    /// Build the topology of a polygon map.
    ///
    /// `regions` holds, per region, its closed shell followed by its closed
    /// holes (first point == last point). Region indices in the output refer
    /// to positions in this slice.
    pub fn build(regions: &[Vec<Vec<Coord<f64>>>], options: &TopologyOptions) -> Result<Self> {
        let mut ring = 0;
        let mut open = Vec::with_capacity(regions.len());
        for rings in regions {
            let mut region = Vec::with_capacity(rings.len());
            for coords in rings {
                region.push(open_ring(coords, ring)?);
                ring += 1;
            }
            open.push(region);
        }

        let snapped = snap_vertices(&mut open, options.snap_tolerance);
        let inserted = if options.split_t_junctions { split_edges(&mut open) } else { 0 };
        if snapped > 0 || inserted > 0 {
            debug!(snapped, inserted, "repaired vertex coincidence");
        }

        Ok(Self::from_stream(PointStream::build(&open)?, options.closed_map))
    }

    /// Derive the adjacency structures and endpoints of a vertex stream.
    pub fn from_stream(stream: PointStream, closed_map: ClosedMap) -> Self {
        let coincidence = CoincidenceIndex::from_points(stream.points());
        let neighbours = RingNeighbours::new(&stream);
        let border = BorderClassifier::new(&stream, &neighbours, closed_map);
        let endpoints = Endpoints::find(&stream, &coincidence, &neighbours, &border);

        debug!(
            vertices = stream.len(),
            rings = stream.num_rings(),
            shared_groups = coincidence.num_shared_groups(),
            on_border = border.num_on_border(),
            endpoints = endpoints.len(),
            "built map topology",
        );

        Self { stream, coincidence, neighbours, border, endpoints }
    }

    #[inline] pub fn stream(&self) -> &PointStream { &self.stream }

    #[inline] pub fn coincidence(&self) -> &CoincidenceIndex { &self.coincidence }

    #[inline] pub fn neighbours(&self) -> &RingNeighbours { &self.neighbours }

    #[inline] pub fn border(&self) -> &BorderClassifier { &self.border }

    #[inline] pub fn endpoints(&self) -> &Endpoints { &self.endpoints }

    /// Extract the labelled maximal polylines of the map.
    pub fn lines(&self) -> Result<Vec<Polyline>> {
        lines::LineBuilder::new(self).run()
    }
}
