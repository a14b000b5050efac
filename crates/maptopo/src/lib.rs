pub mod border;
pub mod coincidence;
pub mod dcel;
pub mod endpoint;
pub mod error;
pub mod node;
pub mod polygonize;
pub mod ring;
pub mod snap;
pub mod stream;
pub mod topology;

pub use border::{BorderClassifier, ClosedMap, Side};
pub use coincidence::CoincidenceIndex;
pub use dcel::{Dcel, HalfEdgeId, VertexId};
pub use endpoint::Endpoints;
pub use error::{MapError, Result};
pub use polygonize::{polygonize, LabelledLine, LabelledPolygon};
pub use ring::RingNeighbours;
pub use stream::PointStream;
pub use topology::{Polyline, Topology, TopologyOptions};
