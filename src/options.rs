use maptopo::{ClosedMap, TopologyOptions};
use serde::{Deserialize, Serialize};

use crate::id::RegionId;

/// Settings for polygon map to line map conversion.
///
/// Deserializes from partial configuration, filling in the defaults:
///
/// ```
/// # use landmap::ConvertOptions;
/// let options: ConvertOptions = serde_json::from_str(r#"{ "closed_map": [true, false, true, false] }"#).unwrap();
/// assert!(options.closed_map.left && !options.closed_map.bottom);
/// assert_eq!(options.background_id, landmap::RegionId::BACKGROUND);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Which map sides are real boundaries. Defaults to all sides open.
    pub closed_map:        ClosedMap,
    /// Id written on the side of a line with no region.
    pub background_id:     RegionId,
    /// Merge vertices closer than this; `0` compares coordinates exactly.
    pub snap_tolerance:    f64,
    /// Insert vertices where one ring ends on another ring's edge.
    pub split_t_junctions: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            closed_map:        ClosedMap::all(false),
            background_id:     RegionId::BACKGROUND,
            snap_tolerance:    0.0,
            split_t_junctions: true,
        }
    }
}

impl ConvertOptions {
    pub fn with_closed_map(mut self, closed_map: impl Into<ClosedMap>) -> Self {
        self.closed_map = closed_map.into();
        self
    }

    pub fn with_background_id(mut self, background_id: impl Into<RegionId>) -> Self {
        self.background_id = background_id.into();
        self
    }

    pub fn with_snap_tolerance(mut self, tolerance: f64) -> Self {
        self.snap_tolerance = tolerance;
        self
    }

    pub fn with_split_t_junctions(mut self, split: bool) -> Self {
        self.split_t_junctions = split;
        self
    }

    pub(crate) fn topology(&self) -> TopologyOptions {
        TopologyOptions {
            closed_map:        self.closed_map,
            snap_tolerance:    self.snap_tolerance,
            split_t_junctions: self.split_t_junctions,
        }
    }
}
