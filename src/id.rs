use std::cmp::Ordering;
use std::fmt;

use maptopo::{MapError, Result};
use serde::{Deserialize, Serialize};

/// Identifier of a landcover region.
///
/// Region ids may be integral (class codes) or real (roughness lengths), so
/// they are stored as `f64` and compared by value. Wider integers convert
/// through `TryFrom` and are rejected past 2^53, where `f64` loses precision.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionId(pub f64);

impl RegionId {
    /// Default id for the side of a line that borders no region.
    pub const BACKGROUND: RegionId = RegionId(-999.0);

    #[inline] pub fn value(self) -> f64 { self.0 }

    /// Total order over ids, usable for sorting.
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }

    /// Hash key that agrees with `==` (`-0.0` and `0.0` share a key).
    #[inline]
    pub(crate) fn key(self) -> u64 {
        (self.0 + 0.0).to_bits()
    }
}

impl Default for RegionId {
    fn default() -> Self { Self::BACKGROUND }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

macro_rules! impl_from {
    ($($t:ty),*) => {
        $(impl From<$t> for RegionId {
            fn from(id: $t) -> Self { RegionId(f64::from(id)) }
        })*
    };
}

impl_from!(i8, i16, i32, u8, u16, u32, f32, f64);

/// Largest integer magnitude an `f64` holds exactly.
const MAX_EXACT: u64 = 1 << 53;

macro_rules! impl_try_from {
    ($($t:ty => $abs:expr),*) => {
        $(impl TryFrom<$t> for RegionId {
            type Error = MapError;

            fn try_from(id: $t) -> Result<Self> {
                if $abs(id) > MAX_EXACT {
                    return Err(MapError::invalid(format!("region id {id} is not exactly representable")));
                }
                Ok(RegionId(id as f64))
            }
        })*
    };
}

impl_try_from!(
    i64   => |id: i64| id.unsigned_abs(),
    u64   => |id: u64| id,
    usize => |id: usize| id as u64
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_and_real_ids_compare_by_value() {
        assert_eq!(RegionId::from(7), RegionId::from(7.0));
        assert_eq!(RegionId::from(-999), RegionId::BACKGROUND);
        assert_ne!(RegionId::from(0.03), RegionId::from(0.3));
        assert_eq!(RegionId::from(0.0).key(), RegionId::from(-0.0).key());
    }

    #[test]
    fn wide_integers_convert_only_when_exact() {
        assert_eq!(RegionId::try_from(42i64), Ok(RegionId::from(42)));
        assert_eq!(RegionId::try_from(-(1i64 << 53)), Ok(RegionId(-9_007_199_254_740_992.0)));
        assert_eq!(RegionId::try_from(7usize), Ok(RegionId::from(7)));
        assert!(RegionId::try_from(u64::MAX).is_err());
        assert!(RegionId::try_from(u64::MAX - 1).is_err());
        assert!(RegionId::try_from((1i64 << 53) + 1).is_err());
    }

    #[test]
    fn displays_without_trailing_zeros() {
        assert_eq!(RegionId::from(12).to_string(), "12");
        assert_eq!(RegionId::from(0.25).to_string(), "0.25");
    }

    #[test]
    fn serializes_as_a_bare_number() {
        assert_eq!(serde_json::to_string(&RegionId::from(5)).unwrap(), "5.0");
        let id: RegionId = serde_json::from_str("-999").unwrap();
        assert_eq!(id, RegionId::BACKGROUND);
    }
}
