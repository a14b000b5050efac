use thiserror::Error;

/// Result alias used throughout the conversion engine.
pub type Result<T, E = MapError> = std::result::Result<T, E>;

/// Errors raised by map conversion and canonicalization.
///
/// Every error is fatal to the call that produced it; no partial output is
/// returned alongside it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MapError {
    /// A ring is malformed: too few points, not closed, or degenerate.
    #[error("invalid input{}: {message}", located("ring", .ring))]
    InvalidInput {
        message: String,
        ring:    Option<usize>,
    },

    /// The input holds a geometry that is neither a Polygon nor a MultiPolygon.
    #[error("unsupported geometry type: {0}")]
    UnsupportedGeometry(String),

    /// An invariant was violated mid-computation.
    #[error("internal inconsistency{}: {message}", located("vertex", .vertex))]
    InternalInconsistency {
        message: String,
        vertex:  Option<usize>,
    },

    /// Two regions cannot be ordered by the canonicalizer.
    #[error("regions {first} and {second} have identical shell perimeters and cannot be ordered")]
    CanonicalizationAmbiguous {
        first:  usize,
        second: usize,
    },
}

impl MapError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput { message: message.into(), ring: None }
    }

    pub fn invalid_ring(message: impl Into<String>, ring: usize) -> Self {
        Self::InvalidInput { message: message.into(), ring: Some(ring) }
    }

    pub fn inconsistency(message: impl Into<String>, vertex: Option<usize>) -> Self {
        Self::InternalInconsistency { message: message.into(), vertex }
    }
}

fn located(kind: &str, index: &Option<usize>) -> String {
    match index {
        Some(i) => format!(" at {kind} {i}"),
        None    => String::new(),
    }
}
