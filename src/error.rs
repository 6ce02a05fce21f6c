// Copyright 2025 Lars Brubaker
// Error type shared by the graph, the location index and the builder.

use thiserror::Error;

use crate::geom::Real;

/// Everything that can go wrong while building or querying a triangulation.
///
/// A build that returns any of these leaves nothing usable behind; callers
/// discard the builder state and start over.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum TriangulationError {
    #[error("allocation failed while growing {what}")]
    AllocationFailure { what: &'static str },

    #[error("{kind} index {index} out of range (len {len})")]
    IndexOutOfRange {
        kind: &'static str,
        index: usize,
        len: usize,
    },

    #[error("geometric degeneracy at vertex {vertex}: {reason}")]
    GeometricDegeneracy { vertex: usize, reason: &'static str },

    #[error("point ({x}, {y}) is not contained in any child triangle")]
    LocationFailure { x: Real, y: Real },

    #[error("no face path from face {from} to face {to}")]
    PathNotFound { from: usize, to: usize },

    #[error("inconsistent graph: {0}")]
    InconsistentGraph(String),

    #[error("point set is empty")]
    EmptyInput,

    #[error("point {index} has a non-finite coordinate")]
    InvalidCoordinate { index: usize },
}

pub type Result<T, E = TriangulationError> = std::result::Result<T, E>;
