// dcel-delaunay: incremental Delaunay triangulation on a doubly-connected edge list
// Copyright 2025 Lars Brubaker
// License: MIT

pub mod delaunay;
pub mod error;
pub mod geom;
pub mod graph;
pub mod locate;
pub mod points;

pub use delaunay::{
    BuildConfig, BuildOption, ConvexHull, DelaunayBuilder, InsertionOrder, Triangulation,
};
pub use error::{Result, TriangulationError};
pub use geom::{Point, Real, Turn};
pub use graph::{
    EdgeId, FaceId, GraphArrays, PlanarGraph, VertexId, VertexRef, EXTERNAL_FACE,
};
pub use locate::{LocationIndex, LocationNode, NodeId};
