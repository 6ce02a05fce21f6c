// Copyright 2025 Lars Brubaker
// Flat record arrays for handing a graph to an external encoder and back.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{out_of_range, Face, HalfEdge, PlanarGraph, Vertex, VertexRef};
use crate::error::Result;
use crate::geom::{Real, COLLINEAR_THRESHOLD};

/// The three record arrays of a PlanarGraph, in arena order, plus the
/// collinearity band its turn predicate uses.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GraphArrays {
    pub vertices: Vec<Vertex>,
    pub edges: Vec<HalfEdge>,
    pub faces: Vec<Face>,
    pub epsilon: Real,
}

impl Default for GraphArrays {
    fn default() -> Self {
        GraphArrays {
            vertices: Vec::new(),
            edges: Vec::new(),
            faces: Vec::new(),
            epsilon: COLLINEAR_THRESHOLD,
        }
    }
}

impl PlanarGraph {
    /// Copies the live records out. Unused capacity is not part of the dump.
    pub fn dump(&self) -> GraphArrays {
        GraphArrays {
            vertices: self.vertices.clone(),
            edges: self.edges.clone(),
            faces: self.faces.clone(),
            epsilon: self.epsilon,
        }
    }

    /// Rebuilds a graph from dumped arrays, rejecting any record that points
    /// outside the arrays it refers to.
    pub fn load(arrays: GraphArrays) -> Result<Self> {
        let GraphArrays {
            vertices,
            edges,
            faces,
            epsilon,
        } = arrays;
        let (nv, ne, nf) = (vertices.len(), edges.len(), faces.len());
        let check_edge = |e: usize| {
            if e < ne {
                Ok(())
            } else {
                Err(out_of_range("edge", e, ne))
            }
        };

        for v in &vertices {
            if let Some(e) = v.edge {
                check_edge(e.0)?;
            }
        }
        for rec in &edges {
            if let VertexRef::Real(v) = rec.origin {
                if v.0 >= nv {
                    return Err(out_of_range("vertex", v.0, nv));
                }
            }
            check_edge(rec.twin.0)?;
            check_edge(rec.prev.0)?;
            check_edge(rec.next.0)?;
            if rec.face.0 >= nf {
                return Err(out_of_range("face", rec.face.0, nf));
            }
        }
        for f in &faces {
            check_edge(f.edge.0)?;
        }

        let mut graph = PlanarGraph::new();
        graph.vertices = vertices;
        graph.edges = edges;
        graph.faces = faces;
        graph.epsilon = epsilon;
        Ok(graph)
    }
}
