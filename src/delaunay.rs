// Copyright 2025 Lars Brubaker
// Incremental Delaunay triangulation.
//
// The builder seeds the plane with one real vertex (the highest point) and
// two points at infinity, then inserts the remaining points one by one:
// locate the containing triangle through the history DAG, split it in three
// (or split the two triangles sharing an edge in four when the point lands
// on that edge), and restore the Delaunay property with Lawson flips.

use std::mem;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, TriangulationError};
use crate::geom::{Point, Real, COLLINEAR_THRESHOLD};
use crate::graph::{
    capacity_for, EdgeId, FaceId, PlanarGraph, VertexId, VertexRef, EXTERNAL_FACE,
};
use crate::locate::{LocationIndex, LocationNode};
use crate::points::{angular_order, highest_index};

mod legalize;
mod query;
mod split;


pub use query::ConvexHull;

// ─────────────────────────────── Configuration ─────────────────────────────────

/// Order in which the input points are fed to the builder. It only affects
/// the depth of the location DAG, never the resulting triangulation's
/// validity.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum InsertionOrder {
    #[default]
    AsGiven,
    /// Seeded random permutation; gives expected logarithmic location depth.
    Shuffled { seed: u64 },
    /// Counter-clockwise around the lowest point.
    Angular,
}

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BuildConfig {
    /// Signed-area band treated as collinear by the turn predicate.
    pub collinear_epsilon: Real,
    pub insertion_order: InsertionOrder,
}

impl Default for BuildConfig {
    fn default() -> Self {
        BuildConfig {
            collinear_epsilon: COLLINEAR_THRESHOLD,
            insertion_order: InsertionOrder::AsGiven,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum BuildOption {
    CollinearEpsilon(Real),
    InsertionOrder(InsertionOrder),
}

// ─────────────────────────────── Builder ───────────────────────────────────────

/// Owns the graph and location index while a build is in progress.
#[derive(Debug, Default)]
pub struct DelaunayBuilder {
    config: BuildConfig,
    graph: PlanarGraph,
    index: LocationIndex,
}

impl DelaunayBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: BuildConfig) -> Self {
        DelaunayBuilder {
            config,
            ..Self::default()
        }
    }

    pub fn set_option(&mut self, option: BuildOption) {
        match option {
            BuildOption::CollinearEpsilon(eps) => self.config.collinear_epsilon = eps,
            BuildOption::InsertionOrder(order) => self.config.insertion_order = order,
        }
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Discards any partially built state.
    pub fn reset(&mut self) {
        self.graph.reset();
        self.index.reset();
    }

    /// Triangulates `points`. On failure nothing of the attempt is kept.
    pub fn build(&mut self, points: &[Point]) -> Result<Triangulation> {
        tracing::debug!(
            n = points.len(),
            order = ?self.config.insertion_order,
            "building triangulation"
        );
        match self.try_build(points) {
            Ok(tri) => {
                tracing::debug!(
                    vertices = tri.graph.num_vertices(),
                    faces = tri.graph.num_faces(),
                    nodes = tri.index.len(),
                    "triangulation built"
                );
                Ok(tri)
            }
            Err(err) => {
                tracing::warn!(error = %err, "build aborted");
                self.reset();
                Err(err)
            }
        }
    }

    fn try_build(&mut self, points: &[Point]) -> Result<Triangulation> {
        check_input(points)?;

        let mut order = self.insertion_order(points);
        let reordered: Vec<Point> = order.iter().map(|&i| points[i]).collect();
        let top = highest_index(&reordered).ok_or(TriangulationError::EmptyInput)?;
        order.swap(0, top);

        self.reset();
        self.graph.resize(points.len(), false)?;
        self.graph.set_epsilon(self.config.collinear_epsilon);
        let (_, max_edges, max_faces) = capacity_for(points.len());
        // The DAG keeps every triangle ever created: three nodes per split and
        // two per flip, around nine per point on random input. It grows past
        // this initial reservation as needed.
        self.index = LocationIndex::with_capacity(max_edges, max_faces);

        for &i in &order {
            self.graph.add_vertex(points[i])?;
        }
        self.bootstrap()?;
        for v in 1..points.len() {
            self.insert(VertexId(v))?;
        }

        let graph = mem::take(&mut self.graph);
        let index = mem::take(&mut self.index);
        Triangulation::new(graph, index, order)
    }

    fn insertion_order(&self, points: &[Point]) -> Vec<usize> {
        match self.config.insertion_order {
            InsertionOrder::AsGiven => (0..points.len()).collect(),
            InsertionOrder::Shuffled { seed } => {
                let mut order: Vec<usize> = (0..points.len()).collect();
                order.shuffle(&mut StdRng::seed_from_u64(seed));
                order
            }
            InsertionOrder::Angular => angular_order(points),
        }
    }

    /// Two triangles covering the plane: v0 -> inf2 -> inf1 as face 1 and the
    /// reverse cycle as the external face.
    fn bootstrap(&mut self) -> Result<()> {
        use VertexRef::{AtInfinityFirst as First, AtInfinitySecond as Second};

        let v0 = VertexRef::Real(VertexId(0));
        let e = EdgeId;
        let inner = FaceId(1);
        let g = &mut self.graph;

        g.add_edge(v0, e(3), e(2), e(1), inner)?;
        g.add_edge(Second, e(5), e(0), e(2), inner)?;
        g.add_edge(First, e(4), e(1), e(0), inner)?;
        g.add_edge(Second, e(0), e(5), e(4), EXTERNAL_FACE)?;
        g.add_edge(v0, e(2), e(3), e(5), EXTERNAL_FACE)?;
        g.add_edge(First, e(1), e(4), e(3), EXTERNAL_FACE)?;
        g.add_face(e(3))?;
        g.add_face(e(0))?;
        g.update_vertex_edge(e(0), VertexId(0))?;

        self.index.insert(LocationNode::new([v0, Second, First], inner))?;
        Ok(())
    }

    /// Locate, classify and split for one stored vertex.
    fn insert(&mut self, v: VertexId) -> Result<()> {
        let p = self.graph.vertex_point(v)?;
        let node = self.index.locate(&self.graph, &p)?;
        if self.index.is_strictly_interior(&self.graph, &p, node)? {
            tracing::debug!(vertex = %v, node = %node, "interior point, splitting in three");
            self.split_in_three(v, node)
        } else {
            tracing::debug!(vertex = %v, node = %node, "point on an edge, splitting in four");
            self.split_in_four(v, node)
        }
    }
}

/// Rejects empty input, non-finite coordinates and exact duplicates.
fn check_input(points: &[Point]) -> Result<()> {
    if points.is_empty() {
        return Err(TriangulationError::EmptyInput);
    }
    if let Some(index) = points.iter().position(|p| !p.is_finite()) {
        return Err(TriangulationError::InvalidCoordinate { index });
    }
    // Adding zero turns -0.0 into 0.0, so total_cmp sorts equal points together.
    let key = |i: usize| (points[i].x + 0.0, points[i].y + 0.0);
    let mut sorted: Vec<usize> = (0..points.len()).collect();
    sorted.sort_by(|&a, &b| {
        let ((ax, ay), (bx, by)) = (key(a), key(b));
        ax.total_cmp(&bx).then(ay.total_cmp(&by))
    });
    for w in sorted.windows(2) {
        if points[w[0]] == points[w[1]] {
            return Err(TriangulationError::GeometricDegeneracy {
                vertex: w[0].max(w[1]),
                reason: "duplicate point",
            });
        }
    }
    Ok(())
}

// ─────────────────────────────── Result ────────────────────────────────────────

/// A finished triangulation. Read-only; safe to share between threads.
#[derive(Clone, Debug)]
pub struct Triangulation {
    graph: PlanarGraph,
    index: LocationIndex,
    hull: ConvexHull,
    input_order: Vec<usize>,
}

impl Triangulation {
    /// Shorthand for a default-configured builder.
    pub fn build(points: &[Point]) -> Result<Self> {
        DelaunayBuilder::new().build(points)
    }

    fn new(graph: PlanarGraph, index: LocationIndex, input_order: Vec<usize>) -> Result<Self> {
        let hull = query::compute_hull(&graph)?;
        Ok(Triangulation {
            graph,
            index,
            hull,
            input_order,
        })
    }

    pub fn graph(&self) -> &PlanarGraph {
        &self.graph
    }

    pub fn location_index(&self) -> &LocationIndex {
        &self.index
    }

    /// Consumes the triangulation, keeping only the edge list.
    pub fn into_graph(self) -> PlanarGraph {
        self.graph
    }

    pub fn num_vertices(&self) -> usize {
        self.graph.num_vertices()
    }

    /// Position in the caller's input slice of a stored vertex.
    pub fn input_index(&self, v: VertexId) -> Option<usize> {
        self.input_order.get(v.0).copied()
    }

    pub fn vertex_coord(&self, v: VertexId) -> Result<Point> {
        self.graph.vertex_point(v)
    }
    pub fn origin(&self, e: EdgeId) -> Result<VertexRef> {
        self.graph.origin(e)
    }
    pub fn twin(&self, e: EdgeId) -> Result<EdgeId> {
        self.graph.twin(e)
    }
    pub fn next(&self, e: EdgeId) -> Result<EdgeId> {
        self.graph.next(e)
    }
    pub fn prev(&self, e: EdgeId) -> Result<EdgeId> {
        self.graph.prev(e)
    }
    pub fn face(&self, e: EdgeId) -> Result<FaceId> {
        self.graph.face(e)
    }

    /// Faces whose three corners are all stored vertices, with their corners.
    pub fn live_triangles(&self) -> Result<Vec<(FaceId, [VertexId; 3])>> {
        let mut out = Vec::new();
        for f in 1..self.graph.num_faces() {
            let face = FaceId(f);
            if let [VertexRef::Real(a), VertexRef::Real(b), VertexRef::Real(c)] =
                self.graph.face_vertices(face)?
            {
                out.push((face, [a, b, c]));
            }
        }
        Ok(out)
    }

    /// The stored vertices adjacent to `v`, in rotation order.
    pub fn neighbors(&self, v: VertexId) -> Result<Vec<VertexId>> {
        let mut out = Vec::new();
        for e in self.graph.outgoing_edges(v)? {
            if let VertexRef::Real(w) = self.graph.dest(e)? {
                out.push(w);
            }
        }
        Ok(out)
    }
}
