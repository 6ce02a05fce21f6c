// Copyright 2025 Lars Brubaker
// Planar graph stored as a doubly-connected edge list.
//
// Vertices, half-edges and faces live in flat Vec arenas addressed by typed
// ids, so a vertex index can never be handed to the edge arena by mistake.
//
// Layout:
//   - FaceId(0) is the unbounded external face and is never triangulated.
//   - Two phantom vertices stand for points at infinity. They have no arena
//     slot and no coordinates; half-edges refer to them through VertexRef.
//   - Every half-edge stores origin, twin, prev, next and face. Triangular
//     faces are next-3-cycles.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, TriangulationError};
use crate::geom::{self, lexicographic_higher, Point, Real, Turn, COLLINEAR_THRESHOLD};

mod arrays;
mod path;

pub use arrays::GraphArrays;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        pub struct $name(pub usize);

        impl $name {
            #[inline]
            pub fn index(self) -> usize {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, "{}"), self.0)
            }
        }
    };
}

id_type!(
    /// Index into the vertex arena.
    VertexId,
    "v"
);
id_type!(
    /// Index into the half-edge arena.
    EdgeId,
    "e"
);
id_type!(
    /// Index into the face arena.
    FaceId,
    "f"
);

/// The unbounded face.
pub const EXTERNAL_FACE: FaceId = FaceId(0);

/// A half-edge endpoint: either a stored vertex or one of the two points at
/// infinity used to bootstrap the triangulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum VertexRef {
    Real(VertexId),
    AtInfinityFirst,
    AtInfinitySecond,
}

impl VertexRef {
    #[inline]
    pub fn real(self) -> Option<VertexId> {
        match self {
            VertexRef::Real(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn is_phantom(self) -> bool {
        !matches!(self, VertexRef::Real(_))
    }
}

impl From<VertexId> for VertexRef {
    fn from(v: VertexId) -> Self {
        VertexRef::Real(v)
    }
}

impl fmt::Display for VertexRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VertexRef::Real(v) => write!(f, "{v}"),
            VertexRef::AtInfinityFirst => f.write_str("inf1"),
            VertexRef::AtInfinitySecond => f.write_str("inf2"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vertex {
    pub point: Point,
    /// Any half-edge leaving this vertex. None until the vertex is inserted.
    pub edge: Option<EdgeId>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HalfEdge {
    pub origin: VertexRef,
    pub twin: EdgeId,
    pub prev: EdgeId,
    pub next: EdgeId,
    /// Face to the left of this half-edge.
    pub face: FaceId,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Face {
    pub edge: EdgeId,
}

/// Partial half-edge update. Fields left as None keep their current value.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EdgeUpdate {
    pub origin: Option<VertexRef>,
    pub twin: Option<EdgeId>,
    pub prev: Option<EdgeId>,
    pub next: Option<EdgeId>,
    pub face: Option<FaceId>,
}

/// Arena sizes needed to triangulate `n` points, including the bootstrap
/// records: (vertices, half-edges, faces).
pub fn capacity_for(n: usize) -> (usize, usize, usize) {
    let max_edges = 6 * (n + 2) - 6;
    let max_faces = (2 + max_edges).saturating_sub(n);
    (n, max_edges, max_faces)
}

#[inline]
pub(crate) fn out_of_range(kind: &'static str, index: usize, len: usize) -> TriangulationError {
    TriangulationError::IndexOutOfRange { kind, index, len }
}

fn reserve_total<T>(v: &mut Vec<T>, total: usize, what: &'static str) -> Result<()> {
    let extra = total.saturating_sub(v.len());
    v.try_reserve_exact(extra)
        .map_err(|_| TriangulationError::AllocationFailure { what })
}

fn push_record<T>(v: &mut Vec<T>, item: T, what: &'static str) -> Result<usize> {
    if v.len() == v.capacity() {
        v.try_reserve(1)
            .map_err(|_| TriangulationError::AllocationFailure { what })?;
    }
    v.push(item);
    Ok(v.len() - 1)
}

// ─────────────────────────────── PlanarGraph ───────────────────────────────────

#[derive(Clone, Debug)]
pub struct PlanarGraph {
    vertices: Vec<Vertex>,
    edges: Vec<HalfEdge>,
    faces: Vec<Face>,
    epsilon: Real,
}

impl Default for PlanarGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for PlanarGraph {
    fn eq(&self, other: &Self) -> bool {
        self.vertices == other.vertices && self.edges == other.edges && self.faces == other.faces
    }
}

impl PlanarGraph {
    pub fn new() -> Self {
        PlanarGraph {
            vertices: Vec::new(),
            edges: Vec::new(),
            faces: Vec::new(),
            epsilon: COLLINEAR_THRESHOLD,
        }
    }

    /// Empty graph with arenas sized for triangulating `n` points.
    pub fn with_capacity(n: usize) -> Result<Self> {
        let mut graph = Self::new();
        graph.resize(n, false)?;
        Ok(graph)
    }

    /// Re-sizes the arenas for `n` points. Existing records are kept when
    /// `copy_existing` is set and dropped otherwise.
    pub fn resize(&mut self, n: usize, copy_existing: bool) -> Result<()> {
        if !copy_existing {
            self.reset();
        }
        let (nv, ne, nf) = capacity_for(n);
        reserve_total(&mut self.vertices, nv, "vertices")?;
        reserve_total(&mut self.edges, ne, "edges")?;
        reserve_total(&mut self.faces, nf, "faces")
    }

    /// Drops every record, keeping the allocated capacity.
    pub fn reset(&mut self) {
        self.vertices.clear();
        self.edges.clear();
        self.faces.clear();
    }

    pub fn epsilon(&self) -> Real {
        self.epsilon
    }

    pub fn set_epsilon(&mut self, eps: Real) {
        self.epsilon = eps;
    }

    // ──────────────────────────── Record access ────────────────────────────────

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }
    pub fn edges(&self) -> &[HalfEdge] {
        &self.edges
    }
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    #[inline]
    pub fn vertex(&self, v: VertexId) -> Result<&Vertex> {
        self.vertices
            .get(v.0)
            .ok_or_else(|| out_of_range("vertex", v.0, self.vertices.len()))
    }

    #[inline]
    pub fn edge(&self, e: EdgeId) -> Result<&HalfEdge> {
        self.edges
            .get(e.0)
            .ok_or_else(|| out_of_range("edge", e.0, self.edges.len()))
    }

    #[inline]
    pub fn face_record(&self, f: FaceId) -> Result<&Face> {
        self.faces
            .get(f.0)
            .ok_or_else(|| out_of_range("face", f.0, self.faces.len()))
    }

    #[inline]
    fn edge_mut(&mut self, e: EdgeId) -> Result<&mut HalfEdge> {
        let len = self.edges.len();
        self.edges
            .get_mut(e.0)
            .ok_or_else(|| out_of_range("edge", e.0, len))
    }

    // ──────────────────────────── Construction ─────────────────────────────────

    pub fn add_vertex(&mut self, point: Point) -> Result<VertexId> {
        push_record(&mut self.vertices, Vertex { point, edge: None }, "vertices").map(VertexId)
    }

    pub fn add_edge(
        &mut self,
        origin: VertexRef,
        twin: EdgeId,
        prev: EdgeId,
        next: EdgeId,
        face: FaceId,
    ) -> Result<EdgeId> {
        let edge = HalfEdge {
            origin,
            twin,
            prev,
            next,
            face,
        };
        push_record(&mut self.edges, edge, "edges").map(EdgeId)
    }

    pub fn add_face(&mut self, edge: EdgeId) -> Result<FaceId> {
        push_record(&mut self.faces, Face { edge }, "faces").map(FaceId)
    }

    pub fn update_edge(&mut self, update: EdgeUpdate, e: EdgeId) -> Result<()> {
        let rec = self.edge_mut(e)?;
        if let Some(origin) = update.origin {
            rec.origin = origin;
        }
        if let Some(twin) = update.twin {
            rec.twin = twin;
        }
        if let Some(prev) = update.prev {
            rec.prev = prev;
        }
        if let Some(next) = update.next {
            rec.next = next;
        }
        if let Some(face) = update.face {
            rec.face = face;
        }
        Ok(())
    }

    /// Sets the outgoing half-edge of a stored vertex.
    pub fn update_vertex_edge(&mut self, edge: EdgeId, v: VertexId) -> Result<()> {
        let len = self.vertices.len();
        let rec = self
            .vertices
            .get_mut(v.0)
            .ok_or_else(|| out_of_range("vertex", v.0, len))?;
        rec.edge = Some(edge);
        Ok(())
    }

    /// Same as update_vertex_edge but a no-op for phantom references.
    pub fn update_vertex_ref_edge(&mut self, edge: EdgeId, v: VertexRef) -> Result<()> {
        match v {
            VertexRef::Real(v) => self.update_vertex_edge(edge, v),
            _ => Ok(()),
        }
    }

    pub fn update_face(&mut self, edge: EdgeId, f: FaceId) -> Result<()> {
        let len = self.faces.len();
        let rec = self
            .faces
            .get_mut(f.0)
            .ok_or_else(|| out_of_range("face", f.0, len))?;
        rec.edge = edge;
        Ok(())
    }

    // ──────────────────────────── Navigation ───────────────────────────────────

    #[inline]
    pub fn origin(&self, e: EdgeId) -> Result<VertexRef> {
        Ok(self.edge(e)?.origin)
    }
    #[inline]
    pub fn twin(&self, e: EdgeId) -> Result<EdgeId> {
        Ok(self.edge(e)?.twin)
    }
    #[inline]
    pub fn next(&self, e: EdgeId) -> Result<EdgeId> {
        Ok(self.edge(e)?.next)
    }
    #[inline]
    pub fn prev(&self, e: EdgeId) -> Result<EdgeId> {
        Ok(self.edge(e)?.prev)
    }
    #[inline]
    pub fn face(&self, e: EdgeId) -> Result<FaceId> {
        Ok(self.edge(e)?.face)
    }

    /// Origin of the twin, i.e. where `e` points to.
    #[inline]
    pub fn dest(&self, e: EdgeId) -> Result<VertexRef> {
        self.origin(self.twin(e)?)
    }

    #[inline]
    pub fn face_edge(&self, f: FaceId) -> Result<EdgeId> {
        Ok(self.face_record(f)?.edge)
    }

    #[inline]
    pub fn vertex_edge(&self, v: VertexId) -> Result<Option<EdgeId>> {
        Ok(self.vertex(v)?.edge)
    }

    #[inline]
    pub fn vertex_point(&self, v: VertexId) -> Result<Point> {
        Ok(self.vertex(v)?.point)
    }

    /// Coordinates of a vertex reference; None for the points at infinity.
    pub fn point_of(&self, v: VertexRef) -> Result<Option<Point>> {
        match v {
            VertexRef::Real(id) => self.vertex_point(id).map(Some),
            _ => Ok(None),
        }
    }

    // ──────────────────────────── Predicates ───────────────────────────────────

    /// True if either side of the edge is the external face.
    pub fn is_external_edge(&self, e: EdgeId) -> Result<bool> {
        let rec = self.edge(e)?;
        Ok(rec.face == EXTERNAL_FACE || self.face(rec.twin)? == EXTERNAL_FACE)
    }

    /// True if either endpoint is a point at infinity.
    pub fn has_phantom_vertex(&self, e: EdgeId) -> Result<bool> {
        Ok(self.origin(e)?.is_phantom() || self.dest(e)?.is_phantom())
    }

    /// The three corners of a face, starting at its representative edge.
    pub fn face_vertices(&self, f: FaceId) -> Result<[VertexRef; 3]> {
        let e = self.face_edge(f)?;
        let rec = self.edge(e)?;
        Ok([rec.origin, self.origin(rec.next)?, self.origin(rec.prev)?])
    }

    /// Corner coordinates of a face, or None if a corner is at infinity.
    pub fn face_points(&self, f: FaceId) -> Result<Option<[Point; 3]>> {
        let [a, b, c] = self.face_vertices(f)?;
        match (self.point_of(a)?, self.point_of(b)?, self.point_of(c)?) {
            (Some(p), Some(q), Some(r)) => Ok(Some([p, q, r])),
            _ => Ok(None),
        }
    }

    /// The external face and every face touching a point at infinity.
    pub fn is_imaginary_face(&self, f: FaceId) -> Result<bool> {
        if f == EXTERNAL_FACE {
            return Ok(true);
        }
        Ok(self.face_vertices(f)?.iter().any(|v| v.is_phantom()))
    }

    /// The face spanned by both points at infinity and one real vertex.
    pub fn is_bottom_most_face(&self, f: FaceId) -> Result<bool> {
        let phantoms = self
            .face_vertices(f)?
            .iter()
            .filter(|v| v.is_phantom())
            .count();
        Ok(phantoms == 2)
    }

    /// Distinct faces across the two edges of the bottom-most face that do not
    /// start at the second point at infinity. Empty for any other face.
    pub fn bottom_most_face_neighbors(&self, f: FaceId) -> Result<Vec<FaceId>> {
        let mut out = Vec::with_capacity(2);
        if !self.is_bottom_most_face(f)? {
            return Ok(out);
        }
        let start = self.face_edge(f)?;
        let mut e = start;
        for _ in 0..3 {
            if self.origin(e)? != VertexRef::AtInfinitySecond {
                let across = self.face(self.twin(e)?)?;
                if !out.contains(&across) {
                    out.push(across);
                }
            }
            e = self.next(e)?;
        }
        Ok(out)
    }

    /// Twice the signed area of three vertices; zero if any is at infinity.
    pub fn signed_area(&self, v1: VertexRef, v2: VertexRef, v3: VertexRef) -> Result<Real> {
        match (self.point_of(v1)?, self.point_of(v2)?, self.point_of(v3)?) {
            (Some(a), Some(b), Some(c)) => Ok(geom::signed_area(&a, &b, &c)),
            _ => Ok(0.0),
        }
    }

    /// Endpoint coordinates of an edge, or None if it touches infinity.
    pub fn edge_points(&self, e: EdgeId) -> Result<Option<(Point, Point)>> {
        match (self.point_of(self.origin(e)?)?, self.point_of(self.dest(e)?)?) {
            (Some(a), Some(b)) => Ok(Some((a, b))),
            _ => Ok(None),
        }
    }

    /// Which side of the directed edge source -> dest the point `p` lies on.
    ///
    /// Between two stored vertices this is the ordinary epsilon-banded
    /// signed-area test. With a point at infinity involved, the point is
    /// compared lexicographically (y, then x) against the finite endpoint and
    /// the outcome is mapped according to which phantom vertex is involved.
    /// Vertex 0 is the highest stored point and always sees `p` on its left.
    pub fn turn(&self, p: &Point, source: VertexRef, dest: VertexRef) -> Result<Turn> {
        use VertexRef::{AtInfinityFirst as First, AtInfinitySecond as Second, Real as R};

        let side = |left: bool| if left { Turn::Left } else { Turn::Right };
        let higher = |v: VertexId| -> Result<bool> {
            Ok(lexicographic_higher(p, &self.vertex_point(v)?))
        };

        let t = match (source, dest) {
            (R(s), R(d)) => geom::turn(
                &self.vertex_point(s)?,
                &self.vertex_point(d)?,
                p,
                self.epsilon,
            ),
            (R(s), Second) => side(s.0 == 0 || !higher(s)?),
            (R(s), First) => side(higher(s)?),
            (First, R(d)) => side(d.0 == 0 || !higher(d)?),
            (Second, R(d)) => side(higher(d)?),
            (Second, First) => Turn::Left,
            (First, Second) => Turn::Right,
            (First, First) | (Second, Second) => Turn::Collinear,
        };
        Ok(t)
    }

    /// Half-edges leaving `v`, in rotation order starting at its stored edge.
    /// Empty for a vertex that has not been inserted.
    pub fn outgoing_edges(&self, v: VertexId) -> Result<Vec<EdgeId>> {
        let mut out = Vec::new();
        let Some(start) = self.vertex_edge(v)? else {
            return Ok(out);
        };
        let mut e = start;
        loop {
            out.push(e);
            e = self.twin(self.prev(e)?)?;
            if e == start {
                return Ok(out);
            }
            if out.len() > self.edges.len() {
                return Err(TriangulationError::InconsistentGraph(format!(
                    "rotation around {v} does not close"
                )));
            }
        }
    }

    // ──────────────────────────── Validation ───────────────────────────────────

    /// V - E + F counting the two points at infinity and the external face.
    pub fn euler_characteristic(&self) -> i64 {
        (self.vertices.len() as i64 + 2) - (self.edges.len() as i64 / 2) + self.faces.len() as i64
    }

    /// Checks every structural invariant of the edge list.
    pub fn validate(&self) -> Result<()> {
        let broken = |msg: String| Err(TriangulationError::InconsistentGraph(msg));

        for (i, rec) in self.edges.iter().enumerate() {
            let e = EdgeId(i);
            if let VertexRef::Real(v) = rec.origin {
                self.vertex(v)?;
            }
            self.face_record(rec.face)?;
            if self.twin(rec.twin)? != e {
                return broken(format!("twin of twin of {e} is not {e}"));
            }
            if self.prev(rec.next)? != e || self.next(rec.prev)? != e {
                return broken(format!("next/prev links around {e} disagree"));
            }
            if self.face(rec.next)? != rec.face {
                return broken(format!("{e} and its successor lie on different faces"));
            }
            if self.origin(rec.next)? == rec.origin {
                return broken(format!("{e} and its successor share an origin"));
            }
            if self.origin(rec.next)? != self.dest(e)? {
                return broken(format!("{e} does not end where its successor starts"));
            }
            if self.next(self.next(rec.next)?)? != e {
                return broken(format!("face {} is not a triangle", rec.face));
            }
        }
        for (i, f) in self.faces.iter().enumerate() {
            if self.face(f.edge)? != FaceId(i) {
                return broken(format!("representative edge of f{i} lies elsewhere"));
            }
        }
        for (i, v) in self.vertices.iter().enumerate() {
            if let Some(e) = v.edge {
                if self.origin(e)? != VertexRef::Real(VertexId(i)) {
                    return broken(format!("outgoing edge of v{i} starts elsewhere"));
                }
            }
        }
        if !self.edges.is_empty() && self.euler_characteristic() != 2 {
            return broken(format!(
                "Euler characteristic is {}",
                self.euler_characteristic()
            ));
        }
        Ok(())
    }
}
