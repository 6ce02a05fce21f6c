// Copyright 2025 Lars Brubaker
// Read-only queries on a finished triangulation.

use std::collections::VecDeque;

use super::Triangulation;
use crate::error::{Result, TriangulationError};
use crate::geom::{lexicographic_higher, segment_intersection, Point, Real};
use crate::graph::{EdgeId, FaceId, PlanarGraph, VertexId, VertexRef, EXTERNAL_FACE};
use crate::locate::NodeId;

/// Hull vertices in counter-clockwise order, each paired with the half-edge
/// leaving it along the hull. Those half-edges lie in imaginary faces; their
/// twins lie in real ones.
///
/// For collinear input there are no real faces. The hull is then the two end
/// points of the line, each with the half-edge leaving it along the line.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConvexHull {
    vertices: Vec<VertexId>,
    edges: Vec<EdgeId>,
}

impl ConvexHull {
    pub fn vertices(&self) -> &[VertexId] {
        &self.vertices
    }

    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn points(&self, graph: &PlanarGraph) -> Result<Vec<Point>> {
        self.vertices.iter().map(|&v| graph.vertex_point(v)).collect()
    }
}

/// Walks the boundary between real and imaginary faces.
pub(crate) fn compute_hull(graph: &PlanarGraph) -> Result<ConvexHull> {
    let n = graph.num_vertices();
    if n == 0 {
        return Ok(ConvexHull::default());
    }
    if n == 1 {
        return Ok(ConvexHull {
            vertices: vec![VertexId(0)],
            edges: Vec::new(),
        });
    }

    let guard = graph.num_edges() + 1;
    let broken = || TriangulationError::InconsistentGraph("hull walk does not close".into());

    // v0 is the highest point, so its edge towards the second point at
    // infinity is followed (backwards) by the hull edge arriving at v0.
    let v0 = VertexRef::Real(VertexId(0));
    let mut e = graph.vertex_edge(VertexId(0))?.ok_or_else(broken)?;
    let mut steps = 0;
    while !(graph.origin(e)? == v0 && graph.dest(e)? == VertexRef::AtInfinitySecond) {
        e = graph.twin(graph.prev(e)?)?;
        steps += 1;
        if steps > guard {
            return Err(broken());
        }
    }
    let first = graph.prev(e)?;

    let mut hull = ConvexHull::default();
    e = first;
    for _ in 0..guard {
        let v = graph.origin(e)?.real().ok_or_else(broken)?;
        hull.vertices.push(v);
        hull.edges.push(e);
        e = graph.prev(graph.twin(graph.prev(e)?)?)?;
        if graph.origin(e)?.is_phantom() {
            e = graph.prev(graph.twin(e)?)?;
        }
        if e == first {
            tracing::trace!(len = hull.len(), "hull closed");
            return collapse_collinear(graph, hull);
        }
    }
    Err(broken())
}

/// On a line the walk goes out and back, visiting the inner points twice.
/// Only the two turning points are kept.
fn collapse_collinear(graph: &PlanarGraph, hull: ConvexHull) -> Result<ConvexHull> {
    for &e in &hull.edges {
        if !graph.is_imaginary_face(graph.face(graph.twin(e)?)?)? {
            return Ok(hull);
        }
    }
    let mut low: Option<(usize, Point)> = None;
    let mut high: Option<(usize, Point)> = None;
    for (i, &v) in hull.vertices.iter().enumerate() {
        let p = graph.vertex_point(v)?;
        if low.map_or(true, |(_, q)| lexicographic_higher(&q, &p)) {
            low = Some((i, p));
        }
        if high.map_or(true, |(_, q)| lexicographic_higher(&p, &q)) {
            high = Some((i, p));
        }
    }
    let mut keep: Vec<usize> = low.into_iter().chain(high).map(|(i, _)| i).collect();
    keep.sort_unstable();
    keep.dedup();
    Ok(ConvexHull {
        vertices: keep.iter().map(|&i| hull.vertices[i]).collect(),
        edges: keep.iter().map(|&i| hull.edges[i]).collect(),
    })
}

impl Triangulation {
    pub fn convex_hull(&self) -> &ConvexHull {
        &self.hull
    }

    pub fn convex_hull_points(&self) -> Result<Vec<Point>> {
        self.hull.points(&self.graph)
    }

    /// Leaf of the location index whose triangle contains `p`.
    pub fn locate(&self, p: &Point) -> Result<NodeId> {
        self.index.locate(&self.graph, p)
    }

    /// The real face containing `p`, or EXTERNAL_FACE when `p` falls in a
    /// triangle with a point at infinity as corner.
    pub fn find_face(&self, p: &Point) -> Result<FaceId> {
        let leaf = self.locate(p)?;
        let face = self.index.node(leaf)?.face;
        if self.graph.is_imaginary_face(face)? {
            Ok(EXTERNAL_FACE)
        } else {
            Ok(face)
        }
    }

    pub fn is_inside_hull(&self, p: &Point) -> Result<bool> {
        Ok(self.find_face(p)? != EXTERNAL_FACE)
    }

    /// Real faces crossed by the segment `from -> to`, in order.
    ///
    /// Endpoints outside the hull are clipped to the hull first. A segment
    /// that misses the hull entirely yields an empty path.
    pub fn find_path(&self, from: &Point, to: &Point) -> Result<Vec<FaceId>> {
        let start = self.find_face(from)?;
        let end = self.find_face(to)?;
        if start != EXTERNAL_FACE && end != EXTERNAL_FACE {
            return self.graph.find_path(start, end, from, to);
        }

        let crossings = self.hull_crossings(from, to)?;
        let (Some(&(t_first, face_first)), Some(&(_, face_last))) =
            (crossings.first(), crossings.last())
        else {
            return Ok(Vec::new());
        };

        let (start, t) = if start == EXTERNAL_FACE {
            (face_first, t_first)
        } else {
            (start, 0.0)
        };
        let end = if end == EXTERNAL_FACE { face_last } else { end };
        self.graph.walk_segment(start, end, from, to, None, t)
    }

    /// Where the segment crosses the hull, as (parameter, real face inside
    /// the crossed hull edge), sorted along the segment. Empty when there are
    /// no real faces.
    fn hull_crossings(&self, from: &Point, to: &Point) -> Result<Vec<(Real, FaceId)>> {
        let mut out = Vec::new();
        for &e in self.hull.edges() {
            let inside = self.graph.face(self.graph.twin(e)?)?;
            if self.graph.is_imaginary_face(inside)? {
                continue;
            }
            let Some((a, b)) = self.graph.edge_points(e)? else {
                continue;
            };
            if let Some(t) = segment_intersection(from, to, &a, &b) {
                out.push((t, inside));
            }
        }
        out.sort_by(|l, r| l.0.total_cmp(&r.0));
        Ok(out)
    }

    /// The stored vertex nearest to `p`.
    ///
    /// Starts from the corners of the triangle containing `p` and walks
    /// outwards until it reaches a vertex none of whose neighbours is closer.
    /// In a Delaunay triangulation that vertex's Voronoi cell contains `p`.
    pub fn find_closest_point(&self, p: &Point) -> Result<(VertexId, Point)> {
        let leaf = self.locate(p)?;
        let corners = self.index.node(leaf)?.vertices;

        let mut seen = vec![false; self.graph.num_vertices()];
        let mut queue = VecDeque::new();
        for v in corners.iter().filter_map(|c| c.real()) {
            if !seen[v.0] {
                seen[v.0] = true;
                queue.push_back(v);
            }
        }

        while let Some(v) = queue.pop_front() {
            let here = self.graph.vertex_point(v)?;
            let d = here.distance_squared(p);
            let neighbors = self.neighbors(v)?;
            let mut local_min = true;
            for &w in &neighbors {
                if self.graph.vertex_point(w)?.distance_squared(p) < d {
                    local_min = false;
                }
            }
            if local_min {
                return Ok((v, here));
            }
            for w in neighbors {
                if !seen[w.0] {
                    seen[w.0] = true;
                    queue.push_back(w);
                }
            }
        }
        Err(TriangulationError::InconsistentGraph(format!(
            "no vertex is nearest to ({}, {})",
            p.x, p.y
        )))
    }

    /// The closest pair of stored vertices, smaller id first. The pair is
    /// always joined by an edge, so only edges are scanned.
    pub fn find_two_closest(&self) -> Result<Option<(VertexId, VertexId)>> {
        let mut best: Option<(Real, VertexId, VertexId)> = None;
        for i in 0..self.graph.num_vertices() {
            let v = VertexId(i);
            let pv = self.graph.vertex_point(v)?;
            for w in self.neighbors(v)? {
                if w <= v {
                    continue;
                }
                let d = pv.distance_squared(&self.graph.vertex_point(w)?);
                if best.map_or(true, |(bd, _, _)| d < bd) {
                    best = Some((d, v, w));
                }
            }
        }
        Ok(best.map(|(_, v, w)| (v, w)))
    }
}
