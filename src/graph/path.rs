// Copyright 2025 Lars Brubaker
// Walking a segment through the faces of the graph.

use super::{EdgeId, FaceId, PlanarGraph, VertexId, VertexRef};
use crate::error::{Result, TriangulationError};
use crate::geom::{segment_intersection, Point, Real};

const CROSSING_EPS: Real = 1e-12;
/// Distance, relative to the segment length, under which a crossing is taken
/// to pass through a corner.
const CORNER_EPS: Real = 1e-9;

impl PlanarGraph {
    /// Ordered faces crossed by the segment `from -> to`, starting with
    /// `start_face` and ending with `end_face`. Consecutive faces share an edge.
    pub fn find_path(
        &self,
        start_face: FaceId,
        end_face: FaceId,
        from: &Point,
        to: &Point,
    ) -> Result<Vec<FaceId>> {
        self.walk_segment(start_face, end_face, from, to, None, 0.0)
    }

    /// Same walk, entering `start_face` through `entry` at parameter `t`.
    ///
    /// The walk never steps into an imaginary face. When the segment leaves a
    /// face through a corner it turns around that corner, over real faces
    /// only, into the face that carries the segment on.
    pub(crate) fn walk_segment(
        &self,
        start_face: FaceId,
        end_face: FaceId,
        from: &Point,
        to: &Point,
        mut entry: Option<EdgeId>,
        mut t: Real,
    ) -> Result<Vec<FaceId>> {
        let not_found = || TriangulationError::PathNotFound {
            from: start_face.0,
            to: end_face.0,
        };

        let mut path = vec![start_face];
        let mut face = start_face;
        let mut pivot = None;
        for _ in 0..=2 * self.faces.len() {
            if face == end_face {
                return Ok(path);
            }
            let (exit, t_exit) = self
                .exit_edge(face, from, to, entry, pivot, t)?
                .ok_or_else(not_found)?;
            t = t_exit;

            match self.corner_hit(exit, from, to, t)? {
                Some(v) => {
                    let target = self
                        .face_beyond_corner(v, from, to, t, end_face)?
                        .ok_or_else(not_found)?;
                    for f in self.fan_between(v, face, target)?.ok_or_else(not_found)? {
                        path.push(f);
                        if f == end_face {
                            return Ok(path);
                        }
                    }
                    face = target;
                    entry = None;
                    pivot = Some(v);
                }
                None => {
                    let across = self.twin(exit)?;
                    face = self.face(across)?;
                    path.push(face);
                    entry = Some(across);
                    pivot = None;
                }
            }
        }
        Err(not_found())
    }

    /// The edge of `face` through which the segment leaves it: the finite edge
    /// other than `entry` whose crossing lies furthest along the segment and
    /// not before `t_min`. Edges bordering an imaginary face only count when
    /// the crossing is at one of their corners.
    pub fn edge_intersection(
        &self,
        face: FaceId,
        from: &Point,
        to: &Point,
        entry: Option<EdgeId>,
        t_min: Real,
    ) -> Result<Option<(EdgeId, Real)>> {
        self.exit_edge(face, from, to, entry, None, t_min)
    }

    /// Edges touching `pivot` are skipped as well: the walk has just turned
    /// around that corner and only the opposite edge leads on.
    fn exit_edge(
        &self,
        face: FaceId,
        from: &Point,
        to: &Point,
        entry: Option<EdgeId>,
        pivot: Option<VertexId>,
        t_min: Real,
    ) -> Result<Option<(EdgeId, Real)>> {
        let pivot = pivot.map(VertexRef::Real);
        let start = self.face_edge(face)?;
        let mut best: Option<(EdgeId, Real)> = None;
        let mut e = start;
        for _ in 0..self.edges.len() {
            let skip = Some(e) == entry
                || (pivot.is_some()
                    && (Some(self.origin(e)?) == pivot || Some(self.dest(e)?) == pivot));
            if !skip {
                if let Some((a, b)) = self.edge_points(e)? {
                    if let Some(t) = segment_intersection(from, to, &a, &b) {
                        let further = best.map_or(true, |(_, bt)| t > bt);
                        if t >= t_min - CROSSING_EPS
                            && further
                            && self.can_leave_by(e, from, to, t)?
                        {
                            best = Some((e, t));
                        }
                    }
                }
            }
            e = self.next(e)?;
            if e == start {
                break;
            }
        }
        Ok(best)
    }

    /// An edge with an imaginary face beyond it is only left through one of
    /// its corners.
    fn can_leave_by(&self, e: EdgeId, from: &Point, to: &Point, t: Real) -> Result<bool> {
        if !self.is_imaginary_face(self.face(self.twin(e)?)?)? {
            return Ok(true);
        }
        Ok(self.corner_hit(e, from, to, t)?.is_some())
    }

    /// The endpoint of `e` the segment passes through at parameter `t`, if any.
    fn corner_hit(&self, e: EdgeId, from: &Point, to: &Point, t: Real) -> Result<Option<VertexId>> {
        let at = Point::new(from.x + t * (to.x - from.x), from.y + t * (to.y - from.y));
        let tol = CORNER_EPS * from.distance(to).max(1.0);
        for end in [self.origin(e)?, self.dest(e)?] {
            if let Some(v) = end.real() {
                if self.vertex_point(v)?.distance(&at) <= tol {
                    return Ok(Some(v));
                }
            }
        }
        Ok(None)
    }

    /// The real face around `v` whose corner at `v` contains the rest of the
    /// segment, preferring `end_face` on a tie. When the segment stops at `v`
    /// or leaves the real faces there, this is `end_face` if it touches `v`.
    fn face_beyond_corner(
        &self,
        v: VertexId,
        from: &Point,
        to: &Point,
        t: Real,
        end_face: FaceId,
    ) -> Result<Option<FaceId>> {
        let centre = self.vertex_point(v)?;
        let len = from.distance(to);
        let (dx, dy) = ((to.x - from.x) / len, (to.y - from.y) / len);
        let cross = |p: &Point| (p.x - centre.x) * dy - (p.y - centre.y) * dx;

        let around = self.outgoing_edges(v)?;
        let mut ahead = None;
        if t < 1.0 - CORNER_EPS && len > 0.0 {
            for &e in &around {
                let f = self.face(e)?;
                if self.is_imaginary_face(f)? {
                    continue;
                }
                let (Some(a), Some(c)) = (
                    self.point_of(self.dest(e)?)?,
                    self.point_of(self.origin(self.prev(e)?)?)?,
                ) else {
                    continue;
                };
                let tol_a = CORNER_EPS * a.distance(&centre).max(1.0);
                let tol_c = CORNER_EPS * c.distance(&centre).max(1.0);
                if cross(&a) >= -tol_a && cross(&c) <= tol_c {
                    // Running along an edge puts the segment in two faces.
                    if f == end_face {
                        return Ok(Some(f));
                    }
                    ahead = ahead.or(Some(f));
                }
            }
        }
        if ahead.is_some() {
            return Ok(ahead);
        }
        for &e in &around {
            if self.face(e)? == end_face {
                return Ok(Some(end_face));
            }
        }
        Ok(None)
    }

    /// Faces met turning around `v` from `from_face` to `to_face`, excluding
    /// the first and including the last. Of the two directions the shorter
    /// one that stays on real faces is taken.
    fn fan_between(
        &self,
        v: VertexId,
        from_face: FaceId,
        to_face: FaceId,
    ) -> Result<Option<Vec<FaceId>>> {
        let fan = self
            .outgoing_edges(v)?
            .into_iter()
            .map(|e| self.face(e))
            .collect::<Result<Vec<FaceId>>>()?;
        let n = fan.len();
        let (Some(i), Some(j)) = (
            fan.iter().position(|&f| f == from_face),
            fan.iter().position(|&f| f == to_face),
        ) else {
            return Ok(None);
        };

        let forward: Vec<FaceId> = (1..=(j + n - i) % n).map(|k| fan[(i + k) % n]).collect();
        let backward: Vec<FaceId> = (1..=(i + n - j) % n).map(|k| fan[(i + n - k) % n]).collect();
        let mut best: Option<Vec<FaceId>> = None;
        for side in [forward, backward] {
            let mut real = true;
            for &f in &side {
                if self.is_imaginary_face(f)? {
                    real = false;
                    break;
                }
            }
            if real && best.as_ref().map_or(true, |b| side.len() < b.len()) {
                best = Some(side);
            }
        }
        Ok(best)
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::square;
    use super::*;
    use crate::graph::EXTERNAL_FACE;

    #[test]
    fn crosses_the_diagonal() {
        let g = square();
        let path = g
            .find_path(FaceId(1), FaceId(2), &Point::new(0.8, 0.2), &Point::new(0.2, 0.8))
            .unwrap();
        assert_eq!(path, vec![FaceId(1), FaceId(2)]);
    }

    #[test]
    fn same_face_is_a_single_step() {
        let g = square();
        let path = g
            .find_path(FaceId(1), FaceId(1), &Point::new(0.8, 0.2), &Point::new(0.9, 0.5))
            .unwrap();
        assert_eq!(path, vec![FaceId(1)]);
    }

    #[test]
    fn unreachable_face_is_reported() {
        let g = square();
        let err = g
            .find_path(FaceId(1), EXTERNAL_FACE, &Point::new(0.8, 0.2), &Point::new(0.2, 0.8))
            .unwrap_err();
        assert_eq!(err, TriangulationError::PathNotFound { from: 1, to: 0 });
    }

    #[test]
    fn segment_along_the_diagonal_crosses_it() {
        let g = square();
        let path = g
            .find_path(FaceId(1), FaceId(2), &Point::new(0.2, 0.2), &Point::new(0.8, 0.8))
            .unwrap();
        assert_eq!(path, vec![FaceId(1), FaceId(2)]);
    }

    #[test]
    fn segment_ending_on_a_corner_turns_around_it() {
        let g = square();
        // v0 touches f1, f2 and the outer face; the turn stays on real faces.
        let path = g
            .find_path(FaceId(1), FaceId(2), &Point::new(0.6, 0.2), &Point::new(0.0, 0.0))
            .unwrap();
        assert_eq!(path, vec![FaceId(1), FaceId(2)]);
    }

    #[test]
    fn outer_edges_are_not_exits() {
        let g = square();
        let hit = g
            .edge_intersection(FaceId(1), &Point::new(0.5, 0.2), &Point::new(1.5, 0.4), None, 0.0)
            .unwrap();
        assert_eq!(hit, None);
    }

    #[test]
    fn exit_edge_is_the_diagonal() {
        let g = square();
        let hit = g
            .edge_intersection(FaceId(1), &Point::new(0.8, 0.2), &Point::new(0.2, 0.8), None, 0.0)
            .unwrap();
        assert_eq!(hit.map(|(e, _)| e), Some(EdgeId(2)));
    }
}
