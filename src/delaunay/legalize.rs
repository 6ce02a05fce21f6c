// Copyright 2025 Lars Brubaker
// Lawson legalization: edge checks and flips.

use super::DelaunayBuilder;
use crate::error::{Result, TriangulationError};
use crate::geom::{in_circle, turn, Turn};
use crate::graph::{EdgeId, EdgeUpdate, VertexRef};
use crate::locate::LocationNode;

impl DelaunayBuilder {
    /// Checks and flips edges until none of the affected ones is illegal.
    ///
    /// Each flip exposes the two edges across the quad from the new vertex;
    /// they go on a LIFO worklist so they are handled depth-first.
    pub(crate) fn legalize(&mut self, edges: &[EdgeId]) -> Result<()> {
        let mut stack: Vec<EdgeId> = edges.iter().rev().copied().collect();
        let max_flips = 4 * self.graph.num_edges() + 64;
        let mut flips = 0usize;

        while let Some(e) = stack.pop() {
            if !self.check_edge(e)? {
                continue;
            }
            let (first, second) = self.flip_edge(e)?;
            stack.push(second);
            stack.push(first);

            flips += 1;
            if flips > max_flips {
                return Err(TriangulationError::InconsistentGraph(format!(
                    "legalization did not settle after {flips} flips"
                )));
            }
        }
        Ok(())
    }

    /// True if `e` must be flipped.
    ///
    /// Edges on the external face are always legal, and so is any edge whose
    /// opposite corner on either side is a point at infinity. An edge with a
    /// point at infinity as endpoint is judged by the side the finite
    /// endpoint falls on relative to the line through the two opposite
    /// corners (higher one first); everything else uses the in-circle test.
    pub fn check_edge(&self, e: EdgeId) -> Result<bool> {
        let g = &self.graph;
        if g.is_external_edge(e)? {
            return Ok(false);
        }
        let twin = g.twin(e)?;
        let apex = g.point_of(g.origin(g.prev(e)?)?)?;
        let opposite = g.point_of(g.origin(g.prev(twin)?)?)?;
        let (Some(w), Some(z)) = (apex, opposite) else {
            return Ok(false);
        };

        match (g.origin(e)?, g.dest(e)?) {
            (VertexRef::Real(o), VertexRef::Real(d)) => {
                Ok(in_circle(&g.vertex_point(o)?, &g.vertex_point(d)?, &w, &z))
            }
            (VertexRef::Real(finite), phantom) | (phantom, VertexRef::Real(finite)) => {
                let common = g.vertex_point(finite)?;
                let (high, low) = if w.y < z.y { (z, w) } else { (w, z) };
                let flip_on = if phantom == VertexRef::AtInfinitySecond {
                    Turn::Left
                } else {
                    Turn::Right
                };
                Ok(turn(&high, &low, &common, g.epsilon()) == flip_on)
            }
            _ => Ok(false),
        }
    }

    /// Replaces diagonal u-v of quad (u, z, v, w) with z-w.
    ///
    /// Before: e = u -> v in (u, v, w), twin = v -> u in (v, u, z).
    /// After:  e = z -> w in (z, w, u), twin = w -> z in (w, z, v).
    /// Both old leaves get the two new triangles as children. Returns the two
    /// edges opposite w that now need checking.
    pub(crate) fn flip_edge(&mut self, e: EdgeId) -> Result<(EdgeId, EdgeId)> {
        let g = &mut self.graph;
        let t = g.twin(e)?;
        let en = g.next(e)?;
        let ep = g.prev(e)?;
        let tn = g.next(t)?;
        let tp = g.prev(t)?;
        let u = g.origin(e)?;
        let v = g.origin(en)?;
        let w = g.origin(ep)?;
        let z = g.origin(tp)?;
        let fa = g.face(e)?;
        let fb = g.face(t)?;
        let old_a = self.index.node_for_face(fa)?;
        let old_b = self.index.node_for_face(fb)?;

        tracing::trace!(edge = %e, %u, %v, %w, %z, "flipping edge");

        // u and v lose e and t as outgoing edges.
        g.update_vertex_ref_edge(tn, u)?;
        g.update_vertex_ref_edge(en, v)?;

        let set = |origin: Option<VertexRef>, prev, next, face| EdgeUpdate {
            origin,
            twin: None,
            prev: Some(prev),
            next: Some(next),
            face,
        };
        g.update_edge(set(Some(z), tn, ep, None), e)?;
        g.update_edge(set(None, e, tn, None), ep)?;
        g.update_edge(set(None, ep, e, Some(fa)), tn)?;
        g.update_edge(set(Some(w), en, tp, None), t)?;
        g.update_edge(set(None, t, en, None), tp)?;
        g.update_edge(set(None, tp, t, Some(fb)), en)?;
        g.update_face(e, fa)?;
        g.update_face(t, fb)?;

        let na = self.index.insert(LocationNode::new([u, z, w], fa))?;
        let nb = self.index.insert(LocationNode::new([v, w, z], fb))?;
        self.index.set_children(old_a, &[na, nb])?;
        self.index.set_children(old_b, &[na, nb])?;

        Ok((tn, tp))
    }
}
