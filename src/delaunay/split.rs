// Copyright 2025 Lars Brubaker
// Splitting located triangles around a newly inserted vertex.

use super::DelaunayBuilder;
use crate::error::{Result, TriangulationError};
use crate::geom::Turn;
use crate::graph::{EdgeId, EdgeUpdate, FaceId, VertexId, VertexRef};
use crate::locate::{LocationNode, NodeId};

/// Update setting prev/next and optionally the face of a half-edge.
fn relink(prev: EdgeId, next: EdgeId, face: Option<FaceId>) -> EdgeUpdate {
    EdgeUpdate {
        prev: Some(prev),
        next: Some(next),
        face,
        ..Default::default()
    }
}

impl DelaunayBuilder {
    /// Splits the leaf triangle (a, b, c) into (p, a, b), (p, b, c), (p, c, a).
    ///
    /// Two new edge pairs connect p to the corners. The old face id stays
    /// with the sub-triangle on the face's representative edge; the other two
    /// get fresh faces.
    pub(crate) fn split_in_three(&mut self, v: VertexId, node: NodeId) -> Result<()> {
        let p = VertexRef::Real(v);
        let face = self.index.node(node)?.face;
        let g = &mut self.graph;

        let n = g.num_edges();
        let e = |k: usize| EdgeId(n + k);
        let fb = FaceId(g.num_faces());
        let fc = FaceId(g.num_faces() + 1);

        let ab = g.face_edge(face)?;
        let bc = g.next(ab)?;
        let ca = g.prev(ab)?;
        let a = g.origin(ab)?;
        let b = g.origin(bc)?;
        let c = g.origin(ca)?;

        g.add_edge(p, e(5), e(1), ab, face)?; // p -> a
        g.add_edge(b, e(2), ab, e(0), face)?; // b -> p
        g.add_edge(p, e(1), e(3), bc, fb)?; // p -> b
        g.add_edge(c, e(4), bc, e(2), fb)?; // c -> p
        g.add_edge(p, e(3), e(5), ca, fc)?; // p -> c
        g.add_edge(a, e(0), ca, e(4), fc)?; // a -> p
        g.update_vertex_edge(e(0), v)?;

        g.update_edge(relink(e(0), e(1), None), ab)?;
        g.update_edge(relink(e(2), e(3), Some(fb)), bc)?;
        g.update_edge(relink(e(4), e(5), Some(fc)), ca)?;
        g.add_face(e(2))?;
        g.add_face(e(4))?;

        let mut children = [
            ([b, p, a], face),
            ([c, p, b], fb),
            ([a, p, c], fc),
        ]
        .map(|(corners, f)| (corners, f, 0.0));
        for child in children.iter_mut() {
            let [x, y, z] = child.0;
            child.2 = g.signed_area(x, y, z)?;
        }
        // Larger triangles first so descents hit them earlier.
        children.sort_by(|l, r| r.2.total_cmp(&l.2));

        let mut ids = [NodeId(0); 3];
        for (slot, (corners, f, _)) in ids.iter_mut().zip(children) {
            *slot = self.index.insert(LocationNode::new(corners, f))?;
        }
        self.index.set_children(node, &ids)?;

        self.legalize(&[ab, ca, bc])
    }

    /// The one edge of the face that `v` lies on.
    pub(crate) fn collinear_edge(&self, v: VertexId, face_edge: EdgeId) -> Result<EdgeId> {
        let g = &self.graph;
        let p = g.vertex_point(v)?;
        let prev = g.prev(face_edge)?;
        let next = g.next(face_edge)?;
        let mut hits = Vec::with_capacity(3);
        for e in [prev, face_edge, next] {
            if g.turn(&p, g.origin(e)?, g.dest(e)?)? == Turn::Collinear {
                hits.push(e);
            }
        }
        match hits.as_slice() {
            [e] => Ok(*e),
            [] => Err(TriangulationError::GeometricDegeneracy {
                vertex: v.0,
                reason: "point is neither inside nor on an edge of its triangle",
            }),
            _ => Err(TriangulationError::GeometricDegeneracy {
                vertex: v.0,
                reason: "point coincides with a triangle corner",
            }),
        }
    }

    /// Splits the edge a -> b that `v` lies on, together with the triangle on
    /// each side: (a, b, w) becomes (p, b, w) + (p, w, a) and the twin
    /// triangle (b, a, z) becomes (b, p, z) + (p, a, z).
    pub(crate) fn split_in_four(&mut self, v: VertexId, node: NodeId) -> Result<()> {
        let p = VertexRef::Real(v);
        let face = self.index.node(node)?.face;
        let face_edge = self.graph.face_edge(face)?;
        let ab = self.collinear_edge(v, face_edge)?;

        let g = &mut self.graph;
        let n = g.num_edges();
        let e = |k: usize| EdgeId(n + k);
        let f_wa = FaceId(g.num_faces());
        let f_az = FaceId(g.num_faces() + 1);

        let bw = g.next(ab)?;
        let wa = g.prev(ab)?;
        let ba = g.twin(ab)?;
        let az = g.next(ba)?;
        let zb = g.prev(ba)?;
        let a = g.origin(ab)?;
        let b = g.origin(bw)?;
        let w = g.origin(wa)?;
        let z = g.origin(zb)?;
        let twin_face = g.face(ba)?;
        let old_near = self.index.node_for_face(face)?;
        let old_far = self.index.node_for_face(twin_face)?;

        // Near side: ab shrinks to p -> b.
        g.add_edge(w, e(1), bw, ab, face)?; // w -> p
        g.add_edge(p, e(0), e(2), wa, f_wa)?; // p -> w
        g.add_edge(a, e(3), wa, e(1), f_wa)?; // a -> p
        g.update_vertex_edge(e(1), v)?;
        if let VertexRef::Real(a_id) = a {
            if g.vertex_edge(a_id)? == Some(ab) {
                g.update_vertex_edge(e(2), a_id)?;
            }
        }
        g.update_face(e(0), face)?;
        g.update_edge(
            EdgeUpdate {
                origin: Some(p),
                prev: Some(e(0)),
                ..Default::default()
            },
            ab,
        )?;
        g.update_edge(
            EdgeUpdate {
                next: Some(e(0)),
                ..Default::default()
            },
            bw,
        )?;
        g.update_edge(relink(e(1), e(2), Some(f_wa)), wa)?;
        g.add_face(e(2))?;

        // Far side: ba shrinks to b -> p.
        g.add_edge(p, e(2), e(4), az, f_az)?; // p -> a
        g.add_edge(z, e(5), az, e(3), f_az)?; // z -> p
        g.add_edge(p, e(4), ba, zb, twin_face)?; // p -> z
        g.update_edge(relink(e(3), e(4), Some(f_az)), az)?;
        g.update_edge(
            EdgeUpdate {
                next: Some(e(5)),
                ..Default::default()
            },
            ba,
        )?;
        g.update_edge(
            EdgeUpdate {
                prev: Some(e(5)),
                ..Default::default()
            },
            zb,
        )?;
        g.update_face(ba, twin_face)?;
        g.add_face(e(4))?;

        let near_pb = self.index.insert(LocationNode::new([w, p, b], face))?;
        let near_wa = self.index.insert(LocationNode::new([w, a, p], f_wa))?;
        self.index.set_children(old_near, &[near_pb, near_wa])?;
        let far_bp = self.index.insert(LocationNode::new([z, b, p], twin_face))?;
        let far_pa = self.index.insert(LocationNode::new([p, a, z], f_az))?;
        self.index.set_children(old_far, &[far_bp, far_pa])?;

        self.legalize(&[bw, wa, zb, az])
    }
}
