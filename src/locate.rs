// Copyright 2025 Lars Brubaker
// History DAG used for point location.
//
// Every triangle the triangulation ever had is a node. Live faces are leaves;
// a split or flip turns the affected leaves into internal nodes whose
// children cover exactly the same area. Nodes are append-only, so a child
// always has a larger id than its parent and a descent always terminates.

use std::fmt;

use crate::error::{Result, TriangulationError};
use crate::geom::{Point, Turn};
use crate::graph::{out_of_range, FaceId, PlanarGraph, VertexRef};

/// Index into the node arena. NodeId(0) is the root.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

pub const ROOT_NODE: NodeId = NodeId(0);

const MAX_CHILDREN: usize = 3;

/// A triangle descriptor: corners in counter-clockwise order, the face it
/// occupies (or occupied) and up to three children.
#[derive(Clone, Debug, PartialEq)]
pub struct LocationNode {
    pub vertices: [VertexRef; 3],
    pub face: FaceId,
    children: [NodeId; MAX_CHILDREN],
    n_children: usize,
}

impl LocationNode {
    pub fn new(vertices: [VertexRef; 3], face: FaceId) -> Self {
        LocationNode {
            vertices,
            face,
            children: [ROOT_NODE; MAX_CHILDREN],
            n_children: 0,
        }
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.n_children == 0
    }

    #[inline]
    pub fn children(&self) -> &[NodeId] {
        &self.children[..self.n_children]
    }
}

#[derive(Clone, Debug, Default)]
pub struct LocationIndex {
    nodes: Vec<LocationNode>,
    /// Live leaf of each face, indexed by face id.
    face_leaf: Vec<Option<NodeId>>,
}

impl LocationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(n_nodes: usize, n_faces: usize) -> Self {
        LocationIndex {
            nodes: Vec::with_capacity(n_nodes),
            face_leaf: Vec::with_capacity(n_faces),
        }
    }

    pub fn reset(&mut self) {
        self.nodes.clear();
        self.face_leaf.clear();
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[LocationNode] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> Result<&LocationNode> {
        self.nodes
            .get(id.0)
            .ok_or_else(|| out_of_range("node", id.0, self.nodes.len()))
    }

    /// Appends a leaf and records it as the live leaf of its face.
    pub fn insert(&mut self, node: LocationNode) -> Result<NodeId> {
        let id = NodeId(self.nodes.len());
        let face = node.face.0;
        if face >= self.face_leaf.len() {
            let extra = face + 1 - self.face_leaf.len();
            self.face_leaf
                .try_reserve(extra)
                .map_err(|_| TriangulationError::AllocationFailure { what: "face map" })?;
            self.face_leaf.resize(face + 1, None);
        }
        self.nodes
            .try_reserve(1)
            .map_err(|_| TriangulationError::AllocationFailure { what: "nodes" })?;
        self.nodes.push(node);
        self.face_leaf[face] = Some(id);
        Ok(id)
    }

    /// Turns a leaf into an internal node with the given children.
    pub fn set_children(&mut self, id: NodeId, children: &[NodeId]) -> Result<()> {
        if children.len() > MAX_CHILDREN {
            return Err(out_of_range("child", children.len(), MAX_CHILDREN));
        }
        let len = self.nodes.len();
        if let Some(bad) = children.iter().find(|c| c.0 >= len) {
            return Err(out_of_range("node", bad.0, len));
        }
        let node = self
            .nodes
            .get_mut(id.0)
            .ok_or_else(|| out_of_range("node", id.0, len))?;
        if !node.is_leaf() {
            return Err(TriangulationError::InconsistentGraph(format!(
                "{id} already has children"
            )));
        }
        node.children[..children.len()].copy_from_slice(children);
        node.n_children = children.len();
        Ok(())
    }

    /// The leaf currently holding `face`.
    pub fn node_for_face(&self, face: FaceId) -> Result<NodeId> {
        self.face_leaf
            .get(face.0)
            .copied()
            .flatten()
            .ok_or_else(|| out_of_range("face", face.0, self.face_leaf.len()))
    }

    pub fn is_leaf(&self, id: NodeId) -> Result<bool> {
        Ok(self.node(id)?.is_leaf())
    }

    pub fn child_count(&self, id: NodeId) -> Result<usize> {
        Ok(self.node(id)?.n_children)
    }

    pub fn child(&self, id: NodeId, i: usize) -> Result<NodeId> {
        let node = self.node(id)?;
        node.children()
            .get(i)
            .copied()
            .ok_or_else(|| out_of_range("child", i, node.n_children))
    }

    /// True if `p` is inside the node's triangle or on its boundary.
    pub fn is_interior(&self, graph: &PlanarGraph, p: &Point, id: NodeId) -> Result<bool> {
        let [a, b, c] = self.node(id)?.vertices;
        for (s, d) in [(a, b), (b, c), (c, a)] {
            if graph.turn(p, s, d)? == Turn::Right {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// True if `p` turns strictly left of all three edges.
    pub fn is_strictly_interior(&self, graph: &PlanarGraph, p: &Point, id: NodeId) -> Result<bool> {
        let [a, b, c] = self.node(id)?.vertices;
        for (s, d) in [(a, b), (b, c), (c, a)] {
            if graph.turn(p, s, d)? != Turn::Left {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Walks from the root to the leaf containing `p`.
    pub fn locate(&self, graph: &PlanarGraph, p: &Point) -> Result<NodeId> {
        if self.nodes.is_empty() {
            return Err(out_of_range("node", 0, 0));
        }
        let mut current = ROOT_NODE;
        loop {
            let node = self.node(current)?;
            if node.is_leaf() {
                return Ok(current);
            }
            let mut found = None;
            for &child in node.children() {
                if self.is_interior(graph, p, child)? {
                    found = Some(child);
                    break;
                }
            }
            match found {
                Some(child) => current = child,
                None => {
                    tracing::debug!(node = %current, x = p.x, y = p.y, "no child contains point");
                    return Err(TriangulationError::LocationFailure { x: p.x, y: p.y });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::VertexId;

    fn real(i: usize) -> VertexRef {
        VertexRef::Real(VertexId(i))
    }

    fn triangle_graph() -> PlanarGraph {
        let mut g = PlanarGraph::new();
        g.add_vertex(Point::new(0.0, 0.0)).unwrap();
        g.add_vertex(Point::new(4.0, 0.0)).unwrap();
        g.add_vertex(Point::new(0.0, 4.0)).unwrap();
        g.add_vertex(Point::new(1.0, 1.0)).unwrap();
        g
    }

    #[test]
    fn insert_tracks_live_leaf_per_face() {
        let mut idx = LocationIndex::new();
        let root = idx.insert(LocationNode::new([real(0), real(1), real(2)], FaceId(1))).unwrap();
        assert_eq!(idx.node_for_face(FaceId(1)).unwrap(), root);
        let again = idx.insert(LocationNode::new([real(0), real(1), real(3)], FaceId(1))).unwrap();
        assert_eq!(idx.node_for_face(FaceId(1)).unwrap(), again);
        assert!(idx.node_for_face(FaceId(2)).is_err());
    }

    #[test]
    fn set_children_only_on_leaves() {
        let mut idx = LocationIndex::new();
        let root = idx.insert(LocationNode::new([real(0), real(1), real(2)], FaceId(1))).unwrap();
        let a = idx.insert(LocationNode::new([real(3), real(0), real(1)], FaceId(1))).unwrap();
        let b = idx.insert(LocationNode::new([real(3), real(1), real(2)], FaceId(2))).unwrap();
        let c = idx.insert(LocationNode::new([real(3), real(2), real(0)], FaceId(3))).unwrap();
        idx.set_children(root, &[a, b, c]).unwrap();

        assert!(!idx.is_leaf(root).unwrap());
        assert_eq!(idx.child_count(root).unwrap(), 3);
        assert_eq!(idx.child(root, 1).unwrap(), b);
        assert!(idx.child(root, 3).is_err());
        assert!(idx.set_children(root, &[a]).is_err());
        assert!(idx.set_children(a, &[NodeId(42)]).is_err());
    }

    #[test]
    fn locate_descends_to_containing_leaf() {
        let g = triangle_graph();
        let mut idx = LocationIndex::new();
        let root = idx.insert(LocationNode::new([real(0), real(1), real(2)], FaceId(1))).unwrap();
        let a = idx.insert(LocationNode::new([real(3), real(0), real(1)], FaceId(1))).unwrap();
        let b = idx.insert(LocationNode::new([real(3), real(1), real(2)], FaceId(2))).unwrap();
        let c = idx.insert(LocationNode::new([real(3), real(2), real(0)], FaceId(3))).unwrap();
        idx.set_children(root, &[a, b, c]).unwrap();

        assert_eq!(idx.locate(&g, &Point::new(2.0, 0.5)).unwrap(), a);
        assert_eq!(idx.locate(&g, &Point::new(2.0, 1.5)).unwrap(), b);
        assert_eq!(idx.locate(&g, &Point::new(0.2, 2.0)).unwrap(), c);
    }

    #[test]
    fn locate_outside_every_child_fails() {
        let g = triangle_graph();
        let mut idx = LocationIndex::new();
        let root = idx.insert(LocationNode::new([real(0), real(1), real(2)], FaceId(1))).unwrap();
        let a = idx.insert(LocationNode::new([real(3), real(0), real(1)], FaceId(1))).unwrap();
        idx.set_children(root, &[a]).unwrap();
        assert_eq!(
            idx.locate(&g, &Point::new(0.2, 3.0)),
            Err(TriangulationError::LocationFailure { x: 0.2, y: 3.0 })
        );
    }

    #[test]
    fn boundary_points_are_interior_but_not_strictly() {
        let g = triangle_graph();
        let mut idx = LocationIndex::new();
        let root = idx.insert(LocationNode::new([real(0), real(1), real(2)], FaceId(1))).unwrap();
        let on_edge = Point::new(2.0, 0.0);
        assert!(idx.is_interior(&g, &on_edge, root).unwrap());
        assert!(!idx.is_strictly_interior(&g, &on_edge, root).unwrap());
        assert!(idx.is_strictly_interior(&g, &Point::new(1.0, 1.0), root).unwrap());
    }
}
