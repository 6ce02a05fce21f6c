// Copyright 2025 Lars Brubaker
// Flat array dump/load of built graphs.

mod helpers;

use dcel_delaunay::graph::EdgeUpdate;
use dcel_delaunay::{
    BuildOption, DelaunayBuilder, EdgeId, FaceId, PlanarGraph, Triangulation, TriangulationError,
    VertexId,
};

#[test]
fn built_graph_survives_dump_and_load() {
    let points = helpers::seeded_points(120, 30);
    let tri = Triangulation::build(&points).unwrap();
    let arrays = tri.graph().dump();
    assert_eq!(arrays.vertices.len(), points.len());
    assert_eq!(arrays.edges.len(), tri.graph().num_edges());
    assert_eq!(arrays.faces.len(), tri.graph().num_faces());

    let loaded = PlanarGraph::load(arrays).unwrap();
    assert_eq!(&loaded, tri.graph());
    loaded.validate().unwrap();
}

#[test]
fn custom_collinear_epsilon_survives_dump_and_load() {
    let mut builder = DelaunayBuilder::new();
    builder.set_option(BuildOption::CollinearEpsilon(1e-3));
    let tri = builder.build(&helpers::seeded_points(50, 35)).unwrap();
    let arrays = tri.graph().dump();
    assert_eq!(arrays.epsilon, 1e-3);
    let loaded = PlanarGraph::load(arrays).unwrap();
    assert_eq!(loaded.epsilon(), 1e-3);
}

#[test]
fn loaded_graph_answers_navigation() {
    let tri = Triangulation::build(&helpers::seeded_points(40, 31)).unwrap();
    let loaded = PlanarGraph::load(tri.graph().dump()).unwrap();
    for e in 0..loaded.num_edges() {
        let e = EdgeId(e);
        assert_eq!(loaded.twin(e).unwrap(), tri.twin(e).unwrap());
        assert_eq!(loaded.next(e).unwrap(), tri.next(e).unwrap());
        assert_eq!(loaded.prev(e).unwrap(), tri.prev(e).unwrap());
        assert_eq!(loaded.origin(e).unwrap(), tri.origin(e).unwrap());
        assert_eq!(loaded.face(e).unwrap(), tri.face(e).unwrap());
    }
}

#[test]
fn load_rejects_out_of_range_references() {
    let tri = Triangulation::build(&helpers::seeded_points(10, 32)).unwrap();

    let mut arrays = tri.graph().dump();
    let ne = arrays.edges.len();
    arrays.edges[5].next = EdgeId(ne + 3);
    assert_eq!(
        PlanarGraph::load(arrays),
        Err(TriangulationError::IndexOutOfRange {
            kind: "edge",
            index: ne + 3,
            len: ne
        })
    );

    let mut arrays = tri.graph().dump();
    arrays.vertices.truncate(3);
    assert!(matches!(
        PlanarGraph::load(arrays),
        Err(TriangulationError::IndexOutOfRange { kind: "vertex", .. })
    ));

    let mut arrays = tri.graph().dump();
    let nf = arrays.faces.len();
    arrays.faces.truncate(nf - 1);
    assert!(matches!(
        PlanarGraph::load(arrays),
        Err(TriangulationError::IndexOutOfRange { kind: "face", .. })
    ));
}

#[test]
fn validate_catches_broken_links() {
    let tri = Triangulation::build(&helpers::seeded_points(30, 33)).unwrap();
    let mut g = tri.into_graph();
    let e = EdgeId(7);
    let wrong = g.next(g.next(e).unwrap()).unwrap();
    g.update_edge(
        EdgeUpdate {
            next: Some(wrong),
            ..Default::default()
        },
        e,
    )
    .unwrap();
    assert!(matches!(
        g.validate(),
        Err(TriangulationError::InconsistentGraph(_))
    ));
}

#[test]
fn navigation_reports_bad_ids() {
    let tri = Triangulation::build(&helpers::seeded_points(5, 34)).unwrap();
    let g = tri.graph();
    assert!(matches!(
        g.face_edge(FaceId(g.num_faces())),
        Err(TriangulationError::IndexOutOfRange { kind: "face", .. })
    ));
    assert!(matches!(
        tri.vertex_coord(VertexId(5)),
        Err(TriangulationError::IndexOutOfRange { kind: "vertex", .. })
    ));
    assert!(tri.twin(EdgeId(g.num_edges())).is_err());
}
