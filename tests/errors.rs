// Copyright 2025 Lars Brubaker
// Input rejection and error reporting.

mod helpers;

use dcel_delaunay::{
    BuildOption, DelaunayBuilder, InsertionOrder, Real, Triangulation, TriangulationError,
};
use helpers::pt;

#[test]
fn empty_input() {
    assert_eq!(
        Triangulation::build(&[]).unwrap_err(),
        TriangulationError::EmptyInput
    );
}

#[test]
fn non_finite_coordinates() {
    let err = Triangulation::build(&[pt(0.0, 0.0), pt(1.0, 1.0), pt(2.0, Real::NAN)])
        .unwrap_err();
    assert_eq!(err, TriangulationError::InvalidCoordinate { index: 2 });

    let err = Triangulation::build(&[pt(Real::NEG_INFINITY, 0.0), pt(1.0, 1.0)]).unwrap_err();
    assert_eq!(err, TriangulationError::InvalidCoordinate { index: 0 });
}

#[test]
fn duplicates_are_reported_with_the_later_index() {
    let mut points = helpers::seeded_points(50, 40);
    points.push(points[17]);
    let err = Triangulation::build(&points).unwrap_err();
    assert_eq!(
        err,
        TriangulationError::GeometricDegeneracy {
            vertex: 50,
            reason: "duplicate point"
        }
    );
}

#[test]
fn negative_zero_is_a_duplicate_of_zero() {
    let err = Triangulation::build(&[pt(-0.0, 5.0), pt(-0.0, 7.0), pt(0.0, 5.0), pt(3.0, 1.0)])
        .unwrap_err();
    assert_eq!(
        err,
        TriangulationError::GeometricDegeneracy {
            vertex: 2,
            reason: "duplicate point"
        }
    );

    let err = Triangulation::build(&[pt(4.0, 0.0), pt(1.0, 2.0), pt(4.0, -0.0)]).unwrap_err();
    assert!(matches!(
        err,
        TriangulationError::GeometricDegeneracy { vertex: 2, .. }
    ));
}

#[test]
fn builder_is_reusable_after_a_failure() {
    let mut builder = DelaunayBuilder::new();
    builder.set_option(BuildOption::InsertionOrder(InsertionOrder::Shuffled { seed: 1 }));
    assert!(builder.build(&[pt(1.0, 1.0), pt(1.0, 1.0)]).is_err());

    let points = helpers::seeded_points(60, 41);
    let tri = builder.build(&points).unwrap();
    helpers::verify_all(&tri, &points);

    // A second build from the same builder starts from scratch.
    let again = builder.build(&points[..30]).unwrap();
    assert_eq!(again.num_vertices(), 30);
    helpers::verify_all(&again, &points[..30]);
}

#[test]
fn error_messages_are_readable() {
    assert_eq!(
        TriangulationError::InvalidCoordinate { index: 4 }.to_string(),
        "point 4 has a non-finite coordinate"
    );
    assert_eq!(
        TriangulationError::PathNotFound { from: 3, to: 9 }.to_string(),
        "no face path from face 3 to face 9"
    );
    assert_eq!(
        TriangulationError::GeometricDegeneracy {
            vertex: 2,
            reason: "duplicate point"
        }
        .to_string(),
        "geometric degeneracy at vertex 2: duplicate point"
    );
}

#[test]
fn errors_work_with_question_mark() {
    fn hull_len(points: &[dcel_delaunay::Point]) -> dcel_delaunay::Result<usize> {
        let tri = Triangulation::build(points)?;
        Ok(tri.convex_hull().len())
    }
    assert_eq!(hull_len(&[pt(0.0, 0.0), pt(4.0, 0.0), pt(0.0, 4.0)]), Ok(3));
    assert_eq!(hull_len(&[]), Err(TriangulationError::EmptyInput));
}
