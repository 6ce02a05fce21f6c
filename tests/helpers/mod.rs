// Copyright 2025 Lars Brubaker
// Shared test utilities for dcel-delaunay tests.

#![allow(dead_code)]

use dcel_delaunay::geom::{in_circle, signed_area};
use dcel_delaunay::points::random_points;
use dcel_delaunay::{FaceId, Point, Real, Triangulation, VertexId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub fn pt(x: Real, y: Real) -> Point {
    Point::new(x, y)
}

/// Reproducible uniform points.
pub fn seeded_points(n: usize, seed: u64) -> Vec<Point> {
    random_points(n, &mut StdRng::seed_from_u64(seed))
}

/// Distinct integer points on a small grid, so plenty of collinear and
/// co-circular quadruples show up.
pub fn grid_points(n: usize, side: i32, seed: u64) -> Vec<Point> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut out: Vec<Point> = Vec::with_capacity(n);
    while out.len() < n {
        let p = pt(
            rng.random_range(0..side) as Real,
            rng.random_range(0..side) as Real,
        );
        if !out.contains(&p) {
            out.push(p);
        }
    }
    out
}

/// Stored vertex sitting at `p`.
pub fn vertex_at(tri: &Triangulation, p: &Point) -> VertexId {
    (0..tri.num_vertices())
        .map(VertexId)
        .find(|&v| tri.vertex_coord(v).unwrap() == *p)
        .unwrap_or_else(|| panic!("no vertex at ({}, {})", p.x, p.y))
}

pub fn triangle_points(tri: &Triangulation, corners: [VertexId; 3]) -> [Point; 3] {
    corners.map(|v| tri.vertex_coord(v).unwrap())
}

pub fn brute_nearest_distance(points: &[Point], p: &Point) -> Real {
    points
        .iter()
        .map(|q| q.distance(p))
        .fold(Real::INFINITY, Real::min)
}

pub fn brute_closest_pair_distance(points: &[Point]) -> Real {
    let mut best = Real::INFINITY;
    for i in 0..points.len() {
        for j in i + 1..points.len() {
            best = best.min(points[i].distance(&points[j]));
        }
    }
    best
}

/// Structural consistency, including V - E + F = 2.
pub fn verify_graph(tri: &Triangulation) {
    let g = tri.graph();
    g.validate().unwrap();
    assert_eq!(g.euler_characteristic(), 2);
    assert_eq!(g.num_vertices(), tri.num_vertices());
}

/// Every live triangle is counter-clockwise and its circumcircle holds no
/// other input point.
pub fn verify_delaunay(tri: &Triangulation, points: &[Point]) {
    for (face, corners) in tri.live_triangles().unwrap() {
        let [a, b, c] = triangle_points(tri, corners);
        assert!(
            signed_area(&a, &b, &c) > 0.0,
            "{face} is not counter-clockwise"
        );
        for q in points {
            if *q == a || *q == b || *q == c {
                continue;
            }
            assert!(
                !in_circle(&a, &b, &c, q),
                "({}, {}) lies inside the circumcircle of {face}",
                q.x,
                q.y
            );
        }
    }
}

/// The hull is closed, turns left everywhere and keeps every input point on
/// its inner side.
pub fn verify_hull(tri: &Triangulation, points: &[Point]) {
    let hull = tri.convex_hull_points().unwrap();
    assert_eq!(hull.len(), tri.convex_hull().edges().len());
    assert!(hull.len() <= points.len());
    for i in 0..hull.len() {
        let a = hull[i];
        let b = hull[(i + 1) % hull.len()];
        let scale = a.distance(&b).max(1.0);
        for q in points {
            assert!(
                signed_area(&a, &b, q) >= -1e-9 * scale,
                "({}, {}) is outside hull edge ({}, {}) -> ({}, {})",
                q.x,
                q.y,
                a.x,
                a.y,
                b.x,
                b.y
            );
        }
    }
}

/// Every stored vertex locates to a leaf whose triangle contains it.
pub fn verify_location(tri: &Triangulation) {
    let index = tri.location_index();
    for v in 0..tri.num_vertices() {
        let p = tri.vertex_coord(VertexId(v)).unwrap();
        let leaf = tri.locate(&p).unwrap();
        assert!(index.is_leaf(leaf).unwrap());
        assert!(index.is_interior(tri.graph(), &p, leaf).unwrap());
    }
}

pub fn verify_all(tri: &Triangulation, points: &[Point]) {
    verify_graph(tri);
    verify_delaunay(tri, points);
    verify_hull(tri, points);
    verify_location(tri);
}

/// True if faces `a` and `b` share an edge.
pub fn adjacent(tri: &Triangulation, a: FaceId, b: FaceId) -> bool {
    let g = tri.graph();
    let start = g.face_edge(a).unwrap();
    let mut e = start;
    loop {
        if g.face(g.twin(e).unwrap()).unwrap() == b {
            return true;
        }
        e = g.next(e).unwrap();
        if e == start {
            return false;
        }
    }
}

/// True if `p` is inside or on the real face `f`.
pub fn face_contains(tri: &Triangulation, f: FaceId, p: &Point) -> bool {
    let Some([a, b, c]) = tri.graph().face_points(f).unwrap() else {
        return false;
    };
    let tol = -1e-9;
    signed_area(&a, &b, p) >= tol && signed_area(&b, &c, p) >= tol && signed_area(&c, &a, p) >= tol
}
