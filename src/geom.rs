// Copyright 2025 Lars Brubaker
// Planar geometric primitives used by the triangulation.
//
// All predicates work on f64 coordinates. Orientation uses a fixed epsilon
// band around zero for collinearity; the in-circle test is a plain
// determinant sign.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub type Real = f64;

/// Absolute signed-area band inside which three points count as collinear.
pub const COLLINEAR_THRESHOLD: Real = 0.000001;

/// Tolerance for segment intersection parameters.
const PARAM_EPS: Real = 1e-12;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    pub x: Real,
    pub y: Real,
}

impl Point {
    #[inline]
    pub const fn new(x: Real, y: Real) -> Self {
        Point { x, y }
    }

    #[inline]
    pub fn distance_squared(&self, other: &Point) -> Real {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    #[inline]
    pub fn distance(&self, other: &Point) -> Real {
        self.distance_squared(other).sqrt()
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(Real, Real)> for Point {
    fn from((x, y): (Real, Real)) -> Self {
        Point::new(x, y)
    }
}

/// Direction of travel a -> b -> c.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Turn {
    Left,
    Right,
    Collinear,
}

/// Returns true if p is lexicographically higher than q: larger y first,
/// ties broken by larger x.
#[inline]
pub fn lexicographic_higher(p: &Point, q: &Point) -> bool {
    p.y > q.y || (p.y == q.y && p.x > q.x)
}

/// Twice the signed area of triangle (a, b, c). Positive when counter-clockwise.
#[inline]
pub fn signed_area(a: &Point, b: &Point, c: &Point) -> Real {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Classifies the turn a -> b -> c, treating |area| <= eps as collinear.
#[inline]
pub fn turn(a: &Point, b: &Point, c: &Point, eps: Real) -> Turn {
    let area = signed_area(a, b, c);
    if area > eps {
        Turn::Left
    } else if area < -eps {
        Turn::Right
    } else {
        Turn::Collinear
    }
}

/// In-circle determinant for counter-clockwise triangle (a, b, c) against q.
/// Positive when q lies strictly inside the circumcircle.
pub fn in_circle_det(a: &Point, b: &Point, c: &Point, q: &Point) -> Real {
    let adx = a.x - q.x;
    let ady = a.y - q.y;
    let bdx = b.x - q.x;
    let bdy = b.y - q.y;
    let cdx = c.x - q.x;
    let cdy = c.y - q.y;

    let ab_det = adx * bdy - bdx * ady;
    let bc_det = bdx * cdy - cdx * bdy;
    let ca_det = cdx * ady - adx * cdy;

    let a_lift = adx * adx + ady * ady;
    let b_lift = bdx * bdx + bdy * bdy;
    let c_lift = cdx * cdx + cdy * cdy;

    a_lift * bc_det + b_lift * ca_det + c_lift * ab_det
}

#[inline]
pub fn in_circle(a: &Point, b: &Point, c: &Point, q: &Point) -> bool {
    in_circle_det(a, b, c, q) > 0.0
}

/// Intersects segment a-b with segment c-d and returns the parameter t along
/// a-b of the crossing (a + t(b - a)), or None if they do not meet. Touching
/// endpoints count. For overlapping collinear segments the largest t of the
/// shared stretch is returned.
pub fn segment_intersection(a: &Point, b: &Point, c: &Point, d: &Point) -> Option<Real> {
    let rx = b.x - a.x;
    let ry = b.y - a.y;
    let sx = d.x - c.x;
    let sy = d.y - c.y;
    let qx = c.x - a.x;
    let qy = c.y - a.y;

    let denom = rx * sy - ry * sx;
    if denom.abs() <= PARAM_EPS {
        // Parallel: only collinear overlap can intersect.
        if (qx * ry - qy * rx).abs() > PARAM_EPS {
            return None;
        }
        let len2 = rx * rx + ry * ry;
        if len2 == 0.0 {
            return None;
        }
        let t0 = (qx * rx + qy * ry) / len2;
        let t1 = ((d.x - a.x) * rx + (d.y - a.y) * ry) / len2;
        let lo = t0.min(t1).max(0.0);
        let hi = t0.max(t1).min(1.0);
        return if lo <= hi + PARAM_EPS { Some(hi) } else { None };
    }

    let t = (qx * sy - qy * sx) / denom;
    let u = (qx * ry - qy * rx) / denom;
    let range = -PARAM_EPS..=1.0 + PARAM_EPS;
    if range.contains(&t) && range.contains(&u) {
        Some(t.clamp(0.0, 1.0))
    } else {
        None
    }
}
