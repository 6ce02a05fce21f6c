// Copyright 2025 Lars Brubaker
// Point-set sources and orderings applied before a build.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::geom::{lexicographic_higher, turn, Point, Real, Turn, COLLINEAR_THRESHOLD};

/// Upper bound (exclusive) of generated coordinates on both axes.
pub const MAX_COORD: Real = 10_000.0;

/// `n` points uniformly distributed over [0, MAX_COORD)².
pub fn random_points<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<Point> {
    (0..n)
        .map(|_| Point::new(rng.random_range(0.0..MAX_COORD), rng.random_range(0.0..MAX_COORD)))
        .collect()
}

/// `n` points grouped around `clusters` random centres. Each member sits in
/// a random quadrant of the `radius` box around its centre; the remainder of
/// `n / clusters` goes to the last cluster. The result is shuffled.
pub fn clustered_points<R: Rng + ?Sized>(
    n: usize,
    clusters: usize,
    radius: Real,
    rng: &mut R,
) -> Vec<Point> {
    let clusters = clusters.min(n);
    if clusters == 0 {
        return Vec::new();
    }
    let per_cluster = n / clusters;
    let mut out = Vec::with_capacity(n);

    for c in 0..clusters {
        let centre = Point::new(rng.random_range(0.0..MAX_COORD), rng.random_range(0.0..MAX_COORD));
        out.push(centre);
        let members = if c + 1 == clusters {
            n - out.len()
        } else {
            per_cluster.saturating_sub(1)
        };
        for _ in 0..members {
            out.push(around(&centre, radius, rng));
        }
    }

    out.shuffle(rng);
    out
}

fn around<R: Rng + ?Sized>(centre: &Point, radius: Real, rng: &mut R) -> Point {
    let dx = rng.random::<Real>() * radius;
    let dy = rng.random::<Real>() * radius;
    match rng.random_range(0..4) {
        0 => Point::new(centre.x - dx, centre.y - dy),
        1 => Point::new(centre.x - dx, centre.y + dy),
        2 => Point::new(centre.x + dx, centre.y - dy),
        _ => Point::new(centre.x + dx, centre.y + dy),
    }
}

/// Moves every point by up to `radius` along each axis.
pub fn shake<R: Rng + ?Sized>(points: &mut [Point], radius: Real, rng: &mut R) {
    if radius <= 0.0 {
        return;
    }
    for p in points.iter_mut() {
        p.x += rng.random_range(-radius..radius);
        p.y += rng.random_range(-radius..radius);
    }
}

pub fn shuffle<R: Rng + ?Sized>(points: &mut [Point], rng: &mut R) {
    points.shuffle(rng);
}

/// Index of the lexicographically highest point (largest y, then largest x).
pub fn highest_index(points: &[Point]) -> Option<usize> {
    extreme_index(points, |p, q| lexicographic_higher(p, q))
}

/// Index of the lexicographically lowest point (smallest y, then smallest x).
pub fn lowest_index(points: &[Point]) -> Option<usize> {
    extreme_index(points, |p, q| lexicographic_higher(q, p))
}

fn extreme_index(points: &[Point], better: impl Fn(&Point, &Point) -> bool) -> Option<usize> {
    let mut best = 0;
    for i in 1..points.len() {
        if better(&points[i], &points[best]) {
            best = i;
        }
    }
    (!points.is_empty()).then_some(best)
}

/// Swaps the highest point into slot 0 and returns where it came from.
pub fn highest_first(points: &mut [Point]) -> Option<usize> {
    let i = highest_index(points)?;
    points.swap(0, i);
    Some(i)
}

/// Swaps the lowest point into slot 0 and returns where it came from.
pub fn lowest_first(points: &mut [Point]) -> Option<usize> {
    let i = lowest_index(points)?;
    points.swap(0, i);
    Some(i)
}

/// Permutation that puts the lowest point first and the rest in
/// counter-clockwise order around it. Points on the same ray keep the one
/// with the smaller x first.
pub fn angular_order(points: &[Point]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..points.len()).collect();
    let Some(lowest) = lowest_index(points) else {
        return order;
    };
    order.swap(0, lowest);
    if order.len() > 2 {
        let last = order.len() - 1;
        quicksort(points, &mut order, 1, last);
    }
    order
}

/// Reorders `points` by angular_order.
pub fn sort_angular(points: &mut Vec<Point>) {
    let order = angular_order(points);
    *points = order.iter().map(|&i| points[i]).collect();
}

// Quicksort over order[first..=last] with an explicit range stack.
fn quicksort(points: &[Point], order: &mut [usize], first: usize, last: usize) {
    let origin = points[order[0]];
    let mut ranges = vec![(first, last)];
    while let Some((lo, hi)) = ranges.pop() {
        if lo >= hi {
            continue;
        }
        let p = move_pivot(points, &origin, order, lo, hi);
        if p > lo {
            ranges.push((lo, p - 1));
        }
        ranges.push((p + 1, hi));
    }
}

// Partitions around order[lo]; returns the pivot's final slot.
fn move_pivot(points: &[Point], origin: &Point, order: &mut [usize], lo: usize, hi: usize) -> usize {
    let pivot = points[order[lo]];
    let mut slot = lo;
    for i in lo + 1..=hi {
        let item = &points[order[i]];
        let goes_before = match turn(origin, &pivot, item, COLLINEAR_THRESHOLD) {
            Turn::Right => true,
            Turn::Collinear => pivot.x > item.x,
            Turn::Left => false,
        };
        if goes_before {
            slot += 1;
            order.swap(i, slot);
        }
    }
    order.swap(lo, slot);
    slot
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn random_points_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let pts = random_points(500, &mut rng);
        assert_eq!(pts.len(), 500);
        assert!(pts
            .iter()
            .all(|p| (0.0..MAX_COORD).contains(&p.x) && (0.0..MAX_COORD).contains(&p.y)));
    }

    #[test]
    fn clusters_produce_exactly_n_points() {
        let mut rng = StdRng::seed_from_u64(11);
        assert_eq!(clustered_points(103, 5, 50.0, &mut rng).len(), 103);
        assert_eq!(clustered_points(3, 10, 50.0, &mut rng).len(), 3);
        assert!(clustered_points(10, 0, 50.0, &mut rng).is_empty());
    }

    #[test]
    fn shake_moves_within_radius() {
        let mut rng = StdRng::seed_from_u64(3);
        let original = vec![Point::new(10.0, 10.0); 50];
        let mut pts = original.clone();
        shake(&mut pts, 0.5, &mut rng);
        for (a, b) in original.iter().zip(&pts) {
            assert!((a.x - b.x).abs() <= 0.5);
            assert!((a.y - b.y).abs() <= 0.5);
        }
    }

    #[test]
    fn extremes_follow_lexicographic_order() {
        let mut pts = vec![
            Point::new(3.0, 1.0),
            Point::new(0.0, 5.0),
            Point::new(2.0, 5.0),
            Point::new(-1.0, 1.0),
        ];
        assert_eq!(highest_index(&pts), Some(2));
        assert_eq!(lowest_index(&pts), Some(3));
        assert_eq!(highest_first(&mut pts), Some(2));
        assert_eq!(pts[0], Point::new(2.0, 5.0));
        assert_eq!(highest_index(&[]), None);
    }

    #[test]
    fn angular_sort_orders_counter_clockwise() {
        let mut pts = vec![
            Point::new(-1.0, 1.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 0.0),
            Point::new(0.0, 1.0),
            Point::new(1.0, 0.0),
        ];
        sort_angular(&mut pts);
        assert_eq!(
            pts,
            vec![
                Point::new(0.0, 0.0),
                Point::new(1.0, 0.0),
                Point::new(1.0, 1.0),
                Point::new(0.0, 1.0),
                Point::new(-1.0, 1.0),
            ]
        );
    }

    #[test]
    fn angular_sort_of_many_points_is_monotone() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut pts = random_points(2000, &mut rng);
        sort_angular(&mut pts);
        let o = pts[0];
        let angle = |p: &Point| (p.y - o.y).atan2(p.x - o.x);
        for w in pts[1..].windows(2) {
            assert!(angle(&w[0]) <= angle(&w[1]) + 1e-9);
        }
    }

    #[test]
    fn collinear_ties_put_smaller_x_first() {
        let mut pts = vec![
            Point::new(0.0, 0.0),
            Point::new(3.0, 3.0),
            Point::new(1.0, 1.0),
            Point::new(2.0, 2.0),
        ];
        sort_angular(&mut pts);
        assert_eq!(pts[1], Point::new(1.0, 1.0));
        assert_eq!(pts[3], Point::new(3.0, 3.0));
    }
}
