//! Vector helpers and polygon metrics on `[f64; 3]` points.
//!
//! Polygons are given as ordered vertex positions; the closing edge from the
//! last vertex back to the first is implicit. Normals and areas use Newell's
//! method, which is exact for planar polygons of any vertex count and
//! degrades gracefully on slightly non-planar ones.

use itertools::Itertools;

pub(crate) const EPS: f64 = 1e-12;

#[inline]
pub fn add(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

#[inline]
pub fn sub(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

#[inline]
pub fn scale(a: [f64; 3], s: f64) -> [f64; 3] {
    [a[0] * s, a[1] * s, a[2] * s]
}

#[inline]
pub fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

#[inline]
pub fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

#[inline]
pub fn norm(a: [f64; 3]) -> f64 {
    dot(a, a).sqrt()
}

/// Unit vector along `a`, or `None` when `a` is shorter than `1e-12`.
pub fn normalize(a: [f64; 3]) -> Option<[f64; 3]> {
    let len = norm(a);
    (len >= EPS).then(|| scale(a, 1.0 / len))
}

/// Angle between two vectors in radians, in `[0, π]`.
///
/// Uses `atan2(|a×b|, a·b)`, which stays accurate near 0 and π where
/// `acos` of the normalized dot product loses precision.
pub fn angle_between(a: [f64; 3], b: [f64; 3]) -> f64 {
    norm(cross(a, b)).atan2(dot(a, b))
}

/// Arithmetic mean of the points; the zero vector for an empty slice.
pub fn centroid(points: &[[f64; 3]]) -> [f64; 3] {
    if points.is_empty() {
        return [0.0; 3];
    }
    let sum = points.iter().fold([0.0; 3], |acc, &p| add(acc, p));
    scale(sum, 1.0 / points.len() as f64)
}

/// Newell's area vector: direction is the polygon normal, length is twice the area.
pub fn newell_vector(points: &[[f64; 3]]) -> [f64; 3] {
    let mut n = [0.0; 3];
    if points.len() < 3 {
        return n;
    }
    for (a, b) in points.iter().circular_tuple_windows() {
        n[0] += (a[1] - b[1]) * (a[2] + b[2]);
        n[1] += (a[2] - b[2]) * (a[0] + b[0]);
        n[2] += (a[0] - b[0]) * (a[1] + b[1]);
    }
    n
}

/// Unit polygon normal, or `None` for degenerate (zero-area) polygons.
pub fn polygon_normal(points: &[[f64; 3]]) -> Option<[f64; 3]> {
    normalize(newell_vector(points))
}

/// Unsigned polygon area in 3-space.
pub fn polygon_area(points: &[[f64; 3]]) -> f64 {
    0.5 * norm(newell_vector(points))
}

/// Orthonormal `(u, v)` spanning the plane perpendicular to `n`.
///
/// `u` is "any perpendicular" to `n`, chosen from the coordinate axis least
/// aligned with `n` so it never degenerates; `v = n × u`.
pub fn plane_basis(n: [f64; 3]) -> ([f64; 3], [f64; 3]) {
    let n = normalize(n).unwrap_or([0.0, 0.0, 1.0]);
    let ax = n[0].abs();
    let ay = n[1].abs();
    let az = n[2].abs();
    let axis = if ax <= ay && ax <= az {
        [1.0, 0.0, 0.0]
    } else if ay <= az {
        [0.0, 1.0, 0.0]
    } else {
        [0.0, 0.0, 1.0]
    };
    let u = normalize(cross(n, axis)).unwrap_or([1.0, 0.0, 0.0]);
    let v = normalize(cross(n, u)).unwrap_or([0.0, 1.0, 0.0]);
    (u, v)
}

/// Shoelace area of a 2D polygon; positive for counter-clockwise winding.
pub fn signed_area_2d(points: &[[f64; 2]]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let twice: f64 = points
        .iter()
        .circular_tuple_windows()
        .map(|(a, b)| a[0] * b[1] - b[0] * a[1])
        .sum();
    0.5 * twice
}

fn orient_2d(a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> f64 {
    (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0])
}

fn on_segment_2d(a: [f64; 2], b: [f64; 2], p: [f64; 2]) -> bool {
    p[0] >= a[0].min(b[0]) - EPS
        && p[0] <= a[0].max(b[0]) + EPS
        && p[1] >= a[1].min(b[1]) - EPS
        && p[1] <= a[1].max(b[1]) + EPS
}

/// Whether closed segments `p1-p2` and `q1-q2` share at least one point.
pub fn segments_intersect_2d(p1: [f64; 2], p2: [f64; 2], q1: [f64; 2], q2: [f64; 2]) -> bool {
    let d1 = orient_2d(q1, q2, p1);
    let d2 = orient_2d(q1, q2, p2);
    let d3 = orient_2d(p1, p2, q1);
    let d4 = orient_2d(p1, p2, q2);

    let straddles = |x: f64, y: f64| (x > EPS && y < -EPS) || (x < -EPS && y > EPS);
    if straddles(d1, d2) && straddles(d3, d4) {
        return true;
    }
    (d1.abs() <= EPS && on_segment_2d(q1, q2, p1))
        || (d2.abs() <= EPS && on_segment_2d(q1, q2, p2))
        || (d3.abs() <= EPS && on_segment_2d(p1, p2, q1))
        || (d4.abs() <= EPS && on_segment_2d(p1, p2, q2))
}

/// Whether any two non-adjacent edges of the closed polygon touch or cross.
pub fn polygon_self_intersects_2d(points: &[[f64; 2]]) -> bool {
    let n = points.len();
    if n < 4 {
        return false;
    }
    for i in 0..n {
        let (a1, a2) = (points[i], points[(i + 1) % n]);
        // Edge i is adjacent to i-1 and i+1; the last edge is adjacent to edge 0.
        for j in (i + 2)..n {
            if i == 0 && j == n - 1 {
                continue;
            }
            let (b1, b2) = (points[j], points[(j + 1) % n]);
            if segments_intersect_2d(a1, a2, b1, b2) {
                return true;
            }
        }
    }
    false
}
