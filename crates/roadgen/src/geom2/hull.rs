//! Convex hull and hull-derived directions in 2D.
//!
//! - `convex_hull_edges`: Graham scan around the leftmost point, CCW edges.
//! - `hull_tangents`: unique edge directions (mod 180°), canonicalized.
//! - `hull_axes`: unique edge normals (mod 180°), canonicalized; these are the
//!   candidate separating axes for SAT.
//!
//! Canonical form for a direction `u`: `u.y > 0`, or `u.y ≈ 0` and `u.x > 0`.
//! Two geometrically equal hulls therefore produce the same direction sets
//! regardless of input order, duplicates, or interior points.

use nalgebra::Vector2;
use std::cmp::Ordering;

use super::types::EPS;

/// Directed hull edge `(from, to)`.
pub type Edge2 = (Vector2<f64>, Vector2<f64>);

/// Hull edges in CCW order, closing edge included.
///
/// Fewer than 3 input points gives an empty hull. Fully collinear input
/// collapses to a single segment edge.
pub fn convex_hull_edges(points: &[Vector2<f64>]) -> Vec<Edge2> {
    let hull = convex_hull(points);
    match hull.len() {
        0 | 1 => Vec::new(),
        2 => vec![(hull[0], hull[1])],
        n => (0..n).map(|k| (hull[k], hull[(k + 1) % n])).collect(),
    }
}

/// Unique unit edge directions of the hull.
pub fn hull_tangents(points: &[Vector2<f64>]) -> Vec<Vector2<f64>> {
    let mut out = Vec::new();
    for (p, q) in convex_hull_edges(points) {
        if let Some(t) = canonical_direction(q - p) {
            push_unique(&mut out, t);
        }
    }
    out
}

/// Unique unit edge normals of the hull (perpendiculars of the tangents).
pub fn hull_axes(points: &[Vector2<f64>]) -> Vec<Vector2<f64>> {
    let mut out = Vec::new();
    for t in hull_tangents(points) {
        if let Some(axis) = canonical_direction(Vector2::new(-t.y, t.x)) {
            push_unique(&mut out, axis);
        }
    }
    out
}

/// Normalize and flip into the upper half-plane; `None` for zero-length input.
pub(crate) fn canonical_direction(v: Vector2<f64>) -> Option<Vector2<f64>> {
    let norm = v.norm();
    if !norm.is_finite() || norm <= EPS {
        return None;
    }
    let u = v / norm;
    if u.y < -EPS || (u.y.abs() <= EPS && u.x < 0.0) {
        Some(-u)
    } else {
        Some(u)
    }
}

/// Append `v` unless a near-equal direction is already present.
pub(crate) fn push_unique(out: &mut Vec<Vector2<f64>>, v: Vector2<f64>) {
    if out.iter().all(|w| (w - v).norm() >= EPS) {
        out.push(v);
    }
}

/// Graham scan. Returns hull vertices in CCW order starting at the pivot.
fn convex_hull(points: &[Vector2<f64>]) -> Vec<Vector2<f64>> {
    if points.len() < 3 {
        return Vec::new();
    }
    let pivot = match leftmost(points) {
        Some(p) => p,
        None => return Vec::new(),
    };
    let mut rest: Vec<Vector2<f64>> = points
        .iter()
        .copied()
        .filter(|p| (p - pivot).norm() > EPS)
        .collect();
    rest.sort_by(|a, b| {
        let da = a - pivot;
        let db = b - pivot;
        let ang_a = da.y.atan2(da.x);
        let ang_b = db.y.atan2(db.x);
        ang_a
            .partial_cmp(&ang_b)
            .unwrap_or(Ordering::Equal)
            .then_with(|| {
                da.norm_squared()
                    .partial_cmp(&db.norm_squared())
                    .unwrap_or(Ordering::Equal)
            })
    });

    let mut stack: Vec<Vector2<f64>> = Vec::with_capacity(rest.len() + 1);
    stack.push(pivot);
    for p in rest {
        // keep only strict CCW turns; collinear and duplicate points are dropped
        while stack.len() >= 2 && cross(stack[stack.len() - 2], stack[stack.len() - 1], p) <= 0.0
        {
            stack.pop();
        }
        stack.push(p);
    }
    stack
}

/// Lowest x, ties broken by lowest y.
fn leftmost(points: &[Vector2<f64>]) -> Option<Vector2<f64>> {
    points.iter().copied().min_by(|a, b| {
        a.x.partial_cmp(&b.x)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.y.partial_cmp(&b.y).unwrap_or(Ordering::Equal))
    })
}

#[inline]
fn cross(a: Vector2<f64>, b: Vector2<f64>, c: Vector2<f64>) -> f64 {
    let ab = b - a;
    let ac = c - a;
    ab.x * ac.y - ab.y * ac.x
}
