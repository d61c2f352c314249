//! Convex 2D footprint with cached hull axes and SAT overlap.
//!
//! Precondition: the vertex set describes a convex region. Non-convex input is
//! not rejected; SAT on it is simply wrong (either optimistic or pessimistic).

use nalgebra::Vector2;

use super::hull::{hull_axes, push_unique};
use super::types::Interval;

/// Point set plus its canonical, deduplicated separating axes.
///
/// Invariant: `axes == hull_axes(vertices)`; both change together only via `new`.
#[derive(Clone, Debug, Default)]
pub struct Footprint2 {
    vertices: Vec<Vector2<f64>>,
    axes: Vec<Vector2<f64>>,
}

impl Footprint2 {
    pub fn new(vertices: Vec<Vector2<f64>>) -> Self {
        let axes = hull_axes(&vertices);
        Self { vertices, axes }
    }

    #[inline]
    pub fn vertices(&self) -> &[Vector2<f64>] {
        &self.vertices
    }

    #[inline]
    pub fn axes(&self) -> &[Vector2<f64>] {
        &self.axes
    }

    /// Scalar projection range of all vertices onto `axis` (need not be unit).
    ///
    /// An empty footprint projects to the whole real line.
    pub fn projection(&self, axis: Vector2<f64>) -> Interval {
        let len = axis.norm();
        Interval::from_values(self.vertices.iter().map(|v| axis.dot(v) / len))
            .unwrap_or_else(|| Interval::new(f64::NEG_INFINITY, f64::INFINITY))
    }

    /// Separating Axis Theorem: overlap iff no axis of either shape separates them.
    pub fn overlaps(&self, other: &Footprint2) -> bool {
        let mut axes = self.axes.clone();
        for &a in &other.axes {
            push_unique(&mut axes, a);
        }
        axes.into_iter()
            .all(|axis| self.projection(axis).overlaps(&other.projection(axis)))
    }
}
