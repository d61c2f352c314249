//! Top-down 2D geometry for piece footprints.
//!
//! Purpose
//! - Convex hull (Graham scan) and the canonical edge directions derived from it.
//! - Convex footprints with min/max projections and SAT overlap.
//! - Closed intervals for projection ranges and height checks.
//!
//! Conventions
//! - Directions are unit length and canonicalized into the upper half-plane
//!   (`y > 0`, or `y ≈ 0` and `x > 0`), deduplicated with tolerance `1e-9`.
//! - Touching shapes overlap (closed intervals throughout).
//! - Degenerate input (fewer than 3 points, collinear points, non-convex sets)
//!   is accepted without validation; results are best-effort.

mod footprint;
mod hull;
mod types;

pub use footprint::Footprint2;
pub use hull::{convex_hull_edges, hull_axes, hull_tangents, Edge2};
pub use types::Interval;
pub(crate) use types::EPS;
