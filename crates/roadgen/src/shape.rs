//! Placed piece shapes: start/end frames plus a world-space footprint and height range.
//!
//! A shape keeps its boundary vertices relative to its start frame. Moving a
//! piece to a new start (`translated_copy`) re-projects those vertices and the
//! relative end frame; the relative data itself is shared read-only (`Arc`)
//! between every copy.
//!
//! World convention: y is up; the footprint is the (x, z) projection and the
//! height range is the y extent.

use std::sync::Arc;

use nalgebra::{Vector2, Vector3};

use crate::frame::AffineFrame;
use crate::geom2::{Footprint2, Interval};

/// Boundary data expressed in the start frame's local space.
#[derive(Debug)]
struct LocalBoundary {
    vertices: Vec<Vector3<f64>>,
    end: AffineFrame,
    infinite_height: bool,
}

/// One piece instance in world space.
#[derive(Clone, Debug)]
pub struct PieceShape {
    start: AffineFrame,
    end: AffineFrame,
    local: Arc<LocalBoundary>,
    footprint: Footprint2,
    height: Interval,
}

impl PieceShape {
    /// Build from data already relative to `start`.
    pub fn from_local(
        start: AffineFrame,
        end_local: AffineFrame,
        vertices_local: Vec<Vector3<f64>>,
        infinite_height: bool,
    ) -> Self {
        let local = Arc::new(LocalBoundary {
            vertices: vertices_local,
            end: end_local,
            infinite_height,
        });
        Self::place(start, local)
    }

    /// Build from a solid boundary mesh given in its own frame.
    ///
    /// Connection frames carry position and rotation only: the scale of
    /// `start` and `end` is reset to one, so a piece keeps the size of its
    /// mesh wherever it is re-anchored. `mesh_frame` is applied in full.
    /// Each mesh vertex goes mesh-local → world → start-local once; `end` is
    /// stored relative to `start`.
    pub fn from_boundary(
        start: AffineFrame,
        end: AffineFrame,
        mesh_frame: &AffineFrame,
        mesh_vertices: &[Vector3<f64>],
        infinite_height: bool,
    ) -> Self {
        let start = AffineFrame::rigid(start.position, start.rotation);
        let to_start = start.rotation.inverse();
        let vertices = mesh_vertices
            .iter()
            .map(|v| to_start * (mesh_frame.transform_point(v) - start.position))
            .collect();
        let end_local = AffineFrame::rigid(to_start * (end.position - start.position), to_start * end.rotation);
        Self::from_local(start, end_local, vertices, infinite_height)
    }

    /// Same piece re-anchored at `new_start`. The original is untouched.
    pub fn translated_copy(&self, new_start: &AffineFrame) -> PieceShape {
        Self::place(*new_start, Arc::clone(&self.local))
    }

    /// Mirror image across the start frame's local YZ plane, anchored at the same start.
    ///
    /// The relative data is rebuilt (not shared) since it differs.
    pub fn mirrored(&self) -> PieceShape {
        let vertices = self
            .local
            .vertices
            .iter()
            .map(|v| Vector3::new(-v.x, v.y, v.z))
            .collect();
        Self::from_local(
            self.start,
            self.local.end.mirrored_x(),
            vertices,
            self.local.infinite_height,
        )
    }

    /// Height ranges are skipped when either side is infinite-height; otherwise
    /// both height and footprint must overlap.
    pub fn overlaps(&self, other: &PieceShape) -> bool {
        let height_matters = !self.infinite_height() && !other.infinite_height();
        if height_matters && !self.height.overlaps(&other.height) {
            return false;
        }
        self.footprint.overlaps(&other.footprint)
    }

    #[inline]
    pub fn start(&self) -> &AffineFrame {
        &self.start
    }

    #[inline]
    pub fn end(&self) -> &AffineFrame {
        &self.end
    }

    /// End frame relative to the start frame.
    #[inline]
    pub fn end_local(&self) -> &AffineFrame {
        &self.local.end
    }

    #[inline]
    pub fn footprint(&self) -> &Footprint2 {
        &self.footprint
    }

    #[inline]
    pub fn height(&self) -> Interval {
        self.height
    }

    #[inline]
    pub fn infinite_height(&self) -> bool {
        self.local.infinite_height
    }

    #[inline]
    pub fn local_vertices(&self) -> &[Vector3<f64>] {
        &self.local.vertices
    }

    fn place(start: AffineFrame, local: Arc<LocalBoundary>) -> Self {
        let world: Vec<Vector3<f64>> = local
            .vertices
            .iter()
            .map(|v| start.transform_point(v))
            .collect();
        // empty boundaries are degenerate; they occupy every height
        let height = Interval::from_values(world.iter().map(|p| p.y))
            .unwrap_or_else(|| Interval::new(f64::NEG_INFINITY, f64::INFINITY));
        let footprint = Footprint2::new(world.iter().map(|p| Vector2::new(p.x, p.z)).collect());
        let end = start.transform_frame(&local.end);
        Self {
            start,
            end,
            local,
            footprint,
            height,
        }
    }
}
