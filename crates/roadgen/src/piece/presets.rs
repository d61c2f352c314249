//! Ready-made piece shapes with box boundaries.
//!
//! All presets start at the origin heading +z with y up. Footprints stop
//! `SEAM` short of the connection points so consecutive pieces never touch
//! (touching counts as overlap).

use std::f64::consts::FRAC_PI_2;

use nalgebra::{vector, UnitQuaternion, Vector3};

use super::{Catalog, Prototype};
use crate::frame::AffineFrame;
use crate::shape::PieceShape;

/// Gap between a footprint and its start/end connection points.
pub const SEAM: f64 = 0.1;
/// Thickness of the road deck.
pub const DECK_HEIGHT: f64 = 0.5;

/// Eight corners of an axis-aligned box.
pub fn cuboid(x: (f64, f64), y: (f64, f64), z: (f64, f64)) -> Vec<Vector3<f64>> {
    let mut out = Vec::with_capacity(8);
    for &a in &[x.0, x.1] {
        for &b in &[y.0, y.1] {
            for &c in &[z.0, z.1] {
                out.push(vector![a, b, c]);
            }
        }
    }
    out
}

pub fn straight(length: f64, width: f64) -> PieceShape {
    let half = width / 2.0;
    PieceShape::from_local(
        AffineFrame::identity(),
        AffineFrame::rigid(vector![0.0, 0.0, length], UnitQuaternion::identity()),
        cuboid((-half, half), (0.0, DECK_HEIGHT), (SEAM, length - SEAM)),
        false,
    )
}

/// 90° bend towards +x; the footprint is the bounding box of the arc.
pub fn quarter_turn(radius: f64, width: f64) -> PieceShape {
    let half = width / 2.0;
    PieceShape::from_local(
        AffineFrame::identity(),
        AffineFrame::rigid(
            vector![radius, 0.0, radius],
            UnitQuaternion::from_axis_angle(&Vector3::y_axis(), FRAC_PI_2),
        ),
        cuboid((-half, radius - SEAM), (0.0, DECK_HEIGHT), (SEAM, radius + half)),
        false,
    )
}

/// Straight piece that ends `rise` higher (or lower, when negative).
pub fn ramp(length: f64, width: f64, rise: f64) -> PieceShape {
    let half = width / 2.0;
    PieceShape::from_local(
        AffineFrame::identity(),
        AffineFrame::rigid(vector![0.0, rise, length], UnitQuaternion::identity()),
        cuboid(
            (-half, half),
            (rise.min(0.0), rise.max(0.0) + DECK_HEIGHT),
            (SEAM, length - SEAM),
        ),
        false,
    )
}

/// Dead end: its end frame is its start frame, so anything placed after it
/// lands on top of it.
pub fn stub(width: f64) -> PieceShape {
    let half = width / 2.0;
    PieceShape::from_local(
        AffineFrame::identity(),
        AffineFrame::identity(),
        cuboid((-half, half), (0.0, DECK_HEIGHT), (SEAM, width)),
        false,
    )
}

/// Straights, curves in both orientations, and gentle ramps.
pub fn standard_catalog() -> Catalog {
    let mut catalog = Catalog::new();
    catalog.insert(Prototype::new("straight", &straight(10.0, 2.0)), false);
    catalog.insert(Prototype::new("short", &straight(5.0, 2.0)), false);
    catalog.insert(Prototype::new("curve", &quarter_turn(5.0, 2.0)), true);
    catalog.insert(Prototype::new("rampUp", &ramp(10.0, 2.0, 1.0)), false);
    catalog.insert(Prototype::new("rampDown", &ramp(10.0, 2.0, -1.0)), false);
    catalog
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consecutive_presets_do_not_touch() {
        let shapes = [
            straight(10.0, 2.0),
            straight(5.0, 2.0),
            quarter_turn(5.0, 2.0),
            quarter_turn(5.0, 2.0).mirrored(),
            ramp(10.0, 2.0, 1.0),
            ramp(10.0, 2.0, -1.0),
        ];
        for a in &shapes {
            for b in &shapes {
                let next = b.translated_copy(a.end());
                assert!(!a.overlaps(&next));
            }
        }
    }

    #[test]
    fn stub_blocks_its_successor() {
        let s = stub(2.0);
        assert!(s.overlaps(&straight(10.0, 2.0).translated_copy(s.end())));
        assert!(s.overlaps(&s.translated_copy(s.end())));
    }

    #[test]
    fn standard_catalog_has_flipped_curve() {
        let c = standard_catalog();
        let ids: Vec<&str> = c.ids().collect();
        assert_eq!(
            ids,
            vec!["curve", "curveFlipped", "rampDown", "rampUp", "short", "straight"]
        );
        let flipped = c.get("curveFlipped").unwrap();
        assert!(flipped.id().flipped);
        assert!(c.get("loop").is_err());
    }

    #[test]
    fn claim_aligns_instance() {
        let c = standard_catalog();
        let start = AffineFrame::rigid(vector![3.0, 0.0, 4.0], UnitQuaternion::identity());
        let placed = c.claim("straight", 7, &start).unwrap();
        assert_eq!(placed.seq, 7);
        assert_eq!(placed.id.to_string(), "straight");
        assert!((placed.shape.end().position - vector![3.0, 0.0, 14.0]).norm() < 1e-9);
    }
}
