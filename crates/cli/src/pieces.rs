//! JSON piece definitions in, placed-road records out.
//!
//! Input layout (`--pieces`):
//! ```json
//! { "pieces": [ { "kind": "curve", "flippable": true,
//!                 "start": { "position": [0, 0, 0] },
//!                 "end": { "position": [5, 0, 5], "rotation_deg": [0, 90, 0] },
//!                 "vertices": [[-1, 0, 0.1], ...] } ] }
//! ```
//! Rotations are roll/pitch/yaw in degrees about x/y/z. `mesh_frame` (default
//! identity) places the boundary vertices relative to the world.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use nalgebra::{UnitQuaternion, Vector3};
use roadgen::frame::AffineFrame;
use roadgen::geom2::convex_hull_edges;
use roadgen::piece::{Catalog, PlacedPiece, Prototype};
use roadgen::shape::PieceShape;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct FrameDef {
    pub position: [f64; 3],
    #[serde(default)]
    pub rotation_deg: [f64; 3],
    #[serde(default = "unit_scale")]
    pub scale: [f64; 3],
}

fn unit_scale() -> [f64; 3] {
    [1.0; 3]
}

impl Default for FrameDef {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            rotation_deg: [0.0; 3],
            scale: unit_scale(),
        }
    }
}

impl FrameDef {
    pub fn to_frame(&self) -> AffineFrame {
        let [r, p, y] = self.rotation_deg.map(f64::to_radians);
        AffineFrame::new(
            Vector3::from(self.position),
            UnitQuaternion::from_euler_angles(r, p, y),
            Vector3::from(self.scale),
        )
    }

    pub fn from_frame(frame: &AffineFrame) -> Self {
        let (r, p, y) = frame.rotation.euler_angles();
        Self {
            position: frame.position.into(),
            rotation_deg: [r.to_degrees(), p.to_degrees(), y.to_degrees()],
            scale: frame.scale.into(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct PieceDef {
    pub kind: String,
    /// Also register the mirrored variant.
    #[serde(default)]
    pub flippable: bool,
    pub start: FrameDef,
    pub end: FrameDef,
    #[serde(default)]
    pub mesh_frame: FrameDef,
    pub vertices: Vec<[f64; 3]>,
    #[serde(default)]
    pub infinite_height: bool,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PieceFile {
    pub pieces: Vec<PieceDef>,
}

pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let file: PieceFile =
        serde_json::from_slice(&bytes).with_context(|| format!("parsing {}", path.display()))?;
    catalog_from_defs(&file.pieces)
}

pub fn catalog_from_defs(defs: &[PieceDef]) -> Result<Catalog> {
    let mut catalog = Catalog::new();
    for def in defs {
        let vertices: Vec<Vector3<f64>> = def.vertices.iter().map(|&v| Vector3::from(v)).collect();
        let shape = PieceShape::from_boundary(
            def.start.to_frame(),
            def.end.to_frame(),
            &def.mesh_frame.to_frame(),
            &vertices,
            def.infinite_height,
        );
        catalog.insert(Prototype::new(def.kind.clone(), &shape), def.flippable);
    }
    Ok(catalog)
}

/// One placed piece as written to the output file.
#[derive(Clone, Debug, Serialize)]
pub struct PlacedRecord {
    pub seq: u64,
    pub id: String,
    pub start: FrameDef,
    pub end: FrameDef,
    /// Hull corners of the (x, z) footprint, counter-clockwise.
    pub footprint: Vec<[f64; 2]>,
    pub height: [f64; 2],
}

impl From<&PlacedPiece> for PlacedRecord {
    fn from(piece: &PlacedPiece) -> Self {
        let footprint = convex_hull_edges(piece.shape.footprint().vertices())
            .into_iter()
            .map(|(a, _)| [a.x, a.y])
            .collect();
        let height = piece.shape.height();
        Self {
            seq: piece.seq,
            id: piece.id.to_string(),
            start: FrameDef::from_frame(piece.shape.start()),
            end: FrameDef::from_frame(piece.shape.end()),
            footprint,
            height: [height.min(), height.max()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const CURVE: &str = r#"{
        "pieces": [
            {
                "kind": "curve",
                "flippable": true,
                "start": { "position": [0, 0, 0] },
                "end": { "position": [5, 0, 5], "rotation_deg": [0, 90, 0] },
                "vertices": [
                    [-1, 0, 0.1], [4.9, 0, 0.1], [-1, 0, 6], [4.9, 0, 6],
                    [-1, 0.5, 0.1], [4.9, 0.5, 0.1], [-1, 0.5, 6], [4.9, 0.5, 6]
                ]
            },
            {
                "kind": "straight",
                "start": { "position": [10, 0, 10], "rotation_deg": [0, 90, 0] },
                "end": { "position": [20, 0, 10], "rotation_deg": [0, 90, 0] },
                "mesh_frame": { "position": [10, 0, 10], "rotation_deg": [0, 90, 0] },
                "vertices": [
                    [-1, 0, 0.1], [1, 0, 0.1], [-1, 0, 9.9], [1, 0, 9.9],
                    [-1, 0.5, 0.1], [1, 0.5, 0.1], [-1, 0.5, 9.9], [1, 0.5, 9.9]
                ]
            }
        ]
    }"#;

    #[test]
    fn loads_pieces_with_flipped_variants() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pieces.json");
        fs::write(&path, CURVE).unwrap();
        let catalog = load_catalog(&path).unwrap();
        let ids: Vec<&str> = catalog.ids().collect();
        assert_eq!(ids, vec!["curve", "curveFlipped", "straight"]);

        // the straight was authored away from the origin; prototypes are re-anchored
        let straight = catalog.get("straight").unwrap();
        let placed = straight.instantiate(&AffineFrame::identity());
        assert!((placed.end().position - Vector3::new(0.0, 0.0, 10.0)).norm() < 1e-9);
    }

    #[test]
    fn missing_file_names_the_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let err = load_catalog(&path).unwrap_err();
        assert!(format!("{err:#}").contains("absent.json"));
    }

    #[test]
    fn scaled_connection_frames_keep_piece_size() {
        let def = |start_scale: f64| PieceDef {
            kind: "straight".into(),
            flippable: false,
            start: FrameDef {
                scale: [start_scale; 3],
                ..FrameDef::default()
            },
            end: FrameDef {
                position: [0.0, 0.0, 10.0],
                ..FrameDef::default()
            },
            mesh_frame: FrameDef::default(),
            vertices: vec![[-1.0, 0.0, 0.1], [1.0, 0.0, 0.1], [-1.0, 0.5, 9.9], [1.0, 0.5, 9.9]],
            infinite_height: false,
        };
        for start_scale in [1.0, 2.0, 0.0] {
            let catalog = catalog_from_defs(&[def(start_scale)]).unwrap();
            let placed = catalog.get("straight").unwrap().instantiate(&AffineFrame::identity());
            assert!((placed.end().position - Vector3::new(0.0, 0.0, 10.0)).norm() < 1e-9);
            let z = placed.footprint().projection(nalgebra::Vector2::new(0.0, 1.0));
            assert!((z.min() - 0.1).abs() < 1e-9 && (z.max() - 9.9).abs() < 1e-9, "scale {start_scale}");
        }
    }

    #[test]
    fn frame_def_round_trips_through_frames() {
        let frame = FrameDef {
            position: [1.0, 2.0, 3.0],
            rotation_deg: [10.0, 30.0, -45.0],
            scale: [1.0, 1.0, 1.0],
        };
        let back = FrameDef::from_frame(&frame.to_frame());
        for i in 0..3 {
            assert!((back.position[i] - frame.position[i]).abs() < 1e-9);
            assert!((back.rotation_deg[i] - frame.rotation_deg[i]).abs() < 1e-6);
        }
    }
}
