//! Piece identity, prototypes, and placed instances.
//!
//! - `Piece`: anything that exposes a `PieceShape` (what the choice engine needs).
//! - `PieceId`: piece type plus orientation; its display form is the stable
//!   full id (`"curve"`, `"curveFlipped"`).
//! - `Prototype`: an uninstantiated template anchored at the origin.
//! - `PlacedPiece`: an instance in the world with its sequence number.

use std::fmt;
use std::sync::Arc;

use crate::frame::AffineFrame;
use crate::shape::PieceShape;

mod catalog;
pub mod presets;

pub use catalog::{Catalog, CatalogError};

/// Exposes the shape the choice engine tests for overlap.
pub trait Piece {
    fn shape(&self) -> &PieceShape;
}

impl Piece for PieceShape {
    fn shape(&self) -> &PieceShape {
        self
    }
}

impl<T: Piece + ?Sized> Piece for &T {
    fn shape(&self) -> &PieceShape {
        (**self).shape()
    }
}

impl<T: Piece + ?Sized> Piece for Arc<T> {
    fn shape(&self) -> &PieceShape {
        (**self).shape()
    }
}

/// Piece type and orientation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId {
    pub kind: String,
    pub flipped: bool,
}

impl PieceId {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            flipped: false,
        }
    }

    /// Same kind, opposite orientation.
    pub fn toggled(&self) -> Self {
        Self {
            kind: self.kind.clone(),
            flipped: !self.flipped,
        }
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.flipped {
            write!(f, "{}Flipped", self.kind)
        } else {
            write!(f, "{}", self.kind)
        }
    }
}

/// Template for one placeable piece, anchored at the identity frame.
#[derive(Clone, Debug)]
pub struct Prototype {
    id: PieceId,
    shape: PieceShape,
}

impl Prototype {
    /// Re-anchors `shape` at the origin so every prototype starts there.
    pub fn new(kind: impl Into<String>, shape: &PieceShape) -> Self {
        Self {
            id: PieceId::new(kind),
            shape: shape.translated_copy(&AffineFrame::identity()),
        }
    }

    #[inline]
    pub fn id(&self) -> &PieceId {
        &self.id
    }

    #[inline]
    pub fn full_id(&self) -> String {
        self.id.to_string()
    }

    /// Mirror-image variant with the orientation flag toggled.
    pub fn flipped(&self) -> Prototype {
        Prototype {
            id: self.id.toggled(),
            shape: self.shape.mirrored(),
        }
    }

    /// Fresh world shape with its start at `start`.
    pub fn instantiate(&self, start: &AffineFrame) -> PieceShape {
        self.shape.translated_copy(start)
    }
}

impl Piece for Prototype {
    fn shape(&self) -> &PieceShape {
        &self.shape
    }
}

/// A piece in the world. `seq` grows by one per placement.
#[derive(Clone, Debug)]
pub struct PlacedPiece {
    pub id: PieceId,
    pub seq: u64,
    pub shape: PieceShape,
}

impl Piece for PlacedPiece {
    fn shape(&self) -> &PieceShape {
        &self.shape
    }
}
