//! Procedural road-section chains.
//!
//! Pieces are placed end-to-start; before committing to the next piece a
//! bounded lookahead search checks that a whole chain of future pieces can
//! follow it without overlapping anything already in the world.
//!
//! Layout
//! - `frame`: affine frames (position, rotation, scale) and their composition.
//! - `geom2`: intervals, convex hull axes, and separating-axis footprint tests.
//! - `shape`: a piece's start/end frames, footprint, and height range.
//! - `search`: the resumable combination search and the choice engine.
//! - `piece`: piece ids, prototypes, the catalog, and presets.
//! - `generator`: the tick-driven placement loop and policies.
//!
//! World convention: y is up; overlap is decided on the (x, z) plane plus the
//! y extent.

pub mod frame;
pub mod generator;
pub mod geom2;
pub mod piece;
pub mod search;
pub mod shape;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::frame::{AffineFrame, FrameError};
    pub use crate::generator::{
        GeneratorCfg, GeneratorError, PlacementPolicy, RoadGenerator, RunSummary,
        TargetLengthPolicy, TickReport,
    };
    pub use crate::geom2::{Footprint2, Interval};
    pub use crate::piece::{Catalog, CatalogError, Piece, PieceId, PlacedPiece, Prototype};
    pub use crate::search::{ChoiceEngine, CombinationSearch, SearchCfg, SearchError, SearchStatus};
    pub use crate::shape::PieceShape;
    pub use nalgebra::{UnitQuaternion, Vector3 as Vec3};
}
