//! Position/rotation/scale frames in 3D (scale, then rotate, then translate).
//!
//! Purpose
//! - Align a piece's local boundary into world space and chain pieces
//!   end-to-start by frame composition.
//!
//! Inversion policy
//! - `inverse_transform_point` is exact for any frame whose scale components
//!   are all non-zero (component-wise inverse of the TRS map).
//! - `inverse_transform_frame` additionally requires a uniform scale on `self`:
//!   with a non-uniform scale the composition of two TRS frames is generally
//!   sheared and cannot be represented as a frame, so it is rejected with
//!   `FrameError::NonUniformScale` instead of returning a silently wrong frame.

use nalgebra::{Matrix4, Quaternion, UnitQuaternion, Vector3};
use thiserror::Error;

use crate::geom2::EPS;

/// Reasons a frame cannot be inverted.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum FrameError {
    #[error("frame scale has a zero or non-finite component: {0:?}")]
    ZeroScale(Vector3<f64>),
    #[error("frame inversion needs a uniform scale, got {0:?}")]
    NonUniformScale(Vector3<f64>),
}

/// Local coordinate system relative to world space.
///
/// Invariant: `rotation` is a unit quaternion (enforced by the type).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AffineFrame {
    pub position: Vector3<f64>,
    pub rotation: UnitQuaternion<f64>,
    pub scale: Vector3<f64>,
}

impl Default for AffineFrame {
    fn default() -> Self {
        Self::identity()
    }
}

impl AffineFrame {
    #[inline]
    pub fn new(position: Vector3<f64>, rotation: UnitQuaternion<f64>, scale: Vector3<f64>) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    #[inline]
    pub fn identity() -> Self {
        Self::new(Vector3::zeros(), UnitQuaternion::identity(), Vector3::repeat(1.0))
    }

    /// Unit-scale frame.
    #[inline]
    pub fn rigid(position: Vector3<f64>, rotation: UnitQuaternion<f64>) -> Self {
        Self::new(position, rotation, Vector3::repeat(1.0))
    }

    /// Local → world.
    #[inline]
    pub fn transform_point(&self, local: &Vector3<f64>) -> Vector3<f64> {
        self.rotation * self.scale.component_mul(local) + self.position
    }

    /// Express a frame given in this frame's local space in world space.
    pub fn transform_frame(&self, other: &AffineFrame) -> AffineFrame {
        AffineFrame {
            position: self.transform_point(&other.position),
            rotation: self.rotation * other.rotation,
            scale: self.scale.component_mul(&other.scale),
        }
    }

    /// World → local.
    pub fn inverse_transform_point(&self, world: &Vector3<f64>) -> Result<Vector3<f64>, FrameError> {
        self.check_invertible()?;
        let unrotated = self.rotation.inverse_transform_vector(&(world - self.position));
        Ok(unrotated.component_div(&self.scale))
    }

    /// Express a world-space frame in this frame's local space.
    ///
    /// Round-trips with `transform_frame` when `self.scale` is uniform.
    pub fn inverse_transform_frame(&self, other: &AffineFrame) -> Result<AffineFrame, FrameError> {
        if !self.has_uniform_scale() {
            return Err(FrameError::NonUniformScale(self.scale));
        }
        Ok(AffineFrame {
            position: self.inverse_transform_point(&other.position)?,
            rotation: self.rotation.inverse() * other.rotation,
            scale: other.scale.component_div(&self.scale),
        })
    }

    /// Homogeneous TRS matrix `T · R · S`.
    pub fn to_homogeneous(&self) -> Matrix4<f64> {
        Matrix4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Matrix4::new_nonuniform_scaling(&self.scale)
    }

    #[inline]
    pub fn has_uniform_scale(&self) -> bool {
        let s = self.scale;
        (s.x - s.y).abs() <= EPS && (s.x - s.z).abs() <= EPS
    }

    /// Conjugate by the reflection `x ↦ -x`: the same frame seen in a mirror
    /// across the YZ plane. Rotations keep their axis' y/z parts and flip sense.
    pub fn mirrored_x(&self) -> AffineFrame {
        let q = self.rotation.quaternion();
        AffineFrame {
            position: Vector3::new(-self.position.x, self.position.y, self.position.z),
            rotation: UnitQuaternion::new_unchecked(Quaternion::new(q.w, q.i, -q.j, -q.k)),
            scale: self.scale,
        }
    }

    fn check_invertible(&self) -> Result<(), FrameError> {
        if self.scale.iter().any(|c| *c == 0.0 || !c.is_finite()) {
            return Err(FrameError::ZeroScale(self.scale));
        }
        Ok(())
    }
}
