use nalgebra::{Isometry3, Translation3, UnitQuaternion, Vector3};

use crate::{Real, WorldPoint, WorldVector};

/// A local orientation frame: a position plus a right-handed basis, where `forward` is local +Z
/// and `up` is local +Y.
///
/// Positive rotation about `forward` turns `up` counter-clockwise as seen from in front of the
/// frame (looking back along `-forward`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    isometry: Isometry3<Real>,
}

impl Frame {
    /// Construct a frame at `origin` facing along `forward`, with `up` as close to world +Y as
    /// possible. When `forward` is (anti)parallel to +Y, world +Z is used as the up reference.
    ///
    /// `forward` must be non-zero.
    pub fn looking_along(origin: WorldPoint, forward: &WorldVector) -> Self {
        let reference = if forward.cross(&Vector3::y()).norm_squared()
            <= Real::EPSILON * forward.norm_squared()
        {
            Vector3::z()
        } else {
            Vector3::y()
        };
        Self {
            isometry: Isometry3::face_towards(&origin, &(origin + forward), &reference),
        }
    }

    #[inline]
    pub fn position(&self) -> WorldPoint {
        self.isometry.translation.vector.into()
    }

    #[inline]
    pub fn forward(&self) -> WorldVector {
        self.isometry.rotation * Vector3::z()
    }

    #[inline]
    pub fn up(&self) -> WorldVector {
        self.isometry.rotation * Vector3::y()
    }

    #[inline]
    pub fn right(&self) -> WorldVector {
        self.isometry.rotation * Vector3::x()
    }

    /// Move the frame along its own forward axis.
    pub fn advance(&mut self, distance: Real) {
        let offset = self.forward() * distance;
        self.isometry.append_translation_mut(&Translation3::from(offset));
    }

    /// Rotate the frame about its own forward axis by `angle` radians.
    pub fn roll(&mut self, angle: Real) {
        self.isometry.rotation *= UnitQuaternion::from_axis_angle(&Vector3::z_axis(), angle);
    }

    /// Express a frame-local direction in world space.
    #[inline]
    pub fn transform_direction(&self, local: &WorldVector) -> WorldVector {
        self.isometry.rotation * local
    }

    /// Express a frame-local point in world space.
    #[inline]
    pub fn transform_point(&self, local: &WorldPoint) -> WorldPoint {
        self.isometry * local
    }
}
