//! Rigid transforms for joints and placements

use std::ops::Mul;

use glam::{DAffine3, DQuat, DVec3, EulerRot};
use serde::{Deserialize, Serialize};

/// A rigid transform: rotation followed by translation
///
/// Applied to a point `p` as `rotation * p + translation`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RigidTransform {
    pub translation: DVec3,
    pub rotation: DQuat,
}

/// A joint frame expressed in its part's local coordinates
pub type LocalFrame = RigidTransform;

/// The world-space transform of a placed part
pub type Placement = RigidTransform;

impl Default for RigidTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl RigidTransform {
    pub const IDENTITY: Self = Self {
        translation: DVec3::ZERO,
        rotation: DQuat::IDENTITY,
    };

    /// Create a transform from a translation and rotation
    pub fn new(translation: DVec3, rotation: DQuat) -> Self {
        Self {
            translation,
            rotation: rotation.normalize(),
        }
    }

    /// Pure translation
    pub fn from_translation(translation: DVec3) -> Self {
        Self {
            translation,
            rotation: DQuat::IDENTITY,
        }
    }

    /// Pure rotation
    pub fn from_rotation(rotation: DQuat) -> Self {
        Self::new(DVec3::ZERO, rotation)
    }

    /// Position plus intrinsic X-Y-Z rotation angles in degrees
    pub fn from_euler_degrees(translation: DVec3, x: f64, y: f64, z: f64) -> Self {
        let rotation = DQuat::from_euler(
            EulerRot::XYZ,
            x.to_radians(),
            y.to_radians(),
            z.to_radians(),
        );
        Self::new(translation, rotation)
    }

    /// Inverse transform
    pub fn inverse(&self) -> Self {
        let rotation = self.rotation.inverse();
        Self {
            translation: -(rotation * self.translation),
            rotation,
        }
    }

    /// Transform a point
    pub fn transform_point(&self, point: DVec3) -> DVec3 {
        self.rotation * point + self.translation
    }

    /// Rotate a direction
    pub fn transform_vector(&self, vector: DVec3) -> DVec3 {
        self.rotation * vector
    }

    /// Convert to an affine matrix
    pub fn to_affine(&self) -> DAffine3 {
        DAffine3::from_rotation_translation(self.rotation, self.translation)
    }

    /// Compare within `epsilon` per component (`q` and `-q` are the same rotation)
    pub fn approx_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.translation.abs_diff_eq(other.translation, epsilon)
            && (self.rotation.abs_diff_eq(other.rotation, epsilon)
                || self.rotation.abs_diff_eq(-other.rotation, epsilon))
    }

    pub fn is_identity(&self, epsilon: f64) -> bool {
        self.approx_eq(&Self::IDENTITY, epsilon)
    }
}

impl Mul for RigidTransform {
    type Output = RigidTransform;

    /// `a * b` applies `b` first, then `a`
    fn mul(self, rhs: RigidTransform) -> RigidTransform {
        RigidTransform {
            translation: self.translation + self.rotation * rhs.translation,
            rotation: (self.rotation * rhs.rotation).normalize(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::PLACEMENT_EPSILON;

    fn sample() -> RigidTransform {
        RigidTransform::from_euler_degrees(DVec3::new(1.0, -2.0, 3.5), 30.0, -45.0, 110.0)
    }

    #[test]
    fn test_inverse_round_trip() {
        let t = sample();
        assert!((t * t.inverse()).is_identity(PLACEMENT_EPSILON));
        assert!((t.inverse() * t).is_identity(PLACEMENT_EPSILON));
    }

    #[test]
    fn test_compose_matches_affine() {
        let a = sample();
        let b = RigidTransform::from_euler_degrees(DVec3::new(0.0, 4.0, -1.0), 90.0, 0.0, 15.0);
        let p = DVec3::new(0.3, 0.7, -1.1);
        let composed = (a * b).transform_point(p);
        let affine = (a.to_affine() * b.to_affine()).transform_point3(p);
        assert!(composed.abs_diff_eq(affine, 1e-12));
    }

    #[test]
    fn test_negated_quaternion_is_equal() {
        let t = sample();
        let flipped = RigidTransform {
            translation: t.translation,
            rotation: -t.rotation,
        };
        assert!(t.approx_eq(&flipped, 1e-12));
    }

    #[test]
    fn test_translation_only() {
        let t = RigidTransform::from_translation(DVec3::new(0.0, 0.0, 5.0));
        let inv = t.inverse();
        approx::assert_relative_eq!(inv.translation.z, -5.0);
        assert!(inv.rotation.abs_diff_eq(DQuat::IDENTITY, 1e-15));
    }
}
