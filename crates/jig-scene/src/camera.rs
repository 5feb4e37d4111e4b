//! Camera pose and default views

use glam::DVec3;
use jig_core::CameraPose;

use crate::bounds::BoundingBox;

/// Distance from the focal point in multiples of the scene radius
const FIT_DISTANCE_FACTOR: f64 = 2.5;

/// Viewing camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Eye position
    pub position: DVec3,
    /// Point the camera looks at
    pub focal_point: DVec3,
    /// Up direction
    pub up: DVec3,
}

impl Default for Camera {
    fn default() -> Self {
        Self::isometric(DVec3::ZERO, 1.0)
    }
}

impl Camera {
    /// Isometric view along (1, 1, 1) towards `focal_point`, Z up
    pub fn isometric(focal_point: DVec3, distance: f64) -> Self {
        let direction = DVec3::ONE.normalize();
        Self {
            position: focal_point + direction * distance,
            focal_point,
            up: DVec3::Z,
        }
    }

    /// Isometric view framing `bounds`
    pub fn isometric_fit(bounds: &BoundingBox) -> Self {
        let distance = (bounds.radius() * FIT_DISTANCE_FACTOR).max(1.0);
        Self::isometric(bounds.center(), distance)
    }

    /// Distance between eye and focal point
    pub fn distance(&self) -> f64 {
        self.position.distance(self.focal_point)
    }
}

impl From<CameraPose> for Camera {
    fn from(pose: CameraPose) -> Self {
        Self {
            position: pose.position,
            focal_point: pose.focal_point,
            up: pose.up,
        }
    }
}

impl From<Camera> for CameraPose {
    fn from(camera: Camera) -> Self {
        Self {
            position: camera.position,
            focal_point: camera.focal_point,
            up: camera.up,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_isometric_fit_centers_bounds() {
        let bounds = BoundingBox::new(DVec3::new(-10.0, -10.0, 0.0), DVec3::new(10.0, 10.0, 20.0));
        let camera = Camera::isometric_fit(&bounds);
        assert_eq!(camera.focal_point, DVec3::new(0.0, 0.0, 10.0));
        assert_eq!(camera.up, DVec3::Z);

        let view = (camera.position - camera.focal_point).normalize();
        assert!(view.abs_diff_eq(DVec3::ONE.normalize(), 1e-12));
        approx::assert_relative_eq!(camera.distance(), bounds.radius() * 2.5, epsilon = 1e-9);
    }

    #[test]
    fn test_pose_conversion() {
        let camera = Camera::isometric(DVec3::new(1.0, 2.0, 3.0), 10.0);
        let pose: CameraPose = camera.into();
        assert_eq!(Camera::from(pose), camera);
    }
}
