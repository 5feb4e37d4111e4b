//! Axis-aligned bounding boxes.

use glam::{DAffine3, DVec3};

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Minimum corner of the bounding box.
    pub min: DVec3,
    /// Maximum corner of the bounding box.
    pub max: DVec3,
}

impl BoundingBox {
    /// Creates a new bounding box from min and max points.
    pub fn new(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    /// Creates an empty (inverted) bounding box.
    pub fn empty() -> Self {
        Self {
            min: DVec3::splat(f64::INFINITY),
            max: DVec3::splat(f64::NEG_INFINITY),
        }
    }

    /// Creates a bounding box that contains all given points.
    pub fn from_points(points: impl IntoIterator<Item = DVec3>) -> Self {
        points
            .into_iter()
            .fold(Self::empty(), |bbox, p| bbox.expand_to_include(p))
    }

    /// Returns true if the box contains at least one point.
    pub fn is_valid(&self) -> bool {
        self.min.cmple(self.max).all()
    }

    /// Returns the center of the bounding box.
    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    /// Returns the size (full extents) of the bounding box.
    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }

    /// Returns the radius of the bounding sphere.
    pub fn radius(&self) -> f64 {
        (self.size() * 0.5).length()
    }

    /// Returns the union of two bounding boxes.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Returns a new bounding box expanded to include the given point.
    pub fn expand_to_include(&self, point: DVec3) -> BoundingBox {
        BoundingBox {
            min: self.min.min(point),
            max: self.max.max(point),
        }
    }

    /// Transforms the bounding box by the given matrix.
    ///
    /// Returns the axis-aligned box around the transformed corners.
    pub fn transform(&self, transform: &DAffine3) -> BoundingBox {
        let corners = [
            DVec3::new(self.min.x, self.min.y, self.min.z),
            DVec3::new(self.max.x, self.min.y, self.min.z),
            DVec3::new(self.min.x, self.max.y, self.min.z),
            DVec3::new(self.max.x, self.max.y, self.min.z),
            DVec3::new(self.min.x, self.min.y, self.max.z),
            DVec3::new(self.max.x, self.min.y, self.max.z),
            DVec3::new(self.min.x, self.max.y, self.max.z),
            DVec3::new(self.max.x, self.max.y, self.max.z),
        ];
        BoundingBox::from_points(corners.map(|c| transform.transform_point3(c)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points() {
        let bbox = BoundingBox::from_points([DVec3::new(1.0, -2.0, 0.0), DVec3::new(-1.0, 2.0, 4.0)]);
        assert_eq!(bbox.center(), DVec3::new(0.0, 0.0, 2.0));
        assert_eq!(bbox.size(), DVec3::new(2.0, 4.0, 4.0));
        assert!(bbox.is_valid());
        assert!(!BoundingBox::empty().is_valid());
    }

    #[test]
    fn test_transform_translates() {
        let bbox = BoundingBox::new(DVec3::ZERO, DVec3::ONE);
        let moved = bbox.transform(&DAffine3::from_translation(DVec3::new(0.0, 0.0, -5.0)));
        assert_eq!(moved.min, DVec3::new(0.0, 0.0, -5.0));
        assert_eq!(moved.max, DVec3::new(1.0, 1.0, -4.0));
    }
}
