//! Polygonal boundary representation
//!
//! A [`Body`] is a closed set of planar convex faces whose vertices wind
//! counter-clockwise around the outward normal. Both kernels build and
//! triangulate bodies through this module.

use std::f64::consts::PI;

use glam::{DAffine3, DVec3};
use rustc_hash::FxHashMap;

use super::traits::{CadError, CadResult, TessellatedMesh};

/// Minimum number of segments for a circular profile
const MIN_SEGMENTS: u32 = 12;

/// Maximum number of segments for a circular profile
const MAX_SEGMENTS: u32 = 128;

/// Vertices closer than `tolerance * WELD_FRACTION` are merged on tessellation
const WELD_FRACTION: f64 = 1e-3;

/// A planar convex face
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    /// Vertices, counter-clockwise around `normal`
    pub points: Vec<DVec3>,
    /// Outward unit normal
    pub normal: DVec3,
}

impl Face {
    /// Build a face, computing its normal from the winding
    ///
    /// Returns `None` for degenerate (zero-area) polygons.
    pub fn new(points: Vec<DVec3>) -> Option<Self> {
        if points.len() < 3 {
            return None;
        }
        let normal = newell_normal(&points).try_normalize()?;
        Some(Self { points, normal })
    }
}

/// Closed polygonal boundary of a solid
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Body {
    faces: Vec<Face>,
}

impl Body {
    /// Create a body from faces
    pub fn from_faces(faces: Vec<Face>) -> Self {
        Self { faces }
    }

    /// Boundary faces
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Check if the body has no faces
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Axis-aligned bounds as (min, max)
    pub fn bounds(&self) -> Option<(DVec3, DVec3)> {
        let mut points = self.faces.iter().flat_map(|f| f.points.iter().copied());
        let first = points.next()?;
        Some(points.fold((first, first), |(min, max), p| (min.min(p), max.max(p))))
    }

    /// Apply an affine transform
    ///
    /// Mirroring transforms flip the winding so faces stay outward facing.
    pub fn transformed(&self, transform: &DAffine3) -> Body {
        let mirrored = transform.matrix3.determinant() < 0.0;
        let faces = self
            .faces
            .iter()
            .filter_map(|face| {
                let mut points: Vec<DVec3> = face
                    .points
                    .iter()
                    .map(|p| transform.transform_point3(*p))
                    .collect();
                if mirrored {
                    points.reverse();
                }
                Face::new(points)
            })
            .collect();
        Body { faces }
    }

    /// Faces of both bodies, without resolving overlaps
    pub fn merged(&self, other: &Body) -> Body {
        let mut faces = self.faces.clone();
        faces.extend(other.faces.iter().cloned());
        Body { faces }
    }

    /// Axis-aligned box
    pub fn cuboid(center: DVec3, size: DVec3) -> Body {
        let min = center - size * 0.5;
        let max = center + size * 0.5;
        let base = [
            DVec3::new(min.x, min.y, min.z),
            DVec3::new(max.x, min.y, min.z),
            DVec3::new(max.x, max.y, min.z),
            DVec3::new(min.x, max.y, min.z),
        ];
        Body::prism(&base, DVec3::new(0.0, 0.0, size.z))
    }

    /// Cylinder approximated by a regular polygon prism
    pub fn cylinder(center: DVec3, radius: f64, height: f64, axis: DVec3, segments: u32) -> Body {
        let axis = axis.normalize();
        let (u, v) = axis.any_orthonormal_pair();
        let base_center = center - axis * (height * 0.5);
        let profile: Vec<DVec3> = (0..segments)
            .map(|i| {
                let angle = (i as f64 / segments as f64) * 2.0 * PI;
                base_center + (u * angle.cos() + v * angle.sin()) * radius
            })
            .collect();
        Body::prism(&profile, axis * height)
    }

    /// Extrude a planar convex polygon along `direction`
    ///
    /// The profile may wind either way; the result is always outward facing.
    pub fn prism(profile: &[DVec3], direction: DVec3) -> Body {
        let mut base = profile.to_vec();
        if newell_normal(&base).dot(direction) < 0.0 {
            base.reverse();
        }
        let top: Vec<DVec3> = base.iter().map(|p| *p + direction).collect();

        let mut faces = Vec::with_capacity(base.len() + 2);
        let mut bottom = base.clone();
        bottom.reverse();
        faces.extend(Face::new(bottom));
        faces.extend(Face::new(top.clone()));

        let n = base.len();
        for i in 0..n {
            let j = (i + 1) % n;
            faces.extend(Face::new(vec![base[i], base[j], top[j], top[i]]));
        }
        Body { faces }
    }

    /// Extrude a planar polygon that is star-shaped around its first point
    ///
    /// The caps are split into triangles fanning out from that point, so the
    /// profile does not need to be convex.
    pub fn fan_prism(profile: &[DVec3], direction: DVec3) -> Body {
        let mut base = profile.to_vec();
        if base.len() > 1 && newell_normal(&base).dot(direction) < 0.0 {
            base[1..].reverse();
        }
        let top: Vec<DVec3> = base.iter().map(|p| *p + direction).collect();

        let n = base.len();
        let mut faces = Vec::with_capacity(3 * n);
        for i in 1..n.saturating_sub(1) {
            faces.extend(Face::new(vec![base[0], base[i + 1], base[i]]));
            faces.extend(Face::new(vec![top[0], top[i], top[i + 1]]));
        }
        for i in 0..n {
            let j = (i + 1) % n;
            faces.extend(Face::new(vec![base[i], base[j], top[j], top[i]]));
        }
        Body { faces }
    }

    /// Triangulate all faces into an indexed mesh
    ///
    /// Faces are fan-triangulated (they are convex) and coincident vertices
    /// within a tolerance-derived grid are welded so adjacent faces share
    /// vertices.
    pub fn triangulate(&self, tolerance: f64) -> CadResult<TessellatedMesh> {
        if !tolerance.is_finite() || tolerance <= 0.0 {
            return Err(CadError::TessellationFailed(format!(
                "tolerance must be positive, got {}",
                tolerance
            )));
        }

        let cell = tolerance * WELD_FRACTION;
        let mut welded: FxHashMap<[i64; 3], u32> = FxHashMap::default();
        let mut mesh = TessellatedMesh::new();

        for face in &self.faces {
            let ids: Vec<u32> = face
                .points
                .iter()
                .map(|p| {
                    let key = [
                        (p.x / cell).round() as i64,
                        (p.y / cell).round() as i64,
                        (p.z / cell).round() as i64,
                    ];
                    *welded.entry(key).or_insert_with(|| {
                        mesh.vertices.push(*p);
                        (mesh.vertices.len() - 1) as u32
                    })
                })
                .collect();

            for i in 1..ids.len().saturating_sub(1) {
                let triangle = [ids[0], ids[i], ids[i + 1]];
                if triangle[0] != triangle[1]
                    && triangle[1] != triangle[2]
                    && triangle[0] != triangle[2]
                {
                    mesh.triangles.push(triangle);
                }
            }
        }

        if mesh.is_empty() {
            return Err(CadError::TessellationFailed(
                "solid has no triangulable faces".into(),
            ));
        }
        Ok(mesh)
    }
}

/// Number of segments keeping the chord deviation of a circle within `tolerance`
pub fn cylinder_segments(radius: f64, tolerance: f64) -> u32 {
    let ratio = (1.0 - tolerance / radius).clamp(-1.0, 1.0);
    let half_angle = ratio.acos();
    if half_angle <= f64::EPSILON {
        return MAX_SEGMENTS;
    }
    ((PI / half_angle).ceil() as u32).clamp(MIN_SEGMENTS, MAX_SEGMENTS)
}

/// Check that a profile is planar, convex and non-degenerate
pub(crate) fn validate_convex_profile(profile: &[DVec3]) -> CadResult<DVec3> {
    if profile.len() < 3 {
        return Err(CadError::InvalidProfile(
            "profile must have at least 3 points".into(),
        ));
    }
    if profile.iter().any(|p| !p.is_finite()) {
        return Err(CadError::InvalidProfile("profile has non-finite points".into()));
    }
    let normal = newell_normal(profile)
        .try_normalize()
        .ok_or_else(|| CadError::InvalidProfile("profile has zero area".into()))?;

    let n = profile.len();
    let scale = profile
        .iter()
        .map(|p| (*p - profile[0]).length())
        .fold(0.0, f64::max);
    let eps = scale * 1e-9;
    for i in 0..n {
        let a = profile[i];
        let b = profile[(i + 1) % n];
        let c = profile[(i + 2) % n];
        if (a - profile[0]).dot(normal).abs() > eps.max(1e-12) {
            return Err(CadError::InvalidProfile("profile is not planar".into()));
        }
        if (b - a).cross(c - b).dot(normal) < -eps * scale {
            return Err(CadError::InvalidProfile("profile is not convex".into()));
        }
    }
    Ok(normal)
}

fn newell_normal(points: &[DVec3]) -> DVec3 {
    let mut normal = DVec3::ZERO;
    for (i, p) in points.iter().enumerate() {
        let q = points[(i + 1) % points.len()];
        normal.x += (p.y - q.y) * (p.z + q.z);
        normal.y += (p.z - q.z) * (p.x + q.x);
        normal.z += (p.x - q.x) * (p.y + q.y);
    }
    normal
}
