//! CAD Kernel trait definitions
//!
//! These traits define the interface that all CAD kernels must implement.

use std::sync::Arc;

use glam::{DAffine3, DVec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::body::Body;
use super::identity::ContentId;

/// Error type for CAD kernel operations
#[derive(Debug, Clone, Error)]
pub enum CadError {
    #[error("Invalid dimension: {0}")]
    InvalidDimension(String),

    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    #[error("Boolean operation failed: {0}")]
    BooleanFailed(String),

    #[error("Operation failed: {0}")]
    OperationFailed(String),

    #[error("Tessellation failed: {0}")]
    TessellationFailed(String),
}

/// Result type for CAD operations
pub type CadResult<T> = Result<T, CadError>;

/// A tessellated mesh output from the CAD kernel
///
/// Vertices are expressed in the solid's own coordinate frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TessellatedMesh {
    /// Vertex positions
    pub vertices: Vec<DVec3>,
    /// Triangles as counter-clockwise vertex index triples (outward facing)
    pub triangles: Vec<[u32; 3]>,
}

impl TessellatedMesh {
    /// Create an empty tessellated mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the mesh is empty
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Get the number of triangles
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Unit normal of a triangle (zero for degenerate triangles)
    pub fn triangle_normal(&self, index: usize) -> DVec3 {
        let [a, b, c] = self.triangles[index].map(|i| self.vertices[i as usize]);
        (b - a).cross(c - a).normalize_or_zero()
    }

    /// Axis-aligned bounds as (min, max)
    pub fn bounds(&self) -> Option<(DVec3, DVec3)> {
        let first = *self.vertices.first()?;
        Some(
            self.vertices
                .iter()
                .fold((first, first), |(min, max), v| (min.min(*v), max.max(*v))),
        )
    }

    /// Append another mesh, moving its vertices by `transform`
    pub fn append(&mut self, other: &TessellatedMesh, transform: &DAffine3) {
        let offset = self.vertices.len() as u32;
        self.vertices
            .extend(other.vertices.iter().map(|v| transform.transform_point3(*v)));
        self.triangles
            .extend(other.triangles.iter().map(|t| t.map(|i| i + offset)));
    }
}

/// A straight edge selected for filleting or chamfering
///
/// The kernel needs the outward normals of the two faces meeting at the edge
/// to know which side holds material.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Start point of the edge
    pub start: DVec3,
    /// End point of the edge
    pub end: DVec3,
    /// Outward normals of the two adjacent faces
    pub normals: [DVec3; 2],
}

impl Edge {
    /// Create an edge from its endpoints and adjacent face normals
    pub fn new(start: DVec3, end: DVec3, normal_a: DVec3, normal_b: DVec3) -> Self {
        Self {
            start,
            end,
            normals: [normal_a, normal_b],
        }
    }

    /// Length of the edge
    pub fn length(&self) -> f64 {
        (self.end - self.start).length()
    }
}

/// Boolean operation type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BooleanType {
    /// Union (add)
    Union,
    /// Subtraction (cut)
    Subtract,
    /// Intersection (common)
    Intersect,
}

impl BooleanType {
    pub(crate) fn tag(self) -> u64 {
        match self {
            BooleanType::Union => 0,
            BooleanType::Subtract => 1,
            BooleanType::Intersect => 2,
        }
    }
}

/// A 3D solid body
///
/// Immutable once built: operations always return a new solid. Cloning only
/// bumps a reference count.
#[derive(Debug, Clone)]
pub struct Solid {
    id: ContentId,
    body: Arc<Body>,
}

impl Solid {
    /// Create a solid from its identity and boundary
    pub fn new(id: ContentId, body: Body) -> Self {
        Self {
            id,
            body: Arc::new(body),
        }
    }

    /// Content identity of this solid
    pub fn id(&self) -> ContentId {
        self.id
    }

    /// Boundary faces of this solid
    pub fn body(&self) -> &Body {
        &self.body
    }
}

impl PartialEq for Solid {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Solid {}

/// The main CAD kernel trait
///
/// Implementations of this trait provide the actual geometry operations.
/// Every constructor is deterministic: identical inputs give a solid with
/// the same [`ContentId`].
pub trait CadKernel: Send + Sync {
    /// Get the name of this kernel
    fn name(&self) -> &str;

    /// Create an axis-aligned box primitive
    fn create_box(&self, center: DVec3, size: DVec3) -> CadResult<Solid>;

    /// Create a cylinder primitive
    ///
    /// # Arguments
    /// * `center` - Center of the cylinder (midway along the axis)
    /// * `radius` - Cylinder radius
    /// * `height` - Length along the axis
    /// * `axis` - Axis direction
    fn create_cylinder(
        &self,
        center: DVec3,
        radius: f64,
        height: f64,
        axis: DVec3,
    ) -> CadResult<Solid>;

    /// Extrude a planar convex profile along a direction
    fn extrude(&self, profile: &[DVec3], direction: DVec3) -> CadResult<Solid>;

    /// Perform a boolean operation on two solids
    fn boolean(&self, a: &Solid, b: &Solid, op: BooleanType) -> CadResult<Solid>;

    /// Move a solid by an affine transform
    fn transform(&self, solid: &Solid, transform: &DAffine3) -> CadResult<Solid>;

    /// Apply fillet (rounded edge) to selected edges
    fn fillet(&self, solid: &Solid, edges: &[Edge], radius: f64) -> CadResult<Solid>;

    /// Apply chamfer (beveled edge) to selected edges
    fn chamfer(&self, solid: &Solid, edges: &[Edge], distance: f64) -> CadResult<Solid>;

    /// Tessellate a solid into triangles
    ///
    /// # Arguments
    /// * `solid` - The solid to tessellate
    /// * `tolerance` - The tessellation tolerance (lower = finer mesh)
    fn tessellate(&self, solid: &Solid, tolerance: f64) -> CadResult<TessellatedMesh>;

    /// Content identity of a solid, stable across equal constructions
    fn content_id(&self, solid: &Solid) -> ContentId {
        solid.id()
    }

    /// Union of two solids
    fn union(&self, a: &Solid, b: &Solid) -> CadResult<Solid> {
        self.boolean(a, b, BooleanType::Union)
    }

    /// Subtract `b` from `a`
    fn subtract(&self, a: &Solid, b: &Solid) -> CadResult<Solid> {
        self.boolean(a, b, BooleanType::Subtract)
    }
}
