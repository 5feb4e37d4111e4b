//! Recording kernel for tests
//!
//! Produces the same content identities as [`MeshKernel`](super::MeshKernel)
//! but skips real boolean evaluation. Counts every construction and
//! tessellation, and can be told to fail tessellating specific solids.

use std::sync::atomic::{AtomicUsize, Ordering};

use glam::{DAffine3, DVec3};
use parking_lot::Mutex;
use rustc_hash::FxHashSet;

use super::body::{Body, cylinder_segments};
use super::identity::{ContentId, Recipe};
use super::mesh::DEFAULT_LINEAR_TOLERANCE;
use super::traits::{BooleanType, CadError, CadKernel, CadResult, Edge, Solid, TessellatedMesh};

/// Faceting used for mock cylinders
const MOCK_SEGMENTS: u32 = 8;

/// Mock kernel with call counters and injectable failures
#[derive(Debug, Default)]
pub struct MockKernel {
    constructions: AtomicUsize,
    tessellations: AtomicUsize,
    failing: Mutex<FxHashSet<ContentId>>,
}

impl MockKernel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later tessellation of `id` fail
    pub fn fail_tessellation_of(&self, id: ContentId) {
        self.failing.lock().insert(id);
    }

    /// Stop failing tessellations
    pub fn clear_failures(&self) {
        self.failing.lock().clear();
    }

    /// Number of `tessellate` calls so far
    pub fn tessellation_count(&self) -> usize {
        self.tessellations.load(Ordering::SeqCst)
    }

    /// Number of solids constructed so far
    pub fn construction_count(&self) -> usize {
        self.constructions.load(Ordering::SeqCst)
    }

    /// Reset both counters
    pub fn reset_counts(&self) {
        self.constructions.store(0, Ordering::SeqCst);
        self.tessellations.store(0, Ordering::SeqCst);
    }

    fn built(&self, id: ContentId, body: Body) -> CadResult<Solid> {
        self.constructions.fetch_add(1, Ordering::SeqCst);
        Ok(Solid::new(id, body))
    }

    fn edge_recipe(recipe: Recipe, solid: &Solid, edges: &[Edge]) -> CadResult<ContentId> {
        if edges.is_empty() {
            return Err(CadError::OperationFailed("no edges selected".into()));
        }
        Ok(edges
            .iter()
            .fold(recipe.solid(solid.id()), |recipe, edge| {
                recipe
                    .vector(edge.start)
                    .vector(edge.end)
                    .vector(edge.normals[0])
                    .vector(edge.normals[1])
            })
            .finish())
    }
}

impl CadKernel for MockKernel {
    fn name(&self) -> &str {
        "mock"
    }

    fn create_box(&self, center: DVec3, size: DVec3) -> CadResult<Solid> {
        if !size.is_finite() || size.min_element() <= 0.0 {
            return Err(CadError::InvalidDimension(format!(
                "box size must be positive, got {}",
                size
            )));
        }
        let id = Recipe::new("box").vector(center).vector(size).finish();
        self.built(id, Body::cuboid(center, size))
    }

    fn create_cylinder(
        &self,
        center: DVec3,
        radius: f64,
        height: f64,
        axis: DVec3,
    ) -> CadResult<Solid> {
        if !(radius.is_finite() && radius > 0.0 && height.is_finite() && height > 0.0) {
            return Err(CadError::InvalidDimension(format!(
                "cylinder radius {} and height {} must be positive",
                radius, height
            )));
        }
        let axis = axis
            .try_normalize()
            .ok_or_else(|| CadError::InvalidDimension("cylinder axis is zero".into()))?;
        let segments = cylinder_segments(radius, DEFAULT_LINEAR_TOLERANCE);
        let id = Recipe::new("cylinder")
            .vector(center)
            .scalar(radius)
            .scalar(height)
            .vector(axis)
            .count(segments as u64)
            .finish();
        self.built(
            id,
            Body::cylinder(center, radius, height, axis, MOCK_SEGMENTS),
        )
    }

    fn extrude(&self, profile: &[DVec3], direction: DVec3) -> CadResult<Solid> {
        if profile.len() < 3 {
            return Err(CadError::InvalidProfile(
                "profile needs at least three points".into(),
            ));
        }
        let id = profile
            .iter()
            .fold(Recipe::new("extrude"), |recipe, p| recipe.vector(*p))
            .vector(direction)
            .finish();
        self.built(id, Body::prism(profile, direction))
    }

    fn boolean(&self, a: &Solid, b: &Solid, op: BooleanType) -> CadResult<Solid> {
        let id = Recipe::new("boolean")
            .count(op.tag())
            .solid(a.id())
            .solid(b.id())
            .finish();
        let body = match op {
            BooleanType::Union => a.body().merged(b.body()),
            BooleanType::Subtract | BooleanType::Intersect => a.body().clone(),
        };
        self.built(id, body)
    }

    fn transform(&self, solid: &Solid, transform: &DAffine3) -> CadResult<Solid> {
        let id = Recipe::new("transform")
            .solid(solid.id())
            .affine(transform)
            .finish();
        self.built(id, solid.body().transformed(transform))
    }

    fn fillet(&self, solid: &Solid, edges: &[Edge], radius: f64) -> CadResult<Solid> {
        let recipe = Recipe::new("fillet")
            .scalar(radius)
            .count(cylinder_segments(radius, DEFAULT_LINEAR_TOLERANCE) as u64);
        let id = Self::edge_recipe(recipe, solid, edges)?;
        self.built(id, solid.body().clone())
    }

    fn chamfer(&self, solid: &Solid, edges: &[Edge], distance: f64) -> CadResult<Solid> {
        let id = Self::edge_recipe(Recipe::new("chamfer").scalar(distance), solid, edges)?;
        self.built(id, solid.body().clone())
    }

    fn tessellate(&self, solid: &Solid, tolerance: f64) -> CadResult<TessellatedMesh> {
        self.tessellations.fetch_add(1, Ordering::SeqCst);
        if self.failing.lock().contains(&solid.id()) {
            return Err(CadError::TessellationFailed(format!(
                "injected failure for {}",
                solid.id()
            )));
        }
        solid.body().triangulate(tolerance)
    }
}
