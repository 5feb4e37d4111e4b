//! Content-based solid identities
//!
//! Every solid produced by a kernel carries a [`ContentId`] derived from its
//! construction recipe: the operation name, the exact bit pattern of every
//! numeric input and the identities of any input solids. Two solids built
//! from identical inputs share an id; changing any input changes it.

use std::fmt;
use std::hash::{Hash, Hasher};

use glam::{DAffine3, DVec3};
use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};

/// Stable, comparable identity of a solid's geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContentId(u64);

impl ContentId {
    /// Wrap a raw identity value
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw identity value
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Combined identity of an ordered group of solids
    pub fn combine(tag: &str, ids: impl IntoIterator<Item = ContentId>) -> Self {
        ids.into_iter()
            .fold(Recipe::new(tag), |recipe, id| recipe.solid(id))
            .finish()
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Incremental builder for a [`ContentId`]
///
/// Uses `FxHasher`: each word is mixed with a bijective step, so two recipes
/// that differ in exactly one input always produce different ids.
pub struct Recipe {
    hasher: FxHasher,
}

impl Recipe {
    /// Start a recipe for the named operation
    pub fn new(operation: &str) -> Self {
        let mut hasher = FxHasher::default();
        operation.hash(&mut hasher);
        Self { hasher }
    }

    /// Add a scalar input
    pub fn scalar(mut self, value: f64) -> Self {
        // -0.0 and 0.0 build the same geometry
        let value = if value == 0.0 { 0.0 } else { value };
        value.to_bits().hash(&mut self.hasher);
        self
    }

    /// Add a vector input
    pub fn vector(self, value: DVec3) -> Self {
        self.scalar(value.x).scalar(value.y).scalar(value.z)
    }

    /// Add an affine transform input
    pub fn affine(self, value: &DAffine3) -> Self {
        self.vector(value.matrix3.x_axis)
            .vector(value.matrix3.y_axis)
            .vector(value.matrix3.z_axis)
            .vector(value.translation)
    }

    /// Add an integer input (segment counts, operation kinds)
    pub fn count(mut self, value: u64) -> Self {
        value.hash(&mut self.hasher);
        self
    }

    /// Add an input solid
    pub fn solid(mut self, id: ContentId) -> Self {
        id.0.hash(&mut self.hasher);
        self
    }

    /// Finish the recipe
    pub fn finish(self) -> ContentId {
        ContentId(self.hasher.finish())
    }
}
