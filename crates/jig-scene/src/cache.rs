//! Tessellation cache
//!
//! Meshes are stored in the solid's local frame, keyed by the solid's
//! content identity and the tolerance. Placement is applied when elements
//! are created, so moving a part never invalidates its entry. When the cache
//! is full it is cleared wholesale before the next insert.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use jig_cad::{CadKernel, CadResult, ContentId, Solid, TessellatedMesh};

use crate::edges::feature_edges;

/// A tessellated mesh with its feature edges
#[derive(Debug, Clone, PartialEq)]
pub struct CachedMesh {
    /// Triangles in the solid's local frame
    pub mesh: TessellatedMesh,
    /// Feature edges as vertex index pairs into `mesh`
    pub feature_edges: Vec<[u32; 2]>,
}

impl CachedMesh {
    /// Compute feature edges for a mesh
    pub fn new(mesh: TessellatedMesh, feature_angle: f64) -> Self {
        let feature_edges = feature_edges(&mesh, feature_angle);
        Self {
            mesh,
            feature_edges,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CacheKey {
    id: ContentId,
    tolerance_bits: u64,
}

impl CacheKey {
    fn new(id: ContentId, tolerance: f64) -> Self {
        Self {
            id,
            tolerance_bits: tolerance.to_bits(),
        }
    }
}

/// Hit and miss counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cache
    pub hits: usize,
    /// Lookups that had to tessellate
    pub misses: usize,
    /// Times the cache was cleared for being full
    pub evictions: usize,
}

/// Memoized tessellation keyed by content identity
#[derive(Debug)]
pub struct TessellationCache {
    entries: FxHashMap<CacheKey, Arc<CachedMesh>>,
    capacity: usize,
    feature_angle: f64,
    stats: CacheStats,
}

impl TessellationCache {
    /// Create a cache holding up to `capacity` meshes
    pub fn new(capacity: usize, feature_angle: f64) -> Self {
        Self {
            entries: FxHashMap::default(),
            capacity: capacity.max(1),
            feature_angle,
            stats: CacheStats::default(),
        }
    }

    /// Mesh of `solid` at `tolerance`, tessellating only on a miss
    pub fn tessellate(
        &mut self,
        kernel: &dyn CadKernel,
        solid: &Solid,
        tolerance: f64,
    ) -> CadResult<Arc<CachedMesh>> {
        let id = kernel.content_id(solid);
        self.get_or_insert_with(id, tolerance, || kernel.tessellate(solid, tolerance))
    }

    /// Cached mesh for `id`, or build, store and return it
    ///
    /// A failed build stores nothing.
    pub fn get_or_insert_with(
        &mut self,
        id: ContentId,
        tolerance: f64,
        build: impl FnOnce() -> CadResult<TessellatedMesh>,
    ) -> CadResult<Arc<CachedMesh>> {
        match self.get(id, tolerance) {
            Some(entry) => Ok(entry),
            None => Ok(self.insert(id, tolerance, build()?)),
        }
    }

    /// Look up a cached mesh, counting the hit or miss
    pub fn get(&mut self, id: ContentId, tolerance: f64) -> Option<Arc<CachedMesh>> {
        match self.entries.get(&CacheKey::new(id, tolerance)) {
            Some(entry) => {
                self.stats.hits += 1;
                tracing::debug!("Mesh cache hit for {}", id);
                Some(Arc::clone(entry))
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    /// Store a freshly tessellated mesh
    ///
    /// Clears the whole cache first when it is full.
    pub fn insert(&mut self, id: ContentId, tolerance: f64, mesh: TessellatedMesh) -> Arc<CachedMesh> {
        tracing::debug!(
            "Caching mesh for {} ({} triangles)",
            id,
            mesh.triangle_count()
        );
        if self.entries.len() >= self.capacity {
            tracing::warn!("Mesh cache full ({} entries), clearing", self.entries.len());
            self.entries.clear();
            self.stats.evictions += 1;
        }

        let entry = Arc::new(CachedMesh::new(mesh, self.feature_angle));
        self.entries.insert(CacheKey::new(id, tolerance), Arc::clone(&entry));
        entry
    }

    /// Check whether a mesh for `id` at `tolerance` is cached
    pub fn contains(&self, id: ContentId, tolerance: f64) -> bool {
        self.entries.contains_key(&CacheKey::new(id, tolerance))
    }

    /// Number of cached meshes
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is cached
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of cached meshes
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Hit and miss counters
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;
    use jig_cad::{CadError, MockKernel};

    #[test]
    fn test_second_lookup_hits() {
        let kernel = MockKernel::new();
        let mut cache = TessellationCache::new(10, 20.0);
        let solid = kernel.create_box(DVec3::ZERO, DVec3::ONE).unwrap();

        let a = cache.tessellate(&kernel, &solid, 0.1).unwrap();
        let b = cache.tessellate(&kernel, &solid, 0.1).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(kernel.tessellation_count(), 1);
        assert_eq!(cache.stats().hits, 1);
        assert_eq!(cache.stats().misses, 1);
        assert_eq!(a.feature_edges.len(), 12);
    }

    #[test]
    fn test_equal_construction_shares_entry() {
        let kernel = MockKernel::new();
        let mut cache = TessellationCache::new(10, 20.0);
        let first = kernel.create_box(DVec3::ZERO, DVec3::ONE).unwrap();
        let second = kernel.create_box(DVec3::ZERO, DVec3::ONE).unwrap();

        cache.tessellate(&kernel, &first, 0.1).unwrap();
        cache.tessellate(&kernel, &second, 0.1).unwrap();
        assert_eq!(kernel.tessellation_count(), 1);
    }

    #[test]
    fn test_tolerance_is_part_of_key() {
        let kernel = MockKernel::new();
        let mut cache = TessellationCache::new(10, 20.0);
        let solid = kernel.create_box(DVec3::ZERO, DVec3::ONE).unwrap();

        cache.tessellate(&kernel, &solid, 0.1).unwrap();
        cache.tessellate(&kernel, &solid, 0.05).unwrap();
        assert_eq!(cache.len(), 2);
        assert!(cache.contains(solid.id(), 0.05));
    }

    #[test]
    fn test_full_cache_is_cleared_wholesale() {
        let kernel = MockKernel::new();
        let mut cache = TessellationCache::new(3, 20.0);
        for i in 0..3 {
            let solid = kernel
                .create_box(DVec3::new(i as f64, 0.0, 0.0), DVec3::ONE)
                .unwrap();
            cache.tessellate(&kernel, &solid, 0.1).unwrap();
        }
        assert_eq!(cache.len(), 3);

        let extra = kernel.create_box(DVec3::splat(9.0), DVec3::ONE).unwrap();
        cache.tessellate(&kernel, &extra, 0.1).unwrap();
        assert_eq!(cache.len(), 1);
        assert!(cache.contains(extra.id(), 0.1));
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_failure_is_not_cached() {
        let kernel = MockKernel::new();
        let mut cache = TessellationCache::new(10, 20.0);
        let solid = kernel.create_box(DVec3::ZERO, DVec3::ONE).unwrap();
        kernel.fail_tessellation_of(solid.id());

        assert!(matches!(
            cache.tessellate(&kernel, &solid, 0.1),
            Err(CadError::TessellationFailed(_))
        ));
        assert!(cache.is_empty());

        kernel.clear_failures();
        assert!(cache.tessellate(&kernel, &solid, 0.1).is_ok());
    }
}
