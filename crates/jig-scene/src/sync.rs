//! Scene synchronization
//!
//! Every rebuild replaces the scene content wholesale. Meshes come from the
//! tessellation cache; placements are applied as element transforms so they
//! never affect cache keys.

use std::sync::Arc;

use jig_cad::{CadError, CadKernel, CadResult, Recipe, TessellatedMesh};
use jig_core::{Part, PlacedAssembly, Placement, Rgb, Shape};

use crate::cache::{CachedMesh, TessellationCache};
use crate::camera::Camera;
use crate::config::SceneConfig;
use crate::scene::{RenderId, SceneBackend};

/// Render elements created for one top-level part
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderSet(Vec<RenderId>);

impl RenderSet {
    /// Element ids in creation order
    pub fn ids(&self) -> &[RenderId] {
        &self.0
    }

    /// Returns true if the set holds `id`
    pub fn contains(&self, id: RenderId) -> bool {
        self.0.contains(&id)
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the part produced no elements
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A part skipped because it could not be tessellated
#[derive(Debug, Clone)]
pub struct SyncFailure {
    /// Label of the skipped part
    pub label: String,
    /// Kernel error
    pub error: CadError,
}

/// Result of a synchronization
#[derive(Debug, Clone, Default)]
pub struct SyncOutcome {
    /// One set per top-level part, in assembly order
    pub render_sets: Vec<RenderSet>,
    /// Parts left out of the scene
    pub failures: Vec<SyncFailure>,
}

/// Keeps a scene backend in step with rebuilt assemblies
///
/// Owns the tessellation cache for the lifetime of the session.
#[derive(Debug)]
pub struct SceneSync {
    cache: TessellationCache,
    config: SceneConfig,
    initial_view_pending: bool,
}

impl SceneSync {
    /// Create a synchronizer with an empty cache
    pub fn new(config: SceneConfig) -> Self {
        Self {
            cache: TessellationCache::new(config.cache_capacity, config.feature_angle),
            config,
            initial_view_pending: true,
        }
    }

    /// Keep the backend's current camera on the first sync
    ///
    /// Used when a camera pose was restored from configuration.
    pub fn skip_initial_view(&mut self) {
        self.initial_view_pending = false;
    }

    /// Configuration in use
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// The tessellation cache
    pub fn cache(&self) -> &TessellationCache {
        &self.cache
    }

    /// Replace the scene content with `assembly`
    ///
    /// Parts that fail to tessellate are skipped and reported; everything
    /// else is still shown.
    pub fn sync(
        &mut self,
        kernel: &dyn CadKernel,
        backend: &mut dyn SceneBackend,
        assembly: &PlacedAssembly,
    ) -> SyncOutcome {
        backend.clear_content();

        let mut outcome = SyncOutcome::default();
        let mut walk = Walk {
            kernel,
            backend,
            failures: &mut outcome.failures,
            unnamed: 0,
        };

        for placed in assembly.parts() {
            let mut ids = Vec::new();
            self.render_part(&mut walk, placed.part(), *placed.placement(), None, &mut ids);
            outcome.render_sets.push(RenderSet(ids));
        }

        if self.initial_view_pending {
            let camera = backend
                .bounds()
                .map(|b| Camera::isometric_fit(&b))
                .unwrap_or_default();
            backend.set_camera(camera);
            self.initial_view_pending = false;
        }
        backend.render();

        let stats = self.cache.stats();
        tracing::info!(
            "Synced {} parts ({} skipped), cache {} entries, {} hits / {} misses",
            assembly.len(),
            outcome.failures.len(),
            self.cache.len(),
            stats.hits,
            stats.misses
        );
        outcome
    }

    fn render_part(
        &mut self,
        walk: &mut Walk<'_>,
        part: &Part,
        world: Placement,
        inherited: Option<Rgb>,
        ids: &mut Vec<RenderId>,
    ) {
        match part.shape() {
            Shape::Solid(solid) => {
                let color = part
                    .color()
                    .or(inherited)
                    .unwrap_or(self.config.default_color);
                let mesh = self
                    .cache
                    .tessellate(walk.kernel, solid, self.config.tessellation_tolerance);
                self.emit(walk, part.label(), mesh, world, color, ids);
            }
            Shape::Compound(children) => match part.color() {
                Some(color) => {
                    let mesh = self.merged_mesh(walk.kernel, part);
                    self.emit(walk, part.label(), mesh, world, color, ids);
                }
                None => {
                    for child in children {
                        self.render_part(
                            walk,
                            child.part(),
                            world * *child.placement(),
                            inherited,
                            ids,
                        );
                    }
                }
            },
        }
    }

    /// One mesh for all leaves of a compound, cached under a combined identity
    fn merged_mesh(&mut self, kernel: &dyn CadKernel, part: &Part) -> CadResult<Arc<CachedMesh>> {
        let tolerance = self.config.tessellation_tolerance;
        let leaves = part.leaves();
        let id = leaves
            .iter()
            .fold(Recipe::new("merged"), |recipe, (solid, local)| {
                recipe
                    .solid(kernel.content_id(solid))
                    .affine(&local.to_affine())
            })
            .finish();
        // Only a present merged mesh is looked up; its leaves count the misses
        let cached = self
            .cache
            .contains(id, tolerance)
            .then(|| self.cache.get(id, tolerance))
            .flatten();
        if let Some(entry) = cached {
            return Ok(entry);
        }

        let mut merged = TessellatedMesh::new();
        for (solid, local) in &leaves {
            let leaf = self.cache.tessellate(kernel, solid, tolerance)?;
            merged.append(&leaf.mesh, &local.to_affine());
        }
        Ok(self.cache.insert(id, tolerance, merged))
    }

    fn emit(
        &self,
        walk: &mut Walk<'_>,
        label: &str,
        mesh: CadResult<Arc<CachedMesh>>,
        world: Placement,
        color: Rgb,
        ids: &mut Vec<RenderId>,
    ) {
        let mesh = match mesh {
            Ok(mesh) => mesh,
            Err(error) => {
                tracing::warn!("Skipping '{}': {}", label, error);
                walk.failures.push(SyncFailure {
                    label: label.to_string(),
                    error,
                });
                return;
            }
        };

        let name = if label.is_empty() {
            walk.unnamed += 1;
            format!("part_{}", walk.unnamed)
        } else {
            label.to_string()
        };
        let transform = world.to_affine();
        let has_edges = !mesh.feature_edges.is_empty();

        ids.push(walk.backend.add_surface(
            &name,
            Arc::clone(&mesh),
            transform,
            color,
            self.config.shading,
        ));
        if has_edges {
            ids.push(walk.backend.add_edges(
                &format!("{}_e", name),
                mesh,
                transform,
                self.config.edge_color,
                self.config.edge_width,
            ));
        }
    }
}

/// Per-sync traversal state
struct Walk<'a> {
    kernel: &'a dyn CadKernel,
    backend: &'a mut dyn SceneBackend,
    failures: &'a mut Vec<SyncFailure>,
    unnamed: usize,
}

/// Show or hide exactly the elements of one render set
///
/// Touches neither geometry nor the cache. Returns how many elements were
/// found in the backend.
pub fn set_visibility(backend: &mut dyn SceneBackend, set: &RenderSet, visible: bool) -> usize {
    let changed = set
        .ids()
        .iter()
        .filter(|id| backend.set_visible(**id, visible))
        .count();
    backend.render();
    changed
}
