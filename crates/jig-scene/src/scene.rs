//! Renderable scene
//!
//! [`SceneBackend`] is the narrow surface the synchronizer drives. [`Scene`]
//! is the in-memory implementation: it keeps fixed furniture (the axes)
//! across clears and holds each element's world-space vertex data ready for
//! upload.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use glam::DAffine3;
use jig_core::Rgb;

use crate::bounds::BoundingBox;
use crate::cache::CachedMesh;
use crate::camera::Camera;
use crate::config::Shading;
use crate::vertex::{LineVertex, SurfaceVertex};

/// Identifier of a renderable element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RenderId(u64);

impl RenderId {
    /// Raw identifier value
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RenderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What an element draws
#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    /// Shaded surface
    Surface {
        /// Shading model
        shading: Shading,
        /// Triangle vertices
        vertices: Vec<SurfaceVertex>,
    },
    /// Edge overlay
    Edges {
        /// Line width
        width: f32,
        /// Segment vertices
        vertices: Vec<LineVertex>,
    },
}

/// One renderable element
#[derive(Debug, Clone)]
pub struct Element {
    /// Element name (`label` for surfaces, `label_e` for edges)
    pub name: String,
    /// Display color
    pub color: Rgb,
    /// Placement applied to the cached mesh
    pub transform: DAffine3,
    /// Geometry
    pub kind: ElementKind,
    /// Visibility
    pub visible: bool,
    /// Source mesh
    pub mesh: Arc<CachedMesh>,
}

impl Element {
    /// Returns true for surface elements
    pub fn is_surface(&self) -> bool {
        matches!(self.kind, ElementKind::Surface { .. })
    }

    /// World-space bounds
    pub fn bounds(&self) -> Option<BoundingBox> {
        let (min, max) = self.mesh.mesh.bounds()?;
        Some(BoundingBox::new(min, max).transform(&self.transform))
    }

    /// Vertex data as bytes for upload
    pub fn vertex_bytes(&self) -> &[u8] {
        match &self.kind {
            ElementKind::Surface { vertices, .. } => bytemuck::cast_slice(vertices),
            ElementKind::Edges { vertices, .. } => bytemuck::cast_slice(vertices),
        }
    }
}

/// Target of scene synchronization
pub trait SceneBackend {
    /// Add a shaded surface, returning its id
    fn add_surface(
        &mut self,
        name: &str,
        mesh: Arc<CachedMesh>,
        transform: DAffine3,
        color: Rgb,
        shading: Shading,
    ) -> RenderId;

    /// Add an edge overlay for the mesh's feature edges, returning its id
    fn add_edges(
        &mut self,
        name: &str,
        mesh: Arc<CachedMesh>,
        transform: DAffine3,
        color: Rgb,
        width: f32,
    ) -> RenderId;

    /// Remove one element; returns false for unknown ids
    fn remove(&mut self, id: RenderId) -> bool;

    /// Remove every element except fixed furniture
    fn clear_content(&mut self);

    /// Show or hide an element; returns false for unknown ids
    fn set_visible(&mut self, id: RenderId, visible: bool) -> bool;

    /// Bounds of all content elements
    fn bounds(&self) -> Option<BoundingBox>;

    /// Current camera
    fn camera(&self) -> Camera;

    /// Replace the camera
    fn set_camera(&mut self, camera: Camera);

    /// Request a redraw
    fn render(&mut self) {}
}

/// In-memory scene
#[derive(Debug)]
pub struct Scene {
    furniture: Vec<String>,
    elements: BTreeMap<RenderId, Element>,
    camera: Camera,
    background: Rgb,
    next_id: u64,
    frames: u64,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Create a scene with coordinate axes
    pub fn new() -> Self {
        Self {
            furniture: vec!["axes".to_string()],
            elements: BTreeMap::new(),
            camera: Camera::default(),
            background: Rgb::new(0xdc, 0xdc, 0xdc),
            next_id: 0,
            frames: 0,
        }
    }

    /// Set the background color
    pub fn with_background(mut self, background: Rgb) -> Self {
        self.background = background;
        self
    }

    /// Background color
    pub fn background(&self) -> Rgb {
        self.background
    }

    /// Names of fixed furniture kept across clears
    pub fn furniture(&self) -> &[String] {
        &self.furniture
    }

    /// Element by id
    pub fn get(&self, id: RenderId) -> Option<&Element> {
        self.elements.get(&id)
    }

    /// First element with the given name
    pub fn find(&self, name: &str) -> Option<(RenderId, &Element)> {
        self.elements
            .iter()
            .find(|(_, e)| e.name == name)
            .map(|(id, e)| (*id, e))
    }

    /// All content elements in creation order
    pub fn elements(&self) -> impl Iterator<Item = (RenderId, &Element)> {
        self.elements.iter().map(|(id, e)| (*id, e))
    }

    /// Number of content elements
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns true if there are no content elements
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Ids of visible elements
    pub fn visible_ids(&self) -> Vec<RenderId> {
        self.elements
            .iter()
            .filter(|(_, e)| e.visible)
            .map(|(id, _)| *id)
            .collect()
    }

    /// Total vertex data size in bytes
    pub fn vertex_bytes(&self) -> usize {
        self.elements.values().map(|e| e.vertex_bytes().len()).sum()
    }

    /// Number of render requests so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    fn insert(&mut self, element: Element) -> RenderId {
        let id = RenderId(self.next_id);
        self.next_id += 1;
        self.elements.insert(id, element);
        id
    }
}

impl SceneBackend for Scene {
    fn add_surface(
        &mut self,
        name: &str,
        mesh: Arc<CachedMesh>,
        transform: DAffine3,
        color: Rgb,
        shading: Shading,
    ) -> RenderId {
        let vertices = SurfaceVertex::from_mesh(&mesh.mesh, &transform);
        self.insert(Element {
            name: name.to_string(),
            color,
            transform,
            kind: ElementKind::Surface { shading, vertices },
            visible: true,
            mesh,
        })
    }

    fn add_edges(
        &mut self,
        name: &str,
        mesh: Arc<CachedMesh>,
        transform: DAffine3,
        color: Rgb,
        width: f32,
    ) -> RenderId {
        let vertices = LineVertex::from_segments(&mesh.mesh, &mesh.feature_edges, &transform);
        self.insert(Element {
            name: name.to_string(),
            color,
            transform,
            kind: ElementKind::Edges { width, vertices },
            visible: true,
            mesh,
        })
    }

    fn remove(&mut self, id: RenderId) -> bool {
        self.elements.remove(&id).is_some()
    }

    fn clear_content(&mut self) {
        self.elements.clear();
    }

    fn set_visible(&mut self, id: RenderId, visible: bool) -> bool {
        match self.elements.get_mut(&id) {
            Some(element) => {
                element.visible = visible;
                true
            }
            None => false,
        }
    }

    fn bounds(&self) -> Option<BoundingBox> {
        self.elements
            .values()
            .filter_map(Element::bounds)
            .reduce(|a, b| a.union(&b))
    }

    fn camera(&self) -> Camera {
        self.camera
    }

    fn set_camera(&mut self, camera: Camera) {
        self.camera = camera;
    }

    fn render(&mut self) {
        self.frames += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;
    use jig_cad::{CadKernel, MockKernel};

    fn cube_mesh() -> Arc<CachedMesh> {
        let kernel = MockKernel::new();
        let solid = kernel.create_box(DVec3::ZERO, DVec3::ONE).unwrap();
        Arc::new(CachedMesh::new(kernel.tessellate(&solid, 0.1).unwrap(), 20.0))
    }

    #[test]
    fn test_clear_keeps_furniture() {
        let mut scene = Scene::new();
        let mesh = cube_mesh();
        scene.add_surface("cube", mesh.clone(), DAffine3::IDENTITY, Rgb::WHITE, Shading::Flat);
        scene.add_edges("cube_e", mesh, DAffine3::IDENTITY, Rgb::BLACK, 3.0);
        assert_eq!(scene.len(), 2);

        scene.clear_content();
        assert!(scene.is_empty());
        assert_eq!(scene.furniture(), ["axes"]);
    }

    #[test]
    fn test_ids_are_not_reused() {
        let mut scene = Scene::new();
        let a = scene.add_surface("a", cube_mesh(), DAffine3::IDENTITY, Rgb::WHITE, Shading::Flat);
        scene.clear_content();
        let b = scene.add_surface("b", cube_mesh(), DAffine3::IDENTITY, Rgb::WHITE, Shading::Flat);
        assert_ne!(a, b);
        assert!(!scene.set_visible(a, false));
        assert!(scene.remove(b));
        assert!(!scene.remove(b));
        assert!(scene.is_empty());
    }

    #[test]
    fn test_vertex_data_and_bounds() {
        let mut scene = Scene::new();
        let mesh = cube_mesh();
        let transform = DAffine3::from_translation(DVec3::new(10.0, 0.0, 0.0));
        let surface = scene.add_surface("cube", mesh.clone(), transform, Rgb::WHITE, Shading::Flat);
        let edges = scene.add_edges("cube_e", mesh, transform, Rgb::BLACK, 3.0);

        assert_eq!(scene.get(surface).unwrap().vertex_bytes().len(), 12 * 3 * 24);
        assert_eq!(scene.get(edges).unwrap().vertex_bytes().len(), 12 * 2 * 12);

        let bounds = scene.bounds().unwrap();
        assert_eq!(bounds.min, DVec3::new(9.5, -0.5, -0.5));
        assert_eq!(scene.find("cube_e").unwrap().0, edges);
    }
}
