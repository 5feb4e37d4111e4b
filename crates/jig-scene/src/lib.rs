//! Jig Scene
//!
//! Turns placed assemblies into a renderable scene and keeps it in step with
//! rebuilds.
//!
//! # Module Structure
//!
//! ```text
//! jig-scene/
//! ├── cache.rs     # Tessellation cache keyed by content identity
//! ├── edges.rs     # Feature edge extraction
//! ├── scene.rs     # SceneBackend trait and in-memory Scene
//! ├── bounds.rs    # Axis-aligned bounding boxes
//! ├── camera.rs    # Camera pose and isometric default view
//! ├── sync.rs      # Scene synchronizer and visibility control
//! ├── tree.rs      # Checkable item tree
//! ├── vertex.rs    # GPU vertex layouts
//! └── config.rs    # Scene configuration
//! ```

pub mod bounds;
pub mod cache;
pub mod camera;
pub mod config;
pub mod edges;
pub mod scene;
pub mod sync;
pub mod tree;
pub mod vertex;

pub use bounds::BoundingBox;
pub use cache::{CacheStats, CachedMesh, TessellationCache};
pub use camera::Camera;
pub use config::{SceneConfig, Shading};
pub use edges::feature_edges;
pub use scene::{Element, ElementKind, RenderId, Scene, SceneBackend};
pub use sync::{RenderSet, SceneSync, SyncFailure, SyncOutcome, set_visibility};
pub use tree::{SceneTree, TreeItem};
pub use vertex::{LineVertex, SurfaceVertex};
