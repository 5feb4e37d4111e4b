//! CAD kernel interface and implementations

mod body;
mod identity;
mod mesh;
mod mock;
mod traits;

pub use body::{Body, Face, cylinder_segments};
pub use identity::{ContentId, Recipe};
pub use mesh::MeshKernel;
pub use mock::MockKernel;
pub use traits::{
    BooleanType, CadError, CadKernel, CadResult, Edge, Solid, TessellatedMesh,
};

/// Get the default CAD kernel
pub fn default_kernel() -> Box<dyn CadKernel> {
    Box::new(MeshKernel::new())
}
