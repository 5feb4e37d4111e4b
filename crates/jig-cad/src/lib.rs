//! CAD Kernel Abstraction
//!
//! This crate provides:
//! - The `CadKernel` trait consumed by part construction and tessellation
//! - Content-based solid identities used as cache keys
//! - A CSG mesh kernel backed by `csgrs`
//! - A deterministic mock kernel for tests

pub mod kernel;

// Re-exports for convenience
pub use kernel::{
    Body, BooleanType, CadError, CadKernel, CadResult, ContentId, Edge, Face, MeshKernel,
    MockKernel, Recipe, Solid, TessellatedMesh, default_kernel,
};
