//! Core data types for jig
//!
//! This crate provides:
//! - Parts with named joints and rigid transforms
//! - Parameter records and parameter metadata
//! - Joint-based placement plans resolved into placed assemblies
//! - Persisted application configuration
//! - STL export of placed assemblies
//! - Bundled parametric projects

pub mod assembly;
pub mod color;
pub mod config;
pub mod constants;
pub mod error;
pub mod export;
pub mod joint;
pub mod params;
pub mod part;
pub mod projects;
pub mod transform;

// Re-exports for convenience
pub use assembly::{
    AssemblyDefinition, ItemKind, ItemNode, ItemTree, PartSet, PlacedAssembly, PlacementPlan,
    PlacementStep,
};
pub use color::{ColorError, Rgb};
pub use config::{AppConfig, CameraPose, ConfigError, WindowConfig};
pub use error::{BuildError, BuildResult};
pub use export::{ExportError, export_merged_stl, export_stl, world_mesh};
pub use joint::{JointMap, connect, get_joint};
pub use params::{ParamSpec, Params, ParamsError};
pub use part::{Part, PlacedPart, Shape};
pub use projects::TabletHolder;
pub use transform::{LocalFrame, Placement, RigidTransform};
