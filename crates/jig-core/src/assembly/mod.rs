//! Assemblies of placed parts
//!
//! An [`AssemblyDefinition`] turns a parameter record into a
//! [`PlacedAssembly`]: it builds every part independently, then resolves
//! placements through a fixed [`PlacementPlan`].

mod plan;
mod tree;

use jig_cad::{CadKernel, ContentId};

use crate::error::BuildResult;
use crate::params::{ParamSpec, Params};
use crate::part::PlacedPart;

pub use plan::{PartSet, PlacementPlan, PlacementStep};
pub use tree::{ItemKind, ItemNode, ItemTree};

/// Ordered output of a rebuild
#[derive(Debug, Clone)]
pub struct PlacedAssembly {
    name: String,
    parts: Vec<PlacedPart>,
}

impl PlacedAssembly {
    pub fn new(name: impl Into<String>, parts: Vec<PlacedPart>) -> Self {
        Self {
            name: name.into(),
            parts,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Top-level parts in plan order
    pub fn parts(&self) -> &[PlacedPart] {
        &self.parts
    }

    /// Find a top-level part by label
    pub fn get(&self, label: &str) -> Option<&PlacedPart> {
        self.parts.iter().find(|p| p.part().label() == label)
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Content identities of every leaf solid, in traversal order
    pub fn content_ids(&self) -> Vec<ContentId> {
        self.parts
            .iter()
            .flat_map(|p| p.part().leaves().into_iter().map(|(solid, _)| solid.id()))
            .collect()
    }
}

/// A parametric assembly project
pub trait AssemblyDefinition {
    /// Display name of the assembly
    fn name(&self) -> &str;

    /// Presentation metadata for the parameters this assembly reads
    fn parameters(&self) -> &[ParamSpec];

    /// Build all parts and resolve their placements
    ///
    /// Pure: identical parameters give identical geometry and placements.
    fn build(&self, kernel: &dyn CadKernel, params: &Params) -> BuildResult<PlacedAssembly>;
}
