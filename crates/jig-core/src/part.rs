//! Part definitions

use jig_cad::Solid;

use crate::color::Rgb;
use crate::error::BuildResult;
use crate::joint::JointMap;
use crate::transform::{LocalFrame, Placement};

/// Geometry carried by a part
#[derive(Debug, Clone)]
pub enum Shape {
    /// A single solid in the part's local frame
    Solid(Solid),
    /// Child parts, each placed relative to this part
    Compound(Vec<PlacedPart>),
}

/// A solid (or group of parts) with a label, an optional display color and
/// named joints
///
/// Immutable once built. A new set of parts is created on every rebuild;
/// positioning only ever changes the external [`Placement`].
#[derive(Debug, Clone)]
pub struct Part {
    label: String,
    color: Option<Rgb>,
    joints: JointMap,
    shape: Shape,
}

impl Part {
    /// Create a part around a single solid
    pub fn solid(label: impl Into<String>, solid: Solid) -> Self {
        Self::new(label, Shape::Solid(solid))
    }

    /// Create a part grouping already-placed children
    pub fn compound(label: impl Into<String>, children: Vec<PlacedPart>) -> Self {
        Self::new(label, Shape::Compound(children))
    }

    fn new(label: impl Into<String>, shape: Shape) -> Self {
        Self {
            label: label.into(),
            color: None,
            joints: JointMap::new(),
            shape,
        }
    }

    /// Set the display color
    ///
    /// On a compound this renders all children as one unit in this color.
    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = Some(color);
        self
    }

    /// Add a named joint frame
    pub fn with_joint(mut self, name: impl Into<String>, frame: LocalFrame) -> BuildResult<Self> {
        self.joints.insert(&self.label, name, frame)?;
        Ok(self)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn color(&self) -> Option<Rgb> {
        self.color
    }

    pub fn joints(&self) -> &JointMap {
        &self.joints
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Check whether this part is a compound
    pub fn is_compound(&self) -> bool {
        matches!(self.shape, Shape::Compound(_))
    }

    /// All leaf solids with their transform relative to this part
    pub fn leaves(&self) -> Vec<(&Solid, Placement)> {
        let mut out = Vec::new();
        self.collect_leaves(Placement::IDENTITY, &mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, transform: Placement, out: &mut Vec<(&'a Solid, Placement)>) {
        match &self.shape {
            Shape::Solid(solid) => out.push((solid, transform)),
            Shape::Compound(children) => {
                for child in children {
                    child
                        .part
                        .collect_leaves(transform * child.placement, out);
                }
            }
        }
    }
}

/// A part paired with its placement
///
/// Top-level placements are in world space; placements of compound children
/// are relative to their parent.
#[derive(Debug, Clone)]
pub struct PlacedPart {
    part: Part,
    placement: Placement,
}

impl PlacedPart {
    pub fn new(part: Part, placement: Placement) -> Self {
        Self { part, placement }
    }

    pub fn part(&self) -> &Part {
        &self.part
    }

    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    /// World-space frame of one of this part's joints
    pub fn joint_world(&self, name: &str) -> BuildResult<LocalFrame> {
        Ok(self.placement * crate::joint::get_joint(&self.part, name)?)
    }
}
