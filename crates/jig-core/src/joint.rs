//! Joint registry and joint connection
//!
//! A joint is a named frame in its part's local coordinates. Connecting a
//! moving part's joint to a reference part's joint places the moving part so
//! that both frames coincide in world space:
//!
//! ```text
//! placement(moving) = placement(reference) * frame(reference) * frame(moving)^-1
//! ```

use std::collections::BTreeMap;

use crate::error::{BuildError, BuildResult};
use crate::part::Part;
use crate::transform::{LocalFrame, Placement};

/// Named joint frames of one part
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JointMap {
    frames: BTreeMap<String, LocalFrame>,
}

impl JointMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a joint; names must be unique within the part
    pub(crate) fn insert(
        &mut self,
        part: &str,
        name: impl Into<String>,
        frame: LocalFrame,
    ) -> BuildResult<()> {
        let name = name.into();
        if self.frames.contains_key(&name) {
            return Err(BuildError::DuplicateJoint {
                part: part.to_string(),
                joint: name,
            });
        }
        self.frames.insert(name, frame);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&LocalFrame> {
        self.frames.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.frames.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.frames.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &LocalFrame)> {
        self.frames.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Look up a joint frame on a part
pub fn get_joint(part: &Part, name: &str) -> BuildResult<LocalFrame> {
    part.joints()
        .get(name)
        .copied()
        .ok_or_else(|| BuildError::JointNotFound {
            part: part.label().to_string(),
            joint: name.to_string(),
        })
}

/// World placement of `moving` that makes its `moving_joint` frame coincide
/// with `reference_joint` on `reference` placed at `reference_placement`
pub fn connect(
    moving: &Part,
    moving_joint: &str,
    reference: &Part,
    reference_placement: &Placement,
    reference_joint: &str,
) -> BuildResult<Placement> {
    let target = get_joint(reference, reference_joint)?;
    let source = get_joint(moving, moving_joint)?;
    Ok(*reference_placement * target * source.inverse())
}
