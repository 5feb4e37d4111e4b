//! Placement plans
//!
//! A plan is a hand-authored sequence of steps. Anchors sit at the world
//! origin; every other part is placed by exactly one joint connection
//! against a part placed by an earlier step.

use std::collections::HashMap;

use crate::error::{BuildError, BuildResult};
use crate::joint::connect;
use crate::part::{Part, PlacedPart};
use crate::transform::Placement;

use super::PlacedAssembly;

/// Parts keyed for a placement plan, in insertion order
#[derive(Debug, Clone, Default)]
pub struct PartSet {
    entries: Vec<(String, Part)>,
}

impl PartSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a part under a unique key
    pub fn insert(&mut self, key: impl Into<String>, part: Part) -> BuildResult<()> {
        let key = key.into();
        if self.index_of(&key).is_some() {
            return Err(BuildError::DuplicatePart(key));
        }
        self.entries.push((key, part));
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&Part> {
        self.index_of(key).map(|i| &self.entries[i].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn index_of(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }
}

/// One step of a placement plan
#[derive(Debug, Clone, PartialEq)]
pub enum PlacementStep {
    /// Place a part at the world origin
    Anchor(String),
    /// Place `moving` so its joint coincides with a joint of `reference`
    Connect {
        moving: String,
        moving_joint: String,
        reference: String,
        reference_joint: String,
    },
}

/// Ordered placement steps
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlacementPlan {
    steps: Vec<PlacementStep>,
}

impl PlacementPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an anchor step
    pub fn anchor(mut self, key: impl Into<String>) -> Self {
        self.steps.push(PlacementStep::Anchor(key.into()));
        self
    }

    /// Add a connect step
    pub fn connect(
        mut self,
        moving: impl Into<String>,
        moving_joint: impl Into<String>,
        reference: impl Into<String>,
        reference_joint: impl Into<String>,
    ) -> Self {
        self.steps.push(PlacementStep::Connect {
            moving: moving.into(),
            moving_joint: moving_joint.into(),
            reference: reference.into(),
            reference_joint: reference_joint.into(),
        });
        self
    }

    pub fn steps(&self) -> &[PlacementStep] {
        &self.steps
    }

    /// Resolve every part's world placement
    ///
    /// The output keeps the part set's insertion order. Every part must be
    /// placed exactly once, and only by reference to a part placed earlier.
    pub fn resolve(&self, name: impl Into<String>, parts: PartSet) -> BuildResult<PlacedAssembly> {
        let mut placements: HashMap<&str, Placement> = HashMap::new();

        for step in &self.steps {
            match step {
                PlacementStep::Anchor(key) => {
                    let key = Self::known(&parts, key)?;
                    Self::record(&mut placements, key, Placement::IDENTITY)?;
                    tracing::debug!("Anchored '{}' at origin", key);
                }
                PlacementStep::Connect {
                    moving,
                    moving_joint,
                    reference,
                    reference_joint,
                } => {
                    let moving_key = Self::known(&parts, moving)?;
                    let reference_key = Self::known(&parts, reference)?;
                    let reference_placement = placements
                        .get(reference_key)
                        .copied()
                        .ok_or_else(|| BuildError::UnplacedReference(reference_key.to_string()))?;
                    let (Some(moving_part), Some(reference_part)) =
                        (parts.get(moving_key), parts.get(reference_key))
                    else {
                        return Err(BuildError::UnknownPart(moving_key.to_string()));
                    };
                    let placement = connect(
                        moving_part,
                        moving_joint,
                        reference_part,
                        &reference_placement,
                        reference_joint,
                    )?;
                    Self::record(&mut placements, moving_key, placement)?;
                    tracing::debug!(
                        "Connected '{}.{}' to '{}.{}' at {:?}",
                        moving_key,
                        moving_joint,
                        reference_key,
                        reference_joint,
                        placement.translation
                    );
                }
            }
        }

        let mut placed = Vec::with_capacity(parts.len());
        for (key, part) in &parts.entries {
            let placement = placements
                .get(key.as_str())
                .copied()
                .ok_or_else(|| BuildError::UnplacedPart(key.clone()))?;
            placed.push(PlacedPart::new(part.clone(), placement));
        }
        Ok(PlacedAssembly::new(name, placed))
    }

    fn known<'a>(parts: &'a PartSet, key: &str) -> BuildResult<&'a str> {
        parts
            .entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(k, _)| k.as_str())
            .ok_or_else(|| BuildError::UnknownPart(key.to_string()))
    }

    fn record<'a>(
        placements: &mut HashMap<&'a str, Placement>,
        key: &'a str,
        placement: Placement,
    ) -> BuildResult<()> {
        if placements.insert(key, placement).is_some() {
            return Err(BuildError::PlacedTwice(key.to_string()));
        }
        Ok(())
    }
}
