//! Tablet holder with a VESA adapter
//!
//! Two mirrored holder halves meet at X = 0 and are both anchored at the
//! origin. The adapter plate is connected by its `mount` joint to the left
//! half's `adapter_mount` joint at the bottom of the recess.

mod adapter;
mod holder_half;

use jig_cad::CadKernel;

use crate::assembly::{AssemblyDefinition, PartSet, PlacedAssembly, PlacementPlan};
use crate::color::Rgb;
use crate::error::BuildResult;
use crate::params::{ParamSpec, Params};

pub use adapter::build_adapter;
pub use holder_half::{Side, build_holder_half};

const LEFT_COLOR: Rgb = Rgb::new(0x2c, 0x3e, 0x50);
const RIGHT_COLOR: Rgb = Rgb::new(0x5d, 0xad, 0xe2);
const ADAPTER_COLOR: Rgb = Rgb::new(0xe6, 0x7e, 0x22);

const PARAMETERS: &[ParamSpec] = &[
    ParamSpec::new("tablet_w", "Width", 200.0, 400.0),
    ParamSpec::new("tablet_h", "Height", 150.0, 300.0),
    ParamSpec::new("tablet_t", "Thickness", 5.0, 30.0),
    ParamSpec::new("wall", "Wall", 5.0, 15.0),
    ParamSpec::new("visor_d", "Hood Depth", 10.0, 150.0),
    ParamSpec::new("visor_angle", "Hood Angle", 0.0, 45.0),
    ParamSpec::new("claw_grip", "Claw Grip", 5.0, 30.0),
    ParamSpec::new("adapter_w", "Adapter Width", 60.0, 200.0),
    ParamSpec::new("adapter_h", "Adapter Height", 60.0, 200.0),
    ParamSpec::new("adapter_t", "Adapter Thickness", 3.0, 20.0),
    ParamSpec::new("adapter_hole_dist", "VESA Distance", 50.0, 200.0),
];

/// Parameters matching the bundled `params/tablet_holder.json`
pub fn default_params() -> Params {
    [
        ("tablet_w", 327.0),
        ("tablet_h", 217.0),
        ("tablet_t", 16.0),
        ("wall", 8.0),
        ("visor_d", 50.0),
        ("visor_angle", 20.0),
        ("claw_grip", 15.0),
        ("adapter_w", 120.0),
        ("adapter_h", 120.0),
        ("adapter_t", 8.0),
        ("adapter_hole_dist", 100.0),
    ]
    .into_iter()
    .collect()
}

/// The tablet holder project
#[derive(Debug, Clone, Copy, Default)]
pub struct TabletHolder;

impl TabletHolder {
    pub const NAME: &'static str = "Tablet Holder Assembly";
    pub const LEFT: &'static str = "Left Half";
    pub const RIGHT: &'static str = "Right Half";
    pub const ADAPTER: &'static str = "VESA Adapter";

    pub fn new() -> Self {
        Self
    }

    fn plan() -> PlacementPlan {
        PlacementPlan::new()
            .anchor("left")
            .anchor("right")
            .connect("adapter", "mount", "left", "adapter_mount")
    }
}

impl AssemblyDefinition for TabletHolder {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn parameters(&self) -> &[ParamSpec] {
        PARAMETERS
    }

    fn build(&self, kernel: &dyn CadKernel, params: &Params) -> BuildResult<PlacedAssembly> {
        let left = build_holder_half(kernel, params, Side::Left, Self::LEFT)?.with_color(LEFT_COLOR);
        let right =
            build_holder_half(kernel, params, Side::Right, Self::RIGHT)?.with_color(RIGHT_COLOR);
        let adapter = build_adapter(kernel, params, Self::ADAPTER)?.with_color(ADAPTER_COLOR);

        let mut parts = PartSet::new();
        parts.insert("left", left)?;
        parts.insert("right", right)?;
        parts.insert("adapter", adapter)?;

        let assembly = Self::plan().resolve(Self::NAME, parts)?;
        tracing::info!("Built '{}' with {} parts", Self::NAME, assembly.len());
        Ok(assembly)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;
    use jig_cad::MockKernel;

    use crate::constants::PLACEMENT_EPSILON;
    use crate::error::BuildError;

    #[test]
    fn test_parameters_cover_required_keys() {
        let params = default_params();
        for spec in TabletHolder.parameters() {
            let value = params.get(spec.key).unwrap();
            assert!(spec.contains(value), "{} out of range", spec.key);
        }
        assert_eq!(PARAMETERS.len(), params.len());
    }

    #[test]
    fn test_adapter_sits_in_recess() {
        let kernel = MockKernel::new();
        let assembly = TabletHolder.build(&kernel, &default_params()).unwrap();

        assert_eq!(assembly.len(), 3);
        let adapter = assembly.get(TabletHolder::ADAPTER).unwrap();
        assert!(adapter
            .placement()
            .translation
            .abs_diff_eq(DVec3::new(0.0, 0.0, 3.0 - 8.0), PLACEMENT_EPSILON));

        let mount = adapter.joint_world("mount").unwrap();
        let target = assembly
            .get(TabletHolder::LEFT)
            .unwrap()
            .joint_world("adapter_mount")
            .unwrap();
        assert!(mount.approx_eq(&target, PLACEMENT_EPSILON));
    }

    #[test]
    fn test_halves_are_anchored() {
        let kernel = MockKernel::new();
        let assembly = TabletHolder.build(&kernel, &default_params()).unwrap();
        for label in [TabletHolder::LEFT, TabletHolder::RIGHT] {
            assert!(assembly.get(label).unwrap().placement().is_identity(0.0));
        }
    }

    #[test]
    fn test_colors_and_order() {
        let kernel = MockKernel::new();
        let assembly = TabletHolder.build(&kernel, &default_params()).unwrap();
        let labels: Vec<_> = assembly.parts().iter().map(|p| p.part().label()).collect();
        assert_eq!(labels, ["Left Half", "Right Half", "VESA Adapter"]);
        assert_eq!(
            assembly.parts()[2].part().color().map(|c| c.to_hex()),
            Some("#e67e22".to_string())
        );
    }

    #[test]
    fn test_empty_params_fail_fast() {
        let kernel = MockKernel::new();
        let err = TabletHolder.build(&kernel, &Params::new()).unwrap_err();
        assert!(matches!(err, BuildError::MissingParameter(_)));
        assert_eq!(kernel.tessellation_count(), 0);
    }

    #[test]
    fn test_degenerate_dimension_is_geometry_error() {
        let kernel = MockKernel::new();
        let params = default_params().with("adapter_t", 0.0);
        assert!(matches!(
            TabletHolder.build(&kernel, &params),
            Err(BuildError::Geometry(_))
        ));
    }
}
