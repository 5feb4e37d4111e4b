//! One half of the tablet holder body
//!
//! Built in local coordinates with the seam at X = 0. The left half grows
//! towards -X, the right half towards +X. The back plate lies on Z = 0 and
//! the tablet slides in above it.

use glam::{DQuat, DVec3};
use jig_cad::{CadKernel, Edge, Solid};

use crate::error::BuildResult;
use crate::params::Params;
use crate::part::Part;
use crate::projects::block;
use crate::transform::RigidTransform;

/// Depth of the adapter recess in the back plate
pub(super) const RECESS_DEPTH: f64 = 3.0;

const RECESS_CLEARANCE_X: f64 = 0.5;
const RECESS_CLEARANCE_Y: f64 = 1.0;
const VESA_HOLE_RADIUS: f64 = 2.75;
const COUNTERBORE_RADIUS: f64 = 5.0;
const COUNTERBORE_DEPTH: f64 = 3.0;
const CHARGING_CUTOUT_WIDTH: f64 = 50.0;

/// Cuts overshoot the faces they open by this much
const OVERSHOOT: f64 = 1.0;

/// Which half to build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    fn sign(self) -> f64 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }

    /// X interval at distances `near..far` from the seam
    fn span(self, near: f64, far: f64) -> (f64, f64) {
        match self {
            Side::Left => (-far, -near),
            Side::Right => (near, far),
        }
    }
}

struct Dimensions {
    tablet_t: f64,
    wall: f64,
    claw_grip: f64,
    visor_d: f64,
    visor_angle: f64,
    adapter_w: f64,
    hole_dist: f64,
    half_w: f64,
    total_h: f64,
}

impl Dimensions {
    fn read(params: &Params) -> BuildResult<Self> {
        let tablet_w = params.get("tablet_w")?;
        let tablet_h = params.get("tablet_h")?;
        let wall = params.get("wall")?;
        Ok(Self {
            tablet_t: params.get("tablet_t")?,
            wall,
            claw_grip: params.get("claw_grip")?,
            visor_d: params.get("visor_d")?,
            visor_angle: params.get("visor_angle")?,
            adapter_w: params.get("adapter_w")?,
            hole_dist: params.get("adapter_hole_dist")?,
            half_w: (tablet_w + wall * 2.0) / 2.0,
            total_h: tablet_h + wall * 2.0,
        })
    }
}

/// Build one holder half with its `adapter_mount` and `center_joint` joints
pub fn build_holder_half(
    kernel: &dyn CadKernel,
    params: &Params,
    side: Side,
    label: &str,
) -> BuildResult<Part> {
    let d = Dimensions::read(params)?;

    let mut body = frame(kernel, &d, side)?;
    body = kernel.union(&body, &hood(kernel, &d, side)?)?;
    body = cut_mounting(kernel, &d, side, body)?;
    body = kernel.fillet(&body, &[outer_edge(&d, side)], d.wall / 2.0)?;
    if side == Side::Right {
        body = kernel.subtract(&body, &charging_cutout(kernel, &d)?)?;
    }

    let seam_rotation = DQuat::from_rotation_y(-side.sign() * std::f64::consts::FRAC_PI_2);
    Part::solid(label, body)
        .with_joint(
            "adapter_mount",
            RigidTransform::from_translation(DVec3::new(0.0, 0.0, RECESS_DEPTH)),
        )?
        .with_joint(
            "center_joint",
            RigidTransform::new(DVec3::new(0.0, 0.0, d.wall / 2.0), seam_rotation),
        )
}

/// Back plate, side wall with claw, and the two rails
fn frame(kernel: &dyn CadKernel, d: &Dimensions, side: Side) -> BuildResult<Solid> {
    let half_y = d.total_h / 2.0;
    let top = d.wall + d.tablet_t;
    let (x0, x1) = side.span(0.0, d.half_w);

    let mut body = block(
        kernel,
        DVec3::new(x0, -half_y, 0.0),
        DVec3::new(x1, half_y, d.wall),
    )?;

    let (sx0, sx1) = side.span(d.half_w - d.wall, d.half_w);
    let side_wall = block(
        kernel,
        DVec3::new(sx0, -half_y, d.wall),
        DVec3::new(sx1, half_y, top),
    )?;
    body = kernel.union(&body, &side_wall)?;

    let (cx0, cx1) = side.span(d.half_w - d.wall - d.claw_grip, d.half_w);
    let claw = block(
        kernel,
        DVec3::new(cx0, -half_y, top),
        DVec3::new(cx1, half_y, top + d.wall),
    )?;
    body = kernel.union(&body, &claw)?;

    for y in [-half_y, half_y - d.wall] {
        let rail = block(
            kernel,
            DVec3::new(x0, y, d.wall),
            DVec3::new(x1, y + d.wall, top + d.wall),
        )?;
        body = kernel.union(&body, &rail)?;
    }
    Ok(body)
}

/// Visor over the top rail, tilted about X
fn hood(kernel: &dyn CadKernel, d: &Dimensions, side: Side) -> BuildResult<Solid> {
    let (x0, x1) = side.span(0.0, d.half_w);
    let plate = block(
        kernel,
        DVec3::new(x0, 0.0, 0.0),
        DVec3::new(x1, d.wall, d.visor_d),
    )?;
    let pose = RigidTransform::from_euler_degrees(
        DVec3::new(0.0, d.total_h / 2.0 - d.wall, d.tablet_t + d.wall * 2.0),
        d.visor_angle,
        0.0,
        0.0,
    );
    Ok(kernel.transform(&plate, &pose.to_affine())?)
}

/// Adapter recess and VESA holes with counterbores
fn cut_mounting(
    kernel: &dyn CadKernel,
    d: &Dimensions,
    side: Side,
    mut body: Solid,
) -> BuildResult<Solid> {
    let (rx0, rx1) = side.span(0.0, d.adapter_w / 2.0 + RECESS_CLEARANCE_X);
    let recess_half_y = (d.adapter_w + RECESS_CLEARANCE_Y) / 2.0;
    let recess = block(
        kernel,
        DVec3::new(rx0, -recess_half_y, -OVERSHOOT),
        DVec3::new(rx1, recess_half_y, RECESS_DEPTH),
    )?;
    body = kernel.subtract(&body, &recess)?;

    let x = side.sign() * d.hole_dist / 2.0;
    for y in [-d.hole_dist / 2.0, d.hole_dist / 2.0] {
        let hole = kernel.create_cylinder(
            DVec3::new(x, y, d.wall / 2.0),
            VESA_HOLE_RADIUS,
            d.wall + OVERSHOOT * 2.0,
            DVec3::Z,
        )?;
        body = kernel.subtract(&body, &hole)?;

        let counterbore_height = COUNTERBORE_DEPTH + OVERSHOOT;
        let counterbore = kernel.create_cylinder(
            DVec3::new(
                x,
                y,
                d.wall - COUNTERBORE_DEPTH + counterbore_height / 2.0,
            ),
            COUNTERBORE_RADIUS,
            counterbore_height,
            DVec3::Z,
        )?;
        body = kernel.subtract(&body, &counterbore)?;
    }
    Ok(body)
}

/// Outermost vertical edge at the bottom corner
fn outer_edge(d: &Dimensions, side: Side) -> Edge {
    let x = side.sign() * d.half_w;
    let y = -d.total_h / 2.0;
    Edge::new(
        DVec3::new(x, y, 0.0),
        DVec3::new(x, y, d.tablet_t + d.wall * 2.0),
        DVec3::new(side.sign(), 0.0, 0.0),
        DVec3::NEG_Y,
    )
}

/// Charging port opening through the right side wall
fn charging_cutout(kernel: &dyn CadKernel, d: &Dimensions) -> BuildResult<Solid> {
    Ok(kernel.create_box(
        DVec3::new(d.half_w - d.wall / 2.0, 0.0, d.wall + d.tablet_t / 2.0),
        DVec3::new(d.wall * 3.0, CHARGING_CUTOUT_WIDTH, d.tablet_t * 0.8),
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jig_cad::MockKernel;

    use crate::projects::tablet_holder::default_params;

    #[test]
    fn test_halves_have_joints() {
        let kernel = MockKernel::new();
        let params = default_params();
        for side in [Side::Left, Side::Right] {
            let part = build_holder_half(&kernel, &params, side, "half").unwrap();
            assert!(part.joints().contains("adapter_mount"));
            assert!(part.joints().contains("center_joint"));
            let mount = part.joints().get("adapter_mount").unwrap();
            approx::assert_relative_eq!(mount.translation.z, RECESS_DEPTH);
        }
    }

    #[test]
    fn test_center_joint_faces_the_seam() {
        let kernel = MockKernel::new();
        let params = default_params();
        let left = build_holder_half(&kernel, &params, Side::Left, "l").unwrap();
        let right = build_holder_half(&kernel, &params, Side::Right, "r").unwrap();

        let left_z = left.joints().get("center_joint").unwrap().transform_vector(DVec3::Z);
        let right_z = right.joints().get("center_joint").unwrap().transform_vector(DVec3::Z);
        assert!(left_z.abs_diff_eq(DVec3::X, 1e-12));
        assert!(right_z.abs_diff_eq(DVec3::NEG_X, 1e-12));
    }

    #[test]
    fn test_halves_extend_away_from_seam() {
        let kernel = MockKernel::new();
        let params = default_params();
        let left = build_holder_half(&kernel, &params, Side::Left, "l").unwrap();
        let (solid, _) = left.leaves()[0];
        let (min, max) = solid.body().bounds().unwrap();
        approx::assert_relative_eq!(min.x, -(327.0 + 16.0) / 2.0, epsilon = 1e-9);
        assert!(max.x <= 1e-9);
    }

    #[test]
    fn test_missing_wall_fails() {
        let kernel = MockKernel::new();
        let mut params = default_params();
        params.remove("wall");
        assert!(matches!(
            build_holder_half(&kernel, &params, Side::Left, "l"),
            Err(crate::error::BuildError::MissingParameter(ref k)) if k == "wall"
        ));
    }
}
