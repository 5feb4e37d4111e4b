//! VESA adapter plate
//!
//! Built from Z = 0 upwards with its `mount` joint on the top face.

use glam::DVec3;
use jig_cad::{CadKernel, Edge};

use crate::error::BuildResult;
use crate::params::Params;
use crate::part::Part;
use crate::transform::RigidTransform;

const TOP_CHAMFER: f64 = 2.0;
const HOLE_RADIUS: f64 = 2.5;

/// Build the adapter plate with four mounting holes
pub fn build_adapter(kernel: &dyn CadKernel, params: &Params, label: &str) -> BuildResult<Part> {
    let w = params.get("adapter_w")?;
    let h = params.get("adapter_h")?;
    let t = params.get("adapter_t")?;
    let hole_dist = params.get("adapter_hole_dist")?;

    let mut body = kernel.create_box(DVec3::new(0.0, 0.0, t / 2.0), DVec3::new(w, h, t))?;

    // Back top edge
    let top_edge = Edge::new(
        DVec3::new(-w / 2.0, h / 2.0, t),
        DVec3::new(w / 2.0, h / 2.0, t),
        DVec3::Y,
        DVec3::Z,
    );
    body = kernel.chamfer(&body, &[top_edge], TOP_CHAMFER)?;

    for x in [-hole_dist / 2.0, hole_dist / 2.0] {
        for y in [-hole_dist / 2.0, hole_dist / 2.0] {
            let hole = kernel.create_cylinder(
                DVec3::new(x, y, t / 2.0),
                HOLE_RADIUS,
                t + 2.0,
                DVec3::Z,
            )?;
            body = kernel.subtract(&body, &hole)?;
        }
    }

    Part::solid(label, body).with_joint(
        "mount",
        RigidTransform::from_translation(DVec3::new(0.0, 0.0, t)),
    )
}
