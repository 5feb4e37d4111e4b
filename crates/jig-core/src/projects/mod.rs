//! Bundled parametric projects

pub mod tablet_holder;

use glam::DVec3;
use jig_cad::{CadKernel, CadResult, Solid};

pub use tablet_holder::TabletHolder;

/// Axis-aligned box spanning two corners
pub(crate) fn block(kernel: &dyn CadKernel, min: DVec3, max: DVec3) -> CadResult<Solid> {
    kernel.create_box((min + max) * 0.5, max - min)
}
