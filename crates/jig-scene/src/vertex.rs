//! GPU vertex layouts
//!
//! Scene elements keep their geometry in these `Pod` layouts so a renderer
//! can upload them with `bytemuck::cast_slice`.

use glam::DAffine3;
use jig_cad::TessellatedMesh;

/// Flat-shaded surface vertex (three per triangle)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SurfaceVertex {
    /// World-space position.
    pub position: [f32; 3],
    /// World-space face normal.
    pub normal: [f32; 3],
}

/// Line vertex (two per segment)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineVertex {
    /// World-space position.
    pub position: [f32; 3],
}

impl SurfaceVertex {
    /// Expand a mesh into world-space triangle vertices.
    pub fn from_mesh(mesh: &TessellatedMesh, transform: &DAffine3) -> Vec<SurfaceVertex> {
        let mut out = Vec::with_capacity(mesh.triangle_count() * 3);
        for (i, triangle) in mesh.triangles.iter().enumerate() {
            let normal = transform
                .transform_vector3(mesh.triangle_normal(i))
                .normalize_or_zero()
                .as_vec3()
                .to_array();
            for &index in triangle {
                out.push(SurfaceVertex {
                    position: transform
                        .transform_point3(mesh.vertices[index as usize])
                        .as_vec3()
                        .to_array(),
                    normal,
                });
            }
        }
        out
    }
}

impl LineVertex {
    /// Expand index pairs into world-space line vertices.
    pub fn from_segments(
        mesh: &TessellatedMesh,
        segments: &[[u32; 2]],
        transform: &DAffine3,
    ) -> Vec<LineVertex> {
        segments
            .iter()
            .flatten()
            .map(|&index| LineVertex {
                position: transform
                    .transform_point3(mesh.vertices[index as usize])
                    .as_vec3()
                    .to_array(),
            })
            .collect()
    }
}
