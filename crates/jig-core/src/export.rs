//! STL export of placed assemblies

use std::path::{Path, PathBuf};

use jig_cad::{CadKernel, TessellatedMesh};

use crate::assembly::PlacedAssembly;
use crate::part::PlacedPart;

/// World-space mesh of a placed part and all of its leaves
pub fn world_mesh(
    kernel: &dyn CadKernel,
    placed: &PlacedPart,
    tolerance: f64,
) -> Result<TessellatedMesh, ExportError> {
    let mut mesh = TessellatedMesh::new();
    for (solid, local) in placed.part().leaves() {
        let leaf = kernel
            .tessellate(solid, tolerance)
            .map_err(|e| ExportError::Tessellation(format!("{}: {}", placed.part().label(), e)))?;
        mesh.append(&leaf, &(*placed.placement() * local).to_affine());
    }
    Ok(mesh)
}

/// Write one binary STL per top-level part into `dir`
///
/// Files are named after the part labels. Returns the written paths.
pub fn export_stl(
    kernel: &dyn CadKernel,
    assembly: &PlacedAssembly,
    dir: impl AsRef<Path>,
    tolerance: f64,
) -> Result<Vec<PathBuf>, ExportError> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir).map_err(|e| ExportError::Io(e.to_string()))?;

    let mut written = Vec::with_capacity(assembly.len());
    for placed in assembly.parts() {
        let mesh = world_mesh(kernel, placed, tolerance)?;
        let path = dir.join(sanitize_filename(placed.part().label()) + ".stl");
        write_mesh(&mesh, &path)?;
        tracing::info!(
            "Exported '{}' ({} triangles) to {}",
            placed.part().label(),
            mesh.triangle_count(),
            path.display()
        );
        written.push(path);
    }
    Ok(written)
}

/// Write the whole assembly as a single binary STL
pub fn export_merged_stl(
    kernel: &dyn CadKernel,
    assembly: &PlacedAssembly,
    path: impl AsRef<Path>,
    tolerance: f64,
) -> Result<(), ExportError> {
    let mut merged = TessellatedMesh::new();
    for placed in assembly.parts() {
        merged.append(
            &world_mesh(kernel, placed, tolerance)?,
            &glam::DAffine3::IDENTITY,
        );
    }
    write_mesh(&merged, path.as_ref())
}

fn write_mesh(mesh: &TessellatedMesh, path: &Path) -> Result<(), ExportError> {
    let triangles: Vec<stl_io::Triangle> = (0..mesh.triangle_count())
        .map(|i| {
            let [a, b, c] = mesh.triangles[i].map(|v| mesh.vertices[v as usize].as_vec3().to_array());
            stl_io::Triangle {
                normal: stl_io::Normal::new(mesh.triangle_normal(i).as_vec3().to_array()),
                vertices: [
                    stl_io::Vertex::new(a),
                    stl_io::Vertex::new(b),
                    stl_io::Vertex::new(c),
                ],
            }
        })
        .collect();

    let mut file = std::fs::File::create(path).map_err(|e| ExportError::Io(e.to_string()))?;
    stl_io::write_stl(&mut file, triangles.iter()).map_err(|e| ExportError::Write(e.to_string()))?;
    Ok(())
}

/// Replace characters that are awkward in file names
pub fn sanitize_filename(label: &str) -> String {
    let name: String = label
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    if name.is_empty() { "part".into() } else { name }
}

/// Export errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Tessellation failed: {0}")]
    Tessellation(String),
    #[error("Write error: {0}")]
    Write(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;
    use jig_cad::MockKernel;

    use crate::part::Part;
    use crate::transform::RigidTransform;

    fn two_blocks(kernel: &MockKernel) -> PlacedAssembly {
        let solid = kernel.create_box(DVec3::ZERO, DVec3::ONE).unwrap();
        PlacedAssembly::new(
            "blocks",
            vec![
                PlacedPart::new(Part::solid("Left Half", solid.clone()), RigidTransform::IDENTITY),
                PlacedPart::new(
                    Part::solid("Right Half", solid),
                    RigidTransform::from_translation(DVec3::new(10.0, 0.0, 0.0)),
                ),
            ],
        )
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("VESA Adapter"), "vesa_adapter");
        assert_eq!(sanitize_filename(""), "part");
    }

    #[test]
    fn test_world_mesh_applies_placement() {
        let kernel = MockKernel::new();
        let assembly = two_blocks(&kernel);
        let mesh = world_mesh(&kernel, &assembly.parts()[1], 0.1).unwrap();
        let (min, max) = mesh.bounds().unwrap();
        approx::assert_relative_eq!(min.x, 9.5, epsilon = 1e-12);
        approx::assert_relative_eq!(max.x, 10.5, epsilon = 1e-12);
    }

    #[test]
    fn test_export_per_part_files() {
        let kernel = MockKernel::new();
        let assembly = two_blocks(&kernel);
        let dir = tempfile::tempdir().unwrap();

        let paths = export_stl(&kernel, &assembly, dir.path(), 0.1).unwrap();
        assert_eq!(paths.len(), 2);
        assert!(paths[0].ends_with("left_half.stl"));

        let mut file = std::fs::File::open(&paths[1]).unwrap();
        let read = stl_io::read_stl(&mut file).unwrap();
        assert_eq!(read.faces.len(), 12);
    }

    #[test]
    fn test_export_merged() {
        let kernel = MockKernel::new();
        let assembly = two_blocks(&kernel);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("all.stl");

        export_merged_stl(&kernel, &assembly, &path, 0.1).unwrap();
        let mut file = std::fs::File::open(&path).unwrap();
        assert_eq!(stl_io::read_stl(&mut file).unwrap().faces.len(), 24);
    }

    #[test]
    fn test_tessellation_failure_is_reported() {
        let kernel = MockKernel::new();
        let assembly = two_blocks(&kernel);
        let id = assembly.parts()[0].part().leaves()[0].0.id();
        kernel.fail_tessellation_of(id);
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            export_stl(&kernel, &assembly, dir.path(), 0.1),
            Err(ExportError::Tessellation(_))
        ));
    }
}
