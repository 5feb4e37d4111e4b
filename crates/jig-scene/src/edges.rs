//! Feature edge extraction
//!
//! An edge shared by exactly two triangles is a feature edge when their
//! normals differ by more than the feature angle. Edges shared by three or
//! more triangles are always kept, and so are open boundary edges.
//!
//! Boolean results carry T-junctions: one face runs a single edge along a
//! crease where the face across it has several shorter ones. Open edges are
//! split at the open-edge vertices lying on them before adjacency is judged,
//! so such creases pair up and the split lines inside flat faces drop out.

use glam::DVec3;
use rustc_hash::FxHashMap;

use jig_cad::TessellatedMesh;

/// A vertex lies on an edge when it is this close to it, relative to the
/// edge length
const ON_EDGE_TOLERANCE: f64 = 1e-7;

type Adjacency = FxHashMap<[u32; 2], Vec<usize>>;

/// Feature edges of a welded mesh as vertex index pairs
///
/// Degenerate triangles are ignored. The result is sorted, so equal meshes
/// give equal edge lists.
pub fn feature_edges(mesh: &TessellatedMesh, feature_angle_degrees: f64) -> Vec<[u32; 2]> {
    let cos_threshold = feature_angle_degrees.to_radians().cos();

    let mut adjacency: Adjacency = FxHashMap::default();
    for (i, [a, b, c]) in mesh.triangles.iter().copied().enumerate() {
        if mesh.triangle_normal(i) == DVec3::ZERO {
            continue;
        }
        for (p, q) in [(a, b), (b, c), (c, a)] {
            adjacency.entry(edge_key(p, q)).or_default().push(i);
        }
    }
    split_t_junctions(mesh, &mut adjacency);

    let mut edges: Vec<[u32; 2]> = adjacency
        .into_iter()
        .filter(|(_, faces)| match faces.as_slice() {
            [_] => true,
            [f, g] => mesh.triangle_normal(*f).dot(mesh.triangle_normal(*g)) < cos_threshold,
            _ => true,
        })
        .map(|(edge, _)| edge)
        .collect();
    edges.sort_unstable();
    edges
}

fn edge_key(p: u32, q: u32) -> [u32; 2] {
    [p.min(q), p.max(q)]
}

/// Replace every open edge that passes through other open-edge vertices by
/// the chain of sub-edges between them, each keeping the edge's triangle
fn split_t_junctions(mesh: &TessellatedMesh, adjacency: &mut Adjacency) {
    let open: Vec<[u32; 2]> = adjacency
        .iter()
        .filter(|(_, faces)| faces.len() == 1)
        .map(|(edge, _)| *edge)
        .collect();
    let mut candidates: Vec<u32> = open.iter().flatten().copied().collect();
    candidates.sort_unstable();
    candidates.dedup();

    for edge @ [p, q] in open {
        let start = mesh.vertices[p as usize];
        let along = mesh.vertices[q as usize] - start;
        let length_squared = along.length_squared();
        if length_squared == 0.0 {
            continue;
        }
        let tolerance = length_squared.sqrt() * ON_EDGE_TOLERANCE;

        let mut inner: Vec<(f64, u32)> = candidates
            .iter()
            .filter(|&&v| v != p && v != q)
            .filter_map(|&v| {
                let offset = mesh.vertices[v as usize] - start;
                let t = offset.dot(along) / length_squared;
                let on_edge = t > 0.0 && t < 1.0 && (offset - along * t).length() <= tolerance;
                on_edge.then_some((t, v))
            })
            .collect();
        if inner.is_empty() {
            continue;
        }
        inner.sort_by(|a, b| a.0.total_cmp(&b.0));

        let Some(faces) = adjacency.remove(&edge) else {
            continue;
        };
        let chain: Vec<u32> = std::iter::once(p)
            .chain(inner.into_iter().map(|(_, v)| v))
            .chain(std::iter::once(q))
            .collect();
        for pair in chain.windows(2) {
            adjacency
                .entry(edge_key(pair[0], pair[1]))
                .or_default()
                .extend(faces.iter().copied());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jig_cad::{CadKernel, MeshKernel, MockKernel};

    fn cube() -> TessellatedMesh {
        let kernel = MockKernel::new();
        let solid = kernel.create_box(DVec3::ZERO, DVec3::ONE).unwrap();
        kernel.tessellate(&solid, 0.1).unwrap()
    }

    fn drilled_plate() -> TessellatedMesh {
        let kernel = MeshKernel::new();
        let plate = kernel
            .create_box(DVec3::ZERO, DVec3::new(10.0, 10.0, 2.0))
            .unwrap();
        let hole = kernel
            .create_cylinder(DVec3::ZERO, 2.0, 4.0, DVec3::Z)
            .unwrap();
        let drilled = kernel.subtract(&plate, &hole).unwrap();
        kernel.tessellate(&drilled, 0.1).unwrap()
    }

    fn segment(mesh: &TessellatedMesh, [p, q]: [u32; 2]) -> (DVec3, DVec3) {
        (mesh.vertices[p as usize], mesh.vertices[q as usize])
    }

    #[test]
    fn test_cube_has_twelve_feature_edges() {
        // Face diagonals are flat and drop out
        assert_eq!(feature_edges(&cube(), 20.0).len(), 12);
    }

    #[test]
    fn test_large_angle_hides_right_angles() {
        assert!(feature_edges(&cube(), 95.0).is_empty());
    }

    #[test]
    fn test_open_boundary_included() {
        let mesh = TessellatedMesh {
            vertices: vec![DVec3::ZERO, DVec3::X, DVec3::Y],
            triangles: vec![[0, 1, 2]],
        };
        assert_eq!(feature_edges(&mesh, 20.0), vec![[0, 1], [0, 2], [1, 2]]);
    }

    #[test]
    fn test_non_manifold_edge_included() {
        let mesh = TessellatedMesh {
            vertices: vec![DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::NEG_Y, DVec3::Z],
            triangles: vec![[0, 1, 2], [1, 0, 3], [0, 1, 4]],
        };
        assert_eq!(feature_edges(&mesh, 20.0), vec![[0, 1]]);
    }

    #[test]
    fn test_t_junction_on_flat_face_drops_out() {
        // A square split into one triangle on the left and two on the right,
        // which meet the left one at the midpoint of the shared diagonal
        let mesh = TessellatedMesh {
            vertices: vec![
                DVec3::new(0.0, 0.0, 0.0),
                DVec3::new(2.0, 0.0, 0.0),
                DVec3::new(2.0, 2.0, 0.0),
                DVec3::new(0.0, 2.0, 0.0),
                DVec3::new(1.0, 1.0, 0.0),
            ],
            triangles: vec![[0, 2, 3], [0, 1, 4], [4, 1, 2]],
        };
        let edges = feature_edges(&mesh, 20.0);
        assert!(!edges.contains(&[0, 2]));
        assert!(!edges.contains(&[0, 4]));
        assert!(!edges.contains(&[2, 4]));
        assert!(!edges.contains(&[1, 4]));
        assert_eq!(edges, vec![[0, 1], [0, 3], [1, 2], [2, 3]]);
    }

    #[test]
    fn test_t_junction_on_crease_is_kept() {
        // Two perpendicular faces along the X axis; the lower one has an
        // extra vertex at the middle of the crease
        let mesh = TessellatedMesh {
            vertices: vec![
                DVec3::new(0.0, 0.0, 0.0),
                DVec3::new(2.0, 0.0, 0.0),
                DVec3::new(0.0, 0.0, 1.0),
                DVec3::new(1.0, 0.0, 0.0),
                DVec3::new(1.0, 1.0, 0.0),
            ],
            triangles: vec![[0, 1, 2], [0, 4, 3], [3, 4, 1]],
        };
        let edges = feature_edges(&mesh, 20.0);
        assert!(edges.contains(&[0, 3]));
        assert!(edges.contains(&[1, 3]));
        assert!(!edges.contains(&[0, 1]));
    }

    #[test]
    fn test_drilled_plate_outline_is_complete() {
        let mesh = drilled_plate();
        let edges = feature_edges(&mesh, 20.0);
        let corners = [(-5.0, -5.0), (5.0, -5.0), (5.0, 5.0), (-5.0, 5.0)];

        // Every box edge is covered end to end by feature segments on it
        let mut box_edges = Vec::new();
        for i in 0..4 {
            let (x0, y0) = corners[i];
            let (x1, y1) = corners[(i + 1) % 4];
            for z in [-1.0, 1.0] {
                box_edges.push((DVec3::new(x0, y0, z), DVec3::new(x1, y1, z)));
            }
            box_edges.push((DVec3::new(x0, y0, -1.0), DVec3::new(x0, y0, 1.0)));
        }
        for (a, b) in box_edges {
            let line = (b - a).normalize();
            let covered: f64 = edges
                .iter()
                .map(|e| segment(&mesh, *e))
                .filter(|(p, q)| {
                    (*p - a).cross(line).length() < 1e-6 && (*q - a).cross(line).length() < 1e-6
                })
                .map(|(p, q)| (q - p).length())
                .sum();
            assert!(covered >= (b - a).length() - 1e-6, "{} - {} covered {}", a, b, covered);
        }

        // Nothing is drawn across the flat top and bottom faces
        for (p, q) in edges.iter().map(|e| segment(&mesh, *e)) {
            if (p.z - q.z).abs() > 1e-9 {
                continue;
            }
            let outline = |v: DVec3| v.x.abs() > 5.0 - 1e-6 || v.y.abs() > 5.0 - 1e-6;
            let rim = |v: DVec3| (1.9..=2.0 + 1e-6).contains(&v.truncate().length());
            let mid = (p + q) * 0.5;
            assert!(
                (outline(p) && outline(q) && outline(mid)) || (rim(p) && rim(q)),
                "stray edge {} - {}",
                p,
                q
            );
        }
    }
}
