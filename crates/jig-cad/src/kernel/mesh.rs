//! CSG mesh kernel backend
//!
//! Polygonal solids with boolean operations delegated to the `csgrs` BSP
//! implementation. Curved primitives are faceted at construction so their
//! chord deviation stays within the kernel's linear tolerance; fillets and
//! chamfers are expressed as subtractions of cutter solids.

use std::f64::consts::PI;

use csgrs::mesh::{bsp::Node, polygon::Polygon, vertex::Vertex};
use glam::{DAffine3, DVec3};
use nalgebra::{Point3, Vector3};

use super::body::{Body, Face, cylinder_segments, validate_convex_profile};
use super::identity::Recipe;
use super::traits::{BooleanType, CadError, CadKernel, CadResult, Edge, Solid, TessellatedMesh};

/// Default chord deviation for faceted curved surfaces
pub const DEFAULT_LINEAR_TOLERANCE: f64 = 0.1;

/// Cutters overshoot the faces they cut by this fraction of their size
const CUTTER_MARGIN: f64 = 0.1;

/// CSG mesh kernel
#[derive(Debug, Clone)]
pub struct MeshKernel {
    linear_tolerance: f64,
}

impl MeshKernel {
    /// Create a kernel with the default linear tolerance
    pub fn new() -> Self {
        Self {
            linear_tolerance: DEFAULT_LINEAR_TOLERANCE,
        }
    }

    /// Create a kernel with a custom chord deviation for curved primitives
    pub fn with_linear_tolerance(linear_tolerance: f64) -> Self {
        Self { linear_tolerance }
    }

    /// Chord deviation used for curved primitives
    pub fn linear_tolerance(&self) -> f64 {
        self.linear_tolerance
    }

    fn polygons(body: &Body) -> Vec<Polygon<()>> {
        body.faces()
            .iter()
            .map(|face| {
                let normal = Vector3::new(face.normal.x, face.normal.y, face.normal.z);
                let vertices = face
                    .points
                    .iter()
                    .map(|p| Vertex::new(Point3::new(p.x, p.y, p.z), normal))
                    .collect();
                Polygon::new(vertices, None)
            })
            .collect()
    }

    fn from_polygons(polygons: &[Polygon<()>]) -> Body {
        let faces = polygons
            .iter()
            .filter_map(|polygon| {
                let points = polygon
                    .vertices
                    .iter()
                    .map(|v| DVec3::new(v.pos[0], v.pos[1], v.pos[2]))
                    .collect();
                Face::new(points)
            })
            .collect();
        Body::from_faces(faces)
    }

    /// Boolean of two bodies on BSP trees built from every face of both
    ///
    /// No face is passed through on bounding-box grounds, so a cutter that
    /// encloses the solid consumes it and an enclosed operand is absorbed.
    fn combine(&self, a: &Body, b: &Body, op: BooleanType) -> CadResult<Body> {
        let mut lhs = Node::from_polygons(&Self::polygons(a));
        let mut rhs = Node::from_polygons(&Self::polygons(b));
        match op {
            BooleanType::Union => {
                lhs.clip_to(&rhs);
                rhs.clip_to(&lhs);
                rhs.invert();
                rhs.clip_to(&lhs);
                rhs.invert();
                lhs.build(&rhs.all_polygons());
            }
            BooleanType::Subtract => {
                lhs.invert();
                lhs.clip_to(&rhs);
                rhs.clip_to(&lhs);
                rhs.invert();
                rhs.clip_to(&lhs);
                rhs.invert();
                lhs.build(&rhs.all_polygons());
                lhs.invert();
            }
            BooleanType::Intersect => {
                lhs.invert();
                rhs.clip_to(&lhs);
                rhs.invert();
                lhs.clip_to(&rhs);
                rhs.clip_to(&lhs);
                lhs.build(&rhs.all_polygons());
                lhs.invert();
            }
        }

        let body = Self::from_polygons(&lhs.all_polygons());
        if body.is_empty() {
            return Err(CadError::BooleanFailed(format!(
                "{:?} produced an empty solid",
                op
            )));
        }
        Ok(body)
    }

    /// Cutter removing the material between a fillet arc and its edge
    ///
    /// The arc is faceted like a cylinder of the same radius, with its inner
    /// vertices pushed out so the faceted section has the area of the true one.
    fn fillet_cutter(&self, edge: &Edge, radius: f64) -> CadResult<Body> {
        let frame = EdgeFrame::new(edge)?;
        let margin = radius * CUTTER_MARGIN;
        let [n1, n2] = frame.normals;

        // The arc center sits `radius` below both faces
        let cos = n1.dot(n2);
        let center = -(n1 + n2) * (radius / (1.0 + cos));
        let sweep = cos.clamp(-1.0, 1.0).acos();
        let toward_b = (n2 - n1 * cos).normalize();

        let full = cylinder_segments(radius, self.linear_tolerance) as f64;
        let steps = ((full * sweep / (2.0 * PI)).ceil() as u32).max(1);
        let step = sweep / steps as f64;
        let inner = arc_vertex_radius(radius, steps, step);

        let mut section = Vec::with_capacity(steps as usize + 4);
        section.push((n1 + n2) * margin);
        section.push(center + n1 * (radius + margin));
        for i in 0..=steps {
            let angle = step * i as f64;
            let r = if i == 0 || i == steps { radius } else { inner };
            section.push(center + (n1 * angle.cos() + toward_b * angle.sin()) * r);
        }
        section.push(center + n2 * (radius + margin));
        Ok(frame.sweep(&section, margin, Body::fan_prism))
    }

    /// Cutter removing a triangular bevel along an edge
    fn chamfer_cutter(&self, edge: &Edge, distance: f64) -> CadResult<Body> {
        let frame = EdgeFrame::new(edge)?;
        let margin = distance * CUTTER_MARGIN;
        let [n1, n2] = frame.normals;

        // Directions along each face, away from the edge into the material
        let mut along_a = frame.direction.cross(n1).normalize();
        if along_a.dot(n2) > 0.0 {
            along_a = -along_a;
        }
        let mut along_b = frame.direction.cross(n2).normalize();
        if along_b.dot(n1) > 0.0 {
            along_b = -along_b;
        }
        let a = along_a * distance;
        let b = along_b * distance;
        let across = (a - b).normalize();
        let section = [
            (n1 + n2).normalize() * margin,
            a + across * margin,
            b - across * margin,
        ];
        Ok(frame.sweep(&section, margin, Body::prism))
    }

    fn apply_cutters(
        &self,
        solid: &Solid,
        edges: &[Edge],
        recipe: Recipe,
        cutter: impl Fn(&Edge) -> CadResult<Body>,
    ) -> CadResult<Solid> {
        if edges.is_empty() {
            return Err(CadError::OperationFailed("no edges selected".into()));
        }
        let mut body = solid.body().clone();
        let mut recipe = recipe.solid(solid.id());
        for edge in edges {
            body = self.combine(&body, &cutter(edge)?, BooleanType::Subtract)?;
            recipe = recipe
                .vector(edge.start)
                .vector(edge.end)
                .vector(edge.normals[0])
                .vector(edge.normals[1]);
        }
        Ok(Solid::new(recipe.finish(), body))
    }
}

impl Default for MeshKernel {
    fn default() -> Self {
        Self::new()
    }
}

/// Local frame of a straight edge between two planar faces
struct EdgeFrame {
    start: DVec3,
    direction: DVec3,
    length: f64,
    normals: [DVec3; 2],
}

impl EdgeFrame {
    fn new(edge: &Edge) -> CadResult<Self> {
        let length = edge.length();
        let direction = (edge.end - edge.start)
            .try_normalize()
            .ok_or_else(|| CadError::OperationFailed("edge has zero length".into()))?;
        let n1 = edge.normals[0]
            .try_normalize()
            .ok_or_else(|| CadError::OperationFailed("edge normal is zero".into()))?;
        let n2 = edge.normals[1]
            .try_normalize()
            .ok_or_else(|| CadError::OperationFailed("edge normal is zero".into()))?;
        if n1.dot(direction).abs() > 1e-6 || n2.dot(direction).abs() > 1e-6 {
            return Err(CadError::OperationFailed(
                "edge normals must be perpendicular to the edge".into(),
            ));
        }
        let cos = n1.dot(n2);
        if cos > 1.0 - 1e-6 || cos < -1.0 + 1e-6 {
            return Err(CadError::OperationFailed(
                "faces at the edge are coplanar".into(),
            ));
        }
        Ok(Self {
            start: edge.start,
            direction,
            length,
            normals: [n1, n2],
        })
    }

    /// Extrude a cross-section (relative to the edge) along the full edge
    fn sweep(
        &self,
        section: &[DVec3],
        margin: f64,
        extrude: fn(&[DVec3], DVec3) -> Body,
    ) -> Body {
        let origin = self.start - self.direction * margin;
        let profile: Vec<DVec3> = section.iter().map(|p| origin + *p).collect();
        extrude(&profile, self.direction * (self.length + 2.0 * margin))
    }
}

/// Radius of the inner vertices of a faceted arc of `steps` chords spanning
/// `step` each, whose end vertices stay on `radius`, such that the fan from
/// the center covers the area of the exact sector
fn arc_vertex_radius(radius: f64, steps: u32, step: f64) -> f64 {
    let ratio = steps as f64 * step / step.sin();
    match steps {
        0 | 1 => radius,
        2 => radius * ratio / 2.0,
        _ => {
            let inner = (steps - 2) as f64;
            radius * ((1.0 + inner * ratio).sqrt() - 1.0) / inner
        }
    }
}

fn check_positive(name: &str, value: f64) -> CadResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(CadError::InvalidDimension(format!(
            "{} must be positive, got {}",
            name, value
        )))
    }
}

fn check_finite(name: &str, value: DVec3) -> CadResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(CadError::InvalidDimension(format!(
            "{} must be finite, got {}",
            name, value
        )))
    }
}

impl CadKernel for MeshKernel {
    fn name(&self) -> &str {
        "mesh"
    }

    fn create_box(&self, center: DVec3, size: DVec3) -> CadResult<Solid> {
        check_finite("box center", center)?;
        check_positive("box width", size.x)?;
        check_positive("box depth", size.y)?;
        check_positive("box height", size.z)?;

        let id = Recipe::new("box").vector(center).vector(size).finish();
        Ok(Solid::new(id, Body::cuboid(center, size)))
    }

    fn create_cylinder(
        &self,
        center: DVec3,
        radius: f64,
        height: f64,
        axis: DVec3,
    ) -> CadResult<Solid> {
        check_finite("cylinder center", center)?;
        check_positive("cylinder radius", radius)?;
        check_positive("cylinder height", height)?;
        let axis = axis
            .try_normalize()
            .ok_or_else(|| CadError::InvalidDimension("cylinder axis is zero".into()))?;

        let segments = cylinder_segments(radius, self.linear_tolerance);
        let id = Recipe::new("cylinder")
            .vector(center)
            .scalar(radius)
            .scalar(height)
            .vector(axis)
            .count(segments as u64)
            .finish();
        Ok(Solid::new(
            id,
            Body::cylinder(center, radius, height, axis, segments),
        ))
    }

    fn extrude(&self, profile: &[DVec3], direction: DVec3) -> CadResult<Solid> {
        let normal = validate_convex_profile(profile)?;
        check_finite("extrude direction", direction)?;
        if direction.dot(normal).abs() < 1e-12 {
            return Err(CadError::InvalidProfile(
                "extrusion direction lies in the profile plane".into(),
            ));
        }

        let id = profile
            .iter()
            .fold(Recipe::new("extrude"), |recipe, p| recipe.vector(*p))
            .vector(direction)
            .finish();
        Ok(Solid::new(id, Body::prism(profile, direction)))
    }

    fn boolean(&self, a: &Solid, b: &Solid, op: BooleanType) -> CadResult<Solid> {
        let body = self.combine(a.body(), b.body(), op)?;
        let id = Recipe::new("boolean")
            .count(op.tag())
            .solid(a.id())
            .solid(b.id())
            .finish();
        tracing::trace!("{:?} {} {} -> {}", op, a.id(), b.id(), id);
        Ok(Solid::new(id, body))
    }

    fn transform(&self, solid: &Solid, transform: &DAffine3) -> CadResult<Solid> {
        if !transform.is_finite() || transform.matrix3.determinant().abs() < 1e-12 {
            return Err(CadError::InvalidDimension(
                "transform must be finite and invertible".into(),
            ));
        }
        let id = Recipe::new("transform")
            .solid(solid.id())
            .affine(transform)
            .finish();
        Ok(Solid::new(id, solid.body().transformed(transform)))
    }

    fn fillet(&self, solid: &Solid, edges: &[Edge], radius: f64) -> CadResult<Solid> {
        check_positive("fillet radius", radius)?;
        self.apply_cutters(
            solid,
            edges,
            Recipe::new("fillet")
                .scalar(radius)
                .count(cylinder_segments(radius, self.linear_tolerance) as u64),
            |edge| self.fillet_cutter(edge, radius),
        )
    }

    fn chamfer(&self, solid: &Solid, edges: &[Edge], distance: f64) -> CadResult<Solid> {
        check_positive("chamfer distance", distance)?;
        self.apply_cutters(
            solid,
            edges,
            Recipe::new("chamfer").scalar(distance),
            |edge| self.chamfer_cutter(edge, distance),
        )
    }

    fn tessellate(&self, solid: &Solid, tolerance: f64) -> CadResult<TessellatedMesh> {
        solid.body().triangulate(tolerance)
    }
}
