/// Geometry primitives for normalized meshes
use nalgebra::{Point3, Vector3};

/// A vertex with position, normal and normal-derived color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
    pub color: Vector3<f32>,
}

/// A triangle face defined by three vertices
#[derive(Debug, Clone)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Calculate the face normal from the triangle's vertices.
    ///
    /// Returns `None` for a triangle with collinear vertices.
    pub fn calculate_normal(&self) -> Option<Vector3<f32>> {
        let v0 = self.vertices[0].position;
        let v1 = self.vertices[1].position;
        let v2 = self.vertices[2].position;

        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        edge1.cross(&edge2).try_normalize(f32::EPSILON)
    }

    /// Mean of the three vertex colors
    pub fn color(&self) -> Vector3<f32> {
        (self.vertices[0].color + self.vertices[1].color + self.vertices[2].color) / 3.0
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Aabb {
    /// An empty box that any point will expand.
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
            max: Point3::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
        }
    }

    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3<f32>>) -> Self {
        let mut bounds = Self::empty();
        for point in points {
            bounds.include(point);
        }
        bounds
    }

    pub fn include(&mut self, point: &Point3<f32>) {
        self.min = self.min.inf(point);
        self.max = self.max.sup(point);
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn center(&self) -> Point3<f32> {
        // min + max can overflow where the half-width does not
        self.min + self.half_extents()
    }

    /// Distance from the center to the max corner along each axis
    pub fn half_extents(&self) -> Vector3<f32> {
        (self.max - self.min) / 2.0
    }
}

/// Parsed, normalized and immutable mesh geometry.
///
/// Built only through [`crate::obj::parse_obj`], which guarantees that
/// positions, normals and colors have equal length and that every index
/// refers to an existing vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    positions: Vec<Point3<f32>>,
    normals: Vec<Vector3<f32>>,
    colors: Vec<Vector3<f32>>,
    indices: Vec<u32>,
    bounds: Aabb,
}

impl MeshData {
    pub(crate) fn from_parts(
        positions: Vec<Point3<f32>>,
        normals: Vec<Vector3<f32>>,
        colors: Vec<Vector3<f32>>,
        indices: Vec<u32>,
    ) -> Self {
        debug_assert_eq!(positions.len(), normals.len());
        debug_assert_eq!(positions.len(), colors.len());
        debug_assert_eq!(indices.len() % 3, 0);

        let bounds = Aabb::from_points(&positions);
        Self {
            positions,
            normals,
            colors,
            indices,
            bounds,
        }
    }

    pub fn positions(&self) -> &[Point3<f32>] {
        &self.positions
    }

    pub fn normals(&self) -> &[Vector3<f32>] {
        &self.normals
    }

    pub fn colors(&self) -> &[Vector3<f32>] {
        &self.colors
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Extents after normalization
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn vertex(&self, index: usize) -> Option<Vertex> {
        Some(Vertex {
            position: *self.positions.get(index)?,
            normal: self.normals[index],
            color: self.colors[index],
        })
    }

    /// Interleaved vertices in buffer order
    pub fn vertices(&self) -> impl Iterator<Item = Vertex> + '_ {
        (0..self.positions.len()).filter_map(|i| self.vertex(i))
    }

    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.indices.chunks_exact(3).filter_map(|face| {
            Some(Triangle::new(
                self.vertex(face[0] as usize)?,
                self.vertex(face[1] as usize)?,
                self.vertex(face[2] as usize)?,
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertex(x: f32, y: f32, z: f32) -> Vertex {
        Vertex {
            position: Point3::new(x, y, z),
            normal: Vector3::z(),
            color: Vector3::new(0.5, 0.5, 1.0),
        }
    }

    #[test]
    fn test_triangle_normal() {
        let triangle = Triangle::new(vertex(0.0, 0.0, 0.0), vertex(1.0, 0.0, 0.0), vertex(0.0, 1.0, 0.0));
        let normal = triangle.calculate_normal().unwrap();
        assert!((normal - Vector3::z()).norm() < 1e-6);
    }

    #[test]
    fn test_collinear_triangle_has_no_normal() {
        let triangle = Triangle::new(vertex(0.0, 0.0, 0.0), vertex(1.0, 0.0, 0.0), vertex(2.0, 0.0, 0.0));
        assert!(triangle.calculate_normal().is_none());
    }

    #[test]
    fn test_aabb_center_and_extents() {
        let points = [Point3::new(-1.0, 0.0, 2.0), Point3::new(3.0, 4.0, 2.0)];
        let bounds = Aabb::from_points(&points);
        assert_eq!(bounds.center(), Point3::new(1.0, 2.0, 2.0));
        assert_eq!(bounds.half_extents(), Vector3::new(2.0, 2.0, 0.0));
        assert!(Aabb::empty().is_empty());
        assert!(!bounds.is_empty());
    }

    #[test]
    fn test_aabb_center_near_float_limit() {
        let points = [Point3::new(3.0e38, 0.0, 0.0), Point3::new(3.4e38, 1.0, 0.0)];
        let bounds = Aabb::from_points(&points);
        assert!(bounds.center().iter().all(|c| c.is_finite()));
        assert!((bounds.center().x - 3.2e38).abs() < 1e33);
    }

    #[test]
    fn test_vertices_follow_buffer_order() {
        let mesh = MeshData::from_parts(
            vec![Point3::new(-1.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 0.0)],
            vec![Vector3::z(); 3],
            vec![Vector3::new(0.5, 0.5, 1.0); 3],
            vec![0, 1, 2],
        );
        let vertices: Vec<Vertex> = mesh.vertices().collect();
        assert_eq!(vertices.len(), 3);
        for (i, vertex) in vertices.iter().enumerate() {
            assert_eq!(vertex.position, mesh.positions()[i]);
            assert_eq!(Some(*vertex), mesh.vertex(i));
        }
        assert!(mesh.vertex(3).is_none());
    }
}
