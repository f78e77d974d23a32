use nalgebra::{Point3, Vector2};

use crate::bounding_box::BoundingBox;
use crate::misc::{FloatingPoint, Triangle};

/// A triangle mesh with a surface parameter pair per vertex.
///
/// Adaptive tessellation of a parametric surface produces this structure;
/// the per-vertex UVs let mesh intersection points be lifted back onto the
/// originating surface.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PolygonMesh<T: FloatingPoint> {
    vertices: Vec<Point3<T>>,
    faces: Vec<[usize; 3]>,
    uvs: Vec<Vector2<T>>,
}

impl<T: FloatingPoint> PolygonMesh<T> {
    pub fn new(vertices: Vec<Point3<T>>, faces: Vec<[usize; 3]>, uvs: Vec<Vector2<T>>) -> Self {
        Self {
            vertices,
            faces,
            uvs,
        }
    }

    pub fn vertices(&self) -> &[Point3<T>] {
        &self.vertices
    }

    pub fn faces(&self) -> &[[usize; 3]] {
        &self.faces
    }

    pub fn uvs(&self) -> &[Vector2<T>] {
        &self.uvs
    }

    pub fn face_points(&self, face: usize) -> [Point3<T>; 3] {
        let [a, b, c] = self.faces[face];
        [self.vertices[a], self.vertices[b], self.vertices[c]]
    }

    pub fn face_uvs(&self, face: usize) -> [Vector2<T>; 3] {
        let [a, b, c] = self.faces[face];
        [self.uvs[a], self.uvs[b], self.uvs[c]]
    }

    pub fn triangle_at(&self, face: usize) -> Triangle<T> {
        let [a, b, c] = self.face_points(face);
        Triangle::new(a, b, c)
    }

    pub fn face_centroid(&self, face: usize) -> Point3<T> {
        let [a, b, c] = self.face_points(face);
        let third = T::from_usize(3).unwrap();
        Point3::from((a.coords + b.coords + c.coords) / third)
    }

    pub fn face_bounding_box(&self, face: usize) -> BoundingBox<T> {
        BoundingBox::new_with_points(self.face_points(face))
    }

    /// Lift a world point lying on a face into the surface parameter space
    /// by barycentric interpolation of the face's vertex UVs.
    /// Returns `None` for a degenerate face.
    pub fn uv_at(&self, face: usize, point: &Point3<T>) -> Option<Vector2<T>> {
        let (s, t) = self.triangle_at(face).barycentric(point)?;
        let [ua, ub, uc] = self.face_uvs(face);
        Some(ua + (ub - ua) * s + (uc - ua) * t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> PolygonMesh<f64> {
        PolygonMesh::new(
            vec![
                Point3::new(0., 0., 0.),
                Point3::new(2., 0., 0.),
                Point3::new(2., 2., 0.),
                Point3::new(0., 2., 0.),
            ],
            vec![[0, 1, 2], [0, 2, 3]],
            vec![
                Vector2::new(0., 0.),
                Vector2::new(1., 0.),
                Vector2::new(1., 1.),
                Vector2::new(0., 1.),
            ],
        )
    }

    #[test]
    fn uv_lift_interpolates_vertex_uvs() {
        let mesh = square();
        let uv = mesh.uv_at(0, &Point3::new(2., 0., 0.)).unwrap();
        assert!((uv - Vector2::new(1., 0.)).norm() < 1e-10);

        let uv = mesh.uv_at(1, &Point3::new(1., 1., 0.)).unwrap();
        assert!((uv - Vector2::new(0.5, 0.5)).norm() < 1e-10);
    }

    #[test]
    fn face_bounding_box_covers_vertices() {
        let mesh = square();
        let bb = mesh.face_bounding_box(0);
        assert_eq!(bb.min(), &nalgebra::Vector3::new(0., 0., 0.));
        assert_eq!(bb.max(), &nalgebra::Vector3::new(2., 2., 0.));
    }
}
