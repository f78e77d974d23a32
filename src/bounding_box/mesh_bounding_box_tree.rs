use std::cmp::Ordering;

use crate::bounding_box::{BoundingBox, BoundingBoxTree};
use crate::misc::FloatingPoint;
use crate::polygon_mesh::PolygonMesh;

/// A lazy bounding box tree over the faces of a triangle mesh.
///
/// Nodes hold a set of face indices; division sorts the faces by centroid
/// along the longest box axis and halves the set.
pub struct MeshBoundingBoxTree<'a, T: FloatingPoint> {
    mesh: &'a PolygonMesh<T>,
    faces: Vec<usize>,
}

impl<'a, T: FloatingPoint> MeshBoundingBoxTree<'a, T> {
    /// Create a new tree over all faces of the mesh.
    pub fn new(mesh: &'a PolygonMesh<T>) -> Self {
        Self {
            mesh,
            faces: (0..mesh.faces().len()).collect(),
        }
    }

    pub fn mesh(&self) -> &'a PolygonMesh<T> {
        self.mesh
    }

    pub fn faces(&self) -> &[usize] {
        &self.faces
    }
}

impl<T: FloatingPoint> Clone for MeshBoundingBoxTree<'_, T> {
    fn clone(&self) -> Self {
        Self {
            mesh: self.mesh,
            faces: self.faces.clone(),
        }
    }
}

impl<T: FloatingPoint> BoundingBoxTree<T> for MeshBoundingBoxTree<'_, T> {
    /// A leaf yields its face index.
    type Item = usize;

    fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    fn is_dividable(&self) -> bool {
        self.faces.len() > 1
    }

    fn try_divide(&self) -> anyhow::Result<(Self, Self)> {
        anyhow::ensure!(self.faces.len() > 1, "a single face is not dividable");

        let axis = self.bounding_box().longest_axis();
        let mut faces = self.faces.clone();
        faces.sort_by(|&a, &b| {
            let ca = self.mesh.face_centroid(a)[axis];
            let cb = self.mesh.face_centroid(b)[axis];
            ca.partial_cmp(&cb).unwrap_or(Ordering::Equal)
        });

        let right = faces.split_off(faces.len() / 2);
        Ok((
            Self {
                mesh: self.mesh,
                faces,
            },
            Self {
                mesh: self.mesh,
                faces: right,
            },
        ))
    }

    fn bounding_box(&self) -> BoundingBox<T> {
        BoundingBox::new_with_points(
            self.faces
                .iter()
                .flat_map(|&f| self.mesh.face_points(f)),
        )
    }

    fn into_item(self) -> Self::Item {
        self.faces[0]
    }
}
