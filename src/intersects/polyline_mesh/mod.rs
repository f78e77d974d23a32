use itertools::Itertools;
use nalgebra::{Point3, Vector2};

use crate::bounding_box::{
    BoundingBoxTraversal, BoundingBoxTree, MeshBoundingBoxTree, PolylineBoundingBoxTree,
};
use crate::intersects::Intersects;
use crate::misc::FloatingPoint;
use crate::polygon_mesh::PolygonMesh;
use crate::polyline::Polyline;

/// A polyline/mesh intersection event: the world point, the polyline's
/// global parameter, the pierced face and its surface parameter.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PolylineMeshIntersection<T: FloatingPoint> {
    point: Point3<T>,
    parameter: T,
    face: usize,
    uv: Vector2<T>,
}

impl<T: FloatingPoint> PolylineMeshIntersection<T> {
    pub fn point(&self) -> &Point3<T> {
        &self.point
    }

    /// The global parameter on the polyline.
    pub fn parameter(&self) -> T {
        self.parameter
    }

    pub fn face(&self) -> usize {
        self.face
    }

    /// The surface parameter on the pierced face.
    pub fn uv(&self) -> Vector2<T> {
        self.uv
    }
}

impl<'a, T: FloatingPoint> Intersects<'a, &'a PolygonMesh<T>> for Polyline<T> {
    type Output = anyhow::Result<Vec<PolylineMeshIntersection<T>>>;
    type Option = Option<T>;

    /// Find where a polyline pierces the faces of a mesh.
    ///
    /// Candidate segment & face pairs come from a pairwise bounding box
    /// tree traversal with the given tolerance (zero by default); each pair
    /// runs the segment/triangle test, and the segment's local parameter is
    /// interpolated into the polyline's global parameter domain.
    fn find_intersection(&'a self, other: &'a PolygonMesh<T>, option: Self::Option) -> Self::Output {
        let tolerance = option.unwrap_or_else(T::zero);

        let ta = PolylineBoundingBoxTree::new(self);
        let tb = MeshBoundingBoxTree::new(other);
        let traversed = BoundingBoxTraversal::try_traverse(ta, tb, Some(tolerance))?;

        Ok(traversed
            .into_pairs_iter()
            .filter_map(|(a, b)| {
                let index = a.into_item();
                let face = b.into_item();

                let segment = self.segment_at(index);
                let it = other.triangle_at(face).find_segment_intersection(&segment)?;

                let (t0, t1) = self.segment_parameters(index);
                let parameter = t0 + (t1 - t0) * it.parameter();
                let uv = other.uv_at(face, it.point())?;

                Some(PolylineMeshIntersection {
                    point: *it.point(),
                    parameter,
                    face,
                    uv,
                })
            })
            .collect_vec())
    }
}
