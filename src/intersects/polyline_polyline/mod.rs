use itertools::Itertools;
use nalgebra::Point3;

use crate::bounding_box::{BoundingBoxTraversal, BoundingBoxTree, PolylineBoundingBoxTree};
use crate::intersects::{CurveCurveIntersection, Intersection, Intersects};
use crate::misc::{geometric_epsilon, FloatingPoint};
use crate::polyline::Polyline;

impl<'a, T: FloatingPoint> Intersects<'a, &'a Polyline<T>> for Polyline<T> {
    type Output = anyhow::Result<Vec<CurveCurveIntersection<Point3<T>, T>>>;
    type Option = Option<T>;

    /// Find the intersection points between two polylines.
    ///
    /// Candidate segment pairs come from a pairwise bounding box tree
    /// traversal; each pair runs the segment/segment primitive with the
    /// given distance tolerance, and the local parameters are remapped into
    /// both polylines' global parameter domains.
    fn find_intersection(&'a self, other: &'a Polyline<T>, option: Self::Option) -> Self::Output {
        let tolerance = option.unwrap_or_else(geometric_epsilon);

        let ta = PolylineBoundingBoxTree::new(self);
        let tb = PolylineBoundingBoxTree::new(other);
        let traversed = BoundingBoxTraversal::try_traverse(ta, tb, Some(T::zero()))?;

        Ok(traversed
            .into_pairs_iter()
            .filter_map(|(a, b)| {
                let i = a.into_item();
                let j = b.into_item();

                let it = self
                    .segment_at(i)
                    .find_intersection(&other.segment_at(j), tolerance)?;
                let ((p0, u0), (p1, u1)) = it.as_tuple();

                let (a0, a1) = self.segment_parameters(i);
                let (b0, b1) = other.segment_parameters(j);
                Some(Intersection::new(
                    (p0, a0 + (a1 - a0) * u0),
                    (p1, b0 + (b1 - b0) * u1),
                ))
            })
            .collect_vec())
    }
}
