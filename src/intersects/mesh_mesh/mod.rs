mod segment_graph;

use itertools::Itertools;

use crate::bounding_box::{BoundingBoxTraversal, BoundingBoxTree, MeshBoundingBoxTree};
use crate::intersects::triangle_triangle::{find_triangle_intersection, MeshIntersectionPoint};
use crate::intersects::Intersects;
use crate::misc::{geometric_epsilon, FloatingPoint, Interval};
use crate::polygon_mesh::PolygonMesh;

use segment_graph::SegmentGraph;

impl<'a, T: FloatingPoint> Intersects<'a, &'a PolygonMesh<T>> for PolygonMesh<T> {
    type Output = anyhow::Result<Vec<Vec<MeshIntersectionPoint<T>>>>;
    type Option = ();

    /// Find the intersection polylines between two triangle meshes.
    ///
    /// Candidate face pairs come from a pairwise bounding box tree
    /// traversal, each pair contributes at most one intersection segment,
    /// duplicated segments on shared mesh edges are removed, and the
    /// surviving segments are stitched into polylines by matching
    /// spatially coincident endpoints.
    fn find_intersection(&'a self, other: &'a PolygonMesh<T>, _option: Self::Option) -> Self::Output {
        let eps = geometric_epsilon::<T>();

        let ta = MeshBoundingBoxTree::new(self);
        let tb = MeshBoundingBoxTree::new(other);
        let traversed = BoundingBoxTraversal::try_traverse(ta, tb, Some(T::zero()))?;

        let segments = traversed
            .into_pairs_iter()
            .filter_map(|(a, b)| {
                find_triangle_intersection(self, a.into_item(), other, b.into_item())
            })
            .filter(|segment| {
                // drop degenerate slivers
                (segment.min().point() - segment.max().point()).norm_squared() >= eps
            })
            .collect_vec();

        let mut graph = SegmentGraph::new(dedup_segments(segments));
        graph.link_adjacent();
        graph.walk_polylines()
    }
}

/// Drop duplicated segments produced when the true intersection lies on a
/// shared mesh edge. Two segments are duplicates when their `uv0` endpoints
/// coincide under either pairing.
fn dedup_segments<T: FloatingPoint>(
    segments: Vec<Interval<MeshIntersectionPoint<T>>>,
) -> Vec<Interval<MeshIntersectionPoint<T>>> {
    let eps = geometric_epsilon::<T>();
    let mut unique: Vec<Interval<MeshIntersectionPoint<T>>> = vec![];

    for segment in segments {
        let duplicate = unique.iter().any(|kept| {
            let straight = (segment.min().uv0() - kept.min().uv0()).norm_squared() < eps
                && (segment.max().uv0() - kept.max().uv0()).norm_squared() < eps;
            let crossed = (segment.min().uv0() - kept.max().uv0()).norm_squared() < eps
                && (segment.max().uv0() - kept.min().uv0()).norm_squared() < eps;
            straight || crossed
        });
        if !duplicate {
            unique.push(segment);
        }
    }

    unique
}
