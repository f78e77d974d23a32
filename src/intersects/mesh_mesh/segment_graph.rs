use itertools::Itertools;
use rstar::{PointDistance, RTree, RTreeObject, AABB};

use crate::intersects::triangle_triangle::MeshIntersectionPoint;
use crate::misc::{geometric_epsilon, FloatingPoint, Interval};

/// Arena of mesh intersection segment endpoints with topological links.
///
/// The endpoints of segment `k` sit at indices `2k` and `2k + 1`, so the
/// opposite endpoint of `i` is `i ^ 1`. Adjacency links join spatially
/// coincident endpoints of different segments and are set at most once; the
/// visited bitset is scratch for the polyline walk.
pub(crate) struct SegmentGraph<T: FloatingPoint> {
    points: Vec<MeshIntersectionPoint<T>>,
    adjacency: Vec<Option<usize>>,
    visited: Vec<bool>,
}

struct EndpointNode {
    position: [f64; 3],
    index: usize,
}

impl RTreeObject for EndpointNode {
    type Envelope = AABB<[f64; 3]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.position)
    }
}

impl PointDistance for EndpointNode {
    fn distance_2(&self, other: &[f64; 3]) -> f64 {
        let dx = self.position[0] - other[0];
        let dy = self.position[1] - other[1];
        let dz = self.position[2] - other[2];
        dx * dx + dy * dy + dz * dz
    }
}

impl<T: FloatingPoint> SegmentGraph<T> {
    pub fn new(segments: Vec<Interval<MeshIntersectionPoint<T>>>) -> Self {
        let mut points = Vec::with_capacity(segments.len() * 2);
        for segment in segments {
            let (min, max) = segment.into_tuple();
            points.push(min);
            points.push(max);
        }
        let n = points.len();
        Self {
            points,
            adjacency: vec![None; n],
            visited: vec![false; n],
        }
    }

    fn position(&self, index: usize) -> [f64; 3] {
        let p = self.points[index].point();
        [
            p.x.to_f64().unwrap(),
            p.y.to_f64().unwrap(),
            p.z.to_f64().unwrap(),
        ]
    }

    /// Link every endpoint to the single coincident endpoint of another
    /// segment, when there is exactly one. Branching points join three or
    /// more endpoints and deliberately stay unlinked.
    pub fn link_adjacent(&mut self) {
        let nodes = (0..self.points.len())
            .map(|index| EndpointNode {
                position: self.position(index),
                index,
            })
            .collect_vec();
        let tree = RTree::bulk_load(nodes);

        let eps = geometric_epsilon::<f64>();
        let k = (self.points.len() / 2).max(3);

        for i in 0..self.points.len() {
            if self.adjacency[i].is_some() {
                continue;
            }

            let position = self.position(i);
            let neighbors = tree
                .nearest_neighbor_iter_with_distance_2(&position)
                .take(k)
                .take_while(|(_, d2)| *d2 < eps)
                .map(|(node, _)| node.index)
                .filter(|&j| j != i)
                .collect_vec();

            if let [j] = neighbors[..] {
                if self.adjacency[j].is_none() {
                    self.adjacency[i] = Some(j);
                    self.adjacency[j] = Some(i);
                }
            }
        }
    }

    /// Chase the `opposite`/`adjacent` links into polylines.
    ///
    /// Free endpoints seed open polylines; with no free endpoint every
    /// component is a loop and any endpoint may seed a walk. Meeting an
    /// already visited endpoint mid-walk indicates broken linkage and fails
    /// loudly.
    pub fn walk_polylines(mut self) -> anyhow::Result<Vec<Vec<MeshIntersectionPoint<T>>>> {
        let free = (0..self.points.len())
            .filter(|&i| self.adjacency[i].is_none())
            .collect_vec();
        let roots = if free.is_empty() {
            (0..self.points.len()).collect_vec()
        } else {
            free
        };

        let mut polylines = vec![];
        for root in roots {
            if self.visited[root] {
                continue;
            }

            let mut indices = vec![];
            let mut cur = root;
            loop {
                anyhow::ensure!(
                    !self.visited[cur],
                    "encountered an already visited endpoint while walking a polyline"
                );
                self.visited[cur] = true;
                self.visited[cur ^ 1] = true;
                indices.push(cur);

                let tail = cur ^ 1;
                match self.adjacency[tail] {
                    Some(next) if next != root => cur = next,
                    _ => {
                        // Close the polyline with the far end of the last
                        // segment.
                        indices.push(tail);
                        break;
                    }
                }
            }

            polylines.push(
                indices
                    .into_iter()
                    .map(|i| self.points[i].clone())
                    .collect(),
            );
        }

        Ok(polylines)
    }
}
