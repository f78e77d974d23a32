use nalgebra::{Point3, Vector2};

use crate::misc::{geometric_epsilon, FloatingPoint, Interval, Ray};
use crate::polygon_mesh::PolygonMesh;

/// A point on the line shared by two triangle planes, clipped into one
/// triangle: line parameter, world position and the triangle's surface
/// parameter.
#[derive(Clone, Debug)]
pub struct CurveTriPoint<T: FloatingPoint> {
    u: T,
    point: Point3<T>,
    uv: Vector2<T>,
}

impl<T: FloatingPoint> CurveTriPoint<T> {
    /// The parameter along the shared line.
    pub fn u(&self) -> T {
        self.u
    }

    pub fn point(&self) -> &Point3<T> {
        &self.point
    }

    pub fn uv(&self) -> Vector2<T> {
        self.uv
    }
}

/// One endpoint of a mesh/mesh intersection segment: the surface parameters
/// on both meshes, the world position and the producing face pair.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MeshIntersectionPoint<T: FloatingPoint> {
    uv0: Vector2<T>,
    uv1: Vector2<T>,
    point: Point3<T>,
    face0: usize,
    face1: usize,
}

impl<T: FloatingPoint> MeshIntersectionPoint<T> {
    pub fn new(
        uv0: Vector2<T>,
        uv1: Vector2<T>,
        point: Point3<T>,
        face0: usize,
        face1: usize,
    ) -> Self {
        Self {
            uv0,
            uv1,
            point,
            face0,
            face1,
        }
    }

    /// The surface parameter on the first mesh.
    pub fn uv0(&self) -> Vector2<T> {
        self.uv0
    }

    /// The surface parameter on the second mesh.
    pub fn uv1(&self) -> Vector2<T> {
        self.uv1
    }

    pub fn point(&self) -> &Point3<T> {
        &self.point
    }

    /// The face of the first mesh that produced this endpoint.
    pub fn face0(&self) -> usize {
        self.face0
    }

    /// The face of the second mesh that produced this endpoint.
    pub fn face1(&self) -> usize {
        self.face1
    }
}

/// Finds the intersection segment of two mesh faces.
///
/// The faces' supporting planes are intersected, the shared line is clipped
/// into both triangles independently and the two clip intervals are merged.
/// Returns `None` when the faces are degenerate, the planes parallel, a clip
/// empty or the clip intervals disjoint.
pub fn find_triangle_intersection<T: FloatingPoint>(
    mesh0: &PolygonMesh<T>,
    face0: usize,
    mesh1: &PolygonMesh<T>,
    face1: usize,
) -> Option<Interval<MeshIntersectionPoint<T>>> {
    let p0 = mesh0.triangle_at(face0).plane()?;
    let p1 = mesh1.triangle_at(face1).plane()?;
    let ray = p0.find_intersection(&p1)?;

    let clip0 = clip_ray_in_coplanar_triangle(&ray, mesh0, face0)?;
    let clip1 = clip_ray_in_coplanar_triangle(&ray, mesh1, face1)?;
    merge_triangle_clip_intervals(&clip0, &clip1, mesh0, face0, mesh1, face1)
}

/// Clips a line lying in the triangle's plane against the triangle's three
/// edges, tracking the extremal line parameters with edge-interpolated UVs.
pub(crate) fn clip_ray_in_coplanar_triangle<T: FloatingPoint>(
    ray: &Ray<T>,
    mesh: &PolygonMesh<T>,
    face: usize,
) -> Option<Interval<CurveTriPoint<T>>> {
    let eps = geometric_epsilon();
    let points = mesh.face_points(face);
    let uvs = mesh.face_uvs(face);

    let mut min: Option<CurveTriPoint<T>> = None;
    let mut max: Option<CurveTriPoint<T>> = None;

    for i in 0..3 {
        let next = (i + 1) % 3;
        let edge = points[next] - points[i];
        let len = edge.norm();
        if len < eps {
            continue;
        }

        let edge_ray = Ray::new(points[i], edge / len);
        let Some(it) = edge_ray.find_intersection(ray) else {
            // The edge runs along the line.
            continue;
        };

        let u_edge = it.a().1;
        if u_edge < -eps || u_edge > len + eps {
            continue;
        }

        let candidate = CurveTriPoint {
            u: it.b().1,
            point: it.b().0,
            uv: uvs[i] + (uvs[next] - uvs[i]) * (u_edge / len),
        };

        if min.as_ref().map_or(true, |m| candidate.u < m.u) {
            min = Some(candidate.clone());
        }
        if max.as_ref().map_or(true, |m| candidate.u > m.u) {
            max = Some(candidate);
        }
    }

    Some(Interval::new(min?, max?))
}

/// Intersects two clip intervals along their common line.
///
/// The side that contributed an extremum supplies that endpoint's UV
/// directly; the opposite side's UV is lifted barycentrically from the world
/// position. Returns `None` when the intervals are disjoint.
pub(crate) fn merge_triangle_clip_intervals<T: FloatingPoint>(
    clip0: &Interval<CurveTriPoint<T>>,
    clip1: &Interval<CurveTriPoint<T>>,
    mesh0: &PolygonMesh<T>,
    face0: usize,
    mesh1: &PolygonMesh<T>,
    face1: usize,
) -> Option<Interval<MeshIntersectionPoint<T>>> {
    let eps = geometric_epsilon();

    let (lower, lower_on_first) = if clip0.min().u > clip1.min().u {
        (clip0.min(), true)
    } else {
        (clip1.min(), false)
    };
    let (upper, upper_on_first) = if clip0.max().u < clip1.max().u {
        (clip0.max(), true)
    } else {
        (clip1.max(), false)
    };

    if lower.u - upper.u > eps {
        return None;
    }

    let min = labeled_endpoint(lower, lower_on_first, mesh0, face0, mesh1, face1)?;
    let max = labeled_endpoint(upper, upper_on_first, mesh0, face0, mesh1, face1)?;
    Some(Interval::new(min, max))
}

fn labeled_endpoint<T: FloatingPoint>(
    pt: &CurveTriPoint<T>,
    on_first: bool,
    mesh0: &PolygonMesh<T>,
    face0: usize,
    mesh1: &PolygonMesh<T>,
    face1: usize,
) -> Option<MeshIntersectionPoint<T>> {
    let (uv0, uv1) = if on_first {
        (pt.uv, mesh1.uv_at(face1, &pt.point)?)
    } else {
        (mesh0.uv_at(face0, &pt.point)?, pt.uv)
    };
    Some(MeshIntersectionPoint::new(uv0, uv1, pt.point, face0, face1))
}
