use nalgebra::{Point3, Vector2};

use crate::geometry::{ParametricSurface, TessellateAdaptive};
use crate::intersects::Intersects;
use crate::misc::{geometric_epsilon, FloatingPoint, Plane};

/// A refined surface/surface intersection point: the surface parameters on
/// both surfaces, the world position on the first surface and the residual
/// distance between the two surfaces.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SurfaceSurfaceIntersectionPoint<T: FloatingPoint> {
    uv0: Vector2<T>,
    uv1: Vector2<T>,
    point: Point3<T>,
    distance: T,
}

impl<T: FloatingPoint> SurfaceSurfaceIntersectionPoint<T> {
    pub fn uv0(&self) -> Vector2<T> {
        self.uv0
    }

    pub fn uv1(&self) -> Vector2<T> {
        self.uv1
    }

    pub fn point(&self) -> &Point3<T> {
        &self.point
    }

    /// The distance between the two surface evaluations when the refinement
    /// stopped. Callers inspect this to detect non-convergence.
    pub fn distance(&self) -> T {
        self.distance
    }
}

const MAX_REFINEMENT_ITERATIONS: usize = 10;

/// Lifts an approximate surface/surface incidence to an exact one.
///
/// Each iteration intersects three planes: the tangent planes of both
/// surfaces at the current parameters and the auxiliary plane through the
/// first evaluation perpendicular to both. The resulting point is expressed
/// in both tangent frames to advance the parameters; this update is tuned
/// for rational surface tangent frames and is kept verbatim.
///
/// Callers provide a validated estimate, so a degenerate plane configuration
/// mid-iteration is an irrecoverable failure rather than an expected
/// absence.
pub fn refine_surface_point<T, S0, S1>(
    s0: &S0,
    s1: &S1,
    uv0: Vector2<T>,
    uv1: Vector2<T>,
    tolerance: T,
) -> anyhow::Result<SurfaceSurfaceIntersectionPoint<T>>
where
    T: FloatingPoint,
    S0: ParametricSurface<T>,
    S1: ParametricSurface<T>,
{
    let mut uv0 = uv0;
    let mut uv1 = uv1;

    for iteration in 0..MAX_REFINEMENT_ITERATIONS {
        let d0 = s0.derivatives(uv0.x, uv0.y, 1);
        let d1 = s1.derivatives(uv1.x, uv1.y, 1);

        let p = Point3::from(d0[0][0]);
        let q = Point3::from(d1[0][0]);
        let pu = d0[1][0];
        let pv = d0[0][1];
        let qu = d1[1][0];
        let qv = d1[0][1];

        let distance = (p - q).norm();
        if distance < tolerance || iteration == MAX_REFINEMENT_ITERATIONS - 1 {
            return Ok(SurfaceSurfaceIntersectionPoint {
                uv0,
                uv1,
                point: p,
                distance,
            });
        }

        let pn = pu.cross(&pv).normalize();
        let qn = qu.cross(&qv).normalize();

        // The auxiliary plane through p perpendicular to both tangent planes
        let fnormal = pn.cross(&qn).normalize();

        let x = Plane::find_point_intersection(
            &Plane::from_point_normal(&p, pn),
            &Plane::from_point_normal(&q, qn),
            &Plane::from_point_normal(&p, fnormal),
        )
        .ok_or_else(|| {
            anyhow::anyhow!("degenerate tangent plane configuration while refining a surface intersection point")
        })?;

        let pdif = x - p;
        let qdif = x - q;

        let rw = pu.cross(&pn);
        let rt = pv.cross(&pn);
        let su = qu.cross(&qn);
        let sv = qv.cross(&qn);

        let dw = rt.dot(&pdif) / rt.dot(&pu);
        let dt = rw.dot(&pdif) / rw.dot(&pv);
        let du = sv.dot(&qdif) / sv.dot(&qu);
        let dv = su.dot(&qdif) / su.dot(&qv);

        uv0 += Vector2::new(dw, dt);
        uv1 += Vector2::new(du, dv);
    }

    unreachable!()
}

/// Find the intersection polylines between two parametric surfaces.
///
/// Both surfaces are tessellated adaptively, the meshes are intersected and
/// every polyline point is refined back onto the exact surfaces. Fitting
/// curves through the refined points is left to the caller.
pub fn find_surface_intersections<T, S0, S1>(
    s0: &S0,
    s1: &S1,
    tolerance: Option<T>,
) -> anyhow::Result<Vec<Vec<SurfaceSurfaceIntersectionPoint<T>>>>
where
    T: FloatingPoint,
    S0: ParametricSurface<T> + TessellateAdaptive<T>,
    S1: ParametricSurface<T> + TessellateAdaptive<T>,
{
    let tolerance = tolerance.unwrap_or_else(geometric_epsilon);

    let m0 = s0.tessellate_adaptive(None);
    let m1 = s1.tessellate_adaptive(None);

    let polylines = m0.find_intersection(&m1, ())?;
    polylines
        .into_iter()
        .map(|polyline| {
            polyline
                .into_iter()
                .map(|pt| refine_surface_point(s0, s1, pt.uv0(), pt.uv1(), tolerance))
                .collect()
        })
        .collect()
}
