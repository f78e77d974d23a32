use argmin::core::{CostFunction, Gradient};
use nalgebra::Vector3;

use crate::geometry::{ParametricCurve, ParametricSurface};
use crate::misc::FloatingPoint;

/// Gradient & CostFunction provider for finding the intersection between a
/// surface & a curve. The parameter vector is `(t, u, v)`: the curve
/// parameter followed by the surface parameters.
pub struct SurfaceCurveIntersectionProblem<'a, T: FloatingPoint, S, C> {
    a: &'a S,
    b: &'a C,
    u_domain: (T, T),
    v_domain: (T, T),
    curve_domain: (T, T),
}

impl<'a, T: FloatingPoint, S, C> SurfaceCurveIntersectionProblem<'a, T, S, C> {
    pub fn new(
        a: &'a S,
        b: &'a C,
        (u_domain, v_domain): ((T, T), (T, T)),
        curve_domain: (T, T),
    ) -> Self {
        Self {
            a,
            b,
            u_domain,
            v_domain,
            curve_domain,
        }
    }

    /// Clamp a parameter vector into the candidate sub-domains.
    pub fn constrain(&self, param: &Vector3<T>) -> Vector3<T> {
        Vector3::new(
            param.x.clamp(self.curve_domain.0, self.curve_domain.1),
            param.y.clamp(self.u_domain.0, self.u_domain.1),
            param.z.clamp(self.v_domain.0, self.v_domain.1),
        )
    }
}

impl<T, S, C> Gradient for SurfaceCurveIntersectionProblem<'_, T, S, C>
where
    T: FloatingPoint,
    S: ParametricSurface<T>,
    C: ParametricCurve<T>,
{
    type Param = Vector3<T>;
    type Gradient = Vector3<T>;

    fn gradient(&self, param: &Self::Param) -> Result<Self::Gradient, anyhow::Error> {
        let p = self.constrain(param);
        let dc = self.b.derivatives(p.x, 1);
        let ds = self.a.derivatives(p.y, p.z, 1);
        let r = ds[0][0] - dc[0];
        let drdu = &ds[1][0];
        let drdv = &ds[0][1];
        let drdt = -dc[1];
        Ok(Vector3::new(drdt.dot(&r), drdu.dot(&r), drdv.dot(&r)) * T::from_f64(2.).unwrap())
    }
}

impl<T, S, C> CostFunction for SurfaceCurveIntersectionProblem<'_, T, S, C>
where
    T: FloatingPoint,
    S: ParametricSurface<T>,
    C: ParametricCurve<T>,
{
    type Param = Vector3<T>;
    type Output = T;

    fn cost(&self, param: &Self::Param) -> Result<Self::Output, anyhow::Error> {
        let p = self.constrain(param);
        let d = self.a.point_at(p.y, p.z) - self.b.point_at(p.x);
        Ok(d.norm_squared())
    }
}
