use argmin::core::{CostFunction, Gradient};
use nalgebra::Vector2;

use crate::geometry::ParametricCurve;
use crate::misc::FloatingPoint;

/// Gradient & CostFunction provider for finding the intersection between two
/// curves: the squared distance between the two evaluations.
pub struct CurveCurveIntersectionProblem<'a, T: FloatingPoint, C0, C1> {
    a: &'a C0,
    b: &'a C1,
    a_domain: (T, T),
    b_domain: (T, T),
}

impl<'a, T: FloatingPoint, C0, C1> CurveCurveIntersectionProblem<'a, T, C0, C1> {
    pub fn new(a: &'a C0, b: &'a C1, a_domain: (T, T), b_domain: (T, T)) -> Self {
        Self {
            a,
            b,
            a_domain,
            b_domain,
        }
    }

    /// Clamp a parameter vector into the candidate sub-domains.
    pub fn constrain(&self, param: &Vector2<T>) -> Vector2<T> {
        Vector2::new(
            param.x.clamp(self.a_domain.0, self.a_domain.1),
            param.y.clamp(self.b_domain.0, self.b_domain.1),
        )
    }
}

impl<T, C0, C1> Gradient for CurveCurveIntersectionProblem<'_, T, C0, C1>
where
    T: FloatingPoint,
    C0: ParametricCurve<T>,
    C1: ParametricCurve<T>,
{
    type Param = Vector2<T>;
    type Gradient = Vector2<T>;

    fn gradient(&self, param: &Self::Param) -> Result<Self::Gradient, anyhow::Error> {
        let p = self.constrain(param);
        let du = self.a.derivatives(p.x, 1);
        let dv = self.b.derivatives(p.y, 1);
        let r = du[0] - dv[0];
        Ok(Vector2::new(r.dot(&du[1]), -r.dot(&dv[1])) * T::from_f64(2.).unwrap())
    }
}

impl<T, C0, C1> CostFunction for CurveCurveIntersectionProblem<'_, T, C0, C1>
where
    T: FloatingPoint,
    C0: ParametricCurve<T>,
    C1: ParametricCurve<T>,
{
    type Param = Vector2<T>;
    type Output = T;

    fn cost(&self, param: &Self::Param) -> Result<Self::Output, anyhow::Error> {
        let p = self.constrain(param);
        let d = self.a.point_at(p.x) - self.b.point_at(p.y);
        Ok(d.norm_squared())
    }
}
