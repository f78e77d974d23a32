use nalgebra::{Point3, Vector3};

use crate::bounding_box::BoundingBox;
use crate::misc::FloatingPoint;

/// Evaluator contract for a parametric curve in 3D space.
///
/// The engine never inspects the curve representation: rational curves,
/// polylines and analytic curves all enter through this trait.
pub trait ParametricCurve<T: FloatingPoint> {
    /// The parameter domain `(start, end)`.
    fn domain(&self) -> (T, T);

    /// Evaluate the curve at a parameter inside the domain.
    fn point_at(&self, t: T) -> Point3<T>;

    /// Evaluate derivatives up to `order` at `t`.
    /// `derivatives[0]` is the position, `derivatives[i]` the i-th
    /// derivative with respect to `t`.
    fn derivatives(&self, t: T, order: usize) -> Vec<Vector3<T>>;

    /// Axis-aligned bounds of the curve restricted to `interval`.
    /// The returned box must fully contain that portion of the curve;
    /// bounding box pruning is conservative only if this holds.
    fn interval_bounds(&self, interval: (T, T)) -> BoundingBox<T>;

    /// The length of the parameter domain.
    fn domain_interval(&self) -> T {
        let (start, end) = self.domain();
        end - start
    }
}
