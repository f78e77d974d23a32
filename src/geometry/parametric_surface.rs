use nalgebra::{Point3, Vector3};

use crate::bounding_box::BoundingBox;
use crate::misc::FloatingPoint;
use crate::polygon_mesh::PolygonMesh;

/// Evaluator contract for a parametric surface in 3D space.
pub trait ParametricSurface<T: FloatingPoint> {
    /// The parameter domains `((u_start, u_end), (v_start, v_end))`.
    fn domain(&self) -> ((T, T), (T, T));

    /// Evaluate the surface at a parameter pair inside the domain.
    fn point_at(&self, u: T, v: T) -> Point3<T>;

    /// Evaluate partial derivatives up to `order` at `(u, v)`.
    /// `derivatives[i][j]` is the mixed partial of order `i` in `u` and `j`
    /// in `v`; `derivatives[0][0]` is the position.
    fn derivatives(&self, u: T, v: T, order: usize) -> Vec<Vec<Vector3<T>>>;

    /// Axis-aligned bounds of the surface restricted to the given parameter
    /// rectangle. The returned box must fully contain that portion of the
    /// surface; bounding box pruning is conservative only if this holds.
    fn interval_bounds(&self, u: (T, T), v: (T, T)) -> BoundingBox<T>;

    /// The lengths of the two parameter domains.
    fn domain_interval(&self) -> (T, T) {
        let (u, v) = self.domain();
        (u.1 - u.0, v.1 - v.0)
    }
}

/// Adaptive tessellation contract consumed by the surface/surface driver.
///
/// The produced mesh carries one surface parameter pair per vertex so mesh
/// intersection points can be lifted back onto the surface.
pub trait TessellateAdaptive<T: FloatingPoint> {
    fn tessellate_adaptive(&self, tolerance: Option<T>) -> PolygonMesh<T>;
}
