use nalgebra::{Point3, Vector3};

use crate::misc::{geometric_epsilon, FloatingPoint, Plane, Segment};

/// A triangle in 3D space.
#[derive(Clone, Debug)]
pub struct Triangle<T: FloatingPoint> {
    a: Point3<T>,
    b: Point3<T>,
    c: Point3<T>,
}

/// A segment piercing a triangle: the world point, the segment parameter and
/// the barycentric coordinates along the triangle's edge frame.
#[derive(Clone, Debug)]
pub struct TriSegmentIntersection<T: FloatingPoint> {
    point: Point3<T>,
    parameter: T,
    s: T,
    t: T,
}

impl<T: FloatingPoint> TriSegmentIntersection<T> {
    pub fn point(&self) -> &Point3<T> {
        &self.point
    }

    /// The parameter along the segment, in `[0, 1]`.
    pub fn parameter(&self) -> T {
        self.parameter
    }

    /// The barycentric coordinate along the first edge.
    pub fn s(&self) -> T {
        self.s
    }

    /// The barycentric coordinate along the second edge.
    pub fn t(&self) -> T {
        self.t
    }
}

impl<T: FloatingPoint> Triangle<T> {
    pub fn new(a: Point3<T>, b: Point3<T>, c: Point3<T>) -> Self {
        Self { a, b, c }
    }

    pub fn points(&self) -> [&Point3<T>; 3] {
        [&self.a, &self.b, &self.c]
    }

    /// The unit normal following the right-hand rule over the vertex ring.
    /// Returns `None` for a degenerate triangle.
    pub fn normal(&self) -> Option<Vector3<T>> {
        let n = (self.b - self.a).cross(&(self.c - self.a));
        let norm = n.norm();
        if norm < geometric_epsilon() {
            None
        } else {
            Some(n / norm)
        }
    }

    /// The supporting plane of the triangle.
    pub fn plane(&self) -> Option<Plane<T>> {
        self.normal().map(|n| Plane::from_point_normal(&self.a, n))
    }

    /// Express a point lying in the triangle's plane in the `(b - a, c - a)`
    /// edge frame. Returns `None` for a degenerate triangle.
    pub fn barycentric(&self, point: &Point3<T>) -> Option<(T, T)> {
        let u = self.b - self.a;
        let v = self.c - self.a;
        let uu = u.dot(&u);
        let uv = u.dot(&v);
        let vv = v.dot(&v);
        let den = uv * uv - uu * vv;
        if den.abs() < geometric_epsilon() {
            return None;
        }

        let w = point - self.a;
        let wu = w.dot(&u);
        let wv = w.dot(&v);
        let s = (uv * wv - vv * wu) / den;
        let t = (uv * wu - uu * wv) / den;
        Some((s, t))
    }

    /// Finds the point where a segment pierces the triangle.
    ///
    /// The segment is intersected with the supporting plane, then the hit is
    /// accepted iff the segment parameter lies in `[0, 1]` and the
    /// barycentric coordinates lie inside the triangle within the shared
    /// epsilon.
    ///
    /// # Examples
    /// ```
    /// use nalgebra::Point3;
    /// use xsect::prelude::{Segment, Triangle};
    ///
    /// let tri = Triangle::new(
    ///     Point3::new(0., 0., 0.),
    ///     Point3::new(1., 0., 0.),
    ///     Point3::new(0., 1., 0.),
    /// );
    /// let seg = Segment::new(Point3::new(0.25, 0.25, -1.), Point3::new(0.25, 0.25, 1.));
    /// let it = tri.find_segment_intersection(&seg).unwrap();
    /// assert_eq!(it.parameter(), 0.5);
    /// assert_eq!(it.s(), 0.25);
    /// assert_eq!(it.t(), 0.25);
    /// assert_eq!(it.point(), &Point3::new(0.25, 0.25, 0.));
    /// ```
    pub fn find_segment_intersection(
        &self,
        segment: &Segment<T>,
    ) -> Option<TriSegmentIntersection<T>> {
        let eps = geometric_epsilon();
        let n = self.normal()?;
        let dir = segment.tangent();

        let den = n.dot(&dir);
        if den.abs() < eps {
            return None;
        }

        let r = n.dot(&(self.a - segment.a())) / den;
        if r < T::zero() || r > T::one() {
            return None;
        }

        let point = segment.a() + dir * r;
        let (s, t) = self.barycentric(&point)?;
        let one = T::one();
        if s < -eps || s > one + eps {
            return None;
        }
        if t < -eps || t > one + eps || s + t > one + eps {
            return None;
        }

        Some(TriSegmentIntersection {
            point,
            parameter: r,
            s,
            t,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_triangle() -> Triangle<f64> {
        Triangle::new(
            Point3::new(0., 0., 0.),
            Point3::new(1., 0., 0.),
            Point3::new(0., 1., 0.),
        )
    }

    #[test]
    fn interior_hit_reconstructs_point_from_barycentrics() {
        let tri = unit_triangle();
        let seg = Segment::new(Point3::new(0.3, 0.2, -2.), Point3::new(0.3, 0.2, 2.));
        let it = tri.find_segment_intersection(&seg).unwrap();
        assert!(it.s() >= 0. && it.t() >= 0. && it.s() + it.t() <= 1.);
        let [a, b, c] = tri.points();
        let rebuilt = a + (b - a) * it.s() + (c - a) * it.t();
        assert!((rebuilt - it.point()).norm() < 1e-10);
    }

    #[test]
    fn hit_outside_triangle_is_rejected() {
        let tri = unit_triangle();
        let seg = Segment::new(Point3::new(0.9, 0.9, -1.), Point3::new(0.9, 0.9, 1.));
        assert!(tri.find_segment_intersection(&seg).is_none());
    }

    #[test]
    fn segment_in_plane_is_parallel() {
        let tri = unit_triangle();
        let seg = Segment::new(Point3::new(-1., 0.2, 0.), Point3::new(2., 0.2, 0.));
        assert!(tri.find_segment_intersection(&seg).is_none());
    }

    #[test]
    fn segment_too_short_to_reach_plane() {
        let tri = unit_triangle();
        let seg = Segment::new(Point3::new(0.25, 0.25, -3.), Point3::new(0.25, 0.25, -1.));
        assert!(tri.find_segment_intersection(&seg).is_none());
    }
}
