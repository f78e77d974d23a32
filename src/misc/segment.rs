use nalgebra::{Point3, Vector3};

use crate::intersects::{CurveCurveIntersection, Intersection};
use crate::misc::{geometric_epsilon, FloatingPoint, Plane, Ray};

/// A segment in 3D space.
#[derive(Clone, Debug)]
pub struct Segment<T: FloatingPoint> {
    a: Point3<T>,
    b: Point3<T>,
}

impl<T: FloatingPoint> Segment<T> {
    pub fn new(a: Point3<T>, b: Point3<T>) -> Self {
        Self { a, b }
    }

    pub fn a(&self) -> &Point3<T> {
        &self.a
    }

    pub fn b(&self) -> &Point3<T> {
        &self.b
    }

    pub fn tangent(&self) -> Vector3<T> {
        self.b - self.a
    }

    pub fn length(&self) -> T {
        self.tangent().norm()
    }

    /// Finds the intersection between two segments.
    ///
    /// The closest pair between the carrier lines is clamped into both
    /// segments and accepted iff the clamped points are closer than
    /// `tolerance`. Parameters in the result are normalized to `[0, 1]`.
    ///
    /// # Examples
    /// ```
    /// use nalgebra::Point3;
    /// use xsect::prelude::*;
    ///
    /// let a = Segment::new(Point3::new(0., 0., 0.), Point3::new(1., 0., 0.));
    /// let b = Segment::new(Point3::new(0.5, -1., 0.), Point3::new(0.5, 1., 0.));
    /// let it = a.find_intersection(&b, 1e-6).unwrap();
    /// assert_eq!(it.a().1, 0.5);
    /// assert_eq!(it.b().1, 0.5);
    /// assert_eq!(it.a().0, Point3::new(0.5, 0., 0.));
    /// ```
    pub fn find_intersection(
        &self,
        other: &Self,
        tolerance: T,
    ) -> Option<CurveCurveIntersection<Point3<T>, T>> {
        let la = self.length();
        let lb = other.length();
        let eps = geometric_epsilon();
        if la < eps || lb < eps {
            return None;
        }

        let ra = Ray::new(self.a, self.tangent() / la);
        let rb = Ray::new(other.a, other.tangent() / lb);
        let it = ra.find_intersection(&rb)?;

        let t = it.a().1.clamp(T::zero(), la);
        let w = it.b().1.clamp(T::zero(), lb);
        let p0 = ra.point_at(t);
        let p1 = rb.point_at(w);

        if (p0 - p1).norm_squared() < tolerance * tolerance {
            Some(Intersection::new((p0, t / la), (p1, w / lb)))
        } else {
            None
        }
    }

    /// Finds the parameter where the segment's carrier line crosses an
    /// oriented plane. The caller checks the `[0, 1]` range.
    /// Returns `None` when the segment is parallel to the plane.
    pub fn find_plane_intersection(&self, plane: &Plane<T>) -> Option<(Point3<T>, T)> {
        let dir = self.tangent();
        let den = plane.normal().dot(&dir);
        if den.abs() < geometric_epsilon() {
            return None;
        }
        let t = -plane.signed_distance(&self.a) / den;
        Some((self.a + dir * t, t))
    }
}
