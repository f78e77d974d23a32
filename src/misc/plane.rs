use nalgebra::{Point3, Vector3};

use crate::misc::{geometric_epsilon, FloatingPoint, Ray};

/// A plane in 3D space, stored as `normal . x + constant = 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane<T: FloatingPoint> {
    normal: Vector3<T>,
    constant: T,
}

impl<T: FloatingPoint> Plane<T> {
    pub fn new(normal: Vector3<T>, constant: T) -> Self {
        Self { normal, constant }
    }

    /// Create the plane through `point` with the given normal.
    pub fn from_point_normal(point: &Point3<T>, normal: Vector3<T>) -> Self {
        Self {
            normal,
            constant: -normal.dot(&point.coords),
        }
    }

    pub fn normal(&self) -> Vector3<T> {
        self.normal
    }

    pub fn constant(&self) -> T {
        self.constant
    }

    /// The offset `d` of the plane equation `normal . x = d`.
    pub fn offset(&self) -> T {
        -self.constant
    }

    /// Calculate the signed distance from a point to the plane.
    pub fn signed_distance(&self, point: &Point3<T>) -> T {
        self.normal.dot(&point.coords) + self.constant
    }

    /// Finds the line shared by two planes, or `None` when the normals are
    /// parallel.
    ///
    /// The direction is `normalize(n0 x n1)`. A point on the line is found by
    /// dropping the coordinate axis with the largest direction component and
    /// solving the remaining 2x2 system with that coordinate pinned to zero.
    ///
    /// # Examples
    /// ```
    /// use nalgebra::{Point3, Vector3};
    /// use xsect::prelude::Plane;
    ///
    /// let xy = Plane::from_point_normal(&Point3::origin(), Vector3::z());
    /// let xz = Plane::from_point_normal(&Point3::origin(), Vector3::y());
    /// let ray = xy.find_intersection(&xz).unwrap();
    /// assert!(ray.direction().x.abs() == 1.);
    /// assert_eq!(ray.origin(), &Point3::origin());
    /// ```
    pub fn find_intersection(&self, other: &Self) -> Option<Ray<T>> {
        let direction = self.normal.cross(&other.normal);
        if direction.norm() < geometric_epsilon() {
            return None;
        }

        let abs = direction.map(|v| v.abs());
        let i = if abs.x >= abs.y && abs.x >= abs.z {
            0
        } else if abs.y >= abs.z {
            1
        } else {
            2
        };
        let j = (i + 1) % 3;
        let k = (i + 2) % 3;

        // The 2x2 determinant over the remaining axes equals the dropped
        // cross product component, which is the largest one.
        let det = self.normal[j] * other.normal[k] - self.normal[k] * other.normal[j];
        let d0 = self.offset();
        let d1 = other.offset();

        let mut origin = Point3::origin();
        origin[j] = (d0 * other.normal[k] - d1 * self.normal[k]) / det;
        origin[k] = (self.normal[j] * d1 - other.normal[j] * d0) / det;

        Some(Ray::new(origin, direction.normalize()))
    }

    /// Finds the single point shared by three planes, or `None` when the
    /// configuration is degenerate (`|n0 . (n1 x n2)| < epsilon`).
    ///
    /// # Examples
    /// ```
    /// use nalgebra::{Point3, Vector3};
    /// use xsect::prelude::Plane;
    ///
    /// let p = Plane::find_point_intersection(
    ///     &Plane::new(Vector3::x(), -1.),
    ///     &Plane::new(Vector3::y(), -2.),
    ///     &Plane::new(Vector3::z(), -3.),
    /// ).unwrap();
    /// assert_eq!(p, Point3::new(1., 2., 3.));
    /// ```
    pub fn find_point_intersection(p0: &Self, p1: &Self, p2: &Self) -> Option<Point3<T>> {
        let (n0, d0) = (p0.normal, p0.offset());
        let (n1, d1) = (p1.normal, p1.offset());
        let (n2, d2) = (p2.normal, p2.offset());

        let u = n1.cross(&n2);
        let den = n0.dot(&u);
        if den.abs() < geometric_epsilon() {
            return None;
        }

        let num = u * d0 + n0.cross(&(n1 * d2 - n2 * d1));
        Some(Point3::from(num / den))
    }
}
