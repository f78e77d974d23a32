use nalgebra::{Point3, Vector3};

use crate::misc::{geometric_epsilon, FloatingPoint};

/// A ray in 3D space: an origin with a preferred unit direction.
#[derive(Clone, Debug)]
pub struct Ray<T: FloatingPoint> {
    origin: Point3<T>,
    direction: Vector3<T>,
}

/// Closest-approach of two rays: a point & parameter on each ray.
#[derive(Clone, Debug)]
pub struct RayIntersection<T: FloatingPoint> {
    intersection0: (Point3<T>, T),
    intersection1: (Point3<T>, T),
}

impl<T: FloatingPoint> RayIntersection<T> {
    /// The closest point & parameter on the first ray.
    pub fn a(&self) -> &(Point3<T>, T) {
        &self.intersection0
    }

    /// The closest point & parameter on the second ray.
    pub fn b(&self) -> &(Point3<T>, T) {
        &self.intersection1
    }
}

impl<T: FloatingPoint> Ray<T> {
    pub fn new(origin: Point3<T>, direction: Vector3<T>) -> Self {
        Self { origin, direction }
    }

    pub fn origin(&self) -> &Point3<T> {
        &self.origin
    }

    pub fn direction(&self) -> &Vector3<T> {
        &self.direction
    }

    pub fn point_at(&self, t: T) -> Point3<T> {
        self.origin + self.direction * t
    }

    /// Finds the closest pair of points between two rays.
    /// Returns `None` when the rays are parallel.
    ///
    /// # Examples
    /// ```
    /// use nalgebra::{Point3, Vector3};
    /// use xsect::prelude::Ray;
    ///
    /// let a = Ray::new(Point3::origin(), Vector3::x());
    /// let b = Ray::new(Point3::new(0., 1., 0.), -Vector3::y());
    /// let it = a.find_intersection(&b).unwrap();
    /// assert_eq!(it.a().1, 0.);
    /// assert_eq!(it.b().1, 1.);
    /// assert_eq!(it.a().0, it.b().0);
    /// ```
    pub fn find_intersection(&self, other: &Self) -> Option<RayIntersection<T>> {
        let dab = self.direction.dot(other.direction());
        let daa = self.direction.dot(&self.direction);
        let dbb = other.direction().dot(other.direction());
        let div = daa * dbb - dab * dab;

        // The rays are parallel.
        if div.abs() < geometric_epsilon() {
            return None;
        }

        let dab0 = self.direction.dot(&other.origin().coords);
        let daa0 = self.direction.dot(&self.origin.coords);
        let dbb0 = other.direction().dot(&other.origin().coords);
        let dba0 = other.direction().dot(&self.origin.coords);

        let num = dab * (dab0 - daa0) - daa * (dbb0 - dba0);
        let w = num / div;
        let t = (dab0 - daa0 + w * dab) / daa;

        Some(RayIntersection {
            intersection0: (self.point_at(t), t),
            intersection1: (other.point_at(w), w),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closest_pair_is_symmetric() {
        let a = Ray::new(Point3::new(1., 0., 2.), Vector3::x());
        let b = Ray::new(Point3::new(0., 1., 0.), Vector3::new(0., -1., 1.).normalize());
        let ab = a.find_intersection(&b).unwrap();
        let ba = b.find_intersection(&a).unwrap();
        assert_eq!(ab.a().1, ba.b().1);
        assert_eq!(ab.b().1, ba.a().1);
        assert_eq!(ab.a().0, ba.b().0);
        assert_eq!(ab.b().0, ba.a().0);
    }

    #[test]
    fn parallel_rays_have_no_intersection() {
        let a = Ray::new(Point3::origin(), Vector3::x());
        let b = Ray::new(Point3::new(0., 1., 0.), Vector3::x());
        assert!(a.find_intersection(&b).is_none());
    }
}
