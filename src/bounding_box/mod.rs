pub mod bounding_box_traversal;
pub mod bounding_box_tree;
pub mod curve_bounding_box_tree;
pub mod mesh_bounding_box_tree;
pub mod polyline_bounding_box_tree;
pub mod surface_bounding_box_tree;

pub use bounding_box_traversal::*;
pub use bounding_box_tree::*;
pub use curve_bounding_box_tree::*;
pub use mesh_bounding_box_tree::*;
pub use polyline_bounding_box_tree::*;
pub use surface_bounding_box_tree::*;

use nalgebra::{Point3, Vector3};

use crate::misc::FloatingPoint;

/// An axis-aligned bounding box in 3D space.
#[derive(Clone, Debug)]
pub struct BoundingBox<T: FloatingPoint> {
    min: Vector3<T>,
    max: Vector3<T>,
}

impl<T: FloatingPoint> BoundingBox<T> {
    /// Create a new bounding box from a minimum and maximum corner.
    pub fn new(min: Vector3<T>, max: Vector3<T>) -> Self {
        Self { min, max }
    }

    /// Create a new bounding box covering a point iterator.
    pub fn new_with_points<I: IntoIterator<Item = Point3<T>>>(iter: I) -> Self {
        let mut min = Vector3::from_element(T::max_value().unwrap());
        let mut max = Vector3::from_element(T::min_value().unwrap());

        for point in iter {
            for i in 0..3 {
                min[i] = min[i].min(point[i]);
                max[i] = max[i].max(point[i]);
            }
        }

        Self { min, max }
    }

    pub fn min(&self) -> &Vector3<T> {
        &self.min
    }

    pub fn max(&self) -> &Vector3<T> {
        &self.max
    }

    /// The index of the axis with the largest extent.
    pub fn longest_axis(&self) -> usize {
        let extent = self.max - self.min;
        let mut axis = 0;
        for i in 1..3 {
            if extent[i] > extent[axis] {
                axis = i;
            }
        }
        axis
    }

    /// Check if the bounding box intersects with another bounding box,
    /// expanding both by `tolerance` first.
    ///
    /// # Examples
    /// ```
    /// use nalgebra::Vector3;
    /// use xsect::prelude::BoundingBox;
    ///
    /// let b0 = BoundingBox::new(Vector3::from_element(0.), Vector3::from_element(1.));
    /// assert!(b0.intersects(&b0, None));
    ///
    /// let b1 = BoundingBox::new(Vector3::from_element(0.5), Vector3::from_element(1.5));
    /// assert!(b0.intersects(&b1, None));
    ///
    /// let b2 = BoundingBox::new(Vector3::from_element(1.1), Vector3::from_element(2.));
    /// assert!(!b0.intersects(&b2, None));
    /// assert!(b0.intersects(&b2, Some(0.2)));
    /// ```
    pub fn intersects(&self, other: &Self, tolerance: Option<T>) -> bool {
        let tolerance = tolerance.unwrap_or(T::default_epsilon());
        for i in 0..3 {
            let a0 = self.min[i] - tolerance;
            let a1 = self.max[i] + tolerance;
            let b0 = other.min[i] - tolerance;
            let b1 = other.max[i] + tolerance;

            let d0 = b0 - a1;
            let d1 = b1 - a0;

            // The intervals are disjoint along this axis.
            if d0 * d1 > T::zero() {
                return false;
            }
        }

        true
    }
}

impl<T: FloatingPoint> FromIterator<Point3<T>> for BoundingBox<T> {
    fn from_iter<I: IntoIterator<Item = Point3<T>>>(iter: I) -> Self {
        Self::new_with_points(iter)
    }
}
