use crate::bounding_box::{BoundingBox, BoundingBoxTree};
use crate::geometry::ParametricCurve;
use crate::misc::FloatingPoint;

/// A lazy bounding box tree over a parametric curve, subdividing the
/// parameter domain.
pub struct CurveBoundingBoxTree<'a, T: FloatingPoint, C> {
    curve: &'a C,
    interval: (T, T),
    tolerance: T,
}

impl<'a, T: FloatingPoint, C: ParametricCurve<T>> CurveBoundingBoxTree<'a, T, C> {
    /// Create a new tree over the whole curve. `tolerance` is the parameter
    /// interval below which a node stops dividing; it defaults to 1/64 of
    /// the domain.
    pub fn new(curve: &'a C, tolerance: Option<T>) -> Self {
        let tolerance =
            tolerance.unwrap_or_else(|| curve.domain_interval() / T::from_usize(64).unwrap());
        Self {
            curve,
            interval: curve.domain(),
            tolerance,
        }
    }

    pub fn curve(&self) -> &'a C {
        self.curve
    }

    pub fn interval(&self) -> (T, T) {
        self.interval
    }
}

impl<T: FloatingPoint, C> Clone for CurveBoundingBoxTree<'_, T, C> {
    fn clone(&self) -> Self {
        Self {
            curve: self.curve,
            interval: self.interval,
            tolerance: self.tolerance,
        }
    }
}

impl<T: FloatingPoint, C: ParametricCurve<T>> BoundingBoxTree<T>
    for CurveBoundingBoxTree<'_, T, C>
{
    type Item = (T, T);

    fn is_dividable(&self) -> bool {
        self.interval.1 - self.interval.0 > self.tolerance
    }

    fn try_divide(&self) -> anyhow::Result<(Self, Self)> {
        let (start, end) = self.interval;
        let mid = (start + end) * T::from_f64(0.5).unwrap();
        Ok((
            Self {
                curve: self.curve,
                interval: (start, mid),
                tolerance: self.tolerance,
            },
            Self {
                curve: self.curve,
                interval: (mid, end),
                tolerance: self.tolerance,
            },
        ))
    }

    fn bounding_box(&self) -> BoundingBox<T> {
        self.curve.interval_bounds(self.interval)
    }

    fn into_item(self) -> Self::Item {
        self.interval
    }
}
