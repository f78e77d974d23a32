use crate::bounding_box::{BoundingBox, BoundingBoxTree};
use crate::geometry::ParametricSurface;
use crate::misc::FloatingPoint;

/// The parametric direction a surface tree node divides along next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UVDirection {
    U,
    V,
}

impl UVDirection {
    pub fn opposite(&self) -> Self {
        match self {
            UVDirection::U => UVDirection::V,
            UVDirection::V => UVDirection::U,
        }
    }
}

/// A lazy bounding box tree over a parametric surface, halving the UV
/// rectangle in alternating directions.
pub struct SurfaceBoundingBoxTree<'a, T: FloatingPoint, S> {
    surface: &'a S,
    u_interval: (T, T),
    v_interval: (T, T),
    tolerance: (T, T),
    direction: UVDirection,
}

impl<'a, T: FloatingPoint, S: ParametricSurface<T>> SurfaceBoundingBoxTree<'a, T, S> {
    /// Create a new tree over the whole surface. `tolerance` holds the
    /// parameter intervals below which a node stops dividing, defaulting to
    /// 1/64 of each domain.
    pub fn new(surface: &'a S, direction: UVDirection, tolerance: Option<(T, T)>) -> Self {
        let tolerance = tolerance.unwrap_or_else(|| {
            let (u, v) = surface.domain_interval();
            let div = T::from_usize(64).unwrap();
            (u / div, v / div)
        });
        let (u_interval, v_interval) = surface.domain();
        Self {
            surface,
            u_interval,
            v_interval,
            tolerance,
            direction,
        }
    }

    pub fn surface(&self) -> &'a S {
        self.surface
    }

    pub fn uv_intervals(&self) -> ((T, T), (T, T)) {
        (self.u_interval, self.v_interval)
    }
}

impl<T: FloatingPoint, S> Clone for SurfaceBoundingBoxTree<'_, T, S> {
    fn clone(&self) -> Self {
        Self {
            surface: self.surface,
            u_interval: self.u_interval,
            v_interval: self.v_interval,
            tolerance: self.tolerance,
            direction: self.direction,
        }
    }
}

impl<T: FloatingPoint, S: ParametricSurface<T>> BoundingBoxTree<T>
    for SurfaceBoundingBoxTree<'_, T, S>
{
    type Item = ((T, T), (T, T));

    fn is_dividable(&self) -> bool {
        self.u_interval.1 - self.u_interval.0 > self.tolerance.0
            || self.v_interval.1 - self.v_interval.0 > self.tolerance.1
    }

    fn try_divide(&self) -> anyhow::Result<(Self, Self)> {
        let half = T::from_f64(0.5).unwrap();
        // Divide along the requested direction unless that side has already
        // converged.
        let direction = match self.direction {
            UVDirection::U if self.u_interval.1 - self.u_interval.0 <= self.tolerance.0 => {
                UVDirection::V
            }
            UVDirection::V if self.v_interval.1 - self.v_interval.0 <= self.tolerance.1 => {
                UVDirection::U
            }
            d => d,
        };
        let next = direction.opposite();

        let mut left = self.clone();
        let mut right = self.clone();
        left.direction = next;
        right.direction = next;
        match direction {
            UVDirection::U => {
                let (start, end) = self.u_interval;
                let mid = (start + end) * half;
                left.u_interval = (start, mid);
                right.u_interval = (mid, end);
            }
            UVDirection::V => {
                let (start, end) = self.v_interval;
                let mid = (start + end) * half;
                left.v_interval = (start, mid);
                right.v_interval = (mid, end);
            }
        }
        Ok((left, right))
    }

    fn bounding_box(&self) -> BoundingBox<T> {
        self.surface.interval_bounds(self.u_interval, self.v_interval)
    }

    fn into_item(self) -> Self::Item {
        (self.u_interval, self.v_interval)
    }
}
