use nalgebra::{Point3, Vector3};

use crate::bounding_box::BoundingBox;
use crate::geometry::ParametricCurve;
use crate::misc::{FloatingPoint, Segment};

/// A polyline in 3D space with a non-decreasing global parameter per point.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Polyline<T: FloatingPoint> {
    points: Vec<Point3<T>>,
    parameters: Vec<T>,
}

impl<T: FloatingPoint> Polyline<T> {
    /// Create a polyline with chord length parameterization starting at 0.
    pub fn new(points: Vec<Point3<T>>) -> Self {
        let mut parameters = Vec::with_capacity(points.len());
        let mut acc = T::zero();
        for (i, point) in points.iter().enumerate() {
            if i > 0 {
                acc += (point - points[i - 1]).norm();
            }
            parameters.push(acc);
        }
        Self { points, parameters }
    }

    /// Create a polyline with explicit parameters.
    pub fn try_new_with_parameters(
        points: Vec<Point3<T>>,
        parameters: Vec<T>,
    ) -> anyhow::Result<Self> {
        anyhow::ensure!(
            points.len() == parameters.len(),
            "points and parameters must have the same length"
        );
        anyhow::ensure!(
            parameters.windows(2).all(|w| w[0] <= w[1]),
            "parameters must be non-decreasing"
        );
        Ok(Self { points, parameters })
    }

    pub fn points(&self) -> &[Point3<T>] {
        &self.points
    }

    pub fn parameters(&self) -> &[T] {
        &self.parameters
    }

    pub fn segment_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    pub fn segment_at(&self, index: usize) -> Segment<T> {
        Segment::new(self.points[index], self.points[index + 1])
    }

    /// The global parameter interval covered by a segment.
    pub fn segment_parameters(&self, index: usize) -> (T, T) {
        (self.parameters[index], self.parameters[index + 1])
    }

    /// The segment containing the given global parameter.
    fn segment_index_at(&self, t: T) -> usize {
        let n = self.segment_count();
        self.parameters
            .partition_point(|&p| p <= t)
            .saturating_sub(1)
            .min(n.saturating_sub(1))
    }
}

impl<T: FloatingPoint> ParametricCurve<T> for Polyline<T> {
    fn domain(&self) -> (T, T) {
        (
            self.parameters[0],
            self.parameters[self.parameters.len() - 1],
        )
    }

    fn point_at(&self, t: T) -> Point3<T> {
        let i = self.segment_index_at(t);
        let (t0, t1) = self.segment_parameters(i);
        let span = t1 - t0;
        if span <= T::zero() {
            return self.points[i];
        }
        let local = ((t - t0) / span).clamp(T::zero(), T::one());
        self.points[i] + (self.points[i + 1] - self.points[i]) * local
    }

    fn derivatives(&self, t: T, order: usize) -> Vec<Vector3<T>> {
        let i = self.segment_index_at(t);
        let (t0, t1) = self.segment_parameters(i);
        let span = t1 - t0;
        let mut ders = vec![self.point_at(t).coords];
        if order >= 1 {
            let tangent = if span > T::zero() {
                (self.points[i + 1] - self.points[i]) / span
            } else {
                Vector3::zeros()
            };
            ders.push(tangent);
            // Higher derivatives of a piecewise linear curve vanish.
            for _ in 1..order {
                ders.push(Vector3::zeros());
            }
        }
        ders
    }

    fn interval_bounds(&self, interval: (T, T)) -> BoundingBox<T> {
        let (start, end) = interval;
        let first = self.segment_index_at(start);
        let last = self.segment_index_at(end);
        let inner = self.points[first + 1..=last].iter().copied();
        BoundingBox::new_with_points(
            [self.point_at(start), self.point_at(end)]
                .into_iter()
                .chain(inner),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zigzag() -> Polyline<f64> {
        Polyline::new(vec![
            Point3::new(0., 0., 0.),
            Point3::new(1., 0., 0.),
            Point3::new(1., 1., 0.),
        ])
    }

    #[test]
    fn chord_length_parameters() {
        let p = zigzag();
        assert_eq!(p.parameters(), &[0., 1., 2.]);
        assert_eq!(p.domain(), (0., 2.));
    }

    #[test]
    fn evaluates_inside_segments() {
        let p = zigzag();
        assert_eq!(p.point_at(0.5), Point3::new(0.5, 0., 0.));
        assert_eq!(p.point_at(1.5), Point3::new(1., 0.5, 0.));
        assert_eq!(p.point_at(2.), Point3::new(1., 1., 0.));
    }

    #[test]
    fn tangent_follows_the_active_segment() {
        let p = zigzag();
        let ders = p.derivatives(0.25, 1);
        assert_eq!(ders[1], Vector3::new(1., 0., 0.));
        let ders = p.derivatives(1.75, 2);
        assert_eq!(ders[1], Vector3::new(0., 1., 0.));
        assert_eq!(ders[2], Vector3::zeros());
    }

    #[test]
    fn explicit_parameters_are_validated() {
        assert!(Polyline::try_new_with_parameters(
            vec![Point3::origin(), Point3::new(1., 0., 0.)],
            vec![0., 1., 2.],
        )
        .is_err());
        assert!(Polyline::try_new_with_parameters(
            vec![Point3::origin(), Point3::new(1., 0., 0.)],
            vec![1., 0.],
        )
        .is_err());

        let p = Polyline::try_new_with_parameters(
            vec![Point3::origin(), Point3::new(1., 0., 0.)],
            vec![2., 4.],
        )
        .unwrap();
        assert_eq!(p.domain(), (2., 4.));
        assert_eq!(p.point_at(3.), Point3::new(0.5, 0., 0.));
    }

    #[test]
    fn interval_bounds_cover_the_clipped_portion() {
        let p = zigzag();
        let bb = p.interval_bounds((0.5, 1.5));
        assert_eq!(bb.min(), &Vector3::new(0.5, 0., 0.));
        assert_eq!(bb.max(), &Vector3::new(1., 0.5, 0.));
    }
}
