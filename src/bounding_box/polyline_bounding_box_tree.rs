use crate::bounding_box::{BoundingBox, BoundingBoxTree};
use crate::misc::FloatingPoint;
use crate::polyline::Polyline;

/// A lazy bounding box tree over the segments of a polyline.
///
/// Nodes hold a contiguous segment range `[start, end)` which is halved on
/// division.
pub struct PolylineBoundingBoxTree<'a, T: FloatingPoint> {
    polyline: &'a Polyline<T>,
    start: usize,
    end: usize,
}

impl<'a, T: FloatingPoint> PolylineBoundingBoxTree<'a, T> {
    /// Create a new tree over all segments of the polyline.
    pub fn new(polyline: &'a Polyline<T>) -> Self {
        Self {
            polyline,
            start: 0,
            end: polyline.segment_count(),
        }
    }

    pub fn polyline(&self) -> &'a Polyline<T> {
        self.polyline
    }

    pub fn segment_range(&self) -> (usize, usize) {
        (self.start, self.end)
    }
}

impl<T: FloatingPoint> Clone for PolylineBoundingBoxTree<'_, T> {
    fn clone(&self) -> Self {
        Self {
            polyline: self.polyline,
            start: self.start,
            end: self.end,
        }
    }
}

impl<T: FloatingPoint> BoundingBoxTree<T> for PolylineBoundingBoxTree<'_, T> {
    /// A leaf yields its segment index.
    type Item = usize;

    fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    fn is_dividable(&self) -> bool {
        self.end - self.start > 1
    }

    fn try_divide(&self) -> anyhow::Result<(Self, Self)> {
        anyhow::ensure!(
            self.end - self.start > 1,
            "a single segment is not dividable"
        );
        let mid = self.start + (self.end - self.start) / 2;
        Ok((
            Self {
                polyline: self.polyline,
                start: self.start,
                end: mid,
            },
            Self {
                polyline: self.polyline,
                start: mid,
                end: self.end,
            },
        ))
    }

    fn bounding_box(&self) -> BoundingBox<T> {
        BoundingBox::new_with_points(
            self.polyline.points()[self.start..=self.end]
                .iter()
                .copied(),
        )
    }

    fn into_item(self) -> Self::Item {
        self.start
    }
}
