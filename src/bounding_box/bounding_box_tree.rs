use crate::bounding_box::BoundingBox;
use crate::misc::FloatingPoint;

/// A lazily subdivided bounding box tree over some geometry.
///
/// `try_divide` produces two independent subtrees covering the node;
/// divisions may be computed on demand. A node that is no longer dividable
/// is a leaf and yields its payload through `into_item`.
pub trait BoundingBoxTree<T: FloatingPoint>: Clone {
    /// The payload a leaf yields: a face index, a parameter interval, a
    /// parameter rectangle, a segment index.
    type Item;

    /// Whether the tree covers no geometry at all.
    fn is_empty(&self) -> bool {
        false
    }

    fn is_dividable(&self) -> bool;

    fn try_divide(&self) -> anyhow::Result<(Self, Self)>;

    fn bounding_box(&self) -> BoundingBox<T>;

    fn into_item(self) -> Self::Item;
}
