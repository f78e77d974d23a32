use crate::bounding_box::BoundingBoxTree;
use crate::misc::FloatingPoint;

/// Pairwise traversal of two bounding box trees.
///
/// The traversal prunes conservatively: every emitted leaf pair has
/// overlapping boxes within the tolerance, and no pair whose geometries
/// truly overlap is dropped (provided the trees' boxes are conservative).
pub struct BoundingBoxTraversal<A, B> {
    pairs: Vec<(A, B)>,
}

impl<A, B> BoundingBoxTraversal<A, B> {
    /// Traverse two trees, collecting the leaf pairs whose boxes overlap.
    ///
    /// The tolerance is applied identically at every level. An explicit work
    /// stack replaces the four-way recursion, which can grow deep on
    /// adversarial inputs.
    pub fn try_traverse<T: FloatingPoint>(a: A, b: B, tolerance: Option<T>) -> anyhow::Result<Self>
    where
        A: BoundingBoxTree<T>,
        B: BoundingBoxTree<T>,
    {
        let mut pairs = vec![];
        if a.is_empty() || b.is_empty() {
            return Ok(Self { pairs });
        }

        let mut trees = vec![(a, b)];

        while let Some((a, b)) = trees.pop() {
            if !a.bounding_box().intersects(&b.bounding_box(), tolerance) {
                continue;
            }

            let ai = a.is_dividable();
            let bi = b.is_dividable();
            match (ai, bi) {
                (false, false) => {
                    pairs.push((a, b));
                }
                (true, false) => {
                    let (a0, a1) = a.try_divide()?;
                    trees.push((a0, b.clone()));
                    trees.push((a1, b));
                }
                (false, true) => {
                    let (b0, b1) = b.try_divide()?;
                    trees.push((a.clone(), b0));
                    trees.push((a, b1));
                }
                (true, true) => {
                    let (a0, a1) = a.try_divide()?;
                    let (b0, b1) = b.try_divide()?;
                    trees.push((a0.clone(), b0.clone()));
                    trees.push((a1.clone(), b0));
                    trees.push((a0, b1.clone()));
                    trees.push((a1, b1));
                }
            };
        }

        Ok(Self { pairs })
    }

    pub fn pairs(&self) -> &[(A, B)] {
        &self.pairs
    }

    pub fn pairs_iter(&self) -> impl Iterator<Item = &(A, B)> {
        self.pairs.iter()
    }

    pub fn into_pairs(self) -> Vec<(A, B)> {
        self.pairs
    }

    pub fn into_pairs_iter(self) -> impl Iterator<Item = (A, B)> {
        self.pairs.into_iter()
    }
}
