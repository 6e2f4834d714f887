//! Window and radius queries.

use geo_traits::{CoordTrait, RectTrait};
use tinyvec::TinyVec;

use crate::entry::PointEntry;
use crate::error::{KDIndexError, Result};
use crate::kdtree::node::NodeId;
use crate::kdtree::KDTree;
use crate::r#type::CoordNum;

/// A lazy iterator over the entries inside an axis-aligned box.
///
/// The iterator borrows the tree, so the tree cannot be modified while it is alive. It can be
/// restarted with a new box through [`QueryIterator::reset`].
#[derive(Debug, Clone)]
pub struct QueryIterator<'a, V, N: CoordNum = f64> {
    tree: &'a KDTree<V, N>,
    min: Vec<N>,
    max: Vec<N>,
    stack: TinyVec<[NodeId; 32]>,
}

impl<'a, V, N: CoordNum> QueryIterator<'a, V, N> {
    fn try_new(tree: &'a KDTree<V, N>, min: &[N], max: &[N]) -> Result<Self> {
        check_range(tree, min, max)?;
        let mut iter = Self {
            tree,
            min: min.to_vec(),
            max: max.to_vec(),
            stack: TinyVec::new(),
        };
        iter.stack.extend(tree.root);
        Ok(iter)
    }

    /// Restart this iterator with a new query box.
    ///
    /// On error the iterator is left unchanged.
    pub fn reset(&mut self, min: &[N], max: &[N]) -> Result<()> {
        check_range(self.tree, min, max)?;
        self.min.clear();
        self.min.extend_from_slice(min);
        self.max.clear();
        self.max.extend_from_slice(max);
        self.stack.clear();
        self.stack.extend(self.tree.root);
        Ok(())
    }
}

impl<'a, V, N: CoordNum> Iterator for QueryIterator<'a, V, N> {
    type Item = PointEntry<'a, N, V>;

    fn next(&mut self) -> Option<Self::Item> {
        let tree: &'a KDTree<V, N> = self.tree;
        let nodes = &tree.nodes;
        // Once removals may have promoted a coordinate, equal values can also sit on `lo`.
        let lo_inclusive = tree.invariant_broken;

        while let Some(id) = self.stack.pop() {
            let node = nodes.node(id);
            let node_x = nodes.coord(id, node.dim);

            // queue halves that intersect the query; `lo` is popped first
            if self.max[node.dim] >= node_x {
                self.stack.extend(node.hi);
            }
            let min_x = self.min[node.dim];
            if min_x < node_x || (lo_inclusive && min_x == node_x) {
                self.stack.extend(node.lo);
            }

            let key = nodes.key(id);
            if is_enclosed(key, &self.min, &self.max) {
                return Some(PointEntry::new(key, &node.value));
            }
        }
        None
    }
}

fn check_range<V, N: CoordNum>(tree: &KDTree<V, N>, min: &[N], max: &[N]) -> Result<()> {
    tree.check_dims(min)?;
    tree.check_dims(max)?;
    match min.iter().zip(max).position(|(lo, hi)| lo > hi) {
        Some(dim) => Err(KDIndexError::InvertedRange { dim }),
        None => Ok(()),
    }
}

#[inline]
pub(crate) fn is_enclosed<N: CoordNum>(point: &[N], min: &[N], max: &[N]) -> bool {
    point
        .iter()
        .zip(min.iter().zip(max))
        .all(|(p, (lo, hi))| p >= lo && p <= hi)
}

impl<V, N: CoordNum> KDTree<V, N> {
    /// Query the tree, returning all entries in the axis-aligned box between `min` and `max`,
    /// bounds included.
    ///
    /// Bounds may be infinite. Fails if either bound has the wrong number of dimensions or if
    /// `min` exceeds `max` in any dimension.
    ///
    /// The traversal enters a node's `hi` side when `max[d] >= key[d]` and its `lo` side when
    /// `min[d] < key[d]`. Once [`KDTree::is_invariant_broken`] is set, `lo` is also entered when
    /// `min[d] == key[d]`, as a removal may have left equal coordinates there.
    pub fn query(&self, min: &[N], max: &[N]) -> Result<QueryIterator<'_, V, N>> {
        QueryIterator::try_new(self, min, max)
    }

    /// Iterate over all entries of the tree.
    pub fn iter(&self) -> QueryIterator<'_, V, N> {
        let min = vec![N::neg_infinity(); self.dims];
        let max = vec![N::infinity(); self.dims];
        let mut stack = TinyVec::new();
        stack.extend(self.root);
        QueryIterator {
            tree: self,
            min,
            max,
            stack,
        }
    }

    /// Query a two-dimensional tree with a rectangle.
    pub fn query_rect(&self, rect: &impl RectTrait<T = N>) -> Result<QueryIterator<'_, V, N>> {
        self.query(
            &[rect.min().x(), rect.min().y()],
            &[rect.max().x(), rect.max().y()],
        )
    }

    /// Search the tree for entries within `radius` (inclusive) of `center`.
    ///
    /// A negative radius matches nothing.
    pub fn within(&self, center: &[N], radius: N) -> Result<Vec<PointEntry<'_, N, V>>> {
        self.check_dims(center)?;
        if radius < N::zero() {
            return Ok(vec![]);
        }
        let nodes = &self.nodes;
        let lo_inclusive = self.invariant_broken;
        let r2 = radius * radius;

        let mut stack: TinyVec<[NodeId; 32]> = TinyVec::new();
        stack.extend(self.root);
        let mut result = vec![];

        while let Some(id) = stack.pop() {
            let node = nodes.node(id);
            let node_x = nodes.coord(id, node.dim);
            let c = center[node.dim];

            if c + radius >= node_x {
                stack.extend(node.hi);
            }
            if c - radius < node_x || (lo_inclusive && c - radius == node_x) {
                stack.extend(node.lo);
            }

            let key = nodes.key(id);
            if sq_dist(key, center) <= r2 {
                result.push(PointEntry::new(key, &node.value));
            }
        }
        Ok(result)
    }

    /// Search a two-dimensional tree for entries within `radius` of `coord`.
    pub fn within_coord(
        &self,
        coord: &impl CoordTrait<T = N>,
        radius: N,
    ) -> Result<Vec<PointEntry<'_, N, V>>> {
        self.within(&[coord.x(), coord.y()], radius)
    }
}

#[inline]
pub(crate) fn sq_dist<N: CoordNum>(a: &[N], b: &[N]) -> N {
    a.iter().zip(b).fold(N::zero(), |acc, (x, y)| {
        let d = *x - *y;
        acc + d * d
    })
}

impl<'a, V, N: CoordNum> IntoIterator for &'a KDTree<V, N> {
    type Item = PointEntry<'a, N, V>;
    type IntoIter = QueryIterator<'a, V, N>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
