//! Nearest neighbor search.
//!
//! Both searches descend depth-first into the half containing the center, then revisit the
//! other half only if the splitting plane is closer than the current pruning radius. The radius
//! starts at infinity and shrinks as better candidates are found.

use geo_traits::CoordTrait;
use tinyvec::TinyVec;

use crate::entry::{PointEntry, PointEntryDist};
use crate::error::Result;
use crate::kdtree::node::NodeId;
use crate::kdtree::traversal::sq_dist;
use crate::kdtree::KDTree;
use crate::r#type::CoordNum;

/// A pending step of the nearest neighbor traversal.
#[derive(Debug, Clone, Copy, Default)]
struct Frame {
    node: NodeId,
    /// `None` before descending into `node`. Afterwards, whether the half searched first was
    /// `lo`.
    near_lo: Option<bool>,
}

impl Frame {
    fn descend(node: NodeId) -> Self {
        Self {
            node,
            near_lo: None,
        }
    }
}

/// Traversal shared by the 1-NN and k-NN searches. Implementors decide which candidates are
/// kept and report the resulting pruning radius.
trait Candidates<N: CoordNum> {
    /// Offer a node at distance `dist`, returning the new pruning radius.
    fn offer(&mut self, node: NodeId, dist: N, max_range: N) -> N;
}

/// Keeps the single closest node. On equal distance the first one found wins.
#[derive(Debug)]
struct Nearest<N> {
    best: Option<(NodeId, N)>,
}

impl<N: CoordNum> Candidates<N> for Nearest<N> {
    fn offer(&mut self, node: NodeId, dist: N, max_range: N) -> N {
        if dist >= max_range {
            return max_range;
        }
        self.best = Some((node, dist));
        dist
    }
}

/// Keeps the `k` closest nodes, sorted by ascending distance.
#[derive(Debug)]
struct KNearest<N> {
    k: usize,
    list: Vec<(NodeId, N)>,
}

impl<N: CoordNum> Candidates<N> for KNearest<N> {
    fn offer(&mut self, node: NodeId, dist: N, max_range: N) -> N {
        if dist > max_range {
            return max_range;
        }
        // Ties with the current k-th candidate are not admitted.
        if dist == max_range && self.list.len() >= self.k {
            return max_range;
        }
        if self.list.len() >= self.k {
            self.list.pop();
        }
        // After every equally distant candidate, so ties keep discovery order.
        let pos = self.list.partition_point(|(_, d)| *d <= dist);
        self.list.insert(pos, (node, dist));

        if self.list.len() < self.k {
            max_range
        } else {
            self.list.last().map_or(max_range, |(_, d)| *d)
        }
    }
}

impl<V, N: CoordNum> KDTree<V, N> {
    /// Find the entry closest to `center`, with its Euclidean distance.
    ///
    /// Returns `None` on an empty tree.
    pub fn nn_query(&self, center: &[N]) -> Result<Option<PointEntryDist<'_, N, V>>> {
        self.check_dims(center)?;
        let Some(root) = self.root else {
            return Ok(None);
        };
        let mut nearest = Nearest { best: None };
        self.range_search(root, center, &mut nearest, N::infinity());
        Ok(nearest.best.map(|(id, dist)| self.entry_dist(id, dist)))
    }

    /// Find the entry closest to a two-dimensional coordinate.
    pub fn nn_query_coord(
        &self,
        coord: &impl CoordTrait<T = N>,
    ) -> Result<Option<PointEntryDist<'_, N, V>>> {
        self.nn_query(&[coord.x(), coord.y()])
    }

    /// Find the `k` entries closest to `center`, in ascending order of distance.
    ///
    /// Entries at the same distance are returned in the order the search found them. If more
    /// than `k` entries tie for the last place, only those found first are kept.
    pub fn knn_query(&self, center: &[N], k: usize) -> Result<KnnIterator<'_, V, N>> {
        self.check_dims(center)?;
        Ok(KnnIterator {
            tree: self,
            results: self.knn_search(center, k).into_iter(),
        })
    }

    /// Find the `k` entries closest to a two-dimensional coordinate.
    pub fn knn_query_coord(
        &self,
        coord: &impl CoordTrait<T = N>,
        k: usize,
    ) -> Result<KnnIterator<'_, V, N>> {
        self.knn_query(&[coord.x(), coord.y()], k)
    }

    fn knn_search(&self, center: &[N], k: usize) -> Vec<PointEntryDist<'_, N, V>> {
        let root = match self.root {
            Some(root) if k > 0 => root,
            _ => return vec![],
        };
        let mut candidates = KNearest {
            k,
            list: Vec::with_capacity(k.min(self.size)),
        };
        self.range_search(root, center, &mut candidates, N::infinity());
        candidates
            .list
            .into_iter()
            .map(|(id, dist)| self.entry_dist(id, dist))
            .collect()
    }

    /// Depth-first search below `root`, returning the final pruning radius.
    ///
    /// Each interior node is visited twice: once to descend into the half containing the
    /// center, and once more after that half is done, to check the node itself and decide
    /// whether the other half can still hold a closer entry.
    fn range_search(
        &self,
        root: NodeId,
        center: &[N],
        candidates: &mut impl Candidates<N>,
        mut max_range: N,
    ) -> N {
        let mut stack: TinyVec<[Frame; 32]> = TinyVec::new();
        stack.push(Frame::descend(root));

        while let Some(frame) = stack.pop() {
            let id = frame.node;
            let node = self.nodes.node(id);
            let pos = node.dim;
            let node_x = self.nodes.coord(id, pos);

            if let Some(near_lo) = frame.near_lo {
                let reachable = if near_lo {
                    center[pos] + max_range >= node_x
                } else {
                    center[pos] <= node_x + max_range
                };
                if reachable {
                    max_range = self.add_candidate(id, center, candidates, max_range);
                    let far = if near_lo { node.hi } else { node.lo };
                    stack.extend(far.map(Frame::descend));
                }
                continue;
            }

            let near_lo = match (node.lo, node.hi) {
                (Some(_), hi) if center[pos] < node_x || hi.is_none() => true,
                (_, Some(_)) => false,
                // leaf, likely a good first candidate
                _ => {
                    max_range = self.add_candidate(id, center, candidates, max_range);
                    continue;
                }
            };
            let near = if near_lo { node.lo } else { node.hi };
            // Note: pushed in reverse of the order they get popped
            stack.push(Frame {
                node: id,
                near_lo: Some(near_lo),
            });
            stack.extend(near.map(Frame::descend));
        }
        max_range
    }

    #[inline]
    fn add_candidate(
        &self,
        id: NodeId,
        center: &[N],
        candidates: &mut impl Candidates<N>,
        max_range: N,
    ) -> N {
        let dist = sq_dist(center, self.nodes.key(id)).sqrt();
        candidates.offer(id, dist, max_range)
    }

    fn entry_dist(&self, id: NodeId, dist: N) -> PointEntryDist<'_, N, V> {
        let entry = PointEntry::new(self.nodes.key(id), &self.nodes.node(id).value);
        PointEntryDist::new(entry, dist)
    }
}

/// The results of a k-nearest-neighbor query, in ascending order of distance.
///
/// Results are computed eagerly when the query is made. The iterator can be rerun with a new
/// center through [`KnnIterator::reset`].
#[derive(Debug, Clone)]
pub struct KnnIterator<'a, V, N: CoordNum = f64> {
    tree: &'a KDTree<V, N>,
    results: std::vec::IntoIter<PointEntryDist<'a, N, V>>,
}

impl<'a, V, N: CoordNum> KnnIterator<'a, V, N> {
    /// Rerun the query with a new center and number of neighbors.
    ///
    /// On error the iterator is left unchanged.
    pub fn reset(&mut self, center: &[N], k: usize) -> Result<()> {
        let tree: &'a KDTree<V, N> = self.tree;
        tree.check_dims(center)?;
        self.results = tree.knn_search(center, k).into_iter();
        Ok(())
    }
}

impl<'a, V, N: CoordNum> Iterator for KnnIterator<'a, V, N> {
    type Item = PointEntryDist<'a, N, V>;

    fn next(&mut self) -> Option<Self::Item> {
        self.results.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.results.size_hint()
    }
}

impl<V, N: CoordNum> ExactSizeIterator for KnnIterator<'_, V, N> {}
