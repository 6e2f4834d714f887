use tinyvec::TinyVec;
use tracing::debug;

use crate::error::{KDIndexError, Result};
use crate::kdtree::node::{NodeArena, NodeId};
use crate::kdtree::KDTreeBuilder;
use crate::r#type::CoordNum;

/// A mutable k-d tree mapping `dims`-dimensional keys to values of type `V`.
///
/// Duplicate keys are allowed and stored as distinct entries.
///
/// ```
/// use kd_index::kdtree::KDTree;
///
/// let mut tree = KDTree::new(2).unwrap();
/// for (i, p) in [[2., 3.], [5., 4.], [9., 6.], [4., 7.], [8., 1.], [7., 2.]]
///     .iter()
///     .enumerate()
/// {
///     tree.insert(p, i).unwrap();
/// }
///
/// assert_eq!(tree.query_exact(&[4., 7.]).unwrap(), Some(&3));
/// let nearest = tree.nn_query(&[9., 2.]).unwrap().unwrap();
/// assert_eq!(nearest.key(), &[8., 1.]);
/// ```
#[derive(Debug, Clone)]
pub struct KDTree<V, N: CoordNum = f64> {
    pub(crate) dims: usize,
    pub(crate) size: usize,
    /// Bumped by every modification. Only its parity is observed, to alternate the side a
    /// replacement is taken from during removal.
    pub(crate) mod_count: u32,
    /// Set once a removal may have moved a coordinate up the tree such that equal values in a
    /// split dimension exist on both sides of a node.
    pub(crate) invariant_broken: bool,
    pub(crate) root: Option<NodeId>,
    pub(crate) nodes: NodeArena<V, N>,
}

/// Location of an entry found by an exact lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Found {
    pub(crate) node: NodeId,
    pub(crate) parent: Option<NodeId>,
}

impl<V, N: CoordNum> KDTree<V, N> {
    /// Create an empty tree over `dims`-dimensional keys.
    ///
    /// Fails with [`KDIndexError::InvalidDim`] if `dims` is zero.
    pub fn new(dims: usize) -> Result<Self> {
        KDTreeBuilder::new(dims).build()
    }

    /// The number of dimensions of the keys in this tree.
    pub fn dims(&self) -> usize {
        self.dims
    }

    /// The number of entries in this tree.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` if this tree holds no entries.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns `true` once a removal may have placed equal split coordinates on both sides of a
    /// node.
    ///
    /// From then on exact lookups take the slower path that also explores the `lo` side on
    /// ties. The flag is reset by [`KDTree::clear`] and by removing the last entry.
    pub fn is_invariant_broken(&self) -> bool {
        self.invariant_broken
    }

    pub(crate) fn check_dims(&self, key: &[N]) -> Result<()> {
        if key.len() != self.dims {
            return Err(KDIndexError::DimensionMismatch {
                expected: self.dims,
                actual: key.len(),
            });
        }
        Ok(())
    }

    /// Insert a key/value pair.
    pub fn insert(&mut self, key: &[N], value: V) -> Result<()> {
        self.check_dims(key)?;
        self.insert_entry(key, value);
        Ok(())
    }

    /// Insert without validation, returning the id of the new leaf.
    pub(crate) fn insert_entry(&mut self, key: &[N], value: V) -> NodeId {
        self.size += 1;
        self.mod_count = self.mod_count.wrapping_add(1);

        let Some(mut n) = self.root else {
            let id = self.nodes.alloc(key, value, 0);
            self.root = Some(id);
            return id;
        };

        loop {
            let node = self.nodes.node(n);
            let dim = node.dim;
            // Ties go to `hi`, so an equal coordinate is never below a node's `lo` side.
            let go_hi = key[dim] >= self.nodes.coord(n, dim);
            let next = if go_hi { node.hi } else { node.lo };
            match next {
                Some(child) => n = child,
                None => {
                    let id = self.nodes.alloc(key, value, (dim + 1) % self.dims);
                    let node = self.nodes.node_mut(n);
                    if go_hi {
                        node.hi = Some(id);
                    } else {
                        node.lo = Some(id);
                    }
                    return id;
                }
            }
        }
    }

    /// Returns `true` if an entry with exactly this key exists.
    pub fn contains_exact(&self, key: &[N]) -> Result<bool> {
        self.check_dims(key)?;
        Ok(self.find_exact(key).is_some())
    }

    /// Get the value associated with the key.
    ///
    /// If the key was inserted multiple times, the value of the first entry found is returned.
    pub fn query_exact(&self, key: &[N]) -> Result<Option<&V>> {
        self.check_dims(key)?;
        Ok(self
            .find_exact(key)
            .map(|found| &self.nodes.node(found.node).value))
    }

    /// Get a mutable reference to the value associated with the key.
    pub fn query_exact_mut(&mut self, key: &[N]) -> Result<Option<&mut V>> {
        self.check_dims(key)?;
        Ok(match self.find_exact(key) {
            Some(found) => Some(&mut self.nodes.node_mut(found.node).value),
            None => None,
        })
    }

    /// Locate the first node holding exactly `key`, together with its parent.
    pub(crate) fn find_exact(&self, key: &[N]) -> Option<Found> {
        let root = self.root?;
        if self.invariant_broken {
            self.find_exact_slow(key, root)
        } else {
            self.find_exact_fast(key, root)
        }
    }

    /// Single path descent, valid while no equal split coordinate sits on a `lo` side.
    fn find_exact_fast(&self, key: &[N], root: NodeId) -> Option<Found> {
        let mut parent = None;
        let mut n = Some(root);
        while let Some(id) = n {
            let node = self.nodes.node(id);
            let node_x = self.nodes.coord(id, node.dim);
            let key_x = key[node.dim];
            if key_x == node_x && self.nodes.key(id) == key {
                return Some(Found { node: id, parent });
            }
            parent = Some(id);
            n = if key_x >= node_x { node.hi } else { node.lo };
        }
        None
    }

    /// Descent that additionally searches the `lo` side of every node whose split coordinate
    /// ties with the key. The `lo` side is searched first.
    fn find_exact_slow(&self, key: &[N], root: NodeId) -> Option<Found> {
        // (node, parent) pairs still to visit
        let mut stack: TinyVec<[(NodeId, Option<NodeId>); 32]> = TinyVec::new();
        stack.push((root, None));

        while let Some((id, parent)) = stack.pop() {
            let node = self.nodes.node(id);
            let node_x = self.nodes.coord(id, node.dim);
            let key_x = key[node.dim];
            if key_x == node_x && self.nodes.key(id) == key {
                return Some(Found { node: id, parent });
            }

            // Note: pushed in reverse of the order they get popped
            let next = if key_x >= node_x { node.hi } else { node.lo };
            if let Some(next) = next {
                stack.push((next, Some(id)));
            }
            if key_x == node_x {
                if let Some(lo) = node.lo {
                    stack.push((lo, Some(id)));
                }
            }
        }
        None
    }

    /// Removes all entries from the tree.
    pub fn clear(&mut self) {
        debug!(size = self.size, "clearing kd-tree");
        self.size = 0;
        self.root = None;
        self.invariant_broken = false;
        self.mod_count = self.mod_count.wrapping_add(1);
        self.nodes.clear();
    }
}
