//! Removal by promotion of a subtree extremum.

use tinyvec::TinyVec;
use tracing::{debug, trace};

use crate::error::Result;
use crate::kdtree::index::Found;
use crate::kdtree::node::NodeId;
use crate::kdtree::KDTree;
use crate::r#type::CoordNum;

/// Best candidate of an extremum scan.
#[derive(Debug, Clone, Copy)]
struct Extremum<N> {
    best: N,
    node: Option<NodeId>,
    parent: Option<NodeId>,
}

/// Which extremum a scan is looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Min,
    Max,
}

impl<V, N: CoordNum> KDTree<V, N> {
    /// Remove an entry with this key, returning its value.
    ///
    /// If the key was inserted multiple times, only the first entry found is removed.
    pub fn remove(&mut self, key: &[N]) -> Result<Option<V>> {
        self.check_dims(key)?;
        Ok(self.remove_entry(key))
    }

    pub(crate) fn remove_entry(&mut self, key: &[N]) -> Option<V> {
        let Found { node, parent } = self.find_exact(key)?;
        self.mod_count = self.mod_count.wrapping_add(1);

        if Some(node) == self.root && self.size == 1 {
            let value = self.nodes.release(node);
            self.root = None;
            self.size = 0;
            self.nodes.clear();
            if self.invariant_broken {
                debug!("last entry removed, exact lookups back on the single path");
            }
            self.invariant_broken = false;
            return Some(value);
        }

        // Walk the entry down the tree: swap it with a promoted extremum until it sits in a leaf.
        let mut to_remove = node;
        let mut parent = parent;
        let mut promotions = 0usize;
        loop {
            let current = self.nodes.node(to_remove);
            let pos = current.dim;
            let (lo, hi) = (current.lo, current.hi);
            let use_lo = (self.mod_count & 0x1 == 0 || hi.is_none()) && lo.is_some();
            let extremum = match (use_lo, lo, hi) {
                (true, Some(lo), _) => self.find_max_leaf_in_d(lo, to_remove, pos),
                (_, _, Some(hi)) => self.find_min_leaf_in_d(hi, to_remove, pos),
                _ => break,
            };
            let Some(replacement) = extremum.node else {
                unreachable!("extremum scan of a non-empty subtree found no candidate");
            };
            self.nodes.swap_entries(to_remove, replacement);
            to_remove = replacement;
            parent = extremum.parent;
            promotions += 1;
        }
        trace!(promotions, "removed entry from kd-tree");

        if let Some(parent) = parent {
            let p = self.nodes.node_mut(parent);
            if p.lo == Some(to_remove) {
                p.lo = None;
            } else if p.hi == Some(to_remove) {
                p.hi = None;
            } else {
                unreachable!("node {to_remove} is not a child of {parent}");
            }
        }
        self.size -= 1;
        Some(self.nodes.release(to_remove))
    }

    /// Find the node with the smallest `pos` coordinate in the subtree below `start`, among nodes
    /// that can be detached along `pos` without orphaning a `lo` subtree.
    fn find_min_leaf_in_d(&mut self, start: NodeId, parent: NodeId, pos: usize) -> Extremum<N> {
        self.find_extremum_leaf_in_d(start, parent, pos, Direction::Min)
    }

    /// Mirror of [`Self::find_min_leaf_in_d`] for the largest `pos` coordinate.
    fn find_max_leaf_in_d(&mut self, start: NodeId, parent: NodeId, pos: usize) -> Extremum<N> {
        self.find_extremum_leaf_in_d(start, parent, pos, Direction::Max)
    }

    fn find_extremum_leaf_in_d(
        &mut self,
        start: NodeId,
        parent: NodeId,
        pos: usize,
        direction: Direction,
    ) -> Extremum<N> {
        let mut result = Extremum {
            best: match direction {
                Direction::Min => N::infinity(),
                Direction::Max => N::neg_infinity(),
            },
            node: None,
            parent: None,
        };
        let mut broken = false;

        // Preorder traversal: a node is checked before its `lo` subtree, which comes before its
        // `hi` subtree. On ties the last candidate checked wins.
        let mut stack: TinyVec<[(NodeId, NodeId); 32]> = TinyVec::new();
        stack.push((start, parent));

        while let Some((id, parent)) = stack.pop() {
            let node = self.nodes.node(id);
            let local_x = self.nodes.coord(id, pos);
            let toward = match direction {
                Direction::Min => node.lo,
                Direction::Max => node.hi,
            };
            let beats = match direction {
                Direction::Min => local_x <= result.best,
                Direction::Max => local_x >= result.best,
            };

            if node.dim == pos {
                // Everything on the other side is further from the extremum, and a node that
                // still has a child toward it cannot be detached.
                match toward {
                    Some(child) => stack.push((child, id)),
                    None if beats => {
                        result = Extremum {
                            best: local_x,
                            node: Some(id),
                            parent: Some(parent),
                        };
                        // Compared after the assignment, so true for every accepted candidate.
                        broken |= result.best == local_x;
                    }
                    None => {}
                }
            } else {
                if beats {
                    result = Extremum {
                        best: local_x,
                        node: Some(id),
                        parent: Some(parent),
                    };
                    broken |= result.best == local_x;
                }
                // Note: pushed in reverse of the order they get popped
                if let Some(hi) = node.hi {
                    stack.push((hi, id));
                }
                if let Some(lo) = node.lo {
                    stack.push((lo, id));
                }
            }
        }

        if broken && !self.invariant_broken {
            debug!(
                dim = pos,
                "removal promoted a coordinate, switching exact lookups to the tie-aware path"
            );
            self.invariant_broken = true;
        }
        result
    }

    /// Move the entry stored under `old_key` to `new_key`.
    ///
    /// Returns the moved value, or `None` if `old_key` was not found, in which case nothing is
    /// inserted.
    pub fn update(&mut self, old_key: &[N], new_key: &[N]) -> Result<Option<&V>> {
        self.check_dims(old_key)?;
        self.check_dims(new_key)?;
        let Some(value) = self.remove_entry(old_key) else {
            return Ok(None);
        };
        let id = self.insert_entry(new_key, value);
        Ok(Some(&self.nodes.node(id).value))
    }
}
