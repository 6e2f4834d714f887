//! Node storage for the KDTree.
//!
//! Nodes live in an arena and link to their children by index. Keys are not stored on the node
//! itself but in a single interleaved coordinate buffer, `dims` values per slot, so that the key
//! of slot `i` is `coords[i * dims..(i + 1) * dims]`.

use crate::r#type::CoordNum;

/// Index of a node slot in the arena.
pub(crate) type NodeId = usize;

/// A single node of the tree: its payload, split dimension and child links.
#[derive(Debug, Clone)]
pub(crate) struct Node<V> {
    pub(crate) value: V,
    /// The dimension this node splits its subtree on.
    pub(crate) dim: usize,
    /// Keys with `key[dim]` smaller than this node's.
    pub(crate) lo: Option<NodeId>,
    /// Keys with `key[dim]` larger than or equal to this node's.
    pub(crate) hi: Option<NodeId>,
}

impl<V> Node<V> {
    #[inline]
    pub(crate) fn is_leaf(&self) -> bool {
        self.lo.is_none() && self.hi.is_none()
    }
}

/// Slot storage with a free list, so removed nodes are recycled by later insertions.
#[derive(Debug, Clone)]
pub(crate) struct NodeArena<V, N: CoordNum> {
    dims: usize,
    slots: Vec<Option<Node<V>>>,
    coords: Vec<N>,
    free: Vec<NodeId>,
}

impl<V, N: CoordNum> NodeArena<V, N> {
    pub(crate) fn with_capacity(dims: usize, capacity: usize) -> Self {
        Self {
            dims,
            slots: Vec::with_capacity(capacity),
            coords: Vec::with_capacity(capacity * dims),
            free: vec![],
        }
    }

    /// Allocate a childless node holding the given entry.
    pub(crate) fn alloc(&mut self, key: &[N], value: V, dim: usize) -> NodeId {
        debug_assert_eq!(key.len(), self.dims);
        let node = Node {
            value,
            dim,
            lo: None,
            hi: None,
        };
        match self.free.pop() {
            Some(id) => {
                self.slots[id] = Some(node);
                self.coords[id * self.dims..(id + 1) * self.dims].copy_from_slice(key);
                id
            }
            None => {
                self.slots.push(Some(node));
                self.coords.extend_from_slice(key);
                self.slots.len() - 1
            }
        }
    }

    /// Release a node slot, handing back its payload. The caller must have unlinked it.
    pub(crate) fn release(&mut self, id: NodeId) -> V {
        match self.slots[id].take() {
            Some(node) => {
                debug_assert!(node.is_leaf(), "released node {id} still has children");
                self.free.push(id);
                node.value
            }
            None => unreachable!("node {id} released twice"),
        }
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.coords.clear();
        self.free.clear();
    }

    #[inline]
    pub(crate) fn node(&self, id: NodeId) -> &Node<V> {
        match &self.slots[id] {
            Some(node) => node,
            None => unreachable!("node {id} is not allocated"),
        }
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node<V> {
        match &mut self.slots[id] {
            Some(node) => node,
            None => unreachable!("node {id} is not allocated"),
        }
    }

    /// The key of a node.
    #[inline]
    pub(crate) fn key(&self, id: NodeId) -> &[N] {
        &self.coords[id * self.dims..(id + 1) * self.dims]
    }

    /// A single coordinate of a node's key.
    #[inline]
    pub(crate) fn coord(&self, id: NodeId, axis: usize) -> N {
        self.coords[id * self.dims + axis]
    }

    /// Exchange the entries (key and payload) of two nodes, keeping their links and split
    /// dimensions in place.
    pub(crate) fn swap_entries(&mut self, a: NodeId, b: NodeId) {
        if a == b {
            return;
        }
        for axis in 0..self.dims {
            self.coords.swap(a * self.dims + axis, b * self.dims + axis);
        }
        let (low, high) = if a < b { (a, b) } else { (b, a) };
        let (head, tail) = self.slots.split_at_mut(high);
        match (&mut head[low], &mut tail[0]) {
            (Some(x), Some(y)) => std::mem::swap(&mut x.value, &mut y.value),
            _ => unreachable!("swapping entries of unallocated nodes {a} and {b}"),
        }
    }

    /// Number of slots in use, including released ones awaiting reuse.
    #[cfg(test)]
    pub(crate) fn num_slots(&self) -> usize {
        self.slots.len()
    }

    #[cfg(test)]
    pub(crate) fn num_free(&self) -> usize {
        self.free.len()
    }
}
