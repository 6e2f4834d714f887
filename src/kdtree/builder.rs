use std::marker::PhantomData;

use crate::error::{KDIndexError, Result};
use crate::kdtree::node::NodeArena;
use crate::kdtree::KDTree;
use crate::r#type::CoordNum;

const DEFAULT_CAPACITY: usize = 0;

/// A builder to configure and create an empty [`KDTree`].
///
/// ```
/// use kd_index::kdtree::KDTreeBuilder;
///
/// let mut tree = KDTreeBuilder::<&str>::new(3).with_capacity(16).build().unwrap();
/// tree.insert(&[1., 2., 3.], "a").unwrap();
/// assert_eq!(tree.size(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct KDTreeBuilder<V, N: CoordNum = f64> {
    dims: usize,
    capacity: usize,
    phantom: PhantomData<(V, N)>,
}

impl<V, N: CoordNum> KDTreeBuilder<V, N> {
    /// Create a new builder for a tree over `dims`-dimensional keys.
    pub fn new(dims: usize) -> Self {
        Self {
            dims,
            capacity: DEFAULT_CAPACITY,
            phantom: PhantomData,
        }
    }

    /// Reserve space for `capacity` entries up front.
    ///
    /// This is only a hint: the tree grows past it as needed.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Consume this builder, creating an empty tree.
    ///
    /// Fails with [`KDIndexError::InvalidDim`] when the tree would have no dimensions.
    pub fn build(self) -> Result<KDTree<V, N>> {
        if self.dims < 1 {
            return Err(KDIndexError::InvalidDim(self.dims));
        }
        Ok(KDTree {
            dims: self.dims,
            size: 0,
            mod_count: 0,
            invariant_broken: false,
            root: None,
            nodes: NodeArena::with_capacity(self.dims, self.capacity),
        })
    }
}
