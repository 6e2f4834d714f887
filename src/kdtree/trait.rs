use std::fmt::Debug;

use crate::entry::PointEntryDist;
use crate::error::Result;
use crate::kdtree::{KDTree, KnnIterator, QueryIterator};
use crate::r#trait::PointIndex;
use crate::r#type::CoordNum;

impl<V: Debug, N: CoordNum> PointIndex<V, N> for KDTree<V, N> {
    type QueryIter<'a>
        = QueryIterator<'a, V, N>
    where
        Self: 'a,
        V: 'a;

    type KnnIter<'a>
        = KnnIterator<'a, V, N>
    where
        Self: 'a,
        V: 'a;

    fn dims(&self) -> usize {
        KDTree::dims(self)
    }

    fn size(&self) -> usize {
        KDTree::size(self)
    }

    fn insert(&mut self, key: &[N], value: V) -> Result<()> {
        KDTree::insert(self, key, value)
    }

    fn contains_exact(&self, key: &[N]) -> Result<bool> {
        KDTree::contains_exact(self, key)
    }

    fn query_exact(&self, key: &[N]) -> Result<Option<&V>> {
        KDTree::query_exact(self, key)
    }

    fn remove(&mut self, key: &[N]) -> Result<Option<V>> {
        KDTree::remove(self, key)
    }

    fn update(&mut self, old_key: &[N], new_key: &[N]) -> Result<Option<&V>> {
        KDTree::update(self, old_key, new_key)
    }

    fn clear(&mut self) {
        KDTree::clear(self)
    }

    fn query(&self, min: &[N], max: &[N]) -> Result<Self::QueryIter<'_>> {
        KDTree::query(self, min, max)
    }

    fn iter(&self) -> Self::QueryIter<'_> {
        KDTree::iter(self)
    }

    fn nn_query(&self, center: &[N]) -> Result<Option<PointEntryDist<'_, N, V>>> {
        KDTree::nn_query(self, center)
    }

    fn knn_query(&self, center: &[N], k: usize) -> Result<Self::KnnIter<'_>> {
        KDTree::knn_query(self, center, k)
    }

    fn node_count(&self) -> usize {
        KDTree::node_count(self)
    }

    fn depth(&self) -> usize {
        KDTree::depth(self)
    }

    fn to_string_tree(&self) -> String {
        KDTree::to_string_tree(self)
    }
}
