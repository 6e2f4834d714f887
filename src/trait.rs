use crate::entry::{PointEntry, PointEntryDist};
use crate::error::Result;
use crate::r#type::CoordNum;

/// The interface shared by point indexes: maps of fixed-dimensional points to values.
///
/// Every operation that takes a key, bound or center fails with
/// [`DimensionMismatch`][crate::KDIndexError::DimensionMismatch] when its length is not
/// [`PointIndex::dims`]. Absent keys are not errors.
pub trait PointIndex<V, N: CoordNum = f64> {
    /// Iterator returned by window queries.
    type QueryIter<'a>: Iterator<Item = PointEntry<'a, N, V>>
    where
        Self: 'a,
        V: 'a;

    /// Iterator returned by k-nearest-neighbor queries.
    type KnnIter<'a>: Iterator<Item = PointEntryDist<'a, N, V>>
    where
        Self: 'a,
        V: 'a;

    /// The number of dimensions of the keys.
    fn dims(&self) -> usize;

    /// The number of entries.
    fn size(&self) -> usize;

    /// Insert a key/value pair. Duplicate keys are stored as separate entries.
    fn insert(&mut self, key: &[N], value: V) -> Result<()>;

    /// Returns `true` if an entry with exactly this key exists.
    fn contains_exact(&self, key: &[N]) -> Result<bool>;

    /// The value of an entry with exactly this key.
    fn query_exact(&self, key: &[N]) -> Result<Option<&V>>;

    /// Remove an entry with exactly this key, returning its value.
    fn remove(&mut self, key: &[N]) -> Result<Option<V>>;

    /// Move an entry from `old_key` to `new_key`, returning its value.
    fn update(&mut self, old_key: &[N], new_key: &[N]) -> Result<Option<&V>>;

    /// Remove all entries.
    fn clear(&mut self);

    /// All entries inside the axis-aligned box between `min` and `max`, bounds included.
    fn query(&self, min: &[N], max: &[N]) -> Result<Self::QueryIter<'_>>;

    /// All entries.
    fn iter(&self) -> Self::QueryIter<'_>;

    /// The entry closest to `center`.
    fn nn_query(&self, center: &[N]) -> Result<Option<PointEntryDist<'_, N, V>>>;

    /// The `k` entries closest to `center`, in ascending order of distance.
    fn knn_query(&self, center: &[N], k: usize) -> Result<Self::KnnIter<'_>>;

    /// The number of nodes making up the index structure.
    fn node_count(&self) -> usize;

    /// The depth of the index structure.
    fn depth(&self) -> usize;

    /// A human readable rendering of the index structure, for debugging.
    fn to_string_tree(&self) -> String;
}
