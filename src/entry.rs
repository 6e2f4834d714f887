//! Borrowed views onto the key/value pairs stored in a point index.

use geo_traits::CoordTrait;

use crate::r#type::CoordNum;

/// A key/value pair stored in a point index.
///
/// The key is a borrowed slice of the index's coordinate buffer, so an entry is only valid for
/// as long as the index is not mutated.
#[derive(Debug, PartialEq)]
pub struct PointEntry<'a, N: CoordNum, V> {
    key: &'a [N],
    value: &'a V,
}

impl<'a, N: CoordNum, V> PointEntry<'a, N, V> {
    pub(crate) fn new(key: &'a [N], value: &'a V) -> Self {
        Self { key, value }
    }

    /// The coordinates of this entry.
    pub fn key(&self) -> &'a [N] {
        self.key
    }

    /// The payload associated with this entry.
    pub fn value(&self) -> &'a V {
        self.value
    }
}

// Entries only hold references, so they are copyable regardless of `V`.
impl<N: CoordNum, V> Clone for PointEntry<'_, N, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<N: CoordNum, V> Copy for PointEntry<'_, N, V> {}

/// An entry can be handed to any API accepting a [`CoordTrait`].
///
/// `x` and `y` read the first two coordinates of the key, so they panic on one-dimensional
/// trees.
impl<N: CoordNum, V> CoordTrait for PointEntry<'_, N, V> {
    type T = N;

    fn dim(&self) -> geo_traits::Dimensions {
        match self.key.len() {
            2 => geo_traits::Dimensions::Xy,
            3 => geo_traits::Dimensions::Xyz,
            n => geo_traits::Dimensions::Unknown(n),
        }
    }

    fn x(&self) -> Self::T {
        self.key[0]
    }

    fn y(&self) -> Self::T {
        self.key[1]
    }

    fn nth_or_panic(&self, n: usize) -> Self::T {
        match self.key.get(n) {
            Some(v) => *v,
            None => panic!("Invalid index of coord"),
        }
    }
}

/// A key/value pair together with its Euclidean distance to a query center.
#[derive(Debug, PartialEq)]
pub struct PointEntryDist<'a, N: CoordNum, V> {
    entry: PointEntry<'a, N, V>,
    dist: N,
}

impl<'a, N: CoordNum, V> PointEntryDist<'a, N, V> {
    pub(crate) fn new(entry: PointEntry<'a, N, V>, dist: N) -> Self {
        Self { entry, dist }
    }

    /// The coordinates of this entry.
    pub fn key(&self) -> &'a [N] {
        self.entry.key()
    }

    /// The payload associated with this entry.
    pub fn value(&self) -> &'a V {
        self.entry.value()
    }

    /// The Euclidean distance between this entry and the query center.
    pub fn dist(&self) -> N {
        self.dist
    }

    /// The entry without its distance.
    pub fn entry(&self) -> PointEntry<'a, N, V> {
        self.entry
    }
}

impl<N: CoordNum, V> Clone for PointEntryDist<'_, N, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<N: CoordNum, V> Copy for PointEntryDist<'_, N, V> {}
