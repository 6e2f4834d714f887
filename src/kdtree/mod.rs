//! A mutable k-d tree over fixed-dimensional points.
//!
//! Keys with an equal coordinate in a node's split dimension are always routed to the `hi` side
//! of that node on insertion. As long as this holds, an exact lookup only needs to follow a
//! single path. Removing an interior node promotes an extremum from one of its subtrees, which
//! can leave equal coordinates on both sides of a node. The tree records when this may have
//! happened and from then on uses a lookup that also explores the `lo` side on ties.

#![warn(missing_docs)]

mod builder;
mod index;
mod nearest;
pub(crate) mod node;
mod remove;
mod stats;
mod r#trait;
mod traversal;

pub use builder::KDTreeBuilder;
pub use index::KDTree;
pub use nearest::KnnIterator;
pub use stats::KDStats;
pub use traversal::QueryIterator;
