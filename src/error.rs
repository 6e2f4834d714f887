use std::fmt::Debug;
use thiserror::Error;

/// Enum with all errors in this crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KDIndexError {
    /// The tree was created with fewer than one dimension.
    #[error("Invalid number of dimensions: {0}. Must be at least 1.")]
    InvalidDim(usize),

    /// A key, bound or query center did not have the tree's number of dimensions.
    #[error("Dimension mismatch: expected {expected} coordinates, got {actual}.")]
    DimensionMismatch { expected: usize, actual: usize },

    /// A window query had a lower bound above its upper bound.
    #[error("Inverted range in dimension {dim}: min is larger than max.")]
    InvertedRange { dim: usize },
}

pub type Result<T> = std::result::Result<T, KDIndexError>;
