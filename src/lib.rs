#![doc = include_str!("../README.md")]

pub mod entry;
mod error;
pub mod kdtree;
mod r#trait;
mod r#type;

pub use entry::{PointEntry, PointEntryDist};
pub use error::{KDIndexError, Result};
pub use r#trait::PointIndex;
pub use r#type::CoordNum;

#[cfg(test)]
pub(crate) mod test;
