use std::fmt::Debug;

use num_traits::Float;

/// A trait for types that can be used as point coordinates.
///
/// This trait is sealed and cannot be implemented for external types. Only the IEEE floating
/// point types are supported: distances are reported as true Euclidean distances, and window
/// queries accept infinite bounds.
pub trait CoordNum: private::Sealed + Float + Debug + Send + Sync + 'static {}

impl CoordNum for f32 {}

impl CoordNum for f64 {}

// https://rust-lang.github.io/api-guidelines/future-proofing.html#sealed-traits-protect-against-downstream-implementations-c-sealed
mod private {
    pub trait Sealed {}

    impl Sealed for f32 {}
    impl Sealed for f64 {}
}
