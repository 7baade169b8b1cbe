//! Core traits and their implementations for plain vectors.

pub mod traits;
pub mod wrappers;

pub use traits::{InnerProduct, MatShape, MatVec};
