//! Trait implementations for plain `Vec<T>` vectors.
//!
//! Inner products and norms are deliberately sequential even when the `rayon`
//! feature is enabled: the CG recurrence is reproducible only if the summation
//! order of its dot products is fixed. Row-parallelism lives in
//! `CsrMatrix::spmv_parallel`, where each row keeps its own accumulator.

use crate::core::traits::InnerProduct;
use num_traits::Float;

impl<T: Float> InnerProduct<Vec<T>> for () {
    type Scalar = T;

    /// Computes the dot product of two vectors: `xᵀ y`.
    fn dot(&self, x: &Vec<T>, y: &Vec<T>) -> T {
        assert_eq!(x.len(), y.len(), "Vectors must have the same length");
        x.iter()
            .zip(y.iter())
            .map(|(xi, yi)| *xi * *yi)
            .fold(T::zero(), |acc, v| acc + v)
    }

    /// Computes the Euclidean norm of a vector: `‖x‖₂`.
    fn norm(&self, x: &Vec<T>) -> T {
        x.iter()
            .map(|xi| *xi * *xi)
            .fold(T::zero(), |acc, v| acc + v)
            .sqrt()
    }
}
