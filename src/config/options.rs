//! Options for the direct solver.
//!
//! This module provides the `LuOptions` struct, which carries the tunable
//! parameters of the sparse LU factorization. Currently that is the pivot
//! threshold below which a column is declared singular.

/// Direct-solver parameters.
#[derive(Debug, Clone)]
pub struct LuOptions<T> {
    /// Pivot magnitudes at or below this threshold fail the factorization
    /// with a singular-matrix error. Zero rejects only an exactly-zero
    /// pivot; pass a small epsilon for near-singular protection.
    pub pivot_tol: T,
}

impl<T: num_traits::Float> Default for LuOptions<T> {
    fn default() -> Self {
        Self { pivot_tol: T::zero() }
    }
}
