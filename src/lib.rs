//! krylu: sparse CG and LU solvers over compressed-row storage
//!
//! This crate solves square sparse linear systems `A·x = b` through two
//! independent paths: an iterative Conjugate Gradient solver for symmetric
//! positive-definite matrices, and a direct sparse LU factorization with
//! partial pivoting whose factors can be reused across right-hand sides.

pub mod config;
pub mod core;
pub mod error;
pub mod matrix;
pub mod solver;
pub mod utils;

// Re-exports for convenience
pub use crate::config::*;
pub use crate::core::*;
pub use crate::error::*;
pub use crate::matrix::*;
pub use crate::solver::*;

// Re-export the convergence types at the crate root for convenience
pub use crate::utils::convergence::{Convergence, SolveStats};
