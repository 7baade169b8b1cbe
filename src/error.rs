use thiserror::Error;

// Unified error type for krylu

#[derive(Error, Debug)]
pub enum KError {
    #[error("matrix is not square ({nrows}x{ncols})")]
    NotSquare { nrows: usize, ncols: usize },
    #[error("dimension mismatch: expected length {expected}, got {found}")]
    DimensionMismatch { expected: usize, found: usize },
    #[error("singular matrix: pivot {pivot:e} at column {column}")]
    SingularMatrix { column: usize, pivot: f64 },
    #[error("no cached factorization; call solve first")]
    NotFactored,
    #[error("invalid sparse structure: {0}")]
    InvalidStructure(String),
}
