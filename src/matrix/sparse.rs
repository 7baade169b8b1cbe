//! Compressed-row (CSR) sparse matrix storage.

use std::fmt;

use num_traits::Float;

use crate::core::traits::{MatShape, MatVec};
use crate::error::KError;

/// An owned compressed-row sparse matrix.
///
/// Row `i` occupies the half-open range `row_ptr[i]..row_ptr[i+1]` of the
/// parallel `col_idx`/`values` arrays. Columns within a row need not be
/// sorted (consumers scan linearly), but a row must not name the same
/// column twice. The solvers treat the matrix as read-only input.
#[derive(Debug, Clone)]
pub struct CsrMatrix<T> {
    nrows: usize,
    ncols: usize,
    row_ptr: Vec<usize>,
    col_idx: Vec<usize>,
    values: Vec<T>,
}

impl<T: Float> CsrMatrix<T> {
    /// Build a CSR matrix from raw row-pointer, column-index, and value
    /// arrays, validating the structure.
    pub fn from_csr(
        nrows: usize,
        ncols: usize,
        row_ptr: Vec<usize>,
        col_idx: Vec<usize>,
        values: Vec<T>,
    ) -> Result<Self, KError> {
        if row_ptr.len() != nrows + 1 {
            return Err(KError::InvalidStructure(format!(
                "row_ptr has {} entries, expected {}",
                row_ptr.len(),
                nrows + 1
            )));
        }
        if row_ptr[0] != 0 {
            return Err(KError::InvalidStructure(format!(
                "row_ptr must start at 0, got {}",
                row_ptr[0]
            )));
        }
        if row_ptr.windows(2).any(|w| w[1] < w[0]) {
            return Err(KError::InvalidStructure(
                "row_ptr is not non-decreasing".into(),
            ));
        }
        if col_idx.len() != values.len() {
            return Err(KError::InvalidStructure(format!(
                "col_idx has {} entries but values has {}",
                col_idx.len(),
                values.len()
            )));
        }
        if row_ptr[nrows] != col_idx.len() {
            return Err(KError::InvalidStructure(format!(
                "row_ptr ends at {} but there are {} stored entries",
                row_ptr[nrows],
                col_idx.len()
            )));
        }
        if let Some(&c) = col_idx.iter().find(|&&c| c >= ncols) {
            return Err(KError::InvalidStructure(format!(
                "column index {c} out of bounds for {ncols} columns"
            )));
        }
        for i in 0..nrows {
            let cols = &col_idx[row_ptr[i]..row_ptr[i + 1]];
            for (k, &c) in cols.iter().enumerate() {
                if cols[k + 1..].contains(&c) {
                    return Err(KError::InvalidStructure(format!(
                        "row {i} stores column {c} twice"
                    )));
                }
            }
        }
        Ok(Self { nrows, ncols, row_ptr, col_idx, values })
    }

    /// Construct from arrays already known to be valid (crate-internal
    /// producers, currently the DOK builder).
    pub(crate) fn from_parts(
        nrows: usize,
        ncols: usize,
        row_ptr: Vec<usize>,
        col_idx: Vec<usize>,
        values: Vec<T>,
    ) -> Self {
        debug_assert_eq!(row_ptr.len(), nrows + 1);
        debug_assert_eq!(*row_ptr.last().unwrap(), values.len());
        Self { nrows, ncols, row_ptr, col_idx, values }
    }

    /// Number of rows.
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Number of columns.
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Number of stored entries.
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    pub fn is_square(&self) -> bool {
        self.nrows == self.ncols
    }

    /// Column indices and values of row `i`.
    pub fn row(&self, i: usize) -> (&[usize], &[T]) {
        let range = self.row_ptr[i]..self.row_ptr[i + 1];
        (&self.col_idx[range.clone()], &self.values[range])
    }

    /// The raw CSR arrays: `(row_ptr, col_idx, values)`.
    pub fn raw_parts(&self) -> (&[usize], &[usize], &[T]) {
        (&self.row_ptr, &self.col_idx, &self.values)
    }

    /// Stored value at `(row, col)`, if any.
    pub fn get(&self, row: usize, col: usize) -> Option<T> {
        let (cols, vals) = self.row(row);
        cols.iter().position(|&c| c == col).map(|k| vals[k])
    }

    /// Compute `y = A · x`, accumulating each row in storage order.
    pub fn spmv(&self, x: &[T], y: &mut [T]) {
        assert_eq!(x.len(), self.ncols());
        assert_eq!(y.len(), self.nrows());
        for i in 0..self.nrows {
            let mut sum = T::zero();
            for kk in self.row_ptr[i]..self.row_ptr[i + 1] {
                sum = sum + self.values[kk] * x[self.col_idx[kk]];
            }
            y[i] = sum;
        }
    }
}

#[cfg(feature = "rayon")]
use rayon::prelude::*;

#[cfg(feature = "rayon")]
impl<T: Float + Send + Sync> CsrMatrix<T> {
    /// Parallel SpMV using Rayon.
    ///
    /// Rows are distributed across threads; each row keeps a private
    /// accumulator and sums its entries in storage order, so the result is
    /// bit-identical to [`CsrMatrix::spmv`].
    pub fn spmv_parallel(&self, x: &[T], y: &mut [T]) {
        assert_eq!(x.len(), self.ncols());
        assert_eq!(y.len(), self.nrows());
        y.par_iter_mut().enumerate().for_each(|(i, yi)| {
            let mut sum = T::zero();
            for kk in self.row_ptr[i]..self.row_ptr[i + 1] {
                sum = sum + self.values[kk] * x[self.col_idx[kk]];
            }
            *yi = sum;
        });
    }
}

impl<T: Float> MatVec<Vec<T>> for CsrMatrix<T> {
    fn matvec(&self, x: &Vec<T>, y: &mut Vec<T>) {
        self.spmv(x, y);
    }
}

impl<T> MatShape for CsrMatrix<T> {
    fn nrows(&self) -> usize {
        self.nrows
    }
    fn ncols(&self) -> usize {
        self.ncols
    }
}

/// Dense-style diagnostic rendering: one row per line, stored entries with
/// four decimals, `*.****` where no entry is stored.
impl<T: Float + fmt::Display> fmt::Display for CsrMatrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.nrows {
            for j in 0..self.ncols {
                match self.get(i, j) {
                    Some(v) => write!(f, "{v:.4}  ")?,
                    None => write!(f, "*.****  ")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
