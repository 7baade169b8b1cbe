//! Dictionary-of-keys (DOK) builder for assembling sparse matrices.
//!
//! A `DokMatrix` collects entries one at a time and converts to compressed-row
//! form once assembly is done. Entries are keyed on `(row, col)`, so the
//! emitted CSR is row-major with sorted columns.

use std::collections::BTreeMap;

use num_traits::Float;

use crate::matrix::CsrMatrix;

/// A mutable entry-at-a-time matrix builder.
#[derive(Debug, Clone)]
pub struct DokMatrix<T> {
    nrows: usize,
    ncols: usize,
    entries: BTreeMap<(usize, usize), T>,
}

impl<T: Float> DokMatrix<T> {
    /// An empty `nrows` × `ncols` builder.
    pub fn new(nrows: usize, ncols: usize) -> Self {
        Self { nrows, ncols, entries: BTreeMap::new() }
    }

    /// Store `value` at `(row, col)`. A later `set` for the same position
    /// replaces the earlier one; explicitly stored zeros are kept.
    ///
    /// # Panics
    /// Panics if the position lies outside the matrix.
    pub fn set(&mut self, row: usize, col: usize, value: T) {
        assert!(
            row < self.nrows && col < self.ncols,
            "entry ({row}, {col}) outside {}x{} matrix",
            self.nrows,
            self.ncols
        );
        self.entries.insert((row, col), value);
    }

    /// Stored value at `(row, col)`, if any.
    pub fn get(&self, row: usize, col: usize) -> Option<T> {
        self.entries.get(&(row, col)).copied()
    }

    pub fn nrows(&self) -> usize {
        self.nrows
    }

    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Number of stored entries.
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    /// Convert to compressed-row form.
    pub fn to_csr(&self) -> CsrMatrix<T> {
        let nnz = self.entries.len();
        let mut row_ptr = vec![0usize; self.nrows + 1];
        let mut col_idx = Vec::with_capacity(nnz);
        let mut values = Vec::with_capacity(nnz);
        // BTreeMap iterates (row, col) keys in row-major order.
        for (&(row, col), &v) in &self.entries {
            row_ptr[row + 1] += 1;
            col_idx.push(col);
            values.push(v);
        }
        for i in 0..self.nrows {
            row_ptr[i + 1] += row_ptr[i];
        }
        CsrMatrix::from_parts(self.nrows, self.ncols, row_ptr, col_idx, values)
    }
}
