//! Direct sparse solver: LU factorization with partial pivoting.
//!
//! The factorization is column-oriented (left-looking) Doolittle elimination
//! over compressed-row storage. Each column of the input is gathered into a
//! dense working vector, eliminated against the rows finalized so far, and
//! appended to growable per-row lists that are flattened into a single
//! compressed-row factor store at the end. Fill-in appears naturally as new
//! entries in those lists; the pivot is the remaining entry of largest
//! magnitude in the current column.
//!
//! # References
//! - Golub & Van Loan, Matrix Computations, ch. 3
//! - Davis, Direct Methods for Sparse Linear Systems

use num_traits::{Float, ToPrimitive};

use crate::config::LuOptions;
use crate::error::KError;
use crate::matrix::CsrMatrix;
use crate::solver::LinearSolver;
use crate::utils::convergence::SolveStats;

/// Combined L/U factors of a row-permuted sparse matrix.
///
/// Stored as one compressed-row matrix over the *permuted* row order: within
/// factored row `i`, entries with column `< i` belong to L (unit diagonal
/// implicit) and entries with column `>= i` belong to U, the diagonal being
/// the pivot value. Entries within a row are sorted by ascending column.
/// Only [`factorize`] constructs this type, so every row's diagonal is
/// present and nonzero.
#[derive(Debug, Clone)]
pub struct LuFactors<T> {
    n: usize,
    row_ptr: Vec<usize>,
    col_idx: Vec<usize>,
    values: Vec<T>,
    row_perm: Vec<usize>,
}

impl<T: Float> LuFactors<T> {
    /// Dimension of the factored system.
    pub fn dim(&self) -> usize {
        self.n
    }

    /// Number of stored factor entries (at least the input's, fill included).
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// The row permutation: `row_perm()[i]` is the original row that was
    /// moved into factored position `i`. Always a bijection on `0..dim()`.
    pub fn row_perm(&self) -> &[usize] {
        &self.row_perm
    }

    /// Solve the factored system for one right-hand side.
    ///
    /// Permutes `b` into factored-row order, forward-substitutes through L,
    /// backward-substitutes through U, and returns the solution in original
    /// index order. A pure function of `(self, b)`; call it as many times as
    /// there are right-hand sides.
    pub fn solve(&self, b: &[T]) -> Result<Vec<T>, KError> {
        let n = self.n;
        if b.len() != n {
            return Err(KError::DimensionMismatch { expected: n, found: b.len() });
        }

        // Forward substitution: L y = P b, unit diagonal implicit.
        let mut y = vec![T::zero(); n];
        for row in 0..n {
            let mut v = b[self.row_perm[row]];
            for kk in self.row_ptr[row]..self.row_ptr[row + 1] {
                let c = self.col_idx[kk];
                if c >= row {
                    // Columns are sorted; everything from here on is U.
                    break;
                }
                v = v - self.values[kk] * y[c];
            }
            y[row] = v;
        }

        // Backward substitution: U x = y.
        let mut x = vec![T::zero(); n];
        for row in (0..n).rev() {
            let start = self.row_ptr[row];
            let end = self.row_ptr[row + 1];
            let diag = (start..end)
                .find(|&kk| self.col_idx[kk] == row)
                .ok_or(KError::SingularMatrix { column: row, pivot: 0.0 })?;
            let mut v = y[row];
            for kk in diag + 1..end {
                v = v - self.values[kk] * x[self.col_idx[kk]];
            }
            x[row] = v / self.values[diag];
        }
        Ok(x)
    }
}

/// Factor a square sparse matrix into combined L/U form with partial
/// pivoting.
///
/// Fails with [`KError::SingularMatrix`] when the best available pivot of
/// some column has magnitude at or below `opts.pivot_tol`, and with
/// [`KError::NotSquare`] for rectangular input.
pub fn factorize<T: Float>(a: &CsrMatrix<T>, opts: &LuOptions<T>) -> Result<LuFactors<T>, KError> {
    if !a.is_square() {
        return Err(KError::NotSquare { nrows: a.nrows(), ncols: a.ncols() });
    }
    let n = a.nrows();
    let (ap, ai, ax) = a.raw_parts();

    let mut row_perm: Vec<usize> = (0..n).collect();
    // Growable per-row entry lists, flattened into CSR once sizes are known.
    let mut rows: Vec<Vec<(usize, T)>> = vec![Vec::new(); n];
    let mut gathered = vec![T::zero(); n];
    let mut work = vec![T::zero(); n];
    let mut nnz = 0usize;

    for col in 0..n {
        // Gather column `col` of the original matrix, then apply the row
        // permutation accumulated by earlier pivot swaps.
        for y in 0..n {
            gathered[y] = T::zero();
            for kk in ap[y]..ap[y + 1] {
                if ai[kk] == col {
                    gathered[y] = ax[kk];
                    break;
                }
            }
        }
        for y in 0..n {
            work[y] = gathered[row_perm[y]];
        }

        // Solve the column against the finalized upper-left block: only
        // factor entries left of the diagonal participate.
        for y in 0..=col {
            let mut v = work[y];
            for &(c, f) in &rows[y] {
                if c < y {
                    v = v - f * work[c];
                }
            }
            work[y] = v;
        }

        // Schur-complement updates for the rows below, tracking the largest
        // magnitude as pivot. Strict `>` keeps the lowest-index candidate on
        // ties, the diagonal itself being the initial one.
        let mut big = work[col].abs();
        let mut piv = col;
        for y in col + 1..n {
            let mut v = work[y];
            for &(c, f) in &rows[y] {
                if c < col {
                    v = v - f * work[c];
                }
            }
            work[y] = v;
            if v.abs() > big {
                big = v.abs();
                piv = y;
            }
        }

        let pivot = work[piv];
        if pivot.abs() <= opts.pivot_tol {
            return Err(KError::SingularMatrix {
                column: col,
                pivot: pivot.to_f64().unwrap_or(f64::NAN),
            });
        }

        // Scale the eliminated part by 1/pivot; the pivot row itself keeps
        // its unscaled value, which becomes the stored U diagonal.
        let coef = pivot.recip();
        for y in col..n {
            work[y] = work[y] * coef;
        }
        work[piv] = pivot;

        // The swap is permanent for every subsequent column.
        if piv != col {
            work.swap(col, piv);
            rows.swap(col, piv);
            row_perm.swap(col, piv);
        }

        for (y, row) in rows.iter_mut().enumerate() {
            if work[y] != T::zero() {
                nnz += 1;
                row.push((col, work[y]));
            }
        }
    }

    // Flatten the per-row lists into compressed-row arrays.
    let mut row_ptr = Vec::with_capacity(n + 1);
    let mut col_idx = Vec::with_capacity(nnz);
    let mut values = Vec::with_capacity(nnz);
    row_ptr.push(0);
    for row in &rows {
        for &(c, v) in row {
            col_idx.push(c);
            values.push(v);
        }
        row_ptr.push(col_idx.len());
    }

    Ok(LuFactors { n, row_ptr, col_idx, values, row_perm })
}

/// Direct solver front-end that caches its factorization for reuse.
pub struct SparseLuSolver<T> {
    pub opts: LuOptions<T>,
    factors: Option<LuFactors<T>>,
}

impl<T: Float> SparseLuSolver<T> {
    /// Create a new LU solver (no factorization yet).
    pub fn new() -> Self {
        Self { opts: LuOptions::default(), factors: None }
    }

    pub fn with_options(opts: LuOptions<T>) -> Self {
        Self { opts, factors: None }
    }

    /// Cached factors from the most recent `solve`, if any.
    pub fn factors(&self) -> Option<&LuFactors<T>> {
        self.factors.as_ref()
    }

    /// Solve for a new right-hand side using the cached factorization.
    pub fn solve_cached(&self, b: &[T]) -> Result<Vec<T>, KError> {
        match &self.factors {
            Some(f) => f.solve(b),
            None => Err(KError::NotFactored),
        }
    }
}

impl<T: Float> LinearSolver<CsrMatrix<T>, Vec<T>> for SparseLuSolver<T> {
    type Error = KError;
    type Scalar = T;

    /// Factorize `a` (replacing any cached factors), then triangular-solve.
    fn solve(
        &mut self,
        a: &CsrMatrix<T>,
        b: &Vec<T>,
        x: &mut Vec<T>,
    ) -> Result<SolveStats<T>, KError> {
        if b.len() != a.nrows() {
            return Err(KError::DimensionMismatch { expected: a.nrows(), found: b.len() });
        }
        let factors = factorize(a, &self.opts)?;
        *x = factors.solve(b)?;
        self.factors = Some(factors);
        // Direct solve: one pass, exact up to rounding.
        Ok(SolveStats { iterations: 1, final_residual: T::zero(), converged: true })
    }
}

impl<T: Float> Default for SparseLuSolver<T> {
    fn default() -> Self {
        Self::new()
    }
}
