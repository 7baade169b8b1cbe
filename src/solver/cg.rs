//! Conjugate Gradient (unpreconditioned) per Saad §6.1.
//!
//! Assumes (and does not verify) a symmetric positive-definite matrix; on
//! anything else the iteration may diverge or produce non-finite values.
//! The stopping test compares the squared residual norm `r·r` against the
//! tolerance directly; no square root is taken.

use crate::core::traits::{InnerProduct, MatShape, MatVec};
use crate::error::KError;
use crate::solver::LinearSolver;
use crate::utils::convergence::{Convergence, SolveStats};

pub struct CgSolver<T> {
    pub conv: Convergence<T>,
}

impl<T: Copy + num_traits::Float> CgSolver<T> {
    pub fn new(tol: T, max_iters: usize) -> Self {
        Self { conv: Convergence { tol, max_iters } }
    }
}

impl<M, T> LinearSolver<M, Vec<T>> for CgSolver<T>
where
    M: MatVec<Vec<T>> + MatShape,
    (): InnerProduct<Vec<T>, Scalar = T>,
    T: num_traits::Float,
{
    type Error = KError;
    type Scalar = T;

    fn solve(&mut self, a: &M, b: &Vec<T>, x: &mut Vec<T>) -> Result<SolveStats<T>, KError> {
        let n = a.nrows();
        if n != a.ncols() {
            return Err(KError::NotSquare { nrows: n, ncols: a.ncols() });
        }
        if b.len() != n {
            return Err(KError::DimensionMismatch { expected: n, found: b.len() });
        }
        if x.len() != n {
            return Err(KError::DimensionMismatch { expected: n, found: x.len() });
        }
        let ip = ();

        // r = b - A x; callers normally pass x = 0, making r = b.
        let mut r = vec![T::zero(); n];
        a.matvec(x, &mut r);
        for (ri, bi) in r.iter_mut().zip(b) {
            *ri = *bi - *ri;
        }
        let mut d = r.clone();
        let mut q = vec![T::zero(); n];

        let mut delta_new = ip.dot(&r, &r);
        // An SPD system of dimension n converges in at most n steps in exact
        // arithmetic, so the budget never exceeds the dimension.
        let budget = self.conv.max_iters.min(n);
        let mut iterations = 0;

        while iterations < budget && delta_new > self.conv.tol {
            a.matvec(&d, &mut q);
            let alpha = delta_new / ip.dot(&d, &q);
            for (xj, dj) in x.iter_mut().zip(&d) {
                *xj = *xj + alpha * *dj;
            }
            for (rj, qj) in r.iter_mut().zip(&q) {
                *rj = *rj - alpha * *qj;
            }
            let delta_old = delta_new;
            delta_new = ip.dot(&r, &r);
            let beta = delta_new / delta_old;
            for (dj, rj) in d.iter_mut().zip(&r) {
                *dj = *rj + beta * *dj;
            }
            iterations += 1;
        }

        // Whether or not the residual threshold was reached, `x` holds the
        // best available approximation; the stats say which case applies.
        let (_, stats) = self.conv.check(delta_new, iterations);
        Ok(stats)
    }
}
