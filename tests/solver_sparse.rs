//! Cross-checks of the two solve paths on sparse systems.
//!
//! The iterative path (Conjugate Gradient) and the direct path (sparse LU
//! with partial pivoting) must agree on well-conditioned SPD systems, and
//! the direct path must agree with faer's dense full-pivot LU used as an
//! oracle.

use approx::assert_abs_diff_eq;
use faer::Mat;
use faer::linalg::solvers::SolveCore;
use krylu::matrix::{CsrMatrix, DokMatrix};
use krylu::solver::{CgSolver, LinearSolver, SparseLuSolver, factorize};
use krylu::{KError, LuOptions};
use rand::Rng;

/// Generate a random SPD system `A = MᵀM + I` in CSR form plus a random
/// right-hand side, along with the dense copy faer solves as oracle.
fn random_spd_csr(n: usize) -> (CsrMatrix<f64>, Mat<f64>, Vec<f64>) {
    let mut rng = rand::thread_rng();
    let data: Vec<f64> = (0..n * n).map(|_| rng.r#gen()).collect();
    let m = Mat::from_fn(n, n, |i, j| data[j * n + i]);
    let m_t = m.transpose();
    let a = &m_t * &m + Mat::<f64>::identity(n, n);
    let mut dok = DokMatrix::new(n, n);
    for i in 0..n {
        for j in 0..n {
            dok.set(i, j, a[(i, j)]);
        }
    }
    let b: Vec<f64> = (0..n).map(|_| rng.r#gen()).collect();
    (dok.to_csr(), a, b)
}

fn faer_solve(a: &Mat<f64>, b: &[f64]) -> Vec<f64> {
    let n = b.len();
    let mut x = b.to_vec();
    let lus = faer::linalg::solvers::FullPivLu::new(a.as_ref());
    let x_mat = faer::MatMut::from_column_major_slice_mut(&mut x, n, 1);
    lus.solve_in_place_with_conj(faer::Conj::No, x_mat);
    x
}

/// The 5×5 system from the `dok_solve` demo.
fn sample_5x5() -> (CsrMatrix<f64>, Vec<f64>) {
    let a = CsrMatrix::from_csr(
        5,
        5,
        vec![0, 2, 5, 8, 9, 12],
        vec![0, 1, 0, 2, 4, 1, 2, 3, 2, 1, 2, 4],
        vec![2.0, 3.0, 3.0, 4.0, 6.0, -1.0, -3.0, 2.0, 1.0, 4.0, 2.0, 1.0],
    )
    .unwrap();
    (a, vec![8.0, 45.0, -3.0, 3.0, 19.0])
}

#[test]
fn direct_solves_the_5x5_driver_system() {
    let (a, b) = sample_5x5();
    let mut solver = SparseLuSolver::new();
    let mut x = vec![0.0; 5];
    let stats = solver.solve(&a, &b, &mut x).unwrap();
    assert!(stats.converged);
    for (xi, ei) in x.iter().zip([1.0, 2.0, 3.0, 4.0, 5.0]) {
        assert_abs_diff_eq!(*xi, ei, epsilon = 1e-6);
    }
}

#[test]
fn cg_runs_out_its_budget_on_the_non_symmetric_5x5() {
    // The demo matrix is not symmetric, so CG carries no convergence
    // guarantee here; it must still return a best-effort vector and say the
    // threshold was not reached.
    let (a, b) = sample_5x5();
    let mut solver = CgSolver::new(1e-8, 1000);
    let mut x = vec![0.0; 5];
    let stats = solver.solve(&a, &b, &mut x).unwrap();
    assert_eq!(stats.iterations, 5);
    assert!(!stats.converged);
    assert!(x.iter().all(|xi| xi.is_finite()));
}

#[test]
fn cg_vs_direct_on_sparse_spd() {
    let n = 10;
    let (a_csr, a_dense, b) = random_spd_csr(n);
    let mut x_cg = vec![0.0; n];
    let mut cg = CgSolver::new(1e-16, 1000);
    cg.solve(&a_csr, &b, &mut x_cg).unwrap();

    let lu = factorize(&a_csr, &LuOptions::default()).unwrap();
    let x_lu = lu.solve(&b).unwrap();

    let x_oracle = faer_solve(&a_dense, &b);
    for i in 0..n {
        assert_abs_diff_eq!(x_cg[i], x_lu[i], epsilon = 1e-6);
        assert_abs_diff_eq!(x_lu[i], x_oracle[i], epsilon = 1e-8);
    }
}

#[test]
fn cg_vs_direct_on_a_laplacian() {
    // 1-D Dirichlet Laplacian: tridiagonal (-1, 2, -1), SPD, genuinely
    // sparse, with a known exact solve path ordering (no pivoting needed).
    let n = 10;
    let mut dok = DokMatrix::new(n, n);
    for i in 0..n {
        dok.set(i, i, 2.0);
        if i > 0 {
            dok.set(i, i - 1, -1.0);
        }
        if i < n - 1 {
            dok.set(i, i + 1, -1.0);
        }
    }
    let a = dok.to_csr();
    let x_true: Vec<f64> = (1..=n).map(|v| v as f64).collect();
    let mut b = vec![0.0; n];
    a.spmv(&x_true, &mut b);

    let mut x_cg = vec![0.0; n];
    let mut cg = CgSolver::new(1e-12, 1000);
    let stats = cg.solve(&a, &b, &mut x_cg).unwrap();
    assert!(stats.converged);
    assert!(stats.iterations <= n);

    let lu = factorize(&a, &LuOptions::default()).unwrap();
    let x_lu = lu.solve(&b).unwrap();

    for i in 0..n {
        assert_abs_diff_eq!(x_cg[i], x_true[i], epsilon = 1e-5);
        assert_abs_diff_eq!(x_lu[i], x_true[i], epsilon = 1e-10);
    }
}

#[test]
fn factors_are_reusable_across_right_hand_sides() {
    let n = 8;
    let (a_csr, a_dense, _) = random_spd_csr(n);
    let lu = factorize(&a_csr, &LuOptions::default()).unwrap();
    let mut rng = rand::thread_rng();
    for _ in 0..3 {
        let b: Vec<f64> = (0..n).map(|_| rng.r#gen()).collect();
        let x = lu.solve(&b).unwrap();
        let x_oracle = faer_solve(&a_dense, &b);
        for i in 0..n {
            assert_abs_diff_eq!(x[i], x_oracle[i], epsilon = 1e-8);
        }
    }
}

#[test]
fn row_perm_is_a_bijection_on_random_input() {
    let n = 12;
    let (a_csr, _, _) = random_spd_csr(n);
    let lu = factorize(&a_csr, &LuOptions::default()).unwrap();
    let mut seen = lu.row_perm().to_vec();
    seen.sort_unstable();
    assert_eq!(seen, (0..n).collect::<Vec<_>>());
}

#[test]
fn both_paths_solve_a_1x1_system() {
    let a = CsrMatrix::from_csr(1, 1, vec![0, 1], vec![0], vec![4.0]).unwrap();
    let b = vec![8.0];

    let lu = factorize(&a, &LuOptions::default()).unwrap();
    assert_abs_diff_eq!(lu.solve(&b).unwrap()[0], 2.0, epsilon = 1e-12);

    let mut x = vec![0.0];
    let mut cg = CgSolver::new(1e-8, 10);
    let stats = cg.solve(&a, &b, &mut x).unwrap();
    assert!(stats.converged);
    assert_abs_diff_eq!(x[0], 2.0, epsilon = 1e-12);
}

#[test]
fn singular_input_fails_the_direct_path_only() {
    let a = CsrMatrix::from_csr(1, 1, vec![0, 1], vec![0], vec![0.0]).unwrap();
    let b = vec![3.0];

    let err = factorize(&a, &LuOptions::default()).unwrap_err();
    assert!(matches!(err, KError::SingularMatrix { .. }));

    // CG does not special-case the zero diagonal: no error, just a
    // non-converged report.
    let mut x = vec![0.0];
    let mut cg = CgSolver::new(1e-8, 10);
    let stats = cg.solve(&a, &b, &mut x).unwrap();
    assert!(!stats.converged);
}
