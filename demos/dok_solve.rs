use krylu::matrix::DokMatrix;
use krylu::solver::{CgSolver, LinearSolver, SparseLuSolver};

fn main() {
    // Assemble a 5x5 system through the DOK builder:
    //       2  3  0  0  0        8
    //       3  0  4  0  6       45
    // A =   0 -1 -3  2  0    b =-3
    //       0  0  1  0  0        3
    //       0  4  2  0  1       19
    let mut dok = DokMatrix::new(5, 5);
    dok.set(0, 0, 2.0);
    dok.set(0, 1, 3.0);
    dok.set(1, 0, 3.0);
    dok.set(1, 2, 4.0);
    dok.set(1, 4, 6.0);
    dok.set(2, 1, -1.0);
    dok.set(2, 2, -3.0);
    dok.set(2, 3, 2.0);
    dok.set(3, 2, 1.0);
    dok.set(4, 1, 4.0);
    dok.set(4, 2, 2.0);
    dok.set(4, 4, 1.0);
    let a = dok.to_csr();
    print!("{a}");

    let b = vec![8.0, 45.0, -3.0, 3.0, 19.0];

    // Direct solve: factorize once, reusable across right-hand sides.
    let mut lus = SparseLuSolver::new();
    let mut x = vec![0.0; 5];
    let stats_lu = lus.solve(&a, &b, &mut x).unwrap();
    println!("LU x = {:?}, stats = {:?}", x, stats_lu);

    // Iterative solve: best effort, since this matrix is not symmetric.
    let mut cg = CgSolver::new(1e-8, 1000);
    let mut x = vec![0.0; 5];
    let stats_cg = cg.solve(&a, &b, &mut x).unwrap();
    println!("CG x = {:?}, stats = {:?}", x, stats_cg);
}
