use log::warn;
use nalgebra::{DMatrix, DVector, stack};
use num_complex::Complex64;
/// In mathematics, the Rouché–Capelli theorem is a fundamental result in linear algebra. It gives a necessary and sufficient condition for a system of
/// linear equations to have a solution: the system Ax = b has a solution if and only if the rank of A is equal to the rank of the augmented matrix [A b].
/// Here the ranks are computed over the complex field with an SVD.
pub fn Rouche_Capelli_theorem(A: &DMatrix<Complex64>, b: &DVector<Complex64>) -> bool {
    let Ab: DMatrix<Complex64> = stack![A, b];
    let eps = 1e-10; // tolerance for rank calculation
    let rank_A = A.rank(eps);
    let rank_Ab = Ab.rank(eps);

    let result = rank_A == rank_Ab;
    if !result {
        warn!(
            "The system has no solution. rank(A) = {} != rank([A b]) = {}",
            rank_A, rank_Ab
        );
    }
    result
}

pub fn is_singular(A: &DMatrix<Complex64>, epsilon: f64) -> bool {
    let det = A.determinant();
    let is_singular = det.norm() < epsilon; // tolerance for singularity check
    if is_singular {
        warn!("Matrix is singular. |Determinant| = {:.8}", det.norm());
    }
    is_singular
}

/// ratio of the largest singular value to the smallest one; infinite for a singular matrix
pub fn condition_number(A: &DMatrix<Complex64>) -> f64 {
    if A.is_empty() {
        return 1.0;
    }
    let singular_values = A.singular_values();
    let max_sigma = singular_values.iter().cloned().fold(0.0, f64::max);
    let min_sigma = singular_values.iter().cloned().fold(f64::INFINITY, f64::min);
    max_sigma / min_sigma
}

/// A system of linear equations is said to be poorly conditioned if the solution is sensitive to small changes in the input data,
/// i.e. its condition number exceeds `threshold`.
pub fn poorly_conditioned(A: &DMatrix<Complex64>, threshold: f64) -> bool {
    let condition_number = condition_number(A);
    let poorly_conditioned = condition_number > threshold; // tolerance for condition number check
    if poorly_conditioned {
        warn!(
            "The system of linear equations is poorly conditioned. Condition number = {:.2}",
            condition_number
        );
    }
    poorly_conditioned
}

/// Euclidean norm of A·x − b
pub fn residual_norm(A: &DMatrix<Complex64>, x: &DVector<Complex64>, b: &DVector<Complex64>) -> f64 {
    (A * x - b).norm()
}

pub fn linear_system_diagnostics(A: &DMatrix<Complex64>, b: &DVector<Complex64>, threshold: f64) -> bool {
    // Check if the system of linear equations has a solution using the Rouché-Capelli theorem and the condition number of the coefficient matrix.
    if Rouche_Capelli_theorem(A, b) {
        if poorly_conditioned(A, threshold) {
            warn!(
                "The system of linear equations has a solution and the coefficient matrix is poorly conditioned."
            );
            false
        } else {
            true
        }
    } else {
        warn!("The system of linear equations does not have a solution.");
        false
    }
}
