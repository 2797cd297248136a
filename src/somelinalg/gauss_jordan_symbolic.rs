//! # Simplified Gauss-Jordan elimination over expressions
//!
//! Solves `A·x = b` where the entries of `A` and `b` are `Expression`s. Only `add`, `subtract`,
//! `multiply` and `divide` of the algebra are used, so the result is a vector of expressions
//! that can be evaluated again whenever the values of their leaves change.
//!
//! Only the operations whose results are needed later are performed:
//! - forward elimination brings the matrix into reduced triangular form (ones on the diagonal);
//!   entries left of the diagonal are never touched again, so they are not computed
//! - backward elimination touches the free terms only
//!
//! A pivot whose current value is exactly zero is repaired by swapping in the first row below
//! it with a non-zero value in the same column. The pivots are chosen from the leaf values at
//! solve time, so the symbolic solution stays valid only while those pivots stay non-zero.
//!
//! # Example
//! ```
//! use RustedLinSolve::somelinalg::gauss_jordan_symbolic;
//! use RustedLinSolve::symbolic::expression::{Expression, evaluate_vector};
//! use RustedLinSolve::symbolic::variable::VariableSource;
//! use nalgebra::{DMatrix, DVector};
//! use num_complex::Complex64;
//! // g*x - y = 0, x + y = u
//! let g = VariableSource::labeled("g", Complex64::new(2.0, 0.0));
//! let u = VariableSource::labeled("u", Complex64::new(4.0, 0.0));
//! let mut a = DMatrix::from_row_slice(2, 2, &[
//!     Expression::from(&g), Expression::from(-1.0),
//!     Expression::from(1.0), Expression::from(1.0),
//! ]);
//! let mut b = DVector::from_vec(vec![Expression::from(0.0), Expression::from(&u)]);
//! gauss_jordan_symbolic::solve(&mut a, &mut b).unwrap();
//! let x = evaluate_vector(&b);
//! assert!((x[0] - Complex64::new(4.0 / 3.0, 0.0)).norm() < 1e-12);
//! // change the source and evaluate again without solving
//! u.set_value(Complex64::new(8.0, 0.0));
//! let x = evaluate_vector(&b);
//! assert!((x[1] - Complex64::new(16.0 / 3.0, 0.0)).norm() < 1e-12);
//! ```
use crate::somelinalg::linear_sys_error::LinearSystemError;
use crate::symbolic::complex_core::ComplexCore;
use crate::symbolic::expression::Expression;
use log::{debug, info, warn};
use nalgebra::{DMatrix, DVector};
use std::time::Instant;

/// Solves the system in place: on success `free_terms[i]` holds the solution expression for the
/// i-th variable. The coefficients are left in an intermediate state that has no further use.
pub fn solve(
    coefficients: &mut DMatrix<Expression>,
    free_terms: &mut DVector<Expression>,
) -> Result<(), LinearSystemError> {
    LinearSystemError::check_dimensions(coefficients.shape(), free_terms.len())?;
    let begin = Instant::now();
    info!(
        "symbolic Gauss-Jordan elimination of {} equations started",
        free_terms.len()
    );
    forward_elimination(coefficients, free_terms)?;
    backward_elimination(coefficients, free_terms);
    info!(
        "symbolic Gauss-Jordan elimination finished in {:?}, largest solution tree has {} nodes",
        begin.elapsed(),
        free_terms.iter().map(Expression::distinct_node_count).max().unwrap_or(0)
    );
    Ok(())
}

/// Owning form of [`solve`]: consumes the buffers and returns the solution vector.
pub fn solved(
    mut coefficients: DMatrix<Expression>,
    mut free_terms: DVector<Expression>,
) -> Result<DVector<Expression>, LinearSystemError> {
    solve(&mut coefficients, &mut free_terms)?;
    Ok(free_terms)
}

fn forward_elimination(
    coefficients: &mut DMatrix<Expression>,
    free_terms: &mut DVector<Expression>,
) -> Result<(), LinearSystemError> {
    let size = free_terms.len();
    for i in 0..size {
        repair_pivot(coefficients, free_terms, i)?;
        divide_row_by_diagonal(coefficients, free_terms, i);
        // entries below the pivot become zero "virtually": only columns right of it are updated
        for j in i + 1..size {
            let multiplier = coefficients[(j, i)].clone();
            subtract_rows(coefficients, free_terms, j, i, &multiplier, i + 1);
        }
    }
    Ok(())
}

fn backward_elimination(coefficients: &DMatrix<Expression>, free_terms: &mut DVector<Expression>) {
    let size = free_terms.len();
    for i in (0..size).rev() {
        for j in (0..i).rev() {
            free_terms[j] = free_terms[j].subtract(&free_terms[i].multiply(&coefficients[(j, i)]));
        }
    }
}

/// swaps in the first row below `row` whose entry in column `row` does not evaluate to exactly zero
fn repair_pivot(
    coefficients: &mut DMatrix<Expression>,
    free_terms: &mut DVector<Expression>,
    row: usize,
) -> Result<(), LinearSystemError> {
    if !coefficients[(row, row)].evaluate().is_exact_zero() {
        return Ok(());
    }
    let size = free_terms.len();
    match (row + 1..size).find(|&j| !coefficients[(j, row)].evaluate().is_exact_zero()) {
        Some(j) => {
            debug!("zero pivot in row {}, swapping with row {}", row, j);
            coefficients.swap_rows(row, j);
            free_terms.swap_rows(row, j);
            Ok(())
        }
        None => {
            warn!("no non-zero pivot found for row {}: system is singular", row);
            Err(LinearSystemError::SingularSystem { row })
        }
    }
}

fn divide_row_by_diagonal(
    coefficients: &mut DMatrix<Expression>,
    free_terms: &mut DVector<Expression>,
    row: usize,
) {
    let divider = coefficients[(row, row)].clone();
    for col in row..coefficients.ncols() {
        coefficients[(row, col)] = coefficients[(row, col)].divide(&divider);
    }
    free_terms[row] = free_terms[row].divide(&divider);
}

/// row[target] -= multiplier * row[source], for columns `start_col..` and the free term
fn subtract_rows(
    coefficients: &mut DMatrix<Expression>,
    free_terms: &mut DVector<Expression>,
    target: usize,
    source: usize,
    multiplier: &Expression,
    start_col: usize,
) {
    for col in start_col..coefficients.ncols() {
        coefficients[(target, col)] =
            coefficients[(target, col)].subtract(&coefficients[(source, col)].multiply(multiplier));
    }
    free_terms[target] = free_terms[target].subtract(&free_terms[source].multiply(multiplier));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::somelinalg::gauss_jordan_numeric;
    use crate::symbolic::expression::{constant_matrix, constant_vector, evaluate_vector};
    use crate::symbolic::variable::VariableSource;
    use approx::assert_relative_eq;
    use num_complex::Complex64;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    fn real_matrix(n: usize, values: &[f64]) -> DMatrix<Complex64> {
        DMatrix::from_row_slice(n, n, values).map(|v| c(v, 0.0))
    }

    fn real_vector(values: &[f64]) -> DVector<Complex64> {
        DVector::from_vec(values.iter().map(|&v| c(v, 0.0)).collect())
    }

    /// diagonally dominant complex system, never singular
    fn random_system(n: usize, seed: u64) -> (DMatrix<Complex64>, DVector<Complex64>) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut a = DMatrix::from_fn(n, n, |_, _| {
            c(rng.random_range(-1.0..1.0), rng.random_range(-1.0..1.0))
        });
        for i in 0..n {
            a[(i, i)] += c(n as f64, 0.0);
        }
        let b = DVector::from_fn(n, |_, _| {
            c(rng.random_range(-5.0..5.0), rng.random_range(-5.0..5.0))
        });
        (a, b)
    }

    #[test]
    fn test_solve_2x2() {
        // x + y = 3, x - y = 1
        let a = real_matrix(2, &[1.0, 1.0, 1.0, -1.0]);
        let b = real_vector(&[3.0, 1.0]);
        let x = solved(constant_matrix(&a), constant_vector(&b)).unwrap();
        let x = evaluate_vector(&x);
        assert_relative_eq!(x[0].re, 2.0, epsilon = 1e-12);
        assert_relative_eq!(x[1].re, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_matches_numeric_engine_on_random_systems() {
        for n in 1..=6 {
            let (a, b) = random_system(n, 42 + n as u64);
            let symbolic = evaluate_vector(&solved(constant_matrix(&a), constant_vector(&b)).unwrap());
            let numeric = gauss_jordan_numeric::solved(a.clone(), b.clone(), false).unwrap();
            for i in 0..n {
                assert!((symbolic[i] - numeric[i]).norm() < 1e-9, "n = {}, i = {}", n, i);
            }
        }
    }

    #[test]
    fn test_larger_system_evaluates_shared_subtrees_once() {
        // the tree expansion of these solutions is far beyond anything walkable
        let n = 12;
        let (a, b) = random_system(n, 7);
        let expressions = solved(constant_matrix(&a), constant_vector(&b)).unwrap();
        let largest = expressions
            .iter()
            .map(Expression::distinct_node_count)
            .max()
            .unwrap();
        assert!(largest < 1_000_000, "{} distinct nodes", largest);

        let symbolic = evaluate_vector(&expressions);
        let numeric = gauss_jordan_numeric::solved(a.clone(), b.clone(), false).unwrap();
        for i in 0..n {
            assert!((symbolic[i] - numeric[i]).norm() < 1e-9, "i = {}", i);
            assert!((expressions[i].evaluate() - numeric[i]).norm() < 1e-9, "i = {}", i);
        }
    }

    #[test]
    fn test_pivot_repair_swaps_rows() {
        // zero on the diagonal: 0*x + y = 2, x + y = 5
        let a = real_matrix(2, &[0.0, 1.0, 1.0, 1.0]);
        let b = real_vector(&[2.0, 5.0]);
        let x = evaluate_vector(&solved(constant_matrix(&a), constant_vector(&b)).unwrap());
        assert_relative_eq!(x[0].re, 3.0, epsilon = 1e-12);
        assert_relative_eq!(x[1].re, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_row_is_singular() {
        let a = real_matrix(3, &[1.0, 2.0, 3.0, 0.0, 0.0, 0.0, 4.0, 5.0, 7.0]);
        let b = real_vector(&[1.0, 0.0, 2.0]);
        let result = solved(constant_matrix(&a), constant_vector(&b));
        assert!(matches!(result, Err(LinearSystemError::SingularSystem { .. })));
    }

    #[test]
    fn test_dimension_errors_leave_buffers_untouched() {
        let mut a = constant_matrix(&real_matrix(2, &[1.0, 2.0, 3.0, 4.0]));
        let mut b = constant_vector(&real_vector(&[1.0, 2.0, 3.0]));
        let (a_before, b_before) = (a.clone(), b.clone());
        assert_eq!(
            solve(&mut a, &mut b),
            Err(LinearSystemError::DimensionMismatch {
                equations: 2,
                free_terms: 3
            })
        );
        assert_eq!(a, a_before);
        assert_eq!(b, b_before);

        let mut rect = DMatrix::from_element(2, 3, Expression::one());
        let mut b2 = constant_vector(&real_vector(&[1.0, 2.0]));
        assert_eq!(
            solve(&mut rect, &mut b2),
            Err(LinearSystemError::NotSquare { rows: 2, cols: 3 })
        );
    }

    #[test]
    fn test_empty_system() {
        let x = solved(DMatrix::from_element(0, 0, Expression::one()), DVector::from_vec(vec![]))
            .unwrap();
        assert_eq!(x.len(), 0);
    }

    #[test]
    fn test_solution_follows_variable_sources() {
        // conductances g1, g2 between a node and ground, current source j into the node,
        // second equation pins a second node to a voltage source e
        let g1 = VariableSource::labeled("g1", c(0.5, 0.0));
        let g2 = VariableSource::labeled("g2", c(0.25, 0.0));
        let j = VariableSource::labeled("j", c(3.0, 0.0));
        let e = VariableSource::labeled("e", c(1.0, 0.0));
        let a = DMatrix::from_row_slice(
            2,
            2,
            &[
                Expression::add(&Expression::from(&g1), &Expression::from(&g2)),
                Expression::from(&g2).negate(),
                Expression::zero(),
                Expression::one(),
            ],
        );
        let b = DVector::from_vec(vec![Expression::from(&j), Expression::from(&e)]);
        let x = solved(a, b).unwrap();

        let check = |x: &DVector<Expression>| {
            let (g1, g2, j, e) = (g1.value(), g2.value(), j.value(), e.value());
            let v2 = e;
            let v1 = (j + g2 * v2) / (g1 + g2);
            let values = evaluate_vector(x);
            assert!((values[0] - v1).norm() < 1e-12);
            assert!((values[1] - v2).norm() < 1e-12);
        };
        check(&x);
        // AC analysis: complex admittance and a new source value, no new elimination
        g2.set_value(c(0.25, 0.1));
        j.set_value(c(0.0, -2.0));
        e.set_value(c(4.0, 1.0));
        check(&x);
    }

    #[test]
    fn test_naive_pivot_is_unstable() {
        // the literal diagonal entry is tiny but non-zero, so no row swap happens
        let a = real_matrix(2, &[1e-17, 1.0, 1.0, 1.0]);
        let b = real_vector(&[1.0, 2.0]);
        let x = evaluate_vector(&solved(constant_matrix(&a), constant_vector(&b)).unwrap());
        let residual = (&a * &x - &b).norm();
        assert!(residual > 1e-6);
    }
}
