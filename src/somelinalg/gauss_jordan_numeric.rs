//! # Gauss-Jordan elimination over complex numbers
//!
//! Numeric counterpart of `gauss_jordan_symbolic`, with two additions:
//! - **partial pivoting**: at every step the row with the largest magnitude in the pivot column
//!   becomes the pivot row, which keeps cancellation errors small
//! - **identity equations** (optional): an equation whose row, column and free term are all
//!   exactly zero (`0 = 0`, typical for disconnected nodes of an admittance matrix) is moved out
//!   of the active system; its variable is reported as zero
//!
//! Rows and columns are never moved physically. The solver keeps `row_order` / `col_order`
//! index arrays and applies swaps to them, so restoring the caller's variable order at the end
//! is a single pass over `col_order`.
//!
//! # Example
//! ```
//! use RustedLinSolve::somelinalg::gauss_jordan_numeric;
//! use nalgebra::{DMatrix, DVector};
//! use num_complex::Complex64;
//! let c = |re: f64| Complex64::new(re, 0.0);
//! // second equation is 0 = 0 and the second variable appears nowhere
//! let mut a = DMatrix::from_row_slice(3, 3, &[c(2.0), c(0.0), c(1.0), c(0.0), c(0.0), c(0.0), c(1.0), c(0.0), c(3.0)]);
//! let mut b = DVector::from_vec(vec![c(3.0), c(0.0), c(4.0)]);
//! gauss_jordan_numeric::solve(&mut a, &mut b, true).unwrap();
//! assert!((b[0] - c(1.0)).norm() < 1e-12);
//! assert_eq!(b[1], c(0.0));
//! assert!((b[2] - c(1.0)).norm() < 1e-12);
//! ```
use crate::somelinalg::linear_sys_error::LinearSystemError;
use crate::symbolic::complex_core::{ComplexCore, ZERO};
use log::{debug, info, warn};
use nalgebra::{DMatrix, DVector};
use num_complex::Complex64;
use std::time::Instant;

/// Solves the system in place: on success `free_terms` holds the solution in the original
/// variable order. With `ignore_identity_equations` the `0 = 0` equations are removed first and
/// their variables are set to zero.
pub fn solve(
    coefficients: &mut DMatrix<Complex64>,
    free_terms: &mut DVector<Complex64>,
    ignore_identity_equations: bool,
) -> Result<(), LinearSystemError> {
    LinearSystemError::check_dimensions(coefficients.shape(), free_terms.len())?;
    let begin = Instant::now();
    let mut eliminator = NumericEliminator::new(coefficients, free_terms);
    let removed = if ignore_identity_equations {
        eliminator.remove_identity_equations()
    } else {
        0
    };
    info!(
        "numeric Gauss-Jordan elimination of {} equations started, {} identity equations removed",
        eliminator.size(),
        removed
    );
    eliminator.forward_elimination()?;
    eliminator.backward_elimination();
    eliminator.write_solution();
    info!(
        "numeric Gauss-Jordan elimination finished in {:?}",
        begin.elapsed()
    );
    Ok(())
}

/// Owning form of [`solve`]: consumes the buffers and returns the solution vector.
pub fn solved(
    mut coefficients: DMatrix<Complex64>,
    mut free_terms: DVector<Complex64>,
    ignore_identity_equations: bool,
) -> Result<DVector<Complex64>, LinearSystemError> {
    solve(&mut coefficients, &mut free_terms, ignore_identity_equations)?;
    Ok(free_terms)
}

/// Indices of the identity equations of the system (row i, column i and free term i all exactly zero).
pub fn find_identity_equations(
    coefficients: &DMatrix<Complex64>,
    free_terms: &DVector<Complex64>,
) -> Vec<usize> {
    (0..free_terms.len().min(coefficients.nrows()).min(coefficients.ncols()))
        .filter(|&i| is_identity_equation(coefficients, free_terms, i, i))
        .collect()
}

fn is_identity_equation(
    coefficients: &DMatrix<Complex64>,
    free_terms: &DVector<Complex64>,
    row: usize,
    col: usize,
) -> bool {
    free_terms[row].is_exact_zero()
        && coefficients.row(row).iter().all(ComplexCore::is_exact_zero)
        && coefficients.column(col).iter().all(ComplexCore::is_exact_zero)
}

/// Elimination state: the caller's buffers seen through row and column permutations.
/// Logical entry (i, j) lives at `coefficients[(row_order[i], col_order[j])]`.
struct NumericEliminator<'a> {
    coefficients: &'a mut DMatrix<Complex64>,
    free_terms: &'a mut DVector<Complex64>,
    row_order: Vec<usize>,
    col_order: Vec<usize>,
    /// number of equations still taking part in the elimination
    active: usize,
}

impl<'a> NumericEliminator<'a> {
    fn new(coefficients: &'a mut DMatrix<Complex64>, free_terms: &'a mut DVector<Complex64>) -> Self {
        let size = free_terms.len();
        NumericEliminator {
            coefficients,
            free_terms,
            row_order: (0..size).collect(),
            col_order: (0..size).collect(),
            active: size,
        }
    }

    fn size(&self) -> usize {
        self.row_order.len()
    }

    fn a(&self, i: usize, j: usize) -> Complex64 {
        self.coefficients[(self.row_order[i], self.col_order[j])]
    }

    fn set_a(&mut self, i: usize, j: usize, value: Complex64) {
        self.coefficients[(self.row_order[i], self.col_order[j])] = value;
    }

    fn b(&self, i: usize) -> Complex64 {
        self.free_terms[self.row_order[i]]
    }

    fn set_b(&mut self, i: usize, value: Complex64) {
        self.free_terms[self.row_order[i]] = value;
    }

    /// moves every identity equation behind the active part (row and column together, so
    /// equation i keeps its variable i) and shrinks the active size; returns how many were found
    fn remove_identity_equations(&mut self) -> usize {
        let mut removed = 0;
        let mut i = 0;
        while i < self.active {
            let (row, col) = (self.row_order[i], self.col_order[i]);
            if is_identity_equation(&*self.coefficients, &*self.free_terms, row, col) {
                let last = self.active - 1;
                debug!("equation {} is an identity, moved out of the active system", row);
                self.row_order.swap(i, last);
                self.col_order.swap(i, last);
                self.active -= 1;
                removed += 1;
                // the equation swapped into position i has not been checked yet
            } else {
                i += 1;
            }
        }
        removed
    }

    /// swaps the row with the largest magnitude in column `i` into position `i`
    fn select_best_pivot(&mut self, i: usize) -> Result<(), LinearSystemError> {
        let mut best = i;
        let mut best_magnitude = self.a(i, i).magnitude();
        for j in i + 1..self.active {
            let magnitude = self.a(j, i).magnitude();
            if magnitude > best_magnitude {
                best = j;
                best_magnitude = magnitude;
            }
        }
        if self.a(best, i).is_exact_zero() {
            warn!(
                "no non-zero pivot found for variable {}: system is singular",
                self.col_order[i]
            );
            return Err(LinearSystemError::SingularSystem { row: i });
        }
        if best != i {
            debug!(
                "pivot for column {}: equation {} swapped with equation {}",
                self.col_order[i], self.row_order[best], self.row_order[i]
            );
            self.row_order.swap(i, best);
        }
        Ok(())
    }

    fn forward_elimination(&mut self) -> Result<(), LinearSystemError> {
        for i in 0..self.active {
            self.select_best_pivot(i)?;
            let pivot = self.a(i, i);
            for col in i..self.active {
                let value = self.a(i, col) / pivot;
                self.set_a(i, col, value);
            }
            let value = self.b(i) / pivot;
            self.set_b(i, value);

            for j in i + 1..self.active {
                let multiplier = self.a(j, i);
                if multiplier.is_exact_zero() {
                    continue;
                }
                for col in i + 1..self.active {
                    let value = self.a(j, col) - multiplier * self.a(i, col);
                    self.set_a(j, col, value);
                }
                let value = self.b(j) - multiplier * self.b(i);
                self.set_b(j, value);
            }
        }
        Ok(())
    }

    /// only the free terms are updated, the coefficients above the diagonal are not needed afterwards
    fn backward_elimination(&mut self) {
        for i in (0..self.active).rev() {
            let solved = self.b(i);
            for j in (0..i).rev() {
                let value = self.b(j) - self.a(j, i) * solved;
                self.set_b(j, value);
            }
        }
    }

    /// writes the solution into the free terms in the original variable order;
    /// variables of removed identity equations are zero
    fn write_solution(self) {
        let mut solution = DVector::from_element(self.size(), ZERO);
        for k in 0..self.active {
            solution[self.col_order[k]] = self.b(k);
        }
        self.free_terms.copy_from(&solution);
    }
}
