//! linear systems over complex numbers and over expression trees
#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
/// diagnostics for linear systems and matrices: if it is consistent
/// or poorly conditioned, residual of a solution
pub mod linear_sys_diagnostics;
/// errors of the linear system solvers
pub mod linear_sys_error;
///________________________________________________________________________________________________________________________________
/// # Gauss-Jordan elimination over expressions
/// the solution is a vector of expression trees: change the values of the leaves and evaluate again
/// without solving the system once more
///# Example
/// ```
/// use RustedLinSolve::somelinalg::gauss_jordan_symbolic;
/// use RustedLinSolve::symbolic::expression::Expression;
/// use RustedLinSolve::symbolic::variable::VariableSource;
/// use nalgebra::{DMatrix, DVector};
/// use num_complex::Complex64;
/// let g = VariableSource::labeled("G", Complex64::new(2.0, 0.0));
/// let u = VariableSource::labeled("U", Complex64::new(3.0, 0.0));
/// // G*x = U
/// let x = gauss_jordan_symbolic::solved(
///     DMatrix::from_element(1, 1, Expression::from(&g)),
///     DVector::from_element(1, Expression::from(&u)),
/// )
/// .unwrap();
/// assert_eq!(x[0].evaluate(), Complex64::new(1.5, 0.0));
/// g.set_value(Complex64::new(0.5, 0.0));
/// assert_eq!(x[0].evaluate(), Complex64::new(6.0, 0.0));
/// ```
/// ________________________________________________________________________________________________________________________________
pub mod gauss_jordan_symbolic;
/// Gauss-Jordan elimination over complex numbers with partial pivoting and removal of identity equations
pub mod gauss_jordan_numeric;
/// solver driver: configuration, task documents, logging and statistics
pub mod linear_system;
