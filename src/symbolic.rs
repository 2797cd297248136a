#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
/// complex values: constants, exact zero tests, magnitude, parsing of literals like `1+2i`
pub mod complex_core;
///________________________________________________________________________________________________________________________________
/// # Expression algebra
/// a closed algebra over leaves (`Variable`), sums of products and products of sums.
/// Build an expression once, then evaluate it again and again after changing leaf values.
///# Example
/// ```
/// use RustedLinSolve::symbolic::expression::Expression;
/// use RustedLinSolve::symbolic::variable::VariableSource;
/// use num_complex::Complex64;
/// let r = VariableSource::labeled("R", Complex64::new(10.0, 0.0));
/// let u = VariableSource::labeled("U", Complex64::new(5.0, 0.0));
/// // current through a resistor
/// let i = Expression::from(&u) / Expression::from(&r);
/// println!("I = {} = {}", i, i.evaluate());
/// assert_eq!(i.evaluate(), Complex64::new(0.5, 0.0));
/// u.set_value(Complex64::new(20.0, 0.0));
/// assert_eq!(i.evaluate(), Complex64::new(2.0, 0.0));
/// ```
/// ________________________________________________________________________________________________________________________________
pub mod expression;
pub mod product_of_sums;
pub mod sum_of_products;
/// leaves of the algebra and their writable sources
pub mod variable;
