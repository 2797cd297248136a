//! # Expression algebra
//!
//! `Expression` is a closed sum type over the three node kinds of the algebra:
//! - **Variable**: a leaf reading a shared complex value (see `variable.rs`)
//! - **Sum**: a `SumOfProducts`, a signed sum of sub-expressions
//! - **Product**: a `ProductOfSums`, a product of sub-expressions raised to the power 1 or -1
//!
//! ## Main methods
//! - `evaluate()` folds the tree into a `Complex64` using the current values of the leaves
//! - `negate()` / `reciprocal()` are O(1) on a sum / product (only the flag flips), other nodes get wrapped
//! - `add`, `subtract`, `multiply`, `divide` merge compatible containers one level deep and
//!   promote to the other normal form when sums and products are mixed
//!
//! Operands are never mutated, every operation returns a new expression. Children are kept
//! behind `Rc`, so cloning a node or reusing it in many places is cheap and the trees built by
//! elimination share their common parts.
//!
//! Nothing is expanded or simplified beyond that flattening: `(a+b)*(c+d)` stays a product of
//! two sums. Division by a literal zero is not an error either, the value simply becomes NaN or
//! infinity when evaluated.
//!
//! # Example
//! ```
//! use RustedLinSolve::symbolic::expression::Expression;
//! use RustedLinSolve::symbolic::variable::VariableSource;
//! use num_complex::Complex64;
//! let a = VariableSource::labeled("a", Complex64::new(2.0, 0.0));
//! let b = VariableSource::labeled("b", Complex64::new(3.0, 0.0));
//! let expr = Expression::from(&a) * Expression::from(&b) - Expression::from(&a);
//! assert_eq!(expr.evaluate(), Complex64::new(4.0, 0.0));
//! b.set_value(Complex64::new(0.0, 1.0));
//! assert_eq!(expr.evaluate(), Complex64::new(-2.0, 2.0));
//! ```
use crate::symbolic::product_of_sums::ProductOfSums;
use crate::symbolic::sum_of_products::SumOfProducts;
use crate::symbolic::variable::{Variable, VariableSource};
use nalgebra::{DMatrix, DVector};
use num_complex::Complex64;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// values of already evaluated sums and products, keyed by the address of their shared child list;
/// valid only while no leaf value changes
pub type EvaluationCache = HashMap<*const Vec<Expression>, Complex64>;

#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
    /// leaf
    Variable(Variable),
    /// sum of products
    Sum(SumOfProducts),
    /// product of sums
    Product(ProductOfSums),
}

impl Expression {
    /// constant leaf
    pub fn constant(value: Complex64) -> Self {
        Expression::Variable(Variable::constant(value))
    }

    /// multiplicative identity: the empty product
    pub fn one() -> Self {
        Expression::Product(ProductOfSums::new())
    }

    /// additive identity: the empty sum
    pub fn zero() -> Self {
        Expression::Sum(SumOfProducts::new())
    }

    pub fn negative_one() -> Self {
        Expression::Variable(Variable::negative_one())
    }

    pub fn evaluate(&self) -> Complex64 {
        self.evaluate_cached(&mut EvaluationCache::new())
    }

    /// Evaluates every shared subexpression once. Elimination results are DAGs whose tree
    /// expansion grows exponentially with the system size.
    pub fn evaluate_cached(&self, cache: &mut EvaluationCache) -> Complex64 {
        match self {
            Expression::Variable(variable) => variable.value(),
            Expression::Sum(sum) => sum.evaluate_cached(cache),
            Expression::Product(product) => product.evaluate_cached(cache),
        }
    }

    pub fn negate(&self) -> Expression {
        match self {
            Expression::Sum(sum) => Expression::Sum(sum.negated()),
            other => Expression::Sum(SumOfProducts::single(other.clone()).negated()),
        }
    }

    pub fn reciprocal(&self) -> Expression {
        match self {
            Expression::Product(product) => Expression::Product(product.reciprocated()),
            other => Expression::Product(ProductOfSums::single(other.clone()).reciprocated()),
        }
    }

    pub fn add(&self, other: &Expression) -> Expression {
        Expression::Sum(self.as_sum().add(other))
    }

    pub fn subtract(&self, other: &Expression) -> Expression {
        self.add(&other.negate())
    }

    pub fn multiply(&self, other: &Expression) -> Expression {
        Expression::Product(self.as_product().multiply(other))
    }

    pub fn divide(&self, other: &Expression) -> Expression {
        self.multiply(&other.reciprocal())
    }

    /// the sum itself, or a one-element sum wrapping any other node
    pub fn into_sum(self) -> SumOfProducts {
        match self {
            Expression::Sum(sum) => sum,
            other => SumOfProducts::single(other),
        }
    }

    /// the product itself, or a one-element product wrapping any other node
    pub fn into_product(self) -> ProductOfSums {
        match self {
            Expression::Product(product) => product,
            other => ProductOfSums::single(other),
        }
    }

    fn as_sum(&self) -> SumOfProducts {
        self.clone().into_sum()
    }

    fn as_product(&self) -> ProductOfSums {
        self.clone().into_product()
    }

    /// number of nodes in the tree (shared subtrees are counted every time they appear)
    pub fn node_count(&self) -> usize {
        match self {
            Expression::Variable(_) => 1,
            Expression::Sum(sum) => 1 + sum.summands().iter().map(Expression::node_count).sum::<usize>(),
            Expression::Product(product) => {
                1 + product.factors().iter().map(Expression::node_count).sum::<usize>()
            }
        }
    }

    /// number of nodes with every shared child list counted once
    pub fn distinct_node_count(&self) -> usize {
        let mut visited = HashSet::new();
        self.count_distinct(&mut visited)
    }

    fn count_distinct(&self, visited: &mut HashSet<*const Vec<Expression>>) -> usize {
        let (key, children) = match self {
            Expression::Variable(_) => return 1,
            Expression::Sum(sum) => (sum.children_key(), sum.summands()),
            Expression::Product(product) => (product.children_key(), product.factors()),
        };
        if !visited.insert(key) {
            return 0;
        }
        1 + children
            .iter()
            .map(|child| child.count_distinct(visited))
            .sum::<usize>()
    }

    pub fn depth(&self) -> usize {
        let children = match self {
            Expression::Variable(_) => return 1,
            Expression::Sum(sum) => sum.summands(),
            Expression::Product(product) => product.factors(),
        };
        1 + children.iter().map(Expression::depth).max().unwrap_or(0)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expression::Variable(variable) => write!(f, "{}", variable),
            Expression::Sum(sum) => write!(f, "{}", sum),
            Expression::Product(product) => write!(f, "{}", product),
        }
    }
}

////////////////////////////////CONVERSIONS///////////////////////////////////////

impl From<Variable> for Expression {
    fn from(variable: Variable) -> Self {
        Expression::Variable(variable)
    }
}

impl From<&VariableSource> for Expression {
    fn from(source: &VariableSource) -> Self {
        Expression::Variable(source.variable())
    }
}

impl From<Complex64> for Expression {
    fn from(value: Complex64) -> Self {
        Expression::constant(value)
    }
}

impl From<f64> for Expression {
    fn from(value: f64) -> Self {
        Expression::constant(Complex64::new(value, 0.0))
    }
}

impl From<SumOfProducts> for Expression {
    fn from(sum: SumOfProducts) -> Self {
        Expression::Sum(sum)
    }
}

impl From<ProductOfSums> for Expression {
    fn from(product: ProductOfSums) -> Self {
        Expression::Product(product)
    }
}

////////////////////////////////OPERATORS///////////////////////////////////////

macro_rules! impl_binary_operator {
    ($trait_name:ident, $fn_name:ident, $method:ident) => {
        impl std::ops::$trait_name for Expression {
            type Output = Expression;

            fn $fn_name(self, rhs: Expression) -> Expression {
                Expression::$method(&self, &rhs)
            }
        }

        impl std::ops::$trait_name<&Expression> for &Expression {
            type Output = Expression;

            fn $fn_name(self, rhs: &Expression) -> Expression {
                Expression::$method(self, rhs)
            }
        }
    };
}

impl_binary_operator!(Add, add, add);
impl_binary_operator!(Sub, sub, subtract);
impl_binary_operator!(Mul, mul, multiply);
impl_binary_operator!(Div, div, divide);

impl std::ops::Neg for Expression {
    type Output = Expression;

    fn neg(self) -> Expression {
        self.negate()
    }
}

impl std::ops::Neg for &Expression {
    type Output = Expression;

    fn neg(self) -> Expression {
        self.negate()
    }
}

////////////////////////////////ARRAYS///////////////////////////////////////

/// evaluates every entry of a vector of expressions, sharing one cache between the entries
pub fn evaluate_vector(expressions: &DVector<Expression>) -> DVector<Complex64> {
    let mut cache = EvaluationCache::new();
    expressions.map(|expression| expression.evaluate_cached(&mut cache))
}

/// evaluates every entry of a matrix of expressions, sharing one cache between the entries
pub fn evaluate_matrix(expressions: &DMatrix<Expression>) -> DMatrix<Complex64> {
    let mut cache = EvaluationCache::new();
    expressions.map(|expression| expression.evaluate_cached(&mut cache))
}

/// wraps every complex number into a constant leaf
pub fn constant_matrix(values: &DMatrix<Complex64>) -> DMatrix<Expression> {
    values.map(Expression::constant)
}

/// wraps every complex number into a constant leaf
pub fn constant_vector(values: &DVector<Complex64>) -> DVector<Expression> {
    values.map(Expression::constant)
}
