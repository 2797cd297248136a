//! Product of sums (POS): a powered product of sub-expressions, value = `power ? 1/(f1 * ... * fn) : (f1 * ... * fn)`.
//!
//! An empty product is equal to 1 by convention. The linear solvers rely on it: dividing a
//! pivot by itself never has to materialize an explicit "one" operand.
use crate::symbolic::complex_core::ONE;
use crate::symbolic::expression::{EvaluationCache, Expression};
use num_complex::Complex64;
use std::fmt;
use std::rc::Rc;

#[derive(Clone, Debug, PartialEq)]
pub struct ProductOfSums {
    factors: Rc<Vec<Expression>>,
    power: bool,
}

impl ProductOfSums {
    /// empty product, evaluates to 1
    pub fn new() -> Self {
        ProductOfSums::from_parts(Vec::new(), false)
    }

    pub fn single(expression: Expression) -> Self {
        ProductOfSums::from_parts(vec![expression], false)
    }

    pub fn pair(first: Expression, second: Expression) -> Self {
        ProductOfSums::from_parts(vec![first, second], false)
    }

    pub fn from_parts(factors: Vec<Expression>, power: bool) -> Self {
        ProductOfSums {
            factors: Rc::new(factors),
            power,
        }
    }

    pub fn factors(&self) -> &[Expression] {
        &self.factors
    }

    /// true for the power -1 (reciprocal), false for 1
    pub fn power(&self) -> bool {
        self.power
    }

    pub fn len(&self) -> usize {
        self.factors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }

    /// Division by an exact zero is not reported: it shows up as NaN or infinity here.
    pub fn evaluate(&self) -> Complex64 {
        self.evaluate_cached(&mut EvaluationCache::new())
    }

    /// The plain product is cached under the address of the shared factor list, the power is
    /// applied afterwards, so a product and its reciprocal share one entry.
    pub fn evaluate_cached(&self, cache: &mut EvaluationCache) -> Complex64 {
        let key = self.children_key();
        let product = match cache.get(&key).copied() {
            Some(product) => product,
            None => {
                let product = self
                    .factors
                    .iter()
                    .fold(ONE, |acc, factor| acc * factor.evaluate_cached(cache));
                cache.insert(key, product);
                product
            }
        };
        if self.power { product.inv() } else { product }
    }

    /// identity of the shared factor list
    pub(crate) fn children_key(&self) -> *const Vec<Expression> {
        Rc::as_ptr(&self.factors)
    }

    /// flips the power, the list of factors is shared with `self`
    pub fn reciprocated(&self) -> ProductOfSums {
        ProductOfSums {
            factors: Rc::clone(&self.factors),
            power: !self.power,
        }
    }

    /// Multiplies this product by `other`. Factors of another product are merged one level deep:
    /// as they are when the powers agree, reciprocated one by one when they don't. No distribution
    /// over sums is ever performed.
    pub fn multiply(&self, other: &Expression) -> ProductOfSums {
        let mut factors = Vec::with_capacity(self.len() + 1);
        factors.extend(self.factors.iter().cloned());
        match other {
            Expression::Product(product) if product.power == self.power => {
                factors.extend(product.factors.iter().cloned());
            }
            Expression::Product(product) => {
                factors.extend(product.factors.iter().map(Expression::reciprocal));
            }
            term if self.power => factors.push(term.reciprocal()),
            term => factors.push(term.clone()),
        }
        ProductOfSums::from_parts(factors, self.power)
    }

    pub fn divide(&self, other: &Expression) -> ProductOfSums {
        self.multiply(&other.reciprocal())
    }
}

impl Default for ProductOfSums {
    fn default() -> Self {
        ProductOfSums::new()
    }
}

impl fmt::Display for ProductOfSums {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "1");
        }
        let body = self
            .factors
            .iter()
            .map(|factor| factor.to_string())
            .collect::<Vec<_>>()
            .join(" * ");
        if self.power {
            write!(f, "[({})^(-1)]", body)
        } else {
            write!(f, "({})", body)
        }
    }
}
