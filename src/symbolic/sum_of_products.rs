//! Sum of products (SOP): a signed sum of sub-expressions, value = `sign ? -(s1 + ... + sn) : (s1 + ... + sn)`.
//! An empty sum is the additive identity.
use crate::symbolic::complex_core::ZERO;
use crate::symbolic::expression::{EvaluationCache, Expression};
use num_complex::Complex64;
use std::fmt;
use std::rc::Rc;

#[derive(Clone, Debug, PartialEq)]
pub struct SumOfProducts {
    summands: Rc<Vec<Expression>>,
    sign: bool,
}

impl SumOfProducts {
    /// empty sum, evaluates to 0
    pub fn new() -> Self {
        SumOfProducts::from_parts(Vec::new(), false)
    }

    /// sum with one summand; `expression` should not itself be a sum, otherwise use `Expression::into_sum`
    pub fn single(expression: Expression) -> Self {
        SumOfProducts::from_parts(vec![expression], false)
    }

    pub fn pair(first: Expression, second: Expression) -> Self {
        SumOfProducts::from_parts(vec![first, second], false)
    }

    pub fn from_parts(summands: Vec<Expression>, sign: bool) -> Self {
        SumOfProducts {
            summands: Rc::new(summands),
            sign,
        }
    }

    pub fn summands(&self) -> &[Expression] {
        &self.summands
    }

    /// true stands for a minus in front of the sum
    pub fn sign(&self) -> bool {
        self.sign
    }

    pub fn len(&self) -> usize {
        self.summands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.summands.is_empty()
    }

    pub fn evaluate(&self) -> Complex64 {
        self.evaluate_cached(&mut EvaluationCache::new())
    }

    /// The unsigned sum is cached under the address of the shared summand list, so a sum and
    /// its negation share one entry.
    pub fn evaluate_cached(&self, cache: &mut EvaluationCache) -> Complex64 {
        let key = self.children_key();
        let sum = match cache.get(&key).copied() {
            Some(sum) => sum,
            None => {
                let sum = self
                    .summands
                    .iter()
                    .fold(ZERO, |acc, summand| acc + summand.evaluate_cached(cache));
                cache.insert(key, sum);
                sum
            }
        };
        if self.sign { -sum } else { sum }
    }

    /// identity of the shared summand list
    pub(crate) fn children_key(&self) -> *const Vec<Expression> {
        Rc::as_ptr(&self.summands)
    }

    /// flips the sign, the list of summands is shared with `self`
    pub fn negated(&self) -> SumOfProducts {
        SumOfProducts {
            summands: Rc::clone(&self.summands),
            sign: !self.sign,
        }
    }

    /// Adds `other` to this sum. Summands of another sum are merged one level deep: as they are
    /// when the signs agree, negated one by one when they don't. The sign of `self` is kept.
    pub fn add(&self, other: &Expression) -> SumOfProducts {
        let mut summands = Vec::with_capacity(self.len() + 1);
        summands.extend(self.summands.iter().cloned());
        match other {
            Expression::Sum(sum) if sum.sign == self.sign => {
                summands.extend(sum.summands.iter().cloned());
            }
            Expression::Sum(sum) => {
                summands.extend(sum.summands.iter().map(Expression::negate));
            }
            // a lone term behaves as a sum with a plus sign
            term if self.sign => summands.push(term.negate()),
            term => summands.push(term.clone()),
        }
        SumOfProducts::from_parts(summands, self.sign)
    }

    pub fn subtract(&self, other: &Expression) -> SumOfProducts {
        self.add(&other.negate())
    }
}

impl Default for SumOfProducts {
    fn default() -> Self {
        SumOfProducts::new()
    }
}

impl fmt::Display for SumOfProducts {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "0");
        }
        let body = self
            .summands
            .iter()
            .map(|summand| summand.to_string())
            .collect::<Vec<_>>()
            .join(" + ");
        if self.sign {
            write!(f, "-({})", body)
        } else {
            write!(f, "({})", body)
        }
    }
}
