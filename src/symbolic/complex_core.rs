//! # Complex core
//!
//! Every leaf of the expression algebra evaluates to a `Complex64` from the `num-complex` crate.
//! This module adds the handful of operations the algebra and the solvers need on top of it:
//! exact comparisons with the additive identity, the magnitude used for pivot selection,
//! rounding, printing and parsing of complex literals such as `1+2i`, `-i` or `2.5e-3-1e2j`.
//!
//! Comparisons with zero are exact (no epsilon): only a literal `0+0i` counts as zero.
use num_complex::Complex64;
use num_traits::Zero;

/// additive identity
pub const ZERO: Complex64 = Complex64::new(0.0, 0.0);
/// multiplicative identity
pub const ONE: Complex64 = Complex64::new(1.0, 0.0);
pub const NEGATIVE_ONE: Complex64 = Complex64::new(-1.0, 0.0);
/// imaginary unit
pub const IMAGINARY_ONE: Complex64 = Complex64::new(0.0, 1.0);
pub const NEGATIVE_IMAGINARY_ONE: Complex64 = Complex64::new(0.0, -1.0);

/// Extension methods for complex values used throughout the crate.
pub trait ComplexCore {
    /// Euclidean norm sqrt(re^2 + im^2)
    fn magnitude(&self) -> f64;
    /// true only for exactly 0+0i
    fn is_exact_zero(&self) -> bool;
    /// imaginary part is exactly 0
    fn is_pure_real(&self) -> bool;
    /// real part is exactly 0
    fn is_pure_imaginary(&self) -> bool;
    /// rounds both parts to the nearest multiple of `step` (half away from zero)
    fn round_to(&self, step: f64) -> Complex64;
    /// human-readable form: `3`, `2i`, `1-0.5i`
    fn to_pretty_string(&self) -> String;
}

impl ComplexCore for Complex64 {
    fn magnitude(&self) -> f64 {
        self.norm()
    }

    fn is_exact_zero(&self) -> bool {
        self.is_zero()
    }

    fn is_pure_real(&self) -> bool {
        self.im == 0.0
    }

    fn is_pure_imaginary(&self) -> bool {
        self.re == 0.0
    }

    fn round_to(&self, step: f64) -> Complex64 {
        Complex64::new(
            (self.re / step).round() * step,
            (self.im / step).round() * step,
        )
    }

    fn to_pretty_string(&self) -> String {
        if self.im == 0.0 {
            format!("{}", self.re)
        } else if self.re == 0.0 {
            format!("{}i", self.im)
        } else if self.im < 0.0 {
            format!("{}-{}i", self.re, -self.im)
        } else {
            format!("{}+{}i", self.re, self.im)
        }
    }
}

/// Parses a complex literal. Accepted forms: `3`, `-2.5`, `1e-3`, `i`, `-i`, `4j`,
/// `1+2i`, `1-i`, `2.5e-3-1e2i`. Whitespace is ignored. Returns `None` for anything else.
pub fn parse_complex(input: &str) -> Option<Complex64> {
    let literal: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    if literal.is_empty() {
        return None;
    }
    let Some(body) = literal.strip_suffix(['i', 'j']) else {
        return literal.parse::<f64>().ok().map(|re| Complex64::new(re, 0.0));
    };
    // the imaginary part starts at the last sign that is not an exponent sign
    let bytes = body.as_bytes();
    let split = (1..bytes.len())
        .rev()
        .find(|&k| matches!(bytes[k], b'+' | b'-') && !matches!(bytes[k - 1], b'e' | b'E'));
    let (re_part, im_part) = match split {
        Some(k) => (&body[..k], &body[k..]),
        None => ("", body),
    };
    let re = if re_part.is_empty() {
        0.0
    } else {
        re_part.parse::<f64>().ok()?
    };
    let im = match im_part {
        "" | "+" => 1.0,
        "-" => -1.0,
        coefficient => coefficient.parse::<f64>().ok()?,
    };
    Some(Complex64::new(re, im))
}
