//! Polynomials over GF(256)
//!
//! Immutable value type used by the Reed-Solomon decoder. Coefficients are
//! stored most-significant-first and kept in canonical form: either the
//! leading coefficient is non-zero, or the polynomial is exactly `[0]`.

use crate::reed_solomon::galois::{gf_inverse, gf_mul};

/// Polynomial over GF(256), coefficients most-significant-first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GfPoly {
    coefficients: Vec<u8>,
}

impl GfPoly {
    /// Build a polynomial from coefficients, stripping leading zeros.
    ///
    /// An empty or all-zero slice yields the zero polynomial `[0]`.
    pub fn new(coefficients: &[u8]) -> Self {
        match coefficients.iter().position(|&c| c != 0) {
            Some(first) => GfPoly {
                coefficients: coefficients[first..].to_vec(),
            },
            None => GfPoly {
                coefficients: vec![0],
            },
        }
    }

    /// The zero polynomial
    pub fn zero() -> Self {
        GfPoly {
            coefficients: vec![0],
        }
    }

    /// The constant polynomial 1
    pub fn one() -> Self {
        GfPoly {
            coefficients: vec![1],
        }
    }

    /// `coefficient * x^degree`; a zero coefficient yields the zero polynomial
    pub fn monomial(degree: usize, coefficient: u8) -> Self {
        if coefficient == 0 {
            return Self::zero();
        }
        let mut coefficients = vec![0u8; degree + 1];
        coefficients[0] = coefficient;
        GfPoly { coefficients }
    }

    pub fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }

    /// True iff this is the zero polynomial (canonical form makes this a
    /// single comparison)
    pub fn is_zero(&self) -> bool {
        self.coefficients[0] == 0
    }

    /// Coefficient of `x^degree`; degrees beyond the polynomial are 0
    pub fn coefficient(&self, degree: usize) -> u8 {
        if degree > self.degree() {
            return 0;
        }
        self.coefficients[self.coefficients.len() - 1 - degree]
    }

    /// Evaluate at `x` by Horner's rule
    pub fn evaluate_at(&self, x: u8) -> u8 {
        if x == 0 {
            return self.coefficient(0);
        }
        if x == 1 {
            // Sum of all coefficients
            return self.coefficients.iter().fold(0, |acc, &c| acc ^ c);
        }
        let mut result = self.coefficients[0];
        for &c in &self.coefficients[1..] {
            result = gf_mul(result, x) ^ c;
        }
        result
    }

    /// Addition, which doubles as subtraction in characteristic 2
    pub fn add_or_subtract(&self, other: &GfPoly) -> GfPoly {
        if self.is_zero() {
            return other.clone();
        }
        if other.is_zero() {
            return self.clone();
        }

        let (smaller, larger) = if self.coefficients.len() <= other.coefficients.len() {
            (&self.coefficients, &other.coefficients)
        } else {
            (&other.coefficients, &self.coefficients)
        };

        let diff = larger.len() - smaller.len();
        let mut sum = larger.clone();
        for (i, &c) in smaller.iter().enumerate() {
            sum[diff + i] ^= c;
        }

        GfPoly::new(&sum)
    }

    /// Polynomial product
    pub fn multiply(&self, other: &GfPoly) -> GfPoly {
        if self.is_zero() || other.is_zero() {
            return Self::zero();
        }

        let a = &self.coefficients;
        let b = &other.coefficients;
        let mut product = vec![0u8; a.len() + b.len() - 1];
        for (i, &ac) in a.iter().enumerate() {
            for (j, &bc) in b.iter().enumerate() {
                product[i + j] ^= gf_mul(ac, bc);
            }
        }

        GfPoly::new(&product)
    }

    /// Scale every coefficient by `scalar`
    pub fn multiply_scalar(&self, scalar: u8) -> GfPoly {
        if scalar == 0 {
            return Self::zero();
        }
        if scalar == 1 {
            return self.clone();
        }
        let scaled: Vec<u8> = self.coefficients.iter().map(|&c| gf_mul(c, scalar)).collect();
        GfPoly::new(&scaled)
    }

    /// Multiply by `coefficient * x^degree`
    pub fn multiply_by_monomial(&self, degree: usize, coefficient: u8) -> GfPoly {
        if coefficient == 0 {
            return Self::zero();
        }
        let mut product: Vec<u8> = self
            .coefficients
            .iter()
            .map(|&c| gf_mul(c, coefficient))
            .collect();
        product.resize(product.len() + degree, 0);
        GfPoly::new(&product)
    }

    /// Long division, yielding `(quotient, remainder)`
    ///
    /// # Panics
    /// Panics when `other` is the zero polynomial; callers guard.
    pub fn divide(&self, other: &GfPoly) -> (GfPoly, GfPoly) {
        assert!(!other.is_zero(), "division by the zero polynomial");

        let mut quotient = GfPoly::zero();
        let mut remainder = self.clone();

        let denominator_leading = other.coefficient(other.degree());
        let inverse_leading = gf_inverse(denominator_leading);

        while !remainder.is_zero() && remainder.degree() >= other.degree() {
            let degree_diff = remainder.degree() - other.degree();
            let scale = gf_mul(remainder.coefficient(remainder.degree()), inverse_leading);
            let term = GfPoly::monomial(degree_diff, scale);
            quotient = quotient.add_or_subtract(&term);
            remainder = remainder.add_or_subtract(&other.multiply_by_monomial(degree_diff, scale));
        }

        (quotient, remainder)
    }
}
