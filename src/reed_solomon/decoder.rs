//! Syndrome-based Reed-Solomon error correction over GF(256)
//!
//! Corrects byte errors in place using the Extended Euclidean algorithm to
//! derive the error locator and evaluator, a Chien search for error
//! positions, and Forney's formula for error magnitudes. A block with
//! `2t` ECC codewords can correct up to `t` unknown byte errors.

use log::debug;
use thiserror::Error;

use crate::reed_solomon::galois::{gf256, gf_inverse, gf_mul};
use crate::reed_solomon::poly::GfPoly;

/// Errors that can occur while correcting a Reed-Solomon block
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ReedSolomonError {
    /// The error pattern exceeds the correction capacity of the block
    #[error("too many errors for the available error correction codewords")]
    TooManyErrors,

    /// Chien search found a different number of roots than the locator degree
    #[error("error locator degree does not match the number of roots")]
    LocatorDegreeMismatch,

    /// A computed error position falls outside the received block
    #[error("error position outside the received codeword block")]
    BadErrorLocation,

    /// Forney's formula hit a zero derivative denominator
    #[error("zero denominator while computing an error magnitude")]
    ZeroDenominator,
}

/// Reed-Solomon decoder for one block layout
///
/// Cheap to construct; holds only the ECC codeword count.
pub struct ReedSolomonDecoder {
    ec_codewords: usize,
}

impl ReedSolomonDecoder {
    pub fn new(ec_codewords: usize) -> Self {
        Self { ec_codewords }
    }

    /// Correct `received` in place, returning the number of corrected bytes.
    ///
    /// `received` holds data codewords followed by ECC codewords, exactly as
    /// laid out in one de-interleaved block.
    pub fn correct(&self, received: &mut [u8]) -> Result<usize, ReedSolomonError> {
        let gf = gf256();

        let syndromes = self.calculate_syndromes(received);
        if syndromes.iter().all(|&s| s == 0) {
            return Ok(0);
        }

        // Syndrome polynomial: coefficient of x^i is S_i
        let mut syndrome_coeffs = syndromes;
        syndrome_coeffs.reverse();
        let syndrome_poly = GfPoly::new(&syndrome_coeffs);

        let (sigma, omega) = self.run_euclidean(&syndrome_poly)?;

        // Chien search: sigma's roots are the inverses of the error locators
        let locators = self.find_error_locators(&sigma)?;

        let n = received.len();
        let mut corrected = 0usize;
        for &locator in &locators {
            let position_exp = gf.log(locator) as usize;
            if position_exp >= n {
                return Err(ReedSolomonError::BadErrorLocation);
            }
            let position = n - 1 - position_exp;

            let magnitude = self.error_magnitude(&sigma, &omega, locator)?;
            received[position] ^= magnitude;
            corrected += 1;
        }

        // The corrected block must be a codeword again
        if self.calculate_syndromes(received).iter().any(|&s| s != 0) {
            return Err(ReedSolomonError::TooManyErrors);
        }

        debug!("corrected {} byte error(s) in a {}-byte block", corrected, n);
        Ok(corrected)
    }

    /// Evaluate the received polynomial at alpha^0 .. alpha^(2t-1)
    fn calculate_syndromes(&self, received: &[u8]) -> Vec<u8> {
        let gf = gf256();
        let poly = GfPoly::new(received);
        (0..self.ec_codewords)
            .map(|i| poly.evaluate_at(gf.exp(i)))
            .collect()
    }

    /// Extended Euclidean algorithm on (x^2t, S(x)).
    ///
    /// Runs until the remainder degree drops below t, then normalizes the
    /// co-factor and remainder by sigma(0)^-1 so that sigma(0) = 1. Returns
    /// (sigma, omega): the error locator and error evaluator.
    fn run_euclidean(&self, syndrome: &GfPoly) -> Result<(GfPoly, GfPoly), ReedSolomonError> {
        let mut r_last = GfPoly::monomial(self.ec_codewords, 1);
        let mut r = syndrome.clone();
        let mut t_last = GfPoly::zero();
        let mut t = GfPoly::one();

        while r.degree() >= self.ec_codewords / 2 {
            if r.is_zero() {
                // S(x) divides x^2t exactly; no valid locator exists
                return Err(ReedSolomonError::TooManyErrors);
            }
            let (quotient, r_next) = r_last.divide(&r);
            let t_next = quotient.multiply(&t).add_or_subtract(&t_last);
            r_last = std::mem::replace(&mut r, r_next);
            t_last = std::mem::replace(&mut t, t_next);
        }

        let sigma_at_zero = t.coefficient(0);
        if sigma_at_zero == 0 {
            return Err(ReedSolomonError::TooManyErrors);
        }

        let scale = gf_inverse(sigma_at_zero);
        let sigma = t.multiply_scalar(scale);
        let omega = r.multiply_scalar(scale);
        Ok((sigma, omega))
    }

    /// Chien search: walk every non-zero field element and collect the error
    /// locators X_k (inverses of sigma's roots)
    fn find_error_locators(&self, sigma: &GfPoly) -> Result<Vec<u8>, ReedSolomonError> {
        let gf = gf256();
        let num_errors = sigma.degree();

        if num_errors == 1 {
            // Shortcut: sigma = 1 + X_1 * x
            return Ok(vec![sigma.coefficient(1)]);
        }

        let mut locators = Vec::with_capacity(num_errors);
        for i in 1..=255u8 {
            if sigma.evaluate_at(i) == 0 {
                locators.push(gf.inverse(i));
                if locators.len() == num_errors {
                    break;
                }
            }
        }

        if locators.len() != num_errors {
            return Err(ReedSolomonError::LocatorDegreeMismatch);
        }
        Ok(locators)
    }

    /// Forney's formula for the magnitude at one locator X_k:
    /// e_k = X_k * omega(X_k^-1) / sigma'(X_k^-1)
    ///
    /// In characteristic 2 the formal derivative keeps only the odd terms:
    /// sigma'(x) = sum over odd i of sigma_i * x^(i-1).
    fn error_magnitude(
        &self,
        sigma: &GfPoly,
        omega: &GfPoly,
        locator: u8,
    ) -> Result<u8, ReedSolomonError> {
        let locator_inverse = gf_inverse(locator);

        let omega_value = omega.evaluate_at(locator_inverse);

        let mut derivative_value = 0u8;
        let mut x_power = 1u8; // locator_inverse^(i-1) for i = 1, 3, 5, ..
        let x_squared = gf_mul(locator_inverse, locator_inverse);
        let mut i = 1;
        while i <= sigma.degree() {
            derivative_value ^= gf_mul(sigma.coefficient(i), x_power);
            x_power = gf_mul(x_power, x_squared);
            i += 2;
        }

        if derivative_value == 0 {
            return Err(ReedSolomonError::ZeroDenominator);
        }

        Ok(gf_mul(
            locator,
            gf_mul(omega_value, gf_inverse(derivative_value)),
        ))
    }
}
