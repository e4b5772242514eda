//! Reed-Solomon Error Correction Module
//!
//! Syndrome-based error correction over GF(256) as used by QR code symbols.
//! Each de-interleaved data block is corrected in place before its data
//! codewords are handed to the segment decoder.

pub mod decoder;
pub mod galois;
pub mod poly;

pub use decoder::{ReedSolomonDecoder, ReedSolomonError};
pub use galois::{gf256, Gf256};
pub use poly::GfPoly;
