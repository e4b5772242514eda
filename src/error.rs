//! Error types for QR decode operations

use thiserror::Error;

use crate::reed_solomon::ReedSolomonError;

/// Errors that can occur while decoding a QR symbol
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Version number outside 1..=40
    #[error("version number {0} is out of range")]
    InvalidVersion(u8),

    /// Matrix dimension does not match the declared version
    #[error("matrix dimension {got} does not match version dimension {expected}")]
    DimensionMismatch { got: usize, expected: usize },

    /// Data mask pattern outside 0..=7
    #[error("mask pattern {0} is out of range")]
    InvalidMaskPattern(u8),

    /// Raw codeword stream length mismatches the version capacity
    #[error("raw codeword count {got} does not match version capacity {expected}")]
    CodewordCountMismatch { got: usize, expected: usize },

    /// The block layout did not consume the codeword stream exactly
    #[error("interleaved block layout does not cover the codeword stream")]
    BlockLayoutMismatch,

    /// Bit read past the end of the data stream
    #[error("bit stream exhausted: requested {requested} bits with {available} available")]
    BitsExhausted { requested: usize, available: usize },

    /// Bit read width outside 1..=32
    #[error("invalid bit read length {0}")]
    InvalidReadLength(usize),

    /// Unrecognized mode indicator in the segment stream
    #[error("invalid mode indicator {0:#06b}")]
    InvalidMode(u8),

    /// Malformed ECI designator prefix
    #[error("malformed ECI designator")]
    InvalidEciDesignator,

    /// Structured Append header shorter than 16 bits
    #[error("truncated structured append header")]
    TruncatedStructuredAppend,

    /// Segment payload violates its mode's value constraints
    #[error("corrupt data segment")]
    CorruptSegment,

    /// A data block could not be error-corrected
    #[error(transparent)]
    ReedSolomon(#[from] ReedSolomonError),
}

/// Type alias for Result with DecodeError
pub type Result<T> = std::result::Result<T, DecodeError>;
