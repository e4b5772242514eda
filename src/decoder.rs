//! Decode orchestration
//!
//! Ties the pipeline together: codeword read, block de-interleaving,
//! per-block Reed-Solomon correction, and segment decoding. A failed
//! attempt is retried once on a mirrored view of the matrix; if the retry
//! fails too, the original error is reported.

use log::debug;

use crate::blocks::DataBlock;
use crate::error::DecodeError;
use crate::matrix::{read_codewords, BitMatrix, FormatInfo};
use crate::reed_solomon::ReedSolomonDecoder;
use crate::segments::{decode_segments, StructuredAppend};
use crate::version::{EcLevel, Version};

/// Decoded symbol payload and metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderResult {
    /// Corrected data codeword stream, aggregated across blocks
    pub raw_bytes: Vec<u8>,
    /// Decoded text
    pub text: String,
    pub version: Version,
    pub ec_level: EcLevel,
    /// Structured Append header, when the symbol carries one
    pub structured_append: Option<StructuredAppend>,
}

/// Decode a symbol from its bit matrix and resolved format metadata.
///
/// The matrix is the detector's output: located, perspective-corrected and
/// sampled down to one value per module. `version` and `format` come from
/// the symbol's version/format information as resolved by the detector.
pub fn decode(
    matrix: &BitMatrix,
    version: Version,
    format: FormatInfo,
) -> Result<DecoderResult, DecodeError> {
    match decode_attempt(matrix, version, format) {
        Ok(result) => Ok(result),
        Err(original) => {
            // The detector may have produced a transposed matrix; retry once
            // on a mirrored view and keep the original error if that fails
            debug!("decode failed ({}), retrying mirrored", original);
            let mut mirrored = matrix.clone();
            mirrored.set_mirror(true);
            decode_attempt(&mirrored, version, format).map_err(|mirrored_error| {
                debug!("mirrored retry failed ({})", mirrored_error);
                original
            })
        }
    }
}

fn decode_attempt(
    matrix: &BitMatrix,
    version: Version,
    format: FormatInfo,
) -> Result<DecoderResult, DecodeError> {
    let raw = read_codewords(matrix, version, format)?;

    let mut blocks = DataBlock::build(&raw, version, format.ec_level)?;

    let layout = version.ec_blocks(format.ec_level);
    let rs = ReedSolomonDecoder::new(layout.ec_codewords_per_block);

    let mut data = Vec::with_capacity(layout.total_data_codewords());
    for block in blocks.iter_mut() {
        rs.correct(block.codewords_mut())?;
        let num_data = block.num_data_codewords();
        data.extend_from_slice(&block.codewords()[..num_data]);
    }

    let segments = decode_segments(&data, version)?;
    debug!(
        "decoded version {} level {} symbol: {} data codewords, {} chars",
        version,
        format.ec_level,
        data.len(),
        segments.text.chars().count()
    );

    Ok(DecoderResult {
        raw_bytes: data,
        text: segments.text,
        version,
        ec_level: format.ec_level,
        structured_append: segments.structured_append,
    })
}
