//! De-interleaving of the raw codeword stream into Reed-Solomon blocks
//!
//! The symbol transmits codewords interleaved across blocks: one data
//! codeword from each block in turn, then the extra data codeword of each
//! longer block, then the ECC codewords in the same round-robin order.
//! This module undoes that interleaving.

use log::debug;

use crate::error::DecodeError;
use crate::version::{EcLevel, Version};

/// One Reed-Solomon block: data codewords followed by ECC codewords
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataBlock {
    num_data_codewords: usize,
    codewords: Vec<u8>,
}

impl DataBlock {
    /// Number of data codewords at the front of the buffer
    pub fn num_data_codewords(&self) -> usize {
        self.num_data_codewords
    }

    /// Full block buffer (data + ECC)
    pub fn codewords(&self) -> &[u8] {
        &self.codewords
    }

    /// Mutable block buffer, for in-place error correction
    pub fn codewords_mut(&mut self) -> &mut [u8] {
        &mut self.codewords
    }

    /// Split `raw` into per-block buffers according to the version's layout.
    ///
    /// Fails when the stream length mismatches the version capacity or the
    /// layout does not consume the stream exactly.
    pub fn build(
        raw: &[u8],
        version: Version,
        ec_level: EcLevel,
    ) -> Result<Vec<DataBlock>, DecodeError> {
        let expected = version.total_codewords();
        if raw.len() != expected {
            return Err(DecodeError::CodewordCountMismatch {
                got: raw.len(),
                expected,
            });
        }

        let layout = version.ec_blocks(ec_level);
        let ec_per_block = layout.ec_codewords_per_block;

        // Blocks in group order; shorter blocks come first
        let mut blocks: Vec<DataBlock> = Vec::with_capacity(layout.num_blocks());
        for group in &layout.groups {
            for _ in 0..group.block_count {
                blocks.push(DataBlock {
                    num_data_codewords: group.data_codewords,
                    codewords: vec![0u8; group.data_codewords + ec_per_block],
                });
            }
        }

        let num_blocks = blocks.len();
        let shorter_data_len = blocks[0].num_data_codewords;
        let shorter_total_len = blocks[0].codewords.len();
        let longer_start = blocks
            .iter()
            .position(|b| b.num_data_codewords > shorter_data_len)
            .unwrap_or(num_blocks);

        let mut cursor = 0usize;

        // Data phase: round-robin over all blocks, then the extra data
        // codeword of each longer block
        for i in 0..shorter_data_len {
            for block in blocks.iter_mut() {
                block.codewords[i] = raw[cursor];
                cursor += 1;
            }
        }
        for block in blocks.iter_mut().skip(longer_start) {
            block.codewords[shorter_data_len] = raw[cursor];
            cursor += 1;
        }

        // ECC phase: longer blocks are offset by their extra data codeword
        for i in shorter_data_len..shorter_total_len {
            for (j, block) in blocks.iter_mut().enumerate() {
                let offset = if j < longer_start { i } else { i + 1 };
                block.codewords[offset] = raw[cursor];
                cursor += 1;
            }
        }

        if cursor != raw.len() {
            return Err(DecodeError::BlockLayoutMismatch);
        }

        debug!(
            "de-interleaved {} codewords into {} block(s), {} ECC codewords each",
            raw.len(),
            num_blocks,
            ec_per_block
        );
        Ok(blocks)
    }
}
