//! Symbol version and error correction level descriptors
//!
//! A version (1..=40) fixes the symbol dimension, the total codeword
//! capacity, and together with an error correction level the Reed-Solomon
//! block layout. The two block tables are the Model 2 tables from the QR
//! specification.

use crate::error::DecodeError;

/// Error correction level of a QR symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EcLevel {
    /// ~7% recovery
    L,
    /// ~15% recovery
    M,
    /// ~25% recovery
    Q,
    /// ~30% recovery
    H,
}

impl EcLevel {
    fn ordinal(self) -> usize {
        match self {
            EcLevel::L => 0,
            EcLevel::M => 1,
            EcLevel::Q => 2,
            EcLevel::H => 3,
        }
    }
}

impl std::fmt::Display for EcLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EcLevel::L => write!(f, "L"),
            EcLevel::M => write!(f, "M"),
            EcLevel::Q => write!(f, "Q"),
            EcLevel::H => write!(f, "H"),
        }
    }
}

/// Symbol version, 1..=40
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version(u8);

impl Version {
    /// Validate and wrap a version number
    pub fn new(number: u8) -> Result<Self, DecodeError> {
        if !(1..=40).contains(&number) {
            return Err(DecodeError::InvalidVersion(number));
        }
        Ok(Version(number))
    }

    pub fn number(self) -> u8 {
        self.0
    }

    /// Side length in modules: 17 + 4 * version
    pub fn dimension(self) -> usize {
        17 + 4 * self.0 as usize
    }

    /// Total codewords in the symbol (data + ECC), from the count of
    /// non-function modules
    pub fn total_codewords(self) -> usize {
        let v = self.0 as usize;
        let mut modules = (16 * v + 128) * v + 64;
        if v >= 2 {
            let num_align = v / 7 + 2;
            modules -= (25 * num_align - 10) * num_align - 55;
            if v >= 7 {
                modules -= 36;
            }
        }
        modules / 8
    }

    /// Reed-Solomon block layout for this version at `level`
    pub fn ec_blocks(self, level: EcLevel) -> EcBlocks {
        let v = self.0 as usize;
        let ec_codewords_per_block = ECC_CODEWORDS_PER_BLOCK[level.ordinal()][v] as usize;
        let num_blocks = NUM_ERROR_CORRECTION_BLOCKS[level.ordinal()][v] as usize;

        let total = self.total_codewords();
        let data_total = total - num_blocks * ec_codewords_per_block;
        let short_data_len = data_total / num_blocks;
        let num_long_blocks = data_total % num_blocks;
        let num_short_blocks = num_blocks - num_long_blocks;

        let mut groups = Vec::with_capacity(2);
        if num_short_blocks > 0 {
            groups.push(BlockGroup {
                block_count: num_short_blocks,
                data_codewords: short_data_len,
            });
        }
        if num_long_blocks > 0 {
            groups.push(BlockGroup {
                block_count: num_long_blocks,
                data_codewords: short_data_len + 1,
            });
        }

        EcBlocks {
            ec_codewords_per_block,
            groups,
        }
    }

    /// Alignment pattern center coordinates for this version
    pub fn alignment_pattern_positions(self) -> Vec<usize> {
        let v = self.0 as usize;
        if v == 1 {
            return Vec::new();
        }
        let num_align = v / 7 + 2;
        let size = self.dimension();
        let step = if v == 32 {
            26
        } else {
            ((v * 4 + num_align * 2 + 1) / (num_align * 2 - 2)) * 2
        };

        let mut positions: Vec<usize> = (0..num_align - 1).map(|i| size - 7 - i * step).collect();
        positions.push(6);
        positions.reverse();
        positions
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One group of equally sized blocks in a layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockGroup {
    /// Number of blocks in this group
    pub block_count: usize,
    /// Data codewords per block in this group
    pub data_codewords: usize,
}

/// Reed-Solomon block layout for one (version, level) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EcBlocks {
    /// ECC codewords appended to every block
    pub ec_codewords_per_block: usize,
    /// Block groups, shorter blocks first
    pub groups: Vec<BlockGroup>,
}

impl EcBlocks {
    /// Total number of blocks across all groups
    pub fn num_blocks(&self) -> usize {
        self.groups.iter().map(|g| g.block_count).sum()
    }

    /// Total data codewords across all blocks
    pub fn total_data_codewords(&self) -> usize {
        self.groups
            .iter()
            .map(|g| g.block_count * g.data_codewords)
            .sum()
    }
}

// Tables from the QR Code specification (Model 2).
// Index: [ec_level][version]; version 0 is padding.
const ECC_CODEWORDS_PER_BLOCK: [[i8; 41]; 4] = [
    [
        -1, 7, 10, 15, 20, 26, 18, 20, 24, 30, 18, 20, 24, 26, 30, 22, 24, 28, 30, 28, 28, 28, 28,
        30, 30, 26, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // Low
    [
        -1, 10, 16, 26, 18, 24, 16, 18, 22, 22, 26, 30, 22, 22, 24, 24, 28, 28, 26, 26, 26, 26, 28,
        28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28,
    ], // Medium
    [
        -1, 13, 22, 18, 26, 18, 24, 18, 22, 20, 24, 28, 26, 24, 20, 30, 24, 28, 28, 26, 30, 28, 30,
        30, 30, 30, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // Quartile
    [
        -1, 17, 28, 22, 16, 22, 28, 26, 26, 24, 28, 24, 28, 22, 24, 24, 30, 28, 28, 26, 28, 30, 24,
        30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // High
];

const NUM_ERROR_CORRECTION_BLOCKS: [[i8; 41]; 4] = [
    [
        -1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 4, 4, 4, 4, 4, 6, 6, 6, 6, 7, 8, 8, 9, 9, 10, 12, 12, 12,
        13, 14, 15, 16, 17, 18, 19, 19, 20, 21, 22, 24, 25,
    ], // Low
    [
        -1, 1, 1, 1, 2, 2, 4, 4, 4, 5, 5, 5, 8, 9, 9, 10, 10, 11, 13, 14, 16, 17, 17, 18, 20, 21,
        23, 25, 26, 28, 29, 31, 33, 35, 37, 38, 40, 43, 45, 47, 49,
    ], // Medium
    [
        -1, 1, 1, 2, 2, 4, 4, 6, 6, 8, 8, 8, 10, 12, 16, 12, 17, 16, 18, 21, 20, 23, 23, 25, 27,
        29, 34, 34, 35, 38, 40, 43, 45, 48, 51, 53, 56, 59, 62, 65, 68,
    ], // Quartile
    [
        -1, 1, 1, 2, 4, 4, 4, 5, 6, 8, 8, 11, 11, 16, 16, 18, 16, 19, 21, 25, 25, 25, 34, 30, 32,
        35, 37, 40, 42, 45, 48, 51, 54, 57, 60, 63, 66, 70, 74, 77, 81,
    ], // High
];
