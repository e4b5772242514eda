//! Bit matrix, data masks, function-module map, and the codeword reader
//!
//! The detector hands the core a square matrix of modules plus resolved
//! format metadata. `read_codewords` walks the data region in the canonical
//! two-column zig-zag, removes the data mask per module, and packs the bits
//! MSB-first into codewords.

use log::debug;

use crate::error::DecodeError;
use crate::version::Version;

/// Square matrix of modules; `true` is a dark module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitMatrix {
    size: usize,
    bits: Vec<bool>,
    mirrored: bool,
}

impl BitMatrix {
    /// All-light matrix of the given side length
    pub fn new(size: usize) -> Self {
        Self {
            size,
            bits: vec![false; size * size],
            mirrored: false,
        }
    }

    pub fn width(&self) -> usize {
        self.size
    }

    pub fn height(&self) -> usize {
        self.size
    }

    /// Module at column `x`, row `y`. With the mirror flag set, coordinates
    /// are transposed on lookup.
    pub fn get(&self, x: usize, y: usize) -> bool {
        if self.mirrored {
            self.bits[x * self.size + y]
        } else {
            self.bits[y * self.size + x]
        }
    }

    pub fn set(&mut self, x: usize, y: usize, value: bool) {
        let index = if self.mirrored {
            x * self.size + y
        } else {
            y * self.size + x
        };
        self.bits[index] = value;
    }

    pub fn toggle(&mut self, x: usize, y: usize) {
        let value = self.get(x, y);
        self.set(x, y, !value);
    }

    /// Toggle transposed coordinate lookup, used by the decoder's single
    /// mirrored retry
    pub fn set_mirror(&mut self, mirrored: bool) {
        self.mirrored = mirrored;
    }

    pub fn mirror(&self) -> bool {
        self.mirrored
    }
}

/// Data mask pattern, 0..=7
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskPattern(u8);

impl MaskPattern {
    pub fn new(pattern: u8) -> Result<Self, DecodeError> {
        if pattern > 7 {
            return Err(DecodeError::InvalidMaskPattern(pattern));
        }
        Ok(MaskPattern(pattern))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Whether the mask inverts the module at column `x`, row `y`
    pub fn is_masked(self, x: usize, y: usize) -> bool {
        match self.0 {
            0 => (x + y) % 2 == 0,
            1 => y % 2 == 0,
            2 => x % 3 == 0,
            3 => (x + y) % 3 == 0,
            4 => (x / 3 + y / 2) % 2 == 0,
            5 => x * y % 2 + x * y % 3 == 0,
            6 => (x * y % 2 + x * y % 3) % 2 == 0,
            7 => ((x + y) % 2 + x * y % 3) % 2 == 0,
            _ => unreachable!(),
        }
    }
}

/// Symbol metadata resolved from the format information modules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatInfo {
    pub ec_level: crate::version::EcLevel,
    pub mask: MaskPattern,
}

/// Map of function modules for one version.
/// `true` = function module (not data).
pub struct FunctionMask {
    size: usize,
    mask: Vec<bool>,
}

impl FunctionMask {
    pub fn new(version: Version) -> Self {
        let size = version.dimension();
        let mut function = FunctionMask {
            size,
            mask: vec![false; size * size],
        };

        // Finder patterns with their separators
        function.mark_rect(0, 0, 8, 8);
        function.mark_rect(size - 8, 0, 8, 8);
        function.mark_rect(0, size - 8, 8, 8);

        // Timing patterns (row 6 and column 6)
        for i in 0..size {
            function.mark(6, i);
            function.mark(i, 6);
        }

        // Format information areas plus the dark module
        for i in 0..9 {
            function.mark(8, i);
            function.mark(i, 8);
        }
        for i in 0..8 {
            function.mark(size - 1 - i, 8);
            function.mark(8, size - 1 - i);
        }

        // Alignment patterns, skipping the three finder corners
        let centers = version.alignment_pattern_positions();
        let last = centers.len().saturating_sub(1);
        for (i, &cy) in centers.iter().enumerate() {
            for (j, &cx) in centers.iter().enumerate() {
                if (i == 0 && j == 0) || (i == 0 && j == last) || (i == last && j == 0) {
                    continue;
                }
                function.mark_rect(cx - 2, cy - 2, 5, 5);
            }
        }

        // Version information blocks, v7 and up: 3x6 below the top-right
        // finder and its 6x3 transpose beside the bottom-left finder
        if version.number() >= 7 {
            for dy in 0..6 {
                for dx in 0..3 {
                    function.mark(size - 11 + dx, dy);
                    function.mark(dy, size - 11 + dx);
                }
            }
        }

        function
    }

    pub fn is_function(&self, x: usize, y: usize) -> bool {
        self.mask[y * self.size + x]
    }

    /// Number of data modules left for codeword and remainder bits
    pub fn data_module_count(&self) -> usize {
        self.mask.iter().filter(|&&f| !f).count()
    }

    fn mark(&mut self, x: usize, y: usize) {
        self.mask[y * self.size + x] = true;
    }

    fn mark_rect(&mut self, x: usize, y: usize, w: usize, h: usize) {
        for yy in y..(y + h).min(self.size) {
            for xx in x..(x + w).min(self.size) {
                self.mark(xx, yy);
            }
        }
    }
}

/// Walk the data region in zig-zag order, unmask each module, and pack the
/// bits MSB-first into codewords. Remainder bits (0..=7 per version) are
/// dropped.
pub fn read_codewords(
    matrix: &BitMatrix,
    version: Version,
    format: FormatInfo,
) -> Result<Vec<u8>, DecodeError> {
    let size = version.dimension();
    if matrix.width() != size {
        return Err(DecodeError::DimensionMismatch {
            got: matrix.width(),
            expected: size,
        });
    }

    let function = FunctionMask::new(version);
    let total = version.total_codewords();
    let mut codewords = Vec::with_capacity(total);

    let mut current = 0u8;
    let mut bit_count = 0usize;

    // Two-column strips from the right edge, alternating up and down;
    // the strip overlapping the timing column shifts left by one
    let mut right = size as isize - 1;
    while right >= 1 {
        if right == 6 {
            right = 5;
        }
        let upward = (right + 1) & 2 == 0;
        for vert in 0..size {
            let y = if upward { size - 1 - vert } else { vert };
            for j in 0..2 {
                let x = (right - j) as usize;
                if function.is_function(x, y) {
                    continue;
                }
                let mut bit = matrix.get(x, y);
                if format.mask.is_masked(x, y) {
                    bit = !bit;
                }
                current = (current << 1) | bit as u8;
                bit_count += 1;
                if bit_count == 8 {
                    codewords.push(current);
                    current = 0;
                    bit_count = 0;
                }
            }
        }
        right -= 2;
    }

    if codewords.len() != total {
        return Err(DecodeError::CodewordCountMismatch {
            got: codewords.len(),
            expected: total,
        });
    }

    debug!(
        "read {} codewords from a version {} symbol ({} remainder bits)",
        codewords.len(),
        version,
        bit_count
    );
    Ok(codewords)
}
