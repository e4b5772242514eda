//! Test-support QR encoder
//!
//! Builds real symbols for the decode tests: segment bit streams, padding,
//! Reed-Solomon ECC, block interleaving, masking and the zig-zag render.
//! Only what the tests need; not part of the library surface.

// Each integration test binary compiles this module and uses a subset of it
#![allow(dead_code)]

use qrdecode::matrix::{BitMatrix, FunctionMask, MaskPattern};
use qrdecode::reed_solomon::galois::gf_exp;
use qrdecode::reed_solomon::GfPoly;
use qrdecode::version::{EcLevel, Version};

/// MSB-first bit accumulator
pub struct BitWriter {
    bits: Vec<bool>,
}

impl BitWriter {
    pub fn new() -> Self {
        Self { bits: Vec::new() }
    }

    pub fn push(&mut self, value: u32, count: usize) -> &mut Self {
        for i in (0..count).rev() {
            self.bits.push(value >> i & 1 == 1);
        }
        self
    }

    /// Terminator, byte alignment and 0xEC/0x11 pad codewords up to
    /// `capacity` data codewords
    pub fn into_padded_codewords(mut self, capacity: usize) -> Vec<u8> {
        let capacity_bits = capacity * 8;
        assert!(
            self.bits.len() <= capacity_bits,
            "segments exceed data capacity"
        );

        let terminator = 4.min(capacity_bits - self.bits.len());
        self.push(0, terminator);
        let align = (8 - self.bits.len() % 8) % 8;
        self.push(0, align);

        let mut codewords = vec![0u8; self.bits.len() / 8];
        for (i, &bit) in self.bits.iter().enumerate() {
            if bit {
                codewords[i / 8] |= 1 << (7 - i % 8);
            }
        }

        for pad in [0xEC, 0x11].iter().cycle() {
            if codewords.len() >= capacity {
                break;
            }
            codewords.push(*pad);
        }
        codewords
    }
}

/// Payload segments the tests can compose
pub enum Segment<'a> {
    Numeric(&'a str),
    Alphanumeric(&'a str),
    Bytes(&'a [u8]),
    /// Shift-JIS encoded double-byte characters
    Kanji(&'a [u8]),
    Eci(u32),
    StructuredAppend(u8, u8),
}

const ALPHANUMERIC_TABLE: &[u8; 45] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

fn char_count_bits_numeric(version: Version) -> usize {
    match version.number() {
        1..=9 => 10,
        10..=26 => 12,
        _ => 14,
    }
}

fn char_count_bits_alphanumeric(version: Version) -> usize {
    match version.number() {
        1..=9 => 9,
        10..=26 => 11,
        _ => 13,
    }
}

fn char_count_bits_byte(version: Version) -> usize {
    match version.number() {
        1..=9 => 8,
        _ => 16,
    }
}

fn char_count_bits_kanji(version: Version) -> usize {
    match version.number() {
        1..=9 => 8,
        10..=26 => 10,
        _ => 12,
    }
}

fn write_segment(writer: &mut BitWriter, segment: &Segment<'_>, version: Version) {
    match segment {
        Segment::Numeric(digits) => {
            writer.push(0b0001, 4);
            writer.push(digits.len() as u32, char_count_bits_numeric(version));
            let bytes = digits.as_bytes();
            let mut chunks = bytes.chunks_exact(3);
            for chunk in &mut chunks {
                let value: u32 = std::str::from_utf8(chunk).unwrap().parse().unwrap();
                writer.push(value, 10);
            }
            let rest = chunks.remainder();
            match rest.len() {
                2 => {
                    let value: u32 = std::str::from_utf8(rest).unwrap().parse().unwrap();
                    writer.push(value, 7);
                }
                1 => {
                    writer.push((rest[0] - b'0') as u32, 4);
                }
                _ => {}
            }
        }
        Segment::Alphanumeric(text) => {
            writer.push(0b0010, 4);
            writer.push(text.len() as u32, char_count_bits_alphanumeric(version));
            let indices: Vec<u32> = text
                .bytes()
                .map(|b| {
                    ALPHANUMERIC_TABLE
                        .iter()
                        .position(|&c| c == b)
                        .expect("character not in alphanumeric set") as u32
                })
                .collect();
            let mut pairs = indices.chunks_exact(2);
            for pair in &mut pairs {
                writer.push(pair[0] * 45 + pair[1], 11);
            }
            if let [single] = pairs.remainder() {
                writer.push(*single, 6);
            }
        }
        Segment::Bytes(bytes) => {
            writer.push(0b0100, 4);
            writer.push(bytes.len() as u32, char_count_bits_byte(version));
            for &b in *bytes {
                writer.push(b as u32, 8);
            }
        }
        Segment::Kanji(sjis) => {
            assert!(sjis.len() % 2 == 0, "Shift-JIS input must be byte pairs");
            writer.push(0b1000, 4);
            writer.push(sjis.len() as u32 / 2, char_count_bits_kanji(version));
            for pair in sjis.chunks_exact(2) {
                let word = (pair[0] as u32) << 8 | pair[1] as u32;
                let offset = if word < 0xE040 {
                    word - 0x8140
                } else {
                    word - 0xC140
                };
                writer.push((offset >> 8) * 0xC0 + (offset & 0xFF), 13);
            }
        }
        Segment::Eci(id) => {
            assert!(*id < 128, "test encoder only writes one-byte designators");
            writer.push(0b0111, 4);
            writer.push(*id, 8);
        }
        Segment::StructuredAppend(sequence, parity) => {
            writer.push(0b0011, 4);
            writer.push(*sequence as u32, 8);
            writer.push(*parity as u32, 8);
        }
    }
}

/// Encode segments into the padded data codeword stream
pub fn data_codewords(segments: &[Segment<'_>], version: Version, level: EcLevel) -> Vec<u8> {
    let mut writer = BitWriter::new();
    for segment in segments {
        write_segment(&mut writer, segment, version);
    }
    let capacity = version.ec_blocks(level).total_data_codewords();
    writer.into_padded_codewords(capacity)
}

/// Reed-Solomon ECC bytes for one block: remainder of data * x^ecc_len
/// divided by the generator with roots alpha^0 .. alpha^(ecc_len - 1)
pub fn rs_ecc(data: &[u8], ecc_len: usize) -> Vec<u8> {
    let mut generator = GfPoly::one();
    for i in 0..ecc_len {
        generator = generator.multiply(&GfPoly::new(&[1, gf_exp(i)]));
    }

    let shifted = GfPoly::new(data).multiply_by_monomial(ecc_len, 1);
    let (_, remainder) = shifted.divide(&generator);

    (0..ecc_len)
        .map(|i| remainder.coefficient(ecc_len - 1 - i))
        .collect()
}

/// Split the data stream into blocks, append per-block ECC, and interleave
/// into the raw codeword stream a symbol transmits
pub fn interleave(data: &[u8], version: Version, level: EcLevel) -> Vec<u8> {
    let layout = version.ec_blocks(level);
    assert_eq!(data.len(), layout.total_data_codewords());

    let mut blocks: Vec<(Vec<u8>, Vec<u8>)> = Vec::with_capacity(layout.num_blocks());
    let mut cursor = 0;
    for group in &layout.groups {
        for _ in 0..group.block_count {
            let block_data = data[cursor..cursor + group.data_codewords].to_vec();
            cursor += group.data_codewords;
            let ecc = rs_ecc(&block_data, layout.ec_codewords_per_block);
            blocks.push((block_data, ecc));
        }
    }

    let max_data_len = blocks.iter().map(|(d, _)| d.len()).max().unwrap();
    let mut result = Vec::with_capacity(version.total_codewords());
    for i in 0..max_data_len {
        for (block_data, _) in &blocks {
            if i < block_data.len() {
                result.push(block_data[i]);
            }
        }
    }
    for i in 0..layout.ec_codewords_per_block {
        for (_, ecc) in &blocks {
            result.push(ecc[i]);
        }
    }
    result
}

/// Draw the interleaved codewords into a masked matrix, zig-zag from the
/// bottom-right corner
pub fn render(codewords: &[u8], version: Version, mask: MaskPattern) -> BitMatrix {
    assert_eq!(codewords.len(), version.total_codewords());

    let size = version.dimension();
    let function = FunctionMask::new(version);
    let mut matrix = BitMatrix::new(size);

    let mut i = 0usize;
    let mut right: isize = size as isize - 1;
    while right >= 1 {
        if right == 6 {
            right = 5;
        }
        for vert in 0..size {
            for j in 0..2 {
                let x = (right - j) as usize;
                let upward = (right + 1) & 2 == 0;
                let y = if upward { size - 1 - vert } else { vert };
                if function.is_function(x, y) {
                    continue;
                }
                // Remainder bits past the codeword stream stay light
                let mut bit = if i < codewords.len() * 8 {
                    codewords[i >> 3] >> (7 - (i & 7)) & 1 == 1
                } else {
                    false
                };
                i += 1;
                if mask.is_masked(x, y) {
                    bit = !bit;
                }
                matrix.set(x, y, bit);
            }
        }
        right -= 2;
    }

    matrix
}

/// Full pipeline: segments to a decodable symbol matrix
pub fn encode_symbol(
    segments: &[Segment<'_>],
    version: Version,
    level: EcLevel,
    mask: MaskPattern,
) -> BitMatrix {
    let data = data_codewords(segments, version, level);
    let raw = interleave(&data, version, level);
    render(&raw, version, mask)
}
