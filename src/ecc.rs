//! Reed-Solomon error correction over GF(2^8) and codeword interleaving.
//!
//! The field uses the primitive polynomial x^8 + x^4 + x^3 + x^2 + 1 (0x11D)
//! with generator element 0x02. Log/antilog tables are built at compile time
//! and never mutated, so every encode call shares them freely.

use crate::capacity;
use crate::version::{QrCodeEcc, Version};

const GF_POLY: u16 = 0x11d;

/// Antilog table, doubled so that `EXP[log a + log b]` needs no reduction.
static GF_EXP: [u8; 512] = build_exp_table();
static GF_LOG: [u8; 256] = build_log_table();

const fn build_exp_table() -> [u8; 512] {
    let mut table = [0u8; 512];
    let mut x: u16 = 1;
    let mut i = 0;
    while i < 512 {
        table[i] = x as u8;
        x <<= 1;
        if x & 0x100 != 0 {
            x ^= GF_POLY;
        }
        i += 1;
    }
    table
}

const fn build_log_table() -> [u8; 256] {
    let exp = build_exp_table();
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 255 {
        table[exp[i] as usize] = i as u8;
        i += 1;
    }
    table
}

/// Multiplication in GF(2^8).
pub fn gf_mul(x: u8, y: u8) -> u8 {
    if x == 0 || y == 0 {
        return 0;
    }
    GF_EXP[usize::from(GF_LOG[usize::from(x)]) + usize::from(GF_LOG[usize::from(y)])]
}

/// Computes Reed-Solomon remainders for one fixed number of EC codewords.
pub struct ReedSolomonGenerator {
    /// Coefficients of the generator polynomial, highest power first,
    /// with the leading 1 omitted.
    divisor: Vec<u8>,
}

impl ReedSolomonGenerator {
    /// Builds the generator (x - α^0)(x - α^1)...(x - α^(degree-1)).
    ///
    /// # Panics
    ///
    /// Panics if `degree` is outside 1..=255.
    pub fn new(degree: usize) -> Self {
        assert!((1..=255).contains(&degree), "Degree out of range");
        let mut divisor = vec![0u8; degree];
        divisor[degree - 1] = 1;
        let mut root: u8 = 1;
        for _ in 0..degree {
            for j in 0..degree {
                divisor[j] = gf_mul(divisor[j], root);
                if j + 1 < degree {
                    divisor[j] ^= divisor[j + 1];
                }
            }
            root = gf_mul(root, 0x02);
        }
        Self { divisor }
    }

    pub fn degree(&self) -> usize {
        self.divisor.len()
    }

    /// Returns the remainder of `data` (as a polynomial) times x^degree
    /// divided by the generator: the EC codewords for that block.
    pub fn compute_remainder(&self, data: &[u8]) -> Vec<u8> {
        let mut result = vec![0u8; self.divisor.len()];
        for &b in data {
            let factor: u8 = b ^ result[0];
            result.copy_within(1.., 0);
            let last = result.len() - 1;
            result[last] = 0;
            for (x, &y) in result.iter_mut().zip(self.divisor.iter()) {
                *x ^= gf_mul(y, factor);
            }
        }
        result
    }
}

/// How a version/level splits its codewords into Reed-Solomon blocks.
///
/// Blocks come in at most two sizes; the short blocks come first and hold one
/// data codeword fewer than the long ones. Every block carries the same
/// number of EC codewords.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct BlockLayout {
    pub num_blocks: usize,
    pub num_short_blocks: usize,
    pub short_block_data_len: usize,
    pub ecc_len: usize,
    pub raw_codewords: usize,
}

impl BlockLayout {
    pub fn new(ver: Version, ecl: QrCodeEcc) -> Self {
        let num_blocks = capacity::num_error_correction_blocks(ver, ecl);
        let ecc_len = capacity::ecc_codewords_per_block(ver, ecl);
        let raw_codewords = capacity::num_raw_data_modules(ver) / 8;
        Self {
            num_blocks,
            num_short_blocks: num_blocks - raw_codewords % num_blocks,
            short_block_data_len: raw_codewords / num_blocks - ecc_len,
            ecc_len,
            raw_codewords,
        }
    }

    /// Data codewords held by block `i`.
    pub fn data_len(&self, i: usize) -> usize {
        self.short_block_data_len + usize::from(i >= self.num_short_blocks)
    }

    pub fn total_data_len(&self) -> usize {
        self.raw_codewords - self.ecc_len * self.num_blocks
    }
}

/// Appends EC codewords to each block of `data` and interleaves the result
/// into the final codeword sequence for placement.
///
/// Data codewords are emitted column-wise across blocks (codeword 0 of every
/// block, then codeword 1, ...), skipping short blocks once exhausted, then
/// the EC codewords the same way.
///
/// # Panics
///
/// Panics if `data.len()` is not the data codeword count of `ver`/`ecl`.
pub fn add_ecc_and_interleave(data: &[u8], ver: Version, ecl: QrCodeEcc) -> Vec<u8> {
    let layout = BlockLayout::new(ver, ecl);
    assert_eq!(data.len(), layout.total_data_len(), "data codeword count mismatch");

    let rs = ReedSolomonGenerator::new(layout.ecc_len);
    let mut blocks: Vec<&[u8]> = Vec::with_capacity(layout.num_blocks);
    let mut eccs: Vec<Vec<u8>> = Vec::with_capacity(layout.num_blocks);
    let mut dat: &[u8] = data;
    for i in 0..layout.num_blocks {
        let (block, rest) = dat.split_at(layout.data_len(i));
        eccs.push(rs.compute_remainder(block));
        blocks.push(block);
        dat = rest;
    }
    debug_assert!(dat.is_empty());

    let mut result = Vec::with_capacity(layout.raw_codewords);
    for i in 0..=layout.short_block_data_len {
        for block in &blocks {
            if let Some(&b) = block.get(i) {
                result.push(b);
            }
        }
    }
    for i in 0..layout.ecc_len {
        for ecc in &eccs {
            result.push(ecc[i]);
        }
    }
    assert_eq!(result.len(), layout.raw_codewords);
    result
}
