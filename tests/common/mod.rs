//! A small reference reader used to check encoded symbols end to end.
//!
//! It only relies on the public module accessors and the public capacity
//! tables. Unmasking, de-interleaving, the Reed-Solomon check and segment
//! parsing are done here from scratch so that a mistake in the encoder is not
//! mirrored by the reader.

#![allow(dead_code)]

use qrsymbol::capacity::{ecc_codewords_per_block, num_error_correction_blocks, num_raw_data_modules};
use qrsymbol::{Mask, QrCode, QrCodeEcc, Version};

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum DecodedSegment {
    Numeric(String),
    Alphanumeric(String),
    Bytes(Vec<u8>),
    /// Shift-JIS byte pairs.
    Kanji(Vec<u8>),
    Eci(u32),
}

#[derive(Clone, Debug)]
pub struct Decoded {
    pub version: Version,
    pub ecl: QrCodeEcc,
    pub mask: Mask,
    pub data_codewords: Vec<u8>,
    pub segments: Vec<DecodedSegment>,
}

impl Decoded {
    /// Payload bytes of every segment in order, ECI designators excluded.
    pub fn payload(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for seg in &self.segments {
            match seg {
                DecodedSegment::Numeric(s) | DecodedSegment::Alphanumeric(s) => out.extend_from_slice(s.as_bytes()),
                DecodedSegment::Bytes(b) | DecodedSegment::Kanji(b) => out.extend_from_slice(b),
                DecodedSegment::Eci(_) => {}
            }
        }
        out
    }
}

const ALNUM: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

/// Reads a symbol back into its segments, panicking on any inconsistency.
pub fn decode(qr: &QrCode) -> Decoded {
    let version = version_from_size(qr.size());
    let (ecl, mask) = read_format(qr);
    if version.value() >= 7 {
        assert_eq!(read_version(qr), u32::from(version.value()), "version information");
    }

    let codewords = read_codewords(qr, mask, version);
    let data_codewords = deinterleave_and_check(&codewords, version, ecl);
    let segments = parse_segments(&data_codewords, version);
    Decoded {
        version,
        ecl,
        mask,
        data_codewords,
        segments,
    }
}

pub fn version_from_size(size: i32) -> Version {
    assert_eq!((size - 17) % 4, 0, "size {size}");
    Version::new(((size - 17) / 4) as u8)
}

/// Returns the ECC level and mask after checking both format copies agree
/// and form a valid BCH codeword.
pub fn read_format(qr: &QrCode) -> (QrCodeEcc, Mask) {
    let size = qr.size();
    let m = |x: i32, y: i32| u32::from(qr.get_module(x, y));

    let mut first = 0u32;
    let mut second = 0u32;
    for i in 0..15 {
        let (x1, y1) = match i {
            0..=5 => (8, i),
            6 => (8, 7),
            7 => (8, 8),
            8 => (7, 8),
            _ => (14 - i, 8),
        };
        let (x2, y2) = if i < 8 { (size - 1 - i, 8) } else { (8, size - 15 + i) };
        first |= m(x1, y1) << i;
        second |= m(x2, y2) << i;
    }
    assert_eq!(first, second, "format copies differ");
    assert!(qr.get_module(8, size - 8), "dark module");

    let word = first ^ 0x5412;
    let mut rem = word;
    for shift in (0..5).rev() {
        if rem & (1 << (shift + 10)) != 0 {
            rem ^= 0x537 << shift;
        }
    }
    assert_eq!(rem, 0, "format word {first:#06x} is not a BCH codeword");

    let data = word >> 10;
    let ecl = match data >> 3 {
        1 => QrCodeEcc::Low,
        0 => QrCodeEcc::Medium,
        3 => QrCodeEcc::Quartile,
        _ => QrCodeEcc::High,
    };
    (ecl, Mask::new((data & 7) as u8))
}

/// Returns the six version bits after checking both blocks agree and the
/// Golay remainder.
pub fn read_version(qr: &QrCode) -> u32 {
    let size = qr.size();
    let mut right = 0u32;
    let mut bottom = 0u32;
    for i in 0..18 {
        let a = size - 11 + i % 3;
        let b = i / 3;
        right |= u32::from(qr.get_module(a, b)) << i;
        bottom |= u32::from(qr.get_module(b, a)) << i;
    }
    assert_eq!(right, bottom, "version blocks differ");
    let mut rem = right;
    for shift in (0..6).rev() {
        if rem & (1 << (shift + 12)) != 0 {
            rem ^= 0x1f25 << shift;
        }
    }
    assert_eq!(rem, 0, "version word {right:#07x} is not a Golay codeword");
    right >> 12
}

fn masked(mask: Mask, x: i32, y: i32) -> bool {
    let (i, j) = (y, x);
    match mask.value() {
        0 => (i + j) % 2 == 0,
        1 => i % 2 == 0,
        2 => j % 3 == 0,
        3 => (i + j) % 3 == 0,
        4 => (i / 2 + j / 3) % 2 == 0,
        5 => (i * j) % 2 + (i * j) % 3 == 0,
        6 => ((i * j) % 2 + (i * j) % 3) % 2 == 0,
        _ => ((i + j) % 2 + (i * j) % 3) % 2 == 0,
    }
}

/// Reads the data region along the placement path, unmasked, MSB first.
pub fn read_codewords(qr: &QrCode, mask: Mask, version: Version) -> Vec<u8> {
    let size = qr.size();
    let mut columns: Vec<i32> = Vec::new();
    let mut x = size - 1;
    while x > 0 {
        if x == 6 {
            x -= 1;
        }
        columns.push(x);
        x -= 2;
    }

    let mut bits: Vec<bool> = Vec::new();
    for (pair, &right) in columns.iter().enumerate() {
        let rows: Vec<i32> = if pair % 2 == 0 {
            (0..size).rev().collect()
        } else {
            (0..size).collect()
        };
        for y in rows {
            for x in [right, right - 1] {
                if !qr.is_function_module(x, y) {
                    bits.push(qr.get_module(x, y) ^ masked(mask, x, y));
                }
            }
        }
    }
    assert_eq!(bits.len(), num_raw_data_modules(version), "data module count");

    bits.chunks_exact(8)
        .map(|c| c.iter().fold(0u8, |acc, &b| (acc << 1) | u8::from(b)))
        .collect()
}

fn gf_mul(mut a: u8, mut b: u8) -> u8 {
    let mut p = 0u8;
    while b != 0 {
        if b & 1 != 0 {
            p ^= a;
        }
        let carry = a & 0x80 != 0;
        a <<= 1;
        if carry {
            a ^= 0x1d;
        }
        b >>= 1;
    }
    p
}

/// Splits interleaved codewords back into blocks, checks that every block
/// has zero syndromes at alpha^0 .. alpha^(ecc-1), and returns the data
/// codewords in block order.
pub fn deinterleave_and_check(codewords: &[u8], version: Version, ecl: QrCodeEcc) -> Vec<u8> {
    let num_blocks = num_error_correction_blocks(version, ecl);
    let ecc_len = ecc_codewords_per_block(version, ecl);
    let total = codewords.len();
    let short_blocks = num_blocks - total % num_blocks;
    let short_data = total / num_blocks - ecc_len;
    let data_len = |b: usize| short_data + usize::from(b >= short_blocks);

    let mut blocks: Vec<Vec<u8>> = vec![Vec::new(); num_blocks];
    let mut it = codewords.iter().copied();
    for col in 0..=short_data {
        for (b, block) in blocks.iter_mut().enumerate() {
            if col < data_len(b) {
                block.push(it.next().unwrap());
            }
        }
    }
    for _ in 0..ecc_len {
        for block in blocks.iter_mut() {
            block.push(it.next().unwrap());
        }
    }
    assert!(it.next().is_none());

    let mut data = Vec::new();
    for (b, block) in blocks.iter().enumerate() {
        let mut root = 1u8;
        for k in 0..ecc_len {
            let syndrome = block.iter().fold(0u8, |acc, &c| gf_mul(acc, root) ^ c);
            assert_eq!(syndrome, 0, "block {b} syndrome {k}");
            root = gf_mul(root, 2);
        }
        data.extend_from_slice(&block[..data_len(b)]);
    }
    data
}

struct BitReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl BitReader<'_> {
    fn remaining(&self) -> usize {
        self.data.len() * 8 - self.pos
    }

    fn read(&mut self, n: usize) -> u32 {
        assert!(n <= self.remaining(), "read past end");
        let mut v = 0u32;
        for _ in 0..n {
            let bit = (self.data[self.pos / 8] >> (7 - self.pos % 8)) & 1;
            v = (v << 1) | u32::from(bit);
            self.pos += 1;
        }
        v
    }
}

fn count_bits(mode: u32, version: Version) -> usize {
    let class = match version.value() {
        1..=9 => 0,
        10..=26 => 1,
        _ => 2,
    };
    let table: [usize; 3] = match mode {
        1 => [10, 12, 14],
        2 => [9, 11, 13],
        4 => [8, 16, 16],
        8 => [8, 10, 12],
        _ => unreachable!(),
    };
    table[class]
}

/// Parses segments up to the terminator and checks the bit and byte padding
/// that follows.
pub fn parse_segments(data: &[u8], version: Version) -> Vec<DecodedSegment> {
    let mut r = BitReader { data, pos: 0 };
    let mut segs = Vec::new();
    while r.remaining() >= 4 {
        let mode = r.read(4);
        if mode == 0 {
            break;
        }
        let seg = match mode {
            7 => {
                let first = r.read(8);
                let value = if first & 0x80 == 0 {
                    first
                } else if first & 0xc0 == 0x80 {
                    ((first & 0x3f) << 8) | r.read(8)
                } else {
                    assert_eq!(first & 0xe0, 0xc0, "ECI prefix");
                    ((first & 0x1f) << 16) | r.read(16)
                };
                DecodedSegment::Eci(value)
            }
            1 => {
                let mut n = r.read(count_bits(mode, version)) as usize;
                let mut s = String::new();
                while n > 0 {
                    let (bits, digits) = match n {
                        1 => (4, 1),
                        2 => (7, 2),
                        _ => (10, 3),
                    };
                    s.push_str(&format!("{:0width$}", r.read(bits), width = digits));
                    n -= digits;
                }
                DecodedSegment::Numeric(s)
            }
            2 => {
                let mut n = r.read(count_bits(mode, version)) as usize;
                let mut s = String::new();
                while n >= 2 {
                    let v = r.read(11) as usize;
                    s.push(char::from(ALNUM[v / 45]));
                    s.push(char::from(ALNUM[v % 45]));
                    n -= 2;
                }
                if n == 1 {
                    s.push(char::from(ALNUM[r.read(6) as usize]));
                }
                DecodedSegment::Alphanumeric(s)
            }
            4 => {
                let n = r.read(count_bits(mode, version)) as usize;
                DecodedSegment::Bytes((0..n).map(|_| r.read(8) as u8).collect())
            }
            8 => {
                let n = r.read(count_bits(mode, version)) as usize;
                let mut out = Vec::with_capacity(n * 2);
                for _ in 0..n {
                    let v = r.read(13);
                    let packed = ((v / 0xc0) << 8) | (v % 0xc0);
                    let sjis = if packed + 0x8140 <= 0x9ffc {
                        packed + 0x8140
                    } else {
                        packed + 0xc140
                    };
                    out.push((sjis >> 8) as u8);
                    out.push(sjis as u8);
                }
                DecodedSegment::Kanji(out)
            }
            other => panic!("unknown mode indicator {other:#x}"),
        };
        segs.push(seg);
    }

    // Whatever is left is zero bits to the byte boundary, then alternating pad bytes.
    let align = r.remaining() % 8;
    assert_eq!(r.read(align), 0, "non-zero alignment bits");
    let mut pad = 0xec;
    while r.remaining() > 0 {
        assert_eq!(r.read(8), pad, "pad byte");
        pad ^= 0xec ^ 0x11;
    }
    segs
}
