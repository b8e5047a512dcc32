//! Bit accumulator used to pack segment payloads and data codewords.

/// An appendable sequence of bits, packed most-significant-bit first into bytes.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct BitBuffer {
    data: Vec<u8>,
    length: usize,
}

impl BitBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty buffer able to hold `bits` bits without reallocating.
    pub fn with_capacity(bits: usize) -> Self {
        Self {
            data: Vec::with_capacity(bits.div_ceil(8)),
            length: 0,
        }
    }

    /// Number of bits appended so far.
    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Appends the low `len` bits of `val`, most significant first.
    ///
    /// # Panics
    ///
    /// Panics if `len > 31` or `val` has bits set above `len`.
    pub fn append_bits(&mut self, val: u32, len: u8) {
        assert!(len <= 31 && (val >> len) == 0);
        for i in (0..len).rev() {
            let shift: u8 = 7 - ((self.length as u8) & 7);
            let bit: u8 = ((val >> i) as u8) & 1;
            if shift == 7 {
                self.data.push(bit << shift);
            } else if let Some(last) = self.data.last_mut() {
                *last |= bit << shift;
            }
            self.length += 1;
        }
    }

    /// Appends the first `bitlen` bits of an already packed byte slice.
    pub fn append_packed(&mut self, packed: &[u8], bitlen: usize) {
        debug_assert!(bitlen <= packed.len() * 8);
        for i in 0..bitlen {
            let bit: u8 = (packed[i >> 3] >> (7 - (i & 7))) & 1;
            self.append_bits(bit.into(), 1);
        }
    }

    /// Returns bit `i`, counting from the start of the buffer.
    pub fn get(&self, i: usize) -> bool {
        assert!(i < self.length);
        (self.data[i >> 3] >> (7 - (i & 7))) & 1 != 0
    }

    /// The packed bytes; bits past `len()` in the last byte are zero.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}
