//! Segment construction: classifies input and packs it into mode-tagged bit strings.

use crate::bitbuffer::BitBuffer;
use crate::error::InvalidInput;
use crate::version::Version;

/// A segment of data in a QR code.
///
/// Supports numeric, alphanumeric, byte, kanji and ECI modes. Segments are
/// immutable and created using factory functions like [`QrSegment::make_numeric`],
/// [`QrSegment::make_alphanumeric`] or [`QrSegment::make_bytes`]. The mode
/// indicator and character count field are not part of `data`; they are
/// added when the segment is placed into a symbol of a known version.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct QrSegment {
    mode: QrSegmentMode,
    numchars: usize,
    data: Vec<u8>,
    bitlength: usize,
}

impl QrSegment {
    /// Creates a segment for binary data in byte mode.
    ///
    /// # Arguments
    ///
    /// * `data` - The byte data to encode.
    ///
    /// # Returns
    ///
    /// A new `QrSegment` in byte mode.
    pub fn make_bytes(data: &[u8]) -> Self {
        QrSegment::new(QrSegmentMode::Byte, data.len(), data.to_vec(), data.len() * 8)
    }

    /// Creates a segment for a string of decimal digits in numeric mode.
    ///
    /// Digits are packed three at a time into 10 bits; a trailing pair takes
    /// 7 bits and a trailing single digit 4 bits.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidInput::NonNumeric`] if `text` contains anything other
    /// than `0`–`9`.
    pub fn make_numeric(text: &str) -> Result<Self, InvalidInput> {
        if let Some((index, ch)) = text.char_indices().find(|&(_, c)| !c.is_ascii_digit()) {
            return Err(InvalidInput::NonNumeric { index, ch });
        }
        Ok(Self::pack_numeric(text))
    }

    /// Creates a segment for alphanumeric text.
    ///
    /// Allowed characters: 0–9, A–Z (uppercase), space, `$`, `%`, `*`, `+`, `-`, `.`, `/`, `:`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidInput::NonAlphanumeric`] on the first character outside
    /// that set.
    pub fn make_alphanumeric(text: &str) -> Result<Self, InvalidInput> {
        if let Some((index, ch)) = text
            .char_indices()
            .find(|&(_, c)| !ALPHANUMERIC_CHARSET.contains(c))
        {
            return Err(InvalidInput::NonAlphanumeric { index, ch });
        }
        Ok(Self::pack_alphanumeric(text))
    }

    /// Creates a kanji mode segment from Shift-JIS encoded double-byte characters.
    ///
    /// Each pair must lie in 0x8140–0x9FFC or 0xE040–0xEBBF; it is compacted
    /// into 13 bits.
    pub fn make_kanji(sjis: &[u8]) -> Result<Self, InvalidInput> {
        if sjis.len() % 2 != 0 {
            return Err(InvalidInput::OddKanjiLength(sjis.len()));
        }
        let mut bb = BitBuffer::with_capacity(sjis.len() / 2 * 13);
        for (i, pair) in sjis.chunks_exact(2).enumerate() {
            if !(0x40..=0xfc).contains(&pair[1]) || pair[1] == 0x7f {
                return Err(InvalidInput::InvalidKanji { index: i * 2 });
            }
            let code = u16::from_be_bytes([pair[0], pair[1]]);
            let reduced: u16 = match code {
                0x8140..=0x9ffc => code - 0x8140,
                0xe040..=0xebbf => code - 0xc140,
                _ => return Err(InvalidInput::InvalidKanji { index: i * 2 }),
            };
            bb.append_bits(u32::from((reduced >> 8) * 0xc0 + (reduced & 0xff)), 13);
        }
        let bitlength = bb.len();
        Ok(QrSegment::new(QrSegmentMode::Kanji, sjis.len() / 2, bb.into_bytes(), bitlength))
    }

    /// Creates a segment representing an Extended Channel Interpretation
    /// (ECI) designator with the given assignment value.
    ///
    /// Values below 2^7 take one byte, below 2^14 two bytes and below 10^6
    /// three bytes, each prefixed by its length marker.
    pub fn make_eci(assignval: u32) -> Result<Self, InvalidInput> {
        let mut bb = BitBuffer::with_capacity(24);
        if assignval < 1 << 7 {
            bb.append_bits(assignval, 8);
        } else if assignval < 1 << 14 {
            bb.append_bits(0b10, 2);
            bb.append_bits(assignval, 14);
        } else if assignval < 1_000_000 {
            bb.append_bits(0b110, 3);
            bb.append_bits(assignval, 21);
        } else {
            return Err(InvalidInput::EciOutOfRange(assignval));
        }
        let bitlength = bb.len();
        Ok(QrSegment::new(QrSegmentMode::Eci, 0, bb.into_bytes(), bitlength))
    }

    /// Picks the single mode able to hold all of `text`: numeric if every
    /// character is a digit, else alphanumeric if every character is in the
    /// 45-character set, else byte.
    pub fn classify(text: &str) -> QrSegmentMode {
        if QrSegment::is_numeric(text) {
            QrSegmentMode::Numeric
        } else if QrSegment::is_alphanumeric(text) {
            QrSegmentMode::Alphanumeric
        } else {
            QrSegmentMode::Byte
        }
    }

    /// Returns the segments for `text` using the mode from [`QrSegment::classify`].
    /// Byte mode carries the UTF-8 encoding.
    ///
    /// Empty text yields no segments.
    pub fn make_segments(text: &str) -> Vec<Self> {
        if text.is_empty() {
            return Vec::new();
        }
        vec![match QrSegment::classify(text) {
            QrSegmentMode::Numeric => QrSegment::pack_numeric(text),
            QrSegmentMode::Alphanumeric => QrSegment::pack_alphanumeric(text),
            _ => QrSegment::make_bytes(text.as_bytes()),
        }]
    }

    /// Creates a segment from raw parts.
    ///
    /// # Panics
    ///
    /// Panics if `data` is too short to hold `bitlength` bits.
    pub fn new(mode: QrSegmentMode, numchars: usize, data: Vec<u8>, bitlength: usize) -> Self {
        assert!(bitlength <= data.len() * 8);
        Self {
            mode,
            numchars,
            data,
            bitlength,
        }
    }

    pub fn mode(&self) -> QrSegmentMode {
        self.mode
    }

    pub fn num_chars(&self) -> usize {
        self.numchars
    }

    /// Payload bits, packed MSB first.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn bit_length(&self) -> usize {
        self.bitlength
    }

    // Caller guarantees all bytes are ASCII digits.
    pub(crate) fn pack_numeric(text: &str) -> Self {
        let mut bb = BitBuffer::with_capacity(text.len() * 10 / 3 + 4);
        let mut accumdata: u32 = 0;
        let mut accumcount: u8 = 0;
        for b in text.bytes() {
            debug_assert!(b.is_ascii_digit());
            accumdata = accumdata * 10 + u32::from(b - b'0');
            accumcount += 1;
            if accumcount == 3 {
                bb.append_bits(accumdata, 10);
                accumdata = 0;
                accumcount = 0;
            }
        }
        if accumcount > 0 {
            bb.append_bits(accumdata, accumcount * 3 + 1);
        }
        let bitlength = bb.len();
        QrSegment::new(QrSegmentMode::Numeric, text.len(), bb.into_bytes(), bitlength)
    }

    // Caller guarantees every character is in ALPHANUMERIC_CHARSET.
    pub(crate) fn pack_alphanumeric(text: &str) -> Self {
        let mut bb = BitBuffer::with_capacity(text.len() * 11 / 2 + 6);
        let mut accumdata: u32 = 0;
        let mut accumcount: u8 = 0;
        for c in text.chars() {
            let i = ALPHANUMERIC_CHARSET.find(c).unwrap_or_default() as u32;
            accumdata = accumdata * 45 + i;
            accumcount += 1;
            if accumcount == 2 {
                bb.append_bits(accumdata, 11);
                accumdata = 0;
                accumcount = 0;
            }
        }
        if accumcount > 0 {
            bb.append_bits(accumdata, 6);
        }
        let bitlength = bb.len();
        QrSegment::new(QrSegmentMode::Alphanumeric, text.len(), bb.into_bytes(), bitlength)
    }

    /// Number of bytes the payload of a `mode` segment with `numchars`
    /// characters occupies; equals `data().len()` of the built segment.
    ///
    /// For ECI the three-byte worst case is returned. `None` on overflow.
    pub fn calc_buffer_size(mode: QrSegmentMode, numchars: usize) -> Option<usize> {
        let temp = Self::calc_bit_length(mode, numchars)?;
        Some(temp / 8 + usize::from(temp % 8 != 0))
    }

    /// Number of payload bits of a `mode` segment with `numchars` characters.
    ///
    /// `None` on overflow, or for an ECI segment claiming characters.
    pub fn calc_bit_length(mode: QrSegmentMode, numchars: usize) -> Option<usize> {
        let mul_frac_ceil = |numer: usize, denom: usize| {
            Some(numchars)
                .and_then(|x| x.checked_mul(numer))
                .and_then(|x| x.checked_add(denom - 1))
                .map(|x| x / denom)
        };
        use QrSegmentMode::*;
        match mode {
            Numeric => mul_frac_ceil(10, 3),
            Alphanumeric => mul_frac_ceil(11, 2),
            Byte => mul_frac_ceil(8, 1),
            Kanji => mul_frac_ceil(13, 1),
            Eci if numchars == 0 => Some(3 * 8),
            Eci => None,
        }
    }

    /// Total bits a segment contributes to any symbol: mode indicator, the
    /// widest character count field, and the payload.
    ///
    /// `None` if `numchars` cannot be expressed even in the widest count field.
    pub fn required_bits(mode: QrSegmentMode, numchars: usize) -> Option<usize> {
        let ccbits = mode.num_char_count_bits(Version::MAX);
        if numchars >= 1usize << ccbits && mode != QrSegmentMode::Eci {
            return None;
        }
        Self::calc_bit_length(mode, numchars)?.checked_add(4 + usize::from(ccbits))
    }

    /// Calculates the number of bits needed to encode the given segments at
    /// the given version.
    ///
    /// Returns `None` if a segment has too many characters to fit its length
    /// field, or the total bits exceed `usize::MAX`.
    pub fn get_total_bits(segs: &[Self], version: Version) -> Option<usize> {
        let mut result: usize = 0;
        for seg in segs {
            let ccbits: u8 = seg.mode.num_char_count_bits(version);
            if let Some(limit) = 1usize.checked_shl(ccbits.into()) {
                if seg.mode != QrSegmentMode::Eci && seg.numchars >= limit {
                    return None;
                }
            }
            result = result.checked_add(4 + usize::from(ccbits))?;
            result = result.checked_add(seg.bitlength)?;
        }
        Some(result)
    }

    /// Tests whether the given string can be encoded as a segment in numeric mode.
    pub fn is_numeric(text: &str) -> bool {
        text.chars().all(|c| c.is_ascii_digit())
    }

    /// Tests whether the given string can be encoded as a segment in alphanumeric mode.
    pub fn is_alphanumeric(text: &str) -> bool {
        text.chars().all(|c| ALPHANUMERIC_CHARSET.contains(c))
    }
}

/// The set of all legal characters in alphanumeric mode, where each
/// character value maps to the index in the string.
pub(crate) static ALPHANUMERIC_CHARSET: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

/// Describes how a segment's data bits are interpreted.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum QrSegmentMode {
    Numeric,
    Alphanumeric,
    Byte,
    Kanji,
    Eci,
}

impl QrSegmentMode {
    /// The 4-bit mode indicator.
    pub(crate) fn mode_bits(self) -> u32 {
        use QrSegmentMode::*;
        match self {
            Numeric => 0x1,
            Alphanumeric => 0x2,
            Byte => 0x4,
            Kanji => 0x8,
            Eci => 0x7,
        }
    }

    /// Width of the character count field for this mode at the given version.
    pub fn num_char_count_bits(self, ver: Version) -> u8 {
        use QrSegmentMode::*;
        (match self {
            Numeric => [10, 12, 14],
            Alphanumeric => [9, 11, 13],
            Byte => [8, 16, 16],
            Kanji => [8, 10, 12],
            Eci => [0, 0, 0],
        })[ver.count_class()]
    }
}
