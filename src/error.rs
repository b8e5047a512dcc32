//! Error types surfaced to callers.
//!
//! Two kinds of failure reach the caller: malformed segment content
//! ([`InvalidInput`]) and data that no version in the requested range can
//! hold ([`DataTooLong`]). Table lookups or bit counts that disagree with each
//! other are implementation bugs and panic instead.

use thiserror::Error;

/// Segment content or a parameter that violates its allowed range.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvalidInput {
    /// A numeric segment received a character outside `0`–`9`.
    #[error("character {ch:?} at index {index} is not a decimal digit")]
    NonNumeric {
        /// Byte offset of the offending character.
        index: usize,
        /// The offending character.
        ch: char,
    },

    /// An alphanumeric segment received a character outside the 45-symbol set.
    #[error("character {ch:?} at index {index} is not in the alphanumeric set")]
    NonAlphanumeric {
        /// Byte offset of the offending character.
        index: usize,
        /// The offending character.
        ch: char,
    },

    /// A Shift-JIS pair outside the two double-byte ranges QR Kanji mode covers.
    #[error("Shift-JIS pair at byte {index} is not encodable in kanji mode")]
    InvalidKanji {
        /// Byte offset of the pair's first byte.
        index: usize,
    },

    /// Kanji input must consist of whole double-byte pairs.
    #[error("kanji input has odd byte length {0}")]
    OddKanjiLength(usize),

    /// ECI assignment values are limited to 0..=999999.
    #[error("ECI assignment value {0} out of range")]
    EciOutOfRange(u32),

    #[error("version number {0} out of range [1, 40]")]
    VersionOutOfRange(u8),

    #[error("mask number {0} out of range [0, 7]")]
    MaskOutOfRange(u8),

    /// The minimum version is above the maximum version.
    #[error("invalid version range: min {min} > max {max}")]
    VersionRange {
        /// Requested minimum version.
        min: u8,
        /// Requested maximum version.
        max: u8,
    },
}

/// Error type for when data exceeds QR code capacity.
///
/// Ways to handle this exception include:
///
/// - Decrease the error correction level if it was greater than `QrCodeEcc::Low`.
/// - Increase the maxversion argument if it was less than `Version::MAX`.
/// - Split the text data into better or optimal segments to reduce the number of bits required.
/// - Change the text or binary data to be shorter.
/// - Change the text to fit the character set of a particular segment mode (e.g. alphanumeric).
/// - Propagate the error upward to the caller/user.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DataTooLong {
    /// A segment has more characters than its count field can express.
    #[error("Segment too long")]
    SegmentTooLong,
    /// Data length exceeds capacity.
    #[error("Data length = {0} bits, Max capacity = {1} bits")]
    DataOverCapacity(usize, usize),
}

/// Any failure of an encode request.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QrError {
    #[error(transparent)]
    InvalidInput(#[from] InvalidInput),

    #[error(transparent)]
    DataTooLong(#[from] DataTooLong),
}
