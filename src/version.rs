//! Symbol parameters: version number, mask pattern and error correction level.

use crate::error::InvalidInput;

/// Error correction level for a QR code.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum QrCodeEcc {
    /// Tolerates ~7% erroneous codewords.
    Low,
    /// Tolerates ~15% erroneous codewords.
    Medium,
    /// Tolerates ~25% erroneous codewords.
    Quartile,
    /// Tolerates ~30% erroneous codewords.
    High,
}

impl QrCodeEcc {
    /// All levels, from least to most redundant.
    pub const ALL: [QrCodeEcc; 4] = [
        QrCodeEcc::Low,
        QrCodeEcc::Medium,
        QrCodeEcc::Quartile,
        QrCodeEcc::High,
    ];

    /// Returns an unsigned 2-bit integer (in the range 0 to 3).
    pub(crate) fn ordinal(self) -> usize {
        use QrCodeEcc::*;
        match self {
            Low => 0,
            Medium => 1,
            Quartile => 2,
            High => 3,
        }
    }

    /// Returns the 2-bit value stored in the format information field.
    pub(crate) fn format_bits(self) -> u8 {
        use QrCodeEcc::*;
        match self {
            Low => 1,
            Medium => 0,
            Quartile => 3,
            High => 2,
        }
    }
}

/// A QR code version (1–40).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "u8", into = "u8")
)]
pub struct Version(u8);

impl Version {
    /// The minimum version number supported in the QR Code Model 2 standard.
    pub const MIN: Version = Version(1);

    /// The maximum version number supported in the QR Code Model 2 standard.
    pub const MAX: Version = Version(40);

    /// Creates a version object from the given number.
    ///
    /// # Panics
    ///
    /// Panics if the number is outside the range [1, 40]. Use
    /// `Version::try_from` for a checked conversion.
    pub const fn new(ver: u8) -> Self {
        assert!(
            Version::MIN.value() <= ver && ver <= Version::MAX.value(),
            "Version number out of range"
        );
        Self(ver)
    }

    /// Returns the value, which is in the range [1, 40].
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Width and height of a symbol of this version, in modules.
    pub const fn size(self) -> u8 {
        self.0 * 4 + 17
    }

    /// Index of the character count indicator width class: 0 for versions
    /// 1–9, 1 for 10–26 and 2 for 27–40.
    pub(crate) const fn count_class(self) -> usize {
        ((self.0 + 7) / 17) as usize
    }

    /// Returns the next version, or `None` at [`Version::MAX`].
    pub fn next(self) -> Option<Version> {
        if self < Version::MAX {
            Some(Version(self.0 + 1))
        } else {
            None
        }
    }

    /// Iterates the versions from `min` to `max`, inclusive.
    pub fn range(min: Version, max: Version) -> impl Iterator<Item = Version> {
        (min.0..=max.0).map(Version)
    }
}

impl TryFrom<u8> for Version {
    type Error = InvalidInput;

    fn try_from(ver: u8) -> Result<Self, Self::Error> {
        if (Version::MIN.0..=Version::MAX.0).contains(&ver) {
            Ok(Version(ver))
        } else {
            Err(InvalidInput::VersionOutOfRange(ver))
        }
    }
}

impl From<Version> for u8 {
    fn from(ver: Version) -> u8 {
        ver.0
    }
}

/// A mask pattern (0–7).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "u8", into = "u8")
)]
pub struct Mask(u8);

impl Mask {
    /// Creates a mask object from the given number.
    ///
    /// # Panics
    ///
    /// Panics if the number is outside the range [0, 7].
    pub const fn new(mask: u8) -> Self {
        assert!(mask <= 7, "Mask value out of range");
        Self(mask)
    }

    /// Returns the value, which is in the range [0, 7].
    pub const fn value(self) -> u8 {
        self.0
    }

    /// All eight masks in index order.
    pub fn all() -> impl Iterator<Item = Mask> {
        (0u8..8).map(Mask)
    }
}

impl TryFrom<u8> for Mask {
    type Error = InvalidInput;

    fn try_from(mask: u8) -> Result<Self, Self::Error> {
        if mask <= 7 {
            Ok(Mask(mask))
        } else {
            Err(InvalidInput::MaskOutOfRange(mask))
        }
    }
}

impl From<Mask> for u8 {
    fn from(mask: Mask) -> u8 {
        mask.0
    }
}
