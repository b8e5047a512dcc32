//! Encode parameters bundled as a reusable value.

use crate::error::{InvalidInput, QrError};
use crate::qrcode::QrCode;
use crate::segment::QrSegment;
use crate::version::{Mask, QrCodeEcc, Version};

/// Parameters for an encode call.
///
/// The defaults match the common case: low error correction boosted as far
/// as the chosen version allows, any version, automatic mask, and a single
/// segment picked by classifying the whole text.
///
/// ```rust
/// use qrsymbol::{EncodeOptions, QrCodeEcc, Version};
///
/// let qr = EncodeOptions::new()
///     .ecl(QrCodeEcc::Medium)
///     .max_version(Version::new(10))
///     .encode_text("HELLO WORLD")
///     .unwrap();
/// assert!(qr.error_correction_level() >= QrCodeEcc::Medium);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EncodeOptions {
    pub ecl: QrCodeEcc,
    pub min_version: Version,
    pub max_version: Version,
    /// `None` selects the mask with the lowest penalty.
    pub mask: Option<Mask>,
    pub boost_ecl: bool,
    /// Split text into mixed-mode segments to minimise its length.
    pub optimize_segments: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            ecl: QrCodeEcc::Low,
            min_version: Version::MIN,
            max_version: Version::MAX,
            mask: None,
            boost_ecl: true,
            optimize_segments: false,
        }
    }
}

impl EncodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ecl(mut self, ecl: QrCodeEcc) -> Self {
        self.ecl = ecl;
        self
    }

    pub fn min_version(mut self, version: Version) -> Self {
        self.min_version = version;
        self
    }

    pub fn max_version(mut self, version: Version) -> Self {
        self.max_version = version;
        self
    }

    /// Pins the symbol to exactly one version.
    pub fn version(self, version: Version) -> Self {
        self.min_version(version).max_version(version)
    }

    pub fn mask(mut self, mask: Option<Mask>) -> Self {
        self.mask = mask;
        self
    }

    pub fn boost_ecl(mut self, boost: bool) -> Self {
        self.boost_ecl = boost;
        self
    }

    pub fn optimize_segments(mut self, optimize: bool) -> Self {
        self.optimize_segments = optimize;
        self
    }

    /// Checks the version range.
    pub fn validate(&self) -> Result<(), InvalidInput> {
        if self.min_version > self.max_version {
            return Err(InvalidInput::VersionRange {
                min: self.min_version.value(),
                max: self.max_version.value(),
            });
        }
        Ok(())
    }

    pub fn encode_text(&self, text: &str) -> Result<QrCode, QrError> {
        self.validate()?;
        let qr = if self.optimize_segments {
            QrCode::encode_text_optimally(
                text,
                self.ecl,
                self.min_version,
                self.max_version,
                self.mask,
                self.boost_ecl,
            )?
        } else {
            QrCode::encode_text(
                text,
                self.ecl,
                self.min_version,
                self.max_version,
                self.mask,
                self.boost_ecl,
            )?
        };
        Ok(qr)
    }

    pub fn encode_binary(&self, data: &[u8]) -> Result<QrCode, QrError> {
        self.encode_segments(&[QrSegment::make_bytes(data)])
    }

    pub fn encode_segments(&self, segs: &[QrSegment]) -> Result<QrCode, QrError> {
        self.validate()?;
        Ok(QrCode::encode_segments(
            segs,
            self.ecl,
            self.min_version,
            self.max_version,
            self.mask,
            self.boost_ecl,
        )?)
    }
}
