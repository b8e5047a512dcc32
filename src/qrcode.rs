//! QR code encoding functionality.
//!
//! This module ties the pipeline together: segments are sized against the
//! version tables, assembled into data codewords, extended with Reed-Solomon
//! codewords, drawn into a module grid and masked. The result is an
//! immutable [`QrCode`].

use tracing::debug;

use crate::capacity;
use crate::codewords;
use crate::ecc;
use crate::error::DataTooLong;
use crate::mask;
use crate::matrix::{Bitmap, ModuleGrid};
use crate::optimal;
use crate::segment::QrSegment;
use crate::version::{Mask, QrCodeEcc, Version};

/// A QR Code symbol, representing a square grid of dark and light modules.
///
/// This struct supports QR Code Model 2, covering versions 1 to 40, all four error correction levels,
/// and numeric, alphanumeric, byte, kanji and ECI segments. Instances are immutable after creation.
///
/// # Creation
///
/// - High-level: Use [`QrCode::encode_text`] or [`QrCode::encode_binary`].
/// - Mid-level: Build segments yourself and call [`QrCode::encode_segments`].
/// - Low-level: Supply data codewords to [`QrCode::encode_codewords`].
///
/// # Example
///
/// ```rust
/// use qrsymbol::{QrCode, QrCodeEcc, Version};
///
/// let qr = QrCode::encode_text(
///     "Hello, World!",
///     QrCodeEcc::Low,
///     Version::MIN,
///     Version::MAX,
///     None,
///     true,
/// ).unwrap();
///
/// assert_eq!(qr.version().value(), 1);
/// assert_eq!(qr.size(), 21);
/// ```
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct QrCode {
    version: Version,

    /// The width and height of this QR Code, measured in modules, between
    /// 21 and 177 (inclusive). This is equal to version * 4 + 17.
    size: i32,

    ecl: QrCodeEcc,

    mask: Mask,

    /// The modules of this QR Code (0 = light, 1 = dark).
    modules: Bitmap,

    /// Finder, timing, alignment, format and version modules.
    function: Bitmap,
}

impl QrCode {
    /// Encodes a text string into a QR code.
    ///
    /// The whole string is classified once: numeric if every character is a
    /// digit, alphanumeric if every character is in the 45-character set,
    /// otherwise UTF-8 bytes. The smallest version within the given range that
    /// can hold the data is chosen. If `boostecl` is `true`, the error
    /// correction level may be increased if it doesn't increase the version.
    /// The `mask` can be `None` for automatic selection or a value from 0 to 7.
    ///
    /// # Arguments
    ///
    /// * `text` - The text to encode.
    /// * `ecl` - Error correction level.
    /// * `minversion` - Minimum QR code version.
    /// * `maxversion` - Maximum QR code version.
    /// * `mask` - Optional mask pattern.
    /// * `boostecl` - Whether to boost error correction if possible.
    ///
    /// # Returns
    ///
    /// A `Result` containing the QR code or a [`DataTooLong`] error if the data is too long.
    ///
    /// # Panics
    ///
    /// Panics if `minversion > maxversion`.
    pub fn encode_text(
        text: &str,
        ecl: QrCodeEcc,
        minversion: Version,
        maxversion: Version,
        mask: Option<Mask>,
        boostecl: bool,
    ) -> Result<Self, DataTooLong> {
        let segs: Vec<QrSegment> = QrSegment::make_segments(text);
        QrCode::encode_segments(&segs, ecl, minversion, maxversion, mask, boostecl)
    }

    /// Encodes binary data into a QR code as a single byte-mode segment.
    ///
    /// Similar to [`QrCode::encode_text`], but for arbitrary byte data. The
    /// input data must fit within the specified version range and error
    /// correction level.
    ///
    /// # Panics
    ///
    /// Panics if `minversion > maxversion`.
    pub fn encode_binary(
        data: &[u8],
        ecl: QrCodeEcc,
        minversion: Version,
        maxversion: Version,
        mask: Option<Mask>,
        boostecl: bool,
    ) -> Result<Self, DataTooLong> {
        let segs = [QrSegment::make_bytes(data)];
        QrCode::encode_segments(&segs, ecl, minversion, maxversion, mask, boostecl)
    }

    /// Encodes text using the mixed-mode segmentation with the fewest bits.
    ///
    /// Each version in range is tried in turn with segments optimised for its
    /// character count widths; the first that fits is used.
    ///
    /// # Panics
    ///
    /// Panics if `minversion > maxversion`.
    pub fn encode_text_optimally(
        text: &str,
        ecl: QrCodeEcc,
        minversion: Version,
        maxversion: Version,
        mask: Option<Mask>,
        boostecl: bool,
    ) -> Result<Self, DataTooLong> {
        assert!(minversion <= maxversion, "Invalid value");
        let mut err = DataTooLong::SegmentTooLong;
        for version in Version::range(minversion, maxversion) {
            let segs = optimal::make_segments_optimally(text, version);
            let datacapacitybits = capacity::num_data_codewords(version, ecl) * 8;
            match QrSegment::get_total_bits(&segs, version) {
                Some(n) if n <= datacapacitybits => {
                    debug!(version = version.value(), segments = segs.len(), "optimal segmentation fits");
                    return QrCode::encode_segments(&segs, ecl, version, version, mask, boostecl);
                }
                Some(n) => err = DataTooLong::DataOverCapacity(n, datacapacitybits),
                None => err = DataTooLong::SegmentTooLong,
            }
        }
        Err(err)
    }

    /// Encodes the given segments, in order, into a QR code.
    ///
    /// The smallest possible QR Code version within the given range is
    /// automatically chosen for the output. If `boostecl` is `true`, the ECC
    /// level may be higher than the `ecl` argument if it can be done without
    /// increasing the version. The `mask` can be `None` for automatic
    /// selection or a value from 0 to 7.
    ///
    /// The call is all-or-nothing: on error no symbol is produced.
    ///
    /// # Panics
    ///
    /// Panics if `minversion > maxversion`.
    pub fn encode_segments(
        segs: &[QrSegment],
        ecl: QrCodeEcc,
        minversion: Version,
        maxversion: Version,
        mask: Option<Mask>,
        boostecl: bool,
    ) -> Result<Self, DataTooLong> {
        let plan = capacity::plan(segs, ecl, minversion, maxversion, boostecl)?;
        let datacodewords: Vec<u8> = codewords::assemble(segs, &plan);
        Ok(QrCode::encode_codewords(&datacodewords, plan.ecl, plan.version, mask))
    }

    /// Creates a new QR Code with the given version number,
    /// error correction level, data codeword bytes, and mask number.
    ///
    /// This is a low-level API that most users should not use directly.
    /// A mid-level API is the `encode_segments()` function.
    ///
    /// # Panics
    ///
    /// Panics if `datacodewords` is not exactly the data codeword count for
    /// `version` and `ecl`.
    pub fn encode_codewords(
        datacodewords: &[u8],
        ecl: QrCodeEcc,
        version: Version,
        msk: Option<Mask>,
    ) -> Self {
        // Compute ECC
        let allcodewords: Vec<u8> = ecc::add_ecc_and_interleave(datacodewords, version, ecl);

        // Draw modules
        let mut grid = ModuleGrid::new(version);
        grid.draw_function_patterns();
        grid.draw_codewords(&allcodewords);

        // Do masking
        let msk: Mask = mask::apply_best_mask(&mut grid, ecl, msk);

        let (modules, function) = grid.into_parts();
        Self {
            version,
            size: i32::from(version.size()),
            ecl,
            mask: msk,
            modules,
            function,
        }
    }

    /// Returns this QR Code's version, in the range [1, 40].
    pub fn version(&self) -> Version {
        self.version
    }

    /// Returns this QR Code's size, in the range [21, 177].
    pub fn size(&self) -> i32 {
        self.size
    }

    /// Returns this QR Code's error correction level, after any boosting.
    pub fn error_correction_level(&self) -> QrCodeEcc {
        self.ecl
    }

    /// Returns this QR Code's mask, in the range [0, 7].
    pub fn mask(&self) -> Mask {
        self.mask
    }

    /// Returns the color of the module at the given coordinates.
    ///
    /// Returns `true` for dark modules and `false` for light modules. Coordinates outside the QR
    /// code's bounds return `false`.
    ///
    /// # Arguments
    ///
    /// * `x` - X-coordinate (0 is left).
    /// * `y` - Y-coordinate (0 is top).
    pub fn get_module(&self, x: i32, y: i32) -> bool {
        self.in_bounds(x, y) && self.modules.get(x as u8, y as u8)
    }

    /// Whether the module at the given coordinates belongs to a function
    /// pattern or the format/version areas rather than to the data region.
    /// Coordinates outside the QR code's bounds return `false`.
    pub fn is_function_module(&self, x: i32, y: i32) -> bool {
        self.in_bounds(x, y) && self.function.get(x as u8, y as u8)
    }

    fn in_bounds(&self, x: i32, y: i32) -> bool {
        let range = 0..self.size;
        range.contains(&x) && range.contains(&y)
    }
}
