//! # qrsymbol
//!
//! A QR Code Model 2 symbol encoder.
//!
//! `qrsymbol` turns text or binary data into the module matrix of a QR Code
//! (ISO/IEC 18004): segment encoding, version selection, Reed-Solomon error
//! correction, matrix construction and mask selection. It covers versions 1
//! to 40 and all four error correction levels. Turning the matrix into
//! pixels is left to the caller, with a small optional helper behind the
//! `image` feature.
//!
//! ## Features
//!
//! - Encode data in numeric, alphanumeric, byte, kanji or ECI segments.
//! - Optional mixed-mode segmentation that minimises the bit length.
//! - Four error correction levels, with optional boosting when the version allows.
//! - Automatic or fixed mask selection.
//! - `image`: rasterize a symbol into an in-memory `image::ImageBuffer`.
//! - `serde`: serialize and deserialize [`EncodeOptions`].
//! - Safe Rust implementation with no unsafe code.
//!
//! ## Installation
//!
//! Add to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! qrsymbol = "0.1" # Replace with the latest version
//! ```
//!
//! ## Example
//!
//! Encode text and walk the modules:
//!
//! ```rust
//! use qrsymbol::{QrCode, QrCodeEcc, Version};
//!
//! let qr = QrCode::encode_text("HELLO WORLD", QrCodeEcc::Medium, Version::MIN, Version::MAX, None, false).unwrap();
//! assert_eq!(qr.size(), 21);
//! for y in 0..qr.size() {
//!     let row: String = (0..qr.size())
//!         .map(|x| if qr.get_module(x, y) { '#' } else { ' ' })
//!         .collect();
//!     println!("{row}");
//! }
//! ```
//!
//! Build segments by hand:
//!
//! ```rust
//! use qrsymbol::{EncodeOptions, QrCodeEcc, QrSegment};
//!
//! let segs = vec![
//!     QrSegment::make_eci(26).unwrap(),
//!     QrSegment::make_alphanumeric("THE SQUARE ROOT OF 2 IS ").unwrap(),
//!     QrSegment::make_numeric("1414213562").unwrap(),
//! ];
//! let qr = EncodeOptions::new().ecl(QrCodeEcc::Quartile).encode_segments(&segs).unwrap();
//! assert!(qr.error_correction_level() >= QrCodeEcc::Quartile);
//! ```
//!
//! ## Modules
//!
//! - [`segment`]: Segment builders and size calculations.
//! - [`capacity`]: Version tables and version selection.
//! - [`codewords`], [`ecc`]: Data codewords and Reed-Solomon error correction.
//! - [`matrix`], [`mask`]: Module placement and masking.
//! - [`qrcode`]: The finished symbol and its encode entry points.
//! - [`options`]: Reusable encode parameters.

#![forbid(unsafe_code)]

pub mod bitbuffer;
pub mod capacity;
pub mod codewords;
pub mod ecc;
pub mod error;
pub mod mask;
pub mod matrix;
pub mod optimal;
pub mod options;
pub mod qrcode;
#[cfg(feature = "image")]
pub mod render;
pub mod segment;
pub mod version;

pub use bitbuffer::BitBuffer;
pub use error::{DataTooLong, InvalidInput, QrError};
pub use options::EncodeOptions;
pub use qrcode::QrCode;
pub use segment::{QrSegment, QrSegmentMode};
pub use version::{Mask, QrCodeEcc, Version};
