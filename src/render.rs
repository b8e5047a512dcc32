//! Rasterizing a finished symbol into an in-memory image.

use image::{ImageBuffer, Luma};

use crate::qrcode::QrCode;

/// Rasterizes a QR Code into an in-memory grayscale image.
///
/// Each module becomes a `scale` x `scale` block, dark modules black and
/// light modules white, surrounded by `border` light modules (the standard
/// asks for a quiet zone of 4). Saving or compressing the buffer is left to
/// the caller.
///
/// # Arguments
///
/// * `qr` - The QR Code to draw.
/// * `border` - Quiet zone width, in modules.
/// * `scale` - Pixels per module; must be at least 1.
///
/// # Example
///
/// ```rust
/// use qrsymbol::{render::to_image_buffer, QrCode, QrCodeEcc, Version};
///
/// let qr = QrCode::encode_text("Hello, World!", QrCodeEcc::Low, Version::MIN, Version::MAX, None, true).unwrap();
/// let img = to_image_buffer(&qr, 4, 1);
/// assert_eq!(img.dimensions(), (29, 29));
/// ```
pub fn to_image_buffer(qr: &QrCode, border: u32, scale: u32) -> ImageBuffer<Luma<u8>, Vec<u8>> {
    assert!(scale >= 1, "Scale must be positive");
    let side = (qr.size() as u32 + 2 * border) * scale;
    let border = border as i32;
    let scale = scale as i32;
    ImageBuffer::from_fn(side, side, |x, y| {
        let qr_x = x as i32 / scale - border;
        let qr_y = y as i32 / scale - border;
        if qr.get_module(qr_x, qr_y) {
            Luma([0u8]) // Black
        } else {
            Luma([255u8]) // White
        }
    })
}
