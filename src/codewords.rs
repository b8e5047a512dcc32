//! Data codeword assembly: segment headers, payloads, terminator and padding.

use crate::bitbuffer::BitBuffer;
use crate::capacity::CapacityPlan;
use crate::segment::QrSegment;

const PAD_BYTES: [u32; 2] = [0xec, 0x11];

/// Concatenates the segments into exactly `num_data_codewords` bytes for the
/// planned version and level.
///
/// Each segment contributes its 4-bit mode indicator, its character count at
/// the planned version's width, then its payload. Up to four zero bits of
/// terminator follow, then zero bits to the byte boundary, then alternating
/// `0xEC`/`0x11` until capacity is filled.
///
/// # Panics
///
/// Panics if the segments do not fit the plan; the planner has already
/// checked this.
pub fn assemble(segs: &[QrSegment], plan: &CapacityPlan) -> Vec<u8> {
    let datacapacitybits: usize = plan.data_capacity_bits();
    let mut bb = BitBuffer::with_capacity(datacapacitybits);
    for seg in segs {
        bb.append_bits(seg.mode().mode_bits(), 4);
        let ccbits = seg.mode().num_char_count_bits(plan.version);
        let numchars = u32::try_from(seg.num_chars()).unwrap_or(u32::MAX);
        assert!(ccbits == 0 || numchars >> ccbits == 0, "character count exceeds its field");
        bb.append_bits(if ccbits == 0 { 0 } else { numchars }, ccbits);
        bb.append_packed(seg.data(), seg.bit_length());
    }
    assert_eq!(bb.len(), plan.data_used_bits, "segment bit count disagrees with plan");
    assert!(bb.len() <= datacapacitybits, "segments exceed planned capacity");

    // Add terminator and pad up to a byte if applicable
    let numzerobits: usize = core::cmp::min(4, datacapacitybits - bb.len());
    bb.append_bits(0, numzerobits as u8);
    let numzerobits: usize = bb.len().wrapping_neg() & 7;
    bb.append_bits(0, numzerobits as u8);
    debug_assert_eq!(bb.len() % 8, 0);

    // Pad with alternating bytes until data capacity is reached
    for &padbyte in PAD_BYTES.iter().cycle() {
        if bb.len() >= datacapacitybits {
            break;
        }
        bb.append_bits(padbyte, 8);
    }
    assert_eq!(bb.len(), datacapacitybits);
    bb.into_bytes()
}
