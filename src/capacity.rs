//! Capacity planning: per-version codeword tables and version selection.

use tracing::debug;

use crate::error::DataTooLong;
use crate::segment::QrSegment;
use crate::version::{QrCodeEcc, Version};

/// The version and error correction level the data will be encoded at.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct CapacityPlan {
    pub version: Version,
    pub ecl: QrCodeEcc,
    /// Bits used by the segments, headers included, before terminator and padding.
    pub data_used_bits: usize,
}

impl CapacityPlan {
    /// Data capacity at the planned version and level, in bits.
    pub fn data_capacity_bits(&self) -> usize {
        num_data_codewords(self.version, self.ecl) * 8
    }
}

/// Finds the smallest version in `minversion..=maxversion` whose data
/// capacity at `ecl` holds `segs`, then optionally raises the error
/// correction level as far as that version allows.
///
/// The character count field width steps up at versions 10 and 27, so the
/// total is recomputed for every candidate. A single fixed version is just a
/// range of one.
///
/// # Panics
///
/// Panics if `minversion > maxversion`.
pub fn plan(
    segs: &[QrSegment],
    ecl: QrCodeEcc,
    minversion: Version,
    maxversion: Version,
    boostecl: bool,
) -> Result<CapacityPlan, DataTooLong> {
    assert!(minversion <= maxversion, "Invalid value");
    let (version, datausedbits) = select_version(segs, ecl, minversion, maxversion)?;
    let boosted = if boostecl {
        boost_ecl(ecl, version, datausedbits)
    } else {
        ecl
    };
    if boosted != ecl {
        debug!(version = version.value(), from = ?ecl, to = ?boosted, "boosted error correction level");
    }
    Ok(CapacityPlan {
        version,
        ecl: boosted,
        data_used_bits: datausedbits,
    })
}

/// Returns the first version from `minversion` upward that fits, with the
/// number of data bits the segments take at that version.
pub fn select_version(
    segs: &[QrSegment],
    ecl: QrCodeEcc,
    minversion: Version,
    maxversion: Version,
) -> Result<(Version, usize), DataTooLong> {
    let mut version: Version = minversion;
    loop {
        let datacapacitybits: usize = num_data_codewords(version, ecl) * 8;
        let dataused: Option<usize> = QrSegment::get_total_bits(segs, version);
        match dataused {
            Some(n) if n <= datacapacitybits => {
                debug!(
                    version = version.value(),
                    ecl = ?ecl,
                    used_bits = n,
                    capacity_bits = datacapacitybits,
                    "selected version"
                );
                return Ok((version, n));
            }
            _ if version >= maxversion => {
                return Err(match dataused {
                    None => DataTooLong::SegmentTooLong,
                    Some(n) => DataTooLong::DataOverCapacity(n, datacapacitybits),
                });
            }
            _ => {}
        }
        version = match version.next() {
            Some(v) => v,
            None => unreachable!("maxversion bounds the search"),
        };
    }
}

/// Returns the highest level, never below `ecl`, whose capacity at `version`
/// still holds `datausedbits`.
pub fn boost_ecl(ecl: QrCodeEcc, version: Version, datausedbits: usize) -> QrCodeEcc {
    let mut result = ecl;
    for &newecl in &[QrCodeEcc::Medium, QrCodeEcc::Quartile, QrCodeEcc::High] {
        if newecl > result && datausedbits <= num_data_codewords(version, newecl) * 8 {
            result = newecl;
        }
    }
    result
}

/// Returns the number of data bits that can be stored in a QR Code of the
/// given version, after all function modules are excluded. This includes
/// remainder bits, so it might not be a multiple of 8.
pub fn num_raw_data_modules(ver: Version) -> usize {
    let ver = usize::from(ver.value());
    let mut result: usize = (16 * ver + 128) * ver + 64;
    if ver >= 2 {
        let numalign: usize = ver / 7 + 2;
        result -= (25 * numalign - 10) * numalign - 55;
        if ver >= 7 {
            result -= 36;
        }
    }
    result
}

/// Number of 8-bit data codewords (not error correction) a symbol of this
/// version and level holds.
pub fn num_data_codewords(ver: Version, ecl: QrCodeEcc) -> usize {
    num_raw_data_modules(ver) / 8
        - ecc_codewords_per_block(ver, ecl) * num_error_correction_blocks(ver, ecl)
}

pub fn ecc_codewords_per_block(ver: Version, ecl: QrCodeEcc) -> usize {
    table_get(&ECC_CODEWORDS_PER_BLOCK, ver, ecl)
}

pub fn num_error_correction_blocks(ver: Version, ecl: QrCodeEcc) -> usize {
    table_get(&NUM_ERROR_CORRECTION_BLOCKS, ver, ecl)
}

fn table_get(table: &'static [[i8; 41]; 4], ver: Version, ecl: QrCodeEcc) -> usize {
    let value = table[ecl.ordinal()][usize::from(ver.value())];
    assert!(value > 0, "codeword table lookup out of range");
    value as usize
}

static ECC_CODEWORDS_PER_BLOCK: [[i8; 41]; 4] = [
    [
        -1, 7, 10, 15, 20, 26, 18, 20, 24, 30, 18, 20, 24, 26, 30, 22, 24, 28, 30, 28, 28, 28, 28, 30,
        30, 26, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // Low
    [
        -1, 10, 16, 26, 18, 24, 16, 18, 22, 22, 26, 30, 22, 22, 24, 24, 28, 28, 26, 26, 26, 26, 28, 28,
        28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28,
    ], // Medium
    [
        -1, 13, 22, 18, 26, 18, 24, 18, 22, 20, 24, 28, 26, 24, 20, 30, 24, 28, 28, 26, 30, 28, 30, 30,
        30, 30, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // Quartile
    [
        -1, 17, 28, 22, 16, 22, 28, 26, 26, 24, 28, 24, 28, 22, 24, 24, 30, 28, 28, 26, 28, 30, 24, 30,
        30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // High
];

static NUM_ERROR_CORRECTION_BLOCKS: [[i8; 41]; 4] = [
    [
        -1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 4, 4, 4, 4, 4, 6, 6, 6, 6, 7, 8, 8, 9, 9, 10, 12, 12, 12,
        13, 14, 15, 16, 17, 18, 19, 19, 20, 21, 22, 24, 25,
    ], // Low
    [
        -1, 1, 1, 1, 2, 2, 4, 4, 4, 5, 5, 5, 8, 9, 9, 10, 10, 11, 13, 14, 16, 17, 17, 18, 20, 21,
        23, 25, 26, 28, 29, 31, 33, 35, 37, 38, 40, 43, 45, 47, 49,
    ], // Medium
    [
        -1, 1, 1, 2, 2, 4, 4, 6, 6, 8, 8, 8, 10, 12, 16, 12, 17, 16, 18, 21, 20, 23, 23, 25, 27, 29,
        34, 34, 35, 38, 40, 43, 45, 48, 51, 53, 56, 59, 62, 65, 68,
    ], // Quartile
    [
        -1, 1, 1, 2, 4, 4, 4, 5, 6, 8, 8, 11, 11, 16, 16, 18, 16, 19, 21, 25, 25, 25, 34, 30, 32, 35,
        37, 40, 42, 45, 48, 51, 54, 57, 60, 63, 66, 70, 74, 77, 81,
    ], // High
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_data_modules_known_values() {
        assert_eq!(num_raw_data_modules(Version::new(1)), 208);
        assert_eq!(num_raw_data_modules(Version::new(2)), 359);
        assert_eq!(num_raw_data_modules(Version::new(7)), 1568);
        assert_eq!(num_raw_data_modules(Version::new(40)), 29648);
    }

    #[test]
    fn test_data_codewords_known_values() {
        let v1 = Version::new(1);
        assert_eq!(num_data_codewords(v1, QrCodeEcc::Low), 19);
        assert_eq!(num_data_codewords(v1, QrCodeEcc::Medium), 16);
        assert_eq!(num_data_codewords(v1, QrCodeEcc::Quartile), 13);
        assert_eq!(num_data_codewords(v1, QrCodeEcc::High), 9);
        assert_eq!(num_data_codewords(Version::new(5), QrCodeEcc::Quartile), 62);
        assert_eq!(num_data_codewords(Version::MAX, QrCodeEcc::Low), 2956);
        assert_eq!(num_data_codewords(Version::MAX, QrCodeEcc::High), 1276);
    }

    #[test]
    fn test_capacity_decreases_with_level() {
        for ver in Version::range(Version::MIN, Version::MAX) {
            let caps: Vec<usize> = QrCodeEcc::ALL.iter().map(|&e| num_data_codewords(ver, e)).collect();
            assert!(caps.windows(2).all(|w| w[0] > w[1]), "version {}", ver.value());
        }
    }

    #[test]
    fn test_select_version_steps_over_count_field_growth() {
        // 17 bytes fill 1-L exactly: 4 + 8 + 136 = 148 <= 152.
        let segs = [QrSegment::make_bytes(&[0x41; 17])];
        let (ver, used) = select_version(&segs, QrCodeEcc::Low, Version::MIN, Version::MAX).unwrap();
        assert_eq!((ver.value(), used), (1, 148));

        let segs = [QrSegment::make_bytes(&[0x41; 18])];
        let (ver, _) = select_version(&segs, QrCodeEcc::Low, Version::MIN, Version::MAX).unwrap();
        assert_eq!(ver.value(), 2);
    }

    #[test]
    fn test_select_version_reports_overflow() {
        let segs = [QrSegment::make_bytes(&[0x41; 18])];
        let err = select_version(&segs, QrCodeEcc::Low, Version::MIN, Version::MIN).unwrap_err();
        assert_eq!(err, DataTooLong::DataOverCapacity(4 + 8 + 144, 152));

        let segs = [QrSegment::make_bytes(&[0x41; 300])];
        let err = select_version(&segs, QrCodeEcc::Low, Version::MIN, Version::new(9)).unwrap_err();
        assert_eq!(err, DataTooLong::SegmentTooLong);
    }

    #[test]
    fn test_boost_never_downgrades() {
        let v1 = Version::new(1);
        assert_eq!(boost_ecl(QrCodeEcc::Low, v1, 72), QrCodeEcc::High);
        assert_eq!(boost_ecl(QrCodeEcc::Low, v1, 73), QrCodeEcc::Quartile);
        assert_eq!(boost_ecl(QrCodeEcc::Low, v1, 152), QrCodeEcc::Low);
        assert_eq!(boost_ecl(QrCodeEcc::High, v1, 152), QrCodeEcc::High);
    }

    #[test]
    fn test_plan_applies_boost_only_when_asked() {
        let segs = QrSegment::make_segments("HELLO");
        let p = plan(&segs, QrCodeEcc::Low, Version::MIN, Version::MAX, false).unwrap();
        assert_eq!(p.ecl, QrCodeEcc::Low);
        let p = plan(&segs, QrCodeEcc::Low, Version::MIN, Version::MAX, true).unwrap();
        assert_eq!(p.ecl, QrCodeEcc::High);
        assert_eq!(p.version, Version::MIN);
        assert_eq!(p.data_capacity_bits(), 72);
    }
}
