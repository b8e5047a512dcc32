//! Mixed-mode segmentation that minimises the encoded bit length.
//!
//! A string such as `"ORDER 12345678 für"` costs fewer bits as an
//! alphanumeric, a numeric and a byte segment than as one byte segment.
//! Costs are tracked in sixths of a bit so that numeric (10/3 bits per
//! digit) and alphanumeric (11/2 bits per character) stay integral.

use crate::segment::{QrSegment, QrSegmentMode, ALPHANUMERIC_CHARSET};
use crate::version::Version;

const MODES: [QrSegmentMode; 3] = [
    QrSegmentMode::Byte,
    QrSegmentMode::Alphanumeric,
    QrSegmentMode::Numeric,
];

/// Splits `text` into segments whose total encoded length at `version` is
/// minimal among byte, alphanumeric and numeric segmentations.
///
/// The character count field width depends on `version`, which is why the
/// result can differ between version classes. Decoding the segments in
/// order yields `text` again.
pub fn make_segments_optimally(text: &str, version: Version) -> Vec<QrSegment> {
    if text.is_empty() {
        return Vec::new();
    }
    let chars: Vec<char> = text.chars().collect();
    let charmodes = compute_character_modes(&chars, version);
    split_into_segments(&chars, &charmodes)
}

fn compute_character_modes(chars: &[char], version: Version) -> Vec<QrSegmentMode> {
    let headcosts: [usize; 3] =
        MODES.map(|m| (4 + usize::from(m.num_char_count_bits(version))) * 6);

    // charmodes[i][j] is the mode of character i on the cheapest path that
    // ends in state j after character i.
    let mut charmodes: Vec<[Option<QrSegmentMode>; 3]> = vec![[None; 3]; chars.len()];
    let mut prevcosts: [usize; 3] = headcosts;

    for (i, &c) in chars.iter().enumerate() {
        let mut curcosts = [usize::MAX; 3];

        curcosts[0] = prevcosts[0] + c.len_utf8() * 8 * 6;
        charmodes[i][0] = Some(MODES[0]);
        if ALPHANUMERIC_CHARSET.contains(c) {
            curcosts[1] = prevcosts[1] + 33;
            charmodes[i][1] = Some(MODES[1]);
        }
        if c.is_ascii_digit() {
            curcosts[2] = prevcosts[2] + 20;
            charmodes[i][2] = Some(MODES[2]);
        }

        // Switching after this character: round the finished segment up to
        // whole bits and pay the new segment's header.
        for j in 0..MODES.len() {
            for k in 0..MODES.len() {
                if charmodes[i][k].is_none() {
                    continue;
                }
                let newcost = curcosts[k].div_ceil(6) * 6 + headcosts[j];
                if newcost < curcosts[j] {
                    curcosts[j] = newcost;
                    charmodes[i][j] = Some(MODES[k]);
                }
            }
        }
        prevcosts = curcosts;
    }

    let mut curstate: usize = 0;
    for j in 1..MODES.len() {
        if prevcosts[j] < prevcosts[curstate] {
            curstate = j;
        }
    }

    let mut result = vec![QrSegmentMode::Byte; chars.len()];
    for i in (0..chars.len()).rev() {
        let mode = match charmodes[i][curstate] {
            Some(m) => m,
            None => unreachable!("every reachable state records its mode"),
        };
        result[i] = mode;
        curstate = MODES.iter().position(|&m| m == mode).unwrap_or(0);
    }
    result
}

fn split_into_segments(chars: &[char], charmodes: &[QrSegmentMode]) -> Vec<QrSegment> {
    let mut result = Vec::new();
    let mut start = 0;
    for i in 1..=chars.len() {
        if i < chars.len() && charmodes[i] == charmodes[start] {
            continue;
        }
        let run: String = chars[start..i].iter().collect();
        result.push(match charmodes[start] {
            QrSegmentMode::Numeric => QrSegment::pack_numeric(&run),
            QrSegmentMode::Alphanumeric => QrSegment::pack_alphanumeric(&run),
            _ => QrSegment::make_bytes(run.as_bytes()),
        });
        start = i;
    }
    result
}
