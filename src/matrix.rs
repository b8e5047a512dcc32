//! Module grid construction: function patterns and codeword placement.

use crate::version::Version;

/// A square grid of bits, packed row-major, eight modules per byte.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Bitmap {
    size: u8,
    bits: Vec<u8>,
}

impl Bitmap {
    /// Creates an all-zero bitmap of `size` x `size`.
    pub fn new(size: u8) -> Self {
        let cells = usize::from(size) * usize::from(size);
        Self {
            size,
            bits: vec![0; cells.div_ceil(8)],
        }
    }

    pub fn size(&self) -> u8 {
        self.size
    }

    fn index(&self, x: u8, y: u8) -> usize {
        let range = 0..self.size;
        assert!(range.contains(&x) && range.contains(&y));
        usize::from(y) * usize::from(self.size) + usize::from(x)
    }

    pub fn get(&self, x: u8, y: u8) -> bool {
        let index = self.index(x, y);
        (self.bits[index >> 3] >> (index & 7)) & 1 != 0
    }

    pub fn set(&mut self, x: u8, y: u8, value: bool) {
        let index = self.index(x, y);
        if value {
            self.bits[index >> 3] |= 1u8 << (index & 7);
        } else {
            self.bits[index >> 3] &= !(1u8 << (index & 7));
        }
    }

    pub fn toggle(&mut self, x: u8, y: u8) {
        let index = self.index(x, y);
        self.bits[index >> 3] ^= 1u8 << (index & 7);
    }

    /// Number of set cells.
    pub fn count_ones(&self) -> usize {
        self.bits.iter().map(|b| b.count_ones() as usize).sum()
    }
}

/// A symbol under construction.
///
/// `modules` holds the colour of every cell (dark = 1). `function` marks the
/// cells owned by finder, separator, timing and alignment patterns and the
/// reserved format and version areas; those are never touched by codeword
/// placement or masking. A cell that is in neither set after placement is a
/// remainder bit and stays light.
#[derive(Clone, Debug)]
pub struct ModuleGrid {
    version: Version,
    modules: Bitmap,
    function: Bitmap,
}

impl ModuleGrid {
    /// Allocates an empty grid of side `4 * version + 17`.
    pub fn new(version: Version) -> Self {
        let size = version.size();
        Self {
            version,
            modules: Bitmap::new(size),
            function: Bitmap::new(size),
        }
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn size(&self) -> u8 {
        self.modules.size()
    }

    pub fn module(&self, x: u8, y: u8) -> bool {
        self.modules.get(x, y)
    }

    pub fn is_function(&self, x: u8, y: u8) -> bool {
        self.function.get(x, y)
    }

    pub fn modules(&self) -> &Bitmap {
        &self.modules
    }

    /// Consumes the grid, returning the module and function-module bitmaps.
    pub fn into_parts(self) -> (Bitmap, Bitmap) {
        (self.modules, self.function)
    }

    pub(crate) fn toggle_module(&mut self, x: u8, y: u8) {
        self.modules.toggle(x, y);
    }

    fn set_function_module(&mut self, x: u8, y: u8, isdark: bool) {
        self.modules.set(x, y, isdark);
        self.function.set(x, y, true);
    }

    fn set_function_module_unbounded(&mut self, x: i32, y: i32, isdark: bool) {
        let range = 0..i32::from(self.size());
        if range.contains(&x) && range.contains(&y) {
            self.set_function_module(x as u8, y as u8, isdark);
        }
    }

    /// Draws timing, finder (with separators) and alignment patterns, and
    /// reserves the format and version information areas.
    pub fn draw_function_patterns(&mut self) {
        let size: u8 = self.size();
        for i in 0..size {
            self.set_function_module(6, i, i % 2 == 0);
            self.set_function_module(i, 6, i % 2 == 0);
        }

        let far = i32::from(size) - 4;
        self.draw_finder_pattern(3, 3);
        self.draw_finder_pattern(far, 3);
        self.draw_finder_pattern(3, far);

        let alignpatpos: &[u8] = alignment_pattern_positions(self.version);
        let numalign: usize = alignpatpos.len();
        for i in 0..numalign {
            for j in 0..numalign {
                // Don't draw on the three finder corners
                if (i == 0 && j == 0) || (i == 0 && j == numalign - 1) || (i == numalign - 1 && j == 0) {
                    continue;
                }
                self.draw_alignment_pattern(alignpatpos[i], alignpatpos[j]);
            }
        }

        self.draw_format_bits(0);
        if self.version.value() >= 7 {
            self.draw_version_bits(0);
        }
    }

    // 9x9 centred on (x, y): 7x7 finder plus the one-module light separator.
    fn draw_finder_pattern(&mut self, x: i32, y: i32) {
        for dy in -4i32..=4 {
            for dx in -4i32..=4 {
                let dist: i32 = dx.abs().max(dy.abs());
                self.set_function_module_unbounded(x + dx, y + dy, dist != 2 && dist != 4);
            }
        }
    }

    fn draw_alignment_pattern(&mut self, x: u8, y: u8) {
        for dy in -2i32..=2 {
            for dx in -2i32..=2 {
                let isdark = dx.abs().max(dy.abs()) != 1;
                self.set_function_module((i32::from(x) + dx) as u8, (i32::from(y) + dy) as u8, isdark);
            }
        }
    }

    /// Writes a 15-bit format word (already BCH-protected and masked) into
    /// both copies, plus the always-dark module beside the lower-left copy.
    pub fn draw_format_bits(&mut self, bits: u32) {
        // First copy, around the top-left finder
        for i in 0..6 {
            self.set_function_module(8, i, get_bit(bits, i));
        }
        self.set_function_module(8, 7, get_bit(bits, 6));
        self.set_function_module(8, 8, get_bit(bits, 7));
        self.set_function_module(7, 8, get_bit(bits, 8));
        for i in 9..15 {
            self.set_function_module(14 - i, 8, get_bit(bits, i));
        }

        // Second copy, split between the top-right and bottom-left finders
        let size: u8 = self.size();
        for i in 0..8 {
            self.set_function_module(size - 1 - i, 8, get_bit(bits, i));
        }
        for i in 8..15 {
            self.set_function_module(8, size - 15 + i, get_bit(bits, i));
        }
        self.set_function_module(8, size - 8, true);
    }

    /// Writes an 18-bit version word into the two 6x3 blocks beside the
    /// top-right and bottom-left finders.
    pub fn draw_version_bits(&mut self, bits: u32) {
        let size: u8 = self.size();
        for i in 0u8..18 {
            let bit: bool = get_bit(bits, i);
            let a: u8 = size - 11 + (i % 3);
            let b: u8 = i / 3;
            self.set_function_module(a, b, bit);
            self.set_function_module(b, a, bit);
        }
    }

    /// Places the interleaved codewords along the zigzag path: column pairs
    /// from the right edge, alternating upward and downward, skipping the
    /// vertical timing column and every function module. Bits are taken MSB
    /// first; dark = 1.
    ///
    /// # Panics
    ///
    /// Panics if `data` is not exactly the raw codeword count of the version.
    pub fn draw_codewords(&mut self, data: &[u8]) {
        assert_eq!(
            data.len(),
            crate::capacity::num_raw_data_modules(self.version) / 8,
            "Illegal argument"
        );
        let size: i32 = i32::from(self.size());
        let totalbits: usize = data.len() * 8;
        let mut i: usize = 0;
        let mut visited: usize = 0;
        let mut right: i32 = size - 1;
        while right >= 1 {
            if right == 6 {
                right = 5;
            }
            let upward: bool = ((right + 1) & 2) == 0;
            for vert in 0..size {
                for j in 0..2 {
                    let x = (right - j) as u8;
                    let y = (if upward { size - 1 - vert } else { vert }) as u8;
                    if self.is_function(x, y) {
                        continue;
                    }
                    visited += 1;
                    if i < totalbits {
                        self.modules.set(x, y, get_bit(data[i >> 3].into(), 7 - (i & 7) as u8));
                        i += 1;
                    }
                }
            }
            right -= 2;
        }
        assert_eq!(i, totalbits);
        debug_assert_eq!(visited, crate::capacity::num_raw_data_modules(self.version));
    }
}

/// Centre coordinates of the alignment patterns for a version, ascending.
/// Patterns sit at every pairing of these values except the three that would
/// overlap a finder.
pub fn alignment_pattern_positions(ver: Version) -> &'static [u8] {
    ALIGNMENT_PATTERN_POSITIONS[usize::from(ver.value())]
}

static ALIGNMENT_PATTERN_POSITIONS: [&[u8]; 41] = [
    &[],
    &[],
    &[6, 18],
    &[6, 22],
    &[6, 26],
    &[6, 30],
    &[6, 34],
    &[6, 22, 38],
    &[6, 24, 42],
    &[6, 26, 46],
    &[6, 28, 50],
    &[6, 30, 54],
    &[6, 32, 58],
    &[6, 34, 62],
    &[6, 26, 46, 66],
    &[6, 26, 48, 70],
    &[6, 26, 50, 74],
    &[6, 30, 54, 78],
    &[6, 30, 56, 82],
    &[6, 30, 58, 86],
    &[6, 34, 62, 90],
    &[6, 28, 50, 72, 94],
    &[6, 26, 50, 74, 98],
    &[6, 30, 54, 78, 102],
    &[6, 28, 54, 80, 106],
    &[6, 32, 58, 84, 110],
    &[6, 30, 58, 86, 114],
    &[6, 34, 62, 90, 118],
    &[6, 26, 50, 74, 98, 122],
    &[6, 30, 54, 78, 102, 126],
    &[6, 26, 52, 78, 104, 130],
    &[6, 30, 56, 82, 108, 134],
    &[6, 34, 60, 86, 112, 138],
    &[6, 30, 58, 86, 114, 142],
    &[6, 34, 62, 90, 118, 146],
    &[6, 30, 54, 78, 102, 126, 150],
    &[6, 24, 50, 76, 102, 128, 154],
    &[6, 28, 54, 80, 106, 132, 158],
    &[6, 32, 58, 84, 110, 136, 162],
    &[6, 26, 54, 82, 110, 138, 166],
    &[6, 30, 58, 86, 114, 142, 170],
];

pub(crate) fn get_bit(x: u32, i: u8) -> bool {
    ((x >> i) & 1) != 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capacity::num_raw_data_modules;

    fn grid(ver: u8) -> ModuleGrid {
        let mut g = ModuleGrid::new(Version::new(ver));
        g.draw_function_patterns();
        g
    }

    fn count_data_modules(g: &ModuleGrid) -> usize {
        let size = g.size();
        (0..size)
            .flat_map(|y| (0..size).map(move |x| (x, y)))
            .filter(|&(x, y)| !g.is_function(x, y))
            .count()
    }

    #[test]
    fn test_bitmap_set_get_toggle() {
        let mut bm = Bitmap::new(21);
        bm.set(20, 20, true);
        assert!(bm.get(20, 20));
        bm.toggle(20, 20);
        assert!(!bm.get(20, 20));
        bm.toggle(0, 1);
        assert_eq!(bm.count_ones(), 1);
    }

    #[test]
    fn test_alignment_table_matches_spacing_rule() {
        for v in 2..=40u8 {
            let ver = Version::new(v);
            let numalign = v / 7 + 2;
            let step: u8 = if v == 32 {
                26
            } else {
                ((v * 4 + numalign * 2 + 1) / (numalign * 2 - 2)) * 2
            };
            let mut expected: Vec<u8> = (0..numalign - 1).map(|i| ver.size() - 7 - i * step).collect();
            expected.push(6);
            expected.reverse();
            assert_eq!(alignment_pattern_positions(ver), expected.as_slice(), "version {v}");
        }
        assert!(alignment_pattern_positions(Version::MIN).is_empty());
    }

    #[test]
    fn test_data_module_count_matches_raw_capacity() {
        for v in 1..=40u8 {
            let g = grid(v);
            assert_eq!(count_data_modules(&g), num_raw_data_modules(Version::new(v)), "version {v}");
        }
    }

    #[test]
    fn test_finder_and_timing_layout() {
        let g = grid(1);
        // Finder ring and core, separator light.
        assert!(g.module(0, 0) && g.module(6, 6) && g.module(3, 3));
        assert!(!g.module(1, 1) && !g.module(7, 7) && !g.module(7, 0));
        assert!(g.module(20, 0) && g.module(0, 20));
        // Timing alternates between the finders, starting dark.
        assert!(g.module(8, 6) && !g.module(9, 6) && g.module(10, 6));
        assert!(g.module(6, 8) && !g.module(6, 9) && g.module(6, 12));
        // Dark module.
        assert!(g.module(8, 13) && g.is_function(8, 13));
    }

    #[test]
    fn test_alignment_pattern_drawn_for_version_2() {
        let g = grid(2);
        assert!(g.module(18, 18) && g.is_function(18, 18));
        assert!(!g.module(17, 18) && !g.module(19, 17));
        assert!(g.module(16, 16) && g.module(20, 20));
        // Only the one pattern; nothing overlaps the finders at (6, 18) / (18, 6).
        assert!(!g.is_function(10, 18));
    }

    #[test]
    fn test_version_area_reserved_from_7() {
        assert!(!grid(6).is_function(30, 0));
        let g = grid(7);
        let size = g.size();
        assert!(g.is_function(size - 11, 0) && g.is_function(0, size - 11));
        assert!(g.is_function(size - 9, 5) && g.is_function(5, size - 9));
    }

    #[test]
    fn test_codewords_fill_every_data_module() {
        for v in [1u8, 2, 7, 14, 40] {
            let ver = Version::new(v);
            let mut g = grid(v);
            let data = vec![0xffu8; num_raw_data_modules(ver) / 8];
            g.draw_codewords(&data);
            let size = g.size();
            let dark_data = (0..size)
                .flat_map(|y| (0..size).map(move |x| (x, y)))
                .filter(|&(x, y)| !g.is_function(x, y) && g.module(x, y))
                .count();
            assert_eq!(dark_data, data.len() * 8, "version {v}");
        }
    }

    #[test]
    fn test_codeword_placement_starts_bottom_right() {
        let ver = Version::new(1);
        let mut g = grid(1);
        let mut data = vec![0u8; num_raw_data_modules(ver) / 8];
        data[0] = 0b1010_0000;
        g.draw_codewords(&data);
        assert!(g.module(20, 20));
        assert!(!g.module(19, 20));
        assert!(g.module(20, 19));
        assert!(!g.module(19, 19));
    }
}
