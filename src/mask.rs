//! Mask selection and the format/version information words.

use tracing::{debug, trace};

use crate::matrix::ModuleGrid;
use crate::version::{Mask, QrCodeEcc, Version};

const PENALTY_N1: i32 = 3;
const PENALTY_N2: i32 = 3;
const PENALTY_N3: i32 = 40;
const PENALTY_N4: i32 = 10;

/// Picks a mask for a grid whose codewords are already placed, applies it,
/// and writes the format and version information.
///
/// With `mask == None` all eight patterns are scored and the lowest penalty
/// wins, ties going to the lower index. A fixed mask skips scoring.
pub fn apply_best_mask(grid: &mut ModuleGrid, ecl: QrCodeEcc, mask: Option<Mask>) -> Mask {
    let version = grid.version();
    if version.value() >= 7 {
        grid.draw_version_bits(version_bits(version));
    }

    let msk: Mask = match mask {
        Some(m) => {
            debug!(mask = m.value(), "using requested mask");
            m
        }
        None => {
            let mut best = Mask::new(0);
            let mut minpenalty = i32::MAX;
            for m in Mask::all() {
                apply_mask(grid, m);
                grid.draw_format_bits(format_bits(ecl, m));
                let penalty: i32 = penalty_score(grid);
                trace!(mask = m.value(), penalty, "scored mask");
                if penalty < minpenalty {
                    best = m;
                    minpenalty = penalty;
                }
                apply_mask(grid, m); // Undoes the mask due to XOR
            }
            debug!(mask = best.value(), penalty = minpenalty, "selected mask");
            best
        }
    };
    apply_mask(grid, msk);
    grid.draw_format_bits(format_bits(ecl, msk));
    msk
}

/// Whether mask `mask` inverts the module at column `x`, row `y`.
pub fn mask_bit(mask: Mask, x: u8, y: u8) -> bool {
    let x = i32::from(x);
    let y = i32::from(y);
    match mask.value() {
        0 => (x + y) % 2 == 0,
        1 => y % 2 == 0,
        2 => x % 3 == 0,
        3 => (x + y) % 3 == 0,
        4 => (x / 3 + y / 2) % 2 == 0,
        5 => ((x * y) % 2) + ((x * y) % 3) == 0,
        6 => (((x * y) % 2) + ((x * y) % 3)) % 2 == 0,
        7 => (((x + y) % 2) + ((x * y) % 3)) % 2 == 0,
        _ => unreachable!(),
    }
}

/// XORs the mask pattern into every non-function module. Applying the same
/// mask twice restores the grid.
pub fn apply_mask(grid: &mut ModuleGrid, mask: Mask) {
    let size = grid.size();
    for y in 0..size {
        for x in 0..size {
            if !grid.is_function(x, y) && mask_bit(mask, x, y) {
                grid.toggle_module(x, y);
            }
        }
    }
}

/// The 15-bit format word: level and mask, BCH(15,5) protected, XOR 0x5412.
pub fn format_bits(ecl: QrCodeEcc, mask: Mask) -> u32 {
    let data = u32::from((ecl.format_bits() << 3) | mask.value());
    let mut rem: u32 = data;
    for _ in 0..10 {
        rem = (rem << 1) ^ ((rem >> 9) * 0x537);
    }
    ((data << 10) | rem) ^ 0x5412
}

/// The 18-bit version word: six version bits, Golay(18,6) protected.
pub fn version_bits(ver: Version) -> u32 {
    let ver = u32::from(ver.value());
    let mut rem: u32 = ver;
    for _ in 0..12 {
        rem = (rem << 1) ^ ((rem >> 11) * 0x1f25);
    }
    (ver << 12) | rem
}

/// Penalty score of the grid as it stands: N1 runs of five or more, N2 2x2
/// blocks, N3 finder-like 1:1:3:1:1 runs with four light modules on either
/// side, N4 dark proportion away from 50% in 5% steps.
pub fn penalty_score(grid: &ModuleGrid) -> i32 {
    let mut result: i32 = 0;
    let size: u8 = grid.size();

    // Adjacent modules in row having same color, and finder-like patterns
    for y in 0..size {
        result += line_penalty(size, |i| grid.module(i, y));
    }
    // Adjacent modules in column having same color, and finder-like patterns
    for x in 0..size {
        result += line_penalty(size, |i| grid.module(x, i));
    }

    // 2*2 blocks of modules having same color
    for y in 0..size - 1 {
        for x in 0..size - 1 {
            let color: bool = grid.module(x, y);
            if color == grid.module(x + 1, y)
                && color == grid.module(x, y + 1)
                && color == grid.module(x + 1, y + 1)
            {
                result += PENALTY_N2;
            }
        }
    }

    // Balance of dark and light modules
    let dark = grid.modules().count_ones() as i32;
    let total = i32::from(size) * i32::from(size);
    // Smallest k >= 0 with (45 - 5k)% <= dark <= (55 + 5k)%
    let k: i32 = ((dark * 20 - total * 10).abs() + total - 1) / total - 1;
    result += k * PENALTY_N4;
    result
}

fn line_penalty(size: u8, module: impl Fn(u8) -> bool) -> i32 {
    let mut result: i32 = 0;
    let mut runcolor = false;
    let mut run: i32 = 0;
    let mut runhistory = FinderPenalty::new(size);
    for i in 0..size {
        if module(i) == runcolor {
            run += 1;
            if run == 5 {
                result += PENALTY_N1;
            } else if run > 5 {
                result += 1;
            }
        } else {
            runhistory.add_history(run);
            if !runcolor {
                result += runhistory.count_patterns() * PENALTY_N3;
            }
            runcolor = module(i);
            run = 1;
        }
    }
    result + runhistory.terminate_and_count(runcolor, run) * PENALTY_N3
}

/// Run-length history of one row or column, newest first, used to spot
/// light-dark-light-dark-light runs in 1:1:3:1:1 proportion.
struct FinderPenalty {
    qr_size: i32,
    run_history: [i32; 7],
}

impl FinderPenalty {
    fn new(size: u8) -> Self {
        Self {
            qr_size: i32::from(size),
            run_history: [0; 7],
        }
    }

    // The light border outside the symbol counts toward the first run.
    fn add_history(&mut self, mut currentrunlength: i32) {
        if self.run_history[0] == 0 {
            currentrunlength += self.qr_size;
        }
        let len: usize = self.run_history.len();
        self.run_history.copy_within(0..len - 1, 1);
        self.run_history[0] = currentrunlength;
    }

    // Only valid right after a light run has been pushed.
    fn count_patterns(&self) -> i32 {
        let rh = &self.run_history;
        let n = rh[1];
        debug_assert!(n <= self.qr_size * 3);
        let core = n > 0 && rh[2] == n && rh[3] == n * 3 && rh[4] == n && rh[5] == n;
        i32::from(core && rh[0] >= n * 4 && rh[6] >= n) + i32::from(core && rh[6] >= n * 4 && rh[0] >= n)
    }

    fn terminate_and_count(mut self, currentruncolor: bool, mut currentrunlength: i32) -> i32 {
        if currentruncolor {
            self.add_history(currentrunlength);
            currentrunlength = 0;
        }
        currentrunlength += self.qr_size;
        self.add_history(currentrunlength);
        self.count_patterns()
    }
}
