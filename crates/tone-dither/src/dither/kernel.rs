//! Error diffusion kernel tables.

/// An error diffusion kernel.
///
/// Each entry gives an offset `(dx, dy)` to a not-yet-visited neighbour
/// and the numerator of the fraction of error it receives. The total
/// propagated is `sum(weights) / divisor`: 100% for most kernels, 75% for
/// Atkinson.
///
/// `max_dy` is how many rows ahead the kernel reaches, so the error
/// buffer needs `max_dy + 1` rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Kernel {
    /// `(dx, dy, weight)`; `dx` is mirrored on reversed serpentine rows.
    pub entries: &'static [(i32, i32, u8)],
    pub divisor: u8,
    pub max_dy: usize,
}

impl Kernel {
    /// Fraction of the quantization error this kernel propagates.
    pub fn propagation(&self) -> f32 {
        let sum: u32 = self.entries.iter().map(|&(_, _, w)| w as u32).sum();
        sum as f32 / self.divisor as f32
    }
}

/// Floyd-Steinberg.
///
/// ```text
///        X   7
///    3   5   1
/// ```
pub const FLOYD_STEINBERG: Kernel = Kernel {
    entries: &[(1, 0, 7), (-1, 1, 3), (0, 1, 5), (1, 1, 1)],
    divisor: 16,
    max_dy: 1,
};

/// Atkinson. Propagates only 6/8 of the error; the lost quarter gives its
/// characteristic high-contrast look.
///
/// ```text
///        X   1   1
///    1   1   1
///        1
/// ```
pub const ATKINSON: Kernel = Kernel {
    entries: &[(1, 0, 1), (2, 0, 1), (-1, 1, 1), (0, 1, 1), (1, 1, 1), (0, 2, 1)],
    divisor: 8,
    max_dy: 2,
};

/// Jarvis-Judice-Ninke.
///
/// ```text
///            X   7   5
///    3   5   7   5   3
///    1   3   5   3   1
/// ```
pub const JARVIS_JUDICE_NINKE: Kernel = Kernel {
    entries: &[
        (1, 0, 7),
        (2, 0, 5),
        (-2, 1, 3),
        (-1, 1, 5),
        (0, 1, 7),
        (1, 1, 5),
        (2, 1, 3),
        (-2, 2, 1),
        (-1, 2, 3),
        (0, 2, 5),
        (1, 2, 3),
        (2, 2, 1),
    ],
    divisor: 48,
    max_dy: 2,
};

/// Stucki: JJN layout with heavier center weights.
///
/// ```text
///            X   8   4
///    2   4   8   4   2
///    1   2   4   2   1
/// ```
pub const STUCKI: Kernel = Kernel {
    entries: &[
        (1, 0, 8),
        (2, 0, 4),
        (-2, 1, 2),
        (-1, 1, 4),
        (0, 1, 8),
        (1, 1, 4),
        (2, 1, 2),
        (-2, 2, 1),
        (-1, 2, 2),
        (0, 2, 4),
        (1, 2, 2),
        (2, 2, 1),
    ],
    divisor: 42,
    max_dy: 2,
};

/// Burkes: the first two rows of Stucki.
///
/// ```text
///            X   8   4
///    2   4   8   4   2
/// ```
pub const BURKES: Kernel = Kernel {
    entries: &[(1, 0, 8), (2, 0, 4), (-2, 1, 2), (-1, 1, 4), (0, 1, 8), (1, 1, 4), (2, 1, 2)],
    divisor: 32,
    max_dy: 1,
};

/// Sierra (three-row).
///
/// ```text
///            X   5   3
///    2   4   5   4   2
///        2   3   2
/// ```
pub const SIERRA: Kernel = Kernel {
    entries: &[
        (1, 0, 5),
        (2, 0, 3),
        (-2, 1, 2),
        (-1, 1, 4),
        (0, 1, 5),
        (1, 1, 4),
        (2, 1, 2),
        (-1, 2, 2),
        (0, 2, 3),
        (1, 2, 2),
    ],
    divisor: 32,
    max_dy: 2,
};

/// Sierra two-row.
///
/// ```text
///            X   4   3
///    1   2   3   2   1
/// ```
pub const SIERRA_TWO_ROW: Kernel = Kernel {
    entries: &[(1, 0, 4), (2, 0, 3), (-2, 1, 1), (-1, 1, 2), (0, 1, 3), (1, 1, 2), (2, 1, 1)],
    divisor: 16,
    max_dy: 1,
};

/// Sierra Lite.
///
/// ```text
///    X   2
///    1   1
/// ```
pub const SIERRA_LITE: Kernel = Kernel {
    entries: &[(1, 0, 2), (-1, 1, 1), (0, 1, 1)],
    divisor: 4,
    max_dy: 1,
};

/// "False" Floyd-Steinberg: three neighbours, no backwards diagonal.
///
/// ```text
///    X   3
///    3   2
/// ```
pub const FALSE_FLOYD_STEINBERG: Kernel = Kernel {
    entries: &[(1, 0, 3), (0, 1, 3), (1, 1, 2)],
    divisor: 8,
    max_dy: 1,
};

/// Zhigang Fan.
///
/// ```text
///            X   7
///    1   3   5
/// ```
pub const FAN: Kernel = Kernel {
    entries: &[(1, 0, 7), (-2, 1, 1), (-1, 1, 3), (0, 1, 5)],
    divisor: 16,
    max_dy: 1,
};

/// Shiau-Fan, five-tap form (divisor 16).
///
/// ```text
///                X   8
///    1   1   2   4
/// ```
pub const SHIAU_FAN: Kernel = Kernel {
    entries: &[(1, 0, 8), (-3, 1, 1), (-2, 1, 1), (-1, 1, 2), (0, 1, 4)],
    divisor: 16,
    max_dy: 1,
};
