//! Background palette.
//!
//! After every completed roll the background switches to a uniformly random
//! pick from five fixed pastel colors.

use rand::Rng;
use serde::Serialize;
use std::fmt;

/// One entry of the background palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PaletteColor {
    pub name: &'static str,
    pub hex: &'static str,
    pub rgb: (u8, u8, u8),
}

/// The fixed background palette, in display order.
pub const PALETTE: [PaletteColor; 5] = [
    PaletteColor {
        name: "alice blue",
        hex: "#f0f8ff",
        rgb: (0xf0, 0xf8, 0xff),
    },
    PaletteColor {
        name: "light pink",
        hex: "#ffb6c1",
        rgb: (0xff, 0xb6, 0xc1),
    },
    PaletteColor {
        name: "light blue",
        hex: "#add8e6",
        rgb: (0xad, 0xd8, 0xe6),
    },
    PaletteColor {
        name: "light green",
        hex: "#90ee90",
        rgb: (0x90, 0xee, 0x90),
    },
    PaletteColor {
        name: "light salmon",
        hex: "#ffa07a",
        rgb: (0xff, 0xa0, 0x7a),
    },
];

impl PaletteColor {
    /// Background shown before the first roll.
    pub fn initial() -> Self {
        PALETTE[0]
    }

    /// Pick a palette entry uniformly at random.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        PALETTE[rng.gen_range(0..PALETTE.len())]
    }

    /// Look up a palette entry by its hex code (case-insensitive).
    pub fn from_hex(hex: &str) -> Option<Self> {
        PALETTE
            .iter()
            .copied()
            .find(|c| c.hex.eq_ignore_ascii_case(hex))
    }

    pub fn is_in_palette(&self) -> bool {
        PALETTE.contains(self)
    }
}

impl Default for PaletteColor {
    fn default() -> Self {
        Self::initial()
    }
}

impl fmt::Display for PaletteColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.hex)
    }
}
