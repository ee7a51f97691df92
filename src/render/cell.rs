//! `Cell`: the atomic render unit (spec §3). Every cell in a buffer is
//! always valid; "empty" is a space rune over a chosen background.

use super::color::Rgb;
use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
    pub struct Attrs: u8 {
        const BOLD = 0b0000_0001;
        const DIM = 0b0000_0010;
        const ITALIC = 0b0000_0100;
        const UNDERLINE = 0b0000_1000;
        const BLINK = 0b0001_0000;
        const REVERSE = 0b0010_0000;
    }
}

bitflags! {
    /// Categorizes a cell's semantic source; six named bits, OR-merged
    /// on every write so earlier categorizations are preserved.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
    pub struct Mask: u8 {
        const PING = 0b0000_0001;
        const GLYPH = 0b0000_0010;
        const FIELD = 0b0000_0100;
        const TRANSIENT = 0b0000_1000;
        const COMPOSITE = 0b0001_0000;
        const UI = 0b0010_0000;
        const ALL = 0xFF;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Cell {
    pub rune: char,
    pub fg: Rgb,
    pub bg: Rgb,
    pub attrs: Attrs,
    pub mask: Mask,
}

impl Cell {
    pub fn blank(bg: Rgb) -> Self {
        Cell {
            rune: ' ',
            fg: Rgb::BLACK,
            bg,
            attrs: Attrs::empty(),
            mask: Mask::empty(),
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::blank(Rgb::BLACK)
    }
}
