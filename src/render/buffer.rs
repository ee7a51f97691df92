//! `RenderBuffer`: one frame's worth of terminal cells, row-major,
//! owned by the render phase exclusively (spec §5).

use super::blend::{blend_rgb, Blend};
use super::cell::{Attrs, Cell, Mask};
use super::color::Rgb;

#[derive(Debug, Clone)]
pub struct RenderBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl RenderBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        let len = width as usize * height as usize;
        RenderBuffer {
            width,
            height,
            cells: vec![Cell::default(); len],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn get(&self, x: i32, y: i32) -> Option<&Cell> {
        self.index_of(x, y).map(|i| &self.cells[i])
    }

    /// Resizes the buffer; contents are invalidated (re-filled blank).
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.cells = vec![Cell::default(); width as usize * height as usize];
    }

    /// The primitive write. Out-of-bounds coordinates are a no-op —
    /// callers never need to bounds-check before calling `Set`.
    #[allow(clippy::too_many_arguments)]
    pub fn set(
        &mut self,
        x: i32,
        y: i32,
        rune: char,
        fg: Rgb,
        bg: Rgb,
        blend: Blend,
        alpha: u8,
        attrs: Attrs,
        mask: Mask,
    ) {
        let Some(idx) = self.index_of(x, y) else {
            return;
        };
        let cell = &mut self.cells[idx];
        if blend.affects_fg() {
            cell.fg = blend_rgb(cell.fg, fg, blend, alpha);
        }
        if blend.affects_bg() {
            cell.bg = blend_rgb(cell.bg, bg, blend, alpha);
        }
        cell.rune = rune;
        cell.attrs |= attrs;
        cell.mask |= mask;
    }

    /// Writes only the foreground color and rune, leaving background
    /// untouched (`Set` with a BG-only-excluding blend).
    pub fn set_fg_only(&mut self, x: i32, y: i32, rune: char, fg: Rgb, attrs: Attrs, mask: Mask) {
        self.set(
            x,
            y,
            rune,
            fg,
            Rgb::BLACK,
            Blend::REPLACE.fg_only(),
            255,
            attrs,
            mask,
        );
    }

    /// Writes only the background color, leaving rune/fg untouched.
    pub fn set_bg_only(&mut self, x: i32, y: i32, bg: Rgb, mask: Mask) {
        let Some(idx) = self.index_of(x, y) else {
            return;
        };
        let cell = &mut self.cells[idx];
        cell.bg = bg;
        cell.mask |= mask;
    }

    /// Writes rune+fg+bg in one call with `Replace` semantics.
    pub fn set_with_bg(
        &mut self,
        x: i32,
        y: i32,
        rune: char,
        fg: Rgb,
        bg: Rgb,
        attrs: Attrs,
        mask: Mask,
    ) {
        self.set(x, y, rune, fg, bg, Blend::REPLACE, 255, attrs, mask);
    }

    /// Resets every cell to a blank space over `bg`.
    pub fn clear(&mut self, bg: Rgb) {
        for cell in &mut self.cells {
            *cell = Cell::blank(bg);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_write_is_noop() {
        let mut buf = RenderBuffer::new(4, 4);
        let before = buf.cells().to_vec();
        buf.set(
            -1,
            0,
            'x',
            Rgb::new(1, 2, 3),
            Rgb::BLACK,
            Blend::REPLACE,
            255,
            Attrs::empty(),
            Mask::GLYPH,
        );
        buf.set(
            4,
            0,
            'x',
            Rgb::new(1, 2, 3),
            Rgb::BLACK,
            Blend::REPLACE,
            255,
            Attrs::empty(),
            Mask::GLYPH,
        );
        assert_eq!(before, buf.cells().to_vec());
    }

    #[test]
    fn mask_bits_accumulate_across_writes() {
        let mut buf = RenderBuffer::new(1, 1);
        buf.set_with_bg(0, 0, 'A', Rgb::new(255, 255, 255), Rgb::BLACK, Attrs::empty(), Mask::GLYPH);
        buf.set_with_bg(0, 0, 'A', Rgb::new(255, 255, 255), Rgb::BLACK, Attrs::empty(), Mask::FIELD);
        let cell = buf.get(0, 0).unwrap();
        assert!(cell.mask.contains(Mask::GLYPH));
        assert!(cell.mask.contains(Mask::FIELD));
    }

    #[test]
    fn clear_then_set_blank_then_clear_equals_single_clear() {
        let mut a = RenderBuffer::new(3, 3);
        a.clear(Rgb::new(10, 10, 10));

        let mut b = RenderBuffer::new(3, 3);
        b.clear(Rgb::new(10, 10, 10));
        b.set_with_bg(1, 1, ' ', Rgb::BLACK, Rgb::new(10, 10, 10), Attrs::empty(), Mask::empty());
        b.clear(Rgb::new(10, 10, 10));

        assert_eq!(a.cells().to_vec(), b.cells().to_vec());
    }

    #[test]
    fn resize_invalidates_contents() {
        let mut buf = RenderBuffer::new(2, 2);
        buf.set_with_bg(0, 0, 'A', Rgb::new(9, 9, 9), Rgb::new(9, 9, 9), Attrs::empty(), Mask::GLYPH);
        buf.resize(3, 3);
        assert_eq!(buf.width(), 3);
        assert_eq!(buf.height(), 3);
        assert_eq!(buf.get(0, 0).unwrap().rune, ' ');
    }
}
