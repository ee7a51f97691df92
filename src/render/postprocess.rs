//! Mask-based post-processing passes (spec §4.3), run after all
//! systems have written but before the terminal flush. Pass order is
//! fixed: `Grayout`, then `Dim`, then `OcclusionDim`.

use super::buffer::RenderBuffer;
use super::cell::Mask;
use super::color::Rgb;

fn luminance(c: Rgb) -> u8 {
    let l = 0.299 * c.r as f64 + 0.587 * c.g as f64 + 0.114 * c.b as f64;
    l.round().clamp(0.0, 255.0) as u8
}

fn desaturate_toward_gray(c: Rgb, progress: f64) -> Rgb {
    let progress = progress.clamp(0.0, 1.0);
    let gray = luminance(c);
    let lerp = |a: u8, b: u8| -> u8 {
        (a as f64 + (b as f64 - a as f64) * progress).round().clamp(0.0, 255.0) as u8
    };
    Rgb::new(lerp(c.r, gray), lerp(c.g, gray), lerp(c.b, gray))
}

fn scale_channel(c: u8, factor: f64) -> u8 {
    (c as f64 * factor).round().clamp(0.0, 255.0) as u8
}

fn scale_rgb(c: Rgb, factor: f64) -> Rgb {
    Rgb::new(
        scale_channel(c.r, factor),
        scale_channel(c.g, factor),
        scale_channel(c.b, factor),
    )
}

/// Progressively desaturates every cell whose mask intersects
/// `grayout_mask`, blending toward its luminance by `progress` (a
/// fraction of the configured grayout duration elapsed, in `[0,1]`).
pub fn grayout(buf: &mut RenderBuffer, grayout_mask: Mask, progress: f64) {
    let (w, h) = (buf.width(), buf.height());
    for y in 0..h as i32 {
        for x in 0..w as i32 {
            let Some(cell) = buf.get(x, y) else { continue };
            if !cell.mask.intersects(grayout_mask) {
                continue;
            }
            let rune = cell.rune;
            let fg = desaturate_toward_gray(cell.fg, progress);
            let bg = desaturate_toward_gray(cell.bg, progress);
            let attrs = cell.attrs;
            let mask = cell.mask;
            buf.set_with_bg(x, y, rune, fg, bg, attrs, mask);
        }
    }
}

/// Scales the background (or foreground) of every cell whose mask
/// intersects `dim_mask` by `factor` (`[0,1]`, 0 = black, 1 = unchanged).
pub fn dim(buf: &mut RenderBuffer, dim_mask: Mask, factor: f64, affect_fg: bool) {
    let (w, h) = (buf.width(), buf.height());
    for y in 0..h as i32 {
        for x in 0..w as i32 {
            let Some(cell) = buf.get(x, y) else { continue };
            if !cell.mask.intersects(dim_mask) {
                continue;
            }
            let rune = cell.rune;
            let attrs = cell.attrs;
            let mask = cell.mask;
            let fg = if affect_fg {
                scale_rgb(cell.fg, factor)
            } else {
                cell.fg
            };
            let bg = if affect_fg {
                cell.bg
            } else {
                scale_rgb(cell.bg, factor)
            };
            buf.set_with_bg(x, y, rune, fg, bg, attrs, mask);
        }
    }
}

/// Parameters for the fixed `Grayout` → `Dim` → `OcclusionDim` pass
/// chain. A mask of `Mask::empty()` makes its pass a no-op, since no
/// cell's mask ever intersects the empty mask — callers disable a
/// pass by passing an empty mask rather than skipping the call.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PostProcessParams {
    pub grayout_mask: Mask,
    pub grayout_progress: f64,
    pub dim_mask: Mask,
    pub dim_factor: f64,
    pub dim_affect_fg: bool,
    pub occlusion_mask: Mask,
    pub occlusion_factor: f64,
}

/// Runs the fixed, documented pass chain: `Grayout`, then `Dim`, then
/// `OcclusionDim`. This is the only order callers should rely on —
/// later passes observe earlier passes' output.
pub fn run_passes(buf: &mut RenderBuffer, params: &PostProcessParams) {
    grayout(buf, params.grayout_mask, params.grayout_progress);
    dim(buf, params.dim_mask, params.dim_factor, params.dim_affect_fg);
    occlusion_dim(buf, params.occlusion_mask, params.occlusion_factor);
}

/// For every cell whose foreground glyph is non-space and whose mask
/// intersects `occlusion_mask`, scales the background by `factor` —
/// the "character casts a shadow on its own cell" effect.
pub fn occlusion_dim(buf: &mut RenderBuffer, occlusion_mask: Mask, factor: f64) {
    let (w, h) = (buf.width(), buf.height());
    for y in 0..h as i32 {
        for x in 0..w as i32 {
            let Some(cell) = buf.get(x, y) else { continue };
            if cell.rune == ' ' || !cell.mask.intersects(occlusion_mask) {
                continue;
            }
            let rune = cell.rune;
            let fg = cell.fg;
            let attrs = cell.attrs;
            let mask = cell.mask;
            let bg = scale_rgb(cell.bg, factor);
            buf.set_with_bg(x, y, rune, fg, bg, attrs, mask);
        }
    }
}
