//! RGB color type, terminal color-mode, and the two RGB→xterm-256
//! quantizers mandated by spec §4.3 / Design Note "256-color palette
//! fidelity": both a naive cube-snap and a Redmean-weighted
//! nearest-neighbor variant are shipped; the caller picks one via
//! `Config`, rather than this crate guessing a default.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ColorMode {
    TrueColor,
    Indexed { quantizer: QuantizerKind },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum QuantizerKind {
    Naive,
    Redmean,
}

/// The six cube-step values used by both quantizers.
const CUBE_STEPS: [u8; 6] = [0, 95, 135, 175, 215, 255];
/// Midpoint thresholds between adjacent cube steps.
const CUBE_THRESHOLDS: [u16; 5] = [47, 115, 155, 195, 235];

fn snap_channel(c: u8) -> (u8, usize) {
    let c16 = c as u16;
    for (i, &t) in CUBE_THRESHOLDS.iter().enumerate() {
        if c16 < t {
            return (CUBE_STEPS[i], i);
        }
    }
    (CUBE_STEPS[5], 5)
}

fn is_grayish(c: Rgb) -> bool {
    let maxc = c.r.max(c.g).max(c.b) as i32;
    let minc = c.r.min(c.g).min(c.b) as i32;
    (maxc - minc) <= 2
}

fn gray_index(c: Rgb) -> u8 {
    let gray = ((c.r as u32 + c.g as u32 + c.b as u32) / 3) as i32;
    if gray < 8 {
        return 16; // system black, at the dark end
    }
    if gray > 238 {
        return 231; // system white, at the bright end
    }
    (232 + (gray - 8) / 10) as u8
}

/// Naive nearest-cube-color quantizer: snaps each channel independently
/// to the nearest of `{0,95,135,175,215,255}` using fixed midpoint
/// thresholds, per spec §4.3.
pub fn quantize_naive(c: Rgb) -> u8 {
    if is_grayish(c) {
        return gray_index(c);
    }
    let (_, ri) = snap_channel(c.r);
    let (_, gi) = snap_channel(c.g);
    let (_, bi) = snap_channel(c.b);
    (16 + 36 * ri + 6 * gi + bi) as u8
}

fn redmean_distance(a: Rgb, b: Rgb) -> f64 {
    let r_mean = (a.r as f64 + b.r as f64) / 2.0;
    let dr = a.r as f64 - b.r as f64;
    let dg = a.g as f64 - b.g as f64;
    let db = a.b as f64 - b.b as f64;
    let weight_r = 2.0 + r_mean / 256.0;
    let weight_g = 4.0;
    let weight_b = 2.0 + (255.0 - r_mean) / 256.0;
    (weight_r * dr * dr + weight_g * dg * dg + weight_b * db * db).sqrt()
}

/// Redmean-weighted nearest-neighbor quantizer over the 6x6x6 cube
/// (plus the grayscale ramp), trading a linear scan for better
/// perceptual accuracy than the naive cube-snap.
pub fn quantize_redmean(c: Rgb) -> u8 {
    if is_grayish(c) {
        return gray_index(c);
    }
    let mut best_index = 16u8;
    let mut best_dist = f64::MAX;
    for (ri, &r) in CUBE_STEPS.iter().enumerate() {
        for (gi, &g) in CUBE_STEPS.iter().enumerate() {
            for (bi, &b) in CUBE_STEPS.iter().enumerate() {
                let candidate = Rgb::new(r, g, b);
                let dist = redmean_distance(c, candidate);
                if dist < best_dist {
                    best_dist = dist;
                    best_index = (16 + 36 * ri + 6 * gi + bi) as u8;
                }
            }
        }
    }
    best_index
}

pub fn quantize(c: Rgb, kind: QuantizerKind) -> u8 {
    match kind {
        QuantizerKind::Naive => quantize_naive(c),
        QuantizerKind::Redmean => quantize_redmean(c),
    }
}

/// The full 256-entry xterm palette: 16 ANSI colors, the 6x6x6 cube,
/// and the 24-step grayscale ramp. Used by `palette_rgb` to round-trip
/// an index back to RGB for the idempotence property in spec §8.
pub const PALETTE_RGB: [[u8; 3]; 256] = build_palette();

const fn build_palette() -> [[u8; 3]; 256] {
    let mut table = [[0u8; 3]; 256];
    // 16 standard ANSI colors (approximate, standard xterm defaults).
    const ANSI: [[u8; 3]; 16] = [
        [0, 0, 0],
        [128, 0, 0],
        [0, 128, 0],
        [128, 128, 0],
        [0, 0, 128],
        [128, 0, 128],
        [0, 128, 128],
        [192, 192, 192],
        [128, 128, 128],
        [255, 0, 0],
        [0, 255, 0],
        [255, 255, 0],
        [0, 0, 255],
        [255, 0, 255],
        [0, 255, 255],
        [255, 255, 255],
    ];
    let mut i = 0;
    while i < 16 {
        table[i] = ANSI[i];
        i += 1;
    }
    const STEPS: [u8; 6] = [0, 95, 135, 175, 215, 255];
    let mut idx = 16;
    let mut r = 0;
    while r < 6 {
        let mut g = 0;
        while g < 6 {
            let mut b = 0;
            while b < 6 {
                table[idx] = [STEPS[r], STEPS[g], STEPS[b]];
                idx += 1;
                b += 1;
            }
            g += 1;
        }
        r += 1;
    }
    let mut i = 0;
    while i < 24 {
        let level = 8 + i as u32 * 10;
        table[232 + i] = [level as u8, level as u8, level as u8];
        i += 1;
    }
    table
}

pub fn palette_rgb(index: u8) -> Rgb {
    let [r, g, b] = PALETTE_RGB[index as usize];
    Rgb::new(r, g, b)
}
