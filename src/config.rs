//! Immutable engine configuration.
//!
//! The teacher crate keeps tunables in a `OnceLock<GameConfig>` global
//! (`init_game_config`/`get_game_config`). We avoid that pattern here:
//! `Config` is constructed once by the caller and passed by value into
//! `World::new` and `Runtime::new`; nothing in this crate reaches for
//! global mutable state.

use crate::fxmath::scalar::{div, fx, from_int};
use crate::render::color::{ColorMode, QuantizerKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Config {
    /// Simulation tick period, in fx seconds (e.g. `Scale/20` for 50ms).
    pub tick_dt: fx,
    /// Render frame period, in fx seconds (e.g. `Scale/60`).
    pub frame_dt: fx,
    pub screen_width: u16,
    pub screen_height: u16,
    pub color_mode: ColorMode,
    pub quantizer: QuantizerKind,
    /// Seed for the engine's `FastRand`; 0 is auto-promoted to 1.
    pub rng_seed: u64,
}

impl Config {
    pub fn new(screen_width: u16, screen_height: u16) -> Self {
        Config {
            tick_dt: div(from_int(1), from_int(20)),
            frame_dt: div(from_int(1), from_int(60)),
            screen_width,
            screen_height,
            color_mode: ColorMode::TrueColor,
            quantizer: QuantizerKind::Naive,
            rng_seed: 1,
        }
    }
}
